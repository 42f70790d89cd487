//! The document shapes shared between trackers and scoreboards.
//!
//! A live game is made of three document kinds, mirroring the storage layout
//! `seasons/{season}/games/{game}/…`:
//!
//! - one shared **metadata** document (`metadata/current`), merged into by
//!   both trackers and read by every scoreboard,
//! - one **team state** document per side (`game_state/{team}`), owned
//!   exclusively by that side's tracker and replaced wholesale on publish,
//! - one **presence** document per connected user (`presence/{user}`),
//!   refreshed by heartbeats.
//!
//! Write stamps inside these documents are assigned by the store when the
//! document is written (see [`stamp_with`]); until then the fields read `0`.
//!
//! [`stamp_with`]: crate::sync::store::DocumentBody::stamp_with

use std::fmt;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::auth::{Role, UserProfile};
use crate::{BaseState, BattingOrder, Config, GameState, Half, Inning, PlayRecord};

/// How recently the shared metadata must have been written for the game to
/// count as live: thirty minutes.
///
/// A scoreboard uses this to distinguish "in progress" from "abandoned or
/// final": trackers refresh the stamp with every publish and heartbeat, so a
/// stamp older than this window means nobody is scoring anymore.
pub const LIVE_WINDOW: Duration = Duration::from_secs(30 * 60);

// #############
// # METADATA  #
// #############

/// The shared scoreboard document for one game.
///
/// Both trackers merge partial updates ([`MetadataPatch`]) into this document
/// and the store applies them last-write-wins, so every field reads as
/// "whatever the most recent tracker said". The two trackers can disagree
/// transiently (each advances the inning on its own confirmation); the next
/// write self-corrects the display, and nothing in the scoring engine ever
/// reads these values back.
///
/// # Examples
///
/// ```
/// use scorebook::{Config, GameMetadata, Inning, MetadataPatch};
///
/// struct LeagueConfig;
/// impl Config for LeagueConfig {
///     type PlayerId = String;
///     type TeamId = String;
///     type UserId = String;
/// }
///
/// let mut metadata = GameMetadata::<LeagueConfig>::default();
/// let patch = MetadataPatch {
///     outs: Some(2),
///     away_score: Some(5),
///     ..MetadataPatch::empty()
/// };
/// patch.apply_to(&mut metadata);
///
/// assert_eq!(metadata.outs, 2);
/// assert_eq!(metadata.away_score, 5);
/// // Untouched fields keep their previous values.
/// assert_eq!(metadata.inning, Inning::FIRST);
/// assert_eq!(metadata.home_score, 0);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GameMetadata<T>
where
    T: Config,
{
    /// The inning on the scoreboard.
    pub inning: Inning,
    /// The half on the scoreboard; top means the away side bats.
    pub half: Half,
    /// Outs in the current half-inning.
    pub outs: u8,
    /// The home side's run total.
    pub home_score: u16,
    /// The away side's run total.
    pub away_score: u16,
    /// The home side's current pitcher, once one has been announced.
    pub home_pitcher: Option<T::PlayerId>,
    /// The away side's current pitcher, once one has been announced.
    pub away_pitcher: Option<T::PlayerId>,
    /// When the document was last written, in milliseconds since the Unix
    /// epoch. Assigned by the store on every merge.
    pub last_updated_ms: u64,
}

impl<T> GameMetadata<T>
where
    T: Config,
{
    /// Returns `true` when the last write falls within [`LIVE_WINDOW`] of
    /// `now_ms`.
    ///
    /// A stamp from a clock running ahead of the reader's reads as live
    /// rather than underflowing.
    #[must_use]
    pub fn is_live(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_updated_ms) <= LIVE_WINDOW.as_millis() as u64
    }
}

/// A fresh scoreboard: first inning, top half, no outs, scoreless, no
/// pitchers announced, never written.
impl<T> Default for GameMetadata<T>
where
    T: Config,
{
    fn default() -> Self {
        GameMetadata {
            inning: Inning::FIRST,
            half: Half::Top,
            outs: 0,
            home_score: 0,
            away_score: 0,
            home_pitcher: None,
            away_pitcher: None,
            last_updated_ms: 0,
        }
    }
}

impl<T> Clone for GameMetadata<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        GameMetadata {
            inning: self.inning,
            half: self.half,
            outs: self.outs,
            home_score: self.home_score,
            away_score: self.away_score,
            home_pitcher: self.home_pitcher.clone(),
            away_pitcher: self.away_pitcher.clone(),
            last_updated_ms: self.last_updated_ms,
        }
    }
}

impl<T> PartialEq for GameMetadata<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.inning == other.inning
            && self.half == other.half
            && self.outs == other.outs
            && self.home_score == other.home_score
            && self.away_score == other.away_score
            && self.home_pitcher == other.home_pitcher
            && self.away_pitcher == other.away_pitcher
            && self.last_updated_ms == other.last_updated_ms
    }
}

impl<T> fmt::Debug for GameMetadata<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameMetadata")
            .field("inning", &self.inning)
            .field("half", &self.half)
            .field("outs", &self.outs)
            .field("home_score", &self.home_score)
            .field("away_score", &self.away_score)
            .field("home_pitcher", &self.home_pitcher)
            .field("away_pitcher", &self.away_pitcher)
            .field("last_updated_ms", &self.last_updated_ms)
            .finish()
    }
}

/// A partial update to [`GameMetadata`].
///
/// `None` fields are left unchanged by [`apply_to`], which is what lets two
/// trackers share the document without clobbering each other's side: each
/// patches only the fields it is authoritative for (its own score, its
/// opponent's pitcher) plus the display fields both race on (inning, half,
/// outs) where last write wins.
///
/// There is no way to *clear* a pitcher through a patch; `None` always means
/// "leave as is".
///
/// [`apply_to`]: MetadataPatch::apply_to
pub struct MetadataPatch<T>
where
    T: Config,
{
    /// Replaces the scoreboard inning when set.
    pub inning: Option<Inning>,
    /// Replaces the scoreboard half when set.
    pub half: Option<Half>,
    /// Replaces the out count when set.
    pub outs: Option<u8>,
    /// Replaces the home run total when set.
    pub home_score: Option<u16>,
    /// Replaces the away run total when set.
    pub away_score: Option<u16>,
    /// Announces the home pitcher when set.
    pub home_pitcher: Option<T::PlayerId>,
    /// Announces the away pitcher when set.
    pub away_pitcher: Option<T::PlayerId>,
}

impl<T> MetadataPatch<T>
where
    T: Config,
{
    /// A patch that touches nothing. Useful as the base of a struct update.
    #[must_use]
    pub const fn empty() -> Self {
        MetadataPatch {
            inning: None,
            half: None,
            outs: None,
            home_score: None,
            away_score: None,
            home_pitcher: None,
            away_pitcher: None,
        }
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inning.is_none()
            && self.half.is_none()
            && self.outs.is_none()
            && self.home_score.is_none()
            && self.away_score.is_none()
            && self.home_pitcher.is_none()
            && self.away_pitcher.is_none()
    }

    /// Writes every set field into `metadata`, leaving the rest untouched.
    ///
    /// The write stamp is not part of the patch; the store assigns it when
    /// the merge lands.
    pub fn apply_to(&self, metadata: &mut GameMetadata<T>) {
        if let Some(inning) = self.inning {
            metadata.inning = inning;
        }
        if let Some(half) = self.half {
            metadata.half = half;
        }
        if let Some(outs) = self.outs {
            metadata.outs = outs;
        }
        if let Some(home_score) = self.home_score {
            metadata.home_score = home_score;
        }
        if let Some(away_score) = self.away_score {
            metadata.away_score = away_score;
        }
        if let Some(pitcher) = &self.home_pitcher {
            metadata.home_pitcher = Some(pitcher.clone());
        }
        if let Some(pitcher) = &self.away_pitcher {
            metadata.away_pitcher = Some(pitcher.clone());
        }
    }
}

impl<T> Default for MetadataPatch<T>
where
    T: Config,
{
    fn default() -> Self {
        MetadataPatch::empty()
    }
}

impl<T> Clone for MetadataPatch<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        MetadataPatch {
            inning: self.inning,
            half: self.half,
            outs: self.outs,
            home_score: self.home_score,
            away_score: self.away_score,
            home_pitcher: self.home_pitcher.clone(),
            away_pitcher: self.away_pitcher.clone(),
        }
    }
}

impl<T> PartialEq for MetadataPatch<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.inning == other.inning
            && self.half == other.half
            && self.outs == other.outs
            && self.home_score == other.home_score
            && self.away_score == other.away_score
            && self.home_pitcher == other.home_pitcher
            && self.away_pitcher == other.away_pitcher
    }
}

impl<T> fmt::Debug for MetadataPatch<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataPatch")
            .field("inning", &self.inning)
            .field("half", &self.half)
            .field("outs", &self.outs)
            .field("home_score", &self.home_score)
            .field("away_score", &self.away_score)
            .field("home_pitcher", &self.home_pitcher)
            .field("away_pitcher", &self.away_pitcher)
            .finish()
    }
}

// #############
// # TEAM DOC  #
// #############

/// One side's complete tracking state, as published to the store.
///
/// Exactly one tracker owns this document and replaces it wholesale on every
/// confirmed play, undo, and half-inning transition, so readers always see a
/// self-consistent snapshot. The document carries no half-inning field of its
/// own: each play record notes the half it was made in, and the scoreboard
/// half lives in [`GameMetadata`].
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TeamGameDoc<T>
where
    T: Config,
{
    /// The team this document belongs to.
    pub team: T::TeamId,
    /// Every committed play, in commit order.
    pub plays: Vec<PlayRecord<T::PlayerId>>,
    /// The side's batting order.
    pub batting_order: BattingOrder<T::PlayerId>,
    /// The tracker's current inning.
    pub inning: Inning,
    /// Outs in the current half-inning.
    pub outs: u8,
    /// The side's run total.
    pub score: u16,
    /// Who is on base right now.
    pub bases: BaseState<T::PlayerId>,
    /// `false` once the operator has ended the game.
    pub game_active: bool,
    /// When the document was last written, in milliseconds since the Unix
    /// epoch. Assigned by the store.
    pub last_updated_ms: u64,
}

impl<T> TeamGameDoc<T>
where
    T: Config,
{
    /// Snapshots `state` into a publishable document for `team`.
    ///
    /// The write stamp is left at zero; the store assigns it when the
    /// document is written.
    #[must_use]
    pub fn from_state(team: T::TeamId, state: &GameState<T::PlayerId>) -> Self {
        TeamGameDoc {
            team,
            plays: state.records().to_vec(),
            batting_order: state.batting_order().clone(),
            inning: state.inning(),
            outs: state.outs(),
            score: state.score(),
            bases: state.bases().clone(),
            game_active: !state.is_ended(),
            last_updated_ms: 0,
        }
    }
}

impl<T> Clone for TeamGameDoc<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        TeamGameDoc {
            team: self.team.clone(),
            plays: self.plays.clone(),
            batting_order: self.batting_order.clone(),
            inning: self.inning,
            outs: self.outs,
            score: self.score,
            bases: self.bases.clone(),
            game_active: self.game_active,
            last_updated_ms: self.last_updated_ms,
        }
    }
}

impl<T> PartialEq for TeamGameDoc<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.team == other.team
            && self.plays == other.plays
            && self.batting_order == other.batting_order
            && self.inning == other.inning
            && self.outs == other.outs
            && self.score == other.score
            && self.bases == other.bases
            && self.game_active == other.game_active
            && self.last_updated_ms == other.last_updated_ms
    }
}

impl<T> fmt::Debug for TeamGameDoc<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeamGameDoc")
            .field("team", &self.team)
            .field("plays", &self.plays)
            .field("batting_order", &self.batting_order)
            .field("inning", &self.inning)
            .field("outs", &self.outs)
            .field("score", &self.score)
            .field("bases", &self.bases)
            .field("game_active", &self.game_active)
            .field("last_updated_ms", &self.last_updated_ms)
            .finish()
    }
}

// #############
// # PRESENCE  #
// #############

/// One connected user's presence record for a game.
///
/// Written when a session starts and refreshed by heartbeats; a scoreboard
/// lists these to show who is scoring.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PresenceRecord<T>
where
    T: Config,
{
    /// The user this record belongs to.
    pub user: T::UserId,
    /// The team the user is attached to, for team-scoped roles.
    pub team: Option<T::TeamId>,
    /// Display name for the scorer roster.
    pub display_name: String,
    /// The user's league role.
    pub role: Role,
    /// When the last heartbeat was written, in milliseconds since the Unix
    /// epoch. Assigned by the store.
    pub last_seen_ms: u64,
}

impl<T> PresenceRecord<T>
where
    T: Config,
{
    /// Builds the presence record for `profile`, stamp unassigned.
    #[must_use]
    pub fn new(profile: &UserProfile<T>) -> Self {
        PresenceRecord {
            user: profile.user.clone(),
            team: profile.team.clone(),
            display_name: profile.display_name.clone(),
            role: profile.role,
            last_seen_ms: 0,
        }
    }
}

impl<T> Clone for PresenceRecord<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        PresenceRecord {
            user: self.user.clone(),
            team: self.team.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            last_seen_ms: self.last_seen_ms,
        }
    }
}

impl<T> PartialEq for PresenceRecord<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
            && self.team == other.team
            && self.display_name == other.display_name
            && self.role == other.role
            && self.last_seen_ms == other.last_seen_ms
    }
}

impl<T> fmt::Debug for PresenceRecord<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenceRecord")
            .field("user", &self.user)
            .field("team", &self.team)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("last_seen_ms", &self.last_seen_ms)
            .finish()
    }
}

// ###################
// # UNIT TESTS      #
// ###################
