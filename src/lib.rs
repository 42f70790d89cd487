//! # Scorebook
//!
//! Scorebook is a live scoring engine for slow-pitch softball, written in 100% safe Rust.
//! It models a single game as seen from one side's scorekeeper: a deterministic
//! play-outcome resolver, a manual runner-adjustment step, an append-only at-bat
//! history with exact single-step undo, and a half-inning state machine driven by
//! operator confirmation.
//!
//! Two independent trackers (one per side) can score the same live game
//! concurrently. Each publishes its own per-team document and both merge into a
//! shared metadata document through the [`DocumentStore`] contract; spectators
//! follow along through a read-only [`ScoreboardSession`].
//!
//! [`DocumentStore`]: crate::sync::store::DocumentStore
//! [`ScoreboardSession`]: crate::sessions::scoreboard_session::ScoreboardSession

#![forbid(unsafe_code)] // let us try
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
use std::{fmt::Debug, hash::Hash};

pub use auth::{can_track, Role, UserProfile};
pub use bases::BaseState;
pub use error::{ScorebookError, ScorebookResult};
pub use game_state::GameState;
pub use lineup::{BattingOrder, FieldingPosition, Player};
pub use pending::{MoveEffect, PendingPlay, RunnerMoveCommand};
pub use play::{PlayRecord, PlayType};
pub use resolver::{resolve, Resolution};
use serde::{de::DeserializeOwned, Serialize};
pub use sessions::builder::SessionBuilder;
pub use sessions::event_drain::EventDrain;
pub use sessions::scoreboard_session::ScoreboardSession;
pub use sessions::tracker_session::{SelectOutcome, TrackerSession};
pub use sync::chaos_store::{ChaosConfig, ChaosStats, ChaosStore};
pub use sync::client::{MetadataObserver, PresenceObserver, SyncClient, TeamStateObserver};
pub use sync::documents::{
    GameMetadata, MetadataPatch, PresenceRecord, TeamGameDoc, LIVE_WINDOW,
};
pub use sync::memory_store::MemoryStore;
pub use sync::store::{
    CollectionPath, DocPath, DocumentBody, DocumentSnapshot, DocumentStore, GameId, SeasonId,
    SnapshotObserver, SubscriptionId, WriteStamp,
};

// Internal modules - re-exported above, but doc(hidden) for API cleanliness
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod bases;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod game_state;
#[doc(hidden)]
pub mod lineup;
#[doc(hidden)]
pub mod pending;
#[doc(hidden)]
pub mod play;
pub mod prelude;
#[doc(hidden)]
pub mod resolver;
pub mod telemetry;
#[doc(hidden)]
pub mod sessions {
    #[doc(hidden)]
    pub mod builder;
    #[doc(hidden)]
    pub mod event_drain;
    #[doc(hidden)]
    pub mod scoreboard_session;
    #[doc(hidden)]
    pub mod tracker_session;
}
#[doc(hidden)]
pub mod sync {
    pub mod chaos_store;
    #[doc(hidden)]
    pub mod client;
    /// Binary codec for stored-document serialization.
    ///
    /// Provides centralized encoding and decoding of document bodies using
    /// bincode, so the in-memory store behaves with the value semantics of a
    /// remote database: what you read back is a copy, never a shared alias.
    pub mod codec;
    #[doc(hidden)]
    pub mod documents;
    #[doc(hidden)]
    pub mod memory_store;
    #[doc(hidden)]
    pub mod store;
}

// #############
// # CONSTANTS #
// #############

/// Number of outs that retire a half-inning.
///
/// Reaching this count does **not** advance the half-inning by itself: the
/// transition is gated on operator confirmation via
/// [`retire_side`](crate::TrackerSession::retire_side), so the caller can show
/// a "side retired" state first. Out counts above this value can occur
/// transiently (a double play charged with two outs already recorded) and are
/// treated the same as exactly three.
pub const OUTS_PER_HALF: u8 = 3;

/// An inning number, starting at 1.
///
/// Innings are the outer unit of game time. Each inning has a top half (away
/// side bats) and a bottom half (home side bats); see [`Half`].
///
/// # Type Safety
///
/// `Inning` is a newtype wrapper around `u32` that provides:
/// - Clear semantic meaning (innings vs arbitrary integers)
/// - Saturating [`previous()`](Inning::previous) so undo can never step before
///   the first inning
/// - Compile-time prevention of accidentally mixing innings with out counts or
///   lineup indices
///
/// # Examples
///
/// ```
/// use scorebook::Inning;
///
/// let first = Inning::FIRST;
/// assert_eq!(first.as_u32(), 1);
///
/// let second = first.next();
/// assert!(second > first);
/// assert_eq!(second.previous(), first);
///
/// // previous() saturates at the first inning
/// assert_eq!(first.previous(), first);
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Inning(u32);

impl Inning {
    /// The first inning of a game.
    pub const FIRST: Inning = Inning(1);

    /// Creates a new `Inning` from a `u32` value.
    ///
    /// Note: This does not validate the inning number. Use
    /// [`is_valid()`](Inning::is_valid) to check that the inning is positive.
    #[inline]
    #[must_use]
    pub const fn new(inning: u32) -> Self {
        Inning(inning)
    }

    /// Returns the underlying `u32` value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns `true` if this inning is valid (positive).
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 1
    }

    /// The inning after this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Inning {
        Inning(self.0 + 1)
    }

    /// The inning before this one, saturating at the first inning.
    #[inline]
    #[must_use]
    pub const fn previous(self) -> Inning {
        if self.0 > 1 {
            Inning(self.0 - 1)
        } else {
            Inning::FIRST
        }
    }
}

impl Default for Inning {
    fn default() -> Self {
        Inning::FIRST
    }
}

impl std::fmt::Display for Inning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<u32> for Inning {
    type Output = Inning;

    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Inning(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u32> for Inning {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

impl From<u32> for Inning {
    #[inline]
    fn from(value: u32) -> Self {
        Inning(value)
    }
}

impl From<Inning> for u32 {
    #[inline]
    fn from(inning: Inning) -> Self {
        inning.0
    }
}

impl PartialEq<u32> for Inning {
    #[inline]
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u32> for Inning {
    #[inline]
    fn partial_cmp(&self, other: &u32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

/// A position in the batting order.
///
/// Slots index into a fixed [`BattingOrder`] and wrap modulo the order length:
/// after the last batter, the leadoff batter is up again. The wrap direction
/// is reversible, which is what lets undo walk the batter index backwards
/// exactly.
///
/// # Examples
///
/// ```
/// use scorebook::LineupSlot;
///
/// let slot = LineupSlot::LEADOFF;
/// assert_eq!(slot.as_usize(), 0);
///
/// // Wraps forward and backward modulo the order length
/// let last = slot.previous_in(9);
/// assert_eq!(last.as_usize(), 8);
/// assert_eq!(last.next_in(9), slot);
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct LineupSlot(usize);

impl LineupSlot {
    /// The leadoff (first) slot in the batting order.
    pub const LEADOFF: LineupSlot = LineupSlot(0);

    /// Creates a new `LineupSlot` from a `usize` value.
    ///
    /// Note: This does not validate the slot against a specific batting order.
    /// Use [`is_valid_for()`](Self::is_valid_for) to check validity.
    #[inline]
    #[must_use]
    pub const fn new(slot: usize) -> Self {
        LineupSlot(slot)
    }

    /// Returns the underlying `usize` value.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns `true` if this slot indexes into a batting order of the given length.
    #[inline]
    #[must_use]
    pub const fn is_valid_for(self, order_len: usize) -> bool {
        self.0 < order_len
    }

    /// The next slot, wrapping modulo `order_len`.
    ///
    /// Returns `self` unchanged when `order_len` is zero (an empty batting
    /// order has no next batter).
    #[inline]
    #[must_use]
    pub const fn next_in(self, order_len: usize) -> LineupSlot {
        if order_len == 0 {
            self
        } else {
            LineupSlot((self.0 + 1) % order_len)
        }
    }

    /// The previous slot, wrapping modulo `order_len`.
    ///
    /// Returns `self` unchanged when `order_len` is zero.
    #[inline]
    #[must_use]
    pub const fn previous_in(self, order_len: usize) -> LineupSlot {
        if order_len == 0 {
            self
        } else {
            LineupSlot((self.0 + order_len - 1) % order_len)
        }
    }
}

impl std::fmt::Display for LineupSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for LineupSlot {
    #[inline]
    fn from(value: usize) -> Self {
        LineupSlot(value)
    }
}

impl From<LineupSlot> for usize {
    #[inline]
    fn from(slot: LineupSlot) -> Self {
        slot.0
    }
}

// #############
// #   ENUMS   #
// #############

/// One of the three occupiable bases.
///
/// Home is deliberately not a `Base`: a runner reaching home stops being a
/// base runner and becomes a run. Targets that may be home are expressed as
/// [`AdvanceTarget`].
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    /// First base.
    First,
    /// Second base.
    Second,
    /// Third base.
    Third,
}

impl Base {
    /// All bases, in batter-to-lead order (first, second, third).
    pub const ALL: [Base; 3] = [Base::First, Base::Second, Base::Third];

    /// Number of occupiable bases.
    pub const COUNT: usize = 3;

    /// The zero-based index of this base (first = 0, third = 2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Base::First => 0,
            Base::Second => 1,
            Base::Third => 2,
        }
    }

    /// The base at the given zero-based index, or `None` when out of range.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Base> {
        match index {
            0 => Some(Base::First),
            1 => Some(Base::Second),
            2 => Some(Base::Third),
            _ => None,
        }
    }

    /// The target one base forward: second, third, or home from third.
    #[inline]
    #[must_use]
    pub const fn forward(self) -> AdvanceTarget {
        match self {
            Base::First => AdvanceTarget::Base(Base::Second),
            Base::Second => AdvanceTarget::Base(Base::Third),
            Base::Third => AdvanceTarget::Home,
        }
    }

    /// The base one behind this one, or `None` for first.
    #[inline]
    #[must_use]
    pub const fn backward(self) -> Option<Base> {
        match self {
            Base::First => None,
            Base::Second => Some(Base::First),
            Base::Third => Some(Base::Second),
        }
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base::First => write!(f, "first"),
            Base::Second => write!(f, "second"),
            Base::Third => write!(f, "third"),
        }
    }
}

/// Destination of a runner movement: a base, or home (scoring).
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceTarget {
    /// The runner ends up standing on a base.
    Base(Base),
    /// The runner crosses home plate and scores.
    Home,
}

impl AdvanceTarget {
    /// Returns `true` if the target is home plate.
    #[inline]
    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, AdvanceTarget::Home)
    }

    /// The base this target refers to, or `None` for home.
    #[inline]
    #[must_use]
    pub const fn base(self) -> Option<Base> {
        match self {
            AdvanceTarget::Base(base) => Some(base),
            AdvanceTarget::Home => None,
        }
    }
}

impl std::fmt::Display for AdvanceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvanceTarget::Base(base) => write!(f, "{}", base),
            AdvanceTarget::Home => write!(f, "home"),
        }
    }
}

impl From<Base> for AdvanceTarget {
    #[inline]
    fn from(base: Base) -> Self {
        AdvanceTarget::Base(base)
    }
}

/// The half of an inning currently being played.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    /// Top half: the away side bats.
    #[default]
    Top,
    /// Bottom half: the home side bats.
    Bottom,
}

impl Half {
    /// The other half.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Half {
        match self {
            Half::Top => Half::Bottom,
            Half::Bottom => Half::Top,
        }
    }

    /// Returns `true` for the top half.
    #[inline]
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Half::Top)
    }
}

impl std::fmt::Display for Half {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Half::Top => write!(f, "top"),
            Half::Bottom => write!(f, "bottom"),
        }
    }
}

/// The coarse phase a tracked game is in. You can query it via [`phase`].
///
/// [`phase`]: crate::GameState::phase
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GamePhase {
    /// The game is live and plays may be recorded.
    Live,
    /// Three (or more) outs have been charged; the half-inning is over and the
    /// machine is waiting for the operator to confirm the transition.
    SideRetired,
    /// The game has been ended by the operator. Terminal.
    Ended,
}

/// Notifications that you can receive from a session. Handling them is up to the user.
///
/// Remote-driven events (`MetadataUpdated`, `TeamStateUpdated`, and their
/// lapsed counterparts) are queued by subscription callbacks and drained
/// through [`events`]; `SideRetired` is queued locally when a commit brings
/// the out count to three so the caller can prompt for confirmation.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]` because new event types may be
/// added in future versions. Always include a wildcard arm when matching:
///
/// ```ignore
/// match event {
///     TrackerEvent::MetadataUpdated { metadata } => { /* handle */ }
///     TrackerEvent::SideRetired { inning, half } => { /* prompt */ }
///     _ => { /* handle unknown events */ }
/// }
/// ```
///
/// [`events`]: crate::TrackerSession::events
#[non_exhaustive]
pub enum TrackerEvent<T>
where
    T: Config,
{
    /// The out count reached three; the half-inning is over pending operator
    /// confirmation via [`retire_side`](crate::TrackerSession::retire_side).
    SideRetired {
        /// The inning in which the side was retired.
        inning: Inning,
        /// The half that was being played.
        half: Half,
    },
    /// The shared metadata document changed remotely.
    MetadataUpdated {
        /// The new metadata snapshot.
        metadata: GameMetadata<T>,
    },
    /// The metadata subscription delivered no data (missing document or store
    /// error). Treat as a valid transient state, not a failure.
    MetadataLapsed,
    /// A team's tracking document changed remotely.
    TeamStateUpdated {
        /// The new per-team document snapshot.
        state: TeamGameDoc<T>,
    },
    /// A team-state subscription delivered no data (document deleted by a game
    /// reset, not yet created, or a store error).
    TeamStateLapsed {
        /// The team whose document lapsed.
        team: T::TeamId,
    },
}

// Manual impls: a derive would bound the config marker itself instead of the
// identity types it names.
impl<T> Clone for TrackerEvent<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        match self {
            TrackerEvent::SideRetired { inning, half } => TrackerEvent::SideRetired {
                inning: *inning,
                half: *half,
            },
            TrackerEvent::MetadataUpdated { metadata } => TrackerEvent::MetadataUpdated {
                metadata: metadata.clone(),
            },
            TrackerEvent::MetadataLapsed => TrackerEvent::MetadataLapsed,
            TrackerEvent::TeamStateUpdated { state } => TrackerEvent::TeamStateUpdated {
                state: state.clone(),
            },
            TrackerEvent::TeamStateLapsed { team } => TrackerEvent::TeamStateLapsed {
                team: team.clone(),
            },
        }
    }
}

impl<T> PartialEq for TrackerEvent<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                TrackerEvent::SideRetired { inning, half },
                TrackerEvent::SideRetired {
                    inning: other_inning,
                    half: other_half,
                },
            ) => inning == other_inning && half == other_half,
            (
                TrackerEvent::MetadataUpdated { metadata },
                TrackerEvent::MetadataUpdated { metadata: other },
            ) => metadata == other,
            (TrackerEvent::MetadataLapsed, TrackerEvent::MetadataLapsed) => true,
            (
                TrackerEvent::TeamStateUpdated { state },
                TrackerEvent::TeamStateUpdated { state: other },
            ) => state == other,
            (
                TrackerEvent::TeamStateLapsed { team },
                TrackerEvent::TeamStateLapsed { team: other },
            ) => team == other,
            _ => false,
        }
    }
}

impl<T> std::fmt::Debug for TrackerEvent<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerEvent::SideRetired { inning, half } => f
                .debug_struct("SideRetired")
                .field("inning", inning)
                .field("half", half)
                .finish(),
            TrackerEvent::MetadataUpdated { metadata } => f
                .debug_struct("MetadataUpdated")
                .field("metadata", metadata)
                .finish(),
            TrackerEvent::MetadataLapsed => f.write_str("MetadataLapsed"),
            TrackerEvent::TeamStateUpdated { state } => f
                .debug_struct("TeamStateUpdated")
                .field("state", state)
                .finish(),
            TrackerEvent::TeamStateLapsed { team } => f
                .debug_struct("TeamStateLapsed")
                .field("team", team)
                .finish(),
        }
    }
}

// #############
// #  TRAITS   #
// #############

/// Compile time parameterization for sessions.
///
/// This trait bundles the identity types a league deployment uses. Implement
/// it on a marker struct to configure your session types.
///
/// # Example
///
/// ```
/// use scorebook::Config;
///
/// // Marker struct for Config
/// struct LeagueConfig;
///
/// impl Config for LeagueConfig {
///     type PlayerId = String; // jersey names straight from the roster
///     type TeamId = String;
///     type UserId = String;
/// }
/// ```
///
/// # Common Patterns
///
/// - **Hosted backends**: document-id strings for all three types
/// - **Local testing**: small integers or `&'static str`-backed newtypes
/// - Identities only need equality and serialization; display formatting is
///   the caller's concern
#[cfg(feature = "sync-send")]
pub trait Config: 'static + Send + Sync {
    /// The runner/batter identity type. Stored in base states and play
    /// records, and serialized into the per-team document.
    type PlayerId: Clone + PartialEq + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync;

    /// The team identity type. Keys the per-team tracking documents.
    type TeamId: Clone
        + PartialEq
        + Eq
        + PartialOrd
        + Ord
        + Hash
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// The user identity type for presence records.
    type UserId: Clone
        + PartialEq
        + Eq
        + PartialOrd
        + Ord
        + Hash
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;
}

/// Compile time parameterization for sessions.
#[cfg(not(feature = "sync-send"))]
pub trait Config: 'static {
    /// The runner/batter identity type. Stored in base states and play
    /// records, and serialized into the per-team document.
    type PlayerId: Clone + PartialEq + Eq + Hash + Debug + Serialize + DeserializeOwned;

    /// The team identity type. Keys the per-team tracking documents.
    type TeamId: Clone + PartialEq + Eq + PartialOrd + Ord + Hash + Debug + Serialize + DeserializeOwned;

    /// The user identity type for presence records.
    type UserId: Clone + PartialEq + Eq + PartialOrd + Ord + Hash + Debug + Serialize + DeserializeOwned;
}

// #############
// #   CLOCK   #
// #############

/// Wall-clock time as milliseconds since the Unix epoch.
///
/// Commit timestamps and write stamps are advisory metadata used for display
/// and the liveness window, never as an ordering key, so a clock reading
/// before the epoch degrades to zero instead of failing the operation.
pub(crate) fn unix_millis_now() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(_) => {
                crate::report_violation!(
                    crate::telemetry::ViolationSeverity::Warning,
                    crate::telemetry::ViolationKind::Internal,
                    "system time reads before the Unix epoch; clock may have gone backwards"
                );
                0
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        // Date.getTime() is a float of epoch milliseconds and can be negative
        // for clocks set before 1970.
        let time = js_sys::Date::new_0().get_time();
        if time >= 0.0 {
            time as u64
        } else {
            crate::report_violation!(
                crate::telemetry::ViolationSeverity::Warning,
                crate::telemetry::ViolationKind::Internal,
                "Date.getTime() returned a negative value; clock may be misconfigured"
            );
            0
        }
    }
}

// ###################
// # UNIT TESTS      #
// ###################
