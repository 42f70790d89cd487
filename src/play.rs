//! The play-type catalog and committed play records.
//!
//! [`PlayType`] is a closed catalog: every button on a scorekeeper's pad maps
//! to exactly one variant, and the classification methods
//! ([`advancement`](PlayType::advancement), [`outs_charged`](PlayType::outs_charged),
//! [`is_hit`](PlayType::is_hit)) drive the resolver. [`PlayRecord`] is the
//! committed, append-only form of a play — the engine never mutates one after
//! commit, and undo removes only the most recent record.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{BaseState, Half, Inning};

/// Every play type the tracker can record.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    /// Four-base hit: everyone aboard scores, then the batter.
    HomeRun,
    /// Three-base hit: all runners score, batter holds at third.
    Triple,
    /// Two-base hit.
    Double,
    /// One-base hit: every runner advances exactly one base.
    Single,
    /// Base on balls: forced advances only.
    Walk,
    /// Batter out on a ground ball; runners hold.
    Groundout,
    /// Batter out on a fly ball; runners hold.
    Flyout,
    /// Fly out deep enough to score a runner — but the run is never credited
    /// automatically; the operator advances the runner by hand.
    SacrificeFly,
    /// Batter out on strikes. Commits immediately with no adjustment phase.
    Strikeout,
    /// Two outs on one ball; base traffic is resolved by hand.
    DoublePlay,
    /// Batter reaches first on a fielder's choice; the out (if any) is
    /// recorded manually against the runner who was forced.
    FieldersChoice,
    /// Batter reaches first on a fielding error.
    Error,
}

impl PlayType {
    /// Every play type, in pad order.
    pub const ALL: [PlayType; 12] = [
        PlayType::HomeRun,
        PlayType::Triple,
        PlayType::Double,
        PlayType::Single,
        PlayType::Walk,
        PlayType::Groundout,
        PlayType::Flyout,
        PlayType::SacrificeFly,
        PlayType::Strikeout,
        PlayType::DoublePlay,
        PlayType::FieldersChoice,
        PlayType::Error,
    ];

    /// How many bases the batter is credited with (0–4).
    ///
    /// Zero-advancement plays either charge outs or put the batter on first
    /// without moving anyone else; see [`batter_takes_first`](Self::batter_takes_first).
    #[must_use]
    pub const fn advancement(self) -> u8 {
        match self {
            PlayType::HomeRun => 4,
            PlayType::Triple => 3,
            PlayType::Double => 2,
            PlayType::Single | PlayType::Walk => 1,
            PlayType::Groundout
            | PlayType::Flyout
            | PlayType::SacrificeFly
            | PlayType::Strikeout
            | PlayType::DoublePlay
            | PlayType::FieldersChoice
            | PlayType::Error => 0,
        }
    }

    /// Outs charged automatically by this play.
    #[must_use]
    pub const fn outs_charged(self) -> u8 {
        match self {
            PlayType::Groundout
            | PlayType::Flyout
            | PlayType::SacrificeFly
            | PlayType::Strikeout => 1,
            PlayType::DoublePlay => 2,
            PlayType::HomeRun
            | PlayType::Triple
            | PlayType::Double
            | PlayType::Single
            | PlayType::Walk
            | PlayType::FieldersChoice
            | PlayType::Error => 0,
        }
    }

    /// Returns `true` for base hits (counts toward batting statistics).
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(
            self,
            PlayType::HomeRun | PlayType::Triple | PlayType::Double | PlayType::Single
        )
    }

    /// Returns `true` when the play charges at least one out.
    #[must_use]
    pub const fn is_out(self) -> bool {
        self.outs_charged() > 0
    }

    /// Returns `true` when the batter reaches first without a forced advance
    /// chain (fielder's choice, error).
    #[must_use]
    pub const fn batter_takes_first(self) -> bool {
        matches!(self, PlayType::FieldersChoice | PlayType::Error)
    }

    /// Returns `true` for the strikeout: no base state can change, so the
    /// play commits with no pending-adjustment phase.
    #[must_use]
    pub const fn commits_immediately(self) -> bool {
        matches!(self, PlayType::Strikeout)
    }

    /// The scorebook code for this play.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            PlayType::HomeRun => "HR",
            PlayType::Triple => "3B",
            PlayType::Double => "2B",
            PlayType::Single => "1B",
            PlayType::Walk => "BB",
            PlayType::Groundout => "GO",
            PlayType::Flyout => "FO",
            PlayType::SacrificeFly => "SF",
            PlayType::Strikeout => "K",
            PlayType::DoublePlay => "DP",
            PlayType::FieldersChoice => "FC",
            PlayType::Error => "E",
        }
    }
}

impl std::fmt::Display for PlayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One committed play, immutable once appended to the game history.
///
/// A record carries everything needed to reverse itself: the full base state
/// and out count from before the play, and the inning/half it was recorded
/// in (which is what lets undo walk back across a confirmed half-inning
/// transition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord<P> {
    /// Inning the play happened in.
    pub inning: Inning,
    /// Half being played when the play happened.
    pub half: Half,
    /// The batter.
    pub batter: P,
    /// What the batter did.
    pub play: PlayType,
    /// Out count before the play.
    pub outs_before: u8,
    /// Out count after the play (may transiently exceed three).
    pub outs_after: u8,
    /// Full base snapshot before the play.
    pub bases_before: BaseState<P>,
    /// Full base snapshot after the play.
    pub bases_after: BaseState<P>,
    /// Everyone who scored on the play, batter included, in the order they
    /// crossed home.
    pub scoring_runners: SmallVec<[P; 4]>,
    /// Commit time in milliseconds since the Unix epoch, from the local clock.
    pub committed_at_ms: u64,
}

impl<P> PlayRecord<P> {
    /// Runs scored by this play.
    #[must_use]
    pub fn runs(&self) -> u8 {
        self.scoring_runners.len() as u8
    }

    /// Returns `true` when this record charged the out that retired the side.
    #[must_use]
    pub fn retired_side(&self) -> bool {
        self.outs_after >= crate::OUTS_PER_HALF && self.outs_before < crate::OUTS_PER_HALF
    }
}

// ###################
// # UNIT TESTS      #
// ###################
