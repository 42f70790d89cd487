//! Committed game state: the append-only play log, the running score, and
//! the half-inning machine.
//!
//! A [`GameState`] is the single authority for one tracked team's offense.
//! Plays enter through [`commit`](GameState::commit), always from a resolved
//! [`PendingPlay`]; they leave only through [`undo`](GameState::undo); and
//! the half-inning advances only on explicit operator confirmation via
//! [`retire_side`](GameState::retire_side). Every mutation either appends to
//! the log or is the exact inverse of an append, which is what makes
//! single-step undo exact even across a confirmed half-inning boundary.
//!
//! A tracker records only its own team's offense, so the state machine's
//! inning cycle opens with the tracked half and treats the opposing half as
//! a single confirmation step whose outs are never counted here. For a team
//! batting the top of each inning the labels coincide with the scoreboard
//! throughout; for a home team, every half that carries recorded plays is
//! still labeled with the true bottom-half inning number.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::debug_check_invariants;
use crate::telemetry::{InvariantChecker, InvariantViolation};
use crate::{
    BaseState, BattingOrder, GamePhase, Half, Inning, LineupSlot, PendingPlay, PlayRecord,
    Player, ScorebookError, ScorebookResult, OUTS_PER_HALF,
};

/// The committed scoring state for one tracked team in one game.
///
/// Owns the batting order, the base state, the out count, the score, and the
/// full [`PlayRecord`] history. There is exactly one logical writer per
/// instance; cross-tracker coordination happens in the sync layer, never
/// here.
///
/// # Example
///
/// ```
/// use scorebook::{BattingOrder, GameState, Half, PlayType, Player, resolve};
///
/// let order = BattingOrder::new(vec![
///     Player::new("ana", "Ana", 12),
///     Player::new("ben", "Ben", 7),
/// ])?;
/// let mut game = GameState::new(order, Half::Top);
///
/// let pending = resolve(PlayType::Single, "ana", game.bases()).into_pending();
/// game.commit(pending)?;
/// assert_eq!(game.records().len(), 1);
/// # Ok::<(), scorebook::ScorebookError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState<P> {
    inning: Inning,
    half: Half,
    batting_half: Half,
    outs: u8,
    bases: BaseState<P>,
    score: u16,
    batter_slot: LineupSlot,
    order: BattingOrder<P>,
    records: Vec<PlayRecord<P>>,
    ended: bool,
}

impl<P> GameState<P> {
    /// Creates the state for a fresh game.
    ///
    /// The game opens at the tracked team's half of the first inning with
    /// nobody out, empty bases, and the leadoff batter up. `batting_half`
    /// fixes which half the tracked team bats for the whole game (home teams
    /// bat the bottom) and never changes afterwards.
    #[must_use]
    pub fn new(order: BattingOrder<P>, batting_half: Half) -> Self {
        GameState {
            inning: Inning::FIRST,
            half: batting_half,
            batting_half,
            outs: 0,
            bases: BaseState::empty(),
            score: 0,
            batter_slot: LineupSlot::LEADOFF,
            order,
            records: Vec::new(),
            ended: false,
        }
    }

    /// Repositions a fresh game at an arbitrary inning and half.
    ///
    /// Supports picking up a game that started without a tracker.
    ///
    /// # Errors
    /// Returns [`ScorebookError::InvalidRequest`] once any play has been
    /// committed, after the game has ended, or for an invalid (zero) inning.
    pub fn resume_at(&mut self, inning: Inning, half: Half) -> ScorebookResult<()> {
        if self.ended || !self.records.is_empty() {
            return Err(ScorebookError::InvalidRequest {
                info: "cannot reposition a game that already has history".to_owned(),
            });
        }
        if !inning.is_valid() {
            return Err(ScorebookError::InvalidRequest {
                info: format!("inning {inning} is not a valid inning"),
            });
        }
        self.inning = inning;
        self.half = half;
        Ok(())
    }

    /// The current inning.
    #[inline]
    #[must_use]
    pub const fn inning(&self) -> Inning {
        self.inning
    }

    /// The half currently being played.
    #[inline]
    #[must_use]
    pub const fn half(&self) -> Half {
        self.half
    }

    /// The half the tracked team bats, fixed at construction.
    #[inline]
    #[must_use]
    pub const fn batting_half(&self) -> Half {
        self.batting_half
    }

    /// Returns `true` while the tracked team is at bat.
    #[inline]
    #[must_use]
    pub fn is_batting(&self) -> bool {
        self.half == self.batting_half
    }

    /// Outs charged in the current half-inning.
    ///
    /// May exceed three transiently: a double play turned with two outs
    /// already on the board charges four before the operator confirms the
    /// side retired.
    #[inline]
    #[must_use]
    pub const fn outs(&self) -> u8 {
        self.outs
    }

    /// The committed base state.
    #[inline]
    #[must_use]
    pub const fn bases(&self) -> &BaseState<P> {
        &self.bases
    }

    /// Runs scored by the tracked team so far.
    #[inline]
    #[must_use]
    pub const fn score(&self) -> u16 {
        self.score
    }

    /// The batting-order slot currently due up.
    #[inline]
    #[must_use]
    pub const fn batter_slot(&self) -> LineupSlot {
        self.batter_slot
    }

    /// The fixed batting order.
    #[inline]
    #[must_use]
    pub const fn batting_order(&self) -> &BattingOrder<P> {
        &self.order
    }

    /// The player currently due up.
    #[must_use]
    pub fn current_batter(&self) -> Option<&Player<P>> {
        self.order.player_at(self.batter_slot)
    }

    /// Every committed play, oldest first. Survives half-inning transitions;
    /// only [`undo`](Self::undo) ever shortens it.
    #[must_use]
    pub fn records(&self) -> &[PlayRecord<P>] {
        &self.records
    }

    /// The most recently committed play, if any.
    #[must_use]
    pub fn last_record(&self) -> Option<&PlayRecord<P>> {
        self.records.last()
    }

    /// Returns `true` once the operator has ended the game.
    #[inline]
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// The coarse phase the game is in: ended, side retired, or live.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        if self.ended {
            GamePhase::Ended
        } else if self.outs >= OUTS_PER_HALF {
            GamePhase::SideRetired
        } else {
            GamePhase::Live
        }
    }

    /// Confirms the end of the current half-inning.
    ///
    /// While the tracked team bats this requires three or more outs on the
    /// board and flips to the opposing half of the same inning. While the
    /// opponent bats their outs are not tracked here, so confirmation is
    /// accepted unconditionally and advances to the tracked team's half of
    /// the next inning. Either way the outs reset, the bases clear, and the
    /// play log is untouched.
    ///
    /// # Errors
    /// - [`ScorebookError::GameEnded`] after [`end_game`](Self::end_game).
    /// - [`ScorebookError::SideNotRetired`] while the tracked team bats with
    ///   fewer than three outs.
    pub fn retire_side(&mut self) -> ScorebookResult<()> {
        if self.ended {
            return Err(ScorebookError::GameEnded);
        }
        if self.is_batting() {
            if self.outs < OUTS_PER_HALF {
                return Err(ScorebookError::SideNotRetired { outs: self.outs });
            }
            self.half = self.half.flipped();
            info!(inning = %self.inning, half = %self.half, "side retired; opponent batting");
        } else {
            self.inning = self.inning.next();
            self.half = self.batting_half;
            info!(inning = %self.inning, half = %self.half, "opponent half confirmed; tracked team batting");
        }
        self.outs = 0;
        self.bases.clear();
        Ok(())
    }

    /// Marks the game over. Terminal and idempotent: no further plays can be
    /// committed, but history stays readable and may still be undone.
    pub fn end_game(&mut self) {
        if !self.ended {
            self.ended = true;
            info!(score = self.score, "game ended");
        }
    }
}

impl<P: Clone + PartialEq + std::fmt::Debug> GameState<P> {
    /// Commits a resolved play to the log.
    ///
    /// Applies the pending play's deltas — the outs it charges, its final
    /// base placement, and the runs it scored — then appends the
    /// [`PlayRecord`] and advances the batting order. Returns a reference to
    /// the committed record.
    ///
    /// # Errors
    /// - [`ScorebookError::GameEnded`] after [`end_game`](Self::end_game).
    /// - [`ScorebookError::SideRetired`] while three or more outs await
    ///   confirmation via [`retire_side`](Self::retire_side).
    /// - [`ScorebookError::NotBatting`] while the opponent bats.
    pub fn commit(&mut self, pending: PendingPlay<P>) -> ScorebookResult<&PlayRecord<P>> {
        if self.ended {
            return Err(ScorebookError::GameEnded);
        }
        if self.outs >= OUTS_PER_HALF {
            return Err(ScorebookError::SideRetired { outs: self.outs });
        }
        if !self.is_batting() {
            return Err(ScorebookError::NotBatting);
        }

        let record =
            pending.into_record(self.inning, self.half, self.outs, crate::unix_millis_now());
        self.outs = record.outs_after;
        self.bases = record.bases_after.clone();
        self.score += u16::from(record.runs());
        self.batter_slot = self.batter_slot.next_in(self.order.len());
        debug!(
            play = %record.play,
            runs = record.runs(),
            outs = self.outs,
            score = self.score,
            "play committed"
        );
        self.records.push(record);
        debug_check_invariants!(self, "after commit");

        match self.records.last() {
            Some(record) => Ok(record),
            None => Err(ScorebookError::InternalError {
                context: "play log empty immediately after append".to_owned(),
            }),
        }
    }

    /// Undoes the most recently committed play exactly.
    ///
    /// Restores the base state, out count, score, and batter slot captured
    /// in the popped record. If the record belongs to an earlier half-inning
    /// than the current position (the operator confirmed one or more
    /// transitions since the play), the inning and half are restored from
    /// the record as well, so undo is exact even across a boundary. Returns
    /// the popped record, or `None` when the history is empty or the game
    /// has ended: an ended game's record is final.
    pub fn undo(&mut self) -> Option<PlayRecord<P>> {
        if self.ended {
            return None;
        }
        let record = self.records.pop()?;
        if record.inning != self.inning || record.half != self.half {
            // The play predates one or more confirmed transitions; rewind them.
            self.inning = record.inning;
            self.half = record.half;
        }
        self.outs = record.outs_before;
        self.bases = record.bases_before.clone();
        self.score = self.score.saturating_sub(u16::from(record.runs()));
        self.batter_slot = self.batter_slot.previous_in(self.order.len());
        debug!(
            play = %record.play,
            inning = %self.inning,
            half = %self.half,
            "play undone"
        );
        debug_check_invariants!(self, "after undo");
        Some(record)
    }
}

impl<P: PartialEq + std::fmt::Debug> InvariantChecker for GameState<P> {
    /// Checks the structural invariants of the committed state.
    ///
    /// # Invariants
    ///
    /// 1. The inning is positive.
    /// 2. The batter slot indexes into the batting order.
    /// 3. No runner identity occupies two bases.
    /// 4. The score equals the runs summed over the play log.
    /// 5. If the last committed play belongs to the current half-inning, the
    ///    out count matches its after-snapshot.
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        // Invariant 1: the inning is positive
        if !self.inning.is_valid() {
            return Err(InvariantViolation::new("GameState", "inning is not positive")
                .with_details(format!("inning={}", self.inning)));
        }

        // Invariant 2: the batter slot indexes into the order
        if !self.batter_slot.is_valid_for(self.order.len()) {
            return Err(InvariantViolation::new(
                "GameState",
                "batter slot outside the batting order",
            )
            .with_details(format!(
                "slot={}, order_len={}",
                self.batter_slot,
                self.order.len()
            )));
        }

        // Invariant 3: runner identities are unique across bases
        if let Some(runner) = self.bases.duplicate_runner() {
            return Err(InvariantViolation::new(
                "GameState",
                "a runner occupies more than one base",
            )
            .with_details(format!("runner={runner:?}")));
        }

        // Invariant 4: the score equals the runs recorded in the log
        let logged: u16 = self
            .records
            .iter()
            .map(|record| u16::from(record.runs()))
            .sum();
        if self.score != logged {
            return Err(InvariantViolation::new(
                "GameState",
                "score diverged from the play log",
            )
            .with_details(format!("score={}, logged={}", self.score, logged)));
        }

        // Invariant 5: the outs agree with the last record of the current half
        if let Some(record) = self.records.last() {
            if record.inning == self.inning
                && record.half == self.half
                && record.outs_after != self.outs
            {
                return Err(InvariantViolation::new(
                    "GameState",
                    "outs diverged from the last committed play",
                )
                .with_details(format!(
                    "outs={}, record_outs_after={}",
                    self.outs, record.outs_after
                )));
            }
        }

        Ok(())
    }
}

// ###################
// # UNIT TESTS      #
// ###################
