//! The transient pending play and the runner adjustment engine.
//!
//! The resolver's default placement is rarely the whole story: trail runners
//! take extra bases, lead runners get thrown out stretching, and a sacrifice
//! fly only scores its run when the operator says so. All of those
//! corrections happen here, against a [`PendingPlay`] that exists only
//! between play selection and confirmation. Nothing in this module touches
//! committed state: cancel the pending play and the game is exactly as it
//! was.

use smallvec::SmallVec;
use tracing::trace;

use crate::{AdvanceTarget, Base, BaseState, Half, Inning, PlayRecord, PlayType};

/// An operator correction to the resolver's default placement.
///
/// Commands address runners by the base they currently occupy, not by
/// identity — the identity travels with the base slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RunnerMoveCommand {
    /// Move the runner on this base one base forward; from third, they score.
    Advance(Base),
    /// Move the runner on this base one base backward; first has no retreat
    /// target, so retreating from first is a no-op.
    Retreat(Base),
    /// Move the runner on this base directly to an arbitrary target
    /// (drag-and-drop). Placement is last-write-wins: an occupant of the
    /// target base is silently discarded, and the effect reports them.
    PlaceAt(Base, AdvanceTarget),
    /// Remove the runner on this base and charge a pending out.
    Remove(Base),
}

/// What applying a [`RunnerMoveCommand`] actually did.
///
/// `Ignored` covers every invalid-operation case (empty origin base,
/// retreating from first): per the error-handling contract these are no-ops,
/// never errors. `Displaced` is the one effect a caller may want to surface —
/// it means a runner was overwritten and dropped from the play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveEffect<P> {
    /// Nothing changed.
    Ignored,
    /// The runner moved to an empty base.
    Moved,
    /// The runner crossed home; the pending run count grew.
    Scored,
    /// The runner moved onto an occupied base; the previous occupant was
    /// discarded (last write wins).
    Displaced(P),
    /// The runner was removed and a pending out charged.
    Removed,
}

/// A resolved play awaiting operator adjustment and confirmation.
///
/// Produced by [`resolve`](crate::resolve), mutated only through
/// [`apply`](PendingPlay::apply), and consumed on commit. Dropping one is a
/// cancel: no committed state ever observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlay<P> {
    play: PlayType,
    batter: P,
    bases_before: BaseState<P>,
    bases: BaseState<P>,
    scoring: SmallVec<[P; 4]>,
    extra_outs: u8,
}

impl<P> PendingPlay<P> {
    /// Assembles a pending play from the resolver's output.
    pub(crate) fn new(
        play: PlayType,
        batter: P,
        bases_before: BaseState<P>,
        bases: BaseState<P>,
        scoring: SmallVec<[P; 4]>,
    ) -> Self {
        PendingPlay {
            play,
            batter,
            bases_before,
            bases,
            scoring,
            extra_outs: 0,
        }
    }

    /// The play being adjusted.
    #[inline]
    #[must_use]
    pub fn play(&self) -> PlayType {
        self.play
    }

    /// The batter whose play this is.
    #[inline]
    #[must_use]
    pub fn batter(&self) -> &P {
        &self.batter
    }

    /// The base state as the play was selected, before any default placement.
    #[inline]
    #[must_use]
    pub fn bases_before(&self) -> &BaseState<P> {
        &self.bases_before
    }

    /// The tentative base state, default placement plus adjustments so far.
    #[inline]
    #[must_use]
    pub fn bases(&self) -> &BaseState<P> {
        &self.bases
    }

    /// Everyone pending to score, in the order they crossed home.
    #[must_use]
    pub fn scoring_runners(&self) -> &[P] {
        &self.scoring
    }

    /// Runs this play will add when committed.
    #[must_use]
    pub fn runs(&self) -> u8 {
        self.scoring.len() as u8
    }

    /// Outs this play will charge when committed: the play type's automatic
    /// outs plus one per removed runner.
    #[must_use]
    pub fn outs_delta(&self) -> u8 {
        self.play.outs_charged() + self.extra_outs
    }

    /// Converts this pending play into its committed record.
    pub(crate) fn into_record(
        self,
        inning: Inning,
        half: Half,
        outs_before: u8,
        committed_at_ms: u64,
    ) -> PlayRecord<P> {
        let outs_after = outs_before + self.play.outs_charged() + self.extra_outs;
        PlayRecord {
            inning,
            half,
            batter: self.batter,
            play: self.play,
            outs_before,
            outs_after,
            bases_before: self.bases_before,
            bases_after: self.bases,
            scoring_runners: self.scoring,
            committed_at_ms,
        }
    }
}

impl<P: std::fmt::Debug> PendingPlay<P> {
    /// Applies one adjustment command to the tentative state.
    ///
    /// Commands addressing an empty base (and `Retreat(First)`) are no-ops
    /// reported as [`MoveEffect::Ignored`]. Placement onto an occupied base
    /// follows last-write-wins and reports the discarded occupant as
    /// [`MoveEffect::Displaced`]; the session layer turns that into a
    /// telemetry warning but never blocks the move.
    pub fn apply(&mut self, command: RunnerMoveCommand) -> MoveEffect<P> {
        let effect = match command {
            RunnerMoveCommand::Advance(base) => self.move_runner(base, base.forward()),
            RunnerMoveCommand::Retreat(base) => match base.backward() {
                Some(target) => self.move_runner(base, AdvanceTarget::Base(target)),
                None => MoveEffect::Ignored,
            },
            RunnerMoveCommand::PlaceAt(from, target) => self.move_runner(from, target),
            RunnerMoveCommand::Remove(base) => match self.bases.take_runner(base) {
                Some(runner) => {
                    self.extra_outs += 1;
                    trace!(?runner, %base, "pending out charged");
                    MoveEffect::Removed
                }
                None => MoveEffect::Ignored,
            },
        };
        trace!(?command, ?effect, "adjustment applied");
        effect
    }

    /// Moves the runner on `from` to `target`, scoring when the target is
    /// home. The shared path for advance, retreat, and direct placement.
    fn move_runner(&mut self, from: Base, target: AdvanceTarget) -> MoveEffect<P> {
        if target == AdvanceTarget::Base(from) {
            return MoveEffect::Ignored;
        }
        let Some(runner) = self.bases.take_runner(from) else {
            return MoveEffect::Ignored;
        };
        match target {
            AdvanceTarget::Home => {
                self.scoring.push(runner);
                MoveEffect::Scored
            }
            AdvanceTarget::Base(to) => match self.bases.set_runner(to, runner) {
                Some(displaced) => MoveEffect::Displaced(displaced),
                None => MoveEffect::Moved,
            },
        }
    }
}

// ###################
// # UNIT TESTS      #
// ###################
