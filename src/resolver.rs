//! Deterministic default placement for each play type.
//!
//! Given the play the operator tapped and the bases as they stand, the
//! resolver computes the textbook outcome: forced advances, automatic runs,
//! and automatic outs. The output is a [`PendingPlay`] for the operator to
//! correct — except the strikeout, which cannot change base state and so
//! skips the adjustment phase entirely.
//!
//! The resolver is a pure function. It never sees outs, innings, or scores;
//! those belong to [`GameState`](crate::GameState) at commit time.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{Base, BaseState, PendingPlay, PlayType};

/// The resolver's verdict on a selected play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<P> {
    /// The play must pass through operator confirmation. Adjust the carried
    /// [`PendingPlay`], then commit it.
    Pending(PendingPlay<P>),
    /// The play commits immediately with no adjustment phase (strikeout).
    Immediate(PendingPlay<P>),
}

impl<P> Resolution<P> {
    /// Returns `true` when the play skips the adjustment phase.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(self, Resolution::Immediate(_))
    }

    /// Unwraps the pending play either way.
    #[must_use]
    pub fn into_pending(self) -> PendingPlay<P> {
        match self {
            Resolution::Pending(pending) | Resolution::Immediate(pending) => pending,
        }
    }
}

/// Computes the default result of `play` by `batter` against `bases`.
///
/// The caller's base state is not modified; the tentative state lives inside
/// the returned [`PendingPlay`] until commit.
pub fn resolve<P: Clone>(play: PlayType, batter: P, bases: &BaseState<P>) -> Resolution<P> {
    let bases_before = bases.clone();
    let mut work = bases.clone();
    let mut scoring: SmallVec<[P; 4]> = SmallVec::new();

    match play.advancement() {
        // Home run: every occupied base scores, lead runner first, then the batter.
        4 => {
            for base in [Base::Third, Base::Second, Base::First] {
                if let Some(runner) = work.take_runner(base) {
                    scoring.push(runner);
                }
            }
            scoring.push(batter.clone());
        }
        // Triple: all runners score, batter holds at third.
        3 => {
            for base in [Base::Third, Base::Second, Base::First] {
                if let Some(runner) = work.take_runner(base) {
                    scoring.push(runner);
                }
            }
            work.set_runner(Base::Third, batter.clone());
        }
        // Double: second and third score, first takes third, batter takes second.
        2 => {
            for base in [Base::Third, Base::Second] {
                if let Some(runner) = work.take_runner(base) {
                    scoring.push(runner);
                }
            }
            if let Some(runner) = work.take_runner(Base::First) {
                work.set_runner(Base::Third, runner);
            }
            work.set_runner(Base::Second, batter.clone());
        }
        1 if play == PlayType::Walk => {
            // Forced advances only, cascading from the batter: a runner moves
            // when every base behind them back to first is occupied.
            if work.is_loaded() {
                if let Some(runner) = work.take_runner(Base::Third) {
                    scoring.push(runner);
                }
            }
            if work.is_occupied(Base::First) && work.is_occupied(Base::Second) {
                if let Some(runner) = work.take_runner(Base::Second) {
                    work.set_runner(Base::Third, runner);
                }
            }
            if let Some(runner) = work.take_runner(Base::First) {
                work.set_runner(Base::Second, runner);
            }
            work.set_runner(Base::First, batter.clone());
        }
        // Single: every runner advances exactly one base, lead runner first.
        1 => {
            if let Some(runner) = work.take_runner(Base::Third) {
                scoring.push(runner);
            }
            if let Some(runner) = work.take_runner(Base::Second) {
                work.set_runner(Base::Third, runner);
            }
            if let Some(runner) = work.take_runner(Base::First) {
                work.set_runner(Base::Second, runner);
            }
            work.set_runner(Base::First, batter.clone());
        }
        _ => {
            if play.batter_takes_first() {
                // Fielder's choice / error: the batter takes first and nothing
                // else moves automatically. If first was somehow still occupied
                // the occupant is overwritten (last write wins), same as manual
                // placement.
                if work.set_runner(Base::First, batter.clone()).is_some() {
                    warn!(%play, "batter placed on occupied first base; occupant discarded");
                }
            }
            // Plain outs and the double play leave every runner in place; the
            // out count is charged from the play type at commit.
        }
    }

    debug!(
        %play,
        runs = scoring.len(),
        outs = play.outs_charged(),
        "resolved default placement"
    );

    let pending = PendingPlay::new(play, batter, bases_before, work, scoring);
    if play.commits_immediately() {
        Resolution::Immediate(pending)
    } else {
        Resolution::Pending(pending)
    }
}

// ###################
// # UNIT TESTS      #
// ###################

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn with_runners(runners: &[(Base, &'static str)]) -> BaseState<&'static str> {
        let mut bases = BaseState::empty();
        for &(base, runner) in runners {
            bases.set_runner(base, runner);
        }
        bases
    }

    fn resolve_pending(
        play: PlayType,
        bases: &BaseState<&'static str>,
    ) -> PendingPlay<&'static str> {
        resolve(play, "batter", bases).into_pending()
    }

    // ==========================================
    // Home Run Tests
    // ==========================================

    #[test]
    fn home_run_clears_loaded_bases() {
        let bases = with_runners(&[
            (Base::First, "ana"),
            (Base::Second, "ben"),
            (Base::Third, "cho"),
        ]);
        let pending = resolve_pending(PlayType::HomeRun, &bases);
        assert_eq!(pending.runs(), 4);
        assert_eq!(pending.scoring_runners(), &["cho", "ben", "ana", "batter"]);
        assert!(pending.bases().is_empty());
    }

    #[test]
    fn solo_home_run_scores_exactly_one() {
        let pending = resolve_pending(PlayType::HomeRun, &BaseState::empty());
        assert_eq!(pending.runs(), 1);
        assert_eq!(pending.scoring_runners(), &["batter"]);
    }

    // ==========================================
    // Triple Tests
    // ==========================================

    #[test]
    fn triple_scores_all_runners_batter_on_third() {
        let bases = with_runners(&[(Base::First, "ana"), (Base::Second, "ben")]);
        let pending = resolve_pending(PlayType::Triple, &bases);
        assert_eq!(pending.runs(), 2);
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"batter"));
        assert_eq!(pending.bases().occupied_count(), 1);
    }

    // ==========================================
    // Double Tests
    // ==========================================

    #[test]
    fn double_scores_second_and_third_first_takes_third() {
        let bases = with_runners(&[(Base::First, "ana"), (Base::Third, "cho")]);
        let pending = resolve_pending(PlayType::Double, &bases);
        assert_eq!(pending.scoring_runners(), &["cho"]);
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"ana"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"batter"));
        assert!(!pending.bases().is_occupied(Base::First));
    }

    // ==========================================
    // Walk Tests (forced advances only)
    // ==========================================

    #[test]
    fn walk_with_empty_bases_puts_batter_on_first() {
        let pending = resolve_pending(PlayType::Walk, &BaseState::empty());
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().occupied_count(), 1);
        assert_eq!(pending.runs(), 0);
    }

    #[test]
    fn walk_forces_runner_on_first_to_second() {
        let bases = with_runners(&[(Base::First, "ana")]);
        let pending = resolve_pending(PlayType::Walk, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ana"));
        assert!(!pending.bases().is_occupied(Base::Third));
        assert_eq!(pending.runs(), 0);
    }

    #[test]
    fn walk_never_moves_unforced_runner_on_second() {
        let bases = with_runners(&[(Base::Second, "ben")]);
        let pending = resolve_pending(PlayType::Walk, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ben"));
        assert!(!pending.bases().is_occupied(Base::Third));
    }

    #[test]
    fn walk_never_moves_unforced_runner_on_third() {
        let bases = with_runners(&[(Base::First, "ana"), (Base::Third, "cho")]);
        let pending = resolve_pending(PlayType::Walk, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ana"));
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"cho"));
        assert_eq!(pending.runs(), 0);
    }

    #[test]
    fn walk_with_bases_loaded_forces_in_a_run() {
        let bases = with_runners(&[
            (Base::First, "ana"),
            (Base::Second, "ben"),
            (Base::Third, "cho"),
        ]);
        let pending = resolve_pending(PlayType::Walk, &bases);
        assert_eq!(pending.scoring_runners(), &["cho"]);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ana"));
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"ben"));
    }

    // ==========================================
    // Single Tests (unconditional one-base advance)
    // ==========================================

    #[test]
    fn single_with_bases_loaded_moves_everyone_one_base() {
        let bases = with_runners(&[
            (Base::First, "ana"),
            (Base::Second, "ben"),
            (Base::Third, "cho"),
        ]);
        let pending = resolve_pending(PlayType::Single, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ana"));
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"ben"));
        assert_eq!(pending.scoring_runners(), &["cho"]);
    }

    #[test]
    fn single_advances_unforced_runner_unlike_walk() {
        let bases = with_runners(&[(Base::Second, "ben")]);
        let pending = resolve_pending(PlayType::Single, &bases);
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"ben"));
        assert!(!pending.bases().is_occupied(Base::Second));
    }

    // ==========================================
    // Out / No-Movement Tests
    // ==========================================

    #[test]
    fn plain_outs_leave_runners_in_place() {
        let bases = with_runners(&[(Base::First, "ana"), (Base::Third, "cho")]);
        for play in [PlayType::Groundout, PlayType::Flyout, PlayType::SacrificeFly] {
            let pending = resolve_pending(play, &bases);
            assert_eq!(pending.bases(), &bases, "{play}");
            assert_eq!(pending.runs(), 0, "{play}");
            assert_eq!(pending.outs_delta(), 1, "{play}");
        }
    }

    #[test]
    fn sacrifice_fly_never_scores_automatically() {
        // Even with a runner standing on third, the run is the operator's call.
        let bases = with_runners(&[(Base::Third, "cho")]);
        let pending = resolve_pending(PlayType::SacrificeFly, &bases);
        assert_eq!(pending.runs(), 0);
        assert_eq!(pending.bases().runner_on(Base::Third), Some(&"cho"));
    }

    #[test]
    fn double_play_charges_two_outs_and_moves_nobody() {
        let bases = with_runners(&[(Base::First, "ana")]);
        let resolution = resolve(PlayType::DoublePlay, "batter", &bases);
        assert!(!resolution.is_immediate());
        let pending = resolution.into_pending();
        assert_eq!(pending.outs_delta(), 2);
        assert_eq!(pending.bases(), &bases);
    }

    // ==========================================
    // Fielder's Choice / Error Tests
    // ==========================================

    #[test]
    fn fielders_choice_puts_batter_on_first_only() {
        let bases = with_runners(&[(Base::Second, "ben")]);
        let pending = resolve_pending(PlayType::FieldersChoice, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert_eq!(pending.bases().runner_on(Base::Second), Some(&"ben"));
        assert_eq!(pending.outs_delta(), 0);
    }

    #[test]
    fn fielders_choice_overwrites_occupied_first() {
        // Last write wins, matching manual placement: the forced runner is
        // expected to be adjusted away by the operator, not held here.
        let bases = with_runners(&[(Base::First, "ana")]);
        let pending = resolve_pending(PlayType::FieldersChoice, &bases);
        assert_eq!(pending.bases().runner_on(Base::First), Some(&"batter"));
        assert!(!pending.bases().contains(&"ana"));
    }

    // ==========================================
    // Strikeout Tests
    // ==========================================

    #[test]
    fn strikeout_is_immediate_and_touches_nothing() {
        let bases = with_runners(&[(Base::Second, "ben")]);
        let resolution = resolve(PlayType::Strikeout, "batter", &bases);
        assert!(resolution.is_immediate());
        let pending = resolution.into_pending();
        assert_eq!(pending.bases(), &bases);
        assert_eq!(pending.outs_delta(), 1);
        assert_eq!(pending.runs(), 0);
    }
}
