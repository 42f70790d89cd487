//! Tests for the scoring machine's [`InvariantChecker`] implementation and
//! for the violation-observer wiring at the session layer.
//!
//! The checker cross-examines a [`GameState`] after the fact:
//! - No runner identity appears on two bases at once
//! - The score equals the runs logged in the play-by-play record
//! - The out count agrees with the last record of the current half
//! - The inning is valid and the batter slot is inside the order
//!
//! These tests commit real scripts and call the checker explicitly at every
//! step, then exercise the session path where violations are reported to a
//! [`CollectingObserver`] instead of panicking.

// Allow test-specific patterns that are appropriate for test code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use scorebook::telemetry::{CollectingObserver, InvariantChecker, ViolationKind};
use scorebook::{
    assert_no_violations, assert_violation, resolve, AdvanceTarget, Base, BattingOrder, Config,
    GameId, GameState, Half, MemoryStore, MoveEffect, Player, PlayType, Role, RunnerMoveCommand,
    SeasonId, SelectOutcome, SessionBuilder, TrackerSession, UserProfile, OUTS_PER_HALF,
};

// ============================================================================
// Test Configuration
// ============================================================================

struct TestConfig;

impl Config for TestConfig {
    type PlayerId = String;
    type TeamId = String;
    type UserId = String;
}

fn order() -> Vec<Player<String>> {
    vec![
        Player::new("ana".to_owned(), "Ana", 7),
        Player::new("ben".to_owned(), "Ben", 12),
        Player::new("cho".to_owned(), "Cho", 3),
    ]
}

fn fresh_game() -> GameState<String> {
    GameState::new(BattingOrder::new(order()).unwrap(), Half::Top)
}

fn session_with_observer() -> (TrackerSession<TestConfig>, Arc<CollectingObserver>) {
    let observer = Arc::new(CollectingObserver::new());
    let session = SessionBuilder::<TestConfig>::new()
        .with_season(SeasonId::new("2025-fall"))
        .with_game(GameId::new("week1"))
        .with_teams("tigers".to_owned(), "bears".to_owned())
        .unwrap()
        .with_tracked_team("bears".to_owned())
        .with_batting_order(order())
        .with_profile(UserProfile::new(
            "kim".to_owned(),
            "Kim".to_owned(),
            Role::Scorekeeper,
        ))
        .with_violation_observer(observer.clone())
        .start_tracker_session(MemoryStore::new())
        .unwrap();
    (session, observer)
}

/// Selects `play` and confirms it if it parked for adjustment.
fn commit(session: &mut TrackerSession<TestConfig>, play: PlayType) {
    if session.select_play(play).unwrap() == SelectOutcome::AwaitingConfirmation {
        session.confirm().unwrap();
    }
}

// ============================================================================
// Machine Invariants
// ============================================================================

mod machine_invariants {
    use super::*;

    /// Commit a scripted inning and a half, checking after every mutation.
    #[test]
    fn every_commit_leaves_a_consistent_machine() {
        let script = [
            (PlayType::Single, vec![]),
            (
                PlayType::Double,
                vec![RunnerMoveCommand::Advance(Base::Third)],
            ),
            (
                PlayType::SacrificeFly,
                vec![RunnerMoveCommand::Advance(Base::Second)],
            ),
            (PlayType::Strikeout, vec![]),
            // Doubled off third: charges a fourth out, transiently above
            // the three that retire the side.
            (
                PlayType::Groundout,
                vec![RunnerMoveCommand::Remove(Base::Third)],
            ),
            (PlayType::HomeRun, vec![]),
            (PlayType::Walk, vec![]),
        ];

        let mut state = fresh_game();
        for (play, commands) in script {
            if state.outs() >= OUTS_PER_HALF {
                state.retire_side().unwrap();
                state.check_invariants().unwrap();
                state.retire_side().unwrap();
                state.check_invariants().unwrap();
            }
            let batter = state.current_batter().unwrap().id.clone();
            let mut pending = resolve(play, batter, state.bases()).into_pending();
            for command in commands {
                let _ = pending.apply(command);
            }
            state.commit(pending).unwrap();
            state.check_invariants().unwrap();
        }
    }

    #[test]
    fn unwinding_to_an_empty_history_stays_consistent() {
        let mut state = fresh_game();
        for play in [PlayType::Single, PlayType::Double, PlayType::Strikeout] {
            let batter = state.current_batter().unwrap().id.clone();
            let pending = resolve(play, batter, state.bases()).into_pending();
            state.commit(pending).unwrap();
        }

        while state.undo().is_some() {
            state.check_invariants().unwrap();
        }
        assert!(state.records().is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.outs(), 0);
        assert!(state.bases().is_empty());
        assert_eq!(state.undo(), None);
    }

    #[test]
    fn a_replay_after_full_unwind_matches_a_straight_run() {
        let plays = [PlayType::Single, PlayType::Walk, PlayType::Flyout];
        let run = |state: &mut GameState<String>| {
            for play in plays {
                let batter = state.current_batter().unwrap().id.clone();
                let pending = resolve(play, batter, state.bases()).into_pending();
                state.commit(pending).unwrap();
            }
        };

        let mut replayed = fresh_game();
        run(&mut replayed);
        while replayed.undo().is_some() {}
        run(&mut replayed);
        replayed.check_invariants().unwrap();

        let mut straight = fresh_game();
        run(&mut straight);
        assert_eq!(replayed.bases(), straight.bases());
        assert_eq!(replayed.outs(), straight.outs());
        assert_eq!(replayed.score(), straight.score());
        assert_eq!(replayed.records().len(), straight.records().len());
    }
}

// ============================================================================
// Session Violation Reporting
// ============================================================================

mod session_violations {
    use super::*;

    /// A clean game, including a crossed boundary and an undo, reports
    /// nothing to the observer.
    #[test]
    fn a_clean_session_reports_no_violations() {
        let (mut session, observer) = session_with_observer();

        commit(&mut session, PlayType::Single);
        commit(&mut session, PlayType::Strikeout);
        commit(&mut session, PlayType::Strikeout);
        commit(&mut session, PlayType::Strikeout);
        session.retire_side().unwrap();
        session.retire_side().unwrap();
        commit(&mut session, PlayType::HomeRun);
        session.undo().unwrap();

        assert_no_violations!(observer);
    }

    /// Last write wins on manual placement: the move goes through, the
    /// discarded occupant is reported as a base-occupancy violation.
    #[test]
    fn displacement_is_reported_not_blocked() {
        let (mut session, observer) = session_with_observer();

        commit(&mut session, PlayType::Single);
        session.select_play(PlayType::Single).unwrap();
        let effect = session
            .adjust(RunnerMoveCommand::PlaceAt(
                Base::First,
                AdvanceTarget::Base(Base::Second),
            ))
            .unwrap();

        assert_eq!(effect, MoveEffect::Displaced("ana".to_owned()));
        assert_violation!(observer, ViolationKind::BaseOccupancy);

        session.confirm().unwrap();
        let bases = session.game_state().bases();
        assert_eq!(bases.runner_on(Base::Second), Some(&"ben".to_owned()));
        assert!(!bases.is_occupied(Base::First));
    }
}
