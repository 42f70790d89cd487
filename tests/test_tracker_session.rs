//! Whole-game scenarios driven through the tracker session's public API.
//!
//! Unit tests cover each layer in isolation; these scripts play realistic
//! stretches of softball (forced walks, sacrifice flies, double plays turned
//! by hand, side changes, undo across a confirmed boundary) and assert the
//! committed history, the live state, and the published documents all agree.

// Allow test-specific patterns that are appropriate for test code
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    commit_play, cross_to_next_batting_half, setup_logging, store_client, strikeouts, tracker,
    tracker_builder, BEARS, TIGERS,
};
use scorebook::{
    Base, GamePhase, Half, Inning, MemoryStore, MoveEffect, PlayType, RunnerMoveCommand,
    ScorebookError, SelectOutcome,
};
use serial_test::serial;

#[test]
fn a_bases_loaded_single_scores_the_runner_from_third() {
    let mut session = tracker(MemoryStore::new(), BEARS);
    for _ in 0..3 {
        commit_play(&mut session, PlayType::Single);
    }
    assert!(session.game_state().bases().is_loaded());
    assert_eq!(session.game_state().score(), 0);

    // dia singles; ana trots home from third, everyone else moves up one.
    let outcome = session.select_play(PlayType::Single).unwrap();
    assert_eq!(outcome, SelectOutcome::AwaitingConfirmation);
    assert_eq!(session.pending_play().unwrap().runs(), 1);

    let record = session.confirm().unwrap().unwrap();
    assert_eq!(record.scoring_runners.as_slice(), ["ana".to_owned()]);
    assert_eq!(session.game_state().score(), 1);
    assert!(session.game_state().bases().is_loaded());
    // The lineup wrapped back around to the leadoff batter.
    assert_eq!(session.game_state().current_batter().unwrap().id, "ana");
}

#[test]
fn a_strikeout_commits_without_an_adjustment_phase() {
    let store = MemoryStore::new();
    let mut session = tracker(store.clone(), BEARS);

    let outcome = session.select_play(PlayType::Strikeout).unwrap();
    assert_eq!(outcome, SelectOutcome::Committed);
    assert!(session.pending_play().is_none());
    assert_eq!(session.game_state().outs(), 1);

    // The commit published straight to the store.
    let doc = store_client(store)
        .fetch_team_state(BEARS.to_owned())
        .unwrap()
        .unwrap();
    assert_eq!(doc.plays.len(), 1);
    assert_eq!(doc.plays[0].play, PlayType::Strikeout);
}

#[test]
fn a_walk_only_forces_the_occupied_chain() {
    let mut session = tracker(MemoryStore::new(), BEARS);

    // ana singles; ben singles and ana takes third on the throw.
    commit_play(&mut session, PlayType::Single);
    session.select_play(PlayType::Single).unwrap();
    let effect = session
        .adjust(RunnerMoveCommand::Advance(Base::Second))
        .unwrap();
    assert_eq!(effect, MoveEffect::Moved);
    session.confirm().unwrap();

    let state = session.game_state();
    assert_eq!(
        state.bases().runner_on(Base::First).map(String::as_str),
        Some("ben")
    );
    assert_eq!(
        state.bases().runner_on(Base::Third).map(String::as_str),
        Some("ana")
    );
    assert!(!state.bases().is_occupied(Base::Second));

    // cho walks: ben is forced up to second, ana holds at third unforced.
    let record = commit_play(&mut session, PlayType::Walk);
    assert_eq!(record.runs(), 0);
    let state = session.game_state();
    assert!(state.bases().is_loaded());
    assert_eq!(
        state.bases().runner_on(Base::Second).map(String::as_str),
        Some("ben")
    );
    assert_eq!(
        state.bases().runner_on(Base::Third).map(String::as_str),
        Some("ana")
    );
    assert_eq!(state.score(), 0);
}

#[test]
fn a_sacrifice_fly_run_is_the_operators_call() {
    let mut session = tracker(MemoryStore::new(), BEARS);
    commit_play(&mut session, PlayType::Triple);

    session.select_play(PlayType::SacrificeFly).unwrap();
    // Nothing scores until the operator waves the runner in.
    assert_eq!(session.pending_play().unwrap().runs(), 0);
    let effect = session
        .adjust(RunnerMoveCommand::Advance(Base::Third))
        .unwrap();
    assert_eq!(effect, MoveEffect::Scored);

    let record = session.confirm().unwrap().unwrap();
    assert_eq!(record.runs(), 1);
    assert_eq!(record.outs_after, 1);
    assert_eq!(session.game_state().score(), 1);
    assert!(session.game_state().bases().is_empty());
}

#[test]
fn a_ground_ball_double_play_is_scored_by_hand() {
    let mut session = tracker(MemoryStore::new(), BEARS);
    commit_play(&mut session, PlayType::Single);

    // 6-4-3: ben out at first automatically, ana erased at second by hand.
    session.select_play(PlayType::Groundout).unwrap();
    let effect = session.adjust(RunnerMoveCommand::Remove(Base::First)).unwrap();
    assert_eq!(effect, MoveEffect::Removed);

    let record = session.confirm().unwrap().unwrap();
    assert_eq!(record.outs_before, 0);
    assert_eq!(record.outs_after, 2);
    assert!(session.game_state().bases().is_empty());
}

#[test]
fn a_fielders_choice_out_is_charged_against_the_forced_runner() {
    let mut session = tracker(MemoryStore::new(), BEARS);
    commit_play(&mut session, PlayType::Double);

    // ben reaches on the choice while ana is cut down going to third.
    session.select_play(PlayType::FieldersChoice).unwrap();
    assert_eq!(session.pending_play().unwrap().outs_delta(), 0);
    session.adjust(RunnerMoveCommand::Remove(Base::Second)).unwrap();

    let record = session.confirm().unwrap().unwrap();
    assert_eq!(record.outs_after, 1);
    let bases = session.game_state().bases();
    assert_eq!(bases.runner_on(Base::First).map(String::as_str), Some("ben"));
    assert_eq!(bases.occupied_count(), 1);
}

#[test]
fn three_outs_freeze_the_side_until_the_operator_confirms() {
    let mut session = tracker(MemoryStore::new(), BEARS);
    strikeouts(&mut session, 3);
    assert_eq!(session.game_state().phase(), GamePhase::SideRetired);
    assert_eq!(
        session.select_play(PlayType::Single),
        Err(ScorebookError::SideRetired { outs: 3 })
    );

    // First confirmation opens the opponent's half.
    session.retire_side().unwrap();
    assert!(!session.game_state().is_batting());
    assert_eq!(session.game_state().outs(), 0);
    assert_eq!(
        session.select_play(PlayType::Single),
        Err(ScorebookError::NotBatting)
    );

    // Second confirmation opens the next inning, lineup intact.
    session.retire_side().unwrap();
    assert_eq!(session.game_state().inning(), Inning::new(2));
    assert!(session.game_state().is_batting());
    assert_eq!(session.game_state().current_batter().unwrap().id, "dia");
}

#[test]
fn undo_rewinds_one_play_even_across_a_confirmed_boundary() {
    let store = MemoryStore::new();
    let mut session = tracker(store.clone(), BEARS);
    commit_play(&mut session, PlayType::Single);
    strikeouts(&mut session, 3);
    cross_to_next_batting_half(&mut session);
    assert_eq!(session.game_state().inning(), Inning::new(2));

    // Undo pops dia's strikeout and rewinds the confirmed transitions.
    let record = session.undo().unwrap().unwrap();
    assert_eq!(record.play, PlayType::Strikeout);
    let state = session.game_state();
    assert_eq!(state.inning(), Inning::FIRST);
    assert!(state.is_batting());
    assert_eq!(state.outs(), 2);
    assert_eq!(
        state.bases().runner_on(Base::First).map(String::as_str),
        Some("ana")
    );
    assert_eq!(state.current_batter().unwrap().id, "dia");

    // The store mirrors the rewind.
    let doc = store_client(store)
        .fetch_team_state(BEARS.to_owned())
        .unwrap()
        .unwrap();
    assert_eq!(doc.plays.len(), 3);
    assert_eq!(doc.inning, Inning::FIRST);
    assert_eq!(doc.outs, 2);
}

#[test]
fn a_cancelled_mistap_leaves_no_trace() {
    let store = MemoryStore::new();
    let mut session = tracker(store.clone(), BEARS);

    session.select_play(PlayType::Double).unwrap();
    assert!(session.cancel_pending());
    assert!(session.pending_play().is_none());
    assert!(session.game_state().records().is_empty());
    assert!(!session.cancel_pending());

    // Nothing was ever published.
    let doc = store_client(store).fetch_team_state(BEARS.to_owned()).unwrap();
    assert!(doc.is_none());
}

#[test]
fn resuming_mid_game_scores_from_the_given_point() {
    let mut session = tracker_builder(BEARS)
        .with_resume_point(Inning::new(5), Half::Top)
        .unwrap()
        .start_tracker_session(MemoryStore::new())
        .unwrap();
    assert_eq!(session.game_state().inning(), Inning::new(5));
    assert!(session.game_state().is_batting());

    let record = commit_play(&mut session, PlayType::Single);
    assert_eq!(record.inning, Inning::new(5));
    assert_eq!(record.half, Half::Top);
}

#[test]
fn the_home_tracker_scores_bottom_halves() {
    let mut session = tracker(MemoryStore::new(), TIGERS);
    assert_eq!(session.game_state().batting_half(), Half::Bottom);
    assert!(session.game_state().is_batting());

    let record = commit_play(&mut session, PlayType::Single);
    assert_eq!(record.half, Half::Bottom);
    assert_eq!(record.inning, Inning::FIRST);
}

#[test]
#[serial]
fn a_complete_game_reaches_a_final() {
    setup_logging();
    let store = MemoryStore::new();
    let mut session = tracker(store.clone(), BEARS);

    // Top 1: ana leads off with a home run, then three straight strikeouts.
    let record = commit_play(&mut session, PlayType::HomeRun);
    assert_eq!(record.runs(), 1);
    strikeouts(&mut session, 3);
    cross_to_next_batting_half(&mut session);

    // Top 2: walk, double with the runner scoring on the relay, three outs.
    commit_play(&mut session, PlayType::Walk);
    session.select_play(PlayType::Double).unwrap();
    session.adjust(RunnerMoveCommand::Advance(Base::Third)).unwrap();
    session.confirm().unwrap();
    assert_eq!(session.game_state().score(), 2);
    for play in [PlayType::Flyout, PlayType::Groundout, PlayType::Flyout] {
        commit_play(&mut session, play);
    }
    assert_eq!(session.game_state().phase(), GamePhase::SideRetired);
    cross_to_next_batting_half(&mut session);
    assert_eq!(session.game_state().inning(), Inning::new(3));

    // Call it after two.
    session.end_game().unwrap();
    assert_eq!(session.game_state().phase(), GamePhase::Ended);
    assert_eq!(
        session.select_play(PlayType::Single),
        Err(ScorebookError::GameEnded)
    );
    assert_eq!(session.undo(), Err(ScorebookError::GameEnded));

    let client = store_client(store);
    let doc = client.fetch_team_state(BEARS.to_owned()).unwrap().unwrap();
    assert!(!doc.game_active);
    assert_eq!(doc.score, 2);
    assert_eq!(doc.plays.len(), 9);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_score, 2);
    assert_eq!(metadata.home_score, 0);
}
