//! Property-based tests for the scoring core.
//!
//! These tests use proptest to drive [`GameState`] with random play scripts
//! and random runner adjustments, then verify structural properties:
//!
//! - The internal invariant checker passes after any legal script
//! - Undo exactly inverts the most recent commit, byte for byte
//! - Undo stays exact across a confirmed half-inning boundary
//! - Clean hits conserve runners (nobody appears or vanishes)
//! - Out plays never move anyone on their own

// Allow test-specific patterns that are appropriate for test code
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use proptest::prelude::*;
use scorebook::telemetry::InvariantChecker;
use scorebook::{
    resolve, AdvanceTarget, Base, BaseState, BattingOrder, GameState, Half, Player, PlayType,
    RunnerMoveCommand, OUTS_PER_HALF,
};

// ============================================================================
// Fixtures
// ============================================================================

/// One scripted at-bat: the selected play plus the operator's adjustments.
type ScriptedPlay = (PlayType, Vec<RunnerMoveCommand>);

fn fresh_game() -> GameState<String> {
    let order = BattingOrder::new(vec![
        Player::new("ana".to_owned(), "Ana", 7),
        Player::new("ben".to_owned(), "Ben", 12),
        Player::new("cho".to_owned(), "Cho", 3),
        Player::new("dia".to_owned(), "Dia", 21),
    ])
    .expect("non-empty order");
    GameState::new(order, Half::Top)
}

/// Plays one scripted at-bat the way a tracker would: resolve, apply the
/// operator's adjustments, commit. Confirms half-inning transitions whenever
/// the side is retired.
fn play_one(state: &mut GameState<String>, play: PlayType, commands: &[RunnerMoveCommand]) {
    if state.outs() >= OUTS_PER_HALF {
        state.retire_side().expect("retired side confirms");
        state.retire_side().expect("opponent half confirms");
    }
    let batter = state.current_batter().expect("batter up").id.clone();
    let mut pending = resolve(play, batter, state.bases()).into_pending();
    for &command in commands {
        let _ = pending.apply(command);
    }
    state.commit(pending).expect("live half accepts the play");
}

fn drive(state: &mut GameState<String>, script: &[ScriptedPlay]) {
    for (play, commands) in script {
        play_one(state, *play, commands);
    }
}

/// Commits strikeouts (confirming transitions as needed) until exactly two
/// outs are on the board.
fn advance_to_two_outs(state: &mut GameState<String>) {
    while state.outs() != 2 {
        play_one(state, PlayType::Strikeout, &[]);
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn play_strategy() -> impl Strategy<Value = PlayType> {
    prop::sample::select(PlayType::ALL.to_vec())
}

fn base_strategy() -> impl Strategy<Value = Base> {
    prop::sample::select(Base::ALL.to_vec())
}

fn target_strategy() -> impl Strategy<Value = AdvanceTarget> {
    prop_oneof![
        base_strategy().prop_map(AdvanceTarget::Base),
        Just(AdvanceTarget::Home),
    ]
}

fn command_strategy() -> impl Strategy<Value = RunnerMoveCommand> {
    prop_oneof![
        base_strategy().prop_map(RunnerMoveCommand::Advance),
        base_strategy().prop_map(RunnerMoveCommand::Retreat),
        (base_strategy(), target_strategy())
            .prop_map(|(base, target)| RunnerMoveCommand::PlaceAt(base, target)),
        base_strategy().prop_map(RunnerMoveCommand::Remove),
    ]
}

fn script_strategy() -> impl Strategy<Value = Vec<ScriptedPlay>> {
    prop::collection::vec(
        (play_strategy(), prop::collection::vec(command_strategy(), 0..3)),
        0..40,
    )
}

/// Base occupancy patterns with distinct runner names.
fn bases_strategy() -> impl Strategy<Value = BaseState<String>> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(first, second, third)| {
        let mut bases = BaseState::empty();
        if first {
            bases.set_runner(Base::First, "r1".to_owned());
        }
        if second {
            bases.set_runner(Base::Second, "r2".to_owned());
        }
        if third {
            bases.set_runner(Base::Third, "r3".to_owned());
        }
        bases
    })
}

// ============================================================================
// Machine Properties
// ============================================================================

proptest! {
    /// Arbitrary scripts of plays and adjustments never break the internal
    /// consistency checks (base occupancy, score accounting, out counts,
    /// lineup position).
    #[test]
    fn prop_invariants_hold_after_any_script(script in script_strategy()) {
        let mut state = fresh_game();
        drive(&mut state, &script);
        prop_assert!(state.check_invariants().is_ok());
    }

    /// Undo restores the exact pre-commit state, whatever play and whatever
    /// adjustments went into the commit.
    #[test]
    fn prop_undo_exactly_inverts_the_last_commit(
        script in script_strategy(),
        play in play_strategy(),
        commands in prop::collection::vec(command_strategy(), 0..3),
    ) {
        let mut state = fresh_game();
        drive(&mut state, &script);
        if state.outs() >= OUTS_PER_HALF {
            state.retire_side().unwrap();
            state.retire_side().unwrap();
        }

        let snapshot = state.clone();
        play_one(&mut state, play, &commands);
        prop_assert!(state.undo().is_some());
        prop_assert_eq!(state, snapshot);
    }

    /// A confirmed side-retired transition does not blunt undo: stepping back
    /// over the boundary reproduces the old half exactly.
    #[test]
    fn prop_undo_is_exact_across_a_confirmed_boundary(script in script_strategy()) {
        let mut state = fresh_game();
        drive(&mut state, &script);
        advance_to_two_outs(&mut state);

        let snapshot = state.clone();
        play_one(&mut state, PlayType::Strikeout, &[]);
        prop_assert_eq!(state.outs(), 3);
        state.retire_side().unwrap();
        prop_assert!(!state.is_batting());

        prop_assert!(state.undo().is_some());
        prop_assert_eq!(state, snapshot);
    }
}

// ============================================================================
// Resolver Properties
// ============================================================================

proptest! {
    /// On a clean hit every identity is accounted for: the batter enters,
    /// and each runner either stands on a base or scored. Nobody vanishes
    /// and nobody is duplicated.
    #[test]
    fn prop_clean_hits_conserve_runners(
        play in prop::sample::select(vec![
            PlayType::HomeRun,
            PlayType::Triple,
            PlayType::Double,
            PlayType::Single,
            PlayType::Walk,
        ]),
        bases in bases_strategy(),
    ) {
        let pending = resolve(play, "bat".to_owned(), &bases).into_pending();

        let before = bases.occupied_count() + 1;
        let after = pending.bases().occupied_count() + usize::from(pending.runs());
        prop_assert_eq!(before, after);
        prop_assert!(pending.bases().duplicate_runner().is_none());
        prop_assert!(pending
            .scoring_runners()
            .iter()
            .all(|runner| bases.contains(runner) || runner == "bat"));
    }

    /// Plain outs hold every runner in place and score nothing on their own;
    /// any movement is the operator's call afterwards.
    #[test]
    fn prop_out_plays_hold_the_runners(
        play in prop::sample::select(vec![
            PlayType::Groundout,
            PlayType::Flyout,
            PlayType::SacrificeFly,
            PlayType::Strikeout,
            PlayType::DoublePlay,
        ]),
        bases in bases_strategy(),
    ) {
        let pending = resolve(play, "bat".to_owned(), &bases).into_pending();
        prop_assert_eq!(pending.bases(), &bases);
        prop_assert_eq!(pending.runs(), 0);
        prop_assert_eq!(pending.outs_delta(), play.outs_charged());
    }
}
