//! Two trackers, one store: the document-ownership and merge contract that
//! keeps independent scorers from trampling each other.

// Allow test-specific patterns that are appropriate for test code
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{commit_play, store_client, strikeouts, tracker, BEARS, TIGERS};
use scorebook::{
    ChaosConfig, ChaosStore, Half, Inning, MemoryStore, PlayType, ScorebookError, TrackerEvent,
};

#[test]
fn each_side_owns_its_own_document() {
    let store = MemoryStore::new();
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store.clone(), TIGERS);

    commit_play(&mut away, PlayType::Single);
    strikeouts(&mut away, 1);
    commit_play(&mut away, PlayType::Flyout);
    commit_play(&mut home, PlayType::HomeRun);

    let client = store_client(store);
    let bears = client.fetch_team_state(BEARS.to_owned()).unwrap().unwrap();
    assert_eq!(bears.team, BEARS);
    assert_eq!(bears.plays.len(), 3);
    assert!(bears.plays.iter().all(|record| record.half == Half::Top));
    assert_eq!(bears.score, 0);

    let tigers = client.fetch_team_state(TIGERS.to_owned()).unwrap().unwrap();
    assert_eq!(tigers.team, TIGERS);
    assert_eq!(tigers.plays.len(), 1);
    assert_eq!(tigers.plays[0].half, Half::Bottom);
    assert_eq!(tigers.score, 1);
}

#[test]
fn shared_display_fields_are_last_write_wins() {
    let store = MemoryStore::new();
    let client = store_client(store.clone());
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store, TIGERS);

    strikeouts(&mut away, 1);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!((metadata.half, metadata.outs), (Half::Top, 1));

    commit_play(&mut home, PlayType::Single);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!((metadata.half, metadata.outs), (Half::Bottom, 0));

    strikeouts(&mut away, 1);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!((metadata.half, metadata.outs), (Half::Top, 2));
    assert_eq!(metadata.inning, Inning::FIRST);
}

#[test]
fn score_slots_never_cross() {
    let store = MemoryStore::new();
    let client = store_client(store.clone());
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store, TIGERS);

    commit_play(&mut away, PlayType::HomeRun);
    commit_play(&mut home, PlayType::HomeRun);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_score, 1);
    assert_eq!(metadata.home_score, 1);

    // Another away run patches only the away slot.
    commit_play(&mut away, PlayType::HomeRun);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_score, 2);
    assert_eq!(metadata.home_score, 1);
}

#[test]
fn pitcher_patches_merge_without_clearing() {
    let store = MemoryStore::new();
    let client = store_client(store.clone());
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store, TIGERS);

    away.set_pitcher(BEARS.to_owned(), "ruth".to_owned()).unwrap();
    home.set_pitcher(TIGERS.to_owned(), "cy".to_owned()).unwrap();
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_pitcher, Some("ruth".to_owned()));
    assert_eq!(metadata.home_pitcher, Some("cy".to_owned()));

    // A scoring patch carries no pitcher fields and must not erase them.
    commit_play(&mut away, PlayType::Strikeout);
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_pitcher, Some("ruth".to_owned()));
    assert_eq!(metadata.home_pitcher, Some("cy".to_owned()));
}

#[test]
fn opponent_commits_surface_as_events() {
    let store = MemoryStore::new();
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store, TIGERS);
    let _ = away.events(); // discard the startup snapshots

    commit_play(&mut home, PlayType::Single);

    let events: Vec<_> = away.events().collect();
    assert!(events.iter().any(|event| matches!(
        event,
        TrackerEvent::TeamStateUpdated { state } if state.team == TIGERS && state.plays.len() == 1
    )));
    assert!(events
        .iter()
        .any(|event| matches!(event, TrackerEvent::MetadataUpdated { .. })));
}

#[test]
fn a_reset_propagates_to_the_other_tracker() {
    let store = MemoryStore::new();
    let mut away = tracker(store.clone(), BEARS);
    let mut home = tracker(store.clone(), TIGERS);

    commit_play(&mut away, PlayType::Single);
    commit_play(&mut away, PlayType::Double);
    commit_play(&mut home, PlayType::HomeRun);
    let _ = away.events(); // settle before the reset

    home.reset_game().unwrap();
    assert!(home.game_state().records().is_empty());

    let client = store_client(store);
    assert_eq!(client.fetch_team_state(BEARS.to_owned()), Ok(None));
    assert_eq!(client.fetch_team_state(TIGERS.to_owned()), Ok(None));
    let metadata = client.fetch_metadata().unwrap().unwrap();
    assert_eq!(metadata.away_score, 0);
    assert_eq!(metadata.home_score, 0);

    // The away tracker hears about the reset but keeps its local record for
    // the operator to act on.
    let events: Vec<_> = away.events().collect();
    assert!(events.iter().any(|event| matches!(
        event,
        TrackerEvent::TeamStateLapsed { team } if *team == TIGERS
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        TrackerEvent::MetadataUpdated { metadata }
            if metadata.inning == Inning::FIRST && metadata.outs == 0
    )));
    assert_eq!(away.game_state().records().len(), 2);
}

#[test]
fn an_outage_never_loses_local_plays() {
    let chaos = ChaosStore::new(
        MemoryStore::new(),
        ChaosConfig {
            write_failure_rate: 1.0,
            ..ChaosConfig::passthrough()
        },
    );
    let mut away = tracker(chaos.clone(), BEARS);

    // Every commit keeps scoring locally even though each publish fails.
    for expected in 1..=3 {
        let result = away.select_play(PlayType::Strikeout);
        assert!(matches!(result, Err(ScorebookError::StoreError { .. })));
        assert_eq!(away.game_state().records().len(), expected);
    }
    assert_eq!(away.game_state().outs(), 3);

    // Once the store heals, one publish catches it up.
    chaos.set_config(ChaosConfig::passthrough());
    away.publish().unwrap();

    let client = store_client(chaos.inner().clone());
    let doc = client.fetch_team_state(BEARS.to_owned()).unwrap().unwrap();
    assert_eq!(doc.plays.len(), 3);
    assert_eq!(doc.outs, 3);
}

#[test]
fn the_live_window_follows_the_last_writer() {
    let store = MemoryStore::new();
    store.pin_clock(1_000);
    let mut away = tracker(store.clone(), BEARS);

    commit_play(&mut away, PlayType::Strikeout);
    assert_eq!(away.is_live(), Ok(false));

    let now_ms = u64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis(),
    )
    .unwrap();
    store.pin_clock(now_ms);
    commit_play(&mut away, PlayType::Strikeout);
    assert_eq!(away.is_live(), Ok(true));
}
