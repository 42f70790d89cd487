//! Shared fixture and helpers for the integration suite.
//!
//! Every integration test plays the same fictional matchup: the Tigers host
//! the Bears in week four of the 2025 fall season. Helpers build sessions
//! against any [`DocumentStore`] so the same scripts run against the plain
//! in-memory store and the fault-injecting wrapper.

use scorebook::{
    Config, DocumentStore, GameId, MemoryStore, PlayRecord, PlayType, Player, Role,
    ScoreboardSession, SeasonId, SelectOutcome, SessionBuilder, SyncClient, TrackerSession,
    UserProfile,
};

/// The season every test game belongs to.
pub const SEASON: &str = "2025-fall";

/// The game every test session joins.
pub const GAME: &str = "week4-tigers-bears";

/// The home side.
pub const TIGERS: &str = "tigers";

/// The away side.
pub const BEARS: &str = "bears";

/// The league's id types, as a host application would define them.
pub struct LeagueConfig;

impl Config for LeagueConfig {
    type PlayerId = String;
    type TeamId = String;
    type UserId = String;
}

/// Installs a subscriber that routes tracing (and `log`) output through the
/// test harness. Safe to call from every test; only the first call in a
/// process wins.
pub fn setup_logging() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    let _ = tracing_log::LogTracer::init();
}

/// A four-batter order, enough to watch the lineup wrap.
pub fn lineup() -> Vec<Player<String>> {
    vec![
        Player::new("ana".to_owned(), "Ana", 7),
        Player::new("ben".to_owned(), "Ben", 12),
        Player::new("cho".to_owned(), "Cho", 3),
        Player::new("dia".to_owned(), "Dia", 21),
    ]
}

/// A league-wide scorekeeper profile.
pub fn scorekeeper(user: &str) -> UserProfile<LeagueConfig> {
    UserProfile::new(user.to_owned(), user.to_owned(), Role::Scorekeeper)
}

/// A tracker builder fully populated for `team`, not yet started.
pub fn tracker_builder(team: &str) -> SessionBuilder<LeagueConfig> {
    SessionBuilder::new()
        .with_season(SeasonId::new(SEASON))
        .with_game(GameId::new(GAME))
        .with_teams(TIGERS.to_owned(), BEARS.to_owned())
        .unwrap()
        .with_tracked_team(team.to_owned())
        .with_batting_order(lineup())
        .with_profile(scorekeeper(&format!("scorer-{team}")))
}

/// Starts a tracker session for `team` on `store`.
pub fn tracker<S>(store: S, team: &str) -> TrackerSession<LeagueConfig>
where
    S: DocumentStore<LeagueConfig> + 'static,
{
    tracker_builder(team).start_tracker_session(store).unwrap()
}

/// Starts a tracker session for `team` operated by `user`, for presence and
/// authorization tests that need distinct scorers.
pub fn tracker_as<S>(store: S, team: &str, user: &str) -> TrackerSession<LeagueConfig>
where
    S: DocumentStore<LeagueConfig> + 'static,
{
    tracker_builder(team)
        .with_profile(scorekeeper(user))
        .start_tracker_session(store)
        .unwrap()
}

/// Starts a read-only scoreboard session on `store`.
pub fn scoreboard<S>(store: S) -> ScoreboardSession<LeagueConfig>
where
    S: DocumentStore<LeagueConfig> + 'static,
{
    SessionBuilder::new()
        .with_season(SeasonId::new(SEASON))
        .with_game(GameId::new(GAME))
        .with_teams(TIGERS.to_owned(), BEARS.to_owned())
        .unwrap()
        .start_scoreboard_session(store)
        .unwrap()
}

/// A bare client on `store` for asserting against stored documents directly.
pub fn store_client(store: MemoryStore<LeagueConfig>) -> SyncClient<LeagueConfig> {
    SyncClient::new(store, SeasonId::new(SEASON), GameId::new(GAME))
}

/// Selects `play` and confirms it if it did not commit immediately.
/// Returns the committed record.
pub fn commit_play(
    session: &mut TrackerSession<LeagueConfig>,
    play: PlayType,
) -> PlayRecord<String> {
    match session.select_play(play).unwrap() {
        SelectOutcome::Committed => session
            .game_state()
            .last_record()
            .expect("immediate play must have appended a record")
            .clone(),
        SelectOutcome::AwaitingConfirmation => session
            .confirm()
            .unwrap()
            .expect("a play was pending confirmation"),
    }
}

/// Commits `count` strikeouts in a row.
pub fn strikeouts(session: &mut TrackerSession<LeagueConfig>, count: usize) {
    for _ in 0..count {
        session.select_play(PlayType::Strikeout).unwrap();
    }
}

/// Confirms the retired side and the opponent's half, landing the session at
/// the top of its next batting half.
pub fn cross_to_next_batting_half(session: &mut TrackerSession<LeagueConfig>) {
    session.retire_side().unwrap();
    session.retire_side().unwrap();
}
