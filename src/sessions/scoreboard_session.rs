use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::sessions::event_drain::EventDrain;
use crate::sessions::tracker_session::queue_event;
use crate::sync::client::SyncClient;
use crate::sync::documents::{GameMetadata, PresenceRecord, TeamGameDoc};
use crate::{Config, ScorebookResult, TrackerEvent};

/// A [`ScoreboardSession`] is the read-only view of a game: it follows the
/// shared metadata document and both team documents, keeps the latest
/// snapshot of each cached for synchronous reads, and queues a
/// [`TrackerEvent`] for every change so a display can redraw on demand.
///
/// It never writes to the store. Spectators leave no presence record, and a
/// scoreboard can watch a game no tracker has started yet; every cache just
/// reads `None` until the first publish arrives.
///
/// # Caches and events
///
/// Subscription callbacks update the cache before queueing the event, so a
/// consumer that drains [`events`](Self::events) and then reads
/// [`metadata`](Self::metadata) or [`team_state`](Self::team_state) always
/// sees data at least as new as the event that woke it.
pub struct ScoreboardSession<T>
where
    T: Config,
{
    /// The store client the subscriptions run through.
    client: SyncClient<T>,
    /// The home side's team id.
    home: T::TeamId,
    /// The away side's team id.
    away: T::TeamId,
    /// Latest shared metadata, `None` until the first publish or after a reset.
    metadata: Arc<Mutex<Option<GameMetadata<T>>>>,
    /// Latest home team document.
    home_state: Arc<Mutex<Option<TeamGameDoc<T>>>>,
    /// Latest away team document.
    away_state: Arc<Mutex<Option<TeamGameDoc<T>>>>,
    /// Events queued by subscriptions, oldest first.
    events: Arc<Mutex<VecDeque<TrackerEvent<T>>>>,
}

impl<T: Config> std::fmt::Debug for ScoreboardSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreboardSession")
            .field("home", &self.home)
            .field("away", &self.away)
            .field("has_metadata", &self.metadata.lock().is_some())
            .field("has_home_state", &self.home_state.lock().is_some())
            .field("has_away_state", &self.away_state.lock().is_some())
            .field("queued_events", &self.events.lock().len())
            .finish_non_exhaustive()
    }
}

impl<T> ScoreboardSession<T>
where
    T: Config,
{
    /// Wires up the three subscriptions (metadata, home document, away
    /// document). The initial snapshot of each is delivered before this
    /// returns, so the caches start out reflecting the store.
    pub(crate) fn start(
        client: SyncClient<T>,
        home: T::TeamId,
        away: T::TeamId,
        event_queue_size: usize,
    ) -> ScorebookResult<Self> {
        let events: Arc<Mutex<VecDeque<TrackerEvent<T>>>> = Arc::new(Mutex::new(VecDeque::new()));
        let metadata: Arc<Mutex<Option<GameMetadata<T>>>> = Arc::new(Mutex::new(None));
        let home_state: Arc<Mutex<Option<TeamGameDoc<T>>>> = Arc::new(Mutex::new(None));
        let away_state: Arc<Mutex<Option<TeamGameDoc<T>>>> = Arc::new(Mutex::new(None));

        let cache = Arc::clone(&metadata);
        let queue = Arc::clone(&events);
        client.subscribe_metadata(Arc::new(move |update| {
            *cache.lock() = update.clone();
            let event = match update {
                Some(metadata) => TrackerEvent::MetadataUpdated { metadata },
                None => TrackerEvent::MetadataLapsed,
            };
            queue_event(&queue, event_queue_size, event);
        }))?;

        for (team, cache) in [(home.clone(), &home_state), (away.clone(), &away_state)] {
            let cache = Arc::clone(cache);
            let queue = Arc::clone(&events);
            let lapsed = team.clone();
            client.subscribe_team_state(
                team,
                Arc::new(move |update| {
                    *cache.lock() = update.clone();
                    let event = match update {
                        Some(state) => TrackerEvent::TeamStateUpdated { state },
                        None => TrackerEvent::TeamStateLapsed {
                            team: lapsed.clone(),
                        },
                    };
                    queue_event(&queue, event_queue_size, event);
                }),
            )?;
        }

        info!(home = ?home, away = ?away, "scoreboard session started");
        Ok(Self {
            client,
            home,
            away,
            metadata,
            home_state,
            away_state,
            events,
        })
    }

    /// The home side's team id.
    pub fn home_team(&self) -> &T::TeamId {
        &self.home
    }

    /// The away side's team id.
    pub fn away_team(&self) -> &T::TeamId {
        &self.away
    }

    /// The latest shared metadata, `None` until a tracker publishes some.
    pub fn metadata(&self) -> Option<GameMetadata<T>> {
        self.metadata.lock().clone()
    }

    /// The latest document for `team`, `None` while that tracker has not
    /// published (or after a game reset deleted it). Asking about a team not
    /// in this game is also `None`.
    pub fn team_state(&self, team: &T::TeamId) -> Option<TeamGameDoc<T>> {
        if *team == self.home {
            self.home_state.lock().clone()
        } else if *team == self.away {
            self.away_state.lock().clone()
        } else {
            None
        }
    }

    /// Whether the shared metadata has been touched within the liveness
    /// window. Reads through to the store rather than the cache.
    pub fn is_live(&self) -> ScorebookResult<bool> {
        self.client.is_live()
    }

    /// Everyone with a presence record on this game. Records are returned as
    /// stored; inspect [`last_seen_ms`](PresenceRecord::last_seen_ms) to
    /// judge staleness.
    pub fn scorers(&self) -> ScorebookResult<Vec<PresenceRecord<T>>> {
        self.client.presence_roster()
    }

    /// Returns all events that happened since last queried for events. If the
    /// number of stored events exceeds the configured queue size, the oldest
    /// events will be discarded.
    pub fn events(&mut self) -> EventDrain<T> {
        EventDrain::from_queue(std::mem::take(&mut *self.events.lock()))
    }

    /// Cancels every store subscription. Idempotent. The caches keep their
    /// last values but stop updating.
    pub fn shutdown(&mut self) {
        debug!("scoreboard session shutting down");
        self.client.shutdown();
    }
}

// ###################
// # UNIT TESTS      #
// ###################

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        auth::Role, GameId, Half, Inning, MemoryStore, MetadataPatch, Player, PlayType,
        ScorebookError, SeasonId, SessionBuilder, TrackerSession, UserProfile,
    };

    struct TestConfig;

    impl Config for TestConfig {
        type PlayerId = String;
        type TeamId = u32;
        type UserId = u64;
    }

    const HOME: u32 = 7;
    const AWAY: u32 = 9;

    fn order() -> Vec<Player<String>> {
        vec![
            Player::new("ana".to_owned(), "Ana", 7),
            Player::new("ben".to_owned(), "Ben", 12),
            Player::new("cho".to_owned(), "Cho", 3),
        ]
    }

    fn scoreboard(
        store: MemoryStore<TestConfig>,
    ) -> ScoreboardSession<TestConfig> {
        SessionBuilder::new()
            .with_season(SeasonId::new("2025-fall"))
            .with_game(GameId::new("week4"))
            .with_teams(HOME, AWAY)
            .unwrap()
            .start_scoreboard_session(store)
            .unwrap()
    }

    fn tracker(
        store: MemoryStore<TestConfig>,
        team: u32,
        user: u64,
    ) -> TrackerSession<TestConfig> {
        SessionBuilder::new()
            .with_season(SeasonId::new("2025-fall"))
            .with_game(GameId::new("week4"))
            .with_teams(HOME, AWAY)
            .unwrap()
            .with_tracked_team(team)
            .with_batting_order(order())
            .with_profile(UserProfile::new(user, "Kim", Role::Scorekeeper))
            .start_tracker_session(store)
            .unwrap()
    }

    #[test]
    fn fresh_game_reads_as_empty() {
        let store = MemoryStore::new();
        let mut board = scoreboard(store);
        assert!(board.metadata().is_none());
        assert!(board.team_state(&HOME).is_none());
        assert!(board.team_state(&AWAY).is_none());
        assert!(!board.is_live().unwrap());

        // One lapsed event per subscription's initial snapshot.
        let events: Vec<_> = board.events().collect();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|event| matches!(
            event,
            TrackerEvent::MetadataLapsed | TrackerEvent::TeamStateLapsed { .. }
        )));
    }

    #[test]
    fn caches_follow_tracker_publishes() {
        let store = MemoryStore::new();
        let board = scoreboard(store.clone());
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();

        let metadata = board.metadata().unwrap();
        assert_eq!(metadata.outs, 1);
        assert_eq!(metadata.inning, Inning::FIRST);
        assert_eq!(metadata.half, Half::Top);

        let away = board.team_state(&AWAY).unwrap();
        assert_eq!(away.plays.len(), 1);
        assert!(board.team_state(&HOME).is_none());
        assert!(board.is_live().unwrap());
    }

    #[test]
    fn both_team_documents_cache_independently() {
        let store = MemoryStore::new();
        let board = scoreboard(store.clone());
        let mut away_side = tracker(store.clone(), AWAY, 1);
        let mut home_side = tracker(store, HOME, 2);

        away_side.select_play(PlayType::Strikeout).unwrap();
        home_side.publish().unwrap();

        assert_eq!(board.team_state(&AWAY).unwrap().team, AWAY);
        assert_eq!(board.team_state(&HOME).unwrap().team, HOME);
        assert_eq!(board.team_state(&AWAY).unwrap().plays.len(), 1);
        assert!(board.team_state(&HOME).unwrap().plays.is_empty());
    }

    #[test]
    fn unknown_teams_read_as_none() {
        let store = MemoryStore::new();
        let board = scoreboard(store.clone());
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();
        assert!(board.team_state(&42).is_none());
    }

    #[test]
    fn events_carry_remote_updates() {
        let store = MemoryStore::new();
        let mut board = scoreboard(store.clone());
        let _ = board.events(); // discard the initial lapsed snapshots
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();

        let events: Vec<_> = board.events().collect();
        assert!(events.iter().any(|event| matches!(
            event,
            TrackerEvent::TeamStateUpdated { state } if state.team == AWAY
        )));
        assert!(events.iter().any(|event| matches!(
            event,
            TrackerEvent::MetadataUpdated { metadata } if metadata.outs == 1
        )));
    }

    #[test]
    fn cache_is_fresh_by_the_time_the_event_drains() {
        let store = MemoryStore::new();
        let mut board = scoreboard(store.clone());
        let _ = board.events();
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();

        for event in board.events() {
            if let TrackerEvent::MetadataUpdated { metadata } = event {
                let cached = board.metadata().unwrap();
                assert!(cached.last_updated_ms >= metadata.last_updated_ms);
            }
        }
    }

    #[test]
    fn a_reset_lapses_the_caches() {
        let store = MemoryStore::new();
        let mut board = scoreboard(store.clone());
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();
        assert!(board.team_state(&AWAY).is_some());
        let _ = board.events();

        tracker.reset_game().unwrap();
        assert!(board.team_state(&AWAY).is_none());
        // The reset rewound metadata to defaults rather than deleting it.
        let metadata = board.metadata().unwrap();
        assert_eq!(metadata.outs, 0);
        assert_eq!(metadata.away_score, 0);

        let events: Vec<_> = board.events().collect();
        assert!(events
            .iter()
            .any(|event| matches!(event, TrackerEvent::TeamStateLapsed { team } if *team == AWAY)));
    }

    #[test]
    fn scorers_reads_the_presence_roster() {
        let store = MemoryStore::new();
        let board = scoreboard(store.clone());
        assert!(board.scorers().unwrap().is_empty());

        let _tracker = tracker(store, AWAY, 5);
        let roster = board.scorers().unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user, 5);
    }

    #[test]
    fn liveness_lapses_with_a_stale_stamp() {
        let store = MemoryStore::new();
        // Stamp the only metadata write 31 minutes in the past.
        store.pin_clock(1_000);
        let board = scoreboard(store.clone());
        let client = crate::SyncClient::<TestConfig>::new(
            store,
            SeasonId::new("2025-fall"),
            GameId::new("week4"),
        );
        client.publish_metadata(MetadataPatch::empty()).unwrap();
        assert_eq!(board.is_live(), Ok(false));
    }

    #[test]
    fn shutdown_cancels_all_three_subscriptions() {
        let store = MemoryStore::new();
        let mut board = scoreboard(store.clone());
        assert_eq!(store.subscription_count(), 3);
        board.shutdown();
        assert_eq!(store.subscription_count(), 0);
        board.shutdown();

        // Caches freeze at their last values.
        let mut tracker = tracker(store, AWAY, 1);
        tracker.select_play(PlayType::Strikeout).unwrap();
        assert!(board.team_state(&AWAY).is_none());
    }

    #[test]
    fn scoreboard_errors_surface_store_failures() {
        use crate::{ChaosConfig, ChaosStore};
        let chaos = ChaosStore::new(MemoryStore::new(), ChaosConfig::passthrough());
        let board = SessionBuilder::<TestConfig>::new()
            .with_season(SeasonId::new("2025-fall"))
            .with_game(GameId::new("week4"))
            .with_teams(HOME, AWAY)
            .unwrap()
            .start_scoreboard_session(chaos.clone())
            .unwrap();

        chaos.set_config(ChaosConfig {
            read_failure_rate: 1.0,
            ..ChaosConfig::passthrough()
        });
        assert!(matches!(
            board.is_live(),
            Err(ScorebookError::StoreError { .. })
        ));
        assert!(matches!(
            board.scorers(),
            Err(ScorebookError::StoreError { .. })
        ));
    }
}
