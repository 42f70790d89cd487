use std::sync::Arc;

use web_time::Duration;

use crate::{
    auth::can_track,
    sessions::scoreboard_session::ScoreboardSession,
    sessions::tracker_session::TrackerSession,
    telemetry::ViolationObserver,
    BattingOrder, Config, DocumentStore, GameId, GameState, Half, Inning, Player, ScorebookError,
    ScorebookResult, SeasonId, SyncClient, UserProfile,
};

/// Default event queue size.
/// Events older than this threshold may be dropped if not polled.
const DEFAULT_EVENT_QUEUE_SIZE: usize = 100;

/// Default presence heartbeat interval.
///
/// Sessions refresh their presence record opportunistically: whenever a
/// publish goes out and the previous heartbeat is at least this old, the
/// record is rewritten. Sixty seconds keeps the roster fresh well inside the
/// thirty-minute liveness window without a write per play.
const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// The [`SessionBuilder`] builds all scorebook sessions.
///
/// After setting all appropriate values, use `SessionBuilder::start_yxz_session(...)`
/// to consume the builder and create a session of the desired type.
///
/// # Example
///
/// ```
/// use scorebook::{
///     Config, GameId, MemoryStore, Player, Role, SeasonId, SessionBuilder, UserProfile,
/// };
///
/// struct LeagueConfig;
/// impl Config for LeagueConfig {
///     type PlayerId = String;
///     type TeamId = String;
///     type UserId = String;
/// }
///
/// let scorer = UserProfile::<LeagueConfig>::new("kim".to_owned(), "Kim", Role::Scorekeeper);
/// let session = SessionBuilder::<LeagueConfig>::new()
///     .with_season(SeasonId::new("2025-fall"))
///     .with_game(GameId::new("week4-tigers-bears"))
///     .with_teams("tigers".to_owned(), "bears".to_owned())?
///     .with_tracked_team("bears".to_owned())
///     .with_batting_order(vec![
///         Player::new("ana".to_owned(), "Ana", 7),
///         Player::new("ben".to_owned(), "Ben", 12),
///         Player::new("cho".to_owned(), "Cho", 3),
///     ])
///     .with_profile(scorer)
///     .start_tracker_session(MemoryStore::new())?;
///
/// assert!(session.pending_play().is_none());
/// # Ok::<(), scorebook::ScorebookError>(())
/// ```
#[must_use = "SessionBuilder must be consumed by calling a start_*_session method"]
pub struct SessionBuilder<T>
where
    T: Config,
{
    season: Option<SeasonId>,
    game: Option<GameId>,
    home: Option<T::TeamId>,
    away: Option<T::TeamId>,
    /// The team whose offense this tracker records. Must be one of the two
    /// teams in the game.
    tracked: Option<T::TeamId>,
    batting_order: Vec<Player<T::PlayerId>>,
    profile: Option<UserProfile<T>>,
    /// Explicit batting half override. When unset, the half is derived from
    /// the tracked side: home bats the bottom, away bats the top.
    batting_half: Option<Half>,
    /// Where the local scoring machine resumes. When unset, the game starts
    /// fresh at the tracked team's first at-bat.
    resume_point: Option<(Inning, Half)>,
    /// Minimum age before a publish refreshes the presence record.
    heartbeat_interval: Duration,
    /// Maximum number of events to queue before oldest are dropped.
    event_queue_size: usize,
    /// Optional observer for rule violations.
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl<T: Config> std::fmt::Debug for SessionBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Destructure to ensure all fields are included when new fields are added.
        // The compiler will error if a new field is added but not handled here.
        let Self {
            season,
            game,
            home,
            away,
            tracked,
            batting_order,
            profile,
            batting_half,
            resume_point,
            heartbeat_interval,
            event_queue_size,
            violation_observer,
        } = self;

        f.debug_struct("SessionBuilder")
            .field("season", season)
            .field("game", game)
            .field("home", home)
            .field("away", away)
            .field("tracked", tracked)
            .field("batting_order", batting_order)
            .field("profile", profile)
            .field("batting_half", batting_half)
            .field("resume_point", resume_point)
            .field("heartbeat_interval", heartbeat_interval)
            .field("event_queue_size", event_queue_size)
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl<T: Config> Default for SessionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Config> SessionBuilder<T> {
    /// Construct a new builder with all values set to their defaults.
    pub fn new() -> Self {
        Self {
            season: None,
            game: None,
            home: None,
            away: None,
            tracked: None,
            batting_order: Vec::new(),
            profile: None,
            batting_half: None,
            resume_point: None,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            event_queue_size: DEFAULT_EVENT_QUEUE_SIZE,
            violation_observer: None,
        }
    }

    /// Sets the season this game belongs to. Required for every session type.
    pub fn with_season(mut self, season: SeasonId) -> Self {
        self.season = Some(season);
        self
    }

    /// Sets the game document id. Required for every session type.
    pub fn with_game(mut self, game: GameId) -> Self {
        self.game = Some(game);
        self
    }

    /// Sets the two teams playing this game. Required for every session type.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if `home` and `away` are the same team.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    pub fn with_teams(mut self, home: T::TeamId, away: T::TeamId) -> ScorebookResult<Self> {
        if home == away {
            return Err(ScorebookError::InvalidRequest {
                info: format!("home and away must be different teams, got {home:?} twice"),
            });
        }
        self.home = Some(home);
        self.away = Some(away);
        Ok(self)
    }

    /// Sets the team whose offense this tracker records. Required for tracker
    /// sessions; ignored by scoreboard sessions.
    pub fn with_tracked_team(mut self, team: T::TeamId) -> Self {
        self.tracked = Some(team);
        self
    }

    /// Sets the batting order for the tracked team, in batting sequence.
    /// Required for tracker sessions; the order is validated when the session
    /// starts.
    pub fn with_batting_order(mut self, players: Vec<Player<T::PlayerId>>) -> Self {
        self.batting_order = players;
        self
    }

    /// Sets the profile of the scorer operating this session. Required for
    /// tracker sessions: the profile must be authorized to track the tracked
    /// team, and it backs the session's presence record.
    pub fn with_profile(mut self, profile: UserProfile<T>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Overrides which half the tracked team bats.
    ///
    /// By default the half follows the side: the home team bats the bottom of
    /// each inning, the away team the top. Leagues that flip the convention
    /// (or scrimmages with no real home side) can override it here.
    pub fn with_batting_half(mut self, half: Half) -> Self {
        self.batting_half = Some(half);
        self
    }

    /// Resumes the local scoring machine at the given inning and half instead
    /// of the start of the game. Use this when a tracker rejoins a game
    /// already in progress; previously committed plays stay in the store and
    /// are not replayed locally.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if `inning` is not a positive inning
    ///   number.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    pub fn with_resume_point(mut self, inning: Inning, half: Half) -> ScorebookResult<Self> {
        if !inning.is_valid() {
            return Err(ScorebookError::InvalidRequest {
                info: format!("cannot resume at inning {inning}; innings start at 1"),
            });
        }
        self.resume_point = Some((inning, half));
        Ok(self)
    }

    /// Sets how old a presence record may grow before a publish refreshes it.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if `interval` is zero.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> ScorebookResult<Self> {
        if interval.is_zero() {
            return Err(ScorebookError::InvalidRequest {
                info: "heartbeat interval must be non-zero".to_owned(),
            });
        }
        self.heartbeat_interval = interval;
        Ok(self)
    }

    /// Sets the maximum number of events to queue before oldest are dropped.
    ///
    /// When the event queue exceeds this size, the oldest events are discarded.
    /// This provides backpressure if the application isn't consuming events
    /// quickly enough.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum number of events to buffer. Must be at least 10.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if `size` is less than 10.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    pub fn with_event_queue_size(mut self, size: usize) -> ScorebookResult<Self> {
        if size < 10 {
            return Err(ScorebookError::InvalidRequest {
                info: format!("event queue size {size} is below the minimum of 10"),
            });
        }
        self.event_queue_size = size;
        Ok(self)
    }

    /// Sets a custom observer for rule violations.
    ///
    /// When a violation occurs during session operation (a placement that
    /// displaces a runner, a tolerated store failure, an internal invariant
    /// miss), it will be reported to this observer. This enables programmatic
    /// monitoring, custom logging, or test assertions.
    ///
    /// If no observer is set, violations are logged via the `tracing` crate by
    /// default.
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Consumes the builder to construct a [`TrackerSession`] and connects it
    /// to the store: remote subscriptions are installed and an initial
    /// presence heartbeat is written before this returns.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if season, game, teams, tracked team, or
    ///   profile are missing, or if the tracked team is not one of the two
    ///   teams in the game.
    /// - Returns [`NotAuthorized`] if the profile's role may not track the
    ///   tracked team.
    /// - Returns [`InvalidLineup`] if the batting order is unusable.
    /// - Returns a store error if a subscription cannot be installed.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    /// [`NotAuthorized`]: ScorebookError::NotAuthorized
    /// [`InvalidLineup`]: ScorebookError::InvalidLineup
    pub fn start_tracker_session(
        self,
        store: impl DocumentStore<T> + 'static,
    ) -> ScorebookResult<TrackerSession<T>> {
        let season = require(self.season, "season")?;
        let game = require(self.game, "game")?;
        let home = require(self.home, "teams")?;
        let away = require(self.away, "teams")?;
        let tracked = require(self.tracked, "tracked team")?;
        if tracked != home && tracked != away {
            return Err(ScorebookError::InvalidRequest {
                info: format!("tracked team {tracked:?} is neither {home:?} nor {away:?}"),
            });
        }
        let profile = require(self.profile, "profile")?;
        if !can_track(&profile, &tracked) {
            return Err(ScorebookError::NotAuthorized { role: profile.role });
        }
        let order = BattingOrder::new(self.batting_order)?;

        let is_home = tracked == home;
        let batting_half = self
            .batting_half
            .unwrap_or(if is_home { Half::Bottom } else { Half::Top });
        let mut state = GameState::new(order, batting_half);
        if let Some((inning, half)) = self.resume_point {
            state.resume_at(inning, half)?;
        }

        let opponent = if is_home { away } else { home };
        let client = SyncClient::new(store, season, game);
        TrackerSession::start(
            state,
            client,
            profile,
            tracked,
            opponent,
            is_home,
            self.heartbeat_interval,
            self.event_queue_size,
            self.violation_observer,
        )
    }

    /// Consumes the builder to create a new [`ScoreboardSession`].
    ///
    /// A [`ScoreboardSession`] is the read-only view of a game: it follows the
    /// metadata document and both team documents, caches the latest snapshot
    /// of each, and queues change events. It never writes, so no profile,
    /// lineup, or tracked team is required.
    ///
    /// # Errors
    /// - Returns [`InvalidRequest`] if season, game, or teams are missing.
    /// - Returns a store error if a subscription cannot be installed.
    ///
    /// [`InvalidRequest`]: ScorebookError::InvalidRequest
    pub fn start_scoreboard_session(
        self,
        store: impl DocumentStore<T> + 'static,
    ) -> ScorebookResult<ScoreboardSession<T>> {
        let season = require(self.season, "season")?;
        let game = require(self.game, "game")?;
        let home = require(self.home, "teams")?;
        let away = require(self.away, "teams")?;
        let client = SyncClient::new(store, season, game);
        ScoreboardSession::start(client, home, away, self.event_queue_size)
    }
}

fn require<V>(value: Option<V>, what: &str) -> ScorebookResult<V> {
    value.ok_or_else(|| ScorebookError::InvalidRequest {
        info: format!("{what} must be set before starting a session"),
    })
}
