//! The game-scoped sync client sessions publish and subscribe through.
//!
//! [`SyncClient`] binds a [`DocumentStore`] to one game (season + game id)
//! and speaks in document types instead of raw snapshots: it writes
//! [`TeamGameDoc`]s and [`MetadataPatch`]es, reads [`GameMetadata`], and
//! hands typed `Option` values to subscription observers. A `None` means
//! "no data right now" — the document is missing, was deleted, or could not
//! be delivered — and observers treat it as a valid transient state.
//!
//! The client never retries. Write and read failures propagate to the
//! caller unchanged; the caller decides what a failed publish means for its
//! own state.

use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::auth::UserProfile;
use crate::sync::documents::{GameMetadata, MetadataPatch, PresenceRecord, TeamGameDoc};
use crate::sync::store::{
    CollectionPath, DocPath, DocumentBody, DocumentSnapshot, DocumentStore, GameId, SeasonId,
    SnapshotObserver, SubscriptionId, WriteStamp,
};
use crate::{Config, GameState, ScorebookResult};

// #################
// #   OBSERVERS   #
// #################

/// The callback a metadata subscription invokes, with `None` for "no data".
#[cfg(feature = "sync-send")]
pub type MetadataObserver<T> = Arc<dyn Fn(Option<GameMetadata<T>>) + Send + Sync>;

/// The callback a metadata subscription invokes, with `None` for "no data".
#[cfg(not(feature = "sync-send"))]
pub type MetadataObserver<T> = Arc<dyn Fn(Option<GameMetadata<T>>)>;

/// The callback a team-state subscription invokes, with `None` for "no data".
#[cfg(feature = "sync-send")]
pub type TeamStateObserver<T> = Arc<dyn Fn(Option<TeamGameDoc<T>>) + Send + Sync>;

/// The callback a team-state subscription invokes, with `None` for "no data".
#[cfg(not(feature = "sync-send"))]
pub type TeamStateObserver<T> = Arc<dyn Fn(Option<TeamGameDoc<T>>)>;

/// The callback a presence subscription invokes, with `None` for "no data".
#[cfg(feature = "sync-send")]
pub type PresenceObserver<T> = Arc<dyn Fn(Option<PresenceRecord<T>>) + Send + Sync>;

/// The callback a presence subscription invokes, with `None` for "no data".
#[cfg(not(feature = "sync-send"))]
pub type PresenceObserver<T> = Arc<dyn Fn(Option<PresenceRecord<T>>)>;

// ##############
// #   CLIENT   #
// ##############

/// A [`DocumentStore`] bound to one game, speaking in document types.
///
/// Two trackers scoring the same game each hold their own client over the
/// same store; their private team documents never collide, and their shared
/// metadata merges last-write-wins. The client remembers every subscription
/// it opens so [`shutdown`](SyncClient::shutdown) can cancel them all.
///
/// # Example
///
/// ```
/// use scorebook::{Config, GameId, MemoryStore, MetadataPatch, SeasonId, SyncClient};
///
/// struct LeagueConfig;
/// impl Config for LeagueConfig {
///     type PlayerId = String;
///     type TeamId = String;
///     type UserId = String;
/// }
///
/// let client = SyncClient::<LeagueConfig>::new(
///     MemoryStore::new(),
///     SeasonId::new("2025-fall"),
///     GameId::new("week4-tigers-bears"),
/// );
///
/// let patch = MetadataPatch {
///     home_score: Some(3),
///     ..MetadataPatch::empty()
/// };
/// client.publish_metadata(patch)?;
/// assert!(client.is_live()?);
/// # Ok::<(), scorebook::ScorebookError>(())
/// ```
pub struct SyncClient<T>
where
    T: Config,
{
    store: Box<dyn DocumentStore<T>>,
    season: SeasonId,
    game: GameId,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl<T> SyncClient<T>
where
    T: Config,
{
    /// Binds `store` to the game at `season`/`game`.
    pub fn new(store: impl DocumentStore<T> + 'static, season: SeasonId, game: GameId) -> Self {
        SyncClient {
            store: Box::new(store),
            season,
            game,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// The season this client is bound to.
    #[must_use]
    pub fn season(&self) -> &SeasonId {
        &self.season
    }

    /// The game this client is bound to.
    #[must_use]
    pub fn game(&self) -> &GameId {
        &self.game
    }

    fn metadata_path(&self) -> DocPath<T> {
        DocPath::metadata(self.season.clone(), self.game.clone())
    }

    fn team_path(&self, team: T::TeamId) -> DocPath<T> {
        DocPath::team_state(self.season.clone(), self.game.clone(), team)
    }

    fn presence_path(&self, user: T::UserId) -> DocPath<T> {
        DocPath::presence(self.season.clone(), self.game.clone(), user)
    }

    fn track(&self, subscription: ScorebookResult<SubscriptionId>) -> ScorebookResult<SubscriptionId> {
        let id = subscription?;
        self.subscriptions.lock().push(id);
        Ok(id)
    }

    // ==================
    // publishing
    // ==================

    /// Overwrites `team`'s tracking document with a snapshot of `state`.
    ///
    /// This is a whole-document replace, not a merge: the tracker owns its
    /// team's document outright, and republishing after an undo shrinks the
    /// stored play list along with the local one. The store assigns the
    /// update stamp.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the write fails. Nothing is
    /// retried; local state is unaffected either way.
    pub fn publish_game_state(
        &self,
        team: T::TeamId,
        state: &GameState<T::PlayerId>,
    ) -> ScorebookResult<WriteStamp> {
        let path = self.team_path(team.clone());
        debug!(team = ?team, plays = state.records().len(), "publishing team state");
        let doc = TeamGameDoc::from_state(team, state);
        self.store.set(&path, DocumentBody::TeamState(doc))
    }

    /// Merges `patch` into the shared metadata document, creating it from
    /// defaults if absent.
    ///
    /// Only the fields the patch carries change; both trackers write here
    /// and the merge keeps whichever side wrote each field last.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the merge fails.
    pub fn publish_metadata(&self, patch: MetadataPatch<T>) -> ScorebookResult<WriteStamp> {
        debug!("publishing metadata patch");
        self.store.merge_metadata(&self.metadata_path(), patch)
    }

    /// Deletes both teams' tracking documents and rewinds the shared
    /// metadata to a fresh scoreboard.
    ///
    /// Destructive and coordinated: every connected subscriber observes the
    /// deletions and the metadata rewind. The metadata write stamps the
    /// reset, so the game reads as live immediately afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first store error and stops; a failed reset may leave
    /// one team's document cleared and the other's intact.
    pub fn reset_game(&self, home: T::TeamId, away: T::TeamId) -> ScorebookResult<()> {
        info!(home = ?home, away = ?away, "resetting game documents");
        self.store.delete(&self.team_path(home))?;
        self.store.delete(&self.team_path(away))?;
        self.store
            .set(&self.metadata_path(), DocumentBody::Metadata(GameMetadata::default()))?;
        Ok(())
    }

    // ==================
    // reading
    // ==================

    /// Reads the shared metadata document, `None` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the read fails.
    pub fn fetch_metadata(&self) -> ScorebookResult<Option<GameMetadata<T>>> {
        let snapshot = self.store.get(&self.metadata_path())?;
        Ok(snapshot.body.and_then(DocumentBody::into_metadata))
    }

    /// Reads `team`'s tracking document, `None` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the read fails.
    pub fn fetch_team_state(&self, team: T::TeamId) -> ScorebookResult<Option<TeamGameDoc<T>>> {
        let snapshot = self.store.get(&self.team_path(team))?;
        Ok(snapshot.body.and_then(DocumentBody::into_team_state))
    }

    /// Whether the game counts as live: metadata updated within
    /// [`LIVE_WINDOW`](crate::LIVE_WINDOW) of now. A game with no metadata
    /// document is not live.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the read fails.
    pub fn is_live(&self) -> ScorebookResult<bool> {
        let metadata = self.fetch_metadata()?;
        Ok(metadata.is_some_and(|metadata| metadata.is_live(crate::unix_millis_now())))
    }

    /// Every scorer with a presence document under this game, in user order.
    ///
    /// The roster is self-maintaining: [`heartbeat`](SyncClient::heartbeat)
    /// adds or refreshes an entry and [`stop_tracking`](SyncClient::stop_tracking)
    /// removes it. Callers who care about stale entries can inspect each
    /// record's `last_seen_ms`.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the listing fails.
    pub fn presence_roster(&self) -> ScorebookResult<Vec<PresenceRecord<T>>> {
        let collection = CollectionPath::presence(self.season.clone(), self.game.clone());
        let snapshots = self.store.list(&collection)?;
        Ok(snapshots
            .into_iter()
            .filter_map(|snapshot| snapshot.body.and_then(DocumentBody::into_presence))
            .collect())
    }

    // ==================
    // presence
    // ==================

    /// Writes (or refreshes) `profile`'s presence document for this game.
    ///
    /// The store assigns the `last_seen` stamp, so repeating the call keeps
    /// the record fresh.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the write fails.
    pub fn heartbeat(&self, profile: &UserProfile<T>) -> ScorebookResult<WriteStamp> {
        trace!(user = ?profile.user, "presence heartbeat");
        let path = self.presence_path(profile.user.clone());
        self.store
            .set(&path, DocumentBody::Presence(PresenceRecord::new(profile)))
    }

    /// Removes `user`'s presence document. A no-op if it is already gone.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the delete fails.
    pub fn stop_tracking(&self, user: T::UserId) -> ScorebookResult<()> {
        debug!(user = ?user, "stopping presence tracking");
        self.store.delete(&self.presence_path(user))
    }

    // ==================
    // subscriptions
    // ==================

    /// Subscribes to the shared metadata document.
    ///
    /// The observer fires synchronously with the current value before this
    /// returns, then once per remote change. `None` means the document is
    /// missing or a delivery could not be decoded.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the subscription cannot be
    /// opened; no observer is registered in that case.
    pub fn subscribe_metadata(&self, observer: MetadataObserver<T>) -> ScorebookResult<SubscriptionId> {
        let wrapped: SnapshotObserver<T> = Arc::new(move |snapshot: DocumentSnapshot<T>| {
            observer(snapshot.body.and_then(DocumentBody::into_metadata));
        });
        self.track(self.store.subscribe(&self.metadata_path(), wrapped))
    }

    /// Subscribes to `team`'s tracking document.
    ///
    /// Delivery semantics match [`subscribe_metadata`](SyncClient::subscribe_metadata).
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the subscription cannot be
    /// opened; no observer is registered in that case.
    pub fn subscribe_team_state(
        &self,
        team: T::TeamId,
        observer: TeamStateObserver<T>,
    ) -> ScorebookResult<SubscriptionId> {
        let wrapped: SnapshotObserver<T> = Arc::new(move |snapshot: DocumentSnapshot<T>| {
            observer(snapshot.body.and_then(DocumentBody::into_team_state));
        });
        self.track(self.store.subscribe(&self.team_path(team), wrapped))
    }

    /// Subscribes to one scorer's presence document.
    ///
    /// Delivery semantics match [`subscribe_metadata`](SyncClient::subscribe_metadata).
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the subscription cannot be
    /// opened; no observer is registered in that case.
    pub fn subscribe_presence(
        &self,
        user: T::UserId,
        observer: PresenceObserver<T>,
    ) -> ScorebookResult<SubscriptionId> {
        let wrapped: SnapshotObserver<T> = Arc::new(move |snapshot: DocumentSnapshot<T>| {
            observer(snapshot.body.and_then(DocumentBody::into_presence));
        });
        self.track(self.store.subscribe(&self.presence_path(user), wrapped))
    }

    /// Cancels one subscription opened through this client.
    pub fn unsubscribe(&self, subscription: SubscriptionId) {
        self.subscriptions.lock().retain(|id| *id != subscription);
        self.store.unsubscribe(subscription);
    }

    /// Cancels every subscription opened through this client.
    ///
    /// Teardown must run this (the sessions do); a dropped client does not
    /// cancel anything on its own, and leaked observers keep firing.
    pub fn shutdown(&self) {
        let subscriptions: Vec<SubscriptionId> = self.subscriptions.lock().drain(..).collect();
        if !subscriptions.is_empty() {
            debug!(count = subscriptions.len(), "cancelling subscriptions");
        }
        for subscription in subscriptions {
            self.store.unsubscribe(subscription);
        }
    }
}

impl<T> Debug for SyncClient<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("season", &self.season)
            .field("game", &self.game)
            .field("subscriptions", &self.subscriptions.lock().len())
            .finish_non_exhaustive()
    }
}

// ###################
// # UNIT TESTS      #
// ###################
