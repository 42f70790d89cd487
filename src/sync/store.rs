//! The storage contract between sessions and a document backend.
//!
//! Sessions never talk to a database directly; they go through the
//! [`DocumentStore`] trait, which models a small document database with
//! per-document snapshot subscriptions, a metadata merge primitive, and
//! server-assigned write stamps. [`MemoryStore`] is the in-process
//! implementation used in production-free settings and in every test;
//! [`ChaosStore`] wraps any store to inject failures.
//!
//! [`MemoryStore`]: crate::sync::memory_store::MemoryStore
//! [`ChaosStore`]: crate::sync::chaos_store::ChaosStore

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sync::documents::{GameMetadata, MetadataPatch, PresenceRecord, TeamGameDoc};
use crate::{Config, ScorebookResult};

// #############
// #   IDS     #
// #############

/// Identifies a season. Seasons are the outermost grouping of games.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonId(String);

impl SeasonId {
    /// Creates a season id from its document id string.
    pub fn new(id: impl Into<String>) -> Self {
        SeasonId(id.into())
    }

    /// The underlying document id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a game within a season.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(String);

impl GameId {
    /// Creates a game id from its document id string.
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    /// The underlying document id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A server-assigned write time, in milliseconds since the Unix epoch.
///
/// The store, not the writer, decides the stamp: every successful `set` and
/// `merge_metadata` assigns one and writes it into the body's stamp field
/// before persisting (see [`DocumentBody::stamp_with`]). Stamps order nothing
/// in the scoring engine; they exist for the liveness window and for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriteStamp(u64);

impl WriteStamp {
    /// Creates a stamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        WriteStamp(millis)
    }

    /// The stamp as epoch milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

/// Identifies one active snapshot subscription within a store.
///
/// Returned by [`DocumentStore::subscribe`] and redeemed by
/// [`DocumentStore::unsubscribe`]. Ids are unique within a store instance
/// and never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription id from its raw counter value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        SubscriptionId(id)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

// #############
// #   PATHS   #
// #############

/// The address of one document in the game hierarchy.
///
/// Paths follow the layout `seasons/{season}/games/{game}/{collection}/{id}`,
/// with one leaf per document kind:
///
/// - `metadata/current` — the shared scoreboard document,
/// - `game_state/{team}` — one tracking document per side,
/// - `presence/{user}` — one presence record per connected user.
///
/// The `Debug` rendering is the slash path, which is what shows up in logs.
pub enum DocPath<T>
where
    T: Config,
{
    /// The shared metadata document for a game.
    Metadata {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
    },
    /// One side's tracking document.
    TeamState {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
        /// The side the document belongs to.
        team: T::TeamId,
    },
    /// One user's presence record.
    Presence {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
        /// The user the record belongs to.
        user: T::UserId,
    },
}

impl<T> DocPath<T>
where
    T: Config,
{
    /// The path of a game's shared metadata document.
    #[must_use]
    pub fn metadata(season: SeasonId, game: GameId) -> Self {
        DocPath::Metadata { season, game }
    }

    /// The path of `team`'s tracking document.
    #[must_use]
    pub fn team_state(season: SeasonId, game: GameId, team: T::TeamId) -> Self {
        DocPath::TeamState { season, game, team }
    }

    /// The path of `user`'s presence record.
    #[must_use]
    pub fn presence(season: SeasonId, game: GameId, user: T::UserId) -> Self {
        DocPath::Presence { season, game, user }
    }

    /// The season segment of the path.
    #[must_use]
    pub fn season(&self) -> &SeasonId {
        match self {
            DocPath::Metadata { season, .. }
            | DocPath::TeamState { season, .. }
            | DocPath::Presence { season, .. } => season,
        }
    }

    /// The game segment of the path.
    #[must_use]
    pub fn game(&self) -> &GameId {
        match self {
            DocPath::Metadata { game, .. }
            | DocPath::TeamState { game, .. }
            | DocPath::Presence { game, .. } => game,
        }
    }

    /// The collection this document lives in.
    #[must_use]
    pub fn collection(&self) -> CollectionPath {
        match self {
            DocPath::Metadata { season, game } => CollectionPath::Metadata {
                season: season.clone(),
                game: game.clone(),
            },
            DocPath::TeamState { season, game, .. } => CollectionPath::TeamState {
                season: season.clone(),
                game: game.clone(),
            },
            DocPath::Presence { season, game, .. } => CollectionPath::Presence {
                season: season.clone(),
                game: game.clone(),
            },
        }
    }
}

impl<T> Clone for DocPath<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        match self {
            DocPath::Metadata { season, game } => DocPath::Metadata {
                season: season.clone(),
                game: game.clone(),
            },
            DocPath::TeamState { season, game, team } => DocPath::TeamState {
                season: season.clone(),
                game: game.clone(),
                team: team.clone(),
            },
            DocPath::Presence { season, game, user } => DocPath::Presence {
                season: season.clone(),
                game: game.clone(),
                user: user.clone(),
            },
        }
    }
}

// Paths key the store's document map, so they order lexicographically:
// season, then game, then collection (metadata < game_state < presence),
// then the leaf id. Config identity types carry `Ord` for exactly this.
impl<T> Ord for DocPath<T>
where
    T: Config,
{
    fn cmp(&self, other: &Self) -> Ordering {
        let by_game = self
            .season()
            .cmp(other.season())
            .then_with(|| self.game().cmp(other.game()));
        match (self, other) {
            (DocPath::Metadata { .. }, DocPath::Metadata { .. }) => by_game,
            (
                DocPath::TeamState { team: mine, .. },
                DocPath::TeamState { team: theirs, .. },
            ) => by_game.then_with(|| mine.cmp(theirs)),
            (
                DocPath::Presence { user: mine, .. },
                DocPath::Presence { user: theirs, .. },
            ) => by_game.then_with(|| mine.cmp(theirs)),
            (DocPath::Metadata { .. }, _) => by_game.then(Ordering::Less),
            (_, DocPath::Metadata { .. }) => by_game.then(Ordering::Greater),
            (DocPath::TeamState { .. }, _) => by_game.then(Ordering::Less),
            (_, DocPath::TeamState { .. }) => by_game.then(Ordering::Greater),
        }
    }
}

impl<T> PartialOrd for DocPath<T>
where
    T: Config,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for DocPath<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for DocPath<T> where T: Config {}

impl<T> fmt::Debug for DocPath<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocPath::Metadata { season, game } => {
                write!(f, "seasons/{season}/games/{game}/metadata/current")
            }
            DocPath::TeamState { season, game, team } => {
                write!(f, "seasons/{season}/games/{game}/game_state/{team:?}")
            }
            DocPath::Presence { season, game, user } => {
                write!(f, "seasons/{season}/games/{game}/presence/{user:?}")
            }
        }
    }
}

/// The address of one document collection within a game.
///
/// Collections hold documents of a single kind; [`DocumentStore::list`]
/// enumerates one. Unlike [`DocPath`] this type is not generic: collections
/// are addressed without a leaf id, so no identity types appear.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionPath {
    /// A game's `metadata` collection (holds the single `current` document).
    Metadata {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
    },
    /// A game's `game_state` collection (one document per side).
    TeamState {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
    },
    /// A game's `presence` collection (one document per connected user).
    Presence {
        /// The season the game belongs to.
        season: SeasonId,
        /// The game.
        game: GameId,
    },
}

impl CollectionPath {
    /// The path of a game's `presence` collection.
    #[must_use]
    pub fn presence(season: SeasonId, game: GameId) -> Self {
        CollectionPath::Presence { season, game }
    }

    /// Returns `true` when `path` addresses a document in this collection.
    #[must_use]
    pub fn contains<T>(&self, path: &DocPath<T>) -> bool
    where
        T: Config,
    {
        *self == path.collection()
    }
}

// #############
// #  BODIES   #
// #############

/// The payload of a stored document, one variant per document kind.
///
/// Bodies carry their own write stamp field; the store assigns it via
/// [`stamp_with`](DocumentBody::stamp_with) on every successful write, so a
/// body read back from the store always says when it landed.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub enum DocumentBody<T>
where
    T: Config,
{
    /// A shared scoreboard document.
    Metadata(GameMetadata<T>),
    /// A per-side tracking document.
    TeamState(TeamGameDoc<T>),
    /// A presence record.
    Presence(PresenceRecord<T>),
}

impl<T> DocumentBody<T>
where
    T: Config,
{
    /// The document kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentBody::Metadata(_) => "metadata",
            DocumentBody::TeamState(_) => "team_state",
            DocumentBody::Presence(_) => "presence",
        }
    }

    /// Returns `true` when this body belongs at `path`: the kinds agree and,
    /// for team and presence documents, the body's own identity matches the
    /// path leaf.
    #[must_use]
    pub fn matches_path(&self, path: &DocPath<T>) -> bool {
        match (self, path) {
            (DocumentBody::Metadata(_), DocPath::Metadata { .. }) => true,
            (DocumentBody::TeamState(doc), DocPath::TeamState { team, .. }) => doc.team == *team,
            (DocumentBody::Presence(record), DocPath::Presence { user, .. }) => {
                record.user == *user
            }
            _ => false,
        }
    }

    /// Writes `stamp` into the body's own stamp field.
    pub fn stamp_with(&mut self, stamp: WriteStamp) {
        match self {
            DocumentBody::Metadata(metadata) => metadata.last_updated_ms = stamp.as_millis(),
            DocumentBody::TeamState(doc) => doc.last_updated_ms = stamp.as_millis(),
            DocumentBody::Presence(record) => record.last_seen_ms = stamp.as_millis(),
        }
    }

    /// The metadata payload, when this is a metadata body.
    #[must_use]
    pub fn as_metadata(&self) -> Option<&GameMetadata<T>> {
        match self {
            DocumentBody::Metadata(metadata) => Some(metadata),
            _ => None,
        }
    }

    /// The team payload, when this is a team state body.
    #[must_use]
    pub fn as_team_state(&self) -> Option<&TeamGameDoc<T>> {
        match self {
            DocumentBody::TeamState(doc) => Some(doc),
            _ => None,
        }
    }

    /// The presence payload, when this is a presence body.
    #[must_use]
    pub fn as_presence(&self) -> Option<&PresenceRecord<T>> {
        match self {
            DocumentBody::Presence(record) => Some(record),
            _ => None,
        }
    }

    /// Consumes the body into its metadata payload.
    #[must_use]
    pub fn into_metadata(self) -> Option<GameMetadata<T>> {
        match self {
            DocumentBody::Metadata(metadata) => Some(metadata),
            _ => None,
        }
    }

    /// Consumes the body into its team payload.
    #[must_use]
    pub fn into_team_state(self) -> Option<TeamGameDoc<T>> {
        match self {
            DocumentBody::TeamState(doc) => Some(doc),
            _ => None,
        }
    }

    /// Consumes the body into its presence payload.
    #[must_use]
    pub fn into_presence(self) -> Option<PresenceRecord<T>> {
        match self {
            DocumentBody::Presence(record) => Some(record),
            _ => None,
        }
    }
}

impl<T> Clone for DocumentBody<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        match self {
            DocumentBody::Metadata(metadata) => DocumentBody::Metadata(metadata.clone()),
            DocumentBody::TeamState(doc) => DocumentBody::TeamState(doc.clone()),
            DocumentBody::Presence(record) => DocumentBody::Presence(record.clone()),
        }
    }
}

impl<T> PartialEq for DocumentBody<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DocumentBody::Metadata(mine), DocumentBody::Metadata(theirs)) => mine == theirs,
            (DocumentBody::TeamState(mine), DocumentBody::TeamState(theirs)) => mine == theirs,
            (DocumentBody::Presence(mine), DocumentBody::Presence(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for DocumentBody<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentBody::Metadata(metadata) => {
                f.debug_tuple("Metadata").field(metadata).finish()
            }
            DocumentBody::TeamState(doc) => f.debug_tuple("TeamState").field(doc).finish(),
            DocumentBody::Presence(record) => f.debug_tuple("Presence").field(record).finish(),
        }
    }
}

// #############
// # SNAPSHOTS #
// #############

/// One observation of a document: its path plus its body at read time.
///
/// `body` is `None` when the document does not exist — a deleted document, a
/// document that was never written, or (from [`ChaosStore`]) a read that
/// failed. Subscribers treat all three the same way: the document has no
/// data right now.
///
/// [`ChaosStore`]: crate::sync::chaos_store::ChaosStore
pub struct DocumentSnapshot<T>
where
    T: Config,
{
    /// The document's path.
    pub path: DocPath<T>,
    /// The document's body, or `None` when it does not exist.
    pub body: Option<DocumentBody<T>>,
}

impl<T> DocumentSnapshot<T>
where
    T: Config,
{
    /// A snapshot of a document that has no data.
    #[must_use]
    pub fn missing(path: DocPath<T>) -> Self {
        DocumentSnapshot { path, body: None }
    }

    /// Returns `true` when the document existed at read time.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.body.is_some()
    }
}

impl<T> Clone for DocumentSnapshot<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        DocumentSnapshot {
            path: self.path.clone(),
            body: self.body.clone(),
        }
    }
}

impl<T> PartialEq for DocumentSnapshot<T>
where
    T: Config,
{
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.body == other.body
    }
}

impl<T> fmt::Debug for DocumentSnapshot<T>
where
    T: Config,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSnapshot")
            .field("path", &self.path)
            .field("body", &self.body)
            .finish()
    }
}

/// The callback invoked with every snapshot a subscription delivers.
///
/// Observers run synchronously inside the store call that triggered them
/// (the writer's `set`, `merge_metadata`, or `delete`, or the subscriber's
/// own `subscribe` for the initial snapshot), so they must not block and
/// must not call back into the store.
#[cfg(feature = "sync-send")]
pub type SnapshotObserver<T> = Arc<dyn Fn(DocumentSnapshot<T>) + Send + Sync>;

/// The callback invoked with every snapshot a subscription delivers.
///
/// Observers run synchronously inside the store call that triggered them
/// (the writer's `set`, `merge_metadata`, or `delete`, or the subscriber's
/// own `subscribe` for the initial snapshot), so they must not block and
/// must not call back into the store.
#[cfg(not(feature = "sync-send"))]
pub type SnapshotObserver<T> = Arc<dyn Fn(DocumentSnapshot<T>)>;

// #############
// #   STORE   #
// #############

/// The document database contract sessions are written against.
///
/// A store holds whole documents addressed by [`DocPath`], assigns write
/// stamps, and pushes snapshots to per-document subscribers. The semantics
/// every implementation must honor:
///
/// - **Missing is not an error.** [`get`](DocumentStore::get) on an absent
///   document returns a snapshot with no body; errors mean the store itself
///   failed.
/// - **Writes replace.** [`set`](DocumentStore::set) replaces the whole
///   document. The one partial primitive is
///   [`merge_metadata`](DocumentStore::merge_metadata), which merges a
///   [`MetadataPatch`] into the metadata document field-by-field,
///   last write wins, creating the document if it is absent.
/// - **The store assigns stamps.** Every successful write stamps the stored
///   body via [`DocumentBody::stamp_with`] and returns the stamp.
/// - **Subscriptions start with now.** [`subscribe`](DocumentStore::subscribe)
///   delivers the current snapshot (existing or missing) before returning,
///   then one snapshot per subsequent write or delete of that document.
/// - **Deletes are idempotent**, and notify subscribers with a missing
///   snapshot.
/// - **The push path never fails.** A delivery that cannot produce a valid
///   body (a decode failure on a remote change, say) arrives as a missing
///   snapshot instead of panicking; observers treat "no data" as a valid
///   transient state.
///
/// # Errors
///
/// Fallible operations return [`ScorebookError::StoreError`] when the
/// backend fails and [`ScorebookError::SerializationError`] when a body
/// cannot be encoded or decoded. Failures are surfaced to the caller
/// unchanged; this layer never retries.
///
/// [`ScorebookError::StoreError`]: crate::ScorebookError::StoreError
/// [`ScorebookError::SerializationError`]: crate::ScorebookError::SerializationError
#[cfg(feature = "sync-send")]
pub trait DocumentStore<T>: Send + Sync
where
    T: Config,
{
    /// Reads the document at `path`.
    fn get(&self, path: &DocPath<T>) -> ScorebookResult<DocumentSnapshot<T>>;

    /// Replaces the document at `path` with `body`, creating it if absent.
    ///
    /// Implementations must reject a body that does not belong at `path`
    /// (wrong kind, or a leaf identity that disagrees with the path) with a
    /// store error, and must stamp the body before persisting it.
    fn set(&self, path: &DocPath<T>, body: DocumentBody<T>) -> ScorebookResult<WriteStamp>;

    /// Merges `patch` into the metadata document at `path`, creating the
    /// document from [`GameMetadata::default`] if it is absent.
    ///
    /// `path` must be a metadata path.
    fn merge_metadata(
        &self,
        path: &DocPath<T>,
        patch: MetadataPatch<T>,
    ) -> ScorebookResult<WriteStamp>;

    /// Deletes the document at `path`. Deleting an absent document is a
    /// successful no-op.
    fn delete(&self, path: &DocPath<T>) -> ScorebookResult<()>;

    /// Registers `observer` for snapshots of the document at `path`,
    /// delivering the current snapshot before returning.
    fn subscribe(
        &self,
        path: &DocPath<T>,
        observer: SnapshotObserver<T>,
    ) -> ScorebookResult<SubscriptionId>;

    /// Cancels a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);

    /// Lists every existing document in `collection`, in path order.
    fn list(&self, collection: &CollectionPath) -> ScorebookResult<Vec<DocumentSnapshot<T>>>;
}

/// The document database contract sessions are written against.
///
/// A store holds whole documents addressed by [`DocPath`], assigns write
/// stamps, and pushes snapshots to per-document subscribers. The semantics
/// every implementation must honor:
///
/// - **Missing is not an error.** [`get`](DocumentStore::get) on an absent
///   document returns a snapshot with no body; errors mean the store itself
///   failed.
/// - **Writes replace.** [`set`](DocumentStore::set) replaces the whole
///   document. The one partial primitive is
///   [`merge_metadata`](DocumentStore::merge_metadata), which merges a
///   [`MetadataPatch`] into the metadata document field-by-field,
///   last write wins, creating the document if it is absent.
/// - **The store assigns stamps.** Every successful write stamps the stored
///   body via [`DocumentBody::stamp_with`] and returns the stamp.
/// - **Subscriptions start with now.** [`subscribe`](DocumentStore::subscribe)
///   delivers the current snapshot (existing or missing) before returning,
///   then one snapshot per subsequent write or delete of that document.
/// - **Deletes are idempotent**, and notify subscribers with a missing
///   snapshot.
/// - **The push path never fails.** A delivery that cannot produce a valid
///   body (a decode failure on a remote change, say) arrives as a missing
///   snapshot instead of panicking; observers treat "no data" as a valid
///   transient state.
///
/// # Errors
///
/// Fallible operations return [`ScorebookError::StoreError`] when the
/// backend fails and [`ScorebookError::SerializationError`] when a body
/// cannot be encoded or decoded. Failures are surfaced to the caller
/// unchanged; this layer never retries.
///
/// [`ScorebookError::StoreError`]: crate::ScorebookError::StoreError
/// [`ScorebookError::SerializationError`]: crate::ScorebookError::SerializationError
#[cfg(not(feature = "sync-send"))]
pub trait DocumentStore<T>
where
    T: Config,
{
    /// Reads the document at `path`.
    fn get(&self, path: &DocPath<T>) -> ScorebookResult<DocumentSnapshot<T>>;

    /// Replaces the document at `path` with `body`, creating it if absent.
    ///
    /// Implementations must reject a body that does not belong at `path`
    /// (wrong kind, or a leaf identity that disagrees with the path) with a
    /// store error, and must stamp the body before persisting it.
    fn set(&self, path: &DocPath<T>, body: DocumentBody<T>) -> ScorebookResult<WriteStamp>;

    /// Merges `patch` into the metadata document at `path`, creating the
    /// document from [`GameMetadata::default`] if it is absent.
    ///
    /// `path` must be a metadata path.
    fn merge_metadata(
        &self,
        path: &DocPath<T>,
        patch: MetadataPatch<T>,
    ) -> ScorebookResult<WriteStamp>;

    /// Deletes the document at `path`. Deleting an absent document is a
    /// successful no-op.
    fn delete(&self, path: &DocPath<T>) -> ScorebookResult<()>;

    /// Registers `observer` for snapshots of the document at `path`,
    /// delivering the current snapshot before returning.
    fn subscribe(
        &self,
        path: &DocPath<T>,
        observer: SnapshotObserver<T>,
    ) -> ScorebookResult<SubscriptionId>;

    /// Cancels a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);

    /// Lists every existing document in `collection`, in path order.
    fn list(&self, collection: &CollectionPath) -> ScorebookResult<Vec<DocumentSnapshot<T>>>;
}

// ###################
// # UNIT TESTS      #
// ###################
