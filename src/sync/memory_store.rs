//! The in-process reference implementation of [`DocumentStore`].
//!
//! [`MemoryStore`] keeps every document as encoded bytes behind one mutex, so
//! it behaves like a tiny remote database: reads decode a private copy,
//! writes replace whole documents and assign stamps, and the metadata merge
//! is atomic under the store lock. Two trackers and any number of
//! scoreboards share one store by cloning the handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::sync::codec;
use crate::sync::documents::{GameMetadata, MetadataPatch};
use crate::sync::store::{
    CollectionPath, DocPath, DocumentBody, DocumentSnapshot, DocumentStore, SnapshotObserver,
    SubscriptionId, WriteStamp,
};
use crate::{Config, ScorebookError, ScorebookResult};

struct Subscription<T>
where
    T: Config,
{
    id: SubscriptionId,
    path: DocPath<T>,
    observer: SnapshotObserver<T>,
}

struct Inner<T>
where
    T: Config,
{
    documents: BTreeMap<DocPath<T>, Vec<u8>>,
    subscriptions: Vec<Subscription<T>>,
    next_subscription: u64,
    clock_pin: Option<u64>,
}

impl<T> Inner<T>
where
    T: Config,
{
    fn stamp(&self) -> WriteStamp {
        WriteStamp::from_millis(self.clock_pin.unwrap_or_else(crate::unix_millis_now))
    }

    fn observers_of(&self, path: &DocPath<T>) -> Vec<SnapshotObserver<T>> {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.path == *path)
            .map(|subscription| Arc::clone(&subscription.observer))
            .collect()
    }
}

/// An in-memory document store.
///
/// Cloning yields another handle to the same store; documents, stamps, and
/// subscriptions are shared (see the [`Clone`] implementation). Observers are
/// invoked synchronously inside the triggering call, after the store lock is
/// released.
///
/// # Examples
///
/// ```
/// use scorebook::{
///     Config, DocPath, DocumentBody, DocumentStore, GameId, GameMetadata, MemoryStore, SeasonId,
/// };
///
/// struct LeagueConfig;
/// impl Config for LeagueConfig {
///     type PlayerId = String;
///     type TeamId = String;
///     type UserId = String;
/// }
///
/// let store = MemoryStore::<LeagueConfig>::new();
/// let path = DocPath::metadata(SeasonId::new("2025-fall"), GameId::new("opener"));
///
/// let stamp = store.set(&path, DocumentBody::Metadata(GameMetadata::default()))?;
/// let snapshot = store.get(&path)?;
/// let metadata = snapshot.body.and_then(DocumentBody::into_metadata);
/// assert_eq!(metadata.map(|m| m.last_updated_ms), Some(stamp.as_millis()));
/// # Ok::<(), scorebook::ScorebookError>(())
/// ```
pub struct MemoryStore<T>
where
    T: Config,
{
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> MemoryStore<T>
where
    T: Config,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(Mutex::new(Inner {
                documents: BTreeMap::new(),
                subscriptions: Vec::new(),
                next_subscription: 0,
                clock_pin: None,
            })),
        }
    }

    /// Pins the stamp clock to a fixed value.
    ///
    /// Every subsequent write is stamped with `millis` instead of the wall
    /// clock. Meant for tests and demos that need reproducible stamps or a
    /// scoreboard past its liveness window.
    pub fn pin_clock(&self, millis: u64) {
        self.inner.lock().clock_pin = Some(millis);
    }

    /// Number of live subscriptions, across every handle to this store.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.inner.lock().subscriptions.len()
    }

    fn notify(observers: &[SnapshotObserver<T>], snapshot: &DocumentSnapshot<T>) {
        for observer in observers {
            observer(snapshot.clone());
        }
    }
}

impl<T> Default for MemoryStore<T>
where
    T: Config,
{
    fn default() -> Self {
        MemoryStore::new()
    }
}

/// Clones share the underlying store rather than copying it.
impl<T> Clone for MemoryStore<T>
where
    T: Config,
{
    fn clone(&self) -> Self {
        MemoryStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> DocumentStore<T> for MemoryStore<T>
where
    T: Config,
{
    fn get(&self, path: &DocPath<T>) -> ScorebookResult<DocumentSnapshot<T>> {
        let bytes = {
            let inner = self.inner.lock();
            inner.documents.get(path).cloned()
        };
        match bytes {
            Some(bytes) => Ok(DocumentSnapshot {
                path: path.clone(),
                body: Some(codec::decode(&bytes)?),
            }),
            None => Ok(DocumentSnapshot::missing(path.clone())),
        }
    }

    fn set(&self, path: &DocPath<T>, body: DocumentBody<T>) -> ScorebookResult<WriteStamp> {
        if !body.matches_path(path) {
            return Err(ScorebookError::StoreError {
                context: format!("cannot write a {} body at {:?}", body.kind(), path),
            });
        }
        let mut body = body;
        let (stamp, observers) = {
            let mut inner = self.inner.lock();
            let stamp = inner.stamp();
            body.stamp_with(stamp);
            let bytes = codec::encode(&body)?;
            inner.documents.insert(path.clone(), bytes);
            (stamp, inner.observers_of(path))
        };
        trace!(path = ?path, stamp = stamp.as_millis(), "document written");
        Self::notify(
            &observers,
            &DocumentSnapshot {
                path: path.clone(),
                body: Some(body),
            },
        );
        Ok(stamp)
    }

    fn merge_metadata(
        &self,
        path: &DocPath<T>,
        patch: MetadataPatch<T>,
    ) -> ScorebookResult<WriteStamp> {
        if !matches!(path, DocPath::Metadata { .. }) {
            return Err(ScorebookError::StoreError {
                context: format!("merge targets a metadata document, got {:?}", path),
            });
        }
        // Read, patch, stamp, and write back under one lock: concurrent
        // merges serialize, so neither tracker can lose the other's fields.
        let (stamp, body, observers) = {
            let mut inner = self.inner.lock();
            let mut metadata = match inner.documents.get(path) {
                Some(bytes) => codec::decode::<DocumentBody<T>>(bytes)?
                    .into_metadata()
                    .ok_or_else(|| ScorebookError::StoreError {
                        context: format!("non-metadata body stored at {:?}", path),
                    })?,
                None => GameMetadata::default(),
            };
            patch.apply_to(&mut metadata);
            let mut body = DocumentBody::Metadata(metadata);
            let stamp = inner.stamp();
            body.stamp_with(stamp);
            let bytes = codec::encode(&body)?;
            inner.documents.insert(path.clone(), bytes);
            (stamp, body, inner.observers_of(path))
        };
        trace!(path = ?path, stamp = stamp.as_millis(), "metadata merged");
        Self::notify(
            &observers,
            &DocumentSnapshot {
                path: path.clone(),
                body: Some(body),
            },
        );
        Ok(stamp)
    }

    fn delete(&self, path: &DocPath<T>) -> ScorebookResult<()> {
        let observers = {
            let mut inner = self.inner.lock();
            if inner.documents.remove(path).is_none() {
                return Ok(());
            }
            inner.observers_of(path)
        };
        debug!(path = ?path, "document deleted");
        Self::notify(&observers, &DocumentSnapshot::missing(path.clone()));
        Ok(())
    }

    fn subscribe(
        &self,
        path: &DocPath<T>,
        observer: SnapshotObserver<T>,
    ) -> ScorebookResult<SubscriptionId> {
        let (id, snapshot) = {
            let mut inner = self.inner.lock();
            let body = match inner.documents.get(path) {
                Some(bytes) => Some(codec::decode::<DocumentBody<T>>(bytes)?),
                None => None,
            };
            let id = SubscriptionId::new(inner.next_subscription);
            inner.next_subscription += 1;
            inner.subscriptions.push(Subscription {
                id,
                path: path.clone(),
                observer: Arc::clone(&observer),
            });
            (
                id,
                DocumentSnapshot {
                    path: path.clone(),
                    body,
                },
            )
        };
        trace!(path = ?path, subscription = id.as_u64(), "subscription opened");
        observer(snapshot);
        Ok(id)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        let mut inner = self.inner.lock();
        inner
            .subscriptions
            .retain(|entry| entry.id != subscription);
    }

    fn list(&self, collection: &CollectionPath) -> ScorebookResult<Vec<DocumentSnapshot<T>>> {
        let entries: Vec<(DocPath<T>, Vec<u8>)> = {
            let inner = self.inner.lock();
            inner
                .documents
                .iter()
                .filter(|(path, _)| collection.contains(path))
                .map(|(path, bytes)| (path.clone(), bytes.clone()))
                .collect()
        };
        let mut snapshots = Vec::with_capacity(entries.len());
        for (path, bytes) in entries {
            snapshots.push(DocumentSnapshot {
                path,
                body: Some(codec::decode(&bytes)?),
            });
        }
        Ok(snapshots)
    }
}

// ###################
// # UNIT TESTS      #
// ###################
