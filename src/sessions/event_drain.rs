use std::collections::vec_deque::IntoIter;
use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::{Config, TrackerEvent};

/// An opaque iterator over the events a session has queued since the last
/// drain.
///
/// This type wraps the drained queue without exposing the collection type,
/// providing a stable public API. It implements [`Iterator`],
/// [`DoubleEndedIterator`], [`ExactSizeIterator`], and [`FusedIterator`].
///
/// Obtain an `EventDrain` by calling [`TrackerSession::events()`] or
/// [`ScoreboardSession::events()`]. Subscription callbacks keep queueing
/// while you iterate; anything queued after the drain was taken shows up in
/// the next one.
///
/// # Examples
///
/// ```ignore
/// for event in session.events() {
///     match event {
///         TrackerEvent::SideRetired { inning, .. } => {
///             println!("three outs in inning {inning}; confirm the switch");
///         }
///         _ => { /* handle other events */ }
///     }
/// }
/// ```
///
/// [`TrackerSession::events()`]: crate::TrackerSession::events
/// [`ScoreboardSession::events()`]: crate::ScoreboardSession::events
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct EventDrain<T: Config> {
    inner: IntoIter<TrackerEvent<T>>,
}

impl<T: Config> EventDrain<T> {
    pub(crate) fn from_queue(queue: VecDeque<TrackerEvent<T>>) -> Self {
        Self {
            inner: queue.into_iter(),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn empty() -> Self {
        Self::from_queue(VecDeque::new())
    }
}

impl<T: Config> Iterator for EventDrain<T> {
    type Item = TrackerEvent<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Config> DoubleEndedIterator for EventDrain<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T: Config> ExactSizeIterator for EventDrain<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: Config> FusedIterator for EventDrain<T> {}

impl<T: Config> std::fmt::Debug for EventDrain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDrain")
            .field("remaining", &self.len())
            .finish()
    }
}
