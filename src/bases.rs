//! Base occupancy for the half-inning currently being tracked.
//!
//! [`BaseState`] is the single source of truth for who stands where. It is
//! deliberately dumb: it knows nothing about play types or forced advances
//! (that is the resolver's job) and nothing about outs or innings (that is
//! the game state's job). It only answers "who is on which base" and moves
//! identities between slots.

use serde::{Deserialize, Serialize};

use crate::Base;

/// Which runner, if any, stands on each of the three bases.
///
/// The type parameter `P` is the runner identity type (a session's
/// [`Config::PlayerId`](crate::Config::PlayerId)). A runner identity should
/// appear on at most one base at a time; the scoring engine maintains that
/// invariant, and [`duplicate_runner`](BaseState::duplicate_runner) exposes a
/// check for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseState<P> {
    first: Option<P>,
    second: Option<P>,
    third: Option<P>,
}

impl<P> BaseState<P> {
    /// Creates a base state with all bases empty.
    #[must_use]
    pub const fn empty() -> Self {
        BaseState {
            first: None,
            second: None,
            third: None,
        }
    }

    /// Shared access to the slot for `base`.
    fn slot(&self, base: Base) -> &Option<P> {
        match base {
            Base::First => &self.first,
            Base::Second => &self.second,
            Base::Third => &self.third,
        }
    }

    /// Mutable access to the slot for `base`.
    fn slot_mut(&mut self, base: Base) -> &mut Option<P> {
        match base {
            Base::First => &mut self.first,
            Base::Second => &mut self.second,
            Base::Third => &mut self.third,
        }
    }

    /// The runner standing on `base`, if any.
    #[inline]
    #[must_use]
    pub fn runner_on(&self, base: Base) -> Option<&P> {
        self.slot(base).as_ref()
    }

    /// Returns `true` if `base` is occupied.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, base: Base) -> bool {
        self.slot(base).is_some()
    }

    /// Places `runner` on `base`, returning whoever was displaced.
    ///
    /// The caller decides what a displaced occupant means: the resolver never
    /// displaces anyone, while manual placement deliberately overwrites (last
    /// write wins) and reports the displaced runner through the telemetry
    /// warning path.
    pub fn set_runner(&mut self, base: Base, runner: P) -> Option<P> {
        self.slot_mut(base).replace(runner)
    }

    /// Removes and returns the runner on `base`, leaving it empty.
    pub fn take_runner(&mut self, base: Base) -> Option<P> {
        self.slot_mut(base).take()
    }

    /// Empties all three bases.
    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
        self.third = None;
    }

    /// Number of occupied bases (0–3).
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        usize::from(self.first.is_some())
            + usize::from(self.second.is_some())
            + usize::from(self.third.is_some())
    }

    /// Returns `true` if no base is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Returns `true` if all three bases are occupied.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.occupied_count() == Base::COUNT
    }

    /// Iterates over occupied bases from first to third.
    pub fn iter(&self) -> impl Iterator<Item = (Base, &P)> {
        Base::ALL
            .iter()
            .filter_map(move |&base| self.runner_on(base).map(|runner| (base, runner)))
    }
}

impl<P: PartialEq> BaseState<P> {
    /// The base `runner` currently stands on, if any.
    #[must_use]
    pub fn position_of(&self, runner: &P) -> Option<Base> {
        Base::ALL
            .into_iter()
            .find(|&base| self.runner_on(base) == Some(runner))
    }

    /// Returns `true` if `runner` stands on any base.
    #[must_use]
    pub fn contains(&self, runner: &P) -> bool {
        self.position_of(runner).is_some()
    }

    /// Returns a runner that appears on more than one base, if any.
    ///
    /// A non-empty answer means the occupancy invariant was broken by manual
    /// placement; see [`InvariantChecker`](crate::telemetry::InvariantChecker).
    #[must_use]
    pub fn duplicate_runner(&self) -> Option<&P> {
        for (ahead, (_, runner)) in self.iter().enumerate() {
            if self
                .iter()
                .skip(ahead + 1)
                .any(|(_, other)| other == runner)
            {
                return Some(runner);
            }
        }
        None
    }
}

impl<P> Default for BaseState<P> {
    fn default() -> Self {
        BaseState::empty()
    }
}

// ###################
// # UNIT TESTS      #
// ###################
