//! Batting orders and roster entries.
//!
//! A [`BattingOrder`] is fixed once a tracked game starts: the engine never
//! edits it, only walks a [`LineupSlot`] forward on commit and backward on
//! undo. Substitutions in a rec league are handled the way paper scorebooks
//! handle them — the name stays in the slot.

use serde::{Deserialize, Serialize};

use crate::{LineupSlot, ScorebookError, ScorebookResult};

/// Fielding assignments for slow-pitch softball (four outfielders, plus an
/// extra hitter who bats without fielding).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldingPosition {
    /// Pitcher (P).
    Pitcher,
    /// Catcher (C).
    Catcher,
    /// First base (1B).
    FirstBase,
    /// Second base (2B).
    SecondBase,
    /// Third base (3B).
    ThirdBase,
    /// Shortstop (SS).
    Shortstop,
    /// Left field (LF).
    LeftField,
    /// Left-center field (LC).
    LeftCenter,
    /// Right-center field (RC).
    RightCenter,
    /// Right field (RF).
    RightField,
    /// Extra hitter (EH): bats, does not field.
    ExtraHitter,
}

impl FieldingPosition {
    /// The scorebook abbreviation for this position.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            FieldingPosition::Pitcher => "P",
            FieldingPosition::Catcher => "C",
            FieldingPosition::FirstBase => "1B",
            FieldingPosition::SecondBase => "2B",
            FieldingPosition::ThirdBase => "3B",
            FieldingPosition::Shortstop => "SS",
            FieldingPosition::LeftField => "LF",
            FieldingPosition::LeftCenter => "LC",
            FieldingPosition::RightCenter => "RC",
            FieldingPosition::RightField => "RF",
            FieldingPosition::ExtraHitter => "EH",
        }
    }
}

impl std::fmt::Display for FieldingPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// A roster entry in the batting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player<P> {
    /// Identity used on the bases and in play records.
    pub id: P,
    /// Display name.
    pub name: String,
    /// Jersey number.
    pub number: u8,
    /// Fielding assignment, if set.
    pub position: Option<FieldingPosition>,
}

impl<P> Player<P> {
    /// Creates a player with no fielding assignment.
    pub fn new(id: P, name: impl Into<String>, number: u8) -> Self {
        Player {
            id,
            name: name.into(),
            number,
            position: None,
        }
    }

    /// Sets the fielding assignment.
    #[must_use]
    pub fn with_position(mut self, position: FieldingPosition) -> Self {
        self.position = Some(position);
        self
    }
}

/// An ordered batting lineup, fixed for the duration of a tracked game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingOrder<P> {
    players: Vec<Player<P>>,
}

impl<P: PartialEq> BattingOrder<P> {
    /// Creates a batting order from an ordered player list.
    ///
    /// # Errors
    /// Returns [`ScorebookError::InvalidLineup`] when the list is empty or
    /// when two entries share an identity (a duplicated identity would make
    /// base occupancy ambiguous).
    pub fn new(players: Vec<Player<P>>) -> ScorebookResult<Self> {
        if players.is_empty() {
            return Err(ScorebookError::InvalidLineup {
                reason: "batting order must contain at least one player".to_owned(),
            });
        }
        for (ahead, player) in players.iter().enumerate() {
            if players
                .iter()
                .skip(ahead + 1)
                .any(|other| other.id == player.id)
            {
                return Err(ScorebookError::InvalidLineup {
                    reason: format!("duplicate player identity in slot {}", ahead),
                });
            }
        }
        Ok(BattingOrder { players })
    }

    /// The slot `id` bats in, if they are in the order.
    #[must_use]
    pub fn slot_of(&self, id: &P) -> Option<LineupSlot> {
        self.players
            .iter()
            .position(|player| &player.id == id)
            .map(LineupSlot::new)
    }
}

impl<P> BattingOrder<P> {
    /// Number of players in the order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if the order has no players.
    ///
    /// A constructed order is never empty; this exists for callers holding a
    /// deserialized document of unknown provenance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The player batting in `slot`, or `None` when the slot is out of range.
    #[must_use]
    pub fn player_at(&self, slot: LineupSlot) -> Option<&Player<P>> {
        self.players.get(slot.as_usize())
    }

    /// The identity of the player batting in `slot`.
    #[must_use]
    pub fn batter_id(&self, slot: LineupSlot) -> Option<&P> {
        self.player_at(slot).map(|player| &player.id)
    }

    /// Iterates the order from the leadoff slot down.
    pub fn iter(&self) -> impl Iterator<Item = &Player<P>> {
        self.players.iter()
    }
}

// ###################
// # UNIT TESTS      #
// ###################
