//! Convenient re-exports for common usage.
//!
//! This module provides a "prelude" that re-exports the most commonly used types
//! from Scorebook, allowing you to import them all at once.
//!
//! # Usage
//!
//! ```rust
//! use scorebook::prelude::*;
//! ```
//!
//! # What's Included
//!
//! The prelude includes:
//!
//! - **Session types**: [`TrackerSession`], [`ScoreboardSession`], [`SessionBuilder`]
//! - **Core traits**: [`Config`], [`DocumentStore`]
//! - **Store implementations**: [`MemoryStore`]
//! - **Fundamental types**: [`Inning`], [`Half`], [`Base`], [`AdvanceTarget`], [`GamePhase`], [`OUTS_PER_HALF`]
//! - **Scoring**: [`PlayType`], [`PlayRecord`], [`PendingPlay`], [`RunnerMoveCommand`], [`MoveEffect`], [`SelectOutcome`]
//! - **Game state**: [`GameState`], [`BaseState`], [`BattingOrder`], [`Player`], [`LineupSlot`]
//! - **Event handling**: [`TrackerEvent`], [`EventDrain`]
//! - **Error handling**: [`ScorebookError`], [`ScorebookResult`]
//! - **Synchronization**: [`SyncClient`], [`GameMetadata`], [`MetadataPatch`], [`TeamGameDoc`], [`PresenceRecord`], [`SeasonId`], [`GameId`]
//! - **Access control**: [`UserProfile`], [`Role`]
//!
//! # Example
//!
//! ```rust
//! use scorebook::prelude::*;
//!
//! // Create the config marker struct, naming your league's id types.
//! struct LeagueConfig;
//!
//! impl Config for LeagueConfig {
//!     type PlayerId = String;
//!     type TeamId = String;
//!     type UserId = String;
//! }
//! ```

// Core session types
pub use crate::sessions::builder::SessionBuilder;
pub use crate::sessions::scoreboard_session::ScoreboardSession;
pub use crate::sessions::tracker_session::{SelectOutcome, TrackerSession};

// Core traits
pub use crate::{Config, DocumentStore};

// Standard store implementation
pub use crate::MemoryStore;

// Fundamental types and constants
pub use crate::{AdvanceTarget, Base, GamePhase, Half, Inning, LineupSlot, OUTS_PER_HALF};

// Scoring and play resolution
pub use crate::{MoveEffect, PendingPlay, PlayRecord, PlayType, RunnerMoveCommand};

// Game state management
pub use crate::{BaseState, BattingOrder, GameState, Player};

// Event handling
pub use crate::{EventDrain, TrackerEvent};

// Error handling
pub use crate::{ScorebookError, ScorebookResult};

// Document synchronization
pub use crate::{
    GameId, GameMetadata, MetadataPatch, PresenceRecord, SeasonId, SyncClient, TeamGameDoc,
};

// Access control
pub use crate::{Role, UserProfile};
