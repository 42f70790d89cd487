//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - `test_utils`: the league fixture (config, teams, lineup), session
//!   constructors, and play-script helpers
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! mod common;
//! use common::test_utils::{tracker, LeagueConfig, BEARS, TIGERS};
//! // Or use the re-exported items:
//! use common::{tracker, BEARS};
//! ```

pub mod test_utils;

// Re-export commonly used items for convenience.
// These are public utilities for integration tests - allow unused until tests adopt them.
#[allow(unused_imports)]
pub use test_utils::{
    commit_play, cross_to_next_batting_half, lineup, scoreboard, scorekeeper, setup_logging,
    store_client, strikeouts, tracker, tracker_as, tracker_builder, LeagueConfig, BEARS, GAME,
    SEASON, TIGERS,
};
