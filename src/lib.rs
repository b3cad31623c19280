// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Fogscout: attack planning for territory-capture games under fog of war.
//!
//! This crate tracks one player's view of the board and answers two
//! questions for that player:
//! - Which distant tile is worth attacking next
//! - Which path, if followed, actually captures it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Snapshot replay / CLI             │
//! ├─────────────────────────────────────┤
//! │   Scout (targets, pathfinding)      │
//! ├─────────────────────────────────────┤
//! │   Board (tiles, fog-aware updates)  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Observations for a turn are applied first through [`Grid::update`]; the
//! scout queries only read the resulting snapshot.

pub mod board;
pub mod error;
pub mod scout;
pub mod snapshot;

pub use error::{BoardError, BoardResult, ParseCoordError, SnapshotError};

// Re-export key board types at crate root for convenience
pub use board::{Classification, Coord, Grid, Observation, PlayerId, Tile, TileKind};
pub use scout::TargetWeights;
pub use snapshot::{Snapshot, TileObservation, TurnBatch};
