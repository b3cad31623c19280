//! Error types for board ingestion and snapshots.
//!
//! Scoring and pathfinding never fail: they report "nothing usable" through
//! `None` or an empty path. Only feeding malformed data into the board does.

use std::io;

use thiserror::Error;

use crate::board::{Coord, PlayerId};

/// Errors raised while building or updating a [`Grid`](crate::board::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Board dimensions must both be non-zero.
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
    /// Coordinate lies outside the board.
    #[error("coordinate ({},{}) is out of bounds", .0.x, .0.y)]
    OutOfBounds(Coord),
    /// Player id has no slot in the per-player tables.
    #[error("player id {0} exceeds the supported player count")]
    InvalidPlayer(PlayerId),
}

/// Errors raised while parsing a coordinate from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    /// Input was not two comma-separated values.
    #[error("expected \"x,y\", got '{0}'")]
    Format(String),
    /// One of the components was not a valid number.
    #[error("invalid coordinate component '{0}'")]
    Component(String),
}

/// Errors raised while loading, saving or replaying a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    /// Snapshot JSON was malformed.
    #[error("snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    /// Snapshot content did not fit the board it describes.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Result type for board mutations.
pub type BoardResult<T> = Result<T, BoardError>;
