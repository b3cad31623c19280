//! CLI command implementations for fogscout.

pub(crate) mod check;
pub(crate) mod path;
pub(crate) mod target;

mod output;

use clap::ValueEnum;
use fogscout::{Grid, Snapshot, SnapshotError, TargetWeights};
use std::error::Error;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Output format for query commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Load a snapshot and replay it into a board.
fn load_grid(path: &Path) -> Result<Grid, CliError> {
    let snapshot = Snapshot::load(path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))?;
    let grid = snapshot.to_grid()?;
    info!(
        width = grid.width(),
        height = grid.height(),
        turn = grid.turn(),
        player = grid.player_index(),
        "board replayed"
    );
    Ok(grid)
}

/// Default weights, or the ones in `path` if given.
fn load_weights(path: Option<&Path>) -> Result<TargetWeights, CliError> {
    match path {
        Some(path) => TargetWeights::load(path)
            .map_err(|e| CliError::new(format!("Failed to load weights {}: {e}", path.display()))),
        None => Ok(TargetWeights::default()),
    }
}
