//! Output formatting utilities for CLI.

use fogscout::{Coord, Grid, TileKind};
use serde::Serialize;

/// JSON-serializable target ranking.
#[derive(Debug, Serialize)]
pub(super) struct JsonTargets {
    /// Attacking tile.
    pub(super) from: Coord,
    /// Army on the attacking tile.
    pub(super) army: u32,
    /// Candidates, best first.
    pub(super) targets: Vec<JsonCandidate>,
}

/// JSON-serializable target candidate.
#[derive(Debug, Serialize)]
pub(super) struct JsonCandidate {
    /// Candidate tile.
    pub(super) coord: Coord,
    /// Heuristic score (lower is better).
    pub(super) score: f64,
    /// Last known army.
    pub(super) army: u32,
    /// Known kind.
    pub(super) kind: TileKind,
}

/// JSON-serializable path.
#[derive(Debug, Serialize)]
pub(super) struct JsonPath {
    /// Start tile.
    pub(super) from: Coord,
    /// Destination (null if no target was found).
    pub(super) to: Option<Coord>,
    /// Tiles from start to destination, empty if infeasible.
    pub(super) path: Vec<Coord>,
}

impl JsonCandidate {
    /// Create from a ranked coordinate.
    pub(super) fn new(grid: &Grid, coord: Coord, score: f64) -> Self {
        let (army, kind) = grid
            .tile(coord)
            .map_or((0, TileKind::Fog), |t| (t.army(), t.kind()));
        Self {
            coord,
            score,
            army,
            kind,
        }
    }
}

/// Describe a tile kind for text output.
pub(super) fn describe_kind(kind: TileKind) -> String {
    match kind {
        TileKind::Fog => "fog".to_string(),
        TileKind::Obstacle => "obstacle".to_string(),
        TileKind::Mountain => "mountain".to_string(),
        TileKind::Empty => "empty".to_string(),
        TileKind::Player(id) => format!("player {id}"),
    }
}

/// Format a ranking as human-readable text.
pub(super) fn format_targets(targets: &JsonTargets) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Targets for {} (army {})\n",
        targets.from, targets.army
    ));
    if targets.targets.is_empty() {
        output.push_str("  No feasible target\n");
    }
    for (rank, candidate) in targets.targets.iter().enumerate() {
        output.push_str(&format!(
            "  {:>2}. {:<10} score {:>9.3}  army {:>5}  {}\n",
            rank + 1,
            candidate.coord.to_string(),
            candidate.score,
            candidate.army,
            describe_kind(candidate.kind)
        ));
    }

    output
}

/// Format a path as human-readable text.
pub(super) fn format_path(path: &JsonPath) -> String {
    let Some(to) = path.to else {
        return format!("No target reachable from {}\n", path.from);
    };
    if path.path.is_empty() {
        return format!("No feasible path from {} to {to}\n", path.from);
    }
    let hops: Vec<String> = path.path.iter().map(ToString::to_string).collect();
    format!(
        "Path from {} to {to} ({} moves)\n  {}\n",
        path.from,
        path.path.len() - 1,
        hops.join(" -> ")
    )
}
