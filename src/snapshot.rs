//! JSON snapshots of a board and the observations that built it.
//!
//! A snapshot is the static board setup plus a list of per-turn observation
//! batches. Replaying it through [`Grid::update`] reproduces the board, so
//! the fog-of-war memory is rebuilt exactly as it was live.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Coord, Grid, Observation, PlayerId, TileKind};
use crate::error::SnapshotError;

/// One observed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileObservation {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Observed kind.
    pub kind: TileKind,
    /// Observed army.
    #[serde(default)]
    pub army: u32,
    /// Reported as a city.
    #[serde(default)]
    pub city: bool,
    /// Reported as a general.
    #[serde(default)]
    pub general: bool,
}

impl TileObservation {
    /// Coordinate of the observed tile.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// The observation as applied to a tile.
    #[must_use]
    pub const fn observation(&self) -> Observation {
        Observation {
            kind: self.kind,
            army: self.army,
            city: self.city,
            general: self.general,
        }
    }
}

/// All observations received for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnBatch {
    /// Turn the batch belongs to.
    pub turn: u32,
    /// Observations in arrival order.
    pub observations: Vec<TileObservation>,
}

/// A board setup plus its observation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Board width.
    pub width: u16,
    /// Board height.
    pub height: u16,
    /// The player the board is tracked for.
    pub player_index: PlayerId,
    /// Players never to attack.
    #[serde(default)]
    pub do_not_attack: Vec<PlayerId>,
    /// Swamp tiles.
    #[serde(default)]
    pub swamps: Vec<Coord>,
    /// Observation batches, applied in order.
    #[serde(default)]
    pub turns: Vec<TurnBatch>,
}

impl Snapshot {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Build the board and replay every batch in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid or any observation is
    /// rejected by the board.
    pub fn to_grid(&self) -> Result<Grid, SnapshotError> {
        let mut grid = Grid::new(self.width, self.height, self.player_index)?;
        grid.set_do_not_attack(self.do_not_attack.iter().copied());
        for &coord in &self.swamps {
            grid.set_swamp(coord, true)?;
        }

        for batch in &self.turns {
            let observations: Vec<(Coord, Observation)> = batch
                .observations
                .iter()
                .map(|o| (o.coord(), o.observation()))
                .collect();
            let captures = grid.apply_turn(batch.turn, &observations)?;
            debug!(turn = batch.turn, observations = observations.len(), captures, "replayed turn");
        }

        Ok(grid)
    }

    /// Record what `grid` currently knows.
    ///
    /// Tiles the local player holds or held are replayed as held on their
    /// `turn_held` (turn 0 included), so reachability survives the round
    /// trip. Capture turns of other tiles collapse onto the board's current
    /// turn.
    #[must_use]
    pub fn capture(grid: &Grid) -> Self {
        let local = TileKind::Player(grid.player_index());
        let mut batches: BTreeMap<u32, Vec<TileObservation>> = BTreeMap::new();
        batches.entry(grid.turn()).or_default();

        for (coord, tile) in grid.iter() {
            let observed = |kind: TileKind, army: u32| TileObservation {
                x: coord.x,
                y: coord.y,
                kind,
                army,
                city: tile.is_city(),
                general: tile.is_general(),
            };

            if tile.turn_held() > 0 && tile.kind() != local {
                batches
                    .entry(tile.turn_held())
                    .or_default()
                    .push(TileObservation {
                        general: false,
                        ..observed(local, 0)
                    });
            }
            if tile.kind() == local {
                batches
                    .entry(tile.turn_held())
                    .or_default()
                    .push(observed(local, tile.army()));
            } else if tile.kind().is_discovered() || tile.turn_held() > 0 {
                batches
                    .entry(grid.turn().max(tile.turn_held()))
                    .or_default()
                    .push(observed(tile.kind(), tile.army()));
            }
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            player_index: grid.player_index(),
            do_not_attack: grid.do_not_attack().iter().copied().collect(),
            swamps: grid
                .iter()
                .filter(|(_, t)| t.is_swamp())
                .map(|(c, _)| c)
                .collect(),
            turns: batches
                .into_iter()
                .map(|(turn, observations)| TurnBatch { turn, observations })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "width": 3,
        "height": 1,
        "player_index": 0,
        "do_not_attack": [2],
        "swamps": [{"x": 2, "y": 0}],
        "turns": [
            {"turn": 1, "observations": [
                {"x": 0, "y": 0, "kind": {"player": 0}, "army": 4, "general": true},
                {"x": 1, "y": 0, "kind": "empty"}
            ]},
            {"turn": 2, "observations": [
                {"x": 2, "y": 0, "kind": {"player": 1}, "army": 3}
            ]}
        ]
    }"#;

    #[test]
    fn test_sample_replays() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        let grid = snapshot.to_grid().unwrap();

        assert_eq!(grid.turn(), 2);
        assert_eq!(grid.general(0), Some(Coord::new(0, 0)));
        assert!(grid.do_not_attack().contains(&2));
        let swamp = grid.tile(Coord::new(2, 0)).unwrap();
        assert!(swamp.is_swamp());
        assert_eq!(swamp.kind(), TileKind::Player(1));
        assert_eq!(swamp.turn_captured(), 2);
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let text = r#"{"width": 2, "height": 2, "player_index": 0,
            "turns": [{"turn": 1, "observations": [{"x": 5, "y": 0, "kind": "empty"}]}]}"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert!(matches!(
            snapshot.to_grid(),
            Err(SnapshotError::Board(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Snapshot::from_json("{\"width\": 3"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");

        snapshot.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_capture_preserves_knowledge() {
        let mut grid = Grid::new(4, 2, 0).unwrap();
        grid.set_swamp(Coord::new(3, 1), true).unwrap();
        grid.update(Coord::new(0, 1), &Observation::new(TileKind::Player(0), 3))
            .unwrap();
        grid.set_turn(1);
        grid.update(Coord::new(0, 0), &Observation::new(TileKind::Player(0), 5).general())
            .unwrap();
        grid.update(Coord::new(1, 0), &Observation::new(TileKind::Player(0), 2))
            .unwrap();
        grid.set_turn(4);
        grid.update(Coord::new(1, 0), &Observation::new(TileKind::Player(1), 7))
            .unwrap();
        grid.update(Coord::new(2, 1), &Observation::new(TileKind::Empty, 40).city())
            .unwrap();
        grid.update(Coord::new(3, 0), &Observation::new(TileKind::Mountain, 0))
            .unwrap();

        let rebuilt = Snapshot::capture(&grid).to_grid().unwrap();
        for ((coord, a), (_, b)) in grid.iter().zip(rebuilt.iter()) {
            assert_eq!(a.kind(), b.kind(), "kind at {coord}");
            assert_eq!(a.army(), b.army(), "army at {coord}");
            assert_eq!(a.classification(), b.classification(), "class at {coord}");
            assert_eq!(a.turn_held(), b.turn_held(), "held at {coord}");
            assert_eq!(a.is_swamp(), b.is_swamp(), "swamp at {coord}");
        }
        // Owned since turn 0, so never counted as held.
        assert_eq!(rebuilt.tile(Coord::new(0, 1)).unwrap().turn_held(), 0);
        assert_eq!(rebuilt.turn(), 4);
        assert_eq!(rebuilt.owned_by(1), grid.owned_by(1));
        assert_eq!(rebuilt.cities(), grid.cities());
    }
}
