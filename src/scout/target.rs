//! Attack-target selection.
//!
//! Every tile on the board is scored against the attacking tile and the
//! lowest score wins. The score starts as the Manhattan distance and is then
//! stretched or shrunk by the [`TargetWeights`] multipliers, so a general
//! four tiles out can beat empty ground next door.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::trace;

use crate::board::{Classification, Coord, Grid, Tile, TileKind};
use crate::scout::TargetWeights;

/// Score a candidate for an attacker with `attacker_army` (lower is better).
///
/// Pure formula: feasibility filtering is the caller's job.
#[must_use]
pub fn score_target(attacker_army: u32, tile: &Tile, distance: u32, weights: &TargetWeights) -> f64 {
    let army = f64::from(tile.army());
    // A zero-army attacker is treated as one so the ratios stay finite.
    let attacker = f64::from(attacker_army.max(1));
    let mut score = f64::from(distance);

    match tile.classification() {
        Classification::General(_) => score *= weights.general,
        Classification::City => {
            let cost = army / (weights.city_divisor * attacker);
            score *= cost.clamp(weights.city_min, weights.city_max);
        }
        Classification::Plain => {
            if tile.kind() == TileKind::Empty {
                score *= weights.empty;
            }
        }
    }

    if tile.army() > attacker_army {
        score *= weights.stronger * army / attacker;
    }

    if tile.is_swamp() {
        score *= weights.swamp;
        if tile.turn_held() > 0 {
            score *= weights.held_swamp;
        }
    }

    score
}

/// The tile of `path` closest to `from`; the earliest one wins ties.
#[must_use]
pub fn nearest_tile_in_path(from: Coord, path: &[Coord]) -> Option<Coord> {
    path.iter().copied().min_by_key(|c| from.distance_to(*c))
}

/// Order candidates by score, then by row-major scan position.
fn by_score_then_index(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

impl Grid {
    /// Score `tile` as a target for `attacker`, or `None` if it is not a
    /// feasible target at all.
    ///
    /// Infeasible means unreachable as far as we know, ours or an ally's, or
    /// guarded by more than the weights' army cap.
    #[must_use]
    pub fn target_score(&self, attacker: &Tile, tile: &Tile, weights: &TargetWeights) -> Option<f64> {
        let coord = tile.coord();
        if !self.is_valid_target(coord)
            || self.should_not_attack(coord)
            || tile.army() > weights.max_target_army(attacker.army())
        {
            return None;
        }
        let score = score_target(attacker.army(), tile, attacker.distance_to(tile), weights);
        (score < weights.score_ceiling).then_some(score)
    }

    /// `(score, scan index)` of every feasible target, evaluated in parallel.
    fn candidates<'a>(
        &'a self,
        attacker: &'a Tile,
        weights: &'a TargetWeights,
    ) -> impl ParallelIterator<Item = (f64, usize)> + 'a {
        self.tiles()
            .par_iter()
            .enumerate()
            .filter_map(move |(idx, tile)| {
                self.target_score(attacker, tile, weights).map(|s| (s, idx))
            })
    }

    /// Best attack target for the tile at `from`, using default weights.
    #[must_use]
    pub fn nearest_target_tile(&self, from: Coord) -> Option<Coord> {
        self.nearest_target_tile_with(from, &TargetWeights::default())
    }

    /// Best attack target for the tile at `from`.
    ///
    /// Ties go to the first tile in row-major order. Returns `None` when
    /// nothing on the board passes the feasibility filter.
    #[must_use]
    pub fn nearest_target_tile_with(&self, from: Coord, weights: &TargetWeights) -> Option<Coord> {
        let attacker = self.tile(from)?;
        let best = self.candidates(attacker, weights).min_by(by_score_then_index);

        trace!(%from, ?best, "target scan finished");
        best.map(|(_, idx)| self.tiles()[idx].coord())
    }

    /// Every feasible target for the tile at `from`, best first.
    #[must_use]
    pub fn ranked_targets(&self, from: Coord, weights: &TargetWeights) -> Vec<(Coord, f64)> {
        let Some(attacker) = self.tile(from) else {
            return Vec::new();
        };
        let mut candidates: Vec<_> = self.candidates(attacker, weights).collect();
        candidates.sort_by(by_score_then_index);
        candidates
            .into_iter()
            .map(|(score, idx)| (self.tiles()[idx].coord(), score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Observation;

    const EPS: f64 = 1e-9;

    /// A 6x1 strip: our tile at x=0, a held tile at x=1, targets beyond.
    fn strip() -> Grid {
        let mut grid = Grid::new(6, 1, 0).unwrap();
        grid.set_turn(1);
        grid.update(Coord::new(0, 0), &Observation::new(TileKind::Player(0), 5))
            .unwrap();
        grid.update(Coord::new(1, 0), &Observation::new(TileKind::Player(0), 1))
            .unwrap();
        grid
    }

    fn lone_tile(observation: Observation) -> Tile {
        let mut grid = Grid::new(1, 1, 0).unwrap();
        grid.update(Coord::new(0, 0), &observation).unwrap();
        *grid.tile(Coord::new(0, 0)).unwrap()
    }

    #[test]
    fn test_score_general() {
        let tile = lone_tile(Observation::new(TileKind::Player(1), 1).general());
        let score = score_target(5, &tile, 4, &TargetWeights::default());
        assert!((score - 0.36).abs() < EPS);
    }

    #[test]
    fn test_score_city_clamped() {
        let weights = TargetWeights::default();
        let cheap = lone_tile(Observation::new(TileKind::Empty, 0).city());
        assert!((score_target(10, &cheap, 2, &weights) - 2.0 * 0.17).abs() < EPS);

        let mid = lone_tile(Observation::new(TileKind::Empty, 32).city());
        // 32 / (3.2 * 10) = 1.0, then 32 > 10 adds 1.5 * 32 / 10
        assert!((score_target(10, &mid, 2, &weights) - 2.0 * 1.0 * 4.8).abs() < EPS);
    }

    #[test]
    fn test_score_empty_and_swamp() {
        let weights = TargetWeights::default();
        let empty = lone_tile(Observation::new(TileKind::Empty, 0));
        assert!((score_target(5, &empty, 1, &weights) - 4.3).abs() < EPS);

        let mut grid = Grid::new(1, 1, 0).unwrap();
        grid.set_swamp(Coord::new(0, 0), true).unwrap();
        grid.set_turn(3);
        grid.update(Coord::new(0, 0), &Observation::new(TileKind::Player(0), 0))
            .unwrap();
        let held_swamp = *grid.tile(Coord::new(0, 0)).unwrap();
        assert!((score_target(5, &held_swamp, 1, &weights) - 200.0).abs() < EPS);
    }

    #[test]
    fn test_score_zero_army_attacker_is_finite() {
        let tile = lone_tile(Observation::new(TileKind::Empty, 4).city());
        assert!(score_target(0, &tile, 3, &TargetWeights::default()).is_finite());
    }

    #[test]
    fn test_unreachable_general_is_skipped() {
        let mut grid = strip();
        grid.update(Coord::new(2, 0), &Observation::new(TileKind::Empty, 0))
            .unwrap();
        grid.update(Coord::new(3, 0), &Observation::new(TileKind::Player(1), 1).general())
            .unwrap();
        // Only (2,0) borders held land, so the general is not yet reachable.
        assert_eq!(grid.nearest_target_tile(Coord::new(0, 0)), Some(Coord::new(2, 0)));
    }

    #[test]
    fn test_army_cap_and_allies() {
        let mut grid = strip();
        grid.set_do_not_attack([2]);
        grid.update(Coord::new(2, 0), &Observation::new(TileKind::Player(2), 1))
            .unwrap();
        assert_eq!(grid.nearest_target_tile(Coord::new(0, 0)), None);

        let mut grid = strip();
        grid.update(Coord::new(2, 0), &Observation::new(TileKind::Player(1), 25))
            .unwrap();
        assert_eq!(grid.nearest_target_tile(Coord::new(0, 0)), None);

        grid.update(Coord::new(2, 0), &Observation::new(TileKind::Player(1), 24))
            .unwrap();
        assert_eq!(grid.nearest_target_tile(Coord::new(0, 0)), Some(Coord::new(2, 0)));
    }

    #[test]
    fn test_ties_go_to_scan_order() {
        let mut grid = Grid::new(3, 3, 0).unwrap();
        grid.set_turn(1);
        grid.update(Coord::new(1, 1), &Observation::new(TileKind::Player(0), 5))
            .unwrap();
        for c in [Coord::new(1, 0), Coord::new(0, 1), Coord::new(2, 1), Coord::new(1, 2)] {
            grid.update(c, &Observation::new(TileKind::Empty, 0)).unwrap();
        }
        assert_eq!(grid.nearest_target_tile(Coord::new(1, 1)), Some(Coord::new(1, 0)));

        let ranked = grid.ranked_targets(Coord::new(1, 1), &TargetWeights::default());
        let order: Vec<Coord> = ranked.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![Coord::new(1, 0), Coord::new(0, 1), Coord::new(2, 1), Coord::new(1, 2)]
        );
    }

    #[test]
    fn test_unknown_attacker() {
        let grid = strip();
        assert_eq!(grid.nearest_target_tile(Coord::new(9, 9)), None);
        assert!(grid.ranked_targets(Coord::new(9, 9), &TargetWeights::default()).is_empty());
    }

    #[test]
    fn test_nearest_tile_in_path() {
        let path = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0), Coord::new(2, 1)];
        assert_eq!(nearest_tile_in_path(Coord::new(3, 0), &path), Some(Coord::new(2, 0)));
        assert_eq!(nearest_tile_in_path(Coord::new(1, 1), &path), Some(Coord::new(1, 0)));
        assert_eq!(nearest_tile_in_path(Coord::new(1, 1), &[]), None);
    }
}
