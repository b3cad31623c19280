//! The board as seen by one player.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::board::{Coord, MAX_PLAYERS, Observation, PlayerId, Tile, TileKind, TurnContext};
use crate::error::{BoardError, BoardResult};

/// Outcome of applying a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Kind before the update.
    pub previous: TileKind,
    /// Kind after the update.
    pub current: TileKind,
}

impl UpdateOutcome {
    /// Whether the tile changed hands.
    #[must_use]
    pub fn captured(&self) -> bool {
        self.previous != self.current
    }
}

/// Fog-of-war board tracked for a single local player.
///
/// Owns every tile plus the per-owner index lists, the general registry and
/// the city list. [`Grid::update`] is the only way any of them change.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Width of the board in tiles.
    width: u16,
    /// Height of the board in tiles.
    height: u16,
    /// Current turn.
    turn: u32,
    /// The player this board is tracked for.
    player_index: PlayerId,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
    /// Coordinates owned by each player, in capture order.
    owned: Vec<Vec<Coord>>,
    /// Known general position per player.
    generals: [Option<Coord>; MAX_PLAYERS],
    /// Every tile ever reported as a city.
    cities: Vec<Coord>,
    /// Players that must never be attacked.
    do_not_attack: BTreeSet<PlayerId>,
}

impl Grid {
    /// Create a fogged board.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or `player_index` has no
    /// player slot.
    pub fn new(width: u16, height: u16, player_index: PlayerId) -> BoardResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Self::check_player(player_index)?;

        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(Coord::new(x, y))))
            .collect();

        let mut grid = Self {
            width,
            height,
            turn: 0,
            player_index,
            tiles,
            owned: vec![Vec::new(); MAX_PLAYERS],
            generals: [None; MAX_PLAYERS],
            cities: Vec::new(),
            do_not_attack: BTreeSet::new(),
        };
        grid.rebuild_neighbors();
        Ok(grid)
    }

    fn check_player(player: PlayerId) -> BoardResult<()> {
        if usize::from(player) < MAX_PLAYERS {
            Ok(())
        } else {
            Err(BoardError::InvalidPlayer(player))
        }
    }

    /// Recompute every tile's cached neighbor list.
    pub fn rebuild_neighbors(&mut self) {
        let (width, height) = (self.width, self.height);
        for tile in &mut self.tiles {
            tile.set_neighbors(width, height);
        }
    }

    /// Get the width of the board.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Current turn.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Set the current turn.
    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Advance to the next turn, saturating at `u32::MAX`.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
    }

    /// The player this board is tracked for.
    #[must_use]
    pub const fn player_index(&self) -> PlayerId {
        self.player_index
    }

    /// Check if a coordinate is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the tiles array.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.index_of(coord).map(|idx| &self.tiles[idx])
    }

    /// All tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over all coordinates and tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        self.tiles.iter().map(|tile| (tile.coord(), tile))
    }

    /// Tiles currently recorded as owned by `player`, in capture order.
    #[must_use]
    pub fn owned_by(&self, player: PlayerId) -> &[Coord] {
        self.owned
            .get(usize::from(player))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every tile ever reported as a city.
    #[must_use]
    pub fn cities(&self) -> &[Coord] {
        &self.cities
    }

    /// Known general of `player`.
    #[must_use]
    pub fn general(&self, player: PlayerId) -> Option<Coord> {
        self.generals.get(usize::from(player)).copied().flatten()
    }

    /// Players the local player must never attack.
    #[must_use]
    pub fn do_not_attack(&self) -> &BTreeSet<PlayerId> {
        &self.do_not_attack
    }

    /// Replace the do-not-attack set.
    pub fn set_do_not_attack(&mut self, players: impl IntoIterator<Item = PlayerId>) {
        self.do_not_attack = players.into_iter().collect();
    }

    /// Mark or unmark a tile as swamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate is out of bounds.
    pub fn set_swamp(&mut self, coord: Coord, is_swamp: bool) -> BoardResult<()> {
        let idx = self.index_of(coord).ok_or(BoardError::OutOfBounds(coord))?;
        self.tiles[idx].set_swamp(is_swamp);
        Ok(())
    }

    /// Manhattan distance between two coordinates.
    #[must_use]
    pub fn distance(&self, from: Coord, to: Coord) -> u32 {
        from.distance_to(to)
    }

    /// Apply one observation to the tile at `coord`.
    ///
    /// Ownership lists, the general registry and the city list are kept in
    /// step with the tile.
    ///
    /// # Errors
    ///
    /// Returns an error, without touching the board, if the coordinate is out
    /// of bounds or the observation names a player without a slot.
    pub fn update(&mut self, coord: Coord, observation: &Observation) -> BoardResult<UpdateOutcome> {
        let idx = self.index_of(coord).ok_or(BoardError::OutOfBounds(coord))?;
        if let Some(owner) = observation.kind.owner() {
            Self::check_player(owner)?;
        }
        if observation.general && !observation.city && observation.kind.owner().is_none() {
            warn!(%coord, kind = ?observation.kind, "general reported on unowned tile; ignoring marker");
        }

        let ctx = TurnContext {
            turn: self.turn,
            player_index: self.player_index,
        };
        let previous = self.tiles[idx].kind();
        let effects = self.tiles[idx].update(observation, ctx);
        let current = self.tiles[idx].kind();
        if observation.general
            && !observation.city
            && observation.kind.owner().is_some()
            && effects.general_registered.is_none()
        {
            warn!(
                %coord,
                reported = ?observation.kind,
                remembered = ?current,
                "general reported for a player not owning the tile; ignoring marker"
            );
        }

        if let Some((from, to)) = effects.ownership {
            debug!(%coord, turn = self.turn, ?from, ?to, "tile changed hands");
            if let Some(from) = from {
                self.owned[usize::from(from)].retain(|&c| c != coord);
            }
            if let Some(to) = to {
                self.owned[usize::from(to)].push(coord);
            }
        }

        if effects.city && !self.cities.contains(&coord) {
            debug!(%coord, "city discovered");
            self.cities.push(coord);
        }
        if let Some(slot) = effects.general_cleared {
            let slot = &mut self.generals[usize::from(slot)];
            if *slot == Some(coord) {
                debug!(%coord, "general deregistered");
                *slot = None;
            }
        }
        if let Some(owner) = effects.general_registered {
            if self.generals[usize::from(owner)] != Some(coord) {
                debug!(%coord, owner, "general located");
            }
            self.generals[usize::from(owner)] = Some(coord);
        }

        Ok(UpdateOutcome { previous, current })
    }

    /// Set the turn, then apply a whole batch of observations.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected observation; earlier ones stay applied.
    pub fn apply_turn<'a>(
        &mut self,
        turn: u32,
        batch: impl IntoIterator<Item = &'a (Coord, Observation)>,
    ) -> BoardResult<usize> {
        self.turn = turn;
        let mut captures = 0;
        for (coord, observation) in batch {
            if self.update(*coord, observation)?.captured() {
                captures += 1;
            }
        }
        Ok(captures)
    }

    /// Traversable neighbors of `coord`, in up, down, left, right order.
    ///
    /// See [`Tile::is_traversable`] for the filter.
    pub fn neighbor_tiles(
        &self,
        coord: Coord,
        include_swamps: bool,
        include_cities: bool,
    ) -> impl Iterator<Item = &Tile> {
        self.tile(coord)
            .map(Tile::adjacent)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&c| self.tile(c))
            .filter(move |t| t.is_traversable(include_swamps, include_cities))
    }

    /// Coordinates of the traversable neighbors of `coord`.
    #[must_use]
    pub fn neighbors(&self, coord: Coord, include_swamps: bool, include_cities: bool) -> Vec<Coord> {
        self.neighbor_tiles(coord, include_swamps, include_cities)
            .map(Tile::coord)
            .collect()
    }

    /// Whether the tile is owned by the local player's team.
    #[must_use]
    pub fn is_on_team(&self, coord: Coord) -> bool {
        self.tile(coord)
            .is_some_and(|t| t.kind() == TileKind::Player(self.player_index))
    }

    /// Whether the tile must not be attacked: ours, or an ally's.
    #[must_use]
    pub fn should_not_attack(&self, coord: Coord) -> bool {
        let Some(tile) = self.tile(coord) else {
            return false;
        };
        match tile.kind() {
            TileKind::Player(owner) => {
                owner == self.player_index || self.do_not_attack.contains(&owner)
            }
            _ => false,
        }
    }

    /// Whether the tile is known to be reachable.
    ///
    /// It must be empty ground or a player's tile and border something the
    /// local player has held at some point.
    #[must_use]
    pub fn is_valid_target(&self, coord: Coord) -> bool {
        let Some(tile) = self.tile(coord) else {
            return false;
        };
        if !tile.kind().is_occupiable() {
            return false;
        }
        self.neighbor_tiles(coord, true, true)
            .any(|n| n.turn_held() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(kind: TileKind, army: u32) -> Observation {
        Observation::new(kind, army)
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 3, 0).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tiles().len(), 12);
        assert!(grid.iter().all(|(_, t)| t.kind() == TileKind::Fog));
        assert_eq!(grid.tiles()[5].coord(), Coord::new(1, 1));
    }

    #[test]
    fn test_grid_invalid() {
        assert_eq!(
            Grid::new(0, 3, 0).unwrap_err(),
            BoardError::InvalidDimensions {
                width: 0,
                height: 3
            }
        );
        assert_eq!(Grid::new(3, 3, 8).unwrap_err(), BoardError::InvalidPlayer(8));
    }

    #[test]
    fn test_update_rejects_bad_input() {
        let mut grid = Grid::new(3, 3, 0).unwrap();
        assert_eq!(
            grid.update(Coord::new(3, 0), &obs(TileKind::Empty, 0)),
            Err(BoardError::OutOfBounds(Coord::new(3, 0)))
        );
        assert_eq!(
            grid.update(Coord::new(0, 0), &obs(TileKind::Player(9), 1)),
            Err(BoardError::InvalidPlayer(9))
        );
        assert_eq!(grid.tile(Coord::new(0, 0)).unwrap().kind(), TileKind::Fog);
    }

    #[test]
    fn test_owner_lists_follow_captures() {
        let mut grid = Grid::new(3, 3, 0).unwrap();
        let c = Coord::new(1, 1);
        grid.set_turn(1);
        grid.update(c, &obs(TileKind::Player(0), 3)).unwrap();
        assert_eq!(grid.owned_by(0), &[c]);

        grid.set_turn(2);
        let outcome = grid.update(c, &obs(TileKind::Player(1), 5)).unwrap();
        assert!(outcome.captured());
        assert!(grid.owned_by(0).is_empty());
        assert_eq!(grid.owned_by(1), &[c]);
    }

    #[test]
    fn test_general_registry() {
        let mut grid = Grid::new(3, 3, 0).unwrap();
        let c = Coord::new(2, 2);
        grid.update(c, &obs(TileKind::Player(1), 12).general()).unwrap();
        assert_eq!(grid.general(1), Some(c));

        grid.update(c, &obs(TileKind::Player(1), 12).city()).unwrap();
        assert_eq!(grid.general(1), None);
        assert_eq!(grid.cities(), &[c]);

        grid.update(c, &obs(TileKind::Player(1), 14).city()).unwrap();
        assert_eq!(grid.cities(), &[c]);
    }

    #[test]
    fn test_neighbors_filter() {
        let mut grid = Grid::new(3, 3, 0).unwrap();
        grid.update(Coord::new(1, 0), &obs(TileKind::Mountain, 0)).unwrap();
        grid.update(Coord::new(0, 1), &obs(TileKind::Obstacle, 0)).unwrap();
        grid.update(Coord::new(2, 1), &obs(TileKind::Empty, 40).city()).unwrap();
        grid.set_swamp(Coord::new(1, 2), true).unwrap();

        let center = Coord::new(1, 1);
        assert!(grid.neighbors(center, false, false).is_empty());
        assert_eq!(grid.neighbors(center, true, false), vec![Coord::new(1, 2)]);
        assert_eq!(
            grid.neighbors(center, true, true),
            vec![Coord::new(1, 2), Coord::new(2, 1)]
        );
    }

    #[test]
    fn test_valid_target_needs_held_neighbor() {
        let mut grid = Grid::new(3, 1, 0).unwrap();
        grid.set_turn(1);
        grid.update(Coord::new(1, 0), &obs(TileKind::Empty, 0)).unwrap();
        assert!(!grid.is_valid_target(Coord::new(1, 0)));

        grid.update(Coord::new(0, 0), &obs(TileKind::Player(0), 2)).unwrap();
        assert!(grid.is_valid_target(Coord::new(1, 0)));
        assert!(!grid.is_valid_target(Coord::new(2, 0)));
    }

    #[test]
    fn test_should_not_attack() {
        let mut grid = Grid::new(3, 1, 0).unwrap();
        grid.set_do_not_attack([2]);
        grid.update(Coord::new(0, 0), &obs(TileKind::Player(0), 2)).unwrap();
        grid.update(Coord::new(1, 0), &obs(TileKind::Player(2), 2)).unwrap();
        grid.update(Coord::new(2, 0), &obs(TileKind::Player(1), 2)).unwrap();
        assert!(grid.should_not_attack(Coord::new(0, 0)));
        assert!(grid.should_not_attack(Coord::new(1, 0)));
        assert!(!grid.should_not_attack(Coord::new(2, 0)));
        assert!(grid.is_on_team(Coord::new(0, 0)));
        assert!(!grid.is_on_team(Coord::new(1, 0)));
    }

    #[test]
    fn test_advance_turn_saturates() {
        let mut grid = Grid::new(1, 1, 0).unwrap();
        grid.advance_turn();
        assert_eq!(grid.turn(), 1);
        grid.set_turn(u32::MAX);
        grid.advance_turn();
        assert_eq!(grid.turn(), u32::MAX);
    }

    #[test]
    fn test_apply_turn_counts_captures() {
        let mut grid = Grid::new(2, 1, 0).unwrap();
        let batch = [
            (Coord::new(0, 0), obs(TileKind::Player(0), 1)),
            (Coord::new(1, 0), obs(TileKind::Fog, 0)),
        ];
        assert_eq!(grid.apply_turn(4, &batch).unwrap(), 1);
        assert_eq!(grid.turn(), 4);
        assert_eq!(grid.tile(Coord::new(0, 0)).unwrap().turn_held(), 4);
    }
}
