//! Tile state and the fog-of-war update contract.

use serde::{Deserialize, Serialize};

use crate::board::Coord;

/// Unique identifier for a player.
pub type PlayerId = u8;

/// Maximum number of player slots tracked by the board.
pub const MAX_PLAYERS: usize = 8;

/// Raw protocol value for an empty tile.
pub const RAW_EMPTY: i32 = -1;
/// Raw protocol value for a mountain.
pub const RAW_MOUNTAIN: i32 = -2;
/// Raw protocol value for an unseen tile.
pub const RAW_FOG: i32 = -3;
/// Raw protocol value for an unseen tile known to block (mountain or city).
pub const RAW_OBSTACLE: i32 = -4;

/// What currently occupies a tile, as far as the local player knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Never seen.
    Fog,
    /// Seen through fog as something blocking; may turn out to be a city.
    Obstacle,
    /// Impassable terrain.
    Mountain,
    /// Neutral, capturable ground.
    Empty,
    /// Owned by the given player.
    Player(PlayerId),
}

impl TileKind {
    /// Decode the integer encoding used by the game server.
    ///
    /// Returns `None` for values that fit neither a terrain code nor a
    /// player id.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            RAW_EMPTY => Some(Self::Empty),
            RAW_MOUNTAIN => Some(Self::Mountain),
            RAW_FOG => Some(Self::Fog),
            RAW_OBSTACLE => Some(Self::Obstacle),
            _ => PlayerId::try_from(raw).ok().map(Self::Player),
        }
    }

    /// Encode back into the game server's integer encoding.
    #[must_use]
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Empty => RAW_EMPTY,
            Self::Mountain => RAW_MOUNTAIN,
            Self::Fog => RAW_FOG,
            Self::Obstacle => RAW_OBSTACLE,
            Self::Player(id) => i32::from(id),
        }
    }

    /// Whether the tile's content is known.
    #[must_use]
    pub const fn is_discovered(self) -> bool {
        !matches!(self, Self::Fog)
    }

    /// Whether this kind blocks movement (obstacle or mountain).
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Obstacle | Self::Mountain)
    }

    /// Whether an army could stand here: empty ground or a player's tile.
    #[must_use]
    pub const fn is_occupiable(self) -> bool {
        matches!(self, Self::Empty | Self::Player(_))
    }

    /// Owning player, if any.
    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(id),
            _ => None,
        }
    }
}

/// Strategic classification of a tile. City and general are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Ordinary ground.
    #[default]
    Plain,
    /// A city.
    City,
    /// The general of the given player.
    General(PlayerId),
}

impl Classification {
    /// Whether this is a city.
    #[must_use]
    pub const fn is_city(self) -> bool {
        matches!(self, Self::City)
    }

    /// Whether this is a general.
    #[must_use]
    pub const fn is_general(self) -> bool {
        matches!(self, Self::General(_))
    }
}

/// A single observation of one tile for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Observed kind.
    pub kind: TileKind,
    /// Observed army (0 when not visible).
    pub army: u32,
    /// Tile was reported as a city.
    pub city: bool,
    /// Tile was reported as a general.
    pub general: bool,
}

impl Observation {
    /// Plain observation without city/general markers.
    #[must_use]
    pub const fn new(kind: TileKind, army: u32) -> Self {
        Self {
            kind,
            army,
            city: false,
            general: false,
        }
    }

    /// Mark the observation as a city.
    #[must_use]
    pub const fn city(mut self) -> Self {
        self.city = true;
        self
    }

    /// Mark the observation as a general.
    #[must_use]
    pub const fn general(mut self) -> Self {
        self.general = true;
        self
    }
}

/// Turn-level facts a tile needs while applying an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    /// Current turn.
    pub turn: u32,
    /// The player this board is tracked for.
    pub player_index: PlayerId,
}

/// Owner lists and registries the board must adjust after a tile update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateEffects {
    /// Kind changed: `(old owner, new owner)`; at least one side is a player.
    pub ownership: Option<(Option<PlayerId>, Option<PlayerId>)>,
    /// Tile was reported as a city this update.
    pub city: bool,
    /// General slot this tile must be removed from.
    pub general_cleared: Option<PlayerId>,
    /// General slot this tile must be registered in.
    pub general_registered: Option<PlayerId>,
}

/// One board cell.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    coord: Coord,
    kind: TileKind,
    army: u32,
    turn_captured: u32,
    turn_held: u32,
    class: Classification,
    is_swamp: bool,
    neighbors: [Coord; 4],
    neighbor_count: u8,
}

impl Tile {
    /// A fogged tile at `coord` with no cached neighbors.
    #[must_use]
    pub const fn new(coord: Coord) -> Self {
        Self {
            coord,
            kind: TileKind::Fog,
            army: 0,
            turn_captured: 0,
            turn_held: 0,
            class: Classification::Plain,
            is_swamp: false,
            neighbors: [coord; 4],
            neighbor_count: 0,
        }
    }

    /// Position on the board.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Current kind.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Last known army.
    #[must_use]
    pub const fn army(&self) -> u32 {
        self.army
    }

    /// Turn the kind last changed.
    #[must_use]
    pub const fn turn_captured(&self) -> u32 {
        self.turn_captured
    }

    /// Last turn the local player owned this tile (0 = never).
    #[must_use]
    pub const fn turn_held(&self) -> u32 {
        self.turn_held
    }

    /// City/general classification.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.class
    }

    /// Whether this tile is a city.
    #[must_use]
    pub const fn is_city(&self) -> bool {
        self.class.is_city()
    }

    /// Whether this tile is a general.
    #[must_use]
    pub const fn is_general(&self) -> bool {
        self.class.is_general()
    }

    /// Whether this tile is a swamp.
    #[must_use]
    pub const fn is_swamp(&self) -> bool {
        self.is_swamp
    }

    /// Cached in-bounds cardinal neighbors, unfiltered.
    #[must_use]
    pub fn adjacent(&self) -> &[Coord] {
        &self.neighbors[..usize::from(self.neighbor_count)]
    }

    /// Manhattan distance to another tile.
    #[must_use]
    pub fn distance_to(&self, other: &Tile) -> u32 {
        self.coord.distance_to(other.coord)
    }

    /// Whether this tile survives the neighbor filter.
    ///
    /// Mountains never pass. Obstacles pass only once known to be a city or
    /// general. Swamps and cities pass only when asked for.
    #[must_use]
    pub const fn is_traversable(&self, include_swamps: bool, include_cities: bool) -> bool {
        match self.kind {
            TileKind::Mountain => false,
            TileKind::Obstacle if matches!(self.class, Classification::Plain) => false,
            _ => (include_swamps || !self.is_swamp) && (include_cities || !self.class.is_city()),
        }
    }

    pub(crate) fn set_swamp(&mut self, is_swamp: bool) {
        self.is_swamp = is_swamp;
    }

    pub(crate) fn set_neighbors(&mut self, width: u16, height: u16) {
        let (neighbors, count) = self.coord.adjacent(width, height);
        self.neighbors = neighbors;
        self.neighbor_count = count;
    }

    /// Whether an observed kind may overwrite the current one.
    ///
    /// Undiscovered tiles take anything, blocking reveals always land, and a
    /// tile the local player owned accepts any non-blocking report (that is
    /// how losing it shows up). Everything else keeps its remembered owner.
    #[must_use]
    pub const fn admits_kind(&self, observed: TileKind, player_index: PlayerId) -> bool {
        let was_ours = matches!(self.kind, TileKind::Player(id) if id == player_index);
        !self.kind.is_discovered() || observed.is_blocking() || (was_ours && !observed.is_blocking())
    }

    /// Apply one observation.
    ///
    /// Returns the side effects the owning board must mirror in its owner
    /// lists and registries.
    pub fn update(&mut self, observation: &Observation, ctx: TurnContext) -> UpdateEffects {
        let mut effects = UpdateEffects::default();
        let observed = observation.kind;

        if self.admits_kind(observed, ctx.player_index) {
            if self.kind != observed {
                if observed.is_discovered() {
                    self.turn_captured = ctx.turn;
                }
                if self.kind.owner().is_some() || observed.owner().is_some() {
                    effects.ownership = Some((self.kind.owner(), observed.owner()));
                }
                // A general belongs to whoever owns the tile.
                if let Classification::General(owner) = self.class {
                    if observed.owner() != Some(owner) {
                        self.class = Classification::Plain;
                        effects.general_cleared = Some(owner);
                    }
                }
            }
            if observed == TileKind::Player(ctx.player_index) {
                self.turn_held = ctx.turn;
            }
            self.kind = observed;
        }

        // Swamps and blocking tiles are always current; elsewhere a zero
        // report just means the tile is out of sight.
        if self.army == 0 || observation.army > 0 || observed.is_blocking() || self.is_swamp {
            self.army = observation.army;
        }

        if observation.city {
            if let Classification::General(owner) = self.class {
                effects.general_cleared = Some(owner);
            }
            self.class = Classification::City;
            effects.city = true;
        } else if observation.general {
            if let Some(owner) = observed.owner().filter(|&o| self.kind.owner() == Some(o)) {
                if let Classification::General(previous) = self.class {
                    if previous != owner {
                        effects.general_cleared = Some(previous);
                    }
                }
                self.class = Classification::General(owner);
                effects.general_registered = Some(owner);
            }
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: TurnContext = TurnContext {
        turn: 7,
        player_index: 0,
    };

    fn tile() -> Tile {
        Tile::new(Coord::new(1, 1))
    }

    #[test]
    fn test_raw_roundtrip() {
        for raw in [-4, -3, -2, -1, 0, 3, 7] {
            let kind = TileKind::from_raw(raw).unwrap();
            assert_eq!(kind.to_raw(), raw);
        }
        assert_eq!(TileKind::from_raw(-5), None);
        assert_eq!(TileKind::from_raw(300), None);
    }

    #[test]
    fn test_fog_takes_any_kind() {
        let mut t = tile();
        let effects = t.update(&Observation::new(TileKind::Player(2), 5), CTX);
        assert_eq!(t.kind(), TileKind::Player(2));
        assert_eq!(t.army(), 5);
        assert_eq!(t.turn_captured(), 7);
        assert_eq!(t.turn_held(), 0);
        assert_eq!(effects.ownership, Some((None, Some(2))));
    }

    #[test]
    fn test_foreign_tile_keeps_owner_when_fogged() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Player(2), 5), CTX);
        let effects = t.update(&Observation::new(TileKind::Fog, 0), CTX);
        assert_eq!(t.kind(), TileKind::Player(2));
        assert_eq!(t.army(), 5);
        assert_eq!(effects.ownership, None);

        t.update(&Observation::new(TileKind::Player(3), 9), CTX);
        assert_eq!(t.kind(), TileKind::Player(2));
        assert_eq!(t.army(), 9);
    }

    #[test]
    fn test_blocking_reveal_always_applies() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Empty, 0), CTX);
        t.update(&Observation::new(TileKind::Mountain, 0), CTX);
        assert_eq!(t.kind(), TileKind::Mountain);
    }

    #[test]
    fn test_losing_own_tile() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Player(0), 4), CTX);
        assert_eq!(t.turn_held(), 7);

        let later = TurnContext { turn: 9, ..CTX };
        let effects = t.update(&Observation::new(TileKind::Player(1), 2), later);
        assert_eq!(t.kind(), TileKind::Player(1));
        assert_eq!(t.turn_captured(), 9);
        assert_eq!(t.turn_held(), 7);
        assert_eq!(effects.ownership, Some((Some(0), Some(1))));
    }

    #[test]
    fn test_turn_held_refreshes_while_owned() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Player(0), 4), CTX);
        let later = TurnContext { turn: 12, ..CTX };
        let effects = t.update(&Observation::new(TileKind::Player(0), 6), later);
        assert_eq!(t.turn_held(), 12);
        assert_eq!(t.turn_captured(), 7);
        assert_eq!(effects.ownership, None);
    }

    #[test]
    fn test_swamp_army_always_current() {
        let mut t = tile();
        t.set_swamp(true);
        t.update(&Observation::new(TileKind::Empty, 3), CTX);
        t.update(&Observation::new(TileKind::Fog, 0), CTX);
        assert_eq!(t.army(), 0);
    }

    #[test]
    fn test_city_clears_general() {
        let mut t = tile();
        let effects = t.update(&Observation::new(TileKind::Player(2), 10).general(), CTX);
        assert_eq!(effects.general_registered, Some(2));
        assert_eq!(t.classification(), Classification::General(2));

        let effects = t.update(&Observation::new(TileKind::Player(2), 10).city(), CTX);
        assert_eq!(effects.general_cleared, Some(2));
        assert!(effects.city);
        assert!(t.is_city());
        assert!(!t.is_general());
    }

    #[test]
    fn test_general_for_another_owner_is_ignored() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Player(2), 5), CTX);
        let effects = t.update(&Observation::new(TileKind::Player(3), 5).general(), CTX);
        assert_eq!(t.kind(), TileKind::Player(2));
        assert_eq!(effects.general_registered, None);
        assert!(!t.is_general());
    }

    #[test]
    fn test_captured_general_is_cleared() {
        let mut t = tile();
        t.update(&Observation::new(TileKind::Player(0), 9).general(), CTX);
        let later = TurnContext { turn: 9, ..CTX };
        let effects = t.update(&Observation::new(TileKind::Player(1), 2), later);
        assert_eq!(t.kind(), TileKind::Player(1));
        assert_eq!(effects.general_cleared, Some(0));
        assert_eq!(t.classification(), Classification::Plain);
    }

    #[test]
    fn test_general_without_owner_is_ignored() {
        let mut t = tile();
        let effects = t.update(&Observation::new(TileKind::Empty, 0).general(), CTX);
        assert_eq!(effects.general_registered, None);
        assert!(!t.is_general());
    }

    #[test]
    fn test_traversable_filter() {
        let mut t = tile();
        assert!(t.is_traversable(false, false));

        t.update(&Observation::new(TileKind::Obstacle, 0), CTX);
        assert!(!t.is_traversable(true, true));

        t.update(&Observation::new(TileKind::Obstacle, 0).city(), CTX);
        assert!(t.is_traversable(true, true));
        assert!(!t.is_traversable(true, false));

        let mut m = tile();
        m.update(&Observation::new(TileKind::Mountain, 0), CTX);
        assert!(!m.is_traversable(true, true));

        let mut s = tile();
        s.set_swamp(true);
        assert!(!s.is_traversable(false, true));
        assert!(s.is_traversable(true, true));
    }
}
