//! Board layer for fogscout.
//!
//! Tracks what one player knows about the board:
//! - Tiles with fog-aware ownership, army and city/general state
//! - Per-owner tile lists, the general registry and the city list
//! - Neighbor resolution and reachability predicates
//! - Invariant checks over the bookkeeping

mod coord;
mod grid;
mod invariants;
mod tile;

pub use coord::Coord;
pub use grid::{Grid, UpdateOutcome};
pub use invariants::{InvariantViolation, check_invariants};
pub use tile::{
    Classification, MAX_PLAYERS, Observation, PlayerId, RAW_EMPTY, RAW_FOG, RAW_MOUNTAIN,
    RAW_OBSTACLE, Tile, TileKind, TurnContext, UpdateEffects,
};
