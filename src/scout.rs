//! Attack planning over a [`Grid`](crate::board::Grid) snapshot.
//!
//! Read-only queries:
//! - Target scoring: which visible tile is worth attacking next
//! - Pathfinding: which route the attacking army can actually carry
//!
//! Both only read the board, so they may run side by side once a turn's
//! observations have been applied.

mod path;
mod target;
mod weights;

pub use target::{nearest_tile_in_path, score_target};
pub use weights::TargetWeights;
