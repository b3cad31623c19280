//! Board invariants - sanity checks that detect bookkeeping bugs.
//!
//! [`Grid::update`] keeps the owner lists, the general registry and the city
//! list in step with the tiles. These checks should never fire; if they do,
//! the update path is broken.

use crate::board::{Classification, Grid, MAX_PLAYERS, PlayerId, TileKind};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(grid: &Grid) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Every owned tile sits exactly once in its owner's list
    for (coord, tile) in grid.iter() {
        if let TileKind::Player(owner) = tile.kind() {
            let count = grid.owned_by(owner).iter().filter(|&&c| c == coord).count();
            if count != 1 {
                violations.push(InvariantViolation {
                    message: format!(
                        "Tile at {coord} owned by {owner} appears {count} times in its owner list"
                    ),
                });
            }
        }

        if tile.is_city() && !grid.cities().contains(&coord) {
            violations.push(InvariantViolation {
                message: format!("City at {coord} missing from the city list"),
            });
        }
    }

    // Every list entry really is owned by that player
    for player in 0..MAX_PLAYERS {
        let Ok(player) = PlayerId::try_from(player) else {
            continue;
        };
        for &coord in grid.owned_by(player) {
            let kind = grid.tile(coord).map(|t| t.kind());
            if kind != Some(TileKind::Player(player)) {
                violations.push(InvariantViolation {
                    message: format!(
                        "Owner list of {player} holds {coord} but the tile is {kind:?}"
                    ),
                });
            }
        }

        if let Some(coord) = grid.general(player) {
            let class = grid.tile(coord).map(|t| t.classification());
            if class != Some(Classification::General(player)) {
                violations.push(InvariantViolation {
                    message: format!(
                        "General slot {player} points at {coord} classified as {class:?}"
                    ),
                });
            }
            let kind = grid.tile(coord).map(|t| t.kind());
            if kind != Some(TileKind::Player(player)) {
                violations.push(InvariantViolation {
                    message: format!("General slot {player} points at {coord} owned as {kind:?}"),
                });
            }
        }
    }

    violations
}
