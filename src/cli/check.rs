//! Snapshot check command implementation.

use super::output::describe_kind;
use super::{CliError, load_grid};
use fogscout::board::{MAX_PLAYERS, check_invariants};
use fogscout::{PlayerId, TileKind};
use std::path::PathBuf;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be replayed or the replayed board
/// violates its bookkeeping invariants.
pub(crate) fn execute(snapshot: PathBuf) -> Result<(), CliError> {
    let grid = load_grid(&snapshot)?;

    println!("Checking: {}", snapshot.display());
    println!();
    println!("  Board:      {}x{}", grid.width(), grid.height());
    println!("  Turn:       {}", grid.turn());
    println!("  Player:     {}", grid.player_index());
    println!(
        "  Discovered: {}/{}",
        grid.iter().filter(|(_, t)| t.kind().is_discovered()).count(),
        grid.tiles().len()
    );
    println!("  Cities:     {}", grid.cities().len());

    for player in (0..MAX_PLAYERS).filter_map(|p| PlayerId::try_from(p).ok()) {
        let owned = grid.owned_by(player);
        if owned.is_empty() && grid.general(player).is_none() {
            continue;
        }
        let general = grid
            .general(player)
            .map_or_else(|| "unknown".to_string(), |c| c.to_string());
        println!(
            "  {:<11} {} tiles, general {general}",
            format!("{}:", describe_kind(TileKind::Player(player))),
            owned.len()
        );
    }
    println!();

    let violations = check_invariants(&grid);
    for violation in &violations {
        println!("  ✗ {violation}");
    }
    if !violations.is_empty() {
        return Err(CliError::new(format!(
            "{} invariant violation(s)",
            violations.len()
        )));
    }

    println!("  ✓ Bookkeeping consistent");
    Ok(())
}
