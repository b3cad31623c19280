//! Target command implementation.

use super::output::{JsonCandidate, JsonTargets, format_targets};
use super::{CliError, OutputFormat, load_grid, load_weights};
use fogscout::Coord;
use std::path::PathBuf;

/// Execute the target command.
///
/// # Errors
///
/// Returns an error if the snapshot or weights cannot be loaded, or the
/// attacking tile is off the board.
pub(crate) fn execute(
    snapshot: PathBuf,
    from: Coord,
    weights: Option<PathBuf>,
    top: usize,
    format: OutputFormat,
) -> Result<(), CliError> {
    let grid = load_grid(&snapshot)?;
    let weights = load_weights(weights.as_deref())?;

    let Some(attacker) = grid.tile(from) else {
        return Err(CliError::new(format!("{from} is outside the board")));
    };

    let targets = JsonTargets {
        from,
        army: attacker.army(),
        targets: grid
            .ranked_targets(from, &weights)
            .into_iter()
            .take(top.max(1))
            .map(|(coord, score)| JsonCandidate::new(&grid, coord, score))
            .collect(),
    };

    match format {
        OutputFormat::Text => print!("{}", format_targets(&targets)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&targets)?),
    }

    Ok(())
}
