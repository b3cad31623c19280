//! Path command implementation.

use super::output::{JsonPath, format_path};
use super::{CliError, OutputFormat, load_grid, load_weights};
use fogscout::Coord;
use std::path::PathBuf;
use tracing::info;

/// Execute the path command.
///
/// Without an explicit destination the best target for `from` is used.
///
/// # Errors
///
/// Returns an error if the snapshot or weights cannot be loaded, or the
/// start tile is off the board.
pub(crate) fn execute(
    snapshot: PathBuf,
    from: Coord,
    to: Option<Coord>,
    cities: bool,
    weights: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let grid = load_grid(&snapshot)?;
    if !grid.in_bounds(from) {
        return Err(CliError::new(format!("{from} is outside the board")));
    }

    let to = match to {
        Some(to) => Some(to),
        None => {
            let weights = load_weights(weights.as_deref())?;
            let target = grid.nearest_target_tile_with(from, &weights);
            info!(%from, ?target, "picked destination");
            target
        }
    };

    let result = JsonPath {
        from,
        to,
        path: grid.path_to_with(from, to, cities),
    };

    match format {
        OutputFormat::Text => print!("{}", format_path(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
