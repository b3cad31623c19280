#![no_main]

//! Observation stream fuzzer.
//!
//! Feeds arbitrary turn batches into a board, then checks that the
//! bookkeeping still holds and that the scout queries neither panic nor
//! return something malformed.

use arbitrary::Arbitrary;
use fogscout::board::check_invariants;
use fogscout::{Coord, Grid, Observation, TileKind};
use libfuzzer_sys::fuzz_target;

/// One fuzzer-generated tile report.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzObservation {
    x: u8,
    y: u8,
    /// Raw kind code, mapped through `TileKind::from_raw`.
    raw_kind: i8,
    army: u16,
    city: bool,
    general: bool,
}

/// Structured input for observation fuzzing.
#[derive(Arbitrary, Debug)]
struct ObservationInput {
    width: u8,
    height: u8,
    player_index: u8,
    swamps: Vec<(u8, u8)>,
    turns: Vec<Vec<FuzzObservation>>,
    from: (u8, u8),
    to: (u8, u8),
    include_cities: bool,
}

fuzz_target!(|input: ObservationInput| {
    // Keep boards small enough for quick iterations
    let width = u16::from(input.width % 24) + 1;
    let height = u16::from(input.height % 24) + 1;
    let player_index = input.player_index % 8;

    let Ok(mut grid) = Grid::new(width, height, player_index) else {
        return;
    };
    for &(x, y) in &input.swamps {
        let _ = grid.set_swamp(Coord::new(u16::from(x), u16::from(y)), true);
    }

    for (turn, batch) in (1u32..).zip(input.turns.iter().take(64)) {
        let observations: Vec<(Coord, Observation)> = batch
            .iter()
            .filter_map(|o| {
                let kind = TileKind::from_raw(i32::from(o.raw_kind))?;
                let mut observation = Observation::new(kind, u32::from(o.army));
                observation.city = o.city;
                observation.general = o.general;
                Some((Coord::new(u16::from(o.x), u16::from(o.y)), observation))
            })
            .collect();

        // Out-of-range coordinates and player slots are rejected, never applied
        let _ = grid.apply_turn(turn, &observations);

        let violations = check_invariants(&grid);
        assert!(
            violations.is_empty(),
            "Invariants violated after turn {turn}: {violations:?}"
        );
    }

    let from = Coord::new(u16::from(input.from.0), u16::from(input.from.1));
    let to = Coord::new(u16::from(input.to.0), u16::from(input.to.1));

    if let Some(target) = grid.nearest_target_tile(from) {
        assert!(grid.is_valid_target(target), "Invalid target {target}");
        assert!(!grid.should_not_attack(target), "Spared target {target}");
    }

    let path = grid.path_to_with(from, Some(to), input.include_cities);
    if let (Some(first), Some(last)) = (path.first(), path.last()) {
        assert_eq!(*first, from, "Path does not start at the start");
        assert_eq!(*last, to, "Path does not end at the destination");
    }
    for step in path.windows(2) {
        assert_eq!(step[0].distance_to(step[1]), 1, "Path jumps: {path:?}");
    }
});
