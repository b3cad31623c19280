#![no_main]

//! Snapshot parser fuzzer.
//!
//! Arbitrary text must either fail to parse or replay into a consistent board.

use fogscout::Snapshot;
use fogscout::board::check_invariants;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = Snapshot::from_json(text) else {
        return;
    };
    // Cap board size to avoid OOM
    if u32::from(snapshot.width) * u32::from(snapshot.height) > 10_000 {
        return;
    }
    let Ok(grid) = snapshot.to_grid() else {
        return;
    };

    let violations = check_invariants(&grid);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");

    // A captured snapshot replays to the same knowledge
    let rebuilt = Snapshot::capture(&grid).to_grid().expect("captured snapshot must replay");
    for ((coord, a), (_, b)) in grid.iter().zip(rebuilt.iter()) {
        assert_eq!(a.kind(), b.kind(), "kind at {coord}");
        assert_eq!(a.turn_held(), b.turn_held(), "held at {coord}");
    }
});
