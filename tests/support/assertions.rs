use std::collections::HashSet;

use fillroute::domain::{FillArena, Path, SourceFlags};
use rust_decimal::Decimal;

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Check every path invariant fill by fill, independently of
/// `Path::is_valid`.
pub fn assert_path_invariants(path: &Path, arena: &FillArena) {
    assert!(
        path.input() <= path.target(),
        "input {} exceeds target {}",
        path.input(),
        path.target()
    );

    let mut seen = HashSet::new();
    let mut flags = SourceFlags::NONE;
    for (position, id) in path.fills().iter().enumerate() {
        let fill = &arena[*id];
        if let Some(parent) = fill.parent {
            assert!(position > 0, "fill {position} has a parent but leads the path");
            assert_eq!(
                path.fills()[position - 1],
                parent,
                "fill {position} does not follow its parent"
            );
        }
        assert!(seen.insert(*id), "fill {position} appears twice");
        flags |= fill.flags;
    }
    assert!(
        !flags.has_multi_hop_conflict(),
        "path mixes multi-hop with a conflicting source"
    );
    assert_eq!(flags, path.flags());
}
