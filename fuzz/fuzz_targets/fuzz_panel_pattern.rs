#![no_main]

use glazier_layout::{MAX_PATTERN_PANELS, parse_panel_pattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(description) = std::str::from_utf8(data) else {
        return;
    };
    let Some(pattern) = parse_panel_pattern(description) else {
        return;
    };

    // Post-conditions that must always hold:
    assert!(!pattern.is_empty(), "empty pattern for {description:?}");
    assert!(pattern.len() <= MAX_PATTERN_PANELS as usize, "too many panels");
    assert!(
        pattern.fractions.iter().all(|f| f.is_finite() && *f > 0.0),
        "non-positive fraction in {pattern:?}"
    );
    let sum: f64 = pattern.fractions.iter().sum();
    assert!((sum - 1.0).abs() < 1e-9, "fractions sum to {sum}");
    if let Some(mesh) = pattern.mesh_count {
        assert!(mesh as usize <= pattern.len(), "mesh count exceeds panels");
    }
});
