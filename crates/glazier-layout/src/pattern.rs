//! Panel patterns encoded in catalog description codes.
//!
//! Some descriptions name a decorative multi-pane layout inside one leaf,
//! e.g. `"2 Panel (40+60)"` or `"4 Track 2 Glass 2 Mesh"`. The parser turns
//! those into fractions of the leaf width plus the number of trailing mesh
//! panels. Anything unrecognized is not a pattern and the leaf renders as a
//! single pane.
//!
//! Recognized shapes, case-insensitive, tried in order:
//!
//! | Shape                              | Fractions               | Mesh count |
//! |------------------------------------|-------------------------|------------|
//! | `<N> Panel (<a>+<b>)`              | `a/(a+b)`, `b/(a+b)`    | none       |
//! | `<N> Track <M> Glass [<K> Mesh]`   | `M` equal               | `K` or 0   |
//! | `<A> Glass ... <B> Mesh`           | `A+B` equal             | `B`        |
//! | `<N> Panel`                        | `N` equal               | none       |

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::section::SectionNode;

/// Upper bound on panels a description may ask for.
///
/// Larger counts are treated as unrecognized rather than producing slivers.
pub const MAX_PATTERN_PANELS: u32 = 16;

static PANEL_RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*panels?\s*\(\s*(\d+(?:\.\d+)?)\s*\+\s*(\d+(?:\.\d+)?)\s*\)")
        .expect("panel ratio pattern compiles")
});

static TRACK_GLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*tracks?\s*(\d+)\s*glass(?:.*?\b(\d+)\s*mesh)?")
        .expect("track pattern compiles")
});

static GLASS_MESH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*glass\b.*?\b(\d+)\s*mesh").expect("glass/mesh pattern compiles")
});

static PANEL_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*panels?\b").expect("panel count pattern compiles")
});

/// Parsed panel layout of one leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPattern {
    pub fractions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_count: Option<u32>,
}

impl PanelPattern {
    fn equal(count: u32, mesh_count: Option<u32>) -> Option<Self> {
        if count == 0 || count > MAX_PATTERN_PANELS {
            return None;
        }
        let share = 1.0 / f64::from(count);
        Some(Self {
            fractions: vec![share; count as usize],
            mesh_count: mesh_count.map(|mesh| mesh.min(count)),
        })
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

/// Parse a description code into a panel pattern.
///
/// Returns `None` when the description carries no structural pattern.
#[must_use]
pub fn parse_panel_pattern(description: &str) -> Option<PanelPattern> {
    if let Some(caps) = PANEL_RATIO.captures(description) {
        let a: f64 = caps[1].parse().ok()?;
        let b: f64 = caps[2].parse().ok()?;
        let total = a + b;
        if !total.is_finite() {
            return None;
        }
        let fractions = vec![a / total, b / total];
        // Both sides must leave a visible panel.
        if fractions.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
            return None;
        }
        return Some(PanelPattern {
            fractions,
            mesh_count: None,
        });
    }

    if let Some(caps) = TRACK_GLASS.captures(description) {
        let glass: u32 = caps[1].parse().ok()?;
        let mesh: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        return PanelPattern::equal(glass, Some(mesh));
    }

    if let Some(caps) = GLASS_MESH.captures(description) {
        let glass: u32 = caps[1].parse().ok()?;
        let mesh: u32 = caps[2].parse().ok()?;
        return PanelPattern::equal(glass.checked_add(mesh)?, Some(mesh));
    }

    if let Some(caps) = PANEL_COUNT.captures(description) {
        let count: u32 = caps[1].parse().ok()?;
        return PanelPattern::equal(count, None);
    }

    None
}

/// Seed a leaf's panel fields from its description.
///
/// Fractions the user already edited are kept when their length matches the
/// parsed pattern; only the mesh count is refreshed. An unrecognized
/// description clears both fields.
pub fn seed_panels(node: &mut SectionNode) {
    match parse_panel_pattern(&node.description) {
        Some(pattern) => {
            let keep = node
                .panel_fractions
                .as_ref()
                .is_some_and(|current| current.len() == pattern.len());
            if !keep {
                node.panel_fractions = Some(pattern.fractions);
            }
            node.panel_mesh_count = pattern.mesh_count;
        }
        None => {
            node.panel_fractions = None;
            node.panel_mesh_count = None;
        }
    }
}
