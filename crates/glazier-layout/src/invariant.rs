//! Structural invariant checks for section trees.
//!
//! The engine keeps these invariants by construction; the report exists so
//! externally built trees can be rejected and so debug builds can catch a
//! regression right after the operation that caused it.

use std::collections::BTreeSet;

use glazier_core::geometry::{Axis, Rect, TILING_EPSILON};
use serde::{Deserialize, Serialize};

use crate::section::{SectionId, SectionNode, Split};

/// Tolerance for `panel_fractions` summing to one.
pub const PANEL_SUM_EPSILON: f64 = 1e-6;

/// Severity for one invariant finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    RootRectNotUnit,
    DuplicateNodeId,
    NextIdNotGreaterThanExisting,
    DegenerateRect,
    RectOutOfFrame,
    SplitWithoutChildren,
    SingleChildSplit,
    LeafHasChildren,
    ChildOffsetGap,
    ChildExtentMismatch,
    CrossAxisMismatch,
    PanelFractionsOnBranch,
    NonPositivePanelFraction,
    PanelFractionSum,
    MeshCountExceedsPanels,
}

/// One actionable invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub severity: InvariantSeverity,
    pub node_id: Option<SectionId>,
    pub message: String,
}

/// Structured invariant report over a section tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantReport {
    pub issues: Vec<InvariantIssue>,
}

impl InvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == InvariantSeverity::Error)
    }

    /// First error-level finding in traversal order.
    #[must_use]
    pub fn first_error(&self) -> Option<&InvariantIssue> {
        self.issues
            .iter()
            .find(|issue| issue.severity == InvariantSeverity::Error)
    }

    /// Distinct codes present in the report.
    #[must_use]
    pub fn codes(&self) -> BTreeSet<InvariantCode> {
        self.issues.iter().map(|issue| issue.code).collect()
    }

    fn error(&mut self, code: InvariantCode, node_id: SectionId, message: String) {
        self.issues.push(InvariantIssue {
            code,
            severity: InvariantSeverity::Error,
            node_id: Some(node_id),
            message,
        });
    }

    fn warning(&mut self, code: InvariantCode, node_id: SectionId, message: String) {
        self.issues.push(InvariantIssue {
            code,
            severity: InvariantSeverity::Warning,
            node_id: Some(node_id),
            message,
        });
    }
}

pub(crate) fn build_invariant_report(root: &SectionNode, next_id: SectionId) -> InvariantReport {
    let mut report = InvariantReport::default();

    if !root.rect.approx_eq(&Rect::UNIT, TILING_EPSILON) {
        report.error(
            InvariantCode::RootRectNotUnit,
            root.id,
            format!("root rect is {:?}, expected the unit frame", root.rect),
        );
    }

    let mut seen = BTreeSet::new();
    for node in root.walk() {
        if !seen.insert(node.id) {
            report.error(
                InvariantCode::DuplicateNodeId,
                node.id,
                format!("node id {} appears more than once", node.id),
            );
        }
        if node.id >= next_id {
            report.error(
                InvariantCode::NextIdNotGreaterThanExisting,
                node.id,
                format!("next id {} is not greater than node id {}", next_id, node.id),
            );
        }
        check_rect(node, &mut report);
        match node.split.axis() {
            None => check_leaf(node, &mut report),
            Some(axis) => check_branch(node, axis, &mut report),
        }
    }

    report
}

fn check_rect(node: &SectionNode, report: &mut InvariantReport) {
    let rect = node.rect;
    if rect.is_degenerate() {
        report.error(
            InvariantCode::DegenerateRect,
            node.id,
            format!("rect {rect:?} has zero or negative size"),
        );
    }
    let lo = -TILING_EPSILON;
    let hi = 1.0 + TILING_EPSILON;
    if rect.x < lo || rect.y < lo || rect.right() > hi || rect.bottom() > hi {
        report.error(
            InvariantCode::RectOutOfFrame,
            node.id,
            format!("rect {rect:?} leaves the unit frame"),
        );
    }
}

fn check_leaf(node: &SectionNode, report: &mut InvariantReport) {
    if !node.children.is_empty() {
        report.error(
            InvariantCode::LeafHasChildren,
            node.id,
            format!("leaf holds {} children", node.children.len()),
        );
    }
    let Some(fractions) = &node.panel_fractions else {
        return;
    };
    if fractions.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
        report.error(
            InvariantCode::NonPositivePanelFraction,
            node.id,
            format!("panel fractions {fractions:?} contain a non-positive value"),
        );
    }
    let sum: f64 = fractions.iter().sum();
    if (sum - 1.0).abs() > PANEL_SUM_EPSILON {
        report.error(
            InvariantCode::PanelFractionSum,
            node.id,
            format!("panel fractions sum to {sum}, expected 1"),
        );
    }
    if let Some(mesh) = node.panel_mesh_count
        && mesh as usize > fractions.len()
    {
        report.error(
            InvariantCode::MeshCountExceedsPanels,
            node.id,
            format!("mesh count {mesh} exceeds {} panels", fractions.len()),
        );
    }
}

fn check_branch(node: &SectionNode, axis: Axis, report: &mut InvariantReport) {
    debug_assert_ne!(node.split, Split::None);
    if node.panel_fractions.is_some() {
        report.error(
            InvariantCode::PanelFractionsOnBranch,
            node.id,
            "panel fractions apply to leaves only".to_string(),
        );
    }
    match node.children.len() {
        0 => {
            report.error(
                InvariantCode::SplitWithoutChildren,
                node.id,
                format!("{:?} split has no children", node.split),
            );
            return;
        }
        1 => report.warning(
            InvariantCode::SingleChildSplit,
            node.id,
            "split has a single child".to_string(),
        ),
        _ => {}
    }

    let cross = axis.cross();
    let mut cursor = node.rect.offset(axis);
    for child in &node.children {
        let offset = child.rect.offset(axis);
        if (offset - cursor).abs() > TILING_EPSILON {
            report.error(
                InvariantCode::ChildOffsetGap,
                child.id,
                format!("child starts at {offset}, expected {cursor} along {axis:?}"),
            );
        }
        if (child.rect.offset(cross) - node.rect.offset(cross)).abs() > TILING_EPSILON
            || (child.rect.extent(cross) - node.rect.extent(cross)).abs() > TILING_EPSILON
        {
            report.error(
                InvariantCode::CrossAxisMismatch,
                child.id,
                format!("child cross span differs from parent {} along {cross:?}", node.id),
            );
        }
        cursor = offset + child.rect.extent(axis);
    }
    let total: f64 = node
        .children
        .iter()
        .map(|child| child.rect.extent(axis))
        .sum();
    if (total - node.rect.extent(axis)).abs() > TILING_EPSILON {
        report.error(
            InvariantCode::ChildExtentMismatch,
            node.id,
            format!(
                "children extents sum to {total}, parent extent is {}",
                node.rect.extent(axis)
            ),
        );
    }
}
