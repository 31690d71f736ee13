//! Recursive section tree for a partitioned window/door frame.
//!
//! A frame is a tree of [`SectionNode`]s. Branch nodes are split along one
//! axis and their children tile them exactly; leaves are the operable or
//! fixed panes a customer actually buys. Every rectangle is normalized to
//! the whole frame, so physical sizes come from multiplying by a
//! [`glazier_core::FrameSize`].
//!
//! This module holds data and read-only traversal only. Mutations live in
//! [`crate::engine`] and [`crate::leaf_edit`], which always work on clones.

use std::fmt;

use glazier_core::geometry::{Axis, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::invariant::{InvariantCode, InvariantReport, build_invariant_report};

/// Stable identifier for section nodes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(u64);

impl SectionId {
    /// Lowest valid section ID.
    pub const MIN: Self = Self(1);

    /// Create a new section ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, SectionModelError> {
        if raw == 0 {
            return Err(SectionModelError::ZeroSectionId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or `None` on overflow.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a structural split.
///
/// `Vertical` places children side by side (the dividers are vertical
/// lines); `Horizontal` stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDirection {
    Vertical,
    Horizontal,
}

impl SplitDirection {
    /// Axis along which children are laid out.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Vertical => Axis::X,
            Self::Horizontal => Axis::Y,
        }
    }
}

/// Split state of a node. `None` marks a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    #[default]
    None,
    Vertical,
    Horizontal,
}

impl Split {
    /// Direction of the split, `None` for leaves.
    #[must_use]
    pub const fn direction(self) -> Option<SplitDirection> {
        match self {
            Self::None => None,
            Self::Vertical => Some(SplitDirection::Vertical),
            Self::Horizontal => Some(SplitDirection::Horizontal),
        }
    }

    /// Layout axis of the children, `None` for leaves.
    #[must_use]
    pub const fn axis(self) -> Option<Axis> {
        match self.direction() {
            Some(direction) => Some(direction.axis()),
            None => None,
        }
    }
}

impl From<SplitDirection> for Split {
    fn from(direction: SplitDirection) -> Self {
        match direction {
            SplitDirection::Vertical => Self::Vertical,
            SplitDirection::Horizontal => Self::Horizontal,
        }
    }
}

/// Opening behavior of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sash {
    #[default]
    Fixed,
    Left,
    Right,
    Double,
    Top,
    Bottom,
}

impl Sash {
    /// Sash for position `index` in an alternating sliding run.
    #[must_use]
    pub const fn sliding(index: usize) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }

    /// True for every sash that opens.
    #[must_use]
    pub const fn is_operable(self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// Product family of a section, governing which sash glyphs apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SystemType {
    #[default]
    Casement,
    Sliding,
    #[serde(rename = "Slide N Fold")]
    SlideNFold,
}

impl SystemType {
    /// Catalog label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Casement => "Casement",
            Self::Sliding => "Sliding",
            Self::SlideNFold => "Slide N Fold",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `Yes`/`No` fill flag used for glass and mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flag {
    Yes,
    #[default]
    No,
}

impl Flag {
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

/// Fill and family attributes a new leaf receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeafStyle {
    pub system_type: SystemType,
    pub glass: Flag,
    pub mesh: Flag,
}

impl LeafStyle {
    #[must_use]
    pub const fn new(system_type: SystemType, glass: Flag, mesh: Flag) -> Self {
        Self {
            system_type,
            glass,
            mesh,
        }
    }
}

/// One node of the section tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    pub id: SectionId,
    pub rect: Rect,
    #[serde(default)]
    pub split: Split,
    /// Present iff `split != Split::None`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SectionNode>,
    #[serde(default)]
    pub sash: Sash,
    #[serde(default)]
    pub system_type: SystemType,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub description: String,
    /// Decorative sub-panes of a leaf, summing to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_fractions: Option<Vec<f64>>,
    /// Number of trailing panels rendered as mesh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_mesh_count: Option<u32>,
    #[serde(default)]
    pub glass: Flag,
    #[serde(default)]
    pub mesh: Flag,
}

impl SectionNode {
    /// Build a leaf with empty catalog selection.
    #[must_use]
    pub fn leaf(id: SectionId, rect: Rect, sash: Sash, style: LeafStyle) -> Self {
        Self {
            id,
            rect,
            split: Split::None,
            children: Vec::new(),
            sash,
            system_type: style.system_type,
            series: String::new(),
            description: String::new(),
            panel_fractions: None,
            panel_mesh_count: None,
            glass: style.glass,
            mesh: style.mesh,
        }
    }

    /// True when the node is an undivided pane.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.split == Split::None
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Find a node by ID in this subtree.
    #[must_use]
    pub fn find(&self, id: SectionId) -> Option<&SectionNode> {
        self.walk().find(|node| node.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: SectionId) -> Option<&mut SectionNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Find the direct parent of `id` in this subtree.
    #[must_use]
    pub fn parent_of(&self, id: SectionId) -> Option<&SectionNode> {
        self.walk()
            .find(|node| node.children.iter().any(|child| child.id == id))
    }

    /// Largest ID used in this subtree.
    #[must_use]
    pub fn max_id(&self) -> SectionId {
        self.walk()
            .map(|node| node.id)
            .max()
            .unwrap_or(SectionId::MIN)
    }
}

/// Pre-order iterator returned by [`SectionNode::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<&'a SectionNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SectionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Quantization applied to coordinates before ordering leaves, so values that
/// differ only by floating residue sort as equal.
const ORDER_SCALE: f64 = 1e9;

fn order_key(node: &SectionNode) -> (i64, i64) {
    (
        (node.rect.y * ORDER_SCALE).round() as i64,
        (node.rect.x * ORDER_SCALE).round() as i64,
    )
}

/// A section tree with its ID allocator.
///
/// Values are cheap to reason about: every edit clones the whole tree, so a
/// `SectionTree` held by history never aliases the one being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTree {
    root: SectionNode,
    next_id: SectionId,
}

impl SectionTree {
    /// Wrap a root built by trusted code, deriving the next free ID.
    pub(crate) fn from_root_unchecked(root: SectionNode) -> Self {
        let next_id = root.max_id().checked_next().unwrap_or(SectionId(u64::MAX));
        Self { root, next_id }
    }

    /// Validate an externally built root and wrap it.
    pub fn from_root(root: SectionNode) -> Result<Self, SectionModelError> {
        let tree = Self::from_root_unchecked(root);
        tree.validate()?;
        Ok(tree)
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &SectionNode {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut SectionNode {
        &mut self.root
    }

    /// Unwrap into the root node.
    #[must_use]
    pub fn into_root(self) -> SectionNode {
        self.root
    }

    /// Next ID the allocator will hand out.
    #[must_use]
    pub const fn next_id(&self) -> SectionId {
        self.next_id
    }

    /// Allocate a fresh ID, or `None` when the ID space is exhausted.
    pub(crate) fn allocate_id(&mut self) -> Option<SectionId> {
        let current = self.next_id;
        self.next_id = current.checked_next()?;
        Some(current)
    }

    /// Look up a node by ID.
    #[must_use]
    pub fn node(&self, id: SectionId) -> Option<&SectionNode> {
        self.root.find(id)
    }

    pub(crate) fn node_mut(&mut self, id: SectionId) -> Option<&mut SectionNode> {
        self.root.find_mut(id)
    }

    /// Direct parent of `id`, `None` for the root or unknown IDs.
    #[must_use]
    pub fn parent_of(&self, id: SectionId) -> Option<&SectionNode> {
        self.root.parent_of(id)
    }

    /// Pre-order walk over every node.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    /// Leaves ordered top-to-bottom, then left-to-right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&SectionNode> {
        let mut leaves: Vec<&SectionNode> = self.walk().filter(|node| node.is_leaf()).collect();
        leaves.sort_by_key(|node| order_key(node));
        leaves
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.walk().filter(|node| node.is_leaf()).count()
    }

    /// Deep clone of the subtree rooted at `id`.
    #[must_use]
    pub fn subtree(&self, id: SectionId) -> Option<SectionNode> {
        self.node(id).cloned()
    }

    /// Inspect invariants and emit a structured diagnostics report.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        build_invariant_report(&self.root, self.next_id)
    }

    /// Fail with the first error-level invariant finding.
    pub fn validate(&self) -> Result<(), SectionModelError> {
        let report = self.invariant_report();
        match report.first_error() {
            Some(issue) => Err(SectionModelError::Invariant {
                code: issue.code,
                node_id: issue.node_id,
                message: issue.message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Validation errors for section tree construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionModelError {
    #[error("section id must be non-zero")]
    ZeroSectionId,
    #[error("invariant {code:?} violated at node {}: {message}", display_node(.node_id))]
    Invariant {
        code: InvariantCode,
        node_id: Option<SectionId>,
        message: String,
    },
}

fn display_node(node_id: &Option<SectionId>) -> String {
    node_id.map_or_else(|| "-".to_string(), |id| id.to_string())
}
