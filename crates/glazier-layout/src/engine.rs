//! Structural and dimensional edits on section trees.
//!
//! Every operation borrows the current tree and returns a new one. Invalid
//! structural edits (splitting a branch, merging the root leaf, unknown IDs)
//! return an unchanged clone; out-of-range numbers are clamped. Nothing here
//! fails, so a host can call any operation straight from an input handler.
//!
//! # Dimension edits
//!
//! [`LayoutEngine::update_child_dimension`] and
//! [`LayoutEngine::update_leaf_panel_dimension`] share one redistribution
//! rule ([`redistribute_mm`]): the requested size is clamped so every other
//! sibling can keep its minimum, the remainder is spread over the others in
//! proportion to their current size above that minimum, values are rounded
//! to whole millimeters and the rounding residue lands on the largest other
//! sibling. The total is a fixed partition, so it never changes.

use glazier_core::geometry::{Axis, Rect};
use glazier_core::units::{FrameSize, mm_to_fraction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pattern::seed_panels;
use crate::section::{
    LeafStyle, Sash, SectionId, SectionNode, SectionTree, Split, SplitDirection, SystemType,
};

/// Fewest children a split may create.
pub const MIN_SPLIT_COUNT: usize = 2;
/// Most children a split may create.
pub const MAX_SPLIT_COUNT: usize = 5;
/// Narrowest decorative panel inside a leaf.
pub const MIN_PANEL_MM: f64 = 120.0;
/// Default floor for divider drags, as a fraction of the frame.
pub const DEFAULT_MIN_DIVIDER_FRACTION: f64 = 0.05;
/// Default floor for typed child sizes.
pub const DEFAULT_MIN_SECTION_MM: f64 = 1.0;

/// Smallest normalized extent a divider drag may leave behind, even when the
/// caller asks for a zero floor.
const MIN_NORMALIZED_EXTENT: f64 = 1e-6;

/// Tunable floors and limits for layout edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Minimum child extent kept by divider drags (normalized).
    pub min_divider_fraction: f64,
    /// Minimum decorative panel width in millimeters.
    pub min_panel_mm: f64,
    /// Minimum child size for typed dimension edits in millimeters.
    pub min_section_mm: f64,
    pub min_split_count: usize,
    pub max_split_count: usize,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            min_divider_fraction: DEFAULT_MIN_DIVIDER_FRACTION,
            min_panel_mm: MIN_PANEL_MM,
            min_section_mm: DEFAULT_MIN_SECTION_MM,
            min_split_count: MIN_SPLIT_COUNT,
            max_split_count: MAX_SPLIT_COUNT,
        }
    }
}

/// Attributes for children created by a split beyond the first.
pub type SplitDefaults = LeafStyle;

/// Applies edits under one [`LayoutPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutEngine {
    policy: LayoutPolicy,
}

impl LayoutEngine {
    #[must_use]
    pub const fn new(policy: LayoutPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    /// Split leaf `target` into `count` equal parts along `direction`.
    ///
    /// `count` is clamped to the policy range. The first child inherits the
    /// target's sash, family, catalog selection, panels and fill; the rest
    /// are fixed panes styled by `base`. A `Sliding` base forces every child
    /// to `Sliding` with alternating left/right sashes.
    #[must_use]
    pub fn split(
        &self,
        tree: &SectionTree,
        target: SectionId,
        direction: SplitDirection,
        count: usize,
        base: &SplitDefaults,
    ) -> SectionTree {
        let mut next = tree.clone();
        let Some(node) = next.node(target) else {
            debug!(section = target.get(), "split ignored: unknown section");
            return next;
        };
        if !node.is_leaf() {
            debug!(section = target.get(), "split ignored: section already has children");
            return next;
        }

        let lo = self.policy.min_split_count.max(1);
        let hi = self.policy.max_split_count.max(lo);
        let count = count.clamp(lo, hi);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(id) = next.allocate_id() else {
                debug!(section = target.get(), "split ignored: section ids exhausted");
                return tree.clone();
            };
            ids.push(id);
        }

        let Some(node) = next.node_mut(target) else {
            return tree.clone();
        };
        let sliding = base.system_type == SystemType::Sliding;
        let parts = node.rect.split_even(direction.axis(), count);
        let children = parts
            .into_iter()
            .zip(ids)
            .enumerate()
            .map(|(index, (rect, id))| {
                let mut child = if index == 0 {
                    inherit_first(node, id, rect)
                } else {
                    SectionNode::leaf(id, rect, Sash::Fixed, *base)
                };
                if sliding {
                    child.system_type = SystemType::Sliding;
                    child.sash = Sash::sliding(index);
                }
                child
            })
            .collect();

        node.split = Split::from(direction);
        node.children = children;
        node.panel_fractions = None;
        node.panel_mesh_count = None;
        debug!(section = target.get(), ?direction, count, "split section");
        finish("split", next)
    }

    /// Collapse a branch back into a leaf.
    ///
    /// A leaf target merges its parent instead; the root leaf has nothing to
    /// merge and is left as is. The merged leaf reseeds its panels from the
    /// description it kept.
    #[must_use]
    pub fn merge(&self, tree: &SectionTree, target: SectionId) -> SectionTree {
        let mut next = tree.clone();
        let Some(node) = next.node(target) else {
            debug!(section = target.get(), "merge ignored: unknown section");
            return next;
        };
        let merge_id = if node.is_leaf() {
            match next.parent_of(target) {
                Some(parent) => parent.id,
                None => {
                    debug!(section = target.get(), "merge ignored: root leaf has no parent");
                    return next;
                }
            }
        } else {
            target
        };
        if let Some(node) = next.node_mut(merge_id) {
            node.split = Split::None;
            node.children.clear();
            seed_panels(node);
        }
        debug!(section = target.get(), merged = merge_id.get(), "merged section");
        finish("merge", next)
    }

    /// Move the divider between children `divider_index` and
    /// `divider_index + 1` of `parent` to `new_boundary`.
    ///
    /// `new_boundary` is a frame-normalized coordinate along the split axis.
    /// It is clamped so no leaf inside either neighbor drops below
    /// `min_fraction`; a neighbor already holding a thinner leaf cannot shrink
    /// further. Later siblings are re-flowed to stay contiguous and every
    /// resized subtree is rescaled with its container.
    #[must_use]
    pub fn resize_children_by_divider(
        &self,
        tree: &SectionTree,
        parent: SectionId,
        direction: SplitDirection,
        divider_index: usize,
        new_boundary: f64,
        min_fraction: f64,
    ) -> SectionTree {
        let mut next = tree.clone();
        let Some(node) = branch_along(&mut next, parent, direction, "divider resize") else {
            return next;
        };
        if divider_index >= node.children.len().saturating_sub(1) {
            debug!(
                parent = parent.get(),
                divider_index, "divider resize ignored: no such divider"
            );
            return next;
        }
        if !new_boundary.is_finite() {
            debug!(parent = parent.get(), "divider resize ignored: non-finite boundary");
            return next;
        }

        let axis = direction.axis();
        let floor = if min_fraction.is_finite() {
            min_fraction.max(MIN_NORMALIZED_EXTENT)
        } else {
            MIN_NORMALIZED_EXTENT
        };
        let before = node.children[divider_index].rect;
        let after = node.children[divider_index + 1].rect;
        let before_floor = neighbor_floor(&node.children[divider_index], axis, floor);
        let after_floor = neighbor_floor(&node.children[divider_index + 1], axis, floor);
        let lo = before.offset(axis) + before_floor;
        let hi = after.end(axis) - after_floor;
        if lo > hi {
            debug!(
                parent = parent.get(),
                divider_index, "divider resize ignored: neighbors already at minimum"
            );
            return next;
        }
        let boundary = new_boundary.clamp(lo, hi);
        if boundary != new_boundary {
            debug!(
                parent = parent.get(),
                requested = new_boundary,
                boundary,
                "divider boundary clamped"
            );
        }

        let mut extents: Vec<f64> = node
            .children
            .iter()
            .map(|child| child.rect.extent(axis))
            .collect();
        extents[divider_index] = boundary - before.offset(axis);
        extents[divider_index + 1] = after.end(axis) - boundary;
        reflow_children(node, axis, &extents);
        finish("resize_children_by_divider", next)
    }

    /// Set child `index` of `parent` to `new_mm` along `direction` and
    /// redistribute the rest of the parent over its other children.
    ///
    /// A parent without children (including a single-leaf frame) is left
    /// untouched; resizing the whole frame is the host's job.
    #[must_use]
    pub fn update_child_dimension(
        &self,
        tree: &SectionTree,
        parent: SectionId,
        index: usize,
        new_mm: f64,
        direction: SplitDirection,
        frame: &FrameSize,
    ) -> SectionTree {
        let mut next = tree.clone();
        let Some(node) = branch_along(&mut next, parent, direction, "child dimension") else {
            return next;
        };
        if index >= node.children.len() {
            debug!(parent = parent.get(), index, "child dimension ignored: no such child");
            return next;
        }

        let axis = direction.axis();
        let side_mm = frame.along(axis);
        let sizes: Vec<f64> = node
            .children
            .iter()
            .map(|child| frame.extent_of(&child.rect, axis))
            .collect();
        let Some(resized) = redistribute_mm(&sizes, index, new_mm, self.policy.min_section_mm)
        else {
            debug!(
                parent = parent.get(),
                index, new_mm, "child dimension ignored: sizes cannot be redistributed"
            );
            return next;
        };

        let extents: Vec<f64> = resized
            .iter()
            .map(|mm| mm_to_fraction(*mm, side_mm))
            .collect();
        reflow_children(node, axis, &extents);
        debug!(parent = parent.get(), index, new_mm, "child dimension updated");
        finish("update_child_dimension", next)
    }

    /// Set panel `index` of leaf `leaf` to `new_mm` and redistribute the
    /// leaf's width over its other panels.
    #[must_use]
    pub fn update_leaf_panel_dimension(
        &self,
        tree: &SectionTree,
        leaf: SectionId,
        index: usize,
        new_mm: f64,
        frame: &FrameSize,
    ) -> SectionTree {
        let mut next = tree.clone();
        let Some(node) = next.node_mut(leaf) else {
            debug!(leaf = leaf.get(), "panel dimension ignored: unknown section");
            return next;
        };
        if !node.is_leaf() {
            debug!(leaf = leaf.get(), "panel dimension ignored: section is not a leaf");
            return next;
        }
        let width_mm = frame.width_of(&node.rect);
        let Some(fractions) = node.panel_fractions.as_mut() else {
            debug!(leaf = leaf.get(), "panel dimension ignored: leaf has no panels");
            return next;
        };
        if index >= fractions.len() {
            debug!(leaf = leaf.get(), index, "panel dimension ignored: no such panel");
            return next;
        }

        let sizes: Vec<f64> = fractions.iter().map(|f| f * width_mm).collect();
        let Some(resized) = redistribute_mm(&sizes, index, new_mm, self.policy.min_panel_mm) else {
            debug!(
                leaf = leaf.get(),
                index, new_mm, "panel dimension ignored: leaf too narrow for its panels"
            );
            return next;
        };
        *fractions = resized
            .iter()
            .map(|mm| mm_to_fraction(*mm, width_mm))
            .collect();
        debug!(leaf = leaf.get(), index, new_mm, "panel dimension updated");
        finish("update_leaf_panel_dimension", next)
    }
}

/// Redistribute `sizes` (millimeters) after setting entry `index` to
/// `requested_mm`.
///
/// Returns `None` when there is nothing to redistribute: fewer than two
/// entries, an out-of-range index, a non-finite request, or a total too
/// small to give every entry `min_mm`. The result always sums to the input
/// total; every entry except the residue absorber is a whole millimeter.
#[must_use]
pub fn redistribute_mm(
    sizes: &[f64],
    index: usize,
    requested_mm: f64,
    min_mm: f64,
) -> Option<Vec<f64>> {
    let count = sizes.len();
    if count < 2 || index >= count || !requested_mm.is_finite() {
        return None;
    }
    let min_mm = if min_mm.is_finite() { min_mm.max(0.0) } else { 0.0 };
    let total: f64 = sizes.iter().sum();
    let others = (count - 1) as f64;
    let max_mm = total - min_mm * others;
    if !total.is_finite() || max_mm < min_mm {
        return None;
    }

    let target = requested_mm.clamp(min_mm, max_mm);
    let whole_lo = min_mm.ceil();
    let whole_hi = max_mm.floor();
    let target = if whole_lo <= whole_hi {
        target.round().clamp(whole_lo, whole_hi)
    } else {
        target
    };

    // Share the remainder above each sibling's floor in proportion to what it
    // holds above that floor today.
    let free = (total - target - min_mm * others).max(0.0);
    let excess: Vec<f64> = sizes
        .iter()
        .enumerate()
        .map(|(i, size)| if i == index { 0.0 } else { (size - min_mm).max(0.0) })
        .collect();
    let excess_sum: f64 = excess.iter().sum();
    let exact: Vec<f64> = (0..count)
        .map(|i| {
            if i == index {
                target
            } else if excess_sum > 0.0 {
                min_mm + free * excess[i] / excess_sum
            } else {
                min_mm + free / others
            }
        })
        .collect();

    let mut rounded: Vec<f64> = exact
        .iter()
        .enumerate()
        .map(|(i, mm)| if i == index { *mm } else { mm.round() })
        .collect();

    let absorber = (0..count)
        .filter(|i| *i != index)
        .fold(None::<usize>, |best, i| match best {
            Some(b) if rounded[b] >= rounded[i] => Some(b),
            _ => Some(i),
        })?;

    let settle = |rounded: &mut Vec<f64>| {
        let placed: f64 = rounded
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != absorber)
            .map(|(_, mm)| mm)
            .sum();
        rounded[absorber] = total - placed;
    };
    settle(&mut rounded);

    // Rounding several siblings up can starve the absorber; hand whole
    // millimeters back from the siblings that were rounded up the most.
    if rounded[absorber] < min_mm {
        let mut donors: Vec<usize> = (0..count)
            .filter(|i| *i != index && *i != absorber && rounded[*i] > exact[*i])
            .collect();
        donors.sort_by(|a, b| {
            (rounded[*b] - exact[*b]).total_cmp(&(rounded[*a] - exact[*a]))
        });
        for donor in donors {
            if rounded[absorber] >= min_mm {
                break;
            }
            if rounded[donor] - 1.0 >= min_mm {
                rounded[donor] -= 1.0;
                settle(&mut rounded);
            }
        }
    }

    Some(rounded)
}

fn inherit_first(source: &SectionNode, id: SectionId, rect: Rect) -> SectionNode {
    SectionNode {
        id,
        rect,
        split: Split::None,
        children: Vec::new(),
        sash: source.sash,
        system_type: source.system_type,
        series: source.series.clone(),
        description: source.description.clone(),
        panel_fractions: source.panel_fractions.clone(),
        panel_mesh_count: source.panel_mesh_count,
        glass: source.glass,
        mesh: source.mesh,
    }
}

fn branch_along<'a>(
    tree: &'a mut SectionTree,
    parent: SectionId,
    direction: SplitDirection,
    what: &str,
) -> Option<&'a mut SectionNode> {
    let Some(node) = tree.node_mut(parent) else {
        debug!(parent = parent.get(), "{what} ignored: unknown section");
        return None;
    };
    match node.split.direction() {
        None => {
            debug!(parent = parent.get(), "{what} ignored: section has no children");
            None
        }
        Some(actual) if actual != direction => {
            debug!(
                parent = parent.get(),
                ?actual,
                requested = ?direction,
                "{what} ignored: split direction mismatch"
            );
            None
        }
        Some(_) => Some(node),
    }
}

/// Smallest share of `node`'s extent along `axis` held by one of its leaves.
fn smallest_leaf_share(node: &SectionNode, axis: Axis) -> f64 {
    let extent = node.rect.extent(axis);
    let along = node.split.axis() == Some(axis);
    node.children
        .iter()
        .map(|child| {
            let inner = smallest_leaf_share(child, axis);
            if along && extent > 0.0 {
                child.rect.extent(axis) / extent * inner
            } else {
                inner
            }
        })
        .fold(1.0, f64::min)
}

/// Extent `node` must keep along `axis` so none of its leaves goes under
/// `floor`, capped at its current extent.
fn neighbor_floor(node: &SectionNode, axis: Axis, floor: f64) -> f64 {
    let extent = node.rect.extent(axis);
    let share = smallest_leaf_share(node, axis);
    if share > 0.0 {
        (floor / share).min(extent)
    } else {
        extent
    }
}

/// Lay `node`'s children out along `axis` with the given extents.
///
/// Offsets are the running sum from the parent's leading edge and the last
/// child ends exactly on the parent's trailing edge, so drift never
/// accumulates across edits.
fn reflow_children(node: &mut SectionNode, axis: Axis, extents: &[f64]) {
    let start = node.rect.offset(axis);
    let end = node.rect.end(axis);
    let last = node.children.len().saturating_sub(1);
    let mut cursor = start;
    for (index, (child, extent)) in node.children.iter_mut().zip(extents).enumerate() {
        let extent = if index == last { end - cursor } else { *extent };
        let rect = child.rect.with_span(axis, cursor, extent);
        reposition(child, rect);
        cursor += extent;
    }
}

/// Move `node` to `rect`, carrying its descendants proportionally.
pub(crate) fn reposition(node: &mut SectionNode, rect: Rect) {
    let old = node.rect;
    node.rect = rect;
    for child in &mut node.children {
        let mapped = child.rect.remap(&old, &rect);
        reposition(child, mapped);
    }
}

/// Debug builds validate every produced tree.
fn finish(operation: &'static str, tree: SectionTree) -> SectionTree {
    if cfg!(debug_assertions)
        && let Err(err) = tree.validate()
    {
        warn!(operation, %err, "layout edit produced an invalid tree");
    }
    tree
}

/// Convenience: [`LayoutEngine::split`] under the default policy.
#[must_use]
pub fn split(
    tree: &SectionTree,
    target: SectionId,
    direction: SplitDirection,
    count: usize,
    base: &SplitDefaults,
) -> SectionTree {
    LayoutEngine::default().split(tree, target, direction, count, base)
}

/// Convenience: [`LayoutEngine::merge`] under the default policy.
#[must_use]
pub fn merge(tree: &SectionTree, target: SectionId) -> SectionTree {
    LayoutEngine::default().merge(tree, target)
}

/// Convenience: [`LayoutEngine::resize_children_by_divider`].
#[must_use]
pub fn resize_children_by_divider(
    tree: &SectionTree,
    parent: SectionId,
    direction: SplitDirection,
    divider_index: usize,
    new_boundary: f64,
    min_fraction: f64,
) -> SectionTree {
    LayoutEngine::default().resize_children_by_divider(
        tree,
        parent,
        direction,
        divider_index,
        new_boundary,
        min_fraction,
    )
}

/// Convenience: [`LayoutEngine::update_child_dimension`] under the default
/// policy.
#[must_use]
pub fn update_child_dimension(
    tree: &SectionTree,
    parent: SectionId,
    index: usize,
    new_mm: f64,
    direction: SplitDirection,
    frame: &FrameSize,
) -> SectionTree {
    LayoutEngine::default().update_child_dimension(tree, parent, index, new_mm, direction, frame)
}

/// Convenience: [`LayoutEngine::update_leaf_panel_dimension`] under the
/// default policy.
#[must_use]
pub fn update_leaf_panel_dimension(
    tree: &SectionTree,
    leaf: SectionId,
    index: usize,
    new_mm: f64,
    frame: &FrameSize,
) -> SectionTree {
    LayoutEngine::default().update_leaf_panel_dimension(tree, leaf, index, new_mm, frame)
}
