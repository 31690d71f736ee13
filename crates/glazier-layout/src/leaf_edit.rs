//! Attribute edits on single leaves.
//!
//! Like the structural edits these clone the tree and never fail: an unknown
//! ID or a branch target returns the tree unchanged.

use tracing::debug;

use crate::pattern::seed_panels;
use crate::section::{Flag, Sash, SectionId, SectionNode, SectionTree, SystemType};

fn edit_leaf(
    tree: &SectionTree,
    leaf: SectionId,
    what: &'static str,
    apply: impl FnOnce(&mut SectionNode),
) -> SectionTree {
    let mut next = tree.clone();
    match next.node_mut(leaf) {
        Some(node) if node.is_leaf() => {
            apply(node);
            debug!(leaf = leaf.get(), what, "leaf attribute updated");
        }
        Some(_) => debug!(leaf = leaf.get(), what, "leaf edit ignored: section has children"),
        None => debug!(leaf = leaf.get(), what, "leaf edit ignored: unknown section"),
    }
    next
}

/// Set the catalog description and reseed the leaf's panels from it.
#[must_use]
pub fn set_description(tree: &SectionTree, leaf: SectionId, description: &str) -> SectionTree {
    edit_leaf(tree, leaf, "description", |node| {
        node.description = description.to_string();
        seed_panels(node);
    })
}

/// Set the series. The description belongs to a series, so it and the panel
/// layout are cleared.
#[must_use]
pub fn set_series(tree: &SectionTree, leaf: SectionId, series: &str) -> SectionTree {
    edit_leaf(tree, leaf, "series", |node| {
        if node.series != series {
            node.series = series.to_string();
            clear_description(node);
        }
    })
}

#[must_use]
pub fn set_sash(tree: &SectionTree, leaf: SectionId, sash: Sash) -> SectionTree {
    edit_leaf(tree, leaf, "sash", |node| node.sash = sash)
}

#[must_use]
pub fn set_glass(tree: &SectionTree, leaf: SectionId, glass: Flag) -> SectionTree {
    edit_leaf(tree, leaf, "glass", |node| node.glass = glass)
}

#[must_use]
pub fn set_mesh(tree: &SectionTree, leaf: SectionId, mesh: Flag) -> SectionTree {
    edit_leaf(tree, leaf, "mesh", |node| node.mesh = mesh)
}

/// Move a leaf to another product family, dropping its catalog selection.
#[must_use]
pub fn set_system_type(
    tree: &SectionTree,
    leaf: SectionId,
    system_type: SystemType,
) -> SectionTree {
    edit_leaf(tree, leaf, "system_type", |node| {
        if node.system_type != system_type {
            node.system_type = system_type;
            node.series.clear();
            clear_description(node);
        }
    })
}

fn clear_description(node: &mut SectionNode) {
    node.description.clear();
    node.panel_fractions = None;
    node.panel_mesh_count = None;
}
