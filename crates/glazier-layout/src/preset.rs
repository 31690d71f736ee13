//! Canonical starting trees per base system type.

use glazier_core::geometry::{Axis, Rect};

use crate::section::{Flag, LeafStyle, Sash, SectionId, SectionNode, SectionTree, Split, SystemType};

/// Build the starting tree for `system_type` with every leaf filled per
/// `glass`/`mesh`.
///
/// - `Casement`: one double-hinged leaf.
/// - `Sliding`: two equal columns, `left` then `right`.
/// - `Slide N Fold`: three equal columns, all `right`.
#[must_use]
pub fn build_preset(system_type: SystemType, glass: Flag, mesh: Flag) -> SectionTree {
    let style = LeafStyle::new(system_type, glass, mesh);
    let sashes: &[Sash] = match system_type {
        SystemType::Casement => &[Sash::Double],
        SystemType::Sliding => &[Sash::Left, Sash::Right],
        SystemType::SlideNFold => &[Sash::Right, Sash::Right, Sash::Right],
    };

    let mut root = SectionNode::leaf(SectionId::MIN, Rect::UNIT, sashes[0], style);
    if sashes.len() > 1 {
        root.split = Split::Vertical;
        root.sash = Sash::Fixed;
        let mut next = SectionId::MIN;
        root.children = Rect::UNIT
            .split_even(Axis::X, sashes.len())
            .into_iter()
            .zip(sashes)
            .map(|(rect, sash)| {
                next = next.checked_next().unwrap_or(next);
                SectionNode::leaf(next, rect, *sash, style)
            })
            .collect();
    }
    SectionTree::from_root_unchecked(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casement_is_a_single_double_leaf() {
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let root = tree.root();
        assert!(root.is_leaf());
        assert_eq!(root.sash, Sash::Double);
        assert_eq!(root.rect, Rect::UNIT);
        assert_eq!(root.glass, Flag::Yes);
        assert_eq!(root.mesh, Flag::No);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn sliding_has_left_then_right() {
        let tree = build_preset(SystemType::Sliding, Flag::Yes, Flag::Yes);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].sash, Sash::Left);
        assert_eq!(leaves[1].sash, Sash::Right);
        assert_eq!(leaves[0].rect, Rect::new(0.0, 0.0, 0.5, 1.0));
        assert_eq!(leaves[1].rect, Rect::new(0.5, 0.0, 0.5, 1.0));
        assert!(leaves.iter().all(|leaf| leaf.system_type == SystemType::Sliding));
        assert!(leaves.iter().all(|leaf| leaf.mesh == Flag::Yes));
        assert_eq!(tree.root().split, Split::Vertical);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn slide_n_fold_has_three_right_leaves() {
        let tree = build_preset(SystemType::SlideNFold, Flag::No, Flag::No);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 3);
        assert!(leaves.iter().all(|leaf| leaf.sash == Sash::Right));
        assert!(leaves.iter().all(|leaf| leaf.glass == Flag::No));
        assert!((leaves[1].rect.w - 1.0 / 3.0).abs() < 1e-12);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn preset_ids_are_unique_and_allocator_is_ahead() {
        let tree = build_preset(SystemType::SlideNFold, Flag::Yes, Flag::No);
        let ids: Vec<u64> = tree.walk().map(|node| node.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(tree.next_id().get(), 5);
    }
}
