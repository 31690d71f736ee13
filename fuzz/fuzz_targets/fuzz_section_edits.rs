#![no_main]

use arbitrary::Arbitrary;
use glazier_core::FrameSize;
use glazier_layout::{
    Flag, LayoutEngine, LeafStyle, SectionId, SectionTree, SplitDirection, SystemType,
    build_preset, export_scene, set_description,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Split { leaf: u8, vertical: bool, count: u8 },
    Merge { node: u8 },
    Divider { node: u8, index: u8, boundary: f64 },
    ChildDimension { node: u8, index: u8, mm: f64 },
    PanelDimension { node: u8, index: u8, mm: f64 },
    Describe { leaf: u8, description: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    preset: u8,
    width_mm: u16,
    height_mm: u16,
    edits: Vec<Edit>,
}

fn pick(ids: &[SectionId], raw: u8) -> Option<SectionId> {
    if ids.is_empty() {
        return None;
    }
    Some(ids[raw as usize % ids.len()])
}

fn apply(engine: &LayoutEngine, tree: &SectionTree, edit: &Edit, frame: &FrameSize) -> SectionTree {
    let leaves: Vec<SectionId> = tree.leaves().iter().map(|leaf| leaf.id).collect();
    let nodes: Vec<SectionId> = tree.walk().map(|node| node.id).collect();
    let direction_of = |id: SectionId| {
        tree.node(id)
            .and_then(|node| node.split.direction())
            .unwrap_or(SplitDirection::Vertical)
    };
    let base = LeafStyle::new(SystemType::Sliding, Flag::Yes, Flag::No);

    match edit {
        Edit::Split {
            leaf,
            vertical,
            count,
        } => match pick(&leaves, *leaf) {
            // Bound tree growth so each input stays fast.
            Some(target) if leaves.len() < 64 => {
                let direction = if *vertical {
                    SplitDirection::Vertical
                } else {
                    SplitDirection::Horizontal
                };
                engine.split(tree, target, direction, *count as usize, &base)
            }
            _ => tree.clone(),
        },
        Edit::Merge { node } => match pick(&nodes, *node) {
            Some(target) => engine.merge(tree, target),
            None => tree.clone(),
        },
        Edit::Divider {
            node,
            index,
            boundary,
        } => match pick(&nodes, *node) {
            Some(parent) => engine.resize_children_by_divider(
                tree,
                parent,
                direction_of(parent),
                *index as usize,
                *boundary,
                engine.policy().min_divider_fraction,
            ),
            None => tree.clone(),
        },
        Edit::ChildDimension { node, index, mm } => match pick(&nodes, *node) {
            Some(parent) => engine.update_child_dimension(
                tree,
                parent,
                *index as usize,
                *mm,
                direction_of(parent),
                frame,
            ),
            None => tree.clone(),
        },
        Edit::PanelDimension { node, index, mm } => match pick(&leaves, *node) {
            Some(leaf) => engine.update_leaf_panel_dimension(tree, leaf, *index as usize, *mm, frame),
            None => tree.clone(),
        },
        Edit::Describe { leaf, description } => match pick(&leaves, *leaf) {
            Some(leaf) => set_description(tree, leaf, description),
            None => tree.clone(),
        },
    }
}

fuzz_target!(|input: Input| {
    let system_type = match input.preset % 3 {
        0 => SystemType::Casement,
        1 => SystemType::Sliding,
        _ => SystemType::SlideNFold,
    };
    let frame = FrameSize::new(
        f64::from(input.width_mm.max(1)),
        f64::from(input.height_mm.max(1)),
    );
    let engine = LayoutEngine::default();
    let mut tree = build_preset(system_type, Flag::Yes, Flag::No);

    for edit in input.edits.iter().take(256) {
        tree = apply(&engine, &tree, edit, &frame);

        // Post-conditions that must always hold:
        let report = tree.invariant_report();
        assert!(!report.has_errors(), "edit {edit:?} broke the tree: {report:?}");
    }

    let scene = export_scene(&tree, &frame);
    assert_eq!(scene.leaves.len(), tree.leaf_count());
    assert_eq!(scene.payload.line_count(), tree.leaf_count());
});
