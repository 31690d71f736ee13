//! Property/fuzz-style invariants for section tree edits.
//!
//! Random operation streams run against the public engine API; after every
//! step the tree must still tile its frame, keep unique IDs and keep its
//! panel fractions normalized. Dimension edits must conserve the edited
//! total and respect their floors.

use glazier_layout::{
    FrameSize, LayoutEngine, LayoutPolicy, LeafStyle, SectionId, SectionTree, SplitDirection,
    SystemType, TILING_EPSILON, Flag, build_preset, redistribute_mm, set_description,
};
use proptest::prelude::*;

const DESCRIPTIONS: [&str; 6] = [
    "2 Panel",
    "3 Panel",
    "2 Panel (40+60)",
    "4 Track 2 Glass 2 Mesh",
    "2 Glass + 1 Mesh",
    "Fix",
];

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }

    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[derive(Debug, Clone)]
enum Edit {
    Split {
        target: SectionId,
        direction: SplitDirection,
        count: usize,
    },
    Merge {
        target: SectionId,
    },
    Divider {
        parent: SectionId,
        direction: SplitDirection,
        divider_index: usize,
        boundary: f64,
    },
    ChildDimension {
        parent: SectionId,
        direction: SplitDirection,
        index: usize,
        mm: f64,
    },
    PanelDimension {
        leaf: SectionId,
        index: usize,
        mm: f64,
    },
    Describe {
        leaf: SectionId,
        description: &'static str,
    },
}

fn random_direction(rng: &mut Lcg) -> SplitDirection {
    if rng.choose_bool() {
        SplitDirection::Vertical
    } else {
        SplitDirection::Horizontal
    }
}

fn random_edit(tree: &SectionTree, rng: &mut Lcg) -> Edit {
    let leaves: Vec<SectionId> = tree.leaves().iter().map(|leaf| leaf.id).collect();
    let branches: Vec<(SectionId, SplitDirection, usize)> = tree
        .walk()
        .filter_map(|node| {
            node.split
                .direction()
                .map(|direction| (node.id, direction, node.children.len()))
        })
        .collect();
    let nodes: Vec<SectionId> = tree.walk().map(|node| node.id).collect();

    let mut candidates = vec![1usize, 2, 6];
    // Keep trees from growing without bound.
    if leaves.len() < 40 {
        candidates.push(0);
    }
    if !branches.is_empty() {
        candidates.extend([3, 4]);
    }
    if tree.walk().any(|node| node.panel_fractions.is_some()) {
        candidates.push(5);
    }

    match candidates[rng.choose_index(candidates.len())] {
        0 => Edit::Split {
            target: leaves[rng.choose_index(leaves.len())],
            direction: random_direction(rng),
            count: 1 + rng.choose_index(6),
        },
        1 => Edit::Merge {
            target: nodes[rng.choose_index(nodes.len())],
        },
        3 => {
            let (parent, direction, count) = branches[rng.choose_index(branches.len())];
            Edit::Divider {
                parent,
                direction,
                divider_index: rng.choose_index(count),
                boundary: rng.next_unit() * 1.2 - 0.1,
            }
        }
        4 => {
            let (parent, direction, count) = branches[rng.choose_index(branches.len())];
            Edit::ChildDimension {
                parent,
                direction,
                index: rng.choose_index(count),
                mm: rng.next_unit() * 2000.0 - 100.0,
            }
        }
        5 => {
            let with_panels: Vec<(SectionId, usize)> = tree
                .walk()
                .filter_map(|node| {
                    node.panel_fractions
                        .as_ref()
                        .map(|fractions| (node.id, fractions.len()))
                })
                .collect();
            let (leaf, count) = with_panels[rng.choose_index(with_panels.len())];
            Edit::PanelDimension {
                leaf,
                index: rng.choose_index(count),
                mm: rng.next_unit() * 1600.0,
            }
        }
        _ => Edit::Describe {
            leaf: leaves[rng.choose_index(leaves.len())],
            description: DESCRIPTIONS[rng.choose_index(DESCRIPTIONS.len())],
        },
    }
}

fn apply(engine: &LayoutEngine, tree: &SectionTree, edit: &Edit, frame: &FrameSize) -> SectionTree {
    let base = LeafStyle::new(SystemType::Sliding, Flag::Yes, Flag::No);
    match edit {
        Edit::Split {
            target,
            direction,
            count,
        } => engine.split(tree, *target, *direction, *count, &base),
        Edit::Merge { target } => engine.merge(tree, *target),
        Edit::Divider {
            parent,
            direction,
            divider_index,
            boundary,
        } => engine.resize_children_by_divider(
            tree,
            *parent,
            *direction,
            *divider_index,
            *boundary,
            engine.policy().min_divider_fraction,
        ),
        Edit::ChildDimension {
            parent,
            direction,
            index,
            mm,
        } => engine.update_child_dimension(tree, *parent, *index, *mm, *direction, frame),
        Edit::PanelDimension { leaf, index, mm } => {
            engine.update_leaf_panel_dimension(tree, *leaf, *index, *mm, frame)
        }
        Edit::Describe { leaf, description } => set_description(tree, *leaf, description),
    }
}

fn assert_tree_invariants(tree: &SectionTree) {
    tree.validate()
        .expect("tree should remain structurally valid");
    let report = tree.invariant_report();
    assert!(
        !report.has_errors(),
        "invariant report contains errors: {:?}",
        report.issues
    );
    let area: f64 = tree.leaves().iter().map(|leaf| leaf.rect.area()).sum();
    assert!((area - 1.0).abs() < 1e-6, "leaves cover {area} of the frame");
}

fn run_sequence(seed: u64, steps: usize) -> (SectionTree, Vec<Edit>) {
    let engine = LayoutEngine::default();
    let frame = FrameSize::default();
    let mut tree = build_preset(SystemType::Sliding, Flag::Yes, Flag::No);
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);

    for step in 0..steps {
        let edit = random_edit(&tree, &mut rng);
        let next = apply(&engine, &tree, &edit, &frame);
        assert!(
            next.validate().is_ok(),
            "edit broke the tree at step {step}, seed={seed}, edit={edit:?}"
        );
        assert!(next.next_id() >= tree.next_id(), "ids must never be reused");
        tree = next;
        assert_tree_invariants(&tree);
        applied.push(edit);
    }

    (tree, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_edit_streams_preserve_invariants(
        seed in any::<u64>(),
        steps in 20usize..120,
    ) {
        let (tree, _) = run_sequence(seed, steps);
        assert_tree_invariants(&tree);
    }

    #[test]
    fn random_edit_streams_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..80,
    ) {
        let (final_tree, edits) = run_sequence(seed, steps);
        let engine = LayoutEngine::default();
        let frame = FrameSize::default();
        let mut replay = build_preset(SystemType::Sliding, Flag::Yes, Flag::No);
        for edit in &edits {
            replay = apply(&engine, &replay, edit, &frame);
        }
        prop_assert_eq!(replay, final_tree);
    }

    #[test]
    fn child_dimension_conserves_parent_total(
        count in 2usize..6,
        index in 0usize..5,
        requested in -500.0f64..3000.0,
        width in 300.0f64..4000.0,
    ) {
        let index = index % count;
        let frame = FrameSize::new(width, 1200.0);
        let engine = LayoutEngine::default();
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let base = LeafStyle::default();
        let tree = engine.split(&tree, SectionId::MIN, SplitDirection::Vertical, count, &base);
        let next = engine.update_child_dimension(
            &tree,
            SectionId::MIN,
            index,
            requested,
            SplitDirection::Vertical,
            &frame,
        );
        let widths: Vec<f64> = next
            .root()
            .children
            .iter()
            .map(|child| frame.width_of(&child.rect))
            .collect();
        let total: f64 = widths.iter().sum();
        prop_assert!((total - width).abs() <= 1.0, "total {} vs {}", total, width);
        for mm in &widths {
            prop_assert!(*mm >= engine.policy().min_section_mm - 1e-6);
        }
        prop_assert!(next.validate().is_ok());
    }

    #[test]
    fn panel_dimension_keeps_panel_floor(
        description in prop::sample::select(vec!["2 Panel", "3 Panel", "2 Panel (40+60)"]),
        index in 0usize..3,
        requested in 0.0f64..3000.0,
        width in 400.0f64..4000.0,
    ) {
        let frame = FrameSize::new(width, 1200.0);
        let engine = LayoutEngine::default();
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let tree = set_description(&tree, SectionId::MIN, description);
        let panels = tree.root().panel_fractions.as_ref().map_or(0, Vec::len);
        let index = index % panels;
        let next = engine.update_leaf_panel_dimension(&tree, SectionId::MIN, index, requested, &frame);
        let fractions = next.root().panel_fractions.clone().unwrap_or_default();
        let sum: f64 = fractions.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-6);
        if width >= engine.policy().min_panel_mm * panels as f64 {
            for fraction in &fractions {
                prop_assert!(fraction * width >= engine.policy().min_panel_mm - 1e-6);
            }
        }
    }

    #[test]
    fn divider_resize_respects_min_fraction(
        count in 2usize..6,
        divider in 0usize..4,
        boundary in -0.5f64..1.5,
        min_fraction in 0.0f64..0.1,
    ) {
        let engine = LayoutEngine::default();
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let base = LeafStyle::default();
        let tree = engine.split(&tree, SectionId::MIN, SplitDirection::Horizontal, count, &base);
        let divider = divider % (count - 1);
        let next = engine.resize_children_by_divider(
            &tree,
            SectionId::MIN,
            SplitDirection::Horizontal,
            divider,
            boundary,
            min_fraction,
        );
        let children = &next.root().children;
        prop_assert!(children[divider].rect.h >= min_fraction - TILING_EPSILON);
        prop_assert!(children[divider + 1].rect.h >= min_fraction - TILING_EPSILON);
        prop_assert!(next.validate().is_ok());
    }

    #[test]
    fn divider_resize_keeps_nested_leaves_above_floor(
        count in 2usize..6,
        divider in 0usize..4,
        nested in 0usize..6,
        nested_count in 2usize..5,
        boundary in -0.5f64..1.5,
        min_fraction in 0.0f64..0.1,
    ) {
        let engine = LayoutEngine::default();
        let base = LeafStyle::default();
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let tree = engine.split(&tree, SectionId::MIN, SplitDirection::Horizontal, count, &base);
        let nested_id = tree.root().children[nested % count].id;
        let tree = engine.split(&tree, nested_id, SplitDirection::Horizontal, nested_count, &base);
        let divider = divider % (count - 1);
        let next = engine.resize_children_by_divider(
            &tree,
            SectionId::MIN,
            SplitDirection::Horizontal,
            divider,
            boundary,
            min_fraction,
        );
        prop_assert!(next.validate().is_ok());
        for leaf in tree.leaves() {
            let after = next.node(leaf.id).expect("leaf survives a resize");
            // Leaves already under the floor may not shrink further.
            let floor = min_fraction.min(leaf.rect.h);
            prop_assert!(
                after.rect.h >= floor - TILING_EPSILON,
                "leaf {} went from {} to {}",
                leaf.id.get(),
                leaf.rect.h,
                after.rect.h
            );
        }
    }

    #[test]
    fn redistribution_is_a_partition(
        sizes in prop::collection::vec(1.0f64..800.0, 2..6),
        index in 0usize..6,
        requested in -100.0f64..5000.0,
    ) {
        let index = index % sizes.len();
        let total: f64 = sizes.iter().sum();
        let Some(out) = redistribute_mm(&sizes, index, requested, 1.0) else {
            prop_assert!(total < sizes.len() as f64);
            return Ok(());
        };
        let sum: f64 = out.iter().sum();
        prop_assert!((sum - total).abs() < 1e-6);
        for mm in &out {
            prop_assert!(*mm >= 1.0 - 1e-9, "{:?}", out);
        }
    }
}

#[test]
fn edit_fuzz_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        let (tree, _) = run_sequence(seed, 180);
        assert_tree_invariants(&tree);
    }
}

#[test]
fn sliding_split_scenario_orders_leaves_left_to_right() {
    let tree = build_preset(SystemType::Sliding, Flag::Yes, Flag::No);
    let first = tree.leaves()[0].id;
    let base = LeafStyle::new(SystemType::Sliding, Flag::Yes, Flag::No);
    let next = LayoutEngine::default().split(&tree, first, SplitDirection::Vertical, 2, &base);
    let xs: Vec<f64> = next.leaves().iter().map(|leaf| leaf.rect.x).collect();
    assert_eq!(next.leaf_count(), 3);
    assert!(xs.windows(2).all(|pair| pair[0] < pair[1]), "{xs:?}");
}

#[test]
fn custom_policy_changes_split_limits() {
    let policy = LayoutPolicy {
        max_split_count: 3,
        ..LayoutPolicy::default()
    };
    let engine = LayoutEngine::new(policy);
    let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
    let next = engine.split(&tree, SectionId::MIN, SplitDirection::Vertical, 5, &LeafStyle::default());
    assert_eq!(next.root().children.len(), 3);
}
