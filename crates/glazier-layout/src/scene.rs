//! Flatten a section tree into the scene consumed by renderers and quoting.
//!
//! The scene is a pure function of `(tree, frame)`. Renderers paint from the
//! leaf descriptors, the quotation builder takes [`ItemPayload`] verbatim,
//! and every [`DimensionAnchor`] names the engine operation its label edits.

use glazier_core::geometry::{Axis, Point, Rect};
use glazier_core::units::{FrameSize, round_mm};
use serde::{Deserialize, Serialize};

use crate::section::{Flag, Sash, SectionId, SectionNode, SectionTree, SplitDirection, SystemType};

/// `system_type` label carried by multi-leaf payloads.
pub const COMBINATION_SYSTEM_TYPE: &str = "Combination";

const SQ_MM_PER_SQ_M: f64 = 1_000_000.0;

/// Everything a host needs to draw and quote the current tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub frame: FrameSize,
    /// Leaves top-to-bottom, then left-to-right.
    pub leaves: Vec<LeafDescriptor>,
    pub payload: ItemPayload,
    pub anchors: Vec<DimensionAnchor>,
}

/// Physical description of one leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafDescriptor {
    pub id: SectionId,
    pub rect: Rect,
    pub width_mm: f64,
    pub height_mm: f64,
    pub area_sqm: f64,
    pub sash: Sash,
    pub system_type: SystemType,
    pub series: String,
    pub description: String,
    pub glass: Flag,
    pub mesh: Flag,
    /// Decorative sub-panes, left to right; empty for a plain leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<PanelDescriptor>,
}

/// One decorative pane inside a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub index: usize,
    pub rect: Rect,
    pub width_mm: f64,
    /// Trailing panels rendered as mesh instead of glass.
    pub mesh: bool,
}

/// Quotation line for one leaf, in whole millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub system_type: SystemType,
    pub series: String,
    pub description: String,
    pub width_mm: u32,
    pub height_mm: u32,
    pub area_sqm: f64,
    pub sash: Sash,
    pub glass: Flag,
    pub mesh: Flag,
}

/// Quotation payload for a frame holding several leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationItem {
    /// Always [`COMBINATION_SYSTEM_TYPE`].
    pub system_type: String,
    pub width_mm: u32,
    pub height_mm: u32,
    pub area_sqm: f64,
    pub sub_items: Vec<LineItem>,
}

/// Single-item or combined payload for the quotation builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPayload {
    Single(LineItem),
    Combination(CombinationItem),
}

impl ItemPayload {
    /// Number of line items the payload expands to.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Combination(item) => item.sub_items.len(),
        }
    }
}

/// Editable dimension label positioned in normalized frame space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAnchor {
    pub at: Point,
    pub kind: AnchorKind,
}

/// What a dimension label shows and which edit it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnchorKind {
    /// Sizes on both sides of a structural divider; edited through
    /// `update_child_dimension` on `parent`.
    Divider {
        parent: SectionId,
        divider_index: usize,
        direction: SplitDirection,
        before_mm: f64,
        after_mm: f64,
    },
    /// Panel widths of one leaf; edited through `update_leaf_panel_dimension`.
    PanelWidths { leaf: SectionId, panels_mm: Vec<f64> },
    OverallWidth { mm: f64 },
    OverallHeight { mm: f64 },
}

/// Flatten `tree` at physical size `frame`.
#[must_use]
pub fn export_scene(tree: &SectionTree, frame: &FrameSize) -> Scene {
    let leaf_nodes = tree.leaves();
    let leaves: Vec<LeafDescriptor> = leaf_nodes
        .iter()
        .map(|node| describe_leaf(node, frame))
        .collect();
    let payload = build_payload(&leaves, frame);

    let mut anchors = vec![
        DimensionAnchor {
            at: Point::new(0.5, 1.0),
            kind: AnchorKind::OverallWidth { mm: frame.width_mm },
        },
        DimensionAnchor {
            at: Point::new(1.0, 0.5),
            kind: AnchorKind::OverallHeight { mm: frame.height_mm },
        },
    ];
    for node in tree.walk() {
        divider_anchors(node, frame, &mut anchors);
    }
    for leaf in &leaves {
        if leaf.panels.is_empty() {
            continue;
        }
        anchors.push(DimensionAnchor {
            at: Point::new(leaf.rect.center().x, leaf.rect.bottom()),
            kind: AnchorKind::PanelWidths {
                leaf: leaf.id,
                panels_mm: leaf.panels.iter().map(|panel| panel.width_mm).collect(),
            },
        });
    }

    Scene {
        frame: *frame,
        leaves,
        payload,
        anchors,
    }
}

fn describe_leaf(node: &SectionNode, frame: &FrameSize) -> LeafDescriptor {
    let width_mm = frame.width_of(&node.rect);
    let height_mm = frame.height_of(&node.rect);
    LeafDescriptor {
        id: node.id,
        rect: node.rect,
        width_mm,
        height_mm,
        area_sqm: width_mm * height_mm / SQ_MM_PER_SQ_M,
        sash: node.sash,
        system_type: node.system_type,
        series: node.series.clone(),
        description: node.description.clone(),
        glass: node.glass,
        mesh: node.mesh,
        panels: describe_panels(node, width_mm),
    }
}

fn describe_panels(node: &SectionNode, width_mm: f64) -> Vec<PanelDescriptor> {
    let Some(fractions) = &node.panel_fractions else {
        return Vec::new();
    };
    let mesh_count = node.panel_mesh_count.unwrap_or(0) as usize;
    let first_mesh = fractions.len().saturating_sub(mesh_count);
    let rect = node.rect;
    let mut x = rect.x;
    fractions
        .iter()
        .enumerate()
        .map(|(index, fraction)| {
            let w = if index + 1 == fractions.len() {
                rect.right() - x
            } else {
                rect.w * fraction
            };
            let panel = PanelDescriptor {
                index,
                rect: rect.with_span(Axis::X, x, w),
                width_mm: width_mm * fraction,
                mesh: index >= first_mesh,
            };
            x += w;
            panel
        })
        .collect()
}

fn divider_anchors(node: &SectionNode, frame: &FrameSize, anchors: &mut Vec<DimensionAnchor>) {
    let Some(direction) = node.split.direction() else {
        return;
    };
    let axis = direction.axis();
    let cross_mid = node.rect.offset(axis.cross()) + node.rect.extent(axis.cross()) / 2.0;
    for (divider_index, pair) in node.children.windows(2).enumerate() {
        let (before, after) = (&pair[0], &pair[1]);
        let boundary = after.rect.offset(axis);
        let at = match axis {
            Axis::X => Point::new(boundary, cross_mid),
            Axis::Y => Point::new(cross_mid, boundary),
        };
        anchors.push(DimensionAnchor {
            at,
            kind: AnchorKind::Divider {
                parent: node.id,
                divider_index,
                direction,
                before_mm: frame.extent_of(&before.rect, axis),
                after_mm: frame.extent_of(&after.rect, axis),
            },
        });
    }
}

fn line_item(leaf: &LeafDescriptor) -> LineItem {
    LineItem {
        system_type: leaf.system_type,
        series: leaf.series.clone(),
        description: leaf.description.clone(),
        width_mm: round_mm(leaf.width_mm),
        height_mm: round_mm(leaf.height_mm),
        area_sqm: leaf.area_sqm,
        sash: leaf.sash,
        glass: leaf.glass,
        mesh: leaf.mesh,
    }
}

fn build_payload(leaves: &[LeafDescriptor], frame: &FrameSize) -> ItemPayload {
    match leaves {
        [single] => ItemPayload::Single(line_item(single)),
        _ => ItemPayload::Combination(CombinationItem {
            system_type: COMBINATION_SYSTEM_TYPE.to_string(),
            width_mm: round_mm(frame.width_mm),
            height_mm: round_mm(frame.height_mm),
            area_sqm: frame.width_mm * frame.height_mm / SQ_MM_PER_SQ_M,
            sub_items: leaves.iter().map(line_item).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::split;
    use crate::leaf_edit::set_description;
    use crate::preset::build_preset;
    use crate::section::LeafStyle;

    fn id(raw: u64) -> SectionId {
        SectionId::new(raw).expect("test ID must be non-zero")
    }

    fn frame() -> FrameSize {
        FrameSize::new(1500.0, 1200.0)
    }

    #[test]
    fn casement_exports_single_payload() {
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let scene = export_scene(&tree, &frame());
        assert_eq!(scene.leaves.len(), 1);
        assert!((scene.leaves[0].area_sqm - 1.8).abs() < 1e-12);
        let ItemPayload::Single(item) = &scene.payload else {
            panic!("expected single payload, got {:?}", scene.payload);
        };
        assert_eq!(item.width_mm, 1500);
        assert_eq!(item.height_mm, 1200);
        assert_eq!(item.sash, Sash::Double);
        // Only the two overall anchors.
        assert_eq!(scene.anchors.len(), 2);
    }

    #[test]
    fn sliding_split_exports_combination_in_reading_order() {
        let tree = build_preset(SystemType::Sliding, Flag::Yes, Flag::No);
        let base = LeafStyle::new(SystemType::Sliding, Flag::Yes, Flag::No);
        let tree = split(&tree, id(2), SplitDirection::Vertical, 2, &base);
        let scene = export_scene(&tree, &frame());

        let xs: Vec<f64> = scene.leaves.iter().map(|leaf| leaf.rect.x).collect();
        assert_eq!(xs, vec![0.0, 0.25, 0.5]);
        let ItemPayload::Combination(item) = &scene.payload else {
            panic!("expected combination payload");
        };
        assert_eq!(item.system_type, COMBINATION_SYSTEM_TYPE);
        assert_eq!(item.sub_items.len(), 3);
        assert_eq!(item.sub_items[0].width_mm, 375);
        assert_eq!(scene.payload.line_count(), 3);
    }

    #[test]
    fn divider_anchors_report_both_sides() {
        let tree = build_preset(SystemType::Sliding, Flag::Yes, Flag::No);
        let scene = export_scene(&tree, &frame());
        let dividers: Vec<&DimensionAnchor> = scene
            .anchors
            .iter()
            .filter(|anchor| matches!(anchor.kind, AnchorKind::Divider { .. }))
            .collect();
        assert_eq!(dividers.len(), 1);
        assert_eq!(dividers[0].at, Point::new(0.5, 0.5));
        let AnchorKind::Divider {
            parent,
            divider_index,
            before_mm,
            after_mm,
            ..
        } = &dividers[0].kind
        else {
            unreachable!();
        };
        assert_eq!(*parent, id(1));
        assert_eq!(*divider_index, 0);
        assert_eq!((*before_mm, *after_mm), (750.0, 750.0));
    }

    #[test]
    fn panel_anchor_and_mesh_flags() {
        let tree = build_preset(SystemType::Casement, Flag::Yes, Flag::No);
        let tree = set_description(&tree, id(1), "2 Glass + 1 Mesh");
        let scene = export_scene(&tree, &frame());
        let panels = &scene.leaves[0].panels;
        assert_eq!(panels.len(), 3);
        assert_eq!(
            panels.iter().map(|p| p.mesh).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert!((panels[2].rect.right() - 1.0).abs() < 1e-12);
        assert!(scene.anchors.iter().any(|anchor| matches!(
            &anchor.kind,
            AnchorKind::PanelWidths { leaf, panels_mm } if *leaf == id(1) && panels_mm.len() == 3
        )));
    }

    #[test]
    fn payload_json_shape() {
        let tree = build_preset(SystemType::SlideNFold, Flag::No, Flag::Yes);
        let scene = export_scene(&tree, &frame());
        let json = serde_json::to_value(&scene.payload).expect("serialize payload");
        assert_eq!(json["kind"], "combination");
        assert_eq!(json["system_type"], "Combination");
        assert_eq!(json["sub_items"][0]["system_type"], "Slide N Fold");
        assert_eq!(json["sub_items"][0]["mesh"], "Yes");
        assert_eq!(json["sub_items"].as_array().map(Vec::len), Some(3));
    }
}
