#![forbid(unsafe_code)]

//! Section tree model and editing engine for partitioned window frames.
//!
//! A frame starts as a [`preset`](build_preset) for its base product family
//! and is then divided, merged and resized by the [`LayoutEngine`]. Every
//! edit returns a fresh [`SectionTree`]; the caller decides whether the new
//! tree is committed to history or shown as a live preview.
//!
//! [`export_scene`] turns a tree and a physical [`FrameSize`] into the only
//! payload hosts consume: leaf descriptors for drawing, a quotation payload,
//! and dimension anchors for editable labels.

pub mod engine;
pub mod invariant;
pub mod leaf_edit;
pub mod pattern;
pub mod preset;
pub mod scene;
pub mod section;

pub use glazier_core::geometry::{Axis, Point, Rect, TILING_EPSILON};
pub use glazier_core::units::FrameSize;

pub use engine::{
    DEFAULT_MIN_DIVIDER_FRACTION, DEFAULT_MIN_SECTION_MM, LayoutEngine, LayoutPolicy,
    MAX_SPLIT_COUNT, MIN_PANEL_MM, MIN_SPLIT_COUNT, SplitDefaults, merge, redistribute_mm,
    resize_children_by_divider, split, update_child_dimension, update_leaf_panel_dimension,
};
pub use invariant::{
    InvariantCode, InvariantIssue, InvariantReport, InvariantSeverity, PANEL_SUM_EPSILON,
};
pub use leaf_edit::{set_description, set_glass, set_mesh, set_sash, set_series, set_system_type};
pub use pattern::{MAX_PATTERN_PANELS, PanelPattern, parse_panel_pattern, seed_panels};
pub use preset::build_preset;
pub use scene::{
    AnchorKind, COMBINATION_SYSTEM_TYPE, CombinationItem, DimensionAnchor, ItemPayload,
    LeafDescriptor, LineItem, PanelDescriptor, Scene, export_scene,
};
pub use section::{
    Flag, LeafStyle, Sash, SectionId, SectionModelError, SectionNode, SectionTree, Split,
    SplitDirection, SystemType, Walk,
};
