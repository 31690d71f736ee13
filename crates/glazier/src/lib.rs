#![forbid(unsafe_code)]

//! Glazier public facade crate.
//!
//! Re-exports the stable surface of the workspace: the geometry primitives,
//! the section tree and its editing operations, and (with the default
//! `runtime` feature) the interactive [`Configurator`] session. The
//! [`prelude`] covers day-to-day use.

// --- Core re-exports -------------------------------------------------------

pub use glazier_core::{Axis, FrameSize, Point, Rect};

// --- Layout re-exports -----------------------------------------------------

pub use glazier_layout::{
    AnchorKind, DimensionAnchor, Flag, ItemPayload, LayoutEngine, LayoutPolicy, LeafDescriptor,
    LeafStyle, LineItem, PanelPattern, Sash, Scene, SectionId, SectionModelError, SectionNode,
    SectionTree, Split, SplitDirection, SystemType, build_preset, export_scene, merge,
    parse_panel_pattern, resize_children_by_divider, split, update_child_dimension,
    update_leaf_panel_dimension,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use glazier_runtime::{
    Catalog, ConfigError, Configurator, ConfiguratorConfig, History, HistoryConfig,
    QuotationSink, SceneRenderer, StaticCatalog,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Glazier hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An externally built tree failed validation.
    #[error(transparent)]
    Model(#[from] SectionModelError),
    /// Configuration could not be loaded or failed validation.
    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for Glazier APIs.
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        Error, Flag, FrameSize, ItemPayload, Result, Sash, Scene, SectionId, SectionTree,
        SplitDirection, SystemType,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Catalog, Configurator, ConfiguratorConfig, StaticCatalog};

    pub use crate::{core, layout};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use glazier_core as core;
pub use glazier_layout as layout;
#[cfg(feature = "runtime")]
pub use glazier_runtime as runtime;
