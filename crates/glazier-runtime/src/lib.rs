#![forbid(unsafe_code)]

//! Runtime: editing sessions over the section tree.
//!
//! # Role in Glazier
//! `glazier-runtime` is where user intent meets the layout engine. A
//! [`Configurator`] applies each edit to a cloned tree, decides whether the
//! result is committed to [`History`] or held as a live preview, and hands
//! exported scenes to the host's [`SceneRenderer`] and [`QuotationSink`].
//!
//! # Configuration
//! [`ConfiguratorConfig`] gathers the layout floors, the initial frame, the
//! base product selection and the undo depth. It loads from TOML (feature
//! `config-files`, on by default) or JSON.

pub mod catalog;
pub mod config;
pub mod history;
pub mod session;
pub mod sink;

pub use catalog::{Catalog, SeriesEntry, StaticCatalog};
pub use config::{ConfigError, ConfiguratorConfig, DefaultsConfig, FrameConfig};
pub use history::{History, HistoryConfig};
pub use session::Configurator;
pub use sink::{QuotationSink, RecordingQuotationSink, RecordingRenderer, SceneRenderer};
