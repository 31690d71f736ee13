#![forbid(unsafe_code)]

//! Configuration for a [`Configurator`](crate::Configurator) session.
//!
//! Captures every tunable floor and default as one [`ConfiguratorConfig`]
//! loadable from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # glazier.toml
//! [layout]
//! min_panel_mm = 150.0
//!
//! [frame]
//! width_mm = 2400.0
//!
//! [defaults]
//! system_type = "Sliding"
//! ```
//!
//! ```rust,ignore
//! let config = ConfiguratorConfig::from_toml_file("glazier.toml")?;
//! let config = ConfiguratorConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the built-in behavior, so
//! `ConfiguratorConfig::default()` and an empty file configure the same
//! session.

use std::path::Path;

use glazier_core::units::FrameSize;
use glazier_layout::{Flag, LayoutPolicy, LeafStyle, SystemType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::history::HistoryConfig;

// ---------------------------------------------------------------------------
// Top-level ConfiguratorConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for an editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    /// Floors and limits for layout edits.
    pub layout: LayoutPolicy,
    /// Initial physical frame size.
    pub frame: FrameConfig,
    /// Base product selection for the first preset.
    pub defaults: DefaultsConfig,
    /// Undo depth.
    pub history: HistoryConfig,
}

impl ConfiguratorConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded configurator config");
        Ok(config)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        info!(path = %path.display(), "loaded configurator config");
        Ok(config)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let layout = &self.layout;

        if !(layout.min_divider_fraction >= 0.0 && layout.min_divider_fraction < 0.5) {
            errors.push(format!(
                "layout.min_divider_fraction must be in [0, 0.5), got {}",
                layout.min_divider_fraction
            ));
        }
        if !(layout.min_panel_mm.is_finite() && layout.min_panel_mm >= 0.0) {
            errors.push(format!(
                "layout.min_panel_mm must be >= 0, got {}",
                layout.min_panel_mm
            ));
        }
        if !(layout.min_section_mm.is_finite() && layout.min_section_mm > 0.0) {
            errors.push(format!(
                "layout.min_section_mm must be > 0, got {}",
                layout.min_section_mm
            ));
        }
        if layout.min_split_count < 2 {
            errors.push(format!(
                "layout.min_split_count must be >= 2, got {}",
                layout.min_split_count
            ));
        }
        if layout.max_split_count < layout.min_split_count {
            errors.push(format!(
                "layout.max_split_count ({}) must be >= layout.min_split_count ({})",
                layout.max_split_count, layout.min_split_count
            ));
        }

        if !self.frame.size().is_valid() {
            errors.push(format!(
                "frame size must be finite and positive, got {} x {}",
                self.frame.width_mm, self.frame.height_mm
            ));
        }

        if self.history.max_depth == 0 {
            errors.push("history.max_depth must be > 0".into());
        }

        errors
    }

    /// Return `self` when [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Initial frame size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        let size = FrameSize::default();
        Self {
            width_mm: size.width_mm,
            height_mm: size.height_mm,
        }
    }
}

impl FrameConfig {
    #[must_use]
    pub const fn size(&self) -> FrameSize {
        FrameSize::new(self.width_mm, self.height_mm)
    }
}

/// Base product selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub system_type: SystemType,
    pub glass: Flag,
    pub mesh: Flag,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            system_type: SystemType::Casement,
            glass: Flag::Yes,
            mesh: Flag::No,
        }
    }
}

impl DefaultsConfig {
    #[must_use]
    pub const fn style(&self) -> LeafStyle {
        LeafStyle::new(self.system_type, self.glass, self.mesh)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configurator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
