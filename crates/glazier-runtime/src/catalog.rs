#![forbid(unsafe_code)]

//! Catalog lookup for series and description options.
//!
//! The catalog is owned by the host (usually a remote service). The session
//! only asks which series exist for a product family and which descriptions
//! exist for a series, and refuses selections outside those lists.

use std::path::Path;

use glazier_layout::SystemType;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Source of valid series/description options.
pub trait Catalog {
    /// Series offered for `system_type`, in display order.
    fn series(&self, system_type: SystemType) -> Vec<String>;

    /// Descriptions offered for `series` of `system_type`, in display order.
    fn descriptions(&self, system_type: SystemType, series: &str) -> Vec<String>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn series(&self, system_type: SystemType) -> Vec<String> {
        (**self).series(system_type)
    }

    fn descriptions(&self, system_type: SystemType, series: &str) -> Vec<String> {
        (**self).descriptions(system_type, series)
    }
}

/// One series of one product family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub system_type: SystemType,
    pub series: String,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

/// In-memory catalog, loadable from JSON.
///
/// ```json
/// { "entries": [
///   { "system_type": "Sliding", "series": "S-60",
///     "descriptions": ["2 Panel", "4 Track 2 Glass 2 Mesh"] }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticCatalog {
    pub entries: Vec<SeriesEntry>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a series with its descriptions.
    #[must_use]
    pub fn with_series<I, S>(mut self, system_type: SystemType, series: &str, descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push(SeriesEntry {
            system_type,
            series: series.to_string(),
            descriptions: descriptions.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

impl Catalog for StaticCatalog {
    fn series(&self, system_type: SystemType) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.system_type == system_type) {
            if !out.contains(&entry.series) {
                out.push(entry.series.clone());
            }
        }
        out
    }

    fn descriptions(&self, system_type: SystemType, series: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.system_type == system_type && e.series == series)
            .flat_map(|e| e.descriptions.iter().cloned())
            .collect()
    }
}
