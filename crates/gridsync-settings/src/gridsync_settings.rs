//! GridSync Settings
//!
//! Grid-level configuration persisted as TOML:
//! - Editing behavior (settle delay, Enter-to-add, read-only mode)
//! - Column layout (system column prefix, widths)
//! - Data access (page size, key and version field names)
//!
//! Every section falls back to its defaults field by field, so a partial file
//! is always valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GridSettings {
    pub editing: EditingSettings,
    pub columns: ColumnSettings,
    pub data: DataSettings,
}

impl GridSettings {
    /// Load from the platform config directory, falling back to defaults when
    /// no file exists yet
    pub fn load() -> Result<Self> {
        let path = settings_file()?;
        if !path.exists() {
            tracing::debug!(path = ?path, "no grid settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid settings from {:?}", path))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse grid settings in {:?}", path))?;
        tracing::info!(path = ?path, "loaded grid settings");
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize grid settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write grid settings to {:?}", path))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingSettings {
    /// Pause after forcing the focused input to commit, before the record is read
    pub settle_delay_ms: u64,
    /// Enter on the last visible row opens a new row
    pub add_row_on_enter: bool,
    /// A read-only grid never edits; clicking a cell toggles selection
    pub readonly: bool,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            add_row_on_enter: true,
            readonly: false,
        }
    }
}

impl EditingSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    /// Name prefix reserved for columns that exist only in the widget
    pub system_prefix: String,
    pub min_width: u32,
    pub button_width: u32,
    pub selection_width: u32,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            system_prefix: "$".to_string(),
            min_width: 100,
            button_width: 40,
            selection_width: 40,
        }
    }
}

impl ColumnSettings {
    pub fn is_system_column(&self, name: &str) -> bool {
        !self.system_prefix.is_empty() && name.starts_with(&self.system_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub page_size: usize,
    pub key_field: String,
    pub version_field: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            page_size: 40,
            key_field: "id".to_string(),
            version_field: "version".to_string(),
        }
    }
}
