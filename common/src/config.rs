//! User configuration, `~/.config/record-confirm/config.json`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_INDENT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document opened on startup; overrides `default_file_name`
    pub default_file: Option<PathBuf>,
    /// Looked up next to the executable when `default_file` is unset
    pub default_file_name: String,
    /// Spaces per indentation level when saving
    pub indent: usize,
    /// Longest edge of a rendered image, in pixels
    pub max_image_edge: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_file: None,
            default_file_name: "sample.json".into(),
            indent: DEFAULT_INDENT,
            max_image_edge: 480,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("record-confirm").join("config.json"))
    }

    /// Document to open when none is given: `default_file`, else
    /// `default_file_name` in the executable's directory.
    pub fn default_document_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.default_file {
            return Some(path.clone());
        }
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(&self.default_file_name))
    }
}
