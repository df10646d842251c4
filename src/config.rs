//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/weakside/weakside.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `WEAKSIDE_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, RecordFields};
use crate::domain::{AscendMode, BuildOptions, Placement};

/// Unified configuration for weakside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Record field holding the parent id (default: "pid")
    pub parent_field: String,
    /// Record field used as display label (default: "name")
    pub label_field: String,
    /// Parent id marking top-level records (default: 0)
    pub starting_parent_id: i64,
    /// Sort records by id before flattening (default: true)
    pub sort_first: bool,
    /// Cursor ascension while building: "single" or "to_level"
    pub ascend: String,
    /// Use natural (breadth-first) placement instead of weak-region placement
    pub natural: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parent_field: "pid".into(),
            label_field: "name".into(),
            starting_parent_id: 0,
            sort_first: true,
            ascend: AscendMode::default().to_string(),
            natural: false,
        }
    }
}

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub parent_field: Option<String>,
    pub label_field: Option<String>,
    pub starting_parent_id: Option<i64>,
    pub sort_first: Option<bool>,
    pub ascend: Option<String>,
    pub natural: Option<bool>,
}

/// Get the XDG config directory for weakside.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "weakside").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("weakside.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            parent_field: overlay
                .parent_field
                .clone()
                .unwrap_or_else(|| self.parent_field.clone()),
            label_field: overlay
                .label_field
                .clone()
                .unwrap_or_else(|| self.label_field.clone()),
            starting_parent_id: overlay
                .starting_parent_id
                .unwrap_or(self.starting_parent_id),
            sort_first: overlay.sort_first.unwrap_or(self.sort_first),
            ascend: overlay.ascend.clone().unwrap_or_else(|| self.ascend.clone()),
            natural: overlay.natural.unwrap_or(self.natural),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file layered over the global one; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply WEAKSIDE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("WEAKSIDE")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("parent_field") {
            settings.parent_field = val;
        }
        if let Ok(val) = config.get_string("label_field") {
            settings.label_field = val;
        }
        if let Ok(val) = config.get_int("starting_parent_id") {
            settings.starting_parent_id = val;
        }
        if let Ok(val) = config.get_bool("sort_first") {
            settings.sort_first = val;
        }
        if let Ok(val) = config.get_string("ascend") {
            settings.ascend = val;
        }
        if let Ok(val) = config.get_bool("natural") {
            settings.natural = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        self.ascend_mode().map(|_| ())
    }

    pub fn ascend_mode(&self) -> Result<AscendMode, ApplicationError> {
        self.ascend.parse::<AscendMode>().map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }

    pub fn record_fields(&self) -> RecordFields {
        RecordFields {
            parent_field: self.parent_field.clone(),
            label_field: self.label_field.clone(),
        }
    }

    pub fn build_options(&self) -> Result<BuildOptions<i64>, ApplicationError> {
        Ok(BuildOptions {
            starting_parent_id: self.starting_parent_id,
            sort_first: self.sort_first,
            ascend: self.ascend_mode()?,
        })
    }

    pub fn placement(&self) -> Placement {
        Placement::from_natural(self.natural)
    }

    /// Render settings as TOML (for `config show`-style output).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
