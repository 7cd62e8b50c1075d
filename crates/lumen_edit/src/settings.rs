use std::fs;
use std::path::{Path, PathBuf};

use lumen_engine::{EngineError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::persistence::write_atomic;

// =============================================================================
// Project directory constants
// =============================================================================

const PROJECT_QUALIFIER: &str = "com";
const PROJECT_ORGANIZATION: &str = "GitHub";
const PROJECT_APPLICATION: &str = "lumen";

/// Lazily initialized project directories (computed once on first access)
static PROJECT_DIRS: Lazy<Option<directories::ProjectDirs>> =
    Lazy::new(|| directories::ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION));

/// Persisted values are stored in `settings.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Extension of the operation log written next to a saved image.
    pub ops_extension: String,
    pub macro_extension: String,
    /// `flexi_logger` spec used when `RUST_LOG` isn't set.
    pub log_spec: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            ops_extension: "ops".to_string(),
            macro_extension: "macro".to_string(),
            log_spec: "info".to_string(),
        }
    }
}

impl EditorSettings {
    pub const FILE_NAME: &'static str = "settings.toml";

    /// Settings from the config directory; defaults if there are none or
    /// they can't be read.
    pub fn load() -> Self {
        let Some(file) = Self::config_file() else {
            return Self::default();
        };
        if !file.exists() {
            return Self::default();
        }
        match Self::load_from(&file) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Error reading settings file: {err}");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// I/O errors, `Settings` for malformed or invalid content.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: EditorSettings = toml::from_str(&text).map_err(|err| EngineError::Settings { message: err.to_string() })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Atomically writes the settings into the config directory.
    ///
    /// # Errors
    ///
    /// `Settings` if there is no config directory, otherwise see
    /// [`EditorSettings::store_to`].
    pub fn store(&self) -> Result<()> {
        let Some(config_dir) = Self::config_dir() else {
            return Err(EngineError::Settings {
                message: "Cannot determine config directory for saving settings".to_string(),
            });
        };
        fs::create_dir_all(&config_dir)?;
        self.store_to(&config_dir.join(Self::FILE_NAME))
    }

    /// # Errors
    ///
    /// Invalid values, serialization and I/O errors.
    pub fn store_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let text = toml::to_string_pretty(self).map_err(|err| EngineError::Settings { message: err.to_string() })?;
        write_atomic(path, text.as_bytes())
    }

    /// # Errors
    ///
    /// `Settings` for empty extensions or extensions containing a dot or a
    /// path separator.
    pub fn validate(&self) -> Result<()> {
        for (name, ext) in [("ops_extension", &self.ops_extension), ("macro_extension", &self.macro_extension)] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(EngineError::Settings {
                    message: format!("{name} '{ext}' must be a plain file extension"),
                });
            }
        }
        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        PROJECT_DIRS.as_ref().map(|p| p.config_dir().to_path_buf())
    }

    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(Self::FILE_NAME))
    }

    pub fn log_dir() -> Option<PathBuf> {
        Self::config_dir()
    }
}
