//! Pipeline configuration, loaded from TOML.
//!
//! ```toml
//! [registry]
//! generated_dir = "themes/generated"
//! include_builtin = true
//!
//! [responsive]
//! desktop = 1280
//! tablet = 1024
//! mobile = 640
//! container_name = "layout"
//!
//! [audit]
//! mode = "normal-text"
//! minimum = "AA"
//! ```
//!
//! Every section and key is optional. `TEKTON_THEMES_DIR` overrides
//! `registry.generated_dir` when [`Config::with_env_overrides`] is applied.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::css::ResponsiveConfig;
use crate::wcag::{ContrastMode, WcagLevel};

pub const THEMES_DIR_ENV: &str = "TEKTON_THEMES_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("breakpoint widths must decrease from desktop to mobile (got {desktop}/{tablet}/{mobile})")]
    Breakpoints { desktop: u32, tablet: u32, mobile: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding generated theme documents (`*.json`).
    pub generated_dir: Option<PathBuf>,
    pub include_builtin: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            generated_dir: None,
            include_builtin: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub mode: ContrastMode,
    /// Lowest level a declared pair may reach for the theme to be publishable.
    pub minimum: WcagLevel,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            mode: ContrastMode::NormalText,
            minimum: WcagLevel::Aa,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub responsive: ResponsiveConfig,
    pub audit: AuditConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies `TEKTON_THEMES_DIR` on top of the loaded values.
    pub fn with_env_overrides(self) -> Self {
        self.with_themes_dir_override(std::env::var_os(THEMES_DIR_ENV).map(PathBuf::from))
    }

    fn with_themes_dir_override(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            self.registry.generated_dir = Some(dir);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ResponsiveConfig {
            desktop,
            tablet,
            mobile,
            ..
        } = self.responsive;
        if desktop > tablet && tablet > mobile {
            Ok(())
        } else {
            Err(ConfigError::Breakpoints {
                desktop,
                tablet,
                mobile,
            })
        }
    }
}
