//! The theme registry: built-in themes compiled into the binary plus the
//! generated themes found in one directory.
//!
//! A registry is built once and never changes afterwards. Hosts either call
//! [`ThemeRegistry::initialize`] at startup or hold a [`LazyRegistry`], which
//! runs the same scan the first time any thread asks for it. Themes that fail
//! validation stay registered so that [`ThemeRegistry::load`] can report why.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tekton_contract::{Theme, ThemeSummary};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::schema::{self, ValidationReport};

const BUILTIN_THEMES: [(&str, &str); 3] = [
    ("saas-modern", include_str!("../themes/saas-modern.json")),
    ("calm-wellness", include_str!("../themes/calm-wellness.json")),
    ("premium-editorial", include_str!("../themes/premium-editorial.json")),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("theme `{id}` not found")]
    NotFound { id: String, available: Vec<String> },
    #[error("theme `{id}` has an invalid definition: {report}")]
    InvalidDefinition { id: String, report: ValidationReport },
}

/// Fatal problems while building a registry.
#[derive(Debug, Error)]
pub enum RegistryInitError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin} is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("theme id `{id}` is declared by both {first} and {second}")]
    DuplicateTheme {
        id: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    Builtin,
    Generated(PathBuf),
    /// Built in code and handed to [`ThemeRegistry::from_themes`].
    Provided,
}

impl ThemeSource {
    fn describe(&self) -> String {
        match self {
            Self::Builtin => "built-in".to_string(),
            Self::Generated(path) => path.display().to_string(),
            Self::Provided => "provided".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    source: ThemeSource,
    theme: Result<Arc<Theme>, ValidationReport>,
}

#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ThemeRegistry {
    /// Scans the configured sources once and returns the finished registry.
    ///
    /// A `generated_dir` that does not exist is treated as empty. Unreadable
    /// files, documents that are not JSON and duplicate ids are fatal.
    pub fn initialize(config: &RegistryConfig) -> Result<Self, RegistryInitError> {
        let mut registry = Self::default();
        if config.include_builtin {
            for (name, text) in BUILTIN_THEMES {
                let document: Value =
                    serde_json::from_str(text).map_err(|source| RegistryInitError::Parse {
                        origin: format!("built-in theme `{name}`"),
                        source,
                    })?;
                registry.register_document(name, &document, ThemeSource::Builtin)?;
            }
        }
        if let Some(dir) = &config.generated_dir {
            registry.scan_dir(dir)?;
        }

        let invalid = registry.entries.values().filter(|e| e.theme.is_err()).count();
        info!(
            themes = registry.entries.len(),
            invalid,
            generated_dir = ?config.generated_dir,
            "theme registry initialized"
        );
        Ok(registry)
    }

    /// The built-in themes only.
    pub fn builtin() -> Result<Self, RegistryInitError> {
        Self::initialize(&RegistryConfig::default())
    }

    /// A registry of themes built in code. Each one is validated like a
    /// document would be.
    pub fn from_themes<I>(themes: I) -> Result<Self, RegistryInitError>
    where
        I: IntoIterator<Item = Theme>,
    {
        let mut registry = Self::default();
        for theme in themes {
            let id = theme.id.clone();
            let checked = schema::validate_theme(&theme).map(|()| Arc::new(theme));
            registry.register(id, checked, ThemeSource::Provided)?;
        }
        Ok(registry)
    }

    fn scan_dir(&mut self, dir: &Path) -> Result<(), RegistryInitError> {
        if !dir.exists() {
            warn!(dir = %dir.display(), "generated theme directory does not exist");
            return Ok(());
        }
        let io = |source: std::io::Error| RegistryInitError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io)? {
            let path = entry.map_err(io)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            debug!(path = %path.display(), "loading generated theme");
            let text = fs::read_to_string(&path).map_err(|source| RegistryInitError::Io {
                path: path.clone(),
                source,
            })?;
            let document: Value =
                serde_json::from_str(&text).map_err(|source| RegistryInitError::Parse {
                    origin: path.display().to_string(),
                    source,
                })?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.register_document(&stem, &document, ThemeSource::Generated(path))?;
        }
        Ok(())
    }

    /// Registers a document under its declared id, or under `fallback_id`
    /// when the document has no usable id. Documents where neither is usable
    /// are skipped.
    fn register_document(
        &mut self,
        fallback_id: &str,
        document: &Value,
        source: ThemeSource,
    ) -> Result<(), RegistryInitError> {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| schema::is_valid_id(id))
            .unwrap_or(fallback_id)
            .to_string();
        let theme = schema::parse_theme(document).map(Arc::new);
        self.register(id, theme, source)
    }

    fn register(
        &mut self,
        id: String,
        theme: Result<Arc<Theme>, ValidationReport>,
        source: ThemeSource,
    ) -> Result<(), RegistryInitError> {
        if !schema::is_valid_id(&id) {
            warn!(
                theme = %id,
                source = %source.describe(),
                "skipping theme without a usable id"
            );
            return Ok(());
        }
        if let Some(existing) = self.entries.get(&id) {
            return Err(RegistryInitError::DuplicateTheme {
                id,
                first: existing.source.describe(),
                second: source.describe(),
            });
        }
        if let Err(report) = &theme {
            warn!(
                theme = %id,
                source = %source.describe(),
                violations = report.violations.len(),
                "theme failed validation"
            );
            debug!(theme = %id, details = %report.details(), "theme violations");
        }
        self.entries.insert(id, Entry { source, theme });
        Ok(())
    }

    /// Returns a shared snapshot of a valid theme.
    pub fn load(&self, id: &str) -> Result<Arc<Theme>, RegistryError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| RegistryError::NotFound {
                id: id.to_string(),
                available: self.ids(),
            })?;
        match &entry.theme {
            Ok(theme) => Ok(Arc::clone(theme)),
            Err(report) => Err(RegistryError::InvalidDefinition {
                id: id.to_string(),
                report: report.clone(),
            }),
        }
    }

    /// Summaries of the valid themes, sorted by id.
    pub fn list(&self) -> Vec<ThemeSummary> {
        self.valid().map(|theme| theme.summary()).collect()
    }

    /// Ids of the valid themes, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.valid().map(|theme| theme.id.clone()).collect()
    }

    /// Whether `id` is registered, valid or not.
    pub fn is_known(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn source(&self, id: &str) -> Option<&ThemeSource> {
        self.entries.get(id).map(|e| &e.source)
    }

    fn valid(&self) -> impl Iterator<Item = &Arc<Theme>> {
        self.entries.values().filter_map(|e| e.theme.as_ref().ok())
    }
}

/// A registry built on first use. Concurrent first callers wait for a
/// single scan; the outcome, failure included, is kept for the life of the
/// handle.
#[derive(Debug)]
pub struct LazyRegistry {
    config: RegistryConfig,
    cell: OnceLock<Result<ThemeRegistry, Arc<RegistryInitError>>>,
}

impl LazyRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<&ThemeRegistry, Arc<RegistryInitError>> {
        self.cell
            .get_or_init(|| ThemeRegistry::initialize(&self.config).map_err(Arc::new))
            .as_ref()
            .map_err(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
