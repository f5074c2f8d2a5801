use std::sync::Arc;

use thiserror::Error;

use crate::access::AccessError;
use crate::config::ConfigError;
use crate::css::CssError;
use crate::patterns::PatternError;
use crate::registry::{RegistryError, RegistryInitError};
use crate::resolver::ResolveError;
use crate::schema::ValidationReport;

#[derive(Debug, Error)]
pub enum Error {
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("registry initialization: {0}")]
    RegistryInit(#[from] Arc<RegistryInitError>),
    #[error("resolve: {0}")]
    Resolve(#[from] ResolveError),
    #[error("css: {0}")]
    Css(#[from] CssError),
    #[error("access: {0}")]
    Access(#[from] AccessError),
    #[error("pattern: {0}")]
    Pattern(#[from] PatternError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(#[from] ValidationReport),
}

impl From<RegistryInitError> for Error {
    fn from(err: RegistryInitError) -> Self {
        Self::RegistryInit(Arc::new(err))
    }
}

/// Coarse classification hosts map onto their own error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDefinition,
    NotFound,
    UnresolvedReference,
    CyclicReference,
    Denied,
    /// The registry or configuration could not be loaded.
    Configuration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(RegistryError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Registry(RegistryError::InvalidDefinition { .. }) | Self::Validation(_) => {
                ErrorKind::InvalidDefinition
            }
            Self::RegistryInit(_) | Self::Config(_) => ErrorKind::Configuration,
            Self::Resolve(ResolveError::Cyclic { .. }) => ErrorKind::CyclicReference,
            Self::Resolve(_) | Self::Css(CssError::MissingToken { .. }) => {
                ErrorKind::UnresolvedReference
            }
            Self::Css(CssError::ZeroColumns(_)) => ErrorKind::InvalidDefinition,
            Self::Access(_) => ErrorKind::Denied,
            Self::Pattern(PatternError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Pattern(PatternError::InvalidDefinition(_)) => ErrorKind::InvalidDefinition,
        }
    }

    /// A message safe to show end users. Theme and pattern ids may appear;
    /// token paths and file system paths never do.
    pub fn user_message(&self) -> String {
        match self {
            Self::Registry(RegistryError::NotFound { id, available }) if available.is_empty() => {
                format!("Theme '{id}' was not found.")
            }
            Self::Registry(RegistryError::NotFound { id, available }) => format!(
                "Theme '{id}' was not found. Available themes: {}.",
                available.join(", ")
            ),
            Self::Registry(RegistryError::InvalidDefinition { id, report }) => format!(
                "Theme '{id}' has an invalid definition ({} problem(s)).",
                report.violations.len()
            ),
            Self::Validation(report) => format!(
                "The theme definition is invalid ({} problem(s)).",
                report.violations.len()
            ),
            Self::Pattern(PatternError::NotFound { id, .. }) => {
                format!("Layout pattern '{id}' was not found.")
            }
            Self::Pattern(PatternError::InvalidDefinition(_)) | Self::Css(CssError::ZeroColumns(_)) => {
                "The layout pattern definition is invalid.".to_string()
            }
            Self::Resolve(ResolveError::Cyclic { .. }) => {
                "The theme contains a circular token reference.".to_string()
            }
            Self::Resolve(_) | Self::Css(CssError::MissingToken { .. }) => {
                "The theme is missing a design token this request needs.".to_string()
            }
            Self::Access(AccessError::Unauthenticated) => {
                "Sign in to access themes.".to_string()
            }
            Self::Access(AccessError::Denied(id)) => {
                format!("Your license does not include theme '{id}'.")
            }
            Self::Access(AccessError::NoneLicensed) => {
                "Your license does not include any of the requested themes.".to_string()
            }
            Self::RegistryInit(_) | Self::Config(_) => {
                "The theme service is not available right now.".to_string()
            }
        }
    }
}
