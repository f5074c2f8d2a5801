//! License-based access to themes.
//!
//! The license policy itself lives with the host; this module only applies
//! a [`LicenseState`] to theme ids.

use std::collections::BTreeSet;

use tekton_contract::LicenseState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("theme `{0}` is not covered by the current license")]
    Denied(String),
    #[error("no license grants any of the requested themes")]
    NoneLicensed,
}

/// Keeps the ids the license grants, in input order. A master license
/// keeps everything.
pub fn filter_accessible<S>(ids: &[S], license: &LicenseState) -> Vec<S>
where
    S: AsRef<str> + Clone,
{
    if license.is_master {
        return ids.to_vec();
    }
    ids.iter()
        .filter(|id| license.licensed_theme_ids.contains(id.as_ref()))
        .cloned()
        .collect()
}

/// Checks a single theme request against a license.
pub fn authorize_theme(id: &str, license: &LicenseState) -> Result<(), AccessError> {
    if license.allows(id) {
        Ok(())
    } else {
        Err(AccessError::Denied(id.to_string()))
    }
}

/// Per-request access state.
///
/// ```text
/// Unauthenticated --authenticate(Some)--> Authenticated
/// Unauthenticated --authenticate(None)--> Denied
/// Authenticated  --check_license-->      Authorized | Denied
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Unauthenticated,
    Authenticated { license: LicenseState },
    Authorized { theme_ids: Vec<String> },
    Denied { reason: AccessError },
}

impl AccessState {
    pub fn authenticate(self, license: Option<LicenseState>) -> Self {
        match (self, license) {
            (Self::Unauthenticated, Some(license)) => Self::Authenticated { license },
            (Self::Unauthenticated, None) => Self::Denied {
                reason: AccessError::Unauthenticated,
            },
            (state, _) => state,
        }
    }

    /// Narrows `requested` to the licensed ids. Requests that end up empty
    /// are denied.
    pub fn check_license<S: AsRef<str>>(self, requested: &[S]) -> Self {
        match self {
            Self::Authenticated { license } => {
                let requested: Vec<&str> = requested.iter().map(AsRef::as_ref).collect();
                let granted = filter_accessible(&requested, &license);
                if granted.is_empty() && !requested.is_empty() {
                    let reason = match requested.as_slice() {
                        [single] => AccessError::Denied((*single).to_string()),
                        _ => AccessError::NoneLicensed,
                    };
                    Self::Denied { reason }
                } else {
                    let mut seen = BTreeSet::new();
                    Self::Authorized {
                        theme_ids: granted
                            .into_iter()
                            .filter(|id| seen.insert(*id))
                            .map(str::to_string)
                            .collect(),
                    }
                }
            }
            Self::Unauthenticated => Self::Denied {
                reason: AccessError::Unauthenticated,
            },
            state => state,
        }
    }

    pub fn into_result(self) -> Result<Vec<String>, AccessError> {
        match self {
            Self::Authorized { theme_ids } => Ok(theme_ids),
            Self::Denied { reason } => Err(reason),
            Self::Unauthenticated | Self::Authenticated { .. } => Err(AccessError::Unauthenticated),
        }
    }
}
