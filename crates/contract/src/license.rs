use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// What the license provider says a caller may use.
///
/// A master license grants every theme regardless of `licensed_theme_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseState {
    pub is_master: bool,
    #[serde(default)]
    pub licensed_theme_ids: BTreeSet<String>,
}

impl LicenseState {
    pub fn master() -> Self {
        Self {
            is_master: true,
            licensed_theme_ids: BTreeSet::new(),
        }
    }

    pub fn licensed<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_master: false,
            licensed_theme_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, theme_id: &str) -> bool {
        self.is_master || self.licensed_theme_ids.contains(theme_id)
    }
}
