//! Request-level entry points for hosts.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tekton_contract::{LicenseState, PatternToken, Theme, ThemeSummary, TokenRef};
use tracing::debug;

use crate::access;
use crate::config::{AuditConfig, Config};
use crate::css::{self, ResponsiveConfig};
use crate::error::Error;
use crate::patterns::PatternCatalog;
use crate::registry::{RegistryError, ThemeRegistry};
use crate::resolver::{self, MissingToken, ResolvedTokenSet};
use crate::wcag::{self, ThemeAudit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub theme_id: String,
    pub pattern_id: String,
    #[serde(default)]
    pub license: LicenseState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeStylesheet {
    pub css: String,
    pub diagnostics: Vec<MissingToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStylesheet {
    pub css: String,
    /// Colour fallbacks used while resolving the pattern's tokens.
    pub diagnostics: Vec<MissingToken>,
    pub audit: ThemeAudit,
}

pub struct Pipeline<'a> {
    registry: &'a ThemeRegistry,
    patterns: &'a PatternCatalog,
    responsive: ResponsiveConfig,
    audit: AuditConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a ThemeRegistry, patterns: &'a PatternCatalog) -> Self {
        Self {
            registry,
            patterns,
            responsive: ResponsiveConfig::default(),
            audit: AuditConfig::default(),
        }
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.responsive = config.responsive.clone();
        self.audit = config.audit;
        self
    }

    /// Valid themes the license grants, sorted by id.
    pub fn accessible_themes(&self, license: &LicenseState) -> Vec<ThemeSummary> {
        let summaries = self.registry.list();
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        let granted = access::filter_accessible(&ids, license);
        summaries
            .iter()
            .filter(|s| granted.contains(&s.id.as_str()))
            .cloned()
            .collect()
    }

    /// Loads a theme for a licensed caller. Unknown ids are reported before
    /// license checks so callers can tell the two apart.
    pub fn theme(&self, id: &str, license: &LicenseState) -> Result<Arc<Theme>, Error> {
        if !self.registry.is_known(id) {
            return Err(RegistryError::NotFound {
                id: id.to_string(),
                available: self.registry.ids(),
            }
            .into());
        }
        access::authorize_theme(id, license)?;
        Ok(self.registry.load(id)?)
    }

    /// Every token of the theme as custom properties scoped to
    /// `[data-theme="<id>"]`.
    pub fn theme_stylesheet(&self, id: &str, license: &LicenseState) -> Result<ThemeStylesheet, Error> {
        let theme = self.theme(id, license)?;
        let resolved = complete(resolver::resolve_all(&theme))?;
        let css = css::generate_theme_css(&format!("[data-theme=\"{id}\"]"), &resolved);
        Ok(ThemeStylesheet {
            css,
            diagnostics: resolved.diagnostics,
        })
    }

    pub fn layout_stylesheet(&self, request: &LayoutRequest) -> Result<LayoutStylesheet, Error> {
        let theme = self.theme(&request.theme_id, &request.license)?;
        let pattern = self.patterns.compose(&request.pattern_id)?;
        let references = pattern.references();
        let resolved = complete(resolver::resolve_many(&theme, &references))?;
        let css = css::generate_css(&pattern, &resolved, &self.responsive)?;
        let audit = wcag::audit_theme_with(&theme, self.audit.mode);
        debug!(
            theme = %theme.id,
            pattern = %pattern.id,
            tokens = resolved.len(),
            fallbacks = resolved.diagnostics.len(),
            "layout stylesheet generated"
        );
        Ok(LayoutStylesheet {
            css,
            diagnostics: resolved.diagnostics,
            audit,
        })
    }

    /// Every pattern in the catalog as one stylesheet for the theme.
    pub fn catalog_stylesheet(
        &self,
        theme_id: &str,
        license: &LicenseState,
    ) -> Result<LayoutStylesheet, Error> {
        let theme = self.theme(theme_id, license)?;
        let patterns = self.patterns.compose_all()?;
        let references: BTreeSet<TokenRef> =
            patterns.iter().flat_map(PatternToken::references).collect();
        let resolved = complete(resolver::resolve_many(&theme, &references))?;
        let css = css::generate_layout_css(&patterns, &resolved, &self.responsive)?;
        let audit = wcag::audit_theme_with(&theme, self.audit.mode);
        debug!(
            theme = %theme.id,
            patterns = patterns.len(),
            tokens = resolved.len(),
            "catalog stylesheet generated"
        );
        Ok(LayoutStylesheet {
            css,
            diagnostics: resolved.diagnostics,
            audit,
        })
    }

    pub fn audit(&self, id: &str) -> Result<ThemeAudit, Error> {
        let theme = self.registry.load(id)?;
        Ok(wcag::audit_theme_with(&theme, self.audit.mode))
    }

    /// Whether the theme's audit reaches the configured minimum level.
    pub fn is_publishable(&self, id: &str) -> Result<bool, Error> {
        Ok(self.audit(id)?.is_publishable(self.audit.minimum))
    }
}

/// Turns the first resolution failure into an error.
fn complete(resolved: ResolvedTokenSet) -> Result<ResolvedTokenSet, Error> {
    match resolved.failures.values().next() {
        Some(err) => Err(err.clone().into()),
        None => Ok(resolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn request(theme: &str, pattern: &str, license: LicenseState) -> LayoutRequest {
        LayoutRequest {
            theme_id: theme.into(),
            pattern_id: pattern.into(),
            license,
        }
    }

    #[test]
    fn not_found_comes_before_denied() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);
        let nobody = LicenseState::licensed(Vec::<String>::new());

        let err = pipeline.theme("missing-theme", &nobody).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = pipeline.theme("saas-modern", &nobody).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Denied);
        assert!(pipeline.theme("saas-modern", &LicenseState::master()).is_ok());
    }

    #[test]
    fn accessible_themes_follow_license() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);

        assert_eq!(pipeline.accessible_themes(&LicenseState::master()).len(), 3);
        let some = pipeline.accessible_themes(&LicenseState::licensed(["saas-modern", "unknown"]));
        let ids: Vec<&str> = some.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["saas-modern"]);
    }

    #[test]
    fn layout_stylesheet_for_composed_pattern() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);
        let out = pipeline
            .layout_stylesheet(&request("calm-wellness", "section.hero-sticky", LicenseState::master()))
            .unwrap();
        assert!(out.css.starts_with(".section-hero-sticky {\n  display: flex;\n  flex-direction: column;\n"));
        assert!(out.css.contains("  position: sticky;\n  top: 0;\n  z-index: 50;\n"));
        assert!(out.css.contains("@media (max-width: 640px)"));
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.audit.theme_id, "calm-wellness");
    }

    #[test]
    fn unknown_pattern_is_not_found() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);
        let err = pipeline
            .layout_stylesheet(&request("saas-modern", "section.carousel", LicenseState::master()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.user_message(), "Layout pattern 'section.carousel' was not found.");
    }

    #[test]
    fn theme_stylesheet_scopes_variables() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);
        let sheet = pipeline
            .theme_stylesheet("saas-modern", &LicenseState::master())
            .unwrap();
        assert!(sheet.css.starts_with("[data-theme=\"saas-modern\"] {\n"));
        assert!(sheet.css.contains("  --atomic-spacing-4: 1rem;\n"));
        assert!(sheet.css.contains("  --semantic-color-text-onBrand: oklch(1 0 0);\n"));
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn catalog_stylesheet_covers_every_pattern() {
        let registry = ThemeRegistry::builtin().unwrap();
        let patterns = PatternCatalog::builtin();
        let pipeline = Pipeline::new(&registry, &patterns);
        let sheet = pipeline
            .catalog_stylesheet("saas-modern", &LicenseState::master())
            .unwrap();

        assert!(sheet.css.starts_with(".shell-web-dashboard {\n"));
        let mut last = 0;
        for pattern in patterns.compose_all().unwrap() {
            let at = sheet
                .css
                .find(&format!(".{} {{\n", pattern.class_name()))
                .unwrap_or_else(|| panic!("{} missing", pattern.id));
            assert!(at >= last, "{} out of order", pattern.id);
            last = at;
        }
        assert!(sheet.css.contains("@supports not (container-type: inline-size)"));
        assert!(sheet.diagnostics.is_empty());

        let again = pipeline
            .catalog_stylesheet("saas-modern", &LicenseState::master())
            .unwrap();
        assert_eq!(sheet.css, again.css);
    }
}
