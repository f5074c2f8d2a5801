//! CSS generation from layout pattern tokens and resolved theme tokens.
//!
//! Output is deterministic: the same pattern, tokens and breakpoints always
//! produce byte-identical CSS. Breakpoint overrides follow the base rules in
//! desktop, tablet, mobile order. Container-query patterns repeat their
//! overrides as media queries for browsers without container support.
//! Orientation overrides come last.

mod templates;
mod theme_vars;
mod writer;

use serde::{Deserialize, Serialize};
use tekton_contract::{Breakpoint, Orientation, PatternToken, QueryMode, TokenRef};
use thiserror::Error;

use crate::resolver::ResolvedTokenSet;
use templates::Context;
use writer::{Rule, StyleSheet};

pub use theme_vars::generate_theme_css;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssError {
    #[error("pattern `{pattern}` needs token `{reference}`, which is not in the resolved set")]
    MissingToken { pattern: String, reference: TokenRef },
    #[error("pattern `{0}` declares zero columns")]
    ZeroColumns(String),
}

/// Breakpoint widths in pixels, used as `max-width` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    pub desktop: u32,
    pub tablet: u32,
    pub mobile: u32,
    /// Container name for container-query patterns. Defaults to the
    /// pattern's class name.
    pub container_name: Option<String>,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            desktop: 1280,
            tablet: 1024,
            mobile: 640,
            container_name: None,
        }
    }
}

impl ResponsiveConfig {
    pub fn width(&self, breakpoint: Breakpoint) -> u32 {
        match breakpoint {
            Breakpoint::Desktop => self.desktop,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Mobile => self.mobile,
        }
    }
}

/// Generates the stylesheet for one pattern.
///
/// Every token the pattern references must be present in `resolved`;
/// the first one that is not fails with [`CssError::MissingToken`].
pub fn generate_css(
    pattern: &PatternToken,
    resolved: &ResolvedTokenSet,
    responsive: &ResponsiveConfig,
) -> Result<String, CssError> {
    let ctx = Context::new(pattern, resolved);
    let mut sheet = StyleSheet::new();

    for rule in templates::base_rules(&ctx)? {
        sheet.rule(&rule);
    }

    let container = match pattern.query_mode {
        QueryMode::Media => None,
        QueryMode::Container => {
            let name = responsive
                .container_name
                .clone()
                .unwrap_or_else(|| pattern.class_name());
            let mut scope = Rule::new(format!("{}-container", ctx.class));
            scope.push("container-type", "inline-size");
            scope.push("container-name", name.clone());
            sheet.rule(&scope);
            Some(name)
        }
    };

    let mut overrides = Vec::new();
    for breakpoint in Breakpoint::ALL {
        let Some(props) = pattern.responsive.get(&breakpoint) else {
            continue;
        };
        overrides.push((responsive.width(breakpoint), templates::override_rule(&ctx, props)?));
    }

    for (width, rule) in &overrides {
        let prelude = match &container {
            Some(name) => format!("@container {name} (max-width: {width}px)"),
            None => format!("@media (max-width: {width}px)"),
        };
        sheet.at_rule(&prelude, std::slice::from_ref(rule));
    }
    if container.is_some() {
        let fallback: Vec<(String, Rule)> = overrides
            .into_iter()
            .map(|(width, rule)| (format!("@media (max-width: {width}px)"), rule))
            .collect();
        sheet.nested_at_rule("@supports not (container-type: inline-size)", &fallback);
    }

    for orientation in Orientation::ALL {
        let Some(props) = pattern.orientation.get(&orientation) else {
            continue;
        };
        let rule = templates::override_rule(&ctx, props)?;
        sheet.at_rule(
            &format!("@media (orientation: {})", orientation.as_css()),
            &[rule],
        );
    }

    Ok(sheet.finish())
}

/// One stylesheet for a set of patterns: each pattern's CSS in turn,
/// shells first, then pages, base sections and advanced sections, each group
/// ordered by id. The input order does not matter.
pub fn generate_layout_css(
    patterns: &[PatternToken],
    resolved: &ResolvedTokenSet,
    responsive: &ResponsiveConfig,
) -> Result<String, CssError> {
    let mut ordered: Vec<&PatternToken> = patterns.iter().collect();
    ordered.sort_by(|a, b| (a.category(), &a.id).cmp(&(b.category(), &b.id)));

    let mut sheet = StyleSheet::new();
    for pattern in ordered {
        sheet.append(&generate_css(pattern, resolved, responsive)?);
    }
    Ok(sheet.finish())
}
