//! WCAG 2.x contrast checks for OKLCH colours and whole-theme audits.

use std::fmt;

use serde::{Deserialize, Serialize};
use tekton_contract::{ContrastPair, Oklch, Theme, Tier, TokenRef, TokenValue};
use thiserror::Error;

use crate::color::oklch_luminance;
use crate::resolver::{self, MissingToken, ResolveError};

const CONTRAST_OFFSET: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fail => "fail",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        };
        f.write_str(s)
    }
}

/// Which WCAG thresholds apply. Large text (18pt, or 14pt bold) has the
/// relaxed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContrastMode {
    #[default]
    NormalText,
    LargeText,
}

impl ContrastMode {
    /// Minimum ratios for (AA, AAA).
    pub fn thresholds(self) -> (f64, f64) {
        match self {
            Self::NormalText => (4.5, 7.0),
            Self::LargeText => (3.0, 4.5),
        }
    }

    pub fn level(self, ratio: f64) -> WcagLevel {
        let (aa, aaa) = self.thresholds();
        if ratio >= aaa {
            WcagLevel::Aaa
        } else if ratio >= aa {
            WcagLevel::Aa
        } else {
            WcagLevel::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contrast {
    pub ratio: f64,
    pub level: WcagLevel,
}

/// `(L1 + 0.05) / (L2 + 0.05)` with `L1` the lighter luminance. Symmetric,
/// always in 1.0 – 21.0.
pub fn contrast_ratio(foreground: Oklch, background: Oklch) -> f64 {
    let fg = oklch_luminance(foreground);
    let bg = oklch_luminance(background);
    let (lighter, darker) = if fg > bg { (fg, bg) } else { (bg, fg) };
    (lighter + CONTRAST_OFFSET) / (darker + CONTRAST_OFFSET)
}

pub fn check_contrast(foreground: Oklch, background: Oklch) -> Contrast {
    check_contrast_with(foreground, background, ContrastMode::NormalText)
}

pub fn check_contrast_with(foreground: Oklch, background: Oklch, mode: ContrastMode) -> Contrast {
    let ratio = contrast_ratio(foreground, background);
    Contrast {
        ratio,
        level: mode.level(ratio),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("`{0}` does not resolve to a colour")]
    NotAColor(TokenRef),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub pair: ContrastPair,
    pub foreground: Oklch,
    pub background: Oklch,
    pub ratio: f64,
    pub level: WcagLevel,
    /// Colour fallbacks used while resolving either side of the pair.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<MissingToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditFailure {
    pub pair: ContrastPair,
    pub error: AuditError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeAudit {
    pub theme_id: String,
    pub mode: ContrastMode,
    /// Whether the pairs came from the semantic colour roles because the
    /// theme declares none.
    pub derived: bool,
    pub entries: Vec<AuditEntry>,
    pub errors: Vec<AuditFailure>,
}

impl ThemeAudit {
    /// A theme may be published when at least one pair was checked, every
    /// pair resolved to real colours and each reaches `minimum`.
    pub fn is_publishable(&self, minimum: WcagLevel) -> bool {
        !self.entries.is_empty()
            && self.errors.is_empty()
            && self
                .entries
                .iter()
                .all(|e| e.level >= minimum && e.fallback.is_empty())
    }
}

/// Roles meant for inverse or brand surfaces rather than the page
/// backgrounds.
fn is_contextual_role(name: &str) -> bool {
    name == "inverse"
        || name == "brand"
        || name
            .strip_prefix("on")
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Pairs every `semantic.color.text.*` role with every
/// `semantic.color.background.*` role, skipping inverse and brand roles.
/// Ordered by foreground, then background.
pub fn derive_contrast_pairs(theme: &Theme) -> Vec<ContrastPair> {
    let text = TokenRef::new(Tier::Semantic, ["color", "text"]);
    let background = TokenRef::new(Tier::Semantic, ["color", "background"]);
    let roles = |group: &TokenRef| -> Vec<TokenRef> {
        theme
            .tokens
            .leaves()
            .into_iter()
            .map(|(reference, _)| reference)
            .filter(|reference| {
                reference.path.len() == 3
                    && reference.prefix(2) == *group
                    && !is_contextual_role(&reference.path[2])
            })
            .collect()
    };

    let backgrounds = roles(&background);
    roles(&text)
        .into_iter()
        .flat_map(|foreground| {
            backgrounds.iter().map(move |background| ContrastPair {
                foreground: foreground.clone(),
                background: background.clone(),
            })
        })
        .collect()
}

fn resolve_color(
    theme: &Theme,
    reference: &TokenRef,
    fallback: &mut Vec<MissingToken>,
) -> Result<Oklch, AuditError> {
    let resolved = resolver::resolve(theme, reference)?;
    fallback.extend(resolved.missing);
    match resolved.value {
        TokenValue::Color(color) => Ok(color),
        _ => Err(AuditError::NotAColor(reference.clone())),
    }
}

/// Audits every declared contrast pair with normal-text thresholds. Themes
/// that declare no pairs are audited on [`derive_contrast_pairs`].
pub fn audit_theme(theme: &Theme) -> ThemeAudit {
    audit_theme_with(theme, ContrastMode::NormalText)
}

pub fn audit_theme_with(theme: &Theme, mode: ContrastMode) -> ThemeAudit {
    let derived = theme.contrast_pairs.is_empty();
    let pairs = if derived {
        derive_contrast_pairs(theme)
    } else {
        theme.contrast_pairs.clone()
    };
    let mut entries = Vec::with_capacity(pairs.len());
    let mut errors = Vec::new();

    for pair in pairs {
        let mut fallback = Vec::new();
        let colors = resolve_color(theme, &pair.foreground, &mut fallback).and_then(|fg| {
            resolve_color(theme, &pair.background, &mut fallback).map(|bg| (fg, bg))
        });
        match colors {
            Ok((foreground, background)) => {
                let contrast = check_contrast_with(foreground, background, mode);
                entries.push(AuditEntry {
                    pair,
                    foreground,
                    background,
                    ratio: contrast.ratio,
                    level: contrast.level,
                    fallback,
                });
            }
            Err(error) => errors.push(AuditFailure { pair, error }),
        }
    }

    ThemeAudit {
        theme_id: theme.id.clone(),
        mode,
        derived,
        entries,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::{r, theme_with};
    use tekton_contract::{Dimension, LengthUnit};

    const WHITE: Oklch = Oklch::new(1.0, 0.0, 0.0);
    const BLACK: Oklch = Oklch::new(0.0, 0.0, 0.0);

    #[test]
    fn black_on_white_is_21() {
        let contrast = check_contrast(BLACK, WHITE);
        assert!((contrast.ratio - 21.0).abs() < 0.01);
        assert_eq!(contrast.level, WcagLevel::Aaa);
    }

    #[test]
    fn identical_colours_fail() {
        let grey = Oklch::new(0.6, 0.02, 250.0);
        let contrast = check_contrast(grey, grey);
        assert!((contrast.ratio - 1.0).abs() < 1e-9);
        assert_eq!(contrast.level, WcagLevel::Fail);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = Oklch::new(0.45, 0.1, 30.0);
        let b = Oklch::new(0.95, 0.01, 90.0);
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn thresholds_per_mode() {
        assert_eq!(ContrastMode::NormalText.level(7.0), WcagLevel::Aaa);
        assert_eq!(ContrastMode::NormalText.level(4.5), WcagLevel::Aa);
        assert_eq!(ContrastMode::NormalText.level(4.49), WcagLevel::Fail);
        assert_eq!(ContrastMode::LargeText.level(4.5), WcagLevel::Aaa);
        assert_eq!(ContrastMode::LargeText.level(3.0), WcagLevel::Aa);
        assert_eq!(ContrastMode::LargeText.level(2.99), WcagLevel::Fail);
    }

    #[test]
    fn neutral_midpoint_on_white_is_aa_and_large_text_aaa() {
        // oklch(0.5 0 0) on white is about 6:1 for normal text.
        let contrast = check_contrast(Oklch::new(0.5, 0.0, 0.0), WHITE);
        assert_eq!(contrast.level, WcagLevel::Aa);
        let large = check_contrast_with(Oklch::new(0.5, 0.0, 0.0), WHITE, ContrastMode::LargeText);
        assert_eq!(large.level, WcagLevel::Aaa);
    }

    #[test]
    fn audit_has_one_entry_per_resolving_pair() {
        let mut theme = theme_with(&[
            ("atomic.color.white", TokenValue::Color(WHITE)),
            ("atomic.color.black", TokenValue::Color(BLACK)),
            ("atomic.spacing.4", TokenValue::Dimension(Dimension::new(1.0, LengthUnit::Rem))),
            ("semantic.color.text", TokenValue::Alias(r("atomic.color.black"))),
            ("semantic.color.bg", TokenValue::Alias(r("atomic.color.white"))),
            ("semantic.color.ghost", TokenValue::Alias(r("atomic.color.missing"))),
        ]);
        theme.contrast_pairs = vec![
            ContrastPair {
                foreground: r("semantic.color.text"),
                background: r("semantic.color.bg"),
            },
            ContrastPair {
                foreground: r("semantic.color.ghost"),
                background: r("semantic.color.bg"),
            },
            ContrastPair {
                foreground: r("atomic.spacing.4"),
                background: r("semantic.color.bg"),
            },
        ];

        let audit = audit_theme(&theme);
        assert_eq!(audit.entries.len(), 2);
        assert_eq!(audit.errors.len(), 1);
        assert!(matches!(audit.errors[0].error, AuditError::NotAColor(_)));

        for entry in &audit.entries {
            assert_eq!(entry.level, ContrastMode::NormalText.level(entry.ratio));
        }
        assert_eq!(audit.entries[0].level, WcagLevel::Aaa);
        assert_eq!(audit.entries[1].fallback.len(), 1);
        assert!(!audit.is_publishable(WcagLevel::Aa));
    }

    #[test]
    fn undeclared_pairs_come_from_semantic_roles() {
        let theme = theme_with(&[
            ("atomic.color.snow", TokenValue::Color(Oklch::new(0.98, 0.0, 0.0))),
            ("atomic.color.mist", TokenValue::Color(Oklch::new(0.97, 0.0, 0.0))),
            ("atomic.color.ink", TokenValue::Color(Oklch::new(0.2, 0.0, 0.0))),
            ("semantic.color.background.canvas", TokenValue::Alias(r("atomic.color.snow"))),
            ("semantic.color.background.inverse", TokenValue::Alias(r("atomic.color.ink"))),
            ("semantic.color.text.muted", TokenValue::Alias(r("atomic.color.mist"))),
            ("semantic.color.text.primary", TokenValue::Alias(r("atomic.color.ink"))),
            ("semantic.color.text.onBrand", TokenValue::Alias(r("atomic.color.snow"))),
        ]);

        let pairs: Vec<String> = derive_contrast_pairs(&theme)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            pairs,
            vec![
                "semantic.color.text.muted on semantic.color.background.canvas",
                "semantic.color.text.primary on semantic.color.background.canvas",
            ]
        );

        let audit = audit_theme(&theme);
        assert!(audit.derived);
        assert_eq!(audit.entries.len(), 2);
        assert_eq!(audit.entries[0].level, WcagLevel::Fail);
        assert!(!audit.is_publishable(WcagLevel::Aa));
    }

    #[test]
    fn audit_without_entries_is_not_publishable() {
        let theme = theme_with(&[(
            "atomic.spacing.4",
            TokenValue::Dimension(Dimension::new(1.0, LengthUnit::Rem)),
        )]);
        let audit = audit_theme(&theme);
        assert!(audit.derived);
        assert!(audit.entries.is_empty());
        assert!(audit.errors.is_empty());
        assert!(!audit.is_publishable(WcagLevel::Fail));
    }
}
