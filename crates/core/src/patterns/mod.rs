//! The catalog of layout pattern tokens.
//!
//! A catalog is validated once when it is built and is read-only afterwards.
//! Advanced sections may name a base section in `extends`; [`PatternCatalog::compose`]
//! returns the advanced token with the base section's props underneath its own.

mod builtin;

use std::collections::{BTreeMap, BTreeSet};

use tekton_contract::{
    AdvancedPattern, LayoutProps, PatternCategory, PatternKind, PatternToken, RegionPosition,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternViolation {
    #[error("duplicate {category} pattern id `{id}`")]
    Duplicate { category: PatternCategory, id: String },
    #[error("pattern id `{id}` must start with `{prefix}`")]
    BadPrefix { id: String, prefix: &'static str },
    #[error("pattern id `{0}` may only contain lowercase letters, digits, `-` and `.`")]
    InvalidId(String),
    #[error("advanced section `{0}` reuses the id of a base section")]
    AdvancedReusesBase(String),
    #[error("pattern `{id}` extends unknown base section `{extends}`")]
    UnknownExtends { id: String, extends: String },
    #[error("pattern `{0}` declares zero columns")]
    ZeroColumns(String),
    #[error("shell `{0}` declares no regions")]
    EmptyRegions(String),
    #[error("shell `{id}` declares region `{name}` twice")]
    DuplicateRegion { id: String, name: String },
    #[error("shell `{id}` declares more than one {position:?} region")]
    DuplicatePosition { id: String, position: RegionPosition },
    #[error("pattern `{id}` sets `{prop}`, which has no effect on this kind of pattern")]
    UnsupportedProp { id: String, prop: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error("{} invalid pattern definition(s)", .0.len())]
    InvalidDefinition(Vec<PatternViolation>),
    #[error("pattern `{id}` not found")]
    NotFound { id: String, alternatives: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: BTreeMap<String, PatternToken>,
}

impl PatternCatalog {
    /// The patterns shipped with the library.
    pub fn builtin() -> Self {
        Self::index(builtin::patterns())
    }

    /// Builds a catalog, collecting every violation before failing.
    pub fn new(tokens: Vec<PatternToken>) -> Result<Self, PatternError> {
        let violations = check(&tokens);
        if !violations.is_empty() {
            return Err(PatternError::InvalidDefinition(violations));
        }
        Ok(Self::index(tokens))
    }

    fn index(tokens: Vec<PatternToken>) -> Self {
        Self {
            patterns: tokens.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Result<&PatternToken, PatternError> {
        self.patterns.get(id).ok_or_else(|| PatternError::NotFound {
            id: id.to_string(),
            alternatives: self.alternatives(id),
        })
    }

    /// Ids sharing the requested id's category prefix, or every id when
    /// none do.
    fn alternatives(&self, id: &str) -> Vec<String> {
        let head = id.split('.').next().unwrap_or_default();
        let prefix = format!("{head}.");
        let related: Vec<String> = self
            .patterns
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        if related.is_empty() {
            self.ids()
        } else {
            related
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.patterns.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn by_category(&self, category: PatternCategory) -> Vec<&PatternToken> {
        self.patterns
            .values()
            .filter(|p| p.category() == category)
            .collect()
    }

    /// Base sections followed by advanced sections.
    pub fn sections(&self) -> Vec<&PatternToken> {
        let mut out = self.by_category(PatternCategory::Section);
        out.extend(self.by_category(PatternCategory::AdvancedSection));
        out
    }

    /// The pattern with its `extends` base applied. Patterns without a base
    /// are returned unchanged.
    pub fn compose(&self, id: &str) -> Result<PatternToken, PatternError> {
        let pattern = self.get(id)?;
        let PatternKind::AdvancedSection {
            extends: Some(base_id),
            ..
        } = &pattern.kind
        else {
            return Ok(pattern.clone());
        };
        let base = self.get(base_id)?;
        debug!(pattern = %id, base = %base_id, "composing advanced section");

        let mut composed = pattern.clone();
        composed.props = pattern.props.overlay(&base.props);
        composed.responsive = overlay_map(&pattern.responsive, &base.responsive);
        composed.orientation = overlay_map(&pattern.orientation, &base.orientation);
        Ok(composed)
    }

    /// Every pattern composed with its base, shells first, then pages, base
    /// sections and advanced sections, each group ordered by id.
    pub fn compose_all(&self) -> Result<Vec<PatternToken>, PatternError> {
        let mut ids: Vec<(PatternCategory, &String)> = self
            .patterns
            .iter()
            .map(|(id, p)| (p.category(), id))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| self.compose(id)).collect()
    }
}

/// Per-key overlay of `own` onto `under`, keeping keys from both.
fn overlay_map<K: Ord + Copy>(
    own: &BTreeMap<K, LayoutProps>,
    under: &BTreeMap<K, LayoutProps>,
) -> BTreeMap<K, LayoutProps> {
    let keys: BTreeSet<K> = own.keys().chain(under.keys()).copied().collect();
    let empty = LayoutProps::default();
    keys.into_iter()
        .map(|key| {
            let top = own.get(&key).unwrap_or(&empty);
            let bottom = under.get(&key).unwrap_or(&empty);
            (key, top.overlay(bottom))
        })
        .collect()
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && !id.split('.').any(str::is_empty)
}

fn has_zero_columns(pattern: &PatternToken) -> bool {
    pattern.props.columns == Some(0) || pattern.overrides().any(|p| p.columns == Some(0))
}

/// Props a pattern sets that its CSS template never writes. Shell grids
/// come from their regions, offsets only apply to sticky sections and a
/// collapsible sidebar takes its width from its config.
fn unsupported_props(pattern: &PatternToken) -> Vec<&'static str> {
    let mut all = std::iter::once(&pattern.props).chain(pattern.overrides());
    let sticky = matches!(
        pattern.kind,
        PatternKind::AdvancedSection {
            pattern: AdvancedPattern::StickyHeader(_) | AdvancedPattern::StickyFooter(_),
            ..
        }
    );
    let mut out = Vec::new();
    if matches!(pattern.kind, PatternKind::Shell { .. }) && all.clone().any(|p| p.columns.is_some()) {
        out.push("columns");
    }
    if !sticky && all.any(|p| p.offset.is_some()) {
        out.push("offset");
    }
    if let PatternKind::AdvancedSection {
        pattern: AdvancedPattern::CollapsibleSidebar(_),
        ..
    } = pattern.kind
        && pattern.props.width.is_some()
    {
        out.push("width");
    }
    out
}

fn check(tokens: &[PatternToken]) -> Vec<PatternViolation> {
    let mut violations = Vec::new();
    let mut seen: BTreeSet<(PatternCategory, &str)> = BTreeSet::new();
    let base_sections: BTreeSet<&str> = tokens
        .iter()
        .filter(|t| t.category() == PatternCategory::Section)
        .map(|t| t.id.as_str())
        .collect();

    for token in tokens {
        let id = token.id.as_str();
        let category = token.category();
        let prefix = category.id_prefix();

        if !is_valid_id(id) {
            violations.push(PatternViolation::InvalidId(id.to_string()));
        } else if id.len() <= prefix.len() || !id.starts_with(prefix) {
            violations.push(PatternViolation::BadPrefix {
                id: id.to_string(),
                prefix,
            });
        }
        if !seen.insert((category, id)) {
            violations.push(PatternViolation::Duplicate {
                category,
                id: id.to_string(),
            });
        }
        if has_zero_columns(token) {
            violations.push(PatternViolation::ZeroColumns(id.to_string()));
        }
        for prop in unsupported_props(token) {
            violations.push(PatternViolation::UnsupportedProp {
                id: id.to_string(),
                prop,
            });
        }

        match &token.kind {
            PatternKind::Shell { regions } => {
                if regions.is_empty() {
                    violations.push(PatternViolation::EmptyRegions(id.to_string()));
                }
                let mut names = BTreeSet::new();
                let mut positions = BTreeSet::new();
                for region in regions {
                    if !names.insert(region.name.as_str()) {
                        violations.push(PatternViolation::DuplicateRegion {
                            id: id.to_string(),
                            name: region.name.clone(),
                        });
                    }
                    if !positions.insert(region.position) {
                        violations.push(PatternViolation::DuplicatePosition {
                            id: id.to_string(),
                            position: region.position,
                        });
                    }
                }
            }
            PatternKind::AdvancedSection { extends, .. } => {
                if base_sections.contains(id) {
                    violations.push(PatternViolation::AdvancedReusesBase(id.to_string()));
                }
                if let Some(base) = extends
                    && !base_sections.contains(base.as_str())
                {
                    violations.push(PatternViolation::UnknownExtends {
                        id: id.to_string(),
                        extends: base.clone(),
                    });
                }
            }
            PatternKind::Page | PatternKind::Section => {}
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::r;
    use tekton_contract::{
        AdvancedPattern, Breakpoint, Display, QueryMode, ShellRegion, StickyConfig,
    };

    fn section(id: &str) -> PatternToken {
        PatternToken {
            id: id.into(),
            description: String::new(),
            kind: PatternKind::Section,
            query_mode: QueryMode::Media,
            props: LayoutProps::default(),
            responsive: BTreeMap::new(),
            orientation: BTreeMap::new(),
        }
    }

    fn sticky(id: &str, extends: Option<&str>) -> PatternToken {
        PatternToken {
            kind: PatternKind::AdvancedSection {
                pattern: AdvancedPattern::StickyHeader(StickyConfig {
                    z_index: 10,
                    stuck_shadow: r("atomic.shadow.md"),
                    stuck_background: None,
                }),
                extends: extends.map(str::to_string),
            },
            ..section(id)
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = PatternCatalog::builtin();
        assert!(PatternCatalog::new(builtin::patterns()).is_ok());
        assert_eq!(catalog.by_category(PatternCategory::Shell).len(), 2);
        assert_eq!(catalog.by_category(PatternCategory::Page).len(), 2);
        assert!(catalog.get("section.masonry").is_ok());
        assert!(catalog.get("section.collapsible-sidebar").is_ok());
    }

    #[test]
    fn sections_lists_base_before_advanced() {
        let catalog = PatternCatalog::builtin();
        let categories: Vec<PatternCategory> =
            catalog.sections().iter().map(|p| p.category()).collect();
        let first_advanced = categories
            .iter()
            .position(|c| *c == PatternCategory::AdvancedSection)
            .unwrap();
        assert!(categories[..first_advanced].iter().all(|c| *c == PatternCategory::Section));
        assert!(categories[first_advanced..].iter().all(|c| *c == PatternCategory::AdvancedSection));
    }

    #[test]
    fn not_found_lists_related_ids() {
        let catalog = PatternCatalog::builtin();
        let Err(PatternError::NotFound { id, alternatives }) = catalog.get("page.missing") else {
            panic!("expected not found");
        };
        assert_eq!(id, "page.missing");
        assert_eq!(alternatives, vec!["page.article", "page.dashboard"]);

        let Err(PatternError::NotFound { alternatives, .. }) = catalog.get("widget") else {
            panic!("expected not found");
        };
        assert_eq!(alternatives.len(), catalog.len());
    }

    #[test]
    fn collects_every_violation() {
        let mut zero = section("section.zero");
        zero.responsive.insert(
            Breakpoint::Mobile,
            LayoutProps {
                columns: Some(0),
                ..LayoutProps::default()
            },
        );
        let shell = PatternToken {
            kind: PatternKind::Shell {
                regions: vec![
                    ShellRegion {
                        name: "main".into(),
                        position: RegionPosition::Center,
                        size: None,
                    },
                    ShellRegion {
                        name: "main".into(),
                        position: RegionPosition::Center,
                        size: None,
                    },
                ],
            },
            ..section("shell.app")
        };
        let tokens = vec![
            section("section.hero"),
            section("section.hero"),
            section("page.wrong"),
            section("section.Bad"),
            sticky("section.hero", None),
            sticky("section.sticky", Some("section.missing")),
            zero,
            shell,
        ];
        let Err(PatternError::InvalidDefinition(violations)) = PatternCatalog::new(tokens) else {
            panic!("expected invalid definition");
        };
        assert_eq!(
            violations,
            vec![
                PatternViolation::Duplicate {
                    category: PatternCategory::Section,
                    id: "section.hero".into(),
                },
                PatternViolation::BadPrefix {
                    id: "page.wrong".into(),
                    prefix: "section.",
                },
                PatternViolation::InvalidId("section.Bad".into()),
                PatternViolation::AdvancedReusesBase("section.hero".into()),
                PatternViolation::UnknownExtends {
                    id: "section.sticky".into(),
                    extends: "section.missing".into(),
                },
                PatternViolation::ZeroColumns("section.zero".into()),
                PatternViolation::DuplicateRegion {
                    id: "shell.app".into(),
                    name: "main".into(),
                },
                PatternViolation::DuplicatePosition {
                    id: "shell.app".into(),
                    position: RegionPosition::Center,
                },
            ]
        );
    }

    #[test]
    fn empty_shell_is_rejected() {
        let shell = PatternToken {
            kind: PatternKind::Shell { regions: vec![] },
            ..section("shell.empty")
        };
        let err = PatternCatalog::new(vec![shell]).unwrap_err();
        assert_eq!(
            err,
            PatternError::InvalidDefinition(vec![PatternViolation::EmptyRegions(
                "shell.empty".into()
            )])
        );
    }

    #[test]
    fn compose_overlays_base_section() {
        let mut base = section("section.hero");
        base.props = LayoutProps {
            display: Some(Display::Flex),
            gap: Some(r("atomic.spacing.6")),
            padding: Some(r("atomic.spacing.16")),
            ..LayoutProps::default()
        };
        base.responsive.insert(
            Breakpoint::Mobile,
            LayoutProps {
                padding: Some(r("atomic.spacing.8")),
                gap: Some(r("atomic.spacing.4")),
                ..LayoutProps::default()
            },
        );
        let mut sticky = sticky("section.hero-sticky", Some("section.hero"));
        sticky.props.padding = Some(r("atomic.spacing.4"));
        sticky.responsive.insert(
            Breakpoint::Mobile,
            LayoutProps {
                padding: Some(r("atomic.spacing.2")),
                ..LayoutProps::default()
            },
        );

        let catalog = PatternCatalog::new(vec![base, sticky]).unwrap();
        let composed = catalog.compose("section.hero-sticky").unwrap();
        assert_eq!(composed.props.display, Some(Display::Flex));
        assert_eq!(composed.props.gap, Some(r("atomic.spacing.6")));
        assert_eq!(composed.props.padding, Some(r("atomic.spacing.4")));
        let mobile = &composed.responsive[&Breakpoint::Mobile];
        assert_eq!(mobile.padding, Some(r("atomic.spacing.2")));
        assert_eq!(mobile.gap, Some(r("atomic.spacing.4")));

        let plain = catalog.compose("section.hero").unwrap();
        assert_eq!(&plain, catalog.get("section.hero").unwrap());
    }

    #[test]
    fn props_without_css_are_rejected() {
        let mut offset = section("section.offset");
        offset.responsive.insert(
            Breakpoint::Tablet,
            LayoutProps {
                offset: Some(r("atomic.spacing.4")),
                ..LayoutProps::default()
            },
        );
        let shell = PatternToken {
            kind: PatternKind::Shell {
                regions: vec![ShellRegion {
                    name: "main".into(),
                    position: RegionPosition::Center,
                    size: None,
                }],
            },
            props: LayoutProps {
                columns: Some(2),
                ..LayoutProps::default()
            },
            ..section("shell.grid")
        };
        let mut pinned = sticky("section.pinned", None);
        pinned.props.offset = Some(r("atomic.spacing.4"));

        let err = PatternCatalog::new(vec![offset, shell, pinned]).unwrap_err();
        assert_eq!(
            err,
            PatternError::InvalidDefinition(vec![
                PatternViolation::UnsupportedProp {
                    id: "section.offset".into(),
                    prop: "offset",
                },
                PatternViolation::UnsupportedProp {
                    id: "shell.grid".into(),
                    prop: "columns",
                },
            ])
        );
    }
}
