//! Layout pattern tokens: shells, pages, sections and the advanced section
//! behaviours (masonry, sticky bars, collapsible sidebars).
//!
//! Pattern tokens never carry concrete values. Every spacing, size, shadow or
//! colour they mention is a [`TokenRef`] resolved against a theme before CSS
//! is generated.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::TokenRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternCategory {
    Shell,
    Page,
    Section,
    AdvancedSection,
}

impl PatternCategory {
    /// The id prefix every pattern of this category carries.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Shell => "shell.",
            Self::Page => "page.",
            Self::Section | Self::AdvancedSection => "section.",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Shell => "shell",
            Self::Page => "page",
            Self::Section => "section",
            Self::AdvancedSection => "advanced-section",
        };
        f.write_str(s)
    }
}

/// Responsive breakpoints, widest first. Overrides are always emitted in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        };
        f.write_str(s)
    }
}

/// Viewport orientations. Orientation overrides follow the breakpoint
/// overrides, portrait first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Media,
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Grid,
    Flex,
    Block,
    None,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Flex => "flex",
            Self::Block => "block",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::RowReverse => "row-reverse",
            Self::ColumnReverse => "column-reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Start,
    Center,
    End,
    Stretch,
    SpaceBetween,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Stretch => "stretch",
            Self::SpaceBetween => "space-between",
        }
    }
}

/// Layout properties a pattern sets, either as its base or as a breakpoint
/// override. Unset fields emit nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<TokenRef>,
    /// Sticky offset (`top` for headers, `bottom` for footers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TokenRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlexDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify: Option<Alignment>,
}

impl LayoutProps {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `base` with every field set in `self` taking precedence.
    pub fn overlay(&self, base: &LayoutProps) -> LayoutProps {
        LayoutProps {
            display: self.display.or(base.display),
            columns: self.columns.or(base.columns),
            gap: self.gap.clone().or_else(|| base.gap.clone()),
            padding: self.padding.clone().or_else(|| base.padding.clone()),
            max_width: self.max_width.clone().or_else(|| base.max_width.clone()),
            width: self.width.clone().or_else(|| base.width.clone()),
            offset: self.offset.clone().or_else(|| base.offset.clone()),
            background: self.background.clone().or_else(|| base.background.clone()),
            shadow: self.shadow.clone().or_else(|| base.shadow.clone()),
            direction: self.direction.or(base.direction),
            align: self.align.or(base.align),
            justify: self.justify.or(base.justify),
        }
    }

    pub fn references(&self) -> impl Iterator<Item = &TokenRef> {
        [
            &self.gap,
            &self.padding,
            &self.max_width,
            &self.width,
            &self.offset,
            &self.background,
            &self.shadow,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionPosition {
    Top,
    Left,
    Center,
    Right,
    Bottom,
}

/// A named grid area of an application shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellRegion {
    pub name: String,
    pub position: RegionPosition,
    /// Track size: height for top/bottom regions, width for left/right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TokenRef>,
}

fn default_z_index() -> i32 {
    100
}

fn default_transition_ms() -> u32 {
    200
}

fn default_easing() -> String {
    "ease-in-out".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyConfig {
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// Shadow applied in the `stuck` state.
    pub stuck_shadow: TokenRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stuck_background: Option<TokenRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsibleConfig {
    pub expanded_width: TokenRef,
    pub collapsed_width: TokenRef,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdvancedPattern {
    Masonry,
    StickyHeader(StickyConfig),
    StickyFooter(StickyConfig),
    CollapsibleSidebar(CollapsibleConfig),
}

impl AdvancedPattern {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Masonry => "masonry",
            Self::StickyHeader(_) => "sticky-header",
            Self::StickyFooter(_) => "sticky-footer",
            Self::CollapsibleSidebar(_) => "collapsible-sidebar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum PatternKind {
    Shell {
        regions: Vec<ShellRegion>,
    },
    Page,
    Section,
    #[serde(rename_all = "camelCase")]
    AdvancedSection {
        pattern: AdvancedPattern,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extends: Option<String>,
    },
}

impl PatternKind {
    pub fn category(&self) -> PatternCategory {
        match self {
            Self::Shell { .. } => PatternCategory::Shell,
            Self::Page => PatternCategory::Page,
            Self::Section => PatternCategory::Section,
            Self::AdvancedSection { .. } => PatternCategory::AdvancedSection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternToken {
    pub id: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: PatternKind,
    #[serde(default)]
    pub query_mode: QueryMode,
    #[serde(default)]
    pub props: LayoutProps,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive: BTreeMap<Breakpoint, LayoutProps>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orientation: BTreeMap<Orientation, LayoutProps>,
}

impl PatternToken {
    pub fn category(&self) -> PatternCategory {
        self.kind.category()
    }

    /// CSS class for the pattern: the id with dots replaced by dashes.
    pub fn class_name(&self) -> String {
        self.id.replace('.', "-")
    }

    /// Breakpoint overrides followed by orientation overrides.
    pub fn overrides(&self) -> impl Iterator<Item = &LayoutProps> + Clone {
        self.responsive.values().chain(self.orientation.values())
    }

    /// Every token reference the pattern needs resolved to emit CSS.
    pub fn references(&self) -> BTreeSet<TokenRef> {
        let mut refs: BTreeSet<TokenRef> = self.props.references().cloned().collect();
        for props in self.overrides() {
            refs.extend(props.references().cloned());
        }
        match &self.kind {
            PatternKind::Shell { regions } => {
                refs.extend(regions.iter().filter_map(|r| r.size.clone()));
            }
            PatternKind::AdvancedSection { pattern, .. } => match pattern {
                AdvancedPattern::Masonry => {}
                AdvancedPattern::StickyHeader(cfg) | AdvancedPattern::StickyFooter(cfg) => {
                    refs.insert(cfg.stuck_shadow.clone());
                    refs.extend(cfg.stuck_background.clone());
                }
                AdvancedPattern::CollapsibleSidebar(cfg) => {
                    refs.insert(cfg.expanded_width.clone());
                    refs.insert(cfg.collapsed_width.clone());
                }
            },
            PatternKind::Page | PatternKind::Section => {}
        }
        refs
    }
}
