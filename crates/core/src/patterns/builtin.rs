//! Patterns shipped with the library. Every reference points at tokens the
//! built-in themes define.

use std::collections::BTreeMap;

use tekton_contract::{
    AdvancedPattern, Alignment, Breakpoint, CollapsibleConfig, Display, FlexDirection,
    LayoutProps, PatternKind, PatternToken, QueryMode, RegionPosition, ShellRegion,
    StickyConfig, Tier, TokenRef,
};

fn atomic(group: &str, key: &str) -> TokenRef {
    TokenRef::new(Tier::Atomic, [group, key])
}

fn spacing(key: &str) -> TokenRef {
    atomic("spacing", key)
}

fn size(key: &str) -> TokenRef {
    atomic("size", key)
}

fn shadow(key: &str) -> TokenRef {
    atomic("shadow", key)
}

fn background(key: &str) -> TokenRef {
    TokenRef::new(Tier::Semantic, ["color", "background", key])
}

fn region(name: &str, position: RegionPosition, size: Option<TokenRef>) -> ShellRegion {
    ShellRegion {
        name: name.to_string(),
        position,
        size,
    }
}

fn token(id: &str, description: &str, kind: PatternKind, props: LayoutProps) -> PatternToken {
    PatternToken {
        id: id.to_string(),
        description: description.to_string(),
        kind,
        query_mode: QueryMode::Media,
        props,
        responsive: BTreeMap::new(),
        orientation: BTreeMap::new(),
    }
}

fn advanced(pattern: AdvancedPattern, extends: Option<&str>) -> PatternKind {
    PatternKind::AdvancedSection {
        pattern,
        extends: extends.map(str::to_string),
    }
}

fn columns(n: u32) -> LayoutProps {
    LayoutProps {
        columns: Some(n),
        ..LayoutProps::default()
    }
}

fn shells() -> Vec<PatternToken> {
    let dashboard = token(
        "shell.web.dashboard",
        "Application shell with a top bar, a navigation sidebar and a scrolling main area",
        PatternKind::Shell {
            regions: vec![
                region("header", RegionPosition::Top, Some(spacing("16"))),
                region("sidebar", RegionPosition::Left, Some(size("sidebar"))),
                region("main", RegionPosition::Center, None),
            ],
        },
        LayoutProps {
            background: Some(background("canvas")),
            ..LayoutProps::default()
        },
    );

    let marketing = token(
        "shell.web.marketing",
        "Marketing site shell: header, full-width content and footer",
        PatternKind::Shell {
            regions: vec![
                region("header", RegionPosition::Top, Some(spacing("16"))),
                region("main", RegionPosition::Center, None),
                region("footer", RegionPosition::Bottom, None),
            ],
        },
        LayoutProps {
            gap: Some(spacing("0")),
            background: Some(background("surface")),
            ..LayoutProps::default()
        },
    );

    vec![dashboard, marketing]
}

fn pages() -> Vec<PatternToken> {
    let mut dashboard = token(
        "page.dashboard",
        "Dashboard page: stacked widgets inside the content width",
        PatternKind::Page,
        LayoutProps {
            gap: Some(spacing("6")),
            padding: Some(spacing("6")),
            max_width: Some(size("content")),
            ..LayoutProps::default()
        },
    );
    dashboard.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            gap: Some(spacing("4")),
            padding: Some(spacing("4")),
            ..LayoutProps::default()
        },
    );

    let mut article = token(
        "page.article",
        "Long-form reading page constrained to the prose width",
        PatternKind::Page,
        LayoutProps {
            gap: Some(spacing("8")),
            padding: Some(spacing("8")),
            max_width: Some(size("prose")),
            background: Some(background("surface")),
            ..LayoutProps::default()
        },
    );
    article.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            padding: Some(spacing("4")),
            ..LayoutProps::default()
        },
    );

    vec![dashboard, article]
}

fn sections() -> Vec<PatternToken> {
    let mut grid_2 = token(
        "section.grid-2",
        "Two equal columns",
        PatternKind::Section,
        LayoutProps {
            gap: Some(spacing("6")),
            ..columns(2)
        },
    );
    grid_2.responsive.insert(Breakpoint::Mobile, columns(1));

    let mut grid_3 = token(
        "section.grid-3",
        "Three equal columns",
        PatternKind::Section,
        LayoutProps {
            gap: Some(spacing("6")),
            ..columns(3)
        },
    );
    grid_3.responsive.insert(
        Breakpoint::Tablet,
        LayoutProps {
            gap: Some(spacing("4")),
            ..columns(2)
        },
    );
    grid_3.responsive.insert(Breakpoint::Mobile, columns(1));

    let mut hero = token(
        "section.hero",
        "Centered full-bleed hero block",
        PatternKind::Section,
        LayoutProps {
            display: Some(Display::Flex),
            direction: Some(FlexDirection::Column),
            align: Some(Alignment::Center),
            justify: Some(Alignment::Center),
            gap: Some(spacing("6")),
            padding: Some(spacing("16")),
            background: Some(background("surface")),
            ..LayoutProps::default()
        },
    );
    hero.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            gap: Some(spacing("4")),
            padding: Some(spacing("8")),
            ..LayoutProps::default()
        },
    );

    let mut split = token(
        "section.split",
        "Media and copy side by side, stacked on narrow viewports",
        PatternKind::Section,
        LayoutProps {
            align: Some(Alignment::Center),
            gap: Some(spacing("8")),
            ..columns(2)
        },
    );
    split.query_mode = QueryMode::Container;
    split.responsive.insert(
        Breakpoint::Tablet,
        LayoutProps {
            gap: Some(spacing("6")),
            ..columns(1)
        },
    );

    vec![grid_2, grid_3, hero, split]
}

fn advanced_sections() -> Vec<PatternToken> {
    let mut masonry = token(
        "section.masonry",
        "Waterfall grid built on CSS columns",
        advanced(AdvancedPattern::Masonry, None),
        LayoutProps {
            gap: Some(spacing("4")),
            ..columns(4)
        },
    );
    masonry.responsive = BTreeMap::from([
        (
            Breakpoint::Desktop,
            LayoutProps {
                gap: Some(spacing("4")),
                ..columns(3)
            },
        ),
        (
            Breakpoint::Tablet,
            LayoutProps {
                gap: Some(spacing("3")),
                ..columns(2)
            },
        ),
        (
            Breakpoint::Mobile,
            LayoutProps {
                gap: Some(spacing("2")),
                ..columns(1)
            },
        ),
    ]);

    let mut sticky_header = token(
        "section.sticky-header",
        "Header that sticks to the viewport top and gains a shadow once stuck",
        advanced(
            AdvancedPattern::StickyHeader(StickyConfig {
                z_index: 100,
                stuck_shadow: shadow("md"),
                stuck_background: Some(background("surface")),
            }),
            None,
        ),
        LayoutProps {
            justify: Some(Alignment::SpaceBetween),
            gap: Some(spacing("4")),
            offset: Some(spacing("0")),
            padding: Some(spacing("4")),
            background: Some(background("surface")),
            shadow: Some(shadow("none")),
            ..LayoutProps::default()
        },
    );
    sticky_header.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            padding: Some(spacing("2")),
            ..LayoutProps::default()
        },
    );

    let mut sticky_footer = token(
        "section.sticky-footer",
        "Action bar that sticks to the viewport bottom",
        advanced(
            AdvancedPattern::StickyFooter(StickyConfig {
                z_index: 100,
                stuck_shadow: shadow("lg"),
                stuck_background: None,
            }),
            None,
        ),
        LayoutProps {
            justify: Some(Alignment::End),
            gap: Some(spacing("3")),
            offset: Some(spacing("0")),
            padding: Some(spacing("4")),
            background: Some(background("surface")),
            shadow: Some(shadow("sm")),
            ..LayoutProps::default()
        },
    );
    sticky_footer.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            justify: Some(Alignment::Stretch),
            padding: Some(spacing("3")),
            ..LayoutProps::default()
        },
    );

    let mut sidebar = token(
        "section.collapsible-sidebar",
        "Navigation sidebar that collapses to an icon rail",
        advanced(
            AdvancedPattern::CollapsibleSidebar(CollapsibleConfig {
                expanded_width: size("sidebar"),
                collapsed_width: size("rail"),
                transition_ms: 200,
                easing: "ease-in-out".to_string(),
            }),
            None,
        ),
        LayoutProps {
            gap: Some(spacing("2")),
            padding: Some(spacing("4")),
            background: Some(background("surface")),
            ..LayoutProps::default()
        },
    );
    sidebar.responsive.insert(
        Breakpoint::Mobile,
        LayoutProps {
            padding: Some(spacing("2")),
            ..LayoutProps::default()
        },
    );

    let hero_sticky = token(
        "section.hero-sticky",
        "Hero block whose heading bar sticks while the page scrolls",
        advanced(
            AdvancedPattern::StickyHeader(StickyConfig {
                z_index: 50,
                stuck_shadow: shadow("sm"),
                stuck_background: Some(background("surface")),
            }),
            Some("section.hero"),
        ),
        LayoutProps {
            offset: Some(spacing("0")),
            padding: Some(spacing("8")),
            ..LayoutProps::default()
        },
    );

    vec![masonry, sticky_header, sticky_footer, sidebar, hero_sticky]
}

/// Every built-in pattern, shells first and advanced sections last.
pub(crate) fn patterns() -> Vec<PatternToken> {
    let mut all = shells();
    all.extend(pages());
    all.extend(sections());
    all.extend(advanced_sections());
    all
}
