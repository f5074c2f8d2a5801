//! Per-category property templates. Each template emits declarations in a
//! fixed order so the generated CSS is stable across runs.

use tekton_contract::{
    AdvancedPattern, Alignment, CollapsibleConfig, Display, FlexDirection, LayoutProps,
    PatternKind, PatternToken, RegionPosition, ShellRegion, StickyConfig, TokenRef,
};

use super::CssError;
use super::writer::Rule;
use crate::resolver::ResolvedTokenSet;

const FLUID_TRACK: &str = "minmax(0, 1fr)";

pub(crate) struct Context<'a> {
    pub pattern: &'a PatternToken,
    pub resolved: &'a ResolvedTokenSet,
    pub class: String,
}

impl<'a> Context<'a> {
    pub fn new(pattern: &'a PatternToken, resolved: &'a ResolvedTokenSet) -> Self {
        Self {
            pattern,
            resolved,
            class: format!(".{}", pattern.class_name()),
        }
    }

    fn value(&self, reference: &TokenRef) -> Result<String, CssError> {
        self.resolved
            .css(reference)
            .ok_or_else(|| CssError::MissingToken {
                pattern: self.pattern.id.clone(),
                reference: reference.clone(),
            })
    }

    fn opt(&self, reference: Option<&TokenRef>) -> Result<Option<String>, CssError> {
        reference.map(|r| self.value(r)).transpose()
    }

    fn columns(&self, columns: Option<u32>) -> Result<Option<u32>, CssError> {
        match columns {
            Some(0) => Err(CssError::ZeroColumns(self.pattern.id.clone())),
            other => Ok(other),
        }
    }

    fn is_masonry(&self) -> bool {
        matches!(
            self.pattern.kind,
            PatternKind::AdvancedSection {
                pattern: AdvancedPattern::Masonry,
                ..
            }
        )
    }

    fn offset_property(&self) -> &'static str {
        match self.pattern.kind {
            PatternKind::AdvancedSection {
                pattern: AdvancedPattern::StickyFooter(_),
                ..
            } => "bottom",
            _ => "top",
        }
    }
}

fn repeat_columns(n: u32) -> String {
    format!("repeat({n}, {FLUID_TRACK})")
}

fn push_direction(props: &LayoutProps, rule: &mut Rule) {
    rule.push_opt("flex-direction", props.direction.map(|d| d.as_css().to_string()));
}

fn push_alignment(props: &LayoutProps, rule: &mut Rule) {
    rule.push_opt("align-items", props.align.map(|a| a.as_css().to_string()));
    rule.push_opt("justify-content", props.justify.map(|a| a.as_css().to_string()));
}

fn push_widths(ctx: &Context<'_>, props: &LayoutProps, rule: &mut Rule) -> Result<(), CssError> {
    rule.push_opt("width", ctx.opt(props.width.as_ref())?);
    rule.push_opt("max-width", ctx.opt(props.max_width.as_ref())?);
    Ok(())
}

/// The base rule for a pattern plus any child or state rules it needs, in
/// output order. Every prop an override can set is also written by the base
/// templates, except those `PatternCatalog::new` rejects for the category.
pub(crate) fn base_rules(ctx: &Context<'_>) -> Result<Vec<Rule>, CssError> {
    let props = &ctx.pattern.props;
    let mut rule = Rule::new(ctx.class.clone());
    let mut extra = Vec::new();

    match &ctx.pattern.kind {
        PatternKind::Shell { regions } => shell(ctx, regions, props, &mut rule)?,
        PatternKind::Page => page(ctx, props, &mut rule)?,
        PatternKind::Section => section(ctx, props, &mut rule)?,
        PatternKind::AdvancedSection { pattern, .. } => match pattern {
            AdvancedPattern::Masonry => masonry(ctx, props, &mut rule, &mut extra)?,
            AdvancedPattern::StickyHeader(cfg) | AdvancedPattern::StickyFooter(cfg) => {
                sticky(ctx, props, cfg, &mut rule, &mut extra)?
            }
            AdvancedPattern::CollapsibleSidebar(cfg) => {
                collapsible(ctx, props, cfg, &mut rule, &mut extra)?
            }
        },
    }

    let mut rules = vec![rule];
    rules.extend(extra);
    Ok(rules)
}

fn shell(
    ctx: &Context<'_>,
    regions: &[ShellRegion],
    props: &LayoutProps,
    rule: &mut Rule,
) -> Result<(), CssError> {
    let find = |position: RegionPosition| regions.iter().find(|r| r.position == position);
    let track = |region: &ShellRegion| -> Result<String, CssError> {
        Ok(ctx.opt(region.size.as_ref())?.unwrap_or_else(|| "auto".to_string()))
    };

    let middle: Vec<&ShellRegion> = [RegionPosition::Left, RegionPosition::Center, RegionPosition::Right]
        .into_iter()
        .filter_map(find)
        .collect();
    let width = middle.len().max(1);
    let spanning = |region: &ShellRegion| {
        let names = vec![region.name.as_str(); width];
        format!("\"{}\"", names.join(" "))
    };

    let mut areas = Vec::new();
    let mut rows = Vec::new();
    if let Some(top) = find(RegionPosition::Top) {
        areas.push(spanning(top));
        rows.push(track(top)?);
    }
    if !middle.is_empty() {
        let names: Vec<&str> = middle.iter().map(|r| r.name.as_str()).collect();
        areas.push(format!("\"{}\"", names.join(" ")));
        rows.push(FLUID_TRACK.to_string());
    }
    if let Some(bottom) = find(RegionPosition::Bottom) {
        areas.push(spanning(bottom));
        rows.push(track(bottom)?);
    }
    let mut columns = Vec::with_capacity(middle.len());
    for region in &middle {
        columns.push(match region.position {
            RegionPosition::Center => FLUID_TRACK.to_string(),
            _ => track(*region)?,
        });
    }

    rule.push("display", props.display.map_or("grid", Display::as_css));
    if !areas.is_empty() {
        rule.push("grid-template-areas", areas.join(" "));
    }
    if !columns.is_empty() {
        rule.push("grid-template-columns", columns.join(" "));
    }
    if !rows.is_empty() {
        rule.push("grid-template-rows", rows.join(" "));
    }
    push_direction(props, rule);
    push_alignment(props, rule);
    rule.push_opt("gap", ctx.opt(props.gap.as_ref())?);
    push_widths(ctx, props, rule)?;
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    rule.push("min-height", "100vh");
    Ok(())
}

fn page(ctx: &Context<'_>, props: &LayoutProps, rule: &mut Rule) -> Result<(), CssError> {
    let display = props.display.map_or("flex", Display::as_css);
    let direction = props.direction.map_or("column", FlexDirection::as_css);
    rule.push("display", display);
    rule.push_opt("grid-template-columns", ctx.columns(props.columns)?.map(repeat_columns));
    rule.push("flex-direction", direction);
    push_alignment(props, rule);
    rule.push_opt("gap", ctx.opt(props.gap.as_ref())?);
    rule.push_opt("width", ctx.opt(props.width.as_ref())?);
    let max_width = ctx.opt(props.max_width.as_ref())?;
    let centered = max_width.is_some();
    rule.push_opt("max-width", max_width);
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    if centered {
        rule.push("margin-inline", "auto");
    }
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    Ok(())
}

fn section(ctx: &Context<'_>, props: &LayoutProps, rule: &mut Rule) -> Result<(), CssError> {
    rule.push("display", props.display.map_or("grid", Display::as_css));
    rule.push_opt("grid-template-columns", ctx.columns(props.columns)?.map(repeat_columns));
    push_direction(props, rule);
    push_alignment(props, rule);
    rule.push_opt("gap", ctx.opt(props.gap.as_ref())?);
    push_widths(ctx, props, rule)?;
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    Ok(())
}

fn masonry(
    ctx: &Context<'_>,
    props: &LayoutProps,
    rule: &mut Rule,
    extra: &mut Vec<Rule>,
) -> Result<(), CssError> {
    let gap = ctx.opt(props.gap.as_ref())?;
    rule.push_opt("display", props.display.map(|d| d.as_css().to_string()));
    rule.push("column-count", ctx.columns(props.columns)?.unwrap_or(1).to_string());
    push_direction(props, rule);
    push_alignment(props, rule);
    rule.push_opt("column-gap", gap.clone());
    push_widths(ctx, props, rule)?;
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);

    let mut child = Rule::new(format!("{} > *", ctx.class));
    child.push("break-inside", "avoid");
    child.push_opt("margin-block-end", gap);
    extra.push(child);
    Ok(())
}

fn sticky(
    ctx: &Context<'_>,
    props: &LayoutProps,
    cfg: &StickyConfig,
    rule: &mut Rule,
    extra: &mut Vec<Rule>,
) -> Result<(), CssError> {
    rule.push("display", props.display.map_or("flex", Display::as_css));
    rule.push_opt("grid-template-columns", ctx.columns(props.columns)?.map(repeat_columns));
    push_direction(props, rule);
    rule.push("align-items", props.align.map_or("center", Alignment::as_css));
    rule.push_opt("justify-content", props.justify.map(|a| a.as_css().to_string()));
    rule.push_opt("gap", ctx.opt(props.gap.as_ref())?);
    push_widths(ctx, props, rule)?;
    rule.push("position", "sticky");
    rule.push(
        ctx.offset_property(),
        ctx.opt(props.offset.as_ref())?.unwrap_or_else(|| "0".to_string()),
    );
    rule.push("z-index", cfg.z_index.to_string());
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    rule.push("transition", "box-shadow 200ms ease-in-out");

    let mut stuck = Rule::new(format!("{}[data-state=\"stuck\"]", ctx.class));
    stuck.push("box-shadow", ctx.value(&cfg.stuck_shadow)?);
    stuck.push_opt("background-color", ctx.opt(cfg.stuck_background.as_ref())?);
    extra.push(stuck);
    Ok(())
}

fn collapsible(
    ctx: &Context<'_>,
    props: &LayoutProps,
    cfg: &CollapsibleConfig,
    rule: &mut Rule,
    extra: &mut Vec<Rule>,
) -> Result<(), CssError> {
    let expanded = ctx.value(&cfg.expanded_width)?;
    let collapsed = ctx.value(&cfg.collapsed_width)?;

    rule.push("display", props.display.map_or("flex", Display::as_css));
    rule.push_opt("grid-template-columns", ctx.columns(props.columns)?.map(repeat_columns));
    rule.push("flex-direction", props.direction.map_or("column", FlexDirection::as_css));
    push_alignment(props, rule);
    rule.push("width", expanded.clone());
    rule.push_opt("max-width", ctx.opt(props.max_width.as_ref())?);
    rule.push("overflow", "hidden");
    rule.push(
        "transition",
        format!("width {}ms {}", cfg.transition_ms, cfg.easing),
    );
    rule.push_opt("gap", ctx.opt(props.gap.as_ref())?);
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    rule.push("will-change", "width");

    let mut open = Rule::new(format!("{}[data-state=\"expanded\"]", ctx.class));
    open.push("width", expanded);
    extra.push(open);

    let mut closed = Rule::new(format!("{}[data-state=\"collapsed\"]", ctx.class));
    closed.push("width", collapsed.clone());
    closed.push("min-width", collapsed);
    extra.push(closed);
    Ok(())
}

/// Declarations for a breakpoint override: only the props it sets.
pub(crate) fn override_rule(ctx: &Context<'_>, props: &LayoutProps) -> Result<Rule, CssError> {
    let masonry = ctx.is_masonry();
    let mut rule = Rule::new(ctx.class.clone());

    rule.push_opt("display", props.display.map(|d| d.as_css().to_string()));
    match (masonry, ctx.columns(props.columns)?) {
        (true, Some(n)) => rule.push("column-count", n.to_string()),
        (false, Some(n)) => rule.push("grid-template-columns", repeat_columns(n)),
        (_, None) => {}
    }
    push_direction(props, &mut rule);
    push_alignment(props, &mut rule);
    rule.push_opt(
        if masonry { "column-gap" } else { "gap" },
        ctx.opt(props.gap.as_ref())?,
    );
    push_widths(ctx, props, &mut rule)?;
    rule.push_opt(ctx.offset_property(), ctx.opt(props.offset.as_ref())?);
    rule.push_opt("padding", ctx.opt(props.padding.as_ref())?);
    rule.push_opt("background-color", ctx.opt(props.background.as_ref())?);
    rule.push_opt("box-shadow", ctx.opt(props.shadow.as_ref())?);
    Ok(rule)
}
