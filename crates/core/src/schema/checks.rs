use std::collections::BTreeSet;

use tekton_contract::{SUPPORTED_SCHEMA_VERSION, Theme, Tier, TokenRef, TokenTree, TokenValue};

use super::document::{Expected, Violation, ViolationKind, token_path};
use crate::resolver::{ResolveError, Step, follow};

pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub(super) fn check_header(theme: &Theme) -> Vec<Violation> {
    let mut out = Vec::new();
    if !is_valid_id(&theme.id) {
        out.push(Violation::new("id", ViolationKind::InvalidId(theme.id.clone())));
    }
    if theme.name.trim().is_empty() {
        out.push(Violation::new("name", ViolationKind::Empty));
    }
    if theme.schema_version != SUPPORTED_SCHEMA_VERSION {
        out.push(Violation::new(
            "schemaVersion",
            ViolationKind::UnsupportedSchemaVersion(theme.schema_version.clone()),
        ));
    }
    out
}

fn check_atomic(path: &[String], value: &TokenValue) -> Option<ViolationKind> {
    let expected = Expected::for_atomic(path);
    match (expected, value) {
        (_, TokenValue::Alias(_)) => Some(ViolationKind::AtomicAlias),
        (Expected::Color, TokenValue::Color(c)) => {
            (!c.in_range()).then_some(ViolationKind::ColorOutOfRange(*c))
        }
        (Expected::Length | Expected::NumberOrLength, TokenValue::Dimension(d)) => {
            (!d.value.is_finite() || d.value < 0.0).then(|| ViolationKind::WrongType {
                expected: "a non-negative length",
            })
        }
        (Expected::Number { min, max }, TokenValue::Number(n)) => (!(min..=max).contains(n))
            .then_some(ViolationKind::NumberOutOfRange {
                value: *n,
                min,
                max,
            }),
        (Expected::NumberOrLength, TokenValue::Number(n)) => {
            (!n.is_finite() || *n < 0.0).then_some(ViolationKind::NumberOutOfRange {
                value: *n,
                min: 0.0,
                max: f64::MAX,
            })
        }
        (Expected::Text, TokenValue::Text(_)) => None,
        (Expected::Any, _) => None,
        (Expected::Color, _) => Some(ViolationKind::WrongType {
            expected: "an OKLCH colour",
        }),
        (Expected::Length, _) => Some(ViolationKind::WrongType { expected: "a length" }),
        (Expected::Text, _) => Some(ViolationKind::WrongType { expected: "a string" }),
        (Expected::Number { .. }, _) => Some(ViolationKind::WrongType { expected: "a number" }),
        (Expected::NumberOrLength, _) => Some(ViolationKind::WrongType {
            expected: "a number or a length",
        }),
    }
}

/// Maps a failed alias walk to a violation, or `None` when the failure
/// traces back to a leaf that was already rejected.
fn alias_violation(
    outcome: Result<Step<'_>, ResolveError>,
    rejected: &BTreeSet<TokenRef>,
) -> Option<ViolationKind> {
    match outcome {
        Ok(Step::Found(_)) => None,
        Ok(Step::Missing { attempted }) if rejected.contains(&attempted) => None,
        Ok(Step::Missing { attempted }) => Some(ViolationKind::MissingTarget(attempted)),
        Err(ResolveError::Cyclic { chain, .. }) => Some(ViolationKind::Cyclic(chain)),
        Err(ResolveError::GroupReference(target)) => Some(ViolationKind::GroupTarget(target)),
        Err(ResolveError::Unresolved { attempted, .. }) => {
            Some(ViolationKind::MissingTarget(attempted))
        }
        Err(ResolveError::InvalidReference(err)) => Some(ViolationKind::InvalidReference(err)),
    }
}

fn check_pair_side(
    tree: &TokenTree,
    reference: &TokenRef,
    rejected: &BTreeSet<TokenRef>,
) -> Option<ViolationKind> {
    match follow(tree, reference) {
        Ok(Step::Found(TokenValue::Color(_))) => None,
        Ok(Step::Found(_)) => Some(ViolationKind::NotAColor(reference.clone())),
        outcome => alias_violation(outcome, rejected),
    }
}

pub(super) fn check_tokens(theme: &Theme, rejected: &BTreeSet<TokenRef>) -> Vec<Violation> {
    let tree = &theme.tokens;
    let mut out = Vec::new();

    for (reference, value) in tree.leaves() {
        let path = token_path(reference.tier, &reference.path);
        let kind = match (reference.tier, value) {
            (Tier::Atomic, value) => check_atomic(&reference.path, value),
            (_, TokenValue::Alias(_)) => alias_violation(follow(tree, &reference), rejected),
            (Tier::Recipes, TokenValue::Text(_)) => None,
            (Tier::Recipes, _) => Some(ViolationKind::WrongType {
                expected: "a reference or a class list",
            }),
            (_, _) => Some(ViolationKind::NotAnAlias),
        };
        if let Some(kind) = kind {
            out.push(Violation::new(path, kind));
        }
    }

    for (index, pair) in theme.contrast_pairs.iter().enumerate() {
        for (side, reference) in [("foreground", &pair.foreground), ("background", &pair.background)] {
            if let Some(kind) = check_pair_side(tree, reference, rejected) {
                out.push(Violation::new(format!("contrastPairs[{index}].{side}"), kind));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::{r, theme_with};
    use tekton_contract::{Dimension, LengthUnit, Oklch};

    #[test]
    fn id_format() {
        assert!(is_valid_id("saas-modern"));
        assert!(is_valid_id("theme-2"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("Saas"));
        assert!(!is_valid_id("saas_modern"));
        assert!(!is_valid_id("../etc"));
    }

    #[test]
    fn typed_theme_checks() {
        let theme = theme_with(&[
            ("atomic.color.bad", TokenValue::Color(Oklch::new(0.5, 0.7, 10.0))),
            (
                "atomic.spacing.neg",
                TokenValue::Dimension(Dimension::new(-1.0, LengthUnit::Px)),
            ),
            ("atomic.shadow.sm", TokenValue::Number(2.0)),
            ("semantic.color.text", TokenValue::Color(Oklch::new(0.2, 0.0, 0.0))),
        ]);
        let violations = check_tokens(&theme, &BTreeSet::new());
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "tokens.atomic.color.bad",
                "tokens.atomic.shadow.sm",
                "tokens.atomic.spacing.neg",
                "tokens.semantic.color.text",
            ]
        );
        assert_eq!(violations[3].kind, ViolationKind::NotAnAlias);
    }

    #[test]
    fn rejected_targets_are_not_reported_twice() {
        let theme = theme_with(&[(
            "semantic.space.inset",
            TokenValue::Alias(r("atomic.spacing.4")),
        )]);
        let rejected = BTreeSet::from([r("atomic.spacing.4")]);
        assert!(check_tokens(&theme, &rejected).is_empty());
        assert_eq!(
            check_tokens(&theme, &BTreeSet::new())[0].kind,
            ViolationKind::MissingTarget(r("atomic.spacing.4"))
        );
    }
}
