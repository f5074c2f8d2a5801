//! Token resolution: from a [`TokenRef`] to a concrete value.
//!
//! Lookup walks the theme tree segment by segment starting at the
//! reference's tier. Alias leaves are followed at most
//! [`MAX_REFERENCE_DEPTH`] times. A missing colour token resolves to
//! [`NEUTRAL_FALLBACK`] and reports a [`MissingToken`] next to the value;
//! any other missing token is an error.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use tekton_contract::{Lookup, Oklch, RefParseError, Theme, TokenRef, TokenTree, TokenValue};
use thiserror::Error;
use tracing::warn;

/// Maximum number of alias indirections followed for one reference.
pub const MAX_REFERENCE_DEPTH: usize = 8;

/// Value substituted for colour tokens that are absent from a theme.
pub const NEUTRAL_FALLBACK: Oklch = Oklch::new(0.5, 0.0, 0.0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("unresolved reference `{reference}` (no token at `{attempted}`)")]
    Unresolved {
        reference: TokenRef,
        attempted: TokenRef,
    },
    #[error("cyclic reference `{reference}`: {}", format_chain(.chain))]
    Cyclic {
        reference: TokenRef,
        chain: Vec<TokenRef>,
    },
    #[error("reference `{0}` names a token group, not a token")]
    GroupReference(TokenRef),
    #[error("invalid reference: {0}")]
    InvalidReference(#[from] RefParseError),
}

fn format_chain(chain: &[TokenRef]) -> String {
    let mut out = String::new();
    for (i, r) in chain.iter().enumerate() {
        if i > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{r}");
    }
    out
}

/// Diagnostic emitted when a colour token is missing and the neutral
/// fallback was used instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingToken {
    pub requested: TokenRef,
    /// The reference that had no token behind it. Differs from `requested`
    /// when an alias pointed at a missing target.
    pub missing: TokenRef,
    pub fallback: Oklch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: TokenValue,
    pub missing: Option<MissingToken>,
}

/// Outcome of following a reference without applying any fallback.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step<'a> {
    Found(&'a TokenValue),
    Missing { attempted: TokenRef },
}

/// Follows aliases from `start` until a concrete leaf, a missing token or a
/// failure. Shared by the resolver and the schema validator.
pub(crate) fn follow<'a>(tree: &'a TokenTree, start: &TokenRef) -> Result<Step<'a>, ResolveError> {
    let mut chain = vec![start.clone()];
    let mut current = start.clone();
    loop {
        match tree.lookup(&current) {
            Lookup::Leaf(TokenValue::Alias(target)) => {
                let revisit = chain.contains(target);
                chain.push(target.clone());
                if revisit || chain.len() > MAX_REFERENCE_DEPTH + 1 {
                    return Err(ResolveError::Cyclic {
                        reference: start.clone(),
                        chain,
                    });
                }
                current = target.clone();
            }
            Lookup::Leaf(value) => return Ok(Step::Found(value)),
            Lookup::Group(_) => return Err(ResolveError::GroupReference(current)),
            Lookup::Missing(_) => return Ok(Step::Missing { attempted: current }),
        }
    }
}

/// Resolves one reference against a theme.
pub fn resolve(theme: &Theme, reference: &TokenRef) -> Result<Resolved, ResolveError> {
    match follow(&theme.tokens, reference)? {
        Step::Found(value) => Ok(Resolved {
            value: value.clone(),
            missing: None,
        }),
        Step::Missing { attempted } if reference.is_color() || attempted.is_color() => {
            warn!(
                theme = %theme.id,
                requested = %reference,
                missing = %attempted,
                "missing colour token, using neutral fallback"
            );
            Ok(Resolved {
                value: TokenValue::Color(NEUTRAL_FALLBACK),
                missing: Some(MissingToken {
                    requested: reference.clone(),
                    missing: attempted,
                    fallback: NEUTRAL_FALLBACK,
                }),
            })
        }
        Step::Missing { attempted } => Err(ResolveError::Unresolved {
            reference: reference.clone(),
            attempted,
        }),
    }
}

/// Parses `reference` and resolves it.
pub fn resolve_str(theme: &Theme, reference: &str) -> Result<Resolved, ResolveError> {
    let reference = TokenRef::parse(reference)?;
    resolve(theme, &reference)
}

/// A flat, ordered map of resolved tokens for one request, together with
/// fallback diagnostics and the references that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTokenSet {
    pub values: BTreeMap<TokenRef, TokenValue>,
    pub diagnostics: Vec<MissingToken>,
    pub failures: BTreeMap<TokenRef, ResolveError>,
}

impl ResolvedTokenSet {
    pub fn get(&self, reference: &TokenRef) -> Option<&TokenValue> {
        self.values.get(reference)
    }

    pub fn css(&self, reference: &TokenRef) -> Option<String> {
        self.get(reference).map(TokenValue::to_css)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn record(&mut self, reference: &TokenRef, outcome: Result<Resolved, ResolveError>) {
        match outcome {
            Ok(resolved) => {
                self.diagnostics.extend(resolved.missing);
                self.values.insert(reference.clone(), resolved.value);
            }
            Err(err) => {
                self.failures.insert(reference.clone(), err);
            }
        }
    }
}

/// Resolves every reference, collecting failures rather than stopping at the
/// first one. Duplicate references are resolved once.
pub fn resolve_many<'r, I>(theme: &Theme, references: I) -> ResolvedTokenSet
where
    I: IntoIterator<Item = &'r TokenRef>,
{
    let mut set = ResolvedTokenSet::default();
    for reference in references {
        if set.values.contains_key(reference) || set.failures.contains_key(reference) {
            continue;
        }
        set.record(reference, resolve(theme, reference));
    }
    set
}

/// Resolves every leaf of every tier in the theme.
pub fn resolve_all(theme: &Theme) -> ResolvedTokenSet {
    let refs: Vec<TokenRef> = theme.tokens.leaves().into_iter().map(|(r, _)| r).collect();
    resolve_many(theme, &refs)
}
