use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};
use tekton_contract::{
    BrandTone, ContrastPair, Dimension, LengthError, Oklch, RefParseError, Theme, Tier, TokenRef,
    TokenTree, TokenValue,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("missing required field")]
    MissingField,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("`{0}` is not a valid token key")]
    InvalidKey(String),
    #[error("unknown token tier `{0}`")]
    UnknownTier(String),
    #[error("`{0}` is not a valid theme id (lowercase letters, digits and dashes)")]
    InvalidId(String),
    #[error("must not be empty")]
    Empty,
    #[error("unsupported schema version `{0}`")]
    UnsupportedSchemaVersion(String),
    #[error("unknown brand tone `{0}`")]
    UnknownBrandTone(String),
    #[error("invalid length: {0}")]
    InvalidLength(LengthError),
    #[error("colour {0} is outside the OKLCH ranges")]
    ColorOutOfRange(Oklch),
    #[error("{value} is outside {min}..={max}")]
    NumberOutOfRange { value: f64, min: f64, max: f64 },
    #[error("invalid reference: {0}")]
    InvalidReference(RefParseError),
    #[error("atomic tokens must hold concrete values, not references")]
    AtomicAlias,
    #[error("semantic and component tokens must be references")]
    NotAnAlias,
    #[error("reference target `{0}` does not exist")]
    MissingTarget(TokenRef),
    #[error("reference target `{0}` is a token group")]
    GroupTarget(TokenRef),
    #[error("reference chain is cyclic or too deep: {}", chain_text(.0))]
    Cyclic(Vec<TokenRef>),
    #[error("`{0}` does not resolve to a colour")]
    NotAColor(TokenRef),
}

fn chain_text(chain: &[TokenRef]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A single problem found in a theme, with the document path it was found at.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub(crate) fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Every violation found in one theme.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} violation(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// One line per violation, for logs and tooling.
    pub fn details(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) struct Parsed {
    pub theme: Theme,
    pub violations: Vec<Violation>,
    /// Leaves dropped because their value was malformed.
    pub rejected: BTreeSet<TokenRef>,
}

/// Value shape expected for an atomic token, chosen by its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Expected {
    Color,
    Length,
    Text,
    Number { min: f64, max: f64 },
    NumberOrLength,
    Any,
}

impl Expected {
    pub(crate) fn for_atomic(path: &[String]) -> Self {
        let category = path.first().map(String::as_str);
        let sub = path.get(1).map(String::as_str);
        match (category, sub) {
            (Some("color"), _) => Self::Color,
            (Some("spacing" | "radius" | "size"), _) => Self::Length,
            (Some("shadow"), _) => Self::Text,
            (Some("typography"), Some("fontSize")) => Self::Length,
            (Some("typography"), Some("fontWeight")) => Self::Number {
                min: 1.0,
                max: 1000.0,
            },
            (Some("typography"), Some("lineHeight")) => Self::NumberOrLength,
            (Some("typography"), Some("fontFamily" | "letterSpacing")) => Self::Text,
            (Some("opacity"), _) => Self::Number { min: 0.0, max: 1.0 },
            _ => Self::Any,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Color => "an OKLCH colour object {l, c, h}",
            Self::Length => "a length such as \"1rem\" or \"0\"",
            Self::Text => "a string",
            Self::Number { .. } => "a number",
            Self::NumberOrLength => "a number or a length",
            Self::Any => "a string or a number",
        }
    }
}

struct Parser {
    violations: Vec<Violation>,
    rejected: BTreeSet<TokenRef>,
}

impl Parser {
    fn violation(&mut self, path: impl Into<String>, kind: ViolationKind) {
        self.violations.push(Violation::new(path, kind));
    }

    fn required_str(&mut self, root: &Map<String, Value>, field: &str) -> String {
        match root.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.violation(field, ViolationKind::WrongType { expected: "a string" });
                String::new()
            }
            None => {
                self.violation(field, ViolationKind::MissingField);
                String::new()
            }
        }
    }

    fn brand_tone(&mut self, root: &Map<String, Value>) -> BrandTone {
        match root.get("brandTone") {
            Some(Value::String(s)) => match s.parse() {
                Ok(tone) => tone,
                Err(_) => {
                    self.violation("brandTone", ViolationKind::UnknownBrandTone(s.clone()));
                    BrandTone::Minimal
                }
            },
            Some(_) => {
                self.violation("brandTone", ViolationKind::WrongType { expected: "a string" });
                BrandTone::Minimal
            }
            None => {
                self.violation("brandTone", ViolationKind::MissingField);
                BrandTone::Minimal
            }
        }
    }

    fn tokens(&mut self, root: &Map<String, Value>) -> TokenTree {
        let mut tree = TokenTree::default();
        let tokens = match root.get("tokens") {
            Some(Value::Object(tokens)) => tokens,
            Some(_) => {
                self.violation("tokens", ViolationKind::WrongType { expected: "an object" });
                return tree;
            }
            None => {
                self.violation("tokens", ViolationKind::MissingField);
                return tree;
            }
        };

        for (key, value) in tokens {
            let Ok(tier) = key.parse::<Tier>() else {
                self.violation(format!("tokens.{key}"), ViolationKind::UnknownTier(key.clone()));
                continue;
            };
            match value {
                Value::Object(group) => self.group(tier, &mut Vec::new(), group, &mut tree),
                _ => self.violation(
                    format!("tokens.{key}"),
                    ViolationKind::WrongType { expected: "an object" },
                ),
            }
        }
        for required in [Tier::Atomic, Tier::Semantic] {
            if !tokens.contains_key(required.as_str()) {
                self.violation(format!("tokens.{required}"), ViolationKind::MissingField);
            }
        }
        tree
    }

    fn group(
        &mut self,
        tier: Tier,
        prefix: &mut Vec<String>,
        group: &Map<String, Value>,
        tree: &mut TokenTree,
    ) {
        for (key, value) in group {
            prefix.push(key.clone());
            let path = token_path(tier, prefix);
            if key.is_empty()
                || !key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                self.violation(path, ViolationKind::InvalidKey(key.clone()));
                prefix.pop();
                continue;
            }

            if let Value::Object(inner) = value
                && (tier != Tier::Atomic || !is_color_object(inner))
            {
                self.group(tier, prefix, inner, tree);
                prefix.pop();
                continue;
            }

            let leaf = match tier {
                Tier::Atomic => self.atomic_leaf(&path, prefix, value),
                Tier::Recipes => self.recipe_leaf(path, value),
                Tier::Semantic | Tier::Component => self.alias_leaf(path, value),
            };
            let reference = TokenRef::new(tier, prefix.clone());
            match leaf {
                Some(value) => tree.insert(&reference, value),
                None => {
                    self.rejected.insert(reference);
                }
            }
            prefix.pop();
        }
    }

    fn alias_leaf(&mut self, path: String, value: &Value) -> Option<TokenValue> {
        match value {
            Value::String(s) => match TokenRef::parse(s) {
                Ok(target) => Some(TokenValue::Alias(target)),
                Err(err) => {
                    self.violation(path, ViolationKind::InvalidReference(err));
                    None
                }
            },
            _ => {
                self.violation(path, ViolationKind::NotAnAlias);
                None
            }
        }
    }

    /// Recipe leaves are either references or class lists kept as text.
    fn recipe_leaf(&mut self, path: String, value: &Value) -> Option<TokenValue> {
        match value {
            Value::String(s) => Some(match TokenRef::parse(s) {
                Ok(target) => TokenValue::Alias(target),
                Err(_) => TokenValue::Text(s.clone()),
            }),
            _ => {
                self.violation(
                    path,
                    ViolationKind::WrongType {
                        expected: "a reference or a class list",
                    },
                );
                None
            }
        }
    }

    /// Converts an atomic JSON value to a token value of the shape its
    /// category expects. Ranges are checked later on the typed value.
    fn atomic_leaf(&mut self, path: &str, prefix: &[String], value: &Value) -> Option<TokenValue> {
        let expected = Expected::for_atomic(prefix);
        if let Value::String(s) = value
            && let Ok(target) = TokenRef::parse(s)
        {
            return Some(TokenValue::Alias(target));
        }

        let converted = match (expected, value) {
            (Expected::Color, Value::Object(obj)) => color(obj),
            (Expected::Length | Expected::NumberOrLength, Value::String(s)) => {
                match s.parse::<Dimension>() {
                    Ok(d) => Some(TokenValue::Dimension(d)),
                    Err(err) => {
                        self.violation(path, ViolationKind::InvalidLength(err));
                        return None;
                    }
                }
            }
            (Expected::Length, Value::Number(n)) if n.as_f64() == Some(0.0) => {
                Some(TokenValue::Dimension(Dimension::zero()))
            }
            (Expected::Text | Expected::Any, Value::String(s)) => Some(TokenValue::Text(s.clone())),
            (Expected::Number { .. } | Expected::NumberOrLength | Expected::Any, Value::Number(n)) => {
                n.as_f64().map(TokenValue::Number)
            }
            _ => None,
        };
        if converted.is_none() {
            self.violation(
                path,
                ViolationKind::WrongType {
                    expected: expected.describe(),
                },
            );
        }
        converted
    }

    fn contrast_pairs(&mut self, root: &Map<String, Value>) -> Vec<ContrastPair> {
        let pairs = match root.get("contrastPairs") {
            None => return Vec::new(),
            Some(Value::Array(pairs)) => pairs,
            Some(_) => {
                self.violation("contrastPairs", ViolationKind::WrongType { expected: "an array" });
                return Vec::new();
            }
        };

        let mut out = Vec::with_capacity(pairs.len());
        for (index, pair) in pairs.iter().enumerate() {
            let Value::Object(pair) = pair else {
                self.violation(
                    format!("contrastPairs[{index}]"),
                    ViolationKind::WrongType {
                        expected: "an object {foreground, background}",
                    },
                );
                continue;
            };
            let foreground = self.pair_side(pair, index, "foreground");
            let background = self.pair_side(pair, index, "background");
            if let (Some(foreground), Some(background)) = (foreground, background) {
                out.push(ContrastPair {
                    foreground,
                    background,
                });
            }
        }
        out
    }

    fn pair_side(&mut self, pair: &Map<String, Value>, index: usize, side: &str) -> Option<TokenRef> {
        let path = format!("contrastPairs[{index}].{side}");
        match pair.get(side) {
            Some(Value::String(s)) => match TokenRef::parse(s) {
                Ok(reference) => Some(reference),
                Err(err) => {
                    self.violation(path, ViolationKind::InvalidReference(err));
                    None
                }
            },
            Some(_) => {
                self.violation(path, ViolationKind::WrongType { expected: "a reference string" });
                None
            }
            None => {
                self.violation(path, ViolationKind::MissingField);
                None
            }
        }
    }
}

pub(crate) fn token_path(tier: Tier, path: &[String]) -> String {
    let mut out = format!("tokens.{tier}");
    for segment in path {
        out.push('.');
        out.push_str(segment);
    }
    out
}

fn is_color_object(obj: &Map<String, Value>) -> bool {
    ["l", "c", "h"].iter().any(|k| obj.contains_key(*k))
}

fn color(obj: &Map<String, Value>) -> Option<TokenValue> {
    let channel = |k: &str| obj.get(k).and_then(Value::as_f64);
    if obj.len() != 3 {
        return None;
    }
    Some(TokenValue::Color(Oklch::new(
        channel("l")?,
        channel("c")?,
        channel("h")?,
    )))
}

/// Builds a theme from a JSON document, recording shape problems. Header
/// values that are missing or malformed are left empty for later checks to
/// skip.
pub(crate) fn parse(candidate: &Value) -> Parsed {
    let mut parser = Parser {
        violations: Vec::new(),
        rejected: BTreeSet::new(),
    };

    let empty = Map::new();
    let root = match candidate {
        Value::Object(root) => root,
        _ => {
            parser.violation("$", ViolationKind::WrongType { expected: "an object" });
            &empty
        }
    };

    let id = parser.required_str(root, "id");
    let name = parser.required_str(root, "name");
    let description = match root.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            parser.violation("description", ViolationKind::WrongType { expected: "a string" });
            None
        }
    };
    let brand_tone = parser.brand_tone(root);
    let schema_version = parser.required_str(root, "schemaVersion");
    let tokens = parser.tokens(root);
    let contrast_pairs = parser.contrast_pairs(root);

    Parsed {
        theme: Theme {
            id,
            name,
            description,
            brand_tone,
            schema_version,
            tokens,
            contrast_pairs,
        },
        violations: parser.violations,
        rejected: parser.rejected,
    }
}
