use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four tiers of a token tree, from raw values to composed recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Atomic,
    Semantic,
    Component,
    Recipes,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Atomic, Tier::Semantic, Tier::Component, Tier::Recipes];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Semantic => "semantic",
            Self::Component => "component",
            Self::Recipes => "recipes",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| RefParseError::UnknownTier(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefParseError {
    #[error("empty token reference")]
    Empty,
    #[error("unknown tier `{0}`")]
    UnknownTier(String),
    #[error("reference `{0}` names a tier but no path")]
    MissingPath(String),
    #[error("reference `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("reference `{reference}` contains invalid character `{character}`")]
    InvalidCharacter { reference: String, character: char },
}

/// A parsed pointer into a theme's token tree, e.g.
/// `semantic.color.background.base`.
///
/// Ordering is by tier and then path, which keeps maps keyed by references
/// (and the CSS emitted from them) stable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenRef {
    pub tier: Tier,
    pub path: Vec<String>,
}

impl TokenRef {
    pub fn new<I, S>(tier: Tier, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tier,
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, RefParseError> {
        if s.is_empty() {
            return Err(RefParseError::Empty);
        }
        let mut parts = s.split('.');
        let tier_part = parts.next().unwrap_or_default();
        let tier: Tier = tier_part.parse()?;

        let mut path = Vec::new();
        for segment in parts {
            if segment.is_empty() {
                return Err(RefParseError::EmptySegment(s.to_string()));
            }
            if let Some(character) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(RefParseError::InvalidCharacter {
                    reference: s.to_string(),
                    character,
                });
            }
            path.push(segment.to_string());
        }
        if path.is_empty() {
            return Err(RefParseError::MissingPath(s.to_string()));
        }
        Ok(Self { tier, path })
    }

    /// Colour references are the ones whose path starts with `color`.
    pub fn is_color(&self) -> bool {
        self.path.first().is_some_and(|s| s == "color")
    }

    /// The CSS custom property carrying this token, `--tier-seg-seg`.
    pub fn css_variable(&self) -> String {
        let mut out = format!("--{}", self.tier);
        for segment in &self.path {
            out.push('-');
            out.push_str(segment);
        }
        out
    }

    /// The reference made of the tier and the first `len` path segments.
    pub fn prefix(&self, len: usize) -> TokenRef {
        TokenRef {
            tier: self.tier,
            path: self.path[..len.min(self.path.len())].to_vec(),
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tier)?;
        for segment in &self.path {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for TokenRef {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenRef {
    type Error = RefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenRef> for String {
    fn from(value: TokenRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let r = TokenRef::parse("semantic.color.background.base").unwrap();
        assert_eq!(r.tier, Tier::Semantic);
        assert_eq!(r.path, vec!["color", "background", "base"]);
        assert_eq!(r.to_string(), "semantic.color.background.base");
        assert!(r.is_color());
    }

    #[test]
    fn css_variable_name() {
        let r = TokenRef::new(Tier::Atomic, ["spacing", "4"]);
        assert_eq!(r.css_variable(), "--atomic-spacing-4");
        assert!(!r.is_color());
    }

    #[test]
    fn rejects_malformed_references() {
        assert_eq!(TokenRef::parse(""), Err(RefParseError::Empty));
        assert!(matches!(
            TokenRef::parse("theme.color.x"),
            Err(RefParseError::UnknownTier(_))
        ));
        assert!(matches!(
            TokenRef::parse("atomic"),
            Err(RefParseError::MissingPath(_))
        ));
        assert!(matches!(
            TokenRef::parse("atomic..spacing"),
            Err(RefParseError::EmptySegment(_))
        ));
        assert!(matches!(
            TokenRef::parse("atomic.spacing.4 "),
            Err(RefParseError::InvalidCharacter { character: ' ', .. })
        ));
    }

    #[test]
    fn orders_by_tier_then_path() {
        let a = TokenRef::parse("semantic.color.a").unwrap();
        let b = TokenRef::parse("atomic.spacing.4").unwrap();
        let c = TokenRef::parse("atomic.color.z").unwrap();
        let mut refs = vec![a.clone(), b.clone(), c.clone()];
        refs.sort();
        assert_eq!(refs, vec![c, b, a]);
    }

    #[test]
    fn serde_uses_dotted_string() {
        let r: TokenRef = serde_json::from_str("\"component.button.primary.background\"").unwrap();
        assert_eq!(r.tier, Tier::Component);
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            "\"component.button.primary.background\""
        );
        assert!(serde_json::from_str::<TokenRef>("\"nope\"").is_err());
    }
}
