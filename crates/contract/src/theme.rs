use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Dimension, Oklch};
use crate::reference::{Tier, TokenRef};

/// The only schema version theme documents may declare.
pub const SUPPORTED_SCHEMA_VERSION: &str = "2.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandTone {
    Professional,
    Playful,
    Elegant,
    Bold,
    Minimal,
    Calm,
    Dynamic,
    Premium,
    Warm,
}

impl BrandTone {
    pub const ALL: [BrandTone; 9] = [
        BrandTone::Professional,
        BrandTone::Playful,
        BrandTone::Elegant,
        BrandTone::Bold,
        BrandTone::Minimal,
        BrandTone::Calm,
        BrandTone::Dynamic,
        BrandTone::Premium,
        BrandTone::Warm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Playful => "playful",
            Self::Elegant => "elegant",
            Self::Bold => "bold",
            Self::Minimal => "minimal",
            Self::Calm => "calm",
            Self::Dynamic => "dynamic",
            Self::Premium => "premium",
            Self::Warm => "warm",
        }
    }
}

impl fmt::Display for BrandTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrandTone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| format!("unknown brand tone `{s}`"))
    }
}

/// A concrete or aliased token value.
///
/// Atomic leaves hold concrete values; every other tier holds aliases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Color(Oklch),
    Dimension(Dimension),
    Number(f64),
    Text(String),
    Alias(TokenRef),
}

impl TokenValue {
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }

    pub fn as_color(&self) -> Option<Oklch> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// CSS text for the value. Aliases become `var()` lookups of their target.
    pub fn to_css(&self) -> String {
        match self {
            Self::Color(c) => c.to_css(),
            Self::Dimension(d) => d.to_string(),
            Self::Number(n) => format!("{n}"),
            Self::Text(t) => t.clone(),
            Self::Alias(r) => format!("var({})", r.css_variable()),
        }
    }
}

pub type TokenGroup = BTreeMap<String, TokenNode>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenNode {
    Group(TokenGroup),
    Leaf(TokenValue),
}

/// Result of walking a reference's path through a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Leaf(&'a TokenValue),
    Group(&'a TokenGroup),
    /// The segment at this index of the path does not exist.
    Missing(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenTree {
    pub atomic: TokenGroup,
    pub semantic: TokenGroup,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component: TokenGroup,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub recipes: TokenGroup,
}

impl TokenTree {
    pub fn tier(&self, tier: Tier) -> &TokenGroup {
        match tier {
            Tier::Atomic => &self.atomic,
            Tier::Semantic => &self.semantic,
            Tier::Component => &self.component,
            Tier::Recipes => &self.recipes,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut TokenGroup {
        match tier {
            Tier::Atomic => &mut self.atomic,
            Tier::Semantic => &mut self.semantic,
            Tier::Component => &mut self.component,
            Tier::Recipes => &mut self.recipes,
        }
    }

    pub fn lookup(&self, reference: &TokenRef) -> Lookup<'_> {
        let mut group = self.tier(reference.tier);
        let last = reference.path.len().saturating_sub(1);
        for (index, segment) in reference.path.iter().enumerate() {
            match group.get(segment) {
                None => return Lookup::Missing(index),
                Some(TokenNode::Leaf(value)) if index == last => return Lookup::Leaf(value),
                // A leaf in the middle of the path means the rest is missing.
                Some(TokenNode::Leaf(_)) => return Lookup::Missing(index + 1),
                Some(TokenNode::Group(inner)) if index == last => return Lookup::Group(inner),
                Some(TokenNode::Group(inner)) => group = inner,
            }
        }
        Lookup::Group(group)
    }

    /// Every leaf in the tree with its full reference, in tier then path order.
    pub fn leaves(&self) -> Vec<(TokenRef, &TokenValue)> {
        fn walk<'a>(
            tier: Tier,
            prefix: &mut Vec<String>,
            group: &'a TokenGroup,
            out: &mut Vec<(TokenRef, &'a TokenValue)>,
        ) {
            for (key, node) in group {
                prefix.push(key.clone());
                match node {
                    TokenNode::Leaf(value) => out.push((TokenRef::new(tier, prefix.clone()), value)),
                    TokenNode::Group(inner) => walk(tier, prefix, inner, out),
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        for tier in Tier::ALL {
            walk(tier, &mut Vec::new(), self.tier(tier), &mut out);
        }
        out
    }

    /// Inserts a leaf, creating intermediate groups. A leaf standing where a
    /// group is needed is replaced.
    pub fn insert(&mut self, reference: &TokenRef, value: TokenValue) {
        let Some((last, parents)) = reference.path.split_last() else {
            return;
        };
        let mut group = self.tier_mut(reference.tier);
        for segment in parents {
            let node = group
                .entry(segment.clone())
                .or_insert_with(|| TokenNode::Group(TokenGroup::new()));
            if let TokenNode::Leaf(_) = node {
                *node = TokenNode::Group(TokenGroup::new());
            }
            group = match node {
                TokenNode::Group(inner) => inner,
                TokenNode::Leaf(_) => return,
            };
        }
        group.insert(last.clone(), TokenNode::Leaf(value));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastPair {
    pub foreground: TokenRef,
    pub background: TokenRef,
}

impl fmt::Display for ContrastPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.foreground, self.background)
    }
}

/// A validated theme. Built by the schema validator, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub brand_tone: BrandTone,
    pub schema_version: String,
    pub tokens: TokenTree,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contrast_pairs: Vec<ContrastPair>,
}

impl Theme {
    pub fn summary(&self) -> ThemeSummary {
        ThemeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            brand_tone: self.brand_tone,
            schema_version: self.schema_version.clone(),
        }
    }
}

/// What registry listings expose about a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub brand_tone: BrandTone,
    pub schema_version: String,
}
