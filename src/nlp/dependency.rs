// Typed dependency triples and the Stanford `rel(gov-i, dep-j)` text format.
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

static TRIPLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z][\w:]*)\(\s*(.+?)-(\d+)'*\s*,\s*(.+?)-(\d+)'*\s*\)").unwrap()
});

/// One end of a dependency relation. `index` is the 0-based token position
/// when the parser reports it (`ROOT-0` has none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub text: String,
    #[serde(default)]
    pub index: Option<usize>,
}

impl Endpoint {
    pub fn text(text: &str) -> Self {
        Endpoint {
            text: text.to_string(),
            index: None,
        }
    }

    pub fn at(text: &str, index: usize) -> Self {
        Endpoint {
            text: text.to_string(),
            index: Some(index),
        }
    }

    // Stanford indices are 1-based; 0 is the artificial root
    fn from_stanford(text: &str, index: &str) -> Option<Self> {
        let n: usize = index.parse().ok()?;
        Some(Endpoint {
            text: text.trim().to_string(),
            index: n.checked_sub(1),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTriple {
    pub relation: String,
    pub governor: Endpoint,
    pub dependent: Endpoint,
}

impl DependencyTriple {
    pub fn new(relation: &str, governor: Endpoint, dependent: Endpoint) -> Self {
        DependencyTriple {
            relation: relation.to_string(),
            governor,
            dependent,
        }
    }

    /// Text-only triple, as a parser without token indices would produce.
    pub fn between(relation: &str, governor: &str, dependent: &str) -> Self {
        Self::new(relation, Endpoint::text(governor), Endpoint::text(dependent))
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let governor = Endpoint::from_stanford(&caps[2], &caps[3])?;
        let dependent = Endpoint::from_stanford(&caps[4], &caps[5])?;
        Some(DependencyTriple::new(&caps[1], governor, dependent))
    }
}

impl FromStr for DependencyTriple {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        TRIPLE_PATTERN
            .captures(trimmed)
            .filter(|caps| caps.get(0).is_some_and(|m| m.as_str().len() == trimmed.len()))
            .and_then(|caps| DependencyTriple::from_captures(&caps))
            .ok_or_else(|| ExtractError::Dependency(s.to_string()))
    }
}

/// Parses a whole listing such as `[det(battery-2, the-1), nsubj(good-4, battery-2)]`.
pub fn parse_typed_dependencies(listing: &str) -> Result<Vec<DependencyTriple>> {
    let body = listing
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let triples: Vec<DependencyTriple> = TRIPLE_PATTERN
        .captures_iter(body)
        .filter_map(|caps| DependencyTriple::from_captures(&caps))
        .collect();
    if triples.is_empty() {
        return Err(ExtractError::Dependency(listing.to_string()));
    }
    Ok(triples)
}

/// Relation families the rules traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationSet {
    /// amod, nsubj, dobj
    Core,
    /// any relation containing `conj`
    Coordination,
    /// core plus `dep`
    Extended,
}

const CORE_RELATIONS: [&str; 3] = ["amod", "nsubj", "dobj"];

impl RelationSet {
    pub fn admits(self, relation: &str) -> bool {
        let core = || CORE_RELATIONS.iter().any(|r| r.eq_ignore_ascii_case(relation));
        match self {
            RelationSet::Core => core(),
            RelationSet::Coordination => relation.to_ascii_lowercase().contains("conj"),
            RelationSet::Extended => core() || relation.eq_ignore_ascii_case("dep"),
        }
    }
}
