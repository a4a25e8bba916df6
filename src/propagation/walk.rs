//! Bounded walk over a sentence's dependency triples.
//!
//! Nodes are reached hop by hop in both directions of each admitted triple.
//! A node already visited on an earlier layer (the anchor included) is never
//! revisited, so a two-hop walk cannot bounce back to where it started.
//! Revisits are recognized by token position whenever both nodes carry one,
//! under either policy; a repeated word elsewhere in the sentence is a
//! different node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::nlp::{same_word, DependencyTriple, Endpoint, RelationSet};

/// How a walk node is matched against triple endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Case-insensitive surface text. Repeated words in one sentence are
    /// indistinguishable.
    #[default]
    ByText,
    /// Token positions when the parser supplied them, text otherwise.
    ByPosition,
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "by-text" | "text" => Ok(MatchPolicy::ByText),
            "by-position" | "position" => Ok(MatchPolicy::ByPosition),
            other => Err(format!("unknown match policy `{}` (expected by-text or by-position)", other)),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::ByText => f.write_str("by-text"),
            MatchPolicy::ByPosition => f.write_str("by-position"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub text: String,
    pub position: Option<usize>,
}

impl Node {
    pub fn at(text: &str, position: usize) -> Self {
        Node {
            text: text.to_string(),
            position: Some(position),
        }
    }

    fn from_endpoint(endpoint: &Endpoint) -> Self {
        Node {
            text: endpoint.text.clone(),
            position: endpoint.index,
        }
    }
}

impl MatchPolicy {
    fn identify(self, a_text: &str, a_pos: Option<usize>, b_text: &str, b_pos: Option<usize>) -> bool {
        match (self, a_pos, b_pos) {
            (MatchPolicy::ByPosition, Some(a), Some(b)) => a == b,
            _ => same_word(a_text, b_text),
        }
    }

    pub fn touches(self, node: &Node, endpoint: &Endpoint) -> bool {
        self.identify(&node.text, node.position, &endpoint.text, endpoint.index)
    }

    pub fn same(self, a: &Node, b: &Node) -> bool {
        self.identify(&a.text, a.position, &b.text, b.position)
    }

    fn revisits(visited: &Node, candidate: &Node) -> bool {
        MatchPolicy::ByPosition.same(visited, candidate)
    }

    /// Sentence positions a node stands for.
    pub fn resolve(self, node: &Node, tokens: &[String]) -> Vec<usize> {
        match (self, node.position) {
            (MatchPolicy::ByPosition, Some(p)) if p < tokens.len() => vec![p],
            _ => tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| same_word(t, &node.text))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

/// Nodes reached from `anchor` after exactly `hops` hops over triples whose
/// relation is admitted by `relations`. Intermediate layers are deduplicated;
/// the final layer keeps one entry per traversed triple.
pub fn reach(
    anchor: Node,
    triples: &[DependencyTriple],
    relations: RelationSet,
    hops: usize,
    policy: MatchPolicy,
) -> Vec<Node> {
    if hops == 0 {
        return vec![anchor];
    }

    let mut visited = vec![anchor.clone()];
    let mut frontier = vec![anchor];
    for hop in 1..=hops {
        let mut next: Vec<Node> = Vec::new();
        for node in &frontier {
            for triple in triples.iter().filter(|t| relations.admits(&t.relation)) {
                let mut candidates = Vec::with_capacity(2);
                if policy.touches(node, &triple.governor) {
                    candidates.push(Node::from_endpoint(&triple.dependent));
                }
                if policy.touches(node, &triple.dependent) {
                    candidates.push(Node::from_endpoint(&triple.governor));
                }
                next.extend(
                    candidates
                        .into_iter()
                        .filter(|c| !visited.iter().any(|v| MatchPolicy::revisits(v, c))),
                );
            }
        }
        if hop == hops {
            return next;
        }
        frontier = Vec::new();
        for node in next {
            if !frontier.iter().any(|f| policy.same(f, &node)) {
                frontier.push(node);
            }
        }
        visited.extend(frontier.iter().cloned());
        if frontier.is_empty() {
            break;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.text.as_str()).collect()
    }

    fn chain() -> Vec<DependencyTriple> {
        vec![
            DependencyTriple::between("amod", "camera", "great"),
            DependencyTriple::between("dobj", "love", "camera"),
            DependencyTriple::between("nsubj", "love", "i"),
            DependencyTriple::between("det", "camera", "the"),
        ]
    }

    #[test]
    fn test_one_hop_both_directions() {
        let reached = reach(
            Node::at("camera", 3),
            &chain(),
            RelationSet::Core,
            1,
            MatchPolicy::ByText,
        );
        assert_eq!(texts(&reached), vec!["great", "love"]);
    }

    #[test]
    fn test_two_hops_never_return_to_anchor() {
        let reached = reach(
            Node::at("great", 2),
            &chain(),
            RelationSet::Core,
            2,
            MatchPolicy::ByText,
        );
        assert_eq!(texts(&reached), vec!["love"]);
    }

    #[test]
    fn test_relation_filter() {
        let reached = reach(
            Node::at("camera", 3),
            &chain(),
            RelationSet::Coordination,
            1,
            MatchPolicy::ByText,
        );
        assert!(reached.is_empty());
    }

    #[test]
    fn test_three_hops() {
        let reached = reach(
            Node::at("great", 2),
            &chain(),
            RelationSet::Core,
            3,
            MatchPolicy::ByText,
        );
        assert_eq!(texts(&reached), vec!["i"]);
    }

    #[test]
    fn test_dead_end_returns_empty() {
        let reached = reach(
            Node::at("the", 0),
            &chain(),
            RelationSet::Core,
            2,
            MatchPolicy::ByText,
        );
        assert!(reached.is_empty());
    }

    #[test]
    fn test_text_match_is_case_insensitive() {
        let triples = vec![DependencyTriple::between("amod", "Camera", "GREAT")];
        let reached = reach(Node::at("great", 0), &triples, RelationSet::Core, 1, MatchPolicy::ByText);
        assert_eq!(texts(&reached), vec!["Camera"]);
    }

    #[test]
    fn test_repeated_word_is_not_the_anchor() {
        // "the light is light": noun at 1, adjective at 3
        let triples = vec![DependencyTriple::new(
            "nsubj",
            Endpoint::at("light", 3),
            Endpoint::at("light", 1),
        )];
        for policy in [MatchPolicy::ByText, MatchPolicy::ByPosition] {
            let reached = reach(Node::at("light", 3), &triples, RelationSet::Core, 1, policy);
            assert_eq!(reached, vec![Node::at("light", 1)], "{}", policy);
        }
    }

    #[test]
    fn test_by_text_crosses_repeated_anchor_words() {
        // "good screen , good battery"
        let triples = vec![
            DependencyTriple::new("amod", Endpoint::at("screen", 1), Endpoint::at("good", 0)),
            DependencyTriple::new("amod", Endpoint::at("battery", 4), Endpoint::at("good", 3)),
        ];
        let by_text = reach(Node::at("good", 0), &triples, RelationSet::Core, 1, MatchPolicy::ByText);
        assert_eq!(texts(&by_text), vec!["screen", "battery"]);
        let by_position = reach(Node::at("good", 0), &triples, RelationSet::Core, 1, MatchPolicy::ByPosition);
        assert_eq!(texts(&by_position), vec!["screen"]);
    }

    #[test]
    fn test_resolve_positions() {
        let tokens: Vec<String> = "the light is light".split(' ').map(String::from).collect();
        let node = Node::at("Light", 1);
        assert_eq!(MatchPolicy::ByText.resolve(&node, &tokens), vec![1, 3]);
        assert_eq!(MatchPolicy::ByPosition.resolve(&node, &tokens), vec![1]);
        let unindexed = Node {
            text: "light".into(),
            position: None,
        };
        assert_eq!(MatchPolicy::ByPosition.resolve(&unindexed, &tokens), vec![1, 3]);
    }

    #[test]
    fn test_match_policy_from_str() {
        assert_eq!("by-position".parse::<MatchPolicy>(), Ok(MatchPolicy::ByPosition));
        assert_eq!("TEXT".parse::<MatchPolicy>(), Ok(MatchPolicy::ByText));
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
        assert_eq!(MatchPolicy::ByPosition.to_string(), "by-position");
    }
}
