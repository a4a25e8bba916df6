// Noun-phrase construction for feature candidates.
use super::pos::{is_adjective, is_noun};

fn noun_at(tags: &[String], i: usize) -> bool {
    tags.get(i).is_some_and(|t| is_noun(t))
}

fn join_lowercase(words: &[&String]) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expands the noun at `pos` with the neighbouring noun on each side, if any.
/// Neighbours outside the sentence are simply left out.
pub fn expand_noun_phrase(tokens: &[String], tags: &[String], pos: usize) -> String {
    let mut words = Vec::with_capacity(3);
    if pos > 0 && noun_at(tags, pos - 1) {
        if let Some(left) = tokens.get(pos - 1) {
            words.push(left);
        }
    }
    if let Some(center) = tokens.get(pos) {
        words.push(center);
    }
    if noun_at(tags, pos + 1) {
        if let Some(right) = tokens.get(pos + 1) {
            words.push(right);
        }
    }
    join_lowercase(&words)
}

/// Adjective-noun adjacency: when `tokens[v]` is an adjective followed by a
/// noun, returns that noun extended by a second noun at `v + 2`.
/// Only indices with two tokens after them are considered.
pub fn adjacent_noun_phrase(tokens: &[String], tags: &[String], v: usize) -> Option<String> {
    if v + 2 >= tokens.len() || tags.len() != tokens.len() {
        return None;
    }
    if !is_adjective(&tags[v]) || !is_noun(&tags[v + 1]) {
        return None;
    }
    let mut words = vec![&tokens[v + 1]];
    if is_noun(&tags[v + 2]) {
        words.push(&tokens[v + 2]);
    }
    Some(join_lowercase(&words))
}
