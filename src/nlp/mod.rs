// Token-level NLP helpers for aspect-miner
pub mod dependency;
pub mod phrase;
pub mod pos;
pub mod preprocess;
pub mod segment;
pub mod sentiment;

pub use dependency::{DependencyTriple, Endpoint, RelationSet};
pub use phrase::{adjacent_noun_phrase, expand_noun_phrase};
pub use pos::PosClass;
pub use preprocess::normalize_review_text;
pub use segment::{split_sentences, tokenize};
pub use sentiment::{negation_multiplier, Polarity};

/// Case-insensitive token comparison used for every word match.
pub fn same_word(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
