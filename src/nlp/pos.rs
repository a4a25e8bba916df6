// Coarse part-of-speech classes over Penn Treebank tags.

const ADJECTIVE_TAGS: [&str; 3] = ["JJ", "JJR", "JJS"];
const NOUN_TAGS: [&str; 3] = ["NN", "NNS", "NNP"];

/// The only distinctions the propagation rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosClass {
    Adjective,
    Noun,
    Other,
}

impl PosClass {
    pub fn of(tag: &str) -> Self {
        if ADJECTIVE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            PosClass::Adjective
        } else if NOUN_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            PosClass::Noun
        } else {
            PosClass::Other
        }
    }
}

pub fn is_adjective(tag: &str) -> bool {
    PosClass::of(tag) == PosClass::Adjective
}

pub fn is_noun(tag: &str) -> bool {
    PosClass::of(tag) == PosClass::Noun
}

/// Reads the tag column out of tagger output such as `the_DT battery_NN`.
/// Tokens without an underscore carry no tag and are skipped.
pub fn parse_tagged(tagged: &str) -> Vec<String> {
    tagged
        .split_whitespace()
        .filter_map(|t| t.rsplit_once('_').map(|(_, tag)| tag.to_string()))
        .collect()
}
