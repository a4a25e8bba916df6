// Sentence segmentation and PTB-style tokenization using regex patterns.
// Sentences come back as space-joined token strings, the form the treebank is keyed by.
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:'\w+)*|'\w+|[^\s\w]").unwrap());

/// Splits one sentence into word and punctuation tokens.
/// `n't` is split off its stem and other clitics split at the apostrophe.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in TOKEN_PATTERN.find_iter(sentence) {
        let word = m.as_str();
        let split = word.len().saturating_sub(3);
        if split > 0 && word.is_char_boundary(split) && word[split..].eq_ignore_ascii_case("n't") {
            tokens.push(word[..split].to_string());
            tokens.push(word[split..].to_string());
        } else if let Some(idx) = word.find('\'').filter(|&i| i > 0) {
            tokens.push(word[..idx].to_string());
            tokens.push(word[idx..].to_string());
        } else {
            tokens.push(word.to_string());
        }
    }
    tokens
}

/// Splits text into sentences, each returned as its tokens joined by single spaces.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_PATTERN
        .find_iter(text)
        .map(|m| tokenize(m.as_str()))
        .filter(|tokens| !tokens.is_empty())
        .map(|tokens| tokens.join(" "))
        .collect()
}
