//! Boundary to the external tagger/parser.
//!
//! The propagation core only sees `AnnotatedSentence` values. Segmentation,
//! tokenization, tagging and parsing happen behind `AnnotationProvider`;
//! `TreebankProvider` replays pre-computed annotations from a JSON file.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::corpus::Review;
use crate::error::{ExtractError, Result};
use crate::nlp::pos::{parse_tagged, PosClass};
use crate::nlp::dependency::parse_typed_dependencies;
use crate::nlp::{normalize_review_text, split_sentences, DependencyTriple};

/// Tokens, parallel POS tags and dependency triples of one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub text: String,
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
    pub dependencies: Vec<DependencyTriple>,
}

impl AnnotatedSentence {
    pub fn new(tokens: Vec<String>, tags: Vec<String>, dependencies: Vec<DependencyTriple>) -> Self {
        AnnotatedSentence {
            text: tokens.join(" "),
            tokens,
            tags,
            dependencies,
        }
    }

    /// A sentence the rules can run on: one tag per token.
    pub fn is_well_formed(&self) -> bool {
        self.tokens.len() == self.tags.len()
    }

    pub fn pos_class(&self, i: usize) -> PosClass {
        self.tags
            .get(i)
            .map(|t| PosClass::of(t))
            .unwrap_or(PosClass::Other)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub trait AnnotationProvider {
    /// Splits preprocessed review text into sentences.
    fn sentences(&self, text: &str) -> Result<Vec<String>>;

    /// Tags and parses one sentence.
    fn annotate(&self, sentence: &str) -> Result<AnnotatedSentence>;
}

/// Preprocesses a review and annotates each of its sentences.
pub fn annotate_review<P: AnnotationProvider + ?Sized>(
    provider: &P,
    review: &Review,
) -> Result<Vec<AnnotatedSentence>> {
    let text = normalize_review_text(&review.text);
    provider
        .sentences(&text)?
        .iter()
        .map(|s| provider.annotate(s))
        .collect()
}

#[derive(Debug, Deserialize)]
struct TreebankFile {
    sentences: Vec<TreebankRecord>,
}

/// Either one triple per entry or the parser's whole `[rel(a-1, b-2), ...]` listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependencyField {
    Listing(String),
    Entries(Vec<String>),
}

impl Default for DependencyField {
    fn default() -> Self {
        DependencyField::Entries(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct TreebankRecord {
    tokens: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    tagged: Option<String>,
    #[serde(default)]
    dependencies: DependencyField,
}

impl TreebankRecord {
    fn into_sentence(self, entry: usize) -> Result<AnnotatedSentence> {
        if self.tokens.is_empty() {
            return Err(ExtractError::Provider(format!("treebank entry {} has no tokens", entry)));
        }
        let tags = match self.tagged {
            Some(tagged) if self.tags.is_empty() => parse_tagged(&tagged),
            _ => self.tags,
        };
        let dependencies = match self.dependencies {
            DependencyField::Listing(listing) => parse_typed_dependencies(&listing)?,
            DependencyField::Entries(entries) => entries
                .iter()
                .map(|d| d.parse::<DependencyTriple>())
                .collect::<Result<Vec<_>>>()?,
        };
        let len = self.tokens.len();
        for triple in &dependencies {
            let past_end = [&triple.governor, &triple.dependent]
                .iter()
                .any(|e| e.index.is_some_and(|i| i >= len));
            if past_end {
                return Err(ExtractError::Provider(format!(
                    "treebank entry {}: `{}` points past its {} tokens",
                    entry, triple.relation, len
                )));
            }
        }
        Ok(AnnotatedSentence::new(self.tokens, tags, dependencies))
    }
}

fn sentence_key(text: &str) -> String {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replays tagger/parser output stored as JSON, keyed by sentence text.
#[derive(Debug, Clone, Default)]
pub struct TreebankProvider {
    entries: HashMap<String, AnnotatedSentence>,
}

impl TreebankProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
        let parsed: TreebankFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| ExtractError::json(path, e))?;
        let sentences = parsed
            .sentences
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_sentence(i + 1))
            .collect::<Result<Vec<_>>>()?;
        let provider = Self::from_sentences(sentences);
        debug!(path = %path.display(), sentences = provider.len(), "loaded treebank");
        Ok(provider)
    }

    pub fn from_sentences<I: IntoIterator<Item = AnnotatedSentence>>(sentences: I) -> Self {
        let mut entries = HashMap::new();
        for sentence in sentences {
            if !sentence.is_well_formed() {
                warn!(sentence = %sentence.text, "treebank entry has mismatched tags; no rule will fire on it");
            }
            entries.insert(sentence_key(&sentence.text), sentence);
        }
        TreebankProvider { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnnotationProvider for TreebankProvider {
    fn sentences(&self, text: &str) -> Result<Vec<String>> {
        Ok(split_sentences(text))
    }

    fn annotate(&self, sentence: &str) -> Result<AnnotatedSentence> {
        match self.entries.get(&sentence_key(sentence)) {
            Some(found) => Ok(found.clone()),
            None => {
                debug!(%sentence, "sentence not in treebank");
                let tokens = sentence.split_whitespace().map(String::from).collect();
                Ok(AnnotatedSentence {
                    text: sentence.to_string(),
                    tokens,
                    tags: Vec::new(),
                    dependencies: Vec::new(),
                })
            }
        }
    }
}
