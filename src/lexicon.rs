//! Opinion and feature lexicons plus the per-sentence staging batch.
//!
//! Both lexicons key on lowercase text. The opinion lexicon only grows and
//! never overwrites a polarity once set; the feature lexicon grows and counts
//! mentions.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::nlp::Polarity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpinionLexicon {
    words: HashMap<String, Polarity>,
}

impl OpinionLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every word with the given polarity, keeping earlier entries.
    /// Returns how many words were new.
    pub fn seed<I, S>(&mut self, words: I, polarity: Polarity) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter(|w| !w.as_ref().trim().is_empty())
            .filter(|w| self.insert(w.as_ref().trim(), polarity))
            .count()
    }

    /// Loads a seed list with one word per line.
    pub fn seed_from_file(&mut self, path: &Path, polarity: Polarity) -> Result<usize> {
        let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
        let mut words = Vec::new();
        for line in BufReader::new(file).lines() {
            words.push(line.map_err(|e| ExtractError::io(path, e))?);
        }
        let added = self.seed(words, polarity);
        debug!(path = %path.display(), added, %polarity, "loaded seed opinions");
        Ok(added)
    }

    /// First writer wins: returns false and leaves the entry untouched when
    /// the word is already known.
    pub fn insert(&mut self, word: &str, polarity: Polarity) -> bool {
        let key = word.to_lowercase();
        if self.words.contains_key(&key) {
            return false;
        }
        self.words.insert(key, polarity);
        true
    }

    pub fn polarity(&self, word: &str) -> Option<Polarity> {
        self.words
            .get(word)
            .or_else(|| self.words.get(&word.to_lowercase()))
            .copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.polarity(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Polarity)> {
        self.words.iter().map(|(w, p)| (w.as_str(), *p))
    }

    /// Entries ordered by word, for stable output.
    pub fn sorted(&self) -> Vec<(&str, Polarity)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureLexicon {
    counts: HashMap<String, u32>,
}

impl FeatureLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` mentions; returns true when the phrase was not known before.
    pub fn add(&mut self, phrase: &str, n: u32) -> bool {
        let key = phrase.to_lowercase();
        match self.counts.get_mut(&key) {
            Some(count) => {
                *count += n;
                false
            }
            None => {
                self.counts.insert(key, n);
                true
            }
        }
    }

    pub fn increment(&mut self, phrase: &str) -> bool {
        self.add(phrase, 1)
    }

    pub fn count(&self, phrase: &str) -> Option<u32> {
        self.counts
            .get(phrase)
            .or_else(|| self.counts.get(&phrase.to_lowercase()))
            .copied()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.count(phrase).is_some()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Writes collected by one rule group over one sentence. Merged into the
/// primary lexicons only after the group has finished scanning, so the
/// lexicons a rule iterates over never change mid-scan.
#[derive(Debug, Default)]
pub struct Staging {
    features: HashMap<String, u32>,
    opinions: Vec<(String, Polarity)>,
}

impl Staging {
    pub fn stage_feature(&mut self, phrase: &str) {
        *self.features.entry(phrase.to_lowercase()).or_insert(0) += 1;
    }

    /// The first polarity staged for a word is the one kept.
    pub fn stage_opinion(&mut self, word: &str, polarity: Polarity) {
        let key = word.to_lowercase();
        if !self.opinions.iter().any(|(w, _)| *w == key) {
            self.opinions.push((key, polarity));
        }
    }

    /// Returns true when any key was new to the primary lexicons.
    pub fn merge_into(self, opinions: &mut OpinionLexicon, features: &mut FeatureLexicon) -> bool {
        let mut grew = false;
        for (phrase, n) in self.features {
            if features.add(&phrase, n) {
                debug!(%phrase, "new feature");
                grew = true;
            }
        }
        for (word, polarity) in self.opinions {
            if opinions.insert(&word, polarity) {
                debug!(%word, %polarity, "new opinion word");
                grew = true;
            }
        }
        grew
    }
}
