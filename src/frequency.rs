//! Post-convergence pass: adjective-noun adjacency mining, feature frequency
//! counting and the final feature filter.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::info;

use crate::annotation::Annotation;
use crate::config::ExtractionConfig;
use crate::controller::spinner;
use crate::corpus::ReviewSource;
use crate::error::Result;
use crate::lexicon::FeatureLexicon;
use crate::nlp::{adjacent_noun_phrase, negation_multiplier, same_word};
use crate::propagation::LexiconState;
use crate::provider::{annotate_review, AnnotatedSentence, AnnotationProvider};

/// Occurrence counts gathered after convergence. Kept apart from the
/// feature lexicon's discovery counts.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    pub fn add(&mut self, phrase: &str, n: u32) {
        *self.counts.entry(phrase.to_string()).or_insert(0) += n;
    }

    pub fn count(&self, phrase: &str) -> Option<u32> {
        self.counts.get(phrase).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.counts.iter().map(|(p, c)| (p.as_str(), *c)).collect();
        entries.sort();
        entries
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyCounter {
    negation_window: usize,
    min_frequency: u32,
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl FrequencyCounter {
    pub fn new(negation_window: usize, min_frequency: u32) -> Self {
        FrequencyCounter {
            negation_window,
            min_frequency,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.negation_window, config.min_frequency)
    }

    /// Adds every adjective + noun (+ noun) phrase of the sentence as a
    /// feature and annotates it. Returns the number of phrases mined.
    pub fn mine_adjacent(&self, sentence: &AnnotatedSentence, review: usize, state: &mut LexiconState) -> usize {
        let mut mined = 0;
        for v in 0..sentence.len() {
            let Some(phrase) = adjacent_noun_phrase(&sentence.tokens, &sentence.tags, v) else {
                continue;
            };
            let base = state
                .opinions
                .polarity(&sentence.tokens[v])
                .map(|p| p.value())
                .unwrap_or(0);
            let polarity = base * negation_multiplier(&sentence.tokens, v, self.negation_window);
            state.annotations.insert(Annotation::new(review, phrase.as_str(), polarity));
            state.features.increment(&phrase);
            mined += 1;
        }
        mined
    }

    /// Occurrences of each known feature in one sentence. Multi-word phrases
    /// count once if the sentence contains them; single words count per token.
    pub fn count_sentence(&self, sentence: &AnnotatedSentence, features: &FeatureLexicon) -> Vec<(String, u32)> {
        let lowered = sentence.text.to_lowercase();
        let phrases: Vec<&str> = features.phrases().collect();
        phrases
            .par_iter()
            .map(|phrase| {
                let n = if phrase.contains(' ') {
                    u32::from(lowered.contains(*phrase))
                } else {
                    sentence.tokens.iter().filter(|t| same_word(t, phrase)).count() as u32
                };
                (phrase.to_string(), n)
            })
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Mines and counts sentence by sentence, so a phrase mined late in the
    /// corpus is not counted in earlier sentences.
    pub fn run<S, P>(
        &self,
        corpus: &S,
        provider: &P,
        state: &mut LexiconState,
        show_progress: bool,
    ) -> Result<FrequencyTable>
    where
        S: ReviewSource + ?Sized,
        P: AnnotationProvider + ?Sized,
    {
        let pb = spinner(show_progress, "counting features");
        let mut table = FrequencyTable::default();
        let mut mined = 0;
        for review in corpus.reviews()? {
            let review = review?;
            for sentence in annotate_review(provider, &review)? {
                mined += self.mine_adjacent(&sentence, review.index, state);
                for (phrase, n) in self.count_sentence(&sentence, &state.features) {
                    table.add(&phrase, n);
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        info!(mined, counted = table.len(), "frequency pass finished");
        Ok(table)
    }

    /// Counted phrases free of sentence punctuation and at or above the
    /// frequency floor, sorted.
    pub fn final_features(&self, table: &FrequencyTable) -> Vec<String> {
        table
            .sorted()
            .into_iter()
            .filter(|(phrase, count)| !phrase.contains(&['.', '?', '!'][..]) && *count >= self.min_frequency)
            .map(|(phrase, _)| phrase.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Review;
    use crate::lexicon::OpinionLexicon;
    use crate::nlp::Polarity;
    use crate::provider::TreebankProvider;

    fn tagged(text: &str, tags: &str) -> AnnotatedSentence {
        AnnotatedSentence::new(
            text.split(' ').map(String::from).collect(),
            tags.split(' ').map(String::from).collect(),
            Vec::new(),
        )
    }

    fn with_opinion(word: &str, polarity: Polarity) -> LexiconState {
        let mut opinions = OpinionLexicon::new();
        opinions.insert(word, polarity);
        LexiconState::new(opinions)
    }

    #[test]
    fn test_mine_adjacent_two_nouns() {
        let counter = FrequencyCounter::default();
        let mut state = with_opinion("great", Polarity::Positive);
        let s = tagged("great battery life here .", "JJ NN NN RB .");
        assert_eq!(counter.mine_adjacent(&s, 7, &mut state), 1);
        assert_eq!(state.features.count("battery life"), Some(1));
        assert!(state.annotations.contains(&Annotation::new(7, "battery life", 1)));
    }

    #[test]
    fn test_mine_adjacent_unknown_adjective_and_negation() {
        let counter = FrequencyCounter::default();
        let mut state = with_opinion("loud", Polarity::Positive);
        let s = tagged("not loud speaker at all , shiny case here", "RB JJ NN IN DT , JJ NN RB");
        assert_eq!(counter.mine_adjacent(&s, 2, &mut state), 2);
        assert!(state.annotations.contains(&Annotation::new(2, "speaker", -1)));
        // `shiny` is not an opinion word
        assert!(state.annotations.contains(&Annotation::new(2, "case", 0)));
    }

    #[test]
    fn test_mine_adjacent_skips_sentence_tail() {
        let counter = FrequencyCounter::default();
        let mut state = LexiconState::default();
        let s = tagged("a sharp lens", "DT JJ NN");
        assert_eq!(counter.mine_adjacent(&s, 1, &mut state), 0);
        assert!(state.features.is_empty());
    }

    #[test]
    fn test_count_sentence() {
        let counter = FrequencyCounter::default();
        let mut features = FeatureLexicon::new();
        features.increment("battery life");
        features.increment("battery");
        features.increment("screen");
        let s = tagged(
            "the battery life is long and the Battery is fine",
            "DT NN NN VBZ JJ CC DT NN VBZ JJ",
        );
        let mut counts = counter.count_sentence(&s, &features);
        counts.sort();
        assert_eq!(counts, vec![("battery".to_string(), 2), ("battery life".to_string(), 1)]);
    }

    #[test]
    fn test_final_features_filter() {
        let mut table = FrequencyTable::default();
        table.add("screen", 1);
        table.add("battery", 3);
        table.add("end.", 4);
        table.add("why?", 4);
        assert_eq!(FrequencyCounter::default().final_features(&table), vec!["battery", "screen"]);
        assert_eq!(FrequencyCounter::new(2, 2).final_features(&table), vec!["battery"]);
    }

    #[test]
    fn test_run_interleaves_mining_and_counting() -> anyhow::Result<()> {
        let provider = TreebankProvider::from_sentences(vec![
            tagged("the zoom works .", "DT NN VBZ ."),
            tagged("fast zoom lens here .", "JJ NN NN RB ."),
        ]);
        let reviews = vec![
            Review::parse("1,4.0,the zoom works.", 1)?,
            Review::parse("2,4.0,fast zoom lens here.", 2)?,
        ];
        let mut state = with_opinion("fast", Polarity::Positive);
        let table = FrequencyCounter::default().run(&reviews, &provider, &mut state, false)?;
        // mined in review 2, so not counted in review 1
        assert_eq!(table.count("zoom lens"), Some(1));
        assert_eq!(table.count("zoom"), None);
        assert!(state.annotations.contains(&Annotation::new(2, "zoom lens", 1)));
        Ok(())
    }
}
