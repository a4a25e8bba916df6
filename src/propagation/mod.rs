//! Double-propagation engine.
//!
//! Every rule in [`RULE_GROUPS`] is interpreted by the same traversal:
//! anchor match, dependency walk, destination POS gate, optional noun-phrase
//! expansion, staged lexicon write and optional annotation.

pub mod rules;
pub mod walk;

use serde::Serialize;
use tracing::trace;

use crate::annotation::{Annotation, AnnotationSet};
use crate::config::ExtractionConfig;
use crate::lexicon::{FeatureLexicon, OpinionLexicon, Staging};
use crate::nlp::sentiment::DEFAULT_NEGATION_WINDOW;
use crate::nlp::{expand_noun_phrase, negation_multiplier, Polarity, PosClass};
use crate::provider::AnnotatedSentence;

pub use rules::{GrowthFlag, LexiconKind, PolaritySource, Rule, RuleGroup, RULE_GROUPS};
pub use walk::{MatchPolicy, Node};

/// Everything the propagation and post-pass mutate.
#[derive(Debug, Clone, Default)]
pub struct LexiconState {
    pub opinions: OpinionLexicon,
    pub features: FeatureLexicon,
    pub annotations: AnnotationSet,
}

impl LexiconState {
    pub fn new(opinions: OpinionLexicon) -> Self {
        LexiconState {
            opinions,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewContext {
    pub index: usize,
    pub polarity: Polarity,
}

/// Which rule groups added a new lexicon key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Growth {
    flags: [bool; 6],
}

impl Growth {
    pub fn set(&mut self, flag: GrowthFlag) {
        self.flags[flag.index()] = true;
    }

    pub fn is_set(&self, flag: GrowthFlag) -> bool {
        self.flags[flag.index()]
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }

    pub fn absorb(&mut self, other: Growth) {
        for (mine, theirs) in self.flags.iter_mut().zip(other.flags) {
            *mine |= theirs;
        }
    }

    pub fn raised(&self) -> Vec<&'static str> {
        GrowthFlag::ALL
            .iter()
            .filter(|f| self.is_set(**f))
            .map(|f| f.name())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PropagationEngine {
    policy: MatchPolicy,
    negation_window: usize,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        PropagationEngine {
            policy: MatchPolicy::ByText,
            negation_window: DEFAULT_NEGATION_WINDOW,
        }
    }
}

impl PropagationEngine {
    pub fn new(policy: MatchPolicy, negation_window: usize) -> Self {
        PropagationEngine {
            policy,
            negation_window,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.match_policy, config.negation_window)
    }

    /// Runs all rule groups over one sentence, merging each group's staging
    /// batch before the next group starts.
    pub fn propagate(
        &self,
        sentence: &AnnotatedSentence,
        review: ReviewContext,
        state: &mut LexiconState,
    ) -> Growth {
        let mut growth = Growth::default();
        if !sentence.is_well_formed() || sentence.dependencies.is_empty() {
            return growth;
        }
        for group in RULE_GROUPS.iter() {
            let mut staging = Staging::default();
            for rule in group.rules {
                self.apply_rule(rule, sentence, review, state, &mut staging);
            }
            if staging.merge_into(&mut state.opinions, &mut state.features) {
                growth.set(group.flag);
            }
        }
        growth
    }

    pub fn apply_rule(
        &self,
        rule: &Rule,
        sentence: &AnnotatedSentence,
        review: ReviewContext,
        state: &mut LexiconState,
        staging: &mut Staging,
    ) {
        for anchor in 0..sentence.len() {
            if sentence.pos_class(anchor) != rule.source.pos() {
                continue;
            }
            let word = &sentence.tokens[anchor];
            let anchor_polarity = match rule.source {
                LexiconKind::Opinion => match state.opinions.polarity(word) {
                    Some(p) => Some(p),
                    None => continue,
                },
                LexiconKind::Feature if state.features.contains(word) => None,
                LexiconKind::Feature => continue,
            };
            let inherited = match rule.polarity {
                PolaritySource::Anchor => anchor_polarity,
                PolaritySource::Review => Some(review.polarity),
            };

            let targets = walk::reach(
                Node::at(word, anchor),
                &sentence.dependencies,
                rule.relations,
                rule.hops,
                self.policy,
            );
            for target in targets {
                match rule.destination {
                    LexiconKind::Feature => self.emit_features(
                        rule, sentence, anchor, &target, inherited, review, staging,
                        &mut state.annotations,
                    ),
                    LexiconKind::Opinion => self.emit_opinion(
                        rule, sentence, &target, inherited, review, staging,
                        &mut state.annotations,
                    ),
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_features(
        &self,
        rule: &Rule,
        sentence: &AnnotatedSentence,
        anchor: usize,
        target: &Node,
        inherited: Option<Polarity>,
        review: ReviewContext,
        staging: &mut Staging,
        annotations: &mut AnnotationSet,
    ) {
        for pos in self.policy.resolve(target, &sentence.tokens) {
            if sentence.pos_class(pos) != PosClass::Noun {
                continue;
            }
            let phrase = expand_noun_phrase(&sentence.tokens, &sentence.tags, pos);
            trace!(rule = rule.name, %phrase, "feature candidate");
            staging.stage_feature(&phrase);
            if let (true, Some(base)) = (rule.annotate, inherited) {
                let sign = if rule.negation {
                    negation_multiplier(&sentence.tokens, anchor, self.negation_window)
                } else {
                    1
                };
                annotations.insert(Annotation::new(review.index, phrase.as_str(), sign * base.value()));
            }
            // once expanded, the phrase no longer matches later occurrences
            if phrase.contains(' ') {
                break;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_opinion(
        &self,
        rule: &Rule,
        sentence: &AnnotatedSentence,
        target: &Node,
        inherited: Option<Polarity>,
        review: ReviewContext,
        staging: &mut Staging,
        annotations: &mut AnnotationSet,
    ) {
        let Some(polarity) = inherited else {
            return;
        };
        let is_adjective = self
            .policy
            .resolve(target, &sentence.tokens)
            .into_iter()
            .any(|pos| sentence.pos_class(pos) == PosClass::Adjective);
        if !is_adjective {
            return;
        }
        let word = target.text.to_lowercase();
        trace!(rule = rule.name, %word, %polarity, "opinion candidate");
        staging.stage_opinion(&word, polarity);
        if rule.annotate {
            annotations.insert(Annotation::new(review.index, word, polarity.value()));
        }
    }
}
