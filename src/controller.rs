//! Fixed-point controller: replays the corpus through the propagation engine
//! until an epoch adds no new lexicon key.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::corpus::ReviewSource;
use crate::error::Result;
use crate::propagation::{Growth, LexiconState, PropagationEngine, ReviewContext};
use crate::provider::{annotate_review, AnnotationProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    Running,
    Converged,
    EpochLimit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EpochStats {
    pub reviews: usize,
    pub sentences: usize,
    pub growth: Growth,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceReport {
    pub epochs: usize,
    pub state: ControllerState,
    pub last_epoch: EpochStats,
}

pub(crate) fn spinner(enabled: bool, message: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub struct FixedPointController<'a, P: AnnotationProvider + ?Sized> {
    engine: PropagationEngine,
    provider: &'a P,
    max_epochs: Option<usize>,
    show_progress: bool,
}

impl<'a, P: AnnotationProvider + ?Sized> FixedPointController<'a, P> {
    pub fn new(engine: PropagationEngine, provider: &'a P) -> Self {
        FixedPointController {
            engine,
            provider,
            max_epochs: None,
            show_progress: false,
        }
    }

    pub fn with_max_epochs(mut self, max_epochs: Option<usize>) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// One full pass over the corpus.
    pub fn run_epoch<S: ReviewSource + ?Sized>(
        &self,
        corpus: &S,
        state: &mut LexiconState,
        epoch: usize,
    ) -> Result<EpochStats> {
        let pb = spinner(self.show_progress, &format!("epoch {}", epoch));
        let mut stats = EpochStats::default();
        for review in corpus.reviews()? {
            let review = review?;
            let context = ReviewContext {
                index: review.index,
                polarity: review.polarity(),
            };
            for sentence in annotate_review(self.provider, &review)? {
                stats.growth.absorb(self.engine.propagate(&sentence, context, state));
                stats.sentences += 1;
            }
            stats.reviews += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(stats)
    }

    pub fn converge<S: ReviewSource + ?Sized>(
        &self,
        corpus: &S,
        state: &mut LexiconState,
    ) -> Result<ConvergenceReport> {
        let mut epoch = 0;
        loop {
            epoch += 1;
            let stats = self.run_epoch(corpus, state, epoch)?;
            info!(
                epoch,
                reviews = stats.reviews,
                sentences = stats.sentences,
                grown = ?stats.growth.raised(),
                opinions = state.opinions.len(),
                features = state.features.len(),
                "epoch finished"
            );
            if !stats.growth.any() {
                return Ok(ConvergenceReport {
                    epochs: epoch,
                    state: ControllerState::Converged,
                    last_epoch: stats,
                });
            }
            if self.max_epochs.is_some_and(|cap| epoch >= cap) {
                warn!(epoch, "epoch limit reached before convergence");
                return Ok(ConvergenceReport {
                    epochs: epoch,
                    state: ControllerState::EpochLimit,
                    last_epoch: stats,
                });
            }
        }
    }
}
