//! End-to-end extraction: seed, propagate to a fixed point, count, filter and
//! write the result files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::annotation::AnnotationSet;
use crate::config::ExtractionConfig;
use crate::controller::{ControllerState, ConvergenceReport, FixedPointController};
use crate::corpus::{CorpusFile, ReviewSource};
use crate::error::Result;
use crate::frequency::{FrequencyCounter, FrequencyTable};
use crate::lexicon::{FeatureLexicon, OpinionLexicon};
use crate::nlp::Polarity;
use crate::output::OutputWriter;
use crate::propagation::{LexiconState, MatchPolicy, PropagationEngine};
use crate::provider::{AnnotationProvider, TreebankProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub positive: PathBuf,
    pub negative: PathBuf,
    pub reviews: PathBuf,
    pub treebank: PathBuf,
}

impl InputPaths {
    pub fn from_dir(dir: &Path) -> Self {
        InputPaths {
            positive: dir.join("positive.txt"),
            negative: dir.join("negative.txt"),
            reviews: dir.join("sample.txt"),
            treebank: dir.join("treebank.json"),
        }
    }
}

/// Positive seeds load first and win over a negative duplicate.
pub fn load_seeds(positive: &Path, negative: &Path) -> Result<OpinionLexicon> {
    let mut opinions = OpinionLexicon::new();
    opinions.seed_from_file(positive, Polarity::Positive)?;
    opinions.seed_from_file(negative, Polarity::Negative)?;
    Ok(opinions)
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub report: ConvergenceReport,
    /// Feature lexicon as it stood at convergence.
    pub initial_features: FeatureLexicon,
    pub frequencies: FrequencyTable,
    pub final_features: Vec<String>,
    pub final_annotations: AnnotationSet,
    pub state: LexiconState,
}

pub fn extract<S, P>(
    corpus: &S,
    provider: &P,
    opinions: OpinionLexicon,
    config: &ExtractionConfig,
) -> Result<ExtractionOutcome>
where
    S: ReviewSource + ?Sized,
    P: AnnotationProvider + ?Sized,
{
    let mut state = LexiconState::new(opinions);
    let report = FixedPointController::new(PropagationEngine::from_config(config), provider)
        .with_max_epochs(config.max_epochs)
        .with_progress(config.show_progress)
        .converge(corpus, &mut state)?;
    info!(
        epochs = report.epochs,
        state = ?report.state,
        opinions = state.opinions.len(),
        features = state.features.len(),
        "propagation finished"
    );

    let initial_features = state.features.clone();
    let counter = FrequencyCounter::from_config(config);
    let frequencies = counter.run(corpus, provider, &mut state, config.show_progress)?;
    let final_features = counter.final_features(&frequencies);
    let final_annotations = state.annotations.retain_within(&final_features);
    info!(
        final_features = final_features.len(),
        annotations = final_annotations.len(),
        "filtering finished"
    );

    Ok(ExtractionOutcome {
        report,
        initial_features,
        frequencies,
        final_features,
        final_annotations,
        state,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub epochs: usize,
    pub state: ControllerState,
    pub match_policy: MatchPolicy,
    pub reviews: usize,
    pub sentences: usize,
    pub opinions: usize,
    pub initial_features: usize,
    pub counted_features: usize,
    pub final_features: usize,
    pub annotations: usize,
    pub final_annotations: usize,
}

impl ExtractionSummary {
    pub fn new(outcome: &ExtractionOutcome, config: &ExtractionConfig) -> Self {
        ExtractionSummary {
            epochs: outcome.report.epochs,
            state: outcome.report.state,
            match_policy: config.match_policy,
            reviews: outcome.report.last_epoch.reviews,
            sentences: outcome.report.last_epoch.sentences,
            opinions: outcome.state.opinions.len(),
            initial_features: outcome.initial_features.len(),
            counted_features: outcome.frequencies.len(),
            final_features: outcome.final_features.len(),
            annotations: outcome.state.annotations.len(),
            final_annotations: outcome.final_annotations.len(),
        }
    }
}

pub fn write_outcome(outcome: &ExtractionOutcome, summary: &ExtractionSummary, out_dir: &Path) -> Result<()> {
    let writer = OutputWriter::create(out_dir)?;
    writer.initial_features(&outcome.initial_features)?;
    writer.frequencies(&outcome.frequencies)?;
    writer.opinions(&outcome.state.opinions)?;
    writer.final_features(&outcome.final_features)?;
    writer.annotations(&outcome.final_annotations)?;
    writer.summary(summary)?;
    info!(dir = %writer.dir().display(), "wrote results");
    Ok(())
}

/// Opens and validates every input before any processing starts.
pub fn run(inputs: &InputPaths, out_dir: &Path, config: &ExtractionConfig) -> Result<ExtractionSummary> {
    let opinions = load_seeds(&inputs.positive, &inputs.negative)?;
    let corpus = CorpusFile::open(&inputs.reviews)?;
    let reviews = corpus.validate()?;
    let provider = TreebankProvider::load(&inputs.treebank)?;
    info!(
        seeds = opinions.len(),
        reviews,
        treebank = provider.len(),
        "inputs loaded"
    );

    let outcome = extract(&corpus, &provider, opinions, config)?;
    let summary = ExtractionSummary::new(&outcome, config);
    write_outcome(&outcome, &summary, out_dir)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Review;
    use crate::error::ExtractError;
    use crate::nlp::DependencyTriple;
    use crate::output::{ANNOTATIONS_FILE, FINAL_FEATURES_FILE, FREQUENCY_FILE, INITIAL_FEATURES_FILE, OPINIONS_FILE};
    use crate::provider::AnnotatedSentence;
    use std::fs;
    use tempfile::TempDir;

    const TREEBANK: &str = r#"{"sentences": [
        {"tokens": ["the", "battery", "is", "good", "but", "the", "screen", "is", "bad", "."],
         "tags": ["DT", "NN", "VBZ", "JJ", "CC", "DT", "NN", "VBZ", "JJ", "."],
         "dependencies": [
            "det(battery-2, the-1)", "nsubj(good-4, battery-2)", "cop(good-4, is-3)",
            "cc(good-4, but-5)", "det(screen-7, the-6)", "nsubj(bad-9, screen-7)",
            "cop(bad-9, is-8)", "conj_but(good-4, bad-9)"]}
    ]}"#;

    fn write_inputs(dir: &Path, corpus: &str) -> anyhow::Result<()> {
        fs::write(dir.join("positive.txt"), "good\n")?;
        fs::write(dir.join("negative.txt"), "bad\n")?;
        fs::write(dir.join("sample.txt"), corpus)?;
        fs::write(dir.join("treebank.json"), TREEBANK)?;
        Ok(())
    }

    fn quiet() -> ExtractionConfig {
        ExtractionConfig {
            show_progress: false,
            ..ExtractionConfig::default()
        }
    }

    #[test]
    fn test_end_to_end() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write_inputs(temp_dir.path(), "1,5.0,The battery is good but the screen is bad.\n")?;
        let out = temp_dir.path().join("output");

        let summary = run(&InputPaths::from_dir(temp_dir.path()), &out, &quiet())?;
        assert_eq!(summary.state, ControllerState::Converged);
        assert_eq!(summary.epochs, 2);
        assert_eq!(summary.reviews, 1);

        let read = |name: &str| fs::read_to_string(out.join(name));
        assert_eq!(read(INITIAL_FEATURES_FILE)?, "battery:2\r\nscreen:2\r\n");
        assert_eq!(read(FREQUENCY_FILE)?, "battery:1\r\nscreen:1\r\n");
        assert_eq!(read(OPINIONS_FILE)?, "bad:-1\r\ngood:1\r\n");
        assert_eq!(read(FINAL_FEATURES_FILE)?, "battery\r\nscreen\r\n");
        // `but` right after `good` flips the battery annotation too
        assert_eq!(read(ANNOTATIONS_FILE)?, "1@battery@-1\r\n1@screen@-1\r\n");
        assert!(out.join("summary.json").exists());
        Ok(())
    }

    #[test]
    fn test_separate_sentences_keep_seed_polarity() -> anyhow::Result<()> {
        let provider = TreebankProvider::from_sentences(vec![
            AnnotatedSentence::new(
                "the battery is good .".split(' ').map(String::from).collect(),
                "DT NN VBZ JJ .".split(' ').map(String::from).collect(),
                vec!["nsubj(good-4, battery-2)".parse::<DependencyTriple>()?],
            ),
            AnnotatedSentence::new(
                "the screen is bad .".split(' ').map(String::from).collect(),
                "DT NN VBZ JJ .".split(' ').map(String::from).collect(),
                vec!["nsubj(bad-4, screen-2)".parse::<DependencyTriple>()?],
            ),
        ]);
        let reviews = vec![Review::parse("1,5.0,the battery is good. the screen is bad.", 1)?];
        let mut opinions = OpinionLexicon::new();
        opinions.insert("good", Polarity::Positive);
        opinions.insert("bad", Polarity::Negative);

        let outcome = extract(&reviews, &provider, opinions, &quiet())?;
        let kept: Vec<String> = outcome.final_annotations.iter().map(|a| a.to_string()).collect();
        assert_eq!(kept, vec!["1@battery@1", "1@screen@-1"]);
        assert_eq!(outcome.final_features, vec!["battery", "screen"]);
        Ok(())
    }

    #[test]
    fn test_missing_treebank_fails_before_output() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write_inputs(temp_dir.path(), "1,5.0,fine\n")?;
        fs::remove_file(temp_dir.path().join("treebank.json"))?;
        let out = temp_dir.path().join("output");

        let err = run(&InputPaths::from_dir(temp_dir.path()), &out, &quiet()).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn test_bad_corpus_line_fails_before_output() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write_inputs(temp_dir.path(), "1,5.0,fine\n2,oops,broken\n")?;
        let out = temp_dir.path().join("output");

        let err = run(&InputPaths::from_dir(temp_dir.path()), &out, &quiet()).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { line: 2, .. }));
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn test_positive_seed_wins() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let positive = temp_dir.path().join("positive.txt");
        let negative = temp_dir.path().join("negative.txt");
        fs::write(&positive, "Cheap\n\nsolid\n")?;
        fs::write(&negative, "cheap\nflimsy\n")?;
        let opinions = load_seeds(&positive, &negative)?;
        assert_eq!(opinions.len(), 3);
        assert_eq!(opinions.polarity("cheap"), Some(Polarity::Positive));
        assert_eq!(opinions.polarity("flimsy"), Some(Polarity::Negative));
        Ok(())
    }

    #[test]
    fn test_epoch_cap_from_config() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write_inputs(temp_dir.path(), "1,5.0,the battery is good but the screen is bad.\n")?;
        let config = ExtractionConfig {
            max_epochs: Some(1),
            ..quiet()
        };
        let summary = run(&InputPaths::from_dir(temp_dir.path()), &temp_dir.path().join("out"), &config)?;
        assert_eq!(summary.state, ControllerState::EpochLimit);
        assert_eq!(summary.epochs, 1);
        Ok(())
    }
}
