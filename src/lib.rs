//! Double-propagation extraction of opinion words and product aspects from
//! rated reviews.
//!
//! Seed opinion adjectives are propagated over typed dependency relations to
//! nouns (aspects) and further adjectives until a whole pass over the corpus
//! adds nothing new. A frequency pass then filters the aspects and the
//! per-review `review@phrase@polarity` annotations.

pub mod annotation;
pub mod config;
pub mod controller;
pub mod corpus;
pub mod error;
pub mod frequency;
pub mod lexicon;
pub mod nlp;
pub mod output;
pub mod pipeline;
pub mod propagation;
pub mod provider;

pub use config::ExtractionConfig;
pub use error::{ExtractError, Result};
pub use pipeline::{extract, run, ExtractionOutcome, ExtractionSummary, InputPaths};
