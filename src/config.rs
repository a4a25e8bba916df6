// Run configuration: optional JSON file, overridden by CLI flags.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::nlp::sentiment::DEFAULT_NEGATION_WINDOW;
use crate::propagation::MatchPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Stop after this many epochs even if the lexicons are still growing.
    pub max_epochs: Option<usize>,
    pub match_policy: MatchPolicy,
    pub negation_window: usize,
    /// Final features need at least this many occurrences. 0 keeps everything.
    pub min_frequency: u32,
    pub show_progress: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            max_epochs: None,
            match_policy: MatchPolicy::ByText,
            negation_window: DEFAULT_NEGATION_WINDOW,
            min_frequency: 0,
            show_progress: true,
        }
    }
}

impl ExtractionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ExtractError::json(path, e))
    }
}
