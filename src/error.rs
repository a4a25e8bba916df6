// Error types for lexicon extraction.
// Library code returns `ExtractError`; the binary wraps it with anyhow context.
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Field of a `id,rating,text` corpus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusField {
    Id,
    Rating,
}

impl fmt::Display for CorpusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusField::Id => f.write_str("id"),
            CorpusField::Rating => f.write_str("rating"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus line {line}: invalid {field}: {reason}")]
    Parse {
        line: usize,
        field: CorpusField,
        reason: String,
    },

    #[error("malformed typed dependency `{0}`")]
    Dependency(String),

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("annotation provider failed: {0}")]
    Provider(String),
}

impl ExtractError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        ExtractError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
