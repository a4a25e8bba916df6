//! Review corpus: one `id,rating,text` review per line.
//!
//! The text field is everything after the second comma, embedded commas
//! included. Only the integer part of the rating is used.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CorpusField, ExtractError, Result};
use crate::nlp::Polarity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    /// 1-based line number, stable across passes.
    pub index: usize,
    pub id: String,
    pub rating: i64,
    pub text: String,
}

impl Review {
    pub fn parse(line: &str, index: usize) -> Result<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let parse_error = |field, reason: &str| ExtractError::Parse {
            line: index,
            field,
            reason: reason.to_string(),
        };

        let (id, rest) = line
            .split_once(',')
            .ok_or_else(|| parse_error(CorpusField::Id, "missing `,` after id"))?;
        let (rating_field, text) = rest
            .split_once(',')
            .ok_or_else(|| parse_error(CorpusField::Rating, "missing `,` after rating"))?;

        let integer_part = match rating_field.find('.') {
            Some(dot) => &rating_field[..dot],
            None => rating_field,
        };
        let rating: i64 = integer_part.trim().parse().map_err(|_| {
            parse_error(
                CorpusField::Rating,
                &format!("`{}` is not a number", rating_field),
            )
        })?;

        Ok(Review {
            index,
            id: id.to_string(),
            rating,
            text: text.to_string(),
        })
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_rating(self.rating)
    }
}

/// Anything that can replay the corpus in order, once per epoch.
pub trait ReviewSource {
    fn reviews(&self) -> Result<Box<dyn Iterator<Item = Result<Review>> + '_>>;
}

impl ReviewSource for [Review] {
    fn reviews(&self) -> Result<Box<dyn Iterator<Item = Result<Review>> + '_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

impl ReviewSource for Vec<Review> {
    fn reviews(&self) -> Result<Box<dyn Iterator<Item = Result<Review>> + '_>> {
        self.as_slice().reviews()
    }
}

/// Corpus file streamed line by line on every pass.
#[derive(Debug, Clone)]
pub struct CorpusFile {
    path: PathBuf,
}

impl CorpusFile {
    /// Fails immediately when the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        File::open(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(CorpusFile {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses every line without keeping them; returns the review count.
    pub fn validate(&self) -> Result<usize> {
        let mut count = 0;
        for review in self.reviews()? {
            review?;
            count += 1;
        }
        Ok(count)
    }
}

impl ReviewSource for CorpusFile {
    fn reviews(&self) -> Result<Box<dyn Iterator<Item = Result<Review>> + '_>> {
        let file = File::open(&self.path).map_err(|e| ExtractError::io(&self.path, e))?;
        let path = self.path.as_path();
        Ok(Box::new(BufReader::new(file).lines().enumerate().map(
            move |(n, line)| {
                let line = line.map_err(|e| ExtractError::io(path, e))?;
                Review::parse(&line, n + 1)
            },
        )))
    }
}
