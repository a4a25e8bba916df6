// Result files written into the output directory.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::annotation::AnnotationSet;
use crate::error::{ExtractError, Result};
use crate::frequency::FrequencyTable;
use crate::lexicon::{FeatureLexicon, OpinionLexicon};

pub const INITIAL_FEATURES_FILE: &str = "initialFeatures.txt";
pub const FREQUENCY_FILE: &str = "Freq_Feature.txt";
pub const OPINIONS_FILE: &str = "opine3.txt";
pub const FINAL_FEATURES_FILE: &str = "FinalFeature.txt";
pub const ANNOTATIONS_FILE: &str = "annote.txt";
pub const SUMMARY_FILE: &str = "summary.json";

const LINE_END: &str = "\r\n";

pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Creates the directory if needed.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| ExtractError::io(dir, e))?;
        Ok(OutputWriter {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_lines<I, S>(&self, name: &str, lines: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.dir.join(name);
        let file = File::create(&path).map_err(|e| ExtractError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        let mut count = 0;
        for line in lines {
            out.write_all(line.as_ref().as_bytes())
                .and_then(|_| out.write_all(LINE_END.as_bytes()))
                .map_err(|e| ExtractError::io(&path, e))?;
            count += 1;
        }
        out.flush().map_err(|e| ExtractError::io(&path, e))?;
        debug!(path = %path.display(), lines = count, "wrote output");
        Ok(path)
    }

    pub fn initial_features(&self, features: &FeatureLexicon) -> Result<PathBuf> {
        self.write_lines(
            INITIAL_FEATURES_FILE,
            features.sorted().into_iter().map(|(p, c)| format!("{}:{}", p, c)),
        )
    }

    pub fn frequencies(&self, table: &FrequencyTable) -> Result<PathBuf> {
        self.write_lines(
            FREQUENCY_FILE,
            table.sorted().into_iter().map(|(p, c)| format!("{}:{}", p, c)),
        )
    }

    pub fn opinions(&self, opinions: &OpinionLexicon) -> Result<PathBuf> {
        self.write_lines(
            OPINIONS_FILE,
            opinions.sorted().into_iter().map(|(w, p)| format!("{}:{}", w, p)),
        )
    }

    pub fn final_features(&self, features: &[String]) -> Result<PathBuf> {
        self.write_lines(FINAL_FEATURES_FILE, features)
    }

    pub fn annotations(&self, annotations: &AnnotationSet) -> Result<PathBuf> {
        self.write_lines(ANNOTATIONS_FILE, annotations.iter().map(|a| a.to_string()))
    }

    pub fn summary<T: Serialize>(&self, summary: &T) -> Result<PathBuf> {
        let path = self.dir.join(SUMMARY_FILE);
        let file = File::create(&path).map_err(|e| ExtractError::io(&path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), summary).map_err(|e| ExtractError::json(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::nlp::Polarity;
    use tempfile::TempDir;

    #[test]
    fn test_sorted_crlf_lines() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let writer = OutputWriter::create(&temp_dir.path().join("out"))?;

        let mut opinions = OpinionLexicon::new();
        opinions.insert("good", Polarity::Positive);
        opinions.insert("bad", Polarity::Negative);
        let path = writer.opinions(&opinions)?;
        assert_eq!(fs::read_to_string(path)?, "bad:-1\r\ngood:1\r\n");

        let mut features = FeatureLexicon::new();
        features.add("screen", 2);
        features.add("battery life", 1);
        let path = writer.initial_features(&features)?;
        assert_eq!(fs::read_to_string(path)?, "battery life:1\r\nscreen:2\r\n");
        Ok(())
    }

    #[test]
    fn test_annotations_keep_insertion_order() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let writer = OutputWriter::create(temp_dir.path())?;
        let mut set = AnnotationSet::new();
        set.insert(Annotation::new(2, "screen", -1));
        set.insert(Annotation::new(1, "battery", 1));
        let path = writer.annotations(&set)?;
        assert_eq!(fs::read_to_string(path)?, "2@screen@-1\r\n1@battery@1\r\n");
        Ok(())
    }

    #[test]
    fn test_empty_file_and_summary() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let writer = OutputWriter::create(temp_dir.path())?;
        let path = writer.final_features(&[])?;
        assert_eq!(fs::read_to_string(path)?, "");

        let path = writer.summary(&serde_json::json!({"epochs": 2}))?;
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(parsed["epochs"], 2);
        Ok(())
    }
}
