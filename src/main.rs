use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use aspect_miner::corpus::CorpusFile;
use aspect_miner::pipeline::{self, InputPaths};
use aspect_miner::propagation::MatchPolicy;
use aspect_miner::ExtractionConfig;

#[derive(Parser)]
#[command(name = "aspect-miner", about = "Opinion word and product aspect extraction from rated reviews")]
struct Cli {
    /// Raise log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run propagation and write the lexicons and annotations
    Extract {
        /// Directory holding positive.txt, negative.txt, sample.txt and treebank.json
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(long)]
        positive: Option<PathBuf>,
        #[arg(long)]
        negative: Option<PathBuf>,
        #[arg(short, long)]
        reviews: Option<PathBuf>,
        #[arg(short, long)]
        treebank: Option<PathBuf>,
        #[arg(short, long, default_value = "output")]
        out: PathBuf,
        /// JSON config file; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        max_epochs: Option<usize>,
        #[arg(long)]
        match_policy: Option<MatchPolicy>,
        /// Hide progress spinners
        #[arg(short, long)]
        quiet: bool,
    },
    /// Parse a review corpus and report how many reviews it holds
    Check {
        #[arg(short, long)]
        reviews: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "aspect_miner=info",
        1 => "aspect_miner=debug",
        _ => "aspect_miner=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::too_many_arguments)]
fn extract(
    dir: PathBuf,
    positive: Option<PathBuf>,
    negative: Option<PathBuf>,
    reviews: Option<PathBuf>,
    treebank: Option<PathBuf>,
    out: PathBuf,
    config: Option<PathBuf>,
    max_epochs: Option<usize>,
    match_policy: Option<MatchPolicy>,
    quiet: bool,
) -> Result<()> {
    let mut settings = match &config {
        Some(path) => ExtractionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExtractionConfig::default(),
    };
    if max_epochs.is_some() {
        settings.max_epochs = max_epochs;
    }
    if let Some(policy) = match_policy {
        settings.match_policy = policy;
    }
    if quiet {
        settings.show_progress = false;
    }
    debug!(?settings, "effective configuration");

    let defaults = InputPaths::from_dir(&dir);
    let inputs = InputPaths {
        positive: positive.unwrap_or(defaults.positive),
        negative: negative.unwrap_or(defaults.negative),
        reviews: reviews.unwrap_or(defaults.reviews),
        treebank: treebank.unwrap_or(defaults.treebank),
    };

    let summary = pipeline::run(&inputs, &out, &settings)
        .with_context(|| format!("extraction over {} failed", dir.display()))?;
    println!(
        "{:?} after {} epoch(s): {} opinion words, {} final features, {} annotations",
        summary.state, summary.epochs, summary.opinions, summary.final_features, summary.final_annotations
    );
    println!("Wrote results to {}", out.display());
    Ok(())
}

fn check(reviews: PathBuf) -> Result<()> {
    let corpus = CorpusFile::open(&reviews).with_context(|| format!("opening {}", reviews.display()))?;
    let count = corpus
        .validate()
        .with_context(|| format!("validating {}", reviews.display()))?;
    println!("{}: {} reviews", corpus.path().display(), count);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            dir,
            positive,
            negative,
            reviews,
            treebank,
            out,
            config,
            max_epochs,
            match_policy,
            quiet,
        } => extract(
            dir, positive, negative, reviews, treebank, out, config, max_epochs, match_policy, quiet,
        ),
        Commands::Check { reviews } => check(reviews),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::try_parse_from([
            "aspect-miner",
            "-v",
            "extract",
            "--dir",
            "data",
            "--max-epochs",
            "4",
            "--match-policy",
            "by-position",
            "--quiet",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Extract {
                dir,
                out,
                max_epochs,
                match_policy,
                quiet,
                ..
            } => {
                assert_eq!(dir, PathBuf::from("data"));
                assert_eq!(out, PathBuf::from("output"));
                assert_eq!(max_epochs, Some(4));
                assert_eq!(match_policy, Some(MatchPolicy::ByPosition));
                assert!(quiet);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["aspect-miner", "extract", "--dir", "d", "--match-policy", "fuzzy"]).is_err());
    }

    #[test]
    fn test_check_counts_reviews() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("sample.txt");
        let mut file = File::create(&path)?;
        writeln!(file, "1,5.0,great")?;
        writeln!(file, "2,1.0,awful")?;
        check(path)?;
        Ok(())
    }

    #[test]
    fn test_check_reports_bad_line() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("sample.txt");
        std::fs::write(&path, "no separators here\n")?;
        let err = check(path).unwrap_err();
        assert!(format!("{:#}", err).contains("line 1"));
        Ok(())
    }
}
