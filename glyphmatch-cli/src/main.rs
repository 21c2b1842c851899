use clap::{Parser, Subcommand, ValueEnum};
use glyphmatch::{store_sample, MatchResult, Matcher, Metric, NormalizeConfig, SearchConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Digit classification against a labeled dataset")]
struct Cli {
    /// Enable tracing output for search diagnostics.
    #[arg(long)]
    trace: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a query image against the dataset and print the best match.
    Classify {
        /// Path to the query image.
        query: PathBuf,
        /// Dataset root directory (one subdirectory per label).
        dataset: PathBuf,
        /// Similarity metric.
        #[arg(long, value_enum, default_value = "ssim")]
        metric: MetricArg,
        /// Side length of the normalization canvas.
        #[arg(long, default_value_t = 200)]
        canvas_size: usize,
        /// Skip the pre-threshold Gaussian smoothing pass.
        #[arg(long)]
        no_blur: bool,
        /// Restrict the scan to these labels (defaults to 0 through 10).
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
    },
    /// Copy a labeled sample into the dataset with a timestamped name.
    Store {
        /// Path to the image to store.
        query: PathBuf,
        /// Dataset root directory.
        dataset: PathBuf,
        /// Label directory to store the sample under.
        #[arg(long)]
        label: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    Ssim,
    Features,
}

impl From<MetricArg> for Metric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Ssim => Metric::Ssim,
            MetricArg::Features => Metric::Features,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    label: String,
    score: f32,
    percent: u32,
    reference: PathBuf,
}

impl From<MatchResult> for ClassifyOutput {
    fn from(value: MatchResult) -> Self {
        Self {
            label: value.label,
            percent: (value.score * 100.0).round() as u32,
            score: value.score,
            reference: value.reference,
        }
    }
}

#[derive(Debug, Serialize)]
struct StoreOutput {
    stored: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("glyphmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    match cli.command {
        Command::Classify {
            query,
            dataset,
            metric,
            canvas_size,
            no_blur,
            labels,
        } => {
            let config = SearchConfig {
                labels: labels.unwrap_or_else(glyphmatch::default_labels),
                metric: metric.into(),
                normalize: NormalizeConfig {
                    canvas_size,
                    blur: !no_blur,
                },
            };
            let matcher = Matcher::with_config(config);
            let result = matcher.find_best_match(&query, &dataset)?;
            let output = ClassifyOutput::from(result);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Store {
            query,
            dataset,
            label,
        } => {
            let stored = store_sample(&query, &dataset, &label)?;
            let output = StoreOutput { stored };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
