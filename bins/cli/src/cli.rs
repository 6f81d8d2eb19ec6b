//! Command-line interface for the splitter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::info;

use invsplit_core::batch::{BatchProcessor, BatchReport, RowResult, SourceRow};
use invsplit_core::split::SplitPolicy;
use invsplit_shared::{AppConfig, AppError, AppResult, MonetaryAmount, SplitMode};

/// Invsplit - split line amounts above a threshold into bounded parts.
#[derive(Debug, Parser)]
#[command(name = "invsplit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON files, each holding an array of rows.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Extra configuration file layered over config/default.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the JSON result here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for reproducible splits.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the split threshold.
    #[arg(long)]
    pub threshold: Option<MonetaryAmount>,

    /// Override the maximum part value.
    #[arg(long)]
    pub max_split: Option<MonetaryAmount>,

    /// Override the split mode (`decimal` or `integer_multiple_of_five`).
    #[arg(long)]
    pub mode: Option<SplitMode>,
}

impl Cli {
    /// Loads configuration and applies command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path
                    .to_str()
                    .ok_or_else(|| AppError::Validation(format!("Non UTF-8 path: {}", path.display())))?;
                AppConfig::load_from_file(path)?
            }
            None => AppConfig::load()?,
        };

        if let Some(threshold) = self.threshold {
            config.split.threshold = threshold;
        }
        if let Some(max_split) = self.max_split {
            config.split.max_split_value = Some(max_split);
        }
        if let Some(mode) = self.mode {
            config.split.mode = mode;
        }
        Ok(config)
    }
}

/// Result for one input file.
#[derive(Debug, Serialize)]
struct FileResult {
    input: String,
    rows: Vec<RowResult>,
}

/// Whole run: per-file rows plus the merged report.
#[derive(Debug, Serialize)]
struct RunResult {
    files: Vec<FileResult>,
    report: BatchReport,
}

/// Run the splitter over every input file.
pub fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let policy = SplitPolicy::try_from(&config.split)
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let mut processor = BatchProcessor::new(policy);
    if let Some(seed) = cli.seed {
        processor = processor.with_seed(seed);
    }
    let active = processor.policy();
    info!(
        threshold = %active.threshold(),
        max_part_value = %active.max_part_value(),
        mode = ?active.mode(),
        seed = ?cli.seed,
        "policy loaded"
    );

    let mut files = Vec::with_capacity(cli.inputs.len());
    let mut report = BatchReport::default();
    for input in &cli.inputs {
        let rows = read_rows(input)?;
        let output = processor.process(&rows);
        info!(
            input = %input.display(),
            rows = rows.len(),
            split_rows = output.report.split_rows,
            "file processed"
        );
        report.merge(output.report);
        files.push(FileResult {
            input: input.display().to_string(),
            rows: output.rows,
        });
    }

    info!(
        total_files = report.total_files,
        processed_rows = report.processed_rows,
        split_rows = report.split_rows,
        skipped = report.skipped.len(),
        errors = report.errors.len(),
        "run complete"
    );

    let json = serde_json::to_string_pretty(&RunResult { files, report })
        .map_err(|err| AppError::Internal(format!("serializing run result: {err}")))?;
    match &cli.output {
        Some(path) => fs::write(path, json).map_err(AppError::from)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn read_rows(path: &Path) -> AppResult<Vec<SourceRow>> {
    let text = fs::read_to_string(path)
        .map_err(|err| AppError::Io(format!("{}: {err}", path.display())))?;
    serde_json::from_str(&text).map_err(|err| AppError::Input(format!("{}: {err}", path.display())))
}
