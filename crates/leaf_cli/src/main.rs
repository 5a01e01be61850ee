mod report;
mod scan;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leaf_core::{
    ClassifierConfig, DiseaseClass, InferencePipeline, ModelLoader, format_numbered,
    recommendations, suggest,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use report::{Outcome, ReportRow, render_text};
use scan::{ScanOptions, collect_images};

#[derive(Debug, Parser)]
#[command(
    name = "leafdoc",
    version = env!("LEAFDOC_VERSION"),
    about = "Fruit & vegetable leaf disease recognition"
)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Diagnose one or more leaf images.
    Predict {
        /// Image files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Model artifact; overrides the configured path.
        #[arg(short, long)]
        model: Option<PathBuf>,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
        /// Print one JSON object per image.
        #[arg(long)]
        json: bool,
    },
    /// Show the pesticide suggestions for a class label.
    Suggest { label: String },
    /// List the class labels in model output order.
    Labels,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(false)` when some images could not be diagnosed.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Predict {
            inputs,
            config,
            model,
            recursive,
            json,
        } => predict(&inputs, config, model, ScanOptions { recursive }, json),
        Command::Suggest { label } => {
            if label.parse::<DiseaseClass>().is_err() {
                tracing::warn!("`{label}` is not a known class label");
            }
            println!("{}", format_numbered(suggest(&label)));
            Ok(true)
        }
        Command::Labels => {
            for class in DiseaseClass::ALL {
                let marker = if recommendations(class).is_some() { "*" } else { " " };
                println!("{:>2} {marker} {class}", class.index());
            }
            Ok(true)
        }
    }
}

fn predict(
    inputs: &[PathBuf],
    config: Option<PathBuf>,
    model: Option<PathBuf>,
    opts: ScanOptions,
    json: bool,
) -> Result<bool> {
    let mut cfg = match &config {
        Some(path) => ClassifierConfig::from_toml_file(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    if let Some(model) = model {
        cfg.model_path = model;
    }

    let images = collect_images(inputs, opts)?;
    if images.is_empty() {
        anyhow::bail!("No images found");
    }

    let loader = Arc::new(ModelLoader::new(cfg));
    loader.load().context("model could not be loaded")?;
    let pipeline = InferencePipeline::new(loader);

    let start = Instant::now();
    let mut failed = 0usize;
    for path in &images {
        let result = pipeline.diagnose_file(path);
        if let Err(e) = &result {
            tracing::warn!("could not diagnose {}: {e}", path.display());
            failed += 1;
        }
        if json {
            let outcome = match &result {
                Ok(diagnosis) => Outcome::from_diagnosis(diagnosis),
                Err(e) => Outcome::Failed {
                    error: e.to_string(),
                },
            };
            let row = ReportRow {
                file: path,
                outcome,
            };
            println!("{}", serde_json::to_string(&row)?);
        } else if let Ok(diagnosis) = &result {
            println!("{}", render_text(path, diagnosis));
        }
    }

    tracing::info!(
        "diagnosed {} of {} image(s) in {:.1?}",
        images.len() - failed,
        images.len(),
        start.elapsed()
    );
    Ok(failed == 0)
}
