//! PawShield CLI
//!
//! Offline access to the diagnosis pipeline: check which startup resources
//! load, or diagnose a single image file without running the HTTP server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use pawshield::config::AssetPaths;
use pawshield::inference::{Predictor, ServiceContext};
use pawshield::model::Species;
use pawshield::utils::logging::{init_logging, LogConfig};

/// PawShield dog and cat skin-condition diagnosis
#[derive(Parser, Debug)]
#[command(name = "pawshield")]
#[command(version = "0.1.0")]
#[command(about = "Diagnose dog and cat skin conditions from a photo", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Directory holding the model info, treatment data and model files
    #[arg(long, env = "PAWSHIELD_ASSET_DIR", default_value = ".", global = true)]
    asset_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load every startup resource and report what is missing
    Status,

    /// Diagnose one image
    Predict {
        /// Image file to diagnose
        #[arg(short, long)]
        image: PathBuf,

        /// Species shown in the image (dog or cat)
        #[arg(short, long)]
        animal_type: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    let _ = init_logging(&log_config);

    let paths = AssetPaths::in_dir(&cli.asset_dir);

    match cli.command {
        Commands::Status => cmd_status(&paths),
        Commands::Predict { image, animal_type } => cmd_predict(&paths, &image, &animal_type),
    }
}

fn load_context(paths: &AssetPaths) -> Result<ServiceContext> {
    ServiceContext::load(paths)
        .with_context(|| format!("failed to load startup resources from {:?}", paths.model_info))
}

fn cmd_status(paths: &AssetPaths) -> Result<()> {
    let context = load_context(paths)?;
    let status = context.status();

    println!("{}", "Resources:".cyan().bold());
    println!("  Model info:  {}", paths.model_info.display());
    println!("  Treatments:  {}", paths.treatments.display());
    for species in Species::ALL {
        let loaded = if context.registry().has_model(species) {
            "loaded".green()
        } else {
            "missing".red()
        };
        println!(
            "  {} model:   {} ({})",
            species.display_name(),
            paths.model_path(species).display(),
            loaded
        );
        if let Some(descriptor) = context.model_info().descriptor(species) {
            println!(
                "             {} classes, {} / {}",
                descriptor.num_classes(),
                descriptor.backbone,
                descriptor.strategy
            );
        }
    }
    println!();

    if status.is_ok() {
        println!("{} {}", "Status:".green().bold(), status.summary());
    } else {
        println!("{} {}", "Status:".yellow().bold(), status.summary());
    }

    Ok(())
}

fn cmd_predict(paths: &AssetPaths, image: &Path, animal_type: &str) -> Result<()> {
    info!("Diagnosing {:?} as {}", image, animal_type);

    let bytes = std::fs::read(image).with_context(|| format!("failed to read {:?}", image))?;
    let predictor = Predictor::new(Arc::new(load_context(paths)?));

    match predictor.predict(Some(&bytes), Some(animal_type)) {
        Ok(result) => {
            println!(
                "{} {} ({:.2}%)",
                "Diagnosis:".green().bold(),
                result.diagnosis,
                result.confidence_percent
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Error:".red(), e);
            if let Some(detail) = e.detail() {
                println!("  {}", detail);
            }
            anyhow::bail!("prediction failed with status {}", e.status_code())
        }
    }
}
