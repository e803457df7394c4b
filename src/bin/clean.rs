//! clean - listing table cleaning CLI
//!
//! Fetches a table from the artifact store, drops out-of-range and outlier
//! rows, and publishes the cleaned table as a new artifact version.

use basic_cleaning::artifact::{ArtifactRef, LocalArtifactStore};
use basic_cleaning::error::{CleanError, Result};
use basic_cleaning::job::CleaningJob;
use basic_cleaning::pipeline::{basic_cleaning, Pipeline, PipelineConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Basic cleaning of listing tables
#[derive(Parser)]
#[command(name = "clean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Artifact store directory (default: user cache directory)
    #[arg(long, global = true, env = "CLEANING_STORE_DIR")]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean an input artifact and publish the result
    Run(RunArgs),

    /// Write the standard cleaning pipeline as YAML
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "pipeline.yaml")]
        output: PathBuf,

        /// Minimum accepted price
        #[arg(long, default_value = "10.0")]
        min_price: f64,

        /// Maximum accepted price
        #[arg(long, default_value = "350.0")]
        max_price: f64,
    },

    /// Print the manifest of a stored artifact as JSON
    Show {
        /// Artifact reference, e.g. clean_sample.csv:latest
        reference: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Reference of the data to clean, e.g. sample.csv:latest
    #[arg(long, alias = "input_artifact")]
    input_artifact: String,

    /// Name of the artifact holding the cleaned data
    #[arg(long, alias = "output_artifact")]
    output_artifact: String,

    /// Output artifact type
    #[arg(long, alias = "output_type")]
    output_type: String,

    /// Output artifact description
    #[arg(long, alias = "output_description")]
    output_description: String,

    /// Minimum accepted price
    #[arg(long, alias = "min_price", allow_negative_numbers = true)]
    min_price: f64,

    /// Maximum accepted price
    #[arg(long, alias = "max_price", allow_negative_numbers = true)]
    max_price: f64,

    /// Pipeline YAML to use instead of the standard cleaning steps
    #[arg(long)]
    pipeline: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = match &cli.store_dir {
        Some(dir) => LocalArtifactStore::new(dir),
        None => LocalArtifactStore::open_default(),
    };

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&store, args),
        Commands::Example {
            output,
            min_price,
            max_price,
        } => cmd_example(&output, min_price, max_price),
        Commands::Show { reference } => cmd_show(&store, &reference),
    };

    if let Err(e) = result {
        log::error!("{} error: {}", e.kind().name(), e);
        eprintln!("{}", error_message(&e));
        std::process::exit(1);
    }
}

/// Line printed to stderr for a failed command, whatever the log level.
fn error_message(e: &CleanError) -> String {
    format!("Error: {}", e)
}

/// Clean and publish
fn cmd_run(store: &LocalArtifactStore, args: RunArgs) -> Result<()> {
    let job = CleaningJob {
        input_artifact: args.input_artifact,
        output_artifact: args.output_artifact,
        output_type: args.output_type,
        output_description: args.output_description,
        min_price: args.min_price,
        max_price: args.max_price,
    };
    log::debug!("Store at {:?}", store.root());

    let output = match &args.pipeline {
        Some(path) => {
            log::info!("Loading pipeline configuration from {:?}", path);
            let config = PipelineConfig::from_yaml(&std::fs::read_to_string(path)?)?;
            job.run_with(store, &Pipeline::from_config(&config))?
        }
        None => job.run(store)?,
    };

    log::debug!("{}", output.outcome);
    log::info!(
        "Done! {} of {} rows kept, published as {}",
        output.outcome.n_output(),
        output.outcome.n_input(),
        output.artifact
    );
    Ok(())
}

/// Write the standard pipeline configuration
fn cmd_example(output_path: &Path, min_price: f64, max_price: f64) -> Result<()> {
    let config = basic_cleaning(min_price, max_price).to_config(Some(
        "Price range, IQR outliers on reviews and minimum nights, host listings, NYC bounding box, drop missing, parse last_review",
    ));
    std::fs::write(output_path, config.to_yaml()?)?;
    log::info!("Wrote example pipeline to {:?}", output_path);
    Ok(())
}

/// Print an artifact manifest
fn cmd_show(store: &LocalArtifactStore, reference: &str) -> Result<()> {
    let reference: ArtifactRef = reference.parse()?;
    let id = store.resolve(&reference)?;
    let manifest = store.manifest(&id)?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const RUN_ARGS: &[&str] = &[
        "clean",
        "run",
        "--input-artifact",
        "sample.csv:latest",
        "--output-artifact",
        "clean_sample.csv",
        "--output-type",
        "clean_sample",
        "--output-description",
        "Data with outliers and null values removed",
        "--min-price",
        "10",
        "--max-price",
        "350",
    ];

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_parse() {
        let cli = Cli::try_parse_from(RUN_ARGS).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input_artifact, "sample.csv:latest");
                assert_eq!(args.output_type, "clean_sample");
                assert_eq!(args.min_price, 10.0);
                assert_eq!(args.max_price, 350.0);
                assert!(args.pipeline.is_none());
            }
            _ => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn test_missing_max_price_rejected() {
        let args = &RUN_ARGS[..RUN_ARGS.len() - 2];
        let err = Cli::try_parse_from(args).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let mut args = RUN_ARGS.to_vec();
        let idx = args.iter().position(|a| *a == "--min-price").unwrap();
        args[idx + 1] = "abc";
        let err = Cli::try_parse_from(args).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "clean",
            "run",
            "--input_artifact",
            "sample.csv:latest",
            "--output_artifact",
            "clean_sample.csv",
            "--output_type",
            "clean_sample",
            "--output_description",
            "cleaned",
            "--min_price",
            "-5",
            "--max_price",
            "350.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.output_artifact, "clean_sample.csv");
                assert_eq!(args.min_price, -5.0);
                assert_eq!(args.max_price, 350.5);
            }
            _ => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn test_error_message() {
        let err = CleanError::ArtifactNotFound("sample.csv:v3".into());
        assert_eq!(error_message(&err), "Error: Artifact not found: sample.csv:v3");
    }

    #[test]
    fn test_store_dir_is_global() {
        let mut args = RUN_ARGS.to_vec();
        args.extend(["--store-dir", "/tmp/artifacts"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/artifacts")));
    }
}
