#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line client for the LISA analysis service.
//!
//! Lists datasets, runs analyses with a validated configuration, and
//! classifies result collections offline with the same diverging scale
//! the map uses.

mod config;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lisa_map_choropleth::{AttributeDomain, DivergingClassifier, PaletteSet};
use lisa_map_client::{AnalysisSession, ApiClient};
use lisa_map_interaction::InteractionController;

use crate::config::ConfigArgs;

#[derive(Parser)]
#[command(name = "lisa_map", about = "Local spatial autocorrelation map client")]
struct Cli {
    /// Base URL of the analysis service (defaults to `LISA_MAP_API_BASE`,
    /// then `http://localhost:8000`)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// TOML file with `positive`, `negative` and `default_color` palettes
    #[arg(long, global = true)]
    palettes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List uploaded datasets
    Files,
    /// Print a dataset's column names
    Headers {
        /// Dataset ID
        id: String,
    },
    /// Validate a configuration and run the analysis
    Run {
        /// Dataset ID
        id: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Fetch and summarise the most recent cached result
    Cached {
        /// Attribute to classify
        #[arg(long)]
        variable: Option<String>,
    },
    /// Print legend segments for a domain
    Legend {
        #[arg(long, allow_negative_numbers = true)]
        min: f64,
        #[arg(long, allow_negative_numbers = true)]
        max: f64,
    },
    /// Classify a local GeoJSON file and print each feature's color
    Render {
        /// GeoJSON `FeatureCollection` (or array of them)
        file: PathBuf,
        /// Attribute to classify
        #[arg(long)]
        variable: String,
        /// Property preferred for feature labels
        #[arg(long)]
        label_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let palettes = match &cli.palettes {
        Some(path) => PaletteSet::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => PaletteSet::default(),
    };
    let classifier = DivergingClassifier::new(palettes);
    let api = cli
        .api_base
        .as_deref()
        .map_or_else(ApiClient::from_env, ApiClient::new);
    log::debug!("Using analysis service at {}", api.base_url());

    match cli.command {
        Commands::Files => {
            let files = api.list_files().await?;
            println!("{:<10} FILE", "ID");
            println!("{}", "-".repeat(40));
            for file in &files {
                println!("{:<10} {}", file.id, file.file_name);
            }
        }
        Commands::Headers { id } => {
            for column in api.fetch_headers(&id).await? {
                println!("{column}");
            }
        }
        Commands::Run { id, config } => {
            let mut session = AnalysisSession::new();
            let ticket = session.select_dataset(&id);
            let headers = api.fetch_headers(&id).await;
            session.commit_headers(&ticket, headers);

            for action in config.into_actions()? {
                session.dispatch(action);
            }

            let run = match session.begin_run() {
                Ok(run) => run,
                Err(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    return Err(format!("{} invalid field(s)", errors.len()).into());
                }
            };

            let outcome = api.run_analysis(&run.dataset_id, &run.config).await;
            session.finish_run(&run.ticket, outcome);
            if let Some(message) = session.run_error() {
                return Err(message.to_string().into());
            }

            println!("Saved result: {}", api.saved_result_url(&id));
            report::print_result(
                &classifier,
                session.result(),
                Some(session.config().variable.as_str()),
            );
        }
        Commands::Cached { variable } => {
            let result = api.fetch_cache().await?;
            report::print_result(&classifier, result.as_ref(), variable.as_deref());
        }
        Commands::Legend { min, max } => {
            report::print_legend(&classifier.legend(AttributeDomain::new(min, max)));
        }
        Commands::Render {
            file,
            variable,
            label_key,
        } => {
            let body = std::fs::read_to_string(&file)?;
            let Some(collection) = lisa_map_payload::normalize_str(&body) else {
                return Err(
                    format!("{} is not a GeoJSON FeatureCollection", file.display()).into(),
                );
            };
            let controller =
                InteractionController::new(classifier, collection, variable, label_key);
            report::print_features(&controller)?;
            report::print_legend(&controller.legend());
        }
    }

    Ok(())
}
