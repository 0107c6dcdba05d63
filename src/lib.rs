pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::pipeline::{Pipeline, PipelineReport};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Compare {
        start_year: i32,
        end_year: i32,
        output: Option<PathBuf>,
    },
    Cache,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("yearly-growth starting...");

    let config = load_config(config_path)?;
    let store = store::open_default(&config)?;

    match command {
        AppCommand::Compare {
            start_year,
            end_year,
            output,
        } => {
            let provider = providers::TseHttpProvider::from_config(&config.providers.tse);
            let pipeline = Pipeline::from_config(&config, &provider, &store);
            cli::compare::run(&pipeline, start_year, end_year, output.as_deref()).await
        }
        AppCommand::Cache => cli::cache::run(&store).await,
    }
}

/// Single entry point for front ends: compares `start_year..=end_year` with the
/// configured provider and cache directory, reporting progress via `status`.
pub async fn run_pipeline<F>(
    config: &AppConfig,
    start_year: i32,
    end_year: i32,
    status: F,
) -> Result<PipelineReport>
where
    F: FnMut(&str),
{
    config.validate()?;
    let store = store::open_default(config)?;
    let provider = providers::TseHttpProvider::from_config(&config.providers.tse);
    Pipeline::from_config(config, &provider, &store)
        .run(start_year, end_year, status)
        .await
}
