use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use yearly_growth::AppCommand;
use yearly_growth::cli::setup;
use yearly_growth::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compare cumulative growth of inflation, USD, the equal-weight index and a stock
    Compare {
        /// First year of the comparison, e.g. 1399
        #[arg(short, long)]
        start: i32,
        /// Last year of the comparison (inclusive), e.g. 1402
        #[arg(short, long)]
        end: i32,
        /// Also write the aligned table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the years cached for each series
    Cache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => setup::setup(),
        Some(Commands::Compare { start, end, output }) => {
            let command = AppCommand::Compare {
                start_year: start,
                end_year: end,
                output,
            };
            yearly_growth::run_command(command, config_path).await
        }
        Some(Commands::Cache) => yearly_growth::run_command(AppCommand::Cache, config_path).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
