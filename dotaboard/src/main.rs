use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve cached reads, health, sync and crawl endpoints
    Serve,
    /// Run one crawl over the roster and exit
    Crawl,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match config::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(path = ?cli.config, error = %err, "Could not load config");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        CliCommand::Serve => {
            if let Err(err) = tracker::serve(config).await {
                tracing::error!(error = %err, "Service failed");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        CliCommand::Crawl => match tracker::crawl_once(config).await {
            Ok(summary) if summary.is_degraded() => {
                tracing::error!(
                    success = summary.success,
                    failed = summary.failed,
                    "Crawl degraded: more failures than successes"
                );
                ExitCode::FAILURE
            }
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!(error = %err, "Crawl failed");
                ExitCode::FAILURE
            }
        },
    }
}
