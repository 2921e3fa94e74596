use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mediscan_migrator::backend::domain::MigratorError;
use mediscan_migrator::backend::io::{self, Cli, MigratorConfig, USAGE};
use mediscan_migrator::run_migration;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(MigratorError::CONFIGURATION_EXIT_CODE);
        }
    };

    let config = match MigratorConfig::from_env(cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(MigratorError::CONFIGURATION_EXIT_CODE);
        }
    };

    match run_migration(&config).await {
        Ok(outcome) => {
            let stdout = std::io::stdout();
            if let Err(e) = io::render(&outcome, &mut stdout.lock()) {
                error!("Failed to write report: {}", e);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match &e {
                MigratorError::Configuration(_) => error!("Error loading service account: {}", e),
                MigratorError::Fatal(_) => error!("Migration failed: {:#}", e),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
