use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;
use cli::app::Commands;
use cli::commands::{map, settings, sheets, suggest};
use subchassis_mapper::config::Config;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            cli::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_path = Config::get_log_path().unwrap_or_else(|_| PathBuf::from("subchassis-mapper.log"));
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting subchassis-mapper {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Map(args) => map::map_command(args),
        Commands::Sheets(args) => sheets::sheets_command(args),
        Commands::Suggest(args) => suggest::suggest_command(args),
        Commands::Settings(args) => settings::settings_command(args),
    }
}
