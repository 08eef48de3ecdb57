pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tablewise_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use tablewise_core::ApplicationError;
use tracing::info;
use uuid::Uuid;

use crate::commands::predict::PredictArgs;
use crate::commands::rank::RankArgs;
use crate::commands::watch::WatchArgs;
use crate::commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "tablewise",
    about = "Tablewise restaurant recommendation CLI",
    long_about = "Rank venues against a diner's preferences and estimate table wait times from live occupancy.",
    after_help = "Examples:\n  tablewise rank --profile profile.json --venues venues.json --top-n 5\n  tablewise predict --seated 72 --capacity 80 --dining-minutes 90 --hour 20 --day 6\n  tablewise watch --snapshot occupancy.json --ticks 3\n  tablewise config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a tablewise.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level for this invocation")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score and rank venues for a preference profile")]
    Rank(RankArgs),
    #[command(about = "Predict the wait time for one occupancy reading")]
    Predict(PredictArgs),
    #[command(about = "Poll an occupancy snapshot file and stream wait-time predictions")]
    Watch(WatchArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let overrides =
        ConfigOverrides { log_level: cli.log_level.clone(), ..ConfigOverrides::default() };
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: overrides.clone(),
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error);
            let result = CommandResult::failure("startup", error.error_class(), error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    logging::init(&config.logging);

    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "cli.command.started",
        correlation_id = %correlation_id,
        command = command_name(&cli.command),
        "tablewise command started"
    );

    let result = match &cli.command {
        Command::Rank(args) => commands::rank::run(&config, args),
        Command::Predict(args) => commands::predict::run(&config, args),
        Command::Watch(args) => commands::watch::run(&config, args, |line| println!("{line}")),
        Command::Config => commands::config::run(&config, cli.config.as_deref(), &overrides),
    };

    info!(
        event_name = "cli.command.finished",
        correlation_id = %correlation_id,
        exit_code = result.exit_code,
        "tablewise command finished"
    );

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Rank(_) => "rank",
        Command::Predict(_) => "predict",
        Command::Watch(_) => "watch",
        Command::Config => "config",
    }
}
