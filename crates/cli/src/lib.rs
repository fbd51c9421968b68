pub mod commands;
pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fuelquote_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "fuelquote",
    about = "Fuel reseller pricing and quotation CLI",
    long_about = "Maintain the catalogue price ledger and client directory, compute itemized \
                  cost/price breakdowns, and render price quotations.",
    after_help = "Examples:\n  fuelquote save-price --date 2025-01-01 --price 1.500\n  \
                  fuelquote price --client \"RD Trans\" --purchase 1.20\n  \
                  fuelquote quote --client \"RD Trans\" --purchase 1.20 --volume 30000"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Path to a fuelquote.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "URL", help = "Override the sqlite database URL")]
    db: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(name = "save-price", about = "Save a catalogue price for an effective date")]
    SavePrice(commands::save_price::SavePriceArgs),
    #[command(about = "Show the catalogue price history and the current price")]
    History,
    #[command(name = "save-client", about = "Add or update a client record in the directory")]
    SaveClient(commands::save_client::SaveClientArgs),
    #[command(about = "List all clients in the directory")]
    Clients,
    #[command(about = "Compute an itemized cost/price breakdown")]
    Price(commands::price::PriceArgs),
    #[command(about = "Compute a breakdown and render the quotation text")]
    Quote(commands::quote::QuoteArgs),
    #[command(about = "Inspect effective configuration values")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { database_url: cli.db.clone(), log_level: None },
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration issue: {error}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    let result = match &cli.command {
        Command::Migrate => commands::migrate::run(&config),
        Command::SavePrice(args) => commands::save_price::run(&config, args),
        Command::History => commands::history::run(&config),
        Command::SaveClient(args) => commands::save_client::run(&config, args),
        Command::Clients => commands::clients::run(&config),
        Command::Price(args) => commands::price::run(&config, args),
        Command::Quote(args) => commands::quote::run(&config, args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&config) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use fuelquote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
