//! Command-line interface definitions.

pub mod config;
pub mod output;
pub mod quote;
pub mod sources;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::domain::MarketSide;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Default configuration path, used when present.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Fillroute - liquidity path construction and quote optimization.
#[derive(Parser, Debug)]
#[command(name = "fillroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted and
    /// config.toml does not exist)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Quote a request fixture
    Quote(QuoteArgs),

    /// List liquidity sources and their flags
    Sources(SourcesArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `fillroute config`
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate the configuration file
    Check,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// JSON request fixture (request, curves, fillable overrides)
    #[arg(short, long)]
    pub request: PathBuf,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sources` subcommand.
#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// Trade side to evaluate filters for
    #[arg(long, default_value = "sell")]
    pub side: MarketSide,
}

/// Load the configuration named on the command line, or `config.toml` if it
/// exists, or the defaults.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or is invalid.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns the first error raised by the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Quote(args) => {
            let config = load_config(config_path)?;
            config.init_logging();
            quote::execute(&config, &args).await
        }
        Commands::Sources(args) => {
            let config = load_config(config_path)?;
            sources::execute(&config, args.side)
        }
        Commands::Config(ConfigCommand::Check) => config::execute_check(config_path),
    }
}
