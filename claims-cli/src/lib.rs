//! `claimsim` - command-line front end for the claims simulator
//!
//! # Commands
//!
//! - `claimsim variants` - list generator presets and their row limits
//! - `claimsim generate` - generate a dataset, optionally filtered, as CSV
//! - `claimsim filter` - filter an existing CSV or JSON claims file
//!
//! # Examples
//!
//! ```bash
//! # 5000 classic claims, paid only, into a file
//! claimsim generate --variant classic --rows 5000 --status Paid -o paid.csv
//!
//! # Dimensional dataset with its payor, diagnosis and facility tables
//! claimsim generate --variant dimensional --dimensions-dir dims/ -o claims.csv
//!
//! # One provider's claims from an earlier export
//! claimsim filter --input claims.csv --provider-id 0000001234 --preview 10
//! ```
//!
//! CSV goes to stdout when `--output` is omitted; progress, previews and
//! logs go to stderr.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Commands};
pub use error::{CliError, CliResult};

use config_engine::Settings;

/// Load settings, install logging, and run the chosen subcommand
///
/// # Errors
///
/// Returns the first [`CliError`] raised by configuration, logging setup or
/// the command itself.
pub fn run(cli: Cli) -> CliResult<()> {
    let settings = config_engine::load_settings(cli.config.as_deref())?;
    logger_redacted::init(&settings.logging.clone().verbose(cli.verbose))?;
    tracing::debug!(command = ?cli.command, "Starting claimsim");
    dispatch(&settings, &cli.command)
}

/// Run a subcommand against already-loaded settings
///
/// # Errors
///
/// See [`commands::generate::execute`] and [`commands::filter::execute`].
pub fn dispatch(settings: &Settings, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Variants => commands::variants::execute(),
        Commands::Generate(args) => {
            commands::generate::execute(settings, args)?;
        }
        Commands::Filter(args) => {
            commands::filter::execute(settings, args)?;
        }
    }
    Ok(())
}
