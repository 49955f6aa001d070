use std::process::ExitCode;

use clap::Parser;
use claims_cli::Cli;
use colored::Colorize;
use error_common::{report_error, AppError};

fn main() -> ExitCode {
    // .env is optional; CLAIMSIM_* variables may come from the shell instead
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match claims_cli::run(cli).map_err(|e| AppError::from_reportable(&e)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let report = report_error("claimsim", &error);
            eprintln!("{} {}", "error:".bright_red().bold(), report);
            ExitCode::FAILURE
        }
    }
}
