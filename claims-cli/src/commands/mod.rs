//! Subcommand implementations and their shared output helpers

pub mod filter;
pub mod generate;
pub mod variants;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use claims_engine::export;
use claims_engine::{FilterControls, Table};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use logger_redacted::PiiRedactor;
use tracing::info;

use crate::error::CliResult;

/// Spinner on stderr while a long step runs
pub(crate) fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Write `table` as CSV to `output`, or to stdout when no path is given
pub(crate) fn write_table(table: &Table, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            export::write_csv(table, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            export::write_csv(table, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// First `rows` rows as an aligned text block on stderr
pub(crate) fn print_preview(table: &Table, rows: usize) {
    let head = table.head(rows);
    let headers = head.headers();
    let cells: Vec<Vec<String>> = head
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    eprintln!("{}", line(headers).bold());
    for row in &cells {
        eprintln!("{}", line(row.iter().map(String::as_str).collect()));
    }
    eprintln!(
        "{}",
        format!("({} of {} rows)", head.row_count(), table.row_count()).dimmed()
    );
}

/// Log the active filters with user-typed values redacted
pub(crate) fn log_filters(controls: &FilterControls, redactor: &PiiRedactor) {
    info!(
        status = controls.status.as_deref().unwrap_or("-"),
        provider_id = %controls.provider_id.as_deref().map(|p| redactor.redact(p)).unwrap_or_default(),
        date_from = ?controls.date_from,
        date_to = ?controls.date_to,
        "Applying filters"
    );
}

pub(crate) fn destination(output: Option<&Path>) -> String {
    output.map_or_else(|| "stdout".to_string(), |path| path.display().to_string())
}
