//! `claimsim filter` command - filter an existing claims file.

use claims_engine::{ingest, FilterControls};
use colored::Colorize;
use config_engine::Settings;
use logger_redacted::PiiRedactor;
use tracing::info;

use super::{destination, log_filters, print_preview, write_table};
use crate::cli::FilterArgs;
use crate::error::CliResult;

/// Execute the `filter` command, returning `(source rows, written rows)`.
///
/// # Errors
///
/// Fails on an unsupported or malformed input file, a filter naming a
/// column the file lacks, or a value that does not fit its column.
pub fn execute(settings: &Settings, args: &FilterArgs) -> CliResult<(usize, usize)> {
    let redactor = PiiRedactor::from_logger_config(&settings.logging);
    info!(input = %redactor.redact(&args.input.display().to_string()), "Reading claims file");

    let source = ingest::read_path(&args.input)?;
    let controls = FilterControls::from(args.filters.clone());
    log_filters(&controls, &redactor);
    let table = claims_engine::filter::apply(&source, &controls.clauses()?)?;

    write_table(&table, args.output.as_deref())?;
    if let Some(preview) = args.preview {
        print_preview(&table, preview);
    }

    eprintln!(
        "{} {} of {} claims written to {}",
        "✓".bright_green(),
        table.row_count().to_string().bold(),
        source.row_count(),
        destination(args.output.as_deref()).bright_yellow()
    );
    Ok((source.row_count(), table.row_count()))
}
