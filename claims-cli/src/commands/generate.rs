//! `claimsim generate` command - build a dataset from a variant preset.

use std::fs;
use std::path::{Path, PathBuf};

use claims_engine::{export, DimensionKind, FilterControls, Session};
use colored::Colorize;
use config_engine::Settings;
use logger_redacted::PiiRedactor;
use tracing::info;

use super::{destination, log_filters, print_preview, spinner, write_table};
use crate::cli::GenerateArgs;
use crate::error::{CliError, CliResult};

/// What a generate run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub generated: usize,
    pub written: usize,
    pub dimension_files: Vec<PathBuf>,
}

/// Execute the `generate` command.
///
/// # Errors
///
/// Fails on an out-of-range row count, a filter that does not fit its
/// column, pool exhaustion under the fail policy, or an unwritable output.
pub fn execute(settings: &Settings, args: &GenerateArgs) -> CliResult<GenerateOutcome> {
    let variant = args.variant.unwrap_or(settings.generator.variant);
    let config = settings.generator.config_for(variant);
    let rows = settings.generator.rows_for(variant, args.rows);

    if args.dimensions_dir.is_some() && !config.dimensions {
        return Err(CliError::NoDimensions(variant.to_string()));
    }

    let controls = FilterControls::from(args.filters.clone());
    let clauses = controls.clauses()?;

    let pb = spinner(format!("Generating {rows} {variant} claims..."));
    let generated = Session::generate(config, rows);
    pb.finish_and_clear();
    let session = generated?;

    log_filters(&controls, &PiiRedactor::from_logger_config(&settings.logging));
    let table = session.filter(&clauses)?;

    write_table(&table, args.output.as_deref())?;

    let dimension_files = match &args.dimensions_dir {
        Some(dir) => write_dimensions(&session, dir)?,
        None => Vec::new(),
    };

    if let Some(preview) = args.preview {
        print_preview(&table, preview);
    }

    info!(
        session_id = %session.id(),
        generated = rows,
        written = table.row_count(),
        "Generate finished"
    );
    eprintln!(
        "{} {} of {} claims written to {}",
        "✓".bright_green(),
        table.row_count().to_string().bold(),
        rows,
        destination(args.output.as_deref()).bright_yellow()
    );

    Ok(GenerateOutcome {
        generated: rows,
        written: table.row_count(),
        dimension_files,
    })
}

fn write_dimensions(session: &Session, dir: &Path) -> CliResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(DimensionKind::ALL.len());
    for kind in DimensionKind::ALL {
        let Some(table) = session.dimension(kind) else {
            continue;
        };
        let path = dir.join(kind.file_name());
        fs::write(&path, export::to_csv_bytes(table)?)?;
        eprintln!(
            "  {} {} {} rows -> {}",
            "•".dimmed(),
            kind.as_str(),
            table.row_count(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
