use std::fs;

use clap::Parser;
use claims_cli::commands::{filter, generate};
use claims_cli::{dispatch, Cli, CliError, Commands};
use claims_engine::{ClaimsError, Variant};
use config_engine::Settings;
use error_common::Reportable;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("claimsim").chain(args.iter().copied())).unwrap()
}

fn csv_rows(path: &std::path::Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let records = reader.records().map(Result::unwrap).collect();
    (headers, records)
}

#[test]
fn test_generate_arguments_parse() {
    let cli = parse(&[
        "generate",
        "--variant",
        "dimensional",
        "--rows",
        "2000",
        "--status",
        "Paid",
        "--from",
        "2020-01-01",
        "-o",
        "out.csv",
        "--verbose",
    ]);

    assert!(cli.verbose);
    let Commands::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.variant, Some(Variant::Dimensional));
    assert_eq!(args.rows, Some(2000));
    assert_eq!(args.filters.status.as_deref(), Some("Paid"));
    assert_eq!(args.filters.from.map(|d| d.to_string()).as_deref(), Some("2020-01-01"));
}

#[test]
fn test_unknown_variant_is_rejected_by_the_parser() {
    let result = Cli::try_parse_from(["claimsim", "generate", "--variant", "quantum"]);
    assert!(result.is_err());
}

#[test]
fn test_generate_writes_filtered_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("claims.csv");
    let cli = parse(&[
        "generate",
        "--variant",
        "classic",
        "--rows",
        "1000",
        "--status",
        "Denied",
        "--output",
        output.to_str().unwrap(),
    ]);
    let Commands::Generate(args) = &cli.command else {
        panic!("expected generate");
    };

    let outcome = generate::execute(&Settings::default(), args).unwrap();
    assert_eq!(outcome.generated, 1000);
    assert!(outcome.dimension_files.is_empty());

    let (headers, records) = csv_rows(&output);
    assert_eq!(headers.first().map(String::as_str), Some("Claim ID"));
    assert_eq!(records.len(), outcome.written);
    let status = headers.iter().position(|h| h == "Claim Status").unwrap();
    assert!(records.iter().all(|r| &r[status] == "Denied"));
}

#[test]
fn test_dimensional_generate_writes_dimension_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("claims.csv");
    let dims = dir.path().join("dims");
    let cli = parse(&[
        "generate",
        "--variant",
        "dimensional",
        "--rows",
        "1000",
        "--output",
        output.to_str().unwrap(),
        "--dimensions-dir",
        dims.to_str().unwrap(),
    ]);

    dispatch(&Settings::default(), &cli.command).unwrap();

    for name in ["payor_dimension.csv", "icd_dimension.csv", "facility_dimension.csv"] {
        assert!(dims.join(name).exists(), "{name} missing");
    }
    let (headers, payors) = csv_rows(&dims.join("payor_dimension.csv"));
    assert_eq!(headers, vec!["Payor ID", "Payor Name", "Is Government"]);
    assert!(payors.iter().any(|r| &r[0] == "0000000001" && &r[2] == "true"));
}

#[test]
fn test_dimensions_dir_requires_a_dimensional_variant() {
    let dir = tempfile::tempdir().unwrap();
    let cli = parse(&[
        "generate",
        "--variant",
        "classic",
        "--rows",
        "1000",
        "--dimensions-dir",
        dir.path().to_str().unwrap(),
    ]);

    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert!(matches!(err, CliError::NoDimensions(_)));
    assert_eq!(err.code(), "GEN_1001");
}

#[test]
fn test_row_count_outside_bounds_is_reported() {
    let cli = parse(&["generate", "--variant", "classic", "--rows", "5"]);
    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert!(matches!(
        err,
        CliError::Claims(ClaimsError::RowCountOutOfBounds { requested: 5, .. })
    ));
    assert_eq!(err.code(), "GEN_1002");
}

#[test]
fn test_filter_reads_and_filters_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("claims.csv");
    let output = dir.path().join("filtered.csv");
    fs::write(
        &input,
        "Claim ID,Provider ID,Claim Status,Claim Date\n\
         C1000001,1001,Paid,2019-01-02\n\
         C1000002,1002,Denied,2019-01-03\n\
         C1000003,1001,Paid,2019-03-04\n",
    )
    .unwrap();

    let cli = parse(&[
        "filter",
        "--input",
        input.to_str().unwrap(),
        "--provider-id",
        "1001",
        "--from",
        "2019-01-01",
        "--to",
        "2019-02-01",
        "--output",
        output.to_str().unwrap(),
    ]);
    let Commands::Filter(args) = &cli.command else {
        panic!("expected filter");
    };

    let (source, written) = filter::execute(&Settings::default(), args).unwrap();
    assert_eq!((source, written), (3, 1));
    let (_, records) = csv_rows(&output);
    assert_eq!(&records[0][0], "C1000001");
}

#[test]
fn test_filter_with_non_numeric_provider_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("claims.json");
    fs::write(&input, r#"[{"Provider ID": 1001, "Claim Status": "Paid"}]"#).unwrap();

    let cli = parse(&["filter", "--input", input.to_str().unwrap(), "--provider-id", "abc"]);
    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert_eq!(err.code(), "FILTER_2001");
}

#[test]
fn test_filter_rejects_unsupported_files() {
    let cli = parse(&["filter", "--input", "claims.xlsx"]);
    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert_eq!(err.code(), "INGEST_3001");
}

#[test]
fn test_unknown_status_fails_before_generating() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("claims.csv");
    let cli = parse(&[
        "generate",
        "--variant",
        "classic",
        "--rows",
        "1000",
        "--status",
        "Payed",
        "--output",
        output.to_str().unwrap(),
    ]);

    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert!(matches!(err, CliError::Claims(ClaimsError::Configuration(_))));
    assert_eq!(err.code(), "GEN_1001");
    assert!(!output.exists());
}

#[test]
fn test_row_count_between_steps_is_rejected() {
    let cli = parse(&["generate", "--variant", "classic", "--rows", "1500"]);
    let err = dispatch(&Settings::default(), &cli.command).unwrap_err();
    assert!(matches!(err, CliError::Claims(ClaimsError::Configuration(_))));
}
