use std::io::Write;

use crate::error::ClaimsResult;
use crate::table::Table;

pub const CSV_MIME: &str = "text/csv";
pub const FULL_EXPORT_FILE_NAME: &str = "healthcare_claims_data.csv";
pub const FILTERED_EXPORT_FILE_NAME: &str = "filtered_healthcare_claims_data.csv";

/// Write `table` as RFC 4180 CSV: one header row, one line per row
///
/// # Errors
///
/// Returns an I/O or CSV error from the underlying writer.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> ClaimsResult<()> {
    if table.column_count() == 0 {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.headers())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(ToString::to_string))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns a CSV error if a record cannot be encoded.
pub fn to_csv_bytes(table: &Table) -> ClaimsResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn table() -> Table {
        Table::new(vec![
            Column::new("Payor Name", ColumnData::Text(vec!["Blue Cross, Blue Shield".into(), "Aetna".into()])),
            Column::new("Amount Billed", ColumnData::Money(vec![Decimal::new(150_000, 2), Decimal::new(999, 2)])),
            Column::new(
                "Claim Date",
                ColumnData::Date(vec![
                    NaiveDate::from_ymd_opt(2019, 1, 5).unwrap(),
                    NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let text = String::from_utf8(to_csv_bytes(&table()).unwrap()).unwrap();
        assert_eq!(
            text,
            "Payor Name,Amount Billed,Claim Date\n\"Blue Cross, Blue Shield\",1500.00,2019-01-05\nAetna,9.99,2020-12-31\n"
        );
    }

    #[test]
    fn test_headers_survive_a_reader() {
        let bytes = to_csv_bytes(&table()).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["Payor Name", "Amount Billed", "Claim Date"]);
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_header_only_for_empty_rows() {
        let empty = table().take(&[]);
        let text = String::from_utf8(to_csv_bytes(&empty).unwrap()).unwrap();
        assert_eq!(text, "Payor Name,Amount Billed,Claim Date\n");
    }

    #[test]
    fn test_table_without_columns_writes_nothing() {
        assert!(to_csv_bytes(&Table::default()).unwrap().is_empty());
    }
}
