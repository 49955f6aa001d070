//! Row filtering by ANDed predicate clauses
//!
//! Every clause is checked against the table schema before any row is
//! examined, so a bad filter never yields a silently empty result.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, ClaimsResult};
use crate::models::{columns, ClaimStatus, ALL_SENTINEL};
use crate::table::{Column, ColumnData, ColumnKind, Table};

/// One filter predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    /// Categorical equality; the `"All"` sentinel disables it
    Equals { column: String, value: String },
    /// Identifier lookup; the text must parse as an integer and is
    /// compared numerically, so "12" matches a padded "0000000012"
    IdentifierMatch { column: String, text: String },
    /// Inclusive date range, applied only when both bounds are set
    DateRange {
        column: String,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Rendered cell text must equal `value`
    ExactMatch { column: String, value: String },
}

impl Clause {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn identifier(column: impl Into<String>, text: impl Into<String>) -> Self {
        Clause::IdentifierMatch {
            column: column.into(),
            text: text.into(),
        }
    }

    pub fn date_range(column: impl Into<String>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Clause::DateRange {
            column: column.into(),
            from,
            to,
        }
    }

    pub fn exact(column: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::ExactMatch {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Clause::Equals { column, .. }
            | Clause::IdentifierMatch { column, .. }
            | Clause::DateRange { column, .. }
            | Clause::ExactMatch { column, .. } => column,
        }
    }

    /// `None` when the clause is inactive and filters nothing
    fn compile<'t>(&self, table: &'t Table) -> ClaimsResult<Option<Predicate<'t>>> {
        let column = table.require_column(self.column())?;

        match self {
            Clause::Equals { value, .. } => {
                if value == ALL_SENTINEL {
                    return Ok(None);
                }
                Ok(Some(Predicate::equal_text(column, value)))
            }
            Clause::ExactMatch { value, .. } => Ok(Some(Predicate::equal_text(column, value))),
            Clause::IdentifierMatch { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                let numeric = || {
                    text.parse::<i64>()
                        .map_err(|_| ClaimsError::type_coercion(column.name(), ColumnKind::Integer.describe(), text))
                };
                match column.data() {
                    ColumnData::Integer(data) => Ok(Some(Predicate::Integer { data, value: numeric()? })),
                    // padded ids such as "0000000012"
                    ColumnData::Text(data) => Ok(Some(Predicate::NumericText { data, value: numeric()? })),
                    ColumnData::Money(_) | ColumnData::Date(_) => Err(ClaimsError::type_coercion(
                        column.name(),
                        "an identifier column",
                        text,
                    )),
                }
            }
            Clause::DateRange { from, to, .. } => {
                let ColumnData::Date(data) = column.data() else {
                    return Err(ClaimsError::type_coercion(
                        column.name(),
                        ColumnKind::Date.describe(),
                        format!("{:?} column", column.kind()),
                    ));
                };
                match (from, to) {
                    (Some(from), Some(to)) => Ok(Some(Predicate::Dates {
                        data,
                        from: *from,
                        to: *to,
                    })),
                    _ => Ok(None),
                }
            }
        }
    }
}

enum Predicate<'t> {
    Text { data: &'t [String], value: String },
    Integer { data: &'t [i64], value: i64 },
    NumericText { data: &'t [String], value: i64 },
    Dates { data: &'t [NaiveDate], from: NaiveDate, to: NaiveDate },
    Rendered { column: &'t Column, value: String },
}

impl<'t> Predicate<'t> {
    fn equal_text(column: &'t Column, value: &str) -> Self {
        match column.data() {
            ColumnData::Text(data) => Predicate::Text {
                data,
                value: value.to_string(),
            },
            _ => Predicate::Rendered {
                column,
                value: value.to_string(),
            },
        }
    }

    fn test(&self, row: usize) -> bool {
        match self {
            Predicate::Text { data, value } => data.get(row).is_some_and(|cell| cell == value),
            Predicate::Integer { data, value } => data.get(row).is_some_and(|cell| cell == value),
            Predicate::NumericText { data, value } => data
                .get(row)
                .and_then(|cell| cell.trim().parse::<i64>().ok())
                .is_some_and(|cell| cell == *value),
            Predicate::Dates { data, from, to } => data.get(row).is_some_and(|cell| from <= cell && cell <= to),
            Predicate::Rendered { column, value } => column.get(row).is_some_and(|cell| cell.to_string() == *value),
        }
    }
}

/// Rows of `table` satisfying every clause, in their original order
///
/// # Errors
///
/// Returns [`ClaimsError::UnknownColumn`] or [`ClaimsError::TypeCoercion`]
/// for a clause that does not fit the table.
pub fn apply(table: &Table, clauses: &[Clause]) -> ClaimsResult<Table> {
    let predicates: Vec<Predicate<'_>> = clauses
        .iter()
        .map(|clause| clause.compile(table))
        .collect::<ClaimsResult<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    if predicates.is_empty() {
        return Ok(table.clone());
    }

    let matching: Vec<usize> = (0..table.row_count())
        .filter(|&row| predicates.iter().all(|p| p.test(row)))
        .collect();

    Ok(table.take(&matching))
}

/// Exact-match clauses for a column → value mapping
pub fn exact_matches(filters: &BTreeMap<String, String>) -> Vec<Clause> {
    filters
        .iter()
        .map(|(column, value)| Clause::exact(column.as_str(), value.as_str()))
        .collect()
}

/// The interactive filter controls of the claims view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterControls {
    pub status: Option<String>,
    pub provider_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterControls {
    /// Clauses for the active controls only
    ///
    /// An `"All"` status, a blank provider and a date range missing either
    /// bound produce no clause.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] for a status that is neither
    /// a known claim status nor `"All"`.
    pub fn clauses(&self) -> ClaimsResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        if let Some(status) = self.status.as_deref().map(str::trim) {
            if !status.is_empty() && !status.eq_ignore_ascii_case(ALL_SENTINEL) {
                let status: ClaimStatus = status.parse()?;
                clauses.push(Clause::equals(columns::CLAIM_STATUS, status.as_str()));
            }
        }
        if let Some(provider) = self.provider_id.as_deref().map(str::trim) {
            if !provider.is_empty() {
                clauses.push(Clause::identifier(columns::PROVIDER_ID, provider));
            }
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            clauses.push(Clause::date_range(columns::CLAIM_DATE, Some(from), Some(to)));
        }
        Ok(clauses)
    }
}
