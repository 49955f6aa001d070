//! Column-oriented, immutable table shared by every stage of the pipeline

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, ClaimsResult};

/// Date format used at every boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Money(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Integer(_) => ColumnKind::Integer,
            Value::Money(_) => ColumnKind::Money,
            Value::Date(_) => ColumnKind::Date,
            Value::Text(_) => ColumnKind::Text,
        }
    }

    /// JSON representation used by the query endpoint; money stays a string
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Money(_) | Value::Date(_) | Value::Text(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Money(m) => write!(f, "{m:.2}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Money,
    Date,
    Text,
}

impl ColumnKind {
    pub fn describe(self) -> &'static str {
        match self {
            ColumnKind::Integer => "an integer",
            ColumnKind::Money => "a monetary amount",
            ColumnKind::Date => "a YYYY-MM-DD date",
            ColumnKind::Text => "text",
        }
    }
}

/// Typed storage for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<i64>),
    Money(Vec<Decimal>),
    Date(Vec<NaiveDate>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Money(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Money(_) => ColumnKind::Money,
            ColumnData::Date(_) => ColumnKind::Date,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Integer(v) => v.get(row).copied().map(Value::Integer),
            ColumnData::Money(v) => v.get(row).copied().map(Value::Money),
            ColumnData::Date(v) => v.get(row).copied().map(Value::Date),
            ColumnData::Text(v) => v.get(row).cloned().map(Value::Text),
        }
    }

    /// Gather the given rows, in the given order
    pub fn take(&self, indices: &[usize]) -> ColumnData {
        fn gather<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().filter_map(|&i| values.get(i).cloned()).collect()
        }

        match self {
            ColumnData::Integer(v) => ColumnData::Integer(gather(v, indices)),
            ColumnData::Money(v) => ColumnData::Money(gather(v, indices)),
            ColumnData::Date(v) => ColumnData::Date(gather(v, indices)),
            ColumnData::Text(v) => ColumnData::Text(gather(v, indices)),
        }
    }

    /// Build a column of `kind` from loose values, converting where lossless
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::TypeCoercion`] when a value cannot be represented.
    pub fn from_values(name: &str, kind: ColumnKind, values: Vec<Value>) -> ClaimsResult<ColumnData> {
        let mismatch = |value: &Value| ClaimsError::type_coercion(name, kind.describe(), value.to_string());

        match kind {
            ColumnKind::Integer => values
                .into_iter()
                .map(|value| match value {
                    Value::Integer(i) => Ok(i),
                    Value::Text(ref s) => s.parse::<i64>().map_err(|_| mismatch(&value)),
                    other => Err(mismatch(&other)),
                })
                .collect::<ClaimsResult<Vec<_>>>()
                .map(ColumnData::Integer),
            ColumnKind::Money => values
                .into_iter()
                .map(|value| match value {
                    Value::Money(m) => Ok(m),
                    Value::Integer(i) => Ok(Decimal::from(i)),
                    other => Err(mismatch(&other)),
                })
                .collect::<ClaimsResult<Vec<_>>>()
                .map(ColumnData::Money),
            ColumnKind::Date => values
                .into_iter()
                .map(|value| match value {
                    Value::Date(d) => Ok(d),
                    Value::Text(ref s) => NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| mismatch(&value)),
                    other => Err(mismatch(&other)),
                })
                .collect::<ClaimsResult<Vec<_>>>()
                .map(ColumnData::Date),
            ColumnKind::Text => Ok(ColumnData::Text(values.into_iter().map(|v| v.to_string()).collect())),
        }
    }

    fn append(&mut self, other: ColumnData) -> Result<(), ColumnKind> {
        match (self, other) {
            (ColumnData::Integer(a), ColumnData::Integer(b)) => a.extend(b),
            (ColumnData::Money(a), ColumnData::Money(b)) => a.extend(b),
            (ColumnData::Date(a), ColumnData::Date(b)) => a.extend(b),
            (ColumnData::Text(a), ColumnData::Text(b)) => a.extend(b),
            (_, other) => return Err(other.kind()),
        }
        Ok(())
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        self.data.get(row)
    }
}

/// Ordered set of equally long, uniquely named columns
///
/// Tables are never modified in place; filtering and permuting build new
/// tables so a held source can be re-filtered any number of times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] for ragged or duplicate columns.
    pub fn new(columns: Vec<Column>) -> ClaimsResult<Self> {
        let rows = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != rows {
                return Err(ClaimsError::configuration(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    rows
                )));
            }
            if !seen.insert(column.name()) {
                return Err(ClaimsError::configuration(format!(
                    "duplicate column '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// # Errors
    ///
    /// Returns [`ClaimsError::UnknownColumn`] when no column has that name.
    pub fn require_column(&self, name: &str) -> ClaimsResult<&Column> {
        self.column(name)
            .ok_or_else(|| ClaimsError::UnknownColumn(name.to_string()))
    }

    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.rows {
            return None;
        }
        self.columns.iter().map(|c| c.get(index)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.rows).filter_map(move |i| self.row(i))
    }

    /// Rows as column-keyed JSON objects, in column order
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.name().to_string(), value.to_json()))
                    .collect()
            })
            .collect()
    }

    /// New table holding the given rows; every column uses the same indices
    pub fn take(&self, indices: &[usize]) -> Table {
        let valid: Vec<usize> = indices.iter().copied().filter(|&i| i < self.rows).collect();
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name(), c.data().take(&valid)))
                .collect(),
            rows: valid.len(),
        }
    }

    /// First `n` rows, used for previews
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..self.rows.min(n)).collect();
        self.take(&indices)
    }

    /// Append the rows of `other`, which must have the same schema
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] when names or kinds differ.
    pub fn concat(self, other: Table) -> ClaimsResult<Table> {
        if self.headers() != other.headers() {
            return Err(ClaimsError::configuration(
                "cannot concatenate tables with different columns",
            ));
        }

        let rows = self.rows + other.rows;
        let mut columns = self.columns;
        for (column, extra) in columns.iter_mut().zip(other.columns) {
            column.data.append(extra.data).map_err(|kind| {
                ClaimsError::configuration(format!(
                    "column '{}' is {:?} but the appended rows are {:?}",
                    column.name, column.data.kind(), kind
                ))
            })?;
        }

        Ok(Table { columns, rows })
    }
}
