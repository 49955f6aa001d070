//! Normalized reference tables derived from a fact table
//!
//! One row per distinct key, in first-seen order, with attributes from a
//! [`DimensionCatalog`]. The payor dimension always contains the fixed
//! government payors even when the fact table never references them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::DimensionCatalog;
use crate::error::{ClaimsError, ClaimsResult};
use crate::models::{columns, GOVERNMENT_PAYORS};
use crate::table::{Column, ColumnData, Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Payors,
    Diagnoses,
    Facilities,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 3] = [DimensionKind::Payors, DimensionKind::Diagnoses, DimensionKind::Facilities];

    pub fn as_str(self) -> &'static str {
        match self {
            DimensionKind::Payors => "payors",
            DimensionKind::Diagnoses => "diagnoses",
            DimensionKind::Facilities => "facilities",
        }
    }

    /// Default export file name
    pub fn file_name(self) -> &'static str {
        match self {
            DimensionKind::Payors => "payor_dimension.csv",
            DimensionKind::Diagnoses => "icd_dimension.csv",
            DimensionKind::Facilities => "facility_dimension.csv",
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionKind {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DimensionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClaimsError::configuration(format!("unknown dimension '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSet {
    pub payors: Table,
    pub diagnoses: Table,
    pub facilities: Table,
}

impl DimensionSet {
    pub fn get(&self, kind: DimensionKind) -> &Table {
        match kind {
            DimensionKind::Payors => &self.payors,
            DimensionKind::Diagnoses => &self.diagnoses,
            DimensionKind::Facilities => &self.facilities,
        }
    }
}

/// Build all three dimension tables from `fact`
///
/// # Errors
///
/// Returns [`ClaimsError::Configuration`] when the fact table lacks a key
/// column.
pub fn extract(fact: &Table, catalog: &dyn DimensionCatalog) -> ClaimsResult<DimensionSet> {
    let set = DimensionSet {
        payors: payor_dimension(fact, catalog)?,
        diagnoses: diagnosis_dimension(fact, catalog)?,
        facilities: facility_dimension(fact, catalog)?,
    };
    debug!(
        payors = set.payors.row_count(),
        diagnoses = set.diagnoses.row_count(),
        facilities = set.facilities.row_count(),
        "Extracted dimensions"
    );
    Ok(set)
}

fn key_column<'t>(fact: &'t Table, name: &str) -> ClaimsResult<&'t Column> {
    fact.column(name).ok_or_else(|| {
        ClaimsError::configuration(format!("fact table has no '{name}' column to build a dimension from"))
    })
}

fn distinct(column: &Column) -> Vec<Value> {
    let mut seen = HashSet::new();
    (0..column.len())
        .filter_map(|row| column.get(row))
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Convert a fixed key into the kind used by the fact column
fn coerce_key(column: &Column, key: &str) -> ClaimsResult<Value> {
    ColumnData::from_values(column.name(), column.kind(), vec![Value::Text(key.to_string())])?
        .get(0)
        .ok_or_else(|| ClaimsError::configuration(format!("could not convert key '{key}'")))
}

fn payor_dimension(fact: &Table, catalog: &dyn DimensionCatalog) -> ClaimsResult<Table> {
    let ids = key_column(fact, columns::PAYOR_ID)?;

    let mut fact_names: HashMap<Value, String> = HashMap::new();
    if let Some(names) = fact.column(columns::PAYOR_NAME) {
        for row in 0..fact.row_count() {
            if let (Some(id), Some(name)) = (ids.get(row), names.get(row)) {
                fact_names.entry(id).or_insert_with(|| name.to_string());
            }
        }
    }

    let mut keys = distinct(ids);
    let mut seen: HashSet<Value> = keys.iter().cloned().collect();
    let mut government = HashMap::new();
    for payor in GOVERNMENT_PAYORS {
        let key = coerce_key(ids, payor.id)?;
        government.insert(key.clone(), payor.name);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    let mut names = Vec::with_capacity(keys.len());
    let mut flags = Vec::with_capacity(keys.len());
    for key in &keys {
        let name = fact_names
            .get(key)
            .cloned()
            .or_else(|| government.get(key).map(|name| (*name).to_string()))
            .unwrap_or_else(|| catalog.payor_name(&key.to_string()));
        names.push(name);
        flags.push(government.contains_key(key).to_string());
    }

    Table::new(vec![
        Column::new(columns::PAYOR_ID, ColumnData::from_values(columns::PAYOR_ID, ids.kind(), keys)?),
        Column::new(columns::PAYOR_NAME, ColumnData::Text(names)),
        Column::new(columns::IS_GOVERNMENT, ColumnData::Text(flags)),
    ])
}

fn diagnosis_dimension(fact: &Table, catalog: &dyn DimensionCatalog) -> ClaimsResult<Table> {
    let codes = fact
        .column(columns::ICD10)
        .or_else(|| fact.column(columns::DIAGNOSIS_CODE))
        .ok_or_else(|| ClaimsError::configuration("fact table has no diagnosis column to build a dimension from"))?;

    let keys = distinct(codes);
    let (descriptions, categories): (Vec<String>, Vec<String>) = keys
        .iter()
        .map(|key| {
            let attributes = catalog.diagnosis(&key.to_string());
            (attributes.description, attributes.category)
        })
        .unzip();

    Table::new(vec![
        Column::new(codes.name(), ColumnData::from_values(codes.name(), codes.kind(), keys)?),
        Column::new(columns::DESCRIPTION, ColumnData::Text(descriptions)),
        Column::new(columns::CATEGORY, ColumnData::Text(categories)),
    ])
}

fn facility_dimension(fact: &Table, catalog: &dyn DimensionCatalog) -> ClaimsResult<Table> {
    let ids = key_column(fact, columns::FACILITY_ID)?;
    let keys = distinct(ids);

    let mut names = Vec::with_capacity(keys.len());
    let mut types = Vec::with_capacity(keys.len());
    let mut states = Vec::with_capacity(keys.len());
    for key in &keys {
        let attributes = catalog.facility(&key.to_string());
        names.push(attributes.name);
        types.push(attributes.facility_type);
        states.push(attributes.state);
    }

    Table::new(vec![
        Column::new(columns::FACILITY_ID, ColumnData::from_values(columns::FACILITY_ID, ids.kind(), keys)?),
        Column::new(columns::FACILITY_NAME, ColumnData::Text(names)),
        Column::new(columns::FACILITY_TYPE, ColumnData::Text(types)),
        Column::new(columns::STATE, ColumnData::Text(states)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SyntheticCatalog;

    fn text(values: &[&str]) -> ColumnData {
        ColumnData::Text(values.iter().map(|v| (*v).to_string()).collect())
    }

    fn fact() -> Table {
        Table::new(vec![
            Column::new("Facility ID", text(&["0000000100", "0000000200", "0000000100"])),
            Column::new("Payor ID", text(&["0000000001", "5550001111", "5550001111"])),
            Column::new("Payor Name", text(&["Medicare", "Aetna", "Aetna"])),
            Column::new("ICD-10", text(&["D101", "D101", "D202"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_payor_dimension_unions_government_payors() {
        let set = extract(&fact(), &SyntheticCatalog::new()).unwrap();
        let payors = &set.payors;

        assert_eq!(payors.headers(), vec!["Payor ID", "Payor Name", "Is Government"]);
        assert_eq!(payors.row_count(), 3);
        assert_eq!(
            payors.row(1).unwrap(),
            vec![
                Value::Text("5550001111".into()),
                Value::Text("Aetna".into()),
                Value::Text("false".into())
            ]
        );
        assert_eq!(
            payors.row(2).unwrap(),
            vec![
                Value::Text("0000000002".into()),
                Value::Text("Medicaid".into()),
                Value::Text("true".into())
            ]
        );
    }

    #[test]
    fn test_dimensions_are_deduplicated_in_first_seen_order() {
        let set = extract(&fact(), &SyntheticCatalog::new()).unwrap();
        assert_eq!(set.diagnoses.row_count(), 2);
        assert_eq!(set.diagnoses.row(0).unwrap()[0], Value::Text("D101".into()));
        assert_eq!(set.facilities.row_count(), 2);
        assert_eq!(
            set.facilities.headers(),
            vec!["Facility ID", "Facility Name", "Facility Type", "State"]
        );
    }

    #[test]
    fn test_integer_payor_ids_keep_their_kind() {
        let fact = Table::new(vec![
            Column::new("Facility ID", ColumnData::Integer(vec![2001])),
            Column::new("Payor ID", ColumnData::Integer(vec![3001])),
            Column::new("Diagnosis Code", text(&["D300"])),
        ])
        .unwrap();

        let set = extract(&fact, &SyntheticCatalog::new()).unwrap();
        assert_eq!(set.payors.row_count(), 3);
        assert_eq!(set.payors.row(1).unwrap()[0], Value::Integer(1));
        assert_eq!(set.diagnoses.headers().first(), Some(&"Diagnosis Code"));
    }

    #[test]
    fn test_missing_key_column_is_a_configuration_error() {
        let fact = Table::new(vec![Column::new("Payor ID", text(&["1"]))]).unwrap();
        assert!(matches!(
            extract(&fact, &SyntheticCatalog::new()),
            Err(ClaimsError::Configuration(_))
        ));
    }

    #[test]
    fn test_dimension_kind_parses() {
        assert_eq!("Payors".parse::<DimensionKind>().unwrap(), DimensionKind::Payors);
        assert!("providers".parse::<DimensionKind>().is_err());
    }
}
