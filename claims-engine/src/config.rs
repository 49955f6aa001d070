//! Generator configuration
//!
//! Every difference between dataset variants lives here as data: id
//! formatting, the diagnosis column name, code pools, payor handling, row
//! bounds and value ranges. One generator reproduces any variant from its
//! config alone.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, ClaimsResult};
use crate::models::columns;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Number of distinct values in the range
    pub fn capacity(&self) -> u64 {
        if self.max < self.min {
            return 0;
        }
        self.max.abs_diff(self.min).saturating_add(1)
    }

    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] when `min > max`.
    pub fn validate(&self, field: &str) -> ClaimsResult<()> {
        if self.min > self.max {
            return Err(ClaimsError::configuration(format!(
                "{field}: range minimum {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive monetary range in currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRange {
    pub low: Decimal,
    pub high: Decimal,
}

impl MoneyRange {
    pub fn new(low: i64, high: i64) -> Self {
        Self {
            low: Decimal::from(low),
            high: Decimal::from(high),
        }
    }

    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] for negative or inverted ranges.
    pub fn validate(&self, field: &str) -> ClaimsResult<()> {
        if self.low.is_sign_negative() {
            return Err(ClaimsError::configuration(format!(
                "{field}: monetary amounts cannot be negative (low = {})",
                self.low
            )));
        }
        if self.low > self.high {
            return Err(ClaimsError::configuration(format!(
                "{field}: low {} exceeds high {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Historical window for claim dates; `end: None` means today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] when the window is empty.
    pub fn resolve(&self, today: NaiveDate) -> ClaimsResult<(NaiveDate, NaiveDate)> {
        let end = self.end.unwrap_or(today);
        if self.start > end {
            return Err(ClaimsError::configuration(format!(
                "claim date window starts {} after it ends {}",
                self.start, end
            )));
        }
        Ok((self.start, end))
    }
}

/// How identifier columns are rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdFormat {
    /// Integers drawn from per-field ranges
    SmallInteger {
        provider: IntRange,
        facility: IntRange,
        payor: IntRange,
        patient: IntRange,
    },
    /// Zero-padded numeric strings of a fixed width
    Padded { width: u32 },
}

impl IdFormat {
    pub fn classic() -> Self {
        IdFormat::SmallInteger {
            provider: IntRange::new(1000, 9999),
            facility: IntRange::new(2000, 9999),
            payor: IntRange::new(3000, 9999),
            patient: IntRange::new(4000, 9999),
        }
    }
}

/// Header used for the diagnosis column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisColumn {
    DiagnosisCode,
    Icd10,
}

impl DiagnosisColumn {
    pub fn header(self) -> &'static str {
        match self {
            DiagnosisColumn::DiagnosisCode => columns::DIAGNOSIS_CODE,
            DiagnosisColumn::Icd10 => columns::ICD10,
        }
    }
}

/// What to do when a unique pool is larger than its code space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Fail with [`ClaimsError::CatalogExhaustion`]
    Fail,
    /// Fill the shortfall with placeholder codes outside the code space
    Pad,
    /// Fill the shortfall by reusing genuine codes
    AllowDuplicates,
}

/// Where a code column draws its values from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeSource {
    /// A fresh draw for every row
    PerRow,
    /// Rows share a pool of `size` unique codes
    Pool { size: usize, policy: ExhaustionPolicy },
}

/// Claim status distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusDistribution {
    Uniform,
    Weighted { paid: f64, denied: f64, pending: f64 },
}

impl StatusDistribution {
    pub fn standard_weighted() -> Self {
        StatusDistribution::Weighted {
            paid: 0.7,
            denied: 0.2,
            pending: 0.1,
        }
    }
}

/// Payor column handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayorMode {
    /// Payor ids follow [`IdFormat`]; no name column
    Range,
    /// Government/private mix from the payor catalog, with a name column
    Catalog { government_share: f64 },
}

/// Day offsets for the derived date columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOffsets {
    /// Days subtracted from the claim date to get the service start
    pub service_start_lag: IntRange,
    /// Days added to the service start to get the service end
    pub service_duration: IntRange,
    /// Days added to the claim date to get the payment date
    pub payment_lag: IntRange,
}

impl Default for DateOffsets {
    fn default() -> Self {
        Self {
            service_start_lag: IntRange::new(0, 30),
            service_duration: IntRange::new(1, 10),
            payment_lag: IntRange::new(1, 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRanges {
    pub amount_billed: MoneyRange,
    pub amount_paid: MoneyRange,
    pub adjustments: MoneyRange,
    pub deductibles: MoneyRange,
    pub co_pays: MoneyRange,
}

impl Default for MoneyRanges {
    fn default() -> Self {
        Self {
            amount_billed: MoneyRange::new(100, 5000),
            amount_paid: MoneyRange::new(0, 5000),
            adjustments: MoneyRange::new(0, 500),
            deductibles: MoneyRange::new(0, 500),
            co_pays: MoneyRange::new(0, 500),
        }
    }
}

/// Row-count control bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBounds {
    pub min: usize,
    pub max: usize,
    pub default: usize,
    pub step: usize,
}

impl RowBounds {
    /// Bounds that only ever allow one row count
    pub const fn fixed(rows: usize) -> Self {
        Self {
            min: rows,
            max: rows,
            default: rows,
            step: 1,
        }
    }

    /// Accepts `min`, every `step` above it, and `max` itself
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::RowCountOutOfBounds`] outside `min..=max` and
    /// [`ClaimsError::Configuration`] for a count between two steps.
    pub fn check(&self, rows: usize) -> ClaimsResult<()> {
        if rows < self.min || rows > self.max {
            return Err(ClaimsError::RowCountOutOfBounds {
                requested: rows,
                min: self.min,
                max: self.max,
            });
        }
        let off_step = self.step > 1 && rows != self.max && (rows - self.min) % self.step != 0;
        if off_step {
            return Err(ClaimsError::configuration(format!(
                "row count {rows} must be {} plus a multiple of {}",
                self.min, self.step
            )));
        }
        Ok(())
    }

    fn validate(&self) -> ClaimsResult<()> {
        if self.min == 0 {
            return Err(ClaimsError::configuration("row bounds: minimum must be at least 1"));
        }
        if self.min > self.max || self.default < self.min || self.default > self.max {
            return Err(ClaimsError::configuration(format!(
                "row bounds: expected min <= default <= max, got {} / {} / {}",
                self.min, self.default, self.max
            )));
        }
        if self.step == 0 {
            return Err(ClaimsError::configuration("row bounds: step must be positive"));
        }
        Ok(())
    }
}

/// Complete description of one dataset variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub name: String,
    pub rows: RowBounds,
    pub window: DateWindow,
    pub ids: IdFormat,
    pub payors: PayorMode,
    pub diagnosis_column: DiagnosisColumn,
    pub diagnosis_codes: CodeSource,
    pub facility_ids: CodeSource,
    pub age: IntRange,
    pub status: StatusDistribution,
    #[serde(default)]
    pub offsets: DateOffsets,
    #[serde(default)]
    pub money: MoneyRanges,
    /// Build payor/diagnosis/facility dimension tables alongside the facts
    #[serde(default)]
    pub dimensions: bool,
}

impl GeneratorConfig {
    /// Check every range and cross-field rule before any value is drawn
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Configuration`] describing the first problem.
    pub fn validate(&self, today: NaiveDate) -> ClaimsResult<()> {
        self.rows.validate()?;
        self.window.resolve(today)?;
        self.age.validate("age")?;

        match &self.ids {
            IdFormat::SmallInteger {
                provider,
                facility,
                payor,
                patient,
            } => {
                provider.validate("provider id")?;
                facility.validate("facility id")?;
                payor.validate("payor id")?;
                patient.validate("patient id")?;
            }
            IdFormat::Padded { width } => {
                if !(1..=18).contains(width) {
                    return Err(ClaimsError::configuration(format!(
                        "padded id width must be between 1 and 18, got {width}"
                    )));
                }
            }
        }

        if let PayorMode::Catalog { government_share } = self.payors {
            if !(0.0..=1.0).contains(&government_share) {
                return Err(ClaimsError::configuration(format!(
                    "government payor share must be within [0, 1], got {government_share}"
                )));
            }
        }

        if let StatusDistribution::Weighted { paid, denied, pending } = self.status {
            validate_weights(&[paid, denied, pending])?;
        }

        for (field, source) in [("diagnosis codes", self.diagnosis_codes), ("facility ids", self.facility_ids)] {
            if let CodeSource::Pool { size: 0, .. } = source {
                return Err(ClaimsError::configuration(format!("{field}: pool size must be positive")));
            }
        }

        let offsets = &self.offsets;
        offsets.service_start_lag.validate("service start lag")?;
        offsets.service_duration.validate("service duration")?;
        offsets.payment_lag.validate("payment lag")?;
        if offsets.service_start_lag.min < 0 {
            return Err(ClaimsError::configuration(
                "service start lag cannot be negative: service must start on or before the claim date",
            ));
        }
        if offsets.service_duration.min < 0 {
            return Err(ClaimsError::configuration(
                "service duration cannot be negative: service cannot end before it starts",
            ));
        }
        if offsets.payment_lag.min < 1 {
            return Err(ClaimsError::configuration(
                "payment lag must be at least one day: payment follows the claim date",
            ));
        }

        let money = &self.money;
        money.amount_billed.validate("amount billed")?;
        money.amount_paid.validate("amount paid")?;
        money.adjustments.validate("adjustments")?;
        money.deductibles.validate("deductibles")?;
        money.co_pays.validate("co-pays")?;

        Ok(())
    }
}

/// # Errors
///
/// Returns [`ClaimsError::Configuration`] unless the weights are
/// non-negative and sum to 1.
pub fn validate_weights(weights: &[f64]) -> ClaimsResult<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ClaimsError::configuration(format!(
            "weights must be finite and non-negative, got {weights:?}"
        )));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ClaimsError::configuration(format!(
            "weights must sum to 1, got {total}"
        )));
    }
    Ok(())
}

/// Preset dataset variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Small integer ids, uniform statuses, decade-long window
    Classic,
    /// Padded ids, weighted statuses, government/private payor mix
    PayorMix,
    /// Payor mix plus pooled codes and dimension tables
    Dimensional,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::PayorMix, Variant::Dimensional];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::PayorMix => "payor-mix",
            Variant::Dimensional => "dimensional",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Classic => "Small integer ids, uniform claim statuses, claims since 2014",
            Variant::PayorMix => "Padded ids, weighted statuses, 30% government / 70% private payors",
            Variant::Dimensional => "Payor mix with pooled ICD-10 and facility codes plus dimension tables",
        }
    }

    pub fn config(self) -> GeneratorConfig {
        match self {
            Variant::Classic => GeneratorConfig {
                name: self.name().to_string(),
                rows: RowBounds {
                    min: 1000,
                    max: 1_252_249,
                    default: 10_000,
                    step: 1000,
                },
                window: DateWindow {
                    start: ymd(2014, 1, 1),
                    end: None,
                },
                ids: IdFormat::classic(),
                payors: PayorMode::Range,
                diagnosis_column: DiagnosisColumn::DiagnosisCode,
                diagnosis_codes: CodeSource::PerRow,
                facility_ids: CodeSource::PerRow,
                age: IntRange::new(1, 99),
                status: StatusDistribution::Uniform,
                offsets: DateOffsets::default(),
                money: MoneyRanges::default(),
                dimensions: false,
            },
            Variant::PayorMix => GeneratorConfig {
                name: self.name().to_string(),
                rows: RowBounds::fixed(377_000),
                window: DateWindow {
                    start: ymd(2019, 1, 1),
                    end: None,
                },
                ids: IdFormat::Padded { width: 10 },
                payors: PayorMode::Catalog { government_share: 0.3 },
                diagnosis_column: DiagnosisColumn::Icd10,
                diagnosis_codes: CodeSource::PerRow,
                facility_ids: CodeSource::PerRow,
                age: IntRange::new(1, 99),
                status: StatusDistribution::standard_weighted(),
                offsets: DateOffsets::default(),
                money: MoneyRanges::default(),
                dimensions: false,
            },
            Variant::Dimensional => GeneratorConfig {
                name: self.name().to_string(),
                rows: RowBounds {
                    min: 1000,
                    max: 500_000,
                    default: 50_000,
                    step: 1000,
                },
                diagnosis_codes: CodeSource::Pool {
                    size: 500,
                    policy: ExhaustionPolicy::Pad,
                },
                facility_ids: CodeSource::Pool {
                    size: 200,
                    policy: ExhaustionPolicy::Pad,
                },
                dimensions: true,
                ..Variant::PayorMix.config()
            }
            .renamed(self.name()),
        }
    }
}

impl GeneratorConfig {
    fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClaimsError::UnknownVariant(s.to_string()))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
