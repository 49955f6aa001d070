//! Combines generated columns into one claims table
//!
//! Cross-column rules live here: derived dates follow the claim date, and
//! payor-catalog variants build the government and private sub-populations
//! separately before a single shuffle interleaves them.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{CodeSource, GeneratorConfig, IdFormat, IntRange, PayorMode, StatusDistribution};
use crate::error::ClaimsResult;
use crate::fields::{self, Categorical, CodeDomain, Direction};
use crate::models::{columns, ClaimStatus, Gender, GovernmentPayor, GOVERNMENT_PAYORS, PRIVATE_PAYORS};
use crate::table::{Column, ColumnData, Table};

/// Width of catalog payor ids regardless of the configured id format
const CATALOG_PAYOR_ID_WIDTH: u32 = 10;

/// Generate `rows` claim records described by `config`
///
/// # Errors
///
/// Fails with a configuration error before drawing anything when the
/// config is invalid or `rows` lies outside its row bounds. Pool
/// exhaustion under a `Fail` policy surfaces as
/// [`ClaimsError::CatalogExhaustion`](crate::ClaimsError::CatalogExhaustion).
pub fn assemble<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rows: usize,
    today: NaiveDate,
    rng: &mut R,
) -> ClaimsResult<Table> {
    config.validate(today)?;
    config.rows.check(rows)?;

    let (start, end) = config.window.resolve(today)?;
    let assembler = Assembler::new(config, start, end, rng)?;

    match config.payors {
        PayorMode::Range => assembler.block(rng, rows, PayorBlock::Range),
        PayorMode::Catalog { government_share } => {
            let government = government_rows(rows, government_share);
            debug!(rows, government, private = rows - government, "Generating payor sub-populations");

            let table = assembler
                .block(rng, government, PayorBlock::Government)?
                .concat(assembler.block(rng, rows - government, PayorBlock::Private)?)?;

            let mut order: Vec<usize> = (0..table.row_count()).collect();
            order.shuffle(rng);
            Ok(table.take(&order))
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn government_rows(rows: usize, share: f64) -> usize {
    ((rows as f64) * share).floor().clamp(0.0, rows as f64) as usize
}

#[derive(Debug, Clone, Copy)]
enum PayorBlock {
    Range,
    Government,
    Private,
}

#[derive(Debug, Clone, Copy)]
enum IdField {
    Provider,
    Facility,
    Payor,
    Patient,
}

struct Assembler<'a> {
    config: &'a GeneratorConfig,
    start: NaiveDate,
    end: NaiveDate,
    diagnosis_pool: Option<Vec<String>>,
    facility_pool: Option<Vec<i64>>,
    status: Categorical<ClaimStatus>,
    gender: Categorical<Gender>,
}

impl<'a> Assembler<'a> {
    /// Pools are drawn once per run so every sub-population shares them
    fn new<R: Rng + ?Sized>(
        config: &'a GeneratorConfig,
        start: NaiveDate,
        end: NaiveDate,
        rng: &mut R,
    ) -> ClaimsResult<Self> {
        let diagnosis_pool = match config.diagnosis_codes {
            CodeSource::PerRow => None,
            CodeSource::Pool { size, policy } => Some(
                fields::unique_pool(rng, size, CodeDomain::DIAGNOSIS.range, policy)?
                    .into_iter()
                    .map(|value| CodeDomain::DIAGNOSIS.render(value))
                    .collect(),
            ),
        };

        let facility_pool = match config.facility_ids {
            CodeSource::PerRow => None,
            CodeSource::Pool { size, policy } => Some(fields::unique_pool(
                rng,
                size,
                id_range(&config.ids, IdField::Facility)?,
                policy,
            )?),
        };

        let status = match config.status {
            StatusDistribution::Uniform => Categorical::uniform(ClaimStatus::ALL.to_vec())?,
            StatusDistribution::Weighted { paid, denied, pending } => {
                Categorical::weighted(ClaimStatus::ALL.to_vec(), &[paid, denied, pending])?
            }
        };

        Ok(Self {
            config,
            start,
            end,
            diagnosis_pool,
            facility_pool,
            status,
            gender: Categorical::uniform(Gender::ALL.to_vec())?,
        })
    }

    fn block<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, payors: PayorBlock) -> ClaimsResult<Table> {
        let config = self.config;
        let claim_dates = fields::dates_between(rng, n, self.start, self.end)?;
        let service_start = fields::offset_dates(
            rng,
            &claim_dates,
            config.offsets.service_start_lag,
            Direction::Backward,
        )?;
        let service_end = fields::offset_dates(rng, &service_start, config.offsets.service_duration, Direction::Forward)?;
        let payment = fields::offset_dates(rng, &claim_dates, config.offsets.payment_lag, Direction::Forward)?;

        let mut fact_columns = vec![
            Column::new(columns::CLAIM_ID, ColumnData::Text(fields::codes(rng, n, CodeDomain::CLAIM)?)),
            Column::new(columns::CLAIM_DATE, ColumnData::Date(claim_dates)),
            Column::new(columns::PROVIDER_ID, self.ids(rng, n, IdField::Provider)?),
            Column::new(columns::FACILITY_ID, self.facilities(rng, n)?),
        ];
        fact_columns.extend(self.payor_columns(rng, n, payors)?);
        fact_columns.extend([
            Column::new(columns::PATIENT_ID, self.ids(rng, n, IdField::Patient)?),
            Column::new(
                columns::GENDER,
                ColumnData::Text(self.gender.sample(rng, n).into_iter().map(|g| g.as_str().to_string()).collect()),
            ),
            Column::new(columns::AGE, ColumnData::Integer(fields::integers(rng, n, config.age)?)),
            Column::new(config.diagnosis_column.header(), self.diagnoses(rng, n)?),
            Column::new(columns::PROCEDURE_CODE, ColumnData::Text(fields::codes(rng, n, CodeDomain::PROCEDURE)?)),
            Column::new(columns::AMOUNT_BILLED, ColumnData::Money(fields::money(rng, n, config.money.amount_billed)?)),
            Column::new(columns::AMOUNT_PAID, ColumnData::Money(fields::money(rng, n, config.money.amount_paid)?)),
            Column::new(
                columns::CLAIM_STATUS,
                ColumnData::Text(self.status.sample(rng, n).into_iter().map(|s| s.as_str().to_string()).collect()),
            ),
            Column::new(columns::SERVICE_DATE_START, ColumnData::Date(service_start)),
            Column::new(columns::SERVICE_DATE_END, ColumnData::Date(service_end)),
            Column::new(columns::PAYMENT_DATE, ColumnData::Date(payment)),
            Column::new(columns::ADJUSTMENTS, ColumnData::Money(fields::money(rng, n, config.money.adjustments)?)),
            Column::new(columns::DEDUCTIBLES, ColumnData::Money(fields::money(rng, n, config.money.deductibles)?)),
            Column::new(columns::CO_PAYS, ColumnData::Money(fields::money(rng, n, config.money.co_pays)?)),
        ]);

        Table::new(fact_columns)
    }

    fn ids<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, field: IdField) -> ClaimsResult<ColumnData> {
        let values = fields::integers(rng, n, id_range(&self.config.ids, field)?)?;
        render_ids(&self.config.ids, values)
    }

    fn facilities<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> ClaimsResult<ColumnData> {
        match &self.facility_pool {
            Some(pool) => render_ids(&self.config.ids, fields::draw_from_pool(rng, n, pool)?),
            None => self.ids(rng, n, IdField::Facility),
        }
    }

    fn diagnoses<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> ClaimsResult<ColumnData> {
        let codes = match &self.diagnosis_pool {
            Some(pool) => fields::draw_from_pool(rng, n, pool)?,
            None => fields::codes(rng, n, CodeDomain::DIAGNOSIS)?,
        };
        Ok(ColumnData::Text(codes))
    }

    fn payor_columns<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, block: PayorBlock) -> ClaimsResult<Vec<Column>> {
        let (ids, names): (Vec<String>, Vec<String>) = match block {
            PayorBlock::Range => {
                return Ok(vec![Column::new(columns::PAYOR_ID, self.ids(rng, n, IdField::Payor)?)]);
            }
            PayorBlock::Government => {
                let payors: Vec<GovernmentPayor> = Categorical::uniform(GOVERNMENT_PAYORS.to_vec())?.sample(rng, n);
                payors
                    .into_iter()
                    .map(|payor| (payor.id.to_string(), payor.name.to_string()))
                    .unzip()
            }
            PayorBlock::Private => {
                let names = Categorical::uniform(PRIVATE_PAYORS.to_vec())?.sample(rng, n);
                let mut pairs = Vec::with_capacity(n);
                for name in names {
                    pairs.push((fields::padded_id(rng, CATALOG_PAYOR_ID_WIDTH)?, name.to_string()));
                }
                pairs.into_iter().unzip()
            }
        };

        Ok(vec![
            Column::new(columns::PAYOR_ID, ColumnData::Text(ids)),
            Column::new(columns::PAYOR_NAME, ColumnData::Text(names)),
        ])
    }
}

fn id_range(format: &IdFormat, field: IdField) -> ClaimsResult<IntRange> {
    match format {
        IdFormat::SmallInteger {
            provider,
            facility,
            payor,
            patient,
        } => Ok(match field {
            IdField::Provider => *provider,
            IdField::Facility => *facility,
            IdField::Payor => *payor,
            IdField::Patient => *patient,
        }),
        IdFormat::Padded { width } => Ok(CodeDomain::padded(*width)?.range),
    }
}

fn render_ids(format: &IdFormat, values: Vec<i64>) -> ClaimsResult<ColumnData> {
    match format {
        IdFormat::SmallInteger { .. } => Ok(ColumnData::Integer(values)),
        IdFormat::Padded { width } => {
            let domain = CodeDomain::padded(*width)?;
            Ok(ColumnData::Text(values.into_iter().map(|v| domain.render(v)).collect()))
        }
    }
}
