//! A generated or uploaded dataset held for the lifetime of a user session

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::assembler;
use crate::catalog::{DimensionCatalog, SyntheticCatalog};
use crate::config::GeneratorConfig;
use crate::dimensions::{self, DimensionKind, DimensionSet};
use crate::error::ClaimsResult;
use crate::export;
use crate::filter::{self, Clause};
use crate::ingest;
use crate::table::{ColumnKind, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOrigin {
    Generated { variant: String },
    Uploaded { file_name: String },
}

/// Immutable source table plus everything derived from it
///
/// Filters always run against the held source, never against a previous
/// filter result.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    origin: SessionOrigin,
    created_at: DateTime<Utc>,
    config: Option<GeneratorConfig>,
    fact: Arc<Table>,
    dimensions: Option<Arc<DimensionSet>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub origin: SessionOrigin,
    pub created_at: DateTime<Utc>,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub dimensions: BTreeMap<DimensionKind, usize>,
}

impl Session {
    /// Generate with today's date, a thread-local RNG and the bundled catalog
    ///
    /// # Errors
    ///
    /// See [`assembler::assemble`] and [`dimensions::extract`].
    pub fn generate(config: GeneratorConfig, rows: usize) -> ClaimsResult<Self> {
        Self::generate_with(
            config,
            rows,
            Local::now().date_naive(),
            &mut rand::thread_rng(),
            &SyntheticCatalog::new(),
        )
    }

    /// # Errors
    ///
    /// See [`assembler::assemble`] and [`dimensions::extract`].
    pub fn generate_with<R: Rng + ?Sized>(
        config: GeneratorConfig,
        rows: usize,
        today: NaiveDate,
        rng: &mut R,
        catalog: &dyn DimensionCatalog,
    ) -> ClaimsResult<Self> {
        let started = Instant::now();
        let fact = assembler::assemble(&config, rows, today, rng)?;
        let dimensions = if config.dimensions {
            Some(Arc::new(dimensions::extract(&fact, catalog)?))
        } else {
            None
        };

        let session = Self {
            id: Uuid::new_v4(),
            origin: SessionOrigin::Generated {
                variant: config.name.clone(),
            },
            created_at: Utc::now(),
            config: Some(config),
            fact: Arc::new(fact),
            dimensions,
        };

        info!(
            session_id = %session.id,
            variant = %session.variant().unwrap_or_default(),
            rows,
            dimensions = session.dimensions.is_some(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Generated claims dataset"
        );
        Ok(session)
    }

    /// # Errors
    ///
    /// See [`ingest::read_bytes`].
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> ClaimsResult<Self> {
        let fact = ingest::read_bytes(file_name, bytes)?;
        let session = Self {
            id: Uuid::new_v4(),
            origin: SessionOrigin::Uploaded {
                file_name: file_name.to_string(),
            },
            created_at: Utc::now(),
            config: None,
            fact: Arc::new(fact),
            dimensions: None,
        };

        info!(
            session_id = %session.id,
            rows = session.fact.row_count(),
            columns = session.fact.column_count(),
            "Ingested uploaded dataset"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn origin(&self) -> &SessionOrigin {
        &self.origin
    }

    fn variant(&self) -> Option<&str> {
        match &self.origin {
            SessionOrigin::Generated { variant } => Some(variant),
            SessionOrigin::Uploaded { .. } => None,
        }
    }

    pub fn config(&self) -> Option<&GeneratorConfig> {
        self.config.as_ref()
    }

    pub fn fact(&self) -> &Table {
        &self.fact
    }

    pub fn dimensions(&self) -> Option<&DimensionSet> {
        self.dimensions.as_deref()
    }

    pub fn dimension(&self, kind: DimensionKind) -> Option<&Table> {
        self.dimensions().map(|set| set.get(kind))
    }

    /// # Errors
    ///
    /// See [`filter::apply`].
    pub fn filter(&self, clauses: &[Clause]) -> ClaimsResult<Table> {
        filter::apply(&self.fact, clauses)
    }

    /// Rows matching every `column == value` pair, as JSON objects
    ///
    /// # Errors
    ///
    /// See [`filter::apply`].
    pub fn query(
        &self,
        filters: &BTreeMap<String, String>,
    ) -> ClaimsResult<Vec<serde_json::Map<String, serde_json::Value>>> {
        let matched = filter::apply(&self.fact, &filter::exact_matches(filters))?;
        Ok(matched.to_records())
    }

    /// CSV bytes of the filtered table
    ///
    /// # Errors
    ///
    /// See [`filter::apply`] and [`export::to_csv_bytes`].
    pub fn export(&self, clauses: &[Clause]) -> ClaimsResult<Vec<u8>> {
        export::to_csv_bytes(&self.filter(clauses)?)
    }

    pub fn summary(&self) -> SessionSummary {
        let dimensions = self
            .dimensions()
            .map(|set| {
                DimensionKind::ALL
                    .into_iter()
                    .map(|kind| (kind, set.get(kind).row_count()))
                    .collect()
            })
            .unwrap_or_default();

        SessionSummary {
            id: self.id,
            origin: self.origin.clone(),
            created_at: self.created_at,
            rows: self.fact.row_count(),
            columns: self
                .fact
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name().to_string(),
                    kind: c.kind(),
                })
                .collect(),
            dimensions,
        }
    }
}
