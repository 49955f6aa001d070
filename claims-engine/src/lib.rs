//! # Claims Engine
//!
//! Synthetic healthcare claims datasets: generation, dimension extraction,
//! filtering, upload ingestion and CSV export.
//!
//! ## Pipeline
//!
//! ```text
//! GeneratorConfig ──► assembler ──► Table ──► filter ──► export
//!                                    │
//!                                    └──► dimensions (payors, diagnoses, facilities)
//! ```
//!
//! Uploaded CSV or JSON files enter through [`ingest`] and join the same
//! pipeline at the filter stage. A [`Session`] holds one source table and
//! its dimensions for as long as a user works with it.
//!
//! ## Example
//!
//! ```no_run
//! use claims_engine::{Clause, Session, Variant};
//!
//! let config = Variant::Classic.config();
//! let session = Session::generate(config.clone(), config.rows.default)?;
//! let csv = session.export(&[Clause::equals("Claim Status", "Paid")])?;
//! # Ok::<(), claims_engine::ClaimsError>(())
//! ```

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod ingest;
pub mod models;
pub mod session;
pub mod table;

pub use assembler::assemble;
pub use catalog::{DimensionCatalog, SyntheticCatalog};
pub use config::{
    CodeSource, DateWindow, DiagnosisColumn, ExhaustionPolicy, GeneratorConfig, IdFormat, PayorMode, RowBounds,
    StatusDistribution, Variant,
};
pub use dimensions::{DimensionKind, DimensionSet};
pub use error::{ClaimsError, ClaimsResult};
pub use export::{CSV_MIME, FILTERED_EXPORT_FILE_NAME, FULL_EXPORT_FILE_NAME};
pub use filter::{Clause, FilterControls};
pub use models::{ClaimStatus, ALL_SENTINEL};
pub use session::{Session, SessionOrigin, SessionSummary};
pub use table::{Column, ColumnData, ColumnKind, Table, Value};
