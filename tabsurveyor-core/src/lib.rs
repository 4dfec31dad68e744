//! Core engine for tabsurveyor.
//!
//! This crate audits the integrity of named tabular datasets and summarizes
//! the distributions of their continuous columns. It is the read-only
//! engine shared by the `tabsurveyor` command line tool and any embedding
//! application.
//!
//! # Guarantees
//! - Every analysis borrows datasets read-only and returns fresh reports
//! - Reports hold no reference back to the datasets they describe
//! - Input is validated once, at the registry boundary
//!
//! # Architecture
//! - [`profile`]: row/column counts, column names and column types
//! - [`quality`]: duplicate keys, missing values, zero values
//! - [`stats`]: continuous distribution statistics and bin counts
//! - [`loader`]: JSON registry boundary

pub mod batch;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod profile;
pub mod quality;
pub mod registry;
pub mod stats;
pub mod validation;

// Re-export commonly used types
pub use batch::{AuditBatch, DatasetFailure};
pub use error::{Result, TabSurveyorError};
pub use loader::{
    dataset_from_json, load_primary_keys, load_primary_keys_file, load_registry,
    load_registry_file, load_registry_str, read_document,
};
pub use models::{ColumnSchema, ColumnType, Dataset, RecordTable, ScalarValue};
pub use profile::{
    DatasetColumns, DatasetProfile, DatasetShape, DatasetTypes, dataset_columns, dataset_shapes,
    dataset_types, profile_registry,
};
pub use quality::{AuditConfig, ConfigValidationError, QualityAuditor, QualityReport};
pub use registry::{DatasetRegistry, PrimaryKeySpec, PrimaryKeys};
pub use stats::{
    ContinuousStatistics, DistributionSummarizer, StatisticsTable, SummaryConfig, bin_count,
};
