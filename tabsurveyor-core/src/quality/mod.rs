//! Dataset integrity auditing.
//!
//! Three independent, read-only checks per dataset:
//! - **Duplicates**: records repeating an earlier record's primary key
//! - **Missing values**: absent cells per column
//! - **Zero values**: cells equal to zero in numeric columns
//!
//! # Example
//! ```rust,ignore
//! use tabsurveyor_core::quality::{AuditConfig, QualityAuditor};
//!
//! let auditor = QualityAuditor::new(AuditConfig::default());
//! let report = auditor.audit("orders", dataset, keys.get("orders"))?;
//! if report.duplicates.is_some_and(|d| d.is_clean()) {
//!     println!("dataset orders has no duplicates");
//! }
//! ```

mod analyzer;
mod completeness;
mod config;
mod models;
mod uniqueness;
mod zeros;

// Re-export public API
pub use analyzer::QualityAuditor;
pub use completeness::{audit_missing, check_missing};
pub use config::{AuditConfig, ConfigValidationError, EnabledChecks};
pub use models::{
    ColumnMissing, ColumnZeros, DuplicateReport, MissingValueReport, QualityReport,
    ThresholdViolation, ViolationSeverity, ZeroValueReport,
};
pub use uniqueness::{audit_duplicates, check_duplicates};
pub use zeros::{audit_zeros, check_zeros};
