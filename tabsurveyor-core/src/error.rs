//! Error types for tabsurveyor operations.
//!
//! All computations in the engine are pure scans over already-loaded data, so
//! there is no transient failure mode and nothing is retried. Errors are
//! raised synchronously to the immediate caller.

use thiserror::Error;

/// Main error type for tabsurveyor operations.
#[derive(Debug, Error)]
pub enum TabSurveyorError {
    /// An input claimed to be a dataset (or a numeric column) is not one
    #[error("Type mismatch: {context}")]
    TypeMismatch {
        /// What was expected and where
        context: String,
    },

    /// Missing primary key spec, unknown column or invalid setting
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the problem
        message: String,
    },

    /// Out-of-domain numeric input
    #[error("Domain error: {message}")]
    Domain {
        /// Description of the offending input
        message: String,
    },

    /// A statistic is not well-defined for the column's values
    #[error(
        "Insufficient data in column '{column}': {reason} (required {required}, found {found})"
    )]
    InsufficientData {
        /// Column that could not be summarized
        column: String,
        /// Which statistic is undefined and why
        reason: String,
        /// Minimum number of usable values
        required: usize,
        /// Usable values present
        found: usize,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// Operation and path
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// Document being parsed or written
        context: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with TabSurveyorError
pub type Result<T> = std::result::Result<T, TabSurveyorError>;

impl TabSurveyorError {
    /// Creates a type mismatch error
    pub fn type_mismatch(context: impl Into<String>) -> Self {
        Self::TypeMismatch {
            context: context.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a domain error
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Creates an insufficient data error for a column.
    ///
    /// # Arguments
    /// * `column` - Name of the column that could not be summarized
    /// * `reason` - Which statistic is undefined and why
    /// * `required` - Minimum number of usable values
    /// * `found` - Number of usable values actually present
    pub fn insufficient_data(
        column: impl Into<String>,
        reason: impl Into<String>,
        required: usize,
        found: usize,
    ) -> Self {
        Self::InsufficientData {
            column: column.into(),
            reason: reason.into(),
            required,
            found,
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true when the error is a caller-side configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
