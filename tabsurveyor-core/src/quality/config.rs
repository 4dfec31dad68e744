//! Integrity audit configuration.
//!
//! Selects which checks run, how datasets without a primary key are treated,
//! and the maximum percentages above which a finding becomes a
//! [`ThresholdViolation`](super::ThresholdViolation).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which integrity checks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledChecks {
    /// Duplicate primary key detection
    pub duplicates: bool,
    /// Missing-value counting
    pub missing: bool,
    /// Zero-value counting on numeric columns
    pub zeros: bool,
}

impl Default for EnabledChecks {
    fn default() -> Self {
        Self {
            duplicates: true,
            missing: true,
            zeros: true,
        }
    }
}

impl EnabledChecks {
    /// All checks enabled.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder method to enable/disable the duplicate check.
    pub fn with_duplicates(mut self, enabled: bool) -> Self {
        self.duplicates = enabled;
        self
    }

    /// Builder method to enable/disable the missing-value check.
    pub fn with_missing(mut self, enabled: bool) -> Self {
        self.missing = enabled;
        self
    }

    /// Builder method to enable/disable the zero-value check.
    pub fn with_zeros(mut self, enabled: bool) -> Self {
        self.zeros = enabled;
        self
    }
}

/// Integrity audit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Checks to run for every dataset
    pub enabled_checks: EnabledChecks,
    /// Fail a dataset with no primary key spec instead of skipping its
    /// duplicate check
    pub require_primary_keys: bool,
    /// Maximum missing percentage per column (0-100)
    pub max_missing_percentage: f64,
    /// Maximum zero percentage per numeric column (0-100)
    pub max_zero_percentage: f64,
    /// Maximum duplicate percentage per dataset (0-100)
    pub max_duplicate_percentage: f64,
}

/// Validation errors for audit and summary configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    /// Missing-value threshold outside [0, 100]
    #[error("max_missing_percentage must be between 0 and 100, got {0}")]
    InvalidMissingThreshold(f64),
    /// Zero-value threshold outside [0, 100]
    #[error("max_zero_percentage must be between 0 and 100, got {0}")]
    InvalidZeroThreshold(f64),
    /// Duplicate threshold outside [0, 100]
    #[error("max_duplicate_percentage must be between 0 and 100, got {0}")]
    InvalidDuplicateThreshold(f64),
    /// Significance level outside (0, 1)
    #[error("significance_level must lie strictly between 0 and 1, got {0}")]
    InvalidSignificance(f64),
    /// Too many presentation decimals
    #[error("decimal_places must be at most {max}, got {found}")]
    InvalidDecimalPlaces {
        /// Largest accepted value
        max: u32,
        /// Configured value
        found: u32,
    },
    /// Fence multiplier not positive and finite
    #[error("fence_multiplier must be positive and finite, got {0}")]
    InvalidFenceMultiplier(f64),
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled_checks: EnabledChecks::default(),
            require_primary_keys: true,
            max_missing_percentage: 5.0,
            // Zeros are legitimate in many measures (freight, discounts).
            max_zero_percentage: 100.0,
            // Primary keys must be unique.
            max_duplicate_percentage: 0.0,
        }
    }
}

fn clamp_percentage(name: &str, value: f64) -> f64 {
    if !(0.0..=100.0).contains(&value) {
        tracing::warn!("{} {} clamped to valid range [0, 100]", name, value);
    }
    if value.is_nan() {
        return 100.0;
    }
    value.clamp(0.0, 100.0)
}

impl AuditConfig {
    /// Creates a new audit config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to select the checks to run.
    pub fn with_enabled_checks(mut self, checks: EnabledChecks) -> Self {
        self.enabled_checks = checks;
        self
    }

    /// Builder method to fail or skip datasets that have no primary key.
    pub fn with_require_primary_keys(mut self, required: bool) -> Self {
        self.require_primary_keys = required;
        self
    }

    /// Builder method to set the missing-value threshold.
    pub fn with_max_missing_percentage(mut self, threshold: f64) -> Self {
        self.max_missing_percentage = clamp_percentage("max_missing_percentage", threshold);
        self
    }

    /// Builder method to set the zero-value threshold.
    pub fn with_max_zero_percentage(mut self, threshold: f64) -> Self {
        self.max_zero_percentage = clamp_percentage("max_zero_percentage", threshold);
        self
    }

    /// Builder method to set the duplicate threshold.
    pub fn with_max_duplicate_percentage(mut self, threshold: f64) -> Self {
        self.max_duplicate_percentage = clamp_percentage("max_duplicate_percentage", threshold);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any threshold is outside valid range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.max_missing_percentage) {
            return Err(ConfigValidationError::InvalidMissingThreshold(
                self.max_missing_percentage,
            ));
        }
        if !(0.0..=100.0).contains(&self.max_zero_percentage) {
            return Err(ConfigValidationError::InvalidZeroThreshold(
                self.max_zero_percentage,
            ));
        }
        if !(0.0..=100.0).contains(&self.max_duplicate_percentage) {
            return Err(ConfigValidationError::InvalidDuplicateThreshold(
                self.max_duplicate_percentage,
            ));
        }
        Ok(())
    }
}
