//! Distribution summary configuration.

use serde::{Deserialize, Serialize};

use crate::quality::ConfigValidationError;

/// Largest supported number of presentation decimals.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Distribution summary configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// p-values below this are classified non-normal
    pub significance_level: f64,
    /// Decimals kept by presentation rounding
    pub decimal_places: u32,
    /// IQR multiple used for the outlier fences
    pub fence_multiplier: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            decimal_places: 3,
            fence_multiplier: 1.5,
        }
    }
}

impl SummaryConfig {
    /// Creates a new summary config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the normality significance level.
    pub fn with_significance_level(mut self, level: f64) -> Self {
        if level > 0.0 && level < 1.0 {
            self.significance_level = level;
        } else {
            let clamped = if level >= 1.0 { 0.5 } else { 0.001 };
            tracing::warn!(
                "significance_level {} outside (0, 1), using {}",
                level,
                clamped
            );
            self.significance_level = clamped;
        }
        self
    }

    /// Builder method to set the presentation decimals.
    pub fn with_decimal_places(mut self, places: u32) -> Self {
        if places > MAX_DECIMAL_PLACES {
            tracing::warn!(
                "decimal_places {} clamped to {}",
                places,
                MAX_DECIMAL_PLACES
            );
        }
        self.decimal_places = places.min(MAX_DECIMAL_PLACES);
        self
    }

    /// Builder method to set the fence multiplier.
    pub fn with_fence_multiplier(mut self, multiplier: f64) -> Self {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.fence_multiplier = multiplier;
        } else {
            tracing::warn!(
                "fence_multiplier {} is not positive, keeping {}",
                multiplier,
                self.fence_multiplier
            );
        }
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigValidationError::InvalidSignificance(
                self.significance_level,
            ));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigValidationError::InvalidDecimalPlaces {
                max: MAX_DECIMAL_PLACES,
                found: self.decimal_places,
            });
        }
        if !(self.fence_multiplier.is_finite() && self.fence_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidFenceMultiplier(
                self.fence_multiplier,
            ));
        }
        Ok(())
    }
}
