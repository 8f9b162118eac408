//! Regulatory limits for working and driving time.
//!
//! Defaults follow the UK/EU rules for drivers of goods and passenger
//! vehicles. Other jurisdictions construct their own [`RegulatoryLimits`] and
//! hand it to the analyzer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating a set of limits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LimitsError {
    /// A limit was zero, negative, or not a number.
    #[error("{field} must be a positive number of {unit}, got {value}")]
    NotPositive {
        field: &'static str,
        unit: &'static str,
        value: f64,
    },

    /// The extended daily driving limit is lower than the base limit.
    #[error(
        "extended daily driving limit ({extended}h) is below the base limit ({base}h)"
    )]
    ExtendedBelowBase { base: f64, extended: f64 },
}

/// Named thresholds that time entries are measured against.
///
/// Hours are decimal hours, break thresholds are minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryLimits {
    pub max_daily_working_hours: f64,
    pub max_daily_driving_hours: f64,
    /// Daily driving limit on the days the weekly extension is used.
    pub max_daily_driving_hours_extended: f64,
    pub max_extended_driving_days_per_week: u32,
    pub max_weekly_working_hours: f64,
    pub max_weekly_driving_hours: f64,
    pub max_fortnightly_driving_hours: f64,
    /// Break once working time passes 4.5 hours.
    pub break_after_4_5h_minutes: f64,
    /// Break once working time passes 6 hours.
    pub break_after_6h_minutes: f64,
    /// Break once working time passes 9 hours.
    pub break_after_9h_minutes: f64,
    pub min_daily_rest_hours: f64,
    pub min_weekly_rest_hours: f64,
}

impl Default for RegulatoryLimits {
    fn default() -> Self {
        Self {
            max_daily_working_hours: 13.0,
            max_daily_driving_hours: 9.0,
            max_daily_driving_hours_extended: 10.0,
            max_extended_driving_days_per_week: 2,
            max_weekly_working_hours: 60.0,
            max_weekly_driving_hours: 56.0,
            max_fortnightly_driving_hours: 90.0,
            break_after_4_5h_minutes: 45.0,
            break_after_6h_minutes: 30.0,
            break_after_9h_minutes: 45.0,
            min_daily_rest_hours: 11.0,
            min_weekly_rest_hours: 45.0,
        }
    }
}

impl RegulatoryLimits {
    /// Checks that every threshold is usable.
    ///
    /// Break minutes may be zero (a jurisdiction without that tier); every
    /// hour limit must be strictly positive.
    pub fn validate(&self) -> Result<(), LimitsError> {
        let hour_limits = [
            ("max_daily_working_hours", self.max_daily_working_hours),
            ("max_daily_driving_hours", self.max_daily_driving_hours),
            (
                "max_daily_driving_hours_extended",
                self.max_daily_driving_hours_extended,
            ),
            ("max_weekly_working_hours", self.max_weekly_working_hours),
            ("max_weekly_driving_hours", self.max_weekly_driving_hours),
            (
                "max_fortnightly_driving_hours",
                self.max_fortnightly_driving_hours,
            ),
            ("min_daily_rest_hours", self.min_daily_rest_hours),
            ("min_weekly_rest_hours", self.min_weekly_rest_hours),
        ];
        for (field, value) in hour_limits {
            if !value.is_finite() || value <= 0.0 {
                return Err(LimitsError::NotPositive {
                    field,
                    unit: "hours",
                    value,
                });
            }
        }

        let break_limits = [
            ("break_after_4_5h_minutes", self.break_after_4_5h_minutes),
            ("break_after_6h_minutes", self.break_after_6h_minutes),
            ("break_after_9h_minutes", self.break_after_9h_minutes),
        ];
        for (field, value) in break_limits {
            if !value.is_finite() || value < 0.0 {
                return Err(LimitsError::NotPositive {
                    field,
                    unit: "minutes",
                    value,
                });
            }
        }

        if self.max_daily_driving_hours_extended < self.max_daily_driving_hours {
            return Err(LimitsError::ExtendedBelowBase {
                base: self.max_daily_driving_hours,
                extended: self.max_daily_driving_hours_extended,
            });
        }

        Ok(())
    }
}
