//! Working Time Directive compliance analysis.
//!
//! This crate contains the domain logic for:
//! - Limits: the regulatory thresholds, injected as a value
//! - Periods: slicing entries into the reference day, week, and fortnight
//! - Breaks and rest: statutory break tiers and the rest rule seam
//! - Scoring: the advisory 0–100 compliance score
//! - Analysis: combining all of the above into a [`WtdAnalysis`]

mod analysis;
pub mod breaks;
pub mod entry;
pub mod limits;
pub mod period;
pub mod rest;
pub mod score;
pub mod types;

pub use analysis::{
    BreakAnalysis, ComplianceAnalyzer, DailyAnalysis, FortnightAnalysis, RestAnalysis,
    WeeklyAnalysis, WtdAnalysis, analyze_compliance,
};
pub use breaks::BreakRuleEngine;
pub use entry::{EntryError, TimeEntry, parse_entries};
pub use limits::{LimitsError, RegulatoryLimits};
pub use rest::{DeferredRestRule, RestRule};
pub use types::{DriverId, EntryStatus, ValidationError};
