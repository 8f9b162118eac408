//! Rest period rules.
//!
//! Daily and weekly rest adequacy depends on the gap between consecutive
//! shifts, which time entries do not record. The analyzer takes the rule as a
//! type parameter so a gap-aware implementation can replace
//! [`DeferredRestRule`] without touching orchestration.

use crate::limits::RegulatoryLimits;
use crate::period::PeriodSlice;

/// Evaluates rest adequacy for a day and its surrounding week.
pub trait RestRule {
    fn is_rest_compliant(
        &self,
        limits: &RegulatoryLimits,
        daily: &PeriodSlice<'_>,
        weekly: &PeriodSlice<'_>,
    ) -> bool;

    fn rest_warnings(
        &self,
        limits: &RegulatoryLimits,
        daily: &PeriodSlice<'_>,
        weekly: &PeriodSlice<'_>,
    ) -> Vec<String>;
}

/// Rest rule that reports every period as compliant.
///
/// Inter-shift rest cannot be derived from per-day totals, so nothing is
/// flagged until entries carry clock-in and clock-out times.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredRestRule;

impl RestRule for DeferredRestRule {
    fn is_rest_compliant(
        &self,
        _limits: &RegulatoryLimits,
        _daily: &PeriodSlice<'_>,
        _weekly: &PeriodSlice<'_>,
    ) -> bool {
        true
    }

    fn rest_warnings(
        &self,
        _limits: &RegulatoryLimits,
        _daily: &PeriodSlice<'_>,
        _weekly: &PeriodSlice<'_>,
    ) -> Vec<String> {
        Vec::new()
    }
}
