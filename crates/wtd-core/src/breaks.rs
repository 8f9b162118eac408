//! Statutory break rules.
//!
//! Required break time is tiered on working time:
//!
//! | working time | required break |
//! |---|---|
//! | up to 4.5h | none |
//! | up to 6h | `break_after_4_5h_minutes` |
//! | up to 9h | `break_after_6h_minutes` |
//! | over 9h | `break_after_9h_minutes` |
//!
//! Break time arrives in hours and is compared in minutes.

use crate::limits::RegulatoryLimits;

const FIRST_BREAK_TRIGGER_HOURS: f64 = 4.5;
const SECOND_BREAK_TRIGGER_HOURS: f64 = 6.0;
const THIRD_BREAK_TRIGGER_HOURS: f64 = 9.0;

/// Evaluates break adequacy against a set of limits.
#[derive(Debug, Clone, Copy)]
pub struct BreakRuleEngine<'a> {
    limits: &'a RegulatoryLimits,
}

impl<'a> BreakRuleEngine<'a> {
    pub const fn new(limits: &'a RegulatoryLimits) -> Self {
        Self { limits }
    }

    /// Minutes of break required for the given working time.
    pub fn required_break_minutes(&self, working_hours: f64) -> f64 {
        if working_hours <= FIRST_BREAK_TRIGGER_HOURS {
            0.0
        } else if working_hours <= SECOND_BREAK_TRIGGER_HOURS {
            self.limits.break_after_4_5h_minutes
        } else if working_hours <= THIRD_BREAK_TRIGGER_HOURS {
            self.limits.break_after_6h_minutes
        } else {
            self.limits.break_after_9h_minutes
        }
    }

    pub fn required_break_hours(&self, working_hours: f64) -> f64 {
        self.required_break_minutes(working_hours) / 60.0
    }

    pub fn is_break_compliant(&self, working_hours: f64, break_hours: f64) -> bool {
        break_hours * 60.0 >= self.required_break_minutes(working_hours)
    }

    /// Warnings for the given working and break time.
    ///
    /// The tiered warning and the 6-hour warning are independent and can both
    /// appear for the same day.
    pub fn break_warnings(&self, working_hours: f64, break_hours: f64) -> Vec<String> {
        let taken = break_hours * 60.0;
        let required = self.required_break_minutes(working_hours);
        let mut warnings = Vec::new();

        if working_hours > FIRST_BREAK_TRIGGER_HOURS && taken < required {
            warnings.push(format!(
                "Insufficient break: {taken:.0} min taken, {required:.0} min required after {working_hours:.1}h of work"
            ));
        }

        if working_hours > SECOND_BREAK_TRIGGER_HOURS && taken < self.limits.break_after_6h_minutes {
            warnings.push(format!(
                "Working more than 6h requires at least {:.0} min of break",
                self.limits.break_after_6h_minutes
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(engine: &BreakRuleEngine<'_>, working: f64) -> f64 {
        engine.required_break_minutes(working)
    }

    #[test]
    fn required_minutes_follow_tiers() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        assert!(minutes(&engine, 0.0).abs() < f64::EPSILON);
        assert!(minutes(&engine, 4.5).abs() < f64::EPSILON);
        assert!((minutes(&engine, 4.75) - 45.0).abs() < f64::EPSILON);
        assert!((minutes(&engine, 6.0) - 45.0).abs() < f64::EPSILON);
        assert!((minutes(&engine, 6.5) - 30.0).abs() < f64::EPSILON);
        assert!((minutes(&engine, 9.0) - 30.0).abs() < f64::EPSILON);
        assert!((minutes(&engine, 9.25) - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn required_hours_converts_minutes() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        assert!((engine.required_break_hours(5.0) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn five_hours_without_break_is_non_compliant() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        assert!(!engine.is_break_compliant(5.0, 0.0));
        let warnings = engine.break_warnings(5.0, 0.0);
        assert_eq!(
            warnings,
            vec!["Insufficient break: 0 min taken, 45 min required after 5.0h of work"]
        );
    }

    #[test]
    fn five_hours_with_required_break_is_compliant() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        assert!(engine.is_break_compliant(5.0, 0.75));
        assert!(engine.break_warnings(5.0, 0.75).is_empty());
    }

    #[test]
    fn short_shift_needs_no_break() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        assert!(engine.is_break_compliant(4.5, 0.0));
        assert!(engine.break_warnings(4.5, 0.0).is_empty());
    }

    #[test]
    fn long_shift_can_raise_both_warnings() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        let warnings = engine.break_warnings(10.0, 0.25);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Insufficient break: 15 min taken, 45 min required"));
        assert_eq!(
            warnings[1],
            "Working more than 6h requires at least 30 min of break"
        );
    }

    #[test]
    fn long_shift_with_partial_break_raises_only_tier_warning() {
        let limits = RegulatoryLimits::default();
        let engine = BreakRuleEngine::new(&limits);
        // 30 min satisfies the 6h threshold but not the 45 min required past 9h
        let warnings = engine.break_warnings(10.0, 0.5);
        assert_eq!(warnings.len(), 1);
        assert!(!engine.is_break_compliant(10.0, 0.5));
    }

    #[test]
    fn custom_limits_change_requirement() {
        let limits = RegulatoryLimits {
            break_after_6h_minutes: 20.0,
            ..RegulatoryLimits::default()
        };
        let engine = BreakRuleEngine::new(&limits);
        // 24 min covers a 20 min requirement but not the default 30
        assert!(engine.is_break_compliant(7.0, 0.4));
        assert!(!BreakRuleEngine::new(&RegulatoryLimits::default()).is_break_compliant(7.0, 0.4));
    }
}
