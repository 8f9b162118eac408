//! Compliance analysis.
//!
//! [`ComplianceAnalyzer`] slices entries into the reference day, week, and
//! fortnight, classifies each total against the limits, runs the break and
//! rest rules, and folds everything into a [`WtdAnalysis`].
//!
//! Limits are inclusive: a total exactly at its limit is compliant (but may
//! still raise an approaching-limit warning).

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::breaks::BreakRuleEngine;
use crate::entry::TimeEntry;
use crate::limits::RegulatoryLimits;
use crate::period::{PeriodSlice, daily_slice, fortnight_slice, weekly_slice};
use crate::rest::{DeferredRestRule, RestRule};
use crate::score::{
    DAILY_DRIVING_MARGIN_HOURS, DAILY_WORKING_MARGIN_HOURS, LimitStatus, ScoreInputs,
    WEEKLY_MARGIN_HOURS, compliance_score, limit_status,
};

/// Totals and findings for the reference day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAnalysis {
    pub working_time: f64,
    pub driving_time: f64,
    /// Driving limit applied to the day, base or extended.
    pub driving_limit: f64,
    pub breaks: f64,
    /// Not derived yet; always zero.
    pub rest: f64,
    pub compliance: bool,
    pub warnings: Vec<String>,
}

/// Totals and findings for the Monday-start week containing the reference day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAnalysis {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub working_time: f64,
    pub driving_time: f64,
    pub breaks: f64,
    /// Not derived yet; always zero.
    pub rest: f64,
    /// Days this week with driving beyond the base daily limit.
    pub extended_driving_days: u32,
    pub compliance: bool,
    pub warnings: Vec<String>,
}

/// Driving over the current and previous week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortnightAnalysis {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub driving_time: f64,
    pub compliance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAnalysis {
    pub compliance: bool,
    /// Hours of break required for the day's working time.
    pub required_breaks: f64,
    pub taken_breaks: f64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestAnalysis {
    pub compliance: bool,
    pub warnings: Vec<String>,
}

/// Result of analyzing one driver's entries for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WtdAnalysis {
    pub reference_date: NaiveDate,
    pub daily: DailyAnalysis,
    pub weekly: WeeklyAnalysis,
    pub fortnight: FortnightAnalysis,
    pub breaks: BreakAnalysis,
    pub rest: RestAnalysis,
    /// True iff there are no critical violations.
    pub overall_compliance: bool,
    pub compliance_score: u8,
    pub critical_violations: Vec<String>,
    pub warnings: Vec<String>,
    /// Entries excluded because their date was missing or malformed.
    pub skipped_entries: usize,
}

/// Analyzes time entries against a fixed set of limits.
///
/// The analyzer holds no mutable state; one instance can serve any number of
/// drivers, from any number of threads when `R` is `Sync`.
#[derive(Debug, Clone)]
pub struct ComplianceAnalyzer<R = DeferredRestRule> {
    limits: RegulatoryLimits,
    rest_rule: R,
}

impl ComplianceAnalyzer {
    /// Creates an analyzer with the deferred rest rule.
    pub const fn new(limits: RegulatoryLimits) -> Self {
        Self {
            limits,
            rest_rule: DeferredRestRule,
        }
    }
}

impl<R: RestRule> ComplianceAnalyzer<R> {
    /// Replaces the rest rule.
    pub fn with_rest_rule<S: RestRule>(self, rest_rule: S) -> ComplianceAnalyzer<S> {
        ComplianceAnalyzer {
            limits: self.limits,
            rest_rule,
        }
    }

    pub const fn limits(&self) -> &RegulatoryLimits {
        &self.limits
    }

    /// Analyzes entries relative to `reference_date`.
    ///
    /// Never fails: entries with unusable dates are skipped and missing hours
    /// count as zero.
    pub fn analyze(&self, entries: &[TimeEntry], reference_date: NaiveDate) -> WtdAnalysis {
        let limits = &self.limits;
        let daily_slice = daily_slice(entries, reference_date);
        let weekly_slice = weekly_slice(entries, reference_date);
        let fortnight_slice = fortnight_slice(entries, reference_date);

        let mut critical_violations = Vec::new();

        let driving_limit = self.daily_driving_limit(&weekly_slice, reference_date);
        let daily = self.analyze_day(&daily_slice, driving_limit, &mut critical_violations);
        let weekly = self.analyze_week(&weekly_slice, &mut critical_violations);
        let fortnight = self.analyze_fortnight(&fortnight_slice, &mut critical_violations);

        let break_engine = BreakRuleEngine::new(limits);
        let breaks = BreakAnalysis {
            compliance: break_engine.is_break_compliant(daily.working_time, daily.breaks),
            required_breaks: break_engine.required_break_hours(daily.working_time),
            taken_breaks: daily.breaks,
            warnings: break_engine.break_warnings(daily.working_time, daily.breaks),
        };

        let rest = RestAnalysis {
            compliance: self
                .rest_rule
                .is_rest_compliant(limits, &daily_slice, &weekly_slice),
            warnings: self
                .rest_rule
                .rest_warnings(limits, &daily_slice, &weekly_slice),
        };

        let score = compliance_score(
            &ScoreInputs {
                daily_working_hours: daily.working_time,
                daily_driving_hours: daily.driving_time,
                daily_driving_limit_hours: driving_limit.max_hours,
                weekly_working_hours: weekly.working_time,
                weekly_driving_hours: weekly.driving_time,
                break_compliant: breaks.compliance,
                rest_compliant: rest.compliance,
            },
            limits,
        );

        let warnings: Vec<String> = daily
            .warnings
            .iter()
            .chain(&weekly.warnings)
            .chain(&breaks.warnings)
            .chain(&rest.warnings)
            .cloned()
            .collect();

        tracing::debug!(
            %reference_date,
            score,
            critical = critical_violations.len(),
            warnings = warnings.len(),
            "analyzed time entries"
        );

        WtdAnalysis {
            reference_date,
            daily,
            weekly,
            fortnight,
            breaks,
            rest,
            overall_compliance: critical_violations.is_empty(),
            compliance_score: score,
            critical_violations,
            warnings,
            skipped_entries: weekly_slice.skipped,
        }
    }

    /// Picks the driving limit for the reference day.
    ///
    /// The extended limit applies while the week still has extensions left
    /// from days before the reference day.
    fn daily_driving_limit(
        &self,
        weekly: &PeriodSlice<'_>,
        reference_date: NaiveDate,
    ) -> DailyDrivingLimit {
        let base = self.limits.max_daily_driving_hours;
        let allowed = self.limits.max_extended_driving_days_per_week;
        let used_before = weekly
            .driving_hours_by_day()
            .range(..reference_date)
            .filter(|&(_, &hours)| hours > base)
            .count();
        let used_before = u32::try_from(used_before).unwrap_or(u32::MAX);

        if used_before < allowed {
            DailyDrivingLimit {
                max_hours: self.limits.max_daily_driving_hours_extended,
                extension: Some(used_before + 1),
            }
        } else {
            DailyDrivingLimit {
                max_hours: base,
                extension: None,
            }
        }
    }

    fn analyze_day(
        &self,
        slice: &PeriodSlice<'_>,
        driving_limit: DailyDrivingLimit,
        critical: &mut Vec<String>,
    ) -> DailyAnalysis {
        let totals = slice.totals;
        let mut warnings = Vec::new();
        let before = critical.len();

        check_limit(
            "Daily working time",
            totals.working_hours,
            self.limits.max_daily_working_hours,
            DAILY_WORKING_MARGIN_HOURS,
            critical,
            &mut warnings,
        );
        check_limit(
            "Daily driving time",
            totals.driving_hours,
            driving_limit.max_hours,
            DAILY_DRIVING_MARGIN_HOURS,
            critical,
            &mut warnings,
        );

        let base = self.limits.max_daily_driving_hours;
        let within_extension =
            totals.driving_hours > base && totals.driving_hours <= driving_limit.max_hours;
        if let (Some(nth), true) = (driving_limit.extension, within_extension) {
            warnings.push(format!(
                "Daily driving time {:.1}h uses extension {nth} of {} this week (base limit {base:.1}h)",
                totals.driving_hours, self.limits.max_extended_driving_days_per_week
            ));
        }

        DailyAnalysis {
            working_time: totals.working_hours,
            driving_time: totals.driving_hours,
            driving_limit: driving_limit.max_hours,
            breaks: totals.break_hours,
            rest: 0.0,
            compliance: critical.len() == before,
            warnings,
        }
    }

    fn analyze_week(&self, slice: &PeriodSlice<'_>, critical: &mut Vec<String>) -> WeeklyAnalysis {
        let totals = slice.totals;
        let mut warnings = Vec::new();
        let before = critical.len();

        check_limit(
            "Weekly working time",
            totals.working_hours,
            self.limits.max_weekly_working_hours,
            WEEKLY_MARGIN_HOURS,
            critical,
            &mut warnings,
        );
        check_limit(
            "Weekly driving time",
            totals.driving_hours,
            self.limits.max_weekly_driving_hours,
            WEEKLY_MARGIN_HOURS,
            critical,
            &mut warnings,
        );

        let base = self.limits.max_daily_driving_hours;
        let extended_days = slice
            .driving_hours_by_day()
            .values()
            .filter(|&&hours| hours > base)
            .count();
        let extended_driving_days = u32::try_from(extended_days).unwrap_or(u32::MAX);
        if extended_driving_days > self.limits.max_extended_driving_days_per_week {
            critical.push(format!(
                "Driving exceeded {base:.1}h on {extended_driving_days} days this week; the extension is allowed on {} days",
                self.limits.max_extended_driving_days_per_week
            ));
        }

        WeeklyAnalysis {
            week_start: slice.start,
            week_end: slice.end,
            working_time: totals.working_hours,
            driving_time: totals.driving_hours,
            breaks: totals.break_hours,
            rest: 0.0,
            extended_driving_days,
            compliance: critical.len() == before,
            warnings,
        }
    }

    fn analyze_fortnight(
        &self,
        slice: &PeriodSlice<'_>,
        critical: &mut Vec<String>,
    ) -> FortnightAnalysis {
        let driving = slice.totals.driving_hours;
        let max = self.limits.max_fortnightly_driving_hours;
        let compliance = driving <= max;
        if !compliance {
            critical.push(format!(
                "Fortnightly driving time {driving:.1}h exceeds the {max:.1}h limit"
            ));
        }

        FortnightAnalysis {
            start: slice.start,
            end: slice.end,
            driving_time: driving,
            compliance,
        }
    }
}

/// Daily driving limit in effect for the reference day.
#[derive(Debug, Clone, Copy)]
struct DailyDrivingLimit {
    max_hours: f64,
    /// Which of the week's extensions the day would use, when one is left.
    extension: Option<u32>,
}

/// Records a critical violation or an approaching-limit warning for one metric.
fn check_limit(
    label: &str,
    value: f64,
    max: f64,
    margin: f64,
    critical: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    match limit_status(value, max, margin) {
        LimitStatus::Exceeded => {
            critical.push(format!("{label} {value:.1}h exceeds the {max:.1}h limit"));
        }
        LimitStatus::Approaching => {
            warnings.push(format!(
                "{label} {value:.1}h is within {margin:.1}h of the {max:.1}h limit"
            ));
        }
        LimitStatus::Within => {}
    }
}

/// Analyzes entries with the default limits.
///
/// `reference_date` defaults to today in the local timezone.
pub fn analyze_compliance(entries: &[TimeEntry], reference_date: Option<NaiveDate>) -> WtdAnalysis {
    let reference_date = reference_date.unwrap_or_else(|| Local::now().date_naive());
    ComplianceAnalyzer::new(RegulatoryLimits::default()).analyze(entries, reference_date)
}
