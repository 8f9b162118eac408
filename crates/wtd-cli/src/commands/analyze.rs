//! Analyze command for checking time entries against the limits.
//!
//! Entries are grouped by driver and each group is analyzed independently.
//! Output is a human-readable report per driver or a JSON array.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use wtd_core::{ComplianceAnalyzer, RegulatoryLimits, TimeEntry, WtdAnalysis, parse_entries};

use crate::Config;
use crate::cli::AnalyzeArgs;
use crate::commands::util::parse_reference_date;

/// Analysis of one driver's entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverReport {
    /// `None` for entries without a usable driver ID.
    pub driver_id: Option<String>,
    /// Entries in this driver's group, dated or not.
    pub entry_count: usize,
    pub analysis: WtdAnalysis,
}

impl DriverReport {
    fn label(&self) -> &str {
        self.driver_id.as_deref().unwrap_or("(unassigned)")
    }
}

// ========== Input ==========

/// Reads entries from a file, or from stdin when no path is given.
pub fn read_entries(input: Option<&Path>) -> Result<Vec<TimeEntry>> {
    let (raw, source) = match input {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (
            io::read_to_string(io::stdin().lock()).context("failed to read stdin")?,
            "stdin".to_string(),
        ),
    };

    let entries =
        parse_entries(&raw).with_context(|| format!("failed to parse entries from {source}"))?;
    tracing::debug!(entry_count = entries.len(), %source, "loaded time entries");
    Ok(entries)
}

// ========== Analysis ==========

/// Splits entries by driver.
///
/// Groups are sorted by driver ID with unassigned entries first. With a
/// `driver` filter the result is exactly one group, possibly empty.
fn group_by_driver(
    entries: Vec<TimeEntry>,
    driver: Option<&str>,
) -> Vec<(Option<String>, Vec<TimeEntry>)> {
    if let Some(driver) = driver {
        let matching = entries
            .into_iter()
            .filter(|e| e.driver().is_some_and(|id| id.as_str() == driver))
            .collect::<Vec<_>>();
        if matching.is_empty() {
            tracing::warn!(driver, "no time entries found for driver");
        }
        return vec![(Some(driver.to_string()), matching)];
    }

    let mut groups: BTreeMap<Option<String>, Vec<TimeEntry>> = BTreeMap::new();
    for entry in entries {
        let key = entry.driver().map(String::from);
        groups.entry(key).or_default().push(entry);
    }
    if groups.is_empty() {
        groups.insert(None, Vec::new());
    }
    groups.into_iter().collect()
}

/// Analyzes each driver's entries in parallel.
pub fn analyze_drivers(
    entries: Vec<TimeEntry>,
    driver: Option<&str>,
    analyzer: &ComplianceAnalyzer,
    reference_date: NaiveDate,
) -> Vec<DriverReport> {
    let groups = group_by_driver(entries, driver);

    groups
        .par_iter()
        .map(|(driver_id, entries)| {
            let analysis = analyzer.analyze(entries, reference_date);
            tracing::info!(
                driver = driver_id.as_deref().unwrap_or("(unassigned)"),
                score = analysis.compliance_score,
                compliant = analysis.overall_compliance,
                "analyzed driver"
            );
            DriverReport {
                driver_id: driver_id.clone(),
                entry_count: entries.len(),
                analysis,
            }
        })
        .collect()
}

// ========== Formatting ==========

/// Formats decimal hours as "Xh Ym" if >= 1 hour, "Ym" if < 1 hour.
/// Negative values are shown as 0m.
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    if h >= 1 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m")
    }
}

/// Generates a 10-character bar for a 0–100 score.
/// Scores under 5 get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn score_bar(score: u8) -> String {
    let ratio = f64::from(score.min(100)) / 100.0;
    let filled = if ratio < 0.05 && score > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn write_section(output: &mut String, title: &str) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

fn write_list(output: &mut String, items: &[String]) {
    if items.is_empty() {
        writeln!(output, "  (none)").unwrap();
    }
    for item in items {
        writeln!(output, "  - {item}").unwrap();
    }
}

/// Formats the human-readable report for one driver.
pub fn format_report(report: &DriverReport, limits: &RegulatoryLimits) -> String {
    let a = &report.analysis;
    let mut output = String::new();

    writeln!(output, "WTD COMPLIANCE: {}", report.label()).unwrap();
    writeln!(
        output,
        "Reference date: {}",
        a.reference_date.format("%A, %b %-d, %Y")
    )
    .unwrap();
    writeln!(
        output,
        "Week: {} to {}",
        a.weekly.week_start.format("%b %-d"),
        a.weekly.week_end.format("%b %-d, %Y")
    )
    .unwrap();
    if report.entry_count == 0 {
        writeln!(output, "No time entries found for this driver.").unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Score:  {}/100  {}",
        a.compliance_score,
        score_bar(a.compliance_score)
    )
    .unwrap();
    let status = if a.overall_compliance {
        "COMPLIANT"
    } else {
        "NON-COMPLIANT"
    };
    writeln!(output, "Status: {status}").unwrap();

    write_section(&mut output, "DAILY");
    writeln!(
        output,
        "Working:  {} of {}",
        format_hours(a.daily.working_time),
        format_hours(limits.max_daily_working_hours)
    )
    .unwrap();
    writeln!(
        output,
        "Driving:  {} of {}",
        format_hours(a.daily.driving_time),
        format_hours(a.daily.driving_limit)
    )
    .unwrap();
    writeln!(
        output,
        "Breaks:   {} taken, {} required",
        format_hours(a.breaks.taken_breaks),
        format_hours(a.breaks.required_breaks)
    )
    .unwrap();

    write_section(&mut output, "WEEKLY");
    writeln!(
        output,
        "Working:  {} of {}",
        format_hours(a.weekly.working_time),
        format_hours(limits.max_weekly_working_hours)
    )
    .unwrap();
    writeln!(
        output,
        "Driving:  {} of {}",
        format_hours(a.weekly.driving_time),
        format_hours(limits.max_weekly_driving_hours)
    )
    .unwrap();
    writeln!(
        output,
        "Extended driving days: {} of {}",
        a.weekly.extended_driving_days, limits.max_extended_driving_days_per_week
    )
    .unwrap();

    write_section(&mut output, "FORTNIGHT");
    writeln!(
        output,
        "Driving:  {} of {}",
        format_hours(a.fortnight.driving_time),
        format_hours(limits.max_fortnightly_driving_hours)
    )
    .unwrap();

    write_section(&mut output, "CRITICAL VIOLATIONS");
    write_list(&mut output, &a.critical_violations);

    write_section(&mut output, "WARNINGS");
    write_list(&mut output, &a.warnings);

    if a.skipped_entries > 0 {
        writeln!(output).unwrap();
        writeln!(
            output,
            "Skipped {} entries with missing or malformed dates.",
            a.skipped_entries
        )
        .unwrap();
    }

    output
}

/// Formats reports as a JSON array.
pub fn format_reports_json(reports: &[DriverReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

// ========== Public Interface ==========

/// Runs the analyze command.
pub fn run<W: Write>(writer: &mut W, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();
    let reference_date = parse_reference_date(&args.date, today)?;
    let entries = read_entries(args.input.as_deref())?;

    let analyzer = ComplianceAnalyzer::new(config.limits.clone());
    let reports = analyze_drivers(entries, args.driver.as_deref(), &analyzer, reference_date);

    if args.json {
        writeln!(writer, "{}", format_reports_json(&reports)?)?;
    } else {
        for (idx, report) in reports.iter().enumerate() {
            if idx > 0 {
                writeln!(writer)?;
            }
            write!(writer, "{}", format_report(report, analyzer.limits()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn analyzer() -> ComplianceAnalyzer {
        ComplianceAnalyzer::new(RegulatoryLimits::default())
    }

    fn entry(driver: &str, day: &str, total: f64, driving: f64, breaks: f64) -> TimeEntry {
        TimeEntry::new(day)
            .with_driver(driver)
            .with_total_hours(total)
            .with_driving_hours(driving)
            .with_break_hours(breaks)
    }

    // ========== Formatting Tests ==========

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(2.5), "2h 30m");
        assert_eq!(format_hours(13.0), "13h 0m");
        assert_eq!(format_hours(0.75), "45m");
        assert_eq!(format_hours(0.0), "0m");
        assert_eq!(format_hours(-1.0), "0m");
        assert_eq!(format_hours(f64::NAN), "0m");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(100), "██████████");
        assert_eq!(score_bar(80), "████████░░");
        assert_eq!(score_bar(3), "█░░░░░░░░░");
        assert_eq!(score_bar(0), "░░░░░░░░░░");
    }

    // ========== Grouping Tests ==========

    #[test]
    fn test_groups_sorted_with_unassigned_first() {
        let entries = vec![
            entry("drv-b", "2025-03-12", 8.0, 6.0, 1.0),
            TimeEntry::new("2025-03-12").with_total_hours(2.0),
            entry("drv-a", "2025-03-12", 8.0, 6.0, 1.0),
            entry("drv-b", "2025-03-11", 8.0, 6.0, 1.0),
        ];
        let groups = group_by_driver(entries, None);
        let keys: Vec<_> = groups.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![None, Some("drv-a".to_string()), Some("drv-b".to_string())]
        );
        assert_eq!(groups[2].1.len(), 2);
    }

    #[test]
    fn test_driver_filter_yields_single_group() {
        let entries = vec![
            entry("drv-a", "2025-03-12", 8.0, 6.0, 1.0),
            entry("drv-b", "2025-03-12", 8.0, 6.0, 1.0),
        ];
        let groups = group_by_driver(entries.clone(), Some("drv-b"));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 1);

        let groups = group_by_driver(entries, Some("drv-z"));
        assert_eq!(groups.len(), 1);
        assert!(groups[0].1.is_empty());
    }

    #[test]
    fn test_report_flags_driver_without_entries() {
        let entries = vec![entry("drv-a", "2025-03-12", 8.0, 6.0, 1.0)];
        let reports = analyze_drivers(entries, Some("drv-z"), &analyzer(), date("2025-03-12"));
        assert_eq!(reports[0].entry_count, 0);

        let output = format_report(&reports[0], &RegulatoryLimits::default());
        assert!(output.starts_with(
            "WTD COMPLIANCE: drv-z\nReference date: Wednesday, Mar 12, 2025\nWeek: Mar 10 to Mar 16, 2025\nNo time entries found for this driver.\n"
        ));

        let reports = analyze_drivers(
            vec![entry("drv-a", "2025-03-12", 8.0, 6.0, 1.0)],
            Some("drv-a"),
            &analyzer(),
            date("2025-03-12"),
        );
        let output = format_report(&reports[0], &RegulatoryLimits::default());
        assert!(!output.contains("No time entries found"));
    }

    #[test]
    fn test_empty_input_yields_one_anonymous_report() {
        let reports = analyze_drivers(Vec::new(), None, &analyzer(), date("2025-03-12"));
        assert_eq!(reports.len(), 1);
        assert!(reports[0].driver_id.is_none());
        assert_eq!(reports[0].analysis.compliance_score, 100);
    }

    #[test]
    fn test_drivers_are_analyzed_independently() {
        let entries = vec![
            entry("drv-a", "2025-03-12", 14.0, 8.0, 1.0),
            entry("drv-b", "2025-03-12", 8.0, 6.0, 1.0),
        ];
        let reports = analyze_drivers(entries, None, &analyzer(), date("2025-03-12"));
        assert_eq!(reports.len(), 2);
        assert!(!reports[0].analysis.overall_compliance);
        assert!(reports[1].analysis.overall_compliance);
        assert!((reports[1].analysis.daily.working_time - 8.0).abs() < f64::EPSILON);
    }

    // ========== Report Tests (Snapshot) ==========

    #[test]
    fn test_report_daily_violation() {
        let entries = vec![entry("drv-1", "2025-03-12", 14.0, 0.0, 1.0)];
        let reports = analyze_drivers(entries, None, &analyzer(), date("2025-03-12"));
        let output = format_report(&reports[0], &RegulatoryLimits::default());
        assert_snapshot!(output, @r"
        WTD COMPLIANCE: drv-1
        Reference date: Wednesday, Mar 12, 2025
        Week: Mar 10 to Mar 16, 2025

        Score:  80/100  ████████░░
        Status: NON-COMPLIANT

        DAILY
        ─────
        Working:  14h 0m of 13h 0m
        Driving:  0m of 10h 0m
        Breaks:   1h 0m taken, 45m required

        WEEKLY
        ──────
        Working:  14h 0m of 60h 0m
        Driving:  0m of 56h 0m
        Extended driving days: 0 of 2

        FORTNIGHT
        ─────────
        Driving:  0m of 90h 0m

        CRITICAL VIOLATIONS
        ───────────────────
          - Daily working time 14.0h exceeds the 13.0h limit

        WARNINGS
        ────────
          (none)
        ");
    }

    #[test]
    fn test_report_lists_findings_and_skipped() {
        let entries = vec![
            entry("drv-1", "2025-03-12", 5.0, 3.0, 0.0),
            entry("drv-1", "not-a-date", 5.0, 3.0, 0.0),
        ];
        let reports = analyze_drivers(entries, None, &analyzer(), date("2025-03-12"));
        let output = format_report(&reports[0], &RegulatoryLimits::default());

        assert!(output.contains("Status: COMPLIANT"));
        assert!(output.contains(
            "  - Insufficient break: 0 min taken, 45 min required after 5.0h of work"
        ));
        assert!(output.ends_with("Skipped 1 entries with missing or malformed dates.\n"));
    }

    #[test]
    fn test_json_output_shape() {
        let entries = vec![entry("drv-1", "2025-03-12", 14.0, 0.0, 1.0)];
        let reports = analyze_drivers(entries, None, &analyzer(), date("2025-03-12"));
        let json = format_reports_json(&reports).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["driverId"], "drv-1");
        assert_eq!(value[0]["entryCount"], 1);
        assert_eq!(value[0]["analysis"]["complianceScore"], 80);
        assert_eq!(value[0]["analysis"]["overallCompliance"], false);
        assert_eq!(
            value[0]["analysis"]["criticalViolations"][0],
            "Daily working time 14.0h exceeds the 13.0h limit"
        );
    }

    // ========== Input Tests ==========

    #[test]
    fn test_read_entries_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("entries.json");
        std::fs::write(
            &path,
            r#"[{"driverId":"drv-1","entryDate":"2025-03-12","totalHours":6}]"#,
        )
        .unwrap();

        let entries = read_entries(Some(&path)).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_entries_rejects_non_list() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("entries.json");
        std::fs::write(&path, "\"nope\"").unwrap();

        let err = read_entries(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse entries from"));
        assert!(format!("{err:#}").contains("invalid argument"));
    }

    #[test]
    fn test_read_entries_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = read_entries(Some(&temp.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
