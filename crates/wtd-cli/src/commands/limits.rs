//! Limits command for showing the thresholds in effect.

use std::io::Write;

use anyhow::Result;
use wtd_core::RegulatoryLimits;

use crate::commands::analyze::format_hours;

pub fn run<W: Write>(writer: &mut W, limits: &RegulatoryLimits, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(limits)?)?;
        return Ok(());
    }

    writeln!(writer, "WORKING TIME LIMITS")?;
    writeln!(writer, "───────────────────")?;
    writeln!(
        writer,
        "Daily working:        {}",
        format_hours(limits.max_daily_working_hours)
    )?;
    writeln!(
        writer,
        "Daily driving:        {} ({} on up to {} days a week)",
        format_hours(limits.max_daily_driving_hours),
        format_hours(limits.max_daily_driving_hours_extended),
        limits.max_extended_driving_days_per_week
    )?;
    writeln!(
        writer,
        "Weekly working:       {}",
        format_hours(limits.max_weekly_working_hours)
    )?;
    writeln!(
        writer,
        "Weekly driving:       {}",
        format_hours(limits.max_weekly_driving_hours)
    )?;
    writeln!(
        writer,
        "Fortnightly driving:  {}",
        format_hours(limits.max_fortnightly_driving_hours)
    )?;
    writeln!(writer)?;
    writeln!(writer, "BREAKS")?;
    writeln!(writer, "──────")?;
    writeln!(
        writer,
        "After 4.5h:  {:.0} min",
        limits.break_after_4_5h_minutes
    )?;
    writeln!(writer, "After 6h:    {:.0} min", limits.break_after_6h_minutes)?;
    writeln!(writer, "After 9h:    {:.0} min", limits.break_after_9h_minutes)?;
    writeln!(writer)?;
    writeln!(writer, "REST")?;
    writeln!(writer, "────")?;
    writeln!(
        writer,
        "Daily:   {}",
        format_hours(limits.min_daily_rest_hours)
    )?;
    writeln!(
        writer,
        "Weekly:  {}",
        format_hours(limits.min_weekly_rest_hours)
    )?;

    Ok(())
}
