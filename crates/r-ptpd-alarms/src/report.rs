//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Read-only text renderings of the registry.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::{AlarmError, Result};
use crate::registry::{AlarmDescriptor, AlarmRegistry};

/// Summary text when no operator-visible alarm is raised.
pub const SUMMARY_NONE: &str = "none";

const NEVER: &str = "-";

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| NEVER.to_owned())
}

/// One row per enabled, non internal-only alarm in registry order.
pub fn render_table(registry: &AlarmRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}  {:<15}  {:<7}  {:>5}  {:<20}  {}",
        "CODE", "NAME", "STATE", "AGE", "LAST RAISED", "LAST CLEARED"
    );
    for descriptor in registry.iter().filter(|d| d.is_operator_visible()) {
        let record = descriptor.record();
        let age = if record.is_event_only() {
            NEVER.to_owned()
        } else {
            record.age().to_string()
        };
        let _ = writeln!(
            out,
            "{:<4}  {:<15}  {:<7}  {:>5}  {:<20}  {}",
            descriptor.code(),
            descriptor.name(),
            record.state(),
            age,
            timestamp(record.time_raised()),
            timestamp(record.time_cleared()),
        );
    }
    out
}

fn summary_codes(registry: &AlarmRegistry) -> Vec<&'static str> {
    registry
        .raised()
        .map(|kind| registry.get(kind))
        .filter(|descriptor| descriptor.is_operator_visible())
        .map(AlarmDescriptor::code)
        .collect()
}

/// Append the summary line to `out` and return the number of characters
/// written.
///
/// `capacity` bounds the whole of `out`, including anything already in it.
/// When the line would push `out` past it nothing is written and
/// [`AlarmError::SummaryTruncated`] reports the total length that was
/// needed.
pub fn write_summary(registry: &AlarmRegistry, out: &mut String, capacity: usize) -> Result<usize> {
    let codes = summary_codes(registry);
    let line = if codes.is_empty() {
        SUMMARY_NONE.to_owned()
    } else {
        codes.join(" ")
    };
    let written = line.chars().count();
    let required = out.chars().count() + written;
    if required > capacity {
        return Err(AlarmError::SummaryTruncated { required, capacity });
    }
    out.push_str(&line);
    Ok(written)
}

pub fn render_summary(registry: &AlarmRegistry, capacity: usize) -> Result<String> {
    let mut out = String::with_capacity(capacity.min(256));
    write_summary(registry, &mut out, capacity)?;
    Ok(out)
}

/// Every alarm with its static attributes, including disabled and
/// internal-only ones.
pub fn render_catalog(registry: &AlarmRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}  {:<15}  {:<5}  {:<7}  {:<8}  {}",
        "CODE", "NAME", "EVENT", "ENABLED", "INTERNAL", "DESCRIPTION"
    );
    for descriptor in registry.iter() {
        let flag = |value: bool| if value { "yes" } else { "no" };
        let _ = writeln!(
            out,
            "{:<4}  {:<15}  {:<5}  {:<7}  {:<8}  {}",
            descriptor.code(),
            descriptor.name(),
            flag(descriptor.record().is_event_only()),
            flag(descriptor.is_enabled()),
            flag(descriptor.record().is_internal_only()),
            descriptor.description(),
        );
    }
    out
}
