//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Binary entrypoint for the R-PTPD alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use r_ptpd_alarms::{AlarmEvent, AlarmKind, AlarmMonitor, NotificationLog};
use r_ptpd_common::config::AlarmsConfig;
use r_ptpd_common::time::ManualClock;
use tracing::info;

use crate::scenario::Scenario;
use crate::status::summary_line;

/// Run `scenario` to completion on a manual clock that advances by the
/// configured update interval per tick, printing every tick's summary,
/// its transitions and events, and finally the alarm table.
pub fn replay(
    scenario: &Scenario,
    config: &AlarmsConfig,
    start: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let clock = ManualClock::new(start);
    // A tick emits at most one notification per alarm.
    let log = NotificationLog::new(AlarmKind::COUNT);
    let monitor = AlarmMonitor::from_config(config, clock.clone(), log.clone())
        .context("failed to apply alarm configuration")?;
    let step = chrono::Duration::from_std(config.update_interval)
        .context("update interval out of range")?;

    info!(
        scenario = scenario.name(),
        ticks = scenario.ticks(),
        "replaying scenario"
    );
    writeln!(
        out,
        "Scenario: {} ({} ticks, min_age_to_clear={})",
        scenario.name(),
        scenario.ticks(),
        config.min_age_to_clear
    )?;

    for tick in 0..scenario.ticks() {
        if tick > 0 {
            clock.advance(step);
        }
        monitor.with_registry(|registry| scenario.apply(tick, registry));
        let transitions = monitor.tick();
        let summary = monitor.summary(config.summary_capacity);

        writeln!(out, "{tick:>5}  Alarms: {}", summary_line(&summary))?;
        for transition in &transitions {
            writeln!(
                out,
                "       {:<4}  {} -> {} (age {})",
                transition.kind.code(),
                transition.from,
                transition.to,
                transition.age
            )?;
        }
        for event in log.drain().iter().filter(|n| n.event == AlarmEvent::Event) {
            writeln!(out, "       {:<4}  event {}", event.code(), event.data)?;
        }
    }

    writeln!(out)?;
    write!(out, "{}", monitor.table())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn replay_prints_debounced_lifecycle() {
        let scenario = Scenario::from_json(
            r#"{
                "name": "flap",
                "ticks": 6,
                "steps": [
                    { "tick": 0, "alarm": "SYN", "condition": true },
                    { "tick": 1, "alarm": "SYN", "condition": false },
                    { "tick": 2, "alarm": "STEP", "condition": true },
                    { "tick": 3, "alarm": "STEP", "condition": false }
                ]
            }"#,
            "unused",
        )
        .expect("valid scenario");
        let config = AlarmsConfig {
            min_age_to_clear: 3,
            ..AlarmsConfig::default()
        };
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut out = Vec::new();
        replay(&scenario, &config, start, &mut out).expect("replay succeeds");
        let text = String::from_utf8(out).expect("utf8 output");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Scenario: flap (6 ticks, min_age_to_clear=3)");
        assert_eq!(lines[1], "    0  Alarms: SYN");
        assert_eq!(lines[2], "       SYN   IDLE -> RAISED (age 1)");
        assert_eq!(lines[3], "    1  Alarms: SYN");
        assert_eq!(lines[4], "    2  Alarms: SYN");
        assert_eq!(lines[5], "       STEP  event -");
        assert_eq!(lines[6], "    3  Alarms: none");
        assert_eq!(lines[7], "       SYN   RAISED -> CLEARED (age 3)");
        assert_eq!(lines[8], "    4  Alarms: none");
        assert_eq!(lines[9], "       SYN   CLEARED -> IDLE (age 1)");
        assert_eq!(lines[10], "    5  Alarms: none");
        assert!(text.contains("2024-06-01T00:00:00Z  2024-06-01T00:00:03Z"));
    }

    #[test]
    fn shipped_scenario_replays() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../configs/scenarios/sync-loss.json");
        let scenario = Scenario::from_path(&path).expect("shipped scenario parses");
        let mut out = Vec::new();
        replay(&scenario, &AlarmsConfig::default(), Utc::now(), &mut out).expect("replay");
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("STEP  event offset_ns=-2500000000"));
        assert!(text.contains("MSTC  event best_master=001b21fffe123456/1"));
        assert!(text.contains("SYN   RAISED -> CLEARED (age 30)"));
        assert!(text.contains("   44  Alarms: OFM"));
    }
}
