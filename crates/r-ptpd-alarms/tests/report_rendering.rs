//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "tests"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Integration tests for alarm table and summary rendering."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use chrono::{TimeZone, Utc};
use r_ptpd_alarms::{
    render_summary, render_table, AlarmEngine, AlarmError, AlarmKind, AlarmRegistry, NullNotifier,
    SUMMARY_NONE,
};
use r_ptpd_common::time::ManualClock;

fn raised_registry(kinds: &[AlarmKind]) -> AlarmRegistry {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());
    let mut engine = AlarmEngine::new(30)
        .with_clock(clock)
        .with_notifier(NullNotifier);
    let mut registry = AlarmRegistry::new();
    for kind in kinds {
        registry.set_condition(*kind, true);
    }
    engine.update(&mut registry);
    registry
}

#[test]
fn table_omits_disabled_and_internal_alarms() {
    let mut registry = raised_registry(&[AlarmKind::NoSync, AlarmKind::NoDelay]);
    registry.set_enabled(AlarmKind::NoDelay, false);
    registry.set_internal_only(AlarmKind::OfmSeconds, true);

    let table = render_table(&registry);
    let codes: Vec<&str> = table
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(
        codes,
        vec!["STA", "OFM", "STEP", "SYN", "MSTC", "NWFL", "FADJ", "TPR", "DOM"]
    );

    let syn = table
        .lines()
        .find(|line| line.starts_with("SYN"))
        .expect("SYN row");
    let columns: Vec<&str> = syn.split_whitespace().collect();
    assert_eq!(
        columns,
        vec!["SYN", "NO_SYNC", "RAISED", "0", "2024-03-01T08:30:00Z", "-"]
    );
}

#[test]
fn summary_skips_hidden_alarms() {
    let mut registry =
        raised_registry(&[AlarmKind::NoSync, AlarmKind::NoDelay, AlarmKind::NetworkFault]);
    registry.set_internal_only(AlarmKind::NetworkFault, true);
    registry.set_enabled(AlarmKind::NoDelay, false);
    assert_eq!(render_summary(&registry, 64).as_deref(), Ok("SYN"));

    registry.set_internal_only(AlarmKind::NetworkFault, false);
    assert_eq!(render_summary(&registry, 64).as_deref(), Ok("SYN NWFL"));
}

#[test]
fn event_only_alarms_never_reach_summary() {
    let registry = raised_registry(&[AlarmKind::ClockStep, AlarmKind::MasterChange]);
    assert_eq!(render_summary(&registry, 64).as_deref(), Ok(SUMMARY_NONE));
}

#[test]
fn summary_capacity_is_respected() {
    let registry = raised_registry(&[
        AlarmKind::PortState,
        AlarmKind::OfmThreshold,
        AlarmKind::OfmSeconds,
        AlarmKind::NoSync,
    ]);
    let full = "STA OFM OFMS SYN";
    for capacity in 0..=full.len() + 2 {
        match render_summary(&registry, capacity) {
            Ok(line) => {
                assert!(line.len() <= capacity);
                assert_eq!(line, full);
            }
            Err(err) => {
                assert!(capacity < full.len());
                assert_eq!(
                    err,
                    AlarmError::SummaryTruncated {
                        required: full.len(),
                        capacity
                    }
                );
            }
        }
    }
    assert!(render_summary(&AlarmRegistry::new(), SUMMARY_NONE.len() - 1).is_err());
}
