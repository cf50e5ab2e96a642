//! ---
//! ptpd_section: "03-observability"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Metrics collection and export utilities."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use anyhow::Result;
use prometheus::{IntCounter, IntCounterVec, IntGaugeVec, Opts};
use r_ptpd_alarms::{
    AlarmEvent, AlarmNotification, AlarmNotifier, AlarmRegistry, AlarmState, AlarmTransition,
};

use crate::SharedRegistry;

/// Gauge encoding of an alarm state.
pub fn state_value(state: AlarmState) -> i64 {
    match state {
        AlarmState::Idle => 0,
        AlarmState::Raised => 1,
        AlarmState::Cleared => 2,
    }
}

/// Alarm state gauges plus transition and event counters.
///
/// Clones share the underlying collectors, so one handle can be installed
/// as an [`AlarmNotifier`] while another records ticks.
#[derive(Clone, Debug)]
pub struct AlarmMetrics {
    state: IntGaugeVec,
    transitions: IntCounterVec,
    events: IntCounterVec,
    ticks: IntCounter,
}

impl AlarmMetrics {
    pub fn new(registry: &SharedRegistry) -> Result<Self> {
        let state = IntGaugeVec::new(
            Opts::new(
                "r_ptpd_alarm_state",
                "Alarm state by code (0 idle, 1 raised, 2 cleared)",
            ),
            &["alarm"],
        )?;
        registry.register(Box::new(state.clone()))?;

        let transitions = IntCounterVec::new(
            Opts::new(
                "r_ptpd_alarm_transitions_total",
                "Alarm state transitions by code and target state",
            ),
            &["alarm", "to"],
        )?;
        registry.register(Box::new(transitions.clone()))?;

        let events = IntCounterVec::new(
            Opts::new(
                "r_ptpd_alarm_events_total",
                "Dispatches of event-only alarms by code",
            ),
            &["alarm"],
        )?;
        registry.register(Box::new(events.clone()))?;

        let ticks = IntCounter::with_opts(Opts::new(
            "r_ptpd_alarm_ticks_total",
            "Completed alarm update passes",
        ))?;
        registry.register(Box::new(ticks.clone()))?;

        Ok(Self {
            state,
            transitions,
            events,
            ticks,
        })
    }

    /// Refresh the gauges after an update pass. Disabled and internal-only
    /// alarms are not exported.
    pub fn record_tick(&self, registry: &AlarmRegistry, transitions: &[AlarmTransition]) {
        self.ticks.inc();
        for descriptor in registry.iter() {
            if descriptor.is_operator_visible() {
                self.state
                    .with_label_values(&[descriptor.code()])
                    .set(state_value(descriptor.record().state()));
            } else {
                let _ = self.state.remove_label_values(&[descriptor.code()]);
            }
        }
        for transition in transitions {
            self.transitions
                .with_label_values(&[transition.kind.code(), transition.to.as_str()])
                .inc();
        }
    }
}

impl AlarmNotifier for AlarmMetrics {
    fn notify(&mut self, notification: &AlarmNotification) {
        if notification.event == AlarmEvent::Event {
            self.events.with_label_values(&[notification.code()]).inc();
        }
    }
}
