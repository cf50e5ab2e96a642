//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Per-tick alarm update pass.
//!
//! | State   | condition | age vs T | Result                 |
//! |---------|-----------|----------|------------------------|
//! | Idle    | false     |          | stay Idle              |
//! | Idle    | true      |          | Raised, stamp raised   |
//! | Raised  | true      |          | stay Raised            |
//! | Raised  | false     | age < T  | stay Raised (debounce) |
//! | Raised  | false     | age >= T | Cleared, stamp cleared |
//! | Cleared | true      |          | Raised, stamp raised   |
//! | Cleared | false     |          | Idle                   |
//!
//! `T` is the minimal age to clear, in ticks. Every transition resets the
//! age to zero.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use r_ptpd_common::config::{AlarmsConfig, DEFAULT_MIN_AGE_TO_CLEAR};
use r_ptpd_common::time::{Clock, SystemClock};
use tracing::{debug, trace};

use crate::kind::AlarmKind;
use crate::notify::{AlarmEvent, AlarmNotification, AlarmNotifier, TracingNotifier};
use crate::registry::{AlarmRecord, AlarmRegistry, AlarmState};

/// A state change performed by [`AlarmEngine::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTransition {
    pub kind: AlarmKind,
    pub from: AlarmState,
    pub to: AlarmState,
    pub at: DateTime<Utc>,
    /// Age reached in `from` just before the transition.
    pub age: u32,
}

/// Evaluate the transition table for one alarm whose age has already been
/// advanced for this tick. Returns `None` when the state does not change.
pub fn next_state(
    state: AlarmState,
    condition: bool,
    age: u32,
    min_age_to_clear: u32,
) -> Option<AlarmState> {
    match (state, condition) {
        (AlarmState::Idle, false) => None,
        (AlarmState::Idle, true) => Some(AlarmState::Raised),
        (AlarmState::Raised, true) => None,
        (AlarmState::Raised, false) if age < min_age_to_clear => None,
        (AlarmState::Raised, false) => Some(AlarmState::Cleared),
        (AlarmState::Cleared, true) => Some(AlarmState::Raised),
        (AlarmState::Cleared, false) => Some(AlarmState::Idle),
    }
}

/// Drives every registered alarm one tick at a time.
pub struct AlarmEngine {
    min_age_to_clear: u32,
    clock: Arc<dyn Clock>,
    notifier: Box<dyn AlarmNotifier>,
    ticks: u64,
}

impl std::fmt::Debug for AlarmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmEngine")
            .field("min_age_to_clear", &self.min_age_to_clear)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Default for AlarmEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AGE_TO_CLEAR)
    }
}

impl AlarmEngine {
    /// Engine on the system clock, logging notifications through `tracing`.
    pub fn new(min_age_to_clear: u32) -> Self {
        Self {
            min_age_to_clear,
            clock: Arc::new(SystemClock),
            notifier: Box::new(TracingNotifier),
            ticks: 0,
        }
    }

    pub fn from_config(config: &AlarmsConfig) -> Self {
        Self::new(config.min_age_to_clear)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl AlarmNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn min_age_to_clear(&self) -> u32 {
        self.min_age_to_clear
    }

    /// Number of completed update passes.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every enabled alarm by one tick.
    ///
    /// Event-only alarms are dispatched to the notifier on each tick their
    /// condition holds and otherwise left untouched. Raised and cleared
    /// edges are dispatched as well. The returned transitions are in
    /// registry order.
    pub fn update(&mut self, registry: &mut AlarmRegistry) -> Vec<AlarmTransition> {
        let now = self.clock.now();
        self.ticks += 1;
        let mut transitions = Vec::new();

        for descriptor in registry.iter_mut() {
            if !descriptor.enabled {
                continue;
            }
            let record = &mut descriptor.record;

            if record.event_only {
                if record.condition {
                    self.dispatch(record, AlarmEvent::Event, now);
                }
                continue;
            }

            record.age = record.age.saturating_add(1);
            let Some(to) = next_state(
                record.state,
                record.condition,
                record.age,
                self.min_age_to_clear,
            ) else {
                continue;
            };

            let transition = AlarmTransition {
                kind: record.id,
                from: record.state,
                to,
                at: now,
                age: record.age,
            };
            record.state = to;
            record.age = 0;
            match to {
                AlarmState::Raised => {
                    record.time_raised = Some(now);
                    self.dispatch(record, AlarmEvent::Raised, now);
                }
                AlarmState::Cleared => {
                    record.time_cleared = Some(now);
                    self.dispatch(record, AlarmEvent::Cleared, now);
                }
                AlarmState::Idle => {}
            }
            debug!(
                alarm = transition.kind.code(),
                from = %transition.from,
                to = %transition.to,
                age = transition.age,
                "alarm transition"
            );
            transitions.push(transition);
        }

        trace!(
            tick = self.ticks,
            transitions = transitions.len(),
            "alarm update pass complete"
        );
        transitions
    }

    fn dispatch(&mut self, record: &AlarmRecord, event: AlarmEvent, at: DateTime<Utc>) {
        let notification = AlarmNotification {
            kind: record.id,
            event,
            at,
            data: record.event_data,
            internal_only: record.internal_only,
        };
        self.notifier.notify(&notification);
    }
}
