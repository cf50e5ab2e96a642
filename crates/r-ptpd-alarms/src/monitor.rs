//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use parking_lot::Mutex;
use r_ptpd_common::config::AlarmsConfig;
use r_ptpd_common::time::Clock;

use crate::engine::{AlarmEngine, AlarmTransition};
use crate::errors::Result;
use crate::event_data::AlarmEventData;
use crate::kind::AlarmKind;
use crate::notify::AlarmNotifier;
use crate::registry::AlarmRegistry;
use crate::report;

#[derive(Debug)]
struct MonitorInner {
    registry: AlarmRegistry,
    engine: AlarmEngine,
}

/// Registry and engine behind a single lock.
///
/// Condition writes, the update pass and every rendering take the same
/// lock, so no caller ever sees a half-updated record.
#[derive(Debug)]
pub struct AlarmMonitor {
    inner: Mutex<MonitorInner>,
}

/// Consistent snapshot of the summary and table taken under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub ticks: u64,
    pub summary: Result<String>,
    pub table: String,
}

impl AlarmMonitor {
    pub fn new(registry: AlarmRegistry, engine: AlarmEngine) -> Self {
        Self {
            inner: Mutex::new(MonitorInner { registry, engine }),
        }
    }

    /// Build a monitor with the registry configured from `config`.
    pub fn from_config(
        config: &AlarmsConfig,
        clock: impl Clock + 'static,
        notifier: impl AlarmNotifier + 'static,
    ) -> Result<Self> {
        let mut registry = AlarmRegistry::new();
        registry.apply_config(config)?;
        let engine = AlarmEngine::from_config(config)
            .with_clock(clock)
            .with_notifier(notifier);
        Ok(Self::new(registry, engine))
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut AlarmRegistry) -> R) -> R {
        f(&mut self.inner.lock().registry)
    }

    pub fn set_condition(&self, kind: AlarmKind, condition: bool, data: Option<AlarmEventData>) {
        self.with_registry(|registry| match data {
            Some(data) => registry.set_condition_with(kind, condition, data),
            None => registry.set_condition(kind, condition),
        });
    }

    pub fn tick(&self) -> Vec<AlarmTransition> {
        let mut inner = self.inner.lock();
        let MonitorInner { registry, engine } = &mut *inner;
        engine.update(registry)
    }

    pub fn ticks(&self) -> u64 {
        self.inner.lock().engine.ticks()
    }

    pub fn table(&self) -> String {
        report::render_table(&self.inner.lock().registry)
    }

    pub fn summary(&self, capacity: usize) -> Result<String> {
        report::render_summary(&self.inner.lock().registry, capacity)
    }

    pub fn catalog(&self) -> String {
        report::render_catalog(&self.inner.lock().registry)
    }

    pub fn report(&self, capacity: usize) -> StatusReport {
        let inner = self.inner.lock();
        StatusReport {
            ticks: inner.engine.ticks(),
            summary: report::render_summary(&inner.registry, capacity),
            table: report::render_table(&inner.registry),
        }
    }
}
