//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::fmt;

use chrono::{DateTime, Utc};
use r_ptpd_common::config::AlarmsConfig;
use tracing::debug;

use crate::errors::Result;
use crate::event_data::AlarmEventData;
use crate::kind::AlarmKind;

/// Lifecycle state of a single alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlarmState {
    #[default]
    Idle,
    Raised,
    Cleared,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Idle => "IDLE",
            AlarmState::Raised => "RAISED",
            AlarmState::Cleared => "CLEARED",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Live, mutable state of one alarm.
///
/// Only `condition` and `event_data` are written by the driver; everything
/// else is advanced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmRecord {
    pub(crate) id: AlarmKind,
    pub(crate) event_only: bool,
    pub(crate) age: u32,
    pub(crate) state: AlarmState,
    pub(crate) condition: bool,
    pub(crate) time_raised: Option<DateTime<Utc>>,
    pub(crate) time_cleared: Option<DateTime<Utc>>,
    pub(crate) internal_only: bool,
    pub(crate) event_data: AlarmEventData,
}

impl AlarmRecord {
    fn new(id: AlarmKind) -> Self {
        Self {
            id,
            event_only: id.is_event_only(),
            age: 0,
            state: AlarmState::Idle,
            condition: false,
            time_raised: None,
            time_cleared: None,
            internal_only: false,
            event_data: AlarmEventData::default(),
        }
    }

    pub fn id(&self) -> AlarmKind {
        self.id
    }

    pub fn is_event_only(&self) -> bool {
        self.event_only
    }

    /// Ticks spent in the current state.
    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn time_raised(&self) -> Option<DateTime<Utc>> {
        self.time_raised
    }

    pub fn time_cleared(&self) -> Option<DateTime<Utc>> {
        self.time_cleared
    }

    pub fn is_internal_only(&self) -> bool {
        self.internal_only
    }

    pub fn event_data(&self) -> &AlarmEventData {
        &self.event_data
    }
}

/// Static description of an alarm type plus its live record.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmDescriptor {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    pub(crate) enabled: bool,
    pub(crate) record: AlarmRecord,
}

impl AlarmDescriptor {
    fn new(kind: AlarmKind) -> Self {
        Self {
            code: kind.code(),
            name: kind.name(),
            description: kind.description(),
            enabled: true,
            record: AlarmRecord::new(kind),
        }
    }

    pub fn kind(&self) -> AlarmKind {
        self.record.id
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&self) -> &AlarmRecord {
        &self.record
    }

    /// Enabled and not marked internal-only.
    pub fn is_operator_visible(&self) -> bool {
        self.enabled && !self.record.internal_only
    }
}

/// Fixed table of every alarm the daemon knows about, indexed by
/// [`AlarmKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmRegistry {
    descriptors: [AlarmDescriptor; AlarmKind::COUNT],
}

impl Default for AlarmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: AlarmKind::ALL.map(AlarmDescriptor::new),
        }
    }

    /// Reset every slot to its catalog defaults: enabled, idle, age zero,
    /// condition false, no timestamps and an empty payload.
    ///
    /// # Panics
    ///
    /// Panics when `count` differs from [`AlarmKind::COUNT`]; the registry
    /// size is fixed at compile time and any other value is a caller bug.
    pub fn initialize(&mut self, count: usize) {
        assert_eq!(
            count,
            AlarmKind::COUNT,
            "alarm registry holds exactly {} alarms",
            AlarmKind::COUNT
        );
        self.descriptors = AlarmKind::ALL.map(AlarmDescriptor::new);
        debug!(count, "alarm registry initialised");
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, kind: AlarmKind) -> &AlarmDescriptor {
        &self.descriptors[kind.index()]
    }

    pub fn get_mut(&mut self, kind: AlarmKind) -> &mut AlarmDescriptor {
        &mut self.descriptors[kind.index()]
    }

    pub fn record(&self, kind: AlarmKind) -> &AlarmRecord {
        &self.get(kind).record
    }

    /// Descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &AlarmDescriptor> {
        self.descriptors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AlarmDescriptor> {
        self.descriptors.iter_mut()
    }

    /// Driver-side write of the raw condition signal.
    pub fn set_condition(&mut self, kind: AlarmKind, condition: bool) {
        self.get_mut(kind).record.condition = condition;
    }

    /// Write the condition together with the diagnostic payload to report.
    pub fn set_condition_with(&mut self, kind: AlarmKind, condition: bool, data: AlarmEventData) {
        let record = &mut self.get_mut(kind).record;
        record.condition = condition;
        record.event_data = data;
    }

    /// Disabled alarms keep their slot and state but are skipped by the
    /// engine and the reporter.
    pub fn set_enabled(&mut self, kind: AlarmKind, enabled: bool) {
        self.get_mut(kind).enabled = enabled;
    }

    pub fn set_internal_only(&mut self, kind: AlarmKind, internal_only: bool) {
        self.get_mut(kind).record.internal_only = internal_only;
    }

    /// Apply the `disabled` and `internal_only` lists from configuration.
    ///
    /// All identifiers are resolved before anything is changed, so an
    /// unknown identifier leaves the registry untouched.
    pub fn apply_config(&mut self, config: &AlarmsConfig) -> Result<()> {
        let disabled = config
            .disabled
            .iter()
            .map(|id| AlarmKind::from_identifier(id))
            .collect::<Result<Vec<_>>>()?;
        let internal = config
            .internal_only
            .iter()
            .map(|id| AlarmKind::from_identifier(id))
            .collect::<Result<Vec<_>>>()?;

        for kind in disabled {
            self.set_enabled(kind, false);
            debug!(alarm = kind.code(), "alarm disabled by configuration");
        }
        for kind in internal {
            self.set_internal_only(kind, true);
            debug!(alarm = kind.code(), "alarm marked internal-only by configuration");
        }
        Ok(())
    }

    /// Kinds currently in the raised state, in registry order.
    pub fn raised(&self) -> impl Iterator<Item = AlarmKind> + '_ {
        self.iter()
            .filter(|descriptor| descriptor.enabled && descriptor.record.state == AlarmState::Raised)
            .map(AlarmDescriptor::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AlarmError;

    #[test]
    fn new_registry_is_idle_and_enabled() {
        let registry = AlarmRegistry::new();
        assert_eq!(registry.len(), AlarmKind::COUNT);
        for (descriptor, kind) in registry.iter().zip(AlarmKind::ALL) {
            assert_eq!(descriptor.kind(), kind);
            assert!(descriptor.is_enabled());
            let record = descriptor.record();
            assert_eq!(record.state(), AlarmState::Idle);
            assert_eq!(record.age(), 0);
            assert!(!record.condition());
            assert!(record.time_raised().is_none());
            assert!(record.time_cleared().is_none());
            assert!(record.event_data().is_empty());
            assert_eq!(record.is_event_only(), kind.is_event_only());
        }
    }

    #[test]
    fn initialize_discards_previous_state() {
        let mut registry = AlarmRegistry::new();
        registry.set_condition(AlarmKind::NoSync, true);
        registry.set_enabled(AlarmKind::NoDelay, false);
        registry.set_internal_only(AlarmKind::OfmSeconds, true);
        registry.get_mut(AlarmKind::NoSync).record.state = AlarmState::Raised;

        registry.initialize(AlarmKind::COUNT);
        assert_eq!(registry, AlarmRegistry::new());
    }

    #[test]
    #[should_panic(expected = "alarm registry holds exactly")]
    fn initialize_rejects_wrong_count() {
        AlarmRegistry::new().initialize(AlarmKind::COUNT - 1);
    }

    #[test]
    fn apply_config_is_all_or_nothing() {
        let mut registry = AlarmRegistry::new();
        let config = AlarmsConfig {
            disabled: vec!["DOM".into(), "nope".into()],
            ..AlarmsConfig::default()
        };
        assert_eq!(
            registry.apply_config(&config),
            Err(AlarmError::UnknownAlarm("nope".into()))
        );
        assert!(registry.get(AlarmKind::DomainMismatch).is_enabled());

        let config = AlarmsConfig {
            disabled: vec!["DOM".into()],
            internal_only: vec!["ofm_seconds".into()],
            ..AlarmsConfig::default()
        };
        registry.apply_config(&config).expect("known identifiers");
        assert!(!registry.get(AlarmKind::DomainMismatch).is_enabled());
        assert!(registry.record(AlarmKind::OfmSeconds).is_internal_only());
        assert!(!registry.get(AlarmKind::OfmSeconds).is_operator_visible());
    }
}
