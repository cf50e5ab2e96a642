//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::event_data::AlarmEventData;
use crate::kind::AlarmKind;

/// Edge reported to a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmEvent {
    /// An event-only alarm fired on this tick.
    Event,
    Raised,
    Cleared,
}

impl fmt::Display for AlarmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlarmEvent::Event => "event",
            AlarmEvent::Raised => "raised",
            AlarmEvent::Cleared => "cleared",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmNotification {
    pub kind: AlarmKind,
    pub event: AlarmEvent,
    pub at: DateTime<Utc>,
    pub data: AlarmEventData,
    pub internal_only: bool,
}

impl AlarmNotification {
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Sink invoked synchronously from the update pass; implementations must
/// not block.
pub trait AlarmNotifier: Send {
    fn notify(&mut self, notification: &AlarmNotification);
}

impl<A, B> AlarmNotifier for (A, B)
where
    A: AlarmNotifier,
    B: AlarmNotifier,
{
    fn notify(&mut self, notification: &AlarmNotification) {
        self.0.notify(notification);
        self.1.notify(notification);
    }
}

impl AlarmNotifier for Box<dyn AlarmNotifier> {
    fn notify(&mut self, notification: &AlarmNotification) {
        (**self).notify(notification);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl AlarmNotifier for NullNotifier {
    fn notify(&mut self, _notification: &AlarmNotification) {}
}

/// Emits one structured log line per notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl AlarmNotifier for TracingNotifier {
    fn notify(&mut self, n: &AlarmNotification) {
        let at = n.at.to_rfc3339();
        match n.event {
            AlarmEvent::Raised => warn!(
                alarm = n.code(),
                name = n.kind.name(),
                at = %at,
                internal = n.internal_only,
                data = %n.data,
                "alarm raised: {}",
                n.kind.description()
            ),
            AlarmEvent::Cleared => info!(
                alarm = n.code(),
                name = n.kind.name(),
                at = %at,
                internal = n.internal_only,
                data = %n.data,
                "alarm cleared"
            ),
            AlarmEvent::Event => info!(
                alarm = n.code(),
                name = n.kind.name(),
                at = %at,
                internal = n.internal_only,
                data = %n.data,
                "alarm event: {}",
                n.kind.description()
            ),
        }
    }
}

/// Bounded in-memory history of recent notifications.
///
/// Clones share the same buffer, so one handle can be given to the engine
/// while another is read by the status writer.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    capacity: usize,
    entries: Arc<Mutex<VecDeque<AlarmNotification>>>,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<AlarmNotification> {
        self.entries.lock().iter().copied().collect()
    }

    pub fn drain(&self) -> Vec<AlarmNotification> {
        self.entries.lock().drain(..).collect()
    }
}

impl AlarmNotifier for NotificationLog {
    fn notify(&mut self, notification: &AlarmNotification) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(*notification);
    }
}
