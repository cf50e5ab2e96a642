//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Alarm monitoring core for the R-PTPD daemon.
//!
//! The protocol layer flags conditions on an [`AlarmRegistry`]; once per
//! tick the [`AlarmEngine`] ages every alarm and walks it through the
//! debounced Idle / Raised / Cleared lifecycle; the [`report`] module
//! renders the registry for status files and log lines. [`AlarmMonitor`]
//! wraps all three behind one lock for multi-threaded hosts.

pub mod engine;
pub mod errors;
pub mod event_data;
pub mod kind;
pub mod monitor;
pub mod notify;
pub mod registry;
pub mod report;

pub use engine::{next_state, AlarmEngine, AlarmTransition};
pub use errors::{AlarmError, Result};
pub use event_data::{AlarmEventData, PortIdentity, PortState, TimeProperties};
pub use kind::AlarmKind;
pub use monitor::{AlarmMonitor, StatusReport};
pub use notify::{
    AlarmEvent, AlarmNotification, AlarmNotifier, NotificationLog, NullNotifier, TracingNotifier,
};
pub use registry::{AlarmDescriptor, AlarmRecord, AlarmRegistry, AlarmState};
pub use report::{render_catalog, render_summary, render_table, write_summary, SUMMARY_NONE};
