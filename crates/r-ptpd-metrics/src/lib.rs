//! ---
//! ptpd_section: "03-observability"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Metrics collection and export utilities."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::sync::Arc;

use prometheus::Registry;

mod alarms;
mod daemon;
mod server;

pub use alarms::{state_value, AlarmMetrics};
pub use daemon::DaemonMetrics;
pub use server::{spawn_http_server, MetricsServer};

/// Registry handle shared by every metrics group in the daemon.
pub type SharedRegistry = Arc<Registry>;

pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

pub use prometheus;
