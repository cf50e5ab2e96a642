//! ---
//! ptpd_section: "01-core-functionality"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Shared primitives and utilities for the core runtime."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Core shared primitives for the R-PTPD workspace.
//! This crate exposes configuration loading, logging setup, and the clock
//! sources consumed by the alarm engine and the daemon.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    AlarmsConfig, AppConfig, LoadedAppConfig, LoggingConfig, MetricsConfig, StatusConfig,
};
pub use logging::{init_tracing, LogFormat};
pub use time::{Clock, ManualClock, SystemClock};
