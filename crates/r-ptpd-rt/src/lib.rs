//! ---
//! ptpd_section: "01-core-functionality"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Runtime helpers driving the alarm tick loop."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Tick pacing for the alarm update loop.

pub mod scheduling;

pub use scheduling::RateLimiter;
