//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlarmError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlarmError {
    #[error("alarm summary needs {required} characters but capacity is {capacity}")]
    SummaryTruncated { required: usize, capacity: usize },
    #[error("unknown alarm identifier: {0}")]
    UnknownAlarm(String),
}
