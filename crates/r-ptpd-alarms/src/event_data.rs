//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Diagnostic payload captured alongside an alarm condition.
//!
//! The payload is a plain `Copy` value so the protocol layer can hand the
//! alarm engine exactly the context it wants reported without the engine
//! depending on the protocol's clock or port state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// PTP port states (IEEE 1588 clause 9.2.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortState {
    Initializing,
    Faulty,
    Disabled,
    Listening,
    PreMaster,
    Master,
    Passive,
    Uncalibrated,
    Slave,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PortState::Initializing => "INITIALIZING",
            PortState::Faulty => "FAULTY",
            PortState::Disabled => "DISABLED",
            PortState::Listening => "LISTENING",
            PortState::PreMaster => "PRE_MASTER",
            PortState::Master => "MASTER",
            PortState::Passive => "PASSIVE",
            PortState::Uncalibrated => "UNCALIBRATED",
            PortState::Slave => "SLAVE",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortIdentity {
    pub clock_identity: [u8; 8],
    pub port_number: u16,
}

impl fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.clock_identity {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "/{}", self.port_number)
    }
}

/// Subset of the time properties data set announced by the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeProperties {
    pub current_utc_offset: i16,
    pub current_utc_offset_valid: bool,
    pub leap59: bool,
    pub leap61: bool,
    pub time_traceable: bool,
    pub frequency_traceable: bool,
    pub ptp_timescale: bool,
    pub time_source: u8,
}

/// Alarm-specific snapshot; every field is optional and only the ones the
/// protocol layer filled in are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmEventData {
    pub port_state: Option<PortState>,
    pub offset_from_master_ns: Option<i64>,
    pub ofm_threshold_ns: Option<i64>,
    pub best_master: Option<PortIdentity>,
    pub time_properties: Option<TimeProperties>,
    pub domain_number: Option<u8>,
}

impl AlarmEventData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_port_state(mut self, state: PortState) -> Self {
        self.port_state = Some(state);
        self
    }

    pub fn with_offset(mut self, offset_ns: i64, threshold_ns: Option<i64>) -> Self {
        self.offset_from_master_ns = Some(offset_ns);
        self.ofm_threshold_ns = threshold_ns;
        self
    }

    pub fn with_best_master(mut self, master: PortIdentity) -> Self {
        self.best_master = Some(master);
        self
    }

    pub fn with_time_properties(mut self, properties: TimeProperties) -> Self {
        self.time_properties = Some(properties);
        self
    }

    pub fn with_domain(mut self, domain: u8) -> Self {
        self.domain_number = Some(domain);
        self
    }
}

impl fmt::Display for AlarmEventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(state) = self.port_state {
            parts.push(format!("port_state={state}"));
        }
        if let Some(offset) = self.offset_from_master_ns {
            parts.push(format!("offset_ns={offset}"));
        }
        if let Some(threshold) = self.ofm_threshold_ns {
            parts.push(format!("threshold_ns={threshold}"));
        }
        if let Some(master) = self.best_master {
            parts.push(format!("best_master={master}"));
        }
        if let Some(props) = self.time_properties {
            parts.push(format!(
                "utc_offset={} utc_offset_valid={} leap59={} leap61={} ptp_timescale={} time_source=0x{:02x}",
                props.current_utc_offset,
                props.current_utc_offset_valid,
                props.leap59,
                props.leap61,
                props.ptp_timescale,
                props.time_source
            ));
        }
        if let Some(domain) = self.domain_number {
            parts.push(format!("domain={domain}"));
        }
        if parts.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}
