//! ---
//! ptpd_section: "02-alarm-monitoring"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Alarm lifecycle engine and status reporting."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::str::FromStr;

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::errors::AlarmError;

/// Every condition the daemon monitors, in registry order.
///
/// The discriminant doubles as the slot index in the
/// [`AlarmRegistry`](crate::AlarmRegistry).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, IntoStaticStr,
)]
pub enum AlarmKind {
    #[strum(serialize = "PORT_STATE")]
    PortState,
    #[strum(serialize = "OFM_THRESHOLD")]
    OfmThreshold,
    #[strum(serialize = "OFM_SECONDS")]
    OfmSeconds,
    #[strum(serialize = "CLOCK_STEP")]
    ClockStep,
    #[strum(serialize = "NO_SYNC")]
    NoSync,
    #[strum(serialize = "NO_DELAY")]
    NoDelay,
    #[strum(serialize = "MASTER_CHANGE")]
    MasterChange,
    #[strum(serialize = "NETWORK_FAULT")]
    NetworkFault,
    #[strum(serialize = "FAST_ADJ")]
    FastAdjustment,
    #[strum(serialize = "TIMEPROP_CHANGE")]
    TimePropertiesChange,
    #[strum(serialize = "DOMAIN_MISMATCH")]
    DomainMismatch,
}

impl AlarmKind {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    pub const ALL: [AlarmKind; Self::COUNT] = [
        AlarmKind::PortState,
        AlarmKind::OfmThreshold,
        AlarmKind::OfmSeconds,
        AlarmKind::ClockStep,
        AlarmKind::NoSync,
        AlarmKind::NoDelay,
        AlarmKind::MasterChange,
        AlarmKind::NetworkFault,
        AlarmKind::FastAdjustment,
        AlarmKind::TimePropertiesChange,
        AlarmKind::DomainMismatch,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short operator code, at most four characters.
    pub fn code(self) -> &'static str {
        match self {
            AlarmKind::PortState => "STA",
            AlarmKind::OfmThreshold => "OFM",
            AlarmKind::OfmSeconds => "OFMS",
            AlarmKind::ClockStep => "STEP",
            AlarmKind::NoSync => "SYN",
            AlarmKind::NoDelay => "DLY",
            AlarmKind::MasterChange => "MSTC",
            AlarmKind::NetworkFault => "NWFL",
            AlarmKind::FastAdjustment => "FADJ",
            AlarmKind::TimePropertiesChange => "TPR",
            AlarmKind::DomainMismatch => "DOM",
        }
    }

    /// Full alarm name, at most thirty characters.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn description(self) -> &'static str {
        match self {
            AlarmKind::PortState => "Port state different to expected value",
            AlarmKind::OfmThreshold => "Slave offset from master outside specified threshold",
            AlarmKind::OfmSeconds => "Slave offset from master above 1 second",
            AlarmKind::ClockStep => "Clock was stepped",
            AlarmKind::NoSync => "Clock is not receiving Sync messages",
            AlarmKind::NoDelay => "Clock is not receiving (p)Delay Response messages",
            AlarmKind::MasterChange => "Best master has changed",
            AlarmKind::NetworkFault => "A network fault has occurred",
            AlarmKind::FastAdjustment => "Clock is being adjusted too fast",
            AlarmKind::TimePropertiesChange => "Time properties have changed",
            AlarmKind::DomainMismatch => "Clock is receiving all messages from incorrect domain",
        }
    }

    /// Pure events are dispatched on every tick their condition holds and
    /// never keep a raised state.
    pub fn is_event_only(self) -> bool {
        matches!(
            self,
            AlarmKind::ClockStep | AlarmKind::MasterChange | AlarmKind::TimePropertiesChange
        )
    }

    /// Resolve an alarm from its short code or full name, ignoring case.
    pub fn from_identifier(identifier: &str) -> Result<Self, AlarmError> {
        let wanted = identifier.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.code().eq_ignore_ascii_case(wanted) || kind.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| AlarmError::UnknownAlarm(identifier.to_owned()))
    }
}

impl std::fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for AlarmKind {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn all_matches_declaration_order() {
        let iterated: Vec<AlarmKind> = AlarmKind::iter().collect();
        assert_eq!(iterated, AlarmKind::ALL.to_vec());
        for (index, kind) in AlarmKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
    }

    #[test]
    fn catalog_text_respects_field_limits() {
        for kind in AlarmKind::ALL {
            assert!(kind.code().len() <= 4, "{kind:?} code too long");
            assert!(kind.name().len() <= 30, "{kind:?} name too long");
            assert!(kind.description().len() <= 100, "{kind:?} description too long");
        }
    }

    #[test]
    fn identifiers_resolve_by_code_or_name() {
        assert_eq!("syn".parse::<AlarmKind>(), Ok(AlarmKind::NoSync));
        assert_eq!("FAST_ADJ".parse::<AlarmKind>(), Ok(AlarmKind::FastAdjustment));
        assert_eq!(
            AlarmKind::from_identifier(" timeprop_change "),
            Ok(AlarmKind::TimePropertiesChange)
        );
        assert_eq!(
            "bogus".parse::<AlarmKind>(),
            Err(AlarmError::UnknownAlarm("bogus".into()))
        );
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<&str> = AlarmKind::ALL.iter().map(|kind| kind.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), AlarmKind::COUNT);
    }
}
