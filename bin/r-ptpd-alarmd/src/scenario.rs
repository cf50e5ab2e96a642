//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Binary entrypoint for the R-PTPD alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
//! Scripted condition feeds.
//!
//! A scenario stands in for the protocol layer: each step sets one alarm's
//! condition (and optionally its payload) before the update pass of the
//! given zero-based tick. Conditions persist until a later step changes
//! them.
//!
//! ```json
//! {
//!   "name": "sync loss",
//!   "ticks": 40,
//!   "steps": [
//!     { "tick": 0, "alarm": "SYN", "condition": true },
//!     { "tick": 1, "alarm": "SYN", "condition": false }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use r_ptpd_alarms::{AlarmEventData, AlarmKind, AlarmRegistry};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    ticks: Option<u64>,
    steps: Vec<StepFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepFile {
    tick: u64,
    alarm: String,
    condition: bool,
    #[serde(default)]
    data: Option<AlarmEventData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStep {
    pub tick: u64,
    pub kind: AlarmKind,
    pub condition: bool,
    pub data: Option<AlarmEventData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: String,
    ticks: u64,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read scenario {}", path.display()))?;
        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scenario".to_owned());
        Self::from_json(&contents, &fallback)
            .with_context(|| format!("invalid scenario {}", path.display()))
    }

    /// Parse a scenario document; `fallback_name` is used when the document
    /// carries no `name`.
    pub fn from_json(contents: &str, fallback_name: &str) -> Result<Self> {
        let file: ScenarioFile =
            serde_json::from_str(contents).context("failed to parse scenario JSON")?;

        let mut steps = file
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| -> Result<ScenarioStep> {
                let kind = AlarmKind::from_identifier(&step.alarm)
                    .map_err(|err| anyhow!("step {index}: {err}"))?;
                Ok(ScenarioStep {
                    tick: step.tick,
                    kind,
                    condition: step.condition,
                    data: step.data,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        // Stable, so steps sharing a tick keep their document order.
        steps.sort_by_key(|step| step.tick);

        let needed = steps.last().map_or(0, |step| step.tick.saturating_add(1));
        let ticks = match file.ticks {
            Some(ticks) if ticks < needed => {
                return Err(anyhow!(
                    "scenario declares {ticks} ticks but has a step at tick {}",
                    needed - 1
                ))
            }
            Some(ticks) => ticks,
            None => needed,
        };

        Ok(Self {
            name: file.name.unwrap_or_else(|| fallback_name.to_owned()),
            ticks,
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of update passes the scenario covers.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Write the steps scheduled for `tick` into the registry and return
    /// how many were applied.
    pub fn apply(&self, tick: u64, registry: &mut AlarmRegistry) -> usize {
        let start = self.steps.partition_point(|step| step.tick < tick);
        let due = self.steps[start..]
            .iter()
            .take_while(|step| step.tick == tick);
        let mut applied = 0;
        for step in due {
            match step.data {
                Some(data) => registry.set_condition_with(step.kind, step.condition, data),
                None => registry.set_condition(step.kind, step.condition),
            }
            debug!(
                tick,
                alarm = step.kind.code(),
                condition = step.condition,
                "scenario step applied"
            );
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use r_ptpd_alarms::PortState;

    const DOC: &str = r#"{
        "steps": [
            { "tick": 3, "alarm": "no_sync", "condition": false },
            { "tick": 0, "alarm": "SYN", "condition": true },
            { "tick": 0, "alarm": "STA", "condition": true,
              "data": { "port_state": "faulty" } }
        ]
    }"#;

    #[test]
    fn steps_are_ordered_and_length_inferred() {
        let scenario = Scenario::from_json(DOC, "fallback").expect("valid scenario");
        assert_eq!(scenario.name(), "fallback");
        assert_eq!(scenario.ticks(), 4);
        let ticks: Vec<u64> = scenario.steps().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 0, 3]);
        assert_eq!(scenario.steps()[0].kind, AlarmKind::NoSync);
    }

    #[test]
    fn apply_writes_only_due_steps() {
        let scenario = Scenario::from_json(DOC, "fallback").expect("valid scenario");
        let mut registry = AlarmRegistry::new();
        assert_eq!(scenario.apply(0, &mut registry), 2);
        assert!(registry.record(AlarmKind::NoSync).condition());
        assert_eq!(
            registry.record(AlarmKind::PortState).event_data().port_state,
            Some(PortState::Faulty)
        );
        assert_eq!(scenario.apply(1, &mut registry), 0);
        assert!(registry.record(AlarmKind::NoSync).condition());
        assert_eq!(scenario.apply(3, &mut registry), 1);
        assert!(!registry.record(AlarmKind::NoSync).condition());
    }

    #[test]
    fn unknown_alarm_names_the_step() {
        let err = Scenario::from_json(
            r#"{"steps":[{"tick":0,"alarm":"SYN","condition":true},{"tick":1,"alarm":"BOGUS","condition":true}]}"#,
            "x",
        )
        .expect_err("unknown alarm");
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn declared_length_must_cover_steps() {
        let err = Scenario::from_json(
            r#"{"ticks":2,"steps":[{"tick":5,"alarm":"DLY","condition":true}]}"#,
            "x",
        )
        .expect_err("too short");
        assert!(err.to_string().contains("tick 5"));
        let scenario = Scenario::from_json(r#"{"ticks":10,"steps":[]}"#, "x").expect("valid");
        assert_eq!(scenario.ticks(), 10);
    }
}
