//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Binary entrypoint for the R-PTPD alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use r_ptpd_alarms::{AlarmError, AlarmNotification, StatusReport};

/// Text for the `Alarms:` line, including the truncation case.
pub fn summary_line(summary: &Result<String, AlarmError>) -> String {
    match summary {
        Ok(codes) => codes.clone(),
        Err(AlarmError::SummaryTruncated { required, capacity }) => {
            format!("(truncated: {required} characters exceed capacity {capacity})")
        }
        Err(err) => format!("(unavailable: {err})"),
    }
}

/// Full status document: summary line, table and the recent notifications.
pub fn render_status(
    report: &StatusReport,
    recent: &[AlarmNotification],
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Alarms: {}", summary_line(&report.summary));
    let _ = writeln!(out, "Ticks: {}", report.ticks);
    let _ = writeln!(
        out,
        "Updated: {}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    out.push('\n');
    out.push_str(&report.table);

    let visible: Vec<&AlarmNotification> = recent.iter().filter(|n| !n.internal_only).collect();
    if !visible.is_empty() {
        out.push_str("\nRecent:\n");
        for n in visible.iter().rev() {
            let _ = writeln!(
                out,
                "{}  {:<4}  {:<7}  {}",
                n.at.to_rfc3339_opts(SecondsFormat::Secs, true),
                n.code(),
                n.event,
                n.data
            );
        }
    }
    out
}

/// Publishes the status document to a file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling the document is written to before it is renamed into place.
    /// The suffix is appended, so no other file name is reused.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("status"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub async fn publish(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create status directory {}", parent.display()))?;
        }
        let staging = self.staging_path();
        tokio::fs::write(&staging, contents)
            .await
            .with_context(|| format!("failed to write status file {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("failed to replace status file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use r_ptpd_alarms::{AlarmEvent, AlarmEventData, AlarmKind};

    fn report(summary: Result<String, AlarmError>) -> StatusReport {
        StatusReport {
            ticks: 7,
            summary,
            table: "CODE  NAME\n".to_owned(),
        }
    }

    #[test]
    fn status_lists_newest_visible_notification_first() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let note = |kind, event, internal_only| AlarmNotification {
            kind,
            event,
            at,
            data: AlarmEventData::default().with_domain(3),
            internal_only,
        };
        let recent = vec![
            note(AlarmKind::NoSync, AlarmEvent::Raised, false),
            note(AlarmKind::NetworkFault, AlarmEvent::Raised, true),
            note(AlarmKind::ClockStep, AlarmEvent::Event, false),
        ];
        let text = render_status(&report(Ok("SYN".into())), &recent, at);

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Alarms: SYN"));
        assert_eq!(lines.next(), Some("Ticks: 7"));
        assert_eq!(lines.next(), Some("Updated: 2024-05-02T10:00:00Z"));
        let tail: Vec<&str> = text.lines().skip_while(|l| *l != "Recent:").skip(1).collect();
        assert_eq!(tail.len(), 2);
        assert!(tail[0].contains("STEP  event"));
        assert!(tail[1].contains("SYN   raised"));
        assert!(!text.contains("NWFL"));
    }

    #[test]
    fn truncated_summary_is_reported_inline() {
        let line = summary_line(&Err(AlarmError::SummaryTruncated {
            required: 40,
            capacity: 16,
        }));
        assert!(line.contains("40"));
        assert!(line.contains("16"));
    }

    #[tokio::test]
    async fn publish_replaces_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StatusFile::new(dir.path().join("run/alarms.status"));
        file.publish("first\n").await.expect("first publish");
        file.publish("second\n").await.expect("second publish");
        let contents = std::fs::read_to_string(file.path()).expect("read back");
        assert_eq!(contents, "second\n");
        assert!(!dir.path().join("run/alarms.status.tmp").exists());
    }

    #[tokio::test]
    async fn publish_leaves_similarly_named_files_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let neighbour = dir.path().join("alarms.tmp");
        std::fs::write(&neighbour, "keep\n").expect("write neighbour");

        let file = StatusFile::new(dir.path().join("alarms.status"));
        file.publish("status\n").await.expect("publish");
        assert_eq!(std::fs::read_to_string(&neighbour).expect("read"), "keep\n");

        let tmp_target = StatusFile::new(dir.path().join("alarms.tmp"));
        tmp_target.publish("target\n").await.expect("publish to .tmp path");
        assert_eq!(
            std::fs::read_to_string(tmp_target.path()).expect("read back"),
            "target\n"
        );
        assert!(!dir.path().join("alarms.tmp.tmp").exists());
    }
}
