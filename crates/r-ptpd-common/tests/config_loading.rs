//! ---
//! ptpd_section: "01-core-functionality"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Shared primitives and utilities for the core runtime."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::fs;
use std::time::Duration;

use r_ptpd_common::config::AppConfig;
use tempfile::tempdir;

#[test]
fn first_existing_candidate_is_loaded() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("missing.toml");
    let present = temp.path().join("alarmd.toml");
    fs::write(
        &present,
        "[alarms]\nmin_age_to_clear = 12\n\n[status]\nrefresh_ticks = 5\n",
    )
    .unwrap();

    let loaded = AppConfig::load_with_source(&[missing, present.clone()]).expect("config loads");
    assert_eq!(loaded.source, present);
    assert_eq!(loaded.config.alarms.min_age_to_clear, 12);
    assert_eq!(loaded.config.alarms.update_interval, Duration::from_secs(1));
    assert_eq!(loaded.config.status.refresh_ticks, 5);
}

#[test]
fn missing_candidates_are_listed_in_the_error() {
    let temp = tempdir().expect("tempdir");
    let a = temp.path().join("a.toml");
    let b = temp.path().join("b.toml");
    let err = AppConfig::load(&[a, b]).expect_err("nothing to load");
    let message = err.to_string();
    assert!(message.contains("a.toml"));
    assert!(message.contains("b.toml"));
}

#[test]
fn invalid_file_reports_its_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[alarms]\nsummary_capacity = 0\n").unwrap();
    let err = AppConfig::from_path(&path).expect_err("validation fails");
    assert!(format!("{err:#}").contains("summary_capacity"));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn shipped_example_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs/r-ptpd-alarmd.toml");
    let config = AppConfig::from_path(&path).expect("example config parses");
    assert_eq!(config.alarms.min_age_to_clear, 30);
    assert_eq!(config.alarms.internal_only, vec!["OFMS"]);
    assert!(config.status.path.is_some());
}
