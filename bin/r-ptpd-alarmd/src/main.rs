//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Binary entrypoint for the R-PTPD alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use r_ptpd_alarms::{AlarmMonitor, NotificationLog, NullNotifier, TracingNotifier};
use r_ptpd_common::config::AppConfig;
use r_ptpd_common::logging::init_tracing;
use r_ptpd_common::time::SystemClock;
use r_ptpd_metrics::{new_registry, spawn_http_server, AlarmMetrics, DaemonMetrics};
use r_ptpd_rt::RateLimiter;
use tokio::signal;
use tracing::{debug, info, warn};

mod replay;
mod scenario;
mod status;
mod version;

use scenario::Scenario;
use status::{render_status, StatusFile};
use version::VersionInfo;

const RECENT_NOTIFICATIONS: usize = 16;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "R-PTPD alarm daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the alarm tick loop until interrupted")]
    Run {
        #[arg(long, value_name = "FILE", help = "Drive alarm conditions from a JSON scenario")]
        scenario: Option<PathBuf>,
    },
    #[command(about = "Print the alarm catalog with configured overrides")]
    Describe,
    #[command(about = "Replay a JSON scenario without real-time pacing")]
    Replay {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let version = VersionInfo::current();
    if cli.version {
        println!("{}", version.extended());
        return Ok(());
    }

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/r-ptpd-alarmd.toml"));
    candidates.push(PathBuf::from("/etc/r-ptpd/alarmd.toml"));

    let load_started = Instant::now();
    let loaded = AppConfig::load_with_source(&candidates)?;
    let load_duration = load_started.elapsed();
    let config = loaded.config;

    init_tracing("r-ptpd-alarmd", &config.logging)?;
    info!(
        config_path = %loaded.source.display(),
        banner = %version.banner(),
        "configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Run { scenario: None }) {
        Commands::Run { scenario } => {
            let scenario = scenario
                .as_deref()
                .map(Scenario::from_path)
                .transpose()?;
            run_daemon(config, scenario, version, load_duration.as_secs_f64()).await?
        }
        Commands::Describe => {
            let monitor = AlarmMonitor::from_config(&config.alarms, SystemClock, NullNotifier)
                .context("failed to apply alarm configuration")?;
            print!("{}", monitor.catalog());
        }
        Commands::Replay { file } => {
            let scenario = Scenario::from_path(&file)?;
            let stdout = io::stdout();
            replay::replay(&scenario, &config.alarms, Utc::now(), &mut stdout.lock())?;
        }
    }

    Ok(())
}

async fn run_daemon(
    config: AppConfig,
    scenario: Option<Scenario>,
    version: VersionInfo,
    config_load_seconds: f64,
) -> Result<()> {
    let metrics_registry = new_registry();
    let daemon_metrics = DaemonMetrics::new(&metrics_registry)?;
    daemon_metrics.observe_config_load(config_load_seconds);
    daemon_metrics.inc_start();
    daemon_metrics.set_build_info(&version.semver, &version.git_sha, &version.profile);
    let alarm_metrics = AlarmMetrics::new(&metrics_registry)?;

    let metrics_server = if config.metrics.enabled {
        Some(spawn_http_server(metrics_registry.clone(), config.metrics.listen)?)
    } else {
        info!("metrics exporter disabled by configuration");
        None
    };

    let recent = NotificationLog::new(RECENT_NOTIFICATIONS);
    let notifier = (TracingNotifier, (recent.clone(), alarm_metrics.clone()));
    let monitor = Arc::new(
        AlarmMonitor::from_config(&config.alarms, SystemClock, notifier)
            .context("failed to apply alarm configuration")?,
    );
    let status_file = config.status.path.clone().map(StatusFile::new);
    if let Some(file) = &status_file {
        info!(path = %file.path().display(), "publishing alarm status");
    }
    if let Some(scenario) = &scenario {
        info!(
            scenario = scenario.name(),
            ticks = scenario.ticks(),
            "driving alarm conditions from scenario"
        );
    }

    let mut limiter =
        RateLimiter::with_initial_delay(config.alarms.update_interval, config.alarms.initial_delay);
    info!(
        interval_ms = config.alarms.update_interval.as_millis() as u64,
        initial_delay_ms = config.alarms.initial_delay.as_millis() as u64,
        min_age_to_clear = config.alarms.min_age_to_clear,
        "alarm loop starting; waiting for termination signal"
    );

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);
    let capacity = config.alarms.summary_capacity;
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for ctrl-c")?;
                info!("ctrl-c received; shutting down");
                break;
            }
            _ = limiter.tick() => {
                let tick = monitor.ticks();
                if let Some(scenario) = &scenario {
                    monitor.with_registry(|registry| scenario.apply(tick, registry));
                    if tick + 1 == scenario.ticks() {
                        info!(scenario = scenario.name(), "scenario complete; conditions held");
                    }
                }
                let transitions = monitor.tick();
                monitor.with_registry(|registry| alarm_metrics.record_tick(registry, &transitions));
                let completed = tick + 1;

                if completed % config.status.refresh_ticks == 0 {
                    let report = monitor.report(capacity);
                    if let Err(err) = &report.summary {
                        warn!(error = %err, "alarm summary does not fit");
                    }
                    if let Some(file) = &status_file {
                        let contents = render_status(&report, &recent.snapshot(), Utc::now());
                        if let Err(err) = file.publish(&contents).await {
                            warn!(error = %format!("{err:#}"), "failed to publish alarm status");
                        }
                    }
                }
                if config.status.log_table_ticks > 0
                    && completed % config.status.log_table_ticks == 0
                {
                    info!(table = %monitor.table(), "alarm table");
                }
                debug!(tick = completed, transitions = transitions.len(), "alarm tick");
            }
        }
    }

    if let Some(server) = metrics_server {
        server.shutdown().await?;
    }
    Ok(())
}
