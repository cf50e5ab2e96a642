//! ---
//! ptpd_section: "03-observability"
//! ptpd_subsection: "tests"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Integration tests for the metrics scrape endpoint."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use r_ptpd_alarms::AlarmRegistry;
use r_ptpd_metrics::{new_registry, spawn_http_server, AlarmMetrics, DaemonMetrics};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn scrape_endpoint_serves_registered_metrics() {
    let registry = new_registry();
    let daemon = DaemonMetrics::new(&registry).expect("daemon metrics");
    daemon.inc_start();
    daemon.set_build_info("0.1.0", "unknown", "debug");
    let alarms = AlarmMetrics::new(&registry).expect("alarm metrics");
    alarms.record_tick(&AlarmRegistry::new(), &[]);

    let server = spawn_http_server(registry, "127.0.0.1:0".parse().unwrap()).expect("bind");
    assert_ne!(server.addr().port(), 0);

    let mut stream = TcpStream::connect(server.addr()).await.expect("connect");
    stream
        .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(
        response
            .to_ascii_lowercase()
            .contains("content-type: text/plain; version=0.0.4"),
        "{response}"
    );
    assert!(response.contains("r_ptpd_alarm_ticks_total 1"));
    assert!(response.contains("r_ptpd_alarmd_starts_total 1"));
    assert!(response.contains("r_ptpd_alarm_state{alarm=\"SYN\"} 0"));

    server.shutdown().await.expect("clean shutdown");
}
