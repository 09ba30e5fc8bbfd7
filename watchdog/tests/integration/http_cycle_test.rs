//! Integration Test: HTTP実装での1サイクル
//!
//! 監視対象・通知プロキシ・再起動サービスをwiremockで立て、外部呼び出しを検証する。

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use watchdog::common::config::MonitorConfig;
use watchdog::common::types::Verdict;
use watchdog::Monitor;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Services {
    target: MockServer,
    notify: MockServer,
    restart: MockServer,
}

impl Services {
    async fn start() -> Self {
        Self {
            target: MockServer::start().await,
            notify: MockServer::start().await,
            restart: MockServer::start().await,
        }
    }

    fn config(&self, channel_id: &str) -> MonitorConfig {
        MonitorConfig {
            target_url: format!("{}/status", self.target.uri()),
            restart_url: format!("{}/restart_service", self.restart.uri()),
            notify_base_url: self.notify.uri(),
            channel_id: channel_id.to_string(),
            ..MonitorConfig::default()
        }
    }

    async fn expect_notifications(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/send-message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(times)
            .mount(&self.notify)
            .await;
    }

    async fn expect_restarts(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/restart_service"))
            .and(body_json(json!({"service": "critical"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(times)
            .mount(&self.restart)
            .await;
    }

    async fn notified_messages(&self) -> Vec<Value> {
        self.notify
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice::<Value>(&request.body).unwrap())
            .collect()
    }
}

fn monitor_for(config: MonitorConfig) -> Monitor {
    Monitor::from_config(Arc::new(config)).unwrap()
}

#[tokio::test]
async fn test_healthy_target_makes_no_outbound_calls() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"memory": 128})))
        .expect(1)
        .mount(&services.target)
        .await;
    services.expect_notifications(0).await;
    services.expect_restarts(0).await;

    let verdict = monitor_for(services.config("ops")).run_cycle().await;

    assert_eq!(verdict, Verdict::Healthy);
}

#[tokio::test]
async fn test_error_status_notifies_and_restarts() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&services.target)
        .await;
    services.expect_notifications(1).await;
    services.expect_restarts(1).await;

    let verdict = monitor_for(services.config("ops")).run_cycle().await;

    let alert = verdict.alert().unwrap().to_string();
    assert!(alert.starts_with("ALERT: status 503 latency "), "{}", alert);

    let messages = services.notified_messages().await;
    assert_eq!(messages, vec![json!({"channel_name": "ops", "message": alert})]);
}

#[tokio::test]
async fn test_slow_target_notifies_and_restarts() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&services.target)
        .await;
    services.expect_notifications(1).await;
    services.expect_restarts(1).await;

    let config = MonitorConfig {
        latency_threshold_secs: 0.1,
        ..services.config("ops")
    };
    let verdict = monitor_for(config).run_cycle().await;

    assert!(verdict
        .alert()
        .unwrap()
        .starts_with("ALERT: status 200 latency 0."));
}

#[tokio::test]
async fn test_channel_unset_skips_notification_but_restarts() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&services.target)
        .await;
    services.expect_notifications(0).await;
    services.expect_restarts(1).await;

    let verdict = monitor_for(services.config("")).run_cycle().await;

    assert!(verdict.is_failing());
}

#[tokio::test]
async fn test_unreachable_target_notifies_and_restarts() {
    let services = Services::start().await;
    services.expect_notifications(1).await;
    services.expect_restarts(1).await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = MonitorConfig {
        target_url: format!("http://{}/status", addr),
        ..services.config("ops")
    };
    let verdict = monitor_for(config).run_cycle().await;

    let alert = verdict.alert().unwrap();
    assert!(alert.starts_with("ALERT: service unreachable ("), "{}", alert);

    let messages = services.notified_messages().await;
    assert_eq!(messages[0]["message"], alert);
}

#[tokio::test]
async fn test_notification_failure_does_not_block_restart() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&services.target)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&services.notify)
        .await;
    services.expect_restarts(1).await;

    let verdict = monitor_for(services.config("ops")).run_cycle().await;

    assert!(verdict.is_failing());
}

#[tokio::test]
async fn test_restart_failure_is_not_retried() {
    let services = Services::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&services.target)
        .await;
    services.expect_notifications(1).await;
    Mock::given(method("POST"))
        .and(path("/restart_service"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&services.restart)
        .await;

    let verdict = monitor_for(services.config("ops")).run_cycle().await;

    assert!(verdict.is_failing());
}
