//! アラート通知
//!
//! 通知プロキシの `POST /send-message` にアラート本文を送る。
//! チャンネル未設定の場合はネットワーク呼び出しを行わない。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use watchdog_common::config::MonitorConfig;
use watchdog_common::error::MonitorError;
use watchdog_common::protocol::SendMessageRequest;
use watchdog_common::types::DispatchOutcome;

use crate::health::prober::describe_error;

/// 通知送信のタイムアウト（ミリ秒）
pub const NOTIFY_TIMEOUT_MS: u64 = 3000;

/// 通知の送信先
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// アラート本文を送信する（リトライしない）
    async fn dispatch(&self, message: &str) -> Result<DispatchOutcome, MonitorError>;
}

/// 通知プロキシへのHTTP送信
#[derive(Clone)]
pub struct HttpAlertDispatcher {
    client: Client,
    send_message_url: String,
    channel_id: String,
}

impl HttpAlertDispatcher {
    /// 新しいディスパッチャーを作成
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        Self::with_timeout(config, Duration::from_millis(NOTIFY_TIMEOUT_MS))
    }

    /// タイムアウトを指定してディスパッチャーを作成
    pub fn with_timeout(config: &MonitorConfig, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            send_message_url: config.send_message_url(),
            channel_id: config.channel_id.clone(),
        })
    }
}

#[async_trait]
impl AlertSink for HttpAlertDispatcher {
    async fn dispatch(&self, message: &str) -> Result<DispatchOutcome, MonitorError> {
        if self.channel_id.is_empty() {
            return Ok(DispatchOutcome::Skipped);
        }

        let request = SendMessageRequest {
            channel_name: self.channel_id.clone(),
            message: message.to_string(),
        };

        self.client
            .post(&self.send_message_url)
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| MonitorError::NotificationSend(describe_error(&e)))?;

        Ok(DispatchOutcome::Sent)
    }
}
