//! 再起動要求
//!
//! 異常判定時に再起動サービスへ `{"service": "critical"}` を POST する。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use watchdog_common::config::MonitorConfig;
use watchdog_common::error::MonitorError;
use watchdog_common::protocol::RestartRequest;

use crate::health::prober::describe_error;

/// 再起動要求のタイムアウト（ミリ秒）
pub const RESTART_TIMEOUT_MS: u64 = 3000;

/// 再起動要求の送信先
#[async_trait]
pub trait RecoverySink: Send + Sync {
    /// 再起動を要求する（リトライしない）
    async fn request_restart(&self) -> Result<(), MonitorError>;
}

/// 再起動サービスへのHTTP送信
#[derive(Clone)]
pub struct HttpRecoveryTrigger {
    client: Client,
    restart_url: String,
    payload: RestartRequest,
}

impl HttpRecoveryTrigger {
    /// 新しいトリガーを作成
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        Self::with_timeout(config, Duration::from_millis(RESTART_TIMEOUT_MS))
    }

    /// タイムアウトを指定してトリガーを作成
    pub fn with_timeout(config: &MonitorConfig, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            restart_url: config.restart_url.clone(),
            payload: RestartRequest::default(),
        })
    }
}

#[async_trait]
impl RecoverySink for HttpRecoveryTrigger {
    async fn request_restart(&self) -> Result<(), MonitorError> {
        self.client
            .post(&self.restart_url)
            .json(&self.payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| MonitorError::RecoveryRequest(describe_error(&e)))?;

        Ok(())
    }
}
