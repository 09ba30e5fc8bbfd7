//! 監視対象プローバー
//!
//! 1サイクルにつき1回のリクエストを送り、結果を [`CheckResult`] にまとめる。
//! 接続に失敗した場合は [`MonitorError::ProbeUnreachable`] を返す。
//! 判定は [`CheckResult::evaluate`] が行う。

use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as _;
use std::time::{Duration, Instant};
use watchdog_common::config::MonitorConfig;
use watchdog_common::error::MonitorError;
use watchdog_common::protocol::StatusResponse;
use watchdog_common::types::CheckResult;

/// ヘルスチェックのタイムアウト（ミリ秒）
pub const PROBE_TIMEOUT_MS: u64 = 2000;

/// 監視対象への問い合わせ
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// 1回だけ問い合わせる
    ///
    /// レスポンスを受信できればステータスに関係なく `Ok`。
    async fn probe(&self) -> Result<CheckResult, MonitorError>;
}

/// HTTP GET によるプローバー
#[derive(Clone)]
pub struct HttpHealthProber {
    /// HTTPクライアント
    client: Client,
    /// 監視対象URL
    target_url: String,
}

impl HttpHealthProber {
    /// 新しいプローバーを作成
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        Self::with_timeout(config, Duration::from_millis(PROBE_TIMEOUT_MS))
    }

    /// タイムアウトを指定してプローバーを作成
    pub fn with_timeout(config: &MonitorConfig, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            target_url: config.target_url.clone(),
        })
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProber {
    async fn probe(&self) -> Result<CheckResult, MonitorError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.target_url)
            .send()
            .await
            .map_err(|e| MonitorError::ProbeUnreachable(describe_error(&e)))?;

        let status = response.status().as_u16();

        // レイテンシはボディの受信完了までを含める
        let body = response
            .bytes()
            .await
            .map_err(|e| MonitorError::ProbeUnreachable(describe_error(&e)))?;
        let latency_secs = start.elapsed().as_secs_f64();

        // memory は読むだけで判定には使わない
        let memory = serde_json::from_slice::<StatusResponse>(&body)
            .ok()
            .and_then(|status| status.memory);

        Ok(CheckResult::responded(status, latency_secs).with_memory(memory))
    }
}

/// reqwest のエラーを原因チェーン込みの文字列にする
pub(crate) fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "request timed out".to_string();
    }

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
