//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to the legacy variable names, and the process-wide [`MonitorConfig`].

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use watchdog_common::config::get_env_with_fallback;
///
/// let target = get_env_with_fallback("WATCHDOG_TARGET_URL", "CRITICAL_URL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Unset variables yield `default` silently. A value that fails to parse
/// also yields `default`, with a warning naming the rejected value.
pub fn get_env_with_fallback_parse<T>(new_name: &str, old_name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    let Some(raw) = get_env_with_fallback(new_name, old_name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                variable = new_name,
                value = %raw,
                "Invalid value, using default {}",
                default
            );
            default
        }
    }
}

/// 重複サイクルの扱い
///
/// 前回のサイクルが終わっていない状態でタイマーが発火した場合の方針。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// 前回の完了を待たずに新しいサイクルを開始する
    #[default]
    Allow,
    /// 前回のサイクルが実行中ならそのティックをスキップする
    SkipIfRunning,
}

impl FromStr for OverlapPolicy {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "skip" | "skip_if_running" => Ok(Self::SkipIfRunning),
            other => Err(CommonError::Config(format!(
                "unknown overlap policy '{}' (expected 'allow' or 'skip')",
                other
            ))),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::SkipIfRunning => f.write_str("skip"),
        }
    }
}

/// 監視設定
///
/// 起動時に一度だけ構築され、以降は変更されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 監視対象URL (デフォルト: "http://localhost:8080/status")
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// 再起動要求の送信先URL (デフォルト: "http://localhost:5001/restart_service")
    #[serde(default = "default_restart_url")]
    pub restart_url: String,

    /// 通知プロキシのベースURL (デフォルト: "http://localhost:8100")
    #[serde(default = "default_notify_base_url")]
    pub notify_base_url: String,

    /// 通知チャンネルID（空の場合は送信しない）
    #[serde(default)]
    pub channel_id: String,

    /// ポーリング間隔（秒）(デフォルト: 5)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// レイテンシ閾値（秒）(デフォルト: 0.5)
    #[serde(default = "default_latency_threshold")]
    pub latency_threshold_secs: f64,

    /// 重複サイクルの扱い (デフォルト: allow)
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

fn default_target_url() -> String {
    "http://localhost:8080/status".to_string()
}

fn default_restart_url() -> String {
    "http://localhost:5001/restart_service".to_string()
}

fn default_notify_base_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_latency_threshold() -> f64 {
    0.5
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            restart_url: default_restart_url(),
            notify_base_url: default_notify_base_url(),
            channel_id: String::new(),
            poll_interval_secs: default_poll_interval(),
            latency_threshold_secs: default_latency_threshold(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Load monitor configuration from environment variables.
    pub fn from_env() -> Self {
        let overlap_policy = match std::env::var("WATCHDOG_OVERLAP_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using default", e);
                OverlapPolicy::default()
            }),
            Err(_) => OverlapPolicy::default(),
        };

        Self {
            target_url: get_env_with_fallback_or(
                "WATCHDOG_TARGET_URL",
                "CRITICAL_URL",
                &default_target_url(),
            ),
            restart_url: get_env_with_fallback_or(
                "WATCHDOG_RESTART_URL",
                "ADMIN_RESTART_URL",
                &default_restart_url(),
            ),
            notify_base_url: get_env_with_fallback_or(
                "WATCHDOG_NOTIFY_BASE_URL",
                "TELEGRAM_PROXY_BASE_URL",
                &default_notify_base_url(),
            ),
            channel_id: get_env_with_fallback_or("WATCHDOG_CHANNEL_ID", "CHANNEL_ID", ""),
            poll_interval_secs: get_env_with_fallback_parse(
                "WATCHDOG_POLL_INTERVAL_SECS",
                "POLL_INTERVAL",
                default_poll_interval(),
            ),
            latency_threshold_secs: get_env_with_fallback_parse(
                "WATCHDOG_LATENCY_THRESHOLD_SECS",
                "LATENCY_THRESHOLD_SEC",
                default_latency_threshold(),
            ),
            overlap_policy,
        }
    }

    /// 設定値を検証する
    pub fn validate(&self) -> Result<(), CommonError> {
        if self.target_url.trim().is_empty() {
            return Err(CommonError::Config("target URL must not be empty".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(CommonError::Config(
                "poll interval must be at least 1 second".into(),
            ));
        }
        if !self.latency_threshold_secs.is_finite() || self.latency_threshold_secs < 0.0 {
            return Err(CommonError::Config(format!(
                "latency threshold must be a non-negative number, got {}",
                self.latency_threshold_secs
            )));
        }
        Ok(())
    }

    /// ポーリング間隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// 通知が有効か（チャンネルIDが設定されているか）
    pub fn notifications_enabled(&self) -> bool {
        !self.channel_id.is_empty()
    }

    /// 通知送信先URL
    pub fn send_message_url(&self) -> String {
        format!("{}/send-message", self.notify_base_url.trim_end_matches('/'))
    }
}
