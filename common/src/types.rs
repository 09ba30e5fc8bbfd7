//! 共通型定義
//!
//! CheckResult, Verdict等のチェックサイクルのデータ型

use serde::{Deserialize, Serialize};

/// 1回のヘルスチェック結果
///
/// サイクルごとに生成され、判定後に破棄される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// HTTPステータスコード（接続失敗時は None）
    pub http_status: Option<u16>,
    /// レイテンシ（秒）
    pub latency_secs: f64,
    /// 接続失敗時のエラーメッセージ
    pub error_message: Option<String>,
    /// レスポンスの `memory` フィールド（判定には使用しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<serde_json::Value>,
}

impl CheckResult {
    /// レスポンスを受信した結果を作成
    pub fn responded(http_status: u16, latency_secs: f64) -> Self {
        Self {
            http_status: Some(http_status),
            latency_secs,
            error_message: None,
            memory: None,
        }
    }

    /// 接続に失敗した結果を作成
    pub fn unreachable(error_message: impl Into<String>, latency_secs: f64) -> Self {
        Self {
            http_status: None,
            latency_secs,
            error_message: Some(error_message.into()),
            memory: None,
        }
    }

    /// `memory` フィールドを設定
    pub fn with_memory(mut self, memory: Option<serde_json::Value>) -> Self {
        self.memory = memory;
        self
    }

    /// レイテンシ閾値で判定する
    ///
    /// ステータスが200以外、またはレイテンシが閾値を超えた場合に `Failing`。
    /// 接続失敗は常に `Failing`。
    pub fn evaluate(&self, latency_threshold_secs: f64) -> Verdict {
        match (self.http_status, self.error_message.as_deref()) {
            (Some(status), _) => {
                if status != 200 || self.latency_secs > latency_threshold_secs {
                    Verdict::Failing {
                        alert: format!(
                            "ALERT: status {} latency {:.2}s",
                            status, self.latency_secs
                        ),
                    }
                } else {
                    Verdict::Healthy
                }
            }
            (None, error) => Verdict::Failing {
                alert: format!(
                    "ALERT: service unreachable ({})",
                    error.unwrap_or("unknown error")
                ),
            },
        }
    }
}

/// サイクルの判定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// 正常
    Healthy,
    /// 異常（アラート本文付き）
    Failing {
        /// アラート本文
        alert: String,
    },
}

impl Verdict {
    /// 異常判定か
    pub fn is_failing(&self) -> bool {
        matches!(self, Verdict::Failing { .. })
    }

    /// アラート本文（正常時は None）
    pub fn alert(&self) -> Option<&str> {
        match self {
            Verdict::Healthy => None,
            Verdict::Failing { alert } => Some(alert),
        }
    }
}

/// 通知送信の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// 送信済み
    Sent,
    /// チャンネル未設定のため送信しなかった
    Skipped,
}
