//! 通信プロトコル定義
//!
//! 監視対象・通知プロキシ・再起動サービスとの通信ペイロード

use serde::{Deserialize, Serialize};

/// 再起動要求で送るサービス名
pub const RESTART_SERVICE_NAME: &str = "critical";

/// 監視対象のステータスレスポンス
///
/// `memory` は読み取るだけで判定には使用しない。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    /// メモリ使用量（形式は監視対象に依存）
    #[serde(default)]
    pub memory: Option<serde_json::Value>,
}

/// 通知送信リクエスト (`POST /send-message`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// 送信先チャンネル
    pub channel_name: String,
    /// アラート本文
    pub message: String,
}

/// 再起動リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestartRequest {
    /// 再起動対象サービス
    pub service: String,
}

impl Default for RestartRequest {
    fn default() -> Self {
        Self {
            service: RESTART_SERVICE_NAME.to_string(),
        }
    }
}
