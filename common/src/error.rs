//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// monitor error type
///
/// サイクル内で発生したエラーは呼び出し元でログ出力され、伝播しない。
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// 監視対象への接続失敗（タイムアウト・DNS・接続拒否など）
    #[error("service unreachable ({0})")]
    ProbeUnreachable(String),

    /// 通知送信の失敗
    #[error("notification send failed: {0}")]
    NotificationSend(String),

    /// 再起動要求の失敗
    #[error("restart request failed: {0}")]
    RecoveryRequest(String),

    /// HTTPクライアントの初期化失敗
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
