//! watchdog - liveness monitor
//!
//! 単一のHTTPエンドポイントを定期的に監視し、異常時にアラート通知と再起動要求を送る

#![warn(missing_docs)]

/// 共通型定義（watchdog-commonの再エクスポート）
pub use watchdog_common as common;

/// アラート通知
pub mod alert;

/// CLIインターフェース
pub mod cli;

/// ヘルスチェック
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 監視ループ（スケジューラとサイクル実行）
pub mod monitor;

/// 再起動要求
pub mod recovery;

pub use monitor::Monitor;
