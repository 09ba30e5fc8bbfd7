//! ロギング初期化
//!
//! `WATCHDOG_LOG_LEVEL`（未設定時は `RUST_LOG`）でフィルタを指定する。

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ロギング初期化エラー
#[derive(Debug, Error)]
pub enum LoggingError {
    /// フィルタ指定が不正
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// グローバルsubscriberの設定に失敗
    #[error("failed to install subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// 環境変数からフィルタ指定を取得
pub fn log_filter_directive() -> String {
    std::env::var("WATCHDOG_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// コンソール出力のsubscriberを設定する
pub fn init() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(log_filter_directive())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}
