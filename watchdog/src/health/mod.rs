//! ヘルスチェック
//!
//! 監視対象へ GET リクエストを送り、ステータスとレイテンシを計測する。

/// HTTPプローバー
pub mod prober;

pub use prober::{HealthProbe, HttpHealthProber, PROBE_TIMEOUT_MS};
