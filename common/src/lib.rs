//! watchdog 共通ライブラリ
//!
//! 設定・データ型・通信ペイロード・エラー型を提供する

#![warn(missing_docs)]

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型定義
pub mod error;

/// 外部サービスとの通信ペイロード
pub mod protocol;

/// チェックサイクルのデータ型
pub mod types;
