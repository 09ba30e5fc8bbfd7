//! CLI module for watchdog
//!
//! 設定はすべて環境変数から読み込む。CLIは `--help` と `--version` のみ。

use clap::Parser;

/// watchdog - Liveness monitor for a single HTTP service
#[derive(Parser, Debug)]
#[command(name = "watchdog")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    WATCHDOG_TARGET_URL              URL to probe (default: http://localhost:8080/status)
    WATCHDOG_RESTART_URL             Restart endpoint (default: http://localhost:5001/restart_service)
    WATCHDOG_NOTIFY_BASE_URL         Notification proxy base URL (default: http://localhost:8100)
    WATCHDOG_CHANNEL_ID              Notification channel (default: empty, sending disabled)
    WATCHDOG_POLL_INTERVAL_SECS      Poll interval in seconds (default: 5)
    WATCHDOG_LATENCY_THRESHOLD_SECS  Latency threshold in seconds (default: 0.5)
    WATCHDOG_OVERLAP_POLICY          allow | skip (default: allow)
    WATCHDOG_LOG_LEVEL               Log level (default: info)

    Legacy names CRITICAL_URL, ADMIN_RESTART_URL, TELEGRAM_PROXY_BASE_URL,
    CHANNEL_ID, POLL_INTERVAL and LATENCY_THRESHOLD_SEC are still accepted.
"#)]
pub struct Cli {}
