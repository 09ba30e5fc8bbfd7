//! 監視ループ
//!
//! 一定間隔でサイクル（プローブ → 判定 → アラート → 再起動要求）を起動する。
//!
//! サイクルは個別のタスクとして spawn される。デフォルトの
//! [`OverlapPolicy::Allow`] では前回のサイクルが終わっていなくても次のサイクルを開始する。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;
use watchdog_common::config::{MonitorConfig, OverlapPolicy};
use watchdog_common::error::MonitorError;
use watchdog_common::types::{CheckResult, DispatchOutcome, Verdict};

use crate::alert::{AlertSink, HttpAlertDispatcher};
use crate::health::{HealthProbe, HttpHealthProber};
use crate::recovery::{HttpRecoveryTrigger, RecoverySink};

/// 監視ループ
pub struct Monitor {
    /// 起動時に確定した設定
    config: Arc<MonitorConfig>,
    prober: Arc<dyn HealthProbe>,
    alerts: Arc<dyn AlertSink>,
    recovery: Arc<dyn RecoverySink>,
    /// `SkipIfRunning` 用の実行中フラグ
    in_flight: AtomicBool,
}

impl Monitor {
    /// 任意のプローブ・通知先・再起動先で監視ループを作成
    pub fn new(
        config: Arc<MonitorConfig>,
        prober: Arc<dyn HealthProbe>,
        alerts: Arc<dyn AlertSink>,
        recovery: Arc<dyn RecoverySink>,
    ) -> Self {
        Self {
            config,
            prober,
            alerts,
            recovery,
            in_flight: AtomicBool::new(false),
        }
    }

    /// 設定からHTTP実装の監視ループを作成
    pub fn from_config(config: Arc<MonitorConfig>) -> Result<Self, MonitorError> {
        let prober = HttpHealthProber::new(&config)?;
        let alerts = HttpAlertDispatcher::new(&config)?;
        let recovery = HttpRecoveryTrigger::new(&config)?;

        Ok(Self::new(
            config,
            Arc::new(prober),
            Arc::new(alerts),
            Arc::new(recovery),
        ))
    }

    /// バックグラウンドで監視を開始
    ///
    /// 返される `JoinHandle` はプロセス終了まで完了しない。
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.scheduler_loop().await;
        })
    }

    async fn scheduler_loop(self: Arc<Self>) {
        // 最初のチェックは1間隔後。停止からの復帰時に溜まったティックを連続実行しない
        let period = self.config.poll_interval();
        let mut timer = interval_at(tokio::time::Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.config.poll_interval_secs,
            overlap_policy = %self.config.overlap_policy,
            "Monitor loop started"
        );

        loop {
            timer.tick().await;
            self.spawn_cycle();
        }
    }

    /// 1サイクルを別タスクで起動する
    ///
    /// `SkipIfRunning` で前回のサイクルが実行中の場合は起動せず `None` を返す。
    pub fn spawn_cycle(self: &Arc<Self>) -> Option<JoinHandle<Verdict>> {
        match self.config.overlap_policy {
            OverlapPolicy::Allow => {
                let monitor = Arc::clone(self);
                Some(tokio::spawn(
                    async move { monitor.run_cycle().await }.instrument(cycle_span()),
                ))
            }
            OverlapPolicy::SkipIfRunning => {
                if self
                    .in_flight
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    debug!("Previous cycle still running, skipping tick");
                    return None;
                }
                let guard = InFlightGuard(Arc::clone(self));
                Some(tokio::spawn(
                    async move {
                        let verdict = guard.0.run_cycle().await;
                        drop(guard);
                        verdict
                    }
                    .instrument(cycle_span()),
                ))
            }
        }
    }

    /// 1サイクルを実行する
    ///
    /// 異常時はアラート送信の完了（成否を問わない）を待ってから再起動を要求する。
    /// 送信・再起動の失敗はログに出すだけで返り値には影響しない。
    pub async fn run_cycle(&self) -> Verdict {
        let started = Instant::now();
        let result = match self.prober.probe().await {
            Ok(result) => {
                if let Some(status) = result.http_status {
                    info!(
                        status = status,
                        latency_secs = result.latency_secs,
                        "Status: {}, Latency: {:.3}s",
                        status,
                        result.latency_secs
                    );
                }
                result
            }
            Err(MonitorError::ProbeUnreachable(reason)) => {
                CheckResult::unreachable(reason, started.elapsed().as_secs_f64())
            }
            Err(e) => CheckResult::unreachable(e.to_string(), started.elapsed().as_secs_f64()),
        };

        let verdict = result.evaluate(self.config.latency_threshold_secs);
        if let Verdict::Failing { alert } = &verdict {
            error!("{}", alert);
            self.dispatch_alert(alert).await;
            self.request_restart().await;
        }

        verdict
    }

    async fn dispatch_alert(&self, alert: &str) {
        match self.alerts.dispatch(alert).await {
            Ok(DispatchOutcome::Sent) => {
                info!(
                    "Notification: message \"{}\" sent on [{}]",
                    alert, self.config.channel_id
                );
            }
            Ok(DispatchOutcome::Skipped) => {
                info!("Notification: {} (skipped - channel not set)", alert);
            }
            Err(e) => {
                error!(error = %e, "Notification send failed");
            }
        }
    }

    async fn request_restart(&self) {
        info!(
            restart_url = %self.config.restart_url,
            "Requesting restart of the monitored service..."
        );
        match self.recovery.request_restart().await {
            Ok(()) => info!("Restart request completed"),
            Err(e) => error!("Restart request failed: {}", e),
        }
    }
}

fn cycle_span() -> tracing::Span {
    info_span!("cycle", cycle_id = %Uuid::new_v4())
}

/// 実行中フラグをサイクル終了時（パニック含む）に解除する
struct InFlightGuard(Arc<Monitor>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}
