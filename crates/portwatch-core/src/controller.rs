// ── Polling controller ──
//
// Owns the refresh cadence, manual "refresh now" requests with their
// discovery cool-down, and the start/stop lifecycle. Every cycle is
// isolated: a failed fetch is logged and the next tick tries again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use portwatch_api::PortStatusBatch;

use crate::config::MonitorConfig;
use crate::convert::build_batch;
use crate::error::CoreError;
use crate::model::{PortSnapshot, TopologySummary};
use crate::reconcile::Reconciler;
use crate::reconcile::target::TargetRegistry;
use crate::source::StatusSource;

// ── ControllerState ──────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ControllerState {
    Stopped,
    Running,
}

// ── CycleReport ──────────────────────────────────────────────────

/// Why a cycle ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CycleTrigger {
    /// Regular interval tick (the first one fires immediately on start).
    Timer,
    /// The single extra cycle scheduled after a manual refresh.
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CycleOutcome {
    Applied,
    /// Fetch or parse failed; nothing was touched.
    Failed { reason: String },
}

/// Summary of the most recently completed cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Monotonic per start; assigned when the fetch is issued.
    pub sequence: u64,
    pub trigger: CycleTrigger,
    pub outcome: CycleOutcome,
    pub ports_applied: usize,
    pub targets_touched: usize,
    pub stale_dropped: usize,
    pub completed_at: DateTime<Utc>,
}

/// A fetch result travelling back to the loop.
struct Fetched {
    sequence: u64,
    trigger: CycleTrigger,
    result: Result<PortStatusBatch, CoreError>,
}

// ── PollingController ────────────────────────────────────────────

/// Drives a [`StatusSource`] and reconciles onto a [`TargetRegistry`].
///
/// Cheaply cloneable via `Arc`. Construct one per monitored host and
/// hand it to whatever owns the display lifecycle.
pub struct PollingController<S, R> {
    inner: Arc<ControllerInner<S, R>>,
}

impl<S, R> Clone for PollingController<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S, R> {
    config: MonitorConfig,
    source: Arc<S>,
    targets: Mutex<R>,
    reconciler: Mutex<Reconciler>,
    state: watch::Sender<ControllerState>,
    last_cycle: watch::Sender<Option<CycleReport>>,
    cancel: CancellationToken,
    /// Child token for the current run -- cancelled on stop, replaced on
    /// start so the controller can be restarted.
    cancel_child: Mutex<CancellationToken>,
    refresh_tx: Mutex<Option<mpsc::UnboundedSender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S, R> PollingController<S, R>
where
    S: StatusSource,
    R: TargetRegistry + 'static,
{
    /// Create a stopped controller. Call [`start()`](Self::start) to begin polling.
    pub fn new(config: MonitorConfig, source: S, targets: R) -> Result<Self, CoreError> {
        config.validate()?;

        let (state, _) = watch::channel(ControllerState::Stopped);
        let (last_cycle, _) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();
        let reconciler = Reconciler::new(config.reject_stale_responses);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                source: Arc::new(source),
                targets: Mutex::new(targets),
                reconciler: Mutex::new(reconciler),
                state,
                last_cycle,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                refresh_tx: Mutex::new(None),
                task: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Begin polling. The first cycle fires immediately. No-op when running.
    pub async fn start(&self) {
        let mut task = self.inner.task.lock().await;
        if task.is_some() {
            debug!("start ignored, controller already running");
            return;
        }

        let cancel = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = cancel.clone();

        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        *self.inner.refresh_tx.lock().await = Some(refresh_tx);

        let _ = self.inner.state.send_replace(ControllerState::Running);
        *task = Some(tokio::spawn(poll_task(self.clone(), refresh_rx, cancel)));

        info!(
            url = %self.inner.config.url,
            interval_ms = self.inner.config.poll_interval.as_millis(),
            "polling started"
        );
    }

    /// Stop polling and discard reconciliation state.
    ///
    /// Fetches already in flight run to completion, but their results are
    /// dropped without touching targets.
    pub async fn stop(&self) {
        let Some(handle) = self.inner.task.lock().await.take() else {
            return;
        };

        self.inner.cancel_child.lock().await.cancel();
        *self.inner.refresh_tx.lock().await = None;
        let _ = handle.await;

        self.inner.reconciler.lock().await.reset();
        let _ = self.inner.state.send_replace(ControllerState::Stopped);
        info!("polling stopped");
    }

    pub fn is_running(&self) -> bool {
        *self.inner.state.borrow() == ControllerState::Running
    }

    /// Subscribe to lifecycle transitions.
    pub fn state(&self) -> watch::Receiver<ControllerState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to per-cycle reports. `None` until the first cycle completes.
    pub fn cycles(&self) -> watch::Receiver<Option<CycleReport>> {
        self.inner.last_cycle.subscribe()
    }

    // ── Manual refresh ───────────────────────────────────────────

    /// Trigger out-of-band discovery and schedule one follow-up cycle
    /// after the cool-down.
    ///
    /// Another request inside the cool-down triggers discovery again and
    /// pushes the follow-up out; there is never more than one pending.
    /// Returns `false` when the controller is stopped.
    pub async fn refresh_now(&self) -> bool {
        match self.inner.refresh_tx.lock().await.as_ref() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Last-applied snapshot per port, ordered by port.
    pub async fn snapshots(&self) -> Vec<Arc<PortSnapshot>> {
        self.inner.reconciler.lock().await.state().snapshots()
    }

    /// Run `f` against the target registry, e.g. to bind or render targets.
    ///
    /// Cycles wait while `f` runs.
    pub async fn with_targets<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut targets = self.inner.targets.lock().await;
        f(&mut targets)
    }

    pub async fn fetch_topology(&self) -> Result<TopologySummary, CoreError> {
        let raw = self.inner.source.fetch_topology().await?;
        Ok(TopologySummary::from(&raw))
    }

    // ── Cycle plumbing ───────────────────────────────────────────

    fn spawn_fetch(&self, sequence: u64, trigger: CycleTrigger, tx: mpsc::UnboundedSender<Fetched>) {
        let source = Arc::clone(&self.inner.source);
        debug!(sequence, %trigger, "cycle fetch issued");
        tokio::spawn(async move {
            let result = source.fetch_status().await;
            // Receiver is gone once the controller stopped; the result is dropped.
            let _ = tx.send(Fetched {
                sequence,
                trigger,
                result,
            });
        });
    }

    fn spawn_discovery(&self) {
        let source = Arc::clone(&self.inner.source);
        tokio::spawn(async move {
            match source.trigger_discovery().await {
                Ok(()) => debug!("discovery refresh accepted"),
                Err(e) => warn!(error = %e, "discovery refresh failed"),
            }
        });
    }

    async fn apply_fetched(&self, fetched: Fetched) {
        let Fetched {
            sequence,
            trigger,
            result,
        } = fetched;

        let report = match result {
            Ok(batch) => {
                let snapshots = build_batch(&batch.ports);
                let mut targets = self.inner.targets.lock().await;
                let mut reconciler = self.inner.reconciler.lock().await;
                let batch = reconciler.apply_batch(sequence, snapshots, &mut *targets);
                debug!(
                    sequence,
                    ports = batch.ports_applied,
                    targets = batch.targets_touched,
                    stale = batch.stale_dropped,
                    "cycle applied"
                );
                CycleReport {
                    sequence,
                    trigger,
                    outcome: CycleOutcome::Applied,
                    ports_applied: batch.ports_applied,
                    targets_touched: batch.targets_touched,
                    stale_dropped: batch.stale_dropped,
                    completed_at: Utc::now(),
                }
            }
            Err(e) => {
                warn!(error = %e, sequence, "status cycle failed, keeping previous state");
                CycleReport {
                    sequence,
                    trigger,
                    outcome: CycleOutcome::Failed {
                        reason: e.to_string(),
                    },
                    ports_applied: 0,
                    targets_touched: 0,
                    stale_dropped: 0,
                    completed_at: Utc::now(),
                }
            }
        };

        let _ = self.inner.last_cycle.send_replace(Some(report));
    }
}

// ── Background task ──────────────────────────────────────────────

/// The polling loop. Fetches run as separate tasks so a slow response
/// never delays the next tick; results are applied in receipt order.
async fn poll_task<S, R>(
    controller: PollingController<S, R>,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
) where
    S: StatusSource,
    R: TargetRegistry + 'static,
{
    let cooldown = controller.inner.config.discovery_cooldown;
    let mut interval = tokio::time::interval(controller.inner.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (fetched_tx, mut fetched_rx) = mpsc::unbounded_channel();
    let mut follow_up: Option<Instant> = None;
    let mut sequence: u64 = 0;

    loop {
        let deadline = follow_up;
        let follow_up_due = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            Some(fetched) = fetched_rx.recv() => {
                controller.apply_fetched(fetched).await;
            }
            _ = interval.tick() => {
                sequence += 1;
                controller.spawn_fetch(sequence, CycleTrigger::Timer, fetched_tx.clone());
            }
            () = follow_up_due => {
                follow_up = None;
                sequence += 1;
                controller.spawn_fetch(sequence, CycleTrigger::FollowUp, fetched_tx.clone());
            }
            Some(()) = refresh_rx.recv() => {
                controller.spawn_discovery();
                let at = Instant::now() + cooldown;
                if follow_up.replace(at).is_some() {
                    debug!("refresh during cool-down, follow-up postponed");
                } else {
                    debug!(cooldown_ms = cooldown.as_millis(), "follow-up cycle scheduled");
                }
            }
        }
    }

    debug!("poll task exiting");
}
