//! Gesture state service: initialization and read access for the game loop.
//!
//! # Lifecycle
//!
//! ```text
//!  initialize() ──▶ spawn_blocking(source.acquire) ──▶ pump thread
//!       │                    │                              │
//!   (no-op if ready,     timeout / cancel              on_frame ──▶ GestureState
//!    in flight or        ──▶ Settling until the                      ▲
//!    settling)               late acquisition is       game loop reads ──┘
//!                            released, then Idle
//! ```
//!
//! The service never surfaces initialization errors to its caller; a source
//! that cannot come up leaves `is_ready()` false and is logged.

use crate::config::{Config, EstimatorConfig, SmoothingConfig, SourceOptions};
use crate::core::fold::FoldScore;
use crate::core::pipeline::GesturePipeline;
use crate::core::state::{GestureHandle, GestureState, InitPhase};
use crate::source::types::HandFrame;
use crate::source::{LandmarkSource, SourceError};
use crate::stats::{create_shared_stats, SharedGestureStats};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How often the pump re-checks its stop flag while the source is quiet.
const PUMP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns a landmark source and the shared gesture state it feeds.
pub struct GestureService<S: LandmarkSource> {
    source: Arc<S>,
    estimator: EstimatorConfig,
    smoothing: SmoothingConfig,
    options: SourceOptions,
    init_timeout: Duration,
    state: Arc<GestureState>,
    stats: SharedGestureStats,
    /// Present exactly while an `initialize()` call is in flight
    cancel: Mutex<Option<oneshot::Sender<()>>>,
    /// True while the pump thread is consuming frames
    streaming: Arc<AtomicBool>,
    pump: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<S: LandmarkSource> GestureService<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_stats(source, config, create_shared_stats())
    }

    /// Create a service recording into existing stats.
    pub fn with_stats(source: S, config: &Config, stats: SharedGestureStats) -> Self {
        Self {
            source: Arc::new(source),
            estimator: config.estimator,
            smoothing: config.smoothing,
            options: config.source.clone(),
            init_timeout: config.init_timeout,
            state: Arc::new(GestureState::new()),
            stats,
            cancel: Mutex::new(None),
            streaming: Arc::new(AtomicBool::new(false)),
            pump: Mutex::new(None),
        }
    }

    /// Bring the landmark source up.
    ///
    /// No-op when already ready, while another call is in flight, or while
    /// an abandoned acquisition is still settling. On failure, timeout or
    /// cancellation the service stays not-ready and a later call retries.
    pub async fn initialize(&self) {
        let cancelled = {
            let mut slot = self.cancel_slot();
            if !self.state.begin_initialization() {
                debug!(phase = ?self.state.phase(), "Initialization already handled");
                return;
            }
            let (tx, rx) = oneshot::channel();
            *slot = Some(tx);
            rx
        };

        info!(source = self.source.name(), "Starting landmark source");

        let source = Arc::clone(&self.source);
        let options = self.options.clone();
        let mut task = tokio::task::spawn_blocking(move || source.acquire(&options));

        let interrupted = tokio::select! {
            joined = &mut task => {
                self.cancel_slot().take();
                let acquired = joined
                    .map_err(|e| SourceError::Unavailable(e.to_string()))
                    .and_then(|result| result);
                match acquired {
                    Ok(receiver) => {
                        self.start_pump(receiver);
                        self.state.mark_ready();
                        info!(source = self.source.name(), "Hand tracking ready");
                    }
                    Err(e) => {
                        self.state.abort_initialization();
                        warn!(
                            source = self.source.name(),
                            "Hand tracking unavailable, gesture input disabled: {}", e
                        );
                    }
                }
                return;
            }
            _ = tokio::time::sleep(self.init_timeout) => SourceError::TimedOut(self.init_timeout),
            Ok(()) = cancelled => SourceError::Cancelled,
        };

        self.cancel_slot().take();
        self.state.settle_initialization();
        warn!(
            source = self.source.name(),
            "Hand tracking unavailable, gesture input disabled: {}", interrupted
        );
        self.settle(task);
    }

    /// Abort an in-flight `initialize()`. Has no effect otherwise.
    pub fn cancel_initialize(&self) {
        if let Some(tx) = self.cancel_slot().take() {
            let _ = tx.send(());
        }
    }

    fn cancel_slot(&self) -> MutexGuard<'_, Option<oneshot::Sender<()>>> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait out an abandoned acquisition. The blocking bring-up cannot be
    /// interrupted; whatever it eventually acquires is released before the
    /// service accepts another `initialize()`.
    fn settle(&self, task: JoinHandle<Result<Receiver<HandFrame>, SourceError>>) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            if let Ok(Ok(receiver)) = task.await {
                drop(receiver);
                let name = source.name();
                match tokio::task::spawn_blocking(move || source.release()).await {
                    Ok(()) => debug!(source = name, "Released late acquisition"),
                    Err(e) => warn!(source = name, "Releasing late acquisition failed: {}", e),
                }
            }
            state.finish_settling();
        });
    }

    fn start_pump(&self, receiver: Receiver<HandFrame>) {
        let mut pipeline =
            GesturePipeline::new(&self.estimator, &self.smoothing, Arc::clone(&self.state))
                .with_stats(Arc::clone(&self.stats));
        let streaming = Arc::clone(&self.streaming);
        streaming.store(true, Ordering::SeqCst);

        let handle = thread::spawn(move || {
            while streaming.load(Ordering::SeqCst) {
                match receiver.recv_timeout(PUMP_POLL_INTERVAL) {
                    Ok(frame) => {
                        pipeline.on_frame(&frame);
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        debug!("Landmark source finished");
                        break;
                    }
                }
            }
            streaming.store(false, Ordering::SeqCst);
        });

        if let Ok(mut slot) = self.pump.lock() {
            *slot = Some(handle);
        }
    }

    /// Debounced clench level. False before initialization or any detection.
    pub fn clench_state(&self) -> bool {
        self.state.clench_state()
    }

    /// Smoothed fold score in [0, 1]. 0.0 before any detection.
    pub fn clench_confidence(&self) -> FoldScore {
        self.state.clench_confidence()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn phase(&self) -> InitPhase {
        self.state.phase()
    }

    /// True while frames are still being consumed.
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Cloneable read-only handle for the game loop.
    pub fn handle(&self) -> GestureHandle {
        GestureHandle::new(Arc::clone(&self.state))
    }

    /// Receiver that flips to `true` once, when the source comes up.
    pub fn ready_signal(&self) -> watch::Receiver<bool> {
        self.state.subscribe_ready()
    }

    pub fn stats(&self) -> &SharedGestureStats {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Stop consuming frames and release the source. Readiness is kept.
    pub fn shutdown(&self) {
        self.streaming.store(false, Ordering::SeqCst);
        self.source.release();
        let handle = self.pump.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl<S: LandmarkSource> Drop for GestureService<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
