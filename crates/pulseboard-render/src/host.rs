//! Render host — the dedicated render thread and its frame loop.
//!
//! The thread runs a current-thread tokio runtime so the frame clock and
//! the shutdown signal share one `select!`. All requests queued since the
//! previous frame are applied before the frame is painted, so several
//! batches arriving within one frame cost a single repaint.

use std::thread::{self, JoinHandle};

use pulseboard_core::clock::{epoch_millis, FrameClock, IntervalClock};
use pulseboard_core::{RenderReport, RenderRequest};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, trace, warn};

use crate::dispatch::{Dispatcher, Flow};
use crate::engine::{EngineConfig, RenderEngine};
use crate::error::{RenderError, RenderResult};

pub const THREAD_NAME: &str = "pulseboard-render";

pub type RequestReceiver = mpsc::UnboundedReceiver<RenderRequest>;
pub type ReportSender = mpsc::UnboundedSender<RenderReport>;

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub refresh_hz: u32,
    pub engine: EngineConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            engine: EngineConfig::default(),
        }
    }
}

/// Handle to the running render thread.
pub struct RenderHost {
    handle: JoinHandle<RenderResult<RenderEngine>>,
    exited: watch::Receiver<bool>,
}

impl RenderHost {
    /// Start the render thread.
    ///
    /// The thread idles until an `Init` request arrives and exits on
    /// `Teardown`, on shutdown, when the request channel closes, or on a
    /// fatal render error.
    pub fn spawn(
        config: HostConfig,
        requests: RequestReceiver,
        reports: ReportSender,
        shutdown: watch::Receiver<bool>,
    ) -> RenderResult<Self> {
        let (exit_tx, exited) = watch::channel(false);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let result = run_thread(config, requests, reports, shutdown);
                exit_tx.send_replace(true);
                result
            })
            .map_err(|e| RenderError::Thread(e.to_string()))?;

        info!(thread = THREAD_NAME, "render thread spawned");
        Ok(Self { handle, exited })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Resolves once the render thread has left its frame loop, for any
    /// reason. Safe to await repeatedly.
    pub async fn exited(&mut self) {
        // A dropped sender means the thread unwound; that is an exit too.
        let _ = self.exited.wait_for(|done| *done).await;
    }

    /// Wait for the render thread and return its final engine.
    pub fn join(self) -> RenderResult<RenderEngine> {
        self.handle
            .join()
            .map_err(|_| RenderError::Thread("render thread panicked".to_string()))?
    }
}

fn run_thread(
    config: HostConfig,
    requests: RequestReceiver,
    reports: ReportSender,
    shutdown: watch::Receiver<bool>,
) -> RenderResult<RenderEngine> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| RenderError::Thread(e.to_string()))?;
    let refresh_hz = config.refresh_hz;
    let engine = RenderEngine::new(config.engine);
    runtime.block_on(async move {
        // Interval timers need the runtime context.
        let clock = IntervalClock::new(refresh_hz);
        run_render_loop(engine, clock, requests, reports, shutdown).await
    })
}

/// The render thread's frame loop.
///
/// Each frame drains every pending request through the dispatcher, then
/// paints and reports debug statistics. Returns the engine once it has
/// been torn down, or the first fatal error.
pub async fn run_render_loop<C: FrameClock>(
    mut engine: RenderEngine,
    mut clock: C,
    mut requests: RequestReceiver,
    reports: ReportSender,
    mut shutdown: watch::Receiver<bool>,
) -> RenderResult<RenderEngine> {
    let dispatcher = Dispatcher::new();
    info!("render loop started");

    loop {
        tokio::select! {
            _ = clock.next_frame() => {}
            _ = shutdown.changed() => {
                info!("render loop shutting down");
                break;
            }
        }

        let mut stop = false;
        loop {
            match requests.try_recv() {
                Ok(request) => {
                    let kind = request.kind();
                    match dispatcher.dispatch(&mut engine, request, epoch_millis()) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Stop) => {
                            debug!(kind = kind.as_str(), "render loop asked to stop");
                            stop = true;
                            break;
                        }
                        Err(e) if e.is_fatal() => {
                            error!(kind = kind.as_str(), error = %e, "fatal render error");
                            engine.teardown();
                            return Err(e);
                        }
                        Err(e) => {
                            warn!(kind = kind.as_str(), error = %e, "render request rejected");
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("request channel closed; rendering final frame");
                    stop = true;
                    break;
                }
            }
        }

        if let Some(stats) = engine.render_frame(epoch_millis()) {
            if reports.send(RenderReport::Debug(stats)).is_err() {
                trace!("no report listener");
            }
        }

        if stop {
            break;
        }
    }

    engine.teardown();
    info!(frames = engine.frames(), "render loop stopped");
    Ok(engine)
}
