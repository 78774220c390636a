//! Dashboard assembly — wires the ingest side, the render thread, and the
//! debug overlay together for one run.

use std::time::Duration;

use anyhow::Context;
use pulseboard_core::{DashboardConfig, DebugStats, IntervalClock, RenderRequest, Surface};
use pulseboard_ingest::{read_lines, FrameScheduler, Ingestor, MetricBuffer};
use pulseboard_metrics::DebugOverlay;
use pulseboard_render::{EngineConfig, HostConfig, RenderHost};
use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop once the input reaches EOF instead of waiting for shutdown.
    pub exit_on_eof: bool,
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub lines: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub batches: u64,
    pub forwarded: u64,
    pub render_frames: u64,
    pub reports: u64,
    pub last_stats: DebugStats,
}

/// Run the dashboard until shutdown (or EOF, per `options`).
pub async fn run_dashboard<R>(
    config: DashboardConfig,
    surface: Box<dyn Surface>,
    input: R,
    options: RunOptions,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<RunSummary>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let catalog = config.catalog().context("invalid metric catalog")?;
    let refresh_hz = config.display.refresh_hz;

    let buffer = MetricBuffer::new();
    let ingestor = Ingestor::new(buffer.clone());
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();

    // ── Render thread ──────────────────────────────────────────

    let mut host = RenderHost::spawn(
        HostConfig {
            refresh_hz,
            engine: EngineConfig {
                grid: config.grid,
                latency_window: config.latency.window,
                ..EngineConfig::default()
            },
        },
        request_rx,
        report_tx,
        shutdown.clone(),
    )?;

    request_tx
        .send(RenderRequest::Init {
            surface,
            catalog,
            width: config.display.width,
            height: config.display.height,
            pixel_ratio: config.display.pixel_ratio,
        })
        // `SendError<RenderRequest>` is not `Sync`, so it cannot be wrapped.
        .map_err(|_| anyhow::anyhow!("render thread exited before init"))?;
    info!(
        refresh_hz,
        width = config.display.width,
        height = config.display.height,
        "dashboard initialized"
    );

    // ── Ingest side ────────────────────────────────────────────

    // Stops the frame scheduler independently of the global shutdown so the
    // last batch is flushed before the render channel closes.
    let (ingest_stop_tx, ingest_stop_rx) = watch::channel(false);

    let mut scheduler = FrameScheduler::new(buffer).with_channel(request_tx);
    let scheduler_handle = tokio::spawn(async move {
        scheduler
            .run(IntervalClock::new(refresh_hz), ingest_stop_rx)
            .await;
        (scheduler.batches(), scheduler.forwarded())
    });

    let log_interval = Duration::from_millis(config.overlay.log_interval_ms.max(1));
    let mut overlay_shutdown = shutdown.clone();
    let overlay_handle = tokio::spawn(async move {
        let mut overlay = DebugOverlay::new();
        let mut ticker = tokio::time::interval(log_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                report = report_rx.recv() => match report {
                    Some(report) => overlay.handle(report),
                    None => break,
                },
                _ = ticker.tick() => overlay.log(),
                _ = overlay_shutdown.changed() => {
                    // Keep draining until the render thread hangs up.
                    while let Some(report) = report_rx.recv().await {
                        overlay.handle(report);
                    }
                    break;
                }
            }
        }
        overlay
    });

    // A render thread that exits early (fatal init, lost surface) ends the
    // run; its error is reported by the join below.
    let (lines, render_alive) = tokio::select! {
        lines = read_lines(input, ingestor.clone(), shutdown.clone()) => {
            (lines.context("reading payload input")?, true)
        }
        _ = host.exited() => {
            warn!("render thread exited; ingestion stopped");
            (ingestor.accepted() + ingestor.dropped(), false)
        }
    };

    if render_alive && !options.exit_on_eof && !*shutdown.borrow() {
        info!(lines, "input closed; dashboard stays up until shutdown");
        let mut shutdown = shutdown.clone();
        tokio::select! {
            // An error means the sender is gone, which is a shutdown too.
            _ = shutdown.wait_for(|stop| *stop) => {}
            _ = host.exited() => warn!("render thread exited while idle"),
        }
    }

    // ── Orderly stop ───────────────────────────────────────────

    let _ = ingest_stop_tx.send(true);
    let (batches, forwarded) = scheduler_handle.await.context("frame scheduler task")?;
    debug!(batches, forwarded, "frame scheduler joined");

    let engine = tokio::task::spawn_blocking(move || host.join())
        .await
        .context("render thread join task")??;

    let overlay = overlay_handle.await.context("overlay task")?;
    overlay.log();
    info!(line = %overlay.line(), "final diagnostics");

    Ok(RunSummary {
        lines,
        accepted: ingestor.accepted(),
        dropped: ingestor.dropped(),
        batches,
        forwarded,
        render_frames: engine.frames(),
        reports: overlay.reports(),
        last_stats: *overlay.stats(),
    })
}
