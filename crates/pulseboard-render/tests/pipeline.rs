//! End-to-end: producer bytes → buffer → frame scheduler → render thread →
//! recording surface → debug overlay.

use pulseboard_core::clock::{epoch_millis, FrameClock};
use pulseboard_core::{DrawOp, MetricCatalog, RenderRequest, TextStyle};
use pulseboard_ingest::{FrameScheduler, Ingestor, MetricBuffer};
use pulseboard_metrics::DebugOverlay;
use pulseboard_render::{
    run_render_loop, EngineConfig, EnginePhase, HostConfig, RecordingSurface, RenderEngine,
    RenderHost,
};
use tokio::sync::{mpsc, watch};

struct ImmediateClock;

impl FrameClock for ImmediateClock {
    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;
    }
}

fn payload(metric: &str, value: f64, ts: i64) -> String {
    format!(r#"{{"metric":"{metric}","value":{value},"timestamp":{ts}}}"#)
}

fn value_texts(ops: &[DrawOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text {
                text,
                style: TextStyle::Value,
                ..
            } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn updates_flow_from_bytes_to_pixels() {
    let buffer = MetricBuffer::new();
    let ingestor = Ingestor::new(buffer.clone());
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let surface = RecordingSurface::new();

    req_tx
        .send(RenderRequest::Init {
            surface: Box::new(surface.clone()),
            catalog: MetricCatalog::builtin(),
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        })
        .unwrap();
    let mut scheduler = FrameScheduler::new(buffer.clone()).with_channel(req_tx);

    let ts = epoch_millis() as i64;
    assert!(ingestor.ingest(payload("speed", 42.0, ts).as_bytes()));
    assert!(ingestor.ingest(payload("speed", 87.0, ts).as_bytes()));
    assert!(ingestor.ingest(payload("rpm", 3100.0, ts).as_bytes()));
    assert!(!ingestor.ingest(b"{not json"));

    assert_eq!(scheduler.tick(), 3);
    assert!(buffer.is_empty());
    drop(scheduler);

    let engine = run_render_loop(
        RenderEngine::new(EngineConfig::default()),
        ImmediateClock,
        req_rx,
        report_tx,
        shutdown_rx,
    )
    .await
    .unwrap();

    assert_eq!(engine.phase(), EnginePhase::TornDown);
    assert_eq!(engine.state("speed").unwrap().value, 87.0);
    assert_eq!(engine.state("rpm").unwrap().value, 3100.0);
    assert_eq!(engine.latency().len(), 3);

    // Init and the batch land in the same frame, so one full redraw shows
    // the final values.
    let values = value_texts(&surface.ops());
    assert_eq!(values.len(), 20);
    assert_eq!(values[0], "87");
    assert!(values.contains(&"3100".to_string()));

    let mut overlay = DebugOverlay::new();
    while let Ok(report) = report_rx.try_recv() {
        overlay.handle(report);
    }
    assert_eq!(overlay.reports(), 1);
    assert!(overlay.stats().latency_p95 >= overlay.stats().latency_p50);
    assert!(overlay.line().starts_with("fps 0.0 |"));
}

#[tokio::test]
async fn unknown_metric_gets_its_own_card() {
    let buffer = MetricBuffer::new();
    let ingestor = Ingestor::new(buffer.clone());
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (report_tx, _report_rx) = mpsc::unbounded_channel();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let surface = RecordingSurface::new();

    req_tx
        .send(RenderRequest::Init {
            surface: Box::new(surface.clone()),
            catalog: MetricCatalog::builtin(),
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 2.0,
        })
        .unwrap();
    let mut scheduler = FrameScheduler::new(buffer).with_channel(req_tx);

    let line = r#"{"metric":"cabin_co2","label":"Cabin CO2","unit":"ppm","value":640,"timestamp":1}"#;
    assert!(ingestor.ingest(line.as_bytes()));
    scheduler.tick();
    drop(scheduler);

    let engine = run_render_loop(
        RenderEngine::new(EngineConfig::default()),
        ImmediateClock,
        req_rx,
        report_tx,
        shutdown_rx,
    )
    .await
    .unwrap();

    assert_eq!(engine.order().len(), 21);
    assert_eq!(engine.order().last().map(String::as_str), Some("cabin_co2"));
    assert_eq!(surface.size(), Some((2560, 1440)));
    let labels: Vec<_> = surface
        .ops()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::Text {
                text,
                style: TextStyle::Label,
                ..
            } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(labels.last().map(String::as_str), Some("Cabin CO2"));
}

#[test]
fn render_thread_shuts_down_on_signal() {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let surface = RecordingSurface::new();

    let host = RenderHost::spawn(HostConfig::default(), req_rx, report_tx, shutdown_rx).unwrap();
    req_tx
        .send(RenderRequest::Init {
            surface: Box::new(surface.clone()),
            catalog: MetricCatalog::builtin(),
            width: 800.0,
            height: 600.0,
            pixel_ratio: 1.0,
        })
        .unwrap();

    assert!(report_rx.blocking_recv().is_some());
    shutdown_tx.send(true).unwrap();

    let engine = host.join().unwrap();
    assert_eq!(engine.phase(), EnginePhase::TornDown);
    assert!(surface.is_released());
    drop(req_tx);
}
