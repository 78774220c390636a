//! pulseboardd — the Pulseboard daemon.
//!
//! Reads newline-delimited JSON metric payloads from stdin and paints them
//! onto a live card-grid dashboard:
//! - Metric buffer + frame scheduler (ingest side)
//! - Render thread owning the drawing surface
//! - Debug overlay logging fps, render time, and latency quantiles
//!
//! Logs go to stderr so the dashboard can own stdout.
//!
//! # Usage
//!
//! ```text
//! producer | pulseboardd run --config pulseboard.toml
//! pulseboardd run --headless --record ops.ndjson < capture.ndjson
//! pulseboardd catalog
//! ```

mod app;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pulseboard_core::{DashboardConfig, Surface};
use pulseboard_render::{RecordingSurface, TerminalSurface};
use tokio::io::BufReader;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::app::{run_dashboard, RunOptions};

#[derive(Parser)]
#[command(name = "pulseboardd", about = "Pulseboard real-time metrics dashboard")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Stream stdin payloads onto the dashboard.
    Run {
        /// Dashboard configuration file (TOML).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Display refresh rate override.
        #[arg(long)]
        refresh_hz: Option<u32>,

        /// Viewport width override, in logical pixels.
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height override, in logical pixels.
        #[arg(long)]
        height: Option<f64>,

        /// Device pixel ratio override.
        #[arg(long)]
        pixel_ratio: Option<f64>,

        /// Render to an in-memory surface instead of the terminal.
        #[arg(long)]
        headless: bool,

        /// With --headless, write every drawing op to this file as NDJSON.
        #[arg(long, requires = "headless")]
        record: Option<PathBuf>,

        /// Keep the dashboard up after stdin closes, until Ctrl-C.
        #[arg(long)]
        linger: bool,
    },

    /// Print the effective metric catalog as NDJSON.
    Catalog {
        /// Dashboard configuration file (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file and print the effective settings.
    CheckConfig {
        /// Configuration file to validate.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Run {
            config,
            refresh_hz,
            width,
            height,
            pixel_ratio,
            headless,
            record,
            linger,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(hz) = refresh_hz {
                config.display.refresh_hz = hz;
            }
            if let Some(width) = width {
                config.display.width = width;
            }
            if let Some(height) = height {
                config.display.height = height;
            }
            if let Some(ratio) = pixel_ratio {
                config.display.pixel_ratio = ratio;
            }
            config.validate().context("invalid settings")?;
            run(config, headless, record, linger).await
        }
        Command::Catalog { config } => {
            let config = load_config(config.as_deref())?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for descriptor in config.catalog()?.iter() {
                serde_json::to_writer(&mut out, descriptor)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Command::CheckConfig { path } => {
            let config = DashboardConfig::from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let catalog = config.catalog()?;
            println!("{} is valid", path.display());
            println!(
                "display: {}x{} @ {} Hz, pixel ratio {}",
                config.display.width,
                config.display.height,
                config.display.refresh_hz,
                config.display.pixel_ratio
            );
            println!(
                "grid: {} columns, gap {}, card height {}",
                config.grid.columns, config.grid.gap, config.grid.card_height
            );
            println!("latency window: {} samples", config.latency.window);
            println!("metrics: {}", catalog.len());
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,pulseboardd=debug,pulseboard_render=debug")
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    match path {
        Some(path) => {
            let config = DashboardConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(DashboardConfig::default()),
    }
}

async fn run(
    config: DashboardConfig,
    headless: bool,
    record: Option<PathBuf>,
    linger: bool,
) -> anyhow::Result<()> {
    info!(headless, "Pulseboard daemon starting");

    let recording = RecordingSurface::new();
    let surface: Box<dyn Surface> = if headless {
        Box::new(recording.clone())
    } else {
        Box::new(TerminalSurface::stdout())
    };

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C; shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let summary = run_dashboard(
        config,
        surface,
        stdin,
        RunOptions {
            exit_on_eof: !linger,
        },
        shutdown_rx,
    )
    .await?;

    info!(
        lines = summary.lines,
        accepted = summary.accepted,
        dropped = summary.dropped,
        batches = summary.batches,
        render_frames = summary.render_frames,
        "Pulseboard daemon stopped"
    );

    if let Some(path) = record {
        let ops = recording.take_ops();
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        );
        for op in &ops {
            serde_json::to_writer(&mut out, op)?;
            writeln!(out)?;
        }
        out.flush()?;
        info!(path = %path.display(), ops = ops.len(), "drawing ops recorded");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulseboard.toml");
        std::fs::write(&path, "[display]\nrefresh_hz = 30\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.display.refresh_hz, 30);
        assert_eq!(config.grid.columns, 4);
    }

    #[test]
    fn bad_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[display\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "pulseboardd",
            "run",
            "--refresh-hz",
            "120",
            "--headless",
            "--record",
            "ops.ndjson",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                refresh_hz,
                headless,
                record,
                ..
            } => {
                assert_eq!(refresh_hz, Some(120));
                assert!(headless);
                assert_eq!(record, Some(PathBuf::from("ops.ndjson")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn record_requires_headless() {
        assert!(Cli::try_parse_from(["pulseboardd", "run", "--record", "ops.ndjson"]).is_err());
    }
}
