//! Gaze dwell pointer: replays recorded gaze through calibration, mapping
//! and dwell-click detection.

use anyhow::{Context, Result};
use clap::Parser;
use gaze_dwell_pointer::{
    app::ReplayApp,
    click::{ClickTarget, RecordingClickTarget},
    config::{validate_viewport, Config},
    cursor_control::CursorController,
    geometry::Viewport,
    script::GazeScript,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gaze script to replay
    script: PathBuf,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels (overrides config)
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in pixels (overrides config)
    #[arg(long)]
    height: Option<f64>,

    /// Deliver clicks to the X11 display
    #[arg(long)]
    x11: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Apply command-line size overrides to the base viewport
fn resolve_viewport(
    base: Viewport,
    width: Option<f64>,
    height: Option<f64>,
) -> gaze_dwell_pointer::Result<Viewport> {
    let viewport = Viewport::new(width.unwrap_or(base.width), height.unwrap_or(base.height));
    validate_viewport(viewport)?;
    Ok(viewport)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Gaze Dwell Pointer");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.validate()?;

    let script = GazeScript::from_file(&args.script)
        .with_context(|| format!("Failed to load gaze script {}", args.script.display()))?;

    let mut x11_target = if args.x11 || config.cursor.dispatch_clicks {
        match CursorController::new() {
            Ok(controller) => Some(controller),
            Err(e) => {
                warn!("Failed to initialize cursor control: {}", e);
                None
            }
        }
    } else {
        None
    };
    let mut recorder = RecordingClickTarget::new();

    let base_viewport = x11_target
        .as_ref()
        .map_or_else(|| config.viewport(), CursorController::viewport);
    let viewport = resolve_viewport(base_viewport, args.width, args.height)?;

    let clicker: &mut dyn ClickTarget = match x11_target.as_mut() {
        Some(controller) => controller,
        None => &mut recorder,
    };

    let mut app = ReplayApp::new(config.session_config(), viewport);
    let summary = app.run(&script, clicker);

    println!("Events:      {}", summary.events);
    println!("Ticks:       {} ({} without face)", summary.ticks, summary.lost_ticks);
    println!("Calibration: {:?}", summary.calibration_phase);
    if let Some(quality) = summary.calibration_quality {
        println!(
            "Fit error:   rms {:.2}px, max {:.2}px",
            quality.rms_error_px, quality.max_error_px
        );
    }
    if let Some(pointer) = summary.final_pointer {
        println!("Pointer:     ({:.1}, {:.1})", pointer.x, pointer.y);
    }
    println!("Clicks:      {}", summary.clicks.len());
    for click in &summary.clicks {
        println!(
            "  {:>8.0}ms  ({:.1}, {:.1})",
            click.time.as_secs_f64() * 1000.0,
            click.at.x,
            click.at.y
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_args() {
        let args = Args::try_parse_from(["gaze-dwell-pointer", "gaze.txt"]).unwrap();
        assert_eq!(args.script, PathBuf::from("gaze.txt"));
        assert!(args.config.is_none());
        assert!(!args.x11);
        assert!(!args.debug);
    }

    #[test]
    fn test_all_args() {
        let args = Args::try_parse_from([
            "gaze-dwell-pointer",
            "gaze.txt",
            "-C",
            "config.yaml",
            "--width",
            "1280",
            "--height",
            "720",
            "--x11",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("config.yaml")));
        assert_eq!(args.width, Some(1280.0));
        assert_eq!(args.height, Some(720.0));
        assert!(args.x11);
        assert!(args.debug);
    }

    #[test]
    fn test_resolve_viewport_overrides() {
        let base = Viewport::new(1920.0, 1080.0);
        assert_eq!(resolve_viewport(base, None, None).unwrap(), base);
        assert_eq!(
            resolve_viewport(base, Some(1280.0), None).unwrap(),
            Viewport::new(1280.0, 1080.0)
        );
    }

    #[test]
    fn test_resolve_viewport_rejects_bad_sizes() {
        let base = Viewport::new(1920.0, 1080.0);
        for (width, height) in [
            (Some(0.0), None),
            (Some(-5.0), None),
            (None, Some(f64::NAN)),
            (None, Some(f64::INFINITY)),
        ] {
            assert!(matches!(
                resolve_viewport(base, width, height),
                Err(gaze_dwell_pointer::Error::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_script_required() {
        assert!(Args::try_parse_from(["gaze-dwell-pointer"]).is_err());
    }
}
