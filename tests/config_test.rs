//! Configuration loading and validation tests


use gaze_dwell_pointer::{
    config::{validate_viewport, Config, EXAMPLE_CONFIG},
    geometry::Viewport,
    Error,
};
use std::time::Duration;
use test_helpers::temp_path;

#[test]
fn test_file_round_trip() {
    let path = temp_path("round-trip.yaml");

    let mut config = Config::default();
    config.smoothing.gaze_alpha = 0.5;
    config.dwell.duration_ms = 1200;
    config.dwell.radius_px = 35.0;
    config.display.viewport_width = 2560.0;
    config.cursor.dispatch_clicks = true;

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_example_file_loads() {
    let path = temp_path("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, Config::default());
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_file() {
    let result = Config::from_file(temp_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_malformed_yaml() {
    let result = Config::from_yaml_str("smoothing: [not, a, map");
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = Config::from_yaml_str("dwell:\n  duration_ms: soon\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases: [(&str, fn(&mut Config)); 9] = [
        ("zero gaze alpha", |c: &mut Config| c.smoothing.gaze_alpha = 0.0),
        ("gaze alpha above one", |c: &mut Config| c.smoothing.gaze_alpha = 1.5),
        ("NaN pointer alpha", |c: &mut Config| c.smoothing.pointer_alpha = f64::NAN),
        ("negative radius", |c: &mut Config| c.dwell.radius_px = -1.0),
        ("infinite radius", |c: &mut Config| c.dwell.radius_px = f64::INFINITY),
        ("zero duration", |c: &mut Config| c.dwell.duration_ms = 0),
        ("hysteresis of one", |c: &mut Config| c.dwell.hysteresis = 1.0),
        ("zero viewport", |c: &mut Config| c.display.viewport_height = 0.0),
        ("infinite viewport", |c: &mut Config| c.display.viewport_width = f64::INFINITY),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(Error::ConfigError(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn test_edge_values_accepted() {
    let mut config = Config::default();
    config.smoothing.gaze_alpha = 1.0;
    config.smoothing.pointer_alpha = 1.0;
    config.dwell.hysteresis = 0.0;
    config.dwell.cooldown_ms = 0;
    config.frame_loop.min_tick_interval_ms = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_feeds_session() {
    let config = Config::from_yaml_str(
        "smoothing:\n  pointer_alpha: 0.5\ndwell:\n  duration_ms: 1000\n  cooldown_ms: 250\nframe_loop:\n  min_tick_interval_ms: 33\n",
    )
    .unwrap();

    let session = config.session_config();
    assert_eq!(session.pointer_alpha, 0.5);
    assert_eq!(session.gaze_alpha, 0.3);
    assert_eq!(session.dwell.duration, Duration::from_millis(1000));
    assert_eq!(session.dwell.cooldown, Duration::from_millis(250));
    assert_eq!(session.min_tick_interval, Duration::from_millis(33));
}

#[test]
fn test_validate_viewport() {
    assert!(validate_viewport(Viewport::new(1280.0, 720.0)).is_ok());

    for viewport in [
        Viewport::new(0.0, 720.0),
        Viewport::new(-5.0, 720.0),
        Viewport::new(1280.0, f64::NAN),
        Viewport::new(f64::INFINITY, 720.0),
    ] {
        assert!(matches!(validate_viewport(viewport), Err(Error::ConfigError(_))));
    }
}
