//! Text format for recorded tracker output and calibration events.
//!
//! One event per line, `<t_ms> <action> [args...]`. `#` starts a comment.
//!
//! ```text
//! # t_ms action     args
//! 0      sample     0.48 0.52 0.52 0.52
//! 16     sample     0.48 0.52 0.52 0.52 0.50 0.52
//! 33     lost
//! 100    calibrate
//! 120    confirm
//! 900    reset
//! 950    resize     1280 720
//! 1000   dwell      off
//! ```

use crate::{
    gaze::{GazeSample, TrackerSignal},
    geometry::{Point2, Viewport},
    Error, Result,
};
use std::{path::Path, str::FromStr, time::Duration};

/// What happens at a script timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    /// Tracker output for a frame
    Tracker(TrackerSignal),
    /// Start a calibration session
    StartCalibration,
    /// Record the current gaze for the active target
    ConfirmCalibration,
    /// Drop the calibration
    ResetCalibration,
    /// Viewport changed size
    Resize(Viewport),
    /// Switch dwell clicking on or off
    Dwell(bool),
}

/// A timestamped action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    /// Offset from the start of the recording
    pub time: Duration,
    /// What happens
    pub action: ScriptAction,
    /// 1-based source line
    pub line: usize,
}

/// Parsed gaze script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GazeScript {
    events: Vec<ScriptEvent>,
}

impl GazeScript {
    /// Load a script from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Events in timestamp order
    #[must_use]
    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the script has no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromStr for GazeScript {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        let mut events = Vec::new();
        let mut last_time = Duration::ZERO;

        for (idx, raw_line) in content.lines().enumerate() {
            let line = idx + 1;
            let text = raw_line.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }

            let event = parse_line(text, line)?;
            if event.time < last_time {
                return Err(parse_error(line, "timestamps must not decrease"));
            }
            last_time = event.time;
            events.push(event);
        }

        Ok(Self { events })
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::ScriptParse {
        line,
        message: message.into(),
    }
}

fn parse_line(text: &str, line: usize) -> Result<ScriptEvent> {
    let mut fields = text.split_whitespace();

    let time_field = fields.next().ok_or_else(|| parse_error(line, "missing timestamp"))?;
    let time_ms: u64 = time_field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid timestamp '{time_field}'")))?;

    let action_name = fields.next().ok_or_else(|| parse_error(line, "missing action"))?;
    let args: Vec<&str> = fields.collect();

    let action = match action_name {
        "sample" => ScriptAction::Tracker(TrackerSignal::Sample(parse_sample(&args, line)?)),
        "lost" => {
            expect_args(&args, 0, line)?;
            ScriptAction::Tracker(TrackerSignal::NoFace)
        }
        "calibrate" => {
            expect_args(&args, 0, line)?;
            ScriptAction::StartCalibration
        }
        "confirm" => {
            expect_args(&args, 0, line)?;
            ScriptAction::ConfirmCalibration
        }
        "reset" => {
            expect_args(&args, 0, line)?;
            ScriptAction::ResetCalibration
        }
        "resize" => {
            expect_args(&args, 2, line)?;
            let width = parse_number(args[0], line)?;
            let height = parse_number(args[1], line)?;
            if width <= 0.0 || height <= 0.0 {
                return Err(parse_error(line, "viewport dimensions must be positive"));
            }
            ScriptAction::Resize(Viewport::new(width, height))
        }
        "dwell" => {
            expect_args(&args, 1, line)?;
            match args[0] {
                "on" => ScriptAction::Dwell(true),
                "off" => ScriptAction::Dwell(false),
                other => return Err(parse_error(line, format!("expected 'on' or 'off', got '{other}'"))),
            }
        }
        other => return Err(parse_error(line, format!("unknown action '{other}'"))),
    };

    Ok(ScriptEvent {
        time: Duration::from_millis(time_ms),
        action,
        line,
    })
}

fn expect_args(args: &[&str], count: usize, line: usize) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(parse_error(
            line,
            format!("expected {count} arguments, got {}", args.len()),
        ))
    }
}

fn parse_number(field: &str, line: usize) -> Result<f64> {
    let value: f64 = field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid number '{field}'")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(parse_error(line, format!("non-finite number '{field}'")))
    }
}

fn parse_sample(args: &[&str], line: usize) -> Result<GazeSample> {
    let values = args
        .iter()
        .map(|field| parse_number(field, line))
        .collect::<Result<Vec<f64>>>()?;

    match values.as_slice() {
        [lx, ly, rx, ry] => Ok(GazeSample::from_irises(
            Point2::new(*lx, *ly),
            Point2::new(*rx, *ry),
        )),
        [lx, ly, rx, ry, ax, ay] => Ok(GazeSample::new(
            Point2::new(*lx, *ly),
            Point2::new(*rx, *ry),
            Point2::new(*ax, *ay),
        )),
        _ => Err(parse_error(
            line,
            format!("sample needs 4 or 6 coordinates, got {}", values.len()),
        )),
    }
}
