//! Session runtime
//!
//! [`Rig`] owns the hardware and the session configuration and applies
//! operator commands to them. It is the only place that touches either
//! the LED strip or the camera.

use core::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::camera::{Camera, CameraError, ExposureMicros};
use crate::color::ColorName;
use crate::command::{Command, HELP};
use crate::driver::{LedDriver, LedError};
use crate::grid::ActiveLedCount;
use crate::illumination::IlluminationController;
use crate::sequencer::{CaptureError, CaptureRun, CaptureSequencer, Pause};
use crate::session::{ConfigError, SessionConfig};

#[derive(Debug, Error)]
pub enum RigError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("LED error: {0}")]
    Led(#[from] LedError),
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Outcome of a successfully applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Brightness(u8),
    ActiveLeds(ActiveLedCount),
    Exposure(ExposureMicros),
    Color(ColorName),
    Folder(String),
    Captured(CaptureRun),
    Status(SessionConfig),
    Help,
    Exit,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(level) => write!(f, "Brightness set to {level}."),
            Self::ActiveLeds(count) => write!(f, "LED grid for capture: {}", count.count()),
            Self::Exposure(exposure) => write!(f, "Exposure set to {exposure} µs."),
            Self::Color(color) => write!(f, "Color set to {color}"),
            Self::Folder(name) => write!(f, "Folder name set to: {name}"),
            Self::Captured(_) => f.write_str("Capture complete."),
            Self::Status(config) => {
                writeln!(f, "brightness: {}", config.brightness())?;
                writeln!(f, "leds:       {}", config.active_leds().count())?;
                writeln!(f, "exposure:   {} µs", config.exposure())?;
                writeln!(f, "color:      {}", config.color())?;
                write!(f, "folder:     {}", config.folder().unwrap_or("<timestamp>"))
            }
            Self::Help => f.write_str(HELP),
            Self::Exit => Ok(()),
        }
    }
}

pub struct Rig<D: LedDriver, C: Camera, P: Pause> {
    lights: IlluminationController<D>,
    camera: C,
    config: SessionConfig,
    sequencer: CaptureSequencer<P>,
}

impl<D: LedDriver, C: Camera, P: Pause> Rig<D, C, P> {
    pub fn new(
        driver: D,
        camera: C,
        config: SessionConfig,
        base_path: impl Into<PathBuf>,
        pause: P,
    ) -> Self {
        Self {
            lights: IlluminationController::new(driver, config.brightness(), config.color()),
            camera,
            config,
            sequencer: CaptureSequencer::new(base_path, pause),
        }
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn lights(&self) -> &IlluminationController<D> {
        &self.lights
    }

    pub const fn camera(&self) -> &C {
        &self.camera
    }

    pub const fn sequencer(&self) -> &CaptureSequencer<P> {
        &self.sequencer
    }

    /// Bring the hardware into a known state
    ///
    /// A previous process may have been killed mid-capture with an LED
    /// still lit, so the grid is always forced dark before the focus
    /// indicator comes on.
    pub fn startup(&mut self) -> Result<(), RigError> {
        self.camera.set_exposure(self.config.exposure())?;
        self.camera.start_preview()?;
        self.lights.set_all(ColorName::Off)?;
        self.refresh_focus()?;
        log::info!("Rig ready, preview active");
        Ok(())
    }

    /// Apply one operator command
    pub fn execute(&mut self, command: Command, now: NaiveDateTime) -> Result<Response, RigError> {
        match command {
            Command::Brightness(value) => {
                let brightness = self.config.set_brightness(value)?;
                self.refresh_focus()?;
                Ok(Response::Brightness(brightness))
            }
            Command::Leds(value) => {
                let count = self.config.set_active_leds(value)?;
                Ok(Response::ActiveLeds(count))
            }
            Command::Exposure(value) => {
                let exposure = self.config.set_exposure(value)?;
                self.camera.set_exposure(exposure)?;
                Ok(Response::Exposure(exposure))
            }
            Command::Color(name) => {
                let color = self.config.set_color(&name)?;
                self.refresh_focus()?;
                Ok(Response::Color(color))
            }
            Command::Folder(name) => {
                let folder = self.config.set_folder(&name)?;
                Ok(Response::Folder(folder.to_owned()))
            }
            Command::Capture => self.capture(now).map(Response::Captured),
            Command::Status => Ok(Response::Status(self.config.clone())),
            Command::Help => Ok(Response::Help),
            Command::Exit => Ok(Response::Exit),
        }
    }

    /// Folder the next capture started at `now` writes into
    pub fn capture_folder(&self, now: NaiveDateTime) -> PathBuf {
        self.sequencer.capture_folder(self.config.folder(), now)
    }

    /// Run the capture sequence on a snapshot of the current configuration
    pub fn capture(&mut self, now: NaiveDateTime) -> Result<CaptureRun, RigError> {
        let snapshot = self.config.snapshot();
        let run = self
            .sequencer
            .run(&snapshot, &mut self.lights, &mut self.camera, now)?;
        Ok(run)
    }

    /// Best-effort cleanup: all LEDs off, preview stopped
    ///
    /// Failures are logged and not escalated.
    pub fn shutdown(&mut self) {
        if let Err(err) = self.lights.set_all(ColorName::Off) {
            log::warn!("Failed to turn LEDs off during shutdown: {err}");
        }
        if let Err(err) = self.camera.stop_preview() {
            log::warn!("Failed to stop camera preview during shutdown: {err}");
        }
        log::info!("Rig shut down");
    }

    fn refresh_focus(&mut self) -> Result<(), LedError> {
        self.lights
            .show_focus_indicator(self.config.color(), self.config.brightness())
    }
}
