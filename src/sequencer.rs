//! Capture sequencer
//!
//! Walks a [`SubGridPlan`] and, for each coordinate, lights exactly that LED,
//! waits for the optics to settle, takes one still and clears the LED again.
//! Each frame is named after its coordinate, which is the only link between
//! an image and the direction it was lit from.
//!
//! ```text
//! Idle -> Preparing -> (Illuminating -> Settling -> Exposing -> Persisting -> Clearing)* -> Complete -> Idle
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use embassy_time::{Duration, Instant};
use thiserror::Error;

use crate::camera::{Camera, CameraError};
use crate::color::ColorName;
use crate::driver::{LedDriver, LedError};
use crate::grid::{CaptureFrame, GRID_SIZE, GridCoord, compute_sub_grid_plan, frame_file_name};
use crate::illumination::IlluminationController;
use crate::session::CaptureSnapshot;

/// Pause between lighting an LED and exposing.
///
/// Must exceed the strip's worst-case commit latency.
pub const SETTLE_TIME: Duration = Duration::from_millis(300);

/// Pause after clearing an LED before lighting the next one
pub const COOLDOWN: Duration = Duration::from_millis(100);

/// Folder name format used when the operator has not picked one
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Blocking wait used between sequencer steps
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(core::time::Duration::from_micros(duration.as_micros()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Preparing,
    Illuminating(GridCoord),
    Settling(GridCoord),
    Exposing(GridCoord),
    Persisting(GridCoord),
    Clearing(GridCoord),
    Complete,
}

/// Failure while capturing a single coordinate
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Led(#[from] LedError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("frame file {} is missing after capture", .0.display())]
    MissingFile(PathBuf),
}

/// Reason a capture run was aborted
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to create capture folder {}: {source}", .path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to set camera exposure: {0}")]
    Exposure(#[source] CameraError),
    #[error("failed to clear LEDs before capture: {0}")]
    Prepare(#[source] LedError),
    #[error(
        "capture aborted at frame {position} of {total} (row {}, col {}): {source}",
        .coord.row,
        .coord.col
    )]
    Frame {
        coord: GridCoord,
        /// 1-based position of the coordinate in the plan
        position: usize,
        total: usize,
        #[source]
        source: FrameError,
    },
}

impl CaptureError {
    /// Coordinate the run stopped at, if it got that far
    pub const fn coord(&self) -> Option<GridCoord> {
        match self {
            Self::Frame { coord, .. } => Some(*coord),
            _ => None,
        }
    }
}

/// Result of a completed capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRun {
    pub folder: PathBuf,
    pub frames: Vec<CaptureFrame>,
}

/// Folder a run writes into, relative to the base path
///
/// Timestamps have one-second resolution; two unnamed runs within the same
/// second share a folder.
pub fn resolve_folder_name(folder: Option<&str>, now: NaiveDateTime) -> String {
    match folder {
        Some(name) => name.to_owned(),
        None => now.format(TIMESTAMP_FORMAT).to_string(),
    }
}

pub struct CaptureSequencer<P: Pause> {
    base_path: PathBuf,
    pause: P,
    state: CaptureState,
}

impl<P: Pause> CaptureSequencer<P> {
    pub fn new(base_path: impl Into<PathBuf>, pause: P) -> Self {
        Self {
            base_path: base_path.into(),
            pause,
            state: CaptureState::Idle,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub const fn state(&self) -> CaptureState {
        self.state
    }

    pub const fn pause_mut(&mut self) -> &mut P {
        &mut self.pause
    }

    /// Folder a run started at `now` with `folder` would write into
    pub fn capture_folder(&self, folder: Option<&str>, now: NaiveDateTime) -> PathBuf {
        self.base_path.join(resolve_folder_name(folder, now))
    }

    /// Run one full capture sequence
    ///
    /// Any failure aborts the run. The sequencer then tries once to turn
    /// every LED off and returns to `Idle`; it never resumes a partial run.
    pub fn run<D: LedDriver, C: Camera>(
        &mut self,
        snapshot: &CaptureSnapshot,
        lights: &mut IlluminationController<D>,
        camera: &mut C,
        now: NaiveDateTime,
    ) -> Result<CaptureRun, CaptureError> {
        let result = self.sequence(snapshot, lights, camera, now);
        if let Err(err) = &result {
            log::warn!("[CaptureSequencer] {err}");
            if let Err(clear_err) = lights.set_all(ColorName::Off) {
                log::error!("[CaptureSequencer] failed to turn LEDs off after abort: {clear_err}");
            }
        }
        self.transition(CaptureState::Idle);
        result
    }

    fn sequence<D: LedDriver, C: Camera>(
        &mut self,
        snapshot: &CaptureSnapshot,
        lights: &mut IlluminationController<D>,
        camera: &mut C,
        now: NaiveDateTime,
    ) -> Result<CaptureRun, CaptureError> {
        let started = Instant::now();
        self.transition(CaptureState::Preparing);

        let plan = compute_sub_grid_plan(snapshot.active_leds, GRID_SIZE);
        let folder = self.capture_folder(snapshot.folder.as_deref(), now);
        fs::create_dir_all(&folder).map_err(|source| CaptureError::CreateFolder {
            path: folder.clone(),
            source,
        })?;
        camera
            .set_exposure(snapshot.exposure)
            .map_err(CaptureError::Exposure)?;
        lights.set_all(ColorName::Off).map_err(CaptureError::Prepare)?;

        log::info!(
            "Saving {} images to {} ({} µs, {} at {})",
            plan.len(),
            folder.display(),
            snapshot.exposure,
            snapshot.color,
            snapshot.brightness
        );

        let total = plan.len();
        let mut frames = Vec::with_capacity(total);
        for (position, coord) in plan.iter().enumerate() {
            let frame = self
                .capture_coordinate(coord, &folder, snapshot, lights, camera)
                .map_err(|source| CaptureError::Frame {
                    coord,
                    position: position + 1,
                    total,
                    source,
                })?;
            frames.push(frame);
        }

        self.transition(CaptureState::Complete);
        // Frames are already on disk; a dark focus LED does not fail the run
        if let Err(err) = lights.show_focus_indicator(snapshot.color, snapshot.brightness) {
            log::error!("[CaptureSequencer] failed to restore focus indicator: {err}");
        }

        log::info!(
            "Capture complete: {} frames in {} ms",
            frames.len(),
            started.elapsed().as_millis()
        );
        Ok(CaptureRun { folder, frames })
    }

    fn capture_coordinate<D: LedDriver, C: Camera>(
        &mut self,
        coord: GridCoord,
        folder: &Path,
        snapshot: &CaptureSnapshot,
        lights: &mut IlluminationController<D>,
        camera: &mut C,
    ) -> Result<CaptureFrame, FrameError> {
        let index = coord.flat_index();
        log::info!(
            "Lighting LED at row {}, col {} (index {})",
            coord.row,
            coord.col,
            index
        );

        self.transition(CaptureState::Illuminating(coord));
        lights.set_all(ColorName::Off)?;
        lights.light_single(index, snapshot.color, snapshot.brightness)?;

        self.transition(CaptureState::Settling(coord));
        self.pause.pause(SETTLE_TIME);

        let path = folder.join(frame_file_name(coord));
        self.transition(CaptureState::Exposing(coord));
        camera.capture_file(&path)?;

        self.transition(CaptureState::Persisting(coord));
        if !path.is_file() {
            return Err(FrameError::MissingFile(path));
        }
        log::info!("Captured {}", path.display());

        self.transition(CaptureState::Clearing(coord));
        lights.clear_single(index)?;
        self.pause.pause(COOLDOWN);

        Ok(CaptureFrame {
            coord,
            flat_index: index,
            path,
        })
    }

    fn transition(&mut self, next: CaptureState) {
        log::trace!("[CaptureSequencer] {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
