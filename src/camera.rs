//! Camera interface
//!
//! The rig only needs manual exposure, synchronous still capture into a
//! file, and a live preview for framing the subject.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use thiserror::Error;

/// Fixed exposure time in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExposureMicros(NonZeroU32);

impl ExposureMicros {
    /// Returns `None` for zero, negative, or out-of-range values
    pub fn new(micros: i64) -> Option<Self> {
        u32::try_from(micros).ok().and_then(NonZeroU32::new).map(Self)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for ExposureMicros {
    fn default() -> Self {
        Self(NonZeroU32::new(10_000).unwrap_or(NonZeroU32::MIN))
    }
}

impl core::fmt::Display for ExposureMicros {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Error type for camera operations
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
    #[error("capture did not produce {}", .0.display())]
    MissingOutput(PathBuf),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("camera hardware error: {0}")]
    Hardware(String),
}

/// Camera backend used by the rig
pub trait Camera {
    /// Apply a fixed exposure to all following captures
    fn set_exposure(&mut self, exposure: ExposureMicros) -> Result<(), CameraError>;

    /// Capture one still into `path`, blocking until the file is written.
    /// An existing file is overwritten.
    fn capture_file(&mut self, path: &Path) -> Result<(), CameraError>;

    fn start_preview(&mut self) -> Result<(), CameraError>;

    fn stop_preview(&mut self) -> Result<(), CameraError>;
}

/// Raspberry Pi camera driven through the `rpicam-apps` command line tools
///
/// A running preview holds the sensor, so it is paused while a still is
/// taken and resumed afterwards.
pub struct CommandCamera {
    still_program: String,
    preview_program: String,
    exposure: ExposureMicros,
    preview: Option<Child>,
}

impl CommandCamera {
    pub fn new(still_program: impl Into<String>, preview_program: impl Into<String>) -> Self {
        Self {
            still_program: still_program.into(),
            preview_program: preview_program.into(),
            exposure: ExposureMicros::default(),
            preview: None,
        }
    }

    pub const fn exposure(&self) -> ExposureMicros {
        self.exposure
    }

    /// Manual exposure with auto gain disabled
    fn exposure_args(&self) -> [OsString; 4] {
        [
            "--shutter".into(),
            self.exposure.get().to_string().into(),
            "--gain".into(),
            "1.0".into(),
        ]
    }

    fn spawn_preview(&mut self) -> Result<(), CameraError> {
        let child = Command::new(&self.preview_program)
            .args(["--timeout", "0"])
            .args(self.exposure_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CameraError::Spawn {
                program: self.preview_program.clone(),
                source,
            })?;
        log::debug!("[CommandCamera] preview started (pid {})", child.id());
        self.preview = Some(child);
        Ok(())
    }

    fn kill_preview(&mut self) -> Result<bool, CameraError> {
        let Some(mut child) = self.preview.take() else {
            return Ok(false);
        };
        // The preview may already have exited on its own
        if child.try_wait().ok().flatten().is_none() {
            child
                .kill()
                .map_err(|err| CameraError::Hardware(format!("failed to stop preview: {err}")))?;
        }
        let _ = child.wait();
        log::debug!("[CommandCamera] preview stopped");
        Ok(true)
    }
}

impl Camera for CommandCamera {
    fn set_exposure(&mut self, exposure: ExposureMicros) -> Result<(), CameraError> {
        self.exposure = exposure;
        // The command line tools only read exposure at launch
        if self.kill_preview()? {
            self.spawn_preview()?;
        }
        Ok(())
    }

    fn capture_file(&mut self, path: &Path) -> Result<(), CameraError> {
        let resume_preview = self.kill_preview()?;

        let status = Command::new(&self.still_program)
            .args(["--nopreview", "--immediate"])
            .args(self.exposure_args())
            .arg("--output")
            .arg(path)
            .stdout(Stdio::null())
            .status()
            .map_err(|source| CameraError::Spawn {
                program: self.still_program.clone(),
                source,
            });

        if resume_preview {
            self.spawn_preview()?;
        }

        let status = status?;
        if !status.success() {
            return Err(CameraError::Exit {
                program: self.still_program.clone(),
                status,
            });
        }
        if !path.is_file() {
            return Err(CameraError::MissingOutput(path.to_path_buf()));
        }
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        if self.preview.is_some() {
            return Ok(());
        }
        self.spawn_preview()
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.kill_preview().map(|_| ())
    }
}

impl Drop for CommandCamera {
    fn drop(&mut self) {
        let _ = self.kill_preview();
    }
}

/// Minimal JPEG: start-of-image followed by end-of-image
const PLACEHOLDER_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// Camera stand-in that writes placeholder JPEG files
#[derive(Debug, Default)]
pub struct SimulatedCamera {
    exposure: ExposureMicros,
    previewing: bool,
    captures: usize,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn exposure(&self) -> ExposureMicros {
        self.exposure
    }

    pub const fn is_previewing(&self) -> bool {
        self.previewing
    }

    pub const fn captures(&self) -> usize {
        self.captures
    }
}

impl Camera for SimulatedCamera {
    fn set_exposure(&mut self, exposure: ExposureMicros) -> Result<(), CameraError> {
        log::debug!("[SimulatedCamera] exposure {} µs", exposure);
        self.exposure = exposure;
        Ok(())
    }

    fn capture_file(&mut self, path: &Path) -> Result<(), CameraError> {
        fs::write(path, PLACEHOLDER_JPEG).map_err(|source| CameraError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.captures += 1;
        log::debug!("[SimulatedCamera] wrote {}", path.display());
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        self.previewing = true;
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.previewing = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_must_be_positive() {
        assert_eq!(ExposureMicros::new(0), None);
        assert_eq!(ExposureMicros::new(-5), None);
        assert_eq!(ExposureMicros::new(i64::from(u32::MAX) + 1), None);
        assert_eq!(ExposureMicros::new(1).map(ExposureMicros::get), Some(1));
        assert_eq!(ExposureMicros::default().get(), 10_000);
    }

    #[test]
    fn simulated_camera_writes_jpeg_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let mut camera = SimulatedCamera::new();
        camera.capture_file(&path).unwrap();
        camera.capture_file(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), PLACEHOLDER_JPEG);
        assert_eq!(camera.captures(), 2);
    }

    #[test]
    fn missing_still_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = CommandCamera::new("definitely-not-a-camera-tool", "true");
        let err = camera.capture_file(&dir.path().join("x.jpg")).unwrap_err();
        assert!(matches!(err, CameraError::Spawn { .. }));
    }
}
