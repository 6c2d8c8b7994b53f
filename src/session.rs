//! Operator-controlled session configuration
//!
//! Every setter validates before assigning, so a stored configuration is
//! always capture-ready. A rejected value leaves the previous one in place.

use thiserror::Error;

use crate::camera::ExposureMicros;
use crate::color::ColorName;
use crate::grid::ActiveLedCount;

pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Rejected operator input. The messages are shown to the operator as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Brightness must be 0–255.")]
    Brightness,
    #[error("Must be square number ≤ 64.")]
    ActiveLeds,
    #[error("Must be positive.")]
    Exposure,
    #[error("Exposure must be at most {} µs.", u32::MAX)]
    ExposureTooLong,
    #[error("Invalid color.")]
    Color,
    #[error("Usage: folder <folder_name>")]
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    brightness: u8,
    active_leds: ActiveLedCount,
    exposure: ExposureMicros,
    color: ColorName,
    folder: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            active_leds: ActiveLedCount::default(),
            exposure: ExposureMicros::default(),
            color: ColorName::default(),
            folder: None,
        }
    }
}

impl SessionConfig {
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn active_leds(&self) -> ActiveLedCount {
        self.active_leds
    }

    pub const fn exposure(&self) -> ExposureMicros {
        self.exposure
    }

    pub const fn color(&self) -> ColorName {
        self.color
    }

    /// `None` means a timestamped folder is created per capture
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn set_brightness(&mut self, value: i64) -> Result<u8, ConfigError> {
        let brightness = u8::try_from(value).map_err(|_| ConfigError::Brightness)?;
        self.brightness = brightness;
        Ok(brightness)
    }

    pub fn set_active_leds(&mut self, value: i64) -> Result<ActiveLedCount, ConfigError> {
        let count = ActiveLedCount::new(value).ok_or(ConfigError::ActiveLeds)?;
        self.active_leds = count;
        Ok(count)
    }

    pub fn set_exposure(&mut self, value: i64) -> Result<ExposureMicros, ConfigError> {
        let exposure = match ExposureMicros::new(value) {
            Some(exposure) => exposure,
            None if value > 0 => return Err(ConfigError::ExposureTooLong),
            None => return Err(ConfigError::Exposure),
        };
        self.exposure = exposure;
        Ok(exposure)
    }

    pub fn set_color(&mut self, name: &str) -> Result<ColorName, ConfigError> {
        let color = ColorName::parse_selectable(name).ok_or(ConfigError::Color)?;
        self.color = color;
        Ok(color)
    }

    pub fn set_folder(&mut self, name: &str) -> Result<&str, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Folder);
        }
        Ok(self.folder.insert(name.to_owned()).as_str())
    }

    /// Freeze the values a capture run reads
    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            active_leds: self.active_leds,
            color: self.color,
            brightness: self.brightness,
            exposure: self.exposure,
            folder: self.folder.clone(),
        }
    }
}

/// Configuration read once at the start of a capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSnapshot {
    pub active_leds: ActiveLedCount,
    pub color: ColorName,
    pub brightness: u8,
    pub exposure: ExposureMicros,
    pub folder: Option<String>,
}

impl Default for CaptureSnapshot {
    fn default() -> Self {
        SessionConfig::default().snapshot()
    }
}
