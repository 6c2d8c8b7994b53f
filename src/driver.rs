//! LED strip driver interface
//!
//! The rig talks to the strip through [`LedDriver`]: pixels are buffered with
//! `set_pixel` and only reach the hardware on `show`. [`BufferedStrip`]
//! implements this on top of any `smart-leds` writer, so the wire protocol
//! itself stays with the writer crate.

use core::convert::Infallible;
use core::fmt::Debug;

use heapless::Vec;
use smart_leds::{SmartLedsWrite, brightness};
use thiserror::Error;

use crate::color::{OFF, Rgb};
use crate::grid::GRID_CELLS;

/// Errors reported by the LED strip
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedError {
    #[error("LED index {0} is outside the {GRID_CELLS}-pixel grid")]
    IndexOutOfRange(usize),
    #[error("LED strip write failed: {0}")]
    Write(String),
    #[error("failed to open LED strip on {device}: {reason}")]
    Open { device: String, reason: String },
}

/// Abstract LED driver
///
/// Implement this trait to support different hardware backends.
/// The illumination controller is generic over it.
pub trait LedDriver {
    /// Buffer a color for one pixel; nothing is sent until [`LedDriver::show`]
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), LedError>;

    /// Set the global brightness applied on the next commit
    fn set_brightness(&mut self, level: u8);

    /// Commit the buffered pixels to hardware
    fn show(&mut self) -> Result<(), LedError>;
}

/// Frame buffer in front of a `smart-leds` writer
pub struct BufferedStrip<W> {
    writer: W,
    pixels: [Rgb; GRID_CELLS],
    brightness: u8,
}

impl<W> BufferedStrip<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    pub const fn new(writer: W, brightness: u8) -> Self {
        Self {
            writer,
            pixels: [OFF; GRID_CELLS],
            brightness,
        }
    }

    /// Currently buffered pixels, before brightness scaling
    pub const fn pixels(&self) -> &[Rgb; GRID_CELLS] {
        &self.pixels
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W> LedDriver for BufferedStrip<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), LedError> {
        let pixel = self
            .pixels
            .get_mut(index)
            .ok_or(LedError::IndexOutOfRange(index))?;
        *pixel = color;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn show(&mut self) -> Result<(), LedError> {
        let frame = brightness(self.pixels.iter().copied(), self.brightness);
        self.writer
            .write(frame)
            .map_err(|err| LedError::Write(format!("{err:?}")))
    }
}

/// Writer that only logs which pixels a commit lights up
///
/// Used when no strip is attached.
#[derive(Debug, Default)]
pub struct LogStrip {
    commits: u64,
}

impl LogStrip {
    pub const fn new() -> Self {
        Self { commits: 0 }
    }

    pub const fn commits(&self) -> u64 {
        self.commits
    }
}

impl SmartLedsWrite for LogStrip {
    type Error = Infallible;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut lit: Vec<usize, GRID_CELLS> = Vec::new();
        for (index, color) in iterator.into_iter().map(Into::into).enumerate() {
            if color != OFF {
                let _ = lit.push(index);
            }
        }
        self.commits += 1;
        log::debug!("[LogStrip] commit #{}: lit {:?}", self.commits, lit.as_slice());
        Ok(())
    }
}
