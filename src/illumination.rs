//! Illumination controller
//!
//! Sole owner of the LED driver. Every operation ends with exactly one
//! commit that leaves the grid in a known state.

use crate::color::ColorName;
use crate::driver::{LedDriver, LedError};
use crate::grid::{GRID_CELLS, GridCoord};

/// LED used for live operator feedback between captures
pub const FOCUS_LED: GridCoord = GridCoord { row: 3, col: 3 };

/// What the grid currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lit {
    /// Every LED off
    Dark,
    /// Exactly one LED on
    Single(usize),
    /// Every LED set to the same color
    All(ColorName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IlluminationState {
    pub brightness: u8,
    pub color: ColorName,
    pub lit: Lit,
}

pub struct IlluminationController<D: LedDriver> {
    driver: D,
    state: IlluminationState,
}

impl<D: LedDriver> IlluminationController<D> {
    /// Wrap a driver. The grid state is unknown until the first commit, so
    /// callers should clear it before relying on [`Self::state`].
    pub fn new(mut driver: D, brightness: u8, color: ColorName) -> Self {
        driver.set_brightness(brightness);
        Self {
            driver,
            state: IlluminationState {
                brightness,
                color,
                lit: Lit::Dark,
            },
        }
    }

    pub const fn state(&self) -> &IlluminationState {
        &self.state
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Set every LED to `color` and commit
    pub fn set_all(&mut self, color: ColorName) -> Result<(), LedError> {
        self.fill(color)?;
        self.driver.show()?;
        self.state.lit = if color == ColorName::Off {
            Lit::Dark
        } else {
            Lit::All(color)
        };
        Ok(())
    }

    /// Commit a frame where only `index` is lit
    pub fn light_single(
        &mut self,
        index: usize,
        color: ColorName,
        brightness: u8,
    ) -> Result<(), LedError> {
        if index >= GRID_CELLS {
            return Err(LedError::IndexOutOfRange(index));
        }
        self.fill(ColorName::Off)?;
        self.driver.set_brightness(brightness);
        self.driver.set_pixel(index, color.to_rgb())?;
        self.driver.show()?;

        self.state.brightness = brightness;
        self.state.color = color;
        self.state.lit = Lit::Single(index);
        Ok(())
    }

    /// Turn off a single LED and commit
    pub fn clear_single(&mut self, index: usize) -> Result<(), LedError> {
        self.driver.set_pixel(index, ColorName::Off.to_rgb())?;
        self.driver.show()?;
        if self.state.lit == Lit::Single(index) {
            self.state.lit = Lit::Dark;
        }
        Ok(())
    }

    /// Clear the grid and light the center focus LED
    pub fn show_focus_indicator(
        &mut self,
        color: ColorName,
        brightness: u8,
    ) -> Result<(), LedError> {
        self.set_all(ColorName::Off)?;
        self.light_single(FOCUS_LED.flat_index(), color, brightness)
    }

    fn fill(&mut self, color: ColorName) -> Result<(), LedError> {
        let rgb = color.to_rgb();
        for index in 0..GRID_CELLS {
            self.driver.set_pixel(index, rgb)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{BufferedStrip, LogStrip};

    fn controller() -> IlluminationController<BufferedStrip<LogStrip>> {
        IlluminationController::new(BufferedStrip::new(LogStrip::new(), 100), 100, ColorName::Green)
    }

    #[test]
    fn focus_led_is_flat_index_27() {
        assert_eq!(FOCUS_LED.flat_index(), 27);
    }

    #[test]
    fn light_single_tracks_state() {
        let mut lights = controller();
        lights.light_single(10, ColorName::Red, 42).unwrap();
        assert_eq!(
            *lights.state(),
            IlluminationState {
                brightness: 42,
                color: ColorName::Red,
                lit: Lit::Single(10),
            }
        );
        assert_eq!(lights.driver().brightness(), 42);

        lights.clear_single(10).unwrap();
        assert_eq!(lights.state().lit, Lit::Dark);
    }

    #[test]
    fn light_single_rejects_out_of_range() {
        let mut lights = controller();
        assert_eq!(
            lights.light_single(64, ColorName::Red, 10),
            Err(LedError::IndexOutOfRange(64))
        );
        assert_eq!(lights.driver().writer().commits(), 0);
    }
}
