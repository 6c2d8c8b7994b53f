//! WS2812 strip on a Linux SPI bus
//!
//! The data line goes to the bus MOSI pin (GPIO 10 on a Raspberry Pi).
//! `ws2812-spi` encodes each bit as a fixed SPI pattern, which only holds
//! for a clock between 2 and 3.8 MHz.

use std::path::Path;

use linux_embedded_hal::SpidevBus;
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use ws2812_spi::Ws2812;

use crate::driver::LedError;

/// Default spidev node on a Raspberry Pi
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.0";

/// SPI clock used for the WS2812 bit patterns
pub const SPI_CLOCK_HZ: u32 = 3_000_000;

/// `smart-leds` writer for a WS2812 strip behind spidev
pub type SpiStrip = Ws2812<SpidevBus>;

/// Open and configure `device` for driving a WS2812 strip
pub fn open_spi_strip(device: &Path) -> Result<SpiStrip, LedError> {
    let open_error = |err: std::io::Error| LedError::Open {
        device: device.display().to_string(),
        reason: err.to_string(),
    };

    let mut spi = Spidev::open(device).map_err(open_error)?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_CLOCK_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options).map_err(open_error)?;

    log::info!(
        "[SpiStrip] {} at {} kHz",
        device.display(),
        SPI_CLOCK_HZ / 1_000
    );
    Ok(Ws2812::new(SpidevBus(spi)))
}
