mod palette;

use smart_leds::RGB8;

pub use palette::{BLUE, ColorName, GREEN, OFF, RED, WHITE};

pub type Rgb = RGB8;
