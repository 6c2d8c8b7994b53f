//! Fixed illumination palette
//!
//! The rig only ever lights LEDs in one of a handful of primary colors, so
//! colors are addressed by name rather than by arbitrary RGB values.

use super::Rgb;

const COLOR_NAME_WHITE: &str = "white";
const COLOR_NAME_RED: &str = "red";
const COLOR_NAME_GREEN: &str = "green";
const COLOR_NAME_BLUE: &str = "blue";
const COLOR_NAME_OFF: &str = "off";

pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Known illumination colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorName {
    White,
    Red,
    #[default]
    Green,
    Blue,
    Off,
}

impl ColorName {
    /// Colors an operator is allowed to select for capture
    pub const SELECTABLE: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::White];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => COLOR_NAME_WHITE,
            Self::Red => COLOR_NAME_RED,
            Self::Green => COLOR_NAME_GREEN,
            Self::Blue => COLOR_NAME_BLUE,
            Self::Off => COLOR_NAME_OFF,
        }
    }

    /// Parse any palette name, ignoring case
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            COLOR_NAME_WHITE => Some(Self::White),
            COLOR_NAME_RED => Some(Self::Red),
            COLOR_NAME_GREEN => Some(Self::Green),
            COLOR_NAME_BLUE => Some(Self::Blue),
            COLOR_NAME_OFF => Some(Self::Off),
            _ => None,
        }
    }

    /// Parse a color an operator may pick; `off` is not one of them
    pub fn parse_selectable(s: &str) -> Option<Self> {
        Self::parse_from_str(s).filter(|color| *color != Self::Off)
    }

    pub const fn to_rgb(self) -> Rgb {
        match self {
            Self::White => WHITE,
            Self::Red => RED,
            Self::Green => GREEN,
            Self::Blue => BLUE,
            Self::Off => OFF,
        }
    }
}

impl core::fmt::Display for ColorName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
