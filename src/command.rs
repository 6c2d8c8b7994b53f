//! Operator commands
//!
//! Turns one line of text into a [`Command`]. Range checks are left to the
//! session configuration; the parser only checks shape and number syntax.

use core::num::IntErrorKind;

use heapless::Vec;
use thiserror::Error;

/// Most tokens any command takes, keyword included
const MAX_TOKENS: usize = 2;

/// Commands the operator can issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set brightness (0-255) and refresh the focus LED
    Brightness(i64),
    /// Set the number of LEDs used by the next capture
    Leds(i64),
    /// Set exposure in microseconds and push it to the camera
    Exposure(i64),
    /// Set illumination color and refresh the focus LED
    Color(String),
    /// Set the destination folder name
    Folder(String),
    /// Run a capture sequence
    Capture,
    /// Print the current configuration
    Status,
    /// Print the command list
    Help,
    /// Leave the command loop
    Exit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("")]
    Empty,
    #[error("{0}")]
    Usage(&'static str),
    #[error("Unknown command.")]
    Unknown,
}

const USAGE_BRIGHTNESS: &str = "Usage: brightness <value>";
const USAGE_LEDS: &str = "Usage: leds <value>";
const USAGE_EXPOSURE: &str = "Usage: exposure <μs>";
const USAGE_COLOR: &str = "Usage: color <name>";
const USAGE_FOLDER: &str = "Usage: folder <folder_name>";

/// Command list printed at startup and by `help`
pub const HELP: &str = "\
Commands:
  brightness <0–255>
  leds <1, 4, 9, ...>
  exposure <μs>
  color <red|green|blue|white>
  folder <folder_name>
  capture
  status
  help
  exit | quit";

impl Command {
    /// Parse one line of operator input
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        if keyword.is_empty() {
            return Err(ParseError::Empty);
        }

        match keyword.to_ascii_lowercase().as_str() {
            "brightness" => parse_number(line, USAGE_BRIGHTNESS).map(Self::Brightness),
            "leds" => parse_number(line, USAGE_LEDS).map(Self::Leds),
            "exposure" => parse_number(line, USAGE_EXPOSURE).map(Self::Exposure),
            "color" => single_argument(line, USAGE_COLOR)
                .map(|name| Self::Color(name.to_ascii_lowercase())),
            // Folder names may contain spaces and keep their case
            "folder" if !rest.is_empty() => Ok(Self::Folder(rest.to_owned())),
            "folder" => Err(ParseError::Usage(USAGE_FOLDER)),
            "capture" => no_arguments(rest, Self::Capture),
            "status" => no_arguments(rest, Self::Status),
            "help" => no_arguments(rest, Self::Help),
            "exit" | "quit" => no_arguments(rest, Self::Exit),
            _ => Err(ParseError::Unknown),
        }
    }
}

fn single_argument<'a>(line: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    let mut tokens: Vec<&str, MAX_TOKENS> = Vec::new();
    for token in line.split_whitespace() {
        tokens.push(token).map_err(|_| ParseError::Usage(usage))?;
    }
    match tokens.as_slice() {
        [_, argument] => Ok(*argument),
        _ => Err(ParseError::Usage(usage)),
    }
}

/// Out-of-range integers saturate so the range check reports them
fn parse_number(line: &str, usage: &'static str) -> Result<i64, ParseError> {
    match single_argument(line, usage)?.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ParseError::Usage(usage)),
        },
    }
}

fn no_arguments(rest: &str, command: Command) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::Unknown)
    }
}
