#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use photometric_capture::color::OFF;
use photometric_capture::{
    BufferedStrip, Camera, CameraError, ColorName, Duration, ExposureMicros,
    IlluminationController, Pause, Rgb,
};
use smart_leds::SmartLedsWrite;

/// Hardware interaction observed by the mocks, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Strip commit with the indices that ended up lit
    Commit(Vec<usize>),
    Pause(u64),
    Exposure(u32),
    Capture(PathBuf),
    Preview(bool),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn commits(log: &EventLog) -> Vec<Vec<usize>> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Commit(lit) => Some(lit.clone()),
            _ => None,
        })
        .collect()
}

pub struct RecordingStrip {
    log: EventLog,
    commits: usize,
    /// 1-based commit number that fails
    fail_on_commit: Option<usize>,
}

impl RecordingStrip {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
            commits: 0,
            fail_on_commit: None,
        }
    }

    pub fn failing_on(log: &EventLog, commit: usize) -> Self {
        Self {
            fail_on_commit: Some(commit),
            ..Self::new(log)
        }
    }
}

impl SmartLedsWrite for RecordingStrip {
    type Error = &'static str;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.commits += 1;
        if self.fail_on_commit == Some(self.commits) {
            return Err("bus fault");
        }
        let lit = iterator
            .into_iter()
            .map(Into::into)
            .enumerate()
            .filter(|(_, color)| *color != OFF)
            .map(|(index, _)| index)
            .collect();
        self.log.borrow_mut().push(Event::Commit(lit));
        Ok(())
    }
}

pub struct MockCamera {
    log: EventLog,
    captures: usize,
    /// 1-based capture number that fails
    fail_on_capture: Option<usize>,
    fail_exposure: bool,
    write_files: bool,
}

impl MockCamera {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
            captures: 0,
            fail_on_capture: None,
            fail_exposure: false,
            write_files: true,
        }
    }

    pub fn failing_on(log: &EventLog, capture: usize) -> Self {
        Self {
            fail_on_capture: Some(capture),
            ..Self::new(log)
        }
    }

    pub fn failing_exposure(log: &EventLog) -> Self {
        Self {
            fail_exposure: true,
            ..Self::new(log)
        }
    }

    /// Reports success without writing anything
    pub fn without_files(log: &EventLog) -> Self {
        Self {
            write_files: false,
            ..Self::new(log)
        }
    }

    pub fn captures(&self) -> usize {
        self.captures
    }
}

impl Camera for MockCamera {
    fn set_exposure(&mut self, exposure: ExposureMicros) -> Result<(), CameraError> {
        if self.fail_exposure {
            return Err(CameraError::Hardware("shutter rejected".into()));
        }
        self.log.borrow_mut().push(Event::Exposure(exposure.get()));
        Ok(())
    }

    fn capture_file(&mut self, path: &Path) -> Result<(), CameraError> {
        self.captures += 1;
        if self.fail_on_capture == Some(self.captures) {
            return Err(CameraError::Hardware("sensor timeout".into()));
        }
        if self.write_files {
            fs::write(path, b"jpeg").map_err(|source| CameraError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        self.log
            .borrow_mut()
            .push(Event::Capture(path.to_path_buf()));
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        self.log.borrow_mut().push(Event::Preview(true));
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.log.borrow_mut().push(Event::Preview(false));
        Ok(())
    }
}

pub struct RecordingPause {
    log: EventLog,
}

impl RecordingPause {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
        }
    }
}

impl Pause for RecordingPause {
    fn pause(&mut self, duration: Duration) {
        self.log
            .borrow_mut()
            .push(Event::Pause(duration.as_millis()));
    }
}

pub fn lights(strip: RecordingStrip) -> IlluminationController<BufferedStrip<RecordingStrip>> {
    IlluminationController::new(BufferedStrip::new(strip, 100), 100, ColorName::Green)
}

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|date| date.and_hms_opt(14, 30, 5))
        .expect("valid timestamp")
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("readable folder")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
