pub mod camera;
pub mod color;
pub mod command;
pub mod driver;
pub mod grid;
pub mod illumination;
pub mod rig;
pub mod sequencer;
pub mod session;
#[cfg(target_os = "linux")]
pub mod spi;

pub use camera::{Camera, CameraError, CommandCamera, ExposureMicros, SimulatedCamera};
pub use color::{ColorName, Rgb};
pub use command::{Command, ParseError};
pub use driver::{BufferedStrip, LedDriver, LedError, LogStrip};
pub use grid::{
    ActiveLedCount, CaptureFrame, GRID_CELLS, GRID_SIZE, GridCoord, SubGridPlan,
    compute_sub_grid_plan,
};
pub use illumination::{FOCUS_LED, IlluminationController, IlluminationState, Lit};
pub use rig::{Response, Rig, RigError};
pub use sequencer::{
    COOLDOWN, CaptureError, CaptureRun, CaptureSequencer, CaptureState, FrameError, Pause,
    SETTLE_TIME, ThreadPause,
};
pub use session::{CaptureSnapshot, ConfigError, SessionConfig};

pub use embassy_time::Duration;
