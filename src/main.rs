//! Interactive driver for the photometric capture rig
//!
//! Reads operator commands line by line and applies them to the rig. All
//! hardware access happens on the main thread; the stdin reader and the
//! interrupt handler only forward events to it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use photometric_capture::command::HELP;
use photometric_capture::{
    BufferedStrip, Camera, Command, CommandCamera, LedDriver, LogStrip, ParseError, Pause,
    Response, Rig, SessionConfig, SimulatedCamera, ThreadPause,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CameraKind {
    /// Raspberry Pi camera through rpicam-apps
    Rpicam,
    /// Write placeholder files, no camera attached
    Simulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StripKind {
    /// Log commits, no strip attached
    Log,
    /// WS2812 strip on the SPI bus (Linux only)
    Ws2812,
}

#[derive(Debug, Parser)]
#[command(name = "capture-rig", about = "Photometric capture with an 8x8 LED grid")]
struct Args {
    /// Directory capture folders are created in
    #[arg(long, default_value = "camera_capture")]
    base_path: PathBuf,
    /// Initial LED brightness (0-255)
    #[arg(long, default_value_t = 100)]
    brightness: i64,
    /// Initial number of LEDs per capture (perfect square up to 64)
    #[arg(long, default_value_t = 4)]
    leds: i64,
    /// Initial exposure in microseconds
    #[arg(long, default_value_t = 10_000)]
    exposure: i64,
    /// Initial illumination color
    #[arg(long, default_value = "green")]
    color: String,
    #[arg(long, value_enum, default_value_t = CameraKind::Rpicam)]
    camera: CameraKind,
    #[arg(long, value_enum, default_value_t = StripKind::Log)]
    strip: StripKind,
    /// spidev node the WS2812 data line is wired to
    #[arg(long, default_value = "/dev/spidev0.0")]
    spi_device: PathBuf,
    #[arg(long, default_value = "rpicam-still")]
    still_program: String,
    #[arg(long, default_value = "rpicam-hello")]
    preview_program: String,
}

enum LoopEvent {
    Line(String),
    Eof,
    Interrupt,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = initial_config(&args)?;
    let brightness = config.brightness();

    match args.strip {
        StripKind::Log => {
            let strip = BufferedStrip::new(LogStrip::new(), brightness);
            with_camera(&args, config, strip)
        }
        StripKind::Ws2812 => with_ws2812(&args, config, brightness),
    }
}

#[cfg(target_os = "linux")]
fn with_ws2812(args: &Args, config: SessionConfig, brightness: u8) -> Result<()> {
    let strip = photometric_capture::spi::open_spi_strip(&args.spi_device)?;
    with_camera(args, config, BufferedStrip::new(strip, brightness))
}

#[cfg(not(target_os = "linux"))]
fn with_ws2812(_args: &Args, _config: SessionConfig, _brightness: u8) -> Result<()> {
    anyhow::bail!("--strip ws2812 needs a Linux spidev device")
}

fn with_camera<D: LedDriver>(args: &Args, config: SessionConfig, driver: D) -> Result<()> {
    match args.camera {
        CameraKind::Rpicam => {
            let camera = CommandCamera::new(&args.still_program, &args.preview_program);
            run_session(args, config, driver, camera)
        }
        CameraKind::Simulated => run_session(args, config, driver, SimulatedCamera::new()),
    }
}

fn initial_config(args: &Args) -> Result<SessionConfig> {
    let mut config = SessionConfig::default();
    config
        .set_brightness(args.brightness)
        .context("invalid --brightness")?;
    config.set_active_leds(args.leds).context("invalid --leds")?;
    config
        .set_exposure(args.exposure)
        .context("invalid --exposure")?;
    config.set_color(&args.color).context("invalid --color")?;
    Ok(config)
}

fn run_session<D: LedDriver, C: Camera>(
    args: &Args,
    config: SessionConfig,
    driver: D,
    camera: C,
) -> Result<()> {
    let mut rig = Rig::new(driver, camera, config, &args.base_path, ThreadPause);
    let events = spawn_event_sources()?;
    let mut out = io::stdout().lock();
    drive(&mut rig, &events, &mut out)
}

/// Start the rig, serve commands until exit, then always shut down
fn drive<D, C, P>(
    rig: &mut Rig<D, C, P>,
    events: &Receiver<LoopEvent>,
    out: &mut impl Write,
) -> Result<()>
where
    D: LedDriver,
    C: Camera,
    P: Pause,
{
    let result = rig
        .startup()
        .map_err(anyhow::Error::from)
        .and_then(|()| command_loop(rig, events, out));

    rig.shutdown();
    writeln!(out, "Done.")?;
    result
}

fn command_loop<D, C, P>(
    rig: &mut Rig<D, C, P>,
    events: &Receiver<LoopEvent>,
    out: &mut impl Write,
) -> Result<()>
where
    D: LedDriver,
    C: Camera,
    P: Pause,
{
    writeln!(out, "Live preview active.")?;
    writeln!(out, "{HELP}")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match events.recv() {
            Ok(LoopEvent::Line(line)) => line,
            Ok(LoopEvent::Interrupt) => {
                log::info!("Interrupted");
                writeln!(out)?;
                return Ok(());
            }
            Ok(LoopEvent::Eof) | Err(_) => {
                writeln!(out)?;
                return Ok(());
            }
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let now = Local::now().naive_local();
        if command == Command::Capture {
            writeln!(out, "Saving images to: {}", rig.capture_folder(now).display())?;
        }
        match rig.execute(command, now) {
            Ok(Response::Exit) => return Ok(()),
            Ok(response) => writeln!(out, "{response}")?,
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

/// Forward stdin lines and Ctrl-C to the main thread
fn spawn_event_sources() -> Result<Receiver<LoopEvent>> {
    let (tx, rx) = mpsc::channel();

    let interrupt_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(LoopEvent::Interrupt);
    })
    .context("failed to install interrupt handler")?;

    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(LoopEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        log::warn!("Failed to read stdin: {err}");
                        break;
                    }
                }
            }
            let _ = tx.send(LoopEvent::Eof);
        })
        .context("failed to spawn stdin reader")?;

    Ok(rx)
}
