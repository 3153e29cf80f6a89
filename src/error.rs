// One error type for the whole crate so callers only match on a single enum.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Updating the window buffer failed
    CameraInit(String),   // Opening/starting the camera failed
    CameraFrame(String),  // Grabbing/decoding a frame failed
    Detector(String),     // Landmark detector process failed or went away
    ConfigLoad(String),   // Reading/parsing the config file failed

    // Configuration rejected at startup (programmer/config errors, never mid-session)
    CanvasSize { width: usize, height: usize },
    ThicknessBounds { min: u32, max: u32 },
    DefaultThickness { value: u32, min: u32, max: u32 },
    PinchThreshold(f32),
    RegionShape { name: String, reason: String },
    RegionOverlap { first: String, second: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::CameraInit(s) => write!(f, "Camera init error: {s}"),
            Error::CameraFrame(s) => write!(f, "Camera frame error: {s}"),
            Error::Detector(s) => write!(f, "Detector error: {s}"),
            Error::ConfigLoad(s) => write!(f, "Config load error: {s}"),
            Error::CanvasSize { width, height } => {
                write!(f, "Config error: canvas size {width}x{height} must be non-zero")
            }
            Error::ThicknessBounds { min, max } => write!(
                f,
                "Config error: thickness bounds [{min}, {max}] need 1 <= min <= max"
            ),
            Error::DefaultThickness { value, min, max } => write!(
                f,
                "Config error: default thickness {value} outside [{min}, {max}]"
            ),
            Error::PinchThreshold(t) => {
                write!(f, "Config error: pinch threshold {t} must be a positive finite number")
            }
            Error::RegionShape { name, reason } => {
                write!(f, "Config error: control region '{name}': {reason}")
            }
            Error::RegionOverlap { first, second } => write!(
                f,
                "Config error: control regions '{first}' and '{second}' overlap"
            ),
        }
    }
}

impl std::error::Error for Error {}
