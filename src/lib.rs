//! Draw in the air with a webcam.
//!
//! A hand-landmark detector reports the index fingertip and thumb tip every
//! frame. Pinching them together paints on the canvas; hovering the open hand
//! over a control picks a color, the eraser, a thickness or the background.
//!
//! The core ([`interpreter`] and everything under it) is pure and synchronous:
//! feed it [`LandmarkSnapshot`]s, read back draw instructions and the canvas.
//! [`camera`], [`detector`], [`draw`] and [`render`] are the plumbing the
//! `air-canvas` binary wires around it.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod draw;
pub mod drawing;
pub mod error;
pub mod gesture;
pub mod interpreter;
pub mod landmarks;
pub mod regions;
pub mod render;
pub mod types;

pub use config::CanvasConfig;
pub use error::{Error, Result};
pub use gesture::GestureState;
pub use interpreter::{FrameOutput, Interpreter, Session};
pub use landmarks::{Landmark, LandmarkSnapshot, LandmarkSource};
pub use types::{FrameBuffer, Point, Rgb};
