//! Hand landmarks as the interpreter sees them.
//!
//! The detector is a black box behind [`LandmarkSource`]: given a frame, it
//! yields zero or more named 2-D points. Everything downstream only ever sees a
//! [`LandmarkSnapshot`], so tests drive the interpreter with synthetic ones.

use crate::config::{CanvasConfig, CoordinateSpace, InputMapping};
use crate::error::Result;
use crate::types::{FrameBuffer, Point};

/// Indices into the 21-point MediaPipe hand model.
pub mod mediapipe {
    pub const POINT_COUNT: usize = 21;
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

/// The keypoints we keep from a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Wrist,
    ThumbTip,
    IndexTip,
    MiddleTip,
    RingTip,
    PinkyTip,
}

impl Landmark {
    pub const ALL: [Landmark; 6] = [
        Landmark::Wrist,
        Landmark::ThumbTip,
        Landmark::IndexTip,
        Landmark::MiddleTip,
        Landmark::RingTip,
        Landmark::PinkyTip,
    ];

    pub fn mediapipe_index(self) -> usize {
        match self {
            Landmark::Wrist => mediapipe::WRIST,
            Landmark::ThumbTip => mediapipe::THUMB_TIP,
            Landmark::IndexTip => mediapipe::INDEX_FINGER_TIP,
            Landmark::MiddleTip => mediapipe::MIDDLE_FINGER_TIP,
            Landmark::RingTip => mediapipe::RING_FINGER_TIP,
            Landmark::PinkyTip => mediapipe::PINKY_TIP,
        }
    }
}

/// One frame's worth of detector output. Empty means "no hand".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSnapshot {
    points: Vec<(Landmark, [f32; 2])>,
}

impl LandmarkSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The two points the interpreter needs.
    pub fn from_tips(index_tip: (f32, f32), thumb_tip: (f32, f32)) -> Self {
        Self::empty()
            .with(Landmark::IndexTip, index_tip.0, index_tip.1)
            .with(Landmark::ThumbTip, thumb_tip.0, thumb_tip.1)
    }

    /// Pick the named points out of a full 21-point detection.
    /// Anything shorter is treated as no hand.
    pub fn from_mediapipe(points: &[[f32; 2]]) -> Self {
        if points.len() < mediapipe::POINT_COUNT {
            return Self::empty();
        }
        let points = Landmark::ALL
            .iter()
            .map(|&name| (name, points[name.mediapipe_index()]))
            .collect();
        Self { points }
    }

    /// Add or replace one point.
    pub fn with(mut self, name: Landmark, x: f32, y: f32) -> Self {
        match self.points.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = [x, y],
            None => self.points.push((name, [x, y])),
        }
        self
    }

    pub fn get(&self, name: Landmark) -> Option<[f32; 2]> {
        self.points.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Anything that can turn a camera frame into landmarks.
pub trait LandmarkSource {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<LandmarkSnapshot>;
}

/// Raw detector coordinates -> canvas pixels. Fixed for the whole session.
#[derive(Debug, Clone, Copy)]
pub struct CanvasMapping {
    width: f32,
    height: f32,
    input: InputMapping,
}

impl CanvasMapping {
    pub fn new(config: &CanvasConfig) -> Self {
        Self { width: config.width as f32, height: config.height as f32, input: config.input }
    }

    /// Map without clamping. `None` for non-finite input.
    pub fn map(&self, raw: [f32; 2]) -> Option<Point> {
        let [x, y] = raw;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (x, y) = match self.input.space {
            CoordinateSpace::Pixels => {
                let x = if self.input.mirror_x { (self.width - 1.0) - x } else { x };
                (x, y)
            }
            CoordinateSpace::Normalized => {
                let x = if self.input.mirror_x { 1.0 - x } else { x };
                (x * self.width, y * self.height)
            }
        };
        Some(Point::new(x, y))
    }

    /// Pull a point back onto the canvas.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width - 1.0), p.y.clamp(0.0, self.height - 1.0))
    }
}
