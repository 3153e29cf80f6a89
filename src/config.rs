//! Static session configuration.
//!
//! Everything here is fixed when the [`Interpreter`](crate::interpreter::Interpreter)
//! is built and never changes mid-session. [`CanvasConfig::validate`] rejects
//! bad values up front so the frame loop never has to.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::regions::ControlLayout;
use crate::types::Rgb;

/// Canvas background. Only blank canvas cells are painted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    White,
    Black,
}

impl Background {
    pub fn color(self) -> Rgb {
        match self {
            Background::White => Rgb::WHITE,
            Background::Black => Rgb::BLACK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Background::White => Background::Black,
            Background::Black => Background::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Background::White => "white",
            Background::Black => "black",
        }
    }
}

/// Coordinate space the detector reports landmarks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Canvas pixels.
    Pixels,
    /// `[0,1] x [0,1]`, scaled by the canvas size.
    Normalized,
}

/// How raw landmark coordinates become canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputMapping {
    pub space: CoordinateSpace,
    /// Flip horizontally so the canvas behaves like a mirror.
    pub mirror_x: bool,
}

impl Default for InputMapping {
    fn default() -> Self {
        // MediaPipe-style detectors report normalized coordinates of the raw camera image.
        Self { space: CoordinateSpace::Normalized, mirror_x: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Top = thickest, bottom = thinnest.
    #[default]
    Vertical,
    /// Left = thinnest, right = thickest.
    Horizontal,
}

/// Geometry of a control region, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Half-open: contains `x <= px < x + width`, `y <= py < y + height`.
    Rect { x: f32, y: f32, width: f32, height: f32 },
    /// Ring around `(cx, cy)`; contains points with `inner <= d <= outer`.
    Annulus { cx: f32, cy: f32, inner: f32, outer: f32 },
}

/// What hovering a region does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Swatch { color: Rgb },
    Eraser,
    CustomColor,
    ColorWheel,
    ThicknessSlider {
        #[serde(default)]
        orientation: Orientation,
    },
    BackgroundToggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub shape: Shape,
    pub control: Control,
}

impl RegionSpec {
    pub fn rect(name: &str, x: f32, y: f32, width: f32, height: f32, control: Control) -> Self {
        Self { name: name.to_string(), shape: Shape::Rect { x, y, width, height }, control }
    }

    pub fn annulus(name: &str, cx: f32, cy: f32, inner: f32, outer: f32, control: Control) -> Self {
        Self { name: name.to_string(), shape: Shape::Annulus { cx, cy, inner, outer }, control }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    pub input: InputMapping,
    /// Pinch threshold as a fraction of the canvas width, so one value works
    /// across camera resolutions.
    pub pinch_ratio: f32,
    pub thickness_min: u32,
    pub thickness_max: u32,
    pub thickness_default: u32,
    pub background: Background,
    /// Brush color before anything is picked.
    pub initial_color: Rgb,
    pub regions: Vec<RegionSpec>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let swatch = |color| Control::Swatch { color };
        Self {
            width: 640,
            height: 480,
            input: InputMapping::default(),
            pinch_ratio: 0.015,
            thickness_min: 1,
            thickness_max: 20,
            thickness_default: 5,
            background: Background::White,
            initial_color: Rgb::BLACK,
            regions: vec![
                RegionSpec::rect("red", 10.0, 10.0, 70.0, 70.0, swatch(Rgb::new(255, 0, 0))),
                RegionSpec::rect("green", 90.0, 10.0, 70.0, 70.0, swatch(Rgb::new(0, 255, 0))),
                RegionSpec::rect("blue", 170.0, 10.0, 70.0, 70.0, swatch(Rgb::new(0, 0, 255))),
                RegionSpec::rect("yellow", 250.0, 10.0, 70.0, 70.0, swatch(Rgb::new(255, 255, 0))),
                RegionSpec::rect("eraser", 330.0, 10.0, 70.0, 70.0, Control::Eraser),
                RegionSpec::rect("custom", 410.0, 10.0, 70.0, 70.0, Control::CustomColor),
                RegionSpec::rect("background", 490.0, 10.0, 70.0, 70.0, Control::BackgroundToggle),
                RegionSpec::annulus("wheel", 510.0, 180.0, 26.0, 80.0, Control::ColorWheel),
                RegionSpec::rect(
                    "thickness",
                    600.0,
                    100.0,
                    20.0,
                    160.0,
                    Control::ThicknessSlider { orientation: Orientation::Vertical },
                ),
            ],
        }
    }
}

impl CanvasConfig {
    /// Read a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("{}: {e}", path.display())))?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), regions = config.regions.len(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ConfigLoad(format!("parse: {e}")))
    }

    pub fn pinch_threshold_px(&self) -> f32 {
        self.pinch_ratio * self.width as f32
    }

    /// Fail fast on anything the interpreter cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::CanvasSize { width: self.width, height: self.height });
        }
        if self.thickness_min == 0 || self.thickness_min > self.thickness_max {
            return Err(Error::ThicknessBounds { min: self.thickness_min, max: self.thickness_max });
        }
        if !(self.thickness_min..=self.thickness_max).contains(&self.thickness_default) {
            return Err(Error::DefaultThickness {
                value: self.thickness_default,
                min: self.thickness_min,
                max: self.thickness_max,
            });
        }
        let threshold = self.pinch_threshold_px();
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::PinchThreshold(self.pinch_ratio));
        }
        ControlLayout::new(&self.regions, self.width, self.height)?;
        Ok(())
    }
}
