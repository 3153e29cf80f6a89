//! Control regions: static hover targets laid over the canvas.
//!
//! A [`ControlLayout`] is built once from the config. Building it checks every
//! region's geometry and rejects any pair that overlaps, so [`ControlLayout::resolve`]
//! never has to pick between two candidates.

use crate::config::{CanvasConfig, Control, Orientation, RegionSpec, Shape};
use crate::error::{Error, Result};
use crate::types::{Point, Rgb};

/// Registration index of a region in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// What a hover resolved to at one particular point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Color(Rgb),
    Eraser,
    CustomColor,
    WheelColor(Rgb),
    Thickness(u32),
    ToggleBackground,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: RegionId,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlRegion {
    pub id: RegionId,
    pub name: String,
    pub shape: Shape,
    pub control: Control,
}

#[derive(Debug, Clone)]
pub struct ControlLayout {
    regions: Vec<ControlRegion>,
    thickness_min: u32,
    thickness_max: u32,
}

impl ControlLayout {
    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        let mut layout = Self::new(&config.regions, config.width, config.height)?;
        layout.thickness_min = config.thickness_min;
        layout.thickness_max = config.thickness_max;
        Ok(layout)
    }

    /// Validate geometry and build the layout. Thickness bounds default to 1..=20
    /// until [`from_config`](Self::from_config) sets the configured ones.
    pub fn new(specs: &[RegionSpec], width: usize, height: usize) -> Result<Self> {
        for spec in specs {
            check_shape(spec, width as f32, height as f32)?;
        }
        for (i, a) in specs.iter().enumerate() {
            for b in &specs[i + 1..] {
                if shapes_overlap(&a.shape, &b.shape) {
                    return Err(Error::RegionOverlap { first: a.name.clone(), second: b.name.clone() });
                }
            }
        }

        let regions = specs
            .iter()
            .enumerate()
            .map(|(i, s)| ControlRegion {
                id: RegionId(i),
                name: s.name.clone(),
                shape: s.shape,
                control: s.control,
            })
            .collect();
        Ok(Self { regions, thickness_min: 1, thickness_max: 20 })
    }

    pub fn regions(&self) -> &[ControlRegion] {
        &self.regions
    }

    pub fn get(&self, id: RegionId) -> Option<&ControlRegion> {
        self.regions.get(id.0)
    }

    /// Which region (if any) contains `p`, and what hovering it there means.
    pub fn resolve(&self, p: Point) -> Option<Hit> {
        let region = self.regions.iter().find(|r| contains(&r.shape, p))?;
        let effect = match (region.control, region.shape) {
            (Control::Swatch { color }, _) => Effect::Color(color),
            (Control::Eraser, _) => Effect::Eraser,
            (Control::CustomColor, _) => Effect::CustomColor,
            (Control::BackgroundToggle, _) => Effect::ToggleBackground,
            (Control::ColorWheel, Shape::Annulus { cx, cy, inner, outer }) => {
                Effect::WheelColor(wheel_color(Point::new(cx, cy), inner, outer, p))
            }
            (Control::ThicknessSlider { orientation }, Shape::Rect { x, y, width, height }) => {
                Effect::Thickness(slider_thickness(
                    (x, y, width, height),
                    orientation,
                    p,
                    self.thickness_min,
                    self.thickness_max,
                ))
            }
            // Rejected by check_shape.
            (Control::ColorWheel, _) | (Control::ThicknessSlider { .. }, _) => return None,
        };
        Some(Hit { id: region.id, effect })
    }
}

pub fn contains(shape: &Shape, p: Point) -> bool {
    match *shape {
        Shape::Rect { x, y, width, height } => {
            p.x >= x && p.x < x + width && p.y >= y && p.y < y + height
        }
        Shape::Annulus { cx, cy, inner, outer } => {
            let d = p.distance(Point::new(cx, cy));
            d >= inner && d <= outer
        }
    }
}

fn check_shape(spec: &RegionSpec, width: f32, height: f32) -> Result<()> {
    let bad = |reason: &str| Err(Error::RegionShape { name: spec.name.clone(), reason: reason.into() });

    let (x0, y0, x1, y1) = match spec.shape {
        Shape::Rect { x, y, width: w, height: h } => {
            if ![x, y, w, h].iter().all(|v| v.is_finite()) {
                return bad("coordinates must be finite");
            }
            if w <= 0.0 || h <= 0.0 {
                return bad("rectangle must have positive width and height");
            }
            (x, y, x + w, y + h)
        }
        Shape::Annulus { cx, cy, inner, outer } => {
            if ![cx, cy, inner, outer].iter().all(|v| v.is_finite()) {
                return bad("coordinates must be finite");
            }
            if inner < 0.0 || outer <= inner {
                return bad("annulus needs 0 <= inner < outer");
            }
            (cx - outer, cy - outer, cx + outer, cy + outer)
        }
    };
    if x0 < 0.0 || y0 < 0.0 || x1 > width || y1 > height {
        return bad("extends outside the canvas");
    }

    match (spec.control, spec.shape) {
        (Control::ColorWheel, Shape::Rect { .. }) => bad("a color wheel must be an annulus"),
        (Control::ThicknessSlider { .. }, Shape::Annulus { .. }) => {
            bad("a thickness slider must be a rectangle")
        }
        _ => Ok(()),
    }
}

fn shapes_overlap(a: &Shape, b: &Shape) -> bool {
    match (*a, *b) {
        (
            Shape::Rect { x: ax, y: ay, width: aw, height: ah },
            Shape::Rect { x: bx, y: by, width: bw, height: bh },
        ) => ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah,

        (Shape::Rect { x, y, width, height }, Shape::Annulus { cx, cy, inner, outer })
        | (Shape::Annulus { cx, cy, inner, outer }, Shape::Rect { x, y, width, height }) => {
            let center = Point::new(cx, cy);
            let nearest = Point::new(cx.clamp(x, x + width), cy.clamp(y, y + height));
            let farthest = [(x, y), (x + width, y), (x, y + height), (x + width, y + height)]
                .iter()
                .map(|&(px, py)| center.distance(Point::new(px, py)))
                .fold(0.0_f32, f32::max);
            // Touches the ring unless it stays outside the outer circle or inside the hole.
            center.distance(nearest) < outer && farthest > inner
        }

        (
            Shape::Annulus { cx: ax, cy: ay, inner: ai, outer: ao },
            Shape::Annulus { cx: bx, cy: by, inner: bi, outer: bo },
        ) => {
            let d = Point::new(ax, ay).distance(Point::new(bx, by));
            let discs_meet = d < ao + bo;
            let b_in_a_hole = d + bo <= ai;
            let a_in_b_hole = d + ao <= bi;
            discs_meet && !b_in_a_hole && !a_in_b_hole
        }
    }
}

/// Color under `p` on a wheel: angle is hue, distance from the inner edge is
/// saturation (floored at 0.1 so the inner edge is never pure white), value is 1.
pub fn wheel_color(center: Point, inner: f32, outer: f32, p: Point) -> Rgb {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let mut angle = dy.atan2(dx).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    let d = (dx * dx + dy * dy).sqrt();
    let saturation = ((d - inner) / (outer - inner)).clamp(0.1, 1.0);
    hsv_to_rgb(angle, saturation, 1.0)
}

/// `h` in degrees, `s` and `v` in `[0, 1]`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match (hp as u32).min(5) {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_u8 = |ch: f32| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_u8(r1), to_u8(g1), to_u8(b1))
}

fn slider_thickness(
    (x, y, width, height): (f32, f32, f32, f32),
    orientation: Orientation,
    p: Point,
    min: u32,
    max: u32,
) -> u32 {
    let t = match orientation {
        Orientation::Vertical => 1.0 - (p.y - y) / height,
        Orientation::Horizontal => (p.x - x) / width,
    }
    .clamp(0.0, 1.0);
    let value = (min as f32 + t * (max - min) as f32).round() as u32;
    value.clamp(min, max)
}
