//! Drawing state and the per-frame updater.
//!
//! Pinch frames grow the current stroke and paint straight into the canvas; the
//! frame the pinch ends, the stroke is closed for good. Hover frames only touch
//! brush, thickness and background. Nothing here ever reads the clock or does I/O.

use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::config::{Background, CanvasConfig};
use crate::gesture::{Classification, GestureState};
use crate::regions::Effect;
use crate::types::{Point, Rgb};

/// What the next stroke paints with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Color(Rgb),
    /// Whatever was last picked on the color wheel.
    Custom,
    /// Paints the background color current at the time of drawing.
    Eraser,
}

/// A mark the renderer (and the canvas) should apply this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawInstruction {
    Dot { at: Point, color: Rgb, thickness: u32 },
    Segment { from: Point, to: Point, color: Rgb, thickness: u32 },
}

impl DrawInstruction {
    pub fn apply(&self, canvas: &mut Canvas) {
        match *self {
            DrawInstruction::Dot { at, color, thickness } => canvas.draw_dot(at, color, thickness),
            DrawInstruction::Segment { from, to, color, thickness } => {
                canvas.draw_segment(from, to, color, thickness)
            }
        }
    }
}

/// Points of one continuous pinch.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Rgb,
    pub thickness: u32,
}

/// What one call to [`DrawingState::update`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub instructions: Vec<DrawInstruction>,
    /// The stroke that ended this frame, if one did.
    pub finished: Option<Stroke>,
}

pub struct DrawingState {
    pub brush: Brush,
    pub custom_color: Rgb,
    pub thickness: u32,
    pub background: Background,
    stroke: Option<Stroke>,
    canvas: Canvas,
}

impl DrawingState {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            brush: Brush::Color(config.initial_color),
            custom_color: config.initial_color,
            thickness: config.thickness_default,
            background: config.background,
            stroke: None,
            canvas: Canvas::new(config.width, config.height),
        }
    }

    /// The color a stroke started now would paint.
    pub fn active_color(&self) -> Rgb {
        match self.brush {
            Brush::Color(c) => c,
            Brush::Custom => self.custom_color,
            Brush::Eraser => self.background.color(),
        }
    }

    /// True when drawing now would paint the background color.
    pub fn is_erasing(&self) -> bool {
        self.active_color() == self.background.color()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    pub fn toggle_background(&mut self) {
        self.background = self.background.toggled();
        info!(background = self.background.as_str(), "background toggled");
    }

    pub fn clear_canvas(&mut self) {
        self.canvas.clear();
        info!("canvas cleared");
    }

    /// Advance one frame. `prev` is last frame's gesture, `prev_tip` last frame's
    /// clamped index tip.
    pub fn update(
        &mut self,
        prev: GestureState,
        now: &Classification,
        prev_tip: Option<Point>,
    ) -> Update {
        let mut out = Update::default();

        if let (GestureState::Pinching, Some(tip)) = (now.state, now.tip) {
            let continuing = prev.is_pinching() && self.stroke.is_some();
            let instruction = if continuing {
                let from = prev_tip.or_else(|| self.last_point()).unwrap_or(tip);
                self.extend_stroke(from, tip)
            } else {
                out.finished = self.finish_stroke();
                self.begin_stroke(tip)
            };
            instruction.apply(&mut self.canvas);
            out.instructions.push(instruction);
            return out;
        }

        out.finished = self.finish_stroke();
        if let (GestureState::Hovering(id), Some(hit)) = (now.state, now.hit) {
            let entered = prev != GestureState::Hovering(id);
            self.apply_effect(hit.effect, entered);
        }
        out
    }

    /// Hovering never draws; it only changes what the next stroke looks like.
    /// `entered` is true on the first frame over this region.
    pub fn apply_effect(&mut self, effect: Effect, entered: bool) {
        match effect {
            Effect::Color(c) => self.set_brush(Brush::Color(c)),
            Effect::Eraser => self.set_brush(Brush::Eraser),
            Effect::CustomColor => self.set_brush(Brush::Custom),
            Effect::WheelColor(c) => {
                self.custom_color = c;
                self.set_brush(Brush::Custom);
            }
            Effect::Thickness(t) => {
                if t != self.thickness {
                    debug!(thickness = t, "thickness changed");
                    self.thickness = t;
                }
            }
            // Edge-triggered, otherwise dwelling on the button would flip every frame.
            Effect::ToggleBackground => {
                if entered {
                    self.toggle_background();
                }
            }
        }
    }

    fn set_brush(&mut self, brush: Brush) {
        if self.brush != brush {
            debug!(?brush, "brush changed");
            self.brush = brush;
        }
    }

    fn begin_stroke(&mut self, at: Point) -> DrawInstruction {
        let color = self.active_color();
        let thickness = self.thickness;
        debug!(x = at.x, y = at.y, ?color, thickness, "stroke started");
        self.stroke = Some(Stroke { points: vec![at], color, thickness });
        DrawInstruction::Dot { at, color, thickness }
    }

    fn extend_stroke(&mut self, from: Point, to: Point) -> DrawInstruction {
        let color = self.active_color();
        let thickness = self.thickness;
        if let Some(stroke) = &mut self.stroke {
            stroke.points.push(to);
        }
        DrawInstruction::Segment { from, to, color, thickness }
    }

    fn finish_stroke(&mut self) -> Option<Stroke> {
        let stroke = self.stroke.take()?;
        debug!(points = stroke.points.len(), "stroke finished");
        Some(stroke)
    }

    fn last_point(&self) -> Option<Point> {
        self.stroke.as_ref().and_then(|s| s.points.last().copied())
    }
}
