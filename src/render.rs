//! Software compositing of one window frame.
//!
//! The window is two panels side by side, each the size of the canvas:
//! the canvas on its background on the left, and the live camera on the right
//! with the committed ink, the controls, the cursor and a HUD line on top.
//! Both panels share canvas coordinates, so the right panel is just an x offset.

use crate::config::{Background, CanvasConfig, Control, Orientation, Shape};
use crate::draw::{
    blit, draw_crosshair, draw_text_5x7, fill_disc, fill_rect, fill_ring, put_pixel, stroke_rect,
    text_width,
};
use crate::drawing::{Brush, DrawingState};
use crate::gesture::GestureState;
use crate::interpreter::{FrameOutput, Session};
use crate::regions::{contains, wheel_color, ControlLayout, ControlRegion};
use crate::types::{FrameBuffer, Point, Rgb};

const CROSSHAIR: u32 = 0x00_FF_CC_33;
const HOVER_OUTLINE: u32 = 0x00_FF_CC_33;
const SELECTED_OUTLINE: u32 = 0x00_00_FF_FF;
const SLIDER_TRACK: u32 = 0x00_40_40_40;
const LABEL: u32 = 0x00_FF_FF_FF;

/// Pre-rasterized color wheel: `(x, y, color)` for every pixel of the ring.
struct WheelSprite {
    pixels: Vec<(i32, i32, u32)>,
}

impl WheelSprite {
    fn new(cx: f32, cy: f32, inner: f32, outer: f32) -> Self {
        let shape = Shape::Annulus { cx, cy, inner, outer };
        let center = Point::new(cx, cy);
        let (x0, x1) = ((cx - outer).floor() as i32, (cx + outer).ceil() as i32);
        let (y0, y1) = ((cy - outer).floor() as i32, (cy + outer).ceil() as i32);
        let mut pixels = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f32, y as f32);
                if contains(&shape, p) {
                    pixels.push((x, y, wheel_color(center, inner, outer, p).to_u32()));
                }
            }
        }
        Self { pixels }
    }
}

pub struct Renderer {
    width: usize,
    height: usize,
    mirror_live: bool,
    thickness_min: u32,
    thickness_max: u32,
    /// One per color-wheel region, in layout order.
    wheels: Vec<WheelSprite>,
    screen: FrameBuffer,
    canvas_fb: FrameBuffer,
    live_fb: FrameBuffer,
}

impl Renderer {
    pub fn new(config: &CanvasConfig, layout: &ControlLayout, mirror_live: bool) -> Self {
        let wheels = layout
            .regions()
            .iter()
            .filter_map(|r| match (r.control, r.shape) {
                (Control::ColorWheel, Shape::Annulus { cx, cy, inner, outer }) => {
                    Some(WheelSprite::new(cx, cy, inner, outer))
                }
                _ => None,
            })
            .collect();
        let (w, h) = (config.width, config.height);
        Self {
            width: w,
            height: h,
            mirror_live,
            thickness_min: config.thickness_min,
            thickness_max: config.thickness_max,
            wheels,
            screen: FrameBuffer::new(w * 2, h, 0),
            canvas_fb: FrameBuffer::new(w, h, 0),
            live_fb: FrameBuffer::new(w, h, 0),
        }
    }

    /// Window size: two canvas-sized panels side by side.
    pub fn window_size(&self) -> (usize, usize) {
        (self.width * 2, self.height)
    }

    pub fn render(
        &mut self,
        layout: &ControlLayout,
        session: &Session,
        out: &FrameOutput,
        live: &FrameBuffer,
        fps: f32,
    ) -> &FrameBuffer {
        let drawing = session.drawing();
        let canvas = drawing.canvas();
        let ox = self.width as i32;

        // Left: the drawing itself.
        canvas.compose_into(&mut self.canvas_fb, drawing.background);
        blit(&mut self.screen, &self.canvas_fb, 0, 0);

        // Right: live frame, then the ink on top of it.
        self.live_fb.clone_from(live);
        if self.mirror_live {
            mirror_rows(&mut self.live_fb);
        }
        fill_rect(&mut self.screen, ox, 0, ox, self.height as i32, 0);
        blit(&mut self.screen, &self.live_fb, ox, 0);
        // Ink in the current background color is erased ink: let the camera show through.
        let bg = drawing.background.color();
        for (i, cell) in canvas.cells().iter().enumerate() {
            if let Some(c) = cell.filter(|&c| c != bg) {
                let (x, y) = ((i % self.width) as i32, (i / self.width) as i32);
                put_pixel(&mut self.screen, ox + x, y, c.to_u32());
            }
        }

        self.draw_controls(layout, drawing, out, ox);

        if let Some(tip) = out.tip {
            draw_cursor(&mut self.screen, 0, tip, drawing, out.gesture);
            draw_cursor(&mut self.screen, ox, tip, drawing, out.gesture);
            let (x, y) = tip.to_pixel();
            draw_crosshair(&mut self.screen, ox + x, y, 12, CROSSHAIR);
        }

        let hud_y = self.height as i32 - 12;
        draw_text_5x7(&mut self.screen, ox + 8, hud_y, &hud_line(layout, drawing, out.gesture, fps), LABEL);
        let hint_color = drawing.background.color().inverse().to_u32();
        draw_text_5x7(&mut self.screen, 8, hud_y, "C: CLEAR  T: BACKGROUND  ESC: QUIT", hint_color);

        &self.screen
    }

    fn draw_controls(&mut self, layout: &ControlLayout, drawing: &DrawingState, out: &FrameOutput, ox: i32) {
        let mut wheels = self.wheels.iter();
        for region in layout.regions() {
            match (region.control, region.shape) {
                (Control::ColorWheel, Shape::Annulus { .. }) => {
                    if let Some(sprite) = wheels.next() {
                        for &(x, y, c) in &sprite.pixels {
                            put_pixel(&mut self.screen, ox + x, y, c);
                        }
                    }
                }
                (Control::ThicknessSlider { orientation }, Shape::Rect { x, y, width, height }) => {
                    let (rx, ry, rw, rh) = (ox + x as i32, y as i32, width as i32, height as i32);
                    fill_rect(&mut self.screen, rx, ry, rw, rh, SLIDER_TRACK);
                    stroke_rect(&mut self.screen, rx, ry, rw, rh, 1, LABEL);
                    let at = slider_marker(
                        (x, y, width, height),
                        orientation,
                        drawing.thickness,
                        self.thickness_min,
                        self.thickness_max,
                    );
                    let marker = drawing.active_color().to_u32();
                    match orientation {
                        Orientation::Vertical => fill_rect(&mut self.screen, rx, at as i32 - 1, rw, 3, marker),
                        Orientation::Horizontal => fill_rect(&mut self.screen, ox + at as i32 - 1, ry, 3, rh, marker),
                    }
                }
                (control, Shape::Rect { x, y, width, height }) => {
                    let (rx, ry, rw, rh) = (ox + x as i32, y as i32, width as i32, height as i32);
                    let (fill, label) = button_face(control, &region.name, drawing);
                    fill_rect(&mut self.screen, rx, ry, rw, rh, fill.to_u32());
                    stroke_rect(&mut self.screen, rx, ry, rw, rh, 1, fill.inverse().to_u32());
                    if text_width(&label) <= rw - 4 {
                        draw_text_5x7(&mut self.screen, rx + 3, ry + rh - 10, &label, LABEL);
                    }
                }
                // Any other pairing is rejected when the layout is built.
                _ => {}
            }

            if is_selected(region, drawing.brush) {
                outline(&mut self.screen, ox, &region.shape, 2, SELECTED_OUTLINE);
            }
            if out.highlighted == Some(region.id) {
                outline(&mut self.screen, ox, &region.shape, 3, HOVER_OUTLINE);
            }
        }
    }
}

/// Fill color and label of a rectangular button.
fn button_face(control: Control, name: &str, drawing: &DrawingState) -> (Rgb, String) {
    match control {
        Control::Swatch { color } => (color, name.to_uppercase()),
        Control::Eraser => (drawing.background.color(), "ERASER".into()),
        Control::CustomColor => (drawing.custom_color, "CUSTOM".into()),
        Control::BackgroundToggle => (drawing.background.toggled().color(), "BG".into()),
        Control::ColorWheel | Control::ThicknessSlider { .. } => (Rgb::BLACK, name.to_uppercase()),
    }
}

fn is_selected(region: &ControlRegion, brush: Brush) -> bool {
    match (region.control, brush) {
        (Control::Swatch { color }, Brush::Color(c)) => color == c,
        (Control::Eraser, Brush::Eraser) => true,
        (Control::CustomColor, Brush::Custom) => true,
        _ => false,
    }
}

/// Border drawn just outside a region.
fn outline(fb: &mut FrameBuffer, ox: i32, shape: &Shape, border: i32, color: u32) {
    match *shape {
        Shape::Rect { x, y, width, height } => stroke_rect(
            fb,
            ox + x as i32 - border,
            y as i32 - border,
            width as i32 + 2 * border,
            height as i32 + 2 * border,
            border,
            color,
        ),
        Shape::Annulus { cx, cy, outer, .. } => {
            fill_ring(fb, ox + cx.round() as i32, cy.round() as i32, outer + 1.0, outer + border as f32, color)
        }
    }
}

/// Brush preview at the tip. A filled disc while drawing, a ring otherwise.
fn draw_cursor(fb: &mut FrameBuffer, ox: i32, tip: Point, drawing: &DrawingState, gesture: GestureState) {
    let (x, y) = tip.to_pixel();
    let r = (drawing.thickness as f32 / 2.0).max(1.0);
    let color = cursor_color(drawing.active_color(), drawing.background);
    if gesture.is_pinching() {
        fill_disc(fb, ox + x, y, r, color.to_u32());
    }
    fill_ring(fb, ox + x, y, r + 2.0, r + 3.0, color.to_u32());
}

/// A brush that matches the background would be invisible on it; show its inverse.
pub fn cursor_color(active: Rgb, background: Background) -> Rgb {
    if active == background.color() { active.inverse() } else { active }
}

/// Where the marker for thickness `t` sits along the slider (y for vertical,
/// x for horizontal), in canvas pixels.
pub fn slider_marker(
    (x, y, width, height): (f32, f32, f32, f32),
    orientation: Orientation,
    t: u32,
    min: u32,
    max: u32,
) -> f32 {
    let frac = if max > min {
        (t.clamp(min, max) - min) as f32 / (max - min) as f32
    } else {
        1.0
    };
    match orientation {
        Orientation::Vertical => (y + (1.0 - frac) * height).min(y + height - 1.0),
        Orientation::Horizontal => (x + frac * width).min(x + width - 1.0),
    }
}

/// Short name for the active brush.
pub fn brush_label(layout: &ControlLayout, drawing: &DrawingState) -> String {
    match drawing.brush {
        Brush::Eraser => "ERASER".into(),
        Brush::Custom => format!("CUSTOM {}", hex(drawing.custom_color)),
        Brush::Color(c) => layout
            .regions()
            .iter()
            .find(|r| matches!(r.control, Control::Swatch { color } if color == c))
            .map(|r| r.name.to_uppercase())
            .unwrap_or_else(|| hex(c)),
    }
}

pub fn hud_line(layout: &ControlLayout, drawing: &DrawingState, gesture: GestureState, fps: f32) -> String {
    format!(
        "{} | {} | T {} | BG {} | FPS: {:.1}",
        gesture.as_str(),
        brush_label(layout, drawing),
        drawing.thickness,
        drawing.background.as_str().to_uppercase(),
        fps
    )
}

fn hex(c: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

/// Flip every row in place (selfie view).
pub fn mirror_rows(fb: &mut FrameBuffer) {
    if fb.width == 0 {
        return;
    }
    for row in fb.pixels.chunks_mut(fb.width) {
        row.reverse();
    }
}

/// Window position -> canvas position. Both panels map onto the same canvas.
pub fn panel_point(x: f32, y: f32, panel_width: usize) -> (f32, f32) {
    let w = panel_width as f32;
    if x >= w { (x - w, y) } else { (x, y) }
}
