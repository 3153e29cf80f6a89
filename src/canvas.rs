// The committed drawing: an ink layer over a background.
// Cells hold the color that was painted there, or nothing. The background
// only shows through blank cells, so switching it never repaints old strokes.

use crate::config::Background;
use crate::draw::walk_line;
use crate::types::{FrameBuffer, Point, Rgb};

pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Option<Rgb>>, // length = width * height, row-major
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![None; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Option<Rgb>] {
        &self.cells
    }

    /// Ink at (x,y); `None` for blank cells and anything off the canvas.
    pub fn ink(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// What (x,y) looks like on the given background.
    pub fn pixel(&self, x: i32, y: i32, background: Background) -> Rgb {
        self.ink(x, y).unwrap_or(background.color())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Number of inked cells.
    pub fn inked(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn clear(&mut self) {
        for c in &mut self.cells {
            *c = None;
        }
    }

    /// Single round mark, e.g. where a stroke starts.
    pub fn draw_dot(&mut self, p: Point, color: Rgb, thickness: u32) {
        let (x, y) = p.to_pixel();
        self.stamp_disc(x, y, thickness, color);
    }

    /// Thick line with round caps: Bresenham walk stamping a disc at every step,
    /// so consecutive segments join without gaps.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: Rgb, thickness: u32) {
        let (x0, y0) = from.to_pixel();
        let (x1, y1) = to.to_pixel();
        walk_line(x0, y0, x1, y1, |x, y| self.stamp_disc(x, y, thickness, color));
    }

    /// Fill a disc whose diameter is `thickness` (odd diameters are exact).
    fn stamp_disc(&mut self, cx: i32, cy: i32, thickness: u32, color: Rgb) {
        let r = thickness.max(1) as f32 / 2.0;
        let r2 = r * r;
        let ri = r as i32;
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if (dx * dx + dy * dy) as f32 > r2 { continue; }
                if let Some(i) = self.index(cx + dx, cy + dy) {
                    self.cells[i] = Some(color);
                }
            }
        }
    }

    /// Render every cell onto the background.
    pub fn compose(&self, background: Background) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.width, self.height, 0);
        self.compose_into(&mut fb, background);
        fb
    }

    /// Same as [`compose`](Self::compose) but reuses `fb`, resizing it if needed.
    pub fn compose_into(&self, fb: &mut FrameBuffer, background: Background) {
        let bg = background.color();
        fb.width = self.width;
        fb.height = self.height;
        fb.pixels.clear();
        fb.pixels.extend(self.cells.iter().map(|c| c.unwrap_or(bg).to_u32()));
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn new_canvas_is_blank() {
        let c = Canvas::new(10, 10);
        assert!(c.is_blank());
        assert_eq!(c.pixel(3, 3, Background::White), Rgb::WHITE);
        assert_eq!(c.pixel(3, 3, Background::Black), Rgb::BLACK);
    }

    #[test]
    fn thickness_one_is_a_single_pixel_wide() {
        let mut c = Canvas::new(20, 20);
        c.draw_segment(Point::new(2.0, 5.0), Point::new(12.0, 5.0), RED, 1);
        assert_eq!(c.inked(), 11);
        assert_eq!(c.ink(7, 5), Some(RED));
        assert_eq!(c.ink(7, 4), None);
    }

    #[test]
    fn horizontal_line_has_requested_width() {
        let mut c = Canvas::new(200, 200);
        c.draw_segment(Point::new(100.0, 100.0), Point::new(120.0, 100.0), RED, 5);
        for x in 100..=120 {
            for y in 98..=102 {
                assert_eq!(c.ink(x, y), Some(RED), "({x},{y})");
            }
            assert_eq!(c.ink(x, 97), None);
            assert_eq!(c.ink(x, 103), None);
        }
        // Round caps reach past the endpoints along the line.
        assert_eq!(c.ink(98, 100), Some(RED));
        assert_eq!(c.ink(97, 100), None);
        assert_eq!(c.ink(123, 100), None);
    }

    #[test]
    fn diagonal_segment_has_no_gaps() {
        let mut c = Canvas::new(50, 50);
        c.draw_segment(Point::new(0.0, 0.0), Point::new(30.0, 20.0), RED, 1);
        // Every column between the endpoints is touched.
        for x in 0..=30 {
            assert!((0..50).any(|y| c.ink(x, y).is_some()), "column {x} empty");
        }
    }

    #[test]
    fn drawing_clips_at_the_edges() {
        let mut c = Canvas::new(10, 10);
        c.draw_dot(Point::new(0.0, 0.0), RED, 9);
        c.draw_segment(Point::new(-20.0, 5.0), Point::new(30.0, 5.0), RED, 3);
        assert_eq!(c.ink(0, 0), Some(RED));
        assert_eq!(c.ink(9, 5), Some(RED));
        assert_eq!(c.ink(-1, 5), None);
    }

    #[test]
    fn ink_survives_background_change() {
        let mut c = Canvas::new(10, 10);
        c.draw_dot(Point::new(5.0, 5.0), Rgb::WHITE, 1);
        assert_eq!(c.pixel(5, 5, Background::Black), Rgb::WHITE);
        assert_eq!(c.pixel(0, 0, Background::Black), Rgb::BLACK);
    }

    #[test]
    fn clear_blanks_everything() {
        let mut c = Canvas::new(10, 10);
        c.draw_dot(Point::new(5.0, 5.0), RED, 5);
        assert!(!c.is_blank());
        c.clear();
        assert!(c.is_blank());
    }

    #[test]
    fn compose_paints_background_and_ink() {
        let mut c = Canvas::new(4, 1);
        c.draw_dot(Point::new(1.0, 0.0), RED, 1);
        let fb = c.compose(Background::Black);
        assert_eq!(fb.pixels, vec![0, RED.to_u32(), 0, 0]);
    }

    #[test]
    fn compose_into_resizes_a_reused_buffer() {
        let c = Canvas::new(3, 2);
        let mut fb = FrameBuffer::new(1, 1, 0x123456);
        c.compose_into(&mut fb, Background::White);
        assert_eq!((fb.width, fb.height), (3, 2));
        assert!(fb.pixels.iter().all(|&p| p == 0x00_FF_FF_FF));
    }
}
