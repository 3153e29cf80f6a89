// Window + software drawing utilities.
// The window shows one composed frame per loop iteration; everything on it
// (controls, cursor, HUD) is painted into a FrameBuffer with the helpers below.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false once the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window pixels; `None` while the pointer is outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Clear canvas.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// Toggle background.
    pub fn t_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::T, KeyRepeat::No)
    }
}

/* ---------- Software drawing: pixels, shapes, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Bresenham walk from (x0,y0) to (x1,y1), calling `plot` on every step,
/// both endpoints included.
pub fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Thin 1-pixel line between (x0,y0) and (x1,y1).
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    walk_line(x0, y0, x1, y1, |x, y| put_pixel(fb, x, y, color));
}

pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for py in y..y + h {
        for px in x..x + w {
            put_pixel(fb, px, py, color);
        }
    }
}

/// Outline of a `w` x `h` box, `border` pixels thick, drawn inward.
pub fn stroke_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, border: i32, color: u32) {
    for i in 0..border.min(w / 2 + 1).min(h / 2 + 1) {
        let (x0, y0, x1, y1) = (x + i, y + i, x + w - 1 - i, y + h - 1 - i);
        draw_line(fb, x0, y0, x1, y0, color);
        draw_line(fb, x0, y1, x1, y1, color);
        draw_line(fb, x0, y0, x0, y1, color);
        draw_line(fb, x1, y0, x1, y1, color);
    }
}

pub fn fill_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: f32, color: u32) {
    fill_ring(fb, cx, cy, 0.0, radius, color);
}

/// Every pixel whose distance from (cx,cy) lies in `[inner, outer]`.
pub fn fill_ring(fb: &mut FrameBuffer, cx: i32, cy: i32, inner: f32, outer: f32, color: u32) {
    let ro = outer.ceil() as i32;
    let (i2, o2) = (inner * inner, outer * outer);
    for dy in -ro..=ro {
        for dx in -ro..=ro {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 >= i2 && d2 <= o2 {
                put_pixel(fb, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Copy `src` onto `dst` with its top-left corner at (x,y), clipped.
pub fn blit(dst: &mut FrameBuffer, src: &FrameBuffer, x: i32, y: i32) {
    for sy in 0..src.height {
        let dy = y + sy as i32;
        if dy < 0 || dy as usize >= dst.height {
            continue;
        }
        let row = &src.pixels[sy * src.width..(sy + 1) * src.width];
        for (sx, &px) in row.iter().enumerate() {
            put_pixel(dst, x + sx as i32, dy, px);
        }
    }
}

/// Small crosshair centered at (cx,cy), with a gap around the center.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (digits, A-Z, a few symbols) ---------- */

/// 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters reuse the uppercase shapes.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),

        _ => None,
    }
}

/// One 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Pixel width of `text` as drawn by [`draw_text_5x7`].
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * 6
}

/// Each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0x00_FF_00_00;

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(4, 4, 0);
        put_pixel(&mut fb, -1, 0, RED);
        put_pixel(&mut fb, 4, 0, RED);
        put_pixel(&mut fb, 0, 4, RED);
        assert!(fb.pixels.iter().all(|&p| p == 0));
        put_pixel(&mut fb, 3, 3, RED);
        assert_eq!(fb.get(3, 3), Some(RED));
    }

    #[test]
    fn walk_line_visits_both_ends_once_per_major_step() {
        let mut steps = Vec::new();
        walk_line(0, 0, 6, 2, |x, y| steps.push((x, y)));
        assert_eq!(steps.first(), Some(&(0, 0)));
        assert_eq!(steps.last(), Some(&(6, 2)));
        assert_eq!(steps.len(), 7);

        let mut single = Vec::new();
        walk_line(3, 3, 3, 3, |x, y| single.push((x, y)));
        assert_eq!(single, vec![(3, 3)]);
    }

    #[test]
    fn stroke_rect_leaves_the_inside_alone() {
        let mut fb = FrameBuffer::new(10, 10, 0);
        stroke_rect(&mut fb, 1, 1, 8, 8, 2, RED);
        assert_eq!(fb.get(1, 1), Some(RED));
        assert_eq!(fb.get(2, 5), Some(RED));
        assert_eq!(fb.get(8, 8), Some(RED));
        assert_eq!(fb.get(4, 4), Some(0));
        assert_eq!(fb.get(0, 0), Some(0));
    }

    #[test]
    fn ring_has_a_hole() {
        let mut fb = FrameBuffer::new(21, 21, 0);
        fill_ring(&mut fb, 10, 10, 4.0, 8.0, RED);
        assert_eq!(fb.get(10, 10), Some(0));
        assert_eq!(fb.get(16, 10), Some(RED));
        assert_eq!(fb.get(10, 2), Some(RED));
        assert_eq!(fb.get(0, 0), Some(0));
    }

    #[test]
    fn blit_clips_at_destination_edges() {
        let mut dst = FrameBuffer::new(4, 4, 0);
        let src = FrameBuffer::new(3, 3, RED);
        blit(&mut dst, &src, 2, -1);
        assert_eq!(dst.get(2, 0), Some(RED));
        assert_eq!(dst.get(3, 1), Some(RED));
        assert_eq!(dst.get(3, 2), Some(0));
        assert_eq!(dst.get(1, 0), Some(0));
    }

    #[test]
    fn every_hud_character_has_a_glyph() {
        for ch in "PINCH HOVER IDLE | brush #1A2B3C - t 20 / bg: white FPS 29.9".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
        }
        assert!(glyph5x7('~').is_none());
    }

    #[test]
    fn text_is_drawn_with_shadow() {
        let mut fb = FrameBuffer::new(20, 10, 0x00_80_80_80);
        draw_text_5x7(&mut fb, 0, 0, "I", RED);
        // Top bar of the I, then its shadow one pixel down-right.
        assert_eq!(fb.get(1, 0), Some(RED));
        assert_eq!(fb.get(4, 1), Some(0));
        assert_eq!(text_width("ABC"), 18);
    }
}
