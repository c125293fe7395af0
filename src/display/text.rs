//! Rasterizing bitmap-font text into a `FrameBuffer`.
//!
//! Text is a single line laid out left to right. Each logical glyph pixel becomes a solid
//! `scale` x `scale` block, which is the only form of scaling offered.

use crate::display::framebuffer::FrameBuffer;
use crate::font::Font;

impl FrameBuffer {
    /// Draw the glyph for `c` with its upper left corner at `(x, y)`. Characters the font does not
    /// cover draw nothing.
    pub fn draw_glyph(&mut self, x: u32, y: u32, scale: u32, font: &Font, c: char) {
        let glyph = match font.glyph(c) {
            Some(glyph) => glyph,
            None => return,
        };
        for (w, row) in glyph.pixels() {
            self.fill_rect(
                x.saturating_add(w.saturating_mul(scale)),
                y.saturating_add(row.saturating_mul(scale)),
                scale,
                scale,
            );
        }
    }

    /// Draw `s` starting at `(x, y)`. The cursor moves right by the font's width plus spacing
    /// (times `scale`) after every character, drawn or not, so missing glyphs keep their cell.
    pub fn draw_string(&mut self, x: u32, y: u32, scale: u32, font: &Font, s: &str) {
        let advance = font.advance(scale);
        let mut x_n = x;
        for c in s.chars() {
            self.draw_glyph(x_n, y, scale, font, c);
            x_n = x_n.saturating_add(advance);
        }
    }
}
