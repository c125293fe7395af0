//! The in-memory image of the display RAM.
//!
//! Pixels are packed the way the controller stores them: the surface is cut into pages of 8 rows,
//! and byte `x + width * page` holds column `x` of that page with the top row in bit 0. A full
//! buffer can therefore be streamed to the controller in horizontal addressing mode unchanged.

use alloc::vec::Vec;

use itertools::iproduct;

use crate::command::consts::{NUM_PIXEL_COLS, NUM_PIXEL_ROWS, PIXEL_ROWS_PER_PAGE};
use crate::error::Error;

pub struct FrameBuffer {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a cleared buffer for a `width` x `height` surface. The surface must fit the
    /// controller RAM grid, and the height must be a whole number of pages. The buffer is never
    /// resized afterwards.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0
            || width > NUM_PIXEL_COLS
            || height == 0
            || height > NUM_PIXEL_ROWS
            || height % PIXEL_ROWS_PER_PAGE != 0
        {
            return Err(Error::UnsupportedSize { width, height });
        }
        let len = (width as usize)
            .checked_mul((height / PIXEL_ROWS_PER_PAGE) as usize)
            .ok_or(Error::OutOfMemory)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
        buf.resize(len, 0);
        Ok(FrameBuffer { width, height, buf })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn page_count(&self) -> u32 {
        self.height / PIXEL_ROWS_PER_PAGE
    }

    /// The packed pixels, page by page, exactly as they are sent to the display RAM.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Byte index and bit mask of a pixel, or `None` if it lies off the surface.
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let page = y / PIXEL_ROWS_PER_PAGE;
        let index = x as usize + self.width as usize * page as usize;
        Some((index, 1u8 << (y % PIXEL_ROWS_PER_PAGE)))
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        for byte in self.buf.iter_mut() {
            *byte = 0;
        }
    }

    /// Light a pixel. Coordinates off the surface are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.buf[index] |= mask;
        }
    }

    /// Darken a pixel. Coordinates off the surface are ignored.
    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.buf[index] &= !mask;
        }
    }

    /// Whether a pixel is lit. Pixels off the surface read as dark.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        match self.locate(x, y) {
            Some((index, mask)) => self.buf[index] & mask != 0,
            None => false,
        }
    }

    /// Light every pixel of the `w` x `h` rectangle whose upper left corner is `(x, y)`. The part
    /// of the rectangle off the surface is dropped.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for (px, py) in iproduct!(x..x_end, y..y_end) {
            self.set_pixel(px, py);
        }
    }
}
