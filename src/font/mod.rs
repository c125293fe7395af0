//! Bitmap font tables.
//!
//! A font table is a five byte header followed by one bitmap per character code:
//!
//! | byte | meaning                          |
//! |------|----------------------------------|
//! | 0    | glyph height in pixels           |
//! | 1    | glyph width in pixels            |
//! | 2    | spacing between glyphs in pixels |
//! | 3    | first character code, inclusive  |
//! | 4    | last character code, inclusive   |
//!
//! Each bitmap is `width` columns of `ceil(height / 8)` bytes, column-major. Byte `h` of a column
//! holds rows `h*8` to `h*8+7` with the top row in bit 0, the same layout as a framebuffer page.

use itertools::iproduct;

use crate::error::Error;

mod builtin;

pub use self::builtin::FONT_5X8;

pub const HEADER_LEN: usize = 5;

/// The font used by `Display::draw_text`: 5x8 printable ASCII with one pixel of spacing.
pub static DEFAULT_FONT: Font<'static> = Font { table: &FONT_5X8 };

fn bytes_per_column(height: u8) -> usize {
    (usize::from(height) + 7) / 8
}

/// A validated font table.
#[derive(Clone, Copy, Debug)]
pub struct Font<'a> {
    table: &'a [u8],
}

impl<'a> Font<'a> {
    /// Check that `table` is a well-formed font table. The length must be exactly what the header
    /// implies, so that every glyph lookup stays inside the table.
    pub fn new(table: &'a [u8]) -> Result<Self, Error> {
        if table.len() < HEADER_LEN {
            return Err(Error::InvalidFont);
        }
        let (height, width, first, last) = (table[0], table[1], table[3], table[4]);
        if height == 0 || width == 0 || last < first {
            return Err(Error::InvalidFont);
        }
        let glyphs = usize::from(last - first) + 1;
        let expect_len = HEADER_LEN + glyphs * usize::from(width) * bytes_per_column(height);
        if table.len() != expect_len {
            return Err(Error::InvalidFont);
        }
        Ok(Font { table })
    }

    pub fn height(&self) -> u8 {
        self.table[0]
    }

    pub fn width(&self) -> u8 {
        self.table[1]
    }

    pub fn spacing(&self) -> u8 {
        self.table[2]
    }

    pub fn first(&self) -> u8 {
        self.table[3]
    }

    pub fn last(&self) -> u8 {
        self.table[4]
    }

    pub fn bytes_per_column(&self) -> usize {
        bytes_per_column(self.height())
    }

    /// Horizontal distance from one glyph origin to the next at the given scale.
    pub fn advance(&self, scale: u32) -> u32 {
        (u32::from(self.width()) + u32::from(self.spacing())).saturating_mul(scale)
    }

    pub fn contains(&self, c: char) -> bool {
        let code = c as u32;
        code >= u32::from(self.first()) && code <= u32::from(self.last())
    }

    /// Look up the glyph for `c`, or `None` if `c` lies outside the font's code range.
    pub fn glyph(&self, c: char) -> Option<Glyph<'a>> {
        if !self.contains(c) {
            return None;
        }
        let index = (c as u32 - u32::from(self.first())) as usize;
        let bytes_per_column = self.bytes_per_column();
        let glyph_len = usize::from(self.width()) * bytes_per_column;
        let start = HEADER_LEN + index * glyph_len;
        self.table
            .get(start..start + glyph_len)
            .map(|columns| Glyph {
                columns,
                bytes_per_column,
            })
    }
}

/// The bitmap of a single character.
#[derive(Clone, Copy, Debug)]
pub struct Glyph<'a> {
    columns: &'a [u8],
    bytes_per_column: usize,
}

impl<'a> Glyph<'a> {
    pub fn width(&self) -> u32 {
        (self.columns.len() / self.bytes_per_column) as u32
    }

    /// The bytes of column `w`, top byte first.
    pub fn column(&self, w: u32) -> Option<&'a [u8]> {
        let start = w as usize * self.bytes_per_column;
        self.columns.get(start..start + self.bytes_per_column)
    }

    /// Every lit pixel of the glyph as `(column, row)`, column by column, top to bottom. All eight
    /// bits of each byte count, even where the font height is not a multiple of 8.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + 'a {
        let columns = self.columns;
        let bytes_per_column = self.bytes_per_column as u32;
        iproduct!(0..self.width(), 0..bytes_per_column).flat_map(move |(w, h)| {
            let line = columns[(w * bytes_per_column + h) as usize];
            (0..8u32)
                .filter(move |&bit| line & (1u8 << bit) != 0)
                .map(move |bit| (w, h * 8 + bit))
        })
    }
}
