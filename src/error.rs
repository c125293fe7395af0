//! Errors reported by fallible driver construction and font parsing.
//!
//! Bus transmission failures are not represented here: the display logs them and carries on,
//! see `Display::flush`.

use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested dimensions do not fit the controller RAM grid (at most 128x64), or the height
    /// is not a whole number of 8-pixel pages.
    UnsupportedSize { width: u32, height: u32 },
    /// The framebuffer could not be allocated.
    OutOfMemory,
    /// A font table is truncated, has an empty code range, zero-sized glyphs, or a length which
    /// disagrees with its header.
    InvalidFont,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnsupportedSize { width, height } => {
                write!(f, "display size {}x{} not supported by SSD1306", width, height)
            }
            Error::OutOfMemory => f.write_str("framebuffer allocation failed"),
            Error::InvalidFont => f.write_str("malformed font table"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
