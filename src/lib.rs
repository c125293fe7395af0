//! Driver library for monochrome dot matrix OLED displays using the Solomon Systech SSD1306
//! controller over I2C. It keeps a page-packed framebuffer in RAM, draws pixels, rectangles and
//! bitmap-font text into it, and flushes it to the controller.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
extern crate embedded_hal as hal;
extern crate itertools;
#[macro_use]
extern crate log;

// Declared first so the test spy macros are visible to the modules after it.
#[macro_use]
pub mod interface;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;

// Re-exports for primary API.
pub use crate::command::{consts, Command, Opcode};
pub use crate::config::Config;
pub use crate::display::framebuffer::FrameBuffer;
pub use crate::display::Display;
pub use crate::error::Error;
pub use crate::font::{Font, Glyph, DEFAULT_FONT};
pub use crate::interface::i2c::I2cInterface;
pub use crate::interface::DisplayInterface;
