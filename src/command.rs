//! The command set of the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is 128 columns by 8 pages, where each page is a band of
//! 8 pixel rows. One byte of RAM drives one column of one page, least significant bit on top.
//!
//! Note 2: Over I2C every command byte, including argument bytes, travels in its own
//! `[CONTROL_COMMAND, byte]` frame (see `interface::i2c`), so a `Command` is just an ordered list
//! of bytes.

use crate::interface::DisplayInterface;

pub mod consts {
    //! Limits of the controller RAM grid and bus framing constants.

    pub const NUM_PIXEL_COLS: u32 = 128;
    pub const NUM_PIXEL_ROWS: u32 = 64;
    pub const PIXEL_ROWS_PER_PAGE: u32 = 8;

    /// Panels exactly this wide are wired to the middle of the column drivers.
    pub const NARROW_PANEL_COLS: u32 = 64;
    /// Column driver of pixel column 0 on a `NARROW_PANEL_COLS` wide panel.
    pub const NARROW_PANEL_COL_OFFSET: u8 = 32;

    /// Control byte announcing that the rest of the frame is a command.
    pub const CONTROL_COMMAND: u8 = 0x00;
    /// Control byte announcing that the rest of the frame is display RAM data.
    pub const CONTROL_DATA: u8 = 0x40;
}

/// Command opcodes. Where a command carries a flag in its low bits, the opcode is the value with
/// the flag cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    SetMemoryAddressingMode = 0x20,
    SetColumnAddress = 0x21,
    SetPageAddress = 0x22,
    SetStartLine = 0x40,
    SetContrast = 0x81,
    SetChargePump = 0x8D,
    SetSegmentRemap = 0xA0,
    SetEntireDisplayOn = 0xA4,
    SetInverted = 0xA6,
    SetMuxRatio = 0xA8,
    SetDisplayOn = 0xAE,
    SetComScanDirection = 0xC0,
    SetDisplayOffset = 0xD3,
    SetClockDivider = 0xD5,
    SetPrecharge = 0xD9,
    SetComPinConfig = 0xDA,
    SetVcomDeselect = 0xDB,
}

impl Opcode {
    fn with(self, flags: u8) -> u8 {
        self as u8 | flags
    }
}

/// The order in which the RAM address pointer advances as display data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Column address increments, wrapping to the next page at the end of the column range.
    Horizontal,
    /// Page address increments, wrapping to the next column at the end of the page range.
    Vertical,
    /// Column address increments and wraps within the current page only.
    Page,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan from COM0 to COM[N-1].
    RowZeroFirst,
    /// COM lines scan from COM[N-1] to COM0.
    RowZeroLast,
}

/// How the COM pins are wired to the panel rows. Dictated by the module; 128x32 modules are
/// usually sequential, 128x64 and 64x48 modules alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComPinConfig {
    Sequential,
    Alternative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the memory addressing mode. See enum for details.
    SetMemoryAddressingMode(AddressingMode),
    /// Set the column start and end address used while writing display data in horizontal or
    /// vertical addressing mode. Range is 0-127.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address used while writing display data in horizontal or
    /// vertical addressing mode. Range is 0-7.
    SetPageAddress(u8, u8),
    /// Set the RAM row shown on the first display row. Range is 0-63.
    SetStartLine(u8),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// Enable or disable the internal charge pump. It must be enabled unless the panel is driven
    /// from an external VCC supply.
    SetChargePump(bool),
    /// When enabled, column address 127 is mapped to SEG0, mirroring the image horizontally.
    SetSegmentRemap(bool),
    /// When enabled, every pixel is lit regardless of display RAM contents.
    SetEntireDisplayOn(bool),
    /// When enabled, a RAM bit of 0 lights the pixel and 1 leaves it dark.
    SetInverted(bool),
    /// Set the MUX ratio, i.e. the number of active display rows. Range 16-64.
    SetMuxRatio(u8),
    /// Turn the panel on or off. RAM contents are retained while off.
    SetDisplayOn(bool),
    /// Set the COM scan direction. See enum for details.
    SetComScanDirection(ComScanDirection),
    /// Set the vertical shift by COM line. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the display clock divide ratio (low nibble, plus one) and oscillator frequency (high
    /// nibble).
    SetClockDivider(u8),
    /// Set the pre-charge period: phase 1 in the low nibble, phase 2 in the high nibble, in DCLKs.
    SetPrecharge(u8),
    /// Set the COM pin hardware configuration. See enum for details.
    SetComPinConfig(ComPinConfig),
    /// Set the VCOMH deselect level. `0x30` is about 0.83 * VCC.
    SetVcomDeselect(u8),
}

macro_rules! command_bytes {
    ($buf:ident, $op:expr,[]) => {{
        $buf[0] = $op;
        &$buf[..1]
    }};
    ($buf:ident, $op:expr,[$arg0:expr]) => {{
        $buf[0] = $op;
        $buf[1] = $arg0;
        &$buf[..2]
    }};
    ($buf:ident, $op:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $op;
        $buf[1] = $arg0;
        $buf[2] = $arg1;
        &$buf[..3]
    }};
}

impl Command {
    /// Encode the command into `buf`, returning the slice of it which holds the opcode followed by
    /// its arguments.
    pub fn encode(self, buf: &mut [u8; 3]) -> &[u8] {
        match self {
            Command::SetMemoryAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                };
                command_bytes!(buf, Opcode::SetMemoryAddressingMode as u8, [m])
            }
            Command::SetColumnAddress(start, end) => {
                command_bytes!(buf, Opcode::SetColumnAddress as u8, [start, end])
            }
            Command::SetPageAddress(start, end) => {
                command_bytes!(buf, Opcode::SetPageAddress as u8, [start, end])
            }
            Command::SetStartLine(line) => {
                command_bytes!(buf, Opcode::SetStartLine.with(line & 0x3F), [])
            }
            Command::SetContrast(contrast) => {
                command_bytes!(buf, Opcode::SetContrast as u8, [contrast])
            }
            Command::SetChargePump(enabled) => {
                let e = match enabled {
                    true => 0x14,
                    false => 0x10,
                };
                command_bytes!(buf, Opcode::SetChargePump as u8, [e])
            }
            Command::SetSegmentRemap(remap) => {
                command_bytes!(buf, Opcode::SetSegmentRemap.with(remap as u8), [])
            }
            Command::SetEntireDisplayOn(on) => {
                command_bytes!(buf, Opcode::SetEntireDisplayOn.with(on as u8), [])
            }
            Command::SetInverted(inverted) => {
                command_bytes!(buf, Opcode::SetInverted.with(inverted as u8), [])
            }
            Command::SetMuxRatio(ratio) => {
                command_bytes!(buf, Opcode::SetMuxRatio as u8, [ratio.saturating_sub(1)])
            }
            Command::SetDisplayOn(on) => {
                command_bytes!(buf, Opcode::SetDisplayOn.with(on as u8), [])
            }
            Command::SetComScanDirection(direction) => {
                let d = match direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x08,
                };
                command_bytes!(buf, Opcode::SetComScanDirection.with(d), [])
            }
            Command::SetDisplayOffset(offset) => {
                command_bytes!(buf, Opcode::SetDisplayOffset as u8, [offset])
            }
            Command::SetClockDivider(divider) => {
                command_bytes!(buf, Opcode::SetClockDivider as u8, [divider])
            }
            Command::SetPrecharge(period) => {
                command_bytes!(buf, Opcode::SetPrecharge as u8, [period])
            }
            Command::SetComPinConfig(config) => {
                let c = match config {
                    ComPinConfig::Sequential => 0x02,
                    ComPinConfig::Alternative => 0x12,
                };
                command_bytes!(buf, Opcode::SetComPinConfig as u8, [c])
            }
            Command::SetVcomDeselect(level) => {
                command_bytes!(buf, Opcode::SetVcomDeselect as u8, [level])
            }
        }
    }

    /// Send the command to the display at `iface`, one byte per command frame. Stops at the
    /// first byte the interface fails to deliver.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 3];
        for &byte in self.encode(&mut buf) {
            iface.send_command(byte)?;
        }
        Ok(())
    }
}
