//! The main API to the display driver. `Display` owns the interface and a framebuffer: drawing
//! happens in RAM, and `flush` copies the whole framebuffer to the controller.
//!
//! Bus failures are never returned to the caller. Every transaction that fails is logged with
//! `log::warn!` and the driver carries on, so the image on the panel may be stale without the
//! caller being told.

pub mod framebuffer;
pub mod text;

use core::fmt::Debug;

use crate::command::consts::{NARROW_PANEL_COLS, NARROW_PANEL_COL_OFFSET};
use crate::command::Command;
use crate::config::Config;
use crate::display::framebuffer::FrameBuffer;
use crate::error::Error;
use crate::font::{Font, DEFAULT_FONT};
use crate::interface::DisplayInterface;

/// Whether the panel was last switched on or off. Independent of the framebuffer contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
}

/// Log a failed bus transaction. `step` names what the driver was doing.
fn report<E: Debug>(result: Result<(), E>, step: &str) {
    if let Err(e) = result {
        warn!("[{}] bus write failed: {:?}", step, e);
    }
}

/// A driver for an SSD1306 display.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    buffer: FrameBuffer,
    power: PowerState,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a new display driver for a `width` x `height` panel connected to `iface`, and
    /// allocate its framebuffer. Nothing is sent until `init`.
    ///
    /// The controller RAM is 128x64, so larger panels are rejected, as are heights which are not
    /// a whole number of 8-row pages.
    pub fn new(iface: DI, width: u32, height: u32) -> Result<Self, Error> {
        let buffer = FrameBuffer::new(width, height)?;
        debug!("allocated {}x{} framebuffer", width, height);
        Ok(Display {
            iface,
            buffer,
            power: PowerState::Off,
        })
    }

    /// Initialize the display with a config message. The panel is switched on at the end.
    pub fn init(&mut self, config: Config) {
        let sequence = config.init_sequence(self.buffer.width() as u8, self.buffer.height() as u8);
        for cmd in sequence.iter() {
            report(cmd.send(&mut self.iface), "init");
        }
        self.power = PowerState::On;
        debug!(
            "initialized {}x{} display ({} VCC)",
            self.buffer.width(),
            self.buffer.height(),
            if config.is_external_vcc() {
                "external"
            } else {
                "internal"
            }
        );
    }

    /// Tear the driver down, dropping the framebuffer and giving back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    /// Switch the panel on. Display RAM is retained while the panel is off.
    pub fn power_on(&mut self) {
        report(Command::SetDisplayOn(true).send(&mut self.iface), "power on");
        self.power = PowerState::On;
        debug!("display on");
    }

    /// Switch the panel off.
    pub fn power_off(&mut self) {
        report(Command::SetDisplayOn(false).send(&mut self.iface), "power off");
        self.power = PowerState::Off;
        debug!("display off");
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn is_on(&self) -> bool {
        self.power == PowerState::On
    }

    /// Control the contrast current.
    pub fn set_contrast(&mut self, contrast: u8) {
        report(Command::SetContrast(contrast).send(&mut self.iface), "contrast");
    }

    /// Control inverse video: when enabled, cleared pixels are lit and set pixels are dark.
    pub fn set_inverted(&mut self, inverted: bool) {
        report(Command::SetInverted(inverted).send(&mut self.iface), "invert");
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Clear the framebuffer. The panel is unchanged until the next `flush`.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn set_pixel(&mut self, x: u32, y: u32) {
        self.buffer.set_pixel(x, y);
    }

    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        self.buffer.clear_pixel(x, y);
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        self.buffer.pixel(x, y)
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.buffer.fill_rect(x, y, w, h);
    }

    pub fn draw_glyph(&mut self, x: u32, y: u32, scale: u32, font: &Font, c: char) {
        self.buffer.draw_glyph(x, y, scale, font, c);
    }

    pub fn draw_string(&mut self, x: u32, y: u32, scale: u32, font: &Font, s: &str) {
        self.buffer.draw_string(x, y, scale, font, s);
    }

    /// Draw one character with the built-in font.
    pub fn draw_glyph_default(&mut self, x: u32, y: u32, scale: u32, c: char) {
        self.buffer.draw_glyph(x, y, scale, &DEFAULT_FONT, c);
    }

    /// Draw a line of text with the built-in font.
    pub fn draw_text(&mut self, x: u32, y: u32, scale: u32, s: &str) {
        self.buffer.draw_string(x, y, scale, &DEFAULT_FONT, s);
    }

    /// The column and page ranges covering the whole panel.
    ///
    /// 64 pixel wide panels are wired to column drivers 32-95 of the 128, so their columns are
    /// shifted to match.
    fn addressing_window(&self) -> (Command, Command) {
        let mut col_lo = 0u8;
        let mut col_hi = (self.buffer.width() - 1) as u8;
        if self.buffer.width() == NARROW_PANEL_COLS {
            col_lo += NARROW_PANEL_COL_OFFSET;
            col_hi += NARROW_PANEL_COL_OFFSET;
        }
        let page_hi = (self.buffer.page_count() - 1) as u8;
        (
            Command::SetColumnAddress(col_lo, col_hi),
            Command::SetPageAddress(0, page_hi),
        )
    }

    /// Copy the framebuffer to the display RAM: point the RAM window at the whole panel, then send
    /// the buffer as one data transaction. Failures are logged and not retried.
    ///
    /// A command is abandoned at its first undelivered byte, so when the bus is failing fewer than
    /// the usual six command frames go out before the data transaction is attempted.
    pub fn flush(&mut self) {
        let (columns, pages) = self.addressing_window();
        report(columns.send(&mut self.iface), "column address");
        report(pages.send(&mut self.iface), "page address");
        report(self.iface.send_data(self.buffer.as_bytes()), "display data");
        trace!("flushed {} bytes", self.buffer.as_bytes().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::ABC;
    use crate::interface::i2c::I2cInterface;
    use crate::interface::test_spy::{FakeBus, Sent, SpyFault, TestSpyInterface};

    #[test]
    fn new_checks_size() {
        let di = TestSpyInterface::new();
        assert!(Display::new(di.split(), 128, 64).is_ok());
        assert!(Display::new(di.split(), 64, 48).is_ok());
        assert!(Display::new(di.split(), 128, 32).is_ok());
        assert_eq!(
            Display::new(di.split(), 129, 64).err(),
            Some(Error::UnsupportedSize {
                width: 129,
                height: 64
            })
        );
        assert!(Display::new(di.split(), 128, 72).is_err());
        assert!(Display::new(di.split(), 128, 60).is_err());
        assert!(Display::new(di.split(), 0, 64).is_err());
        assert!(Display::new(di.split(), 0x2000_0001, 64).is_err());
        // Construction alone talks to nobody.
        di.check_multi(&[]);
    }

    #[test]
    fn init_defaults() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        assert!(!disp.is_on());
        disp.init(Config::new());
        assert!(disp.is_on());
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xAE, // display off
            0xD5, 0x80, // clock divider
            0xA8, 63, // mux ratio 64 lines
            0xD3, 0x00, // display offset 0
            0x40, // start line 0
            0x8D, 0x14, // charge pump on
            0xA1, // segment remap
            0xC8, // COM scan reversed
            0xDA, 0x12, // alternative COM pins
            0x81, 0xFF, // contrast
            0xD9, 0xF1, // precharge
            0xDB, 0x30, // VCOM deselect
            0xA4, // follow RAM
            0xA6, // not inverted
            0xAF, // display on
            0x20, 0x00 // horizontal addressing
        ));
    }

    #[test]
    fn init_external_vcc_wide_panel() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 32).unwrap();
        disp.init(Config::new().external_vcc(true).contrast(0x8F));
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xAE,
            0xD5, 0x80,
            0xA8, 31, // mux ratio 32 lines
            0xD3, 0x00,
            0x40,
            0x8D, 0x10, // charge pump off
            0xA1,
            0xC8,
            0xDA, 0x02, // sequential COM pins
            0x81, 0x8F,
            0xD9, 0x22, // precharge for external VCC
            0xDB, 0x30,
            0xA4,
            0xA6,
            0xAF,
            0x20, 0x00
        ));
    }

    #[test]
    fn init_keeps_going_after_bus_failure() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        di.fail_with(Some(SpyFault::NotAcknowledged));
        disp.init(Config::new());
        // Each command gives up at its first failed byte, but every command is still attempted.
        let sent = di.sent();
        assert_eq!(sent.len(), 16);
        assert_eq!(sent[0], Sent::Cmd(0xAE));
        assert_eq!(sent[14], Sent::Cmd(0xAF));
        assert_eq!(sent[15], Sent::Cmd(0x20));
        assert!(disp.is_on());
    }

    #[test]
    fn power_contrast_invert() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        disp.power_on();
        assert_eq!(disp.power_state(), PowerState::On);
        disp.power_off();
        assert_eq!(disp.power_state(), PowerState::Off);
        disp.set_contrast(0x42);
        disp.set_inverted(true);
        disp.set_inverted(false);
        di.check_multi(sends!(0xAF, 0xAE, 0x81, 0x42, 0xA7, 0xA6));
    }

    #[test]
    fn drawing_does_no_io() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        disp.power_off();
        di.clear();
        disp.set_pixel(1, 1);
        disp.fill_rect(10, 10, 5, 5);
        disp.draw_text(0, 20, 1, "Hi");
        disp.clear_pixel(1, 1);
        assert!(!disp.pixel(1, 1));
        assert!(disp.pixel(12, 12));
        di.check_multi(&[]);
    }

    #[test]
    fn flush_framing() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        disp.set_pixel(0, 0);
        disp.set_pixel(127, 63);
        disp.flush();
        let sent = di.sent();
        assert_eq!(sent.len(), 7);
        assert_eq!(&sent[..6], sends!(0x21, 0, 127, 0x22, 0, 7));
        match &sent[6] {
            Sent::Data(data) => {
                assert_eq!(data.len(), 1024);
                assert_eq!(&data[..], disp.buffer().as_bytes());
                assert_eq!(data[0], 0x01);
                assert_eq!(data[1023], 0x80);
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn flush_narrow_panel_offset() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 64, 48).unwrap();
        disp.flush();
        let sent = di.sent();
        assert_eq!(sent.len(), 7);
        assert_eq!(&sent[..6], sends!(0x21, 32, 95, 0x22, 0, 5));
        assert_eq!(sent[6], Sent::Data(alloc::vec![0; 384]));
    }

    #[test]
    fn flush_keeps_going_after_bus_failure() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 32).unwrap();
        di.fail_with(Some(SpyFault::Timeout));
        disp.flush();
        // Column and page commands stop at their opcode, the data write is still attempted.
        let sent = di.sent();
        assert_eq!(&sent[..2], sends!(0x21, 0x22));
        assert_eq!(sent[2], Sent::Data(alloc::vec![0; 512]));

        // And the next flush goes through untouched.
        di.fail_with(None);
        di.clear();
        disp.flush();
        assert_eq!(di.sent().len(), 7);
    }

    #[test]
    fn flush_over_i2c() {
        let mut disp = Display::new(I2cInterface::new(FakeBus::new(), 0x3C), 128, 32).unwrap();
        let font = Font::new(&ABC).unwrap();
        disp.draw_string(0, 0, 1, &font, "AB");
        disp.flush();
        let bus = disp.release().release();
        assert_eq!(bus.writes.len(), 7);
        let window = [0x21, 0, 127, 0x22, 0, 3];
        for (write, &byte) in bus.writes.iter().zip(window.iter()) {
            assert_eq!(write, &(0x3C, alloc::vec![0x00, byte]));
        }
        let (address, frame) = &bus.writes[6];
        assert_eq!(*address, 0x3C);
        assert_eq!(frame.len(), 512 + 1);
        assert_eq!(frame[0], 0x40);
        assert_eq!(&frame[1..6], &[0x7E, 0x11, 0x11, 0x11, 0x7E]);
        assert_eq!(frame[6], 0);
        assert_eq!(&frame[7..12], &[0x7F, 0x49, 0x49, 0x49, 0x36]);
    }

    #[test]
    fn flush_over_i2c_swallows_nack() {
        let mut bus = FakeBus::new();
        bus.fault = Some(SpyFault::NotAcknowledged);
        let mut disp = Display::new(I2cInterface::new(bus, 0x3C), 128, 64).unwrap();
        disp.init(Config::new());
        disp.draw_text(25, 25, 2, "BMRD");
        disp.flush();
        assert!(disp.release().release().writes.is_empty());
    }

    #[test]
    fn default_font_text() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 128, 64).unwrap();
        disp.draw_glyph_default(0, 0, 1, 'H');
        assert_eq!(&disp.buffer().as_bytes()[..5], &[0x7F, 0x08, 0x08, 0x08, 0x7F]);
        disp.clear();
        disp.draw_text(0, 8, 1, "H H");
        // Second page, with the middle cell left blank.
        let page = &disp.buffer().as_bytes()[128..146];
        assert_eq!(&page[..5], &[0x7F, 0x08, 0x08, 0x08, 0x7F]);
        assert!(page[5..12].iter().all(|&b| b == 0));
        assert_eq!(&page[12..17], &[0x7F, 0x08, 0x08, 0x08, 0x7F]);
    }

    #[test]
    fn buffer_mut_reaches_the_wire() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), 8, 8).unwrap();
        disp.buffer_mut().fill_rect(0, 0, 8, 1);
        disp.flush();
        assert_eq!(di.sent()[6], Sent::Data(alloc::vec![0x01; 8]));
    }
}
