//! Init-time configuration of the SSD1306 and the command sequence it produces.

use crate::command::*;

/// Number of commands in the init sequence.
pub const INIT_SEQUENCE_LEN: usize = 16;

/// A configuration for the display. `Config::new()` reproduces the usual module setup (internal
/// charge pump, maximum contrast); builder methods override individual registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    external_vcc: bool,
    contrast: u8,
    clock_divider: u8,
    precharge: Option<u8>,
    vcom_deselect: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            external_vcc: false,
            contrast: 0xFF,
            clock_divider: 0x80,
            precharge: None,
            vcom_deselect: 0x30,
        }
    }

    /// Extend this `Config` to declare that the panel is driven from an external VCC supply. This
    /// disables the internal charge pump and changes the default pre-charge period.
    pub fn external_vcc(self, external_vcc: bool) -> Self {
        Self {
            external_vcc,
            ..self
        }
    }

    /// Extend this `Config` to set the initial contrast. See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// Extend this `Config` to set the clock divider and oscillator frequency. See
    /// `Command::SetClockDivider`.
    pub fn clock_divider(self, clock_divider: u8) -> Self {
        Self {
            clock_divider,
            ..self
        }
    }

    /// Extend this `Config` to set the pre-charge period explicitly instead of deriving it from the
    /// VCC source. See `Command::SetPrecharge`.
    pub fn precharge(self, precharge: u8) -> Self {
        Self {
            precharge: Some(precharge),
            ..self
        }
    }

    /// Extend this `Config` to set the VCOMH deselect level. See `Command::SetVcomDeselect`.
    pub fn vcom_deselect(self, vcom_deselect: u8) -> Self {
        Self {
            vcom_deselect,
            ..self
        }
    }

    pub fn is_external_vcc(&self) -> bool {
        self.external_vcc
    }

    /// The commands which bring a freshly powered controller driving a `width` x `height` panel
    /// into this configuration, ending with the panel switched on and horizontal addressing
    /// selected so a full-screen data write fills the RAM page by page.
    pub(crate) fn init_sequence(&self, width: u8, height: u8) -> [Command; INIT_SEQUENCE_LEN] {
        let precharge = self
            .precharge
            .unwrap_or(if self.external_vcc { 0x22 } else { 0xF1 });
        // Wide, short panels use every other COM line.
        let com_pins = if u16::from(width) > 2 * u16::from(height) {
            ComPinConfig::Sequential
        } else {
            ComPinConfig::Alternative
        };
        [
            Command::SetDisplayOn(false),
            // Timing and driving scheme.
            Command::SetClockDivider(self.clock_divider),
            Command::SetMuxRatio(height),
            Command::SetDisplayOffset(0),
            // Resolution and layout.
            Command::SetStartLine(0),
            Command::SetChargePump(!self.external_vcc),
            Command::SetSegmentRemap(true),
            Command::SetComScanDirection(ComScanDirection::RowZeroLast),
            Command::SetComPinConfig(com_pins),
            // Display.
            Command::SetContrast(self.contrast),
            Command::SetPrecharge(precharge),
            Command::SetVcomDeselect(self.vcom_deselect),
            Command::SetEntireDisplayOn(false),
            Command::SetInverted(false),
            Command::SetDisplayOn(true),
            Command::SetMemoryAddressingMode(AddressingMode::Horizontal),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_internal_vcc_module() {
        let seq = Config::new().init_sequence(128, 64);
        assert_eq!(seq[2], Command::SetMuxRatio(64));
        assert_eq!(seq[5], Command::SetChargePump(true));
        assert_eq!(seq[8], Command::SetComPinConfig(ComPinConfig::Alternative));
        assert_eq!(seq[9], Command::SetContrast(0xFF));
        assert_eq!(seq[10], Command::SetPrecharge(0xF1));
        assert_eq!(seq[11], Command::SetVcomDeselect(0x30));
    }

    #[test]
    fn external_vcc() {
        let seq = Config::new().external_vcc(true).init_sequence(128, 64);
        assert_eq!(seq[5], Command::SetChargePump(false));
        assert_eq!(seq[10], Command::SetPrecharge(0x22));
    }

    #[test]
    fn explicit_precharge_wins() {
        let seq = Config::new()
            .external_vcc(true)
            .precharge(0x44)
            .init_sequence(128, 64);
        assert_eq!(seq[10], Command::SetPrecharge(0x44));
    }

    #[test]
    fn wide_panel_uses_sequential_com_pins() {
        let seq = Config::new().init_sequence(128, 32);
        assert_eq!(seq[8], Command::SetComPinConfig(ComPinConfig::Sequential));
        // Exactly twice as wide is not "wide".
        let seq = Config::new().init_sequence(64, 32);
        assert_eq!(seq[8], Command::SetComPinConfig(ComPinConfig::Alternative));
    }

    #[test]
    fn overrides() {
        let cfg = Config::new()
            .contrast(0x10)
            .clock_divider(0xF0)
            .vcom_deselect(0x40);
        let seq = cfg.init_sequence(128, 64);
        assert_eq!(seq[1], Command::SetClockDivider(0xF0));
        assert_eq!(seq[9], Command::SetContrast(0x10));
        assert_eq!(seq[11], Command::SetVcomDeselect(0x40));
        assert!(!cfg.is_external_vcc());
    }
}
