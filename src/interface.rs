//! The transport between the driver and the controller.
//!
//! The SSD1306 distinguishes command bytes from display RAM bytes with a control byte at the start
//! of each bus transaction. `DisplayInterface` hides that framing from the rest of the driver.

use core::fmt::Debug;

pub trait DisplayInterface {
    /// Whatever the transport reports when a transaction fails, e.g. an address NACK or a bus
    /// timeout. The display only ever logs it, so `Debug` is all that is required.
    type Error: Debug;

    /// Send a single command (or command argument) byte.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Send a run of display RAM bytes as one transaction.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

pub mod i2c {
    //! The I2C interface. Every command byte is sent as its own two-byte transaction
    //! `[0x00, cmd]`, and display RAM data is sent as one bulk transaction prefixed by the data
    //! stream marker `0x40`.

    use core::fmt::Debug;
    use core::iter;

    use hal::blocking::i2c::{Write, WriteIter};

    use super::DisplayInterface;
    use crate::command::consts::{CONTROL_COMMAND, CONTROL_DATA};

    /// Default 7-bit address of most SSD1306 modules (D/C# pin tied low).
    pub const PRIMARY_ADDRESS: u8 = 0x3C;
    /// Alternate 7-bit address (D/C# pin tied high).
    pub const SECONDARY_ADDRESS: u8 = 0x3D;

    pub struct I2cInterface<I2C> {
        /// The I2C master the SSD1306 is attached to. Bus speed is whatever the caller configured
        /// it for; 400kHz is typical.
        i2c: I2C,
        /// 7-bit device address.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C> {
        /// Create a new I2C interface to communicate with the controller at `address`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        /// Give back the I2C master.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C, E> DisplayInterface for I2cInterface<I2C>
    where
        I2C: Write<Error = E> + WriteIter<Error = E>,
        E: Debug,
    {
        type Error = E;

        fn send_command(&mut self, cmd: u8) -> Result<(), E> {
            Write::write(&mut self.i2c, self.address, &[CONTROL_COMMAND, cmd])
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), E> {
            // The marker is chained in front of the borrowed buffer so the whole frame goes out in
            // a single transaction without copying the framebuffer.
            let frame = iter::once(CONTROL_DATA).chain(buf.iter().cloned());
            WriteIter::write(&mut self.i2c, self.address, frame)
        }
    }
}


#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::i2c::{I2cInterface, PRIMARY_ADDRESS};
    use super::test_spy::{FakeBus, SpyFault};
    use super::DisplayInterface;

    #[test]
    fn command_frame() {
        let mut di = I2cInterface::new(FakeBus::new(), PRIMARY_ADDRESS);
        di.send_command(0xAF).unwrap();
        di.send_command(0x81).unwrap();
        let bus = di.release();
        assert_eq!(
            bus.writes,
            vec![(0x3C, vec![0x00, 0xAF]), (0x3C, vec![0x00, 0x81])]
        );
    }

    #[test]
    fn data_frame_is_one_transaction() {
        let mut di = I2cInterface::new(FakeBus::new(), 0x3D);
        let buf = (0..16).collect::<Vec<u8>>();
        di.send_data(&buf).unwrap();
        let bus = di.release();
        assert_eq!(bus.writes.len(), 1);
        let (address, frame) = &bus.writes[0];
        assert_eq!(*address, 0x3D);
        assert_eq!(frame.len(), buf.len() + 1);
        assert_eq!(frame[0], 0x40);
        assert_eq!(&frame[1..], &buf[..]);
    }

    #[test]
    fn bus_errors_pass_through() {
        let mut bus = FakeBus::new();
        bus.fault = Some(SpyFault::NotAcknowledged);
        let mut di = I2cInterface::new(bus, PRIMARY_ADDRESS);
        assert_eq!(di.send_command(0xAE), Err(SpyFault::NotAcknowledged));
        assert_eq!(di.send_data(&[1, 2, 3]), Err(SpyFault::NotAcknowledged));
        assert!(di.release().writes.is_empty());
    }
}
