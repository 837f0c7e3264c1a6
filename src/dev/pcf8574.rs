//! Support for the `PCF8574` "Remote 8-bit I/O expander for I2C-bus with interrupt"
//!
//! The PCF8574 has a single quasi-bidirectional port and no direction
//! register: a pin can be read as an input only while its latch was last
//! written high ("released").  The driver keeps the latched value locally,
//! so single-pin writes and toggles never need a bus read first.
use embedded_hal::i2c::I2c;

use crate::GpioExpander;

/// `PCF8574` "Remote 8-bit I/O expander for I2C-bus with interrupt"
pub struct Pcf8574<I2C> {
    i2c: I2C,
    addr: u8,
    out: u8,
    inp: u8,
}

impl<I2C> Pcf8574<I2C> {
    /// Create a new driver for a chip strapped to address `0x20 | a2 a1 a0`.
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let addr = 0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self {
            i2c,
            addr,
            // power-up state, all pins released
            out: 0xff,
            inp: 0x00,
        }
    }

    /// The currently latched port value.
    pub fn port_state(&self) -> u8 {
        self.out
    }
}

impl<I2C: I2c> Pcf8574<I2C> {
    fn send(&mut self) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[self.out])
    }

    /// Latch and send a full port value.
    pub fn write(&mut self, value: u8) -> Result<(), I2C::Error> {
        self.out = value;
        self.send()
    }

    /// Set or clear a single pin in the latch and send the full port.
    ///
    /// Pin numbers above 7 are ignored.
    pub fn digital_write_pin(&mut self, pin: u8, value: bool) -> Result<(), I2C::Error> {
        if pin > 7 {
            return Ok(());
        }
        if value {
            self.out |= 1 << pin;
        } else {
            self.out &= !(1 << pin);
        }
        self.send()
    }

    /// Flip a single pin in the latch and send the full port.
    ///
    /// Pin numbers above 7 are ignored.
    pub fn toggle(&mut self, pin: u8) -> Result<(), I2C::Error> {
        if pin > 7 {
            return Ok(());
        }
        self.out ^= 1 << pin;
        self.send()
    }

    /// Read the current level of all pins.
    ///
    /// Pins not released (last written low) read back as their driven
    /// value; which pins are usable as inputs is a wiring concern the chip
    /// cannot express.
    pub fn read(&mut self) -> Result<u8, I2C::Error> {
        let mut buf = [0x00];
        self.i2c.read(self.addr, &mut buf)?;
        self.inp = buf[0];
        Ok(self.inp)
    }

    /// Read the current level of a single pin.
    ///
    /// Always performs a bus read; the result is never served from a cache.
    pub fn digital_read_pin(&mut self, pin: u8) -> Result<bool, I2C::Error> {
        let value = self.read()?;
        Ok(pin < 8 && value & (1 << pin) != 0)
    }

    /// Release all pins to their input-capable, pulled-high state.
    ///
    /// Sends `0xff` directly, bypassing the latch — intended as a shutdown
    /// step, after which the chip is back in its power-up state.
    pub fn cleanup(&mut self) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[0xff])
    }
}

impl<I2C: I2c> GpioExpander for Pcf8574<I2C> {
    type Error = I2C::Error;

    fn digital_read(&mut self, pins: u16) -> Result<u16, Self::Error> {
        if pins & 0x00ff == 0 {
            return Ok(0);
        }
        Ok(u16::from(self.read()?) & pins)
    }

    fn digital_write(&mut self, pins: u16, values: u16) -> Result<(), Self::Error> {
        let pins = (pins & 0x00ff) as u8;
        if pins == 0 {
            return Ok(());
        }
        self.out = (self.out & !pins) | (values as u8 & pins);
        self.send()
    }
}

#[cfg(test)]
mod tests {
    use crate::GpioExpander;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn full_writes_replace_the_latch() {
        let expectations = [mock_i2c::Transaction::write(0x20, vec![0x5a])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, false, false);
        pcf.write(0x5a).unwrap();
        assert_eq!(pcf.port_state(), 0x5a);

        bus.done();
    }

    #[test]
    fn single_pin_writes_send_the_full_port() {
        let expectations = [
            mock_i2c::Transaction::write(0x22, vec![0xfb]),
            mock_i2c::Transaction::write(0x22, vec![0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, true, false);
        pcf.digital_write_pin(2, false).unwrap();
        pcf.digital_write_pin(2, true).unwrap();
        // out-of-range pins are ignored without bus traffic
        pcf.digital_write_pin(9, false).unwrap();
        assert_eq!(pcf.port_state(), 0xff);

        bus.done();
    }

    #[test]
    fn toggle_flips_exactly_one_bit() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0xef]),
            mock_i2c::Transaction::write(0x20, vec![0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, false, false);
        pcf.toggle(4).unwrap();
        assert_eq!(pcf.port_state(), 0xef);
        pcf.toggle(4).unwrap();
        assert_eq!(pcf.port_state(), 0xff);

        bus.done();
    }

    #[test]
    fn pin_reads_always_hit_the_bus() {
        let expectations = [
            mock_i2c::Transaction::read(0x20, vec![0x40]),
            mock_i2c::Transaction::read(0x20, vec![0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, false, false);
        assert!(pcf.digital_read_pin(6).unwrap());
        assert!(!pcf.digital_read_pin(6).unwrap());

        bus.done();
    }

    #[test]
    fn cleanup_releases_all_pins_without_touching_the_latch() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0x00]),
            mock_i2c::Transaction::write(0x20, vec![0xff]),
            mock_i2c::Transaction::read(0x20, vec![0xa5]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, false, false);
        pcf.write(0x00).unwrap();
        pcf.cleanup().unwrap();
        // the latch still holds the pre-cleanup value
        assert_eq!(pcf.port_state(), 0x00);
        // afterwards the pins read as whatever is wired externally
        assert_eq!(pcf.read().unwrap(), 0xa5);

        bus.done();
    }

    #[test]
    fn masked_access_uses_the_low_byte() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0xfe]),
            mock_i2c::Transaction::read(0x20, vec![0x04]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcf = super::Pcf8574::new(bus.clone(), false, false, false);
        pcf.digital_write(0x0001, 0x0000).unwrap();
        // a mask without low-byte bits performs zero bus access
        pcf.digital_write(0xff00, 0x0000).unwrap();
        assert_eq!(pcf.digital_read(0x0104).unwrap(), 0x0004);

        bus.done();
    }
}
