use bitflags::bitflags;

bitflags! {
    /// Per-pin configuration flags.
    ///
    /// Flags are OR-combined per pin and handed to
    /// [`Mcp23017::configure_pins`][crate::Mcp23017::configure_pins].  Flags
    /// for different pins are independent of each other.
    ///
    /// A pin carrying both `INPUT` and `OUTPUT` is treated purely as input:
    /// `INPUT` is evaluated first and the output handling is skipped for that
    /// pin.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinFlags: u8 {
        /// Configure the pin as an input.
        const INPUT = 1 << 0;
        /// Enable the internal pull-up resistor.  Only meaningful together
        /// with `INPUT`.
        const PULL_UP = 1 << 1;
        /// Configure the pin as an output.
        const OUTPUT = 1 << 2;
        /// Invert the logic sense of the pin on both the read and the write
        /// path.
        const ACTIVE_LOW = 1 << 3;
        /// Raise an interrupt on a rising edge.  Only meaningful together
        /// with `INPUT`.
        const RISING_INTERRUPT = 1 << 6;
        /// Raise an interrupt on a falling edge.  Only meaningful together
        /// with `INPUT`.
        const FALLING_INTERRUPT = 1 << 7;
    }
}

/// Masked pin access shared by all expander chips.
///
/// Both drivers implement this trait independently; the chips have nothing
/// in common beyond the contract itself.  Bit N of a mask selects pin N.
/// Chips with fewer than 16 pins ignore the excess mask bits.
pub trait GpioExpander {
    type Error;

    /// Read the logic level of all pins selected by `pins`.
    ///
    /// Bits not selected (or not readable on the chip) are 0 in the result.
    fn digital_read(&mut self, pins: u16) -> Result<u16, Self::Error>;

    /// Write the logic levels from `values` to all pins selected by `pins`.
    ///
    /// Pins outside `pins` keep their previous level.
    fn digital_write(&mut self, pins: u16, values: u16) -> Result<(), Self::Error>;
}

/// Build a pin mask from individual pin numbers.
///
/// Pin numbers outside `0..=15` are silently dropped.
///
/// ```
/// assert_eq!(gpio_expander::pin_mask(&[0, 8, 15]), 0x8101);
/// ```
pub fn pin_mask(pins: &[u8]) -> u16 {
    let mut mask = 0;
    for &pin in pins {
        if pin > 15 {
            continue;
        }
        mask |= 1 << pin;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_mask_drops_out_of_range_pins() {
        assert_eq!(pin_mask(&[]), 0x0000);
        assert_eq!(pin_mask(&[0, 8, 15]), 0x8101);
        assert_eq!(pin_mask(&[16, 200]), 0x0000);
        assert_eq!(pin_mask(&[5, 16, 5]), 0x0020);
    }

    #[test]
    fn undefined_flag_bits_are_rejected() {
        assert_eq!(PinFlags::from_bits(1 << 4), None);
        assert_eq!(PinFlags::from_bits(1 << 5), None);
        assert_eq!(
            PinFlags::from_bits(0b0000_0011),
            Some(PinFlags::INPUT | PinFlags::PULL_UP)
        );
    }

    #[test]
    fn masked_contract_is_chip_agnostic() {
        use embedded_hal_mock::eh1::i2c as mock_i2c;

        fn pulse<E: GpioExpander>(exp: &mut E, pins: u16) -> Result<u16, E::Error> {
            exp.digital_write(pins, pins)?;
            exp.digital_read(pins)
        }

        // pin 0 output, pin 1 input; the write only reaches pin 0, the
        // read only reports pin 1
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0x12, 0x01]),
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0x03]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);
        let mut mcp = crate::Mcp23017::new(bus.clone(), false, false, false);
        mcp.configure_pins(&[(0, PinFlags::OUTPUT), (1, PinFlags::INPUT)], false)
            .unwrap();
        assert_eq!(pulse(&mut mcp, 0x0003).unwrap(), 0x0002);
        bus.done();

        // quasi-bidirectional: the write releases the pins, the read
        // reports the wire state
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0xff]),
            mock_i2c::Transaction::read(0x20, vec![0x03]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);
        let mut pcf = crate::Pcf8574::new(bus.clone(), false, false, false);
        assert_eq!(pulse(&mut pcf, 0x0003).unwrap(), 0x0003);
        bus.done();
    }
}
