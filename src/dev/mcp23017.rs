//! Support for the `MCP23017` "16-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The MCP23017 offers two eight-bit GPIO ports.  It has three address pins,
//! so eight devices can coexist on an I2C bus.
//!
//! Port A carries pins 0..=7 and port B carries pins 8..=15: in all 16-bit
//! masks and values of this driver, the lower byte corresponds to port A and
//! the upper byte to port B.  Register accesses are limited to the port
//! halves a call actually touches, so operations staying within one port
//! cost a single bus transaction.
use crate::{GpioExpander, I2cExt, PinFlags};
use embedded_hal::i2c::I2c;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regs {
    // Addresses are for BANK=0, the reset state of the chip (this driver
    // never changes it).  All registers reset to 0x00 except IODIR{A,B},
    // which come up as 0xff (all pins inputs).
    /// Direction: 1=input; 0=output
    IODIRA = 0x00,
    IODIRB = 0x01,
    /// Input polarity: 1=invert
    IPOLA = 0x02,
    IPOLB = 0x03,
    /// Interrupt-on-change: 1=enable
    GPINTENA = 0x04,
    GPINTENB = 0x05,
    /// Default values for interrupt-on-change
    DEFVALA = 0x06,
    DEFVALB = 0x07,
    /// Interrupt-on-change mode: 1=compare to DEFVAL; 0=compare to previous
    /// pin value
    INTCONA = 0x08,
    INTCONB = 0x09,
    IOCONA = 0x0a,
    IOCONB = 0x0b,
    /// Weak internal pull-ups, effective on inputs
    GPPUA = 0x0c,
    GPPUB = 0x0d,
    INTFA = 0x0e,
    INTFB = 0x0f,
    INTCAPA = 0x10,
    INTCAPB = 0x11,
    /// Logic level on the pins
    GPIOA = 0x12,
    GPIOB = 0x13,
    OLATA = 0x14,
    OLATB = 0x15,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

/// `MCP23017` "16-Bit I/O Expander with Serial Interface"
///
/// All pin bookkeeping lives in the driver: direction, inversion and output
/// state are mirrored locally, so reads and writes never have to fetch a
/// register before deciding what to send.
pub struct Mcp23017<I2C> {
    i2c: I2C,
    addr: u8,
    input_mask: u16,
    output_mask: u16,
    direction: u16,
    active_low: u16,
    out: u16,
}

impl<I2C> Mcp23017<I2C> {
    /// Create a new driver for a chip strapped to address `0x20 | a2 a1 a0`.
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let addr = 0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self {
            i2c,
            addr,
            input_mask: 0x0000,
            output_mask: 0x0000,
            // IODIR reset value, all pins inputs
            direction: 0xffff,
            active_low: 0x0000,
            out: 0x0000,
        }
    }

    /// The last written logical output value, one bit per pin.
    ///
    /// This reflects the non-inverted levels as passed to the write
    /// operations, not the raw bytes on the wire.
    pub fn output_state(&self) -> u16 {
        self.out
    }
}

impl<I2C: I2c> Mcp23017<I2C> {
    /// Configure a set of pins from `(pin, flags)` entries.
    ///
    /// Entries are independent of each other and of their order; flags only
    /// ever OR into the driver's masks, so repeated calls accumulate and
    /// never undo earlier configuration.  The pull-up and interrupt
    /// registers, however, are rewritten from this call's entries alone —
    /// callers configuring pins incrementally must carry those flags along
    /// themselves.  Pin numbers above 15 are skipped.
    ///
    /// A pin flagged both [`PinFlags::INPUT`] and [`PinFlags::OUTPUT`] is
    /// treated purely as input.
    ///
    /// With `update_chip` the accumulated state is pushed to the chip as
    /// five register pairs (low byte first): direction, interrupt-enable,
    /// interrupt default value, default-compare enable and pull-up.  There
    /// is no rollback if one of the later writes fails.
    pub fn configure_pins(
        &mut self,
        pinout: &[(u8, PinFlags)],
        update_chip: bool,
    ) -> Result<(), I2C::Error> {
        let mut pull: u16 = 0x0000;
        let mut int_en: u16 = 0x0000;
        let mut def_val: u16 = 0x0000;
        let mut def_cmp: u16 = 0x0000;

        for &(pin, flags) in pinout {
            if pin > 15 {
                continue;
            }
            let bit = 1u16 << pin;

            if flags.contains(PinFlags::ACTIVE_LOW) {
                self.active_low |= bit;
            }

            if flags.contains(PinFlags::INPUT) {
                self.input_mask |= bit;

                if flags.contains(PinFlags::PULL_UP) {
                    pull |= bit;
                }
                if flags.intersects(PinFlags::RISING_INTERRUPT | PinFlags::FALLING_INTERRUPT) {
                    int_en |= bit;
                    if !flags.contains(PinFlags::RISING_INTERRUPT | PinFlags::FALLING_INTERRUPT) {
                        // Single-edge triggering compares against a stored
                        // default: the default represents the idle level, so
                        // for a falling edge it is "high" and the incoming
                        // low level raises the mismatch interrupt.  With
                        // both edges requested the chip compares against the
                        // previous value instead.
                        def_cmp |= bit;
                        if flags.contains(PinFlags::FALLING_INTERRUPT) {
                            def_val |= bit;
                        }
                    }
                }
            } else if flags.contains(PinFlags::OUTPUT) {
                self.direction &= !bit;
                self.output_mask |= bit;
            }
        }

        if update_chip {
            self.i2c
                .write_reg(self.addr, Regs::IODIRA, (self.direction & 0xFF) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::IODIRB, (self.direction >> 8) as u8)?;

            self.i2c
                .write_reg(self.addr, Regs::GPINTENA, (int_en & 0xFF) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::GPINTENB, (int_en >> 8) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::DEFVALA, (def_val & 0xFF) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::DEFVALB, (def_val >> 8) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::INTCONA, (def_cmp & 0xFF) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::INTCONB, (def_cmp >> 8) as u8)?;

            self.i2c
                .write_reg(self.addr, Regs::GPPUA, (pull & 0xFF) as u8)?;
            self.i2c
                .write_reg(self.addr, Regs::GPPUB, (pull >> 8) as u8)?;
        }

        Ok(())
    }

    /// Read the logic level of all input pins selected by `pins`.
    ///
    /// Only the port halves with requested bits are fetched from the chip;
    /// a mask staying within one port costs a single bus transaction.  Pins
    /// configured active-low report the inverted level.  Bits of pins not
    /// configured as inputs are always 0.  Pass `0xffff` to read every
    /// input.
    pub fn digital_read(&mut self, pins: u16) -> Result<u16, I2C::Error> {
        let mut result = 0u16;
        let readable = pins & self.input_mask;
        if pins & 0x00FF != 0 {
            let b = self.i2c.read_reg(self.addr, Regs::GPIOA)? ^ (self.active_low & 0xFF) as u8;
            result = (b & (readable & 0xFF) as u8) as u16;
        }
        if pins & 0xFF00 != 0 {
            let b = self.i2c.read_reg(self.addr, Regs::GPIOB)? ^ (self.active_low >> 8) as u8;
            result |= ((b & (readable >> 8) as u8) as u16) << 8;
        }
        Ok(result)
    }

    /// Read the state of a single input pin.
    ///
    /// Returns `Ok(None)` if the pin is not configured as an input, so a
    /// scan over many pins keeps running past misconfigured ones.
    pub fn digital_read_pin(&mut self, pin: u8) -> Result<Option<bool>, I2C::Error> {
        if pin > 15 {
            return Ok(None);
        }
        let bit = 1u16 << pin;
        if self.direction & bit == 0 {
            return Ok(None);
        }
        let b = if pin < 8 {
            self.i2c.read_reg(self.addr, Regs::GPIOA)? ^ (self.active_low & 0xFF) as u8
        } else {
            self.i2c.read_reg(self.addr, Regs::GPIOB)? ^ (self.active_low >> 8) as u8
        };
        Ok(Some(b & (1 << (pin & 0x07)) != 0))
    }

    /// Write the logic levels from `values` to all output pins selected by
    /// `pins`.
    ///
    /// The mask is restricted to pins configured as outputs; all other
    /// output pins keep their cached level, so partial writes never clobber
    /// earlier ones.  Active-low pins get their level inverted on the wire.
    /// Only the touched port halves are written.
    pub fn digital_write(&mut self, pins: u16, values: u16) -> Result<(), I2C::Error> {
        let pins = pins & self.output_mask;
        let values = (self.out & !pins) | (values & pins);
        if pins & 0x00FF != 0 {
            self.i2c.write_reg(
                self.addr,
                Regs::GPIOA,
                (values & 0xFF) as u8 ^ (self.active_low & 0xFF) as u8,
            )?;
        }
        if pins & 0xFF00 != 0 {
            self.i2c.write_reg(
                self.addr,
                Regs::GPIOB,
                (values >> 8) as u8 ^ (self.active_low >> 8) as u8,
            )?;
        }
        self.out = values;
        Ok(())
    }

    /// Write a single output pin.
    ///
    /// Returns `Ok(None)` if the pin is not configured as an output;
    /// otherwise the written value is echoed back.
    pub fn digital_write_pin(&mut self, pin: u8, value: bool) -> Result<Option<bool>, I2C::Error> {
        if pin > 15 {
            return Ok(None);
        }
        let bit = 1u16 << pin;
        if self.output_mask & bit == 0 {
            return Ok(None);
        }
        let mut values = (self.out & !bit) & self.output_mask;
        if value {
            values |= bit;
        }
        if pin < 8 {
            self.i2c.write_reg(
                self.addr,
                Regs::GPIOA,
                (values & 0xFF) as u8 ^ (self.active_low & 0xFF) as u8,
            )?;
        } else {
            self.i2c.write_reg(
                self.addr,
                Regs::GPIOB,
                (values >> 8) as u8 ^ (self.active_low >> 8) as u8,
            )?;
        }
        self.out = values;
        Ok(Some(value))
    }
}

impl<I2C: I2c> GpioExpander for Mcp23017<I2C> {
    type Error = I2C::Error;

    fn digital_read(&mut self, pins: u16) -> Result<u16, Self::Error> {
        Mcp23017::digital_read(self, pins)
    }

    fn digital_write(&mut self, pins: u16, values: u16) -> Result<(), Self::Error> {
        Mcp23017::digital_write(self, pins, values)
    }
}
