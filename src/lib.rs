//! Mask-based drivers for I2C GPIO expander chips.
//!
//! Supported devices:
//!
//! - [`Mcp23017`]: `MCP23017` 16-Bit I/O Expander with Serial Interface
//! - [`Pcf8574`]: `PCF8574` Remote 8-bit I/O expander for I2C-bus
//!
//! Pins are addressed through bit masks instead of individual pin objects:
//! bit N of a mask selects pin N.  This keeps batch operations cheap — one
//! call touching eight pins of a port costs a single bus transaction.  Both
//! drivers implement the [`GpioExpander`] trait for code that only needs
//! plain masked reads and writes.
//!
//! ## Example
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use gpio_expander::{pin_mask, Mcp23017, PinFlags};
//!
//! let mut expander = Mcp23017::new(i2c, false, false, false);
//!
//! // Button on GPA0, LED on GPB0.
//! expander
//!     .configure_pins(
//!         &[
//!             (0, PinFlags::INPUT | PinFlags::PULL_UP | PinFlags::ACTIVE_LOW),
//!             (8, PinFlags::OUTPUT),
//!         ],
//!         true,
//!     )
//!     .unwrap();
//!
//! let pressed = expander.digital_read(pin_mask(&[0])).unwrap() != 0;
//! if pressed {
//!     expander.digital_write(pin_mask(&[8]), pin_mask(&[8])).unwrap();
//! }
//! ```
#![cfg_attr(not(test), no_std)]

mod bus;
mod common;
pub mod dev;

pub use common::pin_mask;
pub use common::GpioExpander;
pub use common::PinFlags;

pub(crate) use bus::I2cExt;

pub use dev::mcp23017::Mcp23017;
pub use dev::pcf8574::Pcf8574;
