//! An asynchronous, `no_std` driver for the Microchip CAP1188 8-channel
//! capacitive touch sensor.
//!
//! The same [`Cap1188`] API works whether the chip is wired over I2C, a
//! hardware SPI device, or four plain GPIO lines (bit-banged SPI). The
//! transport is chosen once, by the constructor, and every operation after
//! [`Cap1188::begin`] is one or two register transactions.
//!
//! # Usage
//!
//! Any I2C peripheral implementing `embedded-hal-async::i2c::I2c` and a delay
//! implementing `embedded-hal-async::delay::DelayNs` will do.
//!
//! ```ignore
//! use cap1188_async::{Cap1188, NoPin, DEFAULT_I2C_ADDRESS};
//!
//! let mut sensor = Cap1188::new_i2c(i2c, None::<NoPin>, delay);
//! sensor.begin(DEFAULT_I2C_ADDRESS).await?;
//!
//! loop {
//!     let status = sensor.touched().await?;
//!     for channel in 0..8 {
//!         if status & (1 << channel) != 0 {
//!             log::info!("C{} touched", channel + 1);
//!         }
//!     }
//!     Timer::after(Duration::from_millis(50)).await;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod conf;
pub mod err;
pub mod interface;
pub mod registers;

mod sensor;
pub use sensor::*;

pub use conf::Config;
pub use err::CapError;
pub use registers::{DEFAULT_I2C_ADDRESS, SPI_FREQUENCY_HZ, SPI_MODE};
