#![cfg_attr(not(test), no_std)]
#![doc = "Asynchronous bus primitives for embedded-hal: chip-select framed SPI devices, shared I2C devices and a bit-banged SPI bus."]

// Chip select lives in the device types, never in the bus, so the same
// `BitBangSpi` or hardware bus can back an exclusive or a shared device.

extern crate alloc;

pub mod bitbang;
pub mod i2c;
pub mod spi;

#[cfg(test)]
mod testing;
