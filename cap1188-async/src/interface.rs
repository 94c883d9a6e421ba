//! Transports the sensor's register set can be reached through.
//!
//! The driver picks one [`Interface`] at construction and never looks at the
//! wiring again. I2C uses a combined write-then-read per register read. SPI
//! needs two chip-select frames per access: the first one loads the address
//! pointer, the second one reads or writes through it.

use core::fmt::Debug;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use embedded_hal_async::spi::{Operation, SpiDevice};

use crate::registers::{DEFAULT_I2C_ADDRESS, SPI_READ, SPI_SET_ADDRESS, SPI_WRITE};

/// Single-register access to the chip.
#[allow(async_fn_in_trait)]
pub trait Interface {
    type Error: Debug;

    /// Binds the transport and checks that something answers.
    ///
    /// `address` is only meaningful for addressed buses.
    async fn open(&mut self, address: u8) -> Result<(), Self::Error>;

    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

/// The chip on an I2C bus.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c<SevenBitAddress>> I2cInterface<I2C> {
    /// Wraps `i2c`; the address is bound later by [`Interface::open`].
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Returns the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c<SevenBitAddress>> Interface for I2cInterface<I2C> {
    type Error = I2C::Error;

    async fn open(&mut self, address: u8) -> Result<(), Self::Error> {
        self.address = address;
        // Address-only write, acked only if the device is present.
        self.i2c.write(self.address, &[]).await
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .await?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value]).await
    }
}

/// The chip behind an SPI device that owns its chip-select line.
///
/// The bus must run in [`crate::SPI_MODE`], MSB first, at up to
/// [`crate::SPI_FREQUENCY_HZ`].
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> SpiInterface<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Returns the underlying device.
    pub fn release(self) -> SPI {
        self.spi
    }

    /// First frame of every access: load the register pointer.
    async fn set_address(&mut self, register: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[SPI_SET_ADDRESS, register]).await
    }
}

impl<SPI: SpiDevice> Interface for SpiInterface<SPI> {
    type Error = SPI::Error;

    async fn open(&mut self, _address: u8) -> Result<(), Self::Error> {
        // CS is released by the device itself; there is nothing to probe
        // before the identity registers are read.
        Ok(())
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.set_address(register).await?;
        let mut buf = [0u8; 1];
        self.spi
            .transaction(&mut [Operation::Write(&[SPI_READ]), Operation::Read(&mut buf)])
            .await?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.set_address(register).await?;
        self.spi.write(&[SPI_WRITE, value]).await
    }
}
