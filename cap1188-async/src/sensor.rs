//! Core implementation of the CAP1188 driver.

use core::convert::Infallible;
use core::fmt::Debug;
use embedded_bus_async::bitbang::BitBangSpi;
use embedded_bus_async::spi::ExclusiveDevice;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use embedded_hal_async::spi::SpiDevice;
use heapless::Vec;

use crate::conf::Config;
use crate::err::CapError;
use crate::interface::{I2cInterface, Interface, SpiInterface};
use crate::registers::*;

/// The SPI device built by [`Cap1188::new_soft_spi`].
pub type SoftSpiDevice<SCK, MISO, MOSI, CS, D> =
    ExclusiveDevice<BitBangSpi<SCK, MISO, MOSI, D>, CS, D>;

type DriverError<IFACE, RST> =
    CapError<<IFACE as Interface>::Error, <RST as ErrorType>::Error>;

/// Stand-in for the reset pin when the board does not wire one.
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Contents of the three identity registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub product_id: u8,
    pub manufacturer_id: u8,
    pub revision: u8,
}

impl Identity {
    /// True for the part and revision this driver was written against.
    pub fn is_cap1188(&self) -> bool {
        self.product_id == PRODUCT_ID
            && self.manufacturer_id == MANUFACTURER_ID
            && self.revision == REVISION
    }
}

/// A CAP1188 8-channel capacitive touch sensor.
pub struct Cap1188<IFACE, RST, D> {
    iface: IFACE,
    rst: Option<RST>,
    delay: D,
}

impl<IFACE, RST, D> Cap1188<IFACE, RST, D> {
    /// Creates a driver on top of an already built transport.
    ///
    /// # Arguments
    ///
    /// * `iface` - The transport the registers are reached through.
    /// * `rst` - An optional output pin wired to the chip's RESET input.
    /// * `delay` - Used for the reset pulse.
    pub fn new(iface: IFACE, rst: Option<RST>, delay: D) -> Self {
        Self { iface, rst, delay }
    }

    /// Gives back the transport, the reset pin and the delay.
    pub fn release(self) -> (IFACE, Option<RST>, D) {
        (self.iface, self.rst, self.delay)
    }
}

impl<I2C, RST, D> Cap1188<I2cInterface<I2C>, RST, D>
where
    I2C: I2c<SevenBitAddress>,
{
    /// Creates a driver for a sensor on an I2C bus.
    ///
    /// The device address is bound in [`Cap1188::begin`].
    pub fn new_i2c(i2c: I2C, rst: Option<RST>, delay: D) -> Self {
        Self::new(I2cInterface::new(i2c), rst, delay)
    }
}

impl<SPI, RST, D> Cap1188<SpiInterface<SPI>, RST, D>
where
    SPI: SpiDevice,
{
    /// Creates a driver for a sensor behind a hardware SPI device.
    ///
    /// The device has to be configured for [`SPI_MODE`] at
    /// [`SPI_FREQUENCY_HZ`].
    pub fn new_spi(spi: SPI, rst: Option<RST>, delay: D) -> Self {
        Self::new(SpiInterface::new(spi), rst, delay)
    }
}

impl<SCK, MISO, MOSI, CS, RST, D, E>
    Cap1188<SpiInterface<SoftSpiDevice<SCK, MISO, MOSI, CS, D>>, RST, D>
where
    SCK: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    D: DelayNs + Clone,
    E: Debug,
{
    /// Creates a driver that bit-bangs SPI over four GPIO lines.
    ///
    /// SCK is parked low and CS released right away; pin failures at that
    /// point are the only errors construction can report.
    pub fn new_soft_spi(
        sck: SCK,
        miso: MISO,
        mosi: MOSI,
        cs: CS,
        rst: Option<RST>,
        delay: D,
    ) -> Result<Self, E> {
        let bus = BitBangSpi::new(sck, miso, mosi, delay.clone(), SPI_FREQUENCY_HZ)?;
        let spi = ExclusiveDevice::new(bus, cs, delay.clone())?;
        Ok(Self::new_spi(spi, rst, delay))
    }
}

impl<IFACE, RST, D> Cap1188<IFACE, RST, D>
where
    IFACE: Interface,
    RST: OutputPin,
    D: DelayNs,
{
    /// Initializes the sensor with the stock [`Config`].
    ///
    /// `address` is the I2C address; SPI transports ignore it.
    pub async fn begin(&mut self, address: u8) -> Result<(), DriverError<IFACE, RST>> {
        self.begin_with_config(address, Config::default()).await
    }

    /// Opens the bus, resets the chip, checks its identity and applies `config`.
    ///
    /// Nothing is written to the chip unless the identity check passes.
    pub async fn begin_with_config(
        &mut self,
        address: u8,
        config: Config,
    ) -> Result<(), DriverError<IFACE, RST>> {
        self.iface.open(address).await.map_err(|err| {
            log::warn!("Error opening the CAP1188 bus: {err:?}");
            CapError::Bus(err)
        })?;

        self.reset().await?;

        let identity = self.identity().await?;
        log::debug!("Product ID: 0x{:02X}", identity.product_id);
        log::debug!("Manuf. ID: 0x{:02X}", identity.manufacturer_id);
        log::debug!("Revision: 0x{:02X}", identity.revision);
        if !identity.is_cap1188() {
            log::warn!("Device does not identify as a CAP1188.");
            return Err(CapError::UnknownDevice);
        }

        self.write_register(Register::MultipleTouchConfig, config.multi_touch_block)
            .await?;
        self.write_register(Register::LedLink, config.led_link).await?;
        self.write_register(Register::StandbyConfig, config.standby_config).await?;

        log::debug!("CAP1188 initialized.");
        Ok(())
    }

    /// Pulses the reset pin low, high, low with [`RESET_PULSE_MS`] between
    /// stages. Does nothing without a reset pin.
    pub async fn reset(&mut self) -> Result<(), DriverError<IFACE, RST>> {
        if let Some(rst) = &mut self.rst {
            rst.set_low().map_err(CapError::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS).await;
            rst.set_high().map_err(CapError::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS).await;
            rst.set_low().map_err(CapError::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS).await;
        }
        Ok(())
    }

    /// Reads the product, manufacturer and revision registers.
    pub async fn identity(&mut self) -> Result<Identity, DriverError<IFACE, RST>> {
        Ok(Identity {
            product_id: self.read_register(Register::ProductId).await?,
            manufacturer_id: self.read_register(Register::ManufacturerId).await?,
            revision: self.read_register(Register::Revision).await?,
        })
    }

    /// Reads a single register.
    pub async fn read_register<R: Into<u8>>(
        &mut self,
        register: R,
    ) -> Result<u8, DriverError<IFACE, RST>> {
        let register = register.into();
        let value = self.iface.read_register(register).await.map_err(|err| {
            log::warn!("Error reading register 0x{register:02X}: {err:?}");
            CapError::Bus(err)
        })?;
        log::trace!("read 0x{register:02X} -> 0x{value:02X}");
        Ok(value)
    }

    /// Writes a single register.
    pub async fn write_register<R: Into<u8>>(
        &mut self,
        register: R,
        value: u8,
    ) -> Result<(), DriverError<IFACE, RST>> {
        let register = register.into();
        log::trace!("write 0x{register:02X} <- 0x{value:02X}");
        self.iface
            .write_register(register, value)
            .await
            .map_err(|err| {
                log::warn!("Error writing register 0x{register:02X}: {err:?}");
                CapError::Bus(err)
            })
    }

    /// Returns the Sensor Input Status byte, bit `n` set when channel `n + 1`
    /// is touched.
    ///
    /// Any touch also acknowledges the pending interrupt so the ALERT line
    /// deasserts.
    pub async fn touched(&mut self) -> Result<u8, DriverError<IFACE, RST>> {
        let status = self.read_register(Register::SensorInputStatus).await?;
        if status != 0 {
            self.clear_interrupt().await?;
        }
        Ok(status)
    }

    /// Lists the touched channels, numbered 1 to 8 like the board's pads.
    pub async fn touched_channels(&mut self) -> Result<Vec<u8, 8>, DriverError<IFACE, RST>> {
        let status = self.touched().await?;
        Ok((0..8u8)
            .filter(|bit| status & (1 << bit) != 0)
            .map(|bit| bit + 1)
            .collect())
    }

    /// Clears the INT bit of the Main Control register.
    pub async fn clear_interrupt(&mut self) -> Result<(), DriverError<IFACE, RST>> {
        let main = self.read_register(Register::Main).await?;
        self.write_register(Register::Main, main & !MAIN_INT).await
    }

    /// Sets the LED output polarity: `0` inverted (power-on default), `1`
    /// non-inverted.
    pub async fn led_polarity(&mut self, polarity: u8) -> Result<(), DriverError<IFACE, RST>> {
        self.write_register(Register::LedPolarity, polarity).await
    }
}
