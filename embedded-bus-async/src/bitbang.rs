//! A software ("bit-banged") SPI bus driven through GPIO pins.
//!
//! Only SPI mode 0 with MSB-first bit order is supported: SCK idles low, MOSI
//! is driven while SCK is low and MISO is sampled on the rising edge.

use core::fmt::Debug;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Error, ErrorKind, ErrorType};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

/// Word clocked out while the caller only wants to read.
const READ_FILL: u8 = 0x00;

/// A GPIO pin failed while clocking a word.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PinFault<E>(pub E);

impl<E: Debug> Error for PinFault<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// An [`SpiBus`] that toggles SCK and MOSI by hand and samples MISO.
///
/// Chip select is not part of the bus; wrap it in one of the devices from
/// [`crate::spi`] to get framed transactions.
pub struct BitBangSpi<SCK, MISO, MOSI, D> {
    sck: SCK,
    miso: MISO,
    mosi: MOSI,
    delay: D,
    half_period_ns: u32,
}

impl<SCK, MISO, MOSI, D, E> BitBangSpi<SCK, MISO, MOSI, D>
where
    SCK: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Creates a new bus and parks SCK low.
    ///
    /// # Arguments
    ///
    /// * `frequency_hz` - Target clock rate; the real rate is lower by
    ///   whatever the pin toggling itself costs.
    pub fn new(
        mut sck: SCK,
        miso: MISO,
        mosi: MOSI,
        delay: D,
        frequency_hz: u32,
    ) -> Result<Self, E> {
        sck.set_low()?;
        let half_period_ns = (500_000_000 / frequency_hz.max(1)).max(1);
        Ok(Self {
            sck,
            miso,
            mosi,
            delay,
            half_period_ns,
        })
    }

    /// Shifts one byte out on MOSI while shifting one in from MISO.
    async fn transfer_byte(&mut self, out: u8) -> Result<u8, PinFault<E>> {
        let mut received = 0u8;
        for bit in (0..8).rev() {
            if out & (1 << bit) != 0 {
                self.mosi.set_high().map_err(PinFault)?;
            } else {
                self.mosi.set_low().map_err(PinFault)?;
            }
            self.delay.delay_ns(self.half_period_ns).await;

            self.sck.set_high().map_err(PinFault)?;
            if self.miso.is_high().map_err(PinFault)? {
                received |= 1 << bit;
            }
            self.delay.delay_ns(self.half_period_ns).await;

            self.sck.set_low().map_err(PinFault)?;
        }
        Ok(received)
    }
}

impl<SCK, MISO, MOSI, D, E> ErrorType for BitBangSpi<SCK, MISO, MOSI, D>
where
    SCK: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    E: Debug,
{
    type Error = PinFault<E>;
}

impl<SCK, MISO, MOSI, D, E> SpiBus<u8> for BitBangSpi<SCK, MISO, MOSI, D>
where
    SCK: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    D: DelayNs,
    E: Debug,
{
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(READ_FILL).await?;
        }
        Ok(())
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for word in words {
            self.transfer_byte(*word).await?;
        }
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let len = read.len().max(write.len());
        for i in 0..len {
            let out = write.get(i).copied().unwrap_or(READ_FILL);
            let received = self.transfer_byte(out).await?;
            if let Some(word) = read.get_mut(i) {
                *word = received;
            }
        }
        Ok(())
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(*word).await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        // Every bit is clocked synchronously, nothing is ever buffered.
        Ok(())
    }
}
