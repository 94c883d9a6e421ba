//! Chip-select framed SPI devices built on top of an `SpiBus`.
//!
//! `RwLockDevice` shares one bus between several drivers; each device manages
//! its own Chip Select (CS) pin, so only one device talks on the bus at a
//! time. `ExclusiveDevice` owns its bus outright, which is the usual setup for
//! a bit-banged bus dedicated to a single chip.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, rwlock::RwLock};

use alloc::rc::Rc;
use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Error, ErrorKind};
use embedded_hal::spi::{ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::{SpiBus, SpiDevice};

/// A `RwLock`-based shared bus [`SpiDevice`] implementation.
///
/// Each `RwLockDevice` instance manages its own Chip Select (CS) pin and
/// holds the bus lock for the whole transaction.
pub struct RwLockDevice<BUS, CS, D> {
    bus: Rc<RwLock<CriticalSectionRawMutex, BUS>>,
    cs: CS,
    delay: D,
}

impl<BUS, CS, D> RwLockDevice<BUS, CS, D>
where
    CS: OutputPin,
{
    /// Creates a new `RwLockDevice`, releasing the CS line.
    ///
    /// # Arguments
    ///
    /// * `bus` - An `Rc<RwLock<...>>` wrapped SPI bus instance.
    /// * `cs` - The Chip Select pin for this device.
    /// * `delay` - A delay provider that implements `DelayNs`.
    #[inline]
    pub fn new(
        bus: Rc<RwLock<CriticalSectionRawMutex, BUS>>,
        mut cs: CS,
        delay: D,
    ) -> Result<Self, CS::Error> {
        cs.set_high()?;
        Ok(Self { bus, cs, delay })
    }
}

impl<BUS, CS, D> ErrorType for RwLockDevice<BUS, CS, D>
where
    BUS: ErrorType,
    CS: OutputPin,
{
    type Error = DeviceError<BUS::Error, CS::Error>;
}

impl<BUS, CS, D> SpiDevice<u8> for RwLockDevice<BUS, CS, D>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    /// Performs an SPI transaction.
    ///
    /// This method acquires a write lock on the shared SPI bus, asserts the
    /// Chip Select pin, executes the provided operations, and then de-asserts
    /// the CS pin.
    #[inline]
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let bus = &mut *self.bus.write().await;

        let result = transaction(operations, bus, &mut self.delay, &mut self.cs).await;

        if let Err(err) = &result {
            log::warn!("Error communicating with the device: {err:?}");
        }

        result
    }
}

/// An [`SpiDevice`] that owns its bus.
pub struct ExclusiveDevice<BUS, CS, D> {
    bus: BUS,
    cs: CS,
    delay: D,
}

impl<BUS, CS, D> ExclusiveDevice<BUS, CS, D>
where
    CS: OutputPin,
{
    /// Creates a new `ExclusiveDevice`, releasing the CS line.
    #[inline]
    pub fn new(bus: BUS, mut cs: CS, delay: D) -> Result<Self, CS::Error> {
        cs.set_high()?;
        Ok(Self { bus, cs, delay })
    }
}

impl<BUS, CS, D> ErrorType for ExclusiveDevice<BUS, CS, D>
where
    BUS: ErrorType,
    CS: OutputPin,
{
    type Error = DeviceError<BUS::Error, CS::Error>;
}

impl<BUS, CS, D> SpiDevice<u8> for ExclusiveDevice<BUS, CS, D>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    #[inline]
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let result = transaction(operations, &mut self.bus, &mut self.delay, &mut self.cs).await;

        if let Err(err) = &result {
            log::warn!("Error communicating with the device: {err:?}");
        }

        result
    }
}

/// A common implementation to perform a transaction against the device.
///
/// This function handles the low-level details of an SPI transaction, including
/// asserting/de-asserting the CS pin and processing each operation.
#[inline]
pub async fn transaction<Word, BUS, CS, D>(
    operations: &mut [Operation<'_, Word>],
    bus: &mut BUS,
    delay: &mut D,
    cs: &mut CS,
) -> Result<(), DeviceError<BUS::Error, CS::Error>>
where
    BUS: SpiBus<Word> + ErrorType,
    CS: OutputPin,
    D: DelayNs,
    Word: Copy + 'static,
{
    cs.set_low().map_err(DeviceError::Cs)?;

    let op_res = {
        let mut result = Ok(());
        for op in operations {
            if let Err(err) = process_op::<BUS, D, Word>(bus, delay, op).await {
                log::warn!("Error communicating with the SPI device.");
                result = Err(err);
                break;
            }
        }
        result
    };

    // On failure, it's important to still flush and deassert CS.
    let flush_res = bus.flush().await;
    let cs_res = cs.set_high();

    op_res.map_err(DeviceError::Spi)?;
    flush_res.map_err(DeviceError::Spi)?;
    cs_res.map_err(DeviceError::Cs)?;

    Ok(())
}

/// An error type for chip-select framed device operations.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DeviceError<BUS, CS> {
    /// An inner SPI bus operation failed.
    Spi(BUS),
    /// Asserting or deasserting the CS pin failed.
    Cs(CS),
}

impl<BUS, CS> Error for DeviceError<BUS, CS>
where
    BUS: Error + Debug,
    CS: Debug,
{
    #[inline]
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Spi(e) => e.kind(),
            Self::Cs(_) => ErrorKind::ChipSelectFault,
        }
    }
}

/// Processes a single SPI operation.
async fn process_op<BUS: SpiBus<Word> + ErrorType, D: DelayNs, Word: Copy + 'static>(
    bus: &mut BUS,
    delay: &mut D,
    op: &mut Operation<'_, Word>,
) -> Result<(), <BUS as ErrorType>::Error> {
    match op {
        Operation::Read(buf) => bus.read(buf).await,
        Operation::Write(buf) => bus.write(buf).await,
        Operation::Transfer(read, write) => bus.transfer(read, write).await,
        Operation::TransferInPlace(buf) => bus.transfer_in_place(buf).await,
        Operation::DelayNs(ns) => {
            bus.flush().await?;
            delay.delay_ns(*ns).await;
            Ok(())
        }
    }
}
