//! A shared I2C bus device.

use alloc::rc::Rc;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, rwlock::RwLock};
use embedded_hal::i2c::{ErrorType, Operation, SevenBitAddress};
use embedded_hal_async::i2c::I2c;

/// `RwLock`-based shared bus [`I2c`] implementation.
///
/// Every clone of the `Rc` handed to [`RwLockI2cDevice::new`] yields another
/// device on the same bus. The lock is held for the whole transaction, so a
/// combined write-then-read is never split by another device's traffic.
pub struct RwLockI2cDevice<BUS> {
    bus: Rc<RwLock<CriticalSectionRawMutex, BUS>>,
}

impl<BUS> RwLockI2cDevice<BUS>
where
    BUS: I2c<SevenBitAddress>,
{
    /// Create a new [`RwLockI2cDevice`].
    pub fn new(bus: Rc<RwLock<CriticalSectionRawMutex, BUS>>) -> Self {
        Self { bus }
    }
}

impl<BUS> ErrorType for RwLockI2cDevice<BUS>
where
    BUS: I2c<SevenBitAddress>,
{
    type Error = BUS::Error;
}

impl<BUS> I2c<SevenBitAddress> for RwLockI2cDevice<BUS>
where
    BUS: I2c<SevenBitAddress>,
{
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.write().await;
        let result = bus.transaction(address, operations).await;
        if let Err(err) = &result {
            log::warn!("I2C transaction with 0x{address:02X} failed: {err:?}");
        }
        result
    }
}
