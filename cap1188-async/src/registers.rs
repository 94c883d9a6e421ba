//! CAP1188 register map and wire-format constants.

/// Default 7-bit I2C address (ADDR_COMM pulled to VDD through the on-board resistor).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x29;

/// SPI clock the chip is driven at, for both hardware and software SPI.
pub const SPI_FREQUENCY_HZ: u32 = 2_000_000;
/// Clock polarity and phase expected by the chip.
pub const SPI_MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;

// --- SPI command bytes ---
pub(crate) const SPI_SET_ADDRESS: u8 = 0x7D;
pub(crate) const SPI_WRITE: u8 = 0x7E;
pub(crate) const SPI_READ: u8 = 0x7F;

// --- Identity ---
pub const PRODUCT_ID: u8 = 0x50;
pub const MANUFACTURER_ID: u8 = 0x5D;
pub const REVISION: u8 = 0x83;

/// INT bit of the Main Control register.
pub const MAIN_INT: u8 = 0x01;

/// Length of each of the three reset pulse stages.
pub const RESET_PULSE_MS: u32 = 100;

/// Registers used by this driver.
///
/// Any other register can still be reached by passing its raw address to
/// [`crate::Cap1188::read_register`] and [`crate::Cap1188::write_register`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Main Control: power state, bit 0 is the pending interrupt flag.
    Main = 0x00,
    /// Sensor Input Status: one bit per channel, 1 = touched.
    SensorInputStatus = 0x03,
    /// Multiple Touch Configuration.
    MultipleTouchConfig = 0x2A,
    /// Standby Configuration: averaging and cycle time while in standby.
    StandbyConfig = 0x41,
    /// Sensor Input LED Linking.
    LedLink = 0x72,
    /// LED Polarity.
    LedPolarity = 0x73,
    ProductId = 0xFD,
    ManufacturerId = 0xFE,
    Revision = 0xFF,
}

impl From<Register> for u8 {
    fn from(register: Register) -> Self {
        register as u8
    }
}
