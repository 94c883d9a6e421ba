//! Error types for the CAP1188 driver.

use core::fmt::{self, Debug};

/// The main error type for the CAP1188 driver.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CapError<TBUSERR, TPINERR> {
    /// The I2C or SPI transport failed.
    Bus(TBUSERR),
    /// Driving the reset pin failed.
    Pin(TPINERR),
    /// The identity registers did not read back as a CAP1188.
    UnknownDevice,
}

impl<TBUSERR: Debug, TPINERR: Debug> Debug for CapError<TBUSERR, TPINERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "Bus({err:?})"),
            Self::Pin(err) => write!(f, "Pin({err:?})"),
            Self::UnknownDevice => write!(f, "UnknownDevice"),
        }
    }
}
