//! Values written to the sensor at the end of initialization.

/// Configuration applied by [`crate::Cap1188::begin_with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Multiple Touch Configuration register. `0` lets every channel report
    /// simultaneous touches.
    pub multi_touch_block: u8,
    /// Sensor Input LED Linking register. One bit per channel, `1` makes the
    /// LED follow its touch input.
    pub led_link: u8,
    /// Standby Configuration register. `0x30` shortens the standby cycle
    /// time from the power-on default.
    pub standby_config: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multi_touch_block: 0x00,
            led_link: 0xFF,
            standby_config: 0x30,
        }
    }
}
