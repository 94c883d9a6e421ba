//! Recording fakes for the embedded-hal traits used by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    CsLow,
    CsHigh,
    Cs2Low,
    Cs2High,
    SckLow,
    SckHigh,
    MosiLow,
    MosiHigh,
    MisoSample,
    Byte(u8),
}

/// Shared, ordered log of everything the fakes observed.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Output pin that logs its transitions.
pub struct RecordingPin {
    recorder: Recorder,
    high: Event,
    low: Event,
}

impl RecordingPin {
    pub fn new(recorder: Recorder, high: Event, low: Event) -> Self {
        Self { recorder, high, low }
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.recorder.push(self.low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.recorder.push(self.high);
        Ok(())
    }
}

/// Input pin that plays back a fixed byte, MSB first, one bit per sample.
pub struct ScriptedInput {
    recorder: Recorder,
    byte: u8,
    sampled: u8,
}

impl ScriptedInput {
    pub fn new(recorder: Recorder, byte: u8) -> Self {
        Self {
            recorder,
            byte,
            sampled: 0,
        }
    }
}

impl ErrorType for ScriptedInput {
    type Error = Infallible;
}

impl InputPin for ScriptedInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.recorder.push(Event::MisoSample);
        let bit = 7 - (self.sampled % 8);
        self.sampled = self.sampled.wrapping_add(1);
        Ok(self.byte & (1 << bit) != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}
