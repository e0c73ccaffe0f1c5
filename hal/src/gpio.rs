//! GPIO output abstraction
//!
//! Only push-pull outputs are modelled; the DAC driver uses a single pin as an
//! active-low select line.

use crate::error::HalResult;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Output (push-pull)
    Output,
    /// Output (open-drain)
    OutputOpenDrain,
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// Returns the opposite level.
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Output pin trait
pub trait GpioPin {
    /// Configure pin mode
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()>;

    /// Drive the pin to `level`
    fn write(&mut self, level: Level) -> HalResult<()>;

    /// Last level written to the pin
    fn level(&self) -> Level;

    /// Toggle output
    fn toggle(&mut self) -> HalResult<()> {
        let next = self.level().inverted();
        self.write(next)
    }

    /// Get pin number
    fn pin_number(&self) -> u32;
}
