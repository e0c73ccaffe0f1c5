//! Adapters for `embedded-hal` 1.0 drivers
//!
//! Board crates usually already own an `embedded_hal::spi::SpiBus` and an
//! `embedded_hal::digital::OutputPin`. These wrappers expose them through the
//! [`SpiMaster`] and [`GpioPin`] traits. Bus timing is fixed when the board
//! creates the bus, so [`EhSpi`] only checks that a requested configuration is
//! compatible with it.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{ErrorKind, Mode, Phase, Polarity, SpiBus};

use crate::error::{HalError, HalResult, TransferFault};
use crate::gpio::{GpioPin, Level, PinMode};
use crate::spi::{BitOrder, SpiConfig, SpiMaster, SpiMode};

impl From<ErrorKind> for TransferFault {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Overrun => TransferFault::Overrun,
            ErrorKind::ModeFault => TransferFault::ModeFault,
            ErrorKind::FrameFormat => TransferFault::FrameFormat,
            _ => TransferFault::Other,
        }
    }
}

impl From<SpiMode> for Mode {
    fn from(mode: SpiMode) -> Self {
        Mode {
            polarity: if mode.idle_high() {
                Polarity::IdleHigh
            } else {
                Polarity::IdleLow
            },
            phase: if mode.samples_on_first_edge() {
                Phase::CaptureOnFirstTransition
            } else {
                Phase::CaptureOnSecondTransition
            },
        }
    }
}

/// [`SpiMaster`] over an `embedded-hal` SPI bus.
pub struct EhSpi<B> {
    bus: B,
    mode: Mode,
    frequency: u32,
}

impl<B: SpiBus<u8>> EhSpi<B> {
    /// Wraps `bus`, which the board configured for `mode` at `frequency` Hz.
    pub fn new(bus: B, mode: Mode, frequency: u32) -> Self {
        Self {
            bus,
            mode,
            frequency,
        }
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: SpiBus<u8>> SpiMaster for EhSpi<B> {
    fn configure(&mut self, config: &SpiConfig) -> HalResult<u32> {
        // embedded-hal buses shift MSB first
        if config.bit_order != BitOrder::MsbFirst {
            return Err(HalError::NotSupported);
        }
        if Mode::from(config.mode) != self.mode {
            return Err(HalError::ConfigurationError);
        }
        Ok(self.frequency.min(config.frequency))
    }

    fn write(&mut self, data: &[u8]) -> HalResult<()> {
        self.bus.write(data).map_err(transfer_error)?;
        // The select line must not rise before the last bit is out.
        self.bus.flush().map_err(transfer_error)
    }
}

fn transfer_error<E: embedded_hal::spi::Error>(err: E) -> HalError {
    HalError::Transfer(err.kind().into())
}

/// [`GpioPin`] over an `embedded-hal` output pin.
pub struct EhPin<P> {
    pin: P,
    number: u32,
    level: Level,
}

impl<P: OutputPin> EhPin<P> {
    /// Wraps `pin`. `number` is only used for diagnostics.
    pub fn new(pin: P, number: u32) -> Self {
        Self {
            pin,
            number,
            level: Level::Low,
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> GpioPin for EhPin<P> {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        match mode {
            PinMode::Output => Ok(()),
            PinMode::OutputOpenDrain => Err(HalError::NotSupported),
        }
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        match level {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        }
        .map_err(|_| HalError::SelectLine)?;
        self.level = level;
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }

    fn pin_number(&self) -> u32 {
        self.number
    }
}
