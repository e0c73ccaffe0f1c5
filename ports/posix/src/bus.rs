//! In-memory DAC bus.
//!
//! [`SimSpi`] and [`SimSelectLine`] share a [`BusProbe`] that records every
//! select edge and every decoded frame in order, so a trace can be checked
//! for correct framing after the fact.

use std::sync::Arc;

use hal::spi::FRAME_BITS;
use hal::{BitOrder, GpioPin, HalError, HalResult, Level, PinMode, SpiConfig, SpiMaster};
use parking_lot::Mutex;
use thiserror::Error;

/// Select pin used when the configuration does not name one.
pub const DEFAULT_SELECT_PIN: u32 = 10;

/// Fastest clock the simulated peripheral accepts.
pub const DEFAULT_MAX_CLOCK_HZ: u32 = 20_000_000;

const COMMAND_BITS: u16 = 0xC000;

/// One observable change on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// The select line was driven to this level.
    Select(Level),
    /// A complete frame was shifted out.
    Frame(u16),
}

/// Framing violations found by [`BusProbe::check_framing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("frame {index} ({word:#06x}) was sent with select high")]
    NotSelected { index: usize, word: u16 },
    #[error("frame {index} shares a select cycle with the frame before it")]
    SharedCycle { index: usize },
    #[error("frame {index} ({word:#06x}) has command bits set")]
    CommandBits { index: usize, word: u16 },
    #[error("select line was left low")]
    LeftSelected,
}

/// Shared, ordered record of bus activity.
#[derive(Debug, Clone, Default)]
pub struct BusProbe {
    events: Arc<Mutex<Vec<BusEvent>>>,
}

impl BusProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: BusEvent) {
        self.events.lock().push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<BusEvent> {
        self.events.lock().clone()
    }

    /// Frame words in transmit order.
    pub fn frames(&self) -> Vec<u16> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                BusEvent::Frame(word) => Some(*word),
                BusEvent::Select(_) => None,
            })
            .collect()
    }

    /// Level of the select line as of the last recorded edge. High before any.
    pub fn select_level(&self) -> Level {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                BusEvent::Select(level) => Some(*level),
                BusEvent::Frame(_) => None,
            })
            .unwrap_or(Level::High)
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Verifies that every frame sits alone in its own select-low window and
    /// carries no command bits. Returns the number of frames checked.
    pub fn check_framing(&self) -> Result<usize, FramingError> {
        let events = self.events.lock();
        let mut selected = false;
        let mut in_cycle = 0usize;
        let mut index = 0usize;

        for event in events.iter() {
            match *event {
                BusEvent::Select(Level::Low) => {
                    selected = true;
                    in_cycle = 0;
                }
                BusEvent::Select(Level::High) => selected = false,
                BusEvent::Frame(word) => {
                    if !selected {
                        return Err(FramingError::NotSelected { index, word });
                    }
                    if in_cycle > 0 {
                        return Err(FramingError::SharedCycle { index });
                    }
                    if word & COMMAND_BITS != 0 {
                        return Err(FramingError::CommandBits { index, word });
                    }
                    in_cycle += 1;
                    index += 1;
                }
            }
        }

        if selected {
            return Err(FramingError::LeftSelected);
        }
        Ok(index)
    }
}

/// SPI master that decodes each transfer into a [`BusEvent::Frame`].
#[derive(Debug)]
pub struct SimSpi {
    probe: BusProbe,
    max_clock_hz: u32,
    config: Option<SpiConfig>,
    fail_every: Option<u64>,
    writes: u64,
}

impl SimSpi {
    pub fn new(probe: BusProbe) -> Self {
        Self {
            probe,
            max_clock_hz: DEFAULT_MAX_CLOCK_HZ,
            config: None,
            fail_every: None,
            writes: 0,
        }
    }

    /// Limits the clock `configure` will grant.
    pub fn with_max_clock(mut self, max_clock_hz: u32) -> Self {
        self.max_clock_hz = max_clock_hz;
        self
    }

    /// Makes every `n`th write time out. `0` disables injection.
    pub fn fail_every(mut self, n: u64) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    /// Effective configuration, once configured.
    pub fn config(&self) -> Option<&SpiConfig> {
        self.config.as_ref()
    }

    pub fn probe(&self) -> &BusProbe {
        &self.probe
    }

    /// Transfers attempted, including injected failures.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl SpiMaster for SimSpi {
    fn configure(&mut self, config: &SpiConfig) -> HalResult<u32> {
        if config.frequency == 0 {
            return Err(HalError::InvalidParameter);
        }
        if config.frame_bits != FRAME_BITS {
            return Err(HalError::NotSupported);
        }

        let effective = config.clamped(self.max_clock_hz);
        log::debug!(
            "sim bus: {:?} {:?} at {} Hz",
            effective.mode,
            effective.bit_order,
            effective.frequency
        );
        let clock_hz = effective.frequency;
        self.config = Some(effective);
        Ok(clock_hz)
    }

    fn write(&mut self, data: &[u8]) -> HalResult<()> {
        let config = self.config.as_ref().ok_or(HalError::ConfigurationError)?;
        let bytes: [u8; 2] = data.try_into().map_err(|_| HalError::InvalidParameter)?;

        self.writes += 1;
        if let Some(n) = self.fail_every {
            if self.writes % n == 0 {
                return Err(HalError::Timeout);
            }
        }

        let word = match config.bit_order {
            BitOrder::MsbFirst => u16::from_be_bytes(bytes),
            BitOrder::LsbFirst => u16::from_be_bytes(bytes).reverse_bits(),
        };
        self.probe.record(BusEvent::Frame(word));
        Ok(())
    }
}

/// Select line that records every level it is driven to.
#[derive(Debug)]
pub struct SimSelectLine {
    probe: BusProbe,
    pin: u32,
    mode: Option<PinMode>,
    level: Level,
}

impl SimSelectLine {
    pub fn new(probe: BusProbe) -> Self {
        Self::with_pin(probe, DEFAULT_SELECT_PIN)
    }

    pub fn with_pin(probe: BusProbe, pin: u32) -> Self {
        Self {
            probe,
            pin,
            mode: None,
            level: Level::High,
        }
    }

    pub fn mode(&self) -> Option<PinMode> {
        self.mode
    }
}

impl GpioPin for SimSelectLine {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        self.mode = Some(mode);
        Ok(())
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        if self.mode.is_none() {
            return Err(HalError::ConfigurationError);
        }
        self.level = level;
        self.probe.record(BusEvent::Select(level));
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }

    fn pin_number(&self) -> u32 {
        self.pin
    }
}
