//! Host port for dacwave.
//!
//! Stands in for the DAC hardware on Linux and other POSIX hosts: the bus and
//! select line write into a shared [`BusProbe`] instead of a peripheral, and
//! [`logger`] routes the `log` output of the generator to the console.
//!
//! ```
//! use dacwave::{Generator, GeneratorConfig};
//! use dacwave_posix::PosixPort;
//!
//! let port = PosixPort::new();
//! let (spi, select) = port.bus();
//! let config = GeneratorConfig::builder().single_value(0.0).build().unwrap();
//! let mut generator: Generator<_> = Generator::with_bus(config, spi, select).unwrap();
//! generator.step_once();
//! assert_eq!(port.probe().frames(), vec![8192]);
//! ```

pub mod bus;
pub mod logger;

pub use bus::{
    BusEvent, BusProbe, FramingError, SimSelectLine, SimSpi, DEFAULT_MAX_CLOCK_HZ,
    DEFAULT_SELECT_PIN,
};

use dacwave::GeneratorConfig;

/// Factory for simulated buses that share one probe.
#[derive(Debug, Clone)]
pub struct PosixPort {
    probe: BusProbe,
    max_clock_hz: u32,
    select_pin: u32,
    fail_every: u64,
}

impl PosixPort {
    pub fn new() -> Self {
        Self {
            probe: BusProbe::new(),
            max_clock_hz: DEFAULT_MAX_CLOCK_HZ,
            select_pin: DEFAULT_SELECT_PIN,
            fail_every: 0,
        }
    }

    /// Port set up for `config`, honouring its select pin.
    pub fn for_config(config: &GeneratorConfig) -> Self {
        let port = Self::new();
        match config.select_pin {
            Some(pin) => port.with_select_pin(pin),
            None => port,
        }
    }

    pub fn with_max_clock(mut self, max_clock_hz: u32) -> Self {
        self.max_clock_hz = max_clock_hz;
        self
    }

    pub fn with_select_pin(mut self, pin: u32) -> Self {
        self.select_pin = pin;
        self
    }

    /// Every `n`th transfer of buses created afterwards times out.
    pub fn with_fault_every(mut self, n: u64) -> Self {
        self.fail_every = n;
        self
    }

    pub fn probe(&self) -> &BusProbe {
        &self.probe
    }

    /// A fresh bus and select line recording into this port's probe.
    pub fn bus(&self) -> (SimSpi, SimSelectLine) {
        let spi = SimSpi::new(self.probe.clone())
            .with_max_clock(self.max_clock_hz)
            .fail_every(self.fail_every);
        let select = SimSelectLine::with_pin(self.probe.clone(), self.select_pin);
        (spi, select)
    }
}

impl Default for PosixPort {
    fn default() -> Self {
        Self::new()
    }
}
