//! Startup configuration and the drive loop.
//!
//! A [`GeneratorConfig`] names exactly one [`PatternMode`]. [`Generator`]
//! turns it into a [`Strategy`] once, primes it, and then calls it from an
//! endless loop. The mode cannot change after start-up.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hal::spi::FRAME_BITS;
use hal::{BitOrder, GpioPin, SpiConfig, SpiMaster, SpiMode};

use crate::code::{Resolution, DEFAULT_VREF, MAX_BITS};
use crate::driver::OutputDriver;
use crate::error::ConfigError;
use crate::pattern::{
    FrameSink, FullRange, Pattern, QuickChange, RampDirection, SinePlayback, SingleValue,
};

/// Sine table length used when the generator type does not name one.
pub const DEFAULT_TABLE_LEN: usize = 64;

/// Requested bus clock; ports clamp it to what they support.
pub const DEFAULT_CLOCK_HZ: u32 = 20_000_000;

/// Output of [`PatternMode::SingleValue`] in the default configuration.
pub const DEFAULT_VOLTS: f32 = -1.0;

/// The four output patterns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "pattern", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternMode {
    /// Hold one voltage.
    SingleValue { volts: f32 },
    /// Sweep every code.
    FullRange {
        #[cfg_attr(feature = "serde", serde(default))]
        direction: RampDirection,
    },
    /// Play the sine table.
    SineWave,
    /// Toggle between the extremes, never returning.
    QuickChange,
}

impl PatternMode {
    pub const fn name(&self) -> &'static str {
        match self {
            PatternMode::SingleValue { .. } => "single-value",
            PatternMode::FullRange { .. } => "full-range",
            PatternMode::SineWave => "sine-wave",
            PatternMode::QuickChange => "quick-change",
        }
    }
}

impl Default for PatternMode {
    fn default() -> Self {
        PatternMode::SingleValue {
            volts: DEFAULT_VOLTS,
        }
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternMode::SingleValue { volts } => write!(f, "single-value ({} V)", volts),
            PatternMode::FullRange { direction } => write!(f, "full-range ({:?})", direction),
            other => f.write_str(other.name()),
        }
    }
}

/// Everything decided before the drive loop starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub mode: PatternMode,
    /// Code width, `1..=14`.
    pub bits: u8,
    /// Reference magnitude in volts.
    pub vref: f32,
    /// Requested bus clock in Hz.
    pub clock_hz: u32,
    /// Select line; `None` picks the port's standard select pin.
    pub select_pin: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: PatternMode::default(),
            bits: MAX_BITS,
            vref: DEFAULT_VREF,
            clock_hz: DEFAULT_CLOCK_HZ,
            select_pin: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Rejects widths the converter would otherwise clamp silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bits == 0 || self.bits > MAX_BITS {
            return Err(ConfigError::InvalidResolution(self.bits));
        }
        if !self.vref.is_finite() || self.vref <= 0.0 {
            return Err(ConfigError::InvalidReference(self.vref));
        }
        if self.clock_hz == 0 {
            return Err(ConfigError::InvalidClock);
        }
        Ok(())
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.bits)
    }

    /// Bus settings for the device: mode 0, MSB first, 16-bit frames.
    pub fn spi_config(&self) -> SpiConfig {
        SpiConfig {
            frequency: self.clock_hz,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            frame_bits: FRAME_BITS,
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn mode(mut self, mode: PatternMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn single_value(self, volts: f32) -> Self {
        self.mode(PatternMode::SingleValue { volts })
    }

    pub fn full_range(self, direction: RampDirection) -> Self {
        self.mode(PatternMode::FullRange { direction })
    }

    pub fn sine_wave(self) -> Self {
        self.mode(PatternMode::SineWave)
    }

    pub fn quick_change(self) -> Self {
        self.mode(PatternMode::QuickChange)
    }

    pub fn bits(mut self, bits: u8) -> Self {
        self.config.bits = bits;
        self
    }

    pub fn vref(mut self, vref: f32) -> Self {
        self.config.vref = vref;
        self
    }

    pub fn clock_hz(mut self, clock_hz: u32) -> Self {
        self.config.clock_hz = clock_hz;
        self
    }

    pub fn select_pin(mut self, pin: u32) -> Self {
        self.config.select_pin = Some(pin);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The pattern instance selected by a [`PatternMode`].
#[derive(Debug, Clone)]
pub enum Strategy<const N: usize> {
    SingleValue(SingleValue),
    FullRange(FullRange),
    SineWave(SinePlayback<N>),
    QuickChange(QuickChange),
}

impl<const N: usize> Strategy<N> {
    /// Instantiates the configured pattern. The sine table is built here.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        let resolution = config.resolution();
        let strategy = match config.mode {
            PatternMode::SingleValue { volts } => {
                Strategy::SingleValue(SingleValue::new(resolution, config.vref, volts))
            }
            PatternMode::FullRange { direction } => {
                Strategy::FullRange(FullRange::new(resolution, direction))
            }
            PatternMode::SineWave => Strategy::SineWave(SinePlayback::new(resolution)?),
            PatternMode::QuickChange => Strategy::QuickChange(QuickChange::new(resolution)),
        };
        Ok(strategy)
    }
}

impl<const N: usize> Pattern for Strategy<N> {
    fn prime<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        match self {
            Strategy::SingleValue(p) => p.prime(sink),
            Strategy::FullRange(p) => p.prime(sink),
            Strategy::SineWave(p) => p.prime(sink),
            Strategy::QuickChange(p) => p.prime(sink),
        }
    }

    fn step<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        match self {
            Strategy::SingleValue(p) => p.step(sink),
            Strategy::FullRange(p) => p.step(sink),
            Strategy::SineWave(p) => p.step(sink),
            Strategy::QuickChange(p) => p.step(sink),
        }
    }

    fn is_exclusive(&self) -> bool {
        match self {
            Strategy::SingleValue(p) => p.is_exclusive(),
            Strategy::FullRange(p) => p.is_exclusive(),
            Strategy::SineWave(p) => p.is_exclusive(),
            Strategy::QuickChange(p) => p.is_exclusive(),
        }
    }
}

/// Runs one pattern into one sink.
///
/// `N` is the sine table length; it only matters for
/// [`PatternMode::SineWave`].
pub struct Generator<K, const N: usize = DEFAULT_TABLE_LEN> {
    sink: K,
    strategy: Strategy<N>,
    config: GeneratorConfig,
    started: bool,
    steps: u64,
}

impl<K: FrameSink, const N: usize> Generator<K, N> {
    /// Validates `config` and builds its pattern.
    pub fn new(config: GeneratorConfig, sink: K) -> Result<Self, ConfigError> {
        config.validate()?;
        let strategy = Strategy::from_config(&config)?;
        Ok(Self {
            sink,
            strategy,
            config,
            started: false,
            steps: 0,
        })
    }

    /// Primes the pattern. Only the first call has any effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        log::info!(
            "starting {} at {} bits, ±{} V, table of {}",
            self.config.mode,
            self.config.bits,
            self.config.vref,
            N
        );
        self.strategy.prime(&mut self.sink);
        self.started = true;
    }

    /// One iteration of the drive loop.
    ///
    /// For [`PatternMode::QuickChange`] this never returns.
    pub fn poll(&mut self) {
        self.start();
        if self.strategy.is_exclusive() {
            self.enter_exclusive();
        }
        self.step_once();
    }

    /// One pattern step regardless of exclusivity.
    ///
    /// Hosts that must stay bounded (simulators, tests) use this instead of
    /// [`poll`](Self::poll); for quick-change it emits a single toggle.
    pub fn step_once(&mut self) {
        self.start();
        self.strategy.step(&mut self.sink);
        self.steps += 1;
    }

    /// Primes the pattern and drives it until power-down.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.poll();
        }
    }

    fn enter_exclusive(&mut self) -> ! {
        log::info!("{} takes over the loop", self.config.mode);
        match &mut self.strategy {
            Strategy::QuickChange(toggle) => toggle.run(&mut self.sink),
            other => loop {
                other.step(&mut self.sink);
            },
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn strategy(&self) -> &Strategy<N> {
        &self.strategy
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Steps taken since start.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}

impl<S, P, const N: usize> Generator<OutputDriver<S, P>, N>
where
    S: SpiMaster,
    P: GpioPin,
{
    /// Brings up the bus for `config` and wraps it in a generator.
    pub fn with_bus(config: GeneratorConfig, spi: S, select: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let driver = OutputDriver::new(spi, select, &config.spi_config())?;
        Self::new(config, driver)
    }
}

/// Upper bound on samples per second at `clock_hz`: one 16-bit frame each.
pub fn max_sample_rate(clock_hz: u32) -> u32 {
    clock_hz / FRAME_BITS as u32
}

/// Upper bound on the sine output frequency for a table of `table_len`.
pub fn sine_frequency(clock_hz: u32, table_len: usize) -> f32 {
    if table_len == 0 {
        return 0.0;
    }
    max_sample_rate(clock_hz) as f32 / table_len as f32
}
