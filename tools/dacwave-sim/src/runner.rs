//! Bounded drive loop against the simulated bus.
//!
//! The firmware loop never returns; here every iteration is a single
//! [`Generator::step_once`] so runs can be counted or interrupted, and the
//! bus trace is checked and flushed after each step.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use dacwave::{
    max_sample_rate, sine_frequency, Generator, OutputDriver, PatternMode, DEFAULT_TABLE_LEN,
};
use dacwave_posix::{BusProbe, PosixPort, SimSelectLine, SimSpi};

use crate::options::Opts;
use crate::report::{Reporter, Summary};

type SimGenerator = Generator<OutputDriver<SimSpi, SimSelectLine>, DEFAULT_TABLE_LEN>;

/// Stop request shared with a signal handler.
#[derive(Debug, Clone, Default)]
pub struct Stop(Arc<AtomicBool>);

impl Stop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs the configured pattern for `opts.steps` steps, or until `stop` is
/// requested when `opts.steps` is 0, writing frames and the summary to `out`.
pub fn run<W: Write>(opts: &Opts, out: W, stop: &Stop) -> Result<Summary> {
    let config = opts.generator_config()?;
    let port = PosixPort::for_config(&config)
        .with_max_clock(opts.max_clock_hz)
        .with_fault_every(opts.fault_every.unwrap_or(0));

    let (spi, select) = port.bus();
    let mut generator: SimGenerator = Generator::with_bus(config.clone(), spi, select)
        .context("bringing up the simulated bus")?;
    let mut reporter = Reporter::new(out, opts.json, config.bits, config.vref);

    if config.mode == PatternMode::QuickChange {
        log::debug!("stepping quick-change one toggle at a time");
    }
    if opts.steps == 0 {
        log::info!("running until interrupted");
    }

    let mut delivered = 0u64;
    while opts.steps == 0 || generator.steps() < opts.steps {
        if stop.requested() {
            log::info!("stopped after {} steps", generator.steps());
            break;
        }
        generator.step_once();
        delivered += drain(port.probe(), &mut reporter)?;
    }

    let stats = generator.sink().stats();
    let clock_hz = generator.sink().clock_hz();
    let summary = Summary {
        mode: config.mode.to_string(),
        steps: generator.steps(),
        frames: stats.frames,
        faults: stats.faults,
        delivered,
        clock_hz,
        max_sample_rate: max_sample_rate(clock_hz),
        sine_hz: (config.mode == PatternMode::SineWave)
            .then(|| sine_frequency(clock_hz, DEFAULT_TABLE_LEN)),
    };

    reporter.summary(&summary)?;
    reporter.into_inner().flush()?;
    Ok(summary)
}

/// Checks and reports everything on the bus since the last call.
fn drain<W: Write>(probe: &BusProbe, reporter: &mut Reporter<W>) -> Result<u64> {
    let count = probe.check_framing().context("bus framing check failed")?;
    for word in probe.frames() {
        reporter.frame(word)?;
    }
    probe.clear();
    Ok(count as u64)
}
