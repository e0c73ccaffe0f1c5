use std::panic::{self, AssertUnwindSafe};

use crate::error::ConfigError;
use crate::mode::{
    max_sample_rate, sine_frequency, Generator, GeneratorConfig, PatternMode, Strategy,
};
use crate::pattern::{FrameSink, RampDirection};

fn config(mode: PatternMode, bits: u8) -> GeneratorConfig {
    GeneratorConfig::builder().mode(mode).bits(bits).build().unwrap()
}

#[test]
fn single_value_primes_once() {
    let mut generator: Generator<Vec<u16>> =
        Generator::new(GeneratorConfig::default(), Vec::new()).unwrap();

    assert!(!generator.is_started());
    for _ in 0..5 {
        generator.poll();
    }

    assert!(generator.is_started());
    assert_eq!(generator.steps(), 5);
    assert_eq!(generator.sink(), &vec![6192]);
}

#[test]
fn ramp_repeats_per_poll() {
    let cfg = config(
        PatternMode::FullRange {
            direction: RampDirection::Descending,
        },
        2,
    );
    let mut generator: Generator<Vec<u16>> = Generator::new(cfg, Vec::new()).unwrap();

    generator.poll();
    generator.poll();

    assert_eq!(generator.into_sink(), vec![3, 2, 1, 0, 3, 2, 1, 0]);
}

#[test]
fn sine_plays_table_in_order() {
    let cfg = config(PatternMode::SineWave, 14);
    let mut generator = Generator::<_, 16>::new(cfg, Vec::<u16>::new()).unwrap();

    for _ in 0..32 {
        generator.poll();
    }

    let table = match generator.strategy() {
        Strategy::SineWave(sine) => {
            assert_eq!(sine.cursor(), 0);
            sine.table().as_slice().to_vec()
        }
        other => panic!("unexpected strategy {other:?}"),
    };
    let out = generator.into_sink();
    assert_eq!(&out[..16], table.as_slice());
    assert_eq!(&out[16..], table.as_slice());
}

#[test]
fn quick_change_steps_are_bounded() {
    let cfg = config(PatternMode::QuickChange, 14);
    let mut generator: Generator<Vec<u16>> = Generator::new(cfg, Vec::new()).unwrap();

    for _ in 0..4 {
        generator.step_once();
    }

    assert_eq!(generator.into_sink(), vec![16383, 0, 16383, 0]);
}

/// Records codes and panics on the `limit`th one, so a loop that never
/// returns can still be observed.
struct Tripwire {
    sent: Vec<u16>,
    limit: usize,
}

impl FrameSink for Tripwire {
    fn send(&mut self, code: u16) {
        self.sent.push(code);
        if self.sent.len() == self.limit {
            panic!("tripwire after {} codes", self.limit);
        }
    }
}

#[test]
fn quick_change_poll_never_returns() {
    let cfg = config(PatternMode::QuickChange, 14);
    let sink = Tripwire {
        sent: Vec::new(),
        limit: 1000,
    };
    let mut generator: Generator<Tripwire> = Generator::new(cfg, sink).unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| generator.poll()));

    assert!(result.is_err(), "poll returned instead of toggling forever");
    let sent = &generator.sink().sent;
    assert_eq!(sent.len(), 1000);
    for (i, &code) in sent.iter().enumerate() {
        let expected = if i % 2 == 0 { 16383 } else { 0 };
        assert_eq!(code, expected, "code {i}");
    }
    // The exclusive loop bypasses the per-step path entirely.
    assert_eq!(generator.steps(), 0);
}

#[test]
fn ramp_poll_returns_after_one_sweep() {
    let cfg = config(
        PatternMode::FullRange {
            direction: RampDirection::Ascending,
        },
        3,
    );
    let sink = Tripwire {
        sent: Vec::new(),
        limit: usize::MAX,
    };
    let mut generator: Generator<Tripwire> = Generator::new(cfg, sink).unwrap();

    generator.poll();

    assert_eq!(generator.steps(), 1);
    assert_eq!(generator.sink().sent, (0..8).collect::<Vec<u16>>());
}

#[test]
fn empty_table_rejected_for_sine_only() {
    let sine = config(PatternMode::SineWave, 14);
    let err = Generator::<Vec<u16>, 0>::new(sine, Vec::new()).err();
    assert_eq!(err, Some(ConfigError::EmptyTable));

    let ramp = config(PatternMode::FullRange { direction: RampDirection::Ascending }, 4);
    assert!(Generator::<Vec<u16>, 0>::new(ramp, Vec::new()).is_ok());
}

#[test]
fn builder_defaults() {
    let cfg = GeneratorConfig::builder().build().unwrap();
    assert_eq!(cfg, GeneratorConfig::default());
    assert_eq!(cfg.mode, PatternMode::SingleValue { volts: -1.0 });
    assert_eq!(cfg.bits, 14);
    assert_eq!(cfg.vref, 4.096);
    assert_eq!(cfg.select_pin, None);

    let spi = cfg.spi_config();
    assert_eq!(spi.frequency, 20_000_000);
    assert_eq!(spi.frame_bits, 16);
}

#[test]
fn builder_rejects_bad_widths() {
    assert_eq!(
        GeneratorConfig::builder().bits(0).build(),
        Err(ConfigError::InvalidResolution(0))
    );
    assert_eq!(
        GeneratorConfig::builder().bits(15).build(),
        Err(ConfigError::InvalidResolution(15))
    );
    assert!(matches!(
        GeneratorConfig::builder().vref(0.0).build(),
        Err(ConfigError::InvalidReference(_))
    ));
    assert!(matches!(
        GeneratorConfig::builder().vref(-4.096).build(),
        Err(ConfigError::InvalidReference(_))
    ));
    assert!(matches!(
        GeneratorConfig::builder().vref(f32::NAN).build(),
        Err(ConfigError::InvalidReference(_))
    ));
    assert_eq!(
        GeneratorConfig::builder().clock_hz(0).build(),
        Err(ConfigError::InvalidClock)
    );
}

#[test]
fn throughput_estimates() {
    assert_eq!(max_sample_rate(16_000_000), 1_000_000);
    assert_eq!(sine_frequency(16_000_000, 100), 10_000.0);
    assert_eq!(sine_frequency(16_000_000, 0), 0.0);
}

#[test]
fn mode_names() {
    assert_eq!(PatternMode::SineWave.to_string(), "sine-wave");
    assert_eq!(PatternMode::QuickChange.name(), "quick-change");
    assert_eq!(
        PatternMode::SingleValue { volts: 1.5 }.to_string(),
        "single-value (1.5 V)"
    );
}
