//! Command-line options.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dacwave::{GeneratorConfig, PatternMode, RampDirection, DEFAULT_VOLTS};
use dacwave_posix::DEFAULT_MAX_CLOCK_HZ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Hold one voltage
    Single,
    /// Sweep every code
    Ramp,
    /// Play the sine table
    Sine,
    /// Toggle between the extremes
    Quick,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Drive a dacwave pattern into a simulated DAC bus")]
pub struct Opts {
    /// Pattern to run; overrides the config file
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Output voltage for the single-value pattern
    #[arg(long, allow_hyphen_values = true, value_name = "VOLTS")]
    pub volts: Option<f32>,

    /// Sweep the ramp from full scale down
    #[arg(long)]
    pub descending: bool,

    /// Code width in bits
    #[arg(long, value_name = "BITS")]
    pub bits: Option<u8>,

    /// Reference magnitude in volts
    #[arg(long, value_name = "VOLTS")]
    pub vref: Option<f32>,

    /// Requested bus clock in Hz
    #[arg(long = "clock", value_name = "HZ")]
    pub clock_hz: Option<u32>,

    /// Fastest clock the simulated peripheral grants
    #[arg(long = "max-clock", default_value_t = DEFAULT_MAX_CLOCK_HZ, value_name = "HZ")]
    pub max_clock_hz: u32,

    /// Select line pin number
    #[arg(long, value_name = "PIN")]
    pub select_pin: Option<u32>,

    /// Make every Nth transfer fail
    #[arg(long, value_name = "N")]
    pub fault_every: Option<u64>,

    /// Pattern steps to run; 0 runs until Ctrl-C
    #[arg(long, default_value_t = 1)]
    pub steps: u64,

    /// JSON generator config to start from
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print frames and the summary as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}

impl Opts {
    /// The generator config these options describe, validated.
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => GeneratorConfig::default(),
        };

        match self.mode {
            Some(mode) => config.mode = self.pattern_mode(mode),
            None => self.refine(&mut config.mode),
        }
        for flag in self.ignored_flags(&config.mode) {
            log::warn!("{} has no effect in {} mode", flag, config.mode.name());
        }
        if let Some(bits) = self.bits {
            config.bits = bits;
        }
        if let Some(vref) = self.vref {
            config.vref = vref;
        }
        if let Some(clock_hz) = self.clock_hz {
            config.clock_hz = clock_hz;
        }
        if self.select_pin.is_some() {
            config.select_pin = self.select_pin;
        }

        config.validate().context("invalid generator config")?;
        Ok(config)
    }

    /// Applies `--volts` and `--descending` to a mode taken from the config file.
    fn refine(&self, mode: &mut PatternMode) {
        match mode {
            PatternMode::SingleValue { volts } => {
                if let Some(requested) = self.volts {
                    *volts = requested;
                }
            }
            PatternMode::FullRange { direction } if self.descending => {
                *direction = RampDirection::Descending;
            }
            _ => {}
        }
    }

    /// Pattern-specific flags that were given but do not apply to `mode`.
    pub fn ignored_flags(&self, mode: &PatternMode) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.volts.is_some() && !matches!(mode, PatternMode::SingleValue { .. }) {
            ignored.push("--volts");
        }
        if self.descending && !matches!(mode, PatternMode::FullRange { .. }) {
            ignored.push("--descending");
        }
        ignored
    }

    fn pattern_mode(&self, mode: ModeArg) -> PatternMode {
        match mode {
            ModeArg::Single => PatternMode::SingleValue {
                volts: self.volts.unwrap_or(DEFAULT_VOLTS),
            },
            ModeArg::Ramp => PatternMode::FullRange {
                direction: if self.descending {
                    RampDirection::Descending
                } else {
                    RampDirection::Ascending
                },
            },
            ModeArg::Sine => PatternMode::SineWave,
            ModeArg::Quick => PatternMode::QuickChange,
        }
    }
}
