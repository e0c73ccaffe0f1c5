//! Startup configuration errors.
//!
//! The conversion and playback paths never fail; these errors can only come
//! out of building a [`GeneratorConfig`](crate::GeneratorConfig) or bringing
//! up the bus.

use core::fmt;

use hal::HalError;

/// Reasons a generator cannot be started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Bit width outside `1..=14`.
    InvalidResolution(u8),
    /// Reference magnitude is not a finite positive number.
    InvalidReference(f32),
    /// Waveform table with no samples.
    EmptyTable,
    /// Requested bus clock of 0 Hz.
    InvalidClock,
    /// The bus or select line rejected its configuration.
    Bus(HalError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResolution(bits) => {
                write!(f, "resolution of {} bits is outside 1..=14", bits)
            }
            ConfigError::InvalidReference(vref) => {
                write!(f, "reference magnitude {} V is not usable", vref)
            }
            ConfigError::EmptyTable => write!(f, "waveform table has no samples"),
            ConfigError::InvalidClock => write!(f, "bus clock must be non-zero"),
            ConfigError::Bus(err) => write!(f, "bus setup failed: {}", err),
        }
    }
}

impl From<HalError> for ConfigError {
    fn from(err: HalError) -> Self {
        ConfigError::Bus(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Bus(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::InvalidResolution(bits) => {
                defmt::write!(fmt, "InvalidResolution({})", bits)
            }
            ConfigError::InvalidReference(vref) => {
                defmt::write!(fmt, "InvalidReference({})", vref)
            }
            ConfigError::EmptyTable => defmt::write!(fmt, "EmptyTable"),
            ConfigError::InvalidClock => defmt::write!(fmt, "InvalidClock"),
            ConfigError::Bus(err) => defmt::write!(fmt, "Bus({})", err),
        }
    }
}
