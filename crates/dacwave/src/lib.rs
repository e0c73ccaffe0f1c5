//! # dacwave
//!
//! Pattern generation for a bipolar 14-bit DAC on a write-only SPI bus.
//!
//! ## Module Overview
//! - [`code`]    – voltage to device-code conversion.
//! - [`table`]   – precomputed one-period sine lookup table.
//! - [`frame`]   – 16-bit bus word with the device command bits cleared.
//! - [`driver`]  – select-line framed transfers over a [`hal::SpiMaster`].
//! - [`pattern`] – the four output strategies behind the [`Pattern`] trait.
//! - [`mode`]    – startup configuration and the drive loop.
//!
//! Everything except the `Vec<u16>` frame sink builds without `std`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod code;
pub mod driver;
pub mod error;
pub mod frame;
pub mod mode;
pub mod pattern;
pub mod table;

pub use hal;

pub use code::{code_to_voltage, voltage_to_code, Resolution, DEFAULT_VREF, MAX_BITS};
pub use driver::{DriverStats, OutputDriver};
pub use error::ConfigError;
pub use frame::Frame;
pub use mode::{
    max_sample_rate, sine_frequency, Generator, GeneratorConfig, GeneratorConfigBuilder,
    PatternMode, Strategy, DEFAULT_CLOCK_HZ, DEFAULT_TABLE_LEN, DEFAULT_VOLTS,
};
pub use pattern::{
    FrameSink, FullRange, Pattern, QuickChange, RampDirection, SinePlayback, SingleValue,
};
pub use table::WaveTable;

#[cfg(test)]
mod tests;
