//! Hardware Abstraction Layer (HAL) for the dacwave drivers
//!
//! This crate provides vendor-agnostic traits for the two peripherals a
//! serial DAC needs: a write-only SPI master and a digital output used as the
//! device-select line. Vendor ports implement the traits directly; boards that
//! already have an `embedded-hal` 1.0 driver can wrap it with the adapters in
//! [`embedded`] (feature `embedded-hal`).

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod error;
pub mod gpio;
pub mod spi;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

// Re-export commonly used types
pub use error::{HalError, HalResult, TransferFault};
pub use gpio::{GpioPin, Level, PinMode};
pub use spi::{BitOrder, SpiConfig, SpiMaster, SpiMode};
