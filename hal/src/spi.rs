//! SPI (Serial Peripheral Interface) abstraction
//!
//! The DAC bus is write-only from the controller's side, so the master trait
//! only exposes configuration and transmit.

use crate::error::HalResult;

/// Frame width used by every supported device, in bits.
pub const FRAME_BITS: u8 = 16;

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock level while the bus is idle.
    pub const fn idle_high(self) -> bool {
        matches!(self, SpiMode::Mode2 | SpiMode::Mode3)
    }

    /// `true` when data is sampled on the first clock edge.
    pub const fn samples_on_first_edge(self) -> bool {
        matches!(self, SpiMode::Mode0 | SpiMode::Mode2)
    }
}

/// SPI bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiConfig {
    /// Requested clock rate in Hz. Ports may run slower.
    pub frequency: u32,
    pub mode: SpiMode,
    pub bit_order: BitOrder,
    /// Bits per transfer frame.
    pub frame_bits: u8,
}

impl SpiConfig {
    /// Copy of this configuration with the clock limited to `max_hz`.
    pub fn clamped(&self, max_hz: u32) -> Self {
        Self {
            frequency: self.frequency.min(max_hz),
            ..self.clone()
        }
    }

    /// Time needed to shift one frame, in nanoseconds.
    pub fn frame_time_ns(&self) -> u64 {
        if self.frequency == 0 {
            return u64::MAX;
        }
        (self.frame_bits as u64 * 1_000_000_000) / self.frequency as u64
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            frame_bits: FRAME_BITS,
        }
    }
}

/// SPI master trait
pub trait SpiMaster {
    /// Configure SPI parameters.
    ///
    /// Returns the clock rate the peripheral actually runs at, which may be
    /// lower than the requested one.
    fn configure(&mut self, config: &SpiConfig) -> HalResult<u32>;

    /// Write-only transfer
    fn write(&mut self, data: &[u8]) -> HalResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_mode0_msb_first() {
        let config = SpiConfig::default();
        assert_eq!(config.mode, SpiMode::Mode0);
        assert_eq!(config.bit_order, BitOrder::MsbFirst);
        assert_eq!(config.frame_bits, 16);
        assert!(!config.mode.idle_high());
        assert!(config.mode.samples_on_first_edge());
    }

    #[test]
    fn clamp_only_lowers_clock() {
        let config = SpiConfig {
            frequency: 50_000_000,
            ..SpiConfig::default()
        };
        assert_eq!(config.clamped(8_000_000).frequency, 8_000_000);
        assert_eq!(config.clamped(80_000_000).frequency, 50_000_000);
    }

    #[test]
    fn frame_time_at_16_mhz() {
        let config = SpiConfig {
            frequency: 16_000_000,
            ..SpiConfig::default()
        };
        assert_eq!(config.frame_time_ns(), 1_000);
    }
}
