//! Bus word layout.
//!
//! The device takes one 16-bit word per select cycle: two command bits on top
//! that must stay zero for a plain DAC update, followed by the 14-bit code.

use core::fmt;

/// Data bits of a frame.
pub const DATA_MASK: u16 = 0x3FFF;

/// A 16-bit word ready for the bus. The top two bits are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Frame(u16);

impl Frame {
    /// Frames `code`, dropping anything above the 14 data bits.
    #[inline]
    pub const fn new(code: u16) -> Self {
        Self(code & DATA_MASK)
    }

    #[inline]
    pub const fn word(self) -> u16 {
        self.0
    }

    /// Bytes in transmit order (MSB first).
    #[inline]
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Frame {
    #[inline]
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frame({=u16:#06x})", self.0);
    }
}
