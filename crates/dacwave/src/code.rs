//! Voltage to device-code conversion.
//!
//! The DAC is bipolar: code 0 is `-vref`, the top code is `+vref` and
//! half-scale (`2^(bits-1)`) is 0 V. Conversion never fails; out-of-range
//! inputs are clamped and degenerate parameters yield code 0.

/// Widest resolution supported by the device.
pub const MAX_BITS: u8 = 14;

/// Reference magnitude of the stock board, in volts.
pub const DEFAULT_VREF: f32 = 4.096;

/// Converter resolution in bits, clamped to `0..=MAX_BITS`.
///
/// A width of zero is representable and means "no output": every
/// conversion yields code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Resolution(u8);

impl Resolution {
    /// Full device resolution.
    pub const FULL: Self = Self(MAX_BITS);

    /// Creates a resolution, silently limiting `bits` to [`MAX_BITS`].
    pub const fn new(bits: u8) -> Self {
        if bits > MAX_BITS {
            Self(MAX_BITS)
        } else {
            Self(bits)
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Largest code, `2^bits - 1`.
    pub const fn max_code(self) -> u16 {
        if self.0 == 0 {
            0
        } else {
            ((1u32 << self.0) - 1) as u16
        }
    }

    /// Code for 0 V, `2^(bits-1)`.
    pub const fn half_scale(self) -> u16 {
        if self.0 == 0 {
            0
        } else {
            1 << (self.0 - 1)
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<u8> for Resolution {
    #[inline]
    fn from(bits: u8) -> Self {
        Self::new(bits)
    }
}

/// Sign-normalised reference magnitude, or `None` if it is zero or not
/// finite.
fn magnitude(vref: f32) -> Option<f32> {
    let vref = vref.abs();
    // NaN fails the comparison as well
    if vref > 0.0 && vref.is_finite() {
        Some(vref)
    } else {
        None
    }
}

/// Converts `vout` volts into a device code of `bits` resolution.
///
/// ```
/// use dacwave::voltage_to_code;
///
/// assert_eq!(voltage_to_code(14, 4.096, 0.0), 8192);
/// assert_eq!(voltage_to_code(14, 4.096, 4.096), 16383);
/// assert_eq!(voltage_to_code(14, 4.096, -1.0), 6192);
/// ```
pub fn voltage_to_code(bits: u8, vref: f32, vout: f32) -> u16 {
    let resolution = Resolution::new(bits);
    if resolution.bits() == 0 {
        return 0;
    }
    let Some(vref) = magnitude(vref) else {
        return 0;
    };

    let vout = vout.clamp(-vref, vref);
    let half = resolution.half_scale() as f32;
    let code = (vout / vref) * half + half;

    // Round half-up; `as` saturates and maps NaN to 0.
    let rounded = (code + 0.5) as i32;
    rounded.clamp(0, resolution.max_code() as i32) as u16
}

/// Nominal output voltage for `code`, the inverse of [`voltage_to_code`].
///
/// Codes above the resolution's maximum are clamped first.
pub fn code_to_voltage(bits: u8, vref: f32, code: u16) -> f32 {
    let resolution = Resolution::new(bits);
    if resolution.bits() == 0 {
        return 0.0;
    }
    let Some(vref) = magnitude(vref) else {
        return 0.0;
    };

    let half = resolution.half_scale() as f32;
    let code = code.min(resolution.max_code()) as f32;
    (code - half) / half * vref
}
