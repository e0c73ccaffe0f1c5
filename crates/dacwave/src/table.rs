//! One-period sine lookup table.
//!
//! The table is unipolar: sample `i` is `sin(2πi/N) * 0.5 + 0.5` scaled to
//! the full code range, so index 0 sits at half-scale (0 V on the bipolar
//! output). A larger `N` gives a smoother shape but a lower output frequency
//! for the same per-sample transfer rate.

use core::f64::consts::PI;
use core::ops::Index;

use crate::code::Resolution;

/// Fixed-length table of codes covering one waveform period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveTable<const N: usize> {
    codes: [u16; N],
    resolution: Resolution,
}

impl<const N: usize> WaveTable<N> {
    /// Builds the sine table for `resolution`.
    pub fn sine(resolution: Resolution) -> Self {
        let max = resolution.max_code();
        let mut codes = [0u16; N];

        for (i, slot) in codes.iter_mut().enumerate() {
            let angle = 2.0 * PI * i as f64 / N as f64;
            let amplitude = libm::sin(angle) * 0.5 + 0.5;
            let raw = (amplitude * max as f64 + 0.5) as u32;
            *slot = (raw & max as u32) as u16;
        }

        log::debug!(
            "built {}-sample sine table at {} bits",
            N,
            resolution.bits()
        );

        Self { codes, resolution }
    }

    /// Number of samples in one period.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Sample at `index`, wrapping modulo `N`.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty.
    pub fn at(&self, index: usize) -> u16 {
        self.codes[index % N]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.codes
    }

    pub fn iter(&self) -> core::slice::Iter<'_, u16> {
        self.codes.iter()
    }
}

impl<const N: usize> Index<usize> for WaveTable<N> {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.codes[index]
    }
}

impl<'a, const N: usize> IntoIterator for &'a WaveTable<N> {
    type Item = &'a u16;
    type IntoIter = core::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}
