//! Output patterns.
//!
//! Each pattern turns into a stream of codes pushed into a [`FrameSink`].
//! The drive loop calls [`Pattern::prime`] once and then [`Pattern::step`]
//! per iteration. What one step emits depends on the pattern:
//!
//! | Pattern         | `prime`        | `step`                          |
//! |-----------------|----------------|---------------------------------|
//! | [`SingleValue`] | the fixed code | nothing                         |
//! | [`FullRange`]   | nothing        | a full sweep of `max + 1` codes |
//! | [`SinePlayback`]| nothing        | one table sample                |
//! | [`QuickChange`] | nothing        | one toggle (max or 0)           |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::code::{voltage_to_code, Resolution};
use crate::error::ConfigError;
use crate::table::WaveTable;

/// Destination for generated codes.
pub trait FrameSink {
    fn send(&mut self, code: u16);
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    #[inline]
    fn send(&mut self, code: u16) {
        (**self).send(code);
    }
}

#[cfg(feature = "std")]
impl FrameSink for Vec<u16> {
    #[inline]
    fn send(&mut self, code: u16) {
        self.push(code);
    }
}

/// A code-producing strategy driven by the generator loop.
pub trait Pattern {
    /// Runs once before the first [`step`](Pattern::step).
    fn prime<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        let _ = sink;
    }

    /// One iteration of the drive loop.
    fn step<K: FrameSink + ?Sized>(&mut self, sink: &mut K);

    /// `true` if the pattern never hands control back once the loop starts.
    fn is_exclusive(&self) -> bool {
        false
    }
}

/// Holds one fixed voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValue {
    volts: f32,
    code: u16,
}

impl SingleValue {
    pub fn new(resolution: Resolution, vref: f32, volts: f32) -> Self {
        let code = voltage_to_code(resolution.bits(), vref, volts);
        if volts.abs() > vref.abs() {
            log::warn!("{} V is outside ±{} V, clamped to code {}", volts, vref.abs(), code);
        }
        Self { volts, code }
    }

    /// Requested voltage, before clamping.
    pub fn volts(&self) -> f32 {
        self.volts
    }

    pub fn code(&self) -> u16 {
        self.code
    }
}

impl Pattern for SingleValue {
    fn prime<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        sink.send(self.code);
    }

    fn step<K: FrameSink + ?Sized>(&mut self, _sink: &mut K) {}
}

/// Sweep direction of [`FullRange`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RampDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sweeps every code from one end of the range to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRange {
    max: u16,
    direction: RampDirection,
    cycles: u64,
}

impl FullRange {
    pub fn new(resolution: Resolution, direction: RampDirection) -> Self {
        Self {
            max: resolution.max_code(),
            direction,
            cycles: 0,
        }
    }

    pub fn direction(&self) -> RampDirection {
        self.direction
    }

    /// Completed sweeps.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Codes of one sweep.
    pub fn cycle(&self) -> RampCycle {
        RampCycle {
            next: 0,
            max: self.max,
            direction: self.direction,
        }
    }
}

impl Pattern for FullRange {
    fn step<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        for code in self.cycle() {
            sink.send(code);
        }
        self.cycles += 1;
        log::trace!("ramp cycle {} done", self.cycles);
    }
}

/// Iterator over one [`FullRange`] sweep.
#[derive(Debug, Clone)]
pub struct RampCycle {
    next: u32,
    max: u16,
    direction: RampDirection,
}

impl Iterator for RampCycle {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.next > self.max as u32 {
            return None;
        }
        let step = self.next as u16;
        self.next += 1;
        Some(match self.direction {
            RampDirection::Ascending => step,
            RampDirection::Descending => self.max - step,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.max as u32 + 1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RampCycle {}

/// Plays a precomputed sine period sample by sample.
///
/// The cursor starts at 0 and is never reset; the sample stream is endless.
#[derive(Debug, Clone)]
pub struct SinePlayback<const N: usize> {
    table: WaveTable<N>,
    cursor: usize,
}

impl<const N: usize> SinePlayback<N> {
    /// Builds the table for `resolution`.
    ///
    /// Fails with [`ConfigError::EmptyTable`] if `N` is 0.
    pub fn new(resolution: Resolution) -> Result<Self, ConfigError> {
        Self::from_table(WaveTable::sine(resolution))
    }

    /// Plays `table` from its first sample.
    ///
    /// Fails with [`ConfigError::EmptyTable`] if `N` is 0.
    pub fn from_table(table: WaveTable<N>) -> Result<Self, ConfigError> {
        if table.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        Ok(Self { table, cursor: 0 })
    }

    pub fn table(&self) -> &WaveTable<N> {
        &self.table
    }

    /// Index of the next sample.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the sample under the cursor and advances it.
    pub fn next_code(&mut self) -> u16 {
        let code = self.table.at(self.cursor);
        self.cursor = (self.cursor + 1) % N;
        if self.cursor == 0 {
            log::trace!("sine period wrapped");
        }
        code
    }
}

impl<const N: usize> Iterator for SinePlayback<N> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        Some(self.next_code())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<const N: usize> Pattern for SinePlayback<N> {
    fn step<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        let code = self.next_code();
        sink.send(code);
    }
}

/// Alternates between full scale and zero as fast as the bus allows.
///
/// Once the drive loop reaches this pattern it stays in [`QuickChange::run`]
/// for good. Yielding between toggles would lower the slew rate it exists to
/// show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickChange {
    max: u16,
    high_next: bool,
}

impl QuickChange {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            max: resolution.max_code(),
            high_next: true,
        }
    }

    /// Next code in the toggle sequence, starting with full scale.
    #[inline]
    pub fn next_code(&mut self) -> u16 {
        let code = if self.high_next { self.max } else { 0 };
        self.high_next = !self.high_next;
        code
    }

    /// Toggles forever.
    pub fn run<K: FrameSink + ?Sized>(&mut self, sink: &mut K) -> ! {
        loop {
            let code = self.next_code();
            sink.send(code);
        }
    }
}

impl Iterator for QuickChange {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        Some(self.next_code())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl Pattern for QuickChange {
    fn step<K: FrameSink + ?Sized>(&mut self, sink: &mut K) {
        let code = self.next_code();
        sink.send(code);
    }

    fn is_exclusive(&self) -> bool {
        true
    }
}
