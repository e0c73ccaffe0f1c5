//! Framed output to the DAC.
//!
//! Every code goes out as one select cycle: select low, 16 bits MSB first,
//! select high. The bus has no return channel, so a failed transfer cannot be
//! retried or reported to the pattern layer; the driver counts it and moves
//! on.

use hal::{GpioPin, HalResult, Level, PinMode, SpiConfig, SpiMaster};
use heapless::HistoryBuffer;

use crate::frame::Frame;
use crate::pattern::FrameSink;

/// Number of frames kept for [`OutputDriver::recent`].
pub const HISTORY_LEN: usize = 8;

/// Transfer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Frames attempted.
    pub frames: u64,
    /// Frames where the bus or the select line reported an error.
    pub faults: u64,
}

/// Owns the bus and select line of one DAC.
pub struct OutputDriver<S, P> {
    spi: S,
    select: P,
    clock_hz: u32,
    stats: DriverStats,
    history: HistoryBuffer<Frame, HISTORY_LEN>,
}

impl<S, P> OutputDriver<S, P>
where
    S: SpiMaster,
    P: GpioPin,
{
    /// Configures the bus and parks the select line high.
    pub fn new(mut spi: S, mut select: P, config: &SpiConfig) -> HalResult<Self> {
        select.set_mode(PinMode::Output)?;
        select.write(Level::High)?;

        let clock_hz = spi.configure(config)?;
        if clock_hz < config.frequency {
            log::debug!(
                "bus clock limited to {} Hz (requested {} Hz)",
                clock_hz,
                config.frequency
            );
        } else {
            log::debug!("bus clock {} Hz", clock_hz);
        }

        Ok(Self {
            spi,
            select,
            clock_hz,
            stats: DriverStats::default(),
            history: HistoryBuffer::new(),
        })
    }

    /// Sends `code` as one framed transfer.
    pub fn write(&mut self, code: u16) {
        let frame = Frame::new(code);

        let sent = self
            .select
            .write(Level::Low)
            .and_then(|_| self.spi.write(&frame.to_bytes()));
        // Deassert even if the transfer failed so the next frame starts clean.
        let released = self.select.write(Level::High);

        self.stats.frames += 1;

        match sent.and(released) {
            Ok(()) => self.history.write(frame),
            Err(err) => {
                if self.stats.faults == 0 {
                    log::warn!("transfer of {} failed: {}", frame, err);
                }
                self.stats.faults += 1;
            }
        }
    }

    /// Clock the bus is actually running at.
    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Most recent frames that went out without a fault, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &Frame> {
        self.history.oldest_ordered()
    }

    pub fn select(&self) -> &P {
        &self.select
    }

    /// Gives back the bus and the select line.
    pub fn release(self) -> (S, P) {
        (self.spi, self.select)
    }
}

impl<S, P> FrameSink for OutputDriver<S, P>
where
    S: SpiMaster,
    P: GpioPin,
{
    #[inline]
    fn send(&mut self, code: u16) {
        self.write(code);
    }
}
