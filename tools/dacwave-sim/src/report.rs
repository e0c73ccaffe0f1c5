//! Frame and summary output.

use std::io::{self, Write};

use colored::Colorize;
use dacwave::code_to_voltage;
use dacwave::frame::DATA_MASK;
use serde::Serialize;

/// One frame as seen on the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    pub index: u64,
    pub code: u16,
    pub word: u16,
    pub volts: f32,
}

/// End-of-run totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub mode: String,
    pub steps: u64,
    /// Transfers the driver attempted.
    pub frames: u64,
    /// Transfers that failed.
    pub faults: u64,
    /// Frames that reached the bus.
    pub delivered: u64,
    pub clock_hz: u32,
    pub max_sample_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sine_hz: Option<f32>,
}

/// Prints frames as text or JSON lines.
pub struct Reporter<W> {
    out: W,
    json: bool,
    bits: u8,
    vref: f32,
    next_index: u64,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, json: bool, bits: u8, vref: f32) -> Self {
        Self {
            out,
            json,
            bits,
            vref,
            next_index: 0,
        }
    }

    /// Builds the record for the next bus word.
    pub fn record(&mut self, word: u16) -> FrameRecord {
        let code = word & DATA_MASK;
        let record = FrameRecord {
            index: self.next_index,
            code,
            word,
            volts: code_to_voltage(self.bits, self.vref, code),
        };
        self.next_index += 1;
        record
    }

    pub fn frame(&mut self, word: u16) -> io::Result<()> {
        let record = self.record(word);
        if self.json {
            let line = serde_json::to_string(&record)?;
            writeln!(self.out, "{}", line)
        } else {
            writeln!(
                self.out,
                "{:>8} {} {:>5}  {:>+8.4} V",
                record.index.to_string().dimmed(),
                format!("{:#06x}", record.word).cyan(),
                record.code,
                record.volts
            )
        }
    }

    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(summary)?;
            return writeln!(self.out, "{}", line);
        }

        writeln!(self.out, "{}", "summary".bold())?;
        writeln!(self.out, "  mode        {}", summary.mode)?;
        writeln!(self.out, "  steps       {}", summary.steps)?;
        writeln!(self.out, "  frames      {}", summary.frames)?;
        let faults = summary.faults.to_string();
        if summary.faults > 0 {
            writeln!(self.out, "  faults      {}", faults.red())?;
        } else {
            writeln!(self.out, "  faults      {}", faults.green())?;
        }
        writeln!(self.out, "  delivered   {}", summary.delivered)?;
        writeln!(self.out, "  bus clock   {} Hz", summary.clock_hz)?;
        writeln!(
            self.out,
            "  max rate    {} samples/s",
            summary.max_sample_rate
        )?;
        if let Some(hz) = summary.sine_hz {
            writeln!(self.out, "  sine        {:.1} Hz", hz)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
