use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use dacwave_sim::{run, Opts, Stop};

fn main() -> Result<()> {
    let opts = Opts::parse();
    dacwave_posix::logger::init(opts.log_level).context("installing logger")?;

    let stop = Stop::new();
    if opts.steps == 0 {
        let handle = stop.clone();
        ctrlc::set_handler(move || handle.request()).context("installing Ctrl-C handler")?;
    }

    let summary = run(&opts, io::stdout().lock(), &stop)?;
    if summary.faults > 0 {
        log::warn!(
            "{} of {} transfers failed",
            summary.faults,
            summary.frames
        );
    }
    Ok(())
}
