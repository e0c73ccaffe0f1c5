//! Host simulator for dacwave patterns.
//!
//! Builds a generator from command-line options (optionally seeded from a
//! JSON config file), drives it against the simulated bus of
//! `dacwave-posix`, and reports every frame that reached the bus.

mod options;
mod report;
mod runner;

pub use options::{ModeArg, Opts};
pub use report::{FrameRecord, Reporter, Summary};
pub use runner::{run, Stop};

#[cfg(test)]
mod tests;
