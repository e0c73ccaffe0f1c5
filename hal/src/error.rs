//! Bus and select-line errors

use core::fmt;

/// Why a transfer did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFault {
    /// Data was not taken from the shift register in time.
    Overrun,
    /// Another controller drove the bus.
    ModeFault,
    /// The peripheral rejected the frame format.
    FrameFormat,
    Other,
}

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Argument outside what the peripheral accepts, e.g. a zero clock
    InvalidParameter,
    /// Requested feature not available on this port
    NotSupported,
    /// Used before configuration, or configuration conflicts with the board
    ConfigurationError,
    /// Transfer did not finish in time
    Timeout,
    /// Transfer aborted by the peripheral
    Transfer(TransferFault),
    /// Select line could not be driven
    SelectLine,
}

impl fmt::Display for TransferFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overrun => "overrun",
            Self::ModeFault => "mode fault",
            Self::FrameFormat => "frame format",
            Self::Other => "bus error",
        })
    }
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::ConfigurationError => write!(f, "bus not configured for this operation"),
            Self::Timeout => write!(f, "transfer timed out"),
            Self::Transfer(fault) => write!(f, "transfer failed: {}", fault),
            Self::SelectLine => write!(f, "select line fault"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidParameter => defmt::write!(fmt, "InvalidParameter"),
            Self::NotSupported => defmt::write!(fmt, "NotSupported"),
            Self::ConfigurationError => defmt::write!(fmt, "ConfigurationError"),
            Self::Timeout => defmt::write!(fmt, "Timeout"),
            Self::Transfer(fault) => defmt::write!(fmt, "Transfer({})", fault),
            Self::SelectLine => defmt::write!(fmt, "SelectLine"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferFault {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Overrun => defmt::write!(fmt, "Overrun"),
            Self::ModeFault => defmt::write!(fmt, "ModeFault"),
            Self::FrameFormat => defmt::write!(fmt, "FrameFormat"),
            Self::Other => defmt::write!(fmt, "Other"),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;
