//! Error types shared by the codec, the channel models and the simulation driver.
//!
//! Every failure is returned to the immediate caller. Note that an uncorrectable
//! codeword is *not* an error: it is reported through
//! [`DecodeResult::Uncorrectable`](crate::cs::ecc::DecodeResult::Uncorrectable) so the
//! caller can decide what to do with the received bits.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A probability argument was outside `[0, 1]` or not a finite number
    #[error("invalid parameter `{name}`: {value} is not a probability in [0, 1]")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A message must carry at least one bit
    #[error("invalid message length {0}: at least one data bit is required")]
    InvalidMessageLength(usize),

    /// The length is not `m + r` for any valid Hamming parameter set
    #[error("invalid codeword length {0}: not the length of any Hamming codeword")]
    InvalidCodewordLength(usize),

    /// Text could not be converted to or from 8-bit characters
    #[error("invalid text: {0}")]
    InvalidText(String),

    /// Any other argument rejected before work starts
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Report output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a probability that failed validation.
    pub(crate) fn parameter(name: &'static str, value: f64) -> Self {
        Error::InvalidParameter { name, value }
    }
}
