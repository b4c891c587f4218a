//! Forward error correction over simulated noisy channels.
//!
//! The crate is built around three independent pieces that share one bit
//! container, [`BitVector`]:
//! - a Hamming single-error-correcting codec ([`cs::ecc::hamming`])
//! - a binary symmetric channel and a Gilbert-Elliott burst channel ([`cs::channel`])
//! - a difference counter comparing what was sent with what came out ([`cs::bits`])
//!
//! [`sim`] wires them into a Monte Carlo pipeline.

pub mod cs;
pub mod error;
pub mod sim;

pub use cs::bits::{count_differences, BitVector};
pub use cs::{bits, channel, ecc};
pub use error::{Error, Result};
