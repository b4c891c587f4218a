//! Error correction code implementations.
//!
//! This module provides the codec seam used by the simulation pipeline:
//! - [`ErrorCorrection`], the `encode(bits) -> bits` / `decode(bits) -> result`
//!   shape every block code exposes
//! - [`DecodeResult`], the single result type a decode produces
//! - Hamming single-error-correcting codes ([`hamming`])
//!
//! # Error Correction Algorithms
//!
//! Error correction codes add redundancy to a message so that the receiver
//! can locate and undo corruption introduced by a noisy channel.
//!
//! # Examples
//!
//! ```rust
//! use fec_channel_sim::cs::bits::BitVector;
//! use fec_channel_sim::cs::ecc::{ErrorCorrection, HammingCode};
//!
//! let data = BitVector::from_bits(&[1, 0, 1, 1]).unwrap();
//! let codec = HammingCode::new();
//!
//! let mut codeword = codec.encode(&data).unwrap();
//! codeword.flip(4);
//!
//! let decoded = codec.decode(&codeword).unwrap();
//! assert_eq!(decoded.data(), Some(&data));
//! ```

use crate::cs::bits::BitVector;
pub use crate::error::Result;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data bits into a codeword
    fn encode(&self, data: &BitVector) -> Result<BitVector>;

    /// Decode a received codeword, correcting errors if possible
    fn decode(&self, received: &BitVector) -> Result<DecodeResult>;
}

/// Outcome of decoding one codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// Data bits were recovered.
    ///
    /// `corrected` holds the 1-based codeword position that was flipped, if
    /// any. A recovered message is not proof of a correct one: with two or
    /// more channel errors the decoder may flip the wrong bit and still land
    /// here.
    Decoded {
        data: BitVector,
        corrected: Option<usize>,
    },
    /// The syndrome pointed outside the codeword, so at least two bits were
    /// wrong and no correction was attempted.
    Uncorrectable {
        /// Number of parity checks that did not hold
        failed_checks: usize,
        /// The out-of-range syndrome value
        syndrome: usize,
    },
}

impl DecodeResult {
    /// Recovered data, if the decode did not give up.
    pub fn data(&self) -> Option<&BitVector> {
        match self {
            DecodeResult::Decoded { data, .. } => Some(data),
            DecodeResult::Uncorrectable { .. } => None,
        }
    }

    /// Consumes the result, yielding the recovered data if any.
    pub fn into_data(self) -> Option<BitVector> {
        match self {
            DecodeResult::Decoded { data, .. } => Some(data),
            DecodeResult::Uncorrectable { .. } => None,
        }
    }

    pub fn is_uncorrectable(&self) -> bool {
        matches!(self, DecodeResult::Uncorrectable { .. })
    }
}

/// Hamming single-error-correcting codes
pub mod hamming;
pub use hamming::{
    hamming_decode, hamming_encode, BlockDecodeReport, CodeParameters, HammingCode,
};
