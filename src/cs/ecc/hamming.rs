//! Hamming error correction code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! A message of `m` bits is protected by the smallest number of parity bits `r` with
//! `2^r >= m + r + 1`, giving a codeword of `n = m + r` bits. The parity bits sit at the
//! power-of-two positions (1, 2, 4, ...), and the data bits fill the remaining positions in
//! order. The parity bit at position `p` makes the XOR of every position whose index has bit
//! `p` set come out to zero.
//!
//! On decode the failed checks add up to the 1-based position of a single flipped bit (the
//! syndrome), which is then flipped back.
//!
//! # Limitations
//!
//! This is a plain single-error-correcting code with no overall parity bit:
//! - exactly one error anywhere in the codeword is always corrected
//! - two or more errors may alias to another position and be *silently miscorrected*;
//!   the decode then reports success with the wrong data
//! - only a syndrome pointing past the end of the codeword is reported, as
//!   [`DecodeResult::Uncorrectable`]
//!
//! Callers that need double-error detection must add their own global parity bit.

use crate::cs::bits::BitVector;
use crate::cs::ecc::{DecodeResult, ErrorCorrection, Result};
use crate::error::Error;
use log::{debug, trace, warn};

/// Largest parity bit count considered when reverse-mapping a codeword length.
const MAX_PARITY_BITS: usize = usize::BITS as usize - 1;

/// Derived shape of a Hamming code for one message length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeParameters {
    /// Number of message bits (m)
    pub data_bits: usize,
    /// Number of parity bits (r)
    pub parity_bits: usize,
    /// Codeword length (n = m + r)
    pub total_bits: usize,
}

impl CodeParameters {
    /// Derives the parameters for an `m`-bit message.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMessageLength`] when `data_bits` is zero.
    pub fn for_message(data_bits: usize) -> Result<Self> {
        if data_bits == 0 {
            return Err(Error::InvalidMessageLength(data_bits));
        }

        let mut parity_bits = 1;
        while (1usize << parity_bits) < data_bits + parity_bits + 1 {
            parity_bits += 1;
        }

        Ok(CodeParameters {
            data_bits,
            parity_bits,
            total_bits: data_bits + parity_bits,
        })
    }

    /// Recovers the parameters from a codeword length.
    ///
    /// `n -> m` is one-to-one, but not every `n` is reachable: powers of two
    /// (and anything shorter than 3) never occur as codeword lengths.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCodewordLength`] when no message length encodes to `total_bits`.
    pub fn for_codeword(total_bits: usize) -> Result<Self> {
        for parity_bits in 1..MAX_PARITY_BITS.min(total_bits) {
            let params = Self::for_message(total_bits - parity_bits)?;
            if params.parity_bits == parity_bits {
                return Ok(params);
            }
        }
        Err(Error::InvalidCodewordLength(total_bits))
    }

    /// 1-based positions of the parity bits, ascending.
    pub fn parity_positions(&self) -> impl Iterator<Item = usize> {
        (0..self.parity_bits).map(|i| 1 << i)
    }
}

/// Hamming single-error-correcting codec.
///
/// The codec is stateless: parameters are derived from the length of every
/// input, so one instance serves any message size.
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingCode;

/// Summary of a blocked decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDecodeReport {
    /// Concatenated data bits of every block
    pub data: BitVector,
    /// Number of blocks processed
    pub blocks: usize,
    /// Blocks in which one bit was flipped back
    pub corrected: usize,
    /// Blocks whose syndrome pointed outside the codeword; their data bits
    /// were taken from the received word as-is
    pub uncorrectable: usize,
}

impl HammingCode {
    /// Creates the codec.
    pub fn new() -> Self {
        HammingCode
    }

    /// Encodes `data` into a single codeword.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMessageLength`] for an empty message.
    pub fn encode(&self, data: &BitVector) -> Result<BitVector> {
        let params = CodeParameters::for_message(data.len())?;
        let mut codeword = BitVector::zeros(params.total_bits);

        // Data bits go to every position that is not a power of two
        let mut data_iter = data.iter();
        for position in data_positions(params.total_bits) {
            if let Some(bit) = data_iter.next() {
                codeword.set(position - 1, bit);
            }
        }

        // Parity slots are still zero here, and no parity position covers another
        for parity_pos in params.parity_positions() {
            let parity = parity_check(&codeword, parity_pos);
            codeword.set(parity_pos - 1, parity);
        }

        debug!(
            "hamming encode: m={} r={} n={}",
            params.data_bits, params.parity_bits, params.total_bits
        );
        Ok(codeword)
    }

    /// Decodes `received`, correcting a single bit error.
    ///
    /// A two-bit error can produce a syndrome that names a valid but innocent
    /// position. That case is indistinguishable from a single error and comes
    /// back as [`DecodeResult::Decoded`] with wrong data. Only syndromes past
    /// the end of the codeword yield [`DecodeResult::Uncorrectable`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCodewordLength`] if `received` cannot be a Hamming codeword.
    pub fn decode(&self, received: &BitVector) -> Result<DecodeResult> {
        let params = CodeParameters::for_codeword(received.len())?;
        let (syndrome, failed_checks) = syndrome(received, &params);

        if syndrome == 0 {
            return Ok(DecodeResult::Decoded {
                data: extract_data(received),
                corrected: None,
            });
        }

        if syndrome > params.total_bits {
            warn!(
                "hamming decode: syndrome {} outside codeword of {} bits ({} checks failed)",
                syndrome, params.total_bits, failed_checks
            );
            return Ok(DecodeResult::Uncorrectable {
                failed_checks,
                syndrome,
            });
        }

        let mut corrected = received.clone();
        corrected.flip(syndrome - 1);
        trace!("hamming decode: corrected position {}", syndrome);

        Ok(DecodeResult::Decoded {
            data: extract_data(&corrected),
            corrected: Some(syndrome),
        })
    }

    /// Encodes `data` as consecutive independent blocks of `block_len` data bits.
    ///
    /// The final block holds whatever is left and gets its own (possibly
    /// smaller) parameters.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a zero `block_len`,
    /// [`Error::InvalidMessageLength`] for an empty message.
    pub fn encode_blocks(&self, data: &BitVector, block_len: usize) -> Result<BitVector> {
        let layout = block_layout(data.len(), block_len)?;
        let mut encoded = BitVector::default();

        let mut start = 0;
        for params in &layout {
            let block = data.slice(start, start + params.data_bits);
            encoded.extend_from(&self.encode(&block)?);
            start += params.data_bits;
        }

        debug!(
            "hamming encode_blocks: {} data bits in {} blocks -> {} bits",
            data.len(),
            layout.len(),
            encoded.len()
        );
        Ok(encoded)
    }

    /// Decodes the output of [`encode_blocks`](Self::encode_blocks).
    ///
    /// `message_len` and `block_len` must match the values used to encode;
    /// they fix where each block starts. An uncorrectable block contributes
    /// its received data bits unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCodewordLength`] when `received` does not match the
    /// block layout, plus the errors of [`encode_blocks`](Self::encode_blocks).
    pub fn decode_blocks(
        &self,
        received: &BitVector,
        message_len: usize,
        block_len: usize,
    ) -> Result<BlockDecodeReport> {
        let layout = block_layout(message_len, block_len)?;
        let expected: usize = layout.iter().map(|p| p.total_bits).sum();
        if received.len() != expected {
            return Err(Error::InvalidCodewordLength(received.len()));
        }

        let mut report = BlockDecodeReport {
            data: BitVector::default(),
            blocks: layout.len(),
            corrected: 0,
            uncorrectable: 0,
        };

        let mut start = 0;
        for params in &layout {
            let block = received.slice(start, start + params.total_bits);
            match self.decode(&block)? {
                DecodeResult::Decoded { data, corrected } => {
                    if corrected.is_some() {
                        report.corrected += 1;
                    }
                    report.data.extend_from(&data);
                }
                DecodeResult::Uncorrectable { .. } => {
                    report.uncorrectable += 1;
                    report.data.extend_from(&extract_data(&block));
                }
            }
            start += params.total_bits;
        }

        Ok(report)
    }
}

impl ErrorCorrection for HammingCode {
    fn encode(&self, data: &BitVector) -> Result<BitVector> {
        HammingCode::encode(self, data)
    }

    fn decode(&self, received: &BitVector) -> Result<DecodeResult> {
        HammingCode::decode(self, received)
    }
}

/// 1-based data positions of an `n`-bit codeword, ascending.
fn data_positions(total_bits: usize) -> impl Iterator<Item = usize> {
    (1..=total_bits).filter(|pos| !pos.is_power_of_two())
}

/// XOR of every 1-based position covered by `parity_pos`, the parity slot included.
fn parity_check(word: &BitVector, parity_pos: usize) -> bool {
    word.iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) & parity_pos != 0)
        .fold(false, |acc, (_, bit)| acc ^ bit)
}

/// Sum of the failing parity positions, and how many checks failed.
fn syndrome(word: &BitVector, params: &CodeParameters) -> (usize, usize) {
    params
        .parity_positions()
        .filter(|&p| parity_check(word, p))
        .fold((0, 0), |(sum, count), p| (sum + p, count + 1))
}

fn extract_data(word: &BitVector) -> BitVector {
    data_positions(word.len())
        .filter_map(|pos| word.get(pos - 1))
        .collect()
}

/// Parameters of each block when `message_len` bits are split every `block_len`.
fn block_layout(message_len: usize, block_len: usize) -> Result<Vec<CodeParameters>> {
    if block_len == 0 {
        return Err(Error::InvalidInput(
            "Block length must be positive".to_string(),
        ));
    }
    if message_len == 0 {
        return Err(Error::InvalidMessageLength(message_len));
    }

    let mut layout = Vec::with_capacity(message_len.div_ceil(block_len));
    let mut remaining = message_len;
    while remaining > 0 {
        let data_bits = remaining.min(block_len);
        layout.push(CodeParameters::for_message(data_bits)?);
        remaining -= data_bits;
    }
    Ok(layout)
}

/// Encodes `data` as one Hamming codeword
pub fn hamming_encode(data: &BitVector) -> Result<BitVector> {
    HammingCode::new().encode(data)
}

/// Decodes one Hamming codeword
pub fn hamming_decode(received: &BitVector) -> Result<DecodeResult> {
    HammingCode::new().decode(received)
}
