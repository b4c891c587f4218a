//! Bit sequences exchanged between the codec and the channel models.
//!
//! [`BitVector`] is a fixed-length, ordered sequence of bits backed by
//! [`bitvec`]. It is the only currency the encoder, the channels and the
//! decoder trade in. This module also holds the two helpers that sit at the
//! edges of a simulation run:
//!
//! - the 8-bit text codec ([`BitVector::from_text`] / [`BitVector::to_text`])
//! - the difference counter ([`count_differences`])
//!
//! # Examples
//!
//! ```
//! use fec_channel_sim::cs::bits::{count_differences, BitVector};
//!
//! let sent = BitVector::from_text("Hi").unwrap();
//! assert_eq!(sent.to_string(), "0100100001101001");
//!
//! let mut received = sent.clone();
//! received.flip(3);
//! assert_eq!(count_differences(&sent, &received), 1);
//! ```

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt::{Display, Formatter};

/// Number of bits used for every character by the text codec.
pub const BITS_PER_CHAR: usize = 8;

/// Fixed-length ordered sequence of bits.
///
/// Indexing through the accessor methods is 0-based. The Hamming algorithms
/// talk about 1-based *positions*; they translate at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitVector {
    bits: BitVec<u8, Msb0>,
}

impl BitVector {
    /// Creates an all-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Msb0; 0; len],
        }
    }

    /// Builds a vector from a slice of `0`/`1` values.
    ///
    /// Any other value is rejected rather than coerced.
    pub fn from_bits(values: &[u8]) -> Result<Self> {
        let mut bits = BitVec::with_capacity(values.len());
        for (i, &v) in values.iter().enumerate() {
            match v {
                0 => bits.push(false),
                1 => bits.push(true),
                other => {
                    return Err(Error::InvalidInput(format!(
                        "bit {} has value {}, expected 0 or 1",
                        i, other
                    )))
                }
            }
        }
        Ok(Self { bits })
    }

    /// Encodes text as 8 bits per character, most significant bit first.
    ///
    /// Only characters in `U+0000..=U+00FF` fit in 8 bits; anything wider is
    /// rejected.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut bits = BitVec::with_capacity(text.chars().count() * BITS_PER_CHAR);
        for c in text.chars() {
            let code = u32::from(c);
            if code > 0xFF {
                return Err(Error::InvalidText(format!(
                    "character {:?} (U+{:04X}) does not fit in {} bits",
                    c, code, BITS_PER_CHAR
                )));
            }
            bits.extend_from_bitslice((code as u8).view_bits::<Msb0>());
        }
        Ok(Self { bits })
    }

    /// Decodes 8-bit groups back into characters.
    ///
    /// A length that is not a multiple of 8 is an error; a corrupted but
    /// complete group always decodes to *some* character.
    pub fn to_text(&self) -> Result<String> {
        if self.bits.len() % BITS_PER_CHAR != 0 {
            return Err(Error::InvalidText(format!(
                "{} bits do not split into {}-bit characters",
                self.bits.len(),
                BITS_PER_CHAR
            )));
        }

        Ok(self
            .bits
            .chunks(BITS_PER_CHAR)
            .map(|chunk| char::from(chunk.load_be::<u8>()))
            .collect())
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at 0-based `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|b| *b)
    }

    /// Sets the bit at 0-based `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: bool) {
        self.bits.set(index, value);
    }

    /// Inverts the bit at 0-based `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn flip(&mut self, index: usize) {
        let current = self.bits[index];
        self.bits.set(index, !current);
    }

    /// Iterates the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Every bit inverted.
    pub fn complement(&self) -> Self {
        Self {
            bits: !self.bits.clone(),
        }
    }

    /// Copies the bits out as `0`/`1` bytes.
    pub fn to_bits(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }

    /// Sub-range copy, used when splitting a message into blocks.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            bits: self.bits[start..end].to_bitvec(),
        }
    }

    /// Appends all bits of `other`.
    pub(crate) fn extend_from(&mut self, other: &BitVector) {
        self.bits.extend_from_bitslice(&other.bits);
    }

    /// Underlying bit slice.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl Display for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Counts how far apart two bit sequences are.
///
/// Positions shared by both sequences count when they differ; every bit one
/// sequence has beyond the end of the other counts as a mismatch as well, so
/// a truncated output is never scored better than it is.
pub fn count_differences(a: &BitVector, b: &BitVector) -> usize {
    let common = a.len().min(b.len());
    let mismatched = a.bits[..common]
        .iter()
        .by_vals()
        .zip(b.bits[..common].iter().by_vals())
        .filter(|(x, y)| x != y)
        .count();

    mismatched + a.len().abs_diff(b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(values: &[u8]) -> BitVector {
        BitVector::from_bits(values).unwrap()
    }

    #[test]
    fn test_from_bits_rejects_non_binary() {
        assert!(BitVector::from_bits(&[0, 1, 2]).is_err());
        assert_eq!(bits(&[1, 0, 1]).to_bits(), vec![1, 0, 1]);
    }

    #[test]
    fn test_text_round_trip() {
        let text = "Hamming (7,4)!";
        let encoded = BitVector::from_text(text).unwrap();
        assert_eq!(encoded.len(), text.len() * BITS_PER_CHAR);
        assert_eq!(encoded.to_text().unwrap(), text);
    }

    #[test]
    fn test_text_bit_order_is_msb_first() {
        let encoded = BitVector::from_text("A").unwrap();
        assert_eq!(encoded.to_string(), "01000001");
    }

    #[test]
    fn test_latin1_accepted_wider_rejected() {
        let encoded = BitVector::from_text("é").unwrap();
        assert_eq!(encoded.to_string(), "11101001");
        assert!(matches!(
            BitVector::from_text("€"),
            Err(Error::InvalidText(_))
        ));
    }

    #[test]
    fn test_to_text_rejects_partial_character() {
        let partial = bits(&[0, 1, 0, 0, 0, 0, 0]);
        assert!(matches!(partial.to_text(), Err(Error::InvalidText(_))));
    }

    #[test]
    fn test_flip_and_complement() {
        let mut v = bits(&[1, 0, 1, 1]);
        v.flip(1);
        assert_eq!(v.to_bits(), vec![1, 1, 1, 1]);
        assert_eq!(v.complement().to_bits(), vec![0, 0, 0, 0]);
        assert_eq!(v.count_ones(), 4);
    }

    #[test]
    fn test_count_differences_identical() {
        let a = bits(&[1, 0, 1, 1, 0, 0, 1]);
        assert_eq!(count_differences(&a, &a), 0);
        assert_eq!(count_differences(&BitVector::default(), &BitVector::default()), 0);
    }

    #[test]
    fn test_count_differences_same_length() {
        assert_eq!(count_differences(&bits(&[1, 0, 1]), &bits(&[1, 1, 1])), 1);
    }

    #[test]
    fn test_count_differences_length_gap() {
        assert_eq!(count_differences(&bits(&[1, 0]), &bits(&[1, 0, 1, 1])), 2);
        assert_eq!(count_differences(&bits(&[0, 0, 1, 1]), &bits(&[1, 0])), 3);
        assert_eq!(count_differences(&BitVector::default(), &bits(&[1, 1, 0])), 3);
    }

    #[test]
    fn test_slice_and_extend() {
        let v = bits(&[1, 0, 1, 1, 0]);
        let mut joined = v.slice(0, 2);
        joined.extend_from(&v.slice(2, 5));
        assert_eq!(joined, v);
    }
}
