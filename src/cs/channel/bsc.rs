//! Binary symmetric channel.
//!
//! Each bit is flipped independently with the same probability, the bit
//! error rate (BER). The channel is memoryless: the fate of one bit tells
//! nothing about its neighbours.

use crate::cs::bits::BitVector;
use crate::cs::channel::{validate_probability, Channel, FlipDraw, Transmission};
use crate::error::Result;
use log::debug;
use rand::Rng;

/// Parameters of a binary symmetric channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BscParams {
    /// Probability that any one bit is flipped
    pub ber: f64,
}

impl Default for BscParams {
    fn default() -> Self {
        Self { ber: 0.01 }
    }
}

impl BscParams {
    pub fn validate(&self) -> Result<()> {
        validate_probability("ber", self.ber).map(|_| ())
    }
}

/// Memoryless channel flipping every bit with probability `ber`.
#[derive(Debug, Clone)]
pub struct BinarySymmetricChannel {
    params: BscParams,
    flip: FlipDraw,
}

impl BinarySymmetricChannel {
    /// Creates a channel with the given bit error rate.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::error::Error::InvalidParameter) when
    /// `ber` is not in `[0, 1]`. The rate is never clamped.
    pub fn new(ber: f64) -> Result<Self> {
        Self::from_params(BscParams { ber })
    }

    pub fn from_params(params: BscParams) -> Result<Self> {
        let flip = FlipDraw::new("ber", params.ber)?;
        Ok(Self { params, flip })
    }

    pub fn ber(&self) -> f64 {
        self.params.ber
    }
}

impl Channel for BinarySymmetricChannel {
    fn transmit<R: Rng + ?Sized>(&self, bits: &BitVector, rng: &mut R) -> Transmission {
        let mut output = bits.clone();
        let mut flipped = 0;

        for i in 0..bits.len() {
            if self.flip.sample(rng) {
                output.flip(i);
                flipped += 1;
            }
        }

        debug!(
            "bsc: flipped {} of {} bits at ber {}",
            flipped,
            bits.len(),
            self.params.ber
        );
        Transmission {
            bits: output,
            flipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::bits::count_differences;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn message() -> BitVector {
        BitVector::from_text("binary symmetric").unwrap()
    }

    #[test]
    fn test_zero_ber_is_identity() {
        let bits = message();
        let channel = BinarySymmetricChannel::new(0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let out = channel.transmit(&bits, &mut rng);
        assert_eq!(out, Transmission { bits, flipped: 0 });
    }

    #[test]
    fn test_unit_ber_complements() {
        let bits = message();
        let channel = BinarySymmetricChannel::new(1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let out = channel.transmit(&bits, &mut rng);
        assert_eq!(out.bits, bits.complement());
        assert_eq!(out.flipped, bits.len());
    }

    #[test]
    fn test_flipped_count_matches_differences() {
        let bits = message();
        let channel = BinarySymmetricChannel::new(0.2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);

        for _ in 0..50 {
            let out = channel.transmit(&bits, &mut rng);
            assert_eq!(out.bits.len(), bits.len());
            assert_eq!(out.flipped, count_differences(&bits, &out.bits));
        }
    }

    #[test]
    fn test_observed_rate_near_ber() {
        let bits = BitVector::zeros(50_000);
        let channel = BinarySymmetricChannel::new(0.05).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        let out = channel.transmit(&bits, &mut rng);
        let rate = out.flipped as f64 / bits.len() as f64;
        approx::assert_abs_diff_eq!(rate, 0.05, epsilon = 0.005);
    }

    #[test]
    fn test_same_seed_same_output() {
        let bits = message();
        let channel = BinarySymmetricChannel::new(0.3).unwrap();

        let a = channel.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(8));
        let b = channel.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_ber_rejected() {
        for ber in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                BinarySymmetricChannel::new(ber),
                Err(Error::InvalidParameter { name: "ber", .. })
            ));
        }
        assert!(BscParams { ber: 1.2 }.validate().is_err());
    }
}
