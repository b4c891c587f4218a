//! Gilbert-Elliott burst error channel.
//!
//! The channel alternates between a *Good* state with a low flip probability
//! and a *Bad* state with a high one. After every bit the state may change:
//! Good moves to Bad with probability `p_gb`, Bad returns to Good with
//! probability `p_bg`. Because the state is carried from bit to bit, errors
//! cluster into bursts whose mean length in the Bad state is `1 / p_bg`.
//!
//! Every transmission starts in the Good state and walks the input strictly
//! from first bit to last. For each bit the flip decision is drawn before the
//! transition decision.

use crate::cs::bits::BitVector;
use crate::cs::channel::{validate_probability, Channel, FlipDraw, Transmission};
use crate::error::Result;
use log::debug;
use rand::Rng;

/// Hidden state of the channel while a sequence is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Good,
    Bad,
}

/// Parameters of a Gilbert-Elliott channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GilbertElliottParams {
    /// Good -> Bad transition probability
    pub p_gb: f64,
    /// Bad -> Good transition probability
    pub p_bg: f64,
    /// Flip probability while Good
    pub p_g: f64,
    /// Flip probability while Bad
    pub p_b: f64,
}

impl Default for GilbertElliottParams {
    fn default() -> Self {
        Self {
            p_gb: 0.01,
            p_bg: 0.1,
            p_g: 0.001,
            p_b: 0.3,
        }
    }
}

impl GilbertElliottParams {
    pub fn validate(&self) -> Result<()> {
        validate_probability("p_gb", self.p_gb)?;
        validate_probability("p_bg", self.p_bg)?;
        validate_probability("p_g", self.p_g)?;
        validate_probability("p_b", self.p_b)?;
        Ok(())
    }

    /// Long-run fraction of bits sent in the Bad state, `p_gb / (p_gb + p_bg)`.
    ///
    /// `None` when both transitions are impossible: the chain then never
    /// leaves its starting state and has no unique stationary distribution.
    pub fn stationary_bad(&self) -> Option<f64> {
        let total = self.p_gb + self.p_bg;
        if total == 0.0 {
            None
        } else {
            Some(self.p_gb / total)
        }
    }

    /// Long-run bit error rate.
    ///
    /// Without transitions the chain stays Good, so the rate is `p_g`.
    pub fn average_error_rate(&self) -> f64 {
        match self.stationary_bad() {
            Some(bad) => (1.0 - bad) * self.p_g + bad * self.p_b,
            None => self.p_g,
        }
    }
}

/// Two-state Markov channel producing bursty errors.
#[derive(Debug, Clone)]
pub struct GilbertElliottChannel {
    params: GilbertElliottParams,
    good_to_bad: FlipDraw,
    bad_to_good: FlipDraw,
    flip_good: FlipDraw,
    flip_bad: FlipDraw,
}

impl GilbertElliottChannel {
    /// Creates a channel from the four probabilities.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::error::Error::InvalidParameter)
    /// naming the first probability outside `[0, 1]`.
    pub fn new(p_gb: f64, p_bg: f64, p_g: f64, p_b: f64) -> Result<Self> {
        Self::from_params(GilbertElliottParams { p_gb, p_bg, p_g, p_b })
    }

    pub fn from_params(params: GilbertElliottParams) -> Result<Self> {
        Ok(Self {
            good_to_bad: FlipDraw::new("p_gb", params.p_gb)?,
            bad_to_good: FlipDraw::new("p_bg", params.p_bg)?,
            flip_good: FlipDraw::new("p_g", params.p_g)?,
            flip_bad: FlipDraw::new("p_b", params.p_b)?,
            params,
        })
    }

    pub fn params(&self) -> &GilbertElliottParams {
        &self.params
    }

    /// Like [`transmit`](Channel::transmit) but also returns the state each
    /// bit was sent in.
    pub fn transmit_traced<R: Rng + ?Sized>(
        &self,
        bits: &BitVector,
        rng: &mut R,
    ) -> (Transmission, Vec<ChannelState>) {
        let mut states = Vec::with_capacity(bits.len());
        let transmission = self.run(bits, rng, |state| states.push(state));
        (transmission, states)
    }

    fn run<R, F>(&self, bits: &BitVector, rng: &mut R, mut observe: F) -> Transmission
    where
        R: Rng + ?Sized,
        F: FnMut(ChannelState),
    {
        let mut output = bits.clone();
        let mut flipped = 0;
        let mut bad_bits = 0;
        let mut state = ChannelState::Good;

        for i in 0..bits.len() {
            observe(state);

            let flip = match state {
                ChannelState::Good => &self.flip_good,
                ChannelState::Bad => {
                    bad_bits += 1;
                    &self.flip_bad
                }
            };
            if flip.sample(rng) {
                output.flip(i);
                flipped += 1;
            }

            state = match state {
                ChannelState::Good if self.good_to_bad.sample(rng) => ChannelState::Bad,
                ChannelState::Bad if self.bad_to_good.sample(rng) => ChannelState::Good,
                unchanged => unchanged,
            };
        }

        debug!(
            "gilbert-elliott: flipped {} of {} bits, {} sent in bad state",
            flipped,
            bits.len(),
            bad_bits
        );
        Transmission {
            bits: output,
            flipped,
        }
    }
}

impl Channel for GilbertElliottChannel {
    fn transmit<R: Rng + ?Sized>(&self, bits: &BitVector, rng: &mut R) -> Transmission {
        self.run(bits, rng, |_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::bits::count_differences;
    use crate::cs::channel::BinarySymmetricChannel;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn message() -> BitVector {
        BitVector::from_text("bursty channel under test").unwrap()
    }

    #[test]
    fn test_no_transitions_matches_bsc() {
        let bits = message();
        for p_g in [0.0, 0.1, 0.5, 1.0] {
            let ge = GilbertElliottChannel::new(0.0, 0.0, p_g, 0.9).unwrap();
            let bsc = BinarySymmetricChannel::new(p_g).unwrap();

            for seed in 0..10 {
                let from_ge = ge.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(seed));
                let from_bsc = bsc.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(seed));
                assert_eq!(from_ge, from_bsc, "p_g={} seed={}", p_g, seed);
            }
        }
    }

    #[test]
    fn test_zero_error_rates_never_flip() {
        let bits = message();
        let channel = GilbertElliottChannel::new(0.4, 0.3, 0.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let out = channel.transmit(&bits, &mut rng);
            assert_eq!(out.flipped, 0);
            assert_eq!(out.bits, bits);
        }
    }

    #[test]
    fn test_starts_in_good_state() {
        let bits = BitVector::zeros(5);
        // Always jumps to Bad after the first bit and never comes back
        let channel = GilbertElliottChannel::new(1.0, 0.0, 0.0, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let (out, states) = channel.transmit_traced(&bits, &mut rng);
        assert_eq!(
            states,
            vec![
                ChannelState::Good,
                ChannelState::Bad,
                ChannelState::Bad,
                ChannelState::Bad,
                ChannelState::Bad
            ]
        );
        assert_eq!(out.bits.to_bits(), vec![0, 1, 1, 1, 1]);
        assert_eq!(out.flipped, 4);
    }

    #[test]
    fn test_alternating_states() {
        let bits = BitVector::zeros(6);
        let channel = GilbertElliottChannel::new(1.0, 1.0, 0.0, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let (out, states) = channel.transmit_traced(&bits, &mut rng);
        assert_eq!(states[0], ChannelState::Good);
        assert_eq!(states[1], ChannelState::Bad);
        assert_eq!(out.bits.to_bits(), vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_flipped_count_matches_differences() {
        let bits = message();
        let channel = GilbertElliottChannel::from_params(GilbertElliottParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(19);

        for _ in 0..50 {
            let out = channel.transmit(&bits, &mut rng);
            assert_eq!(out.flipped, count_differences(&bits, &out.bits));
        }
    }

    #[test]
    fn test_long_run_error_rate() {
        let params = GilbertElliottParams {
            p_gb: 0.05,
            p_bg: 0.2,
            p_g: 0.01,
            p_b: 0.5,
        };
        let channel = GilbertElliottChannel::from_params(params).unwrap();
        let bits = BitVector::zeros(200_000);
        let mut rng = ChaCha8Rng::seed_from_u64(123);

        let out = channel.transmit(&bits, &mut rng);
        let observed = out.flipped as f64 / bits.len() as f64;
        // stationary Bad share 0.2, so 0.8 * 0.01 + 0.2 * 0.5 = 0.108
        approx::assert_abs_diff_eq!(params.average_error_rate(), 0.108, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(observed, 0.108, epsilon = 0.01);
    }

    #[test]
    fn test_errors_cluster_compared_to_bsc() {
        // Same long-run error rate, very different burst structure
        let params = GilbertElliottParams {
            p_gb: 0.01,
            p_bg: 0.1,
            p_g: 0.0,
            p_b: 1.0,
        };
        let ge = GilbertElliottChannel::from_params(params).unwrap();
        let bsc = BinarySymmetricChannel::new(params.average_error_rate()).unwrap();
        let bits = BitVector::zeros(100_000);

        let adjacent_pairs = |out: &BitVector| {
            let v = out.to_bits();
            v.windows(2).filter(|w| w[0] == 1 && w[1] == 1).count()
        };

        let ge_out = ge.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(4));
        let bsc_out = bsc.transmit(&bits, &mut ChaCha8Rng::seed_from_u64(4));
        assert!(adjacent_pairs(&ge_out.bits) > 5 * adjacent_pairs(&bsc_out.bits));
    }

    #[test]
    fn test_stationary_distribution() {
        let params = GilbertElliottParams {
            p_gb: 0.0,
            p_bg: 0.0,
            p_g: 0.02,
            p_b: 0.4,
        };
        assert_eq!(params.stationary_bad(), None);
        assert_eq!(params.average_error_rate(), 0.02);
    }

    #[test]
    fn test_invalid_parameters_named() {
        assert!(matches!(
            GilbertElliottChannel::new(0.1, -0.2, 0.0, 0.0),
            Err(Error::InvalidParameter { name: "p_bg", .. })
        ));
        assert!(matches!(
            GilbertElliottChannel::new(0.1, 0.2, 1.1, 0.0),
            Err(Error::InvalidParameter { name: "p_g", .. })
        ));
        let params = GilbertElliottParams {
            p_gb: f64::NAN,
            ..GilbertElliottParams::default()
        };
        assert!(params.validate().is_err());
    }
}
