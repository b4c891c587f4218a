//! Stochastic channel models.
//!
//! A channel takes a bit sequence and returns a corrupted copy of the same
//! length together with the number of bits it flipped. Two models are
//! provided:
//! - [`BinarySymmetricChannel`]: every bit flips independently with the same probability
//! - [`GilbertElliottChannel`]: a two-state Markov chain whose current state picks the
//!   flip probability, producing bursts of errors
//!
//! Randomness is always passed in by the caller. Seed a
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) for reproducible runs, and give
//! each worker its own generator when running trials in parallel.
//!
//! # Examples
//!
//! ```
//! use fec_channel_sim::cs::bits::BitVector;
//! use fec_channel_sim::cs::channel::{BinarySymmetricChannel, Channel};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let bits = BitVector::zeros(64);
//! let channel = BinarySymmetricChannel::new(1.0).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//!
//! let out = channel.transmit(&bits, &mut rng);
//! assert_eq!(out.flipped, 64);
//! assert_eq!(out.bits, bits.complement());
//! ```

use crate::cs::bits::BitVector;
use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

pub mod bsc;
pub mod gilbert_elliott;

pub use bsc::{BinarySymmetricChannel, BscParams};
pub use gilbert_elliott::{ChannelState, GilbertElliottChannel, GilbertElliottParams};

/// Output of one pass through a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// Received bits, same length as the input
    pub bits: BitVector,
    /// Number of positions where the output differs from the input
    pub flipped: usize,
}

/// Trait for noisy channel implementations
pub trait Channel {
    /// Sends `bits` through the channel, drawing all randomness from `rng`.
    fn transmit<R: Rng + ?Sized>(&self, bits: &BitVector, rng: &mut R) -> Transmission;
}

/// Checks that `value` is a finite probability.
///
/// `name` is carried into the error so the caller can tell which knob was wrong.
pub fn validate_probability(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::parameter(name, value))
    }
}

/// One Bernoulli decision per call, shared by every channel model.
///
/// Rates of exactly 0 and 1 are decided without touching the generator, so a
/// channel that can never leave a state does not consume draws for it.
#[derive(Debug, Clone, Copy)]
pub struct FlipDraw {
    kind: DrawKind,
}

#[derive(Debug, Clone, Copy)]
enum DrawKind {
    Never,
    Always,
    Sometimes(Bernoulli),
}

impl FlipDraw {
    /// Builds a draw that comes up `true` with probability `p`.
    pub fn new(name: &'static str, p: f64) -> Result<Self> {
        let p = validate_probability(name, p)?;
        let kind = if p == 0.0 {
            DrawKind::Never
        } else if p == 1.0 {
            DrawKind::Always
        } else {
            DrawKind::Sometimes(Bernoulli::new(p).map_err(|_| Error::parameter(name, p))?)
        };
        Ok(FlipDraw { kind })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self.kind {
            DrawKind::Never => false,
            DrawKind::Always => true,
            DrawKind::Sometimes(dist) => dist.sample(rng),
        }
    }
}

/// Channel selection with its parameters, as supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelModel {
    Bsc(BscParams),
    GilbertElliott(GilbertElliottParams),
}

impl ChannelModel {
    /// Validates every probability of the selected model.
    pub fn validate(&self) -> Result<()> {
        match self {
            ChannelModel::Bsc(params) => params.validate(),
            ChannelModel::GilbertElliott(params) => params.validate(),
        }
    }

    /// Builds the channel, failing on the first out-of-range probability.
    pub fn build(&self) -> Result<ConfiguredChannel> {
        Ok(match *self {
            ChannelModel::Bsc(params) => {
                ConfiguredChannel::Bsc(BinarySymmetricChannel::from_params(params)?)
            }
            ChannelModel::GilbertElliott(params) => {
                ConfiguredChannel::GilbertElliott(GilbertElliottChannel::from_params(params)?)
            }
        })
    }

    /// Short label used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            ChannelModel::Bsc(_) => "bsc",
            ChannelModel::GilbertElliott(_) => "gilbert-elliott",
        }
    }
}

impl Default for ChannelModel {
    fn default() -> Self {
        ChannelModel::Bsc(BscParams::default())
    }
}

/// A validated channel of either kind.
#[derive(Debug, Clone)]
pub enum ConfiguredChannel {
    Bsc(BinarySymmetricChannel),
    GilbertElliott(GilbertElliottChannel),
}

impl Channel for ConfiguredChannel {
    fn transmit<R: Rng + ?Sized>(&self, bits: &BitVector, rng: &mut R) -> Transmission {
        match self {
            ConfiguredChannel::Bsc(channel) => channel.transmit(bits, rng),
            ConfiguredChannel::GilbertElliott(channel) => channel.transmit(bits, rng),
        }
    }
}
