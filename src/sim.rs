//! Monte Carlo simulation of a coded transmission.
//!
//! One *trial* sends a message through the full pipeline:
//!
//! ```text
//! message -> Hamming encode -> channel -> Hamming decode -> count differences
//! ```
//!
//! and records how many bits the channel flipped and how many message bits
//! were still wrong after decoding. [`simulate`] repeats a trial many times
//! in parallel; [`sweep_ber`] does that for a series of BSC error rates and
//! [`write_csv`] turns the result into a report.
//!
//! Trials are reproducible: trial `t` of a run seeded with `s` always uses
//! stream `t` of a ChaCha8 generator seeded with `s`, regardless of which
//! thread picks it up.

use crate::cs::bits::{count_differences, BitVector};
use crate::cs::channel::{BscParams, Channel, ChannelModel};
use crate::cs::ecc::HammingCode;
use crate::error::{Error, Result};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::io::Write;

/// Settings for a batch of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Channel model and its probabilities
    pub channel: ChannelModel,
    /// Number of independent trials
    pub trials: usize,
    /// Seed for every random decision in the run
    pub seed: u64,
    /// Data bits per Hamming block; `None` encodes the message as one block
    pub block_len: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            channel: ChannelModel::default(),
            trials: 1000,
            seed: 0,
            block_len: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        self.channel.validate()?;
        if self.trials == 0 {
            return Err(Error::InvalidInput(
                "Number of trials must be positive".to_string(),
            ));
        }
        if self.block_len == Some(0) {
            return Err(Error::InvalidInput(
                "Block length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of sending one message through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Bits flipped by the channel, parity bits included
    pub flipped: usize,
    /// Message bits still wrong after decoding
    pub differences: usize,
    /// Blocks in which the decoder flipped a bit
    pub corrected_blocks: usize,
    /// Blocks the decoder gave up on
    pub uncorrectable_blocks: usize,
    /// Decoded message; uncorrectable blocks contribute their received data bits
    pub decoded: BitVector,
}

/// Aggregate over a batch of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSummary {
    pub trials: usize,
    pub mean_flipped: f64,
    pub mean_differences: f64,
    /// Fraction of trials with at least one uncorrectable block
    pub uncorrectable_rate: f64,
    /// Mean fraction of message bits wrong after decoding
    pub residual_ber: f64,
}

/// One row of a BER sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub ber: f64,
    pub summary: TrialSummary,
}

/// Runs a single trial.
///
/// # Errors
///
/// [`Error::InvalidMessageLength`] for an empty message and
/// [`Error::InvalidInput`] for a zero block length.
pub fn run_trial<C, R>(
    message: &BitVector,
    channel: &C,
    block_len: Option<usize>,
    rng: &mut R,
) -> Result<TrialOutcome>
where
    C: Channel + ?Sized,
    R: Rng + ?Sized,
{
    let codec = HammingCode::new();
    let block_len = block_len.unwrap_or(message.len().max(1));

    let codeword = codec.encode_blocks(message, block_len)?;
    let transmission = channel.transmit(&codeword, rng);
    let report = codec.decode_blocks(&transmission.bits, message.len(), block_len)?;
    let differences = count_differences(message, &report.data);

    debug!(
        "trial: flipped={} differences={} corrected={} uncorrectable={}",
        transmission.flipped, differences, report.corrected, report.uncorrectable
    );

    Ok(TrialOutcome {
        flipped: transmission.flipped,
        differences,
        corrected_blocks: report.corrected,
        uncorrectable_blocks: report.uncorrectable,
        decoded: report.data,
    })
}

/// Runs one seeded trial; the generator for trial `index` is a dedicated
/// ChaCha stream so parallel trials never share state.
pub fn run_seeded_trial(
    message: &BitVector,
    config: &SimulationConfig,
    index: u64,
) -> Result<TrialOutcome> {
    let channel = config.channel.build()?;
    let mut rng = trial_rng(config.seed, index);
    run_trial(message, &channel, config.block_len, &mut rng)
}

/// Runs `config.trials` independent trials in parallel and aggregates them.
pub fn simulate(message: &BitVector, config: &SimulationConfig) -> Result<TrialSummary> {
    simulate_streams(message, config, 0)
}

fn simulate_streams(
    message: &BitVector,
    config: &SimulationConfig,
    stream_base: u64,
) -> Result<TrialSummary> {
    config.validate()?;
    let channel = config.channel.build()?;

    let outcomes = (0..config.trials as u64)
        .into_par_iter()
        .map(|trial| {
            let mut rng = trial_rng(config.seed, stream_base + trial);
            run_trial(message, &channel, config.block_len, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(summarize(&outcomes, message.len()))
}

/// Runs [`simulate`] over a BSC for every rate in `bers`.
///
/// `config.channel` is ignored; each point uses a BSC at its own rate and
/// its own block of generator streams.
pub fn sweep_ber(
    message: &BitVector,
    bers: &[f64],
    config: &SimulationConfig,
) -> Result<Vec<SweepPoint>> {
    info!(
        "sweep: {} points x {} trials, {} message bits, seed {}",
        bers.len(),
        config.trials,
        message.len(),
        config.seed
    );

    let mut points = Vec::with_capacity(bers.len());
    for (idx, &ber) in bers.iter().enumerate() {
        let point_config = SimulationConfig {
            channel: ChannelModel::Bsc(BscParams { ber }),
            ..*config
        };
        let summary = simulate_streams(message, &point_config, (idx as u64) << 32)?;
        debug!(
            "sweep point ber={:e}: mean_flipped={:.4} mean_differences={:.4}",
            ber, summary.mean_flipped, summary.mean_differences
        );
        points.push(SweepPoint { ber, summary });
    }

    info!("sweep: finished {} points", points.len());
    Ok(points)
}

/// `points` values spaced evenly on a log scale from `from` to `to`, both included.
pub fn log_space(from: f64, to: f64, points: usize) -> Result<Vec<f64>> {
    if !(from > 0.0 && to > 0.0 && from.is_finite() && to.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "log-spaced range needs positive finite bounds, got {} and {}",
            from, to
        )));
    }
    if points == 0 {
        return Err(Error::InvalidInput(
            "Number of points must be positive".to_string(),
        ));
    }
    if points == 1 {
        return Ok(vec![from]);
    }

    let (start, end) = (from.ln(), to.ln());
    let step = (end - start) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| {
            if i == points - 1 {
                to
            } else {
                (start + step * i as f64).exp()
            }
        })
        .collect())
}

/// Writes sweep results as CSV with a header row.
pub fn write_csv<W: Write>(mut writer: W, points: &[SweepPoint]) -> Result<()> {
    writeln!(
        writer,
        "ber,mean_flipped,mean_differences,uncorrectable_rate,residual_ber"
    )?;
    for point in points {
        let s = &point.summary;
        writeln!(
            writer,
            "{},{},{},{},{}",
            point.ber, s.mean_flipped, s.mean_differences, s.uncorrectable_rate, s.residual_ber
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn trial_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

fn summarize(outcomes: &[TrialOutcome], message_len: usize) -> TrialSummary {
    let trials = outcomes.len();
    let n = trials.max(1) as f64;

    let total_flipped: usize = outcomes.iter().map(|o| o.flipped).sum();
    let total_differences: usize = outcomes.iter().map(|o| o.differences).sum();
    let failed = outcomes
        .iter()
        .filter(|o| o.uncorrectable_blocks > 0)
        .count();

    let mean_differences = total_differences as f64 / n;
    TrialSummary {
        trials,
        mean_flipped: total_flipped as f64 / n,
        mean_differences,
        uncorrectable_rate: failed as f64 / n,
        residual_ber: mean_differences / message_len.max(1) as f64,
    }
}
