//! `fec-sim`: send text through a Hamming-coded noisy channel.
//!
//! **Usage:**
//! ```text
//! fec-sim send --text "hello" [--channel bsc|ge] [--ber F] [--p-gb F --p-bg F --p-g F --p-b F]
//!              [--seed N] [--block-len N]
//! fec-sim sweep --text "hello" [--ber-from F] [--ber-to F] [--points N] [--trials N]
//!               [--seed N] [--block-len N] [--csv PATH]
//! ```
//!
//! Set `RUST_LOG` (or pass `--verbose`) for per-stage logging.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fec_channel_sim::channel::{BscParams, ChannelModel, GilbertElliottParams};
use fec_channel_sim::sim::{self, SimulationConfig};
use fec_channel_sim::BitVector;
use log::info;

/// Simulate Hamming-protected transmission over BSC and Gilbert-Elliott channels.
#[derive(Parser)]
#[command(name = "fec-sim", version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the text once and report what survived
    Send(SendArgs),
    /// Average many trials over a log-spaced range of BSC error rates
    Sweep(SweepArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum ChannelKind {
    Bsc,
    Ge,
}

#[derive(Args)]
struct Common {
    /// Message to transmit, 8 bits per character
    #[arg(long)]
    text: String,

    /// Seed for every random draw
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Data bits per Hamming block (default: whole message in one block)
    #[arg(long)]
    block_len: Option<usize>,
}

#[derive(Args)]
struct SendArgs {
    #[command(flatten)]
    common: Common,

    #[arg(long, value_enum, default_value_t = ChannelKind::Bsc)]
    channel: ChannelKind,

    /// BSC bit error rate
    #[arg(long, default_value_t = 0.01)]
    ber: f64,

    /// Gilbert-Elliott Good -> Bad probability
    #[arg(long, default_value_t = 0.01)]
    p_gb: f64,

    /// Gilbert-Elliott Bad -> Good probability
    #[arg(long, default_value_t = 0.1)]
    p_bg: f64,

    /// Gilbert-Elliott flip probability in the Good state
    #[arg(long, default_value_t = 0.001)]
    p_g: f64,

    /// Gilbert-Elliott flip probability in the Bad state
    #[arg(long, default_value_t = 0.3)]
    p_b: f64,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    common: Common,

    #[arg(long, default_value_t = 1e-3)]
    ber_from: f64,

    #[arg(long, default_value_t = 1e-6)]
    ber_to: f64,

    #[arg(long, default_value_t = 10)]
    points: usize,

    #[arg(long, default_value_t = 1000)]
    trials: usize,

    /// Write results here instead of stdout
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Command::Send(args) => send(args),
        Command::Sweep(args) => sweep(args),
    }
}

fn send(args: SendArgs) -> Result<()> {
    let channel = match args.channel {
        ChannelKind::Bsc => ChannelModel::Bsc(BscParams { ber: args.ber }),
        ChannelKind::Ge => ChannelModel::GilbertElliott(GilbertElliottParams {
            p_gb: args.p_gb,
            p_bg: args.p_bg,
            p_g: args.p_g,
            p_b: args.p_b,
        }),
    };
    let config = SimulationConfig {
        channel,
        trials: 1,
        seed: args.common.seed,
        block_len: args.common.block_len,
    };
    config.validate()?;

    let message = BitVector::from_text(&args.common.text)?;
    info!(
        "sending {} bits over {} (seed {})",
        message.len(),
        channel.name(),
        config.seed
    );

    let outcome = sim::run_seeded_trial(&message, &config, 0)?;

    println!("Channel:              {}", channel.name());
    println!("Message bits:         {}", message.len());
    println!("Bits flipped:         {}", outcome.flipped);
    println!("Bits still wrong:     {}", outcome.differences);
    println!("Blocks corrected:     {}", outcome.corrected_blocks);
    println!("Blocks uncorrectable: {}", outcome.uncorrectable_blocks);
    match outcome.decoded.to_text() {
        Ok(text) => println!("Decoded text:         {:?}", text),
        Err(e) => println!("Decoded text:         <{}>", e),
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> Result<()> {
    let message = BitVector::from_text(&args.common.text)?;
    let bers = sim::log_space(args.ber_from, args.ber_to, args.points)?;
    let config = SimulationConfig {
        channel: ChannelModel::default(),
        trials: args.trials,
        seed: args.common.seed,
        block_len: args.common.block_len,
    };

    let points = sim::sweep_ber(&message, &bers, &config)?;

    match args.csv {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            sim::write_csv(BufWriter::new(file), &points)?;
            info!("wrote {} rows to {}", points.len(), path.display());
        }
        None => sim::write_csv(io::stdout().lock(), &points)?,
    }
    Ok(())
}
