use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use knuth_poisson::prelude::PoissonKnuth;
use log::info;
use photon_phy::{DEFAULT_MEAN_DETECTED_PHOTONS, prelude::*};
use rand::{SeedableRng, rngs::SmallRng};

/// Starshot transport layer simulation tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert pulses to Poisson-distributed photon counts
    Photons(PhotonsArgs),
    /// Insert erasures and noise into a run-length slot file
    Channel(ChannelArgs),
    /// Time repeated calls of the Poisson sampler
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
struct PhotonsArgs {
    /// Read an ASCII text input file (default is a binary file)
    #[arg(short)]
    ascii: bool,

    /// Input is run-length compressed (default is uncompressed)
    #[arg(short)]
    compressed: bool,

    /// Mean number of detected photons in a slot per incident pulse
    #[arg(short = 'k', long, default_value_t = DEFAULT_MEAN_DETECTED_PHOTONS)]
    mean_detected_photons: f64,

    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Pulse file to read
    input: PathBuf,

    /// Photon count file to write, in the same format as the input
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ChannelArgs {
    /// Run-length slot file to read
    input: PathBuf,

    /// Run-length slot file to write
    output: PathBuf,

    /// Probability that a pulse is erased
    #[arg(long)]
    erasure: f64,

    /// Probability that an empty slot receives a noise pulse
    #[arg(long)]
    noise: f64,

    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct BenchArgs {
    /// Mean of the Poisson distribution
    #[arg(long, default_value_t = 10.0)]
    lambda: f64,

    /// Number of samples to draw
    #[arg(long, default_value_t = 100_000, value_parser = clap::value_parser!(u64).range(1..))]
    calls: u64,

    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Photons(args) => photons(args),
        Command::Channel(args) => channel(args),
        Command::Bench(args) => bench(args),
    }
}

fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening input file {path:?}"))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("opening output file {path:?}"))?;
    Ok(BufWriter::new(file))
}

fn photons(args: PhotonsArgs) -> Result<()> {
    let encoding = if args.ascii {
        Encoding::Ascii
    } else {
        Encoding::Binary
    };
    let compression = if args.compressed {
        Compression::Rle
    } else {
        Compression::Raw
    };
    let config = PhyConfig {
        format: PulseFormat::new(encoding, compression),
        mean_detected_photons: args.mean_detected_photons,
        ..Default::default()
    };

    // Reject the rate before the output file is truncated
    PoissonKnuth::new(args.mean_detected_photons)?;

    info!("processing pulse data from input file {:?}", args.input);
    info!("writing photon count data to output file {:?}", args.output);
    let input = open(&args.input)?;
    let output = create(&args.output)?;

    let stats = convert(input, output, &config, &mut rng(args.seed))
        .with_context(|| format!("converting {:?}", args.input))?;
    println!("{stats}");
    Ok(())
}

fn channel(args: ChannelArgs) -> Result<()> {
    let channel = ErasureChannel::new(args.erasure, args.noise)?;
    let runs = read_runs(open(&args.input)?)
        .with_context(|| format!("reading run lengths from {:?}", args.input))?;

    let mut slots = runs_to_slots(&runs);
    let stats = channel.apply(&mut slots, &mut rng(args.seed));
    info!(
        "{} slots, {} pulses erased, {} noise pulses injected",
        slots.len(),
        stats.erased,
        stats.injected
    );

    write_runs(create(&args.output)?, &slots_to_runs(&slots))
        .with_context(|| format!("writing run lengths to {:?}", args.output))?;
    println!("Erased pulses = {}", stats.erased);
    println!("Injected noise pulses = {}", stats.injected);
    Ok(())
}

fn bench(args: BenchArgs) -> Result<()> {
    let mut rng = rng(args.seed);
    // Validate once, so the timed loop never fails halfway
    knuth_poisson::sample(args.lambda, &mut rng)?;

    let start = Instant::now();
    for _ in 0..args.calls {
        std::hint::black_box(knuth_poisson::sample(
            std::hint::black_box(args.lambda),
            &mut rng,
        )?);
    }
    let elapsed = start.elapsed().as_secs_f64();

    println!("Time per function call {}", elapsed / args.calls as f64);
    println!("Time per {} function calls {}", args.calls, elapsed);
    Ok(())
}
