use anyhow::{Context, Result};
use chain_map::{Command, Engine};
use clap::Parser;
use hdrhistogram::Histogram;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Per-command latency of a seeded random workload
#[derive(Parser, Debug)]
#[command(name = "latency-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of measured commands
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: u64,

    /// Size of the key space (bounds the map size)
    #[arg(short, long, default_value_t = 256, value_parser = clap::value_parser!(u64).range(1..))]
    keys: u64,

    /// PRNG seed for the workload
    #[arg(short, long, default_value_t = 0xDEADBEEF)]
    seed: u64,

    /// Pin the measuring thread to the last CPU core
    #[arg(long)]
    pin: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn random_command(rng: &mut ChaCha8Rng, key_space: u64) -> Command<u64, u64> {
    let key = rng.gen_range(0..key_space);
    let value = rng.gen();
    match rng.gen_range(0..10) {
        0..=2 => Command::Insert { key, value },
        3..=4 => Command::InsertOrUpdate { key, value },
        5..=6 => Command::Erase { key },
        7..=8 => Command::Get { key },
        _ => Command::GetIndex {
            index: rng.gen_range(0..key_space as usize),
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut engine = Engine::with_capacity(cli.keys as usize);
    if cli.pin && !engine.pin_to_core() {
        warn!("could not pin to a CPU core, measuring unpinned");
    }

    let mut histogram = Histogram::<u64>::new_with_bounds(1, 100_000_000, 3)
        .context("creating latency histogram")?;
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

    // Warm-up: fill the map to its steady-state size
    for _ in 0..cli.keys * 4 {
        engine.process_command(random_command(&mut rng, cli.keys));
    }
    info!(entries = engine.len(), iterations = cli.iterations, "running workload");

    let mut total_duration = Duration::ZERO;
    let mut rejected = 0u64;

    for _ in 0..cli.iterations {
        let cmd = random_command(&mut rng, cli.keys);

        // Critical measurement section
        let start = Instant::now();
        let event = std::hint::black_box(engine.process_command(cmd));
        let elapsed = start.elapsed();

        if event.is_rejected() {
            rejected += 1;
        }
        // Saturate outliers rather than failing the run
        histogram.saturating_record(elapsed.as_nanos() as u64);
        total_duration += elapsed;
    }

    println!("\n=== Latency Report (ns) ===");
    println!("Total Ops:  {}", cli.iterations);
    println!("Rejected:   {}", rejected);
    println!("Final size: {}", engine.len());
    println!(
        "Throughput: {:.2} ops/sec",
        cli.iterations as f64 / total_duration.as_secs_f64()
    );
    println!("---------------------------");
    println!("Min:    {:6} ns", histogram.min());
    println!("P50:    {:6} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:6} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:6} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6} ns", histogram.value_at_quantile(0.999));
    println!("P99.99: {:6} ns", histogram.value_at_quantile(0.9999));
    println!("Max:    {:6} ns", histogram.max());
    println!("---------------------------");

    println!("\nDistribution:");
    for v in histogram.iter_log(100, 2.0) {
        let count = v.count_since_last_iteration();
        if count > 0 {
            println!("<= {:8} ns: {:10} count", v.value_iterated_to(), count);
        }
    }

    Ok(())
}
