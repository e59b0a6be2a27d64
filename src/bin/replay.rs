use anyhow::{Context, Result};
use chain_map::{read_commands, Engine, OutputEvent, RejectReason};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay a CSV operation log against an empty map
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operation log with header `op,key,value,index`
    #[arg(value_name = "FILE")]
    log: PathBuf,

    /// Print the final pairs in order
    #[arg(long)]
    show: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default, Debug)]
struct Tally {
    inserted: u64,
    updated: u64,
    erased: u64,
    found: u64,
    cleared: u64,
    duplicate_key: u64,
    key_not_found: u64,
    index_out_of_range: u64,
}

impl Tally {
    fn record(&mut self, event: &OutputEvent<String, String>) {
        match event {
            OutputEvent::Inserted { .. } => self.inserted += 1,
            OutputEvent::Updated => self.updated += 1,
            OutputEvent::Erased => self.erased += 1,
            OutputEvent::Found { .. } | OutputEvent::FoundAt { .. } => self.found += 1,
            OutputEvent::Cleared { .. } => self.cleared += 1,
            OutputEvent::Rejected { reason } => match reason {
                RejectReason::DuplicateKey => self.duplicate_key += 1,
                RejectReason::KeyNotFound => self.key_not_found += 1,
                RejectReason::IndexOutOfRange => self.index_out_of_range += 1,
            },
        }
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

    let file = File::open(&cli.log)
        .with_context(|| format!("failed to open operation log {}", cli.log.display()))?;
    let commands = read_commands(BufReader::new(file))
        .with_context(|| format!("failed to parse operation log {}", cli.log.display()))?;
    info!(commands = commands.len(), "replaying operation log");

    let mut engine = Engine::new();
    let mut tally = Tally::default();
    for cmd in commands {
        let event = engine.process_command(cmd);
        debug!(?event, "applied");
        tally.record(&event);
    }

    println!("=== Replay Summary ===");
    println!("Commands:           {}", engine.processed());
    println!("Inserted:           {}", tally.inserted);
    println!("Updated:            {}", tally.updated);
    println!("Erased:             {}", tally.erased);
    println!("Found:              {}", tally.found);
    println!("Cleared:            {}", tally.cleared);
    println!("Duplicate key:      {}", tally.duplicate_key);
    println!("Key not found:      {}", tally.key_not_found);
    println!("Index out of range: {}", tally.index_out_of_range);
    println!("----------------------");
    println!("Final size:         {}", engine.len());
    println!("State hash:         {:#018x}", engine.state_hash());

    if cli.show {
        println!("\nContents:");
        for (index, (key, value)) in engine.map.iter().enumerate() {
            println!("{:6}  {} = {}", index, key, value);
        }
    }

    Ok(())
}
