//! lrudemo - replay a get/put script against an LRU cache

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::{CacheStats, LruCache, PutOutcome};
use tracing::{debug, info};

use crate::script::{parse_script, Command};

/// Fills a capacity-2 cache, promotes key 1, then forces key 2 out
const DEFAULT_SCRIPT: &str = "put 1 1; put 2 2; get 1; put 3 3; get 2";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = 2)]
    capacity: usize,

    /// Commands separated by ';' or newlines, e.g. "put 1 1; get 1"
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Read the script from a file instead
    #[arg(short, long, conflicts_with = "script")]
    file: Option<PathBuf>,

    /// Print hit/miss/eviction counters at the end
    #[arg(long)]
    stats: bool,
}

/// One replayed command and the cache state right after it
#[derive(Debug, PartialEq, Eq)]
struct Step {
    command: Command,
    result: Option<String>,
    state: String,
}

fn replay(
    cache: &mut LruCache<i64, i64>,
    stats: &CacheStats,
    commands: &[Command],
) -> Vec<Step> {
    commands
        .iter()
        .map(|&command| {
            let result = match command {
                Command::Get(key) => Some(match stats.record_lookup(cache.get(&key)) {
                    Some(value) => value.to_string(),
                    None => "-1 (not found)".to_string(),
                }),
                Command::Put(key, value) => {
                    let outcome = cache.upsert(key, value);
                    stats.record_put(&outcome);
                    match outcome {
                        PutOutcome::Evicted(evicted) => Some(format!("evicted {}", evicted)),
                        PutOutcome::Inserted | PutOutcome::Updated => None,
                    }
                }
            };

            debug!(%command, len = cache.len(), "replayed");
            Step {
                command,
                result,
                state: cache.to_string(),
            }
        })
        .collect()
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let script = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => args.script.clone(),
    };
    let commands = parse_script(&script)?;

    info!("Cache capacity: {}", args.capacity);
    info!("Replaying {} commands", commands.len());

    let mut cache = LruCache::new(args.capacity)?;
    let stats = CacheStats::new();

    for step in replay(&mut cache, &stats, &commands) {
        let command = step.command.to_string();
        match step.result {
            Some(result) => println!("{:<16} -> {:<16} {}", command, result, step.state),
            None => println!("{:<16}    {:<16} {}", command, "", step.state),
        }
    }

    if args.stats {
        println!("\n{}", stats.snapshot());
    }

    Ok(())
}
