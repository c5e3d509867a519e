//! `reefctl` — inspect partition ownership of a bounded-load ring.
//!
//! Builds a ring from a config file and/or member ids given on the command
//! line, then reports loads, key owners, or the partitions that would move
//! on a membership change.
//!
//! # Usage
//!
//! ```text
//! reefctl loads -m node-a -m node-b -m node-c        # per-member load
//! reefctl -c reef.toml locate user:42 user:43        # owner of each key
//! reefctl -c reef.toml locate --backups 2 user:42    # owner + 2 backups
//! reefctl -c reef.toml diff --add node-d             # partitions that move
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use reef_placement::{Blake3Hasher, Consistent, PartitionTable, RingHasher, Xxh3Hasher};
use tracing::{debug, info};

use config::{CliConfig, HasherKind};

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "reefctl",
    version,
    about = "Inspect partition ownership of a bounded-load consistent hashing ring"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Member id to place on the ring. Can be specified multiple times.
    ///
    /// Replaces `[members] ids` from the config file when given.
    #[arg(short, long = "member", global = true)]
    members: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many partitions each member owns.
    Loads,

    /// Show the partition and owner of each key.
    Locate {
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,

        /// Also list this many backup members after the owner.
        #[arg(short, long, default_value = "0")]
        backups: usize,
    },

    /// Show the partitions that move when one member joins or leaves.
    Diff {
        /// Member joining the ring.
        #[arg(long, conflicts_with = "remove", required_unless_present = "remove")]
        add: Option<String>,

        /// Member leaving the ring.
        #[arg(long)]
        remove: Option<String>,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    // CLI members override config file members.
    if !cli.members.is_empty() {
        config.members.ids = cli.members;
    }

    match config.hasher_kind()? {
        HasherKind::Blake3 => run(&config, Blake3Hasher, cli.command),
        HasherKind::Xxh3 => run(&config, Xxh3Hasher, cli.command),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<H: RingHasher>(config: &CliConfig, hasher: H, command: Commands) -> Result<()> {
    let members: Vec<Arc<String>> = config.members.ids.iter().cloned().map(Arc::new).collect();
    if members.is_empty() {
        bail!("no members: pass -m <id> or set [members] ids in the config file");
    }

    info!(
        members = members.len(),
        partitions = config.ring.partition_count,
        replication_factor = config.ring.replication_factor,
        load_factor = config.ring.load_factor,
        "building ring"
    );
    let ring = Consistent::with_members(config.ring, hasher, members)
        .context("failed to distribute partitions")?;

    match command {
        Commands::Loads => cmd_loads(&ring),
        Commands::Locate { keys, backups } => cmd_locate(&ring, &keys, backups),
        Commands::Diff { add, remove } => cmd_diff(&ring, add, remove),
    }
}

// -----------------------------------------------------------------------
// reefctl loads
// -----------------------------------------------------------------------

fn cmd_loads<H: RingHasher>(ring: &Consistent<String, H>) -> Result<()> {
    let mut loads: Vec<(String, f64)> = ring.load_distribution().into_iter().collect();
    loads.sort_by(|a, b| a.0.cmp(&b.0));

    let average = ring.average_load();
    println!(
        "{} members, {} partitions, load cap {average}",
        ring.member_count(),
        ring.partition_count()
    );
    for (id, load) in loads {
        println!("  {id:<24} {load:>6}");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// reefctl locate
// -----------------------------------------------------------------------

fn cmd_locate<H: RingHasher>(
    ring: &Consistent<String, H>,
    keys: &[String],
    backups: usize,
) -> Result<()> {
    for key in keys {
        let partition = ring.find_partition(key);
        let closest = ring
            .closest_members(key, backups + 1)
            .with_context(|| format!("failed to locate {key:?}"))?;
        let owners: Vec<&str> = closest.iter().map(|m| m.as_str()).collect();
        debug!(key = %key, partition, "located key");
        println!("{key}\tpartition={partition}\t{}", owners.join(","));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// reefctl diff
// -----------------------------------------------------------------------

fn cmd_diff<H: RingHasher>(
    ring: &Consistent<String, H>,
    add: Option<String>,
    remove: Option<String>,
) -> Result<()> {
    let before = ring.snapshot();

    match (add, remove) {
        (Some(id), None) => ring
            .add_member(Arc::new(id.clone()))
            .with_context(|| format!("failed to add {id}"))?,
        (None, Some(id)) => ring
            .remove_member(&id)
            .with_context(|| format!("failed to remove {id}"))?,
        _ => bail!("pass exactly one of --add or --remove"),
    }

    let after = ring.snapshot();
    let migrations = PartitionTable::diff(&before, &after);
    println!(
        "{} of {} partitions move",
        migrations.len(),
        ring.partition_count()
    );
    for m in &migrations {
        println!("  partition {:>5}: {} -> {}", m.partition_id, m.from, m.to);
    }
    Ok(())
}
