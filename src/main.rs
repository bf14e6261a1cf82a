//! Valley Sampler CLI
//!
//! Cuts valley-aligned windows from sensor recordings and patches them with
//! the average duration profile.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use valley_sampler::{
    config::{Config, SamplingConfig},
    core::{EdgePolicy, Sampler},
    duration::{patch_duration, DurationOptions},
    stats::{create_shared_stats, SharedRunStats, StatsSnapshot},
    VERSION,
};

#[derive(Parser)]
#[command(name = "valley-sampler")]
#[command(version = VERSION)]
#[command(about = "Valley-aligned window sampling for sensor recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Window a single CSV file
    One {
        /// Source CSV file
        csv_file: PathBuf,

        /// Existing directory receiving the windows
        out_folder: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Window every file below a directory
    All {
        /// Source directory, walked recursively
        src_folder: PathBuf,

        /// Existing directory receiving the windows
        out_folder: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Compute durations, average the unpadded windows and attach the profile
    PatchDuration {
        /// Directory holding sampled windows
        src_folder: PathBuf,

        /// Existing directory receiving the patched windows
        out_folder: PathBuf,
    },

    /// Show configuration
    Config,

    /// Show statistics of the last run
    Status,
}

#[derive(Args)]
struct SamplingArgs {
    /// Half window size; windows hold twice this many rows
    #[arg(long)]
    win_size: usize,

    /// Comma-separated group keys to skip (defaults to the configured list)
    #[arg(long)]
    blacklist: Option<String>,

    /// Column used to group and filter rows
    #[arg(long)]
    filter_key: Option<String>,

    /// Column whose minimum anchors each window
    #[arg(long)]
    align_key: Option<String>,

    /// Trailing group-key characters kept in output names
    #[arg(long)]
    group_key_len: Option<usize>,

    /// Behaviour when the valley is the first row (fail or replicate-valley)
    #[arg(long)]
    edge_policy: Option<EdgePolicy>,
}

impl SamplingArgs {
    /// Apply command-line overrides on top of the configured defaults.
    fn apply(self, base: SamplingConfig) -> (usize, SamplingConfig) {
        let block_list = self
            .blacklist
            .as_deref()
            .map(SamplingConfig::parse_block_list)
            .unwrap_or_default();

        let mut config = base.with_block_list(block_list);
        if let Some(key) = self.filter_key {
            config.filter_key = key;
        }
        if let Some(key) = self.align_key {
            config.align_key = key;
        }
        if let Some(len) = self.group_key_len {
            config.group_key_len = len;
        }
        if let Some(policy) = self.edge_policy {
            config.edge_policy = policy;
        }
        (self.win_size, config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;

    match cli.command {
        Commands::One {
            csv_file,
            out_folder,
            sampling,
        } => {
            let stats = create_shared_stats();
            let sampler = build_sampler(&config, sampling, stats.clone())?;
            let written = sampler
                .process_one(&csv_file, &out_folder)
                .with_context(|| format!("sampling {}", csv_file.display()))?;
            finish_run(&config, &stats, written.len());
        }
        Commands::All {
            src_folder,
            out_folder,
            sampling,
        } => {
            let stats = create_shared_stats();
            let sampler = build_sampler(&config, sampling, stats.clone())?;
            let written = sampler
                .process_all(&src_folder, &out_folder)
                .with_context(|| format!("sampling {}", src_folder.display()))?;
            finish_run(&config, &stats, written.len());
        }
        Commands::PatchDuration {
            src_folder,
            out_folder,
        } => {
            cmd_patch_duration(&config, src_folder, out_folder)?;
        }
        Commands::Config => {
            cmd_config(&config)?;
        }
        Commands::Status => {
            cmd_status(&config);
        }
    }

    Ok(())
}

fn build_sampler(config: &Config, args: SamplingArgs, stats: SharedRunStats) -> Result<Sampler> {
    let (win_size, sampling) = args.apply(config.sampling.clone());
    let sampler = Sampler::new(win_size, sampling)?
        .with_overwrite(config.overwrite)
        .with_stats(stats);
    Ok(sampler)
}

fn cmd_patch_duration(config: &Config, src_folder: PathBuf, out_folder: PathBuf) -> Result<()> {
    let stats = create_shared_stats();
    let options = DurationOptions {
        config: config.duration.clone(),
        overwrite: config.overwrite,
        stats: stats.clone(),
    };

    let profile = patch_duration(&src_folder, &out_folder, &options)
        .with_context(|| format!("patching durations from {}", src_folder.display()))?;

    let snapshot = stats.snapshot();
    finish_run(config, &stats, snapshot.tables_dispatched as usize);
    println!("Average duration profile ({} positions):", profile.len());
    println!(
        "  {}",
        profile
            .values()
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

/// Print the run summary and persist it for `status`.
fn finish_run(config: &Config, stats: &SharedRunStats, files: usize) {
    println!("Wrote {files} file(s)");
    println!();
    println!("{}", stats.summary());

    if let Err(e) = config.ensure_directories() {
        tracing::warn!("could not create data directory: {e}");
        return;
    }
    if let Err(e) = stats.save(&config.stats_path()) {
        tracing::warn!("could not save run statistics: {e}");
    }
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_status(config: &Config) {
    let path = config.stats_path();
    match StatsSnapshot::load(&path) {
        Ok(snapshot) => println!("{}", snapshot.summary()),
        Err(_) => println!("No previous run found at {path:?}"),
    }
}
