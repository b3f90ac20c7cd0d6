use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tennis_stats::{
    aggregate_player_stats_across_matches, calculate_detailed_match_stats_with_window,
    calculate_match_stats, calculate_match_stats_by_level, calculate_set_stats,
    parse_detail_level, try_decode_match_points, DetailLevel, InstantStatsCache, StatsConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod summary;

#[derive(Debug, Parser)]
#[command(name = "tstats")]
#[command(about = "Tennis match statistics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Statistics for one point log.
    Match {
        input: PathBuf,
        /// points-only, simple, detailed or custom.
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        by_set: bool,
        /// Serve/shot direction, pressure points and momentum.
        #[arg(long, conflicts_with_all = ["level", "by_set"])]
        detailed: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Career totals for one player across a match list.
    Player {
        input: PathBuf,
        #[arg(long)]
        player: String,
        /// Fail on the first malformed point instead of skipping it.
        #[arg(long)]
        strict: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Dashboard stats and next milestone for one player.
    Instant {
        input: PathBuf,
        #[arg(long)]
        player: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Plain-text table of the core numbers for a point log.
    Summary { input: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Match {
            input,
            level,
            by_set,
            detailed,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let points = tennis_loader::load_points_from_path(&input)?;
            tracing::debug!(points = points.len(), "point log loaded");

            let level = match level {
                Some(name) => Some(
                    parse_detail_level(&name).with_context(|| format!("invalid --level: {name}"))?,
                ),
                None => config.default_detail_level,
            };

            if detailed {
                let stats = calculate_detailed_match_stats_with_window(&points, config.momentum_window);
                emit(&stats, output.as_deref())?;
            } else if by_set {
                let stats = calculate_set_stats(&points, level.unwrap_or(DetailLevel::Detailed));
                emit(&stats, output.as_deref())?;
            } else {
                let stats = match level {
                    Some(level) => calculate_match_stats_by_level(&points, level),
                    None => calculate_match_stats(&points),
                };
                emit(&stats, output.as_deref())?;
            }
        }
        Command::Player {
            input,
            player,
            strict,
            output,
        } => {
            let matches = tennis_loader::load_matches_from_path(&input)?;
            if strict {
                for m in &matches {
                    try_decode_match_points(m).context("invalid point log")?;
                }
            }
            let stats = aggregate_player_stats_across_matches(&matches, &player);
            emit(&stats, output.as_deref())?;
        }
        Command::Instant {
            input,
            player,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let matches = tennis_loader::load_matches_from_path(&input)?;
            let mut cache = InstantStatsCache::new(config.cache);
            let stats = cache.get_or_compute(&matches, Some(&player));
            emit(&*stats, None)?;
        }
        Command::Summary { input } => {
            let points = tennis_loader::load_points_from_path(&input)?;
            print!("{}", summary::render_summary(&calculate_match_stats(&points)));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StatsConfig> {
    match path {
        Some(path) => tennis_loader::load_config_from_path(path),
        None => Ok(StatsConfig::default()),
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize stats")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write: {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
