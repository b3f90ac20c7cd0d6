use std::path::PathBuf;

use clap::Parser;
use tennis_stats::{calculate_match_stats, Side};

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let points = tennis_loader::load_points_from_path(args.path)?;
    let stats = calculate_match_stats(&points);
    println!("points={}", stats.total_points);
    for side in Side::BOTH {
        let view = stats.player(side);
        println!(
            "{side} won={} aces={} double_faults={} winners={}",
            view.points_won(),
            view.aces(),
            view.double_faults(),
            view.winners()
        );
    }
    Ok(())
}
