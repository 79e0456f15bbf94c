mod config;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use config::Config;

#[derive(Parser, Debug)]
struct Args {
    /// Path to self-play TOML config
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Optional: override num_games from the config
    #[arg(long, value_name = "N")]
    games: Option<u32>,
    /// Optional: override [report] results_file from the config
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut cfg = Config::from_toml(&args.config)
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    if let Some(games) = args.games {
        cfg.num_games = games;
    }
    if let Some(path) = args.results {
        cfg.report.results_file = Some(path);
    }

    let summaries = runner::run_selfplay(&cfg)?;

    let total_steps: u64 = summaries.iter().map(|s| s.steps).sum();
    let best_tile = summaries
        .iter()
        .map(|s| s.highest_tile)
        .max()
        .unwrap_or(0);
    info!(
        "Played {} games: {:.1} steps on average, best tile {}",
        summaries.len(),
        total_steps as f64 / summaries.len() as f64,
        best_tile
    );

    if let Some(path) = &cfg.report.results_file {
        runner::write_report(path, &summaries)?;
        info!("Wrote results to {}", path.display());
    }
    Ok(())
}
