//! Seeded self-play: plays batches of games with a uniform-random policy
//! and collects one summary per game.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use twenty48_core::engine::{Board, Move, SIZE};
use twenty48_core::session::Game;

use crate::config::Config;

/// Outcome of one finished (or step-capped) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub game_id: u32,
    pub seed: u64,
    /// Effective moves played; inputs that leave the board unchanged are
    /// never picked by the policy and never counted.
    pub steps: u64,
    pub highest_tile: u32,
    pub final_board: [[u32; SIZE]; SIZE],
}

/// Plays one game to the end, or to `max_steps`, picking uniformly among
/// the directions that would change the board.
pub fn play_game(game_id: u32, seed: u64, max_steps: Option<u64>) -> RunSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(&mut rng);
    let mut steps = 0u64;
    while !game.is_over() {
        if max_steps.map(|cap| steps >= cap).unwrap_or(false) {
            break;
        }
        if let Some(direction) = choose_move(game.board(), &mut rng) {
            if game.apply_move(direction, &mut rng) {
                steps += 1;
            }
        } else {
            break;
        }
    }
    RunSummary {
        game_id,
        seed,
        steps,
        highest_tile: game.board().highest_tile(),
        final_board: game.board().cells(),
    }
}

fn choose_move<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Option<Move> {
    let legal = board.legal_moves();
    let count = legal.iter().filter(|&&allowed| allowed).count();
    if count == 0 {
        return None;
    }
    let mut pick = rng.gen_range(0..count);
    for (i, &allowed) in legal.iter().enumerate() {
        if !allowed {
            continue;
        }
        if pick == 0 {
            return Some(Move::ALL[i]);
        }
        pick -= 1;
    }
    None
}

/// Plays `config.num_games` games in parallel; summaries come back in
/// game-id order.
pub fn run_selfplay(config: &Config) -> Result<Vec<RunSummary>> {
    if config.num_games == 0 {
        bail!("num_games must be greater than 0");
    }

    let pb = ProgressBar::new(u64::from(config.num_games));
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let play = || -> Vec<RunSummary> {
        (0..config.num_games)
            .into_par_iter()
            .map(|game_id| {
                let summary = play_game(
                    game_id,
                    config.base_seed + u64::from(game_id),
                    config.max_steps,
                );
                pb.inc(1);
                summary
            })
            .collect()
    };

    let summaries = if let Some(n) = config.max_workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build rayon thread pool")?
            .install(play)
    } else {
        play()
    };
    pb.finish_with_message("games finished");
    Ok(summaries)
}

/// Writes summaries as JSON Lines, one game per line.
pub fn write_report(path: &Path, summaries: &[RunSummary]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for summary in summaries {
        serde_json::to_writer(&mut out, summary)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Report;
    use std::io::BufRead;

    #[test]
    fn test_play_game_is_deterministic() {
        let a = play_game(0, 7, None);
        let b = play_game(0, 7, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_play_game_reaches_a_stuck_board() {
        let summary = play_game(3, 99, None);
        assert_eq!(summary.game_id, 3);
        assert_eq!(summary.seed, 99);
        assert!(summary.steps > 0);

        let final_board = Board::from_cells(summary.final_board).unwrap();
        assert!(final_board.is_game_over());
        assert_eq!(summary.highest_tile, final_board.highest_tile());
    }

    #[test]
    fn test_play_game_respects_the_step_cap() {
        let summary = play_game(0, 1, Some(5));
        assert!(summary.steps <= 5);
    }

    #[test]
    fn test_choose_move_only_picks_effective_directions() {
        let mut rng = StdRng::seed_from_u64(17);
        assert_eq!(choose_move(Board::EMPTY, &mut rng), None);

        // Tile on the top edge: Up can never be picked
        let top_edge = Board::from_cells([[0, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        for _ in 0..100 {
            let picked = choose_move(top_edge, &mut rng).unwrap();
            assert_ne!(picked, Move::Up);
        }
    }

    #[test]
    fn test_run_selfplay_plays_every_game() {
        let config = Config {
            num_games: 4,
            base_seed: 10,
            max_steps: Some(50),
            max_workers: Some(2),
            report: Report::default(),
        };
        let summaries = run_selfplay(&config).unwrap();
        assert_eq!(summaries.len(), 4);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.game_id, i as u32);
            assert_eq!(summary.seed, 10 + i as u64);
        }
    }

    #[test]
    fn test_run_selfplay_rejects_empty_runs() {
        let config = Config {
            num_games: 0,
            base_seed: 1,
            max_steps: None,
            max_workers: None,
            report: Report::default(),
        };
        assert!(run_selfplay(&config).is_err());
    }

    #[test]
    fn test_write_report_emits_one_line_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let summaries = vec![play_game(0, 5, Some(20)), play_game(1, 6, Some(20))];

        write_report(&path, &summaries).unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["game_id"], 0);
        assert_eq!(first["seed"], 5);
        assert!(first["final_board"].is_array());
    }
}
