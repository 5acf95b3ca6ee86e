//! Match command - many AI-vs-AI games with a summary
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use wargame_core::{AlphaBetaAI, HeuristicKind, Match, MatchResult, Outcome, RuleSet, SearchConfig};

use crate::config::{load_rules, SearchArgs};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Heuristic for the attacker AI (defaults to --heuristic)
    #[arg(long)]
    pub attacker_heuristic: Option<HeuristicKind>,

    /// Heuristic for the defender AI (defaults to --heuristic)
    #[arg(long)]
    pub defender_heuristic: Option<HeuristicKind>,

    /// Turn limit before a draw is declared
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Rule set JSON file (defaults to the standard 5x5 game)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Base seed; game i shuffles root moves with seed + i
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    outcome: Outcome,
    turns: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MatchArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref(), args.max_turns)?;
    let base = args.search.to_config(None)?;
    let attacker = base.clone().with_heuristic(args.attacker_heuristic.unwrap_or(base.heuristic));
    let defender = base.clone().with_heuristic(args.defender_heuristic.unwrap_or(base.heuristic));

    tracing::info!(
        games = args.games,
        rules = %rules.name,
        attacker = %attacker.heuristic,
        defender = %defender.heuristic,
        "Starting match"
    );

    let (result, games) = play_match(&rules, &attacker, &defender, &args)?;
    report_results(&result, &games, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_match(
    rules: &RuleSet,
    attacker: &SearchConfig,
    defender: &SearchConfig,
    args: &MatchArgs,
) -> Result<(MatchResult, Vec<GameRecord>)> {
    let progress = create_progress(args.games as u64)?;
    let mut result = MatchResult::default();
    let mut games = Vec::with_capacity(args.games);

    for i in 0..args.games {
        let seed = args.seed.wrapping_add(i as u64);
        let record = play_single_game(rules, attacker, defender, i + 1, seed, &mut result)?;

        tracing::debug!(game = record.game_number, outcome = %record.outcome, turns = record.turns, "game finished");
        progress.set_message(format!("{}", record.outcome));
        progress.inc(1);
        games.push(record);
    }

    progress.finish_and_clear();
    Ok((result, games))
}

fn report_results(result: &MatchResult, games: &[GameRecord], json: bool) -> Result<()> {
    if json {
        print_json_results(result, games)
    } else {
        print_text_results(result, games);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(
    rules: &RuleSet,
    attacker: &SearchConfig,
    defender: &SearchConfig,
    game_number: usize,
    seed: u64,
    result: &mut MatchResult,
) -> Result<GameRecord> {
    let initial = rules.to_game_state()?;
    let attacker = AlphaBetaAI::new(attacker.clone().with_seed(seed))?;
    let defender = AlphaBetaAI::new(defender.clone().with_seed(seed.wrapping_add(1)))?;

    let mut game = Match::new(initial, Box::new(attacker), Box::new(defender));
    let summary = game.run(|_| {})?;
    result.record(&summary);

    Ok(GameRecord {
        game_number,
        outcome: summary.outcome,
        turns: summary.turns_played,
    })
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn percent(rate: f32) -> f32 {
    rate * 100.0
}

fn print_json_results(result: &MatchResult, games: &[GameRecord]) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        result: &'a MatchResult,
        attacker_win_rate: f32,
        defender_win_rate: f32,
        draw_rate: f32,
        avg_turns: f32,
        games: &'a [GameRecord],
    }

    let output = JsonOutput {
        result,
        attacker_win_rate: result.attacker_win_rate(),
        defender_win_rate: result.defender_win_rate(),
        draw_rate: result.draw_rate(),
        avg_turns: result.avg_turns(),
        games,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(result: &MatchResult, games: &[GameRecord]) {
    println!("\n=== Match Results ===");
    println!("Total games:    {}", result.games_played);
    println!(
        "Attacker wins:  {} ({:.1}%)",
        result.attacker_wins,
        percent(result.attacker_win_rate())
    );
    println!(
        "Defender wins:  {} ({:.1}%)",
        result.defender_wins,
        percent(result.defender_win_rate())
    );
    println!("Draws:          {} ({:.1}%)", result.draws, percent(result.draw_rate()));
    println!("Avg turns:      {:.1}", result.avg_turns());

    println!("\nGame details:");
    for game in games {
        println!("  Game {}: {} in {} turns", game.game_number, game.outcome, game.turns);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_game_tallies() {
        let rules = RuleSet::default().with_max_turns(8);
        let config = SearchConfig::fixed_depth(1);
        let mut result = MatchResult::default();

        let record = play_single_game(&rules, &config, &config, 1, 42, &mut result).unwrap();
        assert_eq!(result.games_played, 1);
        assert!(record.turns <= 8);
        assert!(record.outcome.is_terminal());
    }

    #[test]
    fn test_progress_template() {
        assert!(create_progress(3).is_ok());
    }
}
