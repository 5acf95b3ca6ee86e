//! Play command - one game between humans and/or the AI
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_sources(), play(), report_result()
//! - Level 3: report_turn()

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use wargame_core::{
    AlphaBetaAI, GameState, Match, MatchSummary, MoveSource, Player, SearchConfig, SearchStats,
    TurnRecord,
};

use crate::config::{load_rules, SearchArgs};
use crate::human::HumanSource;
use crate::render;
use crate::trace::{JsonLog, TraceWriter};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

/// Who controls each side
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Human vs human
    Manual,
    /// Human attacker vs AI defender
    Attacker,
    /// AI attacker vs human defender
    Defender,
    /// AI vs AI
    Auto,
}

impl Mode {
    fn is_human(self, player: Player) -> bool {
        matches!(
            (self, player),
            (Mode::Manual, _) | (Mode::Attacker, Player::Attacker) | (Mode::Defender, Player::Defender)
        )
    }

    fn label(self) -> &'static str {
        match self {
            Mode::Manual => "H-H",
            Mode::Attacker => "H-AI",
            Mode::Defender => "AI-H",
            Mode::Auto => "AI-AI",
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Game mode
    #[arg(long, value_enum, default_value = "auto")]
    pub mode: Mode,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Turn limit before a draw is declared
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Rule set JSON file (defaults to the standard 5x5 game)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Shuffle the AI's root moves with this seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for the game trace file
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub trace_dir: PathBuf,

    /// Do not write a trace file
    #[arg(long)]
    pub no_trace: bool,

    /// Also write every turn record as a JSON line to this file
    #[arg(long, value_name = "FILE")]
    pub json_log: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref(), args.max_turns)?;
    let initial = rules.to_game_state()?;
    let config = args.search.to_config(args.seed)?;

    tracing::info!(
        mode = args.mode.label(),
        rules = %rules.name,
        max_depth = config.max_depth,
        alpha_beta = config.alpha_beta,
        heuristic = %config.heuristic,
        "Starting game"
    );

    let mut trace = if args.no_trace {
        None
    } else {
        Some(TraceWriter::create(&args.trace_dir, args.mode.label(), &config, &initial)?)
    };
    let mut json_log = args.json_log.as_deref().map(JsonLog::create).transpose()?;

    let (attacker, defender) = create_sources(args.mode, &config)?;
    let mut game = Match::new(initial, attacker, defender);

    println!("{}", render::turn_header(game.state()));
    println!("{}", render::render_board(game.state()));

    let summary = play(&mut game, trace.as_mut(), json_log.as_mut())?;
    let stats = collect_stats(&game);
    report_result(&summary, &stats);

    if let Some(trace) = trace {
        let path = trace.path().to_path_buf();
        trace.finish(&summary, &stats)?;
        println!("Trace written to {}", path.display());
    }
    if let Some(log) = json_log {
        log.finish()?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn create_sources(mode: Mode, config: &SearchConfig) -> Result<(Box<dyn MoveSource>, Box<dyn MoveSource>)> {
    let source = |player: Player| -> Result<Box<dyn MoveSource>> {
        if mode.is_human(player) {
            Ok(Box::new(HumanSource::stdin()))
        } else {
            Ok(Box::new(AlphaBetaAI::new(config.clone())?))
        }
    };
    Ok((source(Player::Attacker)?, source(Player::Defender)?))
}

/// Step the match to completion, echoing every turn
fn play(game: &mut Match, mut trace: Option<&mut TraceWriter>, mut json_log: Option<&mut JsonLog>) -> Result<MatchSummary> {
    while !game.is_finished() {
        let record = game.step()?;
        report_turn(&record, game.state());

        if let Some(trace) = trace.as_deref_mut() {
            trace.record_turn(&record, game.state())?;
        }
        if let Some(log) = json_log.as_deref_mut() {
            log.record_turn(&record)?;
        }
    }

    Ok(MatchSummary {
        outcome: game.state().outcome(),
        turns_played: game.state().turns_played,
        records: game.records().to_vec(),
    })
}

fn collect_stats(game: &Match) -> Vec<(Player, &SearchStats)> {
    [Player::Attacker, Player::Defender]
        .into_iter()
        .filter_map(|p| game.source(p).stats().map(|s| (p, s)))
        .collect()
}

fn report_result(summary: &MatchSummary, stats: &[(Player, &SearchStats)]) {
    match summary.winner() {
        Some(player) => println!("{} wins in {} turns!", player, summary.turns_played),
        None => println!("Draw after {} turns.", summary.turns_played),
    }
    for (player, stats) in stats {
        println!("\n{} AI", player);
        print!("{}", render::render_stats(stats));
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn report_turn(record: &TurnRecord, after: &GameState) {
    println!("{}", render::describe_turn(record));
    if let Some(report) = &record.search {
        print!("{}", render::render_report(report));
    }
    println!("{}", render::turn_header(after));
    println!("{}", render::render_board(after));
}
