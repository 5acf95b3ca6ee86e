//! Wargame Core - Game engine and AI
//!
//! This crate provides the core game logic for the attacker/defender wargame:
//! - Board geometry (square grid, row/column coordinates)
//! - Unit kinds with damage and repair tables
//! - Rule sets expressed as data, loadable from JSON
//! - Game state, move validation and combat resolution
//! - Pluggable position evaluation
//! - Minimax / alpha-beta AI with iterative deepening under a time budget
//! - Match controller producing turn-by-turn records

pub mod board;
pub mod units;
pub mod error;
pub mod ruleset;
pub mod game;
pub mod eval;
pub mod ai;
pub mod match_play;

// Re-exports for convenient access
pub use board::{Board, Coord, DEFAULT_DIM};
pub use units::{Player, Unit, UnitKind, MAX_HEALTH};
pub use error::{ConfigError, IllegalMove, IllegalMoveReason, MatchError};
pub use ruleset::{CounterDamage, Placement, RuleSet};
pub use game::{GameState, Move, Outcome};
pub use eval::{evaluate, Evaluator, HeuristicKind, Heuristics, WIN_SCORE, WIN_THRESHOLD};
pub use ai::{AlphaBetaAI, SearchConfig, SearchReport, SearchStats};
pub use match_play::{Choice, Match, MatchResult, MatchSummary, MoveSource, TurnRecord};
