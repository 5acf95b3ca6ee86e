//! Error types for the wargame engine

use thiserror::Error;

use crate::board::Coord;
use crate::game::Move;
use crate::units::Player;

/// Why a move was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMoveReason {
    #[error("coordinate {0} is not on the board")]
    OutOfBounds(Coord),

    #[error("there is no unit at {0}")]
    EmptySource(Coord),

    #[error("the unit at {at} belongs to {owner}, not the player to move")]
    NotYourUnit { at: Coord, owner: Player },

    #[error("destination {0} is occupied")]
    Occupied(Coord),

    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("this unit cannot move in that direction")]
    WrongDirection,

    #[error("the unit is engaged in combat and cannot move away")]
    CombatLocked,

    #[error("cannot attack a friendly unit")]
    FriendlyTarget,

    #[error("cannot repair an enemy unit")]
    HostileTarget,

    #[error("there is no unit to target at {0}")]
    NoTarget(Coord),

    #[error("the repair would have no effect")]
    ZeroEffectRepair,

    #[error("the game is already over")]
    GameOver,
}

/// A move rejected by the rules engine. The board is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("illegal move '{mv}': {reason}")]
pub struct IllegalMove {
    pub mv: Move,
    pub reason: IllegalMoveReason,
}

/// Invalid rule set or search configuration (fatal at startup)
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("board dimension {0} is outside 2..={max}", max = crate::board::MAX_DIM)]
    BoardDimension(u8),

    #[error("{table} table entry [{row}][{col}] = {value} exceeds the maximum health")]
    TableValue {
        table: &'static str,
        row: usize,
        col: usize,
        value: u8,
    },

    #[error("self-destruct damage {0} exceeds the maximum health")]
    SelfDestructDamage(u8),

    #[error("placement at {0} is off the board")]
    PlacementOutOfBounds(Coord),

    #[error("two units placed at {0}")]
    DuplicatePlacement(Coord),

    #[error("{player} must start with exactly one AI, found {count}")]
    AiCount { player: Player, count: usize },

    #[error("placement health must be 1..=9, got {0}")]
    PlacementHealth(u8),

    #[error("maximum turns must be positive")]
    ZeroMaxTurns,

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("time budget must be positive")]
    ZeroTimeBudget,
}

/// Match controller failures
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{0} has no move to offer")]
    NoMove(Player),

    #[error("{player} had {count} moves rejected in a row")]
    TooManyRejections { player: Player, count: usize },

    #[error("the match is already over")]
    Finished,
}
