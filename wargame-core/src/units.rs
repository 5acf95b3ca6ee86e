//! Players, unit kinds and the standard combat tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Health of a fresh unit, and the repair ceiling
pub const MAX_HEALTH: u8 = 9;

/// Number of unit kinds (table dimension)
pub const NUM_KINDS: usize = 5;

/// Square lookup table indexed `[source kind][target kind]`
pub type KindTable = [[u8; NUM_KINDS]; NUM_KINDS];

/// Side of the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Attacker = 0,
    Defender = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Attacker => Player::Defender,
            Player::Defender => Player::Attacker,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Attacker => write!(f, "Attacker"),
            Player::Defender => write!(f, "Defender"),
        }
    }
}

/// Unit kind; the discriminant is the row/column index in the combat tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    AI = 0,
    Tech = 1,
    Virus = 2,
    Program = 3,
    Firewall = 4,
}

impl UnitKind {
    pub const ALL: [UnitKind; NUM_KINDS] = [
        UnitKind::AI,
        UnitKind::Tech,
        UnitKind::Virus,
        UnitKind::Program,
        UnitKind::Firewall,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// AI, Firewall and Program only advance toward the enemy and are held
    /// in place by adjacent enemies. Tech and Virus roam freely.
    pub fn is_restricted(self) -> bool {
        matches!(self, UnitKind::AI | UnitKind::Firewall | UnitKind::Program)
    }

    /// Single-letter tag used in board rendering
    pub fn letter(self) -> char {
        match self {
            UnitKind::AI => 'A',
            UnitKind::Tech => 'T',
            UnitKind::Virus => 'V',
            UnitKind::Program => 'P',
            UnitKind::Firewall => 'F',
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ai" | "a" => Ok(UnitKind::AI),
            "tech" | "t" => Ok(UnitKind::Tech),
            "virus" | "v" => Ok(UnitKind::Virus),
            "program" | "p" => Ok(UnitKind::Program),
            "firewall" | "f" => Ok(UnitKind::Firewall),
            other => Err(format!("unknown unit kind: {}", other)),
        }
    }
}

/// A unit on the board. Units at zero health are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub player: Player,
    pub kind: UnitKind,
    pub health: u8,
}

impl Unit {
    pub fn new(player: Player, kind: UnitKind) -> Self {
        Self {
            player,
            kind,
            health: MAX_HEALTH,
        }
    }

    pub fn with_health(mut self, health: u8) -> Self {
        self.health = health.min(MAX_HEALTH);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn belongs_to(&self, player: Player) -> bool {
        self.player == player
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.player {
            Player::Attacker => 'a',
            Player::Defender => 'd',
        };
        write!(f, "{}{}{}", side, self.kind.letter(), self.health)
    }
}

/// Standard damage table
/// Rows: attacking kind, columns: target kind (AI, Tech, Virus, Program, Firewall)
pub const DAMAGE_TABLE: KindTable = [
    [3, 3, 3, 3, 1], // AI
    [1, 1, 6, 1, 1], // Tech
    [9, 6, 1, 6, 1], // Virus
    [3, 3, 3, 3, 1], // Program
    [1, 1, 1, 1, 1], // Firewall
];

/// Standard repair table
/// Rows: repairing kind, columns: target kind
pub const REPAIR_TABLE: KindTable = [
    [0, 1, 1, 0, 0], // AI
    [3, 0, 0, 3, 3], // Tech
    [0, 0, 0, 0, 0], // Virus
    [0, 0, 0, 0, 0], // Program
    [0, 0, 0, 0, 0], // Firewall
];

/// Damage from the self-destructing unit to each surrounding cell
pub const SELF_DESTRUCT_DAMAGE: u8 = 2;
