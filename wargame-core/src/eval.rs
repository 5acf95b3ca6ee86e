//! Position evaluation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{GameState, Outcome};
use crate::units::{Player, UnitKind, NUM_KINDS};

/// Score of a decided game, close to the top of the `i32` range.
/// Search adds the remaining depth so that quicker wins rank higher.
pub const WIN_SCORE: i32 = 1_000_000_000;

/// Anything at or beyond this magnitude is a proven result
pub const WIN_THRESHOLD: i32 = WIN_SCORE - 1_000_000;

/// Pluggable position scoring
pub trait Evaluator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Heuristic value of a position still in progress.
    /// Positive favors `perspective`; must stay well inside `WIN_THRESHOLD`.
    fn score(&self, state: &GameState, perspective: Player) -> i32;
}

/// Exact score of a finished game, or `None` while in progress
pub fn terminal_score(state: &GameState, perspective: Player, depth_left: u32) -> Option<i32> {
    let bonus = depth_left.min(1_000) as i32;
    match state.outcome() {
        Outcome::InProgress => None,
        Outcome::Draw => Some(0),
        outcome if outcome.winner() == Some(perspective) => Some(WIN_SCORE + bonus),
        _ => Some(-WIN_SCORE - bonus),
    }
}

/// Evaluate any position from `perspective`
pub fn evaluate<E: Evaluator + ?Sized>(state: &GameState, evaluator: &E, perspective: Player) -> i32 {
    terminal_score(state, perspective, 0).unwrap_or_else(|| evaluator.score(state, perspective))
}

/// Built-in heuristic selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    /// Unit count weighted by kind
    E0,
    /// Material plus remaining health
    E1,
    /// Material, health, AI safety, pressure on the enemy AI and mobility
    #[default]
    E2,
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicKind::E0 => write!(f, "e0"),
            HeuristicKind::E1 => write!(f, "e1"),
            HeuristicKind::E2 => write!(f, "e2"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "e0" | "material" => Ok(HeuristicKind::E0),
            "e1" | "health" => Ok(HeuristicKind::E1),
            "e2" | "threat" | "positional" => Ok(HeuristicKind::E2),
            other => Err(format!("unknown heuristic: {} (expected e0, e1 or e2)", other)),
        }
    }
}

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    pub kind: HeuristicKind,
    /// Value of each unit kind on the board
    pub material: [i32; NUM_KINDS],
    /// Value of each health point, per kind
    pub health: [i32; NUM_KINDS],
    /// Per point of damage an adjacent enemy could deal to an AI
    pub ai_threat_weight: i32,
    /// Per step closer to the enemy AI, for units that hurt it
    pub proximity_weight: i32,
    /// Per available action
    pub mobility_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::from_kind(HeuristicKind::default())
    }
}

impl Heuristics {
    pub fn from_kind(kind: HeuristicKind) -> Self {
        // Kind order: AI, Tech, Virus, Program, Firewall
        Self {
            kind,
            material: [9999, 3, 3, 3, 3],
            health: [200, 12, 12, 5, 4],
            ai_threat_weight: 150,
            proximity_weight: 10,
            mobility_weight: 1,
        }
    }

    fn material(&self, state: &GameState, player: Player) -> i32 {
        state
            .units_of(player)
            .map(|(_, u)| self.material[u.kind.index()])
            .sum()
    }

    fn health(&self, state: &GameState, player: Player) -> i32 {
        state
            .units_of(player)
            .map(|(_, u)| self.health[u.kind.index()] * u.health as i32)
            .sum()
    }

    /// Damage `player` threatens against the enemy AI from adjacent cells,
    /// plus a bonus for offensive units closing in on it
    fn pressure(&self, state: &GameState, player: Player) -> i32 {
        let Some(target_at) = state.ai_position(player.opponent()) else {
            return 0;
        };
        let Some(target) = state.unit_at(target_at) else {
            return 0;
        };

        let reach = 2 * state.rules().dim as i32;
        let mut score = 0;
        for (at, unit) in state.units_of(player) {
            let damage = state.damage_amount(unit, target) as i32;
            if at.is_adjacent(target_at) {
                score += self.ai_threat_weight * damage;
            }
            // Only units that meaningfully hurt an AI are worth steering
            if unit.kind != UnitKind::AI && state.rules().damage(unit.kind, UnitKind::AI) >= 3 {
                score += self.proximity_weight * (reach - at.manhattan(target_at)).max(0);
            }
        }
        score
    }

    fn side(&self, state: &GameState, player: Player) -> i32 {
        match self.kind {
            HeuristicKind::E0 => self.material(state, player),
            HeuristicKind::E1 => self.material(state, player) + self.health(state, player),
            HeuristicKind::E2 => {
                self.material(state, player)
                    + self.health(state, player)
                    + self.pressure(state, player)
                    + self.mobility_weight * state.mobility(player) as i32
            }
        }
    }
}

impl Evaluator for Heuristics {
    fn name(&self) -> &str {
        match self.kind {
            HeuristicKind::E0 => "e0",
            HeuristicKind::E1 => "e1",
            HeuristicKind::E2 => "e2",
        }
    }

    fn score(&self, state: &GameState, perspective: Player) -> i32 {
        self.side(state, perspective) - self.side(state, perspective.opponent())
    }
}
