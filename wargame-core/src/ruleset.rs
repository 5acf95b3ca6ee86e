//! RuleSet - board size, combat tables and the opening layout

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Coord, DEFAULT_DIM, MAX_DIM};
use crate::error::ConfigError;
use crate::game::GameState;
use crate::units::{
    KindTable, Player, Unit, UnitKind, DAMAGE_TABLE, MAX_HEALTH, REPAIR_TABLE,
    SELF_DESTRUCT_DAMAGE,
};

/// Default turn limit before the game is declared a draw
pub const DEFAULT_MAX_TURNS: u32 = 100;

/// Whether the target of an attack strikes back
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterDamage {
    /// Combat is bi-directional: both blows land simultaneously,
    /// even when the target does not survive
    #[default]
    Always,
    /// The target strikes back only if it survives the blow
    IfSurvives,
    /// Attacks are one-sided
    Never,
}

/// One unit of the opening layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: Player,
    pub kind: UnitKind,
    pub at: Coord,
    #[serde(default = "full_health")]
    pub health: u8,
}

fn full_health() -> u8 {
    MAX_HEALTH
}

impl Placement {
    pub const fn new(player: Player, kind: UnitKind, row: i8, col: i8) -> Self {
        Self {
            player,
            kind,
            at: Coord::new(row, col),
            health: MAX_HEALTH,
        }
    }

    pub fn unit(&self) -> Unit {
        Unit::new(self.player, self.kind).with_health(self.health)
    }
}

/// Complete description of a game variant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub dim: u8,
    pub damage: KindTable,
    pub repair: KindTable,
    pub self_destruct_damage: u8,
    pub max_turns: u32,
    #[serde(default)]
    pub counter_damage: CounterDamage,
    pub placements: Vec<Placement>,
}

impl RuleSet {
    /// Damage dealt by `source` to `target`, before clamping to remaining health
    pub fn damage(&self, source: UnitKind, target: UnitKind) -> u8 {
        self.damage[source.index()][target.index()]
    }

    /// Health restored by `source` to `target`, before clamping to the ceiling
    pub fn repair(&self, source: UnitKind, target: UnitKind) -> u8 {
        self.repair[source.index()][target.index()]
    }

    /// Check that the variant is playable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dim < 2 || self.dim > MAX_DIM {
            return Err(ConfigError::BoardDimension(self.dim));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroMaxTurns);
        }
        if self.self_destruct_damage > MAX_HEALTH {
            return Err(ConfigError::SelfDestructDamage(self.self_destruct_damage));
        }

        for (table, values) in [("damage", &self.damage), ("repair", &self.repair)] {
            for (row, cols) in values.iter().enumerate() {
                for (col, &value) in cols.iter().enumerate() {
                    if value > MAX_HEALTH {
                        return Err(ConfigError::TableValue { table, row, col, value });
                    }
                }
            }
        }

        let mut seen: Vec<Coord> = Vec::with_capacity(self.placements.len());
        for p in &self.placements {
            if !p.at.is_within(self.dim) {
                return Err(ConfigError::PlacementOutOfBounds(p.at));
            }
            if seen.contains(&p.at) {
                return Err(ConfigError::DuplicatePlacement(p.at));
            }
            if p.health == 0 || p.health > MAX_HEALTH {
                return Err(ConfigError::PlacementHealth(p.health));
            }
            seen.push(p.at);
        }

        for player in [Player::Attacker, Player::Defender] {
            let count = self
                .placements
                .iter()
                .filter(|p| p.player == player && p.kind == UnitKind::AI)
                .count();
            if count != 1 {
                return Err(ConfigError::AiCount { player, count });
            }
        }

        Ok(())
    }

    /// Validate and build the opening position
    pub fn to_game_state(&self) -> Result<GameState, ConfigError> {
        self.validate()?;
        Ok(GameState::new(Arc::new(self.clone())))
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ruleset: RuleSet = serde_json::from_str(&content)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Same tables and layout, with a different counter-damage convention
    pub fn with_counter_damage(mut self, counter_damage: CounterDamage) -> Self {
        self.counter_damage = counter_damage;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Standard layout mirrored onto a `dim` x `dim` board: the defender
    /// holds the top-left corner, the attacker the bottom-right one.
    pub fn standard(dim: u8) -> Self {
        use Player::{Attacker, Defender};
        use UnitKind::*;

        // Out-of-range sizes still build; `validate` reports them
        let md = dim.min(MAX_DIM) as i8 - 1;
        let placements = vec![
            // Defender
            Placement::new(Defender, AI, 0, 0),
            Placement::new(Defender, Tech, 1, 0),
            Placement::new(Defender, Tech, 0, 1),
            Placement::new(Defender, Firewall, 2, 0),
            Placement::new(Defender, Firewall, 0, 2),
            Placement::new(Defender, Program, 1, 1),
            // Attacker
            Placement::new(Attacker, AI, md, md),
            Placement::new(Attacker, Virus, md - 1, md),
            Placement::new(Attacker, Virus, md, md - 1),
            Placement::new(Attacker, Program, md - 2, md),
            Placement::new(Attacker, Program, md, md - 2),
            Placement::new(Attacker, Firewall, md - 1, md - 1),
        ];

        Self {
            name: format!("standard-{}x{}", dim, dim),
            dim,
            damage: DAMAGE_TABLE,
            repair: REPAIR_TABLE,
            self_destruct_damage: SELF_DESTRUCT_DAMAGE,
            max_turns: DEFAULT_MAX_TURNS,
            counter_damage: CounterDamage::default(),
            placements,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard(DEFAULT_DIM)
    }
}
