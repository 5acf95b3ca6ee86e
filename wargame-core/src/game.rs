//! Game state, move generation and combat resolution

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord};
use crate::error::{IllegalMove, IllegalMoveReason};
use crate::ruleset::{CounterDamage, RuleSet};
use crate::units::{Player, Unit, UnitKind, MAX_HEALTH};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    AttackerWins,
    DefenderWins,
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::AttackerWins => Some(Player::Attacker),
            Outcome::DefenderWins => Some(Player::Defender),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::AttackerWins => write!(f, "Attacker wins"),
            Outcome::DefenderWins => write!(f, "Defender wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A player action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Step to an adjacent empty cell
    Movement { from: Coord, to: Coord },
    /// Strike an adjacent enemy
    Attack { from: Coord, to: Coord },
    /// Heal an adjacent friendly unit
    Repair { from: Coord, to: Coord },
    /// Destroy the unit, damaging everything around it
    SelfDestruct { at: Coord },
}

impl Move {
    /// The acting unit's cell
    pub fn source(&self) -> Coord {
        match *self {
            Move::Movement { from, .. } | Move::Attack { from, .. } | Move::Repair { from, .. } => {
                from
            }
            Move::SelfDestruct { at } => at,
        }
    }

    /// The cell acted upon, if different from the source
    pub fn target(&self) -> Option<Coord> {
        match *self {
            Move::Movement { to, .. } | Move::Attack { to, .. } | Move::Repair { to, .. } => {
                Some(to)
            }
            Move::SelfDestruct { .. } => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Movement { from, to } => write!(f, "move {} {}", from, to),
            Move::Attack { from, to } => write!(f, "attack {} {}", from, to),
            Move::Repair { from, to } => write!(f, "repair {} {}", from, to),
            Move::SelfDestruct { at } => write!(f, "destruct {}", at),
        }
    }
}

/// Error parsing a move such as `attack D4 C4`
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse move '{0}' (expected e.g. 'move B2 B3' or 'destruct C3')")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_string());
        let parts: Vec<&str> = s.split_whitespace().collect();
        let coord = |i: usize| parts.get(i).and_then(|p| p.parse::<Coord>().ok()).ok_or_else(err);

        let keyword = parts.first().map(|p| p.to_ascii_lowercase()).ok_or_else(err)?;
        let mv = match (keyword.as_str(), parts.len()) {
            ("move" | "m", 3) => Move::Movement { from: coord(1)?, to: coord(2)? },
            ("attack" | "a", 3) => Move::Attack { from: coord(1)?, to: coord(2)? },
            ("repair" | "r", 3) => Move::Repair { from: coord(1)?, to: coord(2)? },
            ("destruct" | "self-destruct" | "d", 2) => Move::SelfDestruct { at: coord(1)? },
            _ => return Err(err()),
        };
        Ok(mv)
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to branch)
#[derive(Clone, Debug)]
pub struct GameState {
    /// Shared, immutable variant description
    rules: Arc<RuleSet>,

    /// Unit grid
    board: Board,

    /// AI positions for quick access, indexed by `Player::index`
    ai_pos: [Option<Coord>; 2],

    /// Player to move
    current_player: Player,

    /// Moves applied since the opening
    pub turns_played: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Opening position of a rule set. The rule set is assumed valid;
    /// use `RuleSet::to_game_state` to validate first.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let units: Vec<(Coord, Unit)> = rules.placements.iter().map(|p| (p.at, p.unit())).collect();
        Self::from_units(rules, &units, Player::Attacker)
    }

    /// Arbitrary position. Units off the board or at zero health are dropped.
    pub fn from_units(rules: Arc<RuleSet>, units: &[(Coord, Unit)], to_move: Player) -> Self {
        let mut board = Board::empty(rules.dim);
        let mut ai_pos = [None; 2];

        for &(at, unit) in units {
            if !board.contains(at) || !unit.is_alive() {
                continue;
            }
            let unit = unit.with_health(unit.health);
            if unit.kind == UnitKind::AI {
                ai_pos[unit.player.index()] = Some(at);
            }
            board.set(at, Some(unit));
        }

        Self {
            rules,
            board,
            ai_pos,
            current_player: to_move,
            turns_played: 0,
        }
    }

    pub fn with_turns_played(mut self, turns_played: u32) -> Self {
        self.turns_played = turns_played;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn unit_at(&self, at: Coord) -> Option<&Unit> {
        self.board.get(at)
    }

    /// Units of one player in row-major order
    pub fn units_of(&self, player: Player) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        self.board.units().filter(move |(_, u)| u.belongs_to(player))
    }

    pub fn ai_position(&self, player: Player) -> Option<Coord> {
        self.ai_pos[player.index()]
    }

    pub fn unit_count(&self, player: Player) -> usize {
        self.units_of(player).count()
    }

    pub fn total_health(&self, player: Player) -> u32 {
        self.units_of(player).map(|(_, u)| u.health as u32).sum()
    }

    /// Game outcome
    ///
    /// A destroyed AI decides the game before the turn limit is consulted,
    /// and when both AIs fall together the defender wins.
    pub fn outcome(&self) -> Outcome {
        match (self.ai_pos[Player::Attacker.index()], self.ai_pos[Player::Defender.index()]) {
            (None, _) => Outcome::DefenderWins,
            (Some(_), None) => Outcome::AttackerWins,
            _ if self.turns_played >= self.rules.max_turns => Outcome::Draw,
            _ => Outcome::InProgress,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    // ========================================================================
    // RULE QUERIES
    // ========================================================================

    /// Whether any orthogonal neighbor of `at` holds an enemy of `player`
    pub fn is_engaged(&self, at: Coord, player: Player) -> bool {
        at.adjacent()
            .any(|n| self.board.get(n).is_some_and(|u| u.player != player))
    }

    /// Whether a restricted unit may step in this direction
    fn is_forward_step(player: Player, from: Coord, to: Coord) -> bool {
        let (dr, dc) = (to.row - from.row, to.col - from.col);
        match player {
            Player::Attacker => (dr, dc) == (-1, 0) || (dr, dc) == (0, -1),
            Player::Defender => (dr, dc) == (1, 0) || (dr, dc) == (0, 1),
        }
    }

    /// Damage `source` would inflict on `target`, clamped to its health
    pub fn damage_amount(&self, source: &Unit, target: &Unit) -> u8 {
        self.rules.damage(source.kind, target.kind).min(target.health)
    }

    /// Health `source` would restore to `target`, clamped to the ceiling
    pub fn repair_amount(&self, source: &Unit, target: &Unit) -> u8 {
        self.rules
            .repair(source.kind, target.kind)
            .min(MAX_HEALTH.saturating_sub(target.health))
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for the player to move
    ///
    /// Units are visited in row-major order and for each unit the neighbors
    /// are visited up, left, down, right. Self-destructs follow every other
    /// action, with the player's own AI last of all.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return vec![];
        }
        let mut moves = Vec::with_capacity(32);
        self.generate_moves(self.current_player, &mut moves);
        moves
    }

    /// Number of actions `player` would have if it were their turn
    pub fn mobility(&self, player: Player) -> usize {
        let mut moves = Vec::with_capacity(32);
        self.generate_moves(player, &mut moves);
        moves.len()
    }

    fn generate_moves(&self, player: Player, moves: &mut Vec<Move>) {
        for (from, unit) in self.units_of(player) {
            let locked = unit.kind.is_restricted() && self.is_engaged(from, player);

            for to in from.adjacent() {
                if !self.board.contains(to) {
                    continue;
                }
                match self.board.get(to) {
                    None => {
                        let allowed = !unit.kind.is_restricted()
                            || (!locked && Self::is_forward_step(player, from, to));
                        if allowed {
                            moves.push(Move::Movement { from, to });
                        }
                    }
                    Some(target) if target.player != player => {
                        moves.push(Move::Attack { from, to });
                    }
                    Some(target) => {
                        if self.repair_amount(unit, target) > 0 {
                            moves.push(Move::Repair { from, to });
                        }
                    }
                }
            }
        }

        let ai = self.ai_position(player);
        moves.extend(
            self.units_of(player)
                .filter(|&(at, _)| Some(at) != ai)
                .map(|(at, _)| Move::SelfDestruct { at }),
        );
        if let Some(at) = ai {
            moves.push(Move::SelfDestruct { at });
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check a move against the rules without applying it
    pub fn validate(&self, mv: Move) -> Result<(), IllegalMove> {
        self.check(mv).map_err(|reason| IllegalMove { mv, reason })
    }

    fn check(&self, mv: Move) -> Result<(), IllegalMoveReason> {
        if self.is_terminal() {
            return Err(IllegalMoveReason::GameOver);
        }

        let from = mv.source();
        let unit = self.own_unit(from)?;

        let Some(to) = mv.target() else {
            // Self-destruct needs nothing beyond ownership
            return Ok(());
        };

        if !self.board.contains(to) {
            return Err(IllegalMoveReason::OutOfBounds(to));
        }
        if !from.is_adjacent(to) {
            return Err(IllegalMoveReason::NotAdjacent { from, to });
        }

        match mv {
            Move::Movement { .. } => {
                if !self.board.is_empty(to) {
                    return Err(IllegalMoveReason::Occupied(to));
                }
                if unit.kind.is_restricted() {
                    if self.is_engaged(from, unit.player) {
                        return Err(IllegalMoveReason::CombatLocked);
                    }
                    if !Self::is_forward_step(unit.player, from, to) {
                        return Err(IllegalMoveReason::WrongDirection);
                    }
                }
                Ok(())
            }
            Move::Attack { .. } => {
                let target = self.board.get(to).ok_or(IllegalMoveReason::NoTarget(to))?;
                if target.player == unit.player {
                    return Err(IllegalMoveReason::FriendlyTarget);
                }
                Ok(())
            }
            Move::Repair { .. } => {
                let target = self.board.get(to).ok_or(IllegalMoveReason::NoTarget(to))?;
                if target.player != unit.player {
                    return Err(IllegalMoveReason::HostileTarget);
                }
                if self.repair_amount(unit, target) == 0 {
                    return Err(IllegalMoveReason::ZeroEffectRepair);
                }
                Ok(())
            }
            Move::SelfDestruct { .. } => Ok(()),
        }
    }

    fn own_unit(&self, at: Coord) -> Result<&Unit, IllegalMoveReason> {
        if !self.board.contains(at) {
            return Err(IllegalMoveReason::OutOfBounds(at));
        }
        let unit = self.board.get(at).ok_or(IllegalMoveReason::EmptySource(at))?;
        if unit.player != self.current_player {
            return Err(IllegalMoveReason::NotYourUnit { at, owner: unit.player });
        }
        Ok(unit)
    }

    /// Interpret a bare `from to` pair the way the game's input convention
    /// does: empty target moves, enemy target attacks, friendly target
    /// repairs, and `from == to` self-destructs.
    pub fn resolve_pair(&self, from: Coord, to: Coord) -> Move {
        if from == to {
            return Move::SelfDestruct { at: from };
        }
        match (self.board.get(from), self.board.get(to)) {
            (Some(unit), Some(target)) if unit.player != target.player => Move::Attack { from, to },
            (Some(_), Some(_)) => Move::Repair { from, to },
            _ => Move::Movement { from, to },
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and apply a move, returning the new state.
    /// On error `self` is unchanged.
    pub fn apply_move(&self, mv: Move) -> Result<Self, IllegalMove> {
        self.validate(mv)?;
        Ok(self.successor(mv))
    }

    /// Apply a move already known to be legal (from `legal_moves`)
    pub(crate) fn successor(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.apply_unchecked(mv);
        next
    }

    fn apply_unchecked(&mut self, mv: Move) {
        match mv {
            Move::Movement { from, to } => {
                if let Some(unit) = self.board.take(from) {
                    if unit.kind == UnitKind::AI {
                        self.ai_pos[unit.player.index()] = Some(to);
                    }
                    self.board.set(to, Some(unit));
                }
            }
            Move::Attack { from, to } => self.resolve_attack(from, to),
            Move::Repair { from, to } => {
                let heal = match (self.board.get(from), self.board.get(to)) {
                    (Some(source), Some(target)) => self.repair_amount(source, target),
                    _ => 0,
                };
                if let Some(target) = self.board.get_mut(to) {
                    target.health += heal;
                }
            }
            Move::SelfDestruct { at } => {
                if let Some(unit) = self.board.take(at) {
                    if unit.kind == UnitKind::AI {
                        self.ai_pos[unit.player.index()] = None;
                    }
                }
                let blast = self.rules.self_destruct_damage;
                for cell in at.surrounding() {
                    self.damage_cell(cell, blast);
                }
            }
        }

        self.current_player = self.current_player.opponent();
        self.turns_played += 1;
    }

    fn resolve_attack(&mut self, from: Coord, to: Coord) {
        let (attacker, defender) = match (self.board.get(from), self.board.get(to)) {
            (Some(a), Some(d)) => (*a, *d),
            _ => return,
        };

        let dealt = self.damage_amount(&attacker, &defender);
        let survives = defender.health > dealt;
        let counter = match self.rules.counter_damage {
            CounterDamage::Always => self.damage_amount(&defender, &attacker),
            CounterDamage::IfSurvives if survives => self.damage_amount(&defender, &attacker),
            CounterDamage::IfSurvives | CounterDamage::Never => 0,
        };

        self.damage_cell(to, dealt);
        self.damage_cell(from, counter);
    }

    /// Reduce health at `at`; units reaching zero are removed
    fn damage_cell(&mut self, at: Coord, amount: u8) {
        let Some(unit) = self.board.get_mut(at) else {
            return;
        };
        unit.health = unit.health.saturating_sub(amount);
        if unit.is_alive() {
            return;
        }
        if let Some(dead) = self.board.take(at) {
            if dead.kind == UnitKind::AI {
                self.ai_pos[dead.player.index()] = None;
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(Arc::new(RuleSet::default()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
