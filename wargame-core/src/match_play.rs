//! Match controller - drives alternating turns between two move sources

use serde::{Deserialize, Serialize};

use crate::ai::{AlphaBetaAI, SearchReport, SearchStats};
use crate::board::Coord;
use crate::error::{IllegalMove, MatchError};
use crate::eval::Evaluator;
use crate::game::{GameState, Move, Outcome};
use crate::units::{Player, Unit};

/// Consecutive rejected proposals tolerated from one source
pub const DEFAULT_MAX_REJECTIONS: usize = 16;

// ============================================================================
// MOVE SOURCES
// ============================================================================

/// A proposed move, with the search report when an AI produced it
#[derive(Clone, Debug)]
pub struct Choice {
    pub mv: Move,
    pub report: Option<SearchReport>,
}

impl From<Move> for Choice {
    fn from(mv: Move) -> Self {
        Self { mv, report: None }
    }
}

/// Anything that can pick a move for the side to move: a search engine,
/// or a human typing at a prompt
pub trait MoveSource {
    fn name(&self) -> &str;

    /// Propose a move, or `None` to give up
    fn choose_move(&mut self, state: &GameState) -> Option<Choice>;

    /// The last proposal was refused; the source will be asked again
    fn on_rejected(&mut self, _mv: Move, _error: &IllegalMove) {}

    /// Cumulative search statistics, for sources that search
    fn stats(&self) -> Option<&SearchStats> {
        None
    }
}

impl<E: Evaluator> MoveSource for AlphaBetaAI<E> {
    fn name(&self) -> &str {
        if self.config().alpha_beta {
            "alpha-beta"
        } else {
            "minimax"
        }
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Choice> {
        AlphaBetaAI::choose_move(self, state).map(|report| Choice {
            mv: report.best_move,
            report: Some(report),
        })
    }

    fn stats(&self) -> Option<&SearchStats> {
        Some(AlphaBetaAI::stats(self))
    }
}

// ============================================================================
// TURN RECORDS
// ============================================================================

/// What happened on one turn, for display and logging collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based turn number
    pub turn: u32,
    pub player: Player,
    pub mv: Move,
    /// Every unit left on the board after the move, row-major
    pub units: Vec<(Coord, Unit)>,
    /// Indexed by `Player::index`
    pub unit_counts: [usize; 2],
    /// Indexed by `Player::index`
    pub total_health: [u32; 2],
    /// Set on the final turn only
    pub outcome: Option<Outcome>,
    pub search: Option<SearchReport>,
}

impl TurnRecord {
    fn new(player: Player, mv: Move, after: &GameState, search: Option<SearchReport>) -> Self {
        let players = [Player::Attacker, Player::Defender];
        let outcome = after.outcome();
        Self {
            turn: after.turns_played,
            player,
            mv,
            units: after.board().units().map(|(at, u)| (at, *u)).collect(),
            unit_counts: players.map(|p| after.unit_count(p)),
            total_health: players.map(|p| after.total_health(p)),
            outcome: outcome.is_terminal().then_some(outcome),
            search,
        }
    }
}

/// Result of a finished match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSummary {
    pub outcome: Outcome,
    pub turns_played: u32,
    pub records: Vec<TurnRecord>,
}

impl MatchSummary {
    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }
}

// ============================================================================
// MATCH
// ============================================================================

/// One game between two move sources
pub struct Match {
    state: GameState,
    attacker: Box<dyn MoveSource>,
    defender: Box<dyn MoveSource>,
    records: Vec<TurnRecord>,
    max_rejections: usize,
}

impl Match {
    pub fn new(initial: GameState, attacker: Box<dyn MoveSource>, defender: Box<dyn MoveSource>) -> Self {
        Self {
            state: initial,
            attacker,
            defender,
            records: Vec::new(),
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }

    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections.max(1);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn source(&self, player: Player) -> &dyn MoveSource {
        match player {
            Player::Attacker => self.attacker.as_ref(),
            Player::Defender => self.defender.as_ref(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Play one turn. Only a validated move ever changes the match state.
    pub fn step(&mut self) -> Result<TurnRecord, MatchError> {
        if self.state.is_terminal() {
            return Err(MatchError::Finished);
        }

        let player = self.state.current_player();
        let source = match player {
            Player::Attacker => self.attacker.as_mut(),
            Player::Defender => self.defender.as_mut(),
        };

        let mut rejections = 0;
        loop {
            let choice = source.choose_move(&self.state).ok_or(MatchError::NoMove(player))?;
            match self.state.apply_move(choice.mv) {
                Ok(next) => {
                    let record = TurnRecord::new(player, choice.mv, &next, choice.report);
                    tracing::info!(
                        turn = record.turn,
                        %player,
                        source = source.name(),
                        mv = %choice.mv,
                        "turn played"
                    );
                    self.state = next;
                    self.records.push(record.clone());
                    return Ok(record);
                }
                Err(err) => {
                    tracing::warn!(%player, error = %err, "move rejected");
                    source.on_rejected(choice.mv, &err);
                    rejections += 1;
                    if rejections >= self.max_rejections {
                        return Err(MatchError::TooManyRejections { player, count: rejections });
                    }
                }
            }
        }
    }

    /// Play to the end, handing each record to `observer` as it is produced
    pub fn run<F>(&mut self, mut observer: F) -> Result<MatchSummary, MatchError>
    where
        F: FnMut(&TurnRecord),
    {
        while !self.state.is_terminal() {
            let record = self.step()?;
            observer(&record);
        }

        let outcome = self.state.outcome();
        tracing::info!(%outcome, turns = self.state.turns_played, "match finished");
        Ok(MatchSummary {
            outcome,
            turns_played: self.state.turns_played,
            records: self.records.clone(),
        })
    }
}

// ============================================================================
// MULTI-GAME TALLY
// ============================================================================

/// Aggregate over several matches
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub attacker_wins: u32,
    pub defender_wins: u32,
    pub draws: u32,
    pub games_played: u32,
    pub total_turns: u64,
}

impl MatchResult {
    pub fn record(&mut self, summary: &MatchSummary) {
        match summary.outcome {
            Outcome::AttackerWins => self.attacker_wins += 1,
            Outcome::DefenderWins => self.defender_wins += 1,
            Outcome::Draw | Outcome::InProgress => self.draws += 1,
        }
        self.games_played += 1;
        self.total_turns += summary.turns_played as u64;
    }

    /// Combine two tallies
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        MatchResult {
            attacker_wins: self.attacker_wins + other.attacker_wins,
            defender_wins: self.defender_wins + other.defender_wins,
            draws: self.draws + other.draws,
            games_played: self.games_played + other.games_played,
            total_turns: self.total_turns + other.total_turns,
        }
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }

    pub fn attacker_win_rate(&self) -> f32 {
        self.rate(self.attacker_wins)
    }

    pub fn defender_win_rate(&self) -> f32 {
        self.rate(self.defender_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    pub fn avg_turns(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_turns as f32 / self.games_played as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SearchConfig;
    use crate::ruleset::RuleSet;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays a fixed list of moves, then gives up
    struct Scripted {
        moves: VecDeque<Move>,
        rejected: Rc<RefCell<Vec<Move>>>,
    }

    impl Scripted {
        fn new(moves: &[&str]) -> Self {
            Self {
                moves: moves.iter().map(|m| m.parse().unwrap()).collect(),
                rejected: Rc::default(),
            }
        }
    }

    impl MoveSource for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose_move(&mut self, _state: &GameState) -> Option<Choice> {
            self.moves.pop_front().map(Choice::from)
        }

        fn on_rejected(&mut self, mv: Move, _error: &IllegalMove) {
            self.rejected.borrow_mut().push(mv);
        }
    }

    fn ai(depth: u32) -> Box<dyn MoveSource> {
        Box::new(AlphaBetaAI::new(SearchConfig::fixed_depth(depth)).unwrap())
    }

    #[test]
    fn test_ai_vs_ai_runs_to_completion() {
        let game = RuleSet::default().with_max_turns(10).to_game_state().unwrap();
        let mut m = Match::new(game, ai(1), ai(1));

        let mut seen = 0;
        let summary = m.run(|_| seen += 1).unwrap();

        assert!(summary.outcome.is_terminal());
        assert_eq!(seen, summary.records.len());
        assert_eq!(summary.turns_played as usize, summary.records.len());
        assert!(summary.records.iter().all(|r| r.search.is_some()));
        assert!(m.source(Player::Attacker).stats().is_some());

        // Only the last record carries the outcome
        let (last, rest) = summary.records.split_last().unwrap();
        assert_eq!(last.outcome, Some(summary.outcome));
        assert!(rest.iter().all(|r| r.outcome.is_none()));
    }

    #[test]
    fn test_players_alternate() {
        let game = RuleSet::default().with_max_turns(4).to_game_state().unwrap();
        let mut m = Match::new(game, ai(1), ai(1));
        let summary = m.run(|_| {}).unwrap();

        let players: Vec<_> = summary.records.iter().map(|r| r.player).collect();
        assert_eq!(
            players,
            vec![Player::Attacker, Player::Defender, Player::Attacker, Player::Defender]
        );
        assert_eq!(summary.outcome, Outcome::Draw);
    }

    #[test]
    fn test_rejected_move_is_retried() {
        let game = GameState::default();
        // E3 is occupied by a friendly Virus
        let attacker = Scripted::new(&["move E4 E3", "move C4 B4"]);
        let rejected = Rc::clone(&attacker.rejected);
        let mut m = Match::new(game, Box::new(attacker), ai(1));

        let record = m.step().unwrap();
        assert_eq!(record.mv, "move C4 B4".parse().unwrap());
        assert_eq!(record.turn, 1);
        assert_eq!(m.state().current_player(), Player::Defender);
        assert_eq!(*rejected.borrow(), vec!["move E4 E3".parse::<Move>().unwrap()]);
    }

    #[test]
    fn test_rejection_limit() {
        let game = GameState::default();
        let attacker = Scripted::new(&["move E4 E3", "move A0 B0", "move E4 D4"]);
        let mut m = Match::new(game, Box::new(attacker), ai(1)).with_max_rejections(3);

        assert_eq!(
            m.step(),
            Err(MatchError::TooManyRejections { player: Player::Attacker, count: 3 })
        );
        // Nothing was applied
        assert_eq!(m.state().turns_played, 0);
        assert!(m.records().is_empty());
    }

    #[test]
    fn test_source_giving_up() {
        let game = GameState::default();
        let mut m = Match::new(game, Box::new(Scripted::new(&[])), ai(1));
        assert_eq!(m.step(), Err(MatchError::NoMove(Player::Attacker)));
    }

    #[test]
    fn test_step_after_finish() {
        let game = GameState::default().with_turns_played(100);
        let mut m = Match::new(game, ai(1), ai(1));
        assert!(m.is_finished());
        assert_eq!(m.step(), Err(MatchError::Finished));
    }

    #[test]
    fn test_turn_record_snapshot() {
        let game = GameState::default();
        let mut m = Match::new(game, Box::new(Scripted::new(&["move C4 B4"])), ai(1));
        let record = m.step().unwrap();
        assert_eq!(record.unit_counts, [6, 6]);
        assert_eq!(record.total_health, [54, 54]);
        assert_eq!(record.units.len(), 12);
        assert!(record.units.iter().any(|(at, u)| at.to_string() == "B4" && u.player == Player::Attacker));
    }

    #[test]
    fn test_match_result_tally() {
        let mut tally = MatchResult::default();
        let summary = |outcome, turns_played| MatchSummary { outcome, turns_played, records: vec![] };
        tally.record(&summary(Outcome::AttackerWins, 20));
        tally.record(&summary(Outcome::DefenderWins, 30));
        tally.record(&summary(Outcome::Draw, 100));
        tally.record(&summary(Outcome::AttackerWins, 10));

        assert_eq!(tally.games_played, 4);
        assert_eq!(tally.attacker_wins, 2);
        assert_eq!(tally.attacker_win_rate(), 0.5);
        assert_eq!(tally.draw_rate(), 0.25);
        assert_eq!(tally.avg_turns(), 40.0);

        let both = tally.combine(&tally);
        assert_eq!(both.games_played, 8);
        assert_eq!(both.defender_wins, 2);
    }
}
