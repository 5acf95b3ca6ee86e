//! CPU-based minimax / alpha-beta AI with iterative deepening

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::{evaluate, terminal_score, Evaluator, HeuristicKind, Heuristics, WIN_THRESHOLD};
use crate::game::{GameState, Move};
use crate::units::{Player, UnitKind};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Nodes visited between clock checks
const TIME_CHECK_INTERVAL: u64 = 64;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Deepest ply count to try
    pub max_depth: u32,
    /// Wall-clock budget per move (`None` = search to `max_depth`)
    pub time_budget: Option<Duration>,
    /// Prune with alpha-beta bounds; plain minimax otherwise
    pub alpha_beta: bool,
    /// Built-in evaluation to use
    pub heuristic: HeuristicKind,
    /// Shuffle root moves before searching, for variety between games
    pub shuffle_root: bool,
    /// Seed for root shuffling
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_budget: Some(Duration::from_secs(5)),
            alpha_beta: true,
            heuristic: HeuristicKind::default(),
            shuffle_root: false,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Fixed-depth search without a clock
    pub fn fixed_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            time_budget: None,
            ..Default::default()
        }
    }

    pub fn with_alpha_beta(mut self, alpha_beta: bool) -> Self {
        self.alpha_beta = alpha_beta;
        self
    }

    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Enable root shuffling with the given seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.shuffle_root = true;
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.time_budget.is_some_and(|b| b.is_zero()) {
            return Err(ConfigError::ZeroTimeBudget);
        }
        Ok(())
    }
}

// ============================================================================
// REPORTS AND STATISTICS
// ============================================================================

/// Outcome of one move search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub best_move: Move,
    /// Score of `best_move` from the searching player's perspective
    pub score: i32,
    /// Deepest fully completed depth (0 when the fallback move was used)
    pub depth_reached: u32,
    pub nodes: u64,
    /// Leaf evaluations per ply, ascending
    pub evaluations_per_depth: Vec<(u32, u64)>,
    pub average_branching: f64,
    pub elapsed: Duration,
    /// The clock cut a deeper iteration short
    pub timed_out: bool,
    /// No depth completed; `best_move` is the first move in `legal_moves`
    /// order, never the shuffled one
    pub fallback: bool,
}

/// Running totals across every search an AI has made
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub evaluations_per_depth: FxHashMap<u32, u64>,
    pub total_time: Duration,
    pub searches: u32,
    depth_sum: u64,
}

impl SearchStats {
    fn record(&mut self, report: &SearchReport) {
        for &(ply, count) in &report.evaluations_per_depth {
            *self.evaluations_per_depth.entry(ply).or_insert(0) += count;
        }
        self.total_time += report.elapsed;
        self.searches += 1;
        self.depth_sum += report.depth_reached as u64;
    }

    pub fn total_evaluations(&self) -> u64 {
        self.evaluations_per_depth.values().sum()
    }

    /// Leaf evaluations per second across all searches
    pub fn evals_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.total_evaluations() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn average_depth(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.depth_sum as f64 / self.searches as f64
        }
    }

    /// Per-ply evaluation counts, ascending
    pub fn per_depth(&self) -> Vec<(u32, u64)> {
        let mut counts: Vec<_> = self.evaluations_per_depth.iter().map(|(&k, &v)| (k, v)).collect();
        counts.sort_unstable();
        counts
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Minimax player with optional alpha-beta pruning
pub struct AlphaBetaAI<E: Evaluator = Heuristics> {
    config: SearchConfig,
    evaluator: E,
    rng: ChaCha8Rng,
    stats: SearchStats,
}

impl AlphaBetaAI<Heuristics> {
    /// AI using the configured built-in heuristic
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        let heuristics = Heuristics::from_kind(config.heuristic);
        Self::with_evaluator(config, heuristics)
    }
}

impl<E: Evaluator> AlphaBetaAI<E> {
    /// AI using a custom evaluation
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            evaluator,
            rng,
            stats: SearchStats::default(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get best move for current position
    pub fn best_move(&mut self, state: &GameState) -> Option<Move> {
        self.choose_move(state).map(|r| r.best_move)
    }

    /// Iterative deepening search within the time budget.
    /// Returns `None` only when the game is over.
    pub fn choose_move(&mut self, state: &GameState) -> Option<SearchReport> {
        let start = Instant::now();
        let deadline = self.config.time_budget.map(|budget| start + budget);

        let legal = state.legal_moves();
        if legal.is_empty() {
            return None;
        }
        let mut moves = legal.clone();
        if self.config.shuffle_root {
            moves.shuffle(&mut self.rng);
        }

        let mut searcher = Searcher::new(&self.evaluator, state.current_player(), self.config.alpha_beta, deadline);
        let mut best: Option<(Move, i32, u32)> = None;
        let mut timed_out = false;

        for depth in 1..=self.config.max_depth {
            match search_root(&mut searcher, state, &moves, depth) {
                Ok((mv, score)) => {
                    tracing::debug!(depth, score, nodes = searcher.counters.nodes, best = %mv, "completed depth");
                    best = Some((mv, score, depth));
                    if score.abs() >= WIN_THRESHOLD {
                        break;
                    }
                }
                Err(Timeout) => {
                    tracing::trace!(depth, "time budget exhausted, keeping previous depth");
                    timed_out = true;
                    break;
                }
            }
            if searcher.past_deadline() {
                timed_out = depth < self.config.max_depth;
                break;
            }
        }

        let (best_move, score, depth_reached, fallback) = match best {
            Some((mv, score, depth)) => (mv, score, depth, false),
            None => {
                let mv = legal[0];
                let score = evaluate(&state.successor(mv), &self.evaluator, state.current_player());
                tracing::debug!(fallback = %mv, "no depth completed, using first legal move");
                (mv, score, 0, true)
            }
        };

        let report = searcher.counters.into_report(best_move, score, depth_reached, start.elapsed(), timed_out, fallback);
        self.stats.record(&report);
        Some(report)
    }

    /// Single search at exactly `depth` plies with no clock
    pub fn search_depth(&self, state: &GameState, depth: u32) -> Option<(Move, i32)> {
        let moves = state.legal_moves();
        if moves.is_empty() || depth == 0 {
            return None;
        }
        let mut searcher = Searcher::new(&self.evaluator, state.current_player(), self.config.alpha_beta, None);
        search_root(&mut searcher, state, &moves, depth).ok()
    }

    /// Play a complete game with this AI moving for both sides
    pub fn play_game(&mut self, initial: GameState) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut history = Vec::new();

        while let Some(report) = self.choose_move(&state) {
            history.push(report.best_move);
            state = state.successor(report.best_move);
        }

        (state, history)
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Score a move for ordering (higher = search first)
fn move_priority(state: &GameState, mv: &Move) -> i32 {
    match *mv {
        Move::Attack { from, to } => match (state.unit_at(from), state.unit_at(to)) {
            (Some(attacker), Some(target)) => {
                let dealt = state.damage_amount(attacker, target);
                let kill = dealt >= target.health;
                match (kill, target.kind) {
                    (true, UnitKind::AI) => 10_000,
                    (true, _) => 1_000 + dealt as i32,
                    (false, _) => 100 + dealt as i32,
                }
            }
            _ => 0,
        },
        Move::Repair { .. } => 50,
        Move::Movement { .. } => 10,
        Move::SelfDestruct { .. } => 0,
    }
}

fn order_moves(state: &GameState, moves: &mut [Move]) {
    // Stable: equal priorities keep generation order
    moves.sort_by_cached_key(|mv| Reverse(move_priority(state, mv)));
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Raised when the clock runs out mid-depth; the depth is discarded
#[derive(Debug)]
struct Timeout;

#[derive(Clone, Debug, Default)]
struct Counters {
    nodes: u64,
    interior: u64,
    children: u64,
    evaluations: FxHashMap<u32, u64>,
}

impl Counters {
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn absorb(&mut self, other: Counters) {
        self.nodes += other.nodes;
        self.interior += other.interior;
        self.children += other.children;
        for (ply, count) in other.evaluations {
            *self.evaluations.entry(ply).or_insert(0) += count;
        }
    }

    fn into_report(
        self,
        best_move: Move,
        score: i32,
        depth_reached: u32,
        elapsed: Duration,
        timed_out: bool,
        fallback: bool,
    ) -> SearchReport {
        let mut evaluations_per_depth: Vec<_> = self.evaluations.into_iter().collect();
        evaluations_per_depth.sort_unstable();
        let average_branching = if self.interior == 0 {
            0.0
        } else {
            self.children as f64 / self.interior as f64
        };
        SearchReport {
            best_move,
            score,
            depth_reached,
            nodes: self.nodes,
            evaluations_per_depth,
            average_branching,
            elapsed,
            timed_out,
            fallback,
        }
    }
}

/// Per-search context: scores are always from `root_player`'s perspective
struct Searcher<'a, E: ?Sized> {
    evaluator: &'a E,
    root_player: Player,
    alpha_beta: bool,
    deadline: Option<Instant>,
    counters: Counters,
}

impl<'a, E: Evaluator + ?Sized> Searcher<'a, E> {
    fn new(evaluator: &'a E, root_player: Player, alpha_beta: bool, deadline: Option<Instant>) -> Self {
        Self {
            evaluator,
            root_player,
            alpha_beta,
            deadline,
            counters: Counters::default(),
        }
    }

    fn past_deadline(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn leaf(&mut self, ply: u32, score: i32) -> i32 {
        *self.counters.evaluations.entry(ply).or_insert(0) += 1;
        score
    }

    fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        ply: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, Timeout> {
        self.counters.nodes += 1;
        if self.counters.nodes % TIME_CHECK_INTERVAL == 0 && self.past_deadline() {
            return Err(Timeout);
        }

        // Terminal check with depth bonus
        if let Some(score) = terminal_score(state, self.root_player, depth) {
            return Ok(self.leaf(ply, score));
        }

        // Depth limit
        if depth == 0 {
            let score = self.evaluator.score(state, self.root_player);
            return Ok(self.leaf(ply, score));
        }

        let mut moves = state.legal_moves();
        if moves.is_empty() {
            let score = self.evaluator.score(state, self.root_player);
            return Ok(self.leaf(ply, score));
        }
        if self.alpha_beta {
            order_moves(state, &mut moves);
        }

        self.counters.interior += 1;
        let maximizing = state.current_player() == self.root_player;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            self.counters.children += 1;
            let child = state.successor(mv);
            let score = self.minimax(&child, depth - 1, ply + 1, alpha, beta)?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }

            if self.alpha_beta && alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}

/// Search every root move to `depth` plies. Ties keep the earliest move.
#[cfg(not(feature = "parallel"))]
fn search_root<E: Evaluator + ?Sized>(
    searcher: &mut Searcher<'_, E>,
    state: &GameState,
    moves: &[Move],
    depth: u32,
) -> Result<(Move, i32), Timeout> {
    let mut best: Option<(Move, i32)> = None;
    let mut alpha = i32::MIN;

    searcher.counters.interior += 1;
    for &mv in moves {
        if searcher.past_deadline() {
            return Err(Timeout);
        }
        searcher.counters.children += 1;
        let child = state.successor(mv);
        let score = searcher.minimax(&child, depth - 1, 1, alpha, i32::MAX)?;

        if best.map_or(true, |(_, b)| score > b) {
            best = Some((mv, score));
        }
        if searcher.alpha_beta {
            alpha = alpha.max(score);
        }
    }

    best.ok_or(Timeout)
}

/// Root moves are searched on the rayon pool, each on a private copy of the
/// state with a full window, then merged in move order. Ties keep the
/// earliest move, exactly as in the sequential search.
#[cfg(feature = "parallel")]
fn search_root<E: Evaluator + ?Sized>(
    searcher: &mut Searcher<'_, E>,
    state: &GameState,
    moves: &[Move],
    depth: u32,
) -> Result<(Move, i32), Timeout> {
    use rayon::prelude::*;

    let evaluator = searcher.evaluator;
    let (root_player, alpha_beta, deadline) = (searcher.root_player, searcher.alpha_beta, searcher.deadline);

    let results: Vec<(Result<i32, Timeout>, Counters)> = moves
        .par_iter()
        .map(|&mv| {
            let mut worker = Searcher::new(evaluator, root_player, alpha_beta, deadline);
            let child = state.successor(mv);
            let score = worker.minimax(&child, depth - 1, 1, i32::MIN, i32::MAX);
            (score, worker.counters)
        })
        .collect();

    searcher.counters.interior += 1;
    searcher.counters.children += moves.len() as u64;

    let mut best: Option<(Move, i32)> = None;
    let mut timed_out = false;
    for (&mv, (score, counters)) in moves.iter().zip(results) {
        searcher.counters.absorb(counters);
        match score {
            Ok(score) if best.map_or(true, |(_, b)| score > b) => best = Some((mv, score)),
            Ok(_) => {}
            Err(Timeout) => timed_out = true,
        }
    }

    if timed_out {
        return Err(Timeout);
    }
    best.ok_or(Timeout)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coord;
    use crate::game::Outcome;
    use crate::ruleset::RuleSet;
    use crate::units::Unit;
    use std::sync::Arc;

    fn c(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn position(units: &[(&str, Player, UnitKind, u8)], to_move: Player) -> GameState {
        let units: Vec<_> = units
            .iter()
            .map(|&(at, p, k, h)| (c(at), Unit::new(p, k).with_health(h)))
            .collect();
        GameState::from_units(Arc::new(RuleSet::default()), &units, to_move)
    }

    fn skirmish() -> GameState {
        position(
            &[
                ("A0", Player::Defender, UnitKind::AI, 9),
                ("A1", Player::Defender, UnitKind::Tech, 9),
                ("B1", Player::Defender, UnitKind::Firewall, 6),
                ("C1", Player::Attacker, UnitKind::Virus, 9),
                ("C2", Player::Attacker, UnitKind::Program, 7),
                ("E4", Player::Attacker, UnitKind::AI, 9),
            ],
            Player::Attacker,
        )
    }

    #[test]
    fn test_ai_returns_move() {
        let game = GameState::default();
        let mut ai = AlphaBetaAI::new(SearchConfig::fixed_depth(2)).unwrap();
        let report = ai.choose_move(&game).unwrap();
        assert!(game.legal_moves().contains(&report.best_move));
        assert_eq!(report.depth_reached, 2);
        assert!(!report.fallback);
        assert!(report.nodes > 0);
        assert!(ai.stats().total_evaluations() > 0);
    }

    #[test]
    fn test_ai_kills_exposed_ai() {
        let game = position(
            &[
                ("A0", Player::Defender, UnitKind::AI, 1),
                ("A1", Player::Defender, UnitKind::Tech, 9),
                ("B0", Player::Attacker, UnitKind::Virus, 9),
                ("E4", Player::Attacker, UnitKind::AI, 9),
            ],
            Player::Attacker,
        );
        let mut ai = AlphaBetaAI::new(SearchConfig::fixed_depth(3)).unwrap();
        let report = ai.choose_move(&game).unwrap();
        assert_eq!(report.best_move, Move::Attack { from: c("B0"), to: c("A0") });
        assert!(report.score >= WIN_THRESHOLD);
        // Proven win stops the deepening early
        assert_eq!(report.depth_reached, 1);
        assert_eq!(game.apply_move(report.best_move).unwrap().outcome(), Outcome::AttackerWins);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let game = skirmish();
        for kind in [HeuristicKind::E0, HeuristicKind::E1, HeuristicKind::E2] {
            for depth in 1..=3 {
                let config = SearchConfig::fixed_depth(depth).with_heuristic(kind);
                let plain = AlphaBetaAI::new(config.clone().with_alpha_beta(false)).unwrap();
                let pruned = AlphaBetaAI::new(config.with_alpha_beta(true)).unwrap();
                assert_eq!(
                    plain.search_depth(&game, depth),
                    pruned.search_depth(&game, depth),
                    "{} depth {}",
                    kind,
                    depth
                );
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let game = skirmish();
        let mut plain = AlphaBetaAI::new(SearchConfig::fixed_depth(3).with_alpha_beta(false)).unwrap();
        let mut pruned = AlphaBetaAI::new(SearchConfig::fixed_depth(3)).unwrap();
        let a = plain.choose_move(&game).unwrap();
        let b = pruned.choose_move(&game).unwrap();
        assert_eq!(a.best_move, b.best_move);
        assert!(b.nodes < a.nodes, "pruned {} vs plain {}", b.nodes, a.nodes);
    }

    #[test]
    fn test_iterative_deepening_matches_fixed_depth() {
        let game = skirmish();
        let mut ai = AlphaBetaAI::new(
            SearchConfig::fixed_depth(3).with_time_budget(Some(Duration::from_secs(60))),
        )
        .unwrap();
        let report = ai.choose_move(&game).unwrap();
        let fixed = ai.search_depth(&game, report.depth_reached).unwrap();
        assert_eq!(report.best_move, fixed.0);
        assert_eq!(report.score, fixed.1);
    }

    #[test]
    fn test_tiny_budget_falls_back() {
        let game = GameState::default();
        let config = SearchConfig {
            max_depth: 30,
            time_budget: Some(Duration::from_nanos(1)),
            ..Default::default()
        };
        let mut ai = AlphaBetaAI::new(config).unwrap();
        let report = ai.choose_move(&game).unwrap();
        assert!(game.legal_moves().contains(&report.best_move));
        assert!(report.timed_out || report.fallback);
        if report.fallback {
            assert_eq!(report.best_move, game.legal_moves()[0]);
            assert_eq!(report.depth_reached, 0);
        }
    }

    #[test]
    fn test_timed_out_defender_keeps_its_ai() {
        let game = GameState::default()
            .apply_move(Move::Movement { from: c("C4"), to: c("B4") })
            .unwrap();
        for config in [
            SearchConfig::default(),
            SearchConfig::default().with_seed(3),
        ] {
            let mut ai = AlphaBetaAI::new(config.with_time_budget(Some(Duration::from_nanos(1)))).unwrap();
            let report = ai.choose_move(&game).unwrap();
            assert!(report.fallback);
            assert_eq!(report.best_move, game.legal_moves()[0]);
            let next = game.apply_move(report.best_move).unwrap();
            assert_eq!(next.outcome(), Outcome::InProgress, "{}", report.best_move);
        }
    }

    #[test]
    fn test_budget_is_honored() {
        let game = GameState::default();
        let budget = Duration::from_millis(200);
        let config = SearchConfig {
            max_depth: 50,
            time_budget: Some(budget),
            ..Default::default()
        };
        let mut ai = AlphaBetaAI::new(config).unwrap();
        let report = ai.choose_move(&game).unwrap();
        assert!(report.timed_out);
        // Generous slack for a single node expansion past the last clock check
        assert!(report.elapsed < budget + Duration::from_millis(250), "{:?}", report.elapsed);
    }

    #[test]
    fn test_deterministic_without_shuffle() {
        let game = skirmish();
        let mut a = AlphaBetaAI::new(SearchConfig::fixed_depth(2)).unwrap();
        let mut b = AlphaBetaAI::new(SearchConfig::fixed_depth(2)).unwrap();
        assert_eq!(a.best_move(&game), b.best_move(&game));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let game = GameState::default();
        let config = SearchConfig::fixed_depth(1).with_seed(7);
        let mut a = AlphaBetaAI::new(config.clone()).unwrap();
        let mut b = AlphaBetaAI::new(config).unwrap();
        assert_eq!(a.best_move(&game), b.best_move(&game));
    }

    #[test]
    fn test_terminal_position_has_no_move() {
        let game = GameState::default().with_turns_played(100);
        let mut ai = AlphaBetaAI::new(SearchConfig::fixed_depth(2)).unwrap();
        assert!(ai.choose_move(&game).is_none());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AlphaBetaAI::new(SearchConfig::fixed_depth(0)),
            Err(ConfigError::ZeroDepth)
        ));
        let config = SearchConfig::default().with_time_budget(Some(Duration::ZERO));
        assert!(matches!(AlphaBetaAI::new(config), Err(ConfigError::ZeroTimeBudget)));
    }

    #[test]
    fn test_move_ordering() {
        let game = skirmish();
        let mut moves = game.legal_moves();
        order_moves(&game, &mut moves);
        assert!(matches!(moves[0], Move::Attack { .. }));
        assert!(matches!(moves.last(), Some(Move::SelfDestruct { .. })));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_root_split_keeps_first_best() {
        let game = skirmish();
        let heuristics = Heuristics::default();
        let moves = game.legal_moves();

        for alpha_beta in [true, false] {
            for depth in 1..=3 {
                let mut expected: Option<(Move, i32)> = None;
                for &mv in &moves {
                    let mut single = Searcher::new(&heuristics, Player::Attacker, alpha_beta, None);
                    let score = single
                        .minimax(&game.successor(mv), depth - 1, 1, i32::MIN, i32::MAX)
                        .unwrap();
                    if expected.map_or(true, |(_, b)| score > b) {
                        expected = Some((mv, score));
                    }
                }

                let mut searcher = Searcher::new(&heuristics, Player::Attacker, alpha_beta, None);
                let split = search_root(&mut searcher, &game, &moves, depth).ok();
                assert_eq!(split, expected, "alpha_beta {} depth {}", alpha_beta, depth);
                assert!(searcher.counters.children as usize >= moves.len());
            }
        }
    }

    #[test]
    fn test_play_game() {
        let rules = RuleSet::default().with_max_turns(12);
        let game = rules.to_game_state().unwrap();
        let mut ai = AlphaBetaAI::new(SearchConfig::fixed_depth(1)).unwrap();
        let (final_state, history) = ai.play_game(game);

        assert!(!history.is_empty());
        assert!(final_state.is_terminal());
        assert!(history.len() <= 12);
        assert_eq!(ai.stats().searches as usize, history.len());
    }
}
