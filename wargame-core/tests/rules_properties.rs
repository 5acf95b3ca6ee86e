//! Property tests over positions reached by seeded random playouts.

use proptest::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use wargame_core::{Coord, CounterDamage, GameState, Move, Outcome, Player, RuleSet, UnitKind, MAX_HEALTH};

/// Play `plies` random legal moves from the opening
fn random_position(seed: u64, plies: usize, rules: RuleSet) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = rules.to_game_state().unwrap();
    for _ in 0..plies {
        let moves = state.legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        state = state.apply_move(mv).unwrap();
    }
    state
}

fn counter_damage() -> impl Strategy<Value = CounterDamage> {
    prop_oneof![
        Just(CounterDamage::Always),
        Just(CounterDamage::IfSurvives),
        Just(CounterDamage::Never),
    ]
}

fn assert_invariants(state: &GameState) {
    for player in [Player::Attacker, Player::Defender] {
        let ais = state.units_of(player).filter(|(_, u)| u.kind == UnitKind::AI).count();
        assert!(ais <= 1, "{} has {} AIs", player, ais);
        assert_eq!(ais == 1, state.ai_position(player).is_some());
    }
    for (_, unit) in state.board().units() {
        assert!(unit.health >= 1 && unit.health <= MAX_HEALTH, "bad health {}", unit);
    }
}

fn any_coord(dim: i8) -> impl Strategy<Value = Coord> {
    (-1..=dim, -1..=dim).prop_map(|(r, c)| Coord::new(r, c))
}

fn any_move(dim: i8) -> impl Strategy<Value = Move> {
    prop_oneof![
        (any_coord(dim), any_coord(dim)).prop_map(|(from, to)| Move::Movement { from, to }),
        (any_coord(dim), any_coord(dim)).prop_map(|(from, to)| Move::Attack { from, to }),
        (any_coord(dim), any_coord(dim)).prop_map(|(from, to)| Move::Repair { from, to }),
        any_coord(dim).prop_map(|at| Move::SelfDestruct { at }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn legal_moves_are_all_accepted(
        seed in any::<u64>(),
        plies in 0usize..60,
        convention in counter_damage(),
    ) {
        let rules = RuleSet::default().with_counter_damage(convention);
        let state = random_position(seed, plies, rules);
        assert_invariants(&state);

        for mv in state.legal_moves() {
            let next = state.apply_move(mv);
            prop_assert!(next.is_ok(), "{} rejected: {:?}", mv, next.as_ref().err());
            let next = next.unwrap();
            assert_invariants(&next);
            prop_assert_eq!(next.turns_played, state.turns_played + 1);
            prop_assert_eq!(next.current_player(), state.current_player().opponent());
        }
    }

    #[test]
    fn arbitrary_moves_accepted_only_if_generated(
        seed in any::<u64>(),
        plies in 0usize..40,
        mv in any_move(5),
    ) {
        let state = random_position(seed, plies, RuleSet::default());
        let legal = state.legal_moves().contains(&mv);
        let result = state.apply_move(mv);
        prop_assert_eq!(result.is_ok(), legal, "{} -> {:?}", mv, result.err());
    }

    #[test]
    fn attacks_never_heal(seed in any::<u64>(), plies in 0usize..60) {
        let state = random_position(seed, plies, RuleSet::default());

        for mv in state.legal_moves() {
            let Move::Attack { from, to } = mv else { continue };
            let before_target = state.unit_at(to).unwrap().health;
            let before_source = state.unit_at(from).unwrap().health;
            let next = state.apply_move(mv).unwrap();

            // Target always loses at least one point, or dies
            if let Some(u) = next.unit_at(to) {
                prop_assert!(u.health < before_target);
            }
            if let Some(u) = next.unit_at(from) {
                prop_assert!(u.health <= before_source);
            }
            // Nobody else is touched
            for (at, unit) in state.board().units() {
                if at != from && at != to {
                    prop_assert_eq!(next.unit_at(at), Some(unit));
                }
            }
        }
    }

    #[test]
    fn outcome_matches_ai_survival(seed in any::<u64>(), plies in 0usize..120) {
        let rules = RuleSet::default().with_max_turns(60);
        let state = random_position(seed, plies, rules);

        let attacker_ai = state.ai_position(Player::Attacker).is_some();
        let defender_ai = state.ai_position(Player::Defender).is_some();
        let expected = match (attacker_ai, defender_ai) {
            (false, _) => Outcome::DefenderWins,
            (true, false) => Outcome::AttackerWins,
            (true, true) if state.turns_played >= 60 => Outcome::Draw,
            (true, true) => Outcome::InProgress,
        };
        prop_assert_eq!(state.outcome(), expected);
        prop_assert_eq!(state.legal_moves().is_empty(), expected.is_terminal());
    }

    #[test]
    fn rejected_moves_leave_state_untouched(seed in any::<u64>(), plies in 0usize..40, mv in any_move(5)) {
        let state = random_position(seed, plies, RuleSet::default());
        let before: Vec<_> = state.board().units().map(|(at, u)| (at, *u)).collect();
        if state.apply_move(mv).is_err() {
            let after: Vec<_> = state.board().units().map(|(at, u)| (at, *u)).collect();
            prop_assert_eq!(before, after);
        }
    }
}

#[test]
fn test_virus_attacks_program_from_opening() {
    // Attacker Virus at D4, Defender Program walked down to within reach
    let state = GameState::default();
    let before = state.unit_at(Coord::new(3, 4)).copied().unwrap();
    assert_eq!(before.kind, UnitKind::Virus);

    let units = [
        (Coord::new(0, 0), wargame_core::Unit::new(Player::Defender, UnitKind::AI)),
        (Coord::new(2, 4), wargame_core::Unit::new(Player::Defender, UnitKind::Program)),
        (Coord::new(3, 4), before),
        (Coord::new(4, 4), wargame_core::Unit::new(Player::Attacker, UnitKind::AI)),
    ];

    for (convention, virus_after) in [
        (CounterDamage::Always, 6),
        (CounterDamage::IfSurvives, 6),
        (CounterDamage::Never, 9),
    ] {
        let rules = std::sync::Arc::new(RuleSet::default().with_counter_damage(convention));
        let state = GameState::from_units(rules, &units, Player::Attacker);
        let next = state
            .apply_move(Move::Attack { from: Coord::new(3, 4), to: Coord::new(2, 4) })
            .unwrap();
        assert_eq!(next.unit_at(Coord::new(2, 4)).unwrap().health, 9 - 6);
        assert_eq!(next.unit_at(Coord::new(3, 4)).unwrap().health, virus_after, "{:?}", convention);
    }
}
