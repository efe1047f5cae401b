/// Property-based tests for pairing invariants using proptest
///
/// Each case plays a whole tournament with a seeded engine and checks the
/// invariants every round must satisfy.
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use tournament_pairing_engine::logic::round_robin_rounds;
use tournament_pairing_engine::{
    Competitor, CompetitorId, EngineConfig, Format, Match, MatchResult, RoundPlan, Tournament,
    TournamentEngine, TournamentOptions, TournamentStatus,
};

fn roster(n: usize, archetypes: bool) -> Vec<Competitor> {
    (0..n)
        .map(|i| {
            let c = Competitor::new(format!("P{i}")).with_rating(1200.0 + 37.0 * i as f64);
            if archetypes {
                c.with_archetype(["Aggro", "Control", "Combo"][i % 3])
            } else {
                c
            }
        })
        .collect()
}

/// Deterministic but varied results, including draws.
fn pick(m: &Match) -> MatchResult {
    match (m.table + m.round) % 3 {
        0 => MatchResult::CompetitorA,
        1 => MatchResult::CompetitorB,
        _ => MatchResult::Draw,
    }
}

/// Play every round to completion, checking match points never decrease.
fn play_out(engine: &mut TournamentEngine, t: &mut Tournament) -> Result<(), TestCaseError> {
    let mut guard = 0;
    while t.status == TournamentStatus::InProgress {
        let pending: Vec<_> = t
            .round_matches(t.current_round)
            .filter(|m| !m.is_completed())
            .map(|m| (m.id, pick(m)))
            .collect();
        prop_assert!(!pending.is_empty(), "round {} has nothing to play", t.current_round);
        for (id, result) in pending {
            let before: HashMap<CompetitorId, u32> =
                t.competitors.iter().map(|c| (c.id, c.match_points)).collect();
            engine.record_match_result(t, id, result, vec![]).unwrap();
            for c in &t.competitors {
                prop_assert!(c.match_points >= before[&c.id]);
            }
        }
        guard += 1;
        prop_assert!(guard < 64);
    }
    Ok(())
}

fn swiss_like(format: Format, n: usize, rounds: u32, seed: u64) -> (TournamentEngine, Tournament) {
    let mut engine = TournamentEngine::with_seed(EngineConfig::default(), seed);
    let options = TournamentOptions::new("Property", format)
        .with_competitors(roster(n, format == Format::AdaptiveSwiss))
        .with_rounds(RoundPlan::Single(rounds))
        .fixed_structure();
    let t = engine.create_tournament(options).unwrap();
    (engine, t)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn swiss_rounds_seat_everyone_once_with_fair_byes(
        n in 2usize..=17,
        rounds in 1u32..=5,
        seed in any::<u64>(),
        adaptive in any::<bool>(),
    ) {
        let format = if adaptive { Format::AdaptiveSwiss } else { Format::Swiss };
        let (mut engine, mut t) = swiss_like(format, n, rounds, seed);
        engine.start_tournament(&mut t).unwrap();
        play_out(&mut engine, &mut t)?;
        prop_assert_eq!(t.current_round, rounds);

        let mut had_bye: HashSet<CompetitorId> = HashSet::new();
        for round in 1..=rounds {
            let matches: Vec<&Match> = t.round_matches(round).collect();
            let mut seated = HashSet::new();
            for m in &matches {
                prop_assert!(seated.insert(m.competitor_a));
                if let Some(b) = m.competitor_b {
                    prop_assert!(seated.insert(b));
                }
            }
            prop_assert_eq!(seated.len(), n);

            let byes: Vec<CompetitorId> =
                matches.iter().filter(|m| m.is_bye()).map(|m| m.competitor_a).collect();
            prop_assert_eq!(byes.len(), n % 2);
            for id in byes {
                if had_bye.contains(&id) {
                    prop_assert_eq!(had_bye.len(), n, "second bye while others had none");
                }
                had_bye.insert(id);
            }
        }
    }

    #[test]
    fn round_robin_meets_everyone_exactly_once(n in 2usize..=10, seed in any::<u64>()) {
        let mut engine = TournamentEngine::with_seed(EngineConfig::default(), seed);
        let options = TournamentOptions::new("League", Format::RoundRobin)
            .with_competitors(roster(n, false))
            .fixed_structure();
        let mut t = engine.create_tournament(options).unwrap();
        prop_assert_eq!(t.rounds.total(), round_robin_rounds(n));
        engine.start_tournament(&mut t).unwrap();
        play_out(&mut engine, &mut t)?;

        let mut pairs = HashSet::new();
        for m in &t.matches {
            if let Some(b) = m.competitor_b {
                let key = if m.competitor_a < b { (m.competitor_a, b) } else { (b, m.competitor_a) };
                prop_assert!(pairs.insert(key));
            }
        }
        prop_assert_eq!(pairs.len(), n * (n - 1) / 2);
        for round in 1..=t.rounds.total() {
            prop_assert_eq!(t.round_matches(round).filter(|m| m.is_bye()).count(), n % 2);
        }
    }

    #[test]
    fn standings_rank_every_active_competitor(n in 2usize..=12, seed in any::<u64>()) {
        let (mut engine, mut t) = swiss_like(Format::Swiss, n, 3, seed);
        engine.start_tournament(&mut t).unwrap();
        play_out(&mut engine, &mut t)?;
        let first = engine.get_standings(&t);
        let ranks: Vec<u32> = first.iter().filter_map(|r| r.rank).collect();
        prop_assert_eq!(ranks, (1..=n as u32).collect::<Vec<u32>>());
        prop_assert_eq!(first, engine.get_standings(&t));
    }
}
