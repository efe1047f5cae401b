//! Integration tests for the tournament lifecycle: start, results, drops and errors.

use tournament_pairing_engine::{
    Competitor, EngineConfig, Format, GameResult, MatchId, MatchResult, RoundPlan, Tournament,
    TournamentEngine, TournamentError, TournamentOptions, TournamentStatus,
};
use uuid::Uuid;

fn field(n: usize) -> Vec<Competitor> {
    (0..n).map(|i| Competitor::new(format!("P{i}"))).collect()
}

fn engine() -> TournamentEngine {
    TournamentEngine::with_seed(EngineConfig::default(), 42)
}

fn swiss(engine: &mut TournamentEngine, n: usize, rounds: u32) -> Tournament {
    let options = TournamentOptions::new("Friday Swiss", Format::Swiss)
        .with_competitors(field(n))
        .with_rounds(RoundPlan::Single(rounds))
        .fixed_structure();
    engine.create_tournament(options).unwrap()
}

fn pending(t: &Tournament) -> Vec<MatchId> {
    t.round_matches(t.current_round)
        .filter(|m| !m.is_completed())
        .map(|m| m.id)
        .collect()
}

/// Competitor A wins every pending match of the current round 2-1.
fn play_round(engine: &mut TournamentEngine, t: &mut Tournament) {
    for id in pending(t) {
        let m = t.get_match(id).unwrap().clone();
        let b = m.competitor_b.unwrap();
        let games = vec![
            GameResult::won_by(m.competitor_a),
            GameResult::won_by(b),
            GameResult::won_by(m.competitor_a),
        ];
        engine
            .record_match_result(t, id, MatchResult::CompetitorA, games)
            .unwrap();
    }
}

#[test]
fn eight_player_swiss_ranks_everyone_after_three_rounds() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 8, 3);
    engine.start_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.round_matches(1).count(), 4);

    for _ in 0..3 {
        play_round(&mut engine, &mut t);
    }
    assert_eq!(t.status, TournamentStatus::Completed);
    assert!(t.completed_at.is_some());

    let standings = engine.get_standings(&t);
    let ranks: Vec<u32> = standings.iter().filter_map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=8).collect::<Vec<u32>>());
}

#[test]
fn standings_are_idempotent() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 8, 3);
    engine.start_tournament(&mut t).unwrap();
    play_round(&mut engine, &mut t);
    assert_eq!(engine.get_standings(&t), engine.get_standings(&t));
}

#[test]
fn completing_a_round_pairs_the_next() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 8, 3);
    engine.start_tournament(&mut t).unwrap();
    play_round(&mut engine, &mut t);

    assert_eq!(t.current_round, 2);
    let round_two: Vec<_> = t.round_matches(2).collect();
    assert_eq!(round_two.len(), 4);
    assert!(round_two.iter().all(|m| !m.is_bye()));
    // Winners meet winners.
    for m in round_two {
        let a = t.competitor(m.competitor_a).unwrap();
        let b = t.competitor(m.competitor_b.unwrap()).unwrap();
        assert_eq!(a.match_points, b.match_points);
    }
}

#[test]
fn odd_field_gets_exactly_one_bye() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 5, 3);
    engine.start_tournament(&mut t).unwrap();

    let byes: Vec<_> = t.round_matches(1).filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    assert!(byes[0].is_completed());
    let lucky = t.competitor(byes[0].competitor_a).unwrap();
    assert_eq!(lucky.wins, 1);
    assert_eq!(lucky.match_points, 3);
    assert!(lucky.history[0].is_bye);
}

#[test]
fn dropping_mid_round_resolves_the_pending_match() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 8, 3);
    engine.start_tournament(&mut t).unwrap();

    let m = t.round_matches(1).next().unwrap().clone();
    let dropped = engine.drop_player(&mut t, m.competitor_a).unwrap();
    assert!(dropped.dropped);
    assert_eq!(dropped.losses, 1);

    let resolved = t.get_match(m.id).unwrap();
    assert!(resolved.is_completed());
    assert_eq!(resolved.winner(), m.competitor_b);
    assert_eq!(t.competitor(m.competitor_b.unwrap()).unwrap().wins, 1);

    // Dropping again changes nothing.
    let again = engine.drop_player(&mut t, m.competitor_a).unwrap();
    assert_eq!(again.losses, 1);

    play_round(&mut engine, &mut t);
    assert_eq!(t.current_round, 2);
    assert!(t.round_matches(2).all(|x| !x.involves(m.competitor_a)));
    assert_eq!(t.round_matches(2).filter(|x| x.is_bye()).count(), 1);

    let standings = engine.get_standings(&t);
    let last = standings.last().unwrap();
    assert_eq!(last.id, m.competitor_a);
    assert_eq!(last.rank, None);
}

#[test]
fn results_before_start_are_rejected() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 2);
    let err = engine
        .record_match_result(&mut t, Uuid::new_v4(), MatchResult::Draw, vec![])
        .unwrap_err();
    assert_eq!(err, TournamentError::TournamentNotStarted);
}

#[test]
fn unknown_match_and_competitor_are_not_found() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 2);
    engine.start_tournament(&mut t).unwrap();

    let missing = Uuid::new_v4();
    assert_eq!(
        engine.record_match_result(&mut t, missing, MatchResult::Draw, vec![]),
        Err(TournamentError::MatchNotFound(missing))
    );
    assert_eq!(
        engine.drop_player(&mut t, missing),
        Err(TournamentError::CompetitorNotFound(missing))
    );
}

#[test]
fn starting_twice_is_an_invalid_state() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 2);
    engine.start_tournament(&mut t).unwrap();
    assert!(matches!(
        engine.start_tournament(&mut t),
        Err(TournamentError::InvalidState { .. })
    ));
}

#[test]
fn completed_tournament_rejects_changes() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 1);
    engine.start_tournament(&mut t).unwrap();
    let first = t.matches[0].id;
    let first_a = t.matches[0].competitor_a;
    play_round(&mut engine, &mut t);
    assert_eq!(t.status, TournamentStatus::Completed);

    assert!(matches!(
        engine.record_match_result(&mut t, first, MatchResult::Draw, vec![]),
        Err(TournamentError::InvalidState { .. })
    ));
    assert!(matches!(
        engine.drop_player(&mut t, first_a),
        Err(TournamentError::InvalidState { .. })
    ));
}

#[test]
fn a_match_cannot_be_recorded_twice() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 2);
    engine.start_tournament(&mut t).unwrap();
    let id = t.matches[0].id;
    engine
        .record_match_result(&mut t, id, MatchResult::Draw, vec![GameResult::drawn()])
        .unwrap();
    assert!(matches!(
        engine.record_match_result(&mut t, id, MatchResult::CompetitorA, vec![]),
        Err(TournamentError::InvalidResult(_))
    ));
}

#[test]
fn game_winner_must_play_in_the_match() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 4, 2);
    engine.start_tournament(&mut t).unwrap();
    let id = t.matches[0].id;
    let stray = GameResult::won_by(Uuid::new_v4());
    assert!(matches!(
        engine.record_match_result(&mut t, id, MatchResult::CompetitorA, vec![stray]),
        Err(TournamentError::InvalidResult(_))
    ));
    assert!(!t.get_match(id).unwrap().is_completed());
}

#[test]
fn draws_score_one_point_each() {
    let mut engine = engine();
    let mut t = swiss(&mut engine, 2, 1);
    engine.start_tournament(&mut t).unwrap();
    let id = t.matches[0].id;
    let m = engine
        .record_match_result(&mut t, id, MatchResult::Draw, vec![GameResult::drawn()])
        .unwrap();
    assert_eq!(m.winner(), None);
    for c in &t.competitors {
        assert_eq!(c.draws, 1);
        assert_eq!(c.match_points, 1);
        assert_eq!(c.record(), "0-0-1");
    }
}

#[test]
fn duplicate_names_are_rejected_at_creation() {
    let mut engine = engine();
    let options = TournamentOptions::new("Dupes", Format::Swiss)
        .with_competitors(vec![Competitor::new("Alice"), Competitor::new("alice ")]);
    assert_eq!(
        engine.create_tournament(options).unwrap_err(),
        TournamentError::DuplicateCompetitorName
    );
}

#[test]
fn seeded_engines_pair_identically() {
    let roster = field(9);
    let run = |seed: u64| {
        let mut engine = TournamentEngine::with_seed(EngineConfig::default(), seed);
        let options = TournamentOptions::new("Seeded", Format::Swiss)
            .with_competitors(roster.clone())
            .with_rounds(RoundPlan::Single(3))
            .fixed_structure();
        let mut t = engine.create_tournament(options).unwrap();
        engine.start_tournament(&mut t).unwrap();
        t.round_matches(1)
            .map(|m| (m.competitor_a, m.competitor_b))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn swiss_floats_past_a_bucket_rather_than_rematch() {
    for seed in 0..50 {
        let mut engine = TournamentEngine::with_seed(EngineConfig::default(), seed);
        let mut t = swiss(&mut engine, 4, 3);
        let leader = t.competitors[0].id;
        engine.start_tournament(&mut t).unwrap();

        while t.status == TournamentStatus::InProgress {
            for id in pending(&t) {
                let m = t.get_match(id).unwrap();
                let result = if m.competitor_b == Some(leader) {
                    MatchResult::CompetitorB
                } else {
                    MatchResult::CompetitorA
                };
                engine.record_match_result(&mut t, id, result, vec![]).unwrap();
            }
        }

        let mut pairs = std::collections::HashSet::new();
        for m in &t.matches {
            let b = m.competitor_b.unwrap();
            let key = if m.competitor_a < b { (m.competitor_a, b) } else { (b, m.competitor_a) };
            assert!(pairs.insert(key), "rematch with seed {}", seed);
        }
        assert_eq!(pairs.len(), 6);
        assert_eq!(t.competitor(leader).unwrap().wins, 3);
    }
}
