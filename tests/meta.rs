//! Integration tests for meta breakdown, meta bonus and analytics.

use tournament_pairing_engine::logic::analytics::{competitive_balance, meta_diversity};
use tournament_pairing_engine::logic::pairing::matchup_score;
use tournament_pairing_engine::logic::{calculate_meta_breakdown, is_underrepresented, match_meta_bonus};
use tournament_pairing_engine::{
    summarize, Competitor, EngineConfig, Format, MatchResult, MetaIncentives, RoundPlan, Tournament,
    TournamentEngine, TournamentOptions,
};

const EPS: f64 = 1e-9;

/// 20 players: 10 Aggro, 8 Control, one Rogue and one Tempo (5% each).
fn twenty() -> Vec<Competitor> {
    let mut roster = Vec::new();
    for i in 0..10 {
        roster.push(Competitor::new(format!("Aggro{i}")).with_archetype("Aggro"));
    }
    for i in 0..8 {
        roster.push(Competitor::new(format!("Control{i}")).with_archetype("Control"));
    }
    roster.push(Competitor::new("Rita").with_archetype("Rogue"));
    roster.push(Competitor::new("Tom").with_archetype("Tempo"));
    roster
}

fn by_name<'a>(roster: &'a [Competitor], name: &str) -> &'a Competitor {
    roster.iter().find(|c| c.name == name).unwrap()
}

#[test]
fn five_percent_archetype_is_underrepresented() {
    let roster = twenty();
    let breakdown = calculate_meta_breakdown(&roster, 0.1);
    assert_eq!(breakdown[0].archetype, "Aggro");
    assert!((breakdown[0].percentage - 50.0).abs() < EPS);

    let rogue = breakdown.iter().find(|e| e.archetype == "Rogue").unwrap();
    assert!((rogue.percentage - 5.0).abs() < EPS);
    assert!(rogue.is_underrepresented);
    assert!(is_underrepresented(&breakdown, Some("Rogue")));
    assert!(!is_underrepresented(&breakdown, Some("Control")));
    assert!(!is_underrepresented(&breakdown, None));
}

#[test]
fn bonus_counts_each_underrepresented_side_once() {
    let roster = twenty();
    let incentives = MetaIncentives::default();
    let breakdown = calculate_meta_breakdown(&roster, incentives.underrepresented_threshold);
    let rita = by_name(&roster, "Rita");
    let tom = by_name(&roster, "Tom");
    let aggro = by_name(&roster, "Aggro0");
    let aggro_too = by_name(&roster, "Aggro1");
    let control = by_name(&roster, "Control0");

    let one_side = match_meta_bonus(&breakdown, &incentives, rita, Some(aggro));
    assert!((one_side - 0.3).abs() < EPS);
    let both_sides = match_meta_bonus(&breakdown, &incentives, rita, Some(tom));
    assert!((both_sides - 0.5).abs() < EPS);
    let diverse = match_meta_bonus(&breakdown, &incentives, aggro, Some(control));
    assert!((diverse - 0.1).abs() < EPS);
    assert_eq!(match_meta_bonus(&breakdown, &incentives, aggro, Some(aggro_too)), 0.0);
    assert_eq!(match_meta_bonus(&breakdown, &incentives, rita, None), 0.0);
}

fn one_round(meta_balancing: bool) -> (TournamentEngine, Tournament) {
    let mut engine = TournamentEngine::with_seed(EngineConfig::default(), 5);
    let mut options = TournamentOptions::new("Meta Cup", Format::Swiss)
        .with_competitors(twenty())
        .with_rounds(RoundPlan::Single(1))
        .fixed_structure();
    options.meta_balancing = Some(meta_balancing);
    let mut t = engine.create_tournament(options).unwrap();
    engine.start_tournament(&mut t).unwrap();
    (engine, t)
}

#[test]
fn winner_of_a_rogue_match_collects_the_bonus() {
    let (mut engine, mut t) = one_round(true);
    let rita = t.competitors.iter().find(|c| c.name == "Rita").unwrap().id;
    let m = t.matches.iter().find(|m| m.involves(rita)).unwrap().clone();
    assert!(m.meta_bonus >= 0.3 - EPS);

    let result = if m.competitor_a == rita {
        MatchResult::CompetitorA
    } else {
        MatchResult::CompetitorB
    };
    engine.record_match_result(&mut t, m.id, result, vec![]).unwrap();

    let winner = t.competitor(rita).unwrap();
    assert!((winner.meta_bonus - m.meta_bonus).abs() < EPS);
    let loser = t.competitor(m.opponent_of(rita).unwrap()).unwrap();
    assert_eq!(loser.meta_bonus, 0.0);
}

#[test]
fn disabled_meta_balancing_carries_no_bonus() {
    let (_, t) = one_round(false);
    assert!(t.meta_breakdown.is_empty());
    assert!(t.matches.iter().all(|m| m.meta_bonus == 0.0));
}

#[test]
fn bonus_breaks_ties_in_standings() {
    let (mut engine, mut t) = one_round(true);
    let pending: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    for id in pending {
        engine
            .record_match_result(&mut t, id, MatchResult::CompetitorA, vec![])
            .unwrap();
    }
    let standings = engine.get_standings(&t);
    let scores: Vec<f64> = standings
        .iter()
        .map(|r| f64::from(r.match_points) + r.meta_bonus)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn diversity_and_balance() {
    let roster = vec![
        Competitor::new("a").with_archetype("Aggro"),
        Competitor::new("b").with_archetype("Control"),
    ];
    let breakdown = calculate_meta_breakdown(&roster, 0.1);
    assert!((meta_diversity(&breakdown) - std::f64::consts::LN_2).abs() < EPS);
    assert_eq!(meta_diversity(&[]), 0.0);

    let (mut engine, mut t) = one_round(true);
    assert_eq!(competitive_balance(&t), 0.0);
    let pending: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    for id in pending {
        engine
            .record_match_result(&mut t, id, MatchResult::CompetitorA, vec![])
            .unwrap();
    }
    // Every winner has exactly one win.
    assert!((competitive_balance(&t) - 1.0).abs() < EPS);

    let summary = summarize(&t, 0.1);
    assert_eq!(summary.total_competitors, 20);
    assert_eq!(summary.completed_matches, 10);
    assert_eq!(summary.byes, 0);
    assert_eq!(summary.draws, 0);
    assert!(summary.champion.is_some());
    assert_eq!(summary.meta_breakdown.len(), 4);
}

#[test]
fn matchup_score_penalises_rematches() {
    let a = Competitor::new("a").with_rating(1500.0).with_playstyle(0.2);
    let mut b = Competitor::new("b").with_rating(1500.0).with_playstyle(0.8);
    let fresh = matchup_score(&a, &b);
    // 0.4 * 0.5 + 0.3 * 1.0 + 0.3 * 0.8
    assert!((fresh - 0.74).abs() < EPS);

    let mut a = a;
    a.history.push(tournament_pairing_engine::models::HistoryEntry {
        match_id: uuid::Uuid::new_v4(),
        round: 1,
        opponent: Some(b.id),
        outcome: tournament_pairing_engine::models::Outcome::Win,
        is_bye: false,
    });
    b.rating = Some(2100.0);
    let rematch = matchup_score(&a, &b);
    // Rating gap beyond the window contributes nothing.
    assert!((rematch - 0.2 * (0.2 + 0.24)).abs() < EPS);
}
