//! Adaptive Swiss: meta-aware first round, then record buckets paired by matchup quality.

use super::{award_bye, meta_aware_pairings, Pairing, PairingContext, PairingStrategy};
use crate::logic::standings::pairing_order;
use crate::models::{Competitor, TournamentError};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Rating gap at which the rating component of a matchup score reaches zero.
const RATING_WINDOW: f64 = 500.0;
/// Multiplier applied to the score of a rematch.
const REMATCH_PENALTY: f64 = 0.2;

const ARCHETYPE_WEIGHT: f64 = 0.4;
const RATING_WEIGHT: f64 = 0.3;
const PLAYSTYLE_WEIGHT: f64 = 0.3;

pub struct AdaptiveSwissPairing;

impl PairingStrategy for AdaptiveSwissPairing {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        _ctx: &PairingContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if active.is_empty() {
            return Ok(Vec::new());
        }
        if round <= 1 {
            return Ok(meta_aware_pairings(active, rng));
        }

        let mut ranked: Vec<&Competitor> = active.to_vec();
        ranked.sort_by(|a, b| pairing_order(a, b));

        let mut buckets = record_buckets(&ranked);
        balance_odd_buckets(&mut buckets);

        let mut pairings = Vec::with_capacity(ranked.len() / 2 + 1);
        let mut floater: Option<&Competitor> = None;
        for mut bucket in buckets.into_iter().map(|b| b.members) {
            bucket.shuffle(rng);
            if let Some(f) = floater.take() {
                bucket.insert(0, f);
            }
            let (paired, leftover) = best_matchups(bucket);
            pairings.extend(paired);
            floater = leftover;
        }

        award_bye(&mut pairings, floater.map(|c| c.id), &ranked);
        Ok(pairings)
    }
}

/// Competitors sharing one `W-L-D` record.
struct RecordBucket<'a> {
    wins: u32,
    losses: u32,
    draws: u32,
    members: Vec<&'a Competitor>,
}

impl RecordBucket<'_> {
    fn is_adjacent(&self, other: &RecordBucket<'_>) -> bool {
        self.wins.abs_diff(other.wins) <= 1 && self.losses.abs_diff(other.losses) <= 1
    }
}

/// Buckets ordered by wins (descending), then losses (ascending), then draws (descending).
/// Members keep their relative pairing order.
fn record_buckets<'a>(ranked: &[&'a Competitor]) -> Vec<RecordBucket<'a>> {
    let mut buckets: Vec<RecordBucket<'a>> = Vec::new();
    for &c in ranked {
        match buckets
            .iter_mut()
            .find(|b| (b.wins, b.losses, b.draws) == (c.wins, c.losses, c.draws))
        {
            Some(b) => b.members.push(c),
            None => buckets.push(RecordBucket {
                wins: c.wins,
                losses: c.losses,
                draws: c.draws,
                members: vec![c],
            }),
        }
    }
    buckets.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| a.losses.cmp(&b.losses))
            .then_with(|| b.draws.cmp(&a.draws))
    });
    buckets
}

/// An odd bucket borrows one competitor from a later, adjacent, also-odd bucket,
/// leaving both even.
fn balance_odd_buckets(buckets: &mut [RecordBucket<'_>]) {
    for i in 0..buckets.len() {
        if buckets[i].members.len() % 2 == 0 {
            continue;
        }
        let (head, tail) = buckets.split_at_mut(i + 1);
        let current = &mut head[i];
        let donor = tail
            .iter_mut()
            .find(|b| b.members.len() % 2 == 1 && current.is_adjacent(b));
        if let Some(donor) = donor {
            if let Some(borrowed) = donor.members.pop() {
                current.members.push(borrowed);
            }
        }
    }
}

/// Greedy pairing: the first available competitor takes their best-scoring opponent.
fn best_matchups(mut available: Vec<&Competitor>) -> (Vec<Pairing>, Option<&Competitor>) {
    let mut pairings = Vec::with_capacity(available.len() / 2);
    while available.len() >= 2 {
        let me = available.remove(0);
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, other) in available.iter().enumerate() {
            let score = matchup_score(me, other);
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }
        let partner = available.remove(best);
        pairings.push(Pairing::new(me.id, partner.id));
    }
    (pairings, available.pop())
}

/// How good a game `a` vs `b` would be, in `0.0..=1.0`.
///
/// Weighs archetype diversity, rating closeness and playstyle contrast; a
/// rematch is scaled down by [`REMATCH_PENALTY`].
pub fn matchup_score(a: &Competitor, b: &Competitor) -> f64 {
    let archetype = match (&a.archetype, &b.archetype) {
        (Some(x), Some(y)) if x == y => 0.3,
        (Some(_), Some(_)) => 0.7,
        _ => 0.5,
    };
    let rating =
        (1.0 - (a.effective_rating() - b.effective_rating()).abs() / RATING_WINDOW).max(0.0);
    let playstyle = match (a.playstyle, b.playstyle) {
        (Some(x), Some(y)) => 0.5 + (x.aggression - y.aggression).abs() / 2.0,
        _ => 0.5,
    };

    let score = ARCHETYPE_WEIGHT * archetype + RATING_WEIGHT * rating + PLAYSTYLE_WEIGHT * playstyle;
    if a.has_played(b.id) {
        score * REMATCH_PENALTY
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_record(name: &str, wins: u32, losses: u32) -> Competitor {
        let mut c = Competitor::new(name);
        c.wins = wins;
        c.losses = losses;
        c.match_points = wins * 3;
        c
    }

    #[test]
    fn odd_bucket_borrows_from_adjacent_odd_bucket() {
        let a = with_record("a", 2, 0);
        let b = with_record("b", 1, 1);
        let c = with_record("c", 1, 1);
        let d = with_record("d", 1, 1);
        let ranked = [&a, &b, &c, &d];
        let mut buckets = record_buckets(&ranked);
        assert_eq!(buckets.len(), 2);
        balance_odd_buckets(&mut buckets);
        assert_eq!(buckets[0].members.len(), 2);
        assert_eq!(buckets[1].members.len(), 2);
    }

    #[test]
    fn distant_buckets_do_not_borrow() {
        let a = with_record("a", 3, 0);
        let b = with_record("b", 0, 3);
        let ranked = [&a, &b];
        let mut buckets = record_buckets(&ranked);
        balance_odd_buckets(&mut buckets);
        assert_eq!(buckets[0].members.len(), 1);
        assert_eq!(buckets[1].members.len(), 1);
    }

    #[test]
    fn diverse_close_matchup_scores_higher() {
        let a = Competitor::new("a").with_archetype("Aggro").with_rating(1600.0);
        let same = Competitor::new("b").with_archetype("Aggro").with_rating(1600.0);
        let diverse = Competitor::new("c").with_archetype("Control").with_rating(1600.0);
        assert!(matchup_score(&a, &diverse) > matchup_score(&a, &same));
    }
}
