//! Pairing strategies, one per format, behind a single dispatch point.
//!
//! Every strategy receives the active (non-dropped) competitors and the round
//! number and returns the pairings for that round. Randomness comes only from
//! the injected RNG, so a seeded engine reproduces its pairings exactly.

mod adaptive;
mod bracket;
mod hybrid;
mod meta_aware;
mod parallel;
mod round_robin;
mod swiss;

pub use adaptive::{matchup_score, AdaptiveSwissPairing};
pub use bracket::{seed_order, BracketPairing};
pub use hybrid::HybridPairing;
pub use meta_aware::meta_aware_pairings;
pub use parallel::ParallelBracketPairing;
pub use round_robin::RoundRobinPairing;
pub use swiss::SwissPairing;

use crate::models::{BracketKind, Competitor, CompetitorId, Format, Match, RoundPlan, TournamentError};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Two competitors to seat together, or one with a bye.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub competitor_a: CompetitorId,
    /// None for a bye.
    pub competitor_b: Option<CompetitorId>,
    pub bracket: BracketKind,
    pub bracket_position: Option<u32>,
}

impl Pairing {
    pub fn new(a: CompetitorId, b: CompetitorId) -> Self {
        Self {
            competitor_a: a,
            competitor_b: Some(b),
            bracket: BracketKind::Main,
            bracket_position: None,
        }
    }

    pub fn bye(a: CompetitorId) -> Self {
        Self {
            competitor_a: a,
            competitor_b: None,
            bracket: BracketKind::Main,
            bracket_position: None,
        }
    }

    /// File this pairing at a slot of a seeded bracket.
    pub fn at(mut self, bracket: BracketKind, position: u32) -> Self {
        self.bracket = bracket;
        self.bracket_position = Some(position);
        self
    }

    pub fn is_bye(&self) -> bool {
        self.competitor_b.is_none()
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.competitor_a == id || self.competitor_b == Some(id)
    }
}

/// Read-only tournament state a strategy may consult.
#[derive(Clone, Copy, Debug)]
pub struct PairingContext<'a> {
    /// Every match created so far, all rounds.
    pub matches: &'a [Match],
    /// Every registered competitor in registration order, dropped ones included.
    pub roster: &'a [CompetitorId],
    pub rounds: RoundPlan,
    pub top_cut: u32,
}

pub trait PairingStrategy {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        ctx: &PairingContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError>;
}

/// The strategy that pairs a format.
pub fn strategy_for(format: Format) -> &'static dyn PairingStrategy {
    match format {
        Format::Swiss => &SwissPairing,
        Format::SingleElimination | Format::DoubleElimination => &BracketPairing,
        Format::RoundRobin => &RoundRobinPairing,
        Format::Hybrid => &HybridPairing,
        Format::AdaptiveSwiss => &AdaptiveSwissPairing,
        Format::ParallelBrackets => &ParallelBracketPairing,
    }
}

/// Pair a round for `format`. An empty field yields no pairings.
pub fn generate_pairings(
    format: Format,
    active: &[&Competitor],
    round: u32,
    ctx: &PairingContext<'_>,
    rng: &mut dyn RngCore,
) -> Result<Vec<Pairing>, TournamentError> {
    if active.is_empty() {
        return Ok(Vec::new());
    }
    let pairings = strategy_for(format).pair(active, round, ctx, rng)?;
    log::debug!(
        "Round {} ({}): {} pairings for {} competitors",
        round,
        format,
        pairings.len(),
        active.len()
    );
    Ok(pairings)
}

/// Adjacent pairs in order; an odd last competitor gets a bye.
pub(crate) fn pair_in_order(ids: &[CompetitorId]) -> Vec<Pairing> {
    ids.chunks(2)
        .map(|chunk| match chunk {
            [a, b] => Pairing::new(*a, *b),
            [a] => Pairing::bye(*a),
            _ => unreachable!("chunks(2) yields one or two ids"),
        })
        .collect()
}

/// Give the round's single bye once every other competitor is seated.
///
/// `leftover` is whoever was left unpaired after bucket pairing. The bye goes to
/// the lowest-ranked competitor who has not had one yet; if that is someone
/// already seated, they are pulled out and their orphaned opponent is re-paired
/// with the leftover. When everyone has had a bye, the leftover takes it.
pub(crate) fn award_bye(
    pairings: &mut Vec<Pairing>,
    leftover: Option<CompetitorId>,
    ranked: &[&Competitor],
) {
    let Some(leftover) = leftover else {
        return;
    };
    let recipient = ranked
        .iter()
        .rev()
        .find(|c| !c.has_had_bye())
        .map(|c| c.id)
        .unwrap_or(leftover);

    if recipient != leftover {
        if let Some(p) = pairings.iter_mut().find(|p| p.involves(recipient)) {
            let orphan = if p.competitor_a == recipient {
                p.competitor_b
            } else {
                Some(p.competitor_a)
            };
            match orphan {
                Some(orphan) => {
                    log::debug!("Re-pairing {} with {} to free the bye", orphan, leftover);
                    p.competitor_a = orphan;
                    p.competitor_b = Some(leftover);
                }
                None => p.competitor_a = leftover,
            }
        }
    }
    log::debug!("Bye awarded to {}", recipient);
    pairings.push(Pairing::bye(recipient));
}

/// Split an already sorted list into runs sharing the same key.
pub(crate) fn group_runs<'a, K: PartialEq>(
    sorted: &[&'a Competitor],
    key: impl Fn(&Competitor) -> K,
) -> Vec<Vec<&'a Competitor>> {
    let mut groups: Vec<(K, Vec<&'a Competitor>)> = Vec::new();
    for &c in sorted {
        let k = key(c);
        match groups.last_mut() {
            Some((last, members)) if *last == k => members.push(c),
            _ => groups.push((k, vec![c])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}
