//! Meta-aware first round: cross-pair archetypes before pairing within one.

use super::{pair_in_order, Pairing};
use crate::models::{Competitor, CompetitorId};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::{BTreeMap, VecDeque};

const UNKNOWN_ARCHETYPE: &str = "Unknown";

/// Pair competitors of different archetypes first, largest archetype groups
/// first; whatever is left pairs within its own archetype. An odd field leaves
/// one bye.
pub fn meta_aware_pairings(active: &[&Competitor], rng: &mut dyn RngCore) -> Vec<Pairing> {
    let mut groups: BTreeMap<&str, Vec<CompetitorId>> = BTreeMap::new();
    for c in active {
        let key = c.archetype.as_deref().unwrap_or(UNKNOWN_ARCHETYPE);
        groups.entry(key).or_default().push(c.id);
    }

    let mut queues: Vec<VecDeque<CompetitorId>> = groups
        .into_values()
        .map(|mut ids| {
            ids.shuffle(rng);
            VecDeque::from(ids)
        })
        .collect();
    queues.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut pairings = Vec::with_capacity(active.len() / 2 + 1);
    for i in 0..queues.len() {
        for j in i + 1..queues.len() {
            while !queues[i].is_empty() && !queues[j].is_empty() {
                if let (Some(a), Some(b)) = (queues[i].pop_front(), queues[j].pop_front()) {
                    pairings.push(Pairing::new(a, b));
                }
            }
        }
    }

    let remaining: Vec<CompetitorId> = queues.into_iter().flatten().collect();
    pairings.extend(pair_in_order(&remaining));
    pairings
}
