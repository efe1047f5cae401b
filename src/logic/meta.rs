//! Meta breakdown and the per-match meta bonus.

use crate::config::MetaIncentives;
use crate::models::{Competitor, MetaBreakdownEntry};
use std::collections::BTreeMap;

/// Archetype distribution over competitors that declared one, largest first.
pub fn calculate_meta_breakdown(competitors: &[Competitor], threshold: f64) -> Vec<MetaBreakdownEntry> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for archetype in competitors.iter().filter_map(|c| c.archetype.as_deref()) {
        *counts.entry(archetype).or_default() += 1;
    }
    let total: u32 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut breakdown: Vec<MetaBreakdownEntry> = counts
        .into_iter()
        .map(|(archetype, count)| {
            let percentage = f64::from(count) / f64::from(total) * 100.0;
            MetaBreakdownEntry {
                archetype: archetype.to_string(),
                count,
                percentage,
                is_underrepresented: percentage < threshold * 100.0,
            }
        })
        .collect();
    // Stable: equal shares stay in archetype-name order.
    breakdown.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    breakdown
}

pub fn is_underrepresented(breakdown: &[MetaBreakdownEntry], archetype: Option<&str>) -> bool {
    let Some(archetype) = archetype else {
        return false;
    };
    breakdown
        .iter()
        .any(|e| e.archetype == archetype && e.is_underrepresented)
}

/// Bonus a match carries for its eventual winner. Byes carry none.
pub fn match_meta_bonus(
    breakdown: &[MetaBreakdownEntry],
    incentives: &MetaIncentives,
    a: &Competitor,
    b: Option<&Competitor>,
) -> f64 {
    let Some(b) = b else {
        return 0.0;
    };
    let mut bonus = 0.0;
    for c in [a, b] {
        if is_underrepresented(breakdown, c.archetype.as_deref()) {
            bonus += incentives.underrepresented_bonus;
        }
    }
    if let (Some(x), Some(y)) = (&a.archetype, &b.archetype) {
        if x != y {
            bonus += incentives.diversity_bonus;
        }
    }
    bonus
}
