//! Structure adaptation: format, round count and top cut from field size and time budget.
//!
//! Pure functions; the engine runs them once while the tournament is `Created`.

use crate::models::{Format, RoundPlan};

/// Everything the adapter looks at.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureInput {
    pub player_count: usize,
    pub format: Format,
    /// None means "auto".
    pub rounds: Option<RoundPlan>,
    pub top_cut: u32,
    /// Apply the field-size policy; otherwise keep the requested format.
    pub adaptive: bool,
    /// `Some` makes the event time-limited.
    pub time_limit_minutes: Option<u32>,
    pub minutes_per_round: u32,
    pub parallel_brackets_enabled: bool,
}

/// The finalized structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Structure {
    pub format: Format,
    pub rounds: RoundPlan,
    pub top_cut: u32,
    /// Whether a consolation bracket exists.
    pub consolation: bool,
}

/// `ceil(log2 n)`, with 0 for n <= 1.
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// Rounds a full round robin needs: `n - 1` for even n, `n` for odd n.
pub fn round_robin_rounds(n: usize) -> u32 {
    match n {
        0 | 1 => 0,
        n if n % 2 == 0 => (n - 1) as u32,
        n => n as u32,
    }
}

/// Largest power of two not above `n` (0 for 0).
fn floor_pow2(n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        1 << (u32::BITS - 1 - n.leading_zeros())
    }
}

/// Default top cut for a hybrid event: up to 8, about a quarter of the field.
fn hybrid_top_cut(player_count: usize) -> u32 {
    let quarter = (player_count / 4).max(2) as u32;
    floor_pow2(quarter.min(8))
}

/// Recommended ("auto") round plan for a format.
pub fn recommended_rounds(format: Format, player_count: usize, top_cut: u32) -> RoundPlan {
    let log = ceil_log2(player_count);
    match format {
        Format::Swiss | Format::AdaptiveSwiss => RoundPlan::Single(log + 1),
        Format::SingleElimination => RoundPlan::Single(log.max(1)),
        Format::DoubleElimination => RoundPlan::Single((2 * log).saturating_sub(1).max(1)),
        Format::RoundRobin => RoundPlan::Single(round_robin_rounds(player_count)),
        Format::ParallelBrackets => RoundPlan::Single(((3 * log + 1) / 2).max(1)),
        Format::Hybrid => {
            let cut = if top_cut > 0 {
                top_cut
            } else {
                hybrid_top_cut(player_count)
            };
            RoundPlan::Split {
                swiss: log.max(1),
                elimination: ceil_log2(cut as usize),
            }
        }
    }
}

/// Hybrid always carries a split plan; every other format a single count.
fn normalize(format: Format, plan: RoundPlan, top_cut: u32) -> RoundPlan {
    match (format, plan) {
        (Format::Hybrid, RoundPlan::Single(swiss)) => RoundPlan::Split {
            swiss,
            elimination: ceil_log2(top_cut as usize),
        },
        (Format::Hybrid, split) => split,
        (_, plan) => RoundPlan::Single(plan.total()),
    }
}

/// Field-size policy. First match wins.
fn policy(player_count: usize) -> (Format, RoundPlan, u32) {
    let log = ceil_log2(player_count);
    match player_count {
        n if n < 8 => (Format::RoundRobin, RoundPlan::Single(round_robin_rounds(n)), 0),
        n if n < 16 => (Format::Swiss, RoundPlan::Single(log + 1), 0),
        n if n < 32 => (Format::Swiss, RoundPlan::Single(log + 1), 4),
        n if n < 64 => (Format::Swiss, RoundPlan::Single(log + 1), 8),
        _ => (
            Format::Hybrid,
            RoundPlan::Split {
                swiss: log,
                elimination: 3,
            },
            8,
        ),
    }
}

/// Finalize format, rounds, top cut and brackets.
pub fn adapt_structure(input: &StructureInput) -> Structure {
    let n = input.player_count;

    let (mut format, mut rounds, mut top_cut) = if input.adaptive {
        policy(n)
    } else {
        let top_cut = match (input.format, input.top_cut) {
            (Format::Hybrid, 0) => hybrid_top_cut(n),
            (_, cut) => cut,
        };
        let plan = input
            .rounds
            .unwrap_or_else(|| recommended_rounds(input.format, n, top_cut));
        (input.format, normalize(input.format, plan, top_cut), top_cut)
    };

    if input.adaptive {
        if let Some(limit) = input.time_limit_minutes {
            let max_rounds = (limit / input.minutes_per_round.max(1)).max(1);
            if max_rounds < rounds.total() {
                log::debug!(
                    "Time limit of {} minutes allows {} rounds (planned {})",
                    limit,
                    max_rounds,
                    rounds.total()
                );
                if top_cut > 0 {
                    top_cut = top_cut.min(1u32.checked_shl(max_rounds / 2).unwrap_or(u32::MAX));
                }
                rounds = match rounds {
                    RoundPlan::Single(_) => RoundPlan::Single(max_rounds),
                    RoundPlan::Split { .. } => {
                        let elimination = ceil_log2(top_cut as usize).min(max_rounds);
                        RoundPlan::Split {
                            swiss: max_rounds - elimination,
                            elimination,
                        }
                    }
                };
            }
            if input.parallel_brackets_enabled && n >= 16 {
                format = Format::ParallelBrackets;
                rounds = RoundPlan::Single(rounds.total());
            }
        }
    }

    Structure {
        format,
        rounds,
        top_cut,
        consolation: input.parallel_brackets_enabled || format == Format::ParallelBrackets,
    }
}
