//! Swiss rounds followed by a seeded single-elimination top cut.

use super::bracket::{advance_bracket, seed_bracket};
use super::{Pairing, PairingContext, PairingStrategy, SwissPairing};
use crate::models::{BracketKind, Competitor, TournamentError};
use rand::RngCore;

pub struct HybridPairing;

impl PairingStrategy for HybridPairing {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        ctx: &PairingContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        let swiss_rounds = ctx.rounds.swiss_rounds();
        if round <= swiss_rounds {
            return SwissPairing.pair(active, round, ctx, rng);
        }
        if round == swiss_rounds + 1 {
            let mut by_standing: Vec<&Competitor> = active.to_vec();
            by_standing.sort_by_key(|c| c.standing.unwrap_or(u32::MAX));
            by_standing.truncate(ctx.top_cut as usize);
            log::info!("Top {} cut after {} Swiss rounds", by_standing.len(), swiss_rounds);
            return Ok(seed_bracket(&by_standing));
        }
        Ok(advance_bracket(ctx.matches, round - 1, BracketKind::Main, active))
    }
}
