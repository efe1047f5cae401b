//! Tournament lifecycle: `created -> in_progress -> completed`.
//!
//! `TournamentEngine` is the only place that moves a tournament between states.
//! It owns the configuration and the seeded RNG every pairing strategy draws from.

use crate::config::EngineConfig;
use crate::logic::brackets::{create_matches_for_round, get_brackets, BracketsView};
use crate::logic::meta::calculate_meta_breakdown;
use crate::logic::pairing::{generate_pairings, Pairing, PairingContext};
use crate::logic::records::apply_match_result;
use crate::logic::standings::{compute_standings, update_standings, RankedCompetitor};
use crate::logic::structure::{adapt_structure, round_robin_rounds, StructureInput};
use crate::models::{
    Brackets, Competitor, CompetitorId, Format, GameResult, Match, MatchId, MatchResult,
    MatchStatus, RequestedStructure, TimeConstraints, Tournament, TournamentError,
    TournamentOptions, TournamentStatus,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

pub struct TournamentEngine {
    config: EngineConfig,
    rng: StdRng,
}

impl Default for TournamentEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TournamentEngine {
    /// Seeds from `config.seed` when set, otherwise from system entropy.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Deterministic engine: the same seed and inputs give the same pairings.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a tournament in `created` state with its structure already adapted.
    pub fn create_tournament(&mut self, options: TournamentOptions) -> Result<Tournament, TournamentError> {
        let minutes_per_round = options
            .minutes_per_round
            .filter(|m| *m > 0)
            .unwrap_or(self.config.default_minutes_per_round);
        let start_time = options.start_time.unwrap_or_else(Utc::now);

        let mut t = Tournament {
            id: Uuid::new_v4(),
            name: options.name.trim().to_string(),
            format: options.format,
            rounds: options.rounds.unwrap_or_default(),
            current_round: 0,
            top_cut: options.top_cut,
            status: TournamentStatus::Created,
            entry_tier: options.entry_tier,
            competitors: Vec::with_capacity(options.competitors.len()),
            matches: Vec::new(),
            brackets: Brackets::default(),
            minutes_per_round,
            start_time,
            completed_at: None,
            time_constraints: TimeConstraints {
                estimated_end_time: start_time,
                round_time_remaining: minutes_per_round * 60,
                is_time_limited: options.time_limit_minutes.is_some(),
                time_limit_minutes: options.time_limit_minutes,
            },
            meta_balancing_enabled: options.meta_balancing.unwrap_or(self.config.meta_balancing),
            adaptive_structure_enabled: options
                .adaptive_structure
                .unwrap_or(self.config.adaptive_structure),
            parallel_brackets_enabled: options
                .parallel_brackets
                .unwrap_or(self.config.parallel_brackets),
            meta_breakdown: Vec::new(),
            requested: RequestedStructure {
                format: options.format,
                rounds: options.rounds,
                top_cut: options.top_cut,
            },
            structured_for: 0,
            location: options.location,
            organizer: options.organizer,
        };
        for competitor in options.competitors {
            t.add_competitor(competitor)?;
        }
        self.apply_structure(&mut t)?;

        log::info!(
            "Created tournament {} ({}): {} competitors, {} rounds, format {}",
            t.name,
            t.id,
            t.competitors.len(),
            t.rounds.total(),
            t.format
        );
        Ok(t)
    }

    /// Run structure adaptation for the current roster.
    fn apply_structure(&self, t: &mut Tournament) -> Result<(), TournamentError> {
        let player_count = t.competitors.len();
        let structure = adapt_structure(&StructureInput {
            player_count,
            format: t.requested.format,
            rounds: t.requested.rounds,
            top_cut: t.requested.top_cut,
            adaptive: t.adaptive_structure_enabled,
            time_limit_minutes: t.time_constraints.time_limit_minutes,
            minutes_per_round: t.minutes_per_round,
            parallel_brackets_enabled: t.parallel_brackets_enabled,
        });

        if structure.format == Format::RoundRobin && player_count > 0 {
            let max = round_robin_rounds(player_count);
            if structure.rounds.total() > max {
                return Err(TournamentError::InvalidRound {
                    round: structure.rounds.total(),
                    max,
                });
            }
        }

        t.format = structure.format;
        t.rounds = structure.rounds;
        t.top_cut = structure.top_cut;
        t.brackets = Brackets::new(structure.consolation);
        t.meta_breakdown = if t.meta_balancing_enabled {
            calculate_meta_breakdown(&t.competitors, self.config.meta.underrepresented_threshold)
        } else {
            Vec::new()
        };
        t.time_constraints.estimated_end_time = estimated_end_time(
            t.start_time,
            t.minutes_per_round,
            t.rounds.total(),
            t.time_constraints.time_limit_minutes,
        );
        t.time_constraints.round_time_remaining = t.minutes_per_round * 60;
        t.structured_for = player_count;
        Ok(())
    }

    /// Move to `in_progress` and pair round 1.
    pub fn start_tournament(&mut self, t: &mut Tournament) -> Result<(), TournamentError> {
        if t.status != TournamentStatus::Created {
            return Err(TournamentError::InvalidState {
                status: t.status,
                action: "start",
            });
        }
        if t.competitors.len() != t.structured_for {
            log::debug!(
                "Roster changed from {} to {} since creation; re-adapting structure",
                t.structured_for,
                t.competitors.len()
            );
            self.apply_structure(t)?;
        }

        let pairings = if t.rounds.total() == 0 {
            Vec::new()
        } else {
            self.pair_round(t, 1)?
        };

        t.status = TournamentStatus::InProgress;
        t.current_round = 1;
        log::info!("Tournament {} started with {} competitors", t.id, t.competitors.len());
        if pairings.is_empty() {
            finish(t);
            return Ok(());
        }
        create_matches_for_round(t, &pairings, 1, &self.config.meta)?;
        self.settle(t)
    }

    /// Record one match result, then advance the tournament if the round is done.
    ///
    /// Returns the completed match.
    pub fn record_match_result(
        &mut self,
        t: &mut Tournament,
        match_id: MatchId,
        result: MatchResult,
        games: Vec<GameResult>,
    ) -> Result<Match, TournamentError> {
        match t.status {
            TournamentStatus::Created => return Err(TournamentError::TournamentNotStarted),
            TournamentStatus::Completed => {
                return Err(TournamentError::InvalidState {
                    status: t.status,
                    action: "record results for",
                })
            }
            TournamentStatus::InProgress => {}
        }

        let m = t
            .get_match_mut(match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if m.is_completed() {
            return Err(TournamentError::InvalidResult(format!(
                "match {} is already completed",
                match_id
            )));
        }
        if m.is_bye() && result != MatchResult::CompetitorA {
            return Err(TournamentError::InvalidResult(
                "a bye can only be won by its competitor".to_string(),
            ));
        }
        if m.bracket_position.is_some() && result == MatchResult::Draw {
            return Err(TournamentError::InvalidResult(format!(
                "bracket match {} needs a winner",
                match_id
            )));
        }
        if let Some(stray) = games
            .iter()
            .filter_map(|g| g.winner)
            .find(|id| !m.involves(*id))
        {
            return Err(TournamentError::InvalidResult(format!(
                "game winner {} is not in match {}",
                stray, match_id
            )));
        }

        m.result = Some(result);
        m.games = games;
        m.status = MatchStatus::Completed;
        let completed = m.clone();
        apply_match_result(t, match_id)?;
        log::debug!("Recorded {:?} for match {} (round {})", result, match_id, completed.round);

        self.settle(t)?;
        Ok(completed)
    }

    /// Mark a competitor dropped. A pending match in the current round becomes a
    /// walkover loss for them. Dropping twice is a no-op.
    pub fn drop_player(
        &mut self,
        t: &mut Tournament,
        competitor_id: CompetitorId,
    ) -> Result<Competitor, TournamentError> {
        if t.status == TournamentStatus::Completed {
            return Err(TournamentError::InvalidState {
                status: t.status,
                action: "drop competitors from",
            });
        }
        let tournament_id = t.id;
        let competitor = t
            .competitor_mut(competitor_id)
            .ok_or(TournamentError::CompetitorNotFound(competitor_id))?;
        if competitor.dropped {
            return Ok(competitor.clone());
        }
        competitor.dropped = true;
        competitor.standing = None;
        log::info!("{} dropped from tournament {}", competitor.name, tournament_id);

        if t.status == TournamentStatus::InProgress {
            let pending: Vec<MatchId> = t
                .round_matches(t.current_round)
                .filter(|m| !m.is_completed() && m.involves(competitor_id))
                .map(|m| m.id)
                .collect();
            for match_id in pending {
                walkover(t, match_id, competitor_id)?;
            }
            self.settle(t)?;
        }

        t.competitor(competitor_id)
            .cloned()
            .ok_or(TournamentError::CompetitorNotFound(competitor_id))
    }

    /// Standings with tie-breakers. Does not mutate the tournament.
    pub fn get_standings(&self, t: &Tournament) -> Vec<RankedCompetitor> {
        compute_standings(t)
    }

    pub fn get_brackets(&self, t: &Tournament) -> BracketsView {
        get_brackets(t)
    }

    fn pair_round(&mut self, t: &Tournament, round: u32) -> Result<Vec<Pairing>, TournamentError> {
        let active = t.active_competitors();
        let roster: Vec<CompetitorId> = t.competitors.iter().map(|c| c.id).collect();
        let ctx = PairingContext {
            matches: &t.matches,
            roster: &roster,
            rounds: t.rounds,
            top_cut: t.top_cut,
        };
        generate_pairings(t.format, &active, round, &ctx, &mut self.rng)
    }

    /// Advance through every completed round: rank, then finish or pair the next round.
    /// Loops because a round made only of byes completes as soon as it is created.
    fn settle(&mut self, t: &mut Tournament) -> Result<(), TournamentError> {
        while t.status == TournamentStatus::InProgress && t.is_round_complete(t.current_round) {
            update_standings(t);
            if t.is_last_round() {
                finish(t);
                break;
            }
            let next = t.current_round + 1;
            let pairings = match self.pair_round(t, next) {
                Ok(pairings) => pairings,
                Err(e) => {
                    log::warn!("Could not pair round {} of tournament {}: {}; finishing", next, t.id, e);
                    finish(t);
                    break;
                }
            };
            if pairings.is_empty() {
                log::info!("No pairings left for round {}; finishing early", next);
                finish(t);
                break;
            }
            t.current_round = next;
            create_matches_for_round(t, &pairings, next, &self.config.meta)?;
            log::info!("Round {} of {} paired: {} matches", next, t.rounds.total(), pairings.len());
        }
        Ok(())
    }
}

fn walkover(t: &mut Tournament, match_id: MatchId, dropped: CompetitorId) -> Result<(), TournamentError> {
    let m = t
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.result = Some(if m.competitor_a == dropped {
        MatchResult::CompetitorB
    } else {
        MatchResult::CompetitorA
    });
    m.status = MatchStatus::Completed;
    apply_match_result(t, match_id)
}

fn finish(t: &mut Tournament) {
    t.status = TournamentStatus::Completed;
    t.completed_at = Some(Utc::now());
    log::info!("Tournament {} completed after round {}", t.id, t.current_round);
}

fn estimated_end_time(
    start: DateTime<Utc>,
    minutes_per_round: u32,
    rounds: u32,
    time_limit_minutes: Option<u32>,
) -> DateTime<Utc> {
    let planned = i64::from(minutes_per_round) * i64::from(rounds);
    let minutes = match time_limit_minutes {
        Some(limit) => planned.min(i64::from(limit)),
        None => planned,
    };
    start + Duration::minutes(minutes)
}
