//! Engine and server configuration.
//!
//! Both read overrides from the environment; anything unset or unparsable keeps its default.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bonuses credited for playing under-represented archetypes or diverse matchups.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaIncentives {
    /// Added once per under-represented archetype in a match.
    pub underrepresented_bonus: f64,
    /// Added when the two archetypes differ.
    pub diversity_bonus: f64,
    /// Fraction of the field (0-1) below which an archetype is under-represented.
    pub underrepresented_threshold: f64,
}

impl Default for MetaIncentives {
    fn default() -> Self {
        Self {
            underrepresented_bonus: 0.2,
            diversity_bonus: 0.1,
            underrepresented_threshold: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub meta: MetaIncentives,
    pub default_minutes_per_round: u32,
    pub meta_balancing: bool,
    pub adaptive_structure: bool,
    pub parallel_brackets: bool,
    /// Fixed RNG seed for reproducible pairings; entropy when None.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meta: MetaIncentives::default(),
            default_minutes_per_round: 50,
            meta_balancing: true,
            adaptive_structure: true,
            parallel_brackets: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `ENGINE_SEED`, `META_*` and `DEFAULT_MINUTES_PER_ROUND`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(seed) = env_parse("ENGINE_SEED") {
            config.seed = Some(seed);
        }
        if let Some(v) = env_parse("META_UNDERREPRESENTED_BONUS") {
            config.meta.underrepresented_bonus = v;
        }
        if let Some(v) = env_parse("META_DIVERSITY_BONUS") {
            config.meta.diversity_bonus = v;
        }
        if let Some(v) = env_parse("META_UNDERREPRESENTED_THRESHOLD") {
            config.meta.underrepresented_threshold = v;
        }
        if let Some(v) = env_parse::<u32>("DEFAULT_MINUTES_PER_ROUND").filter(|m| *m > 0) {
            config.default_minutes_per_round = v;
        }
        config
    }
}

/// Web host settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tournaments not touched for this long are evicted.
    pub inactivity_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            inactivity_timeout: Duration::from_secs(12 * 3600),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `INACTIVITY_TIMEOUT_HOURS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            inactivity_timeout: env_parse::<u64>("INACTIVITY_TIMEOUT_HOURS")
                .map(|h| Duration::from_secs(h * 3600))
                .unwrap_or(defaults.inactivity_timeout),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
