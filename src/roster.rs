//! CSV roster import: `name,rating,archetype,invited`, every column but `name` optional.

use crate::models::Competitor;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Could not read roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("Roster line {line}: competitor name is empty")]
    MissingName { line: u64 },
    #[error("Roster line {line}: rating {rating} is not a finite number")]
    InvalidRating { line: u64, rating: f64 },
}

/// One roster row.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub archetype: Option<String>,
    /// Playstyle aggression, 0-1.
    #[serde(default)]
    pub aggression: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub invited: bool,
}

impl RosterEntry {
    pub fn into_competitor(self) -> Competitor {
        let mut c = Competitor::new(self.name.trim());
        if let Some(rating) = self.rating {
            c = c.with_rating(rating);
        }
        if let Some(archetype) = self.archetype.filter(|a| !a.trim().is_empty()) {
            c = c.with_archetype(archetype.trim());
        }
        if let Some(aggression) = self.aggression {
            c = c.with_playstyle(aggression);
        }
        if self.invited {
            c = c.invited();
        }
        c
    }
}

/// Accepts `true/false`, `yes/no`, `1/0` and an empty cell (false).
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("no") | Some("0") => Ok(false),
        Some("true") | Some("yes") | Some("1") | Some("y") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!("not a yes/no value: {}", other))),
    }
}

/// Parse a roster with a header row. Blank lines are skipped.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Competitor>, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut competitors = Vec::new();
    for (idx, row) in rdr.deserialize::<RosterEntry>().enumerate() {
        let entry = row?;
        // Header is line 1.
        let line = idx as u64 + 2;
        if entry.name.trim().is_empty() {
            return Err(RosterError::MissingName { line });
        }
        if let Some(rating) = entry.rating.filter(|r| !r.is_finite()) {
            return Err(RosterError::InvalidRating { line, rating });
        }
        competitors.push(entry.into_competitor());
    }
    log::debug!("Read {} competitors from roster", competitors.len());
    Ok(competitors)
}

pub fn parse_roster(text: &str) -> Result<Vec<Competitor>, RosterError> {
    read_roster(text.as_bytes())
}
