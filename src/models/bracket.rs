//! Brackets: match ids grouped by round, per bracket.

use crate::models::game::{BracketKind, MatchId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named bracket. Holds match ids only; the matches live on the tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub kind: BracketKind,
    pub rounds: BTreeMap<u32, Vec<MatchId>>,
}

impl Bracket {
    pub fn new(kind: BracketKind) -> Self {
        Self {
            kind,
            rounds: BTreeMap::new(),
        }
    }

    pub fn file(&mut self, round: u32, match_id: MatchId) {
        self.rounds.entry(round).or_default().push(match_id);
    }
}

/// Main bracket plus the optional consolation bracket (parallel-bracket mode only).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Brackets {
    pub main: Bracket,
    pub consolation: Option<Bracket>,
}

impl Brackets {
    pub fn new(with_consolation: bool) -> Self {
        Self {
            main: Bracket::new(BracketKind::Main),
            consolation: with_consolation.then(|| Bracket::new(BracketKind::Consolation)),
        }
    }

    pub fn get_mut(&mut self, kind: BracketKind) -> Option<&mut Bracket> {
        match kind {
            BracketKind::Main => Some(&mut self.main),
            BracketKind::Consolation => self.consolation.as_mut(),
        }
    }
}

impl Default for Brackets {
    fn default() -> Self {
        Self::new(false)
    }
}
