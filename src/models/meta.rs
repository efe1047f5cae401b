//! Meta breakdown: how the field splits across declared archetypes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaBreakdownEntry {
    pub archetype: String,
    pub count: u32,
    /// Percentage (0-100) of competitors that declared an archetype.
    pub percentage: f64,
    pub is_underrepresented: bool,
}
