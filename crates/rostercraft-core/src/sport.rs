// Sport profile: the data-driven position schema that parameterizes the
// generic rating model, depth optimizer and roster enforcer.

use std::collections::BTreeMap;

use crate::depth::ChartSpec;
use crate::ovr::OvrModel;

/// How players are grouped into rating-model positions.
#[derive(Debug, Clone)]
pub enum PositionAssignment {
    /// Every player lands in one group and is rated by the given key.
    Pooled { group: String },
    /// Starters come from the optimizer's lineup chart; everyone else is
    /// grouped under their nominal position.
    Lineup(ChartSpec),
}

/// Baseline for generated replacement-level free agents.
#[derive(Debug, Clone)]
pub struct ReplacementLevel {
    /// Position given to a generated player when no floor is short.
    pub pos: String,
    pub rating: f64,
    pub value: f64,
    pub age: u16,
}

#[derive(Debug, Clone)]
pub struct SportProfile {
    pub name: String,
    /// Depth charts maintained for every team, in display order.
    pub charts: Vec<ChartSpec>,
    pub assignment: PositionAssignment,
    pub ovr: OvrModel,
    /// Players per nominal position auto-release always keeps. A player is
    /// protected while their position's count is at or below this number,
    /// so a floor of 1 keeps a team's only kicker.
    pub position_floors: BTreeMap<String, usize>,
    /// Exponent applied to asset values above the aggregation threshold.
    pub value_exponent: f64,
    pub replacement: ReplacementLevel,
}

impl SportProfile {
    pub fn chart(&self, key: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.key == key)
    }

    pub fn floor(&self, pos: &str) -> usize {
        self.position_floors.get(pos).copied().unwrap_or(0)
    }
}
