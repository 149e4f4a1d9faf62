// Team records: strategy, depth chart, current record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::player::{Pid, Tid};

/// Ordered player ids per depth-chart key (position or rotation name).
pub type DepthChart = BTreeMap<String, Vec<Pid>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Contending,
    Rebuilding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub tid: Tid,
    pub region: String,
    pub name: String,
    #[serde(default)]
    pub strategy: Strategy,
    /// User opted into automatic depth-chart sorting.
    #[serde(default)]
    pub keep_roster_sorted: bool,
    #[serde(default)]
    pub depth: DepthChart,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub tied: u32,
}

impl Team {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.region, self.name)
    }

    pub fn games_played(&self) -> u32 {
        self.won + self.lost + self.tied
    }

    /// Win fraction with ties counted as half a win. `None` before any game.
    pub fn win_fraction(&self) -> Option<f64> {
        let gp = self.games_played();
        if gp == 0 {
            return None;
        }
        Some((self.won as f64 + 0.5 * self.tied as f64) / gp as f64)
    }
}
