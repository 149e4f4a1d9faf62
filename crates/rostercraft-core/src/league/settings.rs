// League-wide state the engine reads on every call: season, phase, which
// teams are human-controlled, and the configured rules.

use serde::{Deserialize, Serialize};

use super::player::Tid;
use crate::config::LeagueRules;

/// Season phase, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ExpansionDraft,
    FantasyDraft,
    Preseason,
    RegularSeason,
    AfterTradeDeadline,
    Playoffs,
    DraftLottery,
    Draft,
    AfterDraft,
    ResignPlayers,
    FreeAgency,
}

impl Phase {
    pub fn is_after_playoffs(self) -> bool {
        self > Phase::Playoffs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub season: u16,
    pub phase: Phase,
    /// Human-controlled teams. Usually exactly one.
    #[serde(default)]
    pub user_tids: Vec<Tid>,
    pub rules: LeagueRules,
}

impl LeagueSettings {
    pub fn is_user_team(&self, tid: Tid) -> bool {
        self.user_tids.contains(&tid)
    }

    /// The season contracts are currently being evaluated against. Once the
    /// playoffs are over, this season's deals are already spent.
    pub fn contract_season(&self) -> u16 {
        if self.phase.is_after_playoffs() {
            self.season + 1
        } else {
            self.season
        }
    }

    /// Fraction of the regular season already played by a team with `gp`
    /// games, clamped to `[0, 1]`.
    pub fn season_fraction(&self, gp: u32) -> f64 {
        if self.rules.num_games == 0 {
            return 0.0;
        }
        (gp as f64 / self.rules.num_games as f64).clamp(0.0, 1.0)
    }
}
