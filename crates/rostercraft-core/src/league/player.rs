// Player records: ratings history, contract, injury.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Pid = u32;
pub type Tid = i32;

/// `tid` of a player in the free-agent pool.
pub const FREE_AGENT: Tid = -1;
/// `tid` of a draft prospect who has not been drafted yet.
pub const UNDRAFTED: Tid = -2;

/// Rating key that always resolves to a player's overall rating.
pub const OVERALL: &str = "OVR";

/// Which rating a consumer wants to read from a ratings season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    /// Current ability.
    #[default]
    Current,
    /// Projected peak ability.
    Potential,
}

/// One season of ratings for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsSeason {
    pub season: u16,
    /// Nominal position for this season (e.g. "PG", "QB").
    pub pos: String,
    pub ovr: f64,
    pub pot: f64,
    /// Position-specific current ratings. Sports with a single overall
    /// rating leave this empty.
    #[serde(default)]
    pub ovrs: BTreeMap<String, f64>,
    /// Position-specific potential ratings.
    #[serde(default)]
    pub pots: BTreeMap<String, f64>,
}

impl RatingsSeason {
    /// Rating at `pos`, falling back to the overall number when the position
    /// has no dedicated entry (or when `pos` is [`OVERALL`]).
    pub fn at(&self, pos: &str, kind: RatingKind) -> f64 {
        let (by_pos, overall) = match kind {
            RatingKind::Current => (&self.ovrs, self.ovr),
            RatingKind::Potential => (&self.pots, self.pot),
        };
        by_pos.get(pos).copied().unwrap_or(overall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Annual salary, in the same units as the league salary cap.
    pub amount: f64,
    /// Last season covered by the contract.
    pub exp: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    #[serde(rename = "type")]
    pub kind: String,
    pub games_remaining: u32,
}

impl Injury {
    pub fn healthy() -> Self {
        Injury {
            kind: "Healthy".into(),
            games_remaining: 0,
        }
    }
}

impl Default for Injury {
    fn default() -> Self {
        Injury::healthy()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pid: Pid,
    pub tid: Tid,
    pub name: String,
    pub born_year: u16,
    /// Ratings history, oldest first. The last entry is the current season.
    pub ratings: Vec<RatingsSeason>,
    /// Pre-computed quality score including potential.
    pub value: f64,
    /// Pre-computed quality score for current ability only.
    pub value_no_pot: f64,
    pub contract: Contract,
    #[serde(default)]
    pub injury: Injury,
    /// Draft class year for prospects and drafted players.
    #[serde(default)]
    pub draft_year: Option<u16>,
}

impl Player {
    pub fn current_ratings(&self) -> Option<&RatingsSeason> {
        self.ratings.last()
    }

    /// Nominal position from the latest ratings, or an empty string for a
    /// player with no ratings at all.
    pub fn pos(&self) -> &str {
        self.current_ratings().map(|r| r.pos.as_str()).unwrap_or("")
    }

    /// Position-specific score used by both the optimizer and the team
    /// rating model. A player with no ratings scores 0.
    pub fn rating_at(&self, pos: &str, kind: RatingKind) -> f64 {
        self.current_ratings().map(|r| r.at(pos, kind)).unwrap_or(0.0)
    }

    pub fn age(&self, season: u16) -> u16 {
        season.saturating_sub(self.born_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> RatingsSeason {
        let mut ovrs = BTreeMap::new();
        ovrs.insert("QB".to_string(), 72.0);
        RatingsSeason {
            season: 2025,
            pos: "QB".into(),
            ovr: 72.0,
            pot: 80.0,
            ovrs,
            pots: BTreeMap::new(),
        }
    }

    #[test]
    fn rating_at_uses_position_entry() {
        let r = ratings();
        assert_eq!(r.at("QB", RatingKind::Current), 72.0);
    }

    #[test]
    fn rating_at_falls_back_to_overall() {
        let r = ratings();
        assert_eq!(r.at("K", RatingKind::Current), 72.0);
        assert_eq!(r.at(OVERALL, RatingKind::Potential), 80.0);
    }

    #[test]
    fn player_without_ratings_scores_zero() {
        let p = Player {
            pid: 1,
            tid: FREE_AGENT,
            name: "Nobody".into(),
            born_year: 2000,
            ratings: vec![],
            value: 40.0,
            value_no_pot: 40.0,
            contract: Contract { amount: 750.0, exp: 2025 },
            injury: Injury::healthy(),
            draft_year: None,
        };
        assert_eq!(p.rating_at("C", RatingKind::Current), 0.0);
        assert_eq!(p.pos(), "");
        assert_eq!(p.age(2025), 25);
    }
}
