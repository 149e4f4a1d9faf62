// Draft pick records.

use serde::{Deserialize, Serialize};

use super::player::Tid;

pub type Dpid = u32;

/// Which draft a pick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickSeason {
    Year(u16),
    /// Fantasy draft at league creation.
    Fantasy,
    /// Expansion draft for a new team.
    Expansion,
}

impl PickSeason {
    pub fn year(&self) -> Option<u16> {
        match self {
            PickSeason::Year(y) => Some(*y),
            PickSeason::Fantasy | PickSeason::Expansion => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    pub dpid: Dpid,
    /// Team whose record determines the pick position.
    pub original_tid: Tid,
    /// Team currently holding the pick.
    pub tid: Tid,
    pub season: PickSeason,
    pub round: u8,
    /// Pick number within the round, 0 while the draft order is unknown.
    #[serde(default)]
    pub pick: u16,
}

impl DraftPick {
    pub fn is_determined(&self) -> bool {
        self.pick > 0
    }
}
