// Tradeable assets in a common valuation-ready shape.

use crate::league::{Dpid, Pid};

/// What an asset is, and what is specific to its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetKind {
    Player { pid: Pid },
    Pick { dpid: Dpid, seasons_ahead: u16 },
}

/// A player or draft pick reduced to the fields the aggregation routine
/// reads. Values are league z-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub kind: AssetKind,
    /// Normalized value including potential.
    pub value: f64,
    /// Normalized current ability.
    pub skill: f64,
    pub contract_value: f64,
    pub injury_games: u32,
    pub age: u16,
}

impl Asset {
    /// Inflate a positive-valued asset by `factor`. Negative or zero values
    /// are left alone.
    pub fn inflate(&mut self, factor: f64) {
        if self.value > 0.0 {
            self.value *= factor;
        }
        if self.skill > 0.0 {
            self.skill *= factor;
        }
    }
}
