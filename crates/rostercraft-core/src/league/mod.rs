// League records as seen by the engine. The league store owns them; the
// engine only ever works on copies.

pub mod pick;
pub mod player;
pub mod settings;
pub mod team;

pub use pick::{DraftPick, Dpid, PickSeason};
pub use player::{
    Contract, Injury, Pid, Player, RatingKind, RatingsSeason, Tid, FREE_AGENT, OVERALL, UNDRAFTED,
};
pub use settings::{LeagueSettings, Phase};
pub use team::{DepthChart, Strategy, Team};
