// League store boundary: the engine reads records and requests roster
// mutations only through these traits.

pub mod memory;

use thiserror::Error;

use crate::league::{
    Contract, DepthChart, Dpid, DraftPick, LeagueSettings, Pid, Player, Team, Tid,
};

pub use memory::{LeagueSnapshot, MemoryLeague};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("league store error: {0}")]
    Backend(String),

    #[error("invalid league snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("league snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Shape of a generated replacement-level free agent.
#[derive(Debug, Clone)]
pub struct FreeAgentTemplate {
    pub pos: String,
    pub rating: f64,
    pub value: f64,
    pub age: u16,
    pub season: u16,
    pub contract: Contract,
}

/// Read access to league records.
///
/// Lookups by id return `Ok(None)` for an unknown id; deciding whether that
/// is fatal is up to the caller.
#[async_trait::async_trait]
pub trait LeagueStore: Send + Sync {
    async fn league_settings(&self) -> Result<LeagueSettings, StoreError>;

    async fn teams(&self) -> Result<Vec<Team>, StoreError>;

    async fn team(&self, tid: Tid) -> Result<Option<Team>, StoreError>;

    async fn player(&self, pid: Pid) -> Result<Option<Player>, StoreError>;

    async fn players_on_team(&self, tid: Tid) -> Result<Vec<Player>, StoreError>;

    async fn free_agents(&self) -> Result<Vec<Player>, StoreError>;

    /// Undrafted prospects across all upcoming draft classes.
    async fn draft_prospects(&self) -> Result<Vec<Player>, StoreError>;

    async fn draft_pick(&self, dpid: Dpid) -> Result<Option<DraftPick>, StoreError>;

    async fn draft_picks(&self) -> Result<Vec<DraftPick>, StoreError>;
}

/// Roster mutations the engine requests from its host.
#[async_trait::async_trait]
pub trait RosterTransactions: LeagueStore {
    /// Move a player to the free-agent pool.
    async fn release_player(&self, pid: Pid) -> Result<(), StoreError>;

    async fn sign_player(&self, pid: Pid, tid: Tid, contract: Contract) -> Result<(), StoreError>;

    /// Create and persist a new free agent, returning the stored record.
    async fn create_free_agent(&self, template: &FreeAgentTemplate) -> Result<Player, StoreError>;

    async fn save_depth_chart(&self, tid: Tid, depth: DepthChart) -> Result<(), StoreError>;

    /// Refresh the asking contracts of newly released players.
    async fn normalize_contract_demands(&self, released: &[Pid]) -> Result<(), StoreError>;

    /// Assign pick numbers to every pick of `season` that lacks one.
    async fn regenerate_draft_order(&self, season: u16) -> Result<(), StoreError>;

    /// Rebuild the draft-pick table so each (original team, season, round)
    /// appears exactly once.
    async fn regenerate_draft_picks(&self) -> Result<(), StoreError>;
}
