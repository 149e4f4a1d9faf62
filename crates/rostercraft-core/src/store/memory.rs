// In-process league store over a serializable snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FreeAgentTemplate, LeagueStore, RosterTransactions, StoreError};
use crate::league::{
    Contract, DepthChart, Dpid, DraftPick, Injury, LeagueSettings, PickSeason, Pid, Player,
    RatingsSeason, Team, Tid, FREE_AGENT, UNDRAFTED,
};

/// Everything the engine reads, in one JSON-friendly document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub settings: LeagueSettings,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    #[serde(default)]
    pub draft_picks: Vec<DraftPick>,
    /// Players whose contract demands were renormalized, in request order.
    #[serde(default)]
    pub renormalized: Vec<Pid>,
}

/// League store backed by a snapshot held in memory.
pub struct MemoryLeague {
    inner: Mutex<LeagueSnapshot>,
}

impl MemoryLeague {
    pub fn new(snapshot: LeagueSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, StoreError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&*self.lock())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> LeagueSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, LeagueSnapshot> {
        self.inner.lock().expect("league snapshot mutex poisoned")
    }
}

fn player_mut(snap: &mut LeagueSnapshot, pid: Pid) -> Result<&mut Player, StoreError> {
    snap.players
        .iter_mut()
        .find(|p| p.pid == pid)
        .ok_or_else(|| StoreError::Backend(format!("no player with pid {pid}")))
}

#[async_trait::async_trait]
impl LeagueStore for MemoryLeague {
    async fn league_settings(&self) -> Result<LeagueSettings, StoreError> {
        Ok(self.lock().settings.clone())
    }

    async fn teams(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.lock().teams.clone())
    }

    async fn team(&self, tid: Tid) -> Result<Option<Team>, StoreError> {
        Ok(self.lock().teams.iter().find(|t| t.tid == tid).cloned())
    }

    async fn player(&self, pid: Pid) -> Result<Option<Player>, StoreError> {
        Ok(self.lock().players.iter().find(|p| p.pid == pid).cloned())
    }

    async fn players_on_team(&self, tid: Tid) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .lock()
            .players
            .iter()
            .filter(|p| p.tid == tid)
            .cloned()
            .collect())
    }

    async fn free_agents(&self) -> Result<Vec<Player>, StoreError> {
        self.players_on_team(FREE_AGENT).await
    }

    async fn draft_prospects(&self) -> Result<Vec<Player>, StoreError> {
        self.players_on_team(UNDRAFTED).await
    }

    async fn draft_pick(&self, dpid: Dpid) -> Result<Option<DraftPick>, StoreError> {
        Ok(self
            .lock()
            .draft_picks
            .iter()
            .find(|dp| dp.dpid == dpid)
            .cloned())
    }

    async fn draft_picks(&self) -> Result<Vec<DraftPick>, StoreError> {
        Ok(self.lock().draft_picks.clone())
    }
}

#[async_trait::async_trait]
impl RosterTransactions for MemoryLeague {
    async fn release_player(&self, pid: Pid) -> Result<(), StoreError> {
        let mut snap = self.lock();
        let player = player_mut(&mut snap, pid)?;
        player.tid = FREE_AGENT;
        Ok(())
    }

    async fn sign_player(&self, pid: Pid, tid: Tid, contract: Contract) -> Result<(), StoreError> {
        let mut snap = self.lock();
        if !snap.teams.iter().any(|t| t.tid == tid) {
            return Err(StoreError::Backend(format!("no team with tid {tid}")));
        }
        let player = player_mut(&mut snap, pid)?;
        player.tid = tid;
        player.contract = contract;
        Ok(())
    }

    async fn create_free_agent(&self, template: &FreeAgentTemplate) -> Result<Player, StoreError> {
        let mut snap = self.lock();
        let pid = snap.players.iter().map(|p| p.pid).max().map_or(0, |m| m + 1);
        let mut ovrs = BTreeMap::new();
        ovrs.insert(template.pos.clone(), template.rating);

        let player = Player {
            pid,
            tid: FREE_AGENT,
            name: format!("Replacement {pid}"),
            born_year: template.season.saturating_sub(template.age),
            ratings: vec![RatingsSeason {
                season: template.season,
                pos: template.pos.clone(),
                ovr: template.rating,
                pot: template.rating,
                ovrs,
                pots: BTreeMap::new(),
            }],
            value: template.value,
            value_no_pot: template.value,
            contract: template.contract,
            injury: Injury::healthy(),
            draft_year: None,
        };
        snap.players.push(player.clone());
        debug!("created replacement free agent {} ({})", pid, template.pos);
        Ok(player)
    }

    async fn save_depth_chart(&self, tid: Tid, depth: DepthChart) -> Result<(), StoreError> {
        let mut snap = self.lock();
        let team = snap
            .teams
            .iter_mut()
            .find(|t| t.tid == tid)
            .ok_or_else(|| StoreError::Backend(format!("no team with tid {tid}")))?;
        team.depth = depth;
        Ok(())
    }

    async fn normalize_contract_demands(&self, released: &[Pid]) -> Result<(), StoreError> {
        let mut snap = self.lock();
        let rules = snap.settings.rules.clone();
        let first_season = snap.settings.contract_season();
        for &pid in released {
            let player = player_mut(&mut snap, pid)?;
            if player.tid != FREE_AGENT {
                continue;
            }
            player.contract.amount = player
                .contract
                .amount
                .clamp(rules.min_contract, rules.max_contract);
            player.contract.exp = player.contract.exp.max(first_season);
            snap.renormalized.push(pid);
        }
        Ok(())
    }

    async fn regenerate_draft_order(&self, season: u16) -> Result<(), StoreError> {
        let mut snap = self.lock();

        // Worst record picks first; ties and teams without games by tid.
        let mut order: Vec<(f64, Tid)> = snap
            .teams
            .iter()
            .map(|t| (t.win_fraction().unwrap_or(0.5), t.tid))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        let slot: BTreeMap<Tid, u16> = order
            .iter()
            .enumerate()
            .map(|(i, (_, tid))| (*tid, i as u16 + 1))
            .collect();

        for dp in snap.draft_picks.iter_mut() {
            if dp.season == PickSeason::Year(season) && !dp.is_determined() {
                dp.pick = slot.get(&dp.original_tid).copied().unwrap_or(1);
            }
        }
        Ok(())
    }

    async fn regenerate_draft_picks(&self) -> Result<(), StoreError> {
        let mut snap = self.lock();
        snap.draft_picks.sort_by_key(|dp| dp.dpid);
        let mut seen = BTreeSet::new();
        snap.draft_picks
            .retain(|dp| seen.insert((dp.original_tid, dp.season, dp.round)));
        Ok(())
    }
}
