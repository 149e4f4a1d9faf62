// One roster pass over a league snapshot: enforce roster bounds, slot new
// arrivals into depth charts, and optionally evaluate a proposed trade.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use rostercraft_core::config::{Config, ConfigError};
use rostercraft_core::depth::{compute_depth_chart, DepthOptions};
use rostercraft_core::league::{LeagueSettings, Pid, Player, Tid};
use rostercraft_core::ovr::{team_ovr, OvrOptions};
use rostercraft_core::roster::{enforce_roster_size, RosterScope};
use rostercraft_core::sport::SportProfile;
use rostercraft_core::store::{
    LeagueSnapshot, LeagueStore, MemoryLeague, RosterTransactions, StoreError,
};
use rostercraft_core::valuation::{TradeProposal, ValuationCache, Valuator};
use rostercraft_core::EngineError;

use crate::report::{PassReport, TeamReport, TradeReport};
use crate::sports::{profile_for, SPORTS};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown sport `{sport}` (expected one of: {})", SPORTS.join(", "))]
    UnknownSport { sport: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid trade file {path}: {source}")]
    TradeFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A proposed trade, evaluated from `tid`'s side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub tid: Tid,
    #[serde(default)]
    pub partner: Option<Tid>,
    #[serde(flatten)]
    pub proposal: TradeProposal,
}

impl TradeRequest {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AppError::TradeFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load a league snapshot and apply the configured rules and user teams.
pub fn load_league(path: &Path, config: &Config) -> Result<MemoryLeague, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut snapshot: LeagueSnapshot = serde_json::from_str(&text).map_err(StoreError::from)?;

    snapshot.settings.rules = config.league.rules.clone();
    if !config.league.user_tids.is_empty() {
        snapshot.settings.user_tids = config.league.user_tids.clone();
    }
    Ok(MemoryLeague::new(snapshot))
}

/// Run the roster pass and build the report.
pub async fn run_pass(
    store: &MemoryLeague,
    config: &Config,
    trade: Option<&TradeRequest>,
) -> Result<PassReport, AppError> {
    let profile = profile_for(&config.league.sport).ok_or_else(|| AppError::UnknownSport {
        sport: config.league.sport.clone(),
    })?;
    let settings = store.league_settings().await?;
    let before = rosters(&store.snapshot());

    let user_message = enforce_roster_size(store, &profile, RosterScope::User).await?;
    if let Some(msg) = &user_message {
        warn!("{msg}");
    }
    enforce_roster_size(store, &profile, RosterScope::Other).await?;
    slot_new_arrivals(store, &profile, &settings).await?;

    let trade = match trade {
        Some(request) => Some(evaluate_trade(store, &profile, config, &settings, request).await?),
        None => None,
    };

    let after = store.snapshot();
    let teams = team_reports(&after, &before, &profile, settings.season);
    info!(
        "roster pass complete for {} ({} teams)",
        config.league.name,
        teams.len()
    );

    Ok(PassReport {
        league: config.league.name.clone(),
        sport: profile.name.clone(),
        season: settings.season,
        user_message,
        teams,
        trade,
    })
}

/// Insert players who joined since the last sort without disturbing the
/// existing order. User teams that did not opt in are left untouched.
async fn slot_new_arrivals<S>(
    store: &S,
    profile: &SportProfile,
    settings: &LeagueSettings,
) -> Result<(), AppError>
where
    S: RosterTransactions + ?Sized,
{
    let opts = DepthOptions {
        only_new_players: true,
        ..DepthOptions::default()
    };
    for team in store.teams().await? {
        if settings.is_user_team(team.tid) && !team.keep_roster_sorted {
            continue;
        }
        let roster = store.players_on_team(team.tid).await?;
        let depth = compute_depth_chart(&roster, &team.depth, profile, &opts, settings.season);
        if depth != team.depth {
            store.save_depth_chart(team.tid, depth).await?;
        }
    }
    Ok(())
}

async fn evaluate_trade(
    store: &MemoryLeague,
    profile: &SportProfile,
    config: &Config,
    settings: &LeagueSettings,
    request: &TradeRequest,
) -> Result<TradeReport, AppError> {
    let valuator = Valuator::new(store, profile, &config.valuation);
    let mut cache = ValuationCache::new();
    let session = format!("{}-{:?}", settings.season, settings.phase);

    let value_change = valuator
        .value_change(
            &mut cache,
            request.tid,
            &request.proposal,
            Some(session.as_str()),
            request.partner,
        )
        .await?;
    info!("trade for team {}: value change {:.4}", request.tid, value_change);

    Ok(TradeReport {
        tid: request.tid,
        partner: request.partner,
        value_change,
        accepted: value_change > 0.0,
    })
}

fn rosters(snapshot: &LeagueSnapshot) -> BTreeMap<Tid, Vec<Pid>> {
    let mut out: BTreeMap<Tid, Vec<Pid>> = BTreeMap::new();
    for p in &snapshot.players {
        out.entry(p.tid).or_default().push(p.pid);
    }
    out
}

fn team_reports(
    after: &LeagueSnapshot,
    before: &BTreeMap<Tid, Vec<Pid>>,
    profile: &SportProfile,
    season: u16,
) -> Vec<TeamReport> {
    let by_pid: BTreeMap<Pid, &Player> = after.players.iter().map(|p| (p.pid, p)).collect();
    let empty = Vec::new();

    after
        .teams
        .iter()
        .map(|team| {
            let roster: Vec<Player> = after
                .players
                .iter()
                .filter(|p| p.tid == team.tid)
                .cloned()
                .collect();
            let had = before.get(&team.tid).unwrap_or(&empty);
            let released = had
                .iter()
                .filter(|pid| by_pid.get(*pid).is_some_and(|p| p.tid != team.tid))
                .filter_map(|pid| by_pid.get(pid).map(|p| p.name.clone()))
                .collect();
            let signed = roster
                .iter()
                .filter(|p| !had.contains(&p.pid))
                .map(|p| p.name.clone())
                .collect();

            TeamReport {
                tid: team.tid,
                name: team.display_name(),
                ovr: team_ovr(&roster, profile, &OvrOptions::default(), season),
                roster_size: roster.len(),
                released,
                signed,
            }
        })
        .collect()
}
