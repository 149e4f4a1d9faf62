// Roster size enforcement: automatic releases and signings for AI teams,
// descriptive errors for human-controlled teams.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info, warn};

use crate::depth::{compute_depth_chart, DepthOptions};
use crate::league::{Contract, LeagueSettings, Pid, Player, Team};
use crate::sport::SportProfile;
use crate::store::{FreeAgentTemplate, RosterTransactions};
use crate::EngineError;

/// Which teams a pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterScope {
    /// Human-controlled teams: report violations, never correct them.
    User,
    /// AI teams: correct violations automatically.
    Other,
}

/// Bring every team in `scope` within the league's roster bounds.
///
/// Returns the first violation message for a user team, if any. AI teams are
/// corrected in place and never produce a message.
pub async fn enforce_roster_size<S>(
    store: &S,
    profile: &SportProfile,
    scope: RosterScope,
) -> Result<Option<String>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let settings = store.league_settings().await?;
    let teams = store.teams().await?;

    match scope {
        RosterScope::User => check_user_teams(store, profile, &settings, &teams).await,
        RosterScope::Other => {
            correct_ai_teams(store, profile, &settings, &teams).await?;
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// User teams
// ---------------------------------------------------------------------------

async fn check_user_teams<S>(
    store: &S,
    profile: &SportProfile,
    settings: &LeagueSettings,
    teams: &[Team],
) -> Result<Option<String>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let rules = &settings.rules;
    let multiple = settings.user_tids.len() > 1;
    let mut first_error = None;

    for team in teams.iter().filter(|t| settings.is_user_team(t.tid)) {
        let roster = store.players_on_team(team.tid).await?;
        let subject = if multiple {
            format!("Your team ({})", team.display_name())
        } else {
            "Your team".to_string()
        };

        let error = if roster.len() > rules.max_roster {
            Some(format!(
                "{subject} currently has more than the maximum number of players ({}). You must remove players (by releasing them from your roster or through trades) before continuing.",
                rules.max_roster
            ))
        } else if roster.len() < rules.min_roster {
            Some(format!(
                "{subject} currently has less than the minimum number of players ({}). You must add players (through free agency or trades) before continuing.",
                rules.min_roster
            ))
        } else {
            None
        };

        if team.keep_roster_sorted {
            resort(store, profile, settings, team).await?;
        }

        if first_error.is_none() {
            first_error = error;
        }
    }

    Ok(first_error)
}

// ---------------------------------------------------------------------------
// AI teams
// ---------------------------------------------------------------------------

async fn correct_ai_teams<S>(
    store: &S,
    profile: &SportProfile,
    settings: &LeagueSettings,
    teams: &[Team],
) -> Result<(), EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let rules = &settings.rules;
    let mut released: Vec<Pid> = Vec::new();
    let mut pool: Option<VecDeque<Player>> = None;

    for team in teams.iter().filter(|t| !settings.is_user_team(t.tid)) {
        let mut roster = store.players_on_team(team.tid).await?;
        let mut changed = false;

        if roster.len() > rules.max_roster {
            let dropped =
                release_excess(store, profile, team, &mut roster, rules.max_roster).await?;
            changed |= !dropped.is_empty();
            released.extend(dropped);
        }

        if roster.len() < rules.min_roster {
            if pool.is_none() {
                pool = Some(signable_pool(store, settings).await?);
            }
            if let Some(pool) = pool.as_mut() {
                let needed = rules.min_roster - roster.len();
                sign_minimum(store, profile, settings, team, &mut roster, pool, needed).await?;
                changed = true;
            }
        }

        if changed {
            resort(store, profile, settings, team).await?;
        }
    }

    if !released.is_empty() {
        store.normalize_contract_demands(&released).await?;
    }

    Ok(())
}

/// Release lowest-value players until the roster fits, skipping anyone whose
/// departure would leave their position below its floor.
async fn release_excess<S>(
    store: &S,
    profile: &SportProfile,
    team: &Team,
    roster: &mut Vec<Player>,
    max: usize,
) -> Result<Vec<Pid>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let mut released = Vec::new();
    roster.sort_by(|a, b| a.value.total_cmp(&b.value).then_with(|| a.pid.cmp(&b.pid)));

    while roster.len() > max {
        let counts = position_counts(roster);
        let candidate = roster.iter().position(|p| {
            let pos = p.pos();
            let have = counts.get(pos).copied().unwrap_or(0);
            let protected = have <= profile.floor(pos);
            if protected {
                debug!(
                    "{}: keeping {} ({}), position at floor",
                    team.display_name(),
                    p.name,
                    pos
                );
            }
            !protected
        });

        let Some(idx) = candidate else {
            warn!(
                "{}: {} over the maximum, every candidate protected by a position floor",
                team.display_name(),
                roster.len() - max
            );
            break;
        };

        let player = roster.remove(idx);
        store.release_player(player.pid).await?;
        info!(
            "{}: released {} ({}, value {:.1})",
            team.display_name(),
            player.name,
            player.pos(),
            player.value
        );
        released.push(player.pid);
    }

    Ok(released)
}

/// Free agents willing to sign for the league minimum, best first.
async fn signable_pool<S>(
    store: &S,
    settings: &LeagueSettings,
) -> Result<VecDeque<Player>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let mut agents: Vec<Player> = store
        .free_agents()
        .await?
        .into_iter()
        .filter(|p| p.contract.amount <= settings.rules.min_contract)
        .collect();
    agents.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.pid.cmp(&b.pid)));
    Ok(agents.into())
}

async fn sign_minimum<S>(
    store: &S,
    profile: &SportProfile,
    settings: &LeagueSettings,
    team: &Team,
    roster: &mut Vec<Player>,
    pool: &mut VecDeque<Player>,
    needed: usize,
) -> Result<(), EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let contract = Contract {
        amount: settings.rules.min_contract,
        exp: settings.contract_season(),
    };

    for _ in 0..needed {
        let player = match pool.pop_front() {
            Some(p) => p,
            None => {
                let template = FreeAgentTemplate {
                    pos: short_position(profile, roster),
                    rating: profile.replacement.rating,
                    value: profile.replacement.value,
                    age: profile.replacement.age,
                    season: settings.season,
                    contract,
                };
                store.create_free_agent(&template).await?
            }
        };

        store.sign_player(player.pid, team.tid, contract).await?;
        info!(
            "{}: signed {} ({}, value {:.1}) at the minimum",
            team.display_name(),
            player.name,
            player.pos(),
            player.value
        );
        roster.push(player);
    }

    Ok(())
}

/// First position below its floor, else the replacement default.
fn short_position(profile: &SportProfile, roster: &[Player]) -> String {
    let counts = position_counts(roster);
    profile
        .position_floors
        .iter()
        .find(|(pos, floor)| counts.get(pos.as_str()).copied().unwrap_or(0) < **floor)
        .map(|(pos, _)| pos.clone())
        .unwrap_or_else(|| profile.replacement.pos.clone())
}

fn position_counts(roster: &[Player]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for p in roster {
        *counts.entry(p.pos()).or_insert(0) += 1;
    }
    counts
}

/// Rebuild every depth chart of `team` from its stored roster.
async fn resort<S>(
    store: &S,
    profile: &SportProfile,
    settings: &LeagueSettings,
    team: &Team,
) -> Result<(), EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let roster = store.players_on_team(team.tid).await?;
    let depth = compute_depth_chart(
        &roster,
        &team.depth,
        profile,
        &DepthOptions::default(),
        settings.season,
    );
    store.save_depth_chart(team.tid, depth).await?;
    Ok(())
}
