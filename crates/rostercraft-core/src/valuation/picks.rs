// Draft pick estimation: where an undetermined pick will land, what that
// slot is worth, and repair of inconsistent pick records.

use std::collections::BTreeMap;

use tracing::warn;

use super::asset::{Asset, AssetKind};
use super::cache::CacheSnapshot;
use super::zscore::contract_value;
use crate::config::ValuationConfig;
use crate::league::{Contract, Dpid, DraftPick, LeagueSettings, Phase, PickSeason};
use crate::store::RosterTransactions;
use crate::EngineError;

/// Which side of a trade a pick is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSide {
    Add,
    Remove,
}

/// Seasons between now and the pick's draft. Once this season's draft has
/// been held, next season's pick counts as zero seasons out.
pub fn seasons_ahead(dp: &DraftPick, settings: &LeagueSettings) -> u16 {
    let Some(year) = dp.season.year() else {
        return 0;
    };
    let ahead = year.saturating_sub(settings.season);
    if settings.phase > Phase::Draft {
        ahead.saturating_sub(1)
    } else {
        ahead
    }
}

/// Estimated 1-based slot within the round.
///
/// Determined picks use their number. Otherwise the cached estimate for the
/// original owner is regressed toward a target in proportion to how far out
/// the pick is, then shifted against the AI when the partner is a user team.
pub fn estimate_slot(
    dp: &DraftPick,
    side: PickSide,
    cache: &CacheSnapshot,
    settings: &LeagueSettings,
    config: &ValuationConfig,
    partner_is_user: bool,
) -> Result<u16, EngineError> {
    if dp.is_determined() {
        return Ok(dp.pick);
    }

    let n = cache.num_teams.max(1) as f64;
    let est = cache
        .est_slots
        .get(&dp.original_tid)
        .copied()
        .ok_or(EngineError::UnknownTeam(dp.original_tid))? as f64;

    let picks = &config.picks;
    let horizon = f64::from(picks.regression_horizon);
    let s = f64::from(seasons_ahead(dp, settings).min(picks.regression_horizon));
    let fraction = if settings.is_user_team(dp.original_tid) {
        picks.user_regression_fraction
    } else {
        picks.other_regression_fraction
    };
    let target = fraction * n;
    let mut slot = (est * (horizon - s) + target * s) / horizon;

    if partner_is_user {
        let shift = picks.user_partner_slot_shift * s;
        slot += match side {
            PickSide::Add => shift,
            PickSide::Remove => -shift,
        };
    }

    Ok(slot.round().clamp(1.0, n) as u16)
}

/// 0-based position across all rounds of the draft.
pub fn overall_index(round: u8, slot: u16, num_teams: usize) -> usize {
    usize::from(round.max(1) - 1) * num_teams + usize::from(slot.max(1)) - 1
}

/// Normalized value of a pick: never below the floor, with a tiny
/// slot-dependent bonus so no two picks tie.
pub fn pick_value(z: f64, index: usize, total: usize, config: &ValuationConfig) -> f64 {
    let picks = &config.picks;
    z.max(picks.value_floor) + picks.tiebreak_epsilon * total.saturating_sub(index) as f64
}

/// Rookie scale: the first overall pick earns a fixed share of the cap, the
/// last earns the league minimum, linear in between.
pub fn rookie_contract(
    index: usize,
    total: usize,
    draft_year: u16,
    settings: &LeagueSettings,
    config: &ValuationConfig,
) -> Contract {
    let rules = &settings.rules;
    let top = (rules.salary_cap * config.picks.rookie_top_cap_fraction).max(rules.min_contract);
    let t = if total > 1 {
        index.min(total - 1) as f64 / (total - 1) as f64
    } else {
        0.0
    };
    Contract {
        amount: top - t * (top - rules.min_contract),
        exp: draft_year + rules.rookie_contract_years,
    }
}

/// Build the valuation asset for one pick.
pub fn pick_asset(
    dp: &DraftPick,
    side: PickSide,
    cache: &CacheSnapshot,
    settings: &LeagueSettings,
    config: &ValuationConfig,
    partner_is_user: bool,
) -> Result<Asset, EngineError> {
    let slot = estimate_slot(dp, side, cache, settings, config, partner_is_user)?;
    let n = cache.num_teams.max(1);
    let total = usize::from(settings.rules.draft_rounds) * n;
    let index = overall_index(dp.round, slot, n);

    let draft_year = dp.season.year().unwrap_or(settings.season);
    let raw = cache.pick_values.raw(dp.season.year(), index);
    let value = pick_value(cache.stats.value_z(raw), index, total, config);
    let skill = pick_value(cache.stats.skill_z(raw), index, total, config);

    let contract = rookie_contract(index, total, draft_year, settings, config);
    let contract_value = contract_value(
        &contract,
        value,
        settings.contract_season(),
        &config.normalizer,
        &settings.rules,
    );

    Ok(Asset {
        kind: AssetKind::Pick {
            dpid: dp.dpid,
            seasons_ahead: seasons_ahead(dp, settings),
        },
        value,
        skill,
        contract_value,
        injury_games: 0,
        age: settings.rules.draft_age,
    })
}

// ---------------------------------------------------------------------------
// Loading and repair
// ---------------------------------------------------------------------------

/// Load the requested picks, repairing upstream data problems first: a
/// current-season pick with no number once the draft order should exist, or
/// more than one pick for the same (original team, season, round).
pub async fn load_picks<S>(
    store: &S,
    dpids: &[Dpid],
    settings: &LeagueSettings,
) -> Result<Vec<DraftPick>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    if dpids.is_empty() {
        return Ok(Vec::new());
    }

    let picks = fetch(store, dpids).await?;

    let unnumbered = settings.phase >= Phase::Draft
        && picks
            .iter()
            .any(|dp| dp.season == PickSeason::Year(settings.season) && !dp.is_determined());
    if unnumbered {
        warn!(
            "draft pick without a pick number in the {} draft, regenerating draft order",
            settings.season
        );
        store.regenerate_draft_order(settings.season).await?;
    }

    let mut counts: BTreeMap<_, usize> = BTreeMap::new();
    for dp in store.draft_picks().await? {
        *counts.entry((dp.original_tid, dp.season, dp.round)).or_default() += 1;
    }
    let duplicated = picks
        .iter()
        .any(|dp| counts.get(&(dp.original_tid, dp.season, dp.round)).copied().unwrap_or(0) > 1);
    if duplicated {
        warn!("duplicate draft picks found, regenerating draft picks");
        store.regenerate_draft_picks().await?;
    }

    if unnumbered || duplicated {
        fetch(store, dpids).await
    } else {
        Ok(picks)
    }
}

async fn fetch<S>(store: &S, dpids: &[Dpid]) -> Result<Vec<DraftPick>, EngineError>
where
    S: RosterTransactions + ?Sized,
{
    let mut picks = Vec::with_capacity(dpids.len());
    for &dpid in dpids {
        let dp = store
            .draft_pick(dpid)
            .await?
            .ok_or(EngineError::MissingDraftPick(dpid))?;
        picks.push(dp);
    }
    Ok(picks)
}
