// Value-change evaluation: is a team better or worse off after a trade,
// signing or release?

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::asset::{Asset, AssetKind};
use super::cache::{CacheSnapshot, ValuationCache};
use super::picks::{load_picks, pick_asset, PickSide};
use super::zscore::contract_value;
use crate::config::{StrategyWeights, ValuationConfig};
use crate::league::{Dpid, LeagueSettings, Pid, Player, Team, Tid};
use crate::ovr::{team_ovr, OvrOptions};
use crate::sport::SportProfile;
use crate::store::RosterTransactions;
use crate::EngineError;

/// Assets moving in and out of one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeProposal {
    pub pids_add: Vec<Pid>,
    pub pids_remove: Vec<Pid>,
    pub dpids_add: Vec<Dpid>,
    pub dpids_remove: Vec<Dpid>,
}

impl TradeProposal {
    /// The same trade seen from the other side.
    pub fn mirrored(&self) -> Self {
        TradeProposal {
            pids_add: self.pids_remove.clone(),
            pids_remove: self.pids_add.clone(),
            dpids_add: self.dpids_remove.clone(),
            dpids_remove: self.dpids_add.clone(),
        }
    }
}

/// How the evaluated team treats the assets in one call.
#[derive(Debug, Clone, Copy)]
struct Perspective<'a> {
    weights: &'a StrategyWeights,
    exponent: f64,
    threshold: f64,
    num_games: u32,
    discount_injuries: bool,
}

pub struct Valuator<'a, S: ?Sized> {
    store: &'a S,
    profile: &'a SportProfile,
    config: &'a ValuationConfig,
}

impl<'a, S> Valuator<'a, S>
where
    S: RosterTransactions + ?Sized,
{
    pub fn new(store: &'a S, profile: &'a SportProfile, config: &'a ValuationConfig) -> Self {
        Self {
            store,
            profile,
            config,
        }
    }

    /// Signed change in team `tid`'s outlook if the proposal goes through.
    /// Positive means the team is better off.
    pub async fn value_change(
        &self,
        cache: &mut ValuationCache,
        tid: Tid,
        proposal: &TradeProposal,
        session_key: Option<&str>,
        trading_partner: Option<Tid>,
    ) -> Result<f64, EngineError> {
        let picks_cfg = &self.config.picks;
        if proposal.dpids_remove.len() > picks_cfg.max_picks_given_up {
            info!(
                "team {} would give up {} picks (max {}), rejecting",
                tid,
                proposal.dpids_remove.len(),
                picks_cfg.max_picks_given_up
            );
            return Ok(picks_cfg.too_many_picks_value);
        }

        let settings = self.store.league_settings().await?;
        let team = self.team(tid).await?;
        if let Some(partner) = trading_partner {
            self.team(partner).await?;
        }

        let snapshot = cache
            .ensure(self.store, self.profile, self.config, session_key)
            .await?;

        let adding = self.players(&proposal.pids_add).await?;
        let removing = self.players(&proposal.pids_remove).await?;
        let picks_add = load_picks(self.store, &proposal.dpids_add, &settings).await?;
        let picks_remove = load_picks(self.store, &proposal.dpids_remove, &settings).await?;

        let team_is_user = settings.is_user_team(tid);
        let partner_is_user = trading_partner.is_some_and(|p| settings.is_user_team(p));
        // Fudge, injury discount and roster fit only apply between AI teams,
        // so a trade between two humans nets to zero.
        let between_ai = !team_is_user && !partner_is_user;

        let mut add: Vec<Asset> = adding
            .iter()
            .map(|p| self.player_asset(p, snapshot, &settings))
            .collect();
        for dp in &picks_add {
            add.push(pick_asset(
                dp,
                PickSide::Add,
                snapshot,
                &settings,
                self.config,
                partner_is_user,
            )?);
        }

        let mut remove: Vec<Asset> = removing
            .iter()
            .map(|p| self.player_asset(p, snapshot, &settings))
            .collect();
        for dp in &picks_remove {
            remove.push(pick_asset(
                dp,
                PickSide::Remove,
                snapshot,
                &settings,
                self.config,
                partner_is_user,
            )?);
        }

        if between_ai {
            let factor = self.config.fudge.factor(settings.rules.difficulty);
            for asset in &mut remove {
                asset.inflate(factor);
            }
        }

        let view = Perspective {
            weights: self.config.strategy.for_strategy(team.strategy),
            exponent: self.profile.value_exponent,
            threshold: self.config.aggregation.exponent_threshold,
            num_games: settings.rules.num_games,
            discount_injuries: between_ai,
        };

        let mut change = sum_values(&add, &view) - sum_values(&remove, &view);

        if between_ai && view.weights.roster_fit_weight != 0.0 {
            let fit = self
                .roster_fit(tid, &adding, &proposal.pids_remove, &settings)
                .await?;
            change += view.weights.roster_fit_weight * fit;
        }

        debug!(
            "team {} value change {:.4} (add {} assets, remove {})",
            tid,
            change,
            add.len(),
            remove.len()
        );
        Ok(change)
    }

    async fn team(&self, tid: Tid) -> Result<Team, EngineError> {
        self.store
            .team(tid)
            .await?
            .ok_or(EngineError::UnknownTeam(tid))
    }

    async fn players(&self, pids: &[Pid]) -> Result<Vec<Player>, EngineError> {
        let mut players = Vec::with_capacity(pids.len());
        for &pid in pids {
            let p = self
                .store
                .player(pid)
                .await?
                .ok_or(EngineError::MissingPlayer(pid))?;
            players.push(p);
        }
        Ok(players)
    }

    fn player_asset(&self, p: &Player, cache: &CacheSnapshot, settings: &LeagueSettings) -> Asset {
        let value = cache.stats.value_z(p.value);
        let skill = cache.stats.skill_z(p.value_no_pot);
        Asset {
            kind: AssetKind::Player { pid: p.pid },
            value,
            skill,
            contract_value: contract_value(
                &p.contract,
                value,
                settings.contract_season(),
                &self.config.normalizer,
                &settings.rules,
            ),
            injury_games: p.injury.games_remaining,
            age: p.age(settings.season),
        }
    }

    /// Raw whole-roster rating after the trade minus before.
    async fn roster_fit(
        &self,
        tid: Tid,
        adding: &[Player],
        pids_remove: &[Pid],
        settings: &LeagueSettings,
    ) -> Result<f64, EngineError> {
        let before = self.store.players_on_team(tid).await?;
        let mut after: Vec<Player> = before
            .iter()
            .filter(|p| !pids_remove.contains(&p.pid))
            .cloned()
            .collect();
        after.extend(adding.iter().cloned());

        let opts = OvrOptions::ranking();
        let ovr_before = team_ovr(&before, self.profile, &opts, settings.season);
        let ovr_after = team_ovr(&after, self.profile, &opts, settings.season);
        Ok(ovr_after - ovr_before)
    }
}

/// Aggregate assets under a team's strategy. Values above the threshold are
/// raised to the sport exponent so concentrated value beats spread value.
fn sum_values(assets: &[Asset], view: &Perspective<'_>) -> f64 {
    let w = view.weights;
    assets
        .iter()
        .map(|a| {
            let base = w.skill_weight * a.skill + (1.0 - w.skill_weight) * a.value;
            let factor = match a.kind {
                AssetKind::Player { .. } => {
                    if a.age <= w.young_age {
                        w.young_factor
                    } else if a.age >= w.old_age {
                        w.old_factor
                    } else {
                        1.0
                    }
                }
                AssetKind::Pick { seasons_ahead, .. } => {
                    w.pick_factor * w.pick_season_discount.powi(i32::from(seasons_ahead))
                }
            };

            let mut v = base * factor + w.contract_weight * a.contract_value;
            if view.discount_injuries && view.num_games > 0 {
                let missed = (f64::from(a.injury_games) / f64::from(view.num_games)).min(1.0);
                v *= 1.0 - w.injury_weight * missed;
            }
            if v > view.threshold {
                v = v.powf(view.exponent);
            }
            v
        })
        .sum()
}
