// Session-scoped league statistics shared by every value-change evaluation
// in one decision pass.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::zscore::LeagueValueStats;
use crate::config::ValuationConfig;
use crate::league::{LeagueSettings, Player, Team, Tid};
use crate::ovr::{team_ovr, OvrOptions};
use crate::sport::SportProfile;
use crate::store::LeagueStore;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Pick value curve
// ---------------------------------------------------------------------------

/// Raw prospect value by overall draft slot (0-based), per draft year.
#[derive(Debug, Clone, Default)]
pub struct PickValueCurve {
    pub by_season: BTreeMap<u16, Vec<f64>>,
    /// Used for seasons without a prospect class.
    pub default: Vec<f64>,
    /// Used when no curve reaches the slot at all.
    pub fallback: f64,
}

impl PickValueCurve {
    /// Build from undrafted prospects, grouped by draft year and sorted best
    /// first. The default curve averages the seasons slot by slot, or uses
    /// `configured` when there are no prospects.
    pub fn from_prospects(prospects: &[Player], configured: &[f64], fallback: f64) -> Self {
        let mut by_season: BTreeMap<u16, Vec<f64>> = BTreeMap::new();
        for p in prospects {
            if let Some(year) = p.draft_year {
                by_season.entry(year).or_default().push(p.value);
            }
        }
        for values in by_season.values_mut() {
            values.sort_by(|a, b| b.total_cmp(a));
        }

        let default = if by_season.is_empty() {
            configured.to_vec()
        } else {
            let longest = by_season.values().map(Vec::len).max().unwrap_or(0);
            (0..longest)
                .map(|i| {
                    let at: Vec<f64> =
                        by_season.values().filter_map(|v| v.get(i).copied()).collect();
                    at.iter().sum::<f64>() / at.len() as f64
                })
                .collect()
        };

        PickValueCurve {
            by_season,
            default,
            fallback,
        }
    }

    /// Raw value at overall slot `index` for a draft year (`None` for
    /// fantasy or expansion drafts).
    pub fn raw(&self, season: Option<u16>, index: usize) -> f64 {
        season
            .and_then(|s| self.by_season.get(&s))
            .and_then(|curve| curve.get(index))
            .or_else(|| self.default.get(index))
            .or_else(|| self.default.last())
            .copied()
            .unwrap_or(self.fallback)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// League-wide comparison data computed once per session.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub stats: LeagueValueStats,
    /// Raw whole-roster team ratings.
    pub team_ovrs: BTreeMap<Tid, f64>,
    pub projected_winp: BTreeMap<Tid, f64>,
    /// Estimated draft slot (1-based) for each team's own pick; the worst
    /// projected team picks first.
    pub est_slots: BTreeMap<Tid, u16>,
    pub pick_values: PickValueCurve,
    pub num_teams: usize,
}

impl CacheSnapshot {
    pub async fn build<S>(
        store: &S,
        profile: &SportProfile,
        config: &ValuationConfig,
    ) -> Result<Self, EngineError>
    where
        S: LeagueStore + ?Sized,
    {
        let settings = store.league_settings().await?;
        let teams = store.teams().await?;

        let mut active: Vec<Player> = Vec::new();
        let mut team_ovrs = BTreeMap::new();
        for team in &teams {
            let roster = store.players_on_team(team.tid).await?;
            let ovr = team_ovr(&roster, profile, &OvrOptions::ranking(), settings.season);
            team_ovrs.insert(team.tid, ovr);
            active.extend(roster);
        }

        let stats = LeagueValueStats::from_players(&active);
        let projected_winp = project_win_fractions(
            &teams,
            &team_ovrs,
            &settings,
            config.projection.ovr_spread,
        );
        let est_slots = estimate_slots(&projected_winp);

        let prospects = store.draft_prospects().await?;
        let pick_values = PickValueCurve::from_prospects(
            &prospects,
            &config.picks.default_curve,
            config.picks.fallback_value,
        );

        Ok(CacheSnapshot {
            stats,
            team_ovrs,
            projected_winp,
            est_slots,
            pick_values,
            num_teams: teams.len(),
        })
    }
}

/// Blend each team's record with its rating-implied strength, weighting the
/// record by the fraction of the season already played.
fn project_win_fractions(
    teams: &[Team],
    team_ovrs: &BTreeMap<Tid, f64>,
    settings: &LeagueSettings,
    spread: f64,
) -> BTreeMap<Tid, f64> {
    let mean = if team_ovrs.is_empty() {
        0.0
    } else {
        team_ovrs.values().sum::<f64>() / team_ovrs.len() as f64
    };

    teams
        .iter()
        .map(|t| {
            let ovr = team_ovrs.get(&t.tid).copied().unwrap_or(mean);
            let implied = 1.0 / (1.0 + (-(ovr - mean) / spread).exp());
            let played = settings.season_fraction(t.games_played());
            let actual = t.win_fraction().unwrap_or(implied);
            (t.tid, played * actual + (1.0 - played) * implied)
        })
        .collect()
}

fn estimate_slots(projected: &BTreeMap<Tid, f64>) -> BTreeMap<Tid, u16> {
    let mut order: Vec<(Tid, f64)> = projected.iter().map(|(&tid, &w)| (tid, w)).collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    order
        .into_iter()
        .enumerate()
        .map(|(i, (tid, _))| (tid, i as u16 + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Explicitly owned valuation cache, keyed by an opaque session key.
#[derive(Debug, Default)]
pub struct ValuationCache {
    key: Option<String>,
    snapshot: Option<CacheSnapshot>,
}

impl ValuationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn snapshot(&self) -> Option<&CacheSnapshot> {
        self.snapshot.as_ref()
    }

    /// Reuse the snapshot when `session_key` matches the last successful
    /// refresh; otherwise rebuild. A `None` key always rebuilds.
    ///
    /// The new snapshot replaces the old one only once it is complete, so a
    /// failed refresh leaves the previous snapshot and key in place.
    pub async fn ensure<S>(
        &mut self,
        store: &S,
        profile: &SportProfile,
        config: &ValuationConfig,
        session_key: Option<&str>,
    ) -> Result<&CacheSnapshot, EngineError>
    where
        S: LeagueStore + ?Sized,
    {
        let fresh = session_key.is_some() && self.key.as_deref() == session_key;
        match self.snapshot.take() {
            Some(current) if fresh => {
                debug!("valuation cache reused (session {:?})", session_key);
                Ok(&*self.snapshot.insert(current))
            }
            previous => match CacheSnapshot::build(store, profile, config).await {
                Ok(built) => {
                    info!(
                        "valuation cache refreshed (session {:?}, {} teams)",
                        session_key, built.num_teams
                    );
                    self.key = session_key.map(str::to_string);
                    Ok(&*self.snapshot.insert(built))
                }
                Err(e) => {
                    self.snapshot = previous;
                    Err(e)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueRules;
    use crate::league::{DepthChart, Phase, Strategy};

    fn team(tid: Tid, won: u32, lost: u32) -> Team {
        Team {
            tid,
            region: "R".into(),
            name: format!("T{tid}"),
            strategy: Strategy::Contending,
            keep_roster_sorted: false,
            depth: DepthChart::new(),
            won,
            lost,
            tied: 0,
        }
    }

    fn settings() -> LeagueSettings {
        LeagueSettings {
            season: 2025,
            phase: Phase::RegularSeason,
            user_tids: vec![],
            rules: LeagueRules {
                num_games: 10,
                ..LeagueRules::default()
            },
        }
    }

    #[test]
    fn preseason_projection_follows_rating() {
        let teams = vec![team(0, 0, 0), team(1, 0, 0)];
        let ovrs: BTreeMap<Tid, f64> = [(0, 5.0), (1, -5.0)].into_iter().collect();
        let winp = project_win_fractions(&teams, &ovrs, &settings(), 10.0);
        assert!(winp[&0] > 0.5 && winp[&1] < 0.5);
        let slots = estimate_slots(&winp);
        assert_eq!(slots[&1], 1);
        assert_eq!(slots[&0], 2);
    }

    #[test]
    fn finished_season_projection_is_the_record() {
        // Strong rating but a losing full-season record.
        let teams = vec![team(0, 2, 8), team(1, 8, 2)];
        let ovrs: BTreeMap<Tid, f64> = [(0, 5.0), (1, -5.0)].into_iter().collect();
        let winp = project_win_fractions(&teams, &ovrs, &settings(), 10.0);
        assert!((winp[&0] - 0.2).abs() < 1e-12);
        assert_eq!(estimate_slots(&winp)[&0], 1);
    }

    #[test]
    fn curve_falls_back_in_order() {
        let curve = PickValueCurve {
            by_season: [(2025, vec![60.0, 50.0])].into_iter().collect(),
            default: vec![55.0, 45.0, 40.0],
            fallback: 30.0,
        };
        assert_eq!(curve.raw(Some(2025), 1), 50.0);
        assert_eq!(curve.raw(Some(2025), 2), 40.0);
        assert_eq!(curve.raw(Some(2030), 0), 55.0);
        assert_eq!(curve.raw(None, 9), 40.0);

        let empty = PickValueCurve {
            fallback: 30.0,
            ..PickValueCurve::default()
        };
        assert_eq!(empty.raw(Some(2025), 0), 30.0);
    }
}
