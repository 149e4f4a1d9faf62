// Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use rostercraft_core::config::LeagueRules;
use rostercraft_core::depth::ChartSpec;
use rostercraft_core::league::{
    Contract, DepthChart, Dpid, DraftPick, Injury, LeagueSettings, Phase, PickSeason, Pid, Player,
    RatingsSeason, Strategy, Team, Tid,
};
use rostercraft_core::ovr::{OvrModel, OvrScale, PositionWeights, WeightTable};
use rostercraft_core::sport::{PositionAssignment, ReplacementLevel, SportProfile};
use rostercraft_core::store::{LeagueSnapshot, MemoryLeague};

pub const SEASON: u16 = 2025;

pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

pub fn player(pid: Pid, tid: Tid, value: f64) -> Player {
    Player {
        pid,
        tid,
        name: format!("Player {pid}"),
        born_year: 1999,
        ratings: vec![RatingsSeason {
            season: SEASON,
            pos: "F".into(),
            ovr: value,
            pot: value + 3.0,
            ovrs: BTreeMap::new(),
            pots: BTreeMap::new(),
        }],
        value,
        value_no_pot: value - 2.0,
        contract: Contract {
            amount: 5_000.0,
            exp: SEASON + 2,
        },
        injury: Injury::healthy(),
        draft_year: None,
    }
}

pub fn team(tid: Tid, strategy: Strategy) -> Team {
    Team {
        tid,
        region: "City".into(),
        name: format!("Team {tid}"),
        strategy,
        keep_roster_sorted: false,
        depth: DepthChart::new(),
        won: 0,
        lost: 0,
        tied: 0,
    }
}

/// Single pooled position "F" with five modeled slots.
pub fn profile() -> SportProfile {
    profile_with(45.0, 0.5)
}

pub fn profile_with(replacement: f64, depth_base: f64) -> SportProfile {
    let mut positions = BTreeMap::new();
    positions.insert(
        "F".to_string(),
        PositionWeights {
            weights: vec![0.2, 0.15, 0.1, 0.08, 0.05],
            replacement,
            depth_base,
            quota: 10,
            overflow_penalty: 0.5,
        },
    );
    SportProfile {
        name: "pooled".into(),
        charts: vec![ChartSpec::ordered("F", 5)],
        assignment: PositionAssignment::Pooled { group: "F".into() },
        ovr: OvrModel {
            regular: WeightTable {
                intercept: -30.0,
                positions,
            },
            playoffs: None,
            scale: OvrScale::percent(2.0, 50.0),
        },
        position_floors: BTreeMap::new(),
        value_exponent: 2.0,
        replacement: ReplacementLevel {
            pos: "F".into(),
            rating: replacement,
            value: 40.0,
            age: 27,
        },
    }
}

pub fn settings(user_tids: Vec<Tid>, rules: LeagueRules) -> LeagueSettings {
    LeagueSettings {
        season: SEASON,
        phase: Phase::RegularSeason,
        user_tids,
        rules,
    }
}

/// Every team's own picks for this season and the next, unnumbered.
pub fn picks(num_teams: Tid, rounds: u8) -> Vec<DraftPick> {
    let mut out = Vec::new();
    let mut dpid: Dpid = 0;
    for season in [SEASON, SEASON + 1] {
        for round in 1..=rounds {
            for tid in 0..num_teams {
                out.push(DraftPick {
                    dpid,
                    original_tid: tid,
                    tid,
                    season: PickSeason::Year(season),
                    round,
                    pick: 0,
                });
                dpid += 1;
            }
        }
    }
    out
}

/// Four teams of eight players with spread-out values, plus their picks.
pub fn league(user_tids: Vec<Tid>, strategy: Strategy) -> LeagueSnapshot {
    let teams: Vec<Team> = (0..4).map(|tid| team(tid, strategy)).collect();
    let mut players = Vec::new();
    for tid in 0..4 {
        for i in 0..8 {
            let pid = (tid * 8 + i) as Pid;
            players.push(player(pid, tid, 40.0 + 3.0 * i as f64 + tid as f64));
        }
    }
    LeagueSnapshot {
        settings: settings(user_tids, LeagueRules::default()),
        teams,
        players,
        draft_picks: picks(4, 2),
        renormalized: vec![],
    }
}

pub fn memory(snapshot: LeagueSnapshot) -> MemoryLeague {
    MemoryLeague::new(snapshot)
}
