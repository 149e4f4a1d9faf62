// End-to-end roster pass over a league snapshot written to disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rostercraft_app::{load_league, run_pass, AppError, TradeRequest};
use rostercraft_core::config::{self, Config, LeagueRules};
use rostercraft_core::league::{
    Contract, DepthChart, Injury, LeagueSettings, Phase, Pid, Player, RatingsSeason, Strategy, Team,
    Tid, FREE_AGENT,
};
use rostercraft_core::store::{LeagueSnapshot, LeagueStore};
use rostercraft_core::valuation::TradeProposal;

const POSITIONS: [&str; 5] = ["PG", "SG", "SF", "PF", "C"];

fn defaults_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../defaults")
}

/// Scratch base directory with the shipped defaults copied into config/.
fn scratch_base(name: &str) -> PathBuf {
    let base = std::env::temp_dir().join(format!("rostercraft_app_{name}"));
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(base.join("defaults")).unwrap();
    for file in ["league.toml", "valuation.toml"] {
        fs::copy(defaults_dir().join(file), base.join("defaults").join(file)).unwrap();
    }
    config::ensure_config_files(&base).unwrap();
    base
}

fn player(pid: Pid, tid: Tid, value: f64) -> Player {
    Player {
        pid,
        tid,
        name: format!("Player {pid}"),
        born_year: 1998,
        ratings: vec![RatingsSeason {
            season: 2025,
            pos: POSITIONS[pid as usize % POSITIONS.len()].into(),
            ovr: value,
            pot: value + 2.0,
            ovrs: BTreeMap::new(),
            pots: BTreeMap::new(),
        }],
        value,
        value_no_pot: value - 1.0,
        contract: Contract {
            amount: 4_000.0,
            exp: 2027,
        },
        injury: Injury::healthy(),
        draft_year: None,
    }
}

fn team(tid: Tid) -> Team {
    Team {
        tid,
        region: "Metro".into(),
        name: format!("Club {tid}"),
        strategy: if tid == 1 {
            Strategy::Rebuilding
        } else {
            Strategy::Contending
        },
        keep_roster_sorted: false,
        depth: DepthChart::new(),
        won: 0,
        lost: 0,
        tied: 0,
    }
}

/// User team 0 is over the maximum, AI team 1 is over, AI team 2 is short.
fn snapshot() -> LeagueSnapshot {
    let mut players = Vec::new();
    let mut pid: Pid = 0;
    for (tid, count) in [(0, 16), (1, 17), (2, 11)] {
        for i in 0..count {
            players.push(player(pid, tid, 40.0 + i as f64));
            pid += 1;
        }
    }
    for value in [45.0, 48.0, 43.0] {
        let mut fa = player(pid, FREE_AGENT, value);
        fa.contract.amount = 1_000.0;
        players.push(fa);
        pid += 1;
    }

    LeagueSnapshot {
        settings: LeagueSettings {
            season: 2025,
            phase: Phase::RegularSeason,
            user_tids: vec![],
            rules: LeagueRules::default(),
        },
        teams: (0..3).map(team).collect(),
        players,
        draft_picks: vec![],
        renormalized: vec![],
    }
}

fn write_snapshot(base: &Path) -> PathBuf {
    let path = base.join("league.json");
    fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();
    path
}

#[test]
fn shipped_defaults_load_and_validate() {
    let base = scratch_base("defaults");
    let config = config::load_config_from(&base).unwrap();
    assert_eq!(config.league.sport, "basketball");
    assert_eq!(config.league.user_tids, vec![0]);
    assert_eq!(config.league.rules.max_roster, 15);
    assert_eq!(config.valuation.picks.max_picks_given_up, 4);
    assert!((config.valuation.strategy.rebuilding.contract_weight - 2.0).abs() < f64::EPSILON);
    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn pass_fixes_ai_rosters_and_reports_the_user_team() {
    let base = scratch_base("pass");
    let config = config::load_config_from(&base).unwrap();
    let path = write_snapshot(&base);
    let store = load_league(&path, &config).unwrap();

    let trade = TradeRequest {
        tid: 1,
        partner: Some(2),
        proposal: TradeProposal {
            pids_add: vec![46],
            pids_remove: vec![30],
            ..TradeProposal::default()
        },
    };
    let report = run_pass(&store, &config, Some(&trade)).await.unwrap();

    let msg = report.user_message.as_deref().unwrap();
    assert!(msg.contains("more than the maximum number of players (15)"));
    assert_eq!(report.team(0).unwrap().roster_size, 16);
    assert!(report.team(0).unwrap().released.is_empty());

    let ai_over = report.team(1).unwrap();
    assert_eq!(ai_over.roster_size, 15);
    assert_eq!(ai_over.released.len(), 2);

    let ai_short = report.team(2).unwrap();
    assert_eq!(ai_short.roster_size, 13);
    assert_eq!(ai_short.signed.len(), 2);

    // Every AI team ends up with a rotation covering its roster.
    let snap = store.snapshot();
    for tid in [1, 2] {
        let team = snap.teams.iter().find(|t| t.tid == tid).unwrap();
        let roster = store.players_on_team(tid).await.unwrap();
        assert_eq!(team.depth[rostercraft_basketball::ROTATION].len(), roster.len());
    }

    let trade = report.trade.unwrap();
    assert_eq!(trade.tid, 1);
    assert!(trade.value_change.is_finite());

    let out = base.join("out.json");
    store.save(&out).unwrap();
    let reloaded = load_league(&out, &config).unwrap();
    assert_eq!(reloaded.players_on_team(1).await.unwrap().len(), 15);

    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn football_leagues_use_the_football_profile() {
    let base = scratch_base("football");
    let league_toml = base.join("config/league.toml");
    let text = fs::read_to_string(&league_toml).unwrap();
    let text = text.replace("sport = \"basketball\"", "sport = \"football\"");
    fs::write(&league_toml, text).unwrap();
    let config: Config = config::load_config_from(&base).unwrap();

    let store = load_league(&write_snapshot(&base), &config).unwrap();
    let report = run_pass(&store, &config, None).await.unwrap();
    assert_eq!(report.sport, "football");
    assert!(report.trade.is_none());

    let team = store.team(1).await.unwrap().unwrap();
    assert!(team.depth.contains_key("QB"));
    assert!(team.depth.contains_key("K"));

    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn unknown_sport_is_rejected() {
    let base = scratch_base("unknown_sport");
    let mut config = config::load_config_from(&base).unwrap();
    config.league.sport = "curling".into();

    let store = load_league(&write_snapshot(&base), &config).unwrap();
    let err = run_pass(&store, &config, None).await.unwrap_err();
    assert!(matches!(err, AppError::UnknownSport { ref sport } if sport == "curling"));
    assert!(err.to_string().contains("basketball, football"));

    let _ = fs::remove_dir_all(&base);
}
