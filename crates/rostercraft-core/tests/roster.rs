mod common;

use common::{memory, player, profile, settings, team, SEASON};
use rostercraft_core::config::LeagueRules;
use rostercraft_core::league::{Pid, Player, Strategy, FREE_AGENT};
use rostercraft_core::roster::{enforce_roster_size, RosterScope};
use rostercraft_core::store::{LeagueSnapshot, LeagueStore, MemoryLeague};

fn rules(min: usize, max: usize) -> LeagueRules {
    LeagueRules {
        min_roster: min,
        max_roster: max,
        ..LeagueRules::default()
    }
}

fn league_with(players: Vec<Player>, user_tids: Vec<i32>, rules: LeagueRules) -> MemoryLeague {
    memory(LeagueSnapshot {
        settings: settings(user_tids, rules),
        teams: vec![team(0, Strategy::Contending), team(1, Strategy::Rebuilding)],
        players,
        draft_picks: vec![],
        renormalized: vec![],
    })
}

#[tokio::test]
async fn oversized_ai_roster_sheds_its_least_valuable_players() {
    // Values in scrambled order so input order does not line up with value.
    let players: Vec<Player> = (0..24)
        .map(|i| player(i, 1, 30.0 + f64::from((i * 7) % 24)))
        .collect();
    let store = league_with(players.clone(), vec![0], rules(5, 15));

    enforce_roster_size(&store, &profile(), RosterScope::Other).await.unwrap();

    let kept = store.players_on_team(1).await.unwrap();
    assert_eq!(kept.len(), 15);

    let kept_pids: Vec<Pid> = kept.iter().map(|p| p.pid).collect();
    let released: Vec<&Player> = players.iter().filter(|p| !kept_pids.contains(&p.pid)).collect();
    assert_eq!(released.len(), 9);

    let worst_kept = kept.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let best_released = released.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    assert!(best_released <= worst_kept);

    // Released players are free agents with renormalized demands.
    let snap = store.snapshot();
    assert_eq!(snap.renormalized.len(), 9);
    for p in released {
        assert_eq!(store.player(p.pid).await.unwrap().unwrap().tid, FREE_AGENT);
    }
}

#[tokio::test]
async fn short_ai_roster_signs_exactly_the_shortfall_at_the_minimum() {
    let mut players: Vec<Player> = (0..10).map(|i| player(i, 1, 50.0)).collect();
    // Cheap free agents, best last.
    for (i, value) in [41.0, 44.0, 47.0, 38.0, 52.0].into_iter().enumerate() {
        let mut fa = player(100 + i as Pid, FREE_AGENT, value);
        fa.contract.amount = 900.0;
        players.push(fa);
    }
    let r = rules(13, 15);
    let min_contract = r.min_contract;
    let store = league_with(players, vec![0], r);

    enforce_roster_size(&store, &profile(), RosterScope::Other).await.unwrap();

    let roster = store.players_on_team(1).await.unwrap();
    assert_eq!(roster.len(), 13);
    let mut signed: Vec<&Player> = roster.iter().filter(|p| p.pid >= 100).collect();
    signed.sort_by_key(|p| p.pid);
    assert_eq!(signed.len(), 3);
    for p in &signed {
        assert_eq!(p.contract.amount, min_contract);
        assert_eq!(p.contract.exp, SEASON);
    }
    // The three most valuable cheap agents: 52, 47, 44.
    let pids: Vec<Pid> = signed.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![101, 102, 104]);
    assert_eq!(store.free_agents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn user_scope_leaves_ai_teams_alone() {
    let players: Vec<Player> = (0..20).map(|i| player(i, 1, 50.0)).collect();
    let store = league_with(players, vec![0], rules(0, 15));

    let msg = enforce_roster_size(&store, &profile(), RosterScope::User).await.unwrap();
    assert!(msg.is_none());
    assert_eq!(store.players_on_team(1).await.unwrap().len(), 20);
}

#[tokio::test]
async fn every_user_team_is_named_when_several_are_short() {
    let store = league_with(vec![player(0, 1, 50.0)], vec![0, 1], rules(2, 15));

    let msg = enforce_roster_size(&store, &profile(), RosterScope::User)
        .await
        .unwrap()
        .unwrap();
    assert!(msg.starts_with("Your team (City Team 0)"), "{msg}");
    assert!(msg.contains("less than the minimum number of players (2)"));
}
