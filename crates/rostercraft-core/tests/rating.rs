mod common;

use common::{player, profile_with, SEASON};
use rostercraft_core::league::{Pid, Player};
use rostercraft_core::ovr::{team_ovr, OvrOptions};

fn roster(values: &[f64]) -> Vec<Player> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| player(i as Pid, 0, v))
        .collect()
}

#[test]
fn bench_below_replacement_lowers_the_rating() {
    // Replacement at 60 with a steep bench decay.
    let prof = profile_with(60.0, 0.1);
    let full = roster(&[80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0, 35.0]);
    let top_five = roster(&[80.0, 75.0, 70.0, 65.0, 60.0]);

    let opts = OvrOptions::ranking();
    let with_bench = team_ovr(&full, &prof, &opts, SEASON);
    let without = team_ovr(&top_five, &prof, &opts, SEASON);
    assert!(with_bench < without, "{with_bench} vs {without}");
}

#[test]
fn bench_above_replacement_raises_the_rating() {
    let prof = profile_with(30.0, 0.1);
    let full = roster(&[80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0]);
    let top_five = roster(&[80.0, 75.0, 70.0, 65.0, 60.0]);

    let opts = OvrOptions::ranking();
    assert!(team_ovr(&full, &prof, &opts, SEASON) > team_ovr(&top_five, &prof, &opts, SEASON));
}

#[test]
fn starters_only_rating_ignores_the_bench() {
    let prof = profile_with(60.0, 0.1);
    let full = roster(&[80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0, 35.0]);
    let top_five = roster(&[80.0, 75.0, 70.0, 65.0, 60.0]);

    let opts = OvrOptions::default();
    assert_eq!(
        team_ovr(&full, &prof, &opts, SEASON),
        team_ovr(&top_five, &prof, &opts, SEASON)
    );
}
