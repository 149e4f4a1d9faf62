// Greedy slot filling followed by seeded pairwise-swap local search.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::ChartSpec;
use crate::league::{Pid, Player, RatingKind};

/// Upper bound on local-search passes.
pub const MAX_PASSES: usize = 5;

/// A swap must beat the current pairing by more than this.
const SWAP_EPSILON: f64 = 1e-9;

fn score(p: &Player, pos: &str) -> f64 {
    p.rating_at(pos, RatingKind::Current)
}

/// Seed for one local-search pass. Season and pass never collide.
fn pass_seed(season: u16, pass: usize) -> u64 {
    (u64::from(season) << 8) | pass as u64
}

/// Fill the chart's required slots in priority order, then (for whole-roster
/// charts) append everyone left over by the fallback score.
///
/// Ties go to the lower pid so output never depends on input order.
pub fn greedy(pool: &[&Player], spec: &ChartSpec) -> Vec<Pid> {
    let mut remaining: Vec<&Player> = pool.to_vec();
    remaining.sort_by_key(|p| p.pid);

    let mut seated: Vec<&Player> = Vec::with_capacity(spec.slots.len());

    for (slot, pos) in spec.slots.iter().enumerate() {
        if remaining.is_empty() {
            break;
        }

        let best_where = |allowed: &dyn Fn(&Player) -> bool| {
            remaining
                .iter()
                .enumerate()
                .filter(|(_, p)| allowed(p))
                .max_by(|(_, a), (_, b)| {
                    score(a, pos)
                        .total_cmp(&score(b, pos))
                        .then_with(|| b.pid.cmp(&a.pid))
                })
                .map(|(idx, _)| idx)
        };

        let permitted = match &spec.rule {
            Some(rule) => best_where(&|p: &Player| rule.permits(p, &seated, slot)),
            None => best_where(&|_: &Player| true),
        };
        let idx = match permitted {
            Some(idx) => idx,
            None => {
                if let Some(rule) = &spec.rule {
                    debug!(
                        "chart {}: no candidate for slot {} satisfies [{}], taking best available",
                        spec.key,
                        slot,
                        rule.describe()
                    );
                }
                match best_where(&|_: &Player| true) {
                    Some(idx) => idx,
                    None => break,
                }
            }
        };
        seated.push(remaining.remove(idx));
    }

    let mut seats: Vec<Pid> = seated.iter().map(|p| p.pid).collect();

    if spec.whole_roster {
        remaining.sort_by(|a, b| {
            score(b, &spec.fallback)
                .total_cmp(&score(a, &spec.fallback))
                .then_with(|| a.pid.cmp(&b.pid))
        });
        seats.extend(remaining.iter().map(|p| p.pid));
    }

    seats
}

/// Improve an assignment by swapping pairs among the first `testable` seats
/// when the swap strictly raises the pair's combined positional score.
///
/// Pair order is shuffled per pass from a season-derived seed, so results are
/// reproducible for a given season. Stops after a pass with no swaps or after
/// [`MAX_PASSES`]. Returns the number of swaps made.
pub fn refine(
    seats: &mut [Pid],
    lookup: &HashMap<Pid, &Player>,
    spec: &ChartSpec,
    season: u16,
) -> usize {
    let n = spec.testable.min(seats.len());
    if n < 2 {
        return 0;
    }

    let mut pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let mut total = 0;
    for pass in 0..MAX_PASSES {
        let mut rng = ChaCha8Rng::seed_from_u64(pass_seed(season, pass));
        pairs.shuffle(&mut rng);

        let mut swaps = 0;
        for &(i, j) in &pairs {
            let (Some(a), Some(b)) = (lookup.get(&seats[i]), lookup.get(&seats[j])) else {
                continue;
            };
            let (pos_i, pos_j) = (spec.slot_pos(i), spec.slot_pos(j));
            let before = score(a, pos_i) + score(b, pos_j);
            let after = score(a, pos_j) + score(b, pos_i);
            if after <= before + SWAP_EPSILON {
                continue;
            }

            seats.swap(i, j);
            if !spec.starters_legal(seats, lookup) {
                seats.swap(i, j);
                continue;
            }
            swaps += 1;
        }

        total += swaps;
        if swaps == 0 {
            break;
        }
    }

    total
}

/// Greedy construction plus local search for one chart.
pub fn optimize(pool: &[&Player], spec: &ChartSpec, season: u16) -> Vec<Pid> {
    let lookup: HashMap<Pid, &Player> = pool.iter().map(|p| (p.pid, *p)).collect();
    let mut seats = greedy(pool, spec);
    let swaps = refine(&mut seats, &lookup, spec, season);
    if swaps > 0 {
        debug!("chart {}: local search made {} swaps", spec.key, swaps);
    }
    seats
}
