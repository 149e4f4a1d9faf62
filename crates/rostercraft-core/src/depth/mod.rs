// Depth charts: per-chart slot schemas, full recomputation through the
// optimizer, and incremental insertion of newly acquired players.

pub mod optimizer;
pub mod rules;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::league::{DepthChart, Pid, Player, RatingKind};
use crate::sport::SportProfile;

pub use optimizer::optimize;
pub use rules::{LineupRule, QuotaRule, TagQuota};

// ---------------------------------------------------------------------------
// Chart schema
// ---------------------------------------------------------------------------

/// One ordered depth chart a team maintains.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Key under which the chart is stored on the team.
    pub key: String,
    /// Position scored at each required slot, in priority order.
    pub slots: Vec<String>,
    /// Position used to score everyone past the required slots.
    pub fallback: String,
    /// Sizes of the leading tiers (e.g. starters, rotation). Everything past
    /// the last tier forms one unbounded bucket.
    pub buckets: Vec<usize>,
    /// Number of leading slots the swap search may rearrange.
    pub testable: usize,
    /// Whether the chart lists the whole roster or only the required slots.
    pub whole_roster: bool,
    pub rule: Option<Arc<dyn LineupRule>>,
}

impl ChartSpec {
    /// A single-position chart listing the whole roster, `starters` deep.
    pub fn ordered(pos: &str, starters: usize) -> Self {
        ChartSpec {
            key: pos.to_string(),
            slots: vec![pos.to_string(); starters],
            fallback: pos.to_string(),
            buckets: vec![starters],
            testable: 0,
            whole_roster: true,
            rule: None,
        }
    }

    /// A cross-position lineup covering exactly `slots`.
    pub fn lineup(key: &str, slots: Vec<String>) -> Self {
        let fallback = slots.first().cloned().unwrap_or_default();
        let n = slots.len();
        ChartSpec {
            key: key.to_string(),
            slots,
            fallback,
            buckets: vec![n],
            testable: n,
            whole_roster: false,
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: Arc<dyn LineupRule>) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn with_buckets(mut self, buckets: Vec<usize>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_whole_roster(mut self, whole_roster: bool) -> Self {
        self.whole_roster = whole_roster;
        self
    }

    /// Position a player seated at index `i` is scored at.
    pub fn slot_pos(&self, i: usize) -> &str {
        self.slots.get(i).unwrap_or(&self.fallback)
    }

    /// Number of leading slots governed by the lineup rule.
    pub fn starters(&self) -> usize {
        self.rule
            .as_ref()
            .map_or(self.slots.len(), |r| r.starters())
    }

    /// Whether the leading seats satisfy the chart's lineup rule. A chart
    /// without a rule, or with too few seats to field a lineup, always passes.
    pub fn starters_legal(&self, seats: &[Pid], lookup: &HashMap<Pid, &Player>) -> bool {
        let Some(rule) = &self.rule else {
            return true;
        };
        let n = rule.starters();
        if seats.len() < n {
            return true;
        }
        let starters: Vec<&Player> = seats[..n]
            .iter()
            .filter_map(|pid| lookup.get(pid).copied())
            .collect();
        starters.len() < n || rule.accepts(&starters)
    }

    /// Exclusive end index of the bucket containing `i`, or `None` for the
    /// trailing unbounded bucket.
    fn bucket_end(&self, i: usize) -> Option<usize> {
        let mut end = 0;
        for size in &self.buckets {
            end += size;
            if i < end {
                return Some(end);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Chart computation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct DepthOptions {
    /// Keep the existing order and only seat players missing from it.
    pub only_new_players: bool,
    /// Recompute only these chart keys; other charts are returned unchanged.
    pub position_filter: Option<Vec<String>>,
}

/// Recompute a team's depth charts for the given roster.
///
/// Players no longer on the roster are dropped first. Charts outside the
/// position filter are carried over untouched.
pub fn compute_depth_chart(
    players: &[Player],
    current: &DepthChart,
    profile: &SportProfile,
    opts: &DepthOptions,
    season: u16,
) -> DepthChart {
    let lookup: HashMap<Pid, &Player> = players.iter().map(|p| (p.pid, p)).collect();
    let pool: Vec<&Player> = players.iter().collect();

    let mut updated = current.clone();
    for spec in &profile.charts {
        let selected = opts
            .position_filter
            .as_ref()
            .map_or(true, |keys| keys.iter().any(|k| *k == spec.key));
        if !selected {
            continue;
        }

        let existing = current.get(&spec.key);
        let seats = match existing {
            Some(order) if opts.only_new_players => {
                let mut kept: Vec<Pid> = order
                    .iter()
                    .copied()
                    .filter(|pid| lookup.contains_key(pid))
                    .collect();
                insert_new(&mut kept, &pool, &lookup, spec);
                kept
            }
            _ => optimize(&pool, spec, season),
        };
        updated.insert(spec.key.clone(), seats);
    }

    updated
}

/// Seat every roster player missing from `chart` at the shallowest slot where
/// they outscore the incumbent. The incumbent moves to the end of its bucket's
/// range so displaced players cascade down a tier instead of leaving the chart.
fn insert_new(
    chart: &mut Vec<Pid>,
    pool: &[&Player],
    lookup: &HashMap<Pid, &Player>,
    spec: &ChartSpec,
) {
    let present: BTreeSet<Pid> = chart.iter().copied().collect();
    let mut newcomers: Vec<&Player> = pool
        .iter()
        .copied()
        .filter(|p| !present.contains(&p.pid))
        .collect();
    newcomers.sort_by(|a, b| {
        b.rating_at(&spec.fallback, RatingKind::Current)
            .total_cmp(&a.rating_at(&spec.fallback, RatingKind::Current))
            .then_with(|| a.pid.cmp(&b.pid))
    });

    let starters = spec.starters();
    for newcomer in newcomers {
        let target = chart.iter().enumerate().position(|(i, pid)| {
            let Some(incumbent) = lookup.get(pid) else {
                return true;
            };
            let pos = spec.slot_pos(i);
            if newcomer.rating_at(pos, RatingKind::Current)
                <= incumbent.rating_at(pos, RatingKind::Current)
            {
                return false;
            }
            if i < starters {
                let mut trial = chart.clone();
                trial[i] = newcomer.pid;
                return spec.starters_legal(&trial, lookup);
            }
            true
        });

        match target {
            Some(i) => match spec.bucket_end(i) {
                Some(end) => {
                    let incumbent = chart[i];
                    chart[i] = newcomer.pid;
                    chart.insert(end.min(chart.len()), incumbent);
                }
                None => chart.insert(i, newcomer.pid),
            },
            None => chart.push(newcomer.pid),
        }
    }

    if !spec.whole_roster {
        chart.truncate(spec.slots.len());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
