// Team overall rating: a positionally weighted linear model fit against
// margin of victory, with replacement-level fill for empty slots and a
// decaying extrapolation over bench depth.

use std::collections::BTreeMap;

use crate::depth;
use crate::league::{Pid, Player, RatingKind};
use crate::sport::{PositionAssignment, SportProfile};

// ---------------------------------------------------------------------------
// Model types
// ---------------------------------------------------------------------------

/// Fitted weights for one position group.
#[derive(Debug, Clone)]
pub struct PositionWeights {
    /// Weight per depth index, best player first.
    pub weights: Vec<f64>,
    /// Rating assumed for a modeled slot nobody occupies.
    pub replacement: f64,
    /// Per-index decay for bench players beyond the modeled slots.
    pub depth_base: f64,
    /// Typical roster count at this position.
    pub quota: usize,
    /// Extra per-index decay once the group exceeds `quota`.
    pub overflow_penalty: f64,
}

impl PositionWeights {
    /// Weighted contribution of a group, `sorted` best first.
    ///
    /// Modeled slots score `weight * rating` with empty slots at replacement
    /// level. Bench players beyond the modeled slots (whole-roster mode only)
    /// score against replacement: a bench body below replacement level costs
    /// value, since the roster spot could hold a freely available player.
    pub fn contribution(&self, sorted: &[f64], whole_roster: bool) -> f64 {
        let mut sum = 0.0;
        for (i, w) in self.weights.iter().enumerate() {
            let rating = sorted.get(i).copied().unwrap_or(self.replacement);
            sum += w * rating;
        }

        if whole_roster {
            let min_len = self.weights.len();
            let last = self.weights.last().copied().unwrap_or(0.0);
            for (i, rating) in sorted.iter().enumerate().skip(min_len) {
                sum += self.bench_weight(i, last) * (rating - self.replacement);
            }
        }

        sum
    }

    fn bench_weight(&self, i: usize, last: f64) -> f64 {
        let min_len = self.weights.len();
        let mut w = last * self.depth_base.powi((i - min_len + 1) as i32);
        if i >= self.quota {
            w *= self.overflow_penalty.powi((i - self.quota + 1) as i32);
        }
        w
    }
}

#[derive(Debug, Clone)]
pub struct WeightTable {
    pub intercept: f64,
    pub positions: BTreeMap<String, PositionWeights>,
}

/// Maps the predicted margin onto a human-readable rating.
#[derive(Debug, Clone, Copy)]
pub enum OvrScale {
    /// `round(predicted * slope + offset)`, clamped to `[min, max]`.
    Linear {
        slope: f64,
        offset: f64,
        min: f64,
        max: f64,
    },
    Identity,
}

impl OvrScale {
    /// Linear scale onto the usual 0-100 rating range.
    pub fn percent(slope: f64, offset: f64) -> Self {
        OvrScale::Linear {
            slope,
            offset,
            min: 0.0,
            max: 100.0,
        }
    }

    pub fn apply(&self, predicted: f64) -> f64 {
        match *self {
            OvrScale::Linear {
                slope,
                offset,
                min,
                max,
            } => (predicted * slope + offset).round().clamp(min, max),
            OvrScale::Identity => predicted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OvrModel {
    pub regular: WeightTable,
    /// Alternate fit for playoff games; falls back to `regular`.
    pub playoffs: Option<WeightTable>,
    pub scale: OvrScale,
}

#[derive(Debug, Clone, Default)]
pub struct OvrOptions {
    /// Only count real players at this position; every other group is
    /// filled at replacement level.
    pub pos: Option<String>,
    pub rating: RatingKind,
    pub playoffs: bool,
    /// Extrapolate over bench depth beyond the modeled slots.
    pub whole_roster: bool,
    /// Return the unscaled predicted margin (for rankings).
    pub raw: bool,
}

impl OvrOptions {
    /// Unscaled, whole-roster prediction used for comparisons.
    pub fn ranking() -> Self {
        OvrOptions {
            whole_roster: true,
            raw: true,
            ..OvrOptions::default()
        }
    }
}

impl OvrModel {
    /// Predict from ratings already grouped by position.
    pub fn predict(&self, grouped: &BTreeMap<String, Vec<f64>>, opts: &OvrOptions) -> f64 {
        let table = match (&self.playoffs, opts.playoffs) {
            (Some(playoffs), true) => playoffs,
            _ => &self.regular,
        };

        let mut predicted = table.intercept;
        for (pos, weights) in &table.positions {
            let counted = opts.pos.as_deref().map_or(true, |only| only == pos);
            let mut ratings = if counted {
                grouped.get(pos).cloned().unwrap_or_default()
            } else {
                Vec::new()
            };
            ratings.sort_by(|a, b| b.total_cmp(a));
            predicted += weights.contribution(&ratings, opts.whole_roster);
        }

        if opts.raw {
            predicted
        } else {
            self.scale.apply(predicted)
        }
    }
}

// ---------------------------------------------------------------------------
// Roster entry points
// ---------------------------------------------------------------------------

/// Group each player's rating under the position they were assigned.
pub fn group_ratings(
    players: &[Player],
    assignment: &BTreeMap<Pid, String>,
    kind: RatingKind,
) -> BTreeMap<String, Vec<f64>> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for p in players {
        if let Some(pos) = assignment.get(&p.pid) {
            grouped
                .entry(pos.clone())
                .or_default()
                .push(p.rating_at(pos, kind));
        }
    }
    grouped
}

/// Assign every player to exactly one rating-model position.
pub fn assign_positions(
    players: &[Player],
    profile: &SportProfile,
    season: u16,
) -> BTreeMap<Pid, String> {
    match &profile.assignment {
        PositionAssignment::Pooled { group } => {
            players.iter().map(|p| (p.pid, group.clone())).collect()
        }
        PositionAssignment::Lineup(spec) => {
            let pool: Vec<&Player> = players.iter().collect();
            let seats = depth::optimize(&pool, spec, season);

            let mut assignment: BTreeMap<Pid, String> = seats
                .iter()
                .enumerate()
                .map(|(i, &pid)| (pid, spec.slot_pos(i).to_string()))
                .collect();
            for p in players {
                assignment
                    .entry(p.pid)
                    .or_insert_with(|| p.pos().to_string());
            }
            assignment
        }
    }
}

/// Team rating for a roster under a sport profile.
pub fn team_ovr(players: &[Player], profile: &SportProfile, opts: &OvrOptions, season: u16) -> f64 {
    let assignment = assign_positions(players, profile, season);
    let grouped = group_ratings(players, &assignment, opts.rating);
    profile.ovr.predict(&grouped, opts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
