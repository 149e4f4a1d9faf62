// Asset value normalization: league-wide z-scores and contract value.

use crate::config::{LeagueRules, NormalizerConfig};
use crate::league::{Contract, Player};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation of a quality score across the league.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// is every rostered player in the league rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Pool statistics for both quality scores a player carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueValueStats {
    /// Over `value` (current ability plus potential).
    pub value: PoolStats,
    /// Over `value_no_pot` (current ability only).
    pub skill: PoolStats,
}

impl LeagueValueStats {
    pub fn from_players<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let (values, skills): (Vec<f64>, Vec<f64>) =
            players.into_iter().map(|p| (p.value, p.value_no_pot)).unzip();
        LeagueValueStats {
            value: compute_pool_stats(&values),
            skill: compute_pool_stats(&skills),
        }
    }

    pub fn value_z(&self, raw: f64) -> f64 {
        compute_zscore(raw, &self.value)
    }

    pub fn skill_z(&self, raw: f64) -> f64 {
        compute_zscore(raw, &self.skill)
    }
}

// ---------------------------------------------------------------------------
// Contract value
// ---------------------------------------------------------------------------

/// Salary a player of normalized value `z` would be expected to earn: linear
/// between the normalizer anchors, pinned to the league contract bounds.
pub fn expected_salary(z: f64, normalizer: &NormalizerConfig, rules: &LeagueRules) -> f64 {
    let span = normalizer.max_value_anchor - normalizer.min_value_anchor;
    let t = ((z - normalizer.min_value_anchor) / span).clamp(0.0, 1.0);
    rules.min_contract + t * (rules.max_contract - rules.min_contract)
}

/// Signed surplus of a contract relative to the player's value, as a
/// fraction of the salary cap.
///
/// Zero for a contract that expires in `contract_season` or earlier. Capped
/// above at `normalizer.contract_value_cap`; there is no lower cap.
pub fn contract_value(
    contract: &Contract,
    z: f64,
    contract_season: u16,
    normalizer: &NormalizerConfig,
    rules: &LeagueRules,
) -> f64 {
    if contract.exp <= contract_season {
        return 0.0;
    }
    let expected = expected_salary(z, normalizer, rules);
    let surplus = (expected - contract.amount) / rules.salary_cap;
    surplus.min(normalizer.contract_value_cap)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
