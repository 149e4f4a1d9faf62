// Structural rules for a chart's leading (starter) slots.

use std::fmt;

use crate::league::Player;

/// A sport-specific constraint on who may start.
///
/// The generic greedy and swap passes never encode positional structure
/// themselves; they ask the chart's rule instead.
pub trait LineupRule: fmt::Debug + Send + Sync {
    /// Number of leading slots the rule governs.
    fn starters(&self) -> usize;

    /// Whether `candidate` may take starter slot `slot`, given the players
    /// already seated in slots `0..slot`. Must leave the remaining slots able
    /// to satisfy the rule.
    fn permits(&self, candidate: &Player, seated: &[&Player], slot: usize) -> bool;

    /// Whether a complete starting group satisfies the rule.
    fn accepts(&self, starters: &[&Player]) -> bool;

    /// Short form of the rule for log lines.
    fn describe(&self) -> String;
}

/// Bounds on how many starters may carry a positional tag.
///
/// A reusable building block for sport rules: `at_least` starters must match
/// `tag`, and at most `at_most` may.
#[derive(Debug, Clone)]
pub struct TagQuota {
    pub name: &'static str,
    pub tag: fn(&str) -> bool,
    pub at_least: usize,
    pub at_most: usize,
}

/// A rule composed from per-tag quotas over nominal positions.
#[derive(Debug, Clone)]
pub struct QuotaRule {
    pub starters: usize,
    pub quotas: Vec<TagQuota>,
}

impl QuotaRule {
    fn counts(&self, group: &[&Player]) -> Vec<usize> {
        self.quotas
            .iter()
            .map(|q| group.iter().filter(|p| (q.tag)(p.pos())).count())
            .collect()
    }
}

impl LineupRule for QuotaRule {
    fn starters(&self) -> usize {
        self.starters
    }

    fn describe(&self) -> String {
        self.quotas
            .iter()
            .map(|q| format!("{} {}..={}", q.name, q.at_least, q.at_most))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn permits(&self, candidate: &Player, seated: &[&Player], slot: usize) -> bool {
        if slot >= self.starters {
            return true;
        }
        let open_after = self.starters - slot - 1;
        let counts = self.counts(seated);

        self.quotas.iter().zip(counts).all(|(q, have)| {
            let matches = (q.tag)(candidate.pos());
            let after = have + usize::from(matches);
            after <= q.at_most && q.at_least.saturating_sub(after) <= open_after
        })
    }

    fn accepts(&self, starters: &[&Player]) -> bool {
        let counts = self.counts(starters);
        self.quotas
            .iter()
            .zip(counts)
            .all(|(q, have)| have >= q.at_least && have <= q.at_most)
    }
}
