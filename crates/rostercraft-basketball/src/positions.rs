// Position eligibility and the starting-five balance rule.

use rostercraft_core::depth::{QuotaRule, TagQuota};

pub const POSITIONS: [&str; 9] = ["PG", "SG", "G", "GF", "SF", "F", "PF", "FC", "C"];

pub fn is_guard(pos: &str) -> bool {
    pos.contains('G')
}

pub fn is_forward_or_center(pos: &str) -> bool {
    pos.contains('F') || pos.contains('C')
}

pub fn is_pure_center(pos: &str) -> bool {
    pos == "C"
}

/// At least two guard-eligible and two forward/center-eligible starters,
/// never more than one pure center.
pub fn starting_rule() -> QuotaRule {
    QuotaRule {
        starters: super::STARTERS,
        quotas: vec![
            TagQuota {
                name: "guards",
                tag: is_guard,
                at_least: 2,
                at_most: super::STARTERS,
            },
            TagQuota {
                name: "forwards/centers",
                tag: is_forward_or_center,
                at_least: 2,
                at_most: super::STARTERS,
            },
            TagQuota {
                name: "pure centers",
                tag: is_pure_center,
                at_least: 0,
                at_most: 1,
            },
        ],
    }
}
