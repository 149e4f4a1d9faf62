// Football sport profile: one depth chart per position, a cross-position
// starting lineup that decides where each player counts for the rating
// model, and roster floors for thin positions.

pub mod weights;

use std::collections::BTreeMap;

use rostercraft_core::depth::ChartSpec;
use rostercraft_core::sport::{PositionAssignment, ReplacementLevel, SportProfile};

pub use weights::ovr_model;

/// Positions with their starter counts, in depth-chart display order.
pub const POSITIONS: [(&str, usize); 11] = [
    ("QB", 1),
    ("RB", 1),
    ("WR", 3),
    ("TE", 1),
    ("OL", 5),
    ("DL", 4),
    ("LB", 3),
    ("CB", 2),
    ("S", 3),
    ("K", 1),
    ("P", 1),
];

/// Key of the cross-position lineup used for rating assignment.
pub const LINEUP: &str = "lineup";

/// Lineup slots in fill priority: scarce, high-leverage spots first so a
/// versatile player lands where he matters most.
pub fn lineup_slots() -> Vec<String> {
    let order: [(&str, usize); 11] = [
        ("QB", 1),
        ("K", 1),
        ("P", 1),
        ("RB", 1),
        ("TE", 1),
        ("WR", 3),
        ("OL", 5),
        ("DL", 4),
        ("LB", 3),
        ("CB", 2),
        ("S", 3),
    ];
    order
        .iter()
        .flat_map(|(pos, n)| std::iter::repeat(pos.to_string()).take(*n))
        .collect()
}

pub fn position_charts() -> Vec<ChartSpec> {
    POSITIONS
        .iter()
        .map(|(pos, starters)| ChartSpec::ordered(pos, *starters))
        .collect()
}

pub fn lineup_chart() -> ChartSpec {
    ChartSpec::lineup(LINEUP, lineup_slots())
}

pub fn profile() -> SportProfile {
    let mut floors = BTreeMap::new();
    floors.insert("QB".to_string(), 2);
    floors.insert("K".to_string(), 1);
    floors.insert("P".to_string(), 1);

    SportProfile {
        name: "football".into(),
        charts: position_charts(),
        assignment: PositionAssignment::Lineup(lineup_chart()),
        ovr: ovr_model(),
        position_floors: floors,
        value_exponent: 1.5,
        replacement: ReplacementLevel {
            pos: "LB".into(),
            rating: weights::REPLACEMENT_RATING,
            value: 38.0,
            age: 26,
        },
    }
}
