// Basketball sport profile: a pooled ten-deep rating model and a five-man
// rotation with positional balance rules.

pub mod positions;

use std::collections::BTreeMap;
use std::sync::Arc;

use rostercraft_core::depth::ChartSpec;
use rostercraft_core::league::OVERALL;
use rostercraft_core::ovr::{OvrModel, OvrScale, PositionWeights, WeightTable};
use rostercraft_core::sport::{PositionAssignment, ReplacementLevel, SportProfile};

pub use positions::{is_forward_or_center, is_guard, is_pure_center, starting_rule, POSITIONS};

/// Key of the single depth chart basketball teams keep.
pub const ROTATION: &str = "rotation";

pub const STARTERS: usize = 5;

/// Players the rating model weighs explicitly.
const MODELED_DEPTH: usize = 10;

const INTERCEPT: f64 = -124.13;
const REGULAR_A: f64 = 0.4417;
const REGULAR_B: f64 = -0.1905;
const PLAYOFF_A: f64 = 0.591;
const PLAYOFF_B: f64 = -0.3;

/// Rating assumed for an empty roster spot.
const REPLACEMENT_RATING: f64 = 42.0;

/// `a * exp(b * i)` for each modeled depth index.
fn decaying_weights(a: f64, b: f64) -> Vec<f64> {
    (0..MODELED_DEPTH).map(|i| a * (b * i as f64).exp()).collect()
}

fn table(a: f64, b: f64) -> WeightTable {
    let mut positions = BTreeMap::new();
    positions.insert(
        OVERALL.to_string(),
        PositionWeights {
            weights: decaying_weights(a, b),
            replacement: REPLACEMENT_RATING,
            depth_base: 0.5,
            quota: 13,
            overflow_penalty: 0.5,
        },
    );
    WeightTable {
        intercept: INTERCEPT,
        positions,
    }
}

/// Margin-of-victory model over the ten best players, mapped so a
/// league-average team rates 50 and each 15 points of margin is 50 rating,
/// clamped to 0-100.
pub fn ovr_model() -> OvrModel {
    OvrModel {
        regular: table(REGULAR_A, REGULAR_B),
        playoffs: Some(table(PLAYOFF_A, PLAYOFF_B)),
        scale: OvrScale::percent(50.0 / 15.0, 50.0),
    }
}

pub fn rotation_chart() -> ChartSpec {
    ChartSpec::lineup(ROTATION, vec![OVERALL.to_string(); STARTERS])
        .with_whole_roster(true)
        .with_rule(Arc::new(starting_rule()))
}

pub fn profile() -> SportProfile {
    SportProfile {
        name: "basketball".into(),
        charts: vec![rotation_chart()],
        assignment: PositionAssignment::Pooled {
            group: OVERALL.to_string(),
        },
        ovr: ovr_model(),
        position_floors: BTreeMap::new(),
        value_exponent: 2.0,
        replacement: ReplacementLevel {
            pos: "F".into(),
            rating: REPLACEMENT_RATING,
            value: 40.0,
            age: 27,
        },
    }
}
