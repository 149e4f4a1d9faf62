// Fitted per-position weights for the football rating model.

use std::collections::BTreeMap;

use rostercraft_core::ovr::{OvrModel, OvrScale, PositionWeights, WeightTable};

/// Rating assumed for an unfilled starting spot.
pub const REPLACEMENT_RATING: f64 = 35.0;

/// Rating every weighted starter would need for a zero predicted margin.
const NEUTRAL_RATING: f64 = 50.0;

/// (position, starter weights, typical roster count)
const FITTED: [(&str, &[f64], usize); 11] = [
    ("QB", &[0.124], 3),
    ("RB", &[0.028], 4),
    ("TE", &[0.012], 3),
    ("WR", &[0.046, 0.024, 0.012], 6),
    ("OL", &[0.030, 0.026, 0.024, 0.022, 0.020], 9),
    ("CB", &[0.016, 0.012], 5),
    ("S", &[0.012, 0.010, 0.006], 4),
    ("LB", &[0.010, 0.006], 7),
    ("DL", &[0.034, 0.026, 0.020, 0.014], 9),
    ("K", &[0.008], 1),
    ("P", &[0.004], 1),
];

pub fn ovr_model() -> OvrModel {
    let mut positions = BTreeMap::new();
    let mut total = 0.0;
    for (pos, weights, quota) in FITTED {
        total += weights.iter().sum::<f64>();
        positions.insert(
            pos.to_string(),
            PositionWeights {
                weights: weights.to_vec(),
                replacement: REPLACEMENT_RATING,
                depth_base: 0.1,
                quota,
                overflow_penalty: 0.5,
            },
        );
    }

    OvrModel {
        regular: WeightTable {
            intercept: -total * NEUTRAL_RATING,
            positions,
        },
        playoffs: None,
        scale: OvrScale::percent(3.0, 50.0),
    }
}
