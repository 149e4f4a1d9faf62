// Sport profiles known to the driver.

use rostercraft_core::sport::SportProfile;

pub const SPORTS: [&str; 2] = ["basketball", "football"];

/// Profile for a sport name from `league.toml`, case-insensitive.
pub fn profile_for(sport: &str) -> Option<SportProfile> {
    match sport.to_ascii_lowercase().as_str() {
        "basketball" => Some(rostercraft_basketball::profile()),
        "football" => Some(rostercraft_football::profile()),
        _ => None,
    }
}
