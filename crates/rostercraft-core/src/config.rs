// Configuration loading and parsing (league.toml, valuation.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::league::{Strategy, Tid};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub valuation: ValuationConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Sport profile to load ("basketball", "football").
    pub sport: String,
    /// Human-controlled teams.
    #[serde(default)]
    pub user_tids: Vec<Tid>,
    pub rules: LeagueRules,
}

/// League rules the engine enforces and values against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueRules {
    pub min_roster: usize,
    pub max_roster: usize,
    pub salary_cap: f64,
    pub min_contract: f64,
    pub max_contract: f64,
    pub num_games: u32,
    pub draft_rounds: u8,
    /// 0 is normal; negative is easier, positive is harder for the user.
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default = "default_rookie_contract_years")]
    pub rookie_contract_years: u16,
    #[serde(default = "default_draft_age")]
    pub draft_age: u16,
}

fn default_rookie_contract_years() -> u16 {
    3
}

fn default_draft_age() -> u16 {
    20
}

impl Default for LeagueRules {
    fn default() -> Self {
        LeagueRules {
            min_roster: 13,
            max_roster: 15,
            salary_cap: 140_000.0,
            min_contract: 1_100.0,
            max_contract: 47_000.0,
            num_games: 82,
            draft_rounds: 2,
            difficulty: 0.0,
            rookie_contract_years: default_rookie_contract_years(),
            draft_age: default_draft_age(),
        }
    }
}

// ---------------------------------------------------------------------------
// valuation.toml structs
// ---------------------------------------------------------------------------

/// Tuning constants for the valuation engine. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub normalizer: NormalizerConfig,
    pub picks: PickConfig,
    pub projection: ProjectionConfig,
    pub strategy: StrategySection,
    pub fudge: FudgeConfig,
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Normalized value whose expected salary is the league minimum.
    pub min_value_anchor: f64,
    /// Normalized value whose expected salary is the league maximum.
    pub max_value_anchor: f64,
    /// Upper bound on a contract value, as a fraction of the salary cap.
    pub contract_value_cap: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            min_value_anchor: -0.5,
            max_value_anchor: 2.5,
            contract_value_cap: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Trades giving up more picks than this are rejected outright.
    pub max_picks_given_up: usize,
    pub too_many_picks_value: f64,
    /// Seasons ahead at which an estimate is fully regressed.
    pub regression_horizon: u16,
    /// Regression target for picks originally owned by a user team, as a
    /// fraction of the number of teams.
    pub user_regression_fraction: f64,
    pub other_regression_fraction: f64,
    /// Slots per season ahead that a future pick moves when dealing with a
    /// user team: later for picks received, earlier for picks given up.
    pub user_partner_slot_shift: f64,
    pub value_floor: f64,
    pub tiebreak_epsilon: f64,
    /// Raw value used when no curve has an entry for a slot.
    pub fallback_value: f64,
    /// Raw prospect values by overall slot, used when a season has no class.
    pub default_curve: Vec<f64>,
    /// First-pick rookie salary as a fraction of the salary cap.
    pub rookie_top_cap_fraction: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        PickConfig {
            max_picks_given_up: 4,
            too_many_picks_value: -1000.0,
            regression_horizon: 5,
            user_regression_fraction: 0.75,
            other_regression_fraction: 0.25,
            user_partner_slot_shift: 1.0,
            value_floor: 0.01,
            tiebreak_epsilon: 1e-6,
            fallback_value: 40.0,
            default_curve: vec![
                70.0, 66.0, 63.0, 61.0, 59.0, 57.5, 56.0, 55.0, 54.0, 53.0, 52.0, 51.0, 50.5,
                50.0, 49.5, 49.0, 48.5, 48.0, 47.5, 47.0, 46.5, 46.0, 45.5, 45.0, 44.5, 44.0,
                43.5, 43.0, 42.5, 42.0,
            ],
            rookie_top_cap_fraction: 0.06,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Raw team-rating difference that maps to one logistic unit of
    /// projected win fraction.
    pub ovr_spread: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig { ovr_spread: 10.0 }
    }
}

/// Per-strategy reweighting applied when summing assets.
#[derive(Debug, Clone)]
pub struct StrategyWeights {
    /// Weight on current ability; the rest goes to value including potential.
    pub skill_weight: f64,
    /// Multiplier on contract value.
    pub contract_weight: f64,
    pub young_age: u16,
    pub young_factor: f64,
    pub old_age: u16,
    pub old_factor: f64,
    pub pick_factor: f64,
    /// Per season-ahead multiplier on draft pick value.
    pub pick_season_discount: f64,
    pub injury_weight: f64,
    /// Weight on the raw team-rating change of the trade.
    pub roster_fit_weight: f64,
}

impl StrategyWeights {
    pub fn contending() -> Self {
        StrategyWeights {
            skill_weight: 0.7,
            contract_weight: 0.5,
            young_age: 22,
            young_factor: 0.9,
            old_age: 32,
            old_factor: 1.0,
            pick_factor: 0.8,
            pick_season_discount: 0.95,
            injury_weight: 1.0,
            roster_fit_weight: 0.05,
        }
    }

    pub fn rebuilding() -> Self {
        StrategyWeights {
            skill_weight: 0.3,
            contract_weight: 2.0,
            young_age: 22,
            young_factor: 1.1,
            old_age: 29,
            old_factor: 0.85,
            pick_factor: 1.1,
            pick_season_discount: 1.0,
            injury_weight: 0.5,
            roster_fit_weight: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "StrategySectionFile")]
pub struct StrategySection {
    pub contending: StrategyWeights,
    pub rebuilding: StrategyWeights,
}

/// A `[strategy.*]` table as written; unset keys keep the built-in weights
/// for that strategy.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrategyOverrides {
    skill_weight: Option<f64>,
    contract_weight: Option<f64>,
    young_age: Option<u16>,
    young_factor: Option<f64>,
    old_age: Option<u16>,
    old_factor: Option<f64>,
    pick_factor: Option<f64>,
    pick_season_discount: Option<f64>,
    injury_weight: Option<f64>,
    roster_fit_weight: Option<f64>,
}

impl StrategyOverrides {
    fn apply(self, base: StrategyWeights) -> StrategyWeights {
        StrategyWeights {
            skill_weight: self.skill_weight.unwrap_or(base.skill_weight),
            contract_weight: self.contract_weight.unwrap_or(base.contract_weight),
            young_age: self.young_age.unwrap_or(base.young_age),
            young_factor: self.young_factor.unwrap_or(base.young_factor),
            old_age: self.old_age.unwrap_or(base.old_age),
            old_factor: self.old_factor.unwrap_or(base.old_factor),
            pick_factor: self.pick_factor.unwrap_or(base.pick_factor),
            pick_season_discount: self
                .pick_season_discount
                .unwrap_or(base.pick_season_discount),
            injury_weight: self.injury_weight.unwrap_or(base.injury_weight),
            roster_fit_weight: self.roster_fit_weight.unwrap_or(base.roster_fit_weight),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrategySectionFile {
    contending: StrategyOverrides,
    rebuilding: StrategyOverrides,
}

impl From<StrategySectionFile> for StrategySection {
    fn from(file: StrategySectionFile) -> Self {
        StrategySection {
            contending: file.contending.apply(StrategyWeights::contending()),
            rebuilding: file.rebuilding.apply(StrategyWeights::rebuilding()),
        }
    }
}

impl Default for StrategySection {
    fn default() -> Self {
        StrategySection {
            contending: StrategyWeights::contending(),
            rebuilding: StrategyWeights::rebuilding(),
        }
    }
}

impl StrategySection {
    pub fn for_strategy(&self, strategy: Strategy) -> &StrategyWeights {
        match strategy {
            Strategy::Contending => &self.contending,
            Strategy::Rebuilding => &self.rebuilding,
        }
    }
}

/// How much an AI team overvalues assets it gives away.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FudgeConfig {
    pub base: f64,
    pub per_difficulty: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for FudgeConfig {
    fn default() -> Self {
        FudgeConfig {
            base: 0.05,
            per_difficulty: 0.05,
            min: 0.025,
            max: 0.10,
        }
    }
}

impl FudgeConfig {
    /// Multiplier applied to positive-valued assets an AI team removes.
    pub fn factor(&self, difficulty: f64) -> f64 {
        1.0 + (self.base + self.per_difficulty * difficulty).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Asset values above this are raised to the sport's value exponent.
    pub exponent_threshold: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            exponent_threshold: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/valuation.toml`, relative to `base_dir`.
///
/// Does not copy defaults; call `ensure_config_files` first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let valuation_path = config_dir.join("valuation.toml");
    let valuation = if valuation_path.exists() {
        let text = read_file(&valuation_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: valuation_path.clone(),
            source: e,
        })?
    } else {
        ValuationConfig::default()
    };

    let config = Config {
        league: league_file.league,
        valuation,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a local edit.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let rules = &config.league.rules;

    if rules.max_roster == 0 {
        return Err(invalid("league.rules.max_roster", "must be greater than 0"));
    }
    if rules.min_roster > rules.max_roster {
        return Err(invalid(
            "league.rules.min_roster",
            format!(
                "must not exceed max_roster ({} > {})",
                rules.min_roster, rules.max_roster
            ),
        ));
    }
    if rules.salary_cap <= 0.0 {
        return Err(invalid("league.rules.salary_cap", "must be greater than 0"));
    }
    if rules.min_contract <= 0.0 || rules.min_contract > rules.max_contract {
        return Err(invalid(
            "league.rules.min_contract",
            format!(
                "must be positive and at most max_contract, got {} / {}",
                rules.min_contract, rules.max_contract
            ),
        ));
    }
    if rules.num_games == 0 {
        return Err(invalid("league.rules.num_games", "must be greater than 0"));
    }
    if rules.draft_rounds == 0 {
        return Err(invalid("league.rules.draft_rounds", "must be greater than 0"));
    }

    let val = &config.valuation;
    if val.normalizer.min_value_anchor >= val.normalizer.max_value_anchor {
        return Err(invalid(
            "normalizer.min_value_anchor",
            "must be strictly less than max_value_anchor",
        ));
    }
    if val.normalizer.contract_value_cap <= 0.0 {
        return Err(invalid("normalizer.contract_value_cap", "must be > 0"));
    }

    let fudge = &val.fudge;
    if !(0.0..1.0).contains(&fudge.min) || !(0.0..1.0).contains(&fudge.max) || fudge.min > fudge.max
    {
        return Err(invalid(
            "fudge.min",
            format!(
                "bounds must lie in [0, 1) with min <= max, got {} / {}",
                fudge.min, fudge.max
            ),
        ));
    }

    if val.picks.regression_horizon == 0 {
        return Err(invalid("picks.regression_horizon", "must be greater than 0"));
    }
    if val.picks.value_floor <= 0.0 {
        return Err(invalid("picks.value_floor", "must be > 0"));
    }
    if val.projection.ovr_spread <= 0.0 {
        return Err(invalid("projection.ovr_spread", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LEAGUE_TOML: &str = r#"
[league]
name = "Test League"
sport = "basketball"
user_tids = [0]

[league.rules]
min_roster = 13
max_roster = 15
salary_cap = 140000.0
min_contract = 1100.0
max_contract = 47000.0
num_games = 82
draft_rounds = 2
difficulty = 0.25
"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("rostercraft_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    #[test]
    fn loads_league_without_valuation_file() {
        let tmp = scratch_dir("no_valuation");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();

        let config = load_config_from(&tmp).expect("should load with defaults");
        assert_eq!(config.league.name, "Test League");
        assert_eq!(config.league.sport, "basketball");
        assert_eq!(config.league.user_tids, vec![0]);
        assert_eq!(config.league.rules.max_roster, 15);
        assert_eq!(config.league.rules.rookie_contract_years, 3);
        assert_eq!(config.valuation.picks.max_picks_given_up, 4);
        assert!((config.valuation.normalizer.contract_value_cap - 0.1).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_valuation_file_keeps_other_defaults() {
        let tmp = scratch_dir("partial_valuation");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(
            tmp.join("config/valuation.toml"),
            "[picks]\nmax_picks_given_up = 2\n\n[strategy.rebuilding]\nyoung_age = 23\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load partial valuation");
        assert_eq!(config.valuation.picks.max_picks_given_up, 2);
        assert!((config.valuation.picks.user_regression_fraction - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.valuation.strategy.rebuilding.young_age, 23);
        assert!((config.valuation.strategy.rebuilding.contract_weight - 2.0).abs() < f64::EPSILON);
        assert!((config.valuation.strategy.contending.skill_weight - 0.7).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn strategy_table_overrides_only_named_keys() {
        let val: ValuationConfig =
            toml::from_str("[strategy.contending]\nskill_weight = 0.5\n").unwrap();
        let contending = &val.strategy.contending;
        assert!((contending.skill_weight - 0.5).abs() < f64::EPSILON);
        assert!((contending.contract_weight - 0.5).abs() < f64::EPSILON);
        assert_eq!(contending.old_age, 32);
        assert!((contending.roster_fit_weight - 0.05).abs() < f64::EPSILON);
        assert_eq!(val.strategy.rebuilding.old_age, 29);
    }

    #[test]
    fn rejects_min_roster_above_max() {
        let tmp = scratch_dir("min_above_max");
        fs::write(
            tmp.join("config/league.toml"),
            LEAGUE_TOML.replace("min_roster = 13", "min_roster = 16"),
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.rules.min_roster")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_normalizer_anchors() {
        let tmp = scratch_dir("anchors");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(
            tmp.join("config/valuation.toml"),
            "[normalizer]\nmin_value_anchor = 2.0\nmax_value_anchor = 1.0\n",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "normalizer.min_value_anchor"
        ));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = scratch_dir("missing_league");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch_dir("invalid_toml");
        fs::write(tmp.join("config/league.toml"), "[league\nname = ").unwrap();
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_examples() {
        let tmp = std::env::temp_dir().join("rostercraft_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(tmp.join("defaults/valuation.toml.example"), "").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/valuation.toml.example").exists());

        // Second run copies nothing.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_local_edits() {
        let tmp = std::env::temp_dir().join("rostercraft_config_keep_edits");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(tmp.join("config/league.toml"), "# edited\n").unwrap();

        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/league.toml")).unwrap(),
            "# edited\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("rostercraft_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn fudge_factor_is_bounded() {
        let fudge = FudgeConfig::default();
        assert!((fudge.factor(0.0) - 1.05).abs() < 1e-12);
        assert!((fudge.factor(10.0) - 1.10).abs() < 1e-12);
        assert!((fudge.factor(-10.0) - 1.025).abs() < 1e-12);
    }
}
