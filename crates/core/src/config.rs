use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ApplicationError;
use crate::recommendations::{
    RecommendationRanker, ScoringConfig, DEFAULT_SCORING, DEFAULT_TOP_N,
};
use crate::wait_time::{
    WaitTimeConfig, WaitTimeMonitor, WaitTimePredictor, DEFAULT_POLL_INTERVAL_SECS,
};

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub ranking: RankingConfig,
    pub wait_time: WaitTimeSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingConfig {
    pub default_top_n: usize,
    pub synthetic_extras: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaitTimeSettings {
    pub poll_interval_secs: u64,
    pub model: WaitTimeConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub default_top_n: Option<usize>,
    pub synthetic_extras: Option<bool>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        ApplicationError::Configuration(error.to_string())
    }
}

impl ConfigOverrides {
    /// Whether this layer sets the value at `key_path`
    pub fn sets(&self, key_path: &str) -> bool {
        match key_path {
            "logging.level" => self.log_level.is_some(),
            "logging.format" => self.log_format.is_some(),
            "ranking.default_top_n" => self.default_top_n.is_some(),
            "ranking.synthetic_extras" => self.synthetic_extras.is_some(),
            "wait_time.poll_interval_secs" => self.poll_interval_secs.is_some(),
            _ => false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: DEFAULT_SCORING,
            ranking: RankingConfig { default_top_n: DEFAULT_TOP_N, synthetic_extras: true },
            wait_time: WaitTimeSettings {
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
                model: WaitTimeConfig::default(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("tablewise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Ranker wired with the configured scoring and ranking settings
    pub fn ranker(&self) -> RecommendationRanker {
        RecommendationRanker::with_scoring(self.scoring)
            .with_default_top_n(self.ranking.default_top_n)
            .with_synthetic_extras(self.ranking.synthetic_extras)
    }

    pub fn predictor(&self) -> WaitTimePredictor {
        WaitTimePredictor::with_config(self.wait_time.model)
    }

    pub fn monitor(&self) -> WaitTimeMonitor {
        WaitTimeMonitor::new(self.predictor())
            .with_poll_interval(Duration::from_secs(self.wait_time.poll_interval_secs))
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(scoring) = patch.scoring {
            if let Some(value) = scoring.cuisine_weight {
                self.scoring.weights.cuisine = value;
            }
            if let Some(value) = scoring.budget_weight {
                self.scoring.weights.budget = value;
            }
            if let Some(value) = scoring.location_weight {
                self.scoring.weights.location = value;
            }
            if let Some(value) = scoring.style_weight {
                self.scoring.weights.style = value;
            }
            if let Some(value) = scoring.special_occasion_bonus {
                self.scoring.special_occasion_bonus = value;
            }
            if let Some(value) = scoring.group_capacity_bonus {
                self.scoring.group_capacity_bonus = value;
            }
            if let Some(value) = scoring.novelty_penalty {
                self.scoring.novelty_penalty = value;
            }
            if let Some(value) = scoring.notable_threshold {
                self.scoring.notable_threshold = value;
            }
        }

        if let Some(ranking) = patch.ranking {
            if let Some(default_top_n) = ranking.default_top_n {
                self.ranking.default_top_n = default_top_n;
            }
            if let Some(synthetic_extras) = ranking.synthetic_extras {
                self.ranking.synthetic_extras = synthetic_extras;
            }
        }

        if let Some(wait_time) = patch.wait_time {
            if let Some(poll_interval_secs) = wait_time.poll_interval_secs {
                self.wait_time.poll_interval_secs = poll_interval_secs;
            }
            if let Some(weekend_multiplier) = wait_time.weekend_multiplier {
                self.wait_time.model.weekend_multiplier = weekend_multiplier;
            }
            if let Some(peak_multiplier) = wait_time.peak_multiplier {
                self.wait_time.model.peak_multiplier = peak_multiplier;
            }
            if let Some(jitter_span) = wait_time.jitter_span {
                self.wait_time.model.jitter_span = jitter_span;
            }
            if let Some(max_wait_minutes) = wait_time.max_wait_minutes {
                self.wait_time.model.max_wait_minutes = Some(max_wait_minutes);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some((key, value)) = env_value("scoring.cuisine_weight") {
            self.scoring.weights.cuisine = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.budget_weight") {
            self.scoring.weights.budget = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.location_weight") {
            self.scoring.weights.location = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.style_weight") {
            self.scoring.weights.style = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.special_occasion_bonus") {
            self.scoring.special_occasion_bonus = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.group_capacity_bonus") {
            self.scoring.group_capacity_bonus = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.novelty_penalty") {
            self.scoring.novelty_penalty = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("scoring.notable_threshold") {
            self.scoring.notable_threshold = parse_f64(key, &value)?;
        }

        if let Some((key, value)) = env_value("ranking.default_top_n") {
            self.ranking.default_top_n = parse_usize(key, &value)?;
        }
        if let Some((key, value)) = env_value("ranking.synthetic_extras") {
            self.ranking.synthetic_extras = parse_bool(key, &value)?;
        }

        if let Some((key, value)) = env_value("wait_time.poll_interval_secs") {
            self.wait_time.poll_interval_secs = parse_u64(key, &value)?;
        }
        if let Some((key, value)) = env_value("wait_time.weekend_multiplier") {
            self.wait_time.model.weekend_multiplier = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("wait_time.peak_multiplier") {
            self.wait_time.model.peak_multiplier = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("wait_time.jitter_span") {
            self.wait_time.model.jitter_span = parse_f64(key, &value)?;
        }
        if let Some((key, value)) = env_value("wait_time.max_wait_minutes") {
            self.wait_time.model.max_wait_minutes = Some(parse_u32(key, &value)?);
        }

        if let Some((_, value)) = env_value("logging.level") {
            self.logging.level = value;
        }
        if let Some((_, value)) = env_value("logging.format") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(default_top_n) = overrides.default_top_n {
            self.ranking.default_top_n = default_top_n;
        }
        if let Some(synthetic_extras) = overrides.synthetic_extras {
            self.ranking.synthetic_extras = synthetic_extras;
        }
        if let Some(poll_interval_secs) = overrides.poll_interval_secs {
            self.wait_time.poll_interval_secs = poll_interval_secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scoring(&self.scoring)?;
        validate_ranking(&self.ranking)?;
        validate_wait_time(&self.wait_time)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("tablewise.toml"), PathBuf::from("config/tablewise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), ConfigError> {
    let weights = [
        ("scoring.cuisine_weight", scoring.weights.cuisine),
        ("scoring.budget_weight", scoring.weights.budget),
        ("scoring.location_weight", scoring.weights.location),
        ("scoring.style_weight", scoring.weights.style),
        ("scoring.special_occasion_bonus", scoring.special_occasion_bonus),
        ("scoring.group_capacity_bonus", scoring.group_capacity_bonus),
    ];
    for (key, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{key} must be a finite non-negative number"
            )));
        }
    }

    if !(0.0..=1.0).contains(&scoring.novelty_penalty) {
        return Err(ConfigError::Validation(
            "scoring.novelty_penalty must be in range 0.0..=1.0".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&scoring.notable_threshold) {
        return Err(ConfigError::Validation(
            "scoring.notable_threshold must be in range 0.0..=1.0".to_string(),
        ));
    }

    Ok(())
}

fn validate_ranking(ranking: &RankingConfig) -> Result<(), ConfigError> {
    if ranking.default_top_n == 0 {
        return Err(ConfigError::Validation(
            "ranking.default_top_n must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_wait_time(wait_time: &WaitTimeSettings) -> Result<(), ConfigError> {
    if wait_time.poll_interval_secs == 0 || wait_time.poll_interval_secs > 3600 {
        return Err(ConfigError::Validation(
            "wait_time.poll_interval_secs must be in range 1..=3600".to_string(),
        ));
    }

    let model = &wait_time.model;
    for (key, value) in [
        ("wait_time.weekend_multiplier", model.weekend_multiplier),
        ("wait_time.peak_multiplier", model.peak_multiplier),
    ] {
        if !value.is_finite() || value < 1.0 {
            return Err(ConfigError::Validation(format!("{key} must be at least 1.0")));
        }
    }

    if !(0.0..1.0).contains(&model.jitter_span) {
        return Err(ConfigError::Validation(
            "wait_time.jitter_span must be in range 0.0..1.0".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// Environment variables read for each config key, primary name first.
pub const ENV_KEYS: &[(&str, &[&str])] = &[
    ("scoring.cuisine_weight", &["TABLEWISE_SCORING_CUISINE_WEIGHT"]),
    ("scoring.budget_weight", &["TABLEWISE_SCORING_BUDGET_WEIGHT"]),
    ("scoring.location_weight", &["TABLEWISE_SCORING_LOCATION_WEIGHT"]),
    ("scoring.style_weight", &["TABLEWISE_SCORING_STYLE_WEIGHT"]),
    ("scoring.special_occasion_bonus", &["TABLEWISE_SCORING_SPECIAL_OCCASION_BONUS"]),
    ("scoring.group_capacity_bonus", &["TABLEWISE_SCORING_GROUP_CAPACITY_BONUS"]),
    ("scoring.novelty_penalty", &["TABLEWISE_SCORING_NOVELTY_PENALTY"]),
    ("scoring.notable_threshold", &["TABLEWISE_SCORING_NOTABLE_THRESHOLD"]),
    ("ranking.default_top_n", &["TABLEWISE_RANKING_DEFAULT_TOP_N"]),
    ("ranking.synthetic_extras", &["TABLEWISE_RANKING_SYNTHETIC_EXTRAS"]),
    ("wait_time.poll_interval_secs", &["TABLEWISE_WAIT_TIME_POLL_INTERVAL_SECS"]),
    ("wait_time.weekend_multiplier", &["TABLEWISE_WAIT_TIME_WEEKEND_MULTIPLIER"]),
    ("wait_time.peak_multiplier", &["TABLEWISE_WAIT_TIME_PEAK_MULTIPLIER"]),
    ("wait_time.jitter_span", &["TABLEWISE_WAIT_TIME_JITTER_SPAN"]),
    ("wait_time.max_wait_minutes", &["TABLEWISE_WAIT_TIME_MAX_WAIT_MINUTES"]),
    ("logging.level", &["TABLEWISE_LOGGING_LEVEL", "TABLEWISE_LOG_LEVEL"]),
    ("logging.format", &["TABLEWISE_LOGGING_FORMAT", "TABLEWISE_LOG_FORMAT"]),
];

/// First environment variable currently setting `key_path`, if any.
///
/// Blank values are ignored, matching how [`AppConfig::load`] reads them.
pub fn env_source(key_path: &str) -> Option<&'static str> {
    env_value(key_path).map(|(key, _)| key)
}

fn env_value(key_path: &str) -> Option<(&'static str, String)> {
    let (_, keys) = ENV_KEYS.iter().find(|(path, _)| *path == key_path)?;
    keys.iter().find_map(|key| read_env(key).map(|value| (*key, value)))
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| invalid_override(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    scoring: Option<ScoringPatch>,
    ranking: Option<RankingPatch>,
    wait_time: Option<WaitTimePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    cuisine_weight: Option<f64>,
    budget_weight: Option<f64>,
    location_weight: Option<f64>,
    style_weight: Option<f64>,
    special_occasion_bonus: Option<f64>,
    group_capacity_bonus: Option<f64>,
    novelty_penalty: Option<f64>,
    notable_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    default_top_n: Option<usize>,
    synthetic_extras: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct WaitTimePatch {
    poll_interval_secs: Option<u64>,
    weekend_multiplier: Option<f64>,
    peak_multiplier: Option<f64>,
    jitter_span: Option<f64>,
    max_wait_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    use tempfile::TempDir;

    use super::{env_source, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::errors::ApplicationError;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_reproduce_reference_constants() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.scoring.weights.cuisine == 0.30, "cuisine weight should default to 0.30")?;
        ensure(config.scoring.novelty_penalty == 0.8, "novelty penalty should default to 0.8")?;
        ensure(config.ranking.default_top_n == 10, "top n should default to 10")?;
        ensure(config.wait_time.poll_interval_secs == 30, "poll interval should default to 30s")?;
        ensure(
            config.wait_time.model.max_wait_minutes.is_none(),
            "wait ceiling should be unset by default",
        )?;
        ensure(
            config.monitor().poll_interval() == Duration::from_secs(30),
            "monitor should use configured poll interval",
        )?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_TABLEWISE_TOP_N", "4");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("tablewise.toml");
            fs::write(
                &path,
                r#"
[ranking]
default_top_n = ${TEST_TABLEWISE_TOP_N}
synthetic_extras = false

[scoring]
cuisine_weight = 0.5

[wait_time]
max_wait_minutes = 90
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.ranking.default_top_n == 4, "top n should come from interpolated env")?;
            ensure(!config.ranking.synthetic_extras, "extras should be disabled by file")?;
            ensure(config.scoring.weights.cuisine == 0.5, "cuisine weight should come from file")?;
            ensure(config.scoring.weights.budget == 0.25, "unset weights keep defaults")?;
            ensure(
                config.wait_time.model.max_wait_minutes == Some(90),
                "wait ceiling should come from file",
            )?;
            ensure(config.ranker().default_top_n() == 4, "ranker should inherit top n")
        })();

        clear_vars(&["TEST_TABLEWISE_TOP_N"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TABLEWISE_LOG_LEVEL", "warn");
        env::set_var("TABLEWISE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["TABLEWISE_LOG_LEVEL", "TABLEWISE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn model_constants_accept_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let vars = [
            ("TABLEWISE_SCORING_SPECIAL_OCCASION_BONUS", "0.2"),
            ("TABLEWISE_SCORING_GROUP_CAPACITY_BONUS", "0.07"),
            ("TABLEWISE_SCORING_NOVELTY_PENALTY", "0.5"),
            ("TABLEWISE_SCORING_NOTABLE_THRESHOLD", "0.9"),
            ("TABLEWISE_WAIT_TIME_WEEKEND_MULTIPLIER", "1.6"),
            ("TABLEWISE_WAIT_TIME_PEAK_MULTIPLIER", "2.0"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.scoring.special_occasion_bonus == 0.2, "occasion bonus from env")?;
            ensure(config.scoring.group_capacity_bonus == 0.07, "group bonus from env")?;
            ensure(config.scoring.novelty_penalty == 0.5, "novelty penalty from env")?;
            ensure(config.scoring.notable_threshold == 0.9, "notable threshold from env")?;
            ensure(config.wait_time.model.weekend_multiplier == 1.6, "weekend multiplier from env")?;
            ensure(config.wait_time.model.peak_multiplier == 2.0, "peak multiplier from env")
        })();

        clear_vars(&vars.map(|(key, _)| key));
        result
    }

    #[test]
    fn env_source_reports_aliases_and_ignores_blank_values() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TABLEWISE_LOGGING_LEVEL", "  ");
        env::set_var("TABLEWISE_LOG_LEVEL", "warn");
        env::set_var("TABLEWISE_RANKING_DEFAULT_TOP_N", "");

        let result = (|| -> Result<(), String> {
            ensure(
                env_source("logging.level") == Some("TABLEWISE_LOG_LEVEL"),
                "alias should be reported when the primary variable is blank",
            )?;
            ensure(
                env_source("ranking.default_top_n").is_none(),
                "blank variable should not count as a source",
            )?;
            ensure(env_source("scoring.unknown").is_none(), "unknown keys have no env source")
        })();

        clear_vars(&[
            "TABLEWISE_LOGGING_LEVEL",
            "TABLEWISE_LOG_LEVEL",
            "TABLEWISE_RANKING_DEFAULT_TOP_N",
        ]);
        result
    }

    #[test]
    fn overrides_report_the_keys_they_set() -> Result<(), String> {
        let overrides =
            ConfigOverrides { log_level: Some("debug".to_string()), ..ConfigOverrides::default() };

        ensure(overrides.sets("logging.level"), "log level override should be reported")?;
        ensure(!overrides.sets("logging.format"), "unset format override should not be reported")?;
        ensure(!overrides.sets("scoring.cuisine_weight"), "scoring has no override layer")
    }

    #[test]
    fn config_errors_map_to_configuration_class() -> Result<(), String> {
        let error = ApplicationError::from(ConfigError::Validation(
            "ranking.default_top_n must be at least 1".to_string(),
        ));

        ensure(
            matches!(error, ApplicationError::Configuration(_)),
            "config errors should become configuration failures",
        )?;
        ensure(error.error_class() == "config_validation", "class should be config_validation")
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TABLEWISE_RANKING_DEFAULT_TOP_N", "7");
        env::set_var("TABLEWISE_WAIT_TIME_POLL_INTERVAL_SECS", "45");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("tablewise.toml");
            fs::write(
                &path,
                r#"
[ranking]
default_top_n = 3

[wait_time]
poll_interval_secs = 10

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    poll_interval_secs: Some(5),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.ranking.default_top_n == 7, "env top n should win over file")?;
            ensure(config.wait_time.poll_interval_secs == 5, "override poll interval should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")
        })();

        clear_vars(&["TABLEWISE_RANKING_DEFAULT_TOP_N", "TABLEWISE_WAIT_TIME_POLL_INTERVAL_SECS"]);
        result
    }

    #[test]
    fn invalid_env_override_is_reported_with_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TABLEWISE_SCORING_BUDGET_WEIGHT", "lots");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected env override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "TABLEWISE_SCORING_BUDGET_WEIGHT"
                ),
                "error should name the offending variable",
            )
        })();

        clear_vars(&["TABLEWISE_SCORING_BUDGET_WEIGHT"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { poll_interval_secs: Some(0), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };
        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("wait_time.poll_interval_secs")
        );
        ensure(has_message, "validation failure should mention wait_time.poll_interval_secs")
    }

    #[test]
    fn negative_weight_in_file_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("tablewise.toml");
        fs::write(&path, "[scoring]\nstyle_weight = -0.1\n").map_err(|err| err.to_string())?;

        let error =
            match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
            {
                Ok(_) => return Err("expected validation failure".to_string()),
                Err(error) => error,
            };
        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("scoring.style_weight")),
            "validation failure should mention scoring.style_weight",
        )
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(missing),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should fail",
        )
    }
}
