use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tablewise_core::config::{env_source, AppConfig, ConfigOverrides};
use toml::Value;

use crate::commands::CommandResult;

/// Command-line flags that feed the override layer
const OVERRIDE_FLAGS: &[(&str, &str)] = &[("logging.level", "--log-level")];

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

/// Report effective configuration with the source of each value
pub fn run(
    config: &AppConfig,
    explicit_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> CommandResult {
    let config_file_path = detect_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let weights = &config.scoring.weights;
    let model = &config.wait_time.model;
    let values: Vec<(&'static str, String)> = vec![
        ("scoring.cuisine_weight", weights.cuisine.to_string()),
        ("scoring.budget_weight", weights.budget.to_string()),
        ("scoring.location_weight", weights.location.to_string()),
        ("scoring.style_weight", weights.style.to_string()),
        ("scoring.special_occasion_bonus", config.scoring.special_occasion_bonus.to_string()),
        ("scoring.group_capacity_bonus", config.scoring.group_capacity_bonus.to_string()),
        ("scoring.novelty_penalty", config.scoring.novelty_penalty.to_string()),
        ("scoring.notable_threshold", config.scoring.notable_threshold.to_string()),
        ("ranking.default_top_n", config.ranking.default_top_n.to_string()),
        ("ranking.synthetic_extras", config.ranking.synthetic_extras.to_string()),
        ("wait_time.poll_interval_secs", config.wait_time.poll_interval_secs.to_string()),
        ("wait_time.weekend_multiplier", model.weekend_multiplier.to_string()),
        ("wait_time.peak_multiplier", model.peak_multiplier.to_string()),
        ("wait_time.jitter_span", model.jitter_span.to_string()),
        (
            "wait_time.max_wait_minutes",
            model.max_wait_minutes.map(|value| value.to_string()).unwrap_or_else(|| "<unset>".to_string()),
        ),
        ("logging.level", config.logging.level.clone()),
        ("logging.format", format!("{:?}", config.logging.format).to_ascii_lowercase()),
    ];

    let entries: Vec<ConfigEntry> = values
        .into_iter()
        .map(|(key, value)| ConfigEntry {
            key,
            value,
            source: field_source(
                key,
                overrides,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    let data = match serde_json::to_value(&entries) {
        Ok(data) => data,
        Err(error) => {
            return CommandResult::failure("config", "serialization", error.to_string(), 1);
        }
    };

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: override > env > file > default)",
        Some(data),
    )
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("tablewise.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/tablewise.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    overrides: &ConfigOverrides,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if overrides.sets(key_path) {
        return match OVERRIDE_FLAGS.iter().find(|(path, _)| *path == key_path) {
            Some((_, flag)) => format!("override ({flag})"),
            None => "override".to_string(),
        };
    }

    if let Some(env_key) = env_source(key_path) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
