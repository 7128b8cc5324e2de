// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Values are layered: built-in defaults, then the TOML config file, then
//! `HERDBOOK_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `herdbook config`
pub const KEYS: &[&str] = &[
    "data_dir",
    "log_level",
    "user",
    "currency",
    "tax_rate_percent",
    "pedigree_generations",
];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding herd.json
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Email of the acting user
    pub user: Option<String>,
    /// Currency code used when printing amounts
    pub currency: String,
    /// Tax rate applied to invoice previews
    pub tax_rate_percent: f64,
    /// Default depth of pedigree reports
    pub pedigree_generations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("org", "hyperpolymath", "herdbook")
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| {
                    std::env::current_dir()
                        .unwrap_or_else(|_| PathBuf::from("."))
                        .join(".herdbook")
                }),
            log_level: "info".to_string(),
            user: None,
            currency: "USD".to_string(),
            tax_rate_percent: 0.0,
            pedigree_generations: 4,
        }
    }
}

/// Default location of the config file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "herdbook")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, file and environment
///
/// A missing config file is skipped so `herdbook config` can create it.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = ::config::Config::try_from(&Config::default())
        .context("Failed to build default configuration")?;
    let mut builder = ::config::Config::builder().add_source(defaults);

    if let Some(p) = path.map(Path::to_path_buf).or_else(default_path) {
        builder = builder.add_source(::config::File::from(p).required(false));
    }

    builder
        .add_source(::config::Environment::with_prefix("HERDBOOK"))
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

/// Read one key as a display string
pub fn get(config: &Config, key: &str) -> Result<String> {
    if !KEYS.contains(&key) {
        anyhow::bail!("Unknown config key: {}. Valid: {}", key, KEYS.join(", "));
    }
    let value = serde_json::to_value(config).context("Failed to serialize configuration")?;
    Ok(match value.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Write one key into a TOML config file, creating it if needed
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        anyhow::bail!("Unknown config key: {}. Valid: {}", key, KEYS.join(", "));
    }

    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let parsed = match key {
        "tax_rate_percent" => toml::Value::Float(
            value
                .parse()
                .with_context(|| format!("{key} must be a number"))?,
        ),
        "pedigree_generations" => toml::Value::Integer(
            value
                .parse()
                .with_context(|| format!("{key} must be a whole number"))?,
        ),
        _ => toml::Value::String(value.to_string()),
    };
    table.insert(key.to_string(), parsed);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, toml::to_string_pretty(&table).context("Failed to serialize config")?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set(&path, "currency", "EUR").unwrap();
        set(&path, "tax_rate_percent", "21").unwrap();
        set(&path, "pedigree_generations", "6").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.currency, "EUR");
        assert!((config.tax_rate_percent - 21.0).abs() < f64::EPSILON);
        assert_eq!(config.pedigree_generations, 6);
        assert_eq!(get(&config, "pedigree_generations").unwrap(), "6");
    }

    #[test]
    fn test_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        assert!(set(&dir.path().join("c.toml"), "colour", "blue").is_err());
        assert!(get(&Config::default(), "colour").is_err());
    }

    #[test]
    fn test_rejects_non_numeric_tax() {
        let dir = TempDir::new().unwrap();
        assert!(set(&dir.path().join("c.toml"), "tax_rate_percent", "lots").is_err());
    }
}
