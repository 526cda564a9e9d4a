//! Game rules and application settings.
//!
//! Settings come from an optional TOML file (`LIFE_TYCOON_CONFIG`, default
//! `game.toml`) and the `DATABASE_URL` environment variable. A missing file means
//! defaults everywhere; a malformed one is an error.

use crate::config::catalog::{self, CatalogConfig};
use crate::config::database;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_PATH_VAR: &str = "LIFE_TYCOON_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "game.toml";

/// Tunable rules of a match
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameRules {
    /// Cash each player starts with
    pub starting_cash: f64,
    /// Days in a month before the calendar rolls over
    pub days_per_month: i32,
    /// Months a match lasts
    pub months_per_match: i32,
    /// Businesses offered in each daily shop
    pub shop_size: usize,
    /// Share of the purchase cost refunded on a sale
    pub sell_back_ratio: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_cash: 600.0,
            days_per_month: 30,
            months_per_match: 12,
            shop_size: 5,
            sell_back_ratio: 0.5,
        }
    }
}

/// Shape of the optional settings file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Game rules
    pub rules: GameRules,
    /// Catalog to seed from instead of the bundled one
    pub catalog_path: Option<PathBuf>,
}

/// Everything the composition root needs to open a store
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SeaORM` connection URL
    pub database_url: String,
    /// Game rules
    pub rules: GameRules,
    /// Catalog used for the one-time seed
    pub catalog: CatalogConfig,
}

/// Parses a settings file.
pub fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: FileConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.as_ref().display()),
    })?;
    validate_rules(&config.rules)?;
    Ok(config)
}

fn validate_rules(rules: &GameRules) -> Result<()> {
    if rules.days_per_month < 1 || rules.months_per_match < 1 {
        return Err(Error::Config {
            message: "days_per_month and months_per_match must be at least 1".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&rules.sell_back_ratio) {
        return Err(Error::Config {
            message: format!("sell_back_ratio {} is outside 0..=1", rules.sell_back_ratio),
        });
    }
    if rules.starting_cash < 0.0 {
        return Err(Error::InvalidAmount {
            amount: rules.starting_cash,
        });
    }
    Ok(())
}

/// Loads the application configuration from the environment and the optional settings file.
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let file_config = if Path::new(&path).exists() {
        debug!("Reading settings from {}", path);
        load_file_config(&path)?
    } else {
        info!("No settings file at {}, using default rules", path);
        FileConfig::default()
    };

    let catalog = match &file_config.catalog_path {
        Some(catalog_path) => catalog::load_catalog(catalog_path)?,
        None => catalog::bundled_catalog()?,
    };

    Ok(AppConfig {
        database_url: database::get_database_url(),
        rules: file_config.rules,
        catalog,
    })
}
