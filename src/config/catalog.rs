//! Catalog definitions loaded from TOML.
//!
//! The catalog of businesses, foods and cards ships inside the binary
//! (`assets/catalog.toml`) and can be replaced with a file on disk. Whatever is
//! loaded here is what the one-time seed writes to the store.

use crate::entities::{CardClass, CardField, Polarity, Target, Tier};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.toml");

/// Configuration structure representing a whole catalog file
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Catalog revision; stored as the `catalog_version` marker when seeded
    pub version: u32,
    /// Purchasable businesses
    pub businesses: Vec<BusinessConfig>,
    /// Consumable foods
    pub foods: Vec<FoodConfig>,
    /// Effect cards, placeholders included
    pub cards: Vec<CardConfig>,
}

/// Configuration for a single business
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessConfig {
    /// Display name
    pub name: String,
    /// Daily income per unit
    pub income: f64,
    /// Purchase price
    pub cost: f64,
    /// Daily upkeep per unit
    pub upkeep: f64,
    /// Price band
    pub tier: Tier,
    /// Icon key
    pub icon: String,
}

/// Configuration for a single food
#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    /// Display name
    pub name: String,
    /// Days the effect lasts
    pub duration: i32,
    /// Purchase price
    pub price: f64,
    /// Daily cash bonus while active
    pub effect: f64,
}

/// Configuration for a single card
#[derive(Debug, Deserialize, Clone)]
pub struct CardConfig {
    /// Display name
    pub name: String,
    /// Effect label
    pub effect_name: String,
    /// Helps or hurts
    pub polarity: Polarity,
    /// Drawer or opponent
    pub target: Target,
    /// Deck
    pub class: CardClass,
    /// Modified column; absent for placeholders
    #[serde(default)]
    pub field: Option<CardField>,
    /// Unsigned size of the change
    #[serde(default)]
    pub magnitude: f64,
    /// Days the change lasts, 0 for permanent
    #[serde(default)]
    pub duration: i32,
}

impl CatalogConfig {
    /// Parses a catalog from TOML text and checks it for obvious mistakes.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse catalog: {e}"),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        for business in &self.businesses {
            if business.cost < 0.0 || business.income < 0.0 || business.upkeep < 0.0 {
                return Err(Error::Config {
                    message: format!("Business '{}' has a negative amount", business.name),
                });
            }
        }
        for food in &self.foods {
            if food.duration <= 0 {
                return Err(Error::Config {
                    message: format!("Food '{}' must last at least one day", food.name),
                });
            }
        }
        for card in &self.cards {
            if card.magnitude < 0.0 || card.duration < 0 {
                return Err(Error::Config {
                    message: format!("Card '{}' has a negative magnitude or duration", card.name),
                });
            }
            let changes_rate = matches!(card.field, Some(CardField::Income | CardField::Expenses));
            if changes_rate && card.duration == 0 {
                return Err(Error::Config {
                    message: format!("Card '{}' changes a daily rate for zero days", card.name),
                });
            }
            if card.field == Some(CardField::Cash) && card.class == CardClass::Business {
                return Err(Error::Config {
                    message: format!("Business card '{}' cannot modify cash", card.name),
                });
            }
        }
        Ok(())
    }
}

/// Returns the catalog compiled into the binary.
pub fn bundled_catalog() -> Result<CatalogConfig> {
    CatalogConfig::from_toml(BUNDLED_CATALOG)
}

/// Loads a catalog from a TOML file on disk
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - An entry fails validation
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path.as_ref().display()),
    })?;
    CatalogConfig::from_toml(&contents)
}
