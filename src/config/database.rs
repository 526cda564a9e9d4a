//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so foreign keys and their cascade rules come straight from each entity's `Relation`.
//! Composite uniqueness that the entity macros cannot express is added as explicit indices.

use crate::entities::{
    Business, Card, Day, Food, Inventory, InventoryBusiness, InventoryCard, InventoryFood, Match,
    MatchDay, MatchPlayer, Month, Player, Shop, ShopBusiness, SystemState, day, inventory, shop,
    system_state,
};
use crate::errors::{Error, Result};
use chrono::Utc;
use std::path::Path;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Schema, Set,
    prelude::*,
};
use tracing::{debug, info, instrument};

/// Schema version written to `system_state` on first creation.
pub const SCHEMA_VERSION: &str = "1";

pub(crate) const SCHEMA_VERSION_KEY: &str = "schema_version";

const DEFAULT_DATABASE_URL: &str = "sqlite://data/life_tycoon.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the default local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database at `database_url`.
///
/// The parent directory of a file-backed store is created if missing. Foreign key
/// enforcement is switched on explicitly; cascade deletes depend on it.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = store_directory(database_url) {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Connecting to {}", database_url);
    let db = Database::connect(database_url).await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    Ok(db)
}

/// Creates every table and index if missing, then checks the recorded schema version.
///
/// A store written by another schema version is refused with [`Error::SchemaMismatch`]
/// instead of being reset.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children
    let mut tables = vec![
        schema.create_table_from_entity(SystemState),
        schema.create_table_from_entity(Player),
        schema.create_table_from_entity(Month),
        schema.create_table_from_entity(Day),
        schema.create_table_from_entity(Business),
        schema.create_table_from_entity(Food),
        schema.create_table_from_entity(Card),
        schema.create_table_from_entity(Match),
        schema.create_table_from_entity(MatchPlayer),
        schema.create_table_from_entity(MatchDay),
        schema.create_table_from_entity(Shop),
        schema.create_table_from_entity(ShopBusiness),
        schema.create_table_from_entity(Inventory),
        schema.create_table_from_entity(InventoryBusiness),
        schema.create_table_from_entity(InventoryFood),
        schema.create_table_from_entity(InventoryCard),
    ];
    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    for index in indices() {
        db.execute(builder.build(&index)).await?;
    }
    debug!("Tables and indices ensured");

    check_schema_version(db).await
}

/// Directory holding the database file of a `sqlite://` URL, if it has one.
fn store_directory(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

fn indices() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_shops_player_day")
            .table(Shop)
            .col(shop::Column::PlayerId)
            .col(shop::Column::DayId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_inventories_player_match")
            .table(Inventory)
            .col(inventory::Column::PlayerId)
            .col(inventory::Column::MatchId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_days_player_month_number")
            .table(Day)
            .col(day::Column::PlayerId)
            .col(day::Column::MonthId)
            .col(day::Column::Number)
            .if_not_exists()
            .to_owned(),
    ]
}

async fn check_schema_version(db: &DatabaseConnection) -> Result<()> {
    let recorded = SystemState::find()
        .filter(system_state::Column::Key.eq(SCHEMA_VERSION_KEY))
        .one(db)
        .await?;

    match recorded {
        Some(state) if state.value == SCHEMA_VERSION => Ok(()),
        Some(state) => Err(Error::SchemaMismatch {
            found: state.value,
            expected: SCHEMA_VERSION.to_string(),
        }),
        None => {
            system_state::ActiveModel {
                key: Set(SCHEMA_VERSION_KEY.to_string()),
                value: Set(SCHEMA_VERSION.to_string()),
                updated_at: Set(Utc::now().naive_utc()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!("Fresh store stamped with schema version {}", SCHEMA_VERSION);
            Ok(())
        }
    }
}
