//! Shared test utilities for the data layer.
//!
//! Helpers for setting up in-memory stores and creating rows with sensible defaults.

use crate::{
    config::{catalog::bundled_catalog, database},
    core::{catalog, game_match, inventory, player},
    entities::{self, Tier},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for unit tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Like [`setup_test_db`] with the bundled catalog seeded.
pub async fn setup_seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    catalog::seed_catalog(&db, &bundled_catalog()?).await?;
    Ok(db)
}

/// Creates a test player with 600 cash and zero rates.
pub async fn create_test_player(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::player::Model> {
    player::create_player(db, name, 600.0).await
}

/// Creates a low-tier catalog business costing `cost`.
///
/// # Defaults
/// * income: 10% of cost
/// * upkeep: 2% of cost
pub async fn create_test_business(
    db: &DatabaseConnection,
    name: &str,
    cost: f64,
) -> Result<entities::business::Model> {
    entities::business::ActiveModel {
        name: Set(name.to_string()),
        income: Set(cost * 0.1),
        cost: Set(cost),
        upkeep: Set(cost * 0.02),
        tier: Set(Tier::Low),
        icon: Set("ic_test".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a seeded store with one player "Ana" taking part in a match.
/// Returns (db, player, match, inventory).
pub async fn setup_player_in_match() -> Result<(
    DatabaseConnection,
    entities::player::Model,
    entities::game_match::Model,
    entities::inventory::Model,
)> {
    let db = setup_seeded_db().await?;
    let ana = create_test_player(&db, "Ana").await?;
    let game = game_match::create_match(&db).await?;
    game_match::add_player_to_match(&db, game.id, ana.id).await?;
    let inv = inventory::create_inventory(&db, ana.id, game.id).await?;
    Ok((db, ana, game, inv))
}
