//! Catalog business logic - Reference businesses, foods and cards.
//!
//! The catalog is written exactly once per store by [`seed_catalog`] and only read
//! afterwards. Seeding checks the `catalog_version` marker and runs in a single
//! transaction, so a store is either fully seeded or not seeded at all.

use crate::{
    config::catalog::CatalogConfig,
    entities::{
        Business, Card, CardClass, Food, SystemState, Tier, business, card, food, system_state,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// `system_state` key recording which catalog revision was seeded.
pub const CATALOG_VERSION_KEY: &str = "catalog_version";

/// Result of store initialization's seeding step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog was written by this call
    Seeded {
        /// Businesses inserted
        businesses: usize,
        /// Foods inserted
        foods: usize,
        /// Cards inserted
        cards: usize,
    },
    /// A previous run already seeded the store; nothing was written
    AlreadySeeded {
        /// Revision recorded by that run
        version: String,
    },
}

/// Row counts of the catalog tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    /// Rows in `businesses`
    pub businesses: u64,
    /// Rows in `foods`
    pub foods: u64,
    /// Rows in `cards`
    pub cards: u64,
}

/// Seeds the catalog tables once.
///
/// If the `catalog_version` marker exists nothing is written, even when the
/// recorded revision differs from `catalog.version`: seeded ids are referenced by
/// inventories and shops and must stay stable. Otherwise every row plus the
/// marker is inserted in one transaction; any failure rolls the whole seed back
/// and is returned.
#[instrument(skip(db, catalog), fields(version = catalog.version))]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<SeedOutcome> {
    let txn = db.begin().await?;

    let marker = SystemState::find()
        .filter(system_state::Column::Key.eq(CATALOG_VERSION_KEY))
        .one(&txn)
        .await?;
    if let Some(marker) = marker {
        if marker.value != catalog.version.to_string() {
            warn!(
                "Store holds catalog version {}, configured version is {}; keeping the stored catalog",
                marker.value, catalog.version
            );
        }
        return Ok(SeedOutcome::AlreadySeeded {
            version: marker.value,
        });
    }

    let businesses = catalog.businesses.iter().map(|b| business::ActiveModel {
        name: Set(b.name.clone()),
        income: Set(b.income),
        cost: Set(b.cost),
        upkeep: Set(b.upkeep),
        tier: Set(b.tier),
        icon: Set(b.icon.clone()),
        ..Default::default()
    });
    if !catalog.businesses.is_empty() {
        Business::insert_many(businesses).exec(&txn).await?;
    }

    let foods = catalog.foods.iter().map(|f| food::ActiveModel {
        name: Set(f.name.clone()),
        duration: Set(f.duration),
        price: Set(f.price),
        effect: Set(f.effect),
        ..Default::default()
    });
    if !catalog.foods.is_empty() {
        Food::insert_many(foods).exec(&txn).await?;
    }

    let cards = catalog.cards.iter().map(|c| card::ActiveModel {
        name: Set(c.name.clone()),
        effect_name: Set(c.effect_name.clone()),
        polarity: Set(c.polarity),
        target: Set(c.target),
        class: Set(c.class),
        field: Set(c.field),
        magnitude: Set(c.magnitude),
        duration: Set(c.duration),
        ..Default::default()
    });
    if !catalog.cards.is_empty() {
        Card::insert_many(cards).exec(&txn).await?;
    }

    system_state::ActiveModel {
        key: Set(CATALOG_VERSION_KEY.to_string()),
        value: Set(catalog.version.to_string()),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Catalog seeded: {} businesses, {} foods, {} cards",
        catalog.businesses.len(),
        catalog.foods.len(),
        catalog.cards.len()
    );
    Ok(SeedOutcome::Seeded {
        businesses: catalog.businesses.len(),
        foods: catalog.foods.len(),
        cards: catalog.cards.len(),
    })
}

/// Counts the rows of each catalog table.
pub async fn catalog_counts<C>(db: &C) -> Result<CatalogCounts>
where
    C: ConnectionTrait,
{
    Ok(CatalogCounts {
        businesses: Business::find().count(db).await?,
        foods: Food::find().count(db).await?,
        cards: Card::find().count(db).await?,
    })
}

/// All catalog businesses in seed order.
pub async fn get_all_businesses<C>(db: &C) -> Result<Vec<business::Model>>
where
    C: ConnectionTrait,
{
    Business::find()
        .order_by_asc(business::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Catalog businesses of one tier, cheapest first.
pub async fn get_businesses_by_tier<C>(db: &C, tier: Tier) -> Result<Vec<business::Model>>
where
    C: ConnectionTrait,
{
    Business::find()
        .filter(business::Column::Tier.eq(tier))
        .order_by_asc(business::Column::Cost)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a business by id.
pub async fn get_business_by_id<C>(db: &C, business_id: i64) -> Result<Option<business::Model>>
where
    C: ConnectionTrait,
{
    Business::find_by_id(business_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a business by its unique name.
pub async fn get_business_by_name<C>(db: &C, name: &str) -> Result<Option<business::Model>>
where
    C: ConnectionTrait,
{
    Business::find()
        .filter(business::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn require_business<C>(db: &C, business_id: i64) -> Result<business::Model>
where
    C: ConnectionTrait,
{
    get_business_by_id(db, business_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "business",
            id: business_id,
        })
}

/// All catalog foods in seed order.
pub async fn get_all_foods<C>(db: &C) -> Result<Vec<food::Model>>
where
    C: ConnectionTrait,
{
    Food::find()
        .order_by_asc(food::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a food by id.
pub async fn get_food_by_id<C>(db: &C, food_id: i64) -> Result<Option<food::Model>>
where
    C: ConnectionTrait,
{
    Food::find_by_id(food_id).one(db).await.map_err(Into::into)
}

/// All catalog cards in seed order, placeholders included.
pub async fn get_all_cards<C>(db: &C) -> Result<Vec<card::Model>>
where
    C: ConnectionTrait,
{
    Card::find()
        .order_by_asc(card::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a card by id.
pub async fn get_card_by_id<C>(db: &C, card_id: i64) -> Result<Option<card::Model>>
where
    C: ConnectionTrait,
{
    Card::find_by_id(card_id).one(db).await.map_err(Into::into)
}

/// All cards of one class, placeholders included.
pub async fn get_cards_by_class<C>(db: &C, class: CardClass) -> Result<Vec<card::Model>>
where
    C: ConnectionTrait,
{
    Card::find()
        .filter(card::Column::Class.eq(class))
        .order_by_asc(card::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Cards that carry an actual effect and may be dealt for `class`.
///
/// [`CardClass::Random`] deals from every concrete card.
pub async fn get_drawable_cards<C>(db: &C, class: CardClass) -> Result<Vec<card::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Card::find().filter(card::Column::Field.is_not_null());
    if class != CardClass::Random {
        query = query.filter(card::Column::Class.eq(class));
    }
    query
        .order_by_asc(card::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
