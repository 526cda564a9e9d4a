//! Business entity - Catalog of purchasable businesses.
//!
//! Seeded once from the bundled catalog and read-only afterwards. Owned copies are
//! tracked in `inventory_businesses`, listings in `shop_businesses`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price band of a business
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Street-level businesses
    #[sea_orm(string_value = "low")]
    Low,
    /// Shops and services
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Large enterprises
    #[sea_orm(string_value = "high")]
    High,
}

/// Business database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    /// Catalog id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Lemonade Stand")
    #[sea_orm(unique)]
    pub name: String,
    /// Income added to the owner's daily rate per unit
    pub income: f64,
    /// Purchase price
    pub cost: f64,
    /// Upkeep added to the owner's daily expenses per unit
    pub upkeep: f64,
    /// Price band
    pub tier: Tier,
    /// Key the presentation layer maps to an icon
    pub icon: String,
}

/// Defines relationships between Business and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Held in inventories
    #[sea_orm(has_many = "super::inventory_business::Entity")]
    InventoryBusinesses,
    /// Listed in shops
    #[sea_orm(has_many = "super::shop_business::Entity")]
    ShopBusinesses,
}

impl Related<super::inventory_business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryBusinesses.def()
    }
}

impl Related<super::shop_business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopBusinesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
