//! Food entity - Catalog of consumables with a timed daily effect.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Food database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    /// Catalog id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    #[sea_orm(unique)]
    pub name: String,
    /// Number of days the effect lasts
    pub duration: i32,
    /// Purchase price
    pub price: f64,
    /// Cash bonus credited at the end of each day while active
    pub effect: f64,
}

/// Defines relationships between Food and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Held in inventories
    #[sea_orm(has_many = "super::inventory_food::Entity")]
    InventoryFoods,
}

impl Related<super::inventory_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryFoods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
