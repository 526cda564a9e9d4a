//! Inventory-business join - Units of a catalog business held by an inventory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business holding database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_businesses")]
pub struct Model {
    /// Unique identifier for the holding
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning inventory
    pub inventory_id: i64,
    /// Catalog business held
    pub business_id: i64,
    /// Units held; the row is removed when this reaches zero
    pub quantity: i32,
}

/// Defines relationships between holdings and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Removed with the inventory
    #[sea_orm(
        belongs_to = "super::inventory::Entity",
        from = "Column::InventoryId",
        to = "super::inventory::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Inventory,
    /// Catalog side
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Business,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
