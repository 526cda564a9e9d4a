//! Inventory-food join - One active food instance with its remaining days.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Active food database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_foods")]
pub struct Model {
    /// Unique identifier for the instance
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning inventory
    pub inventory_id: i64,
    /// Catalog food
    pub food_id: i64,
    /// Days left; the row is removed when this reaches zero
    pub duration: i32,
}

/// Defines relationships between active foods and other entities
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
        belongs_to = "super::food::Entity",
        from = "Column::FoodId",
        to = "super::food::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Food,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<super::food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Food.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
