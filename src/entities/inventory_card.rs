//! Inventory-card join - One drawn card whose effect is still running.
//!
//! `applied_delta` is the signed change the card makes to the target's daily
//! rate while the row exists; the target's rates are recomputed from holdings
//! and these rows, so removing the row ends the effect.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Active card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_cards")]
pub struct Model {
    /// Unique identifier for the instance
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Inventory of the player who drew the card
    pub inventory_id: i64,
    /// Catalog card
    pub card_id: i64,
    /// Player the effect landed on
    pub target_player_id: i64,
    /// Days left; the row is removed when this reaches zero
    pub duration: i32,
    /// Signed change to the target's income or expenses while running
    pub applied_delta: f64,
}

/// Defines relationships between active cards and other entities
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
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Card,
    /// Removed with the target player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::TargetPlayerId",
        to = "super::player::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TargetPlayer,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
