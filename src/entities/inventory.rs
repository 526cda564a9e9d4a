//! Inventory entity - Owned-items container of one player within one match.
//!
//! A unique index on (`player_id`, `match_id`) allows one inventory per pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    /// Unique identifier for the inventory
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner
    pub player_id: i64,
    /// Match the inventory is scoped to
    pub match_id: i64,
}

/// Defines relationships between Inventory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Removed with its owner
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Player,
    /// Removed with its match
    #[sea_orm(
        belongs_to = "super::game_match::Entity",
        from = "Column::MatchId",
        to = "super::game_match::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Match,
    /// Business holdings
    #[sea_orm(has_many = "super::inventory_business::Entity")]
    Businesses,
    /// Active foods
    #[sea_orm(has_many = "super::inventory_food::Entity")]
    Foods,
    /// Active cards
    #[sea_orm(has_many = "super::inventory_card::Entity")]
    Cards,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::inventory_business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::inventory_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Foods.def()
    }
}

impl Related<super::inventory_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
