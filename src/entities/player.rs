//! Player entity - One participant in one match.
//!
//! Holds the running finances the turn engine adjusts: cash on hand and the
//! daily income and expense rates accumulated from owned businesses and card effects.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Player database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Unique identifier for the player
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Cash balance, may go negative after hostile cards
    pub cash: f64,
    /// Daily income rate
    pub income: f64,
    /// Daily expense rate
    pub expenses: f64,
}

/// Defines relationships between Player and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One player has many days
    #[sea_orm(has_many = "super::day::Entity")]
    Days,
    /// One player owns inventories (one per match)
    #[sea_orm(has_many = "super::inventory::Entity")]
    Inventories,
    /// One player has one shop per day
    #[sea_orm(has_many = "super::shop::Entity")]
    Shops,
}

impl Related<super::day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventories.def()
    }
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
