//! Shop entity - The businesses on offer to one player on one day.
//!
//! A unique index on (`player_id`, `day_id`) keeps it to one shop per player per day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    /// Unique identifier for the shop
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Player the shop is rolled for
    pub player_id: i64,
    /// Day the shop is open
    pub day_id: i64,
}

/// Defines relationships between Shop and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each shop belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Player,
    /// Each shop belongs to one day
    #[sea_orm(
        belongs_to = "super::day::Entity",
        from = "Column::DayId",
        to = "super::day::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Day,
    /// Listings
    #[sea_orm(has_many = "super::shop_business::Entity")]
    ShopBusinesses,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Day.def()
    }
}

impl Related<super::shop_business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopBusinesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
