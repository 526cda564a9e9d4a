//! Day entity - A single turn of one player, inside one month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Day database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "days")]
pub struct Model {
    /// Unique identifier for the day
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 1-based day number within the month
    pub number: i32,
    /// Month this day belongs to
    pub month_id: i64,
    /// Player whose turn this day is
    pub player_id: i64,
}

/// Defines relationships between Day and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each day belongs to one month
    #[sea_orm(
        belongs_to = "super::month::Entity",
        from = "Column::MonthId",
        to = "super::month::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Month,
    /// Each day belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Player,
}

impl Related<super::month::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Month.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
