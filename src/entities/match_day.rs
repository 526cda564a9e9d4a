//! Match-day bridge - Links a match to a day played in it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Match day database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "match_days")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Match side
    pub match_id: i64,
    /// Day side
    pub day_id: i64,
}

/// Defines relationships between the bridge and its ends
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Removed with the match
    #[sea_orm(
        belongs_to = "super::game_match::Entity",
        from = "Column::MatchId",
        to = "super::game_match::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Match,
    /// Removed with the day
    #[sea_orm(
        belongs_to = "super::day::Entity",
        from = "Column::DayId",
        to = "super::day::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Day,
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Day.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
