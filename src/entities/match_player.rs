//! Match-player bridge - Links a match to a participant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Match participant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "match_players")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Match side
    pub match_id: i64,
    /// Player side
    pub player_id: i64,
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
    /// Removed with the player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Player,
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
