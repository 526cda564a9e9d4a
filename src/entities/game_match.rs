//! Match entity - One played game session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Match database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    /// Unique identifier for the match
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the winning player once the match is finished
    pub winner: Option<String>,
    /// When the match was created
    pub started_at: DateTimeUtc,
    /// When the winner was recorded
    pub finished_at: Option<DateTimeUtc>,
}

/// Defines relationships between Match and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Participants
    #[sea_orm(has_many = "super::match_player::Entity")]
    MatchPlayers,
    /// Days played
    #[sea_orm(has_many = "super::match_day::Entity")]
    MatchDays,
    /// One inventory per participant
    #[sea_orm(has_many = "super::inventory::Entity")]
    Inventories,
}

impl Related<super::match_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::match_day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchDays.def()
    }
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
