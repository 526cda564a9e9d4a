//! Month entity - Groups days; deleting a month removes its days.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Month database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "months")]
pub struct Model {
    /// Unique identifier for the month
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 1-based month number within a match
    pub number: i32,
}

/// Defines relationships between Month and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One month has many days
    #[sea_orm(has_many = "super::day::Entity")]
    Days,
}

impl Related<super::day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
