//! System state entity - Key/value markers about the store itself.
//!
//! Holds `schema_version` and `catalog_version`, which guard schema checks and
//! one-time catalog seeding.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model - stores key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Marker key (e.g., `"catalog_version"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Marker value stored as string
    pub value: String,
    /// When this marker was last written
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
