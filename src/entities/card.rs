//! Card entity - Catalog of effect cards.
//!
//! A concrete card modifies one financial `field` of its target by `magnitude`,
//! in the direction given by its `polarity`, for `duration` days (0 means the change
//! is permanent, as with cash). Placeholder cards have no field: drawing one means
//! "draw a random concrete card of this class".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the card helps or hurts its target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Beneficial to the target
    #[sea_orm(string_value = "positive")]
    Positive,
    /// Harmful to the target
    #[sea_orm(string_value = "negative")]
    Negative,
}

/// Who the effect lands on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Target {
    /// The player who drew the card
    #[sea_orm(string_value = "own")]
    #[serde(rename = "self")]
    Own,
    /// An opponent
    #[sea_orm(string_value = "other")]
    #[serde(rename = "other")]
    Other,
}

/// Deck a card belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CardClass {
    /// Effects on business income or running costs
    #[sea_orm(string_value = "business")]
    Business,
    /// Effects on cash
    #[sea_orm(string_value = "money")]
    Money,
    /// Any of the above
    #[sea_orm(string_value = "random")]
    Random,
}

/// Player column a card modifies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CardField {
    /// Daily income rate
    #[sea_orm(string_value = "income")]
    Income,
    /// Daily expense rate
    #[sea_orm(string_value = "expenses")]
    Expenses,
    /// Cash on hand
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Catalog id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    #[sea_orm(unique)]
    pub name: String,
    /// Short effect label shown on the card face
    pub effect_name: String,
    /// Helps or hurts
    pub polarity: Polarity,
    /// Drawer or opponent
    pub target: Target,
    /// Deck
    pub class: CardClass,
    /// Column modified; `None` for placeholder cards
    pub field: Option<CardField>,
    /// Unsigned size of the modification
    pub magnitude: f64,
    /// Days the modification lasts; 0 is permanent
    pub duration: i32,
}

impl Model {
    /// Placeholder cards stand for "draw a random effect of this class".
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.field.is_none()
    }
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Held in inventories
    #[sea_orm(has_many = "super::inventory_card::Entity")]
    InventoryCards,
}

impl Related<super::inventory_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryCards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
