//! Core business logic - framework-agnostic finders and game commands.
//!
//! Every function takes any `ConnectionTrait` (a connection or an open transaction)
//! so the game commands in [`turn`] can compose them inside one atomic unit.

/// Catalog finders and the one-time seed
pub mod catalog;
/// Months and days
pub mod calendar;
/// Matches and their participant/day bridges
pub mod game_match;
/// Inventories and their business/food/card holdings
pub mod inventory;
/// Players and their finances
pub mod player;
/// Financial summaries and standings
pub mod report;
/// Daily shops and their listings
pub mod shop;
/// Atomic game commands: match setup, purchases, cards, end of turn
pub mod turn;

use crate::errors::{Error, Result};

/// Returns the single row of `rows`, `None` when empty, and an ambiguity error otherwise.
pub(crate) fn at_most_one<T>(mut rows: Vec<T>, entity: &'static str) -> Result<Option<T>> {
    match rows.len() {
        0 | 1 => Ok(rows.pop()),
        matches => Err(Error::AmbiguousResult { entity, matches }),
    }
}
