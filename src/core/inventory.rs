//! Inventory business logic - Owned items of a player within a match.
//!
//! Business holdings carry a quantity; foods and cards are one row per instance
//! with a countdown. The grouped counts back "3x Lemonade Stand" style views.

use crate::{
    core::{at_most_one, player},
    entities::{
        Business, Card, CardField, Food, Inventory, InventoryBusiness, InventoryCard,
        InventoryFood, business, card, food, inventory, inventory_business, inventory_card,
        inventory_food, player as player_entity,
    },
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;

/// A business holding together with its catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedBusiness {
    /// The join row
    pub holding: inventory_business::Model,
    /// Catalog detail (name, icon, rates)
    pub business: business::Model,
}

/// An active food together with its catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFood {
    /// The join row
    pub holding: inventory_food::Model,
    /// Catalog detail
    pub food: food::Model,
}

/// A running card effect together with its catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveCard {
    /// The join row
    pub holding: inventory_card::Model,
    /// Catalog detail
    pub card: card::Model,
}

/// Creates the inventory of a player in a match.
///
/// A second inventory for the same pair fails with [`Error::ConstraintViolation`].
pub async fn create_inventory<C>(db: &C, player_id: i64, match_id: i64) -> Result<inventory::Model>
where
    C: ConnectionTrait,
{
    inventory::ActiveModel {
        player_id: Set(player_id),
        match_id: Set(match_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds an inventory by id.
pub async fn get_inventory_by_id<C>(db: &C, inventory_id: i64) -> Result<Option<inventory::Model>>
where
    C: ConnectionTrait,
{
    Inventory::find_by_id(inventory_id)
        .one(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn require_inventory<C>(db: &C, inventory_id: i64) -> Result<inventory::Model>
where
    C: ConnectionTrait,
{
    get_inventory_by_id(db, inventory_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "inventory",
            id: inventory_id,
        })
}

/// The inventory of a player.
///
/// Players are per-match participants, so one is expected; several is reported
/// as [`Error::AmbiguousResult`].
pub async fn get_inventory_by_player<C>(db: &C, player_id: i64) -> Result<Option<inventory::Model>>
where
    C: ConnectionTrait,
{
    let rows = get_inventories_by_player(db, player_id).await?;
    at_most_one(rows, "inventory")
}

/// Every inventory of a player, one per match joined, oldest first.
pub async fn get_inventories_by_player<C>(db: &C, player_id: i64) -> Result<Vec<inventory::Model>>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::PlayerId.eq(player_id))
        .order_by_asc(inventory::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All inventories of a match, one per participant.
pub async fn get_inventories_by_match<C>(db: &C, match_id: i64) -> Result<Vec<inventory::Model>>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::MatchId.eq(match_id))
        .order_by_asc(inventory::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The inventory of a player in a given match.
pub async fn get_inventory_for_player_match<C>(
    db: &C,
    player_id: i64,
    match_id: i64,
) -> Result<Option<inventory::Model>>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::PlayerId.eq(player_id))
        .filter(inventory::Column::MatchId.eq(match_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes an inventory and, through cascades, every holding in it.
pub async fn delete_inventory<C>(db: &C, inventory_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(Inventory::delete_by_id(inventory_id)
        .exec(db)
        .await?
        .rows_affected)
}

/// Inserts a raw business holding row.
pub async fn insert_business_holding<C>(
    db: &C,
    inventory_id: i64,
    business_id: i64,
    quantity: i32,
) -> Result<inventory_business::Model>
where
    C: ConnectionTrait,
{
    if quantity < 1 {
        return Err(Error::InvalidAmount {
            amount: f64::from(quantity),
        });
    }

    inventory_business::ActiveModel {
        inventory_id: Set(inventory_id),
        business_id: Set(business_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Adds `quantity` units of a business, growing the existing holding when there is one.
pub async fn add_business<C>(
    db: &C,
    inventory_id: i64,
    business_id: i64,
    quantity: i32,
) -> Result<inventory_business::Model>
where
    C: ConnectionTrait,
{
    let existing = InventoryBusiness::find()
        .filter(inventory_business::Column::InventoryId.eq(inventory_id))
        .filter(inventory_business::Column::BusinessId.eq(business_id))
        .order_by_asc(inventory_business::Column::Id)
        .one(db)
        .await?;

    match existing {
        Some(holding) if quantity > 0 => {
            let quantity = holding.quantity + quantity;
            let mut active: inventory_business::ActiveModel = holding.into();
            active.quantity = Set(quantity);
            active.update(db).await.map_err(Into::into)
        }
        _ => insert_business_holding(db, inventory_id, business_id, quantity).await,
    }
}

/// Removes one unit of a business and returns the units left.
///
/// The holding row is deleted when it reaches zero. Holding nothing is
/// [`Error::NotFound`].
pub async fn remove_business<C>(db: &C, inventory_id: i64, business_id: i64) -> Result<i32>
where
    C: ConnectionTrait,
{
    let holding = InventoryBusiness::find()
        .filter(inventory_business::Column::InventoryId.eq(inventory_id))
        .filter(inventory_business::Column::BusinessId.eq(business_id))
        .order_by_asc(inventory_business::Column::Id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "business holding",
            id: business_id,
        })?;

    let left = holding.quantity - 1;
    if left <= 0 {
        holding.delete(db).await?;
    } else {
        let mut active: inventory_business::ActiveModel = holding.into();
        active.quantity = Set(left);
        active.update(db).await?;
    }

    let remaining: Option<i64> = InventoryBusiness::find()
        .select_only()
        .column_as(Expr::col(inventory_business::Column::Quantity).sum(), "total")
        .filter(inventory_business::Column::InventoryId.eq(inventory_id))
        .filter(inventory_business::Column::BusinessId.eq(business_id))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?
        .flatten();

    Ok(i32::try_from(remaining.unwrap_or(0)).unwrap_or(i32::MAX))
}

/// Adds one food instance with `duration` days left.
pub async fn add_food<C>(
    db: &C,
    inventory_id: i64,
    food_id: i64,
    duration: i32,
) -> Result<inventory_food::Model>
where
    C: ConnectionTrait,
{
    inventory_food::ActiveModel {
        inventory_id: Set(inventory_id),
        food_id: Set(food_id),
        duration: Set(duration),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Records a running card effect.
pub async fn add_card<C>(
    db: &C,
    inventory_id: i64,
    card_id: i64,
    target_player_id: i64,
    duration: i32,
    applied_delta: f64,
) -> Result<inventory_card::Model>
where
    C: ConnectionTrait,
{
    inventory_card::ActiveModel {
        inventory_id: Set(inventory_id),
        card_id: Set(card_id),
        target_player_id: Set(target_player_id),
        duration: Set(duration),
        applied_delta: Set(applied_delta),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Business holdings of an inventory with their catalog rows attached.
pub async fn list_businesses_with_detail<C>(db: &C, inventory_id: i64) -> Result<Vec<OwnedBusiness>>
where
    C: ConnectionTrait,
{
    let rows = InventoryBusiness::find()
        .filter(inventory_business::Column::InventoryId.eq(inventory_id))
        .order_by_asc(inventory_business::Column::Id)
        .find_also_related(Business)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(holding, business)| business.map(|business| OwnedBusiness { holding, business }))
        .collect())
}

/// Active foods of an inventory with their catalog rows attached.
pub async fn list_foods_with_detail<C>(db: &C, inventory_id: i64) -> Result<Vec<ActiveFood>>
where
    C: ConnectionTrait,
{
    let rows = InventoryFood::find()
        .filter(inventory_food::Column::InventoryId.eq(inventory_id))
        .order_by_asc(inventory_food::Column::Id)
        .find_also_related(Food)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(holding, food)| food.map(|food| ActiveFood { holding, food }))
        .collect())
}

/// Running card effects drawn into an inventory with their catalog rows attached.
pub async fn list_cards_with_detail<C>(db: &C, inventory_id: i64) -> Result<Vec<ActiveCard>>
where
    C: ConnectionTrait,
{
    let rows = InventoryCard::find()
        .filter(inventory_card::Column::InventoryId.eq(inventory_id))
        .order_by_asc(inventory_card::Column::Id)
        .find_also_related(Card)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(holding, card)| card.map(|card| ActiveCard { holding, card }))
        .collect())
}

/// Units held per catalog business: `business_id -> SUM(quantity)`.
pub async fn count_businesses_by_inventory<C>(db: &C, inventory_id: i64) -> Result<BTreeMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i64, i64)> = InventoryBusiness::find()
        .select_only()
        .column(inventory_business::Column::BusinessId)
        .column_as(Expr::col(inventory_business::Column::Quantity).sum(), "total")
        .filter(inventory_business::Column::InventoryId.eq(inventory_id))
        .group_by(inventory_business::Column::BusinessId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Active instances per catalog food: `food_id -> rows`.
pub async fn count_foods_by_inventory<C>(db: &C, inventory_id: i64) -> Result<BTreeMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i64, i64)> = InventoryFood::find()
        .select_only()
        .column(inventory_food::Column::FoodId)
        .column_as(Expr::col(inventory_food::Column::Id).count(), "total")
        .filter(inventory_food::Column::InventoryId.eq(inventory_id))
        .group_by(inventory_food::Column::FoodId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Running instances per catalog card: `card_id -> rows`.
pub async fn count_cards_by_inventory<C>(db: &C, inventory_id: i64) -> Result<BTreeMap<i64, i64>>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i64, i64)> = InventoryCard::find()
        .select_only()
        .column(inventory_card::Column::CardId)
        .column_as(Expr::col(inventory_card::Column::Id).count(), "total")
        .filter(inventory_card::Column::InventoryId.eq(inventory_id))
        .group_by(inventory_card::Column::CardId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Recomputes a player's daily income and expenses from what is running for them.
///
/// Income is the income of every business unit held across the player's
/// inventories plus the running income cards aimed at the player; expenses are
/// the upkeep plus the running expense cards. Neither goes below zero.
pub async fn recompute_rates<C>(db: &C, player_id: i64) -> Result<player_entity::Model>
where
    C: ConnectionTrait,
{
    let mut income = 0.0;
    let mut expenses = 0.0;

    let holdings = InventoryBusiness::find()
        .inner_join(Inventory)
        .filter(inventory::Column::PlayerId.eq(player_id))
        .find_also_related(Business)
        .all(db)
        .await?;
    for (holding, business) in holdings {
        if let Some(business) = business {
            let units = f64::from(holding.quantity);
            income += business.income * units;
            expenses += business.upkeep * units;
        }
    }

    let effects = InventoryCard::find()
        .filter(inventory_card::Column::TargetPlayerId.eq(player_id))
        .find_also_related(Card)
        .all(db)
        .await?;
    for (effect, card) in effects {
        match card.and_then(|c| c.field) {
            Some(CardField::Income) => income += effect.applied_delta,
            Some(CardField::Expenses) => expenses += effect.applied_delta,
            Some(CardField::Cash) | None => {}
        }
    }

    let current = player::require_player(db, player_id).await?;
    player::update_player(
        db,
        player_entity::Model {
            income: income.max(0.0),
            expenses: expenses.max(0.0),
            ..current
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_grouped_count_sums_rows_per_business() -> Result<()> {
        let (db, _player, _game, inventory) = setup_player_in_match().await?;

        for _ in 0..3 {
            insert_business_holding(&db, inventory.id, 7, 1).await?;
        }
        insert_business_holding(&db, inventory.id, 9, 1).await?;

        let counts = count_businesses_by_inventory(&db, inventory.id).await?;
        assert_eq!(counts, BTreeMap::from([(7, 3), (9, 1)]));
        Ok(())
    }

    #[tokio::test]
    async fn test_grouped_count_honours_quantity() -> Result<()> {
        let (db, _player, _game, inventory) = setup_player_in_match().await?;

        insert_business_holding(&db, inventory.id, 1, 2).await?;
        let counts = count_businesses_by_inventory(&db, inventory.id).await?;
        assert_eq!(counts, BTreeMap::from([(1, 2)]));
        Ok(())
    }

    #[tokio::test]
    async fn test_rates_follow_holdings_and_effects() -> Result<()> {
        let (db, ana, _, inv) = setup_player_in_match().await?;

        // Two Lemonade Stands: 2 x 12 income, 2 x 2 upkeep
        add_business(&db, inv.id, 1, 2).await?;
        let ana_now = recompute_rates(&db, ana.id).await?;
        assert_eq!((ana_now.income, ana_now.expenses), (24.0, 4.0));

        // A running -30 income effect cannot push income below zero
        add_card(&db, inv.id, 4, ana.id, 2, -30.0).await?;
        let ana_now = recompute_rates(&db, ana.id).await?;
        assert_eq!(ana_now.income, 0.0);

        // Once the holdings are gone and the effect is removed, nothing is left over
        remove_business(&db, inv.id, 1).await?;
        remove_business(&db, inv.id, 1).await?;
        InventoryCard::delete_many().exec(&db).await?;
        let ana_now = recompute_rates(&db, ana.id).await?;
        assert_eq!((ana_now.income, ana_now.expenses), (0.0, 0.0));
        assert_eq!(ana_now.cash, 600.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_inventories_of_a_player_in_two_matches() -> Result<()> {
        let (db, ana, _, first) = setup_player_in_match().await?;
        let other = crate::core::game_match::create_match(&db).await?;
        let second = create_inventory(&db, ana.id, other.id).await?;

        let all = get_inventories_by_player(&db, ana.id).await?;
        assert_eq!(all, vec![first, second]);
        assert!(matches!(
            get_inventory_by_player(&db, ana.id).await,
            Err(Error::AmbiguousResult { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_remove_business() -> Result<()> {
        let (db, _player, _game, inventory) = setup_player_in_match().await?;

        add_business(&db, inventory.id, 1, 1).await?;
        let holding = add_business(&db, inventory.id, 1, 1).await?;
        assert_eq!(holding.quantity, 2);
        assert_eq!(InventoryBusiness::find().count(&db).await?, 1);

        assert_eq!(remove_business(&db, inventory.id, 1).await?, 1);
        assert_eq!(remove_business(&db, inventory.id, 1).await?, 0);
        assert_eq!(InventoryBusiness::find().count(&db).await?, 0);

        let result = remove_business(&db, inventory.id, 1).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_holding_requires_existing_catalog_row() -> Result<()> {
        let (db, _player, _game, inventory) = setup_player_in_match().await?;

        let result = add_business(&db, inventory.id, 10_000, 1).await;
        assert!(matches!(result, Err(Error::ConstraintViolation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_inventory_unique_per_player_and_match() -> Result<()> {
        let (db, player, game, _inventory) = setup_player_in_match().await?;

        let result = create_inventory(&db, player.id, game.id).await;
        assert!(matches!(result, Err(Error::ConstraintViolation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_inventory_finders() -> Result<()> {
        let (db, player, game, inventory) = setup_player_in_match().await?;

        assert_eq!(get_inventory_by_player(&db, player.id).await?, Some(inventory.clone()));
        assert_eq!(get_inventories_by_match(&db, game.id).await?, vec![inventory.clone()]);
        assert_eq!(
            get_inventory_for_player_match(&db, player.id, game.id).await?,
            Some(inventory)
        );
        assert!(get_inventory_by_player(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_detail_lists() -> Result<()> {
        let (db, player, _game, inventory) = setup_player_in_match().await?;

        add_business(&db, inventory.id, 1, 3).await?;
        add_food(&db, inventory.id, 1, 2).await?;
        add_food(&db, inventory.id, 1, 2).await?;
        add_card(&db, inventory.id, 4, player.id, 3, 20.0).await?;

        let businesses = list_businesses_with_detail(&db, inventory.id).await?;
        assert_eq!(businesses.len(), 1);
        assert_eq!(businesses[0].business.name, "Lemonade Stand");
        assert_eq!(businesses[0].business.icon, "ic_lemonade");
        assert_eq!(businesses[0].holding.quantity, 3);

        let foods = list_foods_with_detail(&db, inventory.id).await?;
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].food.name, "Sandwich");
        assert_eq!(count_foods_by_inventory(&db, inventory.id).await?, BTreeMap::from([(1, 2)]));

        let cards = list_cards_with_detail(&db, inventory.id).await?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card.name, "Viral Review");
        assert_eq!(count_cards_by_inventory(&db, inventory.id).await?, BTreeMap::from([(4, 1)]));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_inventory_cascades_to_holdings() -> Result<()> {
        let (db, player, _game, inventory) = setup_player_in_match().await?;

        add_business(&db, inventory.id, 1, 2).await?;
        add_food(&db, inventory.id, 2, 4).await?;
        add_card(&db, inventory.id, 5, player.id, 2, 15.0).await?;

        assert_eq!(delete_inventory(&db, inventory.id).await?, 1);

        assert_eq!(InventoryBusiness::find().count(&db).await?, 0);
        assert_eq!(InventoryFood::find().count(&db).await?, 0);
        assert_eq!(InventoryCard::find().count(&db).await?, 0);

        let counts = crate::core::catalog::catalog_counts(&db).await?;
        assert_eq!((counts.businesses, counts.foods, counts.cards), (60, 3, 53));

        // Deleting again is a no-op
        assert_eq!(delete_inventory(&db, inventory.id).await?, 0);
        Ok(())
    }
}
