//! Financial summaries of players and match standings.
//!
//! Everything here is read-only and returns structured data for the
//! presentation layer to format.

use crate::{
    core::{game_match, inventory, player},
    entities::{inventory as inventory_entity, player as player_entity},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// A player's finances and holdings at a glance.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    /// The player row
    pub player: player_entity::Model,
    /// Income minus expenses, credited at the end of each turn
    pub daily_net: f64,
    /// Business units held across all holdings
    pub business_units: i64,
    /// Foods still running
    pub active_foods: usize,
    /// Card effects still running on this player's inventories
    pub active_cards: usize,
    /// Purchase cost of every business unit held
    pub portfolio_value: f64,
}

/// Builds the summary of one player across every match they take part in.
///
/// A player without an inventory yet reports empty holdings.
pub async fn player_summary<C>(db: &C, player_id: i64) -> Result<PlayerSummary>
where
    C: ConnectionTrait,
{
    let player = player::require_player(db, player_id).await?;
    let inventories = inventory::get_inventories_by_player(db, player_id).await?;
    summarize(db, player, &inventories).await
}

/// Builds the summary of one player limited to their inventory in `match_id`.
pub async fn player_match_summary<C>(db: &C, player_id: i64, match_id: i64) -> Result<PlayerSummary>
where
    C: ConnectionTrait,
{
    let player = player::require_player(db, player_id).await?;
    let inventories: Vec<_> = inventory::get_inventory_for_player_match(db, player_id, match_id)
        .await?
        .into_iter()
        .collect();
    summarize(db, player, &inventories).await
}

async fn summarize<C>(
    db: &C,
    player: player_entity::Model,
    inventories: &[inventory_entity::Model],
) -> Result<PlayerSummary>
where
    C: ConnectionTrait,
{
    let mut business_units = 0;
    let mut portfolio_value = 0.0;
    let mut active_foods = 0;
    let mut active_cards = 0;

    for inv in inventories {
        for owned in inventory::list_businesses_with_detail(db, inv.id).await? {
            business_units += i64::from(owned.holding.quantity);
            portfolio_value += owned.business.cost * f64::from(owned.holding.quantity);
        }
        active_foods += inventory::list_foods_with_detail(db, inv.id).await?.len();
        active_cards += inventory::list_cards_with_detail(db, inv.id).await?.len();
    }

    Ok(PlayerSummary {
        daily_net: player.income - player.expenses,
        player,
        business_units,
        active_foods,
        active_cards,
        portfolio_value,
    })
}

/// Summaries of every participant of a match, richest first.
pub async fn match_standings<C>(db: &C, match_id: i64) -> Result<Vec<PlayerSummary>>
where
    C: ConnectionTrait,
{
    let mut standings = Vec::new();
    for participant in game_match::get_players_for_match(db, match_id).await? {
        standings.push(player_match_summary(db, participant.id, match_id).await?);
    }
    standings.sort_by(|a, b| b.player.cash.total_cmp(&a.player.cash));
    Ok(standings)
}

/// Formats a cash change with its sign, like "+$50.00" or "-$25.50".
#[must_use]
pub fn format_signed_amount(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+${amount:.2}")
    } else {
        format!("-${:.2}", amount.abs())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_format_signed_amount() {
        assert_eq!(format_signed_amount(50.0), "+$50.00");
        assert_eq!(format_signed_amount(-25.5), "-$25.50");
        assert_eq!(format_signed_amount(0.0), "+$0.00");
    }

    #[tokio::test]
    async fn test_summary_without_inventory() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_player(&db, "Ana").await?;

        let summary = player_summary(&db, ana.id).await?;
        assert_eq!(summary.player.cash, 600.0);
        assert_eq!(summary.daily_net, 0.0);
        assert_eq!(summary.business_units, 0);
        assert_eq!(summary.portfolio_value, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_counts_holdings() -> Result<()> {
        let (db, ana, _, inv) = setup_player_in_match().await?;
        inventory::add_business(&db, inv.id, 1, 2).await?;
        inventory::add_food(&db, inv.id, 1, 2).await?;
        player::update_player(
            &db,
            player_entity::Model {
                income: 24.0,
                expenses: 4.0,
                ..ana.clone()
            },
        )
        .await?;

        let summary = player_summary(&db, ana.id).await?;
        assert_eq!(summary.daily_net, 20.0);
        assert_eq!(summary.business_units, 2);
        assert_eq!(summary.active_foods, 1);
        assert_eq!(summary.active_cards, 0);
        assert_eq!(summary.portfolio_value, 200.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_player_in_two_matches() -> Result<()> {
        let (db, ana, first, inv) = setup_player_in_match().await?;
        let second = game_match::create_match(&db).await?;
        game_match::add_player_to_match(&db, second.id, ana.id).await?;
        let other_inv = inventory::create_inventory(&db, ana.id, second.id).await?;
        inventory::add_business(&db, inv.id, 1, 1).await?;
        inventory::add_business(&db, other_inv.id, 1, 3).await?;

        let overall = player_summary(&db, ana.id).await?;
        assert_eq!(overall.business_units, 4);

        let in_first = player_match_summary(&db, ana.id, first.id).await?;
        assert_eq!(in_first.business_units, 1);
        let standings = match_standings(&db, second.id).await?;
        assert_eq!(standings[0].business_units, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_player_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = player_summary(&db, 99).await;
        assert!(matches!(
            result,
            Err(crate::errors::Error::NotFound { entity: "player", id: 99 })
        ));
        Ok(())
    }
}
