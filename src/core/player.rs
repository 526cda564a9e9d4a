//! Player business logic - Handles player rows and their finances.
//!
//! Income and expenses are daily rates; cash moves at the end of each turn and
//! on purchases. Rates never drop below zero; cash may.

use crate::{
    entities::{CardField, Player, player},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, Unchanged, prelude::*};

/// Retrieves all players ordered by id.
pub async fn get_all_players<C>(db: &C) -> Result<Vec<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find()
        .order_by_asc(player::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a player by id.
pub async fn get_player_by_id<C>(db: &C, player_id: i64) -> Result<Option<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find_by_id(player_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_player_by_id`] but a missing row is an error.
pub(crate) async fn require_player<C>(db: &C, player_id: i64) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    get_player_by_id(db, player_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "player",
            id: player_id,
        })
}

/// Creates a new player with the given starting cash and zero rates.
///
/// The name is trimmed and must not be empty; the cash must be finite.
pub async fn create_player<C>(db: &C, name: &str, cash: f64) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Player name cannot be empty".to_string(),
        });
    }
    if !cash.is_finite() {
        return Err(Error::InvalidAmount { amount: cash });
    }

    player::ActiveModel {
        name: Set(name.trim().to_string()),
        cash: Set(cash),
        income: Set(0.0),
        expenses: Set(0.0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Writes every column of `player` back by primary key.
pub async fn update_player<C>(db: &C, player: player::Model) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    let id = player.id;
    let active = player::ActiveModel {
        id: Unchanged(player.id),
        name: Set(player.name),
        cash: Set(player.cash),
        income: Set(player.income),
        expenses: Set(player.expenses),
    };
    active.update(db).await.map_err(|e| match Error::from(e) {
        Error::NotFound { .. } => Error::NotFound {
            entity: "player",
            id,
        },
        other => other,
    })
}

/// Deletes a player and, through cascades, their days, shops, inventories and links.
///
/// Deleting a missing player is not an error; the number of rows removed is returned.
pub async fn delete_player<C>(db: &C, player_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Player::delete_by_id(player_id).exec(db).await?;
    Ok(result.rows_affected)
}

/// Atomically adds `delta` to a player's cash: `UPDATE players SET cash = cash + delta`.
pub async fn credit_cash<C>(db: &C, player_id: i64, delta: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    if !delta.is_finite() {
        return Err(Error::InvalidAmount { amount: delta });
    }

    let result = Player::update_many()
        .col_expr(player::Column::Cash, Expr::col(player::Column::Cash).add(delta))
        .filter(player::Column::Id.eq(player_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "player",
            id: player_id,
        });
    }
    Ok(())
}

/// Adds `delta` to one financial field of a player and returns the change actually applied.
///
/// Income and expenses are clamped at zero, so the applied change can be smaller
/// in magnitude than `delta`. Cash is never clamped.
pub async fn adjust_finances<C>(db: &C, player_id: i64, field: CardField, delta: f64) -> Result<f64>
where
    C: ConnectionTrait,
{
    if !delta.is_finite() {
        return Err(Error::InvalidAmount { amount: delta });
    }

    let player = require_player(db, player_id).await?;
    let (current, column) = match field {
        CardField::Cash => {
            credit_cash(db, player_id, delta).await?;
            return Ok(delta);
        }
        CardField::Income => (player.income, player::Column::Income),
        CardField::Expenses => (player.expenses, player::Column::Expenses),
    };

    let updated = (current + delta).max(0.0);
    Player::update_many()
        .col_expr(column, Expr::value(updated))
        .filter(player::Column::Id.eq(player_id))
        .exec(db)
        .await?;

    Ok(updated - current)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_insert_then_read_all_includes_player_once() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_player(&db, "Ana", 600.0).await?;

        let all = get_all_players(&db).await?;
        assert_eq!(all.iter().filter(|p| p.id == ana.id).count(), 1);
        assert_eq!(all[0].name, "Ana");
        assert_eq!(all[0].cash, 600.0);

        // The returned id is usable for update and delete
        let mut renamed = ana.clone();
        renamed.name = "Ana Maria".to_string();
        let renamed = update_player(&db, renamed).await?;
        assert_eq!(renamed.id, ana.id);
        assert_eq!(get_player_by_id(&db, ana.id).await?.unwrap().name, "Ana Maria");

        assert_eq!(delete_player(&db, ana.id).await?, 1);
        assert!(get_all_players(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_player_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_player(&db, "   ", 10.0).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = create_player(&db, "Bruno", f64::INFINITY).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_player_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(delete_player(&db, 404).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_player_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let ghost = player::Model {
            id: 77,
            name: "Ghost".to_string(),
            cash: 0.0,
            income: 0.0,
            expenses: 0.0,
        };
        let result = update_player(&db, ghost).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "player",
                id: 77
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_credit_cash() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Carla").await?;

        credit_cash(&db, player.id, -250.0).await?;
        credit_cash(&db, player.id, 50.0).await?;

        let player = get_player_by_id(&db, player.id).await?.unwrap();
        assert_eq!(player.cash, 400.0);

        assert!(matches!(
            credit_cash(&db, 999, 1.0).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_finances_clamps_rates() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Davi").await?;

        let applied = adjust_finances(&db, player.id, CardField::Income, 30.0).await?;
        assert_eq!(applied, 30.0);

        // Only 30 can be taken away
        let applied = adjust_finances(&db, player.id, CardField::Income, -50.0).await?;
        assert_eq!(applied, -30.0);

        let applied = adjust_finances(&db, player.id, CardField::Cash, -700.0).await?;
        assert_eq!(applied, -700.0);

        let player = get_player_by_id(&db, player.id).await?.unwrap();
        assert_eq!(player.income, 0.0);
        assert_eq!(player.cash, -100.0);
        Ok(())
    }
}
