//! Calendar business logic - Months and days.
//!
//! Every player walks their own sequence of days; a day always belongs to one
//! month and one player. Months roll over after `days_per_month` days.

use crate::{
    core::at_most_one,
    entities::{Day, MatchDay, Month, day, match_day, month},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Where the calendar lands after one more day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPosition {
    /// Month number of the next day
    pub month_number: i32,
    /// Day number within that month
    pub day_number: i32,
    /// Whether a new month starts
    pub new_month: bool,
}

/// Computes the month/day numbers following (`month_number`, `day_number`).
#[must_use]
pub const fn next_position(month_number: i32, day_number: i32, days_per_month: i32) -> NextPosition {
    if day_number >= days_per_month {
        NextPosition {
            month_number: month_number + 1,
            day_number: 1,
            new_month: true,
        }
    } else {
        NextPosition {
            month_number,
            day_number: day_number + 1,
            new_month: false,
        }
    }
}

/// Creates a month row.
pub async fn create_month<C>(db: &C, number: i32) -> Result<month::Model>
where
    C: ConnectionTrait,
{
    month::ActiveModel {
        number: Set(number),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a month by id.
pub async fn get_month_by_id<C>(db: &C, month_id: i64) -> Result<Option<month::Model>>
where
    C: ConnectionTrait,
{
    Month::find_by_id(month_id).one(db).await.map_err(Into::into)
}

/// Deletes a month; its days go with it.
pub async fn delete_month<C>(db: &C, month_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(Month::delete_by_id(month_id).exec(db).await?.rows_affected)
}

/// Creates a day for `player_id` in `month_id`.
pub async fn create_day<C>(db: &C, player_id: i64, month_id: i64, number: i32) -> Result<day::Model>
where
    C: ConnectionTrait,
{
    if number < 1 {
        return Err(Error::Config {
            message: format!("Day number must be positive, got {number}"),
        });
    }

    day::ActiveModel {
        number: Set(number),
        month_id: Set(month_id),
        player_id: Set(player_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a day by id.
pub async fn get_day_by_id<C>(db: &C, day_id: i64) -> Result<Option<day::Model>>
where
    C: ConnectionTrait,
{
    Day::find_by_id(day_id).one(db).await.map_err(Into::into)
}

/// Fetches the single day of a player in a month.
///
/// The schema allows several days per (player, month); when more than one exists
/// this returns [`Error::AmbiguousResult`] rather than picking one.
pub async fn get_day_for_player_month<C>(
    db: &C,
    player_id: i64,
    month_id: i64,
) -> Result<Option<day::Model>>
where
    C: ConnectionTrait,
{
    let days = get_days_for_player_month(db, player_id, month_id).await?;
    at_most_one(days, "day")
}

/// Fetches all days of a player in a month, ordered by day number.
pub async fn get_days_for_player_month<C>(
    db: &C,
    player_id: i64,
    month_id: i64,
) -> Result<Vec<day::Model>>
where
    C: ConnectionTrait,
{
    Day::find()
        .filter(day::Column::PlayerId.eq(player_id))
        .filter(day::Column::MonthId.eq(month_id))
        .order_by_asc(day::Column::Number)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The most recently created day of a player, i.e. their current turn.
pub async fn get_latest_day<C>(db: &C, player_id: i64) -> Result<Option<day::Model>>
where
    C: ConnectionTrait,
{
    Day::find()
        .filter(day::Column::PlayerId.eq(player_id))
        .order_by_desc(day::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// The latest day a player has played in one match.
///
/// Days of the player in other matches are ignored.
pub async fn get_latest_day_in_match<C>(
    db: &C,
    player_id: i64,
    match_id: i64,
) -> Result<Option<day::Model>>
where
    C: ConnectionTrait,
{
    let row = MatchDay::find()
        .filter(match_day::Column::MatchId.eq(match_id))
        .find_also_related(Day)
        .filter(day::Column::PlayerId.eq(player_id))
        .order_by_desc(day::Column::Id)
        .one(db)
        .await?;

    Ok(row.and_then(|(_, day)| day))
}

/// A month with the given number already used by some day of the match.
pub async fn get_month_in_match<C>(db: &C, match_id: i64, number: i32) -> Result<Option<month::Model>>
where
    C: ConnectionTrait,
{
    let month_ids: Vec<i64> = MatchDay::find()
        .filter(match_day::Column::MatchId.eq(match_id))
        .find_also_related(Day)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, day)| day.map(|d| d.month_id))
        .collect();

    Month::find()
        .filter(month::Column::Id.is_in(month_ids))
        .filter(month::Column::Number.eq(number))
        .order_by_asc(month::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_next_position() {
        assert_eq!(
            next_position(1, 1, 30),
            NextPosition {
                month_number: 1,
                day_number: 2,
                new_month: false
            }
        );
        assert_eq!(
            next_position(3, 30, 30),
            NextPosition {
                month_number: 4,
                day_number: 1,
                new_month: true
            }
        );
        assert!(next_position(1, 1, 1).new_month);
    }

    #[tokio::test]
    async fn test_days_ordered_by_number() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = create_month(&db, 1).await?;

        create_day(&db, player.id, month.id, 3).await?;
        create_day(&db, player.id, month.id, 1).await?;
        create_day(&db, player.id, month.id, 2).await?;

        let numbers: Vec<i32> = get_days_for_player_month(&db, player.id, month.id)
            .await?
            .iter()
            .map(|d| d.number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_single_day_finder() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = create_month(&db, 1).await?;

        assert!(get_day_for_player_month(&db, player.id, month.id).await?.is_none());

        let first = create_day(&db, player.id, month.id, 1).await?;
        let found = get_day_for_player_month(&db, player.id, month.id).await?;
        assert_eq!(found, Some(first));

        create_day(&db, player.id, month.id, 2).await?;
        let result = get_day_for_player_month(&db, player.id, month.id).await;
        assert!(matches!(
            result,
            Err(Error::AmbiguousResult {
                entity: "day",
                matches: 2
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_day_requires_existing_month() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;

        let result = create_day(&db, player.id, 4242, 1).await;
        assert!(matches!(result, Err(Error::ConstraintViolation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_month_cascades_to_days() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = create_month(&db, 1).await?;
        create_day(&db, player.id, month.id, 1).await?;
        create_day(&db, player.id, month.id, 2).await?;

        assert_eq!(delete_month(&db, month.id).await?, 1);
        assert_eq!(Day::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_day() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = create_month(&db, 1).await?;

        assert!(get_latest_day(&db, player.id).await?.is_none());
        create_day(&db, player.id, month.id, 1).await?;
        let second = create_day(&db, player.id, month.id, 2).await?;
        assert_eq!(get_latest_day(&db, player.id).await?, Some(second));
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_day_is_scoped_to_the_match() -> Result<()> {
        let (db, ana, first, _) = setup_player_in_match().await?;
        let second = crate::core::game_match::create_match(&db).await?;
        let month = create_month(&db, 1).await?;

        let in_first = create_day(&db, ana.id, month.id, 1).await?;
        crate::core::game_match::add_day_to_match(&db, first.id, in_first.id).await?;
        let in_second = create_day(&db, ana.id, month.id, 1).await?;
        crate::core::game_match::add_day_to_match(&db, second.id, in_second.id).await?;

        assert_eq!(get_latest_day(&db, ana.id).await?, Some(in_second.clone()));
        assert_eq!(get_latest_day_in_match(&db, ana.id, first.id).await?, Some(in_first));
        assert_eq!(get_latest_day_in_match(&db, ana.id, second.id).await?, Some(in_second));
        Ok(())
    }

    #[tokio::test]
    async fn test_month_lookup_within_match() -> Result<()> {
        let (db, ana, game, _) = setup_player_in_match().await?;
        let other_game = crate::core::game_match::create_match(&db).await?;
        let month = create_month(&db, 2).await?;
        let day = create_day(&db, ana.id, month.id, 1).await?;
        crate::core::game_match::add_day_to_match(&db, game.id, day.id).await?;

        assert_eq!(get_month_in_match(&db, game.id, 2).await?, Some(month));
        assert!(get_month_in_match(&db, game.id, 3).await?.is_none());
        assert!(get_month_in_match(&db, other_game.id, 2).await?.is_none());
        Ok(())
    }
}
