//! Match business logic - Matches and their participant/day bridges.

use crate::{
    core::at_most_one,
    entities::{Day, Match, MatchDay, MatchPlayer, Player, day, game_match, match_day, match_player, player},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates an unfinished match stamped with the current time.
pub async fn create_match<C>(db: &C) -> Result<game_match::Model>
where
    C: ConnectionTrait,
{
    game_match::ActiveModel {
        winner: Set(None),
        started_at: Set(Utc::now()),
        finished_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a match by id.
pub async fn get_match_by_id<C>(db: &C, match_id: i64) -> Result<Option<game_match::Model>>
where
    C: ConnectionTrait,
{
    Match::find_by_id(match_id).one(db).await.map_err(Into::into)
}

pub(crate) async fn require_match<C>(db: &C, match_id: i64) -> Result<game_match::Model>
where
    C: ConnectionTrait,
{
    get_match_by_id(db, match_id).await?.ok_or(Error::NotFound {
        entity: "match",
        id: match_id,
    })
}

/// Deletes a match. Its participant and day links and its inventories go with it;
/// the players and days themselves stay.
pub async fn delete_match<C>(db: &C, match_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(Match::delete_by_id(match_id).exec(db).await?.rows_affected)
}

/// Records the winner's name and the finish time.
///
/// A match that already finished keeps its winner: [`Error::MatchFinished`].
pub async fn set_winner<C>(db: &C, match_id: i64, winner: &str) -> Result<game_match::Model>
where
    C: ConnectionTrait,
{
    let game = require_match(db, match_id).await?;
    if game.finished_at.is_some() {
        return Err(Error::MatchFinished { match_id });
    }
    let mut active: game_match::ActiveModel = game.into();
    active.winner = Set(Some(winner.to_string()));
    active.finished_at = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Links a player to a match.
pub async fn add_player_to_match<C>(db: &C, match_id: i64, player_id: i64) -> Result<match_player::Model>
where
    C: ConnectionTrait,
{
    match_player::ActiveModel {
        match_id: Set(match_id),
        player_id: Set(player_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Links a day to a match.
pub async fn add_day_to_match<C>(db: &C, match_id: i64, day_id: i64) -> Result<match_day::Model>
where
    C: ConnectionTrait,
{
    match_day::ActiveModel {
        match_id: Set(match_id),
        day_id: Set(day_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Players participating in a match, in joining order.
pub async fn get_players_for_match<C>(db: &C, match_id: i64) -> Result<Vec<player::Model>>
where
    C: ConnectionTrait,
{
    let rows = MatchPlayer::find()
        .filter(match_player::Column::MatchId.eq(match_id))
        .order_by_asc(match_player::Column::Id)
        .find_also_related(Player)
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, player)| player).collect())
}

/// Days played in a match, in creation order.
pub async fn get_days_for_match<C>(db: &C, match_id: i64) -> Result<Vec<day::Model>>
where
    C: ConnectionTrait,
{
    let rows = MatchDay::find()
        .filter(match_day::Column::MatchId.eq(match_id))
        .order_by_asc(match_day::Column::Id)
        .find_also_related(Day)
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, day)| day).collect())
}

/// The match a player takes part in.
pub async fn get_match_for_player<C>(db: &C, player_id: i64) -> Result<Option<game_match::Model>>
where
    C: ConnectionTrait,
{
    let rows = MatchPlayer::find()
        .filter(match_player::Column::PlayerId.eq(player_id))
        .find_also_related(Match)
        .all(db)
        .await?;

    let matches: Vec<game_match::Model> = rows.into_iter().filter_map(|(_, game)| game).collect();
    at_most_one(matches, "match")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::calendar;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_players_for_match_via_join_table() -> Result<()> {
        let db = setup_test_db().await?;
        let game = create_match(&db).await?;
        let other_game = create_match(&db).await?;
        let ana = create_test_player(&db, "Ana").await?;
        let bruno = create_test_player(&db, "Bruno").await?;
        let carla = create_test_player(&db, "Carla").await?;

        add_player_to_match(&db, game.id, ana.id).await?;
        add_player_to_match(&db, game.id, bruno.id).await?;
        add_player_to_match(&db, other_game.id, carla.id).await?;

        let names: Vec<String> = get_players_for_match(&db, game.id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bruno"]);

        assert_eq!(get_match_for_player(&db, carla.id).await?.map(|m| m.id), Some(other_game.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_link_requires_existing_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let game = create_match(&db).await?;

        let result = add_player_to_match(&db, game.id, 31337).await;
        assert!(matches!(result, Err(Error::ConstraintViolation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_match_removes_only_bridges() -> Result<()> {
        let db = setup_test_db().await?;
        let game = create_match(&db).await?;
        let ana = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let day = calendar::create_day(&db, ana.id, month.id, 1).await?;
        add_player_to_match(&db, game.id, ana.id).await?;
        add_day_to_match(&db, game.id, day.id).await?;

        assert_eq!(delete_match(&db, game.id).await?, 1);

        assert_eq!(MatchPlayer::find().count(&db).await?, 0);
        assert_eq!(MatchDay::find().count(&db).await?, 0);
        assert_eq!(Player::find().count(&db).await?, 1);
        assert_eq!(Day::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_winner() -> Result<()> {
        let db = setup_test_db().await?;
        let game = create_match(&db).await?;
        assert!(game.winner.is_none());

        let finished = set_winner(&db, game.id, "Ana").await?;
        assert_eq!(finished.winner.as_deref(), Some("Ana"));
        assert!(finished.finished_at.is_some());

        assert!(matches!(
            set_winner(&db, game.id, "Bruno").await,
            Err(Error::MatchFinished { .. })
        ));
        let kept = get_match_by_id(&db, game.id).await?.unwrap();
        assert_eq!(kept.winner.as_deref(), Some("Ana"));

        assert!(matches!(
            set_winner(&db, 555, "Nobody").await,
            Err(Error::NotFound { entity: "match", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_days_for_match() -> Result<()> {
        let db = setup_test_db().await?;
        let game = create_match(&db).await?;
        let ana = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let first = calendar::create_day(&db, ana.id, month.id, 1).await?;
        let second = calendar::create_day(&db, ana.id, month.id, 2).await?;
        add_day_to_match(&db, game.id, first.id).await?;
        add_day_to_match(&db, game.id, second.id).await?;

        let days = get_days_for_match(&db, game.id).await?;
        assert_eq!(days, vec![first, second]);
        Ok(())
    }
}
