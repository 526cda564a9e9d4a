//! Shop business logic - Daily shops and their listings.
//!
//! Each player gets one shop per day (enforced by a unique index). A shop lists a
//! random sample of catalog businesses; only listed businesses can be bought that day.

use crate::{
    core::catalog,
    entities::{Shop, ShopBusiness, business, shop, shop_business},
    errors::{Error, Result},
};
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Creates an empty shop for a player's day.
///
/// A second shop for the same (player, day) fails with [`Error::ConstraintViolation`].
pub async fn create_shop<C>(db: &C, player_id: i64, day_id: i64) -> Result<shop::Model>
where
    C: ConnectionTrait,
{
    shop::ActiveModel {
        player_id: Set(player_id),
        day_id: Set(day_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Whether any shop exists for `day_id`.
pub async fn shop_exists_for_day<C>(db: &C, day_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = Shop::find()
        .filter(shop::Column::DayId.eq(day_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Total number of shop rows.
pub async fn count_shops<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    Shop::find().count(db).await.map_err(Into::into)
}

/// The shop of a player on a given day.
pub async fn get_shop_for_player_day<C>(
    db: &C,
    player_id: i64,
    day_id: i64,
) -> Result<Option<shop::Model>>
where
    C: ConnectionTrait,
{
    Shop::find()
        .filter(shop::Column::PlayerId.eq(player_id))
        .filter(shop::Column::DayId.eq(day_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a catalog business in a shop.
pub async fn add_listing<C>(db: &C, shop_id: i64, business_id: i64) -> Result<shop_business::Model>
where
    C: ConnectionTrait,
{
    shop_business::ActiveModel {
        shop_id: Set(shop_id),
        business_id: Set(business_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Catalog businesses listed in a shop, in listing order.
pub async fn list_shop_businesses<C>(db: &C, shop_id: i64) -> Result<Vec<business::Model>>
where
    C: ConnectionTrait,
{
    let rows = ShopBusiness::find()
        .filter(shop_business::Column::ShopId.eq(shop_id))
        .order_by_asc(shop_business::Column::Id)
        .find_also_related(crate::entities::Business)
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, business)| business).collect())
}

/// Whether `business_id` is listed in `shop_id`.
pub async fn is_listed<C>(db: &C, shop_id: i64, business_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = ShopBusiness::find()
        .filter(shop_business::Column::ShopId.eq(shop_id))
        .filter(shop_business::Column::BusinessId.eq(business_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Opens a shop for a player's day listing `size` distinct random catalog businesses.
///
/// Fewer are listed when the catalog is smaller than `size`.
pub async fn roll_shop<C, R>(
    db: &C,
    player_id: i64,
    day_id: i64,
    size: usize,
    rng: &mut R,
) -> Result<(shop::Model, Vec<business::Model>)>
where
    C: ConnectionTrait,
    R: Rng + ?Sized,
{
    let catalog = catalog::get_all_businesses(db).await?;
    let offered: Vec<business::Model> = catalog.choose_multiple(rng, size).cloned().collect();

    let shop = create_shop(db, player_id, day_id).await?;
    for business in &offered {
        add_listing(db, shop.id, business.id).await?;
    }
    debug!(
        "Rolled shop {} for player {} with {} businesses",
        shop.id,
        player_id,
        offered.len()
    );
    Ok((shop, offered))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::calendar;
    use crate::test_utils::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn test_second_shop_for_same_day_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let day = calendar::create_day(&db, player.id, month.id, 1).await?;

        assert!(!shop_exists_for_day(&db, day.id).await?);
        create_shop(&db, player.id, day.id).await?;

        // The unique (player, day) index turns the duplicate into a hard error
        let second = create_shop(&db, player.id, day.id).await;
        assert!(matches!(second, Err(Error::ConstraintViolation { .. })));

        assert!(shop_exists_for_day(&db, day.id).await?);
        assert_eq!(count_shops(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_roll_shop_lists_distinct_businesses() -> Result<()> {
        let db = setup_seeded_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let day = calendar::create_day(&db, player.id, month.id, 1).await?;
        let mut rng = StdRng::seed_from_u64(7);

        let (shop, offered) = roll_shop(&db, player.id, day.id, 5, &mut rng).await?;
        assert_eq!(offered.len(), 5);

        let listed = list_shop_businesses(&db, shop.id).await?;
        let mut ids: Vec<i64> = listed.iter().map(|b| b.id).collect();
        assert_eq!(ids, offered.iter().map(|b| b.id).collect::<Vec<_>>());
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);

        assert!(is_listed(&db, shop.id, offered[0].id).await?);
        let found = get_shop_for_player_day(&db, player.id, day.id).await?;
        assert_eq!(found.map(|s| s.id), Some(shop.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_roll_shop_with_small_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_business(&db, "Kiosk", 50.0).await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let day = calendar::create_day(&db, player.id, month.id, 1).await?;
        let mut rng = StdRng::seed_from_u64(1);

        let (_, offered) = roll_shop(&db, player.id, day.id, 5, &mut rng).await?;
        assert_eq!(offered.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_day_removes_shop_and_listings() -> Result<()> {
        let db = setup_seeded_db().await?;
        let player = create_test_player(&db, "Ana").await?;
        let month = calendar::create_month(&db, 1).await?;
        let day = calendar::create_day(&db, player.id, month.id, 1).await?;
        let mut rng = StdRng::seed_from_u64(3);
        roll_shop(&db, player.id, day.id, 4, &mut rng).await?;

        crate::entities::Day::delete_by_id(day.id).exec(&db).await?;
        assert_eq!(count_shops(&db).await?, 0);
        assert_eq!(ShopBusiness::find().count(&db).await?, 0);
        assert_eq!(crate::core::catalog::catalog_counts(&db).await?.businesses, 60);
        Ok(())
    }
}
