#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use life_tycoon::{
    bindings,
    config::{catalog::bundled_catalog, database, settings::GameRules},
    core::{game_match, inventory, shop},
    entities::{
        CardClass, Inventory, InventoryBusiness, Match, MatchPlayer, Player,
        inventory as inventory_entity, inventory_business, match_player, player,
    },
    errors::{Error, Result},
    store::{Store, Table},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::Set;
use std::collections::BTreeMap;

async fn open_memory_store() -> Result<Store> {
    let db = database::create_connection("sqlite::memory:").await?;
    Store::with_connection(db, &bundled_catalog()?, GameRules::default()).await
}

#[tokio::test]
async fn ana_owns_two_lemonade_stands() -> Result<()> {
    let store = open_memory_store().await?;

    let ana = store
        .dao::<Player>()
        .insert(player::ActiveModel {
            name: Set("Ana".to_string()),
            cash: Set(600.0),
            income: Set(0.0),
            expenses: Set(0.0),
            ..Default::default()
        })
        .await?;
    let game = game_match::create_match(store.db()).await?;
    store.notify(&[Table::Match]);

    store
        .dao::<MatchPlayer>()
        .insert(match_player::ActiveModel {
            match_id: Set(game.id),
            player_id: Set(ana.id),
            ..Default::default()
        })
        .await?;
    let inv = store
        .dao::<Inventory>()
        .insert(inventory_entity::ActiveModel {
            player_id: Set(ana.id),
            match_id: Set(game.id),
            ..Default::default()
        })
        .await?;

    for _ in 0..2 {
        store
            .dao::<InventoryBusiness>()
            .insert(inventory_business::ActiveModel {
                inventory_id: Set(inv.id),
                business_id: Set(1),
                quantity: Set(1),
                ..Default::default()
            })
            .await?;
    }

    assert_eq!(
        inventory::count_businesses_by_inventory(store.db(), inv.id).await?,
        BTreeMap::from([(1, 2)])
    );
    let owned = inventory::list_businesses_with_detail(store.db(), inv.id).await?;
    assert!(owned.iter().all(|o| o.business.name == "Lemonade Stand"));

    store.close().await
}

#[tokio::test]
async fn a_short_match_from_start_to_winner() -> Result<()> {
    let db = database::create_connection("sqlite::memory:").await?;
    let rules = GameRules {
        days_per_month: 3,
        months_per_match: 1,
        ..GameRules::default()
    };
    let store = Store::with_connection(db, &bundled_catalog()?, rules).await?;
    let mut rng = StdRng::seed_from_u64(2024);

    let setup = store.start_match(&["Ana", "Bruno"], &mut rng).await?;
    let (ana, bruno) = (&setup.seats[0], &setup.seats[1]);
    let mut counts = bindings::watch_business_counts(&store, ana.inventory.id).await?;

    // Ana buys the cheapest business on offer today
    let offer = shop::list_shop_businesses(store.db(), ana.shop.id)
        .await?
        .into_iter()
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .unwrap();
    let trade = store.buy_business(ana.inventory.id, offer.id, ana.day.id).await?;
    assert_eq!(trade.player.cash, 600.0 - offer.cost);
    assert_eq!(counts.changed().await?, BTreeMap::from([(offer.id, 1)]));

    let play = store
        .draw_card(ana.inventory.id, CardClass::Money, Some(bruno.player.id), &mut rng)
        .await?;
    assert_eq!(play.card.class, CardClass::Money);
    assert!(play.active.is_none());

    let mut over = false;
    while !over {
        let report = store.end_turn(ana.inventory.id, &mut rng).await?;
        store.end_turn(bruno.inventory.id, &mut rng).await?;
        over = report.match_over;
    }
    // The first day plus three turns for each player
    assert_eq!(game_match::get_days_for_match(store.db(), setup.game.id).await?.len(), 8);

    let winner = store.finish_match(setup.game.id).await?.unwrap();
    let recorded = store.dao::<Match>().get(setup.game.id).await?.unwrap();
    assert_eq!(recorded.winner.as_deref(), Some(winner.name.as_str()));
    assert!(recorded.finished_at.is_some());

    let late = store.end_turn(bruno.inventory.id, &mut rng).await;
    assert!(matches!(late, Err(Error::MatchFinished { .. })));

    store.close().await
}
