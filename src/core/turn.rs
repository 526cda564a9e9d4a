//! Game commands - Every multi-table mutation of a match.
//!
//! Each command runs inside one database transaction: either every row it touches
//! is written or none is. A player's income and expenses are always recomputed
//! from the holdings and running effects that justify them.

use crate::{
    config::settings::GameRules,
    core::{calendar, catalog, game_match, inventory, player, shop},
    entities::{
        CardClass, CardField, InventoryCard, InventoryFood, Polarity, Target, business, card, day,
        game_match as match_entity, inventory as inventory_entity, inventory_card, inventory_food,
        player as player_entity, shop as shop_entity,
    },
    errors::{Error, Result},
};
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// One participant of a freshly started match
#[derive(Debug, Clone)]
pub struct Seat {
    /// The player row
    pub player: player_entity::Model,
    /// Their inventory
    pub inventory: inventory_entity::Model,
    /// Their first day
    pub day: day::Model,
    /// Their first shop
    pub shop: shop_entity::Model,
}

/// Everything created by [`start_match`]
#[derive(Debug, Clone)]
pub struct MatchSetup {
    /// The match row
    pub game: match_entity::Model,
    /// One seat per player, in the order the names were given
    pub seats: Vec<Seat>,
}

/// Result of buying or selling one business unit
#[derive(Debug, Clone)]
pub struct Trade {
    /// Player row after the trade
    pub player: player_entity::Model,
    /// Catalog business traded
    pub business: business::Model,
    /// Units held after the trade
    pub quantity: i32,
    /// Cash moved: negative for purchases, positive for sales
    pub cash_delta: f64,
}

/// Result of playing a card
#[derive(Debug, Clone)]
pub struct CardPlay {
    /// Catalog card played
    pub card: card::Model,
    /// Player the effect landed on
    pub target_player_id: i64,
    /// Signed change actually applied to the target's field
    pub applied_delta: f64,
    /// Running effect row, when the card lasts more than an instant
    pub active: Option<inventory_card::Model>,
}

/// Summary of one finished turn
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Player row after the turn
    pub player: player_entity::Model,
    /// Income minus expenses credited
    pub net_income: f64,
    /// Bonus credited by active foods
    pub food_bonus: f64,
    /// Food instances that ran out this turn
    pub expired_foods: usize,
    /// Card effects that ran out this turn
    pub expired_cards: usize,
    /// The new current day
    pub day: day::Model,
    /// Month number of the new day
    pub month_number: i32,
    /// Shop opened for the new day
    pub shop: shop_entity::Model,
    /// Whether the new day lies past the last month of the match
    pub match_over: bool,
}

/// Signed change a card asks for: positive cards raise income and cash and lower expenses.
#[must_use]
pub fn card_delta(field: CardField, polarity: Polarity, magnitude: f64) -> f64 {
    let beneficial = match field {
        CardField::Income | CardField::Cash => magnitude,
        CardField::Expenses => -magnitude,
    };
    match polarity {
        Polarity::Positive => beneficial,
        Polarity::Negative => -beneficial,
    }
}

/// Starts a match for the given player names.
///
/// Creates the match, one player per name with the starting cash, their
/// participant links and inventories, month 1, a first day per player linked to
/// the match, and a rolled shop for each of those days.
#[instrument(skip(db, rules, rng))]
pub async fn start_match<R>(
    db: &DatabaseConnection,
    rules: &GameRules,
    names: &[&str],
    rng: &mut R,
) -> Result<MatchSetup>
where
    R: Rng + ?Sized,
{
    if names.is_empty() {
        return Err(Error::Config {
            message: "A match needs at least one player".to_string(),
        });
    }

    let txn = db.begin().await?;

    let game = game_match::create_match(&txn).await?;
    let month = calendar::create_month(&txn, 1).await?;
    let mut seats = Vec::with_capacity(names.len());

    for name in names {
        let player = player::create_player(&txn, name, rules.starting_cash).await?;
        game_match::add_player_to_match(&txn, game.id, player.id).await?;
        let inventory = inventory::create_inventory(&txn, player.id, game.id).await?;
        let day = calendar::create_day(&txn, player.id, month.id, 1).await?;
        game_match::add_day_to_match(&txn, game.id, day.id).await?;
        let (shop, _) = shop::roll_shop(&txn, player.id, day.id, rules.shop_size, rng).await?;
        seats.push(Seat {
            player,
            inventory,
            day,
            shop,
        });
    }

    txn.commit().await?;
    info!("Match {} started with {} players", game.id, seats.len());
    Ok(MatchSetup { game, seats })
}

/// Buys one unit of a business listed in the player's shop for `day_id`.
///
/// `day_id` must be the player's current day in the inventory's match; shops of
/// earlier days are closed. Cash drops by the cost and the player's rates are
/// recomputed from the new holdings.
#[instrument(skip(db))]
pub async fn buy_business(
    db: &DatabaseConnection,
    inventory_id: i64,
    business_id: i64,
    day_id: i64,
) -> Result<Trade> {
    let txn = db.begin().await?;

    let inventory = inventory::require_inventory(&txn, inventory_id).await?;
    require_open_match(&txn, inventory.match_id).await?;
    let business = catalog::require_business(&txn, business_id).await?;

    let today = calendar::get_latest_day_in_match(&txn, inventory.player_id, inventory.match_id)
        .await?
        .map(|d| d.id);
    let listed = match shop::get_shop_for_player_day(&txn, inventory.player_id, day_id).await? {
        Some(shop) if today == Some(day_id) => shop::is_listed(&txn, shop.id, business_id).await?,
        _ => false,
    };
    if !listed {
        return Err(Error::NotInShop {
            business_id,
            day_id,
        });
    }

    let owner = player::require_player(&txn, inventory.player_id).await?;
    if owner.cash < business.cost {
        return Err(Error::InsufficientFunds {
            current: owner.cash,
            required: business.cost,
        });
    }

    player::credit_cash(&txn, owner.id, -business.cost).await?;
    let holding = inventory::add_business(&txn, inventory_id, business_id, 1).await?;
    let updated = inventory::recompute_rates(&txn, owner.id).await?;

    txn.commit().await?;
    debug!("Player {} bought {}", updated.id, business.name);
    Ok(Trade {
        player: updated,
        cash_delta: -business.cost,
        business,
        quantity: holding.quantity,
    })
}

/// Sells one unit of a held business for `cost * sell_back_ratio`.
///
/// The player's rates are recomputed from what is left.
#[instrument(skip(db, rules))]
pub async fn sell_business(
    db: &DatabaseConnection,
    rules: &GameRules,
    inventory_id: i64,
    business_id: i64,
) -> Result<Trade> {
    let txn = db.begin().await?;

    let inventory = inventory::require_inventory(&txn, inventory_id).await?;
    require_open_match(&txn, inventory.match_id).await?;
    let business = catalog::require_business(&txn, business_id).await?;
    let quantity = inventory::remove_business(&txn, inventory_id, business_id).await?;

    let refund = business.cost * rules.sell_back_ratio;
    player::credit_cash(&txn, inventory.player_id, refund).await?;
    let updated = inventory::recompute_rates(&txn, inventory.player_id).await?;

    txn.commit().await?;
    debug!("Player {} sold {}", updated.id, business.name);
    Ok(Trade {
        player: updated,
        cash_delta: refund,
        business,
        quantity,
    })
}

/// Buys a food; its effect runs for the food's duration.
#[instrument(skip(db))]
pub async fn buy_food(
    db: &DatabaseConnection,
    inventory_id: i64,
    food_id: i64,
) -> Result<inventory_food::Model> {
    let txn = db.begin().await?;

    let inventory = inventory::require_inventory(&txn, inventory_id).await?;
    require_open_match(&txn, inventory.match_id).await?;
    let food = catalog::get_food_by_id(&txn, food_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "food",
            id: food_id,
        })?;
    let owner = player::require_player(&txn, inventory.player_id).await?;
    if owner.cash < food.price {
        return Err(Error::InsufficientFunds {
            current: owner.cash,
            required: food.price,
        });
    }

    player::credit_cash(&txn, owner.id, -food.price).await?;
    let active = inventory::add_food(&txn, inventory_id, food_id, food.duration).await?;

    txn.commit().await?;
    Ok(active)
}

/// Plays a specific concrete card drawn into `inventory_id`.
///
/// `opponent_id` receives cards that target another player and must take part
/// in the same match; without one the effect lands on the drawer. Rate effects
/// run for the card's duration, cash effects apply at once.
#[instrument(skip(db))]
pub async fn play_card(
    db: &DatabaseConnection,
    inventory_id: i64,
    card_id: i64,
    opponent_id: Option<i64>,
) -> Result<CardPlay> {
    let txn = db.begin().await?;
    let play = apply_card(&txn, inventory_id, card_id, opponent_id).await?;
    txn.commit().await?;
    Ok(play)
}

/// Deals a random concrete card of `class` and plays it.
///
/// [`CardClass::Random`] deals from every concrete card.
#[instrument(skip(db, rng))]
pub async fn draw_card<R>(
    db: &DatabaseConnection,
    inventory_id: i64,
    class: CardClass,
    opponent_id: Option<i64>,
    rng: &mut R,
) -> Result<CardPlay>
where
    R: Rng + ?Sized,
{
    let txn = db.begin().await?;

    let deck = catalog::get_drawable_cards(&txn, class).await?;
    let card_id = deck
        .choose(rng)
        .map(|c| c.id)
        .ok_or_else(|| Error::Config {
            message: format!("No drawable cards of class {class:?}"),
        })?;
    let play = apply_card(&txn, inventory_id, card_id, opponent_id).await?;

    txn.commit().await?;
    Ok(play)
}

async fn apply_card<C>(
    db: &C,
    inventory_id: i64,
    card_id: i64,
    opponent_id: Option<i64>,
) -> Result<CardPlay>
where
    C: ConnectionTrait,
{
    let inventory = inventory::require_inventory(db, inventory_id).await?;
    require_open_match(db, inventory.match_id).await?;
    let card = catalog::get_card_by_id(db, card_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "card",
            id: card_id,
        })?;
    let Some(field) = card.field else {
        return Err(Error::Config {
            message: format!("'{}' is a placeholder; draw a concrete card instead", card.name),
        });
    };

    if let Some(opponent) = opponent_id {
        let participants = game_match::get_players_for_match(db, inventory.match_id).await?;
        if !participants.iter().any(|p| p.id == opponent) {
            return Err(Error::NotFound {
                entity: "match participant",
                id: opponent,
            });
        }
    }

    let target_player_id = match card.target {
        Target::Own => inventory.player_id,
        Target::Other => opponent_id.unwrap_or(inventory.player_id),
    };
    let requested = card_delta(field, card.polarity, card.magnitude);

    let (applied_delta, active) = if field == CardField::Cash {
        let applied = player::adjust_finances(db, target_player_id, field, requested).await?;
        (applied, None)
    } else {
        let before = player::require_player(db, target_player_id).await?;
        let active = inventory::add_card(
            db,
            inventory_id,
            card.id,
            target_player_id,
            card.duration,
            requested,
        )
        .await?;
        let after = inventory::recompute_rates(db, target_player_id).await?;
        let applied = match field {
            CardField::Income => after.income - before.income,
            _ => after.expenses - before.expenses,
        };
        (applied, Some(active))
    };

    debug!(
        "Card '{}' applied {:+.2} to player {}",
        card.name, applied_delta, target_player_id
    );
    Ok(CardPlay {
        card,
        target_player_id,
        applied_delta,
        active,
    })
}

/// Fails with [`Error::MatchFinished`] once a winner was recorded.
async fn require_open_match<C>(db: &C, match_id: i64) -> Result<match_entity::Model>
where
    C: ConnectionTrait,
{
    let game = game_match::require_match(db, match_id).await?;
    if game.finished_at.is_some() {
        return Err(Error::MatchFinished { match_id });
    }
    Ok(game)
}

/// Ends the current day of the inventory's owner.
///
/// Credits income minus expenses plus active food bonuses, counts down foods and
/// card effects (recomputing the rates of every player an expired card was aimed
/// at), advances the calendar and opens the next day's shop. Months are shared
/// by all players of the match. A match that is finished, or whose players
/// already went past the last month, takes no more turns.
#[instrument(skip(db, rules, rng))]
pub async fn end_turn<R>(
    db: &DatabaseConnection,
    rules: &GameRules,
    inventory_id: i64,
    rng: &mut R,
) -> Result<TurnReport>
where
    R: Rng + ?Sized,
{
    let txn = db.begin().await?;

    let inventory = inventory::require_inventory(&txn, inventory_id).await?;
    require_open_match(&txn, inventory.match_id).await?;
    let owner = player::require_player(&txn, inventory.player_id).await?;

    let current = calendar::get_latest_day_in_match(&txn, owner.id, inventory.match_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "day",
            id: owner.id,
        })?;
    let month = calendar::get_month_by_id(&txn, current.month_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "month",
            id: current.month_id,
        })?;
    if month.number > rules.months_per_match {
        return Err(Error::MatchFinished {
            match_id: inventory.match_id,
        });
    }

    let foods = inventory::list_foods_with_detail(&txn, inventory_id).await?;
    let food_bonus: f64 = foods.iter().map(|f| f.food.effect).sum();
    let net_income = owner.income - owner.expenses;
    player::credit_cash(&txn, owner.id, net_income + food_bonus).await?;

    let mut expired_foods = 0;
    for active in foods {
        let left = active.holding.duration - 1;
        if left <= 0 {
            InventoryFood::delete_by_id(active.holding.id).exec(&txn).await?;
            expired_foods += 1;
        } else {
            let mut row: inventory_food::ActiveModel = active.holding.into();
            row.duration = Set(left);
            row.update(&txn).await?;
        }
    }

    let mut expired_cards = 0;
    let mut affected: Vec<i64> = Vec::new();
    for active in inventory::list_cards_with_detail(&txn, inventory_id).await? {
        let left = active.holding.duration - 1;
        if left <= 0 {
            expired_cards += 1;
            if !affected.contains(&active.holding.target_player_id) {
                affected.push(active.holding.target_player_id);
            }
            InventoryCard::delete_by_id(active.holding.id).exec(&txn).await?;
        } else {
            let mut row: inventory_card::ActiveModel = active.holding.into();
            row.duration = Set(left);
            row.update(&txn).await?;
        }
    }
    for target in affected {
        inventory::recompute_rates(&txn, target).await?;
    }

    let next = calendar::next_position(month.number, current.number, rules.days_per_month);
    let month_id = if next.new_month {
        match calendar::get_month_in_match(&txn, inventory.match_id, next.month_number).await? {
            Some(shared) => shared.id,
            None => calendar::create_month(&txn, next.month_number).await?.id,
        }
    } else {
        month.id
    };
    let day = calendar::create_day(&txn, owner.id, month_id, next.day_number).await?;
    game_match::add_day_to_match(&txn, inventory.match_id, day.id).await?;
    let (shop, _) = shop::roll_shop(&txn, owner.id, day.id, rules.shop_size, rng).await?;

    let player = player::require_player(&txn, owner.id).await?;
    txn.commit().await?;

    debug!(
        "Player {} ended day; now month {} day {}",
        player.id, next.month_number, next.day_number
    );
    Ok(TurnReport {
        player,
        net_income,
        food_bonus,
        expired_foods,
        expired_cards,
        day,
        month_number: next.month_number,
        shop,
        match_over: next.month_number > rules.months_per_match,
    })
}

/// Declares the richest participant the winner of a match.
///
/// Ties go to the player who joined first. Returns `None` for a match without
/// players. A match that already has a winner is refused with
/// [`Error::MatchFinished`].
#[instrument(skip(db))]
pub async fn finish_match(
    db: &DatabaseConnection,
    match_id: i64,
) -> Result<Option<player_entity::Model>> {
    let txn = db.begin().await?;

    require_open_match(&txn, match_id).await?;
    let players = game_match::get_players_for_match(&txn, match_id).await?;
    let winner = players
        .into_iter()
        .reduce(|best, p| if p.cash > best.cash { p } else { best });

    if let Some(winner) = &winner {
        game_match::set_winner(&txn, match_id, &winner.name).await?;
        info!("Match {} won by {}", match_id, winner.name);
    }

    txn.commit().await?;
    Ok(winner)
}
