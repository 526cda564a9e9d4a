//! Store handle - Owns the connection, the change bus and generic table access.
//!
//! The store is constructed explicitly by the composition root and closed
//! explicitly. Every write made through it announces the tables it touched
//! (plus the tables its foreign-key cascades reach) on a broadcast bus that
//! live queries listen to.

use crate::{
    bindings::{self, LiveQuery},
    config::{
        catalog::CatalogConfig,
        database,
        settings::{AppConfig, GameRules},
    },
    core::{catalog::SeedOutcome, turn},
    entities::{self, CardClass},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    Iterable, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder,
};
use std::marker::PhantomData;
use tokio::sync::broadcast;
use tracing::{info, instrument, trace};

const CHANGE_BUS_CAPACITY: usize = 256;

/// Every table of the store, as announced on the change bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `players`
    Player,
    /// `months`
    Month,
    /// `days`
    Day,
    /// `businesses`
    Business,
    /// `foods`
    Food,
    /// `cards`
    Card,
    /// `shops`
    Shop,
    /// `shop_businesses`
    ShopBusiness,
    /// `matches`
    Match,
    /// `match_players`
    MatchPlayer,
    /// `match_days`
    MatchDay,
    /// `inventories`
    Inventory,
    /// `inventory_businesses`
    InventoryBusiness,
    /// `inventory_foods`
    InventoryFood,
    /// `inventory_cards`
    InventoryCard,
    /// `system_state`
    SystemState,
}

impl Table {
    /// SQL table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "players",
            Self::Month => "months",
            Self::Day => "days",
            Self::Business => "businesses",
            Self::Food => "foods",
            Self::Card => "cards",
            Self::Shop => "shops",
            Self::ShopBusiness => "shop_businesses",
            Self::Match => "matches",
            Self::MatchPlayer => "match_players",
            Self::MatchDay => "match_days",
            Self::Inventory => "inventories",
            Self::InventoryBusiness => "inventory_businesses",
            Self::InventoryFood => "inventory_foods",
            Self::InventoryCard => "inventory_cards",
            Self::SystemState => "system_state",
        }
    }

    /// Tables whose rows can disappear through `ON DELETE CASCADE` when rows of this table are deleted.
    #[must_use]
    pub const fn cascades(self) -> &'static [Self] {
        match self {
            Self::Player => &[
                Self::Day,
                Self::MatchDay,
                Self::Shop,
                Self::ShopBusiness,
                Self::MatchPlayer,
                Self::Inventory,
                Self::InventoryBusiness,
                Self::InventoryFood,
                Self::InventoryCard,
            ],
            Self::Month => &[Self::Day, Self::MatchDay, Self::Shop, Self::ShopBusiness],
            Self::Day => &[Self::MatchDay, Self::Shop, Self::ShopBusiness],
            Self::Match => &[
                Self::MatchPlayer,
                Self::MatchDay,
                Self::Inventory,
                Self::InventoryBusiness,
                Self::InventoryFood,
                Self::InventoryCard,
            ],
            Self::Shop => &[Self::ShopBusiness],
            Self::Inventory => &[
                Self::InventoryBusiness,
                Self::InventoryFood,
                Self::InventoryCard,
            ],
            _ => &[],
        }
    }
}

/// An entity whose writes are announced on the change bus.
pub trait Tracked: EntityTrait {
    /// Table announced after writes
    const TABLE: Table;
    /// Active model used for inserts
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    /// Primary key of a row read from this table
    fn primary_key(model: &Self::Model) -> i64;
}

macro_rules! tracked {
    ($($entity:ident => $table:ident, $module:ident;)*) => {
        $(
            impl Tracked for entities::$entity {
                const TABLE: Table = Table::$table;
                type Active = entities::$module::ActiveModel;

                #[allow(clippy::useless_conversion)]
                fn primary_key(model: &Self::Model) -> i64 {
                    i64::from(model.id)
                }
            }
        )*
    };
}

tracked! {
    Player => Player, player;
    Month => Month, month;
    Day => Day, day;
    Business => Business, business;
    Food => Food, food;
    Card => Card, card;
    Shop => Shop, shop;
    ShopBusiness => ShopBusiness, shop_business;
    Match => Match, game_match;
    MatchPlayer => MatchPlayer, match_player;
    MatchDay => MatchDay, match_day;
    Inventory => Inventory, inventory;
    InventoryBusiness => InventoryBusiness, inventory_business;
    InventoryFood => InventoryFood, inventory_food;
    InventoryCard => InventoryCard, inventory_card;
    SystemState => SystemState, system_state;
}

/// Handle to an open store.
#[derive(Debug)]
pub struct Store {
    db: DatabaseConnection,
    changes: broadcast::Sender<Table>,
    rules: GameRules,
    seed: SeedOutcome,
}

impl Store {
    /// Opens the store described by `config`: connects, creates missing tables,
    /// checks the schema version and seeds the catalog on first use.
    #[instrument(skip(config), fields(url = %config.database_url))]
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let db = database::create_connection(&config.database_url).await?;
        Self::with_connection(db, &config.catalog, config.rules.clone()).await
    }

    /// Initializes a store on an existing connection.
    ///
    /// Completes only once tables exist and the seed has committed (or was
    /// already present), so the first read sees the catalog.
    pub async fn with_connection(
        db: DatabaseConnection,
        catalog: &CatalogConfig,
        rules: GameRules,
    ) -> Result<Self> {
        database::create_tables(&db).await?;
        let seed = crate::core::catalog::seed_catalog(&db, catalog).await?;
        let (changes, _) = broadcast::channel(CHANGE_BUS_CAPACITY);
        info!("Store ready: {:?}", seed);

        Ok(Self {
            db,
            changes,
            rules,
            seed,
        })
    }

    /// The underlying connection, for the `core` finders.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Rules matches in this store are played with.
    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// What the seeding step did when the store was opened.
    #[must_use]
    pub const fn seed_outcome(&self) -> &SeedOutcome {
        &self.seed
    }

    /// New receiver on the change bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.changes.subscribe()
    }

    /// Announces writes to `tables` and to every table their cascades reach.
    ///
    /// Call this after writing through [`Store::db`] directly.
    pub fn notify(&self, tables: &[Table]) {
        let mut touched: Vec<Table> = Vec::new();
        for table in tables {
            for affected in std::iter::once(*table).chain(table.cascades().iter().copied()) {
                if !touched.contains(&affected) {
                    touched.push(affected);
                }
            }
        }

        for table in touched {
            if self.changes.send(table).is_err() {
                trace!("No subscribers for {}", table.name());
            }
        }
    }

    /// Generic access to one table.
    #[must_use]
    pub const fn dao<E: Tracked>(&self) -> Dao<'_, E> {
        Dao {
            store: self,
            entity: PhantomData,
        }
    }

    /// Closes the change bus (ending every live query) and the connection.
    #[instrument(skip(self))]
    pub async fn close(self) -> Result<()> {
        drop(self.changes);
        self.db.close().await?;
        info!("Store closed");
        Ok(())
    }

    /// See [`turn::start_match`].
    pub async fn start_match<R>(&self, names: &[&str], rng: &mut R) -> Result<turn::MatchSetup>
    where
        R: Rng + ?Sized,
    {
        let setup = turn::start_match(&self.db, &self.rules, names, rng).await?;
        self.notify(&[
            Table::Match,
            Table::Player,
            Table::MatchPlayer,
            Table::Inventory,
            Table::Month,
            Table::Day,
            Table::MatchDay,
            Table::Shop,
            Table::ShopBusiness,
        ]);
        Ok(setup)
    }

    /// See [`turn::buy_business`].
    pub async fn buy_business(
        &self,
        inventory_id: i64,
        business_id: i64,
        day_id: i64,
    ) -> Result<turn::Trade> {
        let trade = turn::buy_business(&self.db, inventory_id, business_id, day_id).await?;
        self.notify(&[Table::Player, Table::InventoryBusiness]);
        Ok(trade)
    }

    /// See [`turn::sell_business`].
    pub async fn sell_business(&self, inventory_id: i64, business_id: i64) -> Result<turn::Trade> {
        let trade = turn::sell_business(&self.db, &self.rules, inventory_id, business_id).await?;
        self.notify(&[Table::Player, Table::InventoryBusiness]);
        Ok(trade)
    }

    /// See [`turn::buy_food`].
    pub async fn buy_food(
        &self,
        inventory_id: i64,
        food_id: i64,
    ) -> Result<entities::InventoryFoodModel> {
        let active = turn::buy_food(&self.db, inventory_id, food_id).await?;
        self.notify(&[Table::Player, Table::InventoryFood]);
        Ok(active)
    }

    /// See [`turn::draw_card`].
    pub async fn draw_card<R>(
        &self,
        inventory_id: i64,
        class: CardClass,
        opponent_id: Option<i64>,
        rng: &mut R,
    ) -> Result<turn::CardPlay>
    where
        R: Rng + ?Sized,
    {
        let play = turn::draw_card(&self.db, inventory_id, class, opponent_id, rng).await?;
        self.notify(&[Table::Player, Table::InventoryCard]);
        Ok(play)
    }

    /// See [`turn::end_turn`].
    pub async fn end_turn<R>(&self, inventory_id: i64, rng: &mut R) -> Result<turn::TurnReport>
    where
        R: Rng + ?Sized,
    {
        let report = turn::end_turn(&self.db, &self.rules, inventory_id, rng).await?;
        self.notify(&[
            Table::Player,
            Table::InventoryFood,
            Table::InventoryCard,
            Table::Month,
            Table::Day,
            Table::MatchDay,
            Table::Shop,
            Table::ShopBusiness,
        ]);
        Ok(report)
    }

    /// See [`turn::finish_match`].
    pub async fn finish_match(&self, match_id: i64) -> Result<Option<entities::PlayerModel>> {
        let winner = turn::finish_match(&self.db, match_id).await?;
        self.notify(&[Table::Match]);
        Ok(winner)
    }
}

/// Generic data access for one table, bound to a [`Store`].
#[derive(Debug)]
pub struct Dao<'s, E> {
    store: &'s Store,
    entity: PhantomData<E>,
}

impl<E> Dao<'_, E>
where
    E: Tracked,
    E::Model: IntoActiveModel<E::Active> + Sync,
{
    /// Every row, in primary-key order.
    pub async fn get_all(&self) -> Result<Vec<E::Model>> {
        let mut select = E::find();
        for key in E::PrimaryKey::iter() {
            select = select.order_by_asc(key.into_column());
        }
        select.all(&self.store.db).await.map_err(Into::into)
    }

    /// One row by primary key.
    pub async fn get<K>(&self, id: K) -> Result<Option<E::Model>>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id)
            .one(&self.store.db)
            .await
            .map_err(Into::into)
    }

    /// Number of rows.
    pub async fn count(&self) -> Result<u64> {
        E::find().count(&self.store.db).await.map_err(Into::into)
    }

    /// Inserts a row and returns it with its assigned id.
    pub async fn insert(&self, row: E::Active) -> Result<E::Model> {
        let model = row.insert(&self.store.db).await?;
        self.store.notify(&[E::TABLE]);
        Ok(model)
    }

    /// Writes every column of `model` back by primary key.
    pub async fn update(&self, model: E::Model) -> Result<E::Model> {
        let id = E::primary_key(&model);
        let mut row: E::Active = model.into_active_model();
        for column in E::Column::iter() {
            row.reset(column);
        }

        let model = row
            .update(&self.store.db)
            .await
            .map_err(|e| match Error::from(e) {
                Error::NotFound { .. } => Error::NotFound {
                    entity: E::TABLE.name(),
                    id,
                },
                other => other,
            })?;
        self.store.notify(&[E::TABLE]);
        Ok(model)
    }

    /// Deletes the row `model` was read from. Returns the number of rows removed.
    pub async fn delete(&self, model: E::Model) -> Result<u64> {
        let row: E::Active = model.into_active_model();
        let result = E::delete(row).exec(&self.store.db).await?;
        self.store.notify(&[E::TABLE]);
        Ok(result.rows_affected)
    }

    /// Deletes a row by primary key. Returns the number of rows removed.
    pub async fn delete_by_id<K>(&self, id: K) -> Result<u64>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id).exec(&self.store.db).await?;
        self.store.notify(&[E::TABLE]);
        Ok(result.rows_affected)
    }
}

impl<E> Dao<'_, E>
where
    E: Tracked + 'static,
    E::Model: IntoActiveModel<E::Active> + Clone + Send + Sync + 'static,
{
    /// Live view of every row, refreshed after each write to this table.
    pub async fn watch_all(&self) -> Result<LiveQuery<Vec<E::Model>>> {
        bindings::live(self.store, vec![E::TABLE], |db| async move {
            let mut select = E::find();
            for key in E::PrimaryKey::iter() {
                select = select.order_by_asc(key.into_column());
            }
            select.all(&db).await.map_err(Into::into)
        })
        .await
    }
}
