//! Presentation bindings - Query results that stay current.
//!
//! A [`LiveQuery`] holds the latest result of a query and a background task
//! that reruns it whenever the store announces a write to one of the tables
//! the query reads.

use crate::{
    core::{
        inventory::{self, ActiveCard, ActiveFood, OwnedBusiness},
        report::{self, PlayerSummary},
    },
    errors::{Error, Result},
    store::{Store, Table},
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use std::future::Future;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Latest result of a query, pushed again after every relevant write.
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct LiveQuery<T> {
    receiver: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Clone> LiveQuery<T> {
    /// The most recent result.
    #[must_use]
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Waits for the next result and returns it.
    ///
    /// Fails with [`Error::SubscriptionClosed`] once the query was cancelled or
    /// the store closed.
    pub async fn changed(&mut self) -> Result<T> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::SubscriptionClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

impl<T> LiveQuery<T> {
    /// Stops refreshing. The last result stays readable.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the background task is still refreshing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs `query` now and again after every write to any of `tables`.
///
/// The subscription to the change bus is taken before the first run, so no
/// write between the two is missed. A lagging subscriber refreshes once for
/// everything it skipped. A failed refresh keeps the previous result.
pub async fn live<T, F, Fut>(store: &Store, tables: Vec<Table>, query: F) -> Result<LiveQuery<T>>
where
    T: Send + Sync + 'static,
    F: Fn(DatabaseConnection) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let mut changes = store.subscribe();
    let db = store.db().clone();
    let initial = query(db.clone()).await?;
    let (sender, receiver) = watch::channel(initial);

    let task = tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(table) if !tables.contains(&table) => continue,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }

            match query(db.clone()).await {
                Ok(value) => {
                    if sender.send(value).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Live query refresh failed: {}", e),
            }
        }
        debug!("Live query finished");
    });

    Ok(LiveQuery { receiver, task })
}

/// Businesses held by an inventory, with catalog detail.
pub async fn watch_inventory_businesses(
    store: &Store,
    inventory_id: i64,
) -> Result<LiveQuery<Vec<OwnedBusiness>>> {
    live(
        store,
        vec![Table::InventoryBusiness, Table::Business],
        move |db| async move { inventory::list_businesses_with_detail(&db, inventory_id).await },
    )
    .await
}

/// Foods running in an inventory, with catalog detail.
pub async fn watch_inventory_foods(
    store: &Store,
    inventory_id: i64,
) -> Result<LiveQuery<Vec<ActiveFood>>> {
    live(
        store,
        vec![Table::InventoryFood, Table::Food],
        move |db| async move { inventory::list_foods_with_detail(&db, inventory_id).await },
    )
    .await
}

/// Card effects running in an inventory, with catalog detail.
pub async fn watch_inventory_cards(
    store: &Store,
    inventory_id: i64,
) -> Result<LiveQuery<Vec<ActiveCard>>> {
    live(
        store,
        vec![Table::InventoryCard, Table::Card],
        move |db| async move { inventory::list_cards_with_detail(&db, inventory_id).await },
    )
    .await
}

/// Units held per business id in an inventory.
pub async fn watch_business_counts(
    store: &Store,
    inventory_id: i64,
) -> Result<LiveQuery<BTreeMap<i64, i64>>> {
    live(store, vec![Table::InventoryBusiness], move |db| async move {
        inventory::count_businesses_by_inventory(&db, inventory_id).await
    })
    .await
}

/// Financial summary of a player.
pub async fn watch_player_summary(
    store: &Store,
    player_id: i64,
) -> Result<LiveQuery<PlayerSummary>> {
    live(
        store,
        vec![
            Table::Player,
            Table::Inventory,
            Table::InventoryBusiness,
            Table::InventoryFood,
            Table::InventoryCard,
        ],
        move |db| async move { report::player_summary(&db, player_id).await },
    )
    .await
}
