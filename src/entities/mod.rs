//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod business;
pub mod card;
pub mod day;
pub mod food;
pub mod game_match;
pub mod inventory;
pub mod inventory_business;
pub mod inventory_card;
pub mod inventory_food;
pub mod match_day;
pub mod match_player;
pub mod month;
pub mod player;
pub mod shop;
pub mod shop_business;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use business::{Entity as Business, Model as BusinessModel, Tier};
pub use card::{CardClass, CardField, Entity as Card, Model as CardModel, Polarity, Target};
pub use day::{Entity as Day, Model as DayModel};
pub use food::{Entity as Food, Model as FoodModel};
pub use game_match::{Entity as Match, Model as MatchModel};
pub use inventory::{Entity as Inventory, Model as InventoryModel};
pub use inventory_business::{Entity as InventoryBusiness, Model as InventoryBusinessModel};
pub use inventory_card::{Entity as InventoryCard, Model as InventoryCardModel};
pub use inventory_food::{Entity as InventoryFood, Model as InventoryFoodModel};
pub use match_day::{Entity as MatchDay, Model as MatchDayModel};
pub use match_player::{Entity as MatchPlayer, Model as MatchPlayerModel};
pub use month::{Entity as Month, Model as MonthModel};
pub use player::{Entity as Player, Model as PlayerModel};
pub use shop::{Entity as Shop, Model as ShopModel};
pub use shop_business::{Entity as ShopBusiness, Model as ShopBusinessModel};
pub use system_state::{Entity as SystemState, Model as SystemStateModel};
