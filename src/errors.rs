use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Every failure the data layer can report to its callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any store error that is not a constraint failure
    #[error("Database error: {0}")]
    Database(DbErr),

    /// A unique index or foreign key rejected the write
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// Message reported by the store
        message: String,
    },

    /// A row addressed by primary key does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Table or entity name
        entity: &'static str,
        /// Primary key that was looked up
        id: i64,
    },

    /// A finder that expects at most one row found several
    #[error("Expected at most one {entity}, found {matches}")]
    AmbiguousResult {
        /// Table or entity name
        entity: &'static str,
        /// Number of matching rows
        matches: usize,
    },

    /// The player cannot pay for the purchase
    #[error("Insufficient funds: have {current:.2}, need {required:.2}")]
    InsufficientFunds {
        /// Cash on hand
        current: f64,
        /// Price of the purchase
        required: f64,
    },

    /// Amount is negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Offending amount
        amount: f64,
    },

    /// The business is not offered in the player's shop for that day
    #[error("Business {business_id} is not offered in the shop for day {day_id}")]
    NotInShop {
        /// Catalog business id
        business_id: i64,
        /// Day the purchase was attempted on
        day_id: i64,
    },

    /// The match already has a winner or has played its last month
    #[error("Match {match_id} is finished")]
    MatchFinished {
        /// Match the command was aimed at
        match_id: i64,
    },

    /// The store file was written by a different schema version
    #[error("Schema version mismatch: store has {found}, expected {expected}")]
    SchemaMismatch {
        /// Version recorded in the store
        found: String,
        /// Version this build understands
        expected: String,
    },

    /// A live query's background task ended (cancelled, or the store closed)
    #[error("Live query subscription closed")]
    SubscriptionClosed,

    /// I/O failure reading configuration or catalog files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::ConstraintViolation {
                message: format!("unique: {message}"),
            },
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => Self::ConstraintViolation {
                message: format!("foreign key: {message}"),
            },
            // The key is unknown here; callers that have it replace this error
            _ => match err {
                DbErr::RecordNotUpdated => Self::NotFound {
                    entity: "row",
                    id: 0,
                },
                other => Self::Database(other),
            },
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
