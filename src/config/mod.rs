/// Bundled and file-based catalog definitions used for seeding
pub mod catalog;

/// Database configuration and connection management
pub mod database;

/// Game rules and top-level application settings
pub mod settings;
