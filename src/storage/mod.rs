pub mod catalog;
pub mod clients;
pub mod crews;
pub mod estimates;
pub mod inventory;
pub mod jobs;
mod repository;

pub use repository::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
