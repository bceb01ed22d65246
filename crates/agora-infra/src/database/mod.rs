//! Document storage: users and subreddits, each embedding post copies.
//!
//! The in-memory store is always available; the PostgreSQL store keeps each
//! parent document in one row with its embedded arrays as JSONB columns.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryCollection, InMemorySubredditRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;
#[cfg(feature = "postgres")]
pub use postgres_base::{DocumentEntity, PostgresCollection};
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresSubredditRepository, PostgresUserRepository};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
