//! Application state - shared across all handlers.

use std::sync::Arc;

use agora_core::InteractionEngine;
use agora_core::ports::{
    PasswordService, PostCollection, SubredditRepository, TokenService, UserRepository,
};
use agora_infra::{
    Argon2PasswordService, JwtTokenService, InMemorySubredditRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use agora_infra::{DatabaseConnections, PostgresSubredditRepository, PostgresUserRepository};

use crate::config::{AppConfig, PaginationConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub subreddits: Arc<dyn SubredditRepository>,
    pub engine: Arc<InteractionEngine>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub pagination: PaginationConfig,
}

/// Both parent collections, each viewed through its repository and its
/// embedded-post port.
struct Store {
    users: Arc<dyn UserRepository>,
    user_posts: Arc<dyn PostCollection>,
    subreddits: Arc<dyn SubredditRepository>,
    subreddit_posts: Arc<dyn PostCollection>,
}

impl Store {
    fn in_memory() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let subreddits = Arc::new(InMemorySubredditRepository::new());
        Self {
            users: users.clone(),
            user_posts: users,
            subreddits: subreddits.clone(),
            subreddit_posts: subreddits,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: DatabaseConnections) -> Self {
        let users = Arc::new(PostgresUserRepository::new(connections.main.clone()));
        let subreddits = Arc::new(PostgresSubredditRepository::new(connections.main));
        Self {
            users: users.clone(),
            user_posts: users,
            subreddits: subreddits.clone(),
            subreddit_posts: subreddits,
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let store = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => Store::postgres(connections),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Store::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Store::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let store = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Store::in_memory()
        };

        let state = Self::assemble(
            store,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            config.pagination,
        );
        tracing::info!("Application state initialized");
        state
    }

    /// In-memory state with caller-supplied auth services.
    #[cfg(test)]
    pub fn in_memory(
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        pagination: PaginationConfig,
    ) -> Self {
        Self::assemble(Store::in_memory(), tokens, passwords, pagination)
    }

    fn assemble(
        store: Store,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            engine: Arc::new(InteractionEngine::new(
                store.user_posts,
                store.subreddit_posts,
            )),
            users: store.users,
            subreddits: store.subreddits,
            tokens,
            passwords,
            pagination,
        }
    }
}
