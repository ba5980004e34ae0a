//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use quill_core::services::AccountService;
use quill_core::{BlogService, DomainError};
use quill_infra::{Argon2PasswordService, InMemoryBlogStore, JwtTokenService};

use crate::config::{AdminAccount, AppConfig, SessionConfig};
use crate::templates::Templates;

/// The three repositories, backed by one store.
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        Self {
            posts: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        config: &quill_infra::DatabaseConfig,
        auto_migrate: bool,
    ) -> anyhow::Result<Self> {
        use migration::{Migrator, MigratorTrait};
        use quill_infra::database::{
            PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository, connect,
        };

        let conn = connect(config).await?;
        if auto_migrate {
            Migrator::up(&conn, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self {
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            users: Arc::new(PostgresUserRepository::new(conn)),
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub templates: Arc<Templates>,
    pub session: SessionConfig,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let repositories = match &config.database {
            Some(db_config) => match Repositories::postgres(db_config, config.auto_migrate).await
            {
                Ok(repositories) => repositories,
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repositories = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Repositories::in_memory()
        };

        let state = Self::from_parts(
            repositories,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.session.clone(),
        )?;

        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn from_parts(
        repositories: Repositories,
        tokens: Arc<dyn TokenService>,
        session: SessionConfig,
    ) -> Result<Self, minijinja::Error> {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Ok(Self {
            blog: BlogService::new(
                repositories.posts,
                repositories.comments,
                repositories.users.clone(),
            ),
            accounts: AccountService::new(repositories.users, passwords),
            tokens,
            templates: Arc::new(Templates::load()?),
            session,
        })
    }

    /// Make sure the configured operator account exists.
    pub async fn bootstrap_admin(&self, admin: &AdminAccount) -> Result<(), DomainError> {
        let (user, created) = self
            .accounts
            .ensure_user(&admin.username, &admin.password)
            .await?;
        if created {
            tracing::info!(user = %user.username, "Admin account created");
        } else {
            tracing::debug!(user = %user.username, "Admin account already present");
        }
        Ok(())
    }
}
