//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::PostController;
use blog_core::ports::{
    CategoryRepository, FileStorage, PostRepository, PostTagRepository, TagRepository,
};
use blog_infra::database::{
    InMemoryCategoryRepository, InMemoryPostRepository, InMemoryPostTagRepository,
    InMemoryTagRepository,
};
use blog_infra::storage::{InMemoryFileStorage, LocalFileStorage};

#[cfg(feature = "postgres")]
use blog_infra::database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresPostTagRepository,
    PostgresTagRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostController,
    pub database_connected: bool,
    pub max_upload_bytes: usize,
}

/// The four stores the post controller reads and writes.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    post_tags: Arc<dyn PostTagRepository>,
}

impl Repositories {
    /// Volatile stores with a starter set of categories and tags.
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::with_names([
                "General", "Tutorials", "News",
            ])),
            tags: Arc::new(InMemoryTagRepository::with_names([
                "rust", "web", "database", "release",
            ])),
            post_tags: Arc::new(InMemoryPostTagRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: blog_infra::database::DbConn) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(conn.clone())),
            post_tags: Arc::new(PostgresPostTagRepository::new(conn)),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let storage: Arc<dyn FileStorage> = match LocalFileStorage::new(&config.storage_root) {
            Ok(storage) => {
                tracing::info!(root = %config.storage_root.display(), "File storage ready");
                Arc::new(storage)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to prepare storage root {}: {}. Using in-memory fallback.",
                    config.storage_root.display(),
                    e
                );
                Arc::new(InMemoryFileStorage::new())
            }
        };

        // Initialize database connection if configured
        #[cfg(feature = "postgres")]
        let (repos, database_connected) = {
            if let Some(db_config) = &config.database {
                match blog_infra::database::connect(db_config).await {
                    Ok(conn) => (Repositories::postgres(conn), true),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        (Repositories::in_memory(), false)
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (Repositories::in_memory(), false)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (repos, database_connected) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (Repositories::in_memory(), false)
        };

        tracing::info!("Application state initialized");

        Self {
            posts: PostController::new(
                repos.posts,
                repos.categories,
                repos.tags,
                repos.post_tags,
                storage,
            ),
            database_connected,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// In-memory state around the given storage, for tests.
    #[cfg(test)]
    pub fn in_memory(storage: Arc<dyn FileStorage>, max_upload_bytes: usize) -> Self {
        let repos = Repositories::in_memory();
        Self {
            posts: PostController::new(
                repos.posts,
                repos.categories,
                repos.tags,
                repos.post_tags,
                storage,
            ),
            database_connected: false,
            max_upload_bytes,
        }
    }
}
