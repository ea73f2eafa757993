use async_trait::async_trait;

use crate::domain::{Category, NewPost, Page, Post, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an existing entity.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a new post and return it with its assigned id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Posts ordered newest first, one page at a time.
    async fn latest(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError>;
}

/// Read-only access to categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;
}

/// Read-only access to tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Tag>, RepoError>;

    /// Tags with the given ids; unknown ids are skipped.
    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError>;
}

/// The post <-> tag association table.
#[async_trait]
pub trait PostTagRepository: Send + Sync {
    /// Link the post to each tag. Existing links are left alone.
    async fn attach(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError>;

    /// Make the post's links exactly `tag_ids`: add missing, remove extras.
    async fn sync(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError>;

    /// Remove every link of the post.
    async fn detach_all(&self, post_id: i64) -> Result<(), RepoError>;

    /// Tag ids linked to the post, ascending.
    async fn tag_ids_for(&self, post_id: i64) -> Result<Vec<i64>, RepoError>;
}
