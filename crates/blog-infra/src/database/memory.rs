//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{Category, NewPost, Page, Post, Tag, TagSync};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CategoryRepository, PostRepository, PostTagRepository, TagRepository,
};

struct PostTable {
    rows: BTreeMap<i64, Post>,
    next_id: i64,
}

/// In-memory post store with auto-incrementing ids.
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PostTable {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&post.id) {
            Some(row) => {
                *row = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;

        let post = new_post.into_post(id);
        table.rows.insert(id, post.clone());
        Ok(post)
    }

    async fn latest(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
        let table = self.table.read().await;

        let mut posts: Vec<&Post> = table.rows.values().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from(Page::<Post>::offset(page, per_page)).unwrap_or(usize::MAX);
        let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
        let items = posts
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Page::new(items, page, per_page, table.rows.len() as u64))
    }
}

/// Fixed set of categories, ordered by name.
pub struct InMemoryCategoryRepository {
    rows: Vec<Category>,
}

impl InMemoryCategoryRepository {
    pub fn new(mut rows: Vec<Category>) -> Self {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Self { rows }
    }

    /// Categories numbered from 1 in the given order.
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            (1..)
                .zip(names)
                .map(|(id, name)| Category {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn all(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.rows.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.rows.iter().find(|c| c.id == id).cloned())
    }
}

/// Fixed set of tags, ordered by name.
pub struct InMemoryTagRepository {
    rows: Vec<Tag>,
}

impl InMemoryTagRepository {
    pub fn new(mut rows: Vec<Tag>) -> Self {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Self { rows }
    }

    /// Tags numbered from 1 in the given order.
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            (1..)
                .zip(names)
                .map(|(id, name)| Tag {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(self.rows.clone())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError> {
        Ok(self
            .rows
            .iter()
            .filter(|tag| ids.contains(&tag.id))
            .cloned()
            .collect())
    }
}

/// In-memory `post_tag` table keyed by (post_id, tag_id).
#[derive(Default)]
pub struct InMemoryPostTagRepository {
    links: RwLock<BTreeSet<(i64, i64)>>,
}

impl InMemoryPostTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of links across all posts.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

#[async_trait]
impl PostTagRepository for InMemoryPostTagRepository {
    async fn attach(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
        let mut links = self.links.write().await;
        links.extend(tag_ids.iter().map(|tag_id| (post_id, *tag_id)));
        Ok(())
    }

    async fn sync(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
        let mut links = self.links.write().await;
        let current: Vec<i64> = links
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .map(|(_, tag_id)| *tag_id)
            .collect();

        let plan = TagSync::plan(&current, tag_ids);
        for tag_id in plan.detach {
            links.remove(&(post_id, tag_id));
        }
        links.extend(plan.attach.into_iter().map(|tag_id| (post_id, tag_id)));
        Ok(())
    }

    async fn detach_all(&self, post_id: i64) -> Result<(), RepoError> {
        let mut links = self.links.write().await;
        links.retain(|(linked_post, _)| *linked_post != post_id);
        Ok(())
    }

    async fn tag_ids_for(&self, post_id: i64) -> Result<Vec<i64>, RepoError> {
        let links = self.links.read().await;
        Ok(links
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .map(|(_, tag_id)| *tag_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost::new(title.to_string(), "body".to_string(), 1, None)
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryPostRepository::new();
        let first = repo.create(new_post("First post title")).await.unwrap();
        let second = repo.create(new_post("Second post title")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.find_by_id(2).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_latest_pages_newest_first() {
        let repo = InMemoryPostRepository::new();
        for n in 0..8 {
            repo.create(new_post(&format!("Post number {n:02}")))
                .await
                .unwrap();
        }

        let first = repo.latest(1, 6).await.unwrap();
        assert_eq!(first.items.len(), 6);
        assert_eq!(first.items[0].id, 8);
        assert_eq!(first.total, 8);
        assert!(first.has_more_pages());

        let second = repo.latest(2, 6).await.unwrap();
        let ids: Vec<i64> = second.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);

        assert!(repo.latest(3, 6).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_save_unknown_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let ghost = new_post("Ghost post title").into_post(42);
        assert!(matches!(repo.save(ghost).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.delete(42).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_sync_replaces_only_the_difference() {
        let repo = InMemoryPostTagRepository::new();
        repo.attach(1, &[1, 2]).await.unwrap();
        repo.attach(2, &[1]).await.unwrap();

        repo.sync(1, &[2, 3]).await.unwrap();
        assert_eq!(repo.tag_ids_for(1).await.unwrap(), vec![2, 3]);
        assert_eq!(repo.tag_ids_for(2).await.unwrap(), vec![1]);

        repo.detach_all(1).await.unwrap();
        assert!(repo.tag_ids_for(1).await.unwrap().is_empty());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown_ids() {
        let repo = InMemoryTagRepository::with_names(["rust", "web", "sql"]);
        let found = repo.find_many(&[2, 3, 99]).await.unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["sql", "web"]);
    }
}
