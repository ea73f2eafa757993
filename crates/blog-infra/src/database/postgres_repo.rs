//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use blog_core::domain::{Category, NewPost, Page, Post, Tag, TagSync};
use blog_core::error::RepoError;
use blog_core::ports::{CategoryRepository, PostRepository, PostTagRepository, TagRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL post <-> tag association repository.
pub type PostgresPostTagRepository = PostgresBaseRepository<PostTagEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = new_post.into();
        let model = active_model.insert(&self.db).await.map_err(repo_error)?;

        tracing::debug!(post_id = model.id, "Inserted post row");
        Ok(model.into())
    }

    async fn latest(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
        let paginator = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await.map_err(repo_error)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(repo_error)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            page,
            per_page,
            total,
        ))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Insert links, skipping pairs that already exist.
async fn insert_links<C>(conn: &C, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    PostTagEntity::insert_many(post_tag::links(post_id, tag_ids))
        .on_conflict(
            OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(repo_error)?;

    Ok(())
}

async fn linked_tag_ids<C>(conn: &C, post_id: i64) -> Result<Vec<i64>, RepoError>
where
    C: ConnectionTrait,
{
    let links = PostTagEntity::find()
        .filter(post_tag::Column::PostId.eq(post_id))
        .order_by_asc(post_tag::Column::TagId)
        .all(conn)
        .await
        .map_err(repo_error)?;

    Ok(links.into_iter().map(|link| link.tag_id).collect())
}

#[async_trait]
impl PostTagRepository for PostgresPostTagRepository {
    async fn attach(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
        insert_links(&self.db, post_id, tag_ids).await
    }

    async fn sync(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(repo_error)?;

        let current = linked_tag_ids(&txn, post_id).await?;
        let plan = TagSync::plan(&current, tag_ids);
        if plan.is_noop() {
            return txn.commit().await.map_err(repo_error);
        }

        if !plan.detach.is_empty() {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.eq(post_id))
                .filter(post_tag::Column::TagId.is_in(plan.detach.iter().copied()))
                .exec(&txn)
                .await
                .map_err(repo_error)?;
        }
        insert_links(&txn, post_id, &plan.attach).await?;

        txn.commit().await.map_err(repo_error)?;

        tracing::debug!(
            post_id,
            attached = plan.attach.len(),
            detached = plan.detach.len(),
            "Synced post tags"
        );
        Ok(())
    }

    async fn detach_all(&self, post_id: i64) -> Result<(), RepoError> {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(())
    }

    async fn tag_ids_for(&self, post_id: i64) -> Result<Vec<i64>, RepoError> {
        linked_tag_ids(&self.db, post_id).await
    }
}
