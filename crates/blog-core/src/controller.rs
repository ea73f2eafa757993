//! The post controller: one method per route, each returning what to show next.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Category, NewPost, POSTS_PER_PAGE, Page, Post, Tag};
use crate::error::DomainError;
use crate::ports::{
    CategoryRepository, FileStorage, POST_IMAGES_DIR, PostRepository, PostTagRepository,
    TagRepository,
};
use crate::validation::{FieldErrors, PostForm, ThumbnailRule, ValidatedPost};

/// Named routes a controller action can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PostsIndex,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::PostsIndex => "posts.index",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::PostsIndex => "/posts",
        }
    }
}

/// One-shot success messages shown on the next rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    PostCreated,
    PostUpdated,
    PostDeleted,
}

impl Flash {
    pub fn message(&self) -> &'static str {
        match self {
            Flash::PostCreated => "The new post was created successfully.",
            Flash::PostUpdated => "The post was updated successfully.",
            Flash::PostDeleted => "The post was deleted successfully.",
        }
    }

    /// Stable identifier used to carry the flash between requests.
    pub fn key(&self) -> &'static str {
        match self {
            Flash::PostCreated => "post-created",
            Flash::PostUpdated => "post-updated",
            Flash::PostDeleted => "post-deleted",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "post-created" => Some(Flash::PostCreated),
            "post-updated" => Some(Flash::PostUpdated),
            "post-deleted" => Some(Flash::PostDeleted),
            _ => None,
        }
    }
}

/// Data for the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFormView {
    /// `None` when creating a post.
    pub post: Option<Post>,
    pub selected_tags: Vec<i64>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// A post with its category and tags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetails {
    pub post: Post,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

/// A view to render along with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Index(Page<Post>),
    Create(PostFormView),
    Show(PostDetails),
    Edit(PostFormView),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index(_) => "posts.index",
            View::Create(_) => "posts.create",
            View::Show(_) => "posts.show",
            View::Edit(_) => "posts.edit",
        }
    }
}

/// What a controller action asks the HTTP layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(View),
    Redirect { route: Route, flash: Flash },
}

impl Outcome {
    fn back_to_index(flash: Flash) -> Self {
        Outcome::Redirect {
            route: Route::PostsIndex,
            flash,
        }
    }
}

/// CRUD actions for posts.
#[derive(Clone)]
pub struct PostController {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    post_tags: Arc<dyn PostTagRepository>,
    storage: Arc<dyn FileStorage>,
}

impl PostController {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        post_tags: Arc<dyn PostTagRepository>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            post_tags,
            storage,
        }
    }

    /// GET /posts
    pub async fn index(&self, page: u64) -> Result<Outcome, DomainError> {
        let posts = self.posts.latest(page.max(1), POSTS_PER_PAGE).await?;
        Ok(Outcome::Render(View::Index(posts)))
    }

    /// GET /posts/create
    pub async fn create(&self) -> Result<Outcome, DomainError> {
        Ok(Outcome::Render(View::Create(PostFormView {
            post: None,
            selected_tags: Vec::new(),
            categories: self.categories.all().await?,
            tags: self.tags.all().await?,
        })))
    }

    /// POST /posts
    pub async fn store(&self, form: PostForm) -> Result<Outcome, DomainError> {
        let input = self.validated(form, ThumbnailRule::Required).await?;

        let thumbnail = match &input.thumbnail {
            Some(file) => Some(self.storage.store(POST_IMAGES_DIR, file).await?),
            None => None,
        };

        let new_post = NewPost::new(
            input.title,
            input.content,
            input.category_id,
            thumbnail.clone(),
        );
        let post = match self.posts.create(new_post).await {
            Ok(post) => post,
            Err(err) => {
                if let Some(path) = &thumbnail {
                    self.discard_upload(path).await;
                }
                return Err(err.into());
            }
        };

        self.post_tags.attach(post.id, &input.tag_ids).await?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
        Ok(Outcome::back_to_index(Flash::PostCreated))
    }

    /// GET /posts/{post}
    pub async fn show(&self, id: i64) -> Result<Outcome, DomainError> {
        let post = self.find_post(id).await?;
        let category = self.categories.find_by_id(post.category_id).await?;
        let tag_ids = self.post_tags.tag_ids_for(post.id).await?;
        let tags = self.tags.find_many(&tag_ids).await?;

        Ok(Outcome::Render(View::Show(PostDetails {
            post,
            category,
            tags,
        })))
    }

    /// GET /posts/{post}/edit
    pub async fn edit(&self, id: i64) -> Result<Outcome, DomainError> {
        let post = self.find_post(id).await?;
        let selected_tags = self.post_tags.tag_ids_for(post.id).await?;

        Ok(Outcome::Render(View::Edit(PostFormView {
            post: Some(post),
            selected_tags,
            categories: self.categories.all().await?,
            tags: self.tags.all().await?,
        })))
    }

    /// PUT/PATCH /posts/{post}
    ///
    /// Without a new thumbnail the current one is kept. With one, the previous
    /// file is deleted once the post points at the replacement.
    pub async fn update(&self, id: i64, form: PostForm) -> Result<Outcome, DomainError> {
        let mut post = self.find_post(id).await?;
        let input = self.validated(form, ThumbnailRule::Optional).await?;

        let previous = post.thumbnail.clone();
        let uploaded = match &input.thumbnail {
            Some(file) => Some(self.storage.store(POST_IMAGES_DIR, file).await?),
            None => None,
        };

        post.apply_changes(
            input.title,
            input.content,
            input.category_id,
            uploaded.clone().or_else(|| previous.clone()),
        );
        let post = match self.posts.save(post).await {
            Ok(post) => post,
            Err(err) => {
                if let Some(path) = &uploaded {
                    self.discard_upload(path).await;
                }
                return Err(err.into());
            }
        };

        self.post_tags.sync(post.id, &input.tag_ids).await?;

        if let Some(old) = previous.filter(|old| post.thumbnail.as_ref() != Some(old)) {
            self.storage.delete(&old).await?;
        }

        tracing::info!(post_id = post.id, "Post updated");
        Ok(Outcome::back_to_index(Flash::PostUpdated))
    }

    /// DELETE /posts/{post}
    pub async fn destroy(&self, id: i64) -> Result<Outcome, DomainError> {
        let post = self.find_post(id).await?;

        self.post_tags.detach_all(post.id).await?;
        self.posts.delete(post.id).await?;
        if let Some(path) = &post.thumbnail {
            self.storage.delete(path).await?;
        }

        tracing::info!(post_id = post.id, "Post deleted");
        Ok(Outcome::back_to_index(Flash::PostDeleted))
    }

    /// Apply the form rules, then check that the referenced category and tags exist.
    pub async fn validated(
        &self,
        form: PostForm,
        rule: ThumbnailRule,
    ) -> Result<ValidatedPost, DomainError> {
        let input = form.validated(rule).map_err(DomainError::Validation)?;

        let mut errors = FieldErrors::default();
        if self.categories.find_by_id(input.category_id).await?.is_none() {
            errors.add("category", "The selected category is invalid.");
        }
        let known = self.tags.find_many(&input.tag_ids).await?;
        if known.len() != input.tag_ids.len() {
            errors.add("tags", "The selected tags are invalid.");
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    async fn find_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    async fn discard_upload(&self, path: &str) {
        if let Err(err) = self.storage.delete(path).await {
            tracing::warn!(path = %path, error = %err, "Failed to remove orphaned upload");
        }
    }
}
