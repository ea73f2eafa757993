//! Data Transfer Objects - the data each rendered view carries.

use serde::{Deserialize, Serialize};

/// A post as shown in listings and forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub category_id: i64,
    pub thumbnail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

/// Paging links for a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page_url: Option<String>,
}

/// Data for `posts.index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationMeta,
}

/// Data for `posts.create` and `posts.edit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub post: Option<PostResponse>,
    pub selected_tags: Vec<i64>,
    pub categories: Vec<CategoryResponse>,
    pub tags: Vec<TagResponse>,
}

/// Data for `posts.show`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub category: Option<CategoryResponse>,
    pub tags: Vec<TagResponse>,
}
