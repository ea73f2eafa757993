//! Turning controller outcomes into HTTP responses.
//!
//! Views are rendered as JSON documents naming the view. Redirects carry the
//! flash message in a cookie that the next rendered view consumes.

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use blog_core::controller::{PostDetails, PostFormView};
use blog_core::domain::{Category, Page, Post, Tag};
use blog_core::{Flash, Outcome, View};
use blog_shared::ApiResponse;
use blog_shared::dto::{
    CategoryResponse, PaginationMeta, PostDetailResponse, PostFormResponse, PostListResponse,
    PostResponse, TagResponse,
};

/// Cookie holding the pending flash message key.
pub const FLASH_COOKIE: &str = "flash";

pub fn respond(req: &HttpRequest, outcome: Outcome) -> HttpResponse {
    match outcome {
        Outcome::Redirect { route, flash } => HttpResponse::Found()
            .insert_header((header::LOCATION, route.path()))
            .cookie(flash_cookie(flash))
            .finish(),
        Outcome::Render(view) => render(req, view),
    }
}

fn render(req: &HttpRequest, view: View) -> HttpResponse {
    let pending = req.cookie(FLASH_COOKIE);
    let message = pending
        .as_ref()
        .and_then(|cookie| Flash::from_key(cookie.value()))
        .map(|flash| flash.message());

    let name = view.name();
    let mut response = match view {
        View::Index(page) => json_view(name, index_response(page), message),
        View::Create(form) | View::Edit(form) => json_view(name, form_response(form), message),
        View::Show(details) => json_view(name, detail_response(details), message),
    };

    if pending.is_some() {
        if let Err(e) = response.add_removal_cookie(&flash_cookie_named("")) {
            tracing::warn!("Failed to clear flash cookie: {}", e);
        }
    }

    response
}

fn json_view<T: Serialize>(name: &str, data: T, message: Option<&str>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::view(name, data).with_message(message))
}

fn flash_cookie(flash: Flash) -> Cookie<'static> {
    flash_cookie_named(flash.key())
}

fn flash_cookie_named(value: &'static str) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, value)
        .path("/")
        .http_only(true)
        .finish()
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        slug: post.slug,
        category_id: post.category_id,
        thumbnail: post.thumbnail,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
    }
}

fn tag_response(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
    }
}

fn index_response(page: Page<Post>) -> PostListResponse {
    let last_page = page.last_page();
    let page_url = |n: u64| format!("/posts?page={n}");

    PostListResponse {
        pagination: PaginationMeta {
            current_page: page.current_page,
            per_page: page.per_page,
            total: page.total,
            last_page,
            next_page_url: page
                .has_more_pages()
                .then(|| page_url(page.current_page + 1)),
            prev_page_url: (page.current_page > 1)
                .then(|| page_url(page.current_page.min(last_page + 1) - 1)),
        },
        posts: page.items.into_iter().map(post_response).collect(),
    }
}

fn form_response(form: PostFormView) -> PostFormResponse {
    PostFormResponse {
        post: form.post.map(post_response),
        selected_tags: form.selected_tags,
        categories: form.categories.into_iter().map(category_response).collect(),
        tags: form.tags.into_iter().map(tag_response).collect(),
    }
}

fn detail_response(details: PostDetails) -> PostDetailResponse {
    PostDetailResponse {
        post: post_response(details.post),
        category: details.category.map(category_response),
        tags: details.tags.into_iter().map(tag_response).collect(),
    }
}
