//! Post resource handlers.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::handlers::form::read_post_form;
use crate::handlers::render::respond;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub page: Option<u64>,
}

/// GET /posts
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<IndexQuery>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.index(query.page.unwrap_or(1)).await?;
    Ok(respond(&req, outcome))
}

/// GET /posts/create
pub async fn create(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let outcome = state.posts.create().await?;
    Ok(respond(&req, outcome))
}

/// POST /posts
pub async fn store(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;

    let outcome = state
        .posts
        .store(form)
        .await
        .map_err(|e| AppError::from(e).in_form("posts.create"))?;

    Ok(respond(&req, outcome))
}

/// GET /posts/{post}
pub async fn show(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.show(path.into_inner()).await?;
    Ok(respond(&req, outcome))
}

/// GET /posts/{post}/edit
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.edit(path.into_inner()).await?;
    Ok(respond(&req, outcome))
}

/// PUT|PATCH /posts/{post}
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;

    let outcome = state
        .posts
        .update(path.into_inner(), form)
        .await
        .map_err(|e| AppError::from(e).in_form("posts.edit"))?;

    Ok(respond(&req, outcome))
}

/// DELETE /posts/{post}
pub async fn destroy(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.destroy(path.into_inner()).await?;

    Ok(respond(&req, outcome))
}
