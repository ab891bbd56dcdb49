//! Post API endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult, AppJson, DeleteResult};
use crate::errors::AppError;
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::AppState;

/// Pagination parameters. Without `perPage` the whole list is returned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

/// One page of posts, newest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Slice `items` into 1-based page `page` of `per_page` items.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> (Vec<T>, usize) {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let start = (page.max(1) - 1).saturating_mul(per_page);
    let slice = items.into_iter().skip(start).take(per_page).collect();
    (slice, total_pages)
}

/// GET /api/posts - List posts, optionally one page at a time.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> ApiResult<PostPage> {
    let posts = state.repo.list_posts().await?;
    let total = posts.len();

    let page = match params.per_page {
        Some(per_page) => {
            let page = params.page.unwrap_or(1).max(1);
            let (posts, total_pages) = paginate(posts, page, per_page);
            PostPage {
                posts,
                total,
                page,
                total_pages,
            }
        }
        None => PostPage {
            posts,
            total,
            page: 1,
            total_pages: usize::from(total > 0),
        },
    };

    success(page)
}

/// GET /api/posts/{id} - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    match state.repo.get_post(&id).await? {
        Some(post) => success(post),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// POST /api/admin/posts - Create a post.
pub async fn create_post(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePostRequest>,
) -> ApiResult<Post> {
    let post = Post::from_request(request)?;
    state.repo.add_post(post.clone()).await?;
    success(post)
}

/// PUT /api/admin/posts/{id} - Edit a post.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdatePostRequest>,
) -> ApiResult<Post> {
    let existing = state
        .repo
        .get_post(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

    let updated = existing.apply(request)?;
    if !state.repo.update_post(updated.clone()).await? {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }
    success(updated)
}

/// DELETE /api/admin/posts/{id} - Delete a post. Deleting twice is harmless.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResult> {
    let deleted = state.repo.delete_post(&id).await?;
    if !deleted {
        tracing::debug!(id = %id, "Delete of unknown post ignored");
    }
    success(DeleteResult { deleted })
}
