/// Post handlers - HTTP endpoints for the authenticated notes CRUD
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::post_repo;
use crate::error::AppError;
use crate::metrics;
use crate::middleware::UserId;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Acknowledgement body returned by delete
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

/// List the caller's posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    responses(
        (status = 200, description = "Posts owned by the caller", body = [Post]),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let posts = post_repo::list_posts_by_owner(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a post owned by the caller
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Stored post", body = Post),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    // Absent fields are stored as empty strings
    let title = req.title.as_deref().unwrap_or("");
    let content = req.content.as_deref().unwrap_or("");

    let post = post_repo::create_post(&pool, user_id.0, title, content).await?;
    metrics::inc_posts_created();

    Ok(HttpResponse::Ok().json(post))
}

/// Update one of the caller's posts
///
/// Only the fields present in the body are overwritten. A post id that does
/// not exist, is malformed, or belongs to another user yields a JSON `null`
/// body with status 200; ownership mismatches are not distinguishable from
/// missing rows.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    request_body = UpdatePostRequest,
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post, or null when nothing matched", body = Post),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, AppError> {
    let post_id = match Uuid::parse_str(&path) {
        Ok(id) => id,
        Err(_) => return Ok(HttpResponse::Ok().json(serde_json::Value::Null)),
    };

    let updated = post_repo::update_post(
        &pool,
        post_id,
        user_id.0,
        req.title.as_deref(),
        req.content.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete one of the caller's posts
///
/// Always acknowledges with `{"message": "Deleted"}`, whether or not a row
/// was removed.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Deletion acknowledged", body = DeleteResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    if let Ok(post_id) = Uuid::parse_str(&path) {
        post_repo::delete_post(&pool, post_id, user_id.0).await?;
    }

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Deleted".to_string(),
    }))
}
