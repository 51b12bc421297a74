/// Post repository - owner-scoped CRUD over the posts table
///
/// Every statement carries the owner id; a post id belonging to someone else
/// behaves exactly like a nonexistent one.
use crate::models::Post;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new post owned by the given user
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// List all posts owned by a user, newest first
pub async fn list_posts_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM posts
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Apply a partial update to a post, only if the caller owns it
///
/// Absent fields keep their stored values. Returns None when no row matches
/// the id/owner pair, whether because the post does not exist or because it
/// belongs to another user.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($3, title),
            content = COALESCE($4, content),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_optional(pool)
    .await
}

/// Delete a post if the caller owns it; returns the number of rows removed
pub async fn delete_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
