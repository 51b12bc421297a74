/// User repository - database operations for Google-federated identities
use crate::models::User;
use sqlx::PgPool;

/// Find a user by their Google account id
pub async fn find_by_google_id(
    pool: &PgPool,
    google_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, google_id, name, created_at
        FROM users
        WHERE google_id = $1
        "#,
    )
    .bind(google_id)
    .fetch_optional(pool)
    .await
}

/// Create a user for a Google identity seen for the first time
///
/// Two logins racing on the same new identity both land here; the conflict
/// clause turns the loser into a no-op write so both calls return the single
/// surviving row. The stored name is whatever the first insert carried.
pub async fn create_user(pool: &PgPool, google_id: &str, name: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (google_id, name)
        VALUES ($1, $2)
        ON CONFLICT (google_id) DO UPDATE SET google_id = EXCLUDED.google_id
        RETURNING id, google_id, name, created_at
        "#,
    )
    .bind(google_id)
    .bind(name)
    .fetch_one(pool)
    .await
}
