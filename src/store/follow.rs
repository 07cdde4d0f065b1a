use crate::models::follow::FollowUser;
use sqlx::{Pool, Sqlite};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct FollowRepository {
    pool: Pool<Sqlite>,
}

impl FollowRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Inserts the edge. A duplicate surfaces as a unique-constraint
    /// violation from the composite primary key.
    #[instrument(name = "Saving follow edge", skip(self))]
    pub async fn insert(&self, follower_id: i64, following_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO followers (follower_id, following_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(name = "Deleting follow edge", skip(self))]
    pub async fn delete(&self, follower_id: i64, following_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM followers WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn exists(&self, follower_id: i64, following_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM followers WHERE follower_id = ? AND following_id = ?",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Users following `user_id`.
    #[instrument(name = "Listing followers", skip(self))]
    pub async fn followers_of(&self, user_id: i64) -> Result<Vec<FollowUser>, sqlx::Error> {
        sqlx::query_as::<_, FollowUser>(
            r#"SELECT u.id, u.username, u.avatar_url
            FROM followers f
            JOIN users u ON f.follower_id = u.id
            WHERE f.following_id = ?
            ORDER BY u.username ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Users `user_id` follows.
    #[instrument(name = "Listing followed users", skip(self))]
    pub async fn following_of(&self, user_id: i64) -> Result<Vec<FollowUser>, sqlx::Error> {
        sqlx::query_as::<_, FollowUser>(
            r#"SELECT u.id, u.username, u.avatar_url
            FROM followers f
            JOIN users u ON f.following_id = u.id
            WHERE f.follower_id = ?
            ORDER BY u.username ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
