use crate::models::user::{UserModel, UserSummary};
use sqlx::{Pool, Sqlite};
use tracing::instrument;

const SUMMARY_COLUMNS: &str = "id, username, bio, avatar_url, created_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: Pool<Sqlite>,
}

impl UserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    #[instrument(name = "Saving new user to database", skip(self, password_hash))]
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    #[instrument(name = "Fetching user by username from database", skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, sqlx::Error> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"SELECT id, username, email, password_hash, bio, avatar_url, created_at
            FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {:?}", e);
            e
        })?;
        Ok(user)
    }

    #[instrument(name = "Fetching user summary from database", skip(self))]
    pub async fn find_summary(&self, id: i64) -> Result<Option<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Case-insensitive substring search on username. `pattern` is matched
    /// literally: LIKE wildcards in it are escaped.
    #[instrument(name = "Searching users by username", skip(self))]
    pub async fn search(&self, pattern: &str, limit: i64) -> Result<Vec<UserSummary>, sqlx::Error> {
        let escaped = pattern
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        sqlx::query_as::<_, UserSummary>(&format!(
            r#"SELECT {SUMMARY_COLUMNS} FROM users
            WHERE LOWER(username) LIKE LOWER(?) ESCAPE '\'
            ORDER BY username ASC
            LIMIT ?"#
        ))
        .bind(format!("%{escaped}%"))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Returns the number of rows touched, zero when the user is missing.
    #[instrument(name = "Updating user bio", skip(self, bio))]
    pub async fn update_bio(&self, id: i64, bio: Option<&str>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET bio = ? WHERE id = ?")
            .bind(bio)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[instrument(name = "Updating user avatar", skip(self))]
    pub async fn update_avatar(&self, id: i64, avatar_url: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET avatar_url = ? WHERE id = ?")
            .bind(avatar_url)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn follow_counts(&self, id: i64) -> Result<(i64, i64), sqlx::Error> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"SELECT
                (SELECT COUNT(*) FROM followers WHERE following_id = ?1),
                (SELECT COUNT(*) FROM followers WHERE follower_id = ?1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}

