pub mod follow;
pub mod recipe;
pub mod schema;
pub mod user;

pub use follow::FollowRepository;
pub use recipe::RecipeRepository;
pub use user::UserRepository;

#[cfg(test)]
pub(crate) async fn empty_test_pool() -> (tempfile::TempDir, sqlx::SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(dir.path().join("test.db"))
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("open sqlite");
    (dir, pool)
}

/// A migrated database in a fresh temporary directory. Keep the `TempDir`
/// alive for as long as the pool is used.
#[cfg(test)]
pub(crate) async fn test_pool() -> (tempfile::TempDir, sqlx::SqlitePool) {
    let (dir, pool) = empty_test_pool().await;
    schema::migrate(&pool).await.expect("migrate");
    (dir, pool)
}
