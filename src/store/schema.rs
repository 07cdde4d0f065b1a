//! Ordered schema evolution for the SQLite store.
//!
//! Each step checks whether its table or column is already present before
//! applying, so `migrate` can run on every startup against fresh databases
//! and databases created by older releases alike. Older releases stored the
//! credential hash in `users.password`; it is renamed in place.

use sqlx::{Pool, Sqlite};
use tracing::instrument;

enum Step {
    CreateTable {
        table: &'static str,
        ddl: &'static str,
    },
    AddColumn {
        table: &'static str,
        column: &'static str,
        ddl: &'static str,
    },
    RenameColumn {
        table: &'static str,
        from: &'static str,
        to: &'static str,
        ddl: &'static str,
    },
    CreateIndex {
        ddl: &'static str,
    },
}

const STEPS: &[Step] = &[
    Step::CreateTable {
        table: "users",
        ddl: r#"CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"#,
    },
    Step::CreateTable {
        table: "recipes",
        ddl: r#"CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            title TEXT NOT NULL,
            description TEXT,
            ingredients TEXT NOT NULL,
            instructions TEXT NOT NULL,
            category TEXT,
            servings INTEGER NOT NULL DEFAULT 1,
            prep_time INTEGER,
            cook_time INTEGER,
            image_url TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"#,
    },
    Step::RenameColumn {
        table: "users",
        from: "password",
        to: "password_hash",
        ddl: "ALTER TABLE users RENAME COLUMN password TO password_hash",
    },
    Step::AddColumn {
        table: "recipes",
        column: "is_public",
        ddl: "ALTER TABLE recipes ADD COLUMN is_public BOOLEAN NOT NULL DEFAULT 1",
    },
    Step::AddColumn {
        table: "users",
        column: "bio",
        ddl: "ALTER TABLE users ADD COLUMN bio TEXT",
    },
    Step::AddColumn {
        table: "users",
        column: "avatar_url",
        ddl: "ALTER TABLE users ADD COLUMN avatar_url TEXT",
    },
    Step::CreateTable {
        table: "followers",
        ddl: r#"CREATE TABLE followers (
            follower_id INTEGER NOT NULL REFERENCES users(id),
            following_id INTEGER NOT NULL REFERENCES users(id),
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (follower_id, following_id),
            CHECK (follower_id <> following_id)
        )"#,
    },
    Step::CreateIndex {
        ddl: "CREATE INDEX IF NOT EXISTS idx_recipes_owner ON recipes (user_id, created_at)",
    },
    Step::CreateIndex {
        ddl: "CREATE INDEX IF NOT EXISTS idx_recipes_public ON recipes (is_public, created_at)",
    },
    Step::CreateIndex {
        ddl: "CREATE INDEX IF NOT EXISTS idx_followers_following ON followers (following_id)",
    },
];

#[instrument(name = "Migrating database schema", skip(pool))]
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for step in STEPS {
        match step {
            Step::CreateTable { table, ddl } => {
                if table_exists(pool, table).await? {
                    continue;
                }
                sqlx::query(ddl).execute(pool).await?;
                tracing::info!(table, "Created table");
            }
            Step::AddColumn { table, column, ddl } => {
                if column_exists(pool, table, column).await? {
                    continue;
                }
                sqlx::query(ddl).execute(pool).await?;
                tracing::info!(table, column, "Added column");
            }
            Step::RenameColumn {
                table,
                from,
                to,
                ddl,
            } => {
                if !column_exists(pool, table, from).await?
                    || column_exists(pool, table, to).await?
                {
                    continue;
                }
                sqlx::query(ddl).execute(pool).await?;
                tracing::info!(table, from, to, "Renamed column");
            }
            Step::CreateIndex { ddl } => {
                sqlx::query(ddl).execute(pool).await?;
            }
        }
    }
    Ok(())
}

async fn table_exists(pool: &Pool<Sqlite>, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

async fn column_exists(pool: &Pool<Sqlite>, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
