use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// The user on the other side of a follow edge.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct FollowUser {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
}
