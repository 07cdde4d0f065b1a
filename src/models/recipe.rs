use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct RecipeModel {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category: Option<String>,
    pub servings: i64,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A recipe joined with its owner's handle and avatar, as listed publicly.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecipeWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub recipe: RecipeModel,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Editable recipe fields, as sent on create and update.
///
/// The camelCase aliases accept payloads from the existing web client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFields {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
    pub category: Option<String>,
    pub servings: Option<i64>,
    #[serde(alias = "prepTime")]
    pub prep_time: Option<i64>,
    #[serde(alias = "cookTime")]
    pub cook_time: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_visibility")]
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Visibility {
    Flag(bool),
    Number(i64),
}

/// The web client sends the visibility flag as `1`/`0`.
fn deserialize_visibility<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Visibility>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Visibility::Flag(flag)) => Ok(Some(flag)),
        Some(Visibility::Number(1)) => Ok(Some(true)),
        Some(Visibility::Number(0)) => Ok(Some(false)),
        Some(Visibility::Number(other)) => Err(D::Error::custom(format!(
            "is_public must be true, false, 1 or 0, got {other}"
        ))),
    }
}
