use crate::models::recipe::{RecipeFields, RecipeModel, RecipeWithOwner};
use sqlx::{Pool, Sqlite};
use tracing::instrument;

const RECIPE_COLUMNS: &str = "r.id, r.user_id, r.title, r.description, r.ingredients, \
     r.instructions, r.category, r.servings, r.prep_time, r.cook_time, r.image_url, \
     r.is_public, r.created_at, r.updated_at";

#[derive(Clone, Debug)]
pub struct RecipeRepository {
    pool: Pool<Sqlite>,
}

/// A validated recipe ready to be written. Built by the recipe service.
#[derive(Debug)]
pub struct NewRecipe<'a> {
    pub fields: &'a RecipeFields,
    pub servings: i64,
    pub is_public: bool,
}

impl RecipeRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    #[instrument(name = "Saving new recipe to database", skip(self, recipe))]
    pub async fn insert(&self, owner_id: i64, recipe: NewRecipe<'_>) -> Result<i64, sqlx::Error> {
        let fields = recipe.fields;
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO recipes
                (user_id, title, description, ingredients, instructions, category,
                 servings, prep_time, cook_time, image_url, is_public)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id"#,
        )
        .bind(owner_id)
        .bind(fields.title.trim())
        .bind(fields.description.as_deref())
        .bind(&fields.ingredients)
        .bind(&fields.instructions)
        .bind(fields.category.as_deref())
        .bind(recipe.servings)
        .bind(fields.prep_time)
        .bind(fields.cook_time)
        .bind(fields.image_url.as_deref())
        .bind(recipe.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert recipe: {:?}", e);
            e
        })?;
        Ok(id)
    }

    #[instrument(name = "Fetching recipe from database", skip(self))]
    pub async fn fetch(&self, id: i64) -> Result<Option<RecipeWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, RecipeWithOwner>(&format!(
            r#"SELECT {RECIPE_COLUMNS}, u.username, u.avatar_url
            FROM recipes r
            JOIN users u ON r.user_id = u.id
            WHERE r.id = ?"#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Every recipe of `owner_id`, private ones included.
    #[instrument(name = "Listing recipes of owner", skip(self))]
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<RecipeModel>, sqlx::Error> {
        sqlx::query_as::<_, RecipeModel>(&format!(
            r#"SELECT {RECIPE_COLUMNS}
            FROM recipes r
            WHERE r.user_id = ?
            ORDER BY r.created_at DESC, r.id DESC"#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "Listing public recipes of user", skip(self))]
    pub async fn list_public_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<RecipeWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, RecipeWithOwner>(&format!(
            r#"SELECT {RECIPE_COLUMNS}, u.username, u.avatar_url
            FROM recipes r
            JOIN users u ON r.user_id = u.id
            WHERE r.is_public = 1 AND r.user_id = ?
            ORDER BY r.created_at DESC, r.id DESC"#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "Listing public recipes", skip(self))]
    pub async fn list_public(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, RecipeWithOwner>(&format!(
            r#"SELECT {RECIPE_COLUMNS}, u.username, u.avatar_url
            FROM recipes r
            JOIN users u ON r.user_id = u.id
            WHERE r.is_public = 1
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ? OFFSET ?"#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Replaces the editable fields of a recipe owned by `owner_id`.
    /// Returns the number of rows touched.
    #[instrument(name = "Updating recipe in database", skip(self, recipe))]
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        recipe: NewRecipe<'_>,
    ) -> Result<u64, sqlx::Error> {
        let fields = recipe.fields;
        let result = sqlx::query(
            r#"UPDATE recipes
            SET title = ?, description = ?, ingredients = ?, instructions = ?,
                category = ?, servings = ?, prep_time = ?, cook_time = ?,
                image_url = ?, is_public = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND user_id = ?"#,
        )
        .bind(fields.title.trim())
        .bind(fields.description.as_deref())
        .bind(&fields.ingredients)
        .bind(&fields.instructions)
        .bind(fields.category.as_deref())
        .bind(recipe.servings)
        .bind(fields.prep_time)
        .bind(fields.cook_time)
        .bind(fields.image_url.as_deref())
        .bind(recipe.is_public)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    #[instrument(name = "Deleting recipe from database", skip(self))]
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
