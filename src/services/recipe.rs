use crate::{
    errors::AppError,
    models::recipe::{RecipeFields, RecipeModel, RecipeWithOwner},
    services::access::{can_mutate, can_view},
    store::{RecipeRepository, recipe::NewRecipe},
};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct RecipeService {
    repo: RecipeRepository,
}

/// Checks required fields and numeric ranges, filling in defaults.
fn validate(fields: &RecipeFields) -> Result<NewRecipe<'_>, AppError> {
    if fields.title.trim().is_empty()
        || fields.ingredients.trim().is_empty()
        || fields.instructions.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Title, ingredients and instructions are required".into(),
        ));
    }
    let servings = fields.servings.unwrap_or(1);
    if servings < 1 {
        return Err(AppError::Validation("Servings must be at least 1".into()));
    }
    if fields.prep_time.is_some_and(|t| t < 0) || fields.cook_time.is_some_and(|t| t < 0) {
        return Err(AppError::Validation(
            "Preparation and cooking times cannot be negative".into(),
        ));
    }
    Ok(NewRecipe {
        fields,
        servings,
        is_public: fields.is_public.unwrap_or(true),
    })
}

impl RecipeService {
    pub fn new(repo: RecipeRepository) -> Self {
        Self { repo }
    }

    #[instrument(name = "Service: Create recipe", skip(self, fields))]
    pub async fn create_recipe(&self, owner_id: i64, fields: &RecipeFields) -> Result<i64, AppError> {
        let recipe = validate(fields)?;
        let id = self.repo.insert(owner_id, recipe).await?;
        tracing::info!(recipe_id = id, "Recipe created");
        Ok(id)
    }

    /// The owner's dashboard: public and private recipes, newest first.
    pub async fn list_recipes_for_owner(&self, owner_id: i64) -> Result<Vec<RecipeModel>, AppError> {
        Ok(self.repo.list_by_owner(owner_id).await?)
    }

    pub async fn list_public_recipes_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<RecipeWithOwner>, AppError> {
        let mut recipes = self.repo.list_public_by_owner(user_id).await?;
        recipes.retain(|r| can_view(&r.recipe, None));
        Ok(recipes)
    }

    /// A recipe the viewer is not allowed to see is reported as missing.
    #[instrument(name = "Service: Get recipe", skip(self))]
    pub async fn get_recipe(
        &self,
        recipe_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<RecipeWithOwner, AppError> {
        match self.repo.fetch(recipe_id).await? {
            Some(r) if can_view(&r.recipe, viewer_id) => Ok(r),
            _ => Err(AppError::NotFound("Recipe")),
        }
    }

    #[instrument(name = "Service: Update recipe", skip(self, fields))]
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        caller_id: i64,
        fields: &RecipeFields,
    ) -> Result<(), AppError> {
        self.authorize_mutation(recipe_id, caller_id).await?;
        let recipe = validate(fields)?;
        if self.repo.update(recipe_id, caller_id, recipe).await? == 0 {
            return Err(AppError::NotFound("Recipe"));
        }
        Ok(())
    }

    #[instrument(name = "Service: Delete recipe", skip(self))]
    pub async fn delete_recipe(&self, recipe_id: i64, caller_id: i64) -> Result<(), AppError> {
        self.authorize_mutation(recipe_id, caller_id).await?;
        if self.repo.delete(recipe_id, caller_id).await? == 0 {
            return Err(AppError::NotFound("Recipe"));
        }
        Ok(())
    }

    async fn authorize_mutation(&self, recipe_id: i64, caller_id: i64) -> Result<(), AppError> {
        let recipe = self
            .repo
            .fetch(recipe_id)
            .await?
            .ok_or(AppError::NotFound("Recipe"))?;
        if !can_mutate(&recipe.recipe, caller_id) {
            tracing::warn!(owner_id = recipe.recipe.user_id, "Caller does not own recipe");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}
