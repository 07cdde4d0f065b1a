use crate::{
    errors::AppError,
    models::{recipe::RecipeWithOwner, user::UserSummary},
    services::access::can_view,
    store::{RecipeRepository, UserRepository},
};
use tracing::instrument;

pub const DEFAULT_FEED_LIMIT: i64 = 50;
pub const MAX_FEED_LIMIT: i64 = 100;
pub const MAX_SEARCH_RESULTS: i64 = 20;
const MIN_SEARCH_CHARS: usize = 2;

#[derive(Clone, Debug)]
pub struct FeedService {
    recipes: RecipeRepository,
    users: UserRepository,
}

impl FeedService {
    pub fn new(recipes: RecipeRepository, users: UserRepository) -> Self {
        Self { recipes, users }
    }

    /// Public recipes from everyone, newest first. `limit` is clamped to
    /// `MAX_FEED_LIMIT`.
    #[instrument(name = "Service: Public feed", skip(self))]
    pub async fn public_feed(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RecipeWithOwner>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT);
        let offset = offset.unwrap_or(0);
        if limit < 0 || offset < 0 {
            return Err(AppError::Validation(
                "limit and offset must be non-negative integers".into(),
            ));
        }
        let mut recipes = self
            .recipes
            .list_public(limit.min(MAX_FEED_LIMIT), offset)
            .await?;
        recipes.retain(|r| can_view(&r.recipe, None));
        Ok(recipes)
    }

    /// Same listing as the feed without paging.
    pub async fn all_public_recipes(&self) -> Result<Vec<RecipeWithOwner>, AppError> {
        // SQLite treats a negative LIMIT as unbounded.
        let mut recipes = self.recipes.list_public(-1, 0).await?;
        recipes.retain(|r| can_view(&r.recipe, None));
        Ok(recipes)
    }

    #[instrument(name = "Service: Search users", skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, AppError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Err(AppError::Validation(format!(
                "Search query must be at least {MIN_SEARCH_CHARS} characters"
            )));
        }
        Ok(self.users.search(query, MAX_SEARCH_RESULTS).await?)
    }
}
