//! Who may read and who may change a recipe.

use crate::models::recipe::RecipeModel;

/// A recipe is visible to everyone when public, and always to its owner.
/// `viewer_id` is `None` for anonymous readers.
pub fn can_view(recipe: &RecipeModel, viewer_id: Option<i64>) -> bool {
    recipe.is_public || viewer_id == Some(recipe.user_id)
}

/// Only the owner may update or delete a recipe.
pub fn can_mutate(recipe: &RecipeModel, caller_id: i64) -> bool {
    recipe.user_id == caller_id
}
