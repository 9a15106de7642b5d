//! Domain error types.

use common::{IngredientId, RecipeId};
use recipe_store::StoreError;
use thiserror::Error;

/// Errors that can occur during recipe operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The recipe does not exist.
    #[error("Couldn't find recipe {0}.")]
    RecipeNotFound(RecipeId),

    /// The ingredient does not exist in the given recipe.
    #[error("Couldn't find ingredient {ingredient_id} in recipe {recipe_id}.")]
    IngredientNotFound {
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    },

    /// Another recipe already uses this name.
    #[error("Couldn't create recipe. The name '{0}' is already being used.")]
    RecipeNameTaken(String),

    /// The recipe already has an ingredient with this name.
    #[error("Couldn't add ingredient. The name '{name}' is already being used in this recipe.")]
    IngredientNameTaken { recipe_id: RecipeId, name: String },

    /// The ingredient's cost, or the total it would produce, is not a finite number.
    #[error("Couldn't add ingredient. The recipe total would exceed the largest supported value.")]
    TotalOutOfRange { recipe_id: RecipeId },

    /// An error occurred in the recipe store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl RecipeError {
    /// Short, stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            RecipeError::RecipeNotFound(_) => "recipe_not_found",
            RecipeError::IngredientNotFound { .. } => "ingredient_not_found",
            RecipeError::RecipeNameTaken(_) => "recipe_name_taken",
            RecipeError::IngredientNameTaken { .. } => "ingredient_name_taken",
            RecipeError::TotalOutOfRange { .. } => "total_out_of_range",
            RecipeError::Store(_) => "store",
        }
    }
}

// Rows that vanish inside a store transaction surface as the matching not-found error.
impl From<StoreError> for RecipeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RecipeNotFound(id) => RecipeError::RecipeNotFound(id),
            StoreError::IngredientNotFound {
                recipe_id,
                ingredient_id,
            } => RecipeError::IngredientNotFound {
                recipe_id,
                ingredient_id,
            },
            other => RecipeError::Store(other),
        }
    }
}

/// A value failed the constraints of its value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("{field} must be a valid UUID")]
    InvalidId { field: &'static str },
}
