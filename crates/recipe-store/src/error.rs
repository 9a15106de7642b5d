use thiserror::Error;

use crate::{IngredientId, RecipeId};

/// Name of the unique constraint on `recipes.name`.
pub const UNIQUE_RECIPE_NAME: &str = "unique_recipe_name";

/// Name of the unique constraint on `(ingredients.recipe_id, ingredients.name)`.
pub const UNIQUE_INGREDIENT_NAME: &str = "unique_ingredient_name_per_recipe";

/// Errors that can occur when interacting with the recipe store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The recipe disappeared before a transactional write could touch it.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    /// The ingredient disappeared before a transactional write could touch it.
    #[error("Ingredient {ingredient_id} not found in recipe {recipe_id}")]
    IngredientNotFound {
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    },

    /// A write violated a unique constraint.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Returns true if this error is a violation of the named unique constraint.
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint: c } if c == constraint)
    }
}

/// Result type for recipe store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
