//! Shared types for the recipe cost API.

pub mod types;

pub use types::{IngredientId, RecipeId};
