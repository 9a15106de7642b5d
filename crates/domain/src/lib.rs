//! Domain layer for the recipe cost API.
//!
//! This crate provides:
//! - Value objects that enforce input constraints at construction
//! - Commands describing each mutation
//! - [`RecipeService`], which owns existence/uniqueness checks and the
//!   running cost total

pub mod error;
pub mod recipe;

pub use error::{RecipeError, ValidationError};
pub use recipe::{
    AddIngredient, CreateRecipe, INGREDIENT_NAME_MAX_LEN, IngredientName, PricePerKg, Quantity,
    RECIPE_NAME_MAX_LEN, RecipeName, RecipeService, RemoveIngredient,
};
pub use recipe_store::{Ingredient, Recipe};
