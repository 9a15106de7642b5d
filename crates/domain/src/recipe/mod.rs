//! Recipes, their ingredients, and the service that keeps totals consistent.

mod commands;
mod service;
mod value_objects;

pub use commands::{AddIngredient, CreateRecipe, RemoveIngredient};
pub use service::RecipeService;
pub use value_objects::{
    INGREDIENT_NAME_MAX_LEN, IngredientName, PricePerKg, Quantity, RECIPE_NAME_MAX_LEN,
    RecipeName,
};
