//! Persistence layer for recipes and ingredients.
//!
//! [`RecipeStore`] is the seam between the service layer and the database.
//! Two implementations are provided: [`PostgresRecipeStore`] for production
//! and [`InMemoryRecipeStore`] for tests and database-less runs.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use common::{IngredientId, RecipeId};
pub use error::{Result, StoreError, UNIQUE_INGREDIENT_NAME, UNIQUE_RECIPE_NAME};
pub use memory::InMemoryRecipeStore;
pub use model::{Ingredient, Recipe};
pub use postgres::PostgresRecipeStore;
pub use store::{RecipeStore, RecipeStoreExt};
