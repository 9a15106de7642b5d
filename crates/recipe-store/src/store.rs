use async_trait::async_trait;

use crate::{Ingredient, IngredientId, Recipe, RecipeId, Result};

/// Core trait for recipe persistence.
///
/// Single-row reads and writes map to one statement each. The three
/// multi-step mutations (`delete_recipe`, `insert_ingredient`,
/// `delete_ingredient`) run in one transaction: either every step is
/// applied or none is. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns every recipe in insertion order, without ingredients.
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Finds a recipe by id, without ingredients.
    async fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Finds a recipe by its exact name, without ingredients.
    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>>;

    /// Returns the ingredients of a recipe in insertion order.
    async fn list_ingredients(&self, recipe_id: RecipeId) -> Result<Vec<Ingredient>>;

    /// Finds an ingredient by id, scoped to its owning recipe.
    async fn find_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    ) -> Result<Option<Ingredient>>;

    /// Finds an ingredient of a recipe by its exact name.
    async fn find_ingredient_by_name(
        &self,
        recipe_id: RecipeId,
        name: &str,
    ) -> Result<Option<Ingredient>>;

    /// Inserts a new recipe row.
    ///
    /// Fails with `UniqueViolation` if the name is already taken.
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Deletes a recipe and all of its ingredients atomically.
    ///
    /// Returns the deleted recipe, or `RecipeNotFound` if it does not exist.
    async fn delete_recipe(&self, id: RecipeId) -> Result<Recipe>;

    /// Inserts an ingredient and sets its recipe's total atomically.
    ///
    /// Fails with `RecipeNotFound` if the recipe does not exist and with
    /// `UniqueViolation` if the recipe already has an ingredient of that name.
    async fn insert_ingredient(&self, ingredient: &Ingredient, new_total: f64) -> Result<()>;

    /// Deletes an ingredient and sets its recipe's total atomically.
    ///
    /// When no ingredient is left the total is set to exactly `0.0` instead
    /// of `new_total`. Returns the deleted ingredient.
    async fn delete_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
        new_total: f64,
    ) -> Result<Ingredient>;
}

/// Extension trait providing convenience methods for recipe stores.
#[async_trait]
pub trait RecipeStoreExt: RecipeStore {
    /// Checks if a recipe exists.
    async fn recipe_exists(&self, id: RecipeId) -> Result<bool> {
        Ok(self.find_recipe(id).await?.is_some())
    }

    /// Loads a recipe together with its ingredients.
    async fn load_recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        match self.find_recipe(id).await? {
            Some(recipe) => {
                let ingredients = self.list_ingredients(id).await?;
                Ok(Some(recipe.with_ingredients(ingredients)))
            }
            None => Ok(None),
        }
    }
}

// Blanket implementation for all RecipeStore implementations
impl<T: RecipeStore + ?Sized> RecipeStoreExt for T {}
