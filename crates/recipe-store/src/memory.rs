use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Ingredient, IngredientId, Recipe, RecipeId, Result, StoreError, UNIQUE_INGREDIENT_NAME,
    UNIQUE_RECIPE_NAME, store::RecipeStore,
};

#[derive(Debug, Default)]
struct InMemoryState {
    // Rows are kept in insertion order; recipes never carry ingredients here.
    recipes: Vec<Recipe>,
    ingredients: Vec<Ingredient>,
}

impl InMemoryState {
    fn recipe_mut(&mut self, id: RecipeId) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|r| r.id == id)
    }
}

/// In-memory recipe store implementation for testing.
///
/// Every operation holds the state lock for its whole duration, so the
/// multi-step mutations are atomic just like their PostgreSQL counterparts.
/// Unique constraints are simulated with the same constraint names.
#[derive(Clone, Default)]
pub struct InMemoryRecipeStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryRecipeStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored recipes.
    pub async fn recipe_count(&self) -> usize {
        self.state.read().await.recipes.len()
    }

    /// Returns the number of stored ingredients across all recipes.
    pub async fn ingredient_count(&self) -> usize {
        self.state.read().await.ingredients.len()
    }

    /// Clears all recipes and ingredients.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.recipes.clear();
        state.ingredients.clear();
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.state.read().await.recipes.clone())
    }

    async fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let state = self.state.read().await;
        Ok(state.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>> {
        let state = self.state.read().await;
        Ok(state.recipes.iter().find(|r| r.name == name).cloned())
    }

    async fn list_ingredients(&self, recipe_id: RecipeId) -> Result<Vec<Ingredient>> {
        let state = self.state.read().await;
        Ok(state
            .ingredients
            .iter()
            .filter(|i| i.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn find_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    ) -> Result<Option<Ingredient>> {
        let state = self.state.read().await;
        Ok(state
            .ingredients
            .iter()
            .find(|i| i.recipe_id == recipe_id && i.id == ingredient_id)
            .cloned())
    }

    async fn find_ingredient_by_name(
        &self,
        recipe_id: RecipeId,
        name: &str,
    ) -> Result<Option<Ingredient>> {
        let state = self.state.read().await;
        Ok(state
            .ingredients
            .iter()
            .find(|i| i.recipe_id == recipe_id && i.name == name)
            .cloned())
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut state = self.state.write().await;

        if state.recipes.iter().any(|r| r.name == recipe.name) {
            return Err(StoreError::UniqueViolation {
                constraint: UNIQUE_RECIPE_NAME.to_string(),
            });
        }

        state.recipes.push(recipe.clone().without_ingredients());
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Recipe> {
        let mut state = self.state.write().await;

        let position = state
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::RecipeNotFound(id))?;

        state.ingredients.retain(|i| i.recipe_id != id);
        Ok(state.recipes.remove(position))
    }

    async fn insert_ingredient(&self, ingredient: &Ingredient, new_total: f64) -> Result<()> {
        let mut state = self.state.write().await;
        let recipe_id = ingredient.recipe_id;

        if state.recipe_mut(recipe_id).is_none() {
            return Err(StoreError::RecipeNotFound(recipe_id));
        }

        if state
            .ingredients
            .iter()
            .any(|i| i.recipe_id == recipe_id && i.name == ingredient.name)
        {
            return Err(StoreError::UniqueViolation {
                constraint: UNIQUE_INGREDIENT_NAME.to_string(),
            });
        }

        state.ingredients.push(ingredient.clone());
        if let Some(recipe) = state.recipe_mut(recipe_id) {
            recipe.total = new_total;
        }
        Ok(())
    }

    async fn delete_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
        new_total: f64,
    ) -> Result<Ingredient> {
        let mut state = self.state.write().await;

        if state.recipe_mut(recipe_id).is_none() {
            return Err(StoreError::RecipeNotFound(recipe_id));
        }

        let position = state
            .ingredients
            .iter()
            .position(|i| i.recipe_id == recipe_id && i.id == ingredient_id)
            .ok_or(StoreError::IngredientNotFound {
                recipe_id,
                ingredient_id,
            })?;

        let removed = state.ingredients.remove(position);
        let emptied = !state.ingredients.iter().any(|i| i.recipe_id == recipe_id);
        if let Some(recipe) = state.recipe_mut(recipe_id) {
            recipe.total = if emptied { 0.0 } else { new_total };
        }
        Ok(removed)
    }
}
