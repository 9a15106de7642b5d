//! Recipe service: business rules on top of a [`RecipeStore`].

use common::RecipeId;
use recipe_store::{
    Ingredient, Recipe, RecipeStore, RecipeStoreExt, UNIQUE_INGREDIENT_NAME, UNIQUE_RECIPE_NAME,
};

use crate::error::RecipeError;

use super::{AddIngredient, CreateRecipe, RemoveIngredient};

/// Service for managing recipes and their ingredients.
///
/// Performs existence and uniqueness checks, computes the recipe total, and
/// hands every multi-step mutation to the store as a single transaction.
/// The store handle is injected, so tests can run against
/// [`recipe_store::InMemoryRecipeStore`].
pub struct RecipeService<S: RecipeStore> {
    store: S,
}

impl<S: RecipeStore> RecipeService<S> {
    /// Creates a new recipe service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists all recipes, without ingredients.
    #[tracing::instrument(skip(self))]
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, RecipeError> {
        Ok(self.store.list_recipes().await?)
    }

    /// Gets a recipe with its ingredients loaded.
    #[tracing::instrument(skip(self))]
    pub async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, RecipeError> {
        self.store
            .load_recipe(id)
            .await?
            .ok_or(RecipeError::RecipeNotFound(id))
    }

    /// Creates a new recipe with a zero total.
    #[tracing::instrument(skip(self))]
    pub async fn create_recipe(&self, cmd: CreateRecipe) -> Result<Recipe, RecipeError> {
        let name = cmd.name.into_inner();

        if self.store.find_recipe_by_name(&name).await?.is_some() {
            return Err(RecipeError::RecipeNameTaken(name));
        }

        let recipe = Recipe::new(name);
        self.store.insert_recipe(&recipe).await.map_err(|e| {
            // Lost a race with a concurrent create of the same name
            if e.violates(UNIQUE_RECIPE_NAME) {
                RecipeError::RecipeNameTaken(recipe.name.clone())
            } else {
                e.into()
            }
        })?;

        metrics::counter!("recipes_created_total").increment(1);
        tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "recipe created");
        Ok(recipe)
    }

    /// Deletes a recipe together with all of its ingredients.
    ///
    /// Returns the name of the deleted recipe.
    #[tracing::instrument(skip(self))]
    pub async fn delete_recipe(&self, id: RecipeId) -> Result<String, RecipeError> {
        let deleted = self.store.delete_recipe(id).await?;

        metrics::counter!("recipes_deleted_total").increment(1);
        tracing::info!(recipe_id = %id, name = %deleted.name, "recipe deleted");
        Ok(deleted.name)
    }

    /// Adds an ingredient and raises the recipe total by `quantity * price_per_kg`.
    ///
    /// Returns the updated recipe with its ingredients.
    #[tracing::instrument(skip(self))]
    pub async fn add_ingredient(&self, cmd: AddIngredient) -> Result<Recipe, RecipeError> {
        let recipe = self
            .store
            .find_recipe(cmd.recipe_id)
            .await?
            .ok_or(RecipeError::RecipeNotFound(cmd.recipe_id))?;

        if self
            .store
            .find_ingredient_by_name(recipe.id, cmd.name.as_str())
            .await?
            .is_some()
        {
            return Err(RecipeError::IngredientNameTaken {
                recipe_id: recipe.id,
                name: cmd.name.into_inner(),
            });
        }

        let new_total = cmd
            .cost()
            .map(|cost| recipe.total + cost)
            .filter(|total| total.is_finite())
            .ok_or(RecipeError::TotalOutOfRange {
                recipe_id: recipe.id,
            })?;
        let ingredient = Ingredient::new(
            recipe.id,
            cmd.name.into_inner(),
            cmd.quantity.value(),
            cmd.price_per_kg.value(),
        );

        self.store
            .insert_ingredient(&ingredient, new_total)
            .await
            .map_err(|e| {
                if e.violates(UNIQUE_INGREDIENT_NAME) {
                    RecipeError::IngredientNameTaken {
                        recipe_id: recipe.id,
                        name: ingredient.name.clone(),
                    }
                } else {
                    e.into()
                }
            })?;

        metrics::counter!("ingredients_added_total").increment(1);
        tracing::info!(
            recipe_id = %recipe.id,
            ingredient_id = %ingredient.id,
            new_total,
            "ingredient added"
        );

        self.get_recipe(recipe.id).await
    }

    /// Removes an ingredient and lowers the recipe total by its cost.
    ///
    /// Returns the updated recipe with its remaining ingredients.
    #[tracing::instrument(skip(self))]
    pub async fn remove_ingredient(&self, cmd: RemoveIngredient) -> Result<Recipe, RecipeError> {
        let recipe = self
            .store
            .find_recipe(cmd.recipe_id)
            .await?
            .ok_or(RecipeError::RecipeNotFound(cmd.recipe_id))?;

        let ingredient = self
            .store
            .find_ingredient(recipe.id, cmd.ingredient_id)
            .await?
            .ok_or(RecipeError::IngredientNotFound {
                recipe_id: recipe.id,
                ingredient_id: cmd.ingredient_id,
            })?;

        // Rounding may undershoot zero; the store zeroes the total once the recipe is empty
        let new_total = (recipe.total - ingredient.cost()).max(0.0);

        self.store
            .delete_ingredient(recipe.id, ingredient.id, new_total)
            .await?;

        metrics::counter!("ingredients_removed_total").increment(1);
        tracing::info!(
            recipe_id = %recipe.id,
            ingredient_id = %ingredient.id,
            new_total,
            "ingredient removed"
        );

        self.get_recipe(recipe.id).await
    }
}
