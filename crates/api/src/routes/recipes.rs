//! Recipe and ingredient endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{IngredientId, RecipeId};
use domain::{
    AddIngredient, CreateRecipe, Ingredient, IngredientName, PricePerKg, Quantity, Recipe,
    RecipeName, RecipeService, RemoveIngredient, ValidationError,
};
use recipe_store::RecipeStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validation::{IngredientPath, NumberInput, RecipePath, Validate, ValidJson, ValidPath};

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecipeStore> {
    pub recipe_service: RecipeService<S>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
}

impl Validate for CreateRecipeRequest {
    type Output = CreateRecipe;

    fn validate(self) -> Result<CreateRecipe, ValidationError> {
        Ok(CreateRecipe::new(RecipeName::parse(&self.name)?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddIngredientRequest {
    pub name: String,
    pub quantity: NumberInput,
    pub price_per_kg: NumberInput,
}

/// A validated ingredient body, waiting for the recipe id from the path.
#[derive(Debug)]
pub struct NewIngredient {
    pub name: IngredientName,
    pub quantity: Quantity,
    pub price_per_kg: PricePerKg,
}

impl NewIngredient {
    fn for_recipe(self, recipe_id: RecipeId) -> AddIngredient {
        AddIngredient::new(recipe_id, self.name, self.quantity, self.price_per_kg)
    }
}

impl Validate for AddIngredientRequest {
    type Output = NewIngredient;

    fn validate(self) -> Result<NewIngredient, ValidationError> {
        let quantity = match self.quantity {
            NumberInput::Number(n) => Quantity::new(n)?,
            NumberInput::Text(s) => Quantity::parse(&s)?,
        };
        let price_per_kg = match self.price_per_kg {
            NumberInput::Number(n) => PricePerKg::new(n)?,
            NumberInput::Text(s) => PricePerKg::parse(&s)?,
        };

        Ok(NewIngredient {
            name: IngredientName::parse(&self.name)?,
            quantity,
            price_per_kg,
        })
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub name: String,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientResponse>>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            total: recipe.total,
            ingredients: recipe
                .ingredients
                .map(|list| list.into_iter().map(IngredientResponse::from).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub quantity: f64,
    pub price_per_kg: f64,
    pub recipe_id: RecipeId,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            quantity: ingredient.quantity,
            price_per_kg: ingredient.price_per_kg,
            recipe_id: ingredient.recipe_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[derive(Debug, Serialize)]
pub struct RecipeEnvelope {
    pub recipe: RecipeResponse,
}

impl From<Recipe> for RecipeEnvelope {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe: recipe.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRecipeResponse {
    pub deleted_recipe: String,
}

// -- Handlers --

/// GET /recipe — all recipes, without ingredients.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = state.recipe_service.list_recipes().await?;

    Ok(Json(RecipeListResponse {
        recipes: recipes.into_iter().map(RecipeResponse::from).collect(),
    }))
}

/// GET /recipe/{recipeId} — one recipe with its ingredients.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidPath(recipe_id): ValidPath<RecipePath>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = state.recipe_service.get_recipe(recipe_id).await?;
    Ok(Json(recipe.into()))
}

/// POST /recipe — create an empty recipe.
#[tracing::instrument(skip(state))]
pub async fn create<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidJson(cmd): ValidJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeEnvelope>), ApiError> {
    let recipe = state.recipe_service.create_recipe(cmd).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// DELETE /recipe/{recipeId} — delete a recipe and all its ingredients.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidPath(recipe_id): ValidPath<RecipePath>,
) -> Result<Json<DeletedRecipeResponse>, ApiError> {
    let name = state.recipe_service.delete_recipe(recipe_id).await?;
    Ok(Json(DeletedRecipeResponse {
        deleted_recipe: name,
    }))
}

/// POST /recipe/{recipeId} — add an ingredient and fold its cost into the total.
#[tracing::instrument(skip(state))]
pub async fn add_ingredient<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidPath(recipe_id): ValidPath<RecipePath>,
    ValidJson(ingredient): ValidJson<AddIngredientRequest>,
) -> Result<(StatusCode, Json<RecipeEnvelope>), ApiError> {
    let recipe = state
        .recipe_service
        .add_ingredient(ingredient.for_recipe(recipe_id))
        .await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// DELETE /recipe/{recipeId}/ingredient/{ingredientId} — remove an ingredient
/// and subtract its cost from the total.
#[tracing::instrument(skip(state))]
pub async fn remove_ingredient<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidPath((recipe_id, ingredient_id)): ValidPath<IngredientPath>,
) -> Result<Json<RecipeEnvelope>, ApiError> {
    let recipe = state
        .recipe_service
        .remove_ingredient(RemoveIngredient::new(recipe_id, ingredient_id))
        .await?;
    Ok(Json(recipe.into()))
}
