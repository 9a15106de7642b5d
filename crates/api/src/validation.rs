//! Boundary validation.
//!
//! Raw path parameters and request bodies are deserialized into plain
//! structs, then converted into domain types through [`Validate`]. The
//! [`ValidPath`] and [`ValidJson`] extractors run both steps before the
//! handler is called, so handlers only ever see validated input.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use common::{IngredientId, RecipeId};
use domain::ValidationError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Conversion of raw request input into validated domain input.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationError>;
}

/// Extracts `T` from the path parameters and validates it.
pub struct ValidPath<T: Validate>(pub T::Output);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
    T::Output: Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        Ok(Self(raw.validate()?))
    }
}

/// Extracts `T` from a JSON body and validates it.
pub struct ValidJson<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        Ok(Self(raw.validate()?))
    }
}

/// A number sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

fn parse_id<T, E>(
    field: &'static str,
    raw: &str,
    parse: fn(&str) -> Result<T, E>,
) -> Result<T, ValidationError> {
    parse(raw).map_err(|_| ValidationError::InvalidId { field })
}

/// Path parameters of `/recipe/{recipeId}`.
#[derive(Debug, Deserialize)]
pub struct RecipePath {
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
}

impl Validate for RecipePath {
    type Output = RecipeId;

    fn validate(self) -> Result<RecipeId, ValidationError> {
        parse_id("recipeId", &self.recipe_id, RecipeId::parse_str)
    }
}

/// Path parameters of `/recipe/{recipeId}/ingredient/{ingredientId}`.
#[derive(Debug, Deserialize)]
pub struct IngredientPath {
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
    #[serde(rename = "ingredientId")]
    pub ingredient_id: String,
}

impl Validate for IngredientPath {
    type Output = (RecipeId, IngredientId);

    fn validate(self) -> Result<Self::Output, ValidationError> {
        let recipe_id = parse_id("recipeId", &self.recipe_id, RecipeId::parse_str)?;
        let ingredient_id = parse_id("ingredientId", &self.ingredient_id, IngredientId::parse_str)?;
        Ok((recipe_id, ingredient_id))
    }
}
