//! Value objects for the recipe domain.
//!
//! Each type can only be constructed through a checking constructor, so a
//! command built from them is valid by construction.

use crate::error::ValidationError;

/// Maximum recipe name length, in characters.
pub const RECIPE_NAME_MAX_LEN: usize = 80;

/// Maximum ingredient name length, in characters.
pub const INGREDIENT_NAME_MAX_LEN: usize = 50;

fn checked_name(
    field: &'static str,
    raw: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

fn checked_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

fn parse_positive(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber { field })?;
    checked_positive(field, value)
}

/// A recipe name: non-blank, at most [`RECIPE_NAME_MAX_LEN`] characters,
/// surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeName(String);

impl RecipeName {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        checked_name("recipe name", raw.as_ref(), RECIPE_NAME_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RecipeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ingredient name: non-blank, at most [`INGREDIENT_NAME_MAX_LEN`]
/// characters, surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientName(String);

impl IngredientName {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        checked_name("ingredient name", raw.as_ref(), INGREDIENT_NAME_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IngredientName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ingredient quantity in kilograms. Finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        checked_positive("quantity", value).map(Self)
    }

    /// Parses a numeric string, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        parse_positive("quantity", raw).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Price per kilogram. Finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PricePerKg(f64);

impl PricePerKg {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        checked_positive("price per kg", value).map(Self)
    }

    /// Parses a numeric string, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        parse_positive("price per kg", raw).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
