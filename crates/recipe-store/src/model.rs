//! Persisted records.

use crate::{IngredientId, RecipeId};

/// A recipe row, optionally carrying its ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Sum of `quantity * price_per_kg` over the recipe's ingredients.
    pub total: f64,
    /// `None` until the ingredients have been loaded.
    pub ingredients: Option<Vec<Ingredient>>,
}

impl Recipe {
    /// Creates a new recipe with a fresh id and a zero total.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecipeId::new(),
            name: name.into(),
            total: 0.0,
            ingredients: None,
        }
    }

    /// Attaches a loaded ingredient collection.
    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    /// Drops any loaded ingredient collection.
    pub fn without_ingredients(mut self) -> Self {
        self.ingredients = None;
        self
    }
}

/// An ingredient row. Always owned by exactly one recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub name: String,
    pub quantity: f64,
    pub price_per_kg: f64,
}

impl Ingredient {
    /// Creates a new ingredient with a fresh id.
    pub fn new(
        recipe_id: RecipeId,
        name: impl Into<String>,
        quantity: f64,
        price_per_kg: f64,
    ) -> Self {
        Self {
            id: IngredientId::new(),
            recipe_id,
            name: name.into(),
            quantity,
            price_per_kg,
        }
    }

    /// Contribution of this ingredient to its recipe's total.
    pub fn cost(&self) -> f64 {
        self.quantity * self.price_per_kg
    }
}
