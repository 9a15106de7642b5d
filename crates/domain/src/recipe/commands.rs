//! Recipe commands.

use common::{IngredientId, RecipeId};

use super::{IngredientName, PricePerKg, Quantity, RecipeName};

/// Command to create a new, empty recipe.
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    /// Name of the recipe; must be unique.
    pub name: RecipeName,
}

impl CreateRecipe {
    /// Creates a new CreateRecipe command.
    pub fn new(name: RecipeName) -> Self {
        Self { name }
    }
}

/// Command to add an ingredient to a recipe.
#[derive(Debug, Clone)]
pub struct AddIngredient {
    /// The recipe to add the ingredient to.
    pub recipe_id: RecipeId,

    /// Name of the ingredient; must be unique within the recipe.
    pub name: IngredientName,

    pub quantity: Quantity,

    pub price_per_kg: PricePerKg,
}

impl AddIngredient {
    /// Creates a new AddIngredient command.
    pub fn new(
        recipe_id: RecipeId,
        name: IngredientName,
        quantity: Quantity,
        price_per_kg: PricePerKg,
    ) -> Self {
        Self {
            recipe_id,
            name,
            quantity,
            price_per_kg,
        }
    }

    /// Amount this ingredient adds to the recipe total, or `None` if the
    /// product does not fit in an `f64`.
    pub fn cost(&self) -> Option<f64> {
        let cost = self.quantity.value() * self.price_per_kg.value();
        cost.is_finite().then_some(cost)
    }
}

/// Command to remove an ingredient from a recipe.
#[derive(Debug, Clone)]
pub struct RemoveIngredient {
    /// The recipe owning the ingredient.
    pub recipe_id: RecipeId,

    /// The ingredient to remove.
    pub ingredient_id: IngredientId,
}

impl RemoveIngredient {
    /// Creates a new RemoveIngredient command.
    pub fn new(recipe_id: RecipeId, ingredient_id: IngredientId) -> Self {
        Self {
            recipe_id,
            ingredient_id,
        }
    }
}
