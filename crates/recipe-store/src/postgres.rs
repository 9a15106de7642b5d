use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Ingredient, IngredientId, Recipe, RecipeId, Result, StoreError, store::RecipeStore,
};

/// PostgreSQL-backed recipe store implementation.
#[derive(Clone)]
pub struct PostgresRecipeStore {
    pool: PgPool,
}

impl PostgresRecipeStore {
    /// Creates a new PostgreSQL recipe store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_recipe(row: PgRow) -> Result<Recipe> {
        Ok(Recipe {
            id: RecipeId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            total: row.try_get("total")?,
            ingredients: None,
        })
    }

    fn row_to_ingredient(row: PgRow) -> Result<Ingredient> {
        Ok(Ingredient {
            id: IngredientId::from_uuid(row.try_get::<Uuid, _>("id")?),
            recipe_id: RecipeId::from_uuid(row.try_get::<Uuid, _>("recipe_id")?),
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
            price_per_kg: row.try_get("price_per_kg")?,
        })
    }
}

/// Maps unique constraint violations to `UniqueViolation`, everything else to `Database`.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
        && let Some(constraint) = db_err.constraint()
    {
        return StoreError::UniqueViolation {
            constraint: constraint.to_string(),
        };
    }
    StoreError::Database(e)
}

#[async_trait]
impl RecipeStore for PostgresRecipeStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, total
            FROM recipes
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_recipe).collect()
    }

    async fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let row = sqlx::query("SELECT id, name, total FROM recipes WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_recipe).transpose()
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>> {
        let row = sqlx::query("SELECT id, name, total FROM recipes WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_recipe).transpose()
    }

    async fn list_ingredients(&self, recipe_id: RecipeId) -> Result<Vec<Ingredient>> {
        let rows = sqlx::query(
            r#"
            SELECT id, recipe_id, name, quantity, price_per_kg
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(recipe_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_ingredient).collect()
    }

    async fn find_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    ) -> Result<Option<Ingredient>> {
        let row = sqlx::query(
            r#"
            SELECT id, recipe_id, name, quantity, price_per_kg
            FROM ingredients
            WHERE recipe_id = $1 AND id = $2
            "#,
        )
        .bind(recipe_id.as_uuid())
        .bind(ingredient_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_ingredient).transpose()
    }

    async fn find_ingredient_by_name(
        &self,
        recipe_id: RecipeId,
        name: &str,
    ) -> Result<Option<Ingredient>> {
        let row = sqlx::query(
            r#"
            SELECT id, recipe_id, name, quantity, price_per_kg
            FROM ingredients
            WHERE recipe_id = $1 AND name = $2
            "#,
        )
        .bind(recipe_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_ingredient).transpose()
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        sqlx::query("INSERT INTO recipes (id, name, total) VALUES ($1, $2, $3)")
            .bind(recipe.id.as_uuid())
            .bind(&recipe.name)
            .bind(recipe.total)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Recipe> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("DELETE FROM recipes WHERE id = $1 RETURNING id, name, total")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

        // Dropping `tx` without commit rolls the ingredient delete back.
        let recipe = match row {
            Some(row) => Self::row_to_recipe(row)?,
            None => return Err(StoreError::RecipeNotFound(id)),
        };

        tx.commit().await?;
        tracing::debug!(recipe_id = %id, "recipe and ingredients deleted");
        Ok(recipe)
    }

    async fn insert_ingredient(&self, ingredient: &Ingredient, new_total: f64) -> Result<()> {
        let recipe_id = ingredient.recipe_id;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE recipes SET total = $2 WHERE id = $1")
            .bind(recipe_id.as_uuid())
            .bind(new_total)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::RecipeNotFound(recipe_id));
        }

        sqlx::query(
            r#"
            INSERT INTO ingredients (id, recipe_id, name, quantity, price_per_kg)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ingredient.id.as_uuid())
        .bind(recipe_id.as_uuid())
        .bind(&ingredient.name)
        .bind(ingredient.quantity)
        .bind(ingredient.price_per_kg)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
        new_total: f64,
    ) -> Result<Ingredient> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            DELETE FROM ingredients
            WHERE recipe_id = $1 AND id = $2
            RETURNING id, recipe_id, name, quantity, price_per_kg
            "#,
        )
        .bind(recipe_id.as_uuid())
        .bind(ingredient_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let ingredient = match row {
            Some(row) => Self::row_to_ingredient(row)?,
            None => {
                return Err(StoreError::IngredientNotFound {
                    recipe_id,
                    ingredient_id,
                });
            }
        };

        let updated = sqlx::query(
            r#"
            UPDATE recipes
            SET total = CASE
                WHEN EXISTS (SELECT 1 FROM ingredients WHERE recipe_id = $1) THEN $2
                ELSE 0::DOUBLE PRECISION
            END
            WHERE id = $1
            "#,
        )
        .bind(recipe_id.as_uuid())
        .bind(new_total)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::RecipeNotFound(recipe_id));
        }

        tx.commit().await?;
        Ok(ingredient)
    }
}
