use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealFields};

/// Persistence for meals. Single-row operations do not filter by owner;
/// ownership is checked by the caller.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Stores a new meal under a fresh id and returns that id.
    async fn create(&self, user_id: Uuid, fields: MealFields) -> anyhow::Result<Uuid>;
    /// All meals of a user in insertion order.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    /// All meals of a user, most recent `date` first; equal dates stay in insertion order.
    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn count_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> anyhow::Result<i64>;
    async fn get_by_id(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn update(&self, meal_id: Uuid, fields: MealFields) -> anyhow::Result<()>;
    async fn delete(&self, meal_id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn create(&self, user_id: Uuid, fields: MealFields) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, is_on_diet, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.is_on_diet)
        .bind(fields.date)
        .execute(&self.db)
        .await
        .context("insert meal")?;
        Ok(id)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, is_on_diet, date
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by user")?;
        Ok(rows)
    }

    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, is_on_diet, date
            FROM meals
            WHERE user_id = $1
            ORDER BY date DESC, created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by date")?;
        Ok(rows)
    }

    async fn count_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> anyhow::Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(id) FROM meals WHERE user_id = $1 AND is_on_diet = $2",
        )
        .bind(user_id)
        .bind(is_on_diet)
        .fetch_one(&self.db)
        .await
        .context("count meals by diet flag")?;
        Ok(total)
    }

    async fn get_by_id(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, is_on_diet, date
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(meal_id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(meal)
    }

    async fn update(&self, meal_id: Uuid, fields: MealFields) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE meals
               SET name = $2, description = $3, is_on_diet = $4, date = $5
             WHERE id = $1
            "#,
        )
        .bind(meal_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.is_on_diet)
        .bind(fields.date)
        .execute(&self.db)
        .await
        .context("update meal")?;
        Ok(())
    }

    async fn delete(&self, meal_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(meal_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(())
    }
}
