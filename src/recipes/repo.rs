use sqlx::{types::Json, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::{parser::ParsedRecipe, repo_types::Recipe};

const RECIPE_COLUMNS: &str = "id, user_id, meal_name, ingredients, steps, calories, carbs_g, \
                              protein_g, raw_text, created_at";

pub async fn insert_recipe(
    db: &SqlitePool,
    user_id: Uuid,
    parsed: &ParsedRecipe,
    raw_text: &str,
) -> sqlx::Result<Recipe> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (id, user_id, meal_name, ingredients, steps, calories, carbs_g,
                             protein_g, raw_text, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&parsed.meal_name)
    .bind(Json(&parsed.ingredients))
    .bind(Json(&parsed.steps))
    .bind(parsed.nutrients.calories)
    .bind(parsed.nutrients.carbs_g)
    .bind(parsed.nutrients.protein_g)
    .bind(raw_text)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

pub async fn list_by_user(
    db: &SqlitePool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Recipe>> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
          FROM recipes
         WHERE user_id = ?
         ORDER BY created_at DESC
         LIMIT ? OFFSET ?
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<Recipe>> {
    sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}
