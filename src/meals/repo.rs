use anyhow::Context;
use sqlx::{Sqlite, SqlitePool, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::foods::repo_types::Food;
use crate::meals::repo_types::{MealEntry, MealEntryRow};

const ROW_SELECT: &str = r#"
    SELECT e.id, e.food_code, f.food_name, e.servings, e.eaten_on,
           f.unit_serving_energy_kcal, f.unit_serving_carb_g, f.unit_serving_protein_g
      FROM meal_entries e
      JOIN foods f ON f.food_code = e.food_code
"#;

/// Insert a new log entry within a transaction.
pub async fn insert_entry_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    food: &Food,
    servings: f64,
    eaten_on: Date,
) -> anyhow::Result<MealEntry> {
    let entry = sqlx::query_as::<_, MealEntry>(
        r#"
        INSERT INTO meal_entries (id, user_id, food_code, servings, total_kcal, eaten_on, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, food_code, servings, total_kcal, eaten_on, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&food.food_code)
    .bind(servings)
    .bind(food.unit_serving_energy_kcal * servings)
    .bind(eaten_on)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(&mut **tx)
    .await
    .context("insert meal entry")?;
    Ok(entry)
}

/// All entries of a user on one day, oldest first.
pub async fn list_for_day(
    db: &SqlitePool,
    user_id: Uuid,
    day: Date,
) -> sqlx::Result<Vec<MealEntryRow>> {
    sqlx::query_as::<_, MealEntryRow>(&format!(
        "{ROW_SELECT} WHERE e.user_id = ? AND e.eaten_on = ? ORDER BY e.created_at ASC"
    ))
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await
}

pub async fn find_row(
    db: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<MealEntryRow>> {
    sqlx::query_as::<_, MealEntryRow>(&format!("{ROW_SELECT} WHERE e.user_id = ? AND e.id = ?"))
        .bind(user_id)
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_entry_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM meal_entries WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .context("delete meal entry")?;
    Ok(res.rows_affected())
}

/// Change servings of an entry logged on `day`, recomputing its kcal.
pub async fn update_servings_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    id: Uuid,
    servings: f64,
    day: Date,
) -> anyhow::Result<u64> {
    let res = sqlx::query(
        r#"
        UPDATE meal_entries
           SET servings = ?,
               total_kcal = ? * (SELECT f.unit_serving_energy_kcal
                                   FROM foods f
                                  WHERE f.food_code = meal_entries.food_code)
         WHERE id = ? AND user_id = ? AND eaten_on = ?
        "#,
    )
    .bind(servings)
    .bind(servings)
    .bind(id)
    .bind(user_id)
    .bind(day)
    .execute(&mut **tx)
    .await
    .context("update meal servings")?;
    Ok(res.rows_affected())
}
