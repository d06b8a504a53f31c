use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Row of `meal_entries`.
#[derive(Debug, Clone, FromRow)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_code: String,
    pub servings: f64,
    pub total_kcal: f64,
    pub eaten_on: Date,
    pub created_at: OffsetDateTime,
}

/// Meal entry joined with its food's per-serving values.
#[derive(Debug, Clone, FromRow)]
pub struct MealEntryRow {
    pub id: Uuid,
    pub food_code: String,
    pub food_name: String,
    pub servings: f64,
    pub eaten_on: Date,
    pub unit_serving_energy_kcal: f64,
    pub unit_serving_carb_g: f64,
    pub unit_serving_protein_g: f64,
}
