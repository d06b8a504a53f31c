use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Food reference row; nutrient values are per single serving.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Food {
    pub food_code: String,
    pub food_name: String,
    pub energy_kcal: f64,
    pub unit_serving_energy_kcal: f64,
    pub unit_serving_carb_g: f64,
    pub unit_serving_protein_g: f64,
}
