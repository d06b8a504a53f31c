use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::input::NumberInput;
use crate::meals::services::NutritionTotals;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct AddMealRequest {
    pub food_name: String,
    pub servings: NumberInput,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: Uuid,
    pub food_code: String,
    pub food_name: String,
    pub servings: f64,
    pub total_kcal: f64,
    #[serde(with = "iso_date")]
    pub eaten_on: Date,
}

#[derive(Debug, Deserialize)]
pub struct ModifyItem {
    pub id: Uuid,
    #[serde(default)]
    pub servings: Option<NumberInput>,
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModifyMealsRequest {
    pub items: Vec<ModifyItem>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ModifyMealsResponse {
    pub updated: u64,
    pub deleted: u64,
    pub missing: Vec<Uuid>,
}

/// One logged food with nutrients scaled by servings.
#[derive(Debug, Serialize, PartialEq)]
pub struct LoggedFood {
    pub id: Uuid,
    pub food_code: String,
    pub food_name: String,
    pub servings: f64,
    pub calories: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    #[serde(with = "iso_date")]
    pub eaten_on: Date,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub username: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub bmi: f64,
    pub weight_kg: f64,
    pub recommended_kcal: f64,
    pub remaining_kcal: f64,
    pub consumed: NutritionTotals,
    pub entries: Vec<LoggedFood>,
}

#[derive(Debug, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub date: DateParts,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub totals: NutritionTotals,
    pub entries: Vec<LoggedFood>,
}
