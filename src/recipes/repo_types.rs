use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_name: String,
    pub ingredients: Json<Vec<String>>,
    pub steps: Json<Vec<String>>,
    pub calories: Option<f64>,
    pub carbs_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub raw_text: String,
    pub created_at: OffsetDateTime,
}
