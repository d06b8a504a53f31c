use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: String, // U / N / O
    pub recommended_kcal: f64,
    pub created_at: OffsetDateTime,
}

/// Values needed to insert a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: &'a str,
    pub recommended_kcal: f64,
}
