use sqlx::SqlitePool;

use crate::auth::repo_types::{NewUser, User};
use crate::profile::metrics::BodyMetrics;

/// Inserts a user with a normal BMI (180 cm / 75 kg, 2500 kcal target).
pub async fn create_user(db: &SqlitePool, username: &str) -> User {
    let m = BodyMetrics::compute(180.0, 75.0).unwrap();
    User::create(
        db,
        NewUser {
            username,
            password_hash: "not-a-real-hash",
            height_cm: m.height_cm,
            weight_kg: m.weight_kg,
            bmi: m.bmi,
            bmi_category: m.category.code(),
            recommended_kcal: m.recommended_kcal,
        },
    )
    .await
    .unwrap()
}
