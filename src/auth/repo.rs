use crate::auth::repo_types::{NewUser, User};
use crate::profile::metrics::BodyMetrics;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, password_hash, height_cm, weight_kg, bmi, \
                            bmi_category, recommended_kcal, created_at";

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a new user with hashed password and derived metrics.
    pub async fn create(db: &SqlitePool, new: NewUser<'_>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, height_cm, weight_kg, bmi,
                               bmi_category, recommended_kcal, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.username)
        .bind(new.password_hash)
        .bind(new.height_cm)
        .bind(new.weight_kg)
        .bind(new.bmi)
        .bind(new.bmi_category)
        .bind(new.recommended_kcal)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Store new height/weight together with the recomputed BMI and target.
    pub async fn update_metrics(
        db: &SqlitePool,
        id: Uuid,
        metrics: &BodyMetrics,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET height_cm = ?, weight_kg = ?, bmi = ?, bmi_category = ?, recommended_kcal = ?
             WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(metrics.height_cm)
        .bind(metrics.weight_kg)
        .bind(metrics.bmi)
        .bind(metrics.category.code())
        .bind(metrics.recommended_kcal)
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn new_user<'a>(username: &'a str, m: &'a BodyMetrics) -> NewUser<'a> {
        NewUser {
            username,
            password_hash: "hash",
            height_cm: m.height_cm,
            weight_kg: m.weight_kg,
            bmi: m.bmi,
            bmi_category: m.category.code(),
            recommended_kcal: m.recommended_kcal,
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let db = db::memory().await;
        let m = BodyMetrics::compute(180.0, 75.0).unwrap();
        let created = User::create(&db, new_user("alice", &m)).await.unwrap();

        let by_name = User::find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.bmi_category, "N");

        let by_id = User::find_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert!(User::find_by_username(&db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_unique_violation() {
        let db = db::memory().await;
        let m = BodyMetrics::compute(170.0, 60.0).unwrap();
        User::create(&db, new_user("alice", &m)).await.unwrap();
        let err = User::create(&db, new_user("alice", &m)).await.unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn update_metrics_recomputes_row() {
        let db = db::memory().await;
        let m = BodyMetrics::compute(170.0, 60.0).unwrap();
        let user = User::create(&db, new_user("carol", &m)).await.unwrap();

        let heavier = BodyMetrics::compute(170.0, 90.0).unwrap();
        let updated = User::update_metrics(&db, user.id, &heavier)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.weight_kg, 90.0);
        assert_eq!(updated.bmi_category, "O");
        assert_eq!(updated.recommended_kcal, 2200.0);

        let missing = User::update_metrics(&db, Uuid::new_v4(), &heavier).await.unwrap();
        assert!(missing.is_none());
    }
}
