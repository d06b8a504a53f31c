use anyhow::Context;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::foods::{keywords::search_keywords, repo_types::Food};

pub const SEARCH_LIMIT: i64 = 7;

const FOOD_COLUMNS: &str = "food_code, food_name, energy_kcal, unit_serving_energy_kcal, \
                            unit_serving_carb_g, unit_serving_protein_g";

fn escape_like(q: &str) -> String {
    let mut out = String::with_capacity(q.len());
    for ch in q.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl Food {
    /// Case-insensitive substring search on the food name. Matching runs
    /// against `search_name` so non-ASCII letters fold as well.
    pub async fn search_by_name(db: &SqlitePool, q: &str) -> sqlx::Result<Vec<Food>> {
        sqlx::query_as::<_, Food>(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
              FROM foods
             WHERE search_name LIKE ? ESCAPE '\'
             ORDER BY food_name
             LIMIT ?
            "#
        ))
        .bind(format!("%{}%", escape_like(&q.to_lowercase())))
        .bind(SEARCH_LIMIT)
        .fetch_all(db)
        .await
    }

    /// Foods whose keyword index contains `prefix`.
    pub async fn autocomplete(db: &SqlitePool, prefix: &str) -> sqlx::Result<Vec<Food>> {
        sqlx::query_as::<_, Food>(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
              FROM foods
             WHERE food_code IN (SELECT food_code FROM food_keywords WHERE keyword = ?)
             ORDER BY food_name
             LIMIT ?
            "#
        ))
        .bind(prefix.trim().to_lowercase())
        .bind(SEARCH_LIMIT)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_code(db: &SqlitePool, code: &str) -> sqlx::Result<Option<Food>> {
        sqlx::query_as::<_, Food>(&format!("SELECT {FOOD_COLUMNS} FROM foods WHERE food_code = ?"))
            .bind(code)
            .fetch_optional(db)
            .await
    }

    /// Exact-name lookup used when logging a meal.
    pub async fn find_by_name(db: &SqlitePool, name: &str) -> sqlx::Result<Option<Food>> {
        sqlx::query_as::<_, Food>(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE food_name = ? ORDER BY food_code LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(db)
        .await
    }

    /// Insert or replace the food and rebuild its keyword rows.
    pub async fn upsert_tx(&self, tx: &mut Transaction<'_, Sqlite>) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO foods (food_code, food_name, search_name, energy_kcal,
                               unit_serving_energy_kcal, unit_serving_carb_g,
                               unit_serving_protein_g)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (food_code) DO UPDATE SET
                food_name = excluded.food_name,
                search_name = excluded.search_name,
                energy_kcal = excluded.energy_kcal,
                unit_serving_energy_kcal = excluded.unit_serving_energy_kcal,
                unit_serving_carb_g = excluded.unit_serving_carb_g,
                unit_serving_protein_g = excluded.unit_serving_protein_g
            "#,
        )
        .bind(&self.food_code)
        .bind(&self.food_name)
        .bind(self.food_name.to_lowercase())
        .bind(self.energy_kcal)
        .bind(self.unit_serving_energy_kcal)
        .bind(self.unit_serving_carb_g)
        .bind(self.unit_serving_protein_g)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("upsert food {}", self.food_code))?;

        sqlx::query("DELETE FROM food_keywords WHERE food_code = ?")
            .bind(&self.food_code)
            .execute(&mut **tx)
            .await
            .context("clear food keywords")?;

        for keyword in search_keywords(&self.food_name) {
            sqlx::query("INSERT INTO food_keywords (food_code, keyword) VALUES (?, ?)")
                .bind(&self.food_code)
                .bind(keyword)
                .execute(&mut **tx)
                .await
                .context("insert food keyword")?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db;

    pub(crate) fn food(code: &str, name: &str, kcal: f64, carb: f64, protein: f64) -> Food {
        Food {
            food_code: code.into(),
            food_name: name.into(),
            energy_kcal: kcal * 2.0,
            unit_serving_energy_kcal: kcal,
            unit_serving_carb_g: carb,
            unit_serving_protein_g: protein,
        }
    }

    pub(crate) async fn seed(db: &SqlitePool, foods: &[Food]) {
        let mut tx = db.begin().await.unwrap();
        for f in foods {
            f.upsert_tx(&mut tx).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_limited() {
        let db = db::memory().await;
        let many: Vec<Food> = (0..10)
            .map(|i| food(&format!("R{:06}", i), &format!("Rice dish {}", i), 100.0, 20.0, 2.0))
            .collect();
        seed(&db, &many).await;
        seed(&db, &[food("B000001", "Boiled egg", 78.0, 0.6, 6.3)]).await;

        let hits = Food::search_by_name(&db, "RICE").await.unwrap();
        assert_eq!(hits.len(), SEARCH_LIMIT as usize);
        assert!(hits.iter().all(|f| f.food_name.starts_with("Rice")));

        let egg = Food::search_by_name(&db, "egg").await.unwrap();
        assert_eq!(egg.len(), 1);
        assert_eq!(egg[0].food_code, "B000001");
    }

    #[tokio::test]
    async fn search_folds_non_ascii_letters() {
        let db = db::memory().await;
        seed(&db, &[food("F000001", "Crème brûlée", 330.0, 30.0, 5.0)]).await;

        let hits = Food::search_by_name(&db, "CRÈME").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].food_name, "Crème brûlée");
        assert_eq!(Food::search_by_name(&db, "BRÛ").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn like_wildcards_are_literal() {
        let db = db::memory().await;
        seed(&db, &[food("A000001", "Apple", 52.0, 14.0, 0.3)]).await;
        assert!(Food::search_by_name(&db, "%").await.unwrap().is_empty());
        assert!(Food::search_by_name(&db, "_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn autocomplete_uses_keyword_prefixes() {
        let db = db::memory().await;
        seed(
            &db,
            &[
                food("C000001", "Chicken curry", 240.0, 8.0, 20.0),
                food("C000002", "Chickpea salad", 180.0, 22.0, 7.0),
                food("P000001", "Paneer tikka", 260.0, 6.0, 18.0),
            ],
        )
        .await;

        let chick = Food::autocomplete(&db, "Chick").await.unwrap();
        assert_eq!(chick.len(), 2);
        let cur = Food::autocomplete(&db, "cur").await.unwrap();
        assert_eq!(cur.len(), 1);
        assert_eq!(cur[0].food_code, "C000001");
        assert!(Food::autocomplete(&db, "icken").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_name_and_keywords() {
        let db = db::memory().await;
        seed(&db, &[food("D000001", "Dal", 120.0, 18.0, 7.0)]).await;
        seed(&db, &[food("D000001", "Lentil soup", 130.0, 19.0, 8.0)]).await;

        let found = Food::find_by_code(&db, "D000001").await.unwrap().unwrap();
        assert_eq!(found.food_name, "Lentil soup");
        assert!(Food::autocomplete(&db, "dal").await.unwrap().is_empty());
        assert_eq!(Food::autocomplete(&db, "len").await.unwrap().len(), 1);
        assert!(Food::find_by_name(&db, "Lentil soup").await.unwrap().is_some());
        assert!(Food::find_by_name(&db, "lentil").await.unwrap().is_none());
    }
}
