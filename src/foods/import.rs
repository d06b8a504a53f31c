use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::foods::repo_types::Food;
use crate::input::NumberInput;

/// One record of the food nutrition dataset. Numeric fields are often
/// exported as strings.
#[derive(Debug, Deserialize)]
pub struct FoodRecord {
    pub food_code: String,
    pub food_name: String,
    #[serde(default)]
    pub energy_kcal: Option<NumberInput>,
    pub unit_serving_energy_kcal: NumberInput,
    pub unit_serving_carb_g: NumberInput,
    pub unit_serving_protein_g: NumberInput,
}

impl TryFrom<FoodRecord> for Food {
    type Error = anyhow::Error;

    fn try_from(r: FoodRecord) -> anyhow::Result<Self> {
        let code = r.food_code.trim().to_string();
        anyhow::ensure!(!code.is_empty(), "food_code is empty");
        let name = r.food_name.trim().to_string();
        anyhow::ensure!(!name.is_empty(), "food {} has an empty name", code);

        let ctx = |field: &str| format!("food {}: {}", code, field);
        Ok(Food {
            energy_kcal: match &r.energy_kcal {
                Some(v) => v.parse("energy_kcal").with_context(|| ctx("energy_kcal"))?,
                None => 0.0,
            },
            unit_serving_energy_kcal: r
                .unit_serving_energy_kcal
                .parse("unit_serving_energy_kcal")
                .with_context(|| ctx("unit_serving_energy_kcal"))?,
            unit_serving_carb_g: r
                .unit_serving_carb_g
                .parse("unit_serving_carb_g")
                .with_context(|| ctx("unit_serving_carb_g"))?,
            unit_serving_protein_g: r
                .unit_serving_protein_g
                .parse("unit_serving_protein_g")
                .with_context(|| ctx("unit_serving_protein_g"))?,
            food_code: code,
            food_name: name,
        })
    }
}

pub fn parse_records(json: &str) -> anyhow::Result<Vec<Food>> {
    let records: Vec<FoodRecord> = serde_json::from_str(json).context("parse food json")?;
    records.into_iter().map(Food::try_from).collect()
}

/// Upsert every food in one transaction; returns the number imported.
#[instrument(skip(db, foods), fields(count = foods.len()))]
pub async fn import_foods(db: &SqlitePool, foods: &[Food]) -> anyhow::Result<usize> {
    let mut tx = db.begin().await.context("begin tx")?;
    for food in foods {
        food.upsert_tx(&mut tx).await?;
    }
    tx.commit().await.context("commit tx")?;
    info!(count = foods.len(), "foods imported");
    Ok(foods.len())
}

pub async fn import_file(db: &SqlitePool, path: &Path) -> anyhow::Result<usize> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let foods = parse_records(&json)?;
    import_foods(db, &foods).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    const SAMPLE: &str = r#"[
        {"food_code": "ASC0001", "food_name": "Hot tea (Garam Chai)", "energy_kcal": "16.14",
         "unit_serving_energy_kcal": "59.4", "unit_serving_carb_g": 8.91, "unit_serving_protein_g": "1.55"},
        {"food_code": "ASC0002", "food_name": "Instant coffee",
         "unit_serving_energy_kcal": 45.0, "unit_serving_carb_g": "5.1", "unit_serving_protein_g": 1.0}
    ]"#;

    #[test]
    fn parses_mixed_number_formats() {
        let foods = parse_records(SAMPLE).unwrap();
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].unit_serving_energy_kcal, 59.4);
        assert_eq!(foods[0].energy_kcal, 16.14);
        assert_eq!(foods[1].energy_kcal, 0.0);
        assert_eq!(foods[1].unit_serving_carb_g, 5.1);
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let bad = r#"[{"food_code": "X1", "food_name": "Mystery",
            "unit_serving_energy_kcal": "lots", "unit_serving_carb_g": 1, "unit_serving_protein_g": 1}]"#;
        let err = parse_records(bad).unwrap_err();
        assert!(format!("{:#}", err).contains("unit_serving_energy_kcal"));
    }

    #[tokio::test]
    async fn import_is_idempotent() {
        let db = db::memory().await;
        let foods = parse_records(SAMPLE).unwrap();
        assert_eq!(import_foods(&db, &foods).await.unwrap(), 2);
        assert_eq!(import_foods(&db, &foods).await.unwrap(), 2);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM foods")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(Food::autocomplete(&db, "chai").await.unwrap().len(), 1);
    }
}
