use serde::Serialize;
use sqlx::SqlitePool;
use time::{Date, Month};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::foods::repo_types::Food;
use crate::input::round2;
use crate::meals::dto::{DateParts, LoggedFood, ModifyItem, ModifyMealsResponse};
use crate::meals::repo;
use crate::meals::repo_types::{MealEntry, MealEntryRow};

#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
}

impl NutritionTotals {
    pub fn rounded(self) -> Self {
        Self {
            calories: round2(self.calories),
            carbs_g: round2(self.carbs_g),
            protein_g: round2(self.protein_g),
        }
    }
}

impl MealEntryRow {
    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.unit_serving_energy_kcal * self.servings,
            carbs_g: self.unit_serving_carb_g * self.servings,
            protein_g: self.unit_serving_protein_g * self.servings,
        }
    }
}

/// Sum of per-serving values times servings over all rows, unrounded.
pub fn totals(rows: &[MealEntryRow]) -> NutritionTotals {
    rows.iter().fold(NutritionTotals::default(), |acc, r| {
        let n = r.nutrition();
        NutritionTotals {
            calories: acc.calories + n.calories,
            carbs_g: acc.carbs_g + n.carbs_g,
            protein_g: acc.protein_g + n.protein_g,
        }
    })
}

pub fn logged_food(row: MealEntryRow) -> LoggedFood {
    let n = row.nutrition().rounded();
    LoggedFood {
        id: row.id,
        food_code: row.food_code,
        food_name: row.food_name,
        servings: row.servings,
        calories: n.calories,
        carbs_g: n.carbs_g,
        protein_g: n.protein_g,
        eaten_on: row.eaten_on,
    }
}

/// Entries and rounded totals for one day.
pub async fn day_summary(
    db: &SqlitePool,
    user_id: Uuid,
    day: Date,
) -> AppResult<(NutritionTotals, Vec<LoggedFood>)> {
    let rows = repo::list_for_day(db, user_id, day).await?;
    let sum = totals(&rows).rounded();
    Ok((sum, rows.into_iter().map(logged_food).collect()))
}

pub fn date_from_parts(parts: &DateParts) -> AppResult<Date> {
    let month = Month::try_from(parts.month)
        .map_err(|_| AppError::BadRequest("Invalid date format".into()))?;
    Date::from_calendar_date(parts.year, month, parts.day)
        .map_err(|_| AppError::BadRequest("Invalid date format".into()))
}

/// Log `servings` of the food named `food_name` on `day`.
pub async fn add_meal(
    db: &SqlitePool,
    user_id: Uuid,
    food_name: &str,
    servings: f64,
    day: Date,
) -> AppResult<(Food, MealEntry)> {
    let food = Food::find_by_name(db, food_name.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("This food is not registered in the database".into()))?;

    let mut tx = db.begin().await?;
    let entry = repo::insert_entry_tx(&mut tx, user_id, &food, servings, day).await?;
    tx.commit().await?;

    info!(%user_id, food_code = %food.food_code, servings, kcal = entry.total_kcal, "meal added");
    Ok((food, entry))
}

enum Change {
    Delete(Uuid),
    Servings(Uuid, f64),
}

fn validate(items: &[ModifyItem]) -> AppResult<Vec<Change>> {
    items
        .iter()
        .map(|item| {
            if item.delete {
                return Ok(Change::Delete(item.id));
            }
            let servings = item
                .servings
                .as_ref()
                .ok_or_else(|| AppError::BadRequest(format!("servings missing for {}", item.id)))?
                .parse_positive("servings")?;
            Ok(Change::Servings(item.id, servings))
        })
        .collect()
}

/// Apply a batch of deletions and serving changes atomically. Serving
/// changes only touch entries logged on `today`.
pub async fn modify_meals(
    db: &SqlitePool,
    user_id: Uuid,
    items: &[ModifyItem],
    today: Date,
) -> AppResult<ModifyMealsResponse> {
    let changes = validate(items)?;
    let mut out = ModifyMealsResponse::default();

    let mut tx = db.begin().await?;
    for change in changes {
        match change {
            Change::Delete(id) => match repo::delete_entry_tx(&mut tx, user_id, id).await? {
                0 => out.missing.push(id),
                n => out.deleted += n,
            },
            Change::Servings(id, servings) => {
                match repo::update_servings_tx(&mut tx, user_id, id, servings, today).await? {
                    0 => out.missing.push(id),
                    n => out.updated += n,
                }
            }
        }
    }
    tx.commit().await?;

    if !out.missing.is_empty() {
        warn!(%user_id, missing = out.missing.len(), "modify referenced unknown entries");
    }
    info!(%user_id, updated = out.updated, deleted = out.deleted, "meals modified");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::foods::repo::tests::{food, seed};
    use crate::input::NumberInput;
    use crate::test_support::create_user;
    use time::macros::date;

    fn row(kcal: f64, carb: f64, protein: f64, servings: f64) -> MealEntryRow {
        MealEntryRow {
            id: Uuid::new_v4(),
            food_code: "X".into(),
            food_name: "X".into(),
            servings,
            eaten_on: date!(2024 - 01 - 01),
            unit_serving_energy_kcal: kcal,
            unit_serving_carb_g: carb,
            unit_serving_protein_g: protein,
        }
    }

    #[test]
    fn totals_multiply_by_servings() {
        let rows = vec![row(100.0, 10.0, 5.0, 2.0), row(50.5, 3.3, 1.1, 1.5)];
        let t = totals(&rows).rounded();
        assert_eq!(t.calories, 275.75);
        assert_eq!(t.carbs_g, 24.95);
        assert_eq!(t.protein_g, 11.65);
        assert_eq!(totals(&[]), NutritionTotals::default());
    }

    #[test]
    fn date_parts_are_validated() {
        let ok = date_from_parts(&DateParts { year: 2024, month: 2, day: 29 }).unwrap();
        assert_eq!(ok, date!(2024 - 02 - 29));
        assert!(date_from_parts(&DateParts { year: 2023, month: 2, day: 29 }).is_err());
        assert!(date_from_parts(&DateParts { year: 2024, month: 13, day: 1 }).is_err());
    }

    #[tokio::test]
    async fn add_meal_requires_known_food() {
        let db = db::memory().await;
        let user = create_user(&db, "frank").await;
        seed(&db, &[food("I000001", "Idli", 58.0, 12.0, 2.0)]).await;

        let (f, entry) = add_meal(&db, user.id, " Idli ", 3.0, date!(2024 - 05 - 05)).await.unwrap();
        assert_eq!(f.food_code, "I000001");
        assert_eq!(entry.total_kcal, 174.0);

        let err = add_meal(&db, user.id, "Pizza", 1.0, date!(2024 - 05 - 05)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn modify_applies_batch_and_reports_missing() {
        let db = db::memory().await;
        let user = create_user(&db, "gina").await;
        seed(&db, &[food("U000001", "Upma", 150.0, 25.0, 4.0)]).await;
        let today = date!(2024 - 06 - 10);

        let (_, a) = add_meal(&db, user.id, "Upma", 1.0, today).await.unwrap();
        let (_, b) = add_meal(&db, user.id, "Upma", 1.0, today).await.unwrap();
        let (_, old) = add_meal(&db, user.id, "Upma", 1.0, date!(2024 - 06 - 01)).await.unwrap();
        let ghost = Uuid::new_v4();

        let items = vec![
            ModifyItem { id: a.id, servings: Some(NumberInput::Text("2".into())), delete: false },
            ModifyItem { id: b.id, servings: None, delete: true },
            ModifyItem { id: old.id, servings: Some(NumberInput::Number(4.0)), delete: false },
            ModifyItem { id: ghost, servings: None, delete: true },
        ];
        let res = modify_meals(&db, user.id, &items, today).await.unwrap();
        assert_eq!(res.updated, 1);
        assert_eq!(res.deleted, 1);
        assert_eq!(res.missing, vec![old.id, ghost]);

        let (sum, entries) = day_summary(&db, user.id, today).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(sum.calories, 300.0);
    }

    #[tokio::test]
    async fn modify_rejects_whole_batch_on_bad_servings() {
        let db = db::memory().await;
        let user = create_user(&db, "hank").await;
        seed(&db, &[food("V000001", "Vada", 97.0, 9.0, 3.0)]).await;
        let today = date!(2024 - 06 - 10);
        let (_, a) = add_meal(&db, user.id, "Vada", 1.0, today).await.unwrap();

        let items = vec![
            ModifyItem { id: a.id, servings: None, delete: true },
            ModifyItem { id: a.id, servings: Some(NumberInput::Text("two".into())), delete: false },
        ];
        let err = modify_meals(&db, user.id, &items, today).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(day_summary(&db, user.id, today).await.unwrap().1.len(), 1);
    }
}
