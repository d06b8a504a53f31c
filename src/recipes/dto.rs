use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::{parser::RecipeNutrients, repo_types::Recipe};

#[derive(Debug, Default, Deserialize)]
pub struct SuggestRecipeRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub meal_name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutrients: RecipeNutrients,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            meal_name: r.meal_name,
            ingredients: r.ingredients.0,
            steps: r.steps.0,
            nutrients: RecipeNutrients {
                calories: r.calories,
                carbs_g: r.carbs_g,
                protein_g: r.protein_g,
            },
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}
