use std::fmt::Write;

use sqlx::SqlitePool;
use time::Date;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use crate::meals::services::day_summary;
use crate::recipes::{
    client::RecipeClient, dto::SuggestRecipeRequest, parser::parse_recipe, repo,
    repo_types::Recipe,
};

pub const SYSTEM_PROMPT: &str = "You are a nutritionist who suggests one home-cooked meal. \
Answer in exactly this layout and nothing else:\n\
Meal Name: <name>\n\
Ingredients:\n- <quantity and ingredient>\n\
Steps:\n1. <step>\n\
Nutrients:\n\
Calories: <number> kcal\n\
Carbohydrates: <number> g\n\
Protein: <number> g";

const MAX_INGREDIENTS: usize = 20;

pub fn build_prompt(remaining_kcal: f64, req: &SuggestRecipeRequest) -> String {
    let mut prompt = format!(
        "Suggest a meal of at most {:.0} kcal, which is what I have left for today.",
        remaining_kcal.max(0.0)
    );
    let ingredients: Vec<&str> = req
        .ingredients
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_INGREDIENTS)
        .collect();
    if !ingredients.is_empty() {
        let _ = write!(prompt, " Use mainly these ingredients: {}.", ingredients.join(", "));
    }
    if let Some(notes) = req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let _ = write!(prompt, " Preferences: {}.", notes);
    }
    prompt
}

/// Ask the AI backend for a recipe fitting the user's remaining calories
/// on `today`, parse it and store it.
pub async fn suggest_recipe(
    db: &SqlitePool,
    client: &dyn RecipeClient,
    user_id: Uuid,
    req: &SuggestRecipeRequest,
    today: Date,
) -> AppResult<Recipe> {
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    let (consumed, _) = day_summary(db, user_id, today).await?;
    let remaining = user.recommended_kcal - consumed.calories;

    let prompt = build_prompt(remaining, req);
    let reply = client.complete(SYSTEM_PROMPT, &prompt).await.map_err(|e| {
        error!(error = %e, %user_id, "recipe provider failed");
        AppError::Upstream("Recipe provider request failed".into())
    })?;

    let parsed = parse_recipe(&reply).map_err(|e| {
        warn!(error = %e, %user_id, "unparseable recipe reply");
        AppError::Upstream(format!("Recipe provider returned an unusable reply: {}", e))
    })?;

    let recipe = repo::insert_recipe(db, user_id, &parsed, &reply).await?;
    info!(%user_id, recipe_id = %recipe.id, meal = %recipe.meal_name, "recipe suggested");
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::foods::repo::tests::{food, seed};
    use crate::meals::services::add_meal;
    use crate::recipes::client::fake::FakeRecipeClient;
    use crate::test_support::create_user;
    use time::macros::date;

    #[test]
    fn prompt_mentions_budget_and_ingredients() {
        let req = SuggestRecipeRequest {
            ingredients: vec!["  spinach ".into(), "".into(), "tofu".into()],
            notes: Some("vegan".into()),
        };
        let p = build_prompt(812.4, &req);
        assert!(p.contains("812 kcal"));
        assert!(p.contains("spinach, tofu."));
        assert!(p.contains("Preferences: vegan."));

        let over = build_prompt(-150.0, &SuggestRecipeRequest::default());
        assert!(over.contains("at most 0 kcal"));
        assert!(!over.contains("ingredients"));
    }

    #[tokio::test]
    async fn suggestion_uses_remaining_calories_and_is_saved() {
        let db = db::memory().await;
        let user = create_user(&db, "kate").await;
        seed(&db, &[food("K000001", "Khichdi", 250.0, 40.0, 9.0)]).await;
        let today = date!(2024 - 07 - 07);
        add_meal(&db, user.id, "Khichdi", 2.0, today).await.unwrap();

        let client = FakeRecipeClient::replying(
            "Meal Name: Veg Soup\nIngredients:\n- carrot\n- beans\nSteps:\n1. Boil\nCalories: 180",
        );
        let recipe = suggest_recipe(&db, &client, user.id, &SuggestRecipeRequest::default(), today)
            .await
            .unwrap();
        assert_eq!(recipe.meal_name, "Veg Soup");
        assert_eq!(recipe.calories, Some(180.0));

        // recommended 2500 (normal BMI) minus 500 consumed
        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("2000 kcal"));
        drop(prompts);

        assert_eq!(repo::list_by_user(&db, user.id, 10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_and_garbage_are_upstream_errors() {
        let db = db::memory().await;
        let user = create_user(&db, "liam").await;
        let today = date!(2024 - 07 - 07);

        let failing = FakeRecipeClient::failing("timeout");
        let err = suggest_recipe(&db, &failing, user.id, &SuggestRecipeRequest::default(), today)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        let garbage = FakeRecipeClient::replying("Sorry, I cannot help with that");
        let err = suggest_recipe(&db, &garbage, user.id, &SuggestRecipeRequest::default(), today)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(repo::list_by_user(&db, user.id, 10, 0).await.unwrap().is_empty());
    }
}
