use crate::config::AppConfig;
use crate::db;
use crate::recipes::client::{OpenAiRecipeClient, RecipeClient};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub recipes: Option<Arc<dyn RecipeClient>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        let recipes = match &config.recipe_ai {
            Some(ai) => {
                tracing::info!(model = %ai.model, base_url = %ai.base_url, "recipe suggestions enabled");
                Some(Arc::new(OpenAiRecipeClient::new(ai.clone())?) as Arc<dyn RecipeClient>)
            }
            None => {
                tracing::warn!("RECIPE_AI_API_KEY not set; recipe suggestions disabled");
                None
            }
        };

        Ok(Self {
            db,
            config,
            recipes,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        recipes: Option<Arc<dyn RecipeClient>>,
    ) -> Self {
        Self {
            db,
            config,
            recipes,
        }
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        let config = Arc::new(AppConfig {
            listen_addr: ([127, 0, 0, 1], 0).into(),
            database_url: "sqlite::memory:".into(),
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            recipe_ai: None,
        });

        Self::from_parts(db::memory().await, config, None)
    }

    #[cfg(test)]
    pub fn with_recipes(mut self, client: Arc<dyn RecipeClient>) -> Self {
        self.recipes = Some(client);
        self
    }
}
