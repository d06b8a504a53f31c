use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// OpenAI-compatible chat endpoint used for recipe suggestions.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub recipe_ai: Option<RecipeAiConfig>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_minutes(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env_or("APP_HOST", "0.0.0.0");
        let port = env_or("APP_PORT", "8080");
        let listen_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid APP_HOST/APP_PORT {}:{}", host, port))?;

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: env_or("JWT_ISSUER", "neutrino"),
            audience: env_or("JWT_AUDIENCE", "neutrino-users"),
            ttl_minutes: env_minutes("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_minutes("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        // Recipe suggestions stay off without a key.
        let recipe_ai = std::env::var("RECIPE_AI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| RecipeAiConfig {
                base_url: env_or("RECIPE_AI_BASE_URL", "https://api.openai.com/v1"),
                api_key,
                model: env_or("RECIPE_AI_MODEL", "gpt-4o-mini"),
            });

        Ok(Self {
            listen_addr,
            database_url: env_or("DATABASE_URL", "sqlite://neutrino.db?mode=rwc"),
            jwt,
            recipe_ai,
        })
    }
}
