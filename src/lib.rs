pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod foods;
pub mod input;
pub mod meals;
pub mod profile;
pub mod recipes;
pub mod state;

#[cfg(test)]
mod test_support;

const DEFAULT_LOG_FILTER: &str = "neutrino=debug,tower_http=info,sqlx=warn";

/// Install the global subscriber. `RUST_LOG` overrides the default filter and
/// `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(true)))
        .with((!json).then(|| fmt::layer()))
        .init();
}
