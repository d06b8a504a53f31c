use neutrino::{app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    neutrino::init_tracing();

    let state = AppState::init().await?;
    let addr = state.config.listen_addr;
    app::serve(app::build_app(state), addr).await
}
