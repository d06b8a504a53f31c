use std::{net::SocketAddr, time::Duration};

use axum::{
    http::{header, HeaderValue, Request, Response},
    routing::get,
    Router,
};
use tracing::Span;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, foods, meals, profile, recipes};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(profile::router())
                .merge(foods::router())
                .merge(meals::router())
                .merge(recipes::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "api",
                        method = %req.method(),
                        path = %req.uri().path(),
                        status = tracing::field::Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status();
                    span.record("status", status.as_u16());
                    let elapsed_ms = latency.as_millis() as u64;
                    match status.as_u16() {
                        500.. => tracing::error!(elapsed_ms, "request failed"),
                        400..=499 => tracing::warn!(elapsed_ms, "request rejected"),
                        _ => tracing::debug!(elapsed_ms, "request served"),
                    }
                }),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "neutrino api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("ctrl-c received, draining connections"),
                Err(e) => {
                    tracing::error!(error = %e, "cannot listen for ctrl-c; running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;
    Ok(())
}
