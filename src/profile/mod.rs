pub mod dto;
pub mod handlers;
pub mod metrics;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::me_routes()
}
