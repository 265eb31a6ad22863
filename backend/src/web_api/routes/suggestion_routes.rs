use axum::{routing::post, Router};

use crate::{app_state::SharedState, suggestion_controller::SuggestionController};

pub const ROUTER_PATH: &str = "/suggestions";

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route(ROUTER_PATH, post(SuggestionController::suggest))
        .with_state(app_state)
}
