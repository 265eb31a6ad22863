pub mod health_routes;
pub mod suggestion_routes;
pub mod task_routes;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app_state::SharedState;

pub const API_PATH: &str = "/api";

pub fn map_routes(app_state: SharedState) -> Router {
    let api = Router::new()
        .merge(task_routes::get_router(app_state.clone()))
        .merge(suggestion_routes::get_router(app_state))
        .merge(health_routes::get_router());

    Router::new()
        .nest(API_PATH, api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
