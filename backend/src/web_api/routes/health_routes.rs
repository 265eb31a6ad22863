use axum::{routing::get, Router};

use crate::health_controller::HealthController;

pub const ROUTER_PATH: &str = "/health";

pub fn get_router() -> Router {
    Router::new().route(ROUTER_PATH, get(HealthController::get))
}
