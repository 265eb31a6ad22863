use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::error;

use crate::{
    app_state::SharedState, error::ApiError, suggestion::Suggestion,
    suggestion_request::SuggestionRequest,
};

pub struct SuggestionController {}

impl SuggestionController {
    // POST /api/suggestions
    pub async fn suggest(
        State(state): State<SharedState>,
        payload: Result<Json<SuggestionRequest>, JsonRejection>,
    ) -> Result<Json<Vec<Suggestion>>, ApiError> {
        let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

        state
            .suggestion_service
            .suggest(&body.title, &body.description)
            .await
            .map(Json)
            .map_err(|e| {
                error!(error = %e, "suggestion request failed");
                ApiError::internal("Failed to get suggestions")
            })
    }
}
