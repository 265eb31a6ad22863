use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::suggestion::Suggestion;
use crate::suggestions::completion::{CompletionError, CompletionProvider, CompletionRequest};

pub const SUGGESTION_COUNT: usize = 3;

const SYSTEM_PROMPT: &str = "You are a helpful concise assistant that suggests related tasks based on user input. \
Respond with a \"tasks\" JSON object containing three items with title and description properties.";

/// Turns a title/description pair into up to three related-task suggestions.
pub struct SuggestionService {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl SuggestionService {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Provider failures are errors; output of the wrong shape is an empty list.
    pub async fn suggest(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Vec<Suggestion>, CompletionError> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("Suggest related tasks for: {title}, {description}"),
            model: self.model.clone(),
            json_output: true,
        };

        let content = self.provider.complete(request).await?;
        let suggestions = parse_suggestions(&content);
        debug!(count = suggestions.len(), "parsed suggestions");
        Ok(suggestions)
    }
}

/// Reads `{"tasks": [{title, description}, ...]}`. Malformed items are skipped.
pub fn parse_suggestions(content: &str) -> Vec<Suggestion> {
    let value = match parse_json_object(content) {
        Some(value) => value,
        None => {
            warn!("provider output is not JSON");
            return Vec::new();
        }
    };

    let Some(items) = value.get("tasks").and_then(Value::as_array) else {
        warn!("provider output has no tasks array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<Suggestion>(item.clone()).ok())
        .take(SUGGESTION_COUNT)
        .collect()
}

/// Tolerates prose around the object, which some models add despite JSON mode.
fn parse_json_object(content: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Some(value);
    }
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}
