use serde::Deserialize;

/// Both fields are optional on the wire so a missing one reaches the store's
/// validation instead of failing JSON extraction.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
