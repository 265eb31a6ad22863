use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}
