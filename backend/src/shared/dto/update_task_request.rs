use serde::{Deserialize, Serialize};

/// Partial update. `id` and `createdAt` in the body are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}
