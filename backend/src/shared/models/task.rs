use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::update_task_request::UpdateTaskRequest;

/// A to-do item. `id` and `created_at` are assigned once and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Applies whichever fields the request carries, leaving the rest untouched.
    pub fn edit(self, request: UpdateTaskRequest) -> Self {
        Self {
            id: self.id,
            title: request.title.unwrap_or(self.title),
            description: request.description.unwrap_or(self.description),
            completed: request.completed.unwrap_or(self.completed),
            created_at: self.created_at,
        }
    }
}
