//! Task-list screen state.
//!
//! Holds the local copy of the task list, the new-task draft, per-row edit
//! mode, the delete confirmation, the suggestion list/dialog and the error
//! notification. Every mutation goes through the API and the local copy is
//! replaced by the server's answer. Failures are logged and collapsed into a
//! single generic, self-expiring notification.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::error;
use uuid::Uuid;

use crate::api_client::{ApiClient, ClientError};
use crate::debounce::Debouncer;
use crate::models::{Draft, Suggestion, Task, TaskPatch};

pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(500);
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);
/// Shorter descriptions never reach the server.
pub const MIN_SUGGESTION_INPUT: usize = 3;

// ── Rows ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    EditingTitle,
    EditingDescription,
}

#[derive(Debug, Clone)]
pub struct TaskRow {
    task: Task,
    mode: RowMode,
    edited_title: String,
    edited_description: String,
}

impl TaskRow {
    fn new(task: Task) -> Self {
        Self {
            edited_title: task.title.clone(),
            edited_description: task.description.clone(),
            task,
            mode: RowMode::Viewing,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn mode(&self) -> RowMode {
        self.mode
    }

    pub fn edited_title(&self) -> &str {
        &self.edited_title
    }

    pub fn edited_description(&self) -> &str {
        &self.edited_description
    }

    fn replace(&mut self, task: Task) {
        *self = TaskRow::new(task);
    }
}

// ── Suggestions ────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct SuggestionQuery {
    title: String,
    description: String,
}

#[derive(Debug)]
enum SuggestionUpdate {
    Cleared,
    Loaded(Vec<Suggestion>),
    Failed(ClientError),
}

#[derive(Debug, Clone)]
struct Notification {
    message: String,
    shown_at: Instant,
}

// ── View ───────────────────────────────────────────────────────

pub struct TaskListView {
    api: ApiClient,
    rows: Vec<TaskRow>,
    draft: Draft,
    suggestions: Vec<Suggestion>,
    auto_suggestions: bool,
    suggestion_dialog_open: bool,
    pending_delete: Option<Uuid>,
    notification: Option<Notification>,
    suggestion_fetch: Debouncer<SuggestionQuery>,
    suggestion_updates: mpsc::UnboundedReceiver<SuggestionUpdate>,
}

impl TaskListView {
    pub fn new(api: ApiClient) -> Self {
        Self::with_debounce(api, SUGGESTION_DEBOUNCE)
    }

    pub fn with_debounce(api: ApiClient, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetch_api = api.clone();

        let suggestion_fetch = Debouncer::new(delay, move |query: SuggestionQuery| {
            let api = fetch_api.clone();
            let tx = tx.clone();
            async move {
                let update = if query.description.chars().count() < MIN_SUGGESTION_INPUT {
                    SuggestionUpdate::Cleared
                } else {
                    match api.suggest(&query.title, &query.description).await {
                        Ok(suggestions) => SuggestionUpdate::Loaded(suggestions),
                        Err(e) => SuggestionUpdate::Failed(e),
                    }
                };
                // The view may be gone; its result is then irrelevant.
                let _ = tx.send(update);
            }
        });

        Self {
            api,
            rows: Vec::new(),
            draft: Draft::default(),
            suggestions: Vec::new(),
            auto_suggestions: false,
            suggestion_dialog_open: false,
            pending_delete: None,
            notification: None,
            suggestion_fetch,
            suggestion_updates: rx,
        }
    }

    // ── Task list ──────────────────────────────────────────────

    /// Replaces the local list with the server's.
    pub async fn load(&mut self) {
        match self.api.list_tasks().await {
            Ok(tasks) => self.rows = tasks.into_iter().map(TaskRow::new).collect(),
            Err(e) => self.fail("Error fetching tasks, see console", e),
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.rows.iter().map(TaskRow::task)
    }

    pub fn row(&self, id: Uuid) -> Option<&TaskRow> {
        self.rows.iter().find(|row| row.task.id == id)
    }

    fn row_mut(&mut self, id: Uuid) -> Option<&mut TaskRow> {
        self.rows.iter_mut().find(|row| row.task.id == id)
    }

    // ── Draft ──────────────────────────────────────────────────

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    /// Every keystroke restarts the suggestion debounce.
    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.suggestion_fetch.call(SuggestionQuery {
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
        });
    }

    pub fn can_add(&self) -> bool {
        !self.draft.title.is_empty() && !self.draft.description.is_empty()
    }

    /// Creates the draft as a task. Returns whether a task was added.
    pub async fn add_task(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }

        match self.api.create_task(&self.draft).await {
            Ok(task) => {
                self.rows.insert(0, TaskRow::new(task));
                self.draft = Draft::default();
                true
            }
            Err(e) => {
                self.fail("Error adding task, see console", e);
                false
            }
        }
    }

    // ── Inline edits ───────────────────────────────────────────

    pub fn begin_edit_title(&mut self, id: Uuid) -> bool {
        self.begin_edit(id, RowMode::EditingTitle)
    }

    pub fn begin_edit_description(&mut self, id: Uuid) -> bool {
        self.begin_edit(id, RowMode::EditingDescription)
    }

    fn begin_edit(&mut self, id: Uuid, mode: RowMode) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.mode = mode;
                true
            }
            None => false,
        }
    }

    /// Typing into whichever field the row is editing. Ignored while viewing.
    pub fn edit_text(&mut self, id: Uuid, text: impl Into<String>) {
        if let Some(row) = self.row_mut(id) {
            match row.mode {
                RowMode::EditingTitle => row.edited_title = text.into(),
                RowMode::EditingDescription => row.edited_description = text.into(),
                RowMode::Viewing => {}
            }
        }
    }

    /// Blur or Enter. Sends the edited title and description and leaves edit mode.
    pub async fn commit_edit(&mut self, id: Uuid) {
        let Some(row) = self.row_mut(id) else {
            return;
        };
        if row.mode == RowMode::Viewing {
            return;
        }
        row.mode = RowMode::Viewing;

        let patch = TaskPatch {
            title: Some(row.edited_title.clone()),
            description: Some(row.edited_description.clone()),
            completed: None,
        };
        self.send_update(id, patch).await;
    }

    pub async fn toggle_completed(&mut self, id: Uuid) {
        let Some(row) = self.row(id) else {
            return;
        };
        let patch = TaskPatch {
            completed: Some(!row.task.completed),
            ..Default::default()
        };
        self.send_update(id, patch).await;
    }

    async fn send_update(&mut self, id: Uuid, patch: TaskPatch) {
        let result = self.api.update_task(id, &patch).await;
        match result {
            Ok(task) => {
                if let Some(row) = self.row_mut(id) {
                    row.replace(task);
                }
            }
            Err(e) => {
                // Drop the unconfirmed edit so the row shows the server's copy.
                if let Some(row) = self.row_mut(id) {
                    let task = row.task.clone();
                    row.replace(task);
                }
                self.fail("Error updating task, see console", e);
            }
        }
    }

    // ── Delete confirmation ────────────────────────────────────

    pub fn request_delete(&mut self, id: Uuid) -> bool {
        if self.row(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<&Task> {
        self.pending_delete
            .and_then(|id| self.row(id))
            .map(TaskRow::task)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// On failure the confirmation stays open.
    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete else {
            return;
        };

        match self.api.delete_task(id).await {
            Ok(_) => {
                self.rows.retain(|row| row.task.id != id);
                self.pending_delete = None;
            }
            Err(e) => self.fail("Error deleting task, see console", e),
        }
    }

    // ── Suggestions ────────────────────────────────────────────

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn auto_suggestions(&self) -> bool {
        self.auto_suggestions
    }

    pub fn set_auto_suggestions(&mut self, enabled: bool) {
        self.auto_suggestions = enabled;
    }

    pub fn suggestion_dialog_open(&self) -> bool {
        self.suggestion_dialog_open
    }

    /// The manual "AI Suggestions" button; only enabled with something to show.
    pub fn open_suggestions(&mut self) -> bool {
        if self.suggestions.is_empty() {
            return false;
        }
        self.suggestion_dialog_open = true;
        true
    }

    pub fn close_suggestions(&mut self) {
        self.suggestion_dialog_open = false;
    }

    /// Copies the suggestion into the draft and removes it from the list.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        if index >= self.suggestions.len() {
            return false;
        }
        let suggestion = self.suggestions.remove(index);
        self.draft = suggestion.into();
        self.suggestion_dialog_open = false;
        true
    }

    pub fn suggestion_fetch_pending(&self) -> bool {
        self.suggestion_fetch.is_pending()
    }

    /// Applies every fetch result that has already arrived. Returns how many.
    pub fn apply_suggestion_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.suggestion_updates.try_recv() {
            self.apply_suggestion_update(update);
            applied += 1;
        }
        applied
    }

    /// Waits for the next fetch result and applies it.
    pub async fn next_suggestion_update(&mut self) {
        if let Some(update) = self.suggestion_updates.recv().await {
            self.apply_suggestion_update(update);
        }
    }

    fn apply_suggestion_update(&mut self, update: SuggestionUpdate) {
        match update {
            SuggestionUpdate::Cleared => self.suggestions.clear(),
            SuggestionUpdate::Loaded(suggestions) => {
                self.suggestions = suggestions;
                if self.auto_suggestions {
                    self.suggestion_dialog_open = true;
                }
            }
            SuggestionUpdate::Failed(e) => {
                self.fail("Error getting AI suggestions, see console.", e)
            }
        }
    }

    // ── Notification ───────────────────────────────────────────

    /// The current error message, until it is dismissed or expires.
    pub fn error(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| n.shown_at.elapsed() < NOTIFICATION_TTL)
            .map(|n| n.message.as_str())
    }

    pub fn dismiss_error(&mut self) {
        self.notification = None;
    }

    fn fail(&mut self, message: &str, e: ClientError) {
        error!(error = %e, "{message}");
        self.notification = Some(Notification {
            message: message.to_string(),
            shown_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use reqwest::StatusCode;
    use tokio::time::advance;

    fn offline_view() -> TaskListView {
        // Nothing listens on the discard port; these tests never hit the network.
        TaskListView::new(ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")))
    }

    fn suggestion(title: &str) -> Suggestion {
        Suggestion {
            title: title.to_string(),
            description: format!("{title} details"),
        }
    }

    fn api_error() -> ClientError {
        ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn loaded_suggestions_open_the_dialog_only_in_auto_mode() {
        let mut view = offline_view();

        view.apply_suggestion_update(SuggestionUpdate::Loaded(vec![suggestion("a")]));
        assert_eq!(view.suggestions().len(), 1);
        assert!(!view.suggestion_dialog_open());

        view.set_auto_suggestions(true);
        view.apply_suggestion_update(SuggestionUpdate::Loaded(vec![suggestion("b")]));
        assert!(view.suggestion_dialog_open());
        assert_eq!(view.suggestions()[0].title, "b");

        view.apply_suggestion_update(SuggestionUpdate::Cleared);
        assert!(view.suggestions().is_empty());
    }

    #[tokio::test]
    async fn open_suggestions_needs_something_to_show() {
        let mut view = offline_view();
        assert!(!view.open_suggestions());
        assert!(!view.suggestion_dialog_open());

        view.apply_suggestion_update(SuggestionUpdate::Loaded(vec![suggestion("a")]));
        assert!(view.open_suggestions());
        view.close_suggestions();
        assert!(!view.suggestion_dialog_open());
    }

    #[tokio::test]
    async fn selecting_a_suggestion_fills_the_draft() {
        let mut view = offline_view();
        view.set_auto_suggestions(true);
        view.apply_suggestion_update(SuggestionUpdate::Loaded(vec![
            suggestion("first"),
            suggestion("second"),
        ]));

        assert!(view.select_suggestion(1));
        assert_eq!(view.draft().title, "second");
        assert_eq!(view.draft().description, "second details");
        assert!(!view.suggestion_dialog_open());
        assert_eq!(view.suggestions().len(), 1);
        assert_eq!(view.suggestions()[0].title, "first");

        assert!(!view.select_suggestion(5));
    }

    #[tokio::test]
    async fn add_task_needs_both_fields() {
        let mut view = offline_view();
        view.set_draft_title("Only a title");
        assert!(!view.can_add());
        assert!(!view.add_task().await);
        assert!(view.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_raises_a_notification_that_expires() {
        let mut view = offline_view();

        view.apply_suggestion_update(SuggestionUpdate::Failed(api_error()));
        assert_eq!(view.error(), Some("Error getting AI suggestions, see console."));

        advance(NOTIFICATION_TTL - Duration::from_millis(1)).await;
        assert!(view.error().is_some());
        advance(Duration::from_millis(1)).await;
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn dismissed_notification_is_gone() {
        let mut view = offline_view();
        view.fail("Error deleting task, see console", api_error());
        view.dismiss_error();
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn unknown_rows_cannot_be_edited_or_deleted() {
        let mut view = offline_view();
        let id = Uuid::new_v4();
        assert!(!view.begin_edit_title(id));
        assert!(!view.request_delete(id));
        assert!(view.pending_delete().is_none());
    }
}
