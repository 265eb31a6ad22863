mod common;

use std::time::Duration;

use common::{unreachable_api, TestServer};
use todo_client::{view::NOTIFICATION_TTL, RowMode, TaskListView};
use todo_server::suggestions::completion::{CompletionError, StaticCompletionProvider};
use tokio::time::timeout;

const FAST: Duration = Duration::from_millis(20);

async fn view_for(server: &TestServer) -> TaskListView {
    let mut view = TaskListView::with_debounce(server.api.clone(), FAST);
    view.load().await;
    view
}

async fn next_update(view: &mut TaskListView) {
    timeout(Duration::from_secs(5), view.next_suggestion_update())
        .await
        .expect("suggestion fetch never reported back");
}

// ── Tasks ──────────────────────────────────────────────────────

#[tokio::test]
async fn load_shows_tasks_newest_first() {
    let server = TestServer::start("view_load").await;
    server.store.create("Old".into(), "First".into()).unwrap();
    server.store.create("New".into(), "Second".into()).unwrap();

    let view = view_for(&server).await;

    let titles: Vec<_> = view.tasks().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["New", "Old"]);
    assert!(view.rows().iter().all(|row| row.mode() == RowMode::Viewing));
}

#[tokio::test]
async fn add_task_prepends_and_clears_the_draft() {
    let server = TestServer::start("view_add").await;
    server.store.create("Existing".into(), "Already there".into()).unwrap();
    let mut view = view_for(&server).await;

    view.set_draft_title("Book dentist");
    view.set_draft_description("Before June");
    assert!(view.can_add());
    assert!(view.add_task().await);

    assert_eq!(view.rows().len(), 2);
    assert_eq!(view.rows()[0].task().title, "Book dentist");
    assert!(view.draft().title.is_empty());
    assert!(view.draft().description.is_empty());
    assert_eq!(server.store.count().unwrap(), 2);
}

#[tokio::test]
async fn committed_edit_replaces_the_row_with_the_server_copy() {
    let server = TestServer::start("view_edit").await;
    let task = server.store.create("Draft".into(), "Notes".into()).unwrap();
    let mut view = view_for(&server).await;

    assert!(view.begin_edit_title(task.id));
    assert_eq!(view.row(task.id).unwrap().mode(), RowMode::EditingTitle);
    view.edit_text(task.id, "Final");
    view.commit_edit(task.id).await;

    let row = view.row(task.id).unwrap();
    assert_eq!(row.mode(), RowMode::Viewing);
    assert_eq!(row.task().title, "Final");
    assert_eq!(row.task().description, "Notes");
    assert_eq!(server.store.get(task.id).unwrap().unwrap().title, "Final");
}

#[tokio::test]
async fn failed_edit_reverts_to_the_confirmed_text() {
    let server = TestServer::start("view_edit_fail").await;
    let task = server.store.create("Keep".into(), "This".into()).unwrap();
    let mut view = view_for(&server).await;
    server.store.delete(task.id).unwrap();

    view.begin_edit_description(task.id);
    view.edit_text(task.id, "Lost");
    view.commit_edit(task.id).await;

    let row = view.row(task.id).unwrap();
    assert_eq!(row.mode(), RowMode::Viewing);
    assert_eq!(row.edited_description(), "This");
    assert_eq!(view.error(), Some("Error updating task, see console"));
}

#[tokio::test]
async fn toggle_flips_completion() {
    let server = TestServer::start("view_toggle").await;
    let task = server.store.create("Run".into(), "5k".into()).unwrap();
    let mut view = view_for(&server).await;

    view.toggle_completed(task.id).await;
    assert!(view.row(task.id).unwrap().task().completed);

    view.toggle_completed(task.id).await;
    assert!(!view.row(task.id).unwrap().task().completed);
    assert!(!server.store.get(task.id).unwrap().unwrap().completed);
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let server = TestServer::start("view_delete").await;
    let task = server.store.create("Bin".into(), "Me".into()).unwrap();
    let mut view = view_for(&server).await;

    assert!(view.request_delete(task.id));
    assert_eq!(view.pending_delete().map(|t| t.id), Some(task.id));
    view.cancel_delete();
    assert!(view.pending_delete().is_none());
    assert_eq!(view.rows().len(), 1);

    view.request_delete(task.id);
    view.confirm_delete().await;
    assert!(view.rows().is_empty());
    assert!(view.pending_delete().is_none());
    assert_eq!(server.store.count().unwrap(), 0);
}

#[tokio::test]
async fn failed_delete_keeps_the_confirmation_open() {
    let server = TestServer::start("view_delete_fail").await;
    let task = server.store.create("Gone".into(), "Already".into()).unwrap();
    let mut view = view_for(&server).await;
    server.store.delete(task.id).unwrap();

    view.request_delete(task.id);
    view.confirm_delete().await;

    assert_eq!(view.pending_delete().map(|t| t.id), Some(task.id));
    assert_eq!(view.error(), Some("Error deleting task, see console"));
}

// ── Suggestions ────────────────────────────────────────────────

#[tokio::test]
async fn typing_a_description_fetches_suggestions() {
    let server = TestServer::start("view_suggest").await;
    let mut view = view_for(&server).await;

    view.set_draft_title("Groceries");
    for text in ["W", "We", "Wee", "Weekly shop"] {
        view.set_draft_description(text);
    }
    next_update(&mut view).await;

    assert_eq!(view.suggestions().len(), 3);
    assert!(!view.suggestion_dialog_open());
    assert!(view.open_suggestions());

    assert!(view.select_suggestion(0));
    assert_eq!(view.draft().title, "Buy bread");
    assert_eq!(view.suggestions().len(), 2);
    assert!(!view.suggestion_dialog_open());
    assert!(view.rows().is_empty());
}

#[tokio::test]
async fn auto_mode_opens_the_dialog() {
    let server = TestServer::start("view_auto").await;
    let mut view = view_for(&server).await;
    view.set_auto_suggestions(true);

    view.set_draft_description("Weekly shop");
    next_update(&mut view).await;

    assert!(view.suggestion_dialog_open());
}

#[tokio::test]
async fn short_description_clears_without_asking_the_server() {
    let server = TestServer::with_provider(
        "view_short",
        StaticCompletionProvider::failing(CompletionError::MissingApiKey),
    )
    .await;
    let mut view = view_for(&server).await;

    view.set_draft_description("ab");
    next_update(&mut view).await;

    assert!(view.suggestions().is_empty());
    assert!(view.error().is_none());
}

#[tokio::test]
async fn failed_suggestion_fetch_notifies() {
    let server = TestServer::with_provider(
        "view_suggest_fail",
        StaticCompletionProvider::failing(CompletionError::MissingApiKey),
    )
    .await;
    let mut view = view_for(&server).await;

    view.set_draft_description("Weekly shop");
    next_update(&mut view).await;

    assert_eq!(view.error(), Some("Error getting AI suggestions, see console."));
    assert!(view.suggestions().is_empty());
}

// ── Notifications ──────────────────────────────────────────────

#[tokio::test]
async fn unreachable_server_notification_expires() {
    let mut view = TaskListView::new(unreachable_api());

    view.load().await;
    assert_eq!(view.error(), Some("Error fetching tasks, see console"));
    assert!(view.rows().is_empty());

    tokio::time::pause();
    tokio::time::advance(NOTIFICATION_TTL).await;
    assert!(view.error().is_none());
}
