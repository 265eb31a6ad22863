use std::sync::Arc;

use crate::data_access::task_store::TaskStore;
use crate::suggestions::suggestion_service::SuggestionService;

pub struct AppState {
    pub task_store: TaskStore,
    pub suggestion_service: SuggestionService,
}

pub type SharedState = Arc<AppState>;
