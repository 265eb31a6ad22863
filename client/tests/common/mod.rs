//! Spawns the real server router on an ephemeral port.

use std::{fs, sync::Arc};

use todo_client::{ApiClient, ClientConfig};
use todo_server::{
    app_state::AppState,
    data_access::task_store::TaskStore,
    map_routes,
    suggestions::{
        completion::{CompletionProvider, StaticCompletionProvider},
        suggestion_service::SuggestionService,
    },
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const SUGGESTIONS: &str = r#"{"tasks":[
    {"title":"Buy bread","description":"Sourdough from the bakery"},
    {"title":"Buy eggs","description":"A dozen, free range"},
    {"title":"Plan meals","description":"For the whole week"}
]}"#;

pub struct TestServer {
    pub api: ApiClient,
    pub store: TaskStore,
    path: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(name: &str) -> Self {
        Self::with_provider(name, StaticCompletionProvider::new(SUGGESTIONS)).await
    }

    pub async fn with_provider(name: &str, provider: impl CompletionProvider + 'static) -> Self {
        let path = std::env::temp_dir()
            .join(format!("todo_client_{name}_{}.redb", std::process::id()))
            .to_string_lossy()
            .into_owned();
        let _ = fs::remove_file(&path);

        let store = TaskStore::open(&path).unwrap();
        let state = Arc::new(AppState {
            task_store: store.clone(),
            suggestion_service: SuggestionService::new(Arc::new(provider), "test-model"),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = map_routes(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let api = ApiClient::new(&ClientConfig::new(format!("http://{addr}/api")));
        TestServer {
            api,
            store,
            path,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = fs::remove_file(&self.path);
    }
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_api() -> ApiClient {
    ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api"))
}
