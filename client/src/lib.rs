//! Headless client for the to-do API: request helper, debouncer and the
//! task-list view state that a UI binds to.

pub mod api_client;
pub mod config;
pub mod debounce;
pub mod models;
pub mod view;

pub use api_client::{ApiClient, ClientError};
pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use view::{RowMode, TaskListView, TaskRow};
