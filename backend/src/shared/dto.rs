// Requests
pub mod create_task_request;
pub mod update_task_request;
pub mod suggestion_request;

// Responses
pub mod delete_task_response;
pub mod error_response;
pub mod health_response;
