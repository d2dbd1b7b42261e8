//! Request and response bodies of the REST API.

use serde::{Deserialize, Serialize};

use crate::Task;

/// Header carrying the bearer token on task routes.
pub const AUTH_HEADER: &str = "auth-token";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub auth_token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTaskResponse {
    pub saved_task: Task,
}

/// Failure body. Every field is optional so that any JSON object decodes.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: Some(message.into()),
        }
    }
}
