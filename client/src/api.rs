//! Thin wrapper over the task REST API.
//!
//! Every call returns the decoded success body or a [`ClientError`] built
//! from the `{error}` body of the response, falling back to an
//! operation-specific message when the server sends none.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tasko_shared::wire::{
    AuthResponse, CreateUserRequest, ErrorBody, LoginRequest, SavedTaskResponse, TaskListResponse,
    AUTH_HEADER,
};
use tasko_shared::{Task, TaskDraft};
use url::Url;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

/// How a non-OK response is classified.
#[derive(Clone, Copy)]
enum Failure {
    Auth,
    Task,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("api/auth/login")?)
            .json(&body)
            .send()
            .await?;

        let auth: AuthResponse = decode(response, Failure::Auth, "Login failed").await?;
        Ok(auth.auth_token)
    }

    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let body = CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("api/auth/createuser")?)
            .json(&body)
            .send()
            .await?;

        let auth: AuthResponse = decode(response, Failure::Auth, "Signup failed").await?;
        Ok(auth.auth_token)
    }

    pub async fn fetch_tasks(&self, token: &str) -> Result<Vec<Task>> {
        let response = self
            .http
            .get(self.endpoint("api/tasks/fetchalltask")?)
            .header(AUTH_HEADER, token)
            .send()
            .await?;

        let list: TaskListResponse = decode(response, Failure::Task, "Failed to fetch tasks").await?;
        Ok(list.tasks)
    }

    pub async fn add_task(&self, token: &str, draft: &TaskDraft) -> Result<Task> {
        let response = self
            .http
            .post(self.endpoint("api/tasks/addtask")?)
            .header(AUTH_HEADER, token)
            .json(draft)
            .send()
            .await?;

        let saved: SavedTaskResponse = decode(response, Failure::Task, "Failed to add task").await?;
        Ok(saved.saved_task)
    }

    pub async fn update_task(&self, token: &str, task: &Task) -> Result<Task> {
        let response = self
            .http
            .put(self.task_endpoint("api/tasks/updatetask/", &task.id)?)
            .header(AUTH_HEADER, token)
            .json(task)
            .send()
            .await?;

        decode(response, Failure::Task, "Failed to update task").await
    }

    pub async fn delete_task(&self, token: &str, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.task_endpoint("api/tasks/deletetask/", id)?)
            .header(AUTH_HEADER, token)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(failure(response, Failure::Task, "Failed to delete task").await)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn task_endpoint(&self, path: &str, id: &str) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Network(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, kind: Failure, fallback: &str) -> Result<T> {
    if response.status().is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(failure(response, kind, fallback).await)
}

async fn failure(response: Response, kind: Failure, fallback: &str) -> ClientError {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    let message = body.error.unwrap_or_else(|| fallback.to_string());

    log::warn!("request failed with {status}: {message}");

    match kind {
        Failure::Auth => ClientError::Auth(message),
        Failure::Task if status == StatusCode::NOT_FOUND => ClientError::NotFound(message),
        Failure::Task => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tasko_shared::{Priority, TaskStatus};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn task_json(id: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "title": "Pay rent",
            "description": "",
            "status": "To Do",
            "priority": "High",
            "dueDate": "2025-02-01T00:00:00.000Z"
        })
    }

    #[test]
    fn base_path_is_preserved() {
        let api = ApiClient::new("http://example.com/backend", TIMEOUT).unwrap();
        assert_eq!(
            api.endpoint("api/auth/login").unwrap().as_str(),
            "http://example.com/backend/api/auth/login"
        );
        assert_eq!(
            api.task_endpoint("api/tasks/deletetask/", "a b").unwrap().as_str(),
            "http://example.com/backend/api/tasks/deletetask/a%20b"
        );
    }

    #[tokio::test]
    async fn login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authToken": "tok"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        assert_eq!(api.login("a@b.c", "pw").await.unwrap(), "tok");
    }

    #[tokio::test]
    async fn rejected_login_is_auth_error_with_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        match api.login("a@b.c", "bad").await {
            Err(ClientError::Auth(message)) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn signup_without_error_body_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/createuser"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        match api.create_user("n", "a@b.c", "pw").await {
            Err(ClientError::Auth(message)) => assert_eq!(message, "Signup failed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn task_routes_send_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/fetchalltask"))
            .and(header(AUTH_HEADER, "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": [task_json("t1")]})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/addtask"))
            .and(header(AUTH_HEADER, "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"savedTask": task_json("t2")})))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        let tasks = api.fetch_tasks("tok").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::High);

        let mut draft = TaskDraft::new("Pay rent", NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        draft.status = TaskStatus::Todo;
        let saved = api.add_task("tok", &draft).await.unwrap();
        assert_eq!(saved.id, "t2");
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/deletetask/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not Found"})))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        assert!(matches!(
            api.delete_task("tok", "gone").await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn malformed_success_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/fetchalltask"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        assert!(matches!(api.fetch_tasks("tok").await, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let api = ApiClient::new("http://127.0.0.1:9", TIMEOUT).unwrap();
        assert!(matches!(api.login("a", "b").await, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn hung_server_times_out_as_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"authToken": "tok"}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        assert!(matches!(api.login("a@b.c", "pw").await, Err(ClientError::Network(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
