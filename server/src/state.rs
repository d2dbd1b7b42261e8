//! In-memory accounts, sessions and tasks for the development backend.

use std::collections::HashMap;
use std::sync::Mutex;

use tasko_shared::{Task, TaskDraft};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Default)]
struct Inner {
    /// email -> password. Development only; nothing is persisted.
    users: HashMap<String, String>,
    /// token -> email
    sessions: HashMap<String, String>,
    /// email -> tasks, in insertion order
    tasks: HashMap<String, Vec<Task>>,
}

#[derive(Default)]
pub struct AppState {
    inner: Mutex<Inner>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create_user(&self, name: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let mut inner = self.lock();
        if inner.users.contains_key(email) {
            return Err(ApiError::BadRequest(
                "Sorry a user with this email already exists".to_string(),
            ));
        }

        inner.users.insert(email.to_string(), password.to_string());
        log::info!("created user {name} <{email}>");
        Ok(open_session(&mut inner, email))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let mut inner = self.lock();
        let valid = inner.users.get(email).is_some_and(|stored| stored == password);
        if !valid {
            return Err(ApiError::BadRequest(
                "Please try to login with correct credentials".to_string(),
            ));
        }
        Ok(open_session(&mut inner, email))
    }

    pub fn tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        let inner = self.lock();
        let owner = owner(&inner, token)?;
        Ok(inner.tasks.get(&owner).cloned().unwrap_or_default())
    }

    pub fn add_task(&self, token: &str, draft: TaskDraft) -> Result<Task, ApiError> {
        let mut inner = self.lock();
        let owner = owner(&inner, token)?;
        let task = Task::from_draft(Uuid::new_v4().simple().to_string(), draft);
        inner.tasks.entry(owner).or_default().push(task.clone());
        Ok(task)
    }

    pub fn update_task(&self, token: &str, id: &str, draft: TaskDraft) -> Result<Task, ApiError> {
        let mut inner = self.lock();
        let owner = owner(&inner, token)?;
        let slot = inner
            .tasks
            .get_mut(&owner)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == id))
            .ok_or(ApiError::NotFound)?;

        *slot = Task::from_draft(id, draft);
        Ok(slot.clone())
    }

    pub fn delete_task(&self, token: &str, id: &str) -> Result<Task, ApiError> {
        let mut inner = self.lock();
        let owner = owner(&inner, token)?;
        let tasks = inner.tasks.get_mut(&owner).ok_or(ApiError::NotFound)?;
        let at = tasks.iter().position(|task| task.id == id).ok_or(ApiError::NotFound)?;
        Ok(tasks.remove(at))
    }
}

/// One live token per user; a new login revokes the previous one.
fn open_session(inner: &mut Inner, email: &str) -> String {
    inner.sessions.retain(|_, owner| owner != email);
    let token = Uuid::new_v4().to_string();
    inner.sessions.insert(token.clone(), email.to_string());
    token
}

fn owner(inner: &Inner, token: &str) -> Result<String, ApiError> {
    inner
        .sessions
        .get(token)
        .cloned()
        .ok_or(ApiError::Unauthorized)
}
