//! The session and the canonical task collection.
//!
//! [`TaskStore`] is the single owner of both. Every operation goes to the
//! server first and only touches local state once the server has confirmed
//! it, so a failed call leaves the collection exactly as it was. After each
//! change the store publishes a [`StoreSnapshot`] to its subscribers.
//!
//! The on-disk task cache is a cold-start seed only: [`TaskStore::restore`]
//! shows it until the first fetch succeeds, after which it is rewritten
//! from confirmed server state.

use tasko_shared::{Task, TaskDraft};
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::cache::LocalCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::form;
use crate::view::{self, DropTarget};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub authenticated: bool,
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub last_error: Option<String>,
    /// The tasks come from the local cache and have not been confirmed by a
    /// fetch yet.
    pub from_cache: bool,
}

pub struct TaskStore {
    api: ApiClient,
    cache: LocalCache,
    token: Option<String>,
    tasks: Vec<Task>,
    loading: bool,
    last_error: Option<String>,
    from_cache: bool,
    updates: watch::Sender<StoreSnapshot>,
}

impl TaskStore {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config.base_url, config.request_timeout())?;
        let cache = LocalCache::new(&config.data_dir, config.cache_tasks);
        Ok(Self::with_parts(api, cache))
    }

    pub fn with_parts(api: ApiClient, cache: LocalCache) -> Self {
        let (updates, _) = watch::channel(StoreSnapshot::default());
        Self {
            api,
            cache,
            token: None,
            tasks: Vec::new(),
            loading: false,
            last_error: None,
            from_cache: false,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.updates.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Picks up the session persisted by an earlier run. The cached tasks,
    /// if any, are shown until the fetch that follows replaces them.
    pub async fn restore(&mut self) -> Result<()> {
        let Some(token) = self.cache.load_token().await? else {
            log::debug!("no stored session");
            return Ok(());
        };

        log::info!("restoring stored session");
        self.token = Some(token);
        if let Some(tasks) = self.cache.load_tasks().await? {
            log::debug!("seeded {} tasks from cache", tasks.len());
            self.tasks = tasks;
            self.from_cache = true;
        }
        self.publish();

        self.fetch_tasks().await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        require("Email", email)?;
        require("Password", password)?;

        self.begin();
        let result = self.api.login(email.trim(), password).await;
        self.start_session(result).await
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<()> {
        require("Name", name)?;
        require("Email", email)?;
        require("Password", password)?;

        self.begin();
        let result = self.api.create_user(name.trim(), email.trim(), password).await;
        self.start_session(result).await
    }

    /// Ends the session locally. Never fails; cache cleanup errors are only
    /// logged.
    pub async fn logout(&mut self) {
        log::info!("logging out");
        self.token = None;
        self.tasks.clear();
        self.from_cache = false;
        self.last_error = None;

        if let Err(e) = self.cache.clear_token().await {
            log::warn!("failed to remove stored token: {e}");
        }
        if let Err(e) = self.cache.clear_tasks().await {
            log::warn!("failed to remove task cache: {e}");
        }
        self.publish();
    }

    pub async fn fetch_tasks(&mut self) -> Result<()> {
        let token = self.session()?;

        self.begin();
        let result = match self.api.fetch_tasks(&token).await {
            Ok(tasks) => {
                log::info!("fetched {} tasks", tasks.len());
                self.tasks = tasks;
                self.from_cache = false;
                self.persist().await;
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    pub async fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let token = self.session()?;
        form::validate(&draft)?;

        self.begin();
        let result = self.api.add_task(&token, &draft).await;
        if let Ok(saved) = &result {
            log::info!("added task {}", saved.id);
            self.tasks.push(saved.clone());
            self.persist().await;
        }
        self.finish(result)
    }

    pub async fn update_task(&mut self, task: Task) -> Result<Task> {
        let token = self.session()?;
        form::validate(&task.to_draft())?;
        if self.task(&task.id).is_none() {
            return Err(not_found(&task.id));
        }

        self.begin();
        let result = self.api.update_task(&token, &task).await;
        if let Ok(updated) = &result {
            log::info!("updated task {}", updated.id);
            if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = updated.clone();
            }
            self.persist().await;
        }
        self.finish(result)
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<()> {
        let token = self.session()?;
        if self.task(id).is_none() {
            return Err(not_found(id));
        }

        self.begin();
        let result = self.api.delete_task(&token, id).await;
        if result.is_ok() {
            log::info!("deleted task {id}");
            self.tasks.retain(|task| task.id != id);
            self.persist().await;
        }
        self.finish(result)
    }

    /// Drops a card. The reordered collection and the new status are applied
    /// together once the status write succeeds. `Ok(None)` means the card
    /// was dropped where it already was and nothing was sent.
    pub async fn move_task(&mut self, active_id: &str, target: &DropTarget) -> Result<Option<Task>> {
        let token = self.session()?;
        let Some(plan) = view::plan_move(&self.tasks, active_id, target)? else {
            return Ok(None);
        };

        self.begin();
        let result = self.api.update_task(&token, &plan.moved).await;
        if let Ok(updated) = &result {
            log::info!("moved task {} to {}", updated.id, updated.status);
            let mut tasks = plan.tasks;
            if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated.clone();
            }
            self.tasks = tasks;
            self.persist().await;
        }
        self.finish(result).map(Some)
    }

    async fn start_session(&mut self, result: Result<String>) -> Result<()> {
        let token = match result {
            Ok(token) => token,
            Err(e) => return self.finish(Err(e)),
        };

        log::info!("session started");
        self.token = Some(token.clone());
        if let Err(e) = self.cache.save_token(&token).await {
            log::warn!("session will not survive a restart: {e}");
        }
        self.finish(Ok(()))?;

        // The session stands even when the first fetch fails.
        if let Err(e) = self.fetch_tasks().await {
            log::warn!("initial fetch failed: {e}");
        }
        Ok(())
    }

    fn session(&self) -> Result<String> {
        self.token.clone().ok_or(ClientError::NotAuthenticated)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.last_error = None;
        self.publish();
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        self.loading = false;
        if let Err(e) = &result {
            log::error!("{e}");
            self.last_error = Some(e.to_string());
        }
        self.publish();
        result
    }

    async fn persist(&self) {
        if let Err(e) = self.cache.save_tasks(&self.tasks).await {
            log::warn!("failed to refresh task cache: {e}");
        }
    }

    fn publish(&self) {
        self.updates.send_replace(StoreSnapshot {
            authenticated: self.token.is_some(),
            tasks: self.tasks.clone(),
            loading: self.loading,
            last_error: self.last_error.clone(),
            from_cache: self.from_cache,
        });
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn not_found(id: &str) -> ClientError {
    ClientError::NotFound(format!("task {id} not found"))
}
