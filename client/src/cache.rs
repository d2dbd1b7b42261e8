//! On-disk client state: the bearer token and, optionally, a copy of the
//! task collection used to seed the store on a cold start.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tasko_shared::Task;

use crate::error::Result;

const TOKEN_FILE: &str = "token";
const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
    cache_tasks: bool,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>, cache_tasks: bool) -> Self {
        Self {
            dir: dir.into(),
            cache_tasks,
        }
    }

    pub async fn load_token(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.dir.join(TOKEN_FILE)).await {
            Ok(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save_token(&self, token: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(TOKEN_FILE), token).await?;
        Ok(())
    }

    pub async fn clear_token(&self) -> Result<()> {
        remove_if_present(&self.dir.join(TOKEN_FILE)).await
    }

    /// `None` when caching is off or nothing usable is stored. A corrupt
    /// cache is dropped rather than reported; the next fetch replaces it.
    pub async fn load_tasks(&self) -> Result<Option<Vec<Task>>> {
        if !self.cache_tasks {
            return Ok(None);
        }

        let contents = match tokio::fs::read(self.dir.join(TASKS_FILE)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&contents) {
            Ok(tasks) => Ok(Some(tasks)),
            Err(e) => {
                log::warn!("discarding unreadable task cache: {e}");
                self.clear_tasks().await?;
                Ok(None)
            }
        }
    }

    pub async fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        if !self.cache_tasks {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let contents = serde_json::to_vec_pretty(tasks)?;
        tokio::fs::write(self.dir.join(TASKS_FILE), contents).await?;
        Ok(())
    }

    pub async fn clear_tasks(&self) -> Result<()> {
        remove_if_present(&self.dir.join(TASKS_FILE)).await
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
