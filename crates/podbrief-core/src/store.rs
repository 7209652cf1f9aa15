//! File-backed persistence for parsed episode summaries, keyed by user.

use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::{error::Result, types::EpisodeRecord};

pub struct EpisodeStore {
    root: PathBuf,
}

impl EpisodeStore {
    /// Store rooted at the platform data directory.
    pub fn new() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("podbrief");
        Self { root }
    }

    /// Store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(user_id)
    }

    fn record_path(&self, user_id: &str, id: Uuid) -> PathBuf {
        self.user_dir(user_id).join(format!("{id}.json"))
    }

    /// Persist one episode record, returning its path.
    pub async fn save(&self, record: &EpisodeRecord) -> Result<PathBuf> {
        let dir = self.user_dir(&record.user_id);
        fs::create_dir_all(&dir).await?;

        let path = self.record_path(&record.user_id, record.id);
        let pretty_json = serde_json::to_string_pretty(record)?;
        fs::write(&path, &pretty_json).await?;
        Ok(path)
    }

    /// Load one episode record by id.
    pub async fn load(&self, user_id: &str, id: Uuid) -> Result<EpisodeRecord> {
        let json_content = fs::read_to_string(self.record_path(user_id, id)).await?;
        let record: EpisodeRecord = serde_json::from_str(&json_content)?;
        Ok(record)
    }

    /// List every episode record stored for a user. A user with no
    /// directory yet has no episodes.
    pub async fn list(&self, user_id: &str) -> Result<Vec<EpisodeRecord>> {
        let dir = self.user_dir(user_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let json_content = fs::read_to_string(&path).await?;
                records.push(serde_json::from_str(&json_content)?);
            }
        }
        Ok(records)
    }
}

impl Default for EpisodeStore {
    fn default() -> Self {
        Self::new()
    }
}
