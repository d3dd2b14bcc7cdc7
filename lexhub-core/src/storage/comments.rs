//! Comment records. Comments live outside the document record but their
//! existence is contingent on it; the cascade module enforces that.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(document_id: Uuid, user_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            user_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Filesystem-backed store for comments, one JSON file per comment.
pub struct CommentStore {
    comments: HashMap<Uuid, Comment>,
    dir: PathBuf,
}

impl CommentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let mut comments = HashMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(id) = Uuid::parse_str(stem) {
                    let data = std::fs::read_to_string(&path)?;
                    if let Ok(comment) = serde_json::from_str::<Comment>(&data) {
                        comments.insert(id, comment);
                    }
                }
            }
        }
        Ok(Self { comments, dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Comment> {
        self.comments.get(&id)
    }

    pub fn insert(&mut self, comment: Comment) -> Result<Uuid> {
        let id = comment.id;
        let path = self.path(id);
        std::fs::write(&path, serde_json::to_string(&comment)?)
            .map_err(|e| anyhow!("failed to persist comment: {e}"))?;
        self.comments.insert(id, comment);
        Ok(id)
    }

    /// All comments for a document, newest first.
    pub fn for_document(&self, document_id: Uuid) -> Vec<&Comment> {
        let mut out: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| c.document_id == document_id)
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Delete every comment referencing `document_id`, returning how many
    /// were removed. The in-memory record is removed even if the backing
    /// file is already gone.
    pub fn remove_for_document(&mut self, document_id: Uuid) -> usize {
        let ids: Vec<Uuid> = self
            .comments
            .values()
            .filter(|c| c.document_id == document_id)
            .map(|c| c.id)
            .collect();
        for id in &ids {
            self.comments.remove(id);
            if let Err(e) = std::fs::remove_file(self.path(*id)) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(comment = %id, error = %e, "failed to remove comment file");
                }
            }
        }
        ids.len()
    }
}
