//! Document records and their filesystem-backed store.
//! Each document is persisted as an individual JSON file and loaded at
//! startup; all mutations go back to disk immediately.

pub mod comments;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Contract,
    Pleading,
    Memo,
    Correspondence,
    #[default]
    Other,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Review,
    Approved,
    Archived,
}

/// Reference to stored file content. The path is a blob-store key, not
/// necessarily a local filesystem path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRef {
    pub path: String,
    pub size: u64,
    pub mime_type: String,
}

/// One uploaded revision of a document's content. Version records are
/// append-only; old file references stay retrievable forever.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version_number: u32,
    pub file: FileRef,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharePermissions {
    pub can_view: bool,
    pub can_download: bool,
    pub can_comment: bool,
}

impl Default for SharePermissions {
    fn default() -> Self {
        Self {
            can_view: true,
            can_download: false,
            can_comment: false,
        }
    }
}

/// Partial permission payload for share requests. Only flags explicitly
/// present overwrite the stored entry; `None` retains the prior value.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ShareUpdate {
    pub can_view: Option<bool>,
    pub can_download: Option<bool>,
    pub can_comment: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareEntry {
    pub user_id: Uuid,
    pub permissions: SharePermissions,
    pub shared_at: DateTime<Utc>,
    pub shared_by: Uuid,
}

/// Case attributes attached to a document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseMetadata {
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub filing_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: Status,
    /// Owner; set once at creation and never reassigned through the
    /// lifecycle operations.
    pub uploaded_by: Uuid,
    pub assigned_to: Vec<Uuid>,
    pub shared_with: Vec<ShareEntry>,
    pub versions: Vec<VersionRecord>,
    /// Active content; always mirrors the newest version's file reference.
    pub file: FileRef,
    pub tags: Vec<String>,
    pub metadata: CaseMetadata,
    pub searchable_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Write counter, bumped by the store on every persisted mutation.
    pub revision: u64,
}

impl Document {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: Uuid,
        file: FileRef,
        title: String,
        description: String,
        category: Category,
        status: Status,
        metadata: CaseMetadata,
        tags: Vec<String>,
        searchable_text: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            category,
            status,
            uploaded_by: owner,
            assigned_to: vec![owner],
            shared_with: Vec::new(),
            versions: vec![VersionRecord {
                version_number: 1,
                file: file.clone(),
                uploaded_by: owner,
                uploaded_at: now,
            }],
            file,
            tags,
            metadata,
            searchable_text,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// The record with the highest version number. Authoritative for the
    /// active file reference.
    pub fn latest_version(&self) -> Option<&VersionRecord> {
        self.versions.iter().max_by_key(|v| v.version_number)
    }

    /// Next version number: strictly `max(existing) + 1`, robust to gaps or
    /// any prior inconsistency in the list.
    pub fn next_version_number(&self) -> u32 {
        self.versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Append a new version and point the active file reference at it.
    /// Prior version records are never touched.
    pub fn add_version(&mut self, file: FileRef, uploaded_by: Uuid) -> u32 {
        let version_number = self.next_version_number();
        self.versions.push(VersionRecord {
            version_number,
            file: file.clone(),
            uploaded_by,
            uploaded_at: Utc::now(),
        });
        self.file = file;
        version_number
    }

    pub fn share_for(&self, user_id: Uuid) -> Option<&ShareEntry> {
        self.shared_with.iter().find(|s| s.user_id == user_id)
    }

    /// Insert or merge a share entry for `grantee`. On merge, only flags
    /// explicitly present in `update` overwrite the stored permissions; on
    /// insert, absent flags take the defaults (view yes, download/comment no).
    pub fn upsert_share(&mut self, grantee: Uuid, update: ShareUpdate, shared_by: Uuid) {
        if let Some(entry) = self.shared_with.iter_mut().find(|s| s.user_id == grantee) {
            if let Some(v) = update.can_view {
                entry.permissions.can_view = v;
            }
            if let Some(v) = update.can_download {
                entry.permissions.can_download = v;
            }
            if let Some(v) = update.can_comment {
                entry.permissions.can_comment = v;
            }
        } else {
            let defaults = SharePermissions::default();
            self.shared_with.push(ShareEntry {
                user_id: grantee,
                permissions: SharePermissions {
                    can_view: update.can_view.unwrap_or(defaults.can_view),
                    can_download: update.can_download.unwrap_or(defaults.can_download),
                    can_comment: update.can_comment.unwrap_or(defaults.can_comment),
                },
                shared_at: Utc::now(),
                shared_by,
            });
        }
    }

    /// Remove the share entry for `grantee`. Returns whether one existed;
    /// removing a missing entry is a no-op, not an error.
    pub fn remove_share(&mut self, grantee: Uuid) -> bool {
        let before = self.shared_with.len();
        self.shared_with.retain(|s| s.user_id != grantee);
        self.shared_with.len() != before
    }
}

/// Filesystem-backed store for `Document` records, one JSON file per
/// document.
pub struct DocumentStore {
    docs: HashMap<Uuid, Document>,
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let mut docs = HashMap::new();
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
                    if let Ok(doc) = serde_json::from_str::<Document>(&data) {
                        docs.insert(id, doc);
                    }
                }
            }
        }
        Ok(Self { docs, dir })
    }

    /// Directory where documents are persisted.
    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, Uuid, Document> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.docs.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.docs.contains_key(&id)
    }

    /// Persist a document record, new or updated. The state is serialized
    /// and written to disk first and replaces the in-memory entry only if
    /// the write succeeds, so a failed write aborts the whole mutation and
    /// never leaves a record visible that was not stored. Bumps the
    /// revision counter and update timestamp. One call per logical
    /// mutation: the versions and shared_with collections go to disk as
    /// part of the same record write, never separately.
    pub fn put(&mut self, mut doc: Document) -> Result<Uuid> {
        doc.updated_at = Utc::now();
        doc.revision += 1;
        let encoded = serde_json::to_string(&doc)?;
        std::fs::write(self.path(doc.id), encoded)?;
        let id = doc.id;
        self.docs.insert(id, doc);
        Ok(id)
    }

    /// Remove the document record and its backing file. The record removal
    /// is authoritative; a missing backing file is ignored.
    pub fn remove(&mut self, id: Uuid) -> Option<Document> {
        let doc = self.docs.remove(&id);
        if doc.is_some() {
            let _ = std::fs::remove_file(self.path(id));
        }
        doc
    }
}
