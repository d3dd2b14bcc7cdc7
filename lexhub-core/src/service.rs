//! Document lifecycle operations: create, version, update, delete, share,
//! list, search, and comments. Every operation checks the policy engine
//! before mutating and publishes an event after.
//!
//! The service takes `&mut self` for mutations; an embedding server wraps it
//! in `Arc<RwLock<DocumentService>>` so each operation is a single
//! serialized read-modify-write over the document's full state.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::cascade;
use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::files::{FileStore, TextExtractor};
use crate::policy::{self, Action, Role};
use crate::sanitize::sanitize_input;
use crate::search::{self, SearchFilters, SearchResults};
use crate::storage::comments::{Comment, CommentStore};
use crate::storage::{
    CaseMetadata, Category, Document, DocumentStore, FileRef, ShareUpdate, Status,
};

/// Input for document creation. Title is required; everything else has a
/// sensible default.
#[derive(Debug, Default, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: Status,
    pub metadata: CaseMetadata,
    pub tags: Vec<String>,
}

/// Partial update payload. Only these fields are settable through update;
/// owner, assignment, versions, shares, and file references are not, so a
/// caller cannot escalate privileges by mass-assigning fields.
#[derive(Debug, Default, Clone)]
pub struct UpdateFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub metadata: Option<CaseMetadata>,
    pub tags: Option<Vec<String>>,
}

/// Store-wide aggregates for the admin dashboard.
#[derive(Debug, Default, Serialize)]
pub struct DashboardStats {
    pub total_documents: usize,
    pub total_comments: usize,
    pub total_storage_bytes: u64,
    pub by_category: HashMap<Category, usize>,
    pub by_status: HashMap<Status, usize>,
}

pub struct DocumentService {
    store: DocumentStore,
    comments: CommentStore,
    files: Arc<dyn FileStore>,
    extractor: Arc<dyn TextExtractor>,
    events: EventBus,
}

impl DocumentService {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        files: Arc<dyn FileStore>,
        extractor: Arc<dyn TextExtractor>,
    ) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();
        Ok(Self {
            store: DocumentStore::new(data_dir.join("documents"))?,
            comments: CommentStore::new(data_dir.join("comments"))?,
            files,
            extractor,
            events: EventBus::new(),
        })
    }

    /// Audit consumers subscribe here.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    fn extract_text(&self, file: &FileRef) -> String {
        if file.mime_type != "application/pdf" {
            return String::new();
        }
        match self.extractor.extract(&file.path, &file.mime_type) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %file.path, error = %e, "text extraction failed");
                String::new()
            }
        }
    }

    fn authorize(doc: &Document, requester: Uuid, role: Role, action: Action) -> Result<()> {
        if policy::authorize(doc, requester, role, action).is_allow() {
            Ok(())
        } else {
            Err(Error::Forbidden(match action {
                Action::View => "view this document",
                Action::Download => "download this document",
                Action::Comment => "comment on this document",
                Action::Update => "update this document",
                Action::Delete => "delete this document",
                Action::Share => "share this document",
                Action::RevokeShare => "revoke access to this document",
            }))
        }
    }

    pub fn create_document(
        &mut self,
        owner: Uuid,
        file: FileRef,
        input: NewDocument,
    ) -> Result<Document> {
        let title = sanitize_input(input.title.trim()).trim().to_string();
        if title.is_empty() {
            return Err(Error::validation("please provide a document title"));
        }
        let description = sanitize_input(&input.description);
        let searchable_text = self.extract_text(&file);
        let doc = Document::new(
            owner,
            file,
            title,
            description,
            input.category,
            input.status,
            input.metadata,
            input.tags,
            searchable_text,
        );
        let id = self.store.put(doc)?;
        self.events.send(Event::Created { id });
        tracing::info!(document = %id, owner = %owner, "document created");
        Ok(self.store.get(id).expect("just stored").clone())
    }

    pub fn get_document(&self, id: Uuid, requester: Uuid, role: Role) -> Result<Document> {
        let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
        Self::authorize(doc, requester, role, Action::View)?;
        Ok(doc.clone())
    }

    /// Resolve the active file reference for download.
    pub fn download_document(&self, id: Uuid, requester: Uuid, role: Role) -> Result<FileRef> {
        let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
        Self::authorize(doc, requester, role, Action::Download)?;
        if !self.files.exists(&doc.file.path) {
            return Err(Error::NotFound("file"));
        }
        Ok(doc.file.clone())
    }

    /// Append a new version. Only owner or admin; the active file reference
    /// moves to the new version and every prior reference stays in the
    /// versions list.
    pub fn add_version(
        &mut self,
        id: Uuid,
        requester: Uuid,
        role: Role,
        file: FileRef,
    ) -> Result<Document> {
        let mut doc = {
            let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
            Self::authorize(doc, requester, role, Action::Update)?;
            doc.clone()
        };
        let searchable_text = self.extract_text(&file);
        let version = doc.add_version(file, requester);
        doc.searchable_text = searchable_text;
        self.store.put(doc)?;
        self.events.send(Event::VersionAdded { id, version });
        tracing::info!(document = %id, version, "version added");
        Ok(self.store.get(id).expect("just stored").clone())
    }

    pub fn update_document(
        &mut self,
        id: Uuid,
        requester: Uuid,
        role: Role,
        fields: UpdateFields,
    ) -> Result<Document> {
        let mut doc = {
            let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
            Self::authorize(doc, requester, role, Action::Update)?;
            doc.clone()
        };
        if let Some(title) = fields.title {
            let title = sanitize_input(title.trim()).trim().to_string();
            if title.is_empty() {
                return Err(Error::validation("please provide a document title"));
            }
            doc.title = title;
        }
        if let Some(description) = fields.description {
            doc.description = sanitize_input(&description);
        }
        if let Some(category) = fields.category {
            doc.category = category;
        }
        if let Some(status) = fields.status {
            doc.status = status;
        }
        if let Some(metadata) = fields.metadata {
            doc.metadata = metadata;
        }
        if let Some(tags) = fields.tags {
            doc.tags = tags;
        }
        self.store.put(doc)?;
        self.events.send(Event::Updated { id });
        Ok(self.store.get(id).expect("just stored").clone())
    }

    /// Delete a document: best-effort removal of every version's stored
    /// file, synchronous comment cascade, then the document record. File
    /// removal failures are logged and skipped; the metadata-level deletion
    /// always completes.
    pub fn delete_document(&mut self, id: Uuid, requester: Uuid, role: Role) -> Result<()> {
        let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
        Self::authorize(doc, requester, role, Action::Delete)?;

        let mut paths: HashSet<String> = doc.versions.iter().map(|v| v.file.path.clone()).collect();
        paths.insert(doc.file.path.clone());
        for path in paths {
            if let Err(e) = self.files.remove(&path) {
                tracing::warn!(document = %id, path = %path, error = %e, "failed to remove stored file");
            }
        }

        // cascade before the record goes away, so a crash can never leave
        // orphaned comments
        let comments_removed = cascade::on_document_deleted(&mut self.comments, id);
        self.store.remove(id);
        self.events.send(Event::Deleted {
            id,
            comments_removed,
        });
        tracing::info!(document = %id, comments_removed, "document deleted");
        Ok(())
    }

    /// Grant or adjust a share. Self-shares are rejected before the policy
    /// engine runs; re-sharing merges only the flags the caller provided.
    pub fn share_document(
        &mut self,
        id: Uuid,
        requester: Uuid,
        role: Role,
        grantee: Uuid,
        permissions: ShareUpdate,
    ) -> Result<Document> {
        let mut doc = {
            let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
            if grantee == doc.uploaded_by {
                return Err(Error::InvalidGrantee);
            }
            Self::authorize(doc, requester, role, Action::Share)?;
            doc.clone()
        };
        doc.upsert_share(grantee, permissions, requester);
        self.store.put(doc)?;
        self.events.send(Event::Shared { id, grantee });
        Ok(self.store.get(id).expect("just stored").clone())
    }

    pub fn revoke_share(
        &mut self,
        id: Uuid,
        requester: Uuid,
        role: Role,
        grantee: Uuid,
    ) -> Result<Document> {
        let mut doc = {
            let doc = self.store.get(id).ok_or(Error::NotFound("document"))?;
            Self::authorize(doc, requester, role, Action::RevokeShare)?;
            doc.clone()
        };
        if doc.remove_share(grantee) {
            self.store.put(doc)?;
            self.events.send(Event::ShareRevoked { id, grantee });
        }
        Ok(self.store.get(id).expect("still present").clone())
    }

    /// Documents visible to the requester under role-scoped visibility,
    /// newest first.
    pub fn list_documents(&self, requester: Uuid, role: Role) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .store
            .iter()
            .filter(|(_, d)| policy::is_visible(d, requester, role))
            .map(|(_, d)| d.clone())
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        docs
    }

    /// Literal-text search intersected with role-scoped visibility and the
    /// given filters, paginated. The query is required; a blank query is a
    /// validation error rather than a match-everything wildcard.
    pub fn search_documents(
        &self,
        requester: Uuid,
        role: Role,
        query: &str,
        filters: SearchFilters,
        page: i64,
        limit: i64,
    ) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("please provide a search query"));
        }
        let mut matched: Vec<Document> = self
            .store
            .iter()
            .filter(|(_, d)| policy::is_visible(d, requester, role))
            .filter(|(_, d)| search::matches(d, query))
            .filter(|(_, d)| search::passes_filters(d, &filters))
            .map(|(_, d)| d.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(search::paginate(matched, page, limit))
    }

    /// Aggregate counts across the whole store for the admin dashboard:
    /// document totals broken down by category and status, comment total,
    /// and stored bytes across every version of every document. Admin only;
    /// the numbers span documents no other role can see.
    pub fn dashboard_stats(&self, role: Role) -> Result<DashboardStats> {
        if role != Role::Admin {
            return Err(Error::Forbidden("view the dashboard"));
        }
        let mut stats = DashboardStats {
            total_comments: self.comments.len(),
            ..Default::default()
        };
        for (_, doc) in self.store.iter() {
            stats.total_documents += 1;
            stats.total_storage_bytes += doc.versions.iter().map(|v| v.file.size).sum::<u64>();
            *stats.by_category.entry(doc.category).or_default() += 1;
            *stats.by_status.entry(doc.status).or_default() += 1;
        }
        Ok(stats)
    }

    pub fn create_comment(
        &mut self,
        document_id: Uuid,
        requester: Uuid,
        role: Role,
        text: &str,
    ) -> Result<Comment> {
        cascade::before_comment_create(&self.store, document_id)?;
        let doc = self.store.get(document_id).expect("checked above");
        Self::authorize(doc, requester, role, Action::Comment)?;
        let text = sanitize_input(text.trim());
        if text.is_empty() {
            return Err(Error::validation("please provide comment text"));
        }
        let comment = Comment::new(document_id, requester, text);
        let comment_id = self.comments.insert(comment)?;
        self.events.send(Event::Commented {
            id: document_id,
            comment: comment_id,
        });
        Ok(self.comments.get(comment_id).expect("just inserted").clone())
    }

    pub fn comments_for_document(
        &self,
        document_id: Uuid,
        requester: Uuid,
        role: Role,
    ) -> Result<Vec<Comment>> {
        let doc = self
            .store
            .get(document_id)
            .ok_or(Error::NotFound("document"))?;
        Self::authorize(doc, requester, role, Action::View)?;
        Ok(self
            .comments
            .for_document(document_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
