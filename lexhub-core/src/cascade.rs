//! Referential integrity between documents and their comments.
//!
//! A comment must never name a dead document. Enforced preventively by
//! [`before_comment_create`] and reactively by [`on_document_deleted`], which
//! runs synchronously as part of document deletion, before the document
//! record itself is removed.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::storage::comments::CommentStore;
use crate::storage::DocumentStore;

/// Existence pre-check before any comment insert.
pub fn before_comment_create(store: &DocumentStore, document_id: Uuid) -> Result<()> {
    if !store.contains(document_id) {
        return Err(Error::NotFound("document"));
    }
    Ok(())
}

/// Delete every comment referencing the document. Returns the number of
/// comments removed. Invoked by document deletion before the document record
/// is dropped, so a crash mid-delete can leave a comment-less document but
/// never orphaned comments.
pub fn on_document_deleted(comments: &mut CommentStore, document_id: Uuid) -> usize {
    let removed = comments.remove_for_document(document_id);
    if removed > 0 {
        tracing::debug!(document = %document_id, removed, "cascaded comment deletion");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::comments::Comment;
    use crate::storage::{Category, CaseMetadata, Document, FileRef, Status};

    fn new_doc(owner: Uuid) -> Document {
        Document::new(
            owner,
            FileRef {
                path: "uploads/x.pdf".to_string(),
                size: 1,
                mime_type: "application/pdf".to_string(),
            },
            "Memo".to_string(),
            String::new(),
            Category::Memo,
            Status::Draft,
            CaseMetadata::default(),
            Vec::new(),
            String::new(),
        )
    }

    #[test]
    fn comment_precheck_rejects_missing_document() {
        let tempdir = tempfile::tempdir().unwrap();
        let mut store = DocumentStore::new(tempdir.path()).unwrap();
        assert!(matches!(
            before_comment_create(&store, Uuid::new_v4()),
            Err(Error::NotFound(_))
        ));
        let id = store.put(new_doc(Uuid::new_v4())).unwrap();
        assert!(before_comment_create(&store, id).is_ok());
    }

    #[test]
    fn delete_cascade_removes_only_dependents() {
        let tempdir = tempfile::tempdir().unwrap();
        let mut comments = CommentStore::new(tempdir.path()).unwrap();
        let doomed = Uuid::new_v4();
        let kept = Uuid::new_v4();
        for _ in 0..3 {
            comments
                .insert(Comment::new(doomed, Uuid::new_v4(), "gone".to_string()))
                .unwrap();
        }
        comments
            .insert(Comment::new(kept, Uuid::new_v4(), "stays".to_string()))
            .unwrap();

        assert_eq!(on_document_deleted(&mut comments, doomed), 3);
        assert!(comments.for_document(doomed).is_empty());
        assert_eq!(comments.for_document(kept).len(), 1);
    }
}
