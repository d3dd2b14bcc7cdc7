//! Collaborator seams for stored file content and text extraction.
//! The lifecycle manager calls these synchronously and never holds a lock
//! across them.

use anyhow::Result;

/// Blob-store operations the lifecycle manager needs. Keys are the `path`
/// field of a `FileRef`.
pub trait FileStore: Send + Sync {
    fn exists(&self, path: &str) -> bool;
    fn remove(&self, path: &str) -> Result<()>;
}

/// Local-filesystem implementation.
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn exists(&self, path: &str) -> bool {
        std::path::Path::new(path).exists()
    }

    fn remove(&self, path: &str) -> Result<()> {
        std::fs::remove_file(path)?;
        Ok(())
    }
}

/// Extracts searchable text from stored content. Real extraction (PDF
/// parsing) lives outside the core.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &str, mime_type: &str) -> Result<String>;
}

/// Default extractor: no text. Documents are still searchable by title and
/// description.
pub struct NoopExtractor;

impl TextExtractor for NoopExtractor {
    fn extract(&self, _path: &str, _mime_type: &str) -> Result<String> {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_store_removes_files() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blob.pdf");
        std::fs::write(&path, b"content").unwrap();
        let store = LocalFileStore;
        let key = path.to_str().unwrap();
        assert!(store.exists(key));
        store.remove(key).unwrap();
        assert!(!store.exists(key));
        assert!(store.remove(key).is_err());
    }
}
