//! Text search over document records.
//!
//! The query is literal text, matched as a case-insensitive substring of
//! title, description, and extracted content. It is never parsed as query
//! syntax, so operator-looking input matches only itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{Category, Document, Status};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct SearchFilters {
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub documents: Vec<Document>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Literal substring match, case-insensitive, against title, description,
/// and searchable text.
pub fn matches(doc: &Document, query: &str) -> bool {
    let q = query.to_lowercase();
    doc.title.to_lowercase().contains(&q)
        || doc.description.to_lowercase().contains(&q)
        || doc.searchable_text.to_lowercase().contains(&q)
}

pub fn passes_filters(doc: &Document, filters: &SearchFilters) -> bool {
    if let Some(category) = filters.category {
        if doc.category != category {
            return false;
        }
    }
    if let Some(status) = filters.status {
        if doc.status != status {
            return false;
        }
    }
    if let Some(from) = filters.date_from {
        if doc.created_at < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if doc.created_at > to {
            return false;
        }
    }
    true
}

/// Clamp a requested page to at least 1.
pub fn clamp_page(page: i64) -> usize {
    page.max(1) as usize
}

/// Clamp a requested page size into [1, MAX_PAGE_SIZE]; non-positive values
/// fall back to the default.
pub fn clamp_limit(limit: i64) -> usize {
    if limit <= 0 {
        DEFAULT_PAGE_SIZE as usize
    } else {
        limit.min(MAX_PAGE_SIZE) as usize
    }
}

/// Page through an already-filtered, already-sorted result set.
pub fn paginate(matched: Vec<Document>, page: i64, limit: i64) -> SearchResults {
    let current_page = clamp_page(page);
    let limit = clamp_limit(limit);
    let total_count = matched.len();
    let total_pages = total_count.div_ceil(limit);
    let documents = matched
        .into_iter()
        .skip((current_page - 1) * limit)
        .take(limit)
        .collect();
    SearchResults {
        documents,
        total_count,
        total_pages,
        current_page,
    }
}
