//! Pure access decisions for documents.
//!
//! Every operation on a document funnels through [`authorize`]; listing and
//! search funnel through [`is_visible`]. Neither touches storage, so the
//! rules are testable in isolation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Document;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lawyer,
    Client,
}

/// Actions a requester can ask to perform on a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    View,
    Download,
    Comment,
    Update,
    Delete,
    Share,
    RevokeShare,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `requester` may perform `action` on `doc`.
///
/// Precedence, first match wins:
/// 1. admins may do anything
/// 2. the owner may do anything
/// 3. assigned users get view/download/comment
/// 4. a share entry grants exactly the flags it carries, and only for
///    view/download/comment; update/delete/share are never grantable
pub fn authorize(doc: &Document, requester: Uuid, role: Role, action: Action) -> Decision {
    if role == Role::Admin {
        return Decision::Allow;
    }
    if doc.uploaded_by == requester {
        return Decision::Allow;
    }
    if doc.assigned_to.contains(&requester) {
        return match action {
            Action::View | Action::Download | Action::Comment => Decision::Allow,
            _ => Decision::Deny,
        };
    }
    if let Some(share) = doc.share_for(requester) {
        let granted = match action {
            Action::View => share.permissions.can_view,
            Action::Download => share.permissions.can_download,
            Action::Comment => share.permissions.can_comment,
            _ => false,
        };
        if granted {
            return Decision::Allow;
        }
    }
    Decision::Deny
}

/// Role-scoped visibility used by list and search.
///
/// Admins see everything. Lawyers see documents they own, are assigned to, or
/// hold a share on. Clients see documents they are assigned to or hold a
/// share on; being "the same firm" grants nothing.
pub fn is_visible(doc: &Document, requester: Uuid, role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Lawyer => {
            doc.uploaded_by == requester
                || doc.assigned_to.contains(&requester)
                || doc.share_for(requester).is_some()
        }
        Role::Client => {
            doc.assigned_to.contains(&requester) || doc.share_for(requester).is_some()
        }
    }
}
