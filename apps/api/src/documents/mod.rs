//! HTTP surface over the document store: dashboard listing, typed lookups, deletion,
//! and résumé editing.

pub mod handlers;
pub mod resume_handlers;

use crate::errors::AppError;
use crate::models::{Document, DocumentId, DocumentKind};
use crate::state::AppState;

/// Loads a document or fails with `NotFound`.
pub(crate) fn fetch(state: &AppState, kind: DocumentKind, id: &DocumentId) -> Result<Document, AppError> {
    state
        .store
        .get(kind, id)
        .ok_or_else(|| AppError::NotFound(format!("{} {id} not found", kind.display_name())))
}

/// Id of the active session, recorded on new documents.
pub(crate) fn current_owner(state: &AppState) -> Option<String> {
    state.sessions.current().map(|session| session.id)
}
