//! Axum route handlers for the document API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::documents::fetch;
use crate::errors::AppError;
use crate::models::{Document, DocumentId, DocumentKind};
use crate::notify::{tracked, Action};
use crate::state::AppState;

/// Dashboard row: a document annotated with the collection it came from.
#[derive(Debug, Serialize)]
pub struct DashboardEntry {
    pub kind: DocumentKind,
    pub type_label: &'static str,
    #[serde(flatten)]
    pub document: Document,
}

impl From<Document> for DashboardEntry {
    fn from(document: Document) -> Self {
        let kind = document.kind();
        Self {
            kind,
            type_label: kind.display_name(),
            document,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub removed: bool,
}

/// GET /api/v1/documents
///
/// Every document across the three collections, newest first.
pub async fn handle_list_all(State(state): State<AppState>) -> Json<Vec<DashboardEntry>> {
    let entries = state
        .store
        .list_all_sorted_by_recency()
        .into_iter()
        .map(DashboardEntry::from)
        .collect();
    Json(entries)
}

/// GET /api/v1/documents/:kind
///
/// Collection contents in insertion order.
pub async fn handle_list(
    State(state): State<AppState>,
    Path(kind): Path<DocumentKind>,
) -> Json<Vec<Document>> {
    Json(state.store.list(kind))
}

/// GET /api/v1/documents/:kind/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DocumentKind, String)>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(fetch(&state, kind, &DocumentId::from(id))?))
}

/// DELETE /api/v1/documents/:kind/:id
///
/// Deleting an id that is not there succeeds with `removed: false`.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DocumentKind, String)>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = DocumentId::from(id);
    let removed = tracked(state.notifier.as_ref(), Action::DeleteDocument, async {
        state.store.remove(kind, &id)
    })
    .await?;
    Ok(Json(DeleteResponse { removed }))
}
