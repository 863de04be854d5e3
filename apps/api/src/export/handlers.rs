//! Axum route handlers for the export API.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::fetch;
use crate::errors::AppError;
use crate::export::{
    ElementTree, ExportError, ExportedFile, FileStem, RenderSurface, SnapshotSurface,
};
use crate::models::{DocumentId, DocumentKind};
use crate::notify::{tracked, Action};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub file_name: String,
    pub path: String,
    pub pages: usize,
    pub size_bytes: usize,
}

impl From<ExportedFile> for ExportResponse {
    fn from(file: ExportedFile) -> Self {
        Self {
            file_name: file.file_name,
            path: file.path.display().to_string(),
            pages: file.pages,
            size_bytes: file.bytes.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SnapshotParams {
    #[serde(default = "default_device_scale")]
    pub device_scale: u32,
}

fn default_device_scale() -> u32 {
    1
}

async fn run_export(
    state: &AppState,
    kind: DocumentKind,
    id: &DocumentId,
    surface: Result<Arc<dyn RenderSurface>, ExportError>,
) -> Result<ExportedFile, AppError> {
    tracked(state.notifier.as_ref(), Action::Export, async {
        let document = fetch(state, kind, id)?;
        let stem = FileStem::for_document(&document.content)?;
        let file = state.exporter.export(Some(surface?), &stem).await?;
        Ok::<_, AppError>(file)
    })
    .await
}

/// POST /api/v1/documents/:kind/:id/export
///
/// Body: the laid-out element tree of the document preview. Writes
/// `<First>_<Last>_<Kind>.pdf` to the export directory.
pub async fn handle_export(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DocumentKind, String)>,
    tree: Option<Json<ElementTree>>,
) -> Result<Json<ExportResponse>, AppError> {
    let surface = tree
        .map(|Json(tree)| Arc::new(tree) as Arc<dyn RenderSurface>)
        .ok_or(ExportError::MissingSurface);
    let file = run_export(&state, kind, &DocumentId::from(id), surface).await?;
    Ok(Json(file.into()))
}

/// POST /api/v1/documents/:kind/:id/export/snapshot?device_scale=2
///
/// Body: a PNG or JPEG capture of the preview. Responds with the PDF itself.
pub async fn handle_export_snapshot(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DocumentKind, String)>,
    Query(params): Query<SnapshotParams>,
    body: Bytes,
) -> Result<Response, AppError> {
    let surface = SnapshotSurface::decode(&body, params.device_scale)
        .map(|snapshot| Arc::new(snapshot) as Arc<dyn RenderSurface>);
    let file = run_export(&state, kind, &DocumentId::from(id), surface).await?;

    // Header values must be visible ASCII.
    let ascii_name: String = file
        .file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect();
    let disposition = format!("attachment; filename=\"{ascii_name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
