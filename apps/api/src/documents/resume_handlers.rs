//! Axum route handlers for résumé editing.
//!
//! Entries are validated before they reach the store: a rejected draft leaves the
//! résumé and its collection exactly as they were.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::{current_owner, fetch};
use crate::errors::AppError;
use crate::models::resume::{
    EducationDraft, ExperienceDraft, PersonalInfo, ResumeContent, ResumeSection, SkillDraft,
    Theme, ValidationError,
};
use crate::models::{Document, DocumentContent, DocumentId, DocumentKind};
use crate::notify::{tracked, Action};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry_id: String,
    pub document: Document,
}

#[derive(Debug, Serialize)]
pub struct RemoveEntryResponse {
    pub removed: bool,
    pub document: Document,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Loads a résumé, applies `edit`, and re-saves it only when `edit` succeeds.
fn edit_resume<T>(
    state: &AppState,
    id: &DocumentId,
    edit: impl FnOnce(&mut ResumeContent) -> Result<T, ValidationError>,
) -> Result<(Document, T), AppError> {
    let mut document = fetch(state, DocumentKind::Resume, id)?;
    let DocumentContent::Resume(resume) = &mut document.content else {
        return Err(AppError::NotFound(format!("CV {id} not found")));
    };
    let outcome = edit(resume)?;
    let document = state.store.update(DocumentKind::Resume, document)?;
    Ok((document, outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Creates an empty résumé. First name, last name and email are required.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<Document>, AppError> {
    let document = tracked(state.notifier.as_ref(), Action::CreateDocument, async {
        let resume = ResumeContent::new(request.personal_info, request.theme);
        resume.ensure_complete_identity()?;
        let document = state.store.new_document(
            DocumentContent::Resume(resume),
            request.name,
            current_owner(&state),
        );
        state.store.add(DocumentKind::Resume, document.clone())?;
        Ok::<_, AppError>(document)
    })
    .await?;

    Ok(Json(document))
}

/// PUT /api/v1/resumes/:id
///
/// Replaces personal info and theme. Entries are kept.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<Document>, AppError> {
    let id = DocumentId::from(id);
    let document = tracked(state.notifier.as_ref(), Action::SaveDocument, async {
        let mut document = fetch(&state, DocumentKind::Resume, &id)?;
        let DocumentContent::Resume(resume) = &mut document.content else {
            return Err(AppError::NotFound(format!("CV {id} not found")));
        };
        resume.personal_info = request.personal_info;
        resume.theme = request.theme;
        resume.ensure_complete_identity()?;
        if let Some(name) = request.name.filter(|n| !n.trim().is_empty()) {
            document.name = name;
        }
        Ok(state.store.update(DocumentKind::Resume, document)?)
    })
    .await?;
    Ok(Json(document))
}

/// POST /api/v1/resumes/:id/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ExperienceDraft>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = DocumentId::from(id);
    let (document, entry_id) = tracked(state.notifier.as_ref(), Action::AddEntry, async {
        edit_resume(&state, &id, |resume| {
            resume.add_experience(draft).map(|e| e.id.clone())
        })
    })
    .await?;
    Ok(Json(EntryResponse { entry_id, document }))
}

/// POST /api/v1/resumes/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EducationDraft>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = DocumentId::from(id);
    let (document, entry_id) = tracked(state.notifier.as_ref(), Action::AddEntry, async {
        edit_resume(&state, &id, |resume| {
            resume.add_education(draft).map(|e| e.id.clone())
        })
    })
    .await?;
    Ok(Json(EntryResponse { entry_id, document }))
}

/// POST /api/v1/resumes/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<SkillDraft>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = DocumentId::from(id);
    let (document, entry_id) = tracked(state.notifier.as_ref(), Action::AddEntry, async {
        edit_resume(&state, &id, |resume| resume.add_skill(draft).map(|s| s.id.clone()))
    })
    .await?;
    Ok(Json(EntryResponse { entry_id, document }))
}

/// DELETE /api/v1/resumes/:id/:section/:entry_id
///
/// Removing an absent entry is a no-op and reports `removed: false`.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section, entry_id)): Path<(String, ResumeSection, String)>,
) -> Result<Json<RemoveEntryResponse>, AppError> {
    let id = DocumentId::from(id);
    let (document, removed) = tracked(state.notifier.as_ref(), Action::RemoveEntry, async {
        edit_resume(&state, &id, |resume| Ok(resume.remove_entry(section, &entry_id)))
    })
    .await?;
    Ok(Json(RemoveEntryResponse { removed, document }))
}
