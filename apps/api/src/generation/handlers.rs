//! Axum route handlers for the letter API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::{current_owner, fetch};
use crate::errors::AppError;
use crate::generation::cancellation::{apply_category, CategoryTransition};
use crate::generation::cover_letter::CoverLetterFacts;
use crate::models::letters::{
    Applicant, CancellationCategory, CancellationLetterContent, CoverLetterContent, Recipient,
    Sender,
};
use crate::models::resume::ValidationError;
use crate::models::{Document, DocumentContent, DocumentId, DocumentKind};
use crate::notify::{tracked, Action};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateCoverLetterRequest {
    #[serde(flatten)]
    pub facts: CoverLetterFacts,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateCoverLetterResponse {
    pub body: String,
    pub backend: &'static str,
    /// Saved only when a session is active.
    pub document: Option<Document>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBodyRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCancellationRequest {
    pub sender: Sender,
    pub recipient: Recipient,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<CancellationCategory>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyCategoryRequest {
    pub category: CancellationCategory,
}

#[derive(Debug, Serialize)]
pub struct ApplyCategoryResponse {
    pub document: Document,
    pub transition: CategoryTransition,
}

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub value: CancellationCategory,
    pub label: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_cancellation(letter: &CancellationLetterContent) -> Result<(), ValidationError> {
    let required = [
        (&letter.sender.first_name, "sender first name"),
        (&letter.sender.last_name, "sender last name"),
        (&letter.recipient.name, "recipient name"),
    ];
    for (value, field) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "cancellation letter",
                field,
            });
        }
    }
    Ok(())
}

/// Loads a letter of `kind`, applies `edit`, and re-saves it.
fn edit_letter<T>(
    state: &AppState,
    kind: DocumentKind,
    id: &DocumentId,
    edit: impl FnOnce(&mut DocumentContent) -> T,
) -> Result<(Document, T), AppError> {
    let mut document = fetch(state, kind, id)?;
    let outcome = edit(&mut document.content);
    let document = state.store.update(kind, document)?;
    Ok((document, outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/letters/cover/generate
///
/// Writes a cover-letter body from the given facts. When a session is active the
/// letter is also saved to the cover-letter collection.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<GenerateCoverLetterRequest>,
) -> Result<Json<GenerateCoverLetterResponse>, AppError> {
    let response = tracked(state.notifier.as_ref(), Action::GenerateLetter, async {
        let body = state.letter_writer.write(&request.facts).await;

        let document = match current_owner(&state) {
            Some(owner) => {
                let facts = request.facts;
                let content = DocumentContent::CoverLetter(CoverLetterContent {
                    applicant: Applicant {
                        first_name: facts.first_name,
                        last_name: facts.last_name,
                        email: request.email,
                        phone: request.phone,
                        address: request.address,
                    },
                    company: facts.company,
                    role: facts.role,
                    experience: facts.experience,
                    formation: facts.formation,
                    body: body.clone(),
                });
                let document = state.store.new_document(content, None, Some(owner));
                state.store.add(DocumentKind::CoverLetter, document.clone())?;
                Some(document)
            }
            None => None,
        };

        Ok::<_, AppError>(GenerateCoverLetterResponse {
            body,
            backend: state.letter_writer.backend(),
            document,
        })
    })
    .await?;

    Ok(Json(response))
}

/// PUT /api/v1/letters/cover/:id
///
/// Saves a hand-edited body.
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBodyRequest>,
) -> Result<Json<Document>, AppError> {
    let id = DocumentId::from(id);
    let (document, _) = tracked(state.notifier.as_ref(), Action::SaveDocument, async {
        edit_letter(&state, DocumentKind::CoverLetter, &id, |content| {
            if let DocumentContent::CoverLetter(letter) = content {
                letter.body = request.body;
            }
        })
    })
    .await?;
    Ok(Json(document))
}

// ────────────────────────────────────────────────────────────────────────────
// Cancellation letters
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/letters/cancellation/categories
pub async fn handle_list_categories() -> Json<Vec<CategoryOption>> {
    Json(
        CancellationCategory::ALL
            .iter()
            .map(|&value| CategoryOption {
                value,
                label: value.label(),
            })
            .collect(),
    )
}

/// POST /api/v1/letters/cancellation
///
/// Creates a cancellation letter. A category fills the body with its boilerplate;
/// an explicit body wins over it.
pub async fn handle_create_cancellation(
    State(state): State<AppState>,
    Json(request): Json<CreateCancellationRequest>,
) -> Result<Json<Document>, AppError> {
    let document = tracked(state.notifier.as_ref(), Action::CreateDocument, async {
        let mut letter =
            CancellationLetterContent::new(request.sender, request.recipient, request.reference);
        validate_cancellation(&letter)?;

        if let Some(subject) = request.subject.filter(|s| !s.trim().is_empty()) {
            letter.subject = subject;
        }
        if let Some(category) = request.category {
            apply_category(&mut letter, category);
        }
        if let Some(body) = request.body {
            letter.body = body;
        }

        let document = state.store.new_document(
            DocumentContent::CancellationLetter(letter),
            None,
            current_owner(&state),
        );
        state
            .store
            .add(DocumentKind::CancellationLetter, document.clone())?;
        Ok::<_, AppError>(document)
    })
    .await?;

    Ok(Json(document))
}

/// PUT /api/v1/letters/cancellation/:id
///
/// Saves a hand-edited body. The category is kept so a later re-selection can
/// report the edit as discarded.
pub async fn handle_update_cancellation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBodyRequest>,
) -> Result<Json<Document>, AppError> {
    let id = DocumentId::from(id);
    let (document, _) = tracked(state.notifier.as_ref(), Action::SaveDocument, async {
        edit_letter(&state, DocumentKind::CancellationLetter, &id, |content| {
            if let DocumentContent::CancellationLetter(letter) = content {
                letter.body = request.body;
            }
        })
    })
    .await?;
    Ok(Json(document))
}

/// POST /api/v1/letters/cancellation/:id/category
///
/// Replaces the body with the category boilerplate, whatever it held before.
pub async fn handle_apply_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ApplyCategoryRequest>,
) -> Result<Json<ApplyCategoryResponse>, AppError> {
    let id = DocumentId::from(id);
    let (document, transition) = tracked(state.notifier.as_ref(), Action::ApplyCategory, async {
        let (document, transition) =
            edit_letter(&state, DocumentKind::CancellationLetter, &id, |content| {
                match content {
                    DocumentContent::CancellationLetter(letter) => {
                        Some(apply_category(letter, request.category))
                    }
                    _ => None,
                }
            })?;
        let transition = transition
            .ok_or_else(|| AppError::NotFound(format!("Résiliation {id} not found")))?;
        Ok::<_, AppError>((document, transition))
    })
    .await?;

    if transition.discarded_manual_edits {
        tracing::warn!("Category change on {id} discarded manual edits to the letter body");
    }
    Ok(Json(ApplyCategoryResponse {
        document,
        transition,
    }))
}
