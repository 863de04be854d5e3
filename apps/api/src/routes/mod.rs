pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::documents::{handlers as documents, resume_handlers as resumes};
use crate::export::handlers as export;
use crate::generation::handlers as letters;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/health", get(health::health_handler))
        // Session
        .route(
            "/api/v1/session",
            get(session::handle_current_session).delete(session::handle_logout),
        )
        .route("/api/v1/session/login", post(session::handle_login))
        .route("/api/v1/session/register", post(session::handle_register))
        // Documents
        .route("/api/v1/documents", get(documents::handle_list_all))
        .route("/api/v1/documents/:kind", get(documents::handle_list))
        .route(
            "/api/v1/documents/:kind/:id",
            get(documents::handle_get).delete(documents::handle_delete),
        )
        .route("/api/v1/documents/:kind/:id/export", post(export::handle_export))
        .route(
            "/api/v1/documents/:kind/:id/export/snapshot",
            post(export::handle_export_snapshot),
        )
        // Résumés
        .route("/api/v1/resumes", post(resumes::handle_create_resume))
        .route("/api/v1/resumes/:id", put(resumes::handle_update_resume))
        .route(
            "/api/v1/resumes/:id/experiences",
            post(resumes::handle_add_experience),
        )
        .route(
            "/api/v1/resumes/:id/education",
            post(resumes::handle_add_education),
        )
        .route("/api/v1/resumes/:id/skills", post(resumes::handle_add_skill))
        .route(
            "/api/v1/resumes/:id/:section/:entry_id",
            delete(resumes::handle_remove_entry),
        )
        // Letters
        .route(
            "/api/v1/letters/cover/generate",
            post(letters::handle_generate_cover_letter),
        )
        .route(
            "/api/v1/letters/cover/:id",
            put(letters::handle_update_cover_letter),
        )
        .route(
            "/api/v1/letters/cancellation",
            post(letters::handle_create_cancellation),
        )
        .route(
            "/api/v1/letters/cancellation/categories",
            get(letters::handle_list_categories),
        )
        .route(
            "/api/v1/letters/cancellation/:id",
            put(letters::handle_update_cancellation),
        )
        .route(
            "/api/v1/letters/cancellation/:id/category",
            post(letters::handle_apply_category),
        )
        .with_state(state)
}
