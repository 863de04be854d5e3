use std::sync::Arc;

use crate::config::Config;
use crate::export::{ExportError, ExportPipeline};
use crate::generation::cover_letter::{LetterWriter, RuleBasedLetterWriter};
use crate::notify::Notifier;
use crate::session::SessionManager;
use crate::store::{DocumentStore, Namespace};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub sessions: SessionManager,
    /// Pluggable cover-letter backend. Default: RuleBasedLetterWriter.
    pub letter_writer: Arc<dyn LetterWriter>,
    pub exporter: Arc<ExportPipeline>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}

impl AppState {
    /// Wires the store and session manager onto one namespace.
    pub fn new(
        config: Config,
        namespace: Arc<dyn Namespace>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ExportError> {
        let store = DocumentStore::new(namespace.clone());
        let sessions = SessionManager::new(namespace, store.clone(), config.logout_policy);
        let exporter = Arc::new(ExportPipeline::new(config.export_config())?);
        Ok(Self {
            store,
            sessions,
            letter_writer: Arc::new(RuleBasedLetterWriter),
            exporter,
            notifier,
            config,
        })
    }
}
