//! Mock local session: who is logged in, and what logging out does to their documents.

pub mod handlers;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::resume::{validate_email, ValidationError};
use crate::models::session::Session;
use crate::store::{DocumentStore, Namespace, StoreError, SESSION_KEY};

/// What happens to document collections on logout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutPolicy {
    /// Documents stay in the namespace for the next login.
    #[default]
    Keep,
    /// All three collections are removed together with the session.
    Clear,
}

impl FromStr for LogoutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(LogoutPolicy::Keep),
            "clear" => Ok(LogoutPolicy::Clear),
            other => Err(format!("unknown logout policy '{other}' (expected keep or clear)")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and writes the `user` namespace key.
#[derive(Clone)]
pub struct SessionManager {
    namespace: Arc<dyn Namespace>,
    store: DocumentStore,
    policy: LogoutPolicy,
}

impl SessionManager {
    pub fn new(namespace: Arc<dyn Namespace>, store: DocumentStore, policy: LogoutPolicy) -> Self {
        Self {
            namespace,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> LogoutPolicy {
        self.policy
    }

    /// Mock login: no password check. The first name is the email's local part and the
    /// last name a placeholder. Existing collections are kept.
    pub fn login(&self, email: &str) -> Result<Session, SessionError> {
        validate_email(email)?;
        let email = email.trim();
        let first_name = email.split('@').next().unwrap_or_default().to_string();
        let session = Session {
            id: new_session_id(),
            first_name,
            last_name: "Utilisateur".to_string(),
            email: email.to_string(),
        };
        self.start(session, false)
    }

    /// Registration resets the three collections to empty.
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Session, SessionError> {
        for (value, field) in [(first_name, "first name"), (last_name, "last name")] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    entity: "registration",
                    field,
                }
                .into());
            }
        }
        validate_email(email)?;
        let session = Session {
            id: new_session_id(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
        };
        self.start(session, true)
    }

    fn start(&self, session: Session, reset_collections: bool) -> Result<Session, SessionError> {
        self.namespace
            .set(SESSION_KEY, serde_json::to_string(&session).map_err(StoreError::from)?)?;
        self.store.init_collections(reset_collections)?;
        info!("Session {} started for {}", session.id, session.email);
        Ok(session)
    }

    /// The active session, if any. A corrupt record reads as logged out.
    pub fn current(&self) -> Option<Session> {
        let raw = match self.namespace.get(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read session record: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Malformed session record, treating as logged out: {e}");
                None
            }
        }
    }

    /// Ends the session. Returns whether documents were cleared.
    pub fn logout(&self) -> Result<bool, SessionError> {
        self.namespace.remove(SESSION_KEY)?;
        let cleared = match self.policy {
            LogoutPolicy::Keep => false,
            LogoutPolicy::Clear => {
                self.store.clear()?;
                true
            }
        };
        info!("Session ended (documents cleared: {cleared})");
        Ok(cleared)
    }
}

fn new_session_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("user-{}", &uuid[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{PersonalInfo, ResumeContent, Theme};
    use crate::models::{DocumentContent, DocumentKind};
    use crate::store::MemoryNamespace;

    fn manager(policy: LogoutPolicy) -> (SessionManager, DocumentStore) {
        let ns: Arc<dyn Namespace> = Arc::new(MemoryNamespace::new());
        let store = DocumentStore::new(ns.clone());
        (SessionManager::new(ns, store.clone(), policy), store)
    }

    fn add_resume(store: &DocumentStore) {
        let content = DocumentContent::Resume(ResumeContent::new(
            PersonalInfo {
                first_name: "Jean".to_string(),
                last_name: "Dupont".to_string(),
                email: "jean@x.fr".to_string(),
                ..PersonalInfo::default()
            },
            Theme::Blue,
        ));
        let doc = store.new_document(content, None, None);
        store.add(DocumentKind::Resume, doc).unwrap();
    }

    #[test]
    fn test_login_derives_names_from_email() {
        let (sessions, _) = manager(LogoutPolicy::Keep);
        let session = sessions.login("jean.dupont@x.fr").unwrap();
        assert_eq!(session.first_name, "jean.dupont");
        assert_eq!(session.last_name, "Utilisateur");
        assert!(session.id.starts_with("user-"));
        assert_eq!(sessions.current(), Some(session));
    }

    #[test]
    fn test_login_rejects_invalid_email() {
        let (sessions, _) = manager(LogoutPolicy::Keep);
        assert!(sessions.login("nope").is_err());
        assert_eq!(sessions.current(), None);
    }

    #[test]
    fn test_register_requires_names() {
        let (sessions, _) = manager(LogoutPolicy::Keep);
        let err = sessions.register("", "Dupont", "jean@x.fr").unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }

    #[test]
    fn test_login_keeps_existing_documents_register_resets_them() {
        let (sessions, store) = manager(LogoutPolicy::Keep);
        add_resume(&store);
        sessions.login("jean@x.fr").unwrap();
        assert_eq!(store.list(DocumentKind::Resume).len(), 1);

        sessions.register("Jean", "Dupont", "jean@x.fr").unwrap();
        assert!(store.list(DocumentKind::Resume).is_empty());
    }

    #[test]
    fn test_logout_keep_policy_preserves_documents() {
        let (sessions, store) = manager(LogoutPolicy::Keep);
        sessions.login("jean@x.fr").unwrap();
        add_resume(&store);

        assert!(!sessions.logout().unwrap());
        assert_eq!(sessions.current(), None);
        assert_eq!(store.list(DocumentKind::Resume).len(), 1);
    }

    #[test]
    fn test_logout_clear_policy_removes_documents() {
        let (sessions, store) = manager(LogoutPolicy::Clear);
        sessions.login("jean@x.fr").unwrap();
        add_resume(&store);

        assert!(sessions.logout().unwrap());
        assert_eq!(sessions.current(), None);
        assert!(store.list_all_sorted_by_recency().is_empty());
    }

    #[test]
    fn test_policy_parses_from_config_strings() {
        assert_eq!("clear".parse::<LogoutPolicy>().unwrap(), LogoutPolicy::Clear);
        assert_eq!(" Keep ".parse::<LogoutPolicy>().unwrap(), LogoutPolicy::Keep);
        assert!("wipe".parse::<LogoutPolicy>().is_err());
    }
}
