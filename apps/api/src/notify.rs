//! User-facing notifications: every user-triggered action reports a start and then
//! exactly one of success or failure.

use std::fmt::Display;
use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Login,
    Logout,
    CreateDocument,
    SaveDocument,
    DeleteDocument,
    AddEntry,
    RemoveEntry,
    GenerateLetter,
    ApplyCategory,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Started,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub action: Action,
    pub phase: Phase,
    pub title: &'static str,
    pub description: &'static str,
}

impl Action {
    fn started(self) -> (&'static str, &'static str) {
        match self {
            Action::Login => ("Connexion", "Connexion en cours..."),
            Action::Logout => ("Déconnexion", "Déconnexion en cours..."),
            Action::CreateDocument | Action::SaveDocument => {
                ("Enregistrement", "Enregistrement de votre document en cours...")
            }
            Action::DeleteDocument => ("Suppression", "Suppression du document en cours..."),
            Action::AddEntry => ("Ajout", "Ajout de l'élément en cours..."),
            Action::RemoveEntry => ("Suppression", "Suppression de l'élément en cours..."),
            Action::GenerateLetter => (
                "DocuGen en action",
                "Génération de votre lettre de motivation en cours...",
            ),
            Action::ApplyCategory => ("Modèle", "Application du modèle de lettre..."),
            Action::Export => (
                "Préparation du téléchargement",
                "Génération de votre document en cours...",
            ),
        }
    }

    fn succeeded(self) -> (&'static str, &'static str) {
        match self {
            Action::Login => ("Connexion réussie", "Vous êtes maintenant connecté à votre compte."),
            Action::Logout => ("Déconnecté", "Vous avez été déconnecté."),
            Action::CreateDocument | Action::SaveDocument => {
                ("Document enregistré", "Votre document a été enregistré.")
            }
            Action::DeleteDocument => ("Document supprimé", "Le document a été supprimé."),
            Action::AddEntry => ("Élément ajouté", "L'élément a été ajouté à votre CV."),
            Action::RemoveEntry => ("Élément supprimé", "L'élément a été retiré de votre CV."),
            Action::GenerateLetter => (
                "Lettre générée avec succès!",
                "Votre lettre de motivation a été créée par DocuGen AI.",
            ),
            Action::ApplyCategory => ("Modèle appliqué", "Le contenu de la lettre a été prérempli."),
            Action::Export => (
                "Document téléchargé",
                "Votre document a été enregistré au format PDF.",
            ),
        }
    }

    fn failed(self) -> (&'static str, &'static str) {
        match self {
            Action::AddEntry => (
                "Informations incomplètes",
                "Veuillez remplir les champs obligatoires.",
            ),
            Action::Export => ("Erreur", "Un problème est survenu lors du téléchargement."),
            Action::GenerateLetter => ("Erreur", "Un problème est survenu lors de la génération."),
            _ => ("Erreur", "Un problème est survenu."),
        }
    }

    pub fn notification(self, phase: Phase) -> Notification {
        let (title, description) = match phase {
            Phase::Started => self.started(),
            Phase::Succeeded => self.succeeded(),
            Phase::Failed => self.failed(),
        };
        Notification {
            action: self,
            phase,
            title,
            description,
        }
    }
}

/// Delivery channel for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as structured log events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.phase {
            Phase::Failed => error!(action = ?n.action, "{}: {}", n.title, n.description),
            _ => info!(action = ?n.action, phase = ?n.phase, "{}: {}", n.title, n.description),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}

/// Runs `work` between a start notification and its success or failure notification.
pub async fn tracked<T, E, F>(notifier: &dyn Notifier, action: Action, work: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    notifier.notify(action.notification(Phase::Started));
    let result = work.await;
    match &result {
        Ok(_) => notifier.notify(action.notification(Phase::Succeeded)),
        Err(e) => {
            error!(action = ?action, "Action failed: {e}");
            notifier.notify(action.notification(Phase::Failed));
        }
    }
    result
}
