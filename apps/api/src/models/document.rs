//! The persisted document unit and its identifiers.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::letters::{CancellationLetterContent, CoverLetterContent};
use crate::models::resume::ResumeContent;

// ────────────────────────────────────────────────────────────────────────────
// Document kind
// ────────────────────────────────────────────────────────────────────────────

/// The three document collections. Each kind is persisted under its own namespace key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[serde(alias = "cv")]
    Resume,
    #[serde(alias = "lettre-motivation")]
    CoverLetter,
    #[serde(alias = "resiliation")]
    CancellationLetter,
}

impl DocumentKind {
    /// All kinds, in dashboard merge order.
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Resume,
        DocumentKind::CoverLetter,
        DocumentKind::CancellationLetter,
    ];

    /// Namespace key holding this kind's JSON array.
    pub fn namespace_key(self) -> &'static str {
        match self {
            DocumentKind::Resume => "cvs",
            DocumentKind::CoverLetter => "motivationLetters",
            DocumentKind::CancellationLetter => "resiliations",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            DocumentKind::Resume => "cv",
            DocumentKind::CoverLetter => "letter",
            DocumentKind::CancellationLetter => "resiliation",
        }
    }

    /// Suffix used in exported file names (`Jean_Dupont_CV.pdf`).
    pub fn file_label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "CV",
            DocumentKind::CoverLetter => "LettreMotivation",
            DocumentKind::CancellationLetter => "Resiliation",
        }
    }

    /// Human-readable type name shown on the dashboard.
    pub fn display_name(self) -> &'static str {
        match self {
            DocumentKind::Resume => "CV",
            DocumentKind::CoverLetter => "Lettre de motivation",
            DocumentKind::CancellationLetter => "Lettre de résiliation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Document identifier: `<prefix>-<unix millis>-<sequence>`.
///
/// Ids produced by [`IdGenerator`] sort in creation order. Ids loaded from older
/// data may not follow the format; [`DocumentId::creation_key`] returns `None` for those.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(millis, sequence)` parsed from the id, if it was generated by this service.
    pub fn creation_key(&self) -> Option<(u64, u32)> {
        let mut parts = self.0.rsplitn(3, '-');
        let sequence = parts.next()?.parse::<u32>().ok()?;
        let millis = parts.next()?.parse::<u64>().ok()?;
        // Require a prefix so bare "123-4" strings don't masquerade as generated ids.
        parts.next().filter(|p| !p.is_empty())?;
        Some((millis, sequence))
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out strictly increasing ids even when two documents are created in the same millisecond
/// or the wall clock steps backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Mutex<(u64, u32)>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, kind: DocumentKind, now: DateTime<Utc>) -> DocumentId {
        let millis = now.timestamp_millis().max(0) as u64;
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        *last = if millis > last.0 {
            (millis, 0)
        } else {
            (last.0, last.1 + 1)
        };
        DocumentId(format!("{}-{:013}-{:04}", kind.id_prefix(), last.0, last.1))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// Variant payload. Each kind carries only its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentContent {
    Resume(ResumeContent),
    CoverLetter(CoverLetterContent),
    CancellationLetter(CancellationLetterContent),
}

impl DocumentContent {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentContent::Resume(_) => DocumentKind::Resume,
            DocumentContent::CoverLetter(_) => DocumentKind::CoverLetter,
            DocumentContent::CancellationLetter(_) => DocumentKind::CancellationLetter,
        }
    }

    /// First and last name of the person the document is written by.
    pub fn author_name(&self) -> (&str, &str) {
        match self {
            DocumentContent::Resume(resume) => (
                &resume.personal_info.first_name,
                &resume.personal_info.last_name,
            ),
            DocumentContent::CoverLetter(letter) => {
                (&letter.applicant.first_name, &letter.applicant.last_name)
            }
            DocumentContent::CancellationLetter(letter) => {
                (&letter.sender.first_name, &letter.sender.last_name)
            }
        }
    }

    /// Default display title derived from the content.
    pub fn default_name(&self) -> String {
        match self {
            DocumentContent::Resume(resume) => format!(
                "CV - {} {}",
                resume.personal_info.first_name, resume.personal_info.last_name
            ),
            DocumentContent::CoverLetter(letter) => {
                format!("Lettre - {} - {}", letter.company, letter.role)
            }
            DocumentContent::CancellationLetter(letter) => {
                format!("Résiliation - {}", letter.recipient.name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    /// Creation or last re-save time.
    pub date: DateTime<Utc>,
    /// Session that wrote the document. A lookup key only; documents outlive sessions.
    #[serde(default)]
    pub owner_id: Option<String>,
    pub content: DocumentContent,
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        self.content.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_increase_within_same_millisecond() {
        let ids = IdGenerator::new();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next(DocumentKind::Resume, now);
        let b = ids.next(DocumentKind::CoverLetter, now);
        assert_eq!(a.as_str(), "cv-1700000000000-0000");
        assert_eq!(b.as_str(), "letter-1700000000000-0001");
        assert!(a.creation_key() < b.creation_key());
    }

    #[test]
    fn test_ids_survive_clock_going_backwards() {
        let ids = IdGenerator::new();
        let later = Utc.timestamp_millis_opt(1_700_000_000_500).unwrap();
        let earlier = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next(DocumentKind::Resume, later);
        let b = ids.next(DocumentKind::Resume, earlier);
        assert!(a.creation_key() < b.creation_key());
    }

    #[test]
    fn test_creation_key_rejects_foreign_ids() {
        assert_eq!(DocumentId::from("letter-1699999999999").creation_key(), None);
        assert_eq!(DocumentId::from("123-4").creation_key(), None);
        assert_eq!(
            DocumentId::from("resiliation-0000000000042-0007").creation_key(),
            Some((42, 7))
        );
    }

    #[test]
    fn test_kind_accepts_legacy_aliases() {
        let kind: DocumentKind = serde_json::from_str(r#""lettre-motivation""#).unwrap();
        assert_eq!(kind, DocumentKind::CoverLetter);
        let kind: DocumentKind = serde_json::from_str(r#""cv""#).unwrap();
        assert_eq!(kind, DocumentKind::Resume);
    }

    #[test]
    fn test_document_content_is_tagged() {
        let content = DocumentContent::Resume(ResumeContent::default());
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "resume");
        let back: DocumentContent = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), DocumentKind::Resume);
    }
}
