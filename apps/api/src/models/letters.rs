use serde::{Deserialize, Serialize};

/// Contact block of the cover-letter applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterContent {
    pub applicant: Applicant,
    pub company: String,
    pub role: String,
    /// Free-text experience summary the body was generated from.
    #[serde(default)]
    pub experience: String,
    /// Free-text education summary the body was generated from.
    #[serde(default)]
    pub formation: String,
    pub body: String,
}

/// Kind of contract being cancelled. Drives the boilerplate body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationCategory {
    /// Phone, internet, streaming.
    #[serde(alias = "abonnement")]
    Subscription,
    #[serde(alias = "assurance")]
    Insurance,
    /// Residential lease.
    #[serde(alias = "bail")]
    Lease,
    #[serde(alias = "salle_sport")]
    Gym,
    #[serde(alias = "autre")]
    Other,
}

impl CancellationCategory {
    pub const ALL: [CancellationCategory; 5] = [
        CancellationCategory::Subscription,
        CancellationCategory::Insurance,
        CancellationCategory::Lease,
        CancellationCategory::Gym,
        CancellationCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CancellationCategory::Subscription => "Abonnement (téléphone, internet, streaming)",
            CancellationCategory::Insurance => "Assurance (auto, habitation, santé)",
            CancellationCategory::Lease => "Bail locatif",
            CancellationCategory::Gym => "Salle de sport",
            CancellationCategory::Other => "Autre service",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
}

pub const DEFAULT_CANCELLATION_SUBJECT: &str = "Résiliation de contrat";

fn default_subject() -> String {
    DEFAULT_CANCELLATION_SUBJECT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationLetterContent {
    pub sender: Sender,
    pub recipient: Recipient,
    /// Last category applied to the body, if any.
    #[serde(default)]
    pub category: Option<CancellationCategory>,
    /// Customer or contract reference.
    #[serde(default)]
    pub reference: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl CancellationLetterContent {
    pub fn new(sender: Sender, recipient: Recipient, reference: String) -> Self {
        Self {
            sender,
            recipient,
            category: None,
            reference,
            subject: default_subject(),
            body: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_accepts_french_wire_names() {
        let c: CancellationCategory = serde_json::from_str(r#""bail""#).unwrap();
        assert_eq!(c, CancellationCategory::Lease);
        let c: CancellationCategory = serde_json::from_str(r#""salle_sport""#).unwrap();
        assert_eq!(c, CancellationCategory::Gym);
        let c: CancellationCategory = serde_json::from_str(r#""insurance""#).unwrap();
        assert_eq!(c, CancellationCategory::Insurance);
    }

    #[test]
    fn test_subject_defaults_when_missing() {
        let letter: CancellationLetterContent = serde_json::from_str(
            r#"{"sender": {"first_name": "Jean", "last_name": "Dupont"},
                "recipient": {"name": "FitClub"}}"#,
        )
        .unwrap();
        assert_eq!(letter.subject, DEFAULT_CANCELLATION_SUBJECT);
        assert_eq!(letter.category, None);
        assert!(letter.body.is_empty());
    }
}
