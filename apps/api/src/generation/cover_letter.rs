//! Cover-letter body synthesis.
//!
//! The writer is pluggable behind [`LetterWriter`]; [`RuleBasedLetterWriter`] is the
//! default backend: keyword extraction plus a fixed template, fully deterministic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::generation::keywords::extract_keywords;
use crate::generation::templates::{
    CLOSING_FORMULA, FIT_PARAGRAPH, GRADUATE_FRAMING, GRADUATE_MARKER, INTERVIEW_PARAGRAPH,
    MOTIVATION_PARAGRAPH_TAIL, PROFESSIONAL_FRAMING, SALUTATION,
};

/// The facts a cover letter is written from. Empty fields are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterFacts {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub formation: String,
}

/// Swappable letter-writing backend, carried in `AppState` as `Arc<dyn LetterWriter>`.
#[async_trait]
pub trait LetterWriter: Send + Sync {
    /// Short backend name, reported back to callers.
    fn backend(&self) -> &'static str;

    async fn write(&self, facts: &CoverLetterFacts) -> String;
}

pub struct RuleBasedLetterWriter;

#[async_trait]
impl LetterWriter for RuleBasedLetterWriter {
    fn backend(&self) -> &'static str {
        "rule_based"
    }

    async fn write(&self, facts: &CoverLetterFacts) -> String {
        compose_cover_letter(facts)
    }
}

/// Salutation, introduction, background, skills, fit, interview request, closing, signature.
pub fn compose_cover_letter(facts: &CoverLetterFacts) -> String {
    let keywords = extract_keywords(&facts.experience, &facts.formation);
    let top_skills = keywords
        .iter()
        .take(3)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    let framing = if facts.experience.contains(GRADUATE_MARKER) {
        GRADUATE_FRAMING
    } else {
        PROFESSIONAL_FRAMING
    };

    let paragraphs = [
        SALUTATION.to_string(),
        format!(
            "Je me permets de vous adresser ma candidature pour le poste de {} au sein de votre entreprise {}, que j'ai découvert récemment.",
            facts.role, facts.company
        ),
        format!(
            "Actuellement {} en {}, je possède une solide expérience dans ce domaine. {}",
            framing, facts.formation, facts.experience
        ),
        format!(
            "Au cours de mon parcours, j'ai développé des compétences en {}, {}",
            top_skills, MOTIVATION_PARAGRAPH_TAIL
        ),
        FIT_PARAGRAPH.to_string(),
        INTERVIEW_PARAGRAPH.to_string(),
        CLOSING_FORMULA.to_string(),
        format!("{} {}", facts.first_name, facts.last_name),
    ];

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> CoverLetterFacts {
        CoverLetterFacts {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            role: "Chef de projet".to_string(),
            company: "Acme".to_string(),
            experience: "J'ai dirigé des projets de développement et de gestion.".to_string(),
            formation: "Master en management et communication".to_string(),
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(compose_cover_letter(&facts()), compose_cover_letter(&facts()));
    }

    #[test]
    fn test_letter_has_all_sections_in_order() {
        let letter = compose_cover_letter(&facts());
        assert!(letter.starts_with("Madame, Monsieur,\n\n"));
        assert!(letter.ends_with("salutations distinguées.\n\nJean Dupont"));

        let intro = letter.find("poste de Chef de projet au sein de votre entreprise Acme").unwrap();
        let skills = letter.find("compétences en").unwrap();
        let interview = letter.find("entretien").unwrap();
        assert!(intro < skills && skills < interview);
    }

    #[test]
    fn test_top_three_keywords_in_vocabulary_order() {
        let letter = compose_cover_letter(&facts());
        assert!(letter.contains("compétences en communication, gestion, développement, qui"));
    }

    #[test]
    fn test_professional_framing_by_default() {
        let letter = compose_cover_letter(&facts());
        assert!(letter.contains("Actuellement professionnel(le) en Master en management"));
        assert!(letter.contains("dans ce domaine. J'ai dirigé des projets"));
    }

    #[test]
    fn test_graduate_marker_switches_framing() {
        let mut facts = facts();
        facts.experience = "Récemment diplômé, j'ai effectué un stage.".to_string();
        let letter = compose_cover_letter(&facts);
        assert!(letter.contains("Actuellement diplômé(e) en"));
    }

    #[test]
    fn test_empty_facts_still_produce_a_letter_with_fallback_keywords() {
        let letter = compose_cover_letter(&CoverLetterFacts::default());
        assert!(!letter.is_empty());
        assert!(letter.contains("compétences en polyvalence, rigueur, motivation"));
        assert!(letter.contains("poste de  au sein de votre entreprise ,"));
    }

    #[tokio::test]
    async fn test_rule_based_writer_matches_template() {
        let writer = RuleBasedLetterWriter;
        assert_eq!(writer.write(&facts()).await, compose_cover_letter(&facts()));
        assert_eq!(writer.backend(), "rule_based");
    }
}
