//! Skill keyword extraction from free-text experience and education summaries.

/// Professional skill vocabulary, scanned in this order.
pub const SKILL_VOCABULARY: &[&str] = &[
    "communication",
    "leadership",
    "gestion",
    "analyse",
    "développement",
    "commerce",
    "vente",
    "marketing",
    "finance",
    "informatique",
    "programmation",
    "design",
    "créativité",
    "organisation",
    "planification",
    "résolution de problèmes",
    "travail d'équipe",
    "autonomie",
    "adaptabilité",
    "négociation",
    "rédaction",
    "langues",
    "stratégie",
    "innovation",
];

/// Used when no vocabulary term appears in the input.
pub const FALLBACK_KEYWORDS: [&str; 3] = ["polyvalence", "rigueur", "motivation"];

/// Vocabulary terms found as substrings of the lower-cased `experience + " " + formation`.
///
/// Result order is vocabulary order, never input order. Falls back to
/// [`FALLBACK_KEYWORDS`] when nothing matches.
pub fn extract_keywords(experience: &str, formation: &str) -> Vec<&'static str> {
    let text = format!("{} {}", experience.to_lowercase(), formation.to_lowercase());

    let found: Vec<&'static str> = SKILL_VOCABULARY
        .iter()
        .copied()
        .filter(|term| text.contains(term))
        .collect();

    if found.is_empty() {
        FALLBACK_KEYWORDS.to_vec()
    } else {
        found
    }
}
