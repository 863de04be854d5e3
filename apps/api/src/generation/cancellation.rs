//! Category-driven cancellation letter bodies.
//!
//! Selecting a category is a destructive state transition: the body is replaced by the
//! category boilerplate whatever it contained before. The transition reports whether
//! hand-written text was thrown away so the caller can warn about it.

use serde::Serialize;

use crate::generation::templates::{
    CANCEL_GYM, CANCEL_INSURANCE, CANCEL_LEASE, CANCEL_OTHER, CANCEL_SUBSCRIPTION,
};
use crate::models::letters::{CancellationCategory, CancellationLetterContent};

/// Boilerplate body for a category. Pure lookup.
pub fn boilerplate(category: CancellationCategory) -> &'static str {
    match category {
        CancellationCategory::Subscription => CANCEL_SUBSCRIPTION,
        CancellationCategory::Insurance => CANCEL_INSURANCE,
        CancellationCategory::Lease => CANCEL_LEASE,
        CancellationCategory::Gym => CANCEL_GYM,
        CancellationCategory::Other => CANCEL_OTHER,
    }
}

/// Outcome of [`apply_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTransition {
    pub from: Option<CancellationCategory>,
    pub to: CancellationCategory,
    /// The replaced body differed from the previous category's boilerplate.
    pub discarded_manual_edits: bool,
}

/// True when the body holds text the user wrote rather than untouched boilerplate.
pub fn has_manual_edits(letter: &CancellationLetterContent) -> bool {
    match letter.category {
        Some(category) => letter.body != boilerplate(category),
        None => !letter.body.trim().is_empty(),
    }
}

/// Replaces `letter.body` with the boilerplate for `category`, unconditionally.
pub fn apply_category(
    letter: &mut CancellationLetterContent,
    category: CancellationCategory,
) -> CategoryTransition {
    let transition = CategoryTransition {
        from: letter.category,
        to: category,
        discarded_manual_edits: has_manual_edits(letter),
    };
    letter.category = Some(category);
    letter.body = boilerplate(category).to_string();
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::letters::{Recipient, Sender};

    fn letter() -> CancellationLetterContent {
        CancellationLetterContent::new(
            Sender {
                first_name: "Jean".to_string(),
                last_name: "Dupont".to_string(),
                ..Sender::default()
            },
            Recipient {
                name: "Immo Gestion".to_string(),
                ..Recipient::default()
            },
            "BAIL-2021-042".to_string(),
        )
    }

    #[test]
    fn test_lease_has_notice_period_and_gym_does_not() {
        assert!(boilerplate(CancellationCategory::Lease).contains("préavis"));
        assert!(!boilerplate(CancellationCategory::Gym).contains("préavis"));
    }

    #[test]
    fn test_insurance_cites_consumer_law() {
        assert!(boilerplate(CancellationCategory::Insurance).contains("loi Hamon/Chatel"));
    }

    #[test]
    fn test_every_category_has_three_paragraphs() {
        for category in CancellationCategory::ALL {
            assert_eq!(boilerplate(category).split("\n\n").count(), 3, "{category:?}");
        }
    }

    #[test]
    fn test_reselecting_overwrites_manual_edit() {
        let mut letter = letter();
        apply_category(&mut letter, CancellationCategory::Lease);
        let first = letter.body.clone();

        letter.body.push_str("\n\nP.S. Merci pour tout.");
        let transition = apply_category(&mut letter, CancellationCategory::Lease);

        assert_eq!(letter.body, first);
        assert!(transition.discarded_manual_edits);
        assert_eq!(transition.from, Some(CancellationCategory::Lease));
    }

    #[test]
    fn test_switching_untouched_boilerplate_discards_nothing() {
        let mut letter = letter();
        let first = apply_category(&mut letter, CancellationCategory::Gym);
        assert!(!first.discarded_manual_edits);
        assert_eq!(first.from, None);

        let second = apply_category(&mut letter, CancellationCategory::Subscription);
        assert!(!second.discarded_manual_edits);
        assert_eq!(letter.body, boilerplate(CancellationCategory::Subscription));
        assert_eq!(letter.category, Some(CancellationCategory::Subscription));
    }

    #[test]
    fn test_text_written_before_any_category_counts_as_edit() {
        let mut letter = letter();
        letter.body = "Je pars.".to_string();
        assert!(has_manual_edits(&letter));
        let transition = apply_category(&mut letter, CancellationCategory::Other);
        assert!(transition.discarded_manual_edits);
        assert!(!has_manual_edits(&letter));
    }
}
