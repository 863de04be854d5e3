// Content synthesizer: rule-based cover letters and category-driven cancellation letters.
// Both strategies are deterministic; no network calls happen here.

pub mod cancellation;
pub mod cover_letter;
pub mod handlers;
pub mod keywords;
pub mod templates;
