pub mod document;
pub mod letters;
pub mod resume;
pub mod session;

pub use document::{Document, DocumentContent, DocumentId, DocumentKind, IdGenerator};
