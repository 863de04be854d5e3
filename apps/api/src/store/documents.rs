use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{Document, DocumentContent, DocumentId, DocumentKind, IdGenerator};
use crate::store::{Namespace, StoreError};

/// Typed document collections over an injected [`Namespace`].
///
/// Each kind lives under its own key as a JSON array. Mutations are whole-collection
/// read-modify-write cycles, serialized by a write lock and persisted before returning.
#[derive(Clone)]
pub struct DocumentStore {
    namespace: Arc<dyn Namespace>,
    ids: Arc<IdGenerator>,
    write_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    pub fn new(namespace: Arc<dyn Namespace>) -> Self {
        Self {
            namespace,
            ids: Arc::new(IdGenerator::new()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Builds a new document with a fresh id, stamped `now`. Does not persist it.
    pub fn new_document(
        &self,
        content: DocumentContent,
        name: Option<String>,
        owner_id: Option<String>,
    ) -> Document {
        let now = Utc::now();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| content.default_name());
        Document {
            id: self.ids.next(content.kind(), now),
            name,
            date: now,
            owner_id,
            content,
        }
    }

    /// Returns the collection for `kind`, or `[]` when it is absent or unreadable.
    pub fn list(&self, kind: DocumentKind) -> Vec<Document> {
        let raw = match self.namespace.get(kind.namespace_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read {} collection, treating as empty: {e}", kind);
                return Vec::new();
            }
        };

        let documents: Vec<Document> = match serde_json::from_str(&raw) {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Malformed {} collection, treating as empty: {e}", kind);
                return Vec::new();
            }
        };

        let total = documents.len();
        let documents: Vec<Document> = documents.into_iter().filter(|d| d.kind() == kind).collect();
        if documents.len() != total {
            warn!(
                "Dropped {} foreign documents from the {} collection",
                total - documents.len(),
                kind
            );
        }
        documents
    }

    pub fn get(&self, kind: DocumentKind, id: &DocumentId) -> Option<Document> {
        self.list(kind).into_iter().find(|d| &d.id == id)
    }

    /// Appends `document` to the `kind` collection, creating the collection if needed.
    pub fn add(&self, kind: DocumentKind, document: Document) -> Result<(), StoreError> {
        ensure_kind(kind, &document)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut documents = self.list(kind);
        if documents.iter().any(|d| d.id == document.id) {
            return Err(StoreError::DuplicateId {
                kind,
                id: document.id.to_string(),
            });
        }

        info!("Adding {} {} ({})", kind, document.id, document.name);
        documents.push(document);
        self.persist(kind, &documents)
    }

    /// Re-saves an existing document, refreshing its date. Position in the collection is kept.
    pub fn update(&self, kind: DocumentKind, mut document: Document) -> Result<Document, StoreError> {
        ensure_kind(kind, &document)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut documents = self.list(kind);
        let slot = documents
            .iter_mut()
            .find(|d| d.id == document.id)
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: document.id.to_string(),
            })?;

        document.date = Utc::now();
        *slot = document.clone();
        info!("Re-saved {} {}", kind, document.id);
        self.persist(kind, &documents)?;
        Ok(document)
    }

    /// Removes the document with `id`. Returns whether anything was removed; absent ids are a no-op.
    pub fn remove(&self, kind: DocumentKind, id: &DocumentId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut documents = self.list(kind);
        let before = documents.len();
        documents.retain(|d| &d.id != id);
        if documents.len() == before {
            debug!("Remove of {} {} was a no-op", kind, id);
            return Ok(false);
        }

        info!("Removed {} {}", kind, id);
        self.persist(kind, &documents)?;
        Ok(true)
    }

    /// All documents, newest first.
    ///
    /// Equal dates keep creation order (from the monotonic id), and documents whose ids
    /// carry no creation key keep their merge order.
    pub fn list_all_sorted_by_recency(&self) -> Vec<Document> {
        let mut all: Vec<Document> = DocumentKind::ALL
            .iter()
            .flat_map(|&kind| self.list(kind))
            .collect();
        sort_by_recency(&mut all);
        all
    }

    /// Writes `[]` for each collection. With `reset`, existing collections are emptied too.
    pub fn init_collections(&self, reset: bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        for kind in DocumentKind::ALL {
            let key = kind.namespace_key();
            if reset || self.namespace.get(key)?.is_none() {
                self.namespace.set(key, "[]".to_string())?;
            }
        }
        Ok(())
    }

    /// Drops every collection from the namespace.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        for kind in DocumentKind::ALL {
            self.namespace.remove(kind.namespace_key())?;
        }
        info!("Cleared all document collections");
        Ok(())
    }

    fn persist(&self, kind: DocumentKind, documents: &[Document]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(documents)?;
        self.namespace.set(kind.namespace_key(), raw)
    }
}

fn ensure_kind(expected: DocumentKind, document: &Document) -> Result<(), StoreError> {
    let found = document.kind();
    if found != expected {
        return Err(StoreError::KindMismatch { expected, found });
    }
    Ok(())
}

/// Orders newest date first, then by creation key, then by merge position.
///
/// A document whose id carries no creation key takes the key of the closest earlier
/// document of the same kind, so it never jumps ahead of entries inserted before it.
pub(crate) fn sort_by_recency(documents: &mut Vec<Document>) {
    let mut inherited: Option<(DocumentKind, (u64, u32))> = None;
    let mut keyed: Vec<_> = documents
        .drain(..)
        .enumerate()
        .map(|(position, document)| {
            let kind = document.kind();
            let creation = match document.id.creation_key() {
                Some(key) => key,
                None => inherited
                    .filter(|(previous, _)| *previous == kind)
                    .map_or((0, 0), |(_, key)| key),
            };
            inherited = Some((kind, creation));
            ((Reverse(document.date), creation, position), document)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    documents.extend(keyed.into_iter().map(|(_, document)| document));
}
