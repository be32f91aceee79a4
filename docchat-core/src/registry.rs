//! Client-side mirror of the backend's document set.
//!
//! Mutated only after the backend confirmed an ingestion or deletion. Chat
//! input availability is derived from emptiness, so "registry is empty"
//! and "chat input is disabled" cannot drift apart.

use std::collections::HashSet;

use crate::types::{Document, DocumentId};

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    /// Documents with a delete request in flight
    deleting: HashSet<DocumentId>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingested document in arrival order.
    ///
    /// A document whose id is already present replaces the existing entry
    /// in place.
    pub fn add(&mut self, document: Document) {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.id == document.id) {
            tracing::warn!(id = %document.id, "Document already registered, replacing entry");
            *existing = document;
            return;
        }
        tracing::debug!(id = %document.id, kind = document.kind.label(), "Document added");
        self.documents.push(document);
    }

    /// Remove a deleted document.
    pub fn remove(&mut self, id: &DocumentId) -> Option<Document> {
        self.deleting.remove(id);
        let idx = self.documents.iter().position(|d| &d.id == id)?;
        let removed = self.documents.remove(idx);
        if self.documents.is_empty() {
            tracing::debug!("Last document removed, chat input disabled");
        }
        Some(removed)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Document at a list position (for list selection in the UI)
    pub fn at(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// Chat input is available iff at least one document exists.
    pub fn chat_input_enabled(&self) -> bool {
        !self.is_empty()
    }

    /// Mark a delete as issued. Returns false if the document is unknown
    /// or already being deleted.
    pub fn begin_delete(&mut self, id: &DocumentId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.deleting.insert(id.clone())
    }

    /// The backend refused (or never answered) a delete; the entry stays.
    pub fn abort_delete(&mut self, id: &DocumentId) {
        self.deleting.remove(id);
    }

    pub fn is_deleting(&self, id: &DocumentId) -> bool {
        self.deleting.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentKind;

    fn doc(id: &str, name: &str) -> Document {
        Document {
            id: DocumentId::from(id),
            kind: DocumentKind::Pdf,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_chat_input_tracks_emptiness() {
        let mut registry = DocumentRegistry::new();
        assert!(!registry.chat_input_enabled());

        registry.add(doc("a", "a.pdf"));
        registry.add(doc("b", "b.pdf"));
        assert!(registry.chat_input_enabled());

        registry.remove(&DocumentId::from("a"));
        assert!(registry.chat_input_enabled());

        registry.remove(&DocumentId::from("b"));
        assert!(registry.is_empty());
        assert!(!registry.chat_input_enabled());
    }

    #[test]
    fn test_invariant_holds_for_mixed_sequences() {
        let mut registry = DocumentRegistry::new();
        let ops: [(bool, &str); 9] = [
            (true, "1"),
            (false, "1"),
            (false, "1"),
            (true, "2"),
            (true, "3"),
            (true, "2"),
            (false, "3"),
            (false, "missing"),
            (false, "2"),
        ];
        for (is_add, id) in ops {
            if is_add {
                registry.add(doc(id, id));
            } else {
                registry.remove(&DocumentId::from(id));
            }
            assert_eq!(registry.chat_input_enabled(), registry.len() > 0);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let mut registry = DocumentRegistry::new();
        registry.add(doc("a", "old.pdf"));
        registry.add(doc("b", "b.pdf"));
        registry.add(doc("a", "new.pdf"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.at(0).unwrap().name, "new.pdf");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = DocumentRegistry::new();
        registry.add(doc("a", "a.pdf"));
        assert!(registry.remove(&DocumentId::from("zzz")).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_pending_delete_blocks_second_press() {
        let mut registry = DocumentRegistry::new();
        registry.add(doc("a", "a.pdf"));
        let id = DocumentId::from("a");

        assert!(registry.begin_delete(&id));
        assert!(!registry.begin_delete(&id));
        assert!(registry.is_deleting(&id));

        registry.abort_delete(&id);
        assert!(!registry.is_deleting(&id));
        assert!(registry.begin_delete(&id));

        registry.remove(&id);
        assert!(!registry.is_deleting(&id));
        assert!(!registry.begin_delete(&id));
    }
}
