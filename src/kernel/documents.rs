//! Open documents, tab order and the active-document pointer.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::TextBuffer;

new_key_type! { pub struct DocumentId; }

/// Where a document lives. Untitled documents carry their session-unique number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DocumentPath {
    File(PathBuf),
    Untitled(u64),
}

impl DocumentPath {
    pub fn file(&self) -> Option<&Path> {
        match self {
            DocumentPath::File(path) => Some(path),
            DocumentPath::Untitled(_) => None,
        }
    }

    pub fn is_untitled(&self) -> bool {
        matches!(self, DocumentPath::Untitled(_))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentPath::File(path) => write!(f, "{}", path.display()),
            DocumentPath::Untitled(n) => write!(f, "untitled-{n}"),
        }
    }
}

#[derive(Debug)]
pub struct Document {
    path: DocumentPath,
    label: String,
    buffer: TextBuffer,
    original_content: String,
}

impl Document {
    fn new(path: DocumentPath, label: String, content: String) -> Self {
        Self {
            path,
            label,
            buffer: TextBuffer::from_text(&content),
            original_content: content,
        }
    }

    pub fn path(&self) -> &DocumentPath {
        &self.path
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.path.file()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn content(&self) -> String {
        self.buffer.text()
    }

    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    /// `.log` files are output, not drafts.
    pub fn tracks_changes(&self) -> bool {
        !self
            .file_path()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("log"))
    }

    pub fn is_dirty(&self) -> bool {
        self.tracks_changes() && !self.buffer.content_eq(&self.original_content)
    }

    pub fn mark_saved(&mut self) {
        self.original_content = self.buffer.text();
    }
}

pub fn label_for_path(path: &Path) -> String {
    crate::models::file_tree::file_name_of(path)
}

#[derive(Debug)]
pub struct DocumentStore {
    docs: SlotMap<DocumentId, Document>,
    by_path: FxHashMap<DocumentPath, DocumentId>,
    tabs: Vec<DocumentId>,
    active: Option<DocumentId>,
    next_untitled: u64,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            docs: SlotMap::with_key(),
            by_path: FxHashMap::default(),
            tabs: Vec::new(),
            active: None,
            next_untitled: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The number the next untitled document will get.
    pub fn untitled_counter(&self) -> u64 {
        self.next_untitled
    }

    pub fn tabs(&self) -> &[DocumentId] {
        &self.tabs
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.docs.get(id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.docs.get_mut(id)
    }

    pub fn find(&self, path: &DocumentPath) -> Option<DocumentId> {
        self.by_path.get(path).copied()
    }

    pub fn find_file(&self, path: &Path) -> Option<DocumentId> {
        self.find(&DocumentPath::File(path.to_path_buf()))
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.and_then(|id| self.docs.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        self.active.and_then(|id| self.docs.get_mut(id))
    }

    /// Open `path`, reusing an existing document for it.
    ///
    /// Returns the document and whether it was newly created. Either way it
    /// ends up active.
    pub fn open(&mut self, path: DocumentPath, content: String, label: String) -> (DocumentId, bool) {
        if let Some(id) = self.find(&path) {
            self.activate(id);
            return (id, false);
        }
        let id = self.docs.insert(Document::new(path.clone(), label, content));
        self.by_path.insert(path, id);
        self.tabs.push(id);
        self.active = Some(id);
        (id, true)
    }

    pub fn create_untitled(&mut self) -> DocumentId {
        self.create_untitled_with(String::new(), None)
    }

    /// Untitled document seeded with `content`; `label` falls back to `Untitled N`.
    pub fn create_untitled_with(&mut self, content: String, label: Option<String>) -> DocumentId {
        let n = self.next_untitled;
        self.next_untitled += 1;
        let label = label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("Untitled {n}"));
        let (id, _) = self.open(DocumentPath::Untitled(n), content, label);
        id
    }

    /// Move an existing document onto a real file, keeping its buffer and tab.
    ///
    /// `saved` is what landed on disk and becomes the dirty baseline. The
    /// buffer is left alone, so edits made while the save was in flight stay.
    pub fn rebind(&mut self, id: DocumentId, path: PathBuf, label: String, saved: String) -> bool {
        let new_key = DocumentPath::File(path);
        if self.by_path.get(&new_key).is_some_and(|other| *other != id) {
            return false;
        }
        let Some(doc) = self.docs.get_mut(id) else {
            return false;
        };
        self.by_path.remove(&doc.path);
        doc.label = label;
        doc.path = new_key.clone();
        doc.original_content = saved;
        self.by_path.insert(new_key, id);
        true
    }

    pub fn activate(&mut self, id: DocumentId) -> bool {
        if !self.docs.contains_key(id) || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Drop a document and its tab.
    ///
    /// When the active document goes the first remaining tab takes over; when
    /// none remain a fresh untitled document is created.
    pub fn remove(&mut self, id: DocumentId) -> Option<Document> {
        let doc = self.docs.remove(id)?;
        self.by_path.remove(&doc.path);
        self.tabs.retain(|t| *t != id);

        if self.active == Some(id) {
            self.active = self.tabs.first().copied();
        }
        if self.tabs.is_empty() {
            self.create_untitled();
        }
        Some(doc)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tabs.len() || from == to {
            return false;
        }
        let id = self.tabs.remove(from);
        let to = to.min(self.tabs.len());
        self.tabs.insert(to, id);
        true
    }

    pub fn is_dirty(&self, id: DocumentId) -> bool {
        self.docs.get(id).is_some_and(Document::is_dirty)
    }

    pub fn mark_saved(&mut self, id: DocumentId) -> bool {
        match self.docs.get_mut(id) {
            Some(doc) => {
                doc.mark_saved();
                true
            }
            None => false,
        }
    }

    /// Rekey every document at or beneath `from` after a rename on disk.
    pub fn rename_path(&mut self, from: &Path, to: &Path) -> Vec<DocumentId> {
        let moved: Vec<(DocumentId, PathBuf)> = self
            .docs
            .iter()
            .filter_map(|(id, doc)| {
                let file = doc.file_path()?;
                let rest = file.strip_prefix(from).ok()?;
                let target = if rest.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(rest)
                };
                Some((id, target))
            })
            .collect();

        for (id, target) in &moved {
            let Some(doc) = self.docs.get_mut(*id) else {
                continue;
            };
            self.by_path.remove(&doc.path);
            doc.label = label_for_path(target);
            doc.path = DocumentPath::File(target.clone());
            self.by_path.insert(doc.path.clone(), *id);
        }
        moved.into_iter().map(|(id, _)| id).collect()
    }

    /// Tabs in order, with their documents.
    pub fn iter_tabs(&self) -> impl Iterator<Item = (DocumentId, &Document)> + '_ {
        self.tabs
            .iter()
            .filter_map(|id| self.docs.get(*id).map(|doc| (*id, doc)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/documents.rs"]
mod tests;
