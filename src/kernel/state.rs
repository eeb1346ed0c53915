use std::path::PathBuf;

use crate::models::FileTree;

use super::documents::{DocumentId, DocumentStore};

/// Flags that classify the next reply of a verb; the protocol has no
/// correlation ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingIntents {
    /// Next `file-opened` answers an explicit open, never a save-as.
    pub opening_file: bool,
    /// Next `folder-opened` becomes the tree root.
    pub opening_folder: bool,
}

/// Deferred until the user answers a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    CloseDocument { id: DocumentId },
    DeletePath { path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

impl ConfirmDialogState {
    pub fn open(&mut self, message: String, action: PendingAction) {
        self.visible = true;
        self.message = message;
        self.on_confirm = Some(action);
    }

    pub fn take(&mut self) -> Option<PendingAction> {
        self.visible = false;
        self.message.clear();
        self.on_confirm.take()
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub confirm_dialog: ConfirmDialogState,
}

#[derive(Debug)]
pub struct SessionState {
    pub documents: DocumentStore,
    pub explorer: FileTree,
    pub pending: PendingIntents,
    pub ui: UiState,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            documents: DocumentStore::new(),
            explorer: FileTree::new(),
            pending: PendingIntents::default(),
            ui: UiState::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
