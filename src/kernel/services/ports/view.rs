//! Collaborators the session drives but does not own.

use std::path::Path;

use super::bridge::{FileProperties, Notification};
use crate::models::FileTreeRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub label: String,
    pub path: String,
    pub active: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    /// Save, don't save, cancel.
    SaveDiscardCancel,
    /// Confirm or cancel.
    OkCancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub kind: ConfirmKind,
    pub message: String,
}

/// Tab strip, explorer tree, preview pane and dialogs.
///
/// `confirm` only shows the dialog; the answer comes back later as
/// `Action::ResolveDialog`.
pub trait ViewPort {
    fn render_tabs(&mut self, tabs: &[TabView]);
    fn render_tree(&mut self, root: Option<&Path>, rows: &[FileTreeRow]);
    fn set_active_label(&mut self, label: &str);
    fn set_preview(&mut self, html: &str);
    fn confirm(&mut self, prompt: &ConfirmPrompt);
    fn notify(&mut self, notification: &Notification);
    fn show_properties(&mut self, properties: &FileProperties);
    /// Offline fallback for saving: hand the content to the user directly.
    fn download(&mut self, file_name: &str, content: &str);
}

/// Markdown to HTML.
pub trait Renderer {
    fn render(&self, markdown: &str) -> String;
}
