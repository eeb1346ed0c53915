use std::path::PathBuf;

use super::documents::DocumentId;
use crate::kernel::services::ports::BridgeReply;

/// Change to the active buffer coming from the editing widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEdit {
    Insert(String),
    DeleteBackward,
    /// Replace everything, e.g. after a paste-all or external reformat.
    SetText(String),
    SetCursor { row: usize, col: usize },
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    /// Save (close dialog) or OK (delete dialog).
    Confirm,
    /// Close without saving.
    Deny,
    Cancel,
}

#[derive(Debug, Clone)]
pub enum Action {
    // Documents and tabs.
    NewDocument,
    /// Let the storage side keep the active content, then start blank.
    NewFile,
    OpenDialog,
    OpenPath(PathBuf),
    Save,
    SaveAs,
    Activate(DocumentId),
    CloseDocument(DocumentId),
    ReorderTab { from: usize, to: usize },
    Edit(BufferEdit),
    RecomputeDirty,

    // Explorer.
    OpenFolderDialog,
    /// Make a known folder the explorer root, e.g. one passed on the command line.
    OpenFolder(PathBuf),
    ToggleDirectory(PathBuf),
    CollapseDirectory(PathBuf),
    /// `parent: None` means the tree root.
    CreateFile { parent: Option<PathBuf>, name: String },
    CreateFolder { parent: Option<PathBuf>, name: String },
    RenamePath { path: PathBuf, name: String },
    DeletePath(PathBuf),
    ShowProperties(PathBuf),

    ResolveDialog(DialogChoice),
    Reply(BridgeReply),
}
