//! Messages exchanged with the storage side.
//!
//! Every message is a JSON object `{"channel": "...", "payload": {...}}`.
//! Channels are kebab-case, payload fields snake_case. The protocol carries
//! no correlation ids; see `PendingIntents` for how replies are classified.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::models::{EntryKind, TreeEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum BridgeRequest {
    /// Keep `content` (in `file`, or a picked path), then start a blank document.
    New {
        content: String,
        file: Option<PathBuf>,
    },
    /// Let the user pick a file to open.
    Open,
    /// Read a known path: a file replies `file-opened`, a directory `folder-opened`.
    OpenPath { path: PathBuf },
    Save {
        content: String,
        file: PathBuf,
        open_file: bool,
    },
    SaveAs { content: String },
    CreateFile { parent: PathBuf, name: String },
    CreateFolder { parent: PathBuf, name: String },
    Rename { path: PathBuf, name: String },
    Delete { path: PathBuf },
    GetProperties { path: PathBuf },
    /// Let the user pick a folder to become the explorer root.
    OpenFolder,
    SetTitle { title: String },
    ContentChanged { dirty: bool },
}

impl BridgeRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            BridgeRequest::New { .. } => "new",
            BridgeRequest::Open => "open",
            BridgeRequest::OpenPath { .. } => "open-path",
            BridgeRequest::Save { .. } => "save",
            BridgeRequest::SaveAs { .. } => "save-as",
            BridgeRequest::CreateFile { .. } => "create-file",
            BridgeRequest::CreateFolder { .. } => "create-folder",
            BridgeRequest::Rename { .. } => "rename",
            BridgeRequest::Delete { .. } => "delete",
            BridgeRequest::GetProperties { .. } => "get-properties",
            BridgeRequest::OpenFolder => "open-folder",
            BridgeRequest::SetTitle { .. } => "set-title",
            BridgeRequest::ContentChanged { .. } => "content-changed",
        }
    }

    /// Shell messages only decorate the window; they never produce a reply.
    pub fn is_shell_message(&self) -> bool {
        matches!(
            self,
            BridgeRequest::SetTitle { .. } | BridgeRequest::ContentChanged { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum BridgeReply {
    FileOpened {
        content: String,
        filename: String,
        file: Option<PathBuf>,
    },
    FolderOpened {
        path: PathBuf,
        tree: Vec<TreeEntry>,
    },
    PathRenamed {
        old_path: PathBuf,
        new_path: PathBuf,
        name: String,
    },
    PathProperties(FileProperties),
    Notification(Notification),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProperties {
    pub path: PathBuf,
    pub is_directory: bool,
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub created: Option<u64>,
    pub modified: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBody {
    Message(String),
    /// Localization key resolved by the view.
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub status: NotificationStatus,
    #[serde(flatten)]
    pub body: NotificationBody,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Success,
            body: NotificationBody::Message(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Error,
            body: NotificationBody::Message(message.into()),
        }
    }

    pub fn error_key(key: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Error,
            body: NotificationBody::Key(key.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == NotificationStatus::Error
    }

    pub fn text(&self) -> &str {
        match &self.body {
            NotificationBody::Message(s) | NotificationBody::Key(s) => s,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/bridge.rs"]
mod tests;
