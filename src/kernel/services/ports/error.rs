use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::bridge::Notification;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The user dismissed a picker or dialog. Never surfaced.
    #[error("cancelled by user")]
    UserCancelled,
    #[error("storage is not available")]
    StorageUnavailable,
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("{0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl SessionError {
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SessionError::PathNotFound(path.into()),
            io::ErrorKind::PermissionDenied => SessionError::PermissionDenied(path.into()),
            _ => SessionError::Unknown(err.to_string()),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SessionError::UserCancelled => "user-cancelled",
            SessionError::StorageUnavailable => "storage-unavailable",
            SessionError::PermissionDenied(_) => "permission-denied",
            SessionError::PathNotFound(_) => "path-not-found",
            SessionError::Unknown(_) => "unknown",
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::UserCancelled)
    }

    pub fn to_notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SessionError::PathNotFound(PathBuf::new()),
            io::ErrorKind::PermissionDenied => SessionError::PermissionDenied(PathBuf::new()),
            _ => SessionError::Unknown(err.to_string()),
        }
    }
}
