//! Service ports: traits + data contracts.

pub mod bridge;
pub mod config;
pub mod error;
pub mod settings;
pub mod storage;
pub mod view;

pub use bridge::{
    BridgeReply, BridgeRequest, EntryKind, FileProperties, Notification, NotificationBody,
    NotificationStatus, TreeEntry,
};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use settings::Settings;
pub use storage::StorageService;
pub use view::{ConfirmKind, ConfirmPrompt, Renderer, TabView, ViewPort};

pub use crate::kernel::scroll_sync::{Anchor, AnchorSource};
