//! Headless session core (state/action/effect).

pub mod action;
pub mod documents;
pub mod effect;
pub mod scroll_sync;
pub mod services;
pub mod state;
pub mod store;

pub use action::{Action, BufferEdit, DialogChoice};
pub use documents::{Document, DocumentId, DocumentPath, DocumentStore};
pub use effect::Effect;
pub use scroll_sync::{Anchor, AnchorSource, ScrollSync};
pub use state::{ConfirmDialogState, PendingAction, PendingIntents, SessionState, UiState};
pub use store::{DispatchResult, Store};
