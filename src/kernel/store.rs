//! Session reducer: applies intents and storage replies, returns effects.
//!
//! The store never talks to the storage side itself. Everything outbound is
//! an `Effect::Request` that the app layer forwards.

mod documents;
mod explorer;
mod replies;

use crate::kernel::services::ports::{BridgeRequest, SessionConfig};

use super::{Action, Effect, SessionState};

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: true,
        }
    }

    fn effects_only(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: false,
        }
    }
}

pub struct Store {
    state: SessionState,
    config: SessionConfig,
}

impl Store {
    pub fn new(state: SessionState) -> Self {
        Self::with_config(state, SessionConfig::default())
    }

    pub fn with_config(state: SessionState, config: SessionConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::Reply(reply) => self.reduce_reply(reply),
            Action::OpenFolderDialog
            | Action::OpenFolder(_)
            | Action::ToggleDirectory(_)
            | Action::CollapseDirectory(_)
            | Action::CreateFile { .. }
            | Action::CreateFolder { .. }
            | Action::RenamePath { .. }
            | Action::DeletePath(_)
            | Action::ShowProperties(_) => self.reduce_explorer_action(action),
            other => self.reduce_document_action(other),
        }
    }

    /// Everything that follows a document becoming the visible one.
    fn activation_effects(&mut self) -> Vec<Effect> {
        let Some(doc) = self.state.documents.active() else {
            return Vec::new();
        };
        let title = doc.label().to_string();
        let dirty = doc.is_dirty();
        let file = doc.file_path().map(|p| p.to_path_buf());
        self.state.explorer.set_active_path(file.as_deref());

        vec![
            Effect::Request(BridgeRequest::SetTitle { title }),
            Effect::Request(BridgeRequest::ContentChanged { dirty }),
            Effect::Activated,
            Effect::RefreshTabs,
            Effect::RefreshTree,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
