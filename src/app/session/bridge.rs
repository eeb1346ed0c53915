use std::time::Instant;

use super::Session;
use crate::kernel::services::bus::SessionEvent;
use crate::kernel::services::ports::{BridgeReply, BridgeRequest, SessionError, TabView};
use crate::kernel::{Action, Effect};

impl Session {
    /// Returns whether session state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Request(request) => self.send(request),
            Effect::ContentEdited => {
                let now = Instant::now();
                let config = self.store.config();
                self.pending_dirty_deadline = Some(now + config.dirty_debounce);
                self.pending_render_deadline = Some(now + config.render_debounce);
                self.scroll_sync.invalidate();
            }
            Effect::Activated => {
                let (label, path) = match self.store.state().documents.active() {
                    Some(doc) => (doc.label().to_string(), doc.path().to_string()),
                    None => (String::new(), String::new()),
                };
                self.view.set_active_label(&label);
                // Activation renders now; only edits wait for the debounce.
                self.pending_render_deadline = None;
                self.render_preview();
                self.events
                    .publish(&SessionEvent::ActiveChanged { label, path });
            }
            Effect::RefreshTabs => {
                let tabs = self.tab_views();
                self.view.render_tabs(&tabs);
            }
            Effect::RefreshTree => {
                let tree = &self.store.state().explorer;
                let rows = tree.rows();
                self.view.render_tree(tree.root_path(), &rows);
                self.events.publish(&SessionEvent::TreeChanged);
            }
            Effect::Confirm(prompt) => self.view.confirm(&prompt),
            Effect::Notify(notification) => {
                self.view.notify(&notification);
                self.events.publish(&SessionEvent::Notified(notification));
            }
            Effect::ShowProperties(properties) => self.view.show_properties(&properties),
        }
    }

    pub fn tab_views(&self) -> Vec<TabView> {
        let documents = &self.store.state().documents;
        let active = documents.active_id();
        documents
            .iter_tabs()
            .map(|(id, doc)| TabView {
                label: doc.label().to_string(),
                path: doc.path().to_string(),
                active: Some(id) == active,
                dirty: doc.is_dirty(),
            })
            .collect()
    }

    fn send(&mut self, request: BridgeRequest) {
        if let BridgeRequest::ContentChanged { dirty } = &request {
            self.events
                .publish(&SessionEvent::ContentChanged { dirty: *dirty });
        }

        let Some(storage) = self.storage.as_ref() else {
            self.send_offline(request);
            return;
        };
        let channel = request.channel();
        match storage.send(request.clone()) {
            Ok(()) => {}
            Err(SessionError::StorageUnavailable) => {
                tracing::warn!(channel, "storage went away, continuing offline");
                self.storage = None;
                self.send_offline(request);
            }
            Err(err) => {
                tracing::warn!(channel, key = err.key(), error = %err, "request not sent");
            }
        }
    }

    /// No bridge: content leaves through the view's download primitive.
    fn send_offline(&mut self, request: BridgeRequest) {
        match request {
            BridgeRequest::Save { content, file, .. } => {
                let name = crate::models::file_tree::file_name_of(&file);
                self.view.download(&name, &content);
            }
            BridgeRequest::SaveAs { content } => {
                let name = self.offline_file_name();
                self.view.download(&name, &content);
            }
            BridgeRequest::New { content, .. } => {
                if !content.is_empty() {
                    let name = self.offline_file_name();
                    self.view.download(&name, &content);
                }
                // Same outcome as the storage's reply to `new`.
                self.dispatch(Action::Reply(BridgeReply::FileOpened {
                    content: String::new(),
                    filename: String::new(),
                    file: None,
                }));
            }
            other => {
                tracing::debug!(channel = other.channel(), "offline, request dropped");
            }
        }
    }

    fn offline_file_name(&self) -> String {
        let label = self
            .store
            .state()
            .documents
            .active()
            .map(|doc| doc.label().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());
        self.store.config().with_default_extension(&label)
    }
}
