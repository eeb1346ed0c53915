use crate::kernel::action::{BufferEdit, DialogChoice};
use crate::kernel::documents::{DocumentId, DocumentPath};
use crate::kernel::services::ports::{BridgeRequest, ConfirmKind, ConfirmPrompt};
use crate::kernel::state::PendingAction;
use crate::kernel::{Action, Effect};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_document_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::NewDocument => {
                self.state.documents.create_untitled();
                DispatchResult::changed(self.activation_effects())
            }
            Action::NewFile => {
                let Some(doc) = self.state.documents.active() else {
                    return DispatchResult::unchanged();
                };
                DispatchResult::effects_only(vec![Effect::Request(BridgeRequest::New {
                    content: doc.content(),
                    file: doc.file_path().map(|p| p.to_path_buf()),
                })])
            }
            Action::OpenDialog => {
                self.state.pending.opening_file = true;
                DispatchResult::changed(vec![Effect::Request(BridgeRequest::Open)])
            }
            Action::OpenPath(path) => {
                self.state.pending.opening_file = true;
                if let Some(id) = self.state.documents.find_file(&path) {
                    self.state.documents.activate(id);
                    self.state.pending.opening_file = false;
                    return DispatchResult::changed(self.activation_effects());
                }
                DispatchResult::changed(vec![Effect::Request(BridgeRequest::OpenPath { path })])
            }
            Action::Save => self.save_active(),
            Action::SaveAs => {
                let Some(doc) = self.state.documents.active() else {
                    return DispatchResult::unchanged();
                };
                DispatchResult::effects_only(vec![Effect::Request(BridgeRequest::SaveAs {
                    content: doc.content(),
                })])
            }
            Action::Activate(id) => {
                if self.state.documents.get(id).is_none() {
                    return DispatchResult::unchanged();
                }
                self.state.documents.activate(id);
                DispatchResult::changed(self.activation_effects())
            }
            Action::CloseDocument(id) => self.request_close(id),
            Action::ReorderTab { from, to } => {
                if self.state.documents.reorder(from, to) {
                    DispatchResult::changed(vec![Effect::RefreshTabs])
                } else {
                    DispatchResult::unchanged()
                }
            }
            Action::Edit(edit) => self.apply_edit(edit),
            Action::RecomputeDirty => {
                let Some(doc) = self.state.documents.active() else {
                    return DispatchResult::unchanged();
                };
                let dirty = doc.is_dirty();
                DispatchResult::effects_only(vec![
                    Effect::Request(BridgeRequest::ContentChanged { dirty }),
                    Effect::RefreshTabs,
                ])
            }
            Action::ResolveDialog(choice) => self.resolve_dialog(choice),
            _ => DispatchResult::unchanged(),
        }
    }

    fn save_active(&mut self) -> DispatchResult {
        let Some(id) = self.state.documents.active_id() else {
            return DispatchResult::unchanged();
        };
        let Some(doc) = self.state.documents.get(id) else {
            return DispatchResult::unchanged();
        };
        let content = doc.content();
        let Some(file) = doc.file_path().map(|p| p.to_path_buf()) else {
            return DispatchResult::effects_only(vec![Effect::Request(BridgeRequest::SaveAs {
                content,
            })]);
        };

        // The baseline moves now; a failed write only shows up as a notification.
        self.state.documents.mark_saved(id);
        DispatchResult::changed(vec![
            Effect::Request(BridgeRequest::Save {
                content,
                file,
                open_file: true,
            }),
            Effect::Request(BridgeRequest::ContentChanged { dirty: false }),
            Effect::RefreshTabs,
        ])
    }

    fn apply_edit(&mut self, edit: BufferEdit) -> DispatchResult {
        let Some(doc) = self.state.documents.active_mut() else {
            return DispatchResult::unchanged();
        };
        let buffer = doc.buffer_mut();
        let before = buffer.version();
        match edit {
            BufferEdit::Insert(text) => buffer.insert_str(&text),
            BufferEdit::DeleteBackward => {
                buffer.delete_backward();
            }
            BufferEdit::SetText(text) => buffer.set_text(&text),
            BufferEdit::SetCursor { row, col } => {
                buffer.set_cursor(row, col);
                return DispatchResult::changed(Vec::new());
            }
            BufferEdit::Undo => {
                buffer.undo();
            }
            BufferEdit::Redo => {
                buffer.redo();
            }
        }

        if buffer.version() == before {
            return DispatchResult::unchanged();
        }
        DispatchResult::changed(vec![Effect::ContentEdited])
    }

    fn request_close(&mut self, id: DocumentId) -> DispatchResult {
        let Some(doc) = self.state.documents.get(id) else {
            return DispatchResult::unchanged();
        };
        if !doc.is_dirty() {
            return self.close_now(id);
        }

        let message = format!(
            "Do you want to save the changes you made to {}?",
            doc.label()
        );
        self.state
            .ui
            .confirm_dialog
            .open(message.clone(), PendingAction::CloseDocument { id });
        DispatchResult::changed(vec![Effect::Confirm(ConfirmPrompt {
            kind: ConfirmKind::SaveDiscardCancel,
            message,
        })])
    }

    fn close_now(&mut self, id: DocumentId) -> DispatchResult {
        let active_before = self.state.documents.active_id();
        let Some(doc) = self.state.documents.remove(id) else {
            return DispatchResult::unchanged();
        };
        tracing::debug!(path = %doc.path(), "document closed");

        if self.state.documents.active_id() != active_before {
            return DispatchResult::changed(self.activation_effects());
        }
        DispatchResult::changed(vec![Effect::RefreshTabs])
    }

    fn resolve_dialog(&mut self, choice: DialogChoice) -> DispatchResult {
        let Some(pending) = self.state.ui.confirm_dialog.take() else {
            return DispatchResult::unchanged();
        };

        match (pending, choice) {
            (_, DialogChoice::Cancel) => DispatchResult::changed(Vec::new()),
            (PendingAction::CloseDocument { id }, DialogChoice::Confirm) => {
                let Some(doc) = self.state.documents.get(id) else {
                    return DispatchResult::changed(Vec::new());
                };
                let content = doc.content();
                let request = match doc.path() {
                    DocumentPath::File(file) => BridgeRequest::Save {
                        content,
                        file: file.clone(),
                        open_file: false,
                    },
                    DocumentPath::Untitled(_) => BridgeRequest::SaveAs { content },
                };
                // Closed right away; the save reply is not awaited.
                let mut result = self.close_now(id);
                result.effects.insert(0, Effect::Request(request));
                result
            }
            (PendingAction::CloseDocument { id }, DialogChoice::Deny) => {
                let mut result = self.close_now(id);
                result.state_changed = true;
                result
            }
            (PendingAction::DeletePath { path }, DialogChoice::Confirm) => {
                DispatchResult::changed(vec![Effect::Request(BridgeRequest::Delete { path })])
            }
            (PendingAction::DeletePath { .. }, DialogChoice::Deny) => {
                DispatchResult::changed(Vec::new())
            }
        }
    }
}
