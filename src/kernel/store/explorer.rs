use std::path::{Path, PathBuf};

use crate::kernel::services::ports::{BridgeRequest, ConfirmKind, ConfirmPrompt, Notification};
use crate::kernel::state::PendingAction;
use crate::kernel::{Action, Effect};
use crate::models::file_tree::file_name_of;
use crate::models::{ExpandOutcome, FileTreeError};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenFolderDialog => {
                self.state.pending.opening_folder = true;
                DispatchResult::changed(vec![Effect::Request(BridgeRequest::OpenFolder)])
            }
            Action::OpenFolder(path) => {
                self.state.pending.opening_folder = true;
                DispatchResult::changed(vec![Effect::Request(BridgeRequest::OpenPath { path })])
            }
            Action::ToggleDirectory(path) => match self.state.explorer.expand(&path) {
                Ok(ExpandOutcome::RequestListing(path)) => DispatchResult::changed(vec![
                    Effect::Request(BridgeRequest::OpenPath { path }),
                    Effect::RefreshTree,
                ]),
                Ok(ExpandOutcome::Expanded | ExpandOutcome::Collapsed) => {
                    DispatchResult::changed(vec![Effect::RefreshTree])
                }
                Err(err) => {
                    tracing::debug!(error = %err, "toggle ignored");
                    DispatchResult::unchanged()
                }
            },
            Action::CollapseDirectory(path) => {
                if self.state.explorer.collapse(&path) {
                    DispatchResult::changed(vec![Effect::RefreshTree])
                } else {
                    DispatchResult::unchanged()
                }
            }
            Action::CreateFile { parent, name } => {
                let name = self.config.with_default_extension(&name);
                self.create_in(parent, name, |parent, name| BridgeRequest::CreateFile {
                    parent,
                    name,
                })
            }
            Action::CreateFolder { parent, name } => {
                let name = name.trim().to_string();
                self.create_in(parent, name, |parent, name| BridgeRequest::CreateFolder {
                    parent,
                    name,
                })
            }
            Action::RenamePath { path, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return DispatchResult::unchanged();
                }
                let name = if self.is_known_directory(&path) {
                    name.to_string()
                } else {
                    self.config.with_default_extension(name)
                };
                DispatchResult::effects_only(vec![Effect::Request(BridgeRequest::Rename {
                    path,
                    name,
                })])
            }
            Action::DeletePath(path) => {
                let message = format!(
                    "Are you sure you want to delete {}?",
                    file_name_of(&path)
                );
                self.state
                    .ui
                    .confirm_dialog
                    .open(message.clone(), PendingAction::DeletePath { path });
                DispatchResult::changed(vec![Effect::Confirm(ConfirmPrompt {
                    kind: ConfirmKind::OkCancel,
                    message,
                })])
            }
            Action::ShowProperties(path) => DispatchResult::effects_only(vec![Effect::Request(
                BridgeRequest::GetProperties { path },
            )]),
            _ => DispatchResult::unchanged(),
        }
    }

    fn create_in(
        &mut self,
        parent: Option<PathBuf>,
        name: String,
        request: impl FnOnce(PathBuf, String) -> BridgeRequest,
    ) -> DispatchResult {
        if name.is_empty() {
            return DispatchResult::unchanged();
        }
        let parent = match parent {
            Some(parent) => parent,
            None => match self.state.explorer.root_path() {
                Some(root) => root.to_path_buf(),
                None => {
                    return DispatchResult::effects_only(vec![Effect::Notify(
                        Notification::error(FileTreeError::NoRoot.to_string()),
                    )]);
                }
            },
        };
        DispatchResult::effects_only(vec![Effect::Request(request(parent, name))])
    }

    fn is_known_directory(&self, path: &Path) -> bool {
        self.state
            .explorer
            .find(path)
            .and_then(|id| self.state.explorer.node(id))
            .is_some_and(|node| node.is_dir())
    }
}
