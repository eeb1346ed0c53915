use std::path::PathBuf;

use crate::kernel::documents::{label_for_path, DocumentPath};
use crate::kernel::services::ports::{BridgeReply, BridgeRequest, TreeEntry};
use crate::kernel::Effect;

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_reply(&mut self, reply: BridgeReply) -> DispatchResult {
        match reply {
            BridgeReply::FileOpened {
                content,
                filename,
                file,
            } => self.on_file_opened(content, filename, file),
            BridgeReply::FolderOpened { path, tree } => self.on_folder_opened(path, tree),
            BridgeReply::PathRenamed {
                old_path,
                new_path,
                name,
            } => {
                tracing::debug!(
                    from = %old_path.display(),
                    to = %new_path.display(),
                    %name,
                    "path renamed"
                );
                let moved = self.state.documents.rename_path(&old_path, &new_path);
                let active_moved = self
                    .state
                    .documents
                    .active_id()
                    .is_some_and(|id| moved.contains(&id));
                if active_moved {
                    return DispatchResult::changed(self.activation_effects());
                }
                if moved.is_empty() {
                    DispatchResult::unchanged()
                } else {
                    DispatchResult::changed(vec![Effect::RefreshTabs])
                }
            }
            BridgeReply::PathProperties(properties) => {
                DispatchResult::effects_only(vec![Effect::ShowProperties(properties)])
            }
            BridgeReply::Notification(notification) => {
                if notification.is_error() {
                    tracing::warn!(message = notification.text(), "storage reported an error");
                }
                DispatchResult::effects_only(vec![Effect::Notify(notification)])
            }
        }
    }

    fn on_file_opened(
        &mut self,
        content: String,
        filename: String,
        file: Option<PathBuf>,
    ) -> DispatchResult {
        let opening_file = self.state.pending.opening_file;
        self.state.pending.opening_file = false;
        let documents = &mut self.state.documents;

        let Some(path) = file else {
            let label = (!filename.is_empty()).then_some(filename);
            documents.create_untitled_with(content, label);
            return DispatchResult::changed(self.activation_effects());
        };

        if let Some(id) = documents.find_file(&path) {
            documents.activate(id);
        } else {
            // A reply nobody asked to open, landing on an untitled tab, is a finished save-as.
            let rebind_target = documents.active_id().filter(|id| {
                !opening_file
                    && documents
                        .get(*id)
                        .is_some_and(|doc| doc.path().is_untitled())
            });
            let label = if filename.is_empty() {
                label_for_path(&path)
            } else {
                filename
            };
            let rebound = match rebind_target {
                Some(id) => {
                    tracing::debug!(file = %path.display(), "save-as completed, rebinding untitled document");
                    documents.rebind(id, path.clone(), label.clone(), content.clone())
                }
                None => false,
            };
            if !rebound {
                documents.open(DocumentPath::File(path.clone()), content, label);
            }
        }

        let reveal = self.state.explorer.insert_file(&path);
        let mut effects: Vec<Effect> = reveal
            .listings
            .into_iter()
            .map(|dir| Effect::Request(BridgeRequest::OpenPath { path: dir }))
            .collect();
        effects.extend(self.activation_effects());
        DispatchResult::changed(effects)
    }

    fn on_folder_opened(&mut self, path: PathBuf, tree: Vec<TreeEntry>) -> DispatchResult {
        let explorer = &mut self.state.explorer;
        let replace_root = self.state.pending.opening_folder
            || explorer
                .root_path()
                .map_or(true, |root| path == root || !path.starts_with(root));

        if replace_root {
            tracing::debug!(root = %path.display(), entries = tree.len(), "explorer root replaced");
            self.state.pending.opening_folder = false;
            explorer.open_root(path, tree);
        } else if let Err(err) = explorer.attach_children(&path, tree) {
            tracing::debug!(error = %err, "listing dropped");
            return DispatchResult::unchanged();
        }
        DispatchResult::changed(vec![Effect::RefreshTree])
    }
}
