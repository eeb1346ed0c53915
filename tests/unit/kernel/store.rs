use super::*;
use crate::kernel::services::ports::{
    BridgeReply, ConfirmKind, FileProperties, Notification, TreeEntry,
};
use crate::kernel::{BufferEdit, DialogChoice, DocumentPath};
use std::path::{Path, PathBuf};

fn new_store() -> Store {
    Store::new(SessionState::new())
}

fn requests(result: &DispatchResult) -> Vec<BridgeRequest> {
    result
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Request(req) => Some(req.clone()),
            _ => None,
        })
        .collect()
}

fn open_file(store: &mut Store, path: &str, content: &str) {
    store.dispatch(Action::OpenPath(PathBuf::from(path)));
    store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: content.to_string(),
        filename: Path::new(path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned(),
        file: Some(PathBuf::from(path)),
    }));
}

fn open_proj(store: &mut Store) {
    store.dispatch(Action::OpenFolderDialog);
    store.dispatch(Action::Reply(BridgeReply::FolderOpened {
        path: PathBuf::from("/proj"),
        tree: vec![
            TreeEntry::directory("/proj/docs", true),
            TreeEntry::file("/proj/readme.md"),
        ],
    }));
}

fn labels(store: &Store) -> Vec<String> {
    store
        .state()
        .documents
        .iter_tabs()
        .map(|(_, doc)| doc.label().to_string())
        .collect()
}

#[test]
fn test_new_twice_numbers_untitled_tabs() {
    let mut store = new_store();

    let result = store.dispatch(Action::NewDocument);
    assert!(result.state_changed);
    assert!(result.effects.contains(&Effect::Activated));
    store.dispatch(Action::NewDocument);

    assert_eq!(labels(&store), vec!["Untitled 1", "Untitled 2"]);
    assert_eq!(store.state().documents.untitled_counter(), 3);
}

#[test]
fn test_activation_sets_title_and_dirty_state() {
    let mut store = new_store();

    store.dispatch(Action::OpenPath(PathBuf::from("/proj/a.md")));
    let result = store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: "# a".into(),
        filename: "a.md".into(),
        file: Some(PathBuf::from("/proj/a.md")),
    }));

    assert_eq!(
        requests(&result),
        vec![
            BridgeRequest::SetTitle {
                title: "a.md".into()
            },
            BridgeRequest::ContentChanged { dirty: false },
        ]
    );
    assert!(!store.state().pending.opening_file);
}

#[test]
fn test_untitled_activation_titles_with_label() {
    let mut store = new_store();
    let result = store.dispatch(Action::NewDocument);

    assert!(requests(&result).contains(&BridgeRequest::SetTitle {
        title: "Untitled 1".into()
    }));
}

#[test]
fn test_repeated_open_keeps_one_document() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "one");
    open_file(&mut store, "/proj/b.md", "two");

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/proj/a.md")));
    assert!(requests(&result)
        .iter()
        .all(|r| !matches!(r, BridgeRequest::OpenPath { .. })));
    assert!(!store.state().pending.opening_file);

    store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: "one".into(),
        filename: "a.md".into(),
        file: Some(PathBuf::from("/proj/a.md")),
    }));

    assert_eq!(store.state().documents.len(), 2);
    assert_eq!(
        store.state().documents.active().unwrap().label(),
        "a.md"
    );
}

#[test]
fn test_open_path_for_unknown_file_sends_request() {
    let mut store = new_store();

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/proj/x.md")));
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::OpenPath {
            path: PathBuf::from("/proj/x.md")
        }]
    );
    assert!(store.state().pending.opening_file);
}

#[test]
fn test_open_folder_builds_tree_and_expands_lazily() {
    let mut store = new_store();
    open_proj(&mut store);

    let rows = store.state().explorer.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "docs");
    assert!(!store.state().pending.opening_folder);

    let result = store.dispatch(Action::ToggleDirectory(PathBuf::from("/proj/docs")));
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::OpenPath {
            path: PathBuf::from("/proj/docs")
        }]
    );

    let result = store.dispatch(Action::Reply(BridgeReply::FolderOpened {
        path: PathBuf::from("/proj/docs"),
        tree: vec![TreeEntry::file("/proj/docs/guide.md")],
    }));
    assert!(requests(&result).is_empty());
    assert_eq!(
        store.state().explorer.root_path(),
        Some(Path::new("/proj"))
    );
    let names: Vec<String> = store
        .state()
        .explorer
        .rows()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["docs", "guide.md", "readme.md"]);
}

#[test]
fn test_folder_outside_root_replaces_root() {
    let mut store = new_store();
    open_proj(&mut store);

    store.dispatch(Action::Reply(BridgeReply::FolderOpened {
        path: PathBuf::from("/other"),
        tree: vec![TreeEntry::file("/other/x.md")],
    }));

    assert_eq!(
        store.state().explorer.root_path(),
        Some(Path::new("/other"))
    );
    assert_eq!(store.state().explorer.len(), 1);
}

#[test]
fn test_listing_for_unknown_directory_is_dropped() {
    let mut store = new_store();
    open_proj(&mut store);

    let result = store.dispatch(Action::Reply(BridgeReply::FolderOpened {
        path: PathBuf::from("/proj/ghost"),
        tree: vec![TreeEntry::file("/proj/ghost/a.md")],
    }));
    assert!(!result.state_changed);
    assert_eq!(store.state().explorer.len(), 2);
}

#[test]
fn test_opened_file_appears_in_tree_and_is_highlighted() {
    let mut store = new_store();
    open_proj(&mut store);

    store.dispatch(Action::OpenDialog);
    let result = store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: String::new(),
        filename: "draft.md".into(),
        file: Some(PathBuf::from("/proj/docs/draft.md")),
    }));

    assert_eq!(
        requests(&result)[0],
        BridgeRequest::OpenPath {
            path: PathBuf::from("/proj/docs")
        }
    );
    let rows = store.state().explorer.rows();
    let draft = rows.iter().find(|r| r.name == "draft.md").unwrap();
    assert!(draft.is_active);
}

#[test]
fn test_save_as_reply_rebinds_untitled_document() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    store.dispatch(Action::Edit(BufferEdit::Insert("notes".into())));

    let result = store.dispatch(Action::SaveAs);
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::SaveAs {
            content: "notes".into()
        }]
    );

    store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: "notes".into(),
        filename: "notes.md".into(),
        file: Some(PathBuf::from("/proj/notes.md")),
    }));

    let docs = &store.state().documents;
    assert_eq!(docs.len(), 1);
    let doc = docs.active().unwrap();
    assert_eq!(doc.label(), "notes.md");
    assert_eq!(doc.file_path(), Some(Path::new("/proj/notes.md")));
    assert!(!doc.is_dirty());
    assert!(doc.buffer().can_undo());
}

#[test]
fn test_save_as_reply_keeps_edits_typed_while_saving() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    store.dispatch(Action::Edit(BufferEdit::Insert("abc".into())));
    store.dispatch(Action::SaveAs);
    store.dispatch(Action::Edit(BufferEdit::Insert("d".into())));

    store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: "abc".into(),
        filename: "Notes.md".into(),
        file: Some(PathBuf::from("/proj/notes.md")),
    }));

    let docs = &store.state().documents;
    assert_eq!(docs.len(), 1);
    let doc = docs.active().unwrap();
    assert_eq!(doc.content(), "abcd");
    assert_eq!(doc.label(), "Notes.md");
    assert_eq!(doc.file_path(), Some(Path::new("/proj/notes.md")));
    assert!(doc.is_dirty());
}

#[test]
fn test_explicit_open_does_not_rebind_untitled() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);

    open_file(&mut store, "/proj/a.md", "a");

    assert_eq!(labels(&store), vec!["Untitled 1", "a.md"]);
}

#[test]
fn test_file_opened_without_path_creates_untitled() {
    let mut store = new_store();

    store.dispatch(Action::Reply(BridgeReply::FileOpened {
        content: "scratch".into(),
        filename: String::new(),
        file: None,
    }));

    let doc = store.state().documents.active().unwrap();
    assert_eq!(doc.label(), "Untitled 1");
    assert_eq!(doc.content(), "scratch");
}

#[test]
fn test_save_file_backed_snapshots_immediately() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    store.dispatch(Action::Edit(BufferEdit::Insert("b".into())));
    assert!(store.state().documents.active().unwrap().is_dirty());

    let result = store.dispatch(Action::Save);
    assert_eq!(
        requests(&result),
        vec![
            BridgeRequest::Save {
                content: "ba".into(),
                file: PathBuf::from("/proj/a.md"),
                open_file: true,
            },
            BridgeRequest::ContentChanged { dirty: false },
        ]
    );
    assert!(!store.state().documents.active().unwrap().is_dirty());
}

#[test]
fn test_save_untitled_falls_back_to_save_as() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);

    let result = store.dispatch(Action::Save);
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::SaveAs {
            content: String::new()
        }]
    );
}

#[test]
fn test_edit_reports_content_change_and_recompute_forwards_dirty() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");

    let result = store.dispatch(Action::Edit(BufferEdit::Insert("x".into())));
    assert_eq!(result.effects, vec![Effect::ContentEdited]);

    let result = store.dispatch(Action::Edit(BufferEdit::SetCursor { row: 0, col: 0 }));
    assert!(result.effects.is_empty());

    let result = store.dispatch(Action::RecomputeDirty);
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::ContentChanged { dirty: true }]
    );

    store.dispatch(Action::Edit(BufferEdit::Undo));
    let result = store.dispatch(Action::RecomputeDirty);
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::ContentChanged { dirty: false }]
    );
}

#[test]
fn test_close_dirty_file_save_and_close() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    store.dispatch(Action::Edit(BufferEdit::SetText("changed".into())));
    let id = store.state().documents.active_id().unwrap();

    let result = store.dispatch(Action::CloseDocument(id));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::Confirm(prompt)] if prompt.kind == ConfirmKind::SaveDiscardCancel
    ));
    assert!(store.state().ui.confirm_dialog.visible);
    assert_eq!(store.state().documents.len(), 1);

    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Confirm));
    assert_eq!(
        requests(&result)[0],
        BridgeRequest::Save {
            content: "changed".into(),
            file: PathBuf::from("/proj/a.md"),
            open_file: false,
        }
    );
    // Removed without waiting for the save reply; an untitled one replaces it.
    assert!(store.state().documents.find_file(Path::new("/proj/a.md")).is_none());
    assert_eq!(store.state().documents.len(), 1);
    assert!(store
        .state()
        .documents
        .active()
        .unwrap()
        .path()
        .is_untitled());
    assert!(!store.state().ui.confirm_dialog.visible);
}

#[test]
fn test_close_dirty_untitled_saves_as() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    store.dispatch(Action::Edit(BufferEdit::Insert("draft".into())));
    let id = store.state().documents.active_id().unwrap();

    store.dispatch(Action::CloseDocument(id));
    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Confirm));

    assert_eq!(
        requests(&result)[0],
        BridgeRequest::SaveAs {
            content: "draft".into()
        }
    );
}

#[test]
fn test_close_cancel_changes_nothing() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    store.dispatch(Action::Edit(BufferEdit::Insert("z".into())));
    let id = store.state().documents.active_id().unwrap();

    store.dispatch(Action::CloseDocument(id));
    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Cancel));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().documents.active_id(), Some(id));
    assert_eq!(store.state().documents.get(id).unwrap().content(), "za");
    assert!(!store.state().ui.confirm_dialog.visible);
}

#[test]
fn test_close_discard_removes_without_request() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    open_file(&mut store, "/proj/b.md", "b");
    store.dispatch(Action::Edit(BufferEdit::Insert("z".into())));
    let b = store.state().documents.active_id().unwrap();

    store.dispatch(Action::CloseDocument(b));
    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Deny));

    assert!(requests(&result)
        .iter()
        .all(|r| !matches!(r, BridgeRequest::Save { .. } | BridgeRequest::SaveAs { .. })));
    assert_eq!(labels(&store), vec!["a.md"]);
    assert_eq!(store.state().documents.active().unwrap().label(), "a.md");
}

#[test]
fn test_close_clean_inactive_tab_keeps_active() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    open_file(&mut store, "/proj/b.md", "b");
    let a = store.state().documents.find_file(Path::new("/proj/a.md")).unwrap();

    let result = store.dispatch(Action::CloseDocument(a));
    assert_eq!(result.effects, vec![Effect::RefreshTabs]);
    assert_eq!(labels(&store), vec!["b.md"]);
}

#[test]
fn test_resolve_without_dialog_is_noop() {
    let mut store = new_store();
    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Confirm));
    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_delete_requires_confirmation() {
    let mut store = new_store();
    open_proj(&mut store);

    let result = store.dispatch(Action::DeletePath(PathBuf::from("/proj/readme.md")));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::Confirm(prompt)] if prompt.kind == ConfirmKind::OkCancel
    ));
    assert!(requests(&result).is_empty());

    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Cancel));
    assert!(requests(&result).is_empty());

    store.dispatch(Action::DeletePath(PathBuf::from("/proj/readme.md")));
    let result = store.dispatch(Action::ResolveDialog(DialogChoice::Confirm));
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::Delete {
            path: PathBuf::from("/proj/readme.md")
        }]
    );
}

#[test]
fn test_create_and_rename_add_default_extension() {
    let mut store = new_store();
    open_proj(&mut store);

    let result = store.dispatch(Action::CreateFile {
        parent: None,
        name: "todo".into(),
    });
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::CreateFile {
            parent: PathBuf::from("/proj"),
            name: "todo.md".into()
        }]
    );

    let result = store.dispatch(Action::CreateFolder {
        parent: Some(PathBuf::from("/proj/docs")),
        name: "img".into(),
    });
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::CreateFolder {
            parent: PathBuf::from("/proj/docs"),
            name: "img".into()
        }]
    );

    let result = store.dispatch(Action::RenamePath {
        path: PathBuf::from("/proj/readme.md"),
        name: "index".into(),
    });
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::Rename {
            path: PathBuf::from("/proj/readme.md"),
            name: "index.md".into()
        }]
    );

    let result = store.dispatch(Action::RenamePath {
        path: PathBuf::from("/proj/docs"),
        name: "guides".into(),
    });
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::Rename {
            path: PathBuf::from("/proj/docs"),
            name: "guides".into()
        }]
    );
}

#[test]
fn test_create_without_root_notifies() {
    let mut store = new_store();

    let result = store.dispatch(Action::CreateFile {
        parent: None,
        name: "todo".into(),
    });
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::Notify(n)] if n.is_error()
    ));
}

#[test]
fn test_path_renamed_rekeys_open_document() {
    let mut store = new_store();
    open_file(&mut store, "/proj/docs/a.md", "a");

    let result = store.dispatch(Action::Reply(BridgeReply::PathRenamed {
        old_path: PathBuf::from("/proj/docs"),
        new_path: PathBuf::from("/proj/guides"),
        name: "guides".into(),
    }));

    let doc = store.state().documents.active().unwrap();
    assert_eq!(doc.path(), &DocumentPath::File(PathBuf::from("/proj/guides/a.md")));
    assert!(requests(&result).contains(&BridgeRequest::SetTitle {
        title: "a.md".into()
    }));
}

#[test]
fn test_notifications_never_mutate_state() {
    let mut store = new_store();
    open_proj(&mut store);
    open_file(&mut store, "/proj/readme.md", "hi");

    let result = store.dispatch(Action::Reply(BridgeReply::Notification(
        Notification::error("permission denied"),
    )));

    assert!(!result.state_changed);
    assert_eq!(
        result.effects,
        vec![Effect::Notify(Notification::error("permission denied"))]
    );
    assert_eq!(store.state().documents.len(), 1);
    assert_eq!(store.state().explorer.len(), 2);
}

#[test]
fn test_properties_reply_is_surfaced() {
    let mut store = new_store();
    let props = FileProperties {
        path: PathBuf::from("/proj/a.md"),
        is_directory: false,
        size: 12,
        created: Some(1),
        modified: Some(2),
    };

    let result = store.dispatch(Action::ShowProperties(PathBuf::from("/proj/a.md")));
    assert_eq!(
        requests(&result),
        vec![BridgeRequest::GetProperties {
            path: PathBuf::from("/proj/a.md")
        }]
    );

    let result = store.dispatch(Action::Reply(BridgeReply::PathProperties(props.clone())));
    assert_eq!(result.effects, vec![Effect::ShowProperties(props)]);
}

#[test]
fn test_reorder_tabs() {
    let mut store = new_store();
    open_file(&mut store, "/proj/a.md", "a");
    open_file(&mut store, "/proj/b.md", "b");

    let result = store.dispatch(Action::ReorderTab { from: 1, to: 0 });
    assert_eq!(result.effects, vec![Effect::RefreshTabs]);
    assert_eq!(labels(&store), vec!["b.md", "a.md"]);
}
