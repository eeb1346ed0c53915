use super::*;

fn proj_tree() -> FileTree {
    let mut tree = FileTree::new();
    tree.open_root(
        PathBuf::from("/proj"),
        vec![
            TreeEntry::file("/proj/readme.md"),
            TreeEntry::directory("/proj/docs", true),
        ],
    );
    tree
}

fn names(tree: &FileTree) -> Vec<String> {
    tree.rows().into_iter().map(|row| row.name).collect()
}

#[test]
fn test_open_root_sorts_directories_first() {
    let tree = proj_tree();

    assert_eq!(tree.root_path(), Some(Path::new("/proj")));
    assert_eq!(tree.len(), 2);
    assert_eq!(names(&tree), vec!["docs", "readme.md"]);
    assert!(tree.contains(Path::new("/proj/docs")));
}

#[test]
fn test_sibling_order_is_case_insensitive() {
    let mut tree = FileTree::new();
    tree.open_root(
        PathBuf::from("/p"),
        vec![
            TreeEntry::file("/p/b.md"),
            TreeEntry::file("/p/A.md"),
            TreeEntry::directory("/p/z", false),
            TreeEntry::file("/p/c.md"),
        ],
    );

    assert_eq!(names(&tree), vec!["z", "A.md", "b.md", "c.md"]);
}

#[test]
fn test_expand_unloaded_requests_listing_then_attach() {
    let mut tree = proj_tree();
    let docs = Path::new("/proj/docs");

    let outcome = tree.expand(docs).unwrap();
    assert_eq!(outcome, ExpandOutcome::RequestListing(docs.to_path_buf()));
    let id = tree.find(docs).unwrap();
    assert_eq!(tree.node(id).unwrap().load_state(), Some(LoadState::Loading));

    let attached = tree
        .attach_children(docs, vec![TreeEntry::file("/proj/docs/guide.md")])
        .unwrap();
    assert_eq!(attached, 1);
    assert_eq!(tree.node(id).unwrap().load_state(), Some(LoadState::Loaded));
    assert_eq!(names(&tree), vec!["docs", "guide.md", "readme.md"]);

    let guide = tree.find(Path::new("/proj/docs/guide.md")).unwrap();
    assert_eq!(tree.parent(guide), Some(id));
    assert_eq!(tree.rows()[1].depth, 1);
}

#[test]
fn test_collapse_and_reexpand_uses_cache() {
    let mut tree = proj_tree();
    let docs = Path::new("/proj/docs");
    tree.expand(docs).unwrap();
    tree.attach_children(docs, vec![TreeEntry::file("/proj/docs/a.md")])
        .unwrap();

    assert_eq!(tree.expand(docs).unwrap(), ExpandOutcome::Collapsed);
    assert_eq!(names(&tree), vec!["docs", "readme.md"]);

    assert_eq!(tree.expand(docs).unwrap(), ExpandOutcome::Expanded);
    assert_eq!(names(&tree), vec!["docs", "a.md", "readme.md"]);
}

#[test]
fn test_expand_without_children_skips_request() {
    let mut tree = FileTree::new();
    tree.open_root(
        PathBuf::from("/p"),
        vec![TreeEntry::directory("/p/empty", false)],
    );

    let outcome = tree.expand(Path::new("/p/empty")).unwrap();
    assert_eq!(outcome, ExpandOutcome::Expanded);
}

#[test]
fn test_expand_while_loading_reissues_request() {
    let mut tree = proj_tree();
    let docs = Path::new("/proj/docs");

    tree.expand(docs).unwrap();
    assert!(tree.collapse(docs));
    assert_eq!(
        tree.expand(docs).unwrap(),
        ExpandOutcome::RequestListing(docs.to_path_buf())
    );
}

#[test]
fn test_expand_errors() {
    let mut tree = proj_tree();

    assert_eq!(
        tree.expand(Path::new("/proj/readme.md")),
        Err(FileTreeError::NotADirectory(PathBuf::from("/proj/readme.md")))
    );
    assert_eq!(
        tree.expand(Path::new("/proj/missing")),
        Err(FileTreeError::NotFound(PathBuf::from("/proj/missing")))
    );
}

#[test]
fn test_attach_children_replaces_wholesale() {
    let mut tree = proj_tree();
    let docs = Path::new("/proj/docs");
    tree.expand(docs).unwrap();
    tree.attach_children(
        docs,
        vec![
            TreeEntry::file("/proj/docs/old.md"),
            TreeEntry::file("/elsewhere/stray.md"),
        ],
    )
    .unwrap();
    assert!(!tree.contains(Path::new("/elsewhere/stray.md")));

    tree.attach_children(docs, vec![TreeEntry::file("/proj/docs/new.md")])
        .unwrap();
    assert!(!tree.contains(Path::new("/proj/docs/old.md")));
    assert!(tree.contains(Path::new("/proj/docs/new.md")));

    tree.attach_children(docs, Vec::new()).unwrap();
    let id = tree.find(docs).unwrap();
    assert!(matches!(
        tree.node(id),
        Some(FileTreeNode::Directory {
            has_children: false,
            ..
        })
    ));
}

#[test]
fn test_attach_children_keeps_only_direct_children() {
    let mut tree = proj_tree();
    let docs = Path::new("/proj/docs");
    tree.expand(docs).unwrap();
    tree.attach_children(
        docs,
        vec![
            TreeEntry::file("/proj/docs/sub/x.md"),
            TreeEntry::directory("/proj/docs/sub", true),
            TreeEntry::file("/proj/docs/a.md"),
        ],
    )
    .unwrap();

    assert!(!tree.contains(Path::new("/proj/docs/sub/x.md")));
    assert!(tree.contains(Path::new("/proj/docs/sub")));
    assert!(tree.contains(Path::new("/proj/docs/a.md")));
}

#[test]
fn test_attach_children_without_root() {
    let mut tree = FileTree::new();
    assert_eq!(
        tree.attach_children(Path::new("/x"), Vec::new()),
        Err(FileTreeError::NoRoot)
    );
}

#[test]
fn test_insert_file_in_sorted_position() {
    let mut tree = proj_tree();

    let outcome = tree.insert_file(Path::new("/proj/notes.md"));
    assert!(outcome.inserted);
    assert!(outcome.listings.is_empty());
    assert_eq!(names(&tree), vec!["docs", "notes.md", "readme.md"]);
}

#[test]
fn test_insert_file_twice_is_noop() {
    let mut tree = proj_tree();

    assert!(tree.insert_file(Path::new("/proj/a.md")).inserted);
    assert!(!tree.insert_file(Path::new("/proj/a.md")).inserted);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_insert_file_outside_root_is_noop() {
    let mut tree = proj_tree();

    assert!(!tree.insert_file(Path::new("/other/a.md")).inserted);
    assert!(!tree.insert_file(Path::new("/proj")).inserted);
    assert!(!tree.insert_file(Path::new("/projection/a.md")).inserted);
    assert_eq!(tree.len(), 2);

    let mut empty = FileTree::new();
    assert!(!empty.insert_file(Path::new("/proj/a.md")).inserted);
}

#[test]
fn test_insert_file_reveals_collapsed_ancestors() {
    let mut tree = proj_tree();

    let outcome = tree.insert_file(Path::new("/proj/docs/draft.md"));
    assert!(outcome.inserted);
    assert_eq!(outcome.listings, vec![PathBuf::from("/proj/docs")]);

    let docs = tree.find(Path::new("/proj/docs")).unwrap();
    assert!(tree.node(docs).unwrap().is_expanded());
    assert_eq!(names(&tree), vec!["docs", "draft.md", "readme.md"]);
}

#[test]
fn test_insert_file_under_unknown_directory_is_noop() {
    let mut tree = proj_tree();

    let outcome = tree.insert_file(Path::new("/proj/missing/x.md"));
    assert!(!outcome.inserted);
    assert!(outcome.listings.is_empty());
}

#[test]
fn test_rows_carry_active_highlight() {
    let mut tree = proj_tree();

    assert!(tree.set_active_path(Some(Path::new("/proj/readme.md"))));
    assert!(!tree.set_active_path(Some(Path::new("/proj/readme.md"))));

    let rows = tree.rows();
    assert!(!rows[0].is_active);
    assert!(rows[1].is_active);

    tree.set_active_path(None);
    assert!(tree.rows().iter().all(|row| !row.is_active));
}

#[test]
fn test_tree_entry_wire_shape() {
    let entry: TreeEntry = serde_json::from_str(
        r#"{"type":"directory","name":"docs","path":"/proj/docs","has_children":true}"#,
    )
    .unwrap();
    assert_eq!(entry, TreeEntry::directory("/proj/docs", true));

    let file: TreeEntry =
        serde_json::from_str(r#"{"type":"file","name":"a.md","path":"/proj/a.md"}"#).unwrap();
    assert_eq!(file.kind, EntryKind::File);
    assert_eq!(file.has_children, None);
}

#[test]
fn test_should_ignore_noise_entries() {
    assert!(should_ignore(".git"));
    assert!(should_ignore(".DS_Store"));
    assert!(!should_ignore("notes.md"));
}
