//! Lazily-loaded mirror of the folder opened in the explorer.
//!
//! Nodes live in a slotmap arena owned by the tree; every node is also indexed
//! by its absolute path so replies from the storage side (which only carry
//! paths) resolve in O(1).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing as reported by the storage side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
}

impl TreeEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::File,
            name: file_name_of(&path),
            path,
            has_children: None,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, has_children: bool) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::Directory,
            name: file_name_of(&path),
            path,
            has_children: Some(has_children),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Clone, Debug)]
pub enum FileTreeNode {
    Directory {
        path: PathBuf,
        name: String,
        children_state: LoadState,
        children: Vec<NodeId>,
        expanded: bool,
        has_children: bool,
    },
    File {
        path: PathBuf,
        name: String,
    },
}

impl FileTreeNode {
    fn from_entry(entry: TreeEntry) -> Self {
        match entry.kind {
            EntryKind::File => FileTreeNode::File {
                path: entry.path,
                name: entry.name,
            },
            EntryKind::Directory => FileTreeNode::Directory {
                path: entry.path,
                name: entry.name,
                children_state: LoadState::Unloaded,
                children: Vec::new(),
                expanded: false,
                has_children: entry.has_children.unwrap_or(true),
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileTreeNode::Directory { path, .. } | FileTreeNode::File { path, .. } => path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileTreeNode::Directory { name, .. } | FileTreeNode::File { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileTreeNode::Directory { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            FileTreeNode::Directory { children, .. } => children,
            FileTreeNode::File { .. } => &[],
        }
    }

    pub fn load_state(&self) -> Option<LoadState> {
        match self {
            FileTreeNode::Directory { children_state, .. } => Some(*children_state),
            FileTreeNode::File { .. } => None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, FileTreeNode::Directory { expanded: true, .. })
    }
}

/// Directories first, then case-insensitive by name.
pub fn sibling_order(a: &FileTreeNode, b: &FileTreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileTreeError {
    #[error("no folder is open")]
    NoRoot,
    #[error("{0} is not in the tree")]
    NotFound(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Children are unknown; the caller must ask the storage side for them.
    RequestListing(PathBuf),
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted: bool,
    /// Collapsed, never-listed directories revealed on the way down.
    pub listings: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub has_children: bool,
    pub load_state: Option<LoadState>,
    pub is_active: bool,
}

#[derive(Default)]
pub struct FileTree {
    arena: SlotMap<NodeId, FileTreeNode>,
    parents: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    id_by_path: FxHashMap<PathBuf, NodeId>,
    active_path: Option<PathBuf>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_path(&self) -> Option<&Path> {
        self.root.and_then(|id| self.arena.get(id)).map(|n| n.path())
    }

    pub fn is_under_root(&self, path: &Path) -> bool {
        self.root_path()
            .is_some_and(|root| path != root && path.starts_with(root))
    }

    pub fn node(&self, id: NodeId) -> Option<&FileTreeNode> {
        self.arena.get(id)
    }

    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.id_by_path.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.id_by_path.contains_key(path)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied()
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.arena.len().saturating_sub(usize::from(self.root.is_some()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the whole tree and start over at `root`.
    pub fn open_root(&mut self, root: PathBuf, entries: Vec<TreeEntry>) {
        self.arena.clear();
        self.parents.clear();
        self.id_by_path.clear();

        let name = file_name_of(&root);
        let id = self.arena.insert(FileTreeNode::Directory {
            path: root.clone(),
            name,
            children_state: LoadState::Loaded,
            children: Vec::new(),
            expanded: true,
            has_children: false,
        });
        self.id_by_path.insert(root.clone(), id);
        self.root = Some(id);

        let _ = self.attach_children(&root, entries);
    }

    /// Replace the children of the directory at `path` with a fresh listing.
    pub fn attach_children(
        &mut self,
        path: &Path,
        entries: Vec<TreeEntry>,
    ) -> Result<usize, FileTreeError> {
        if self.root.is_none() {
            return Err(FileTreeError::NoRoot);
        }
        let dir_id = self
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_path_buf()))?;
        let old_children = match self.arena.get(dir_id) {
            Some(FileTreeNode::Directory { children, .. }) => children.clone(),
            _ => return Err(FileTreeError::NotADirectory(path.to_path_buf())),
        };
        for child in old_children {
            self.remove_subtree(child);
        }

        let mut fresh = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.path.parent() != Some(path) {
                tracing::debug!(
                    entry = %entry.path.display(),
                    parent = %path.display(),
                    "dropping listing entry that is not a direct child"
                );
                continue;
            }
            if self.id_by_path.contains_key(&entry.path) {
                continue;
            }
            let entry_path = entry.path.clone();
            let id = self.arena.insert(FileTreeNode::from_entry(entry));
            self.parents.insert(id, dir_id);
            self.id_by_path.insert(entry_path, id);
            fresh.push(id);
        }

        let arena = &self.arena;
        fresh.sort_by(|a, b| sibling_order(&arena[*a], &arena[*b]));
        let count = fresh.len();

        if let Some(FileTreeNode::Directory {
            children,
            children_state,
            has_children,
            ..
        }) = self.arena.get_mut(dir_id)
        {
            *children = fresh;
            *children_state = LoadState::Loaded;
            *has_children = count > 0;
        }
        Ok(count)
    }

    pub fn expand(&mut self, path: &Path) -> Result<ExpandOutcome, FileTreeError> {
        let id = self
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_path_buf()))?;
        let Some(FileTreeNode::Directory {
            children_state,
            expanded,
            has_children,
            ..
        }) = self.arena.get_mut(id)
        else {
            return Err(FileTreeError::NotADirectory(path.to_path_buf()));
        };

        if *expanded {
            *expanded = false;
            return Ok(ExpandOutcome::Collapsed);
        }

        *expanded = true;
        let state = *children_state;
        match state {
            LoadState::Loaded => Ok(ExpandOutcome::Expanded),
            LoadState::Unloaded | LoadState::Loading if !*has_children => {
                *children_state = LoadState::Loaded;
                Ok(ExpandOutcome::Expanded)
            }
            LoadState::Unloaded | LoadState::Loading => {
                *children_state = LoadState::Loading;
                Ok(ExpandOutcome::RequestListing(path.to_path_buf()))
            }
        }
    }

    pub fn collapse(&mut self, path: &Path) -> bool {
        let Some(id) = self.find(path) else {
            return false;
        };
        match self.arena.get_mut(id) {
            Some(FileTreeNode::Directory { expanded, .. }) if *expanded => {
                *expanded = false;
                true
            }
            _ => false,
        }
    }

    /// Optimistically place a single file, revealing its ancestors.
    pub fn insert_file(&mut self, path: &Path) -> InsertOutcome {
        let mut outcome = InsertOutcome::default();
        let (Some(root_id), Some(root_path)) = (self.root, self.root_path().map(Path::to_path_buf))
        else {
            return outcome;
        };
        if !self.is_under_root(path) || self.contains(path) {
            return outcome;
        }
        let Ok(rel) = path.strip_prefix(&root_path) else {
            return outcome;
        };
        let components: Vec<_> = rel.components().collect();
        let Some((_, dirs)) = components.split_last() else {
            return outcome;
        };

        let mut parent = root_id;
        let mut current = root_path;
        for component in dirs {
            current.push(component);
            let Some(id) = self.find(&current) else {
                return outcome;
            };
            match self.arena.get_mut(id) {
                Some(FileTreeNode::Directory {
                    expanded,
                    children_state,
                    has_children,
                    ..
                }) => {
                    *has_children = true;
                    if !*expanded {
                        *expanded = true;
                        if *children_state != LoadState::Loaded {
                            *children_state = LoadState::Loading;
                            outcome.listings.push(current.clone());
                        }
                    }
                }
                _ => return outcome,
            }
            parent = id;
        }

        let node = FileTreeNode::File {
            path: path.to_path_buf(),
            name: file_name_of(path),
        };
        let position = self.arena[parent]
            .children()
            .partition_point(|c| sibling_order(&self.arena[*c], &node) == Ordering::Less);
        let id = self.arena.insert(node);
        self.parents.insert(id, parent);
        self.id_by_path.insert(path.to_path_buf(), id);
        if let Some(FileTreeNode::Directory {
            children,
            has_children,
            ..
        }) = self.arena.get_mut(parent)
        {
            children.insert(position, id);
            *has_children = true;
        }
        outcome.inserted = true;
        outcome
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active_path.as_deref()
    }

    pub fn set_active_path(&mut self, path: Option<&Path>) -> bool {
        if self.active_path.as_deref() == path {
            return false;
        }
        self.active_path = path.map(Path::to_path_buf);
        true
    }

    /// Visible rows in display order; children of collapsed directories are skipped.
    pub fn rows(&self) -> Vec<FileTreeRow> {
        let mut rows = Vec::new();
        let Some(root) = self.root else {
            return rows;
        };
        let mut stack: Vec<(NodeId, u16)> = self.arena[root]
            .children()
            .iter()
            .rev()
            .map(|id| (*id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let has_children = match node {
                FileTreeNode::Directory { has_children, .. } => *has_children,
                FileTreeNode::File { .. } => false,
            };
            rows.push(FileTreeRow {
                id,
                depth,
                name: node.name().to_string(),
                path: node.path().to_path_buf(),
                is_dir: node.is_dir(),
                is_expanded: node.is_expanded(),
                has_children,
                load_state: node.load_state(),
                is_active: self.active_path.as_deref() == Some(node.path()),
            });
            if node.is_expanded() {
                for child in node.children().iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }
        rows
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.arena.remove(node_id) {
                stack.extend_from_slice(node.children());
                self.id_by_path.remove(node.path());
            }
            self.parents.remove(node_id);
        }
    }
}

impl std::fmt::Debug for FileTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTree")
            .field("root", &self.root_path())
            .field("nodes", &self.len())
            .field("active", &self.active_path)
            .finish()
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Entries the explorer never lists.
pub fn should_ignore(name: &str) -> bool {
    matches!(
        name,
        ".DS_Store"
            | ".Spotlight-V100"
            | ".Trashes"
            | ".fseventsd"
            | ".TemporaryItems"
            | "Thumbs.db"
            | "desktop.ini"
            | ".git"
            | "node_modules"
    )
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
