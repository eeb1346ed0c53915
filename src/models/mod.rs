//! Data model layer: no I/O, no channels.

pub mod file_tree;
pub mod text_buffer;

pub use file_tree::{
    should_ignore, EntryKind, ExpandOutcome, FileTree, FileTreeError, FileTreeNode, FileTreeRow,
    InsertOutcome, LoadState, NodeId, TreeEntry,
};
pub use text_buffer::{slice_to_cow, TextBuffer};
