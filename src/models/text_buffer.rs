//! Rope-backed text buffer behind an open document.
//!
//! The editing widget owns the fine-grained mechanics; the session only needs
//! a handle that can report its content and survive a path rebind with
//! cursor and undo history intact.

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

#[derive(Clone)]
struct Snapshot {
    rope: Rope,
    cursor: (usize, usize),
}

#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: (usize, usize),
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    version: u64,
}

impl TextBuffer {
    const MAX_UNDO: usize = 512;

    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: (0, 0),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            version: 0,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn content_eq(&self, other: &str) -> bool {
        self.rope.len_bytes() == other.len() && self.rope == other
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.len_lines().saturating_sub(1));
        let col = col.min(self.line_len(row));
        self.cursor = (row, col);
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        (row < self.rope.len_lines()).then(|| slice_to_cow(self.rope.line(row)))
    }

    /// Length of `row` in chars, excluding the line break.
    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(row);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    fn cursor_char(&self) -> usize {
        let (row, col) = self.cursor;
        self.rope.line_to_char(row) + col.min(self.line_len(row))
    }

    fn set_cursor_char(&mut self, char_idx: usize) {
        let char_idx = char_idx.min(self.rope.len_chars());
        let row = self.rope.char_to_line(char_idx);
        self.cursor = (row, char_idx - self.rope.line_to_char(row));
    }

    fn checkpoint(&mut self) {
        self.undo_stack.push(Snapshot {
            rope: self.rope.clone(),
            cursor: self.cursor,
        });
        if self.undo_stack.len() > Self::MAX_UNDO {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.version = self.version.saturating_add(1);
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.checkpoint();
        let at = self.cursor_char();
        self.rope.insert(at, text);
        self.set_cursor_char(at + text.chars().count());
    }

    pub fn delete_backward(&mut self) -> bool {
        let at = self.cursor_char();
        if at == 0 {
            return false;
        }
        self.checkpoint();
        self.rope.remove(at - 1..at);
        self.set_cursor_char(at - 1);
        true
    }

    /// Replace the whole content as a single undoable step.
    pub fn set_text(&mut self, text: &str) {
        if self.content_eq(text) {
            return;
        }
        self.checkpoint();
        let cursor = self.cursor;
        self.rope = Rope::from_str(text);
        self.set_cursor(cursor.0, cursor.1);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Snapshot {
            rope: std::mem::replace(&mut self.rope, prev.rope),
            cursor: self.cursor,
        });
        self.cursor = prev.cursor;
        self.version = self.version.saturating_add(1);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Snapshot {
            rope: std::mem::replace(&mut self.rope, next.rope),
            cursor: self.cursor,
        });
        self.cursor = next.cursor;
        self.version = self.version.saturating_add(1);
        true
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("cursor", &self.cursor)
            .field("lines", &self.len_lines())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
