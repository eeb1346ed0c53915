use super::*;

#[test]
fn test_text_buffer_basic() {
    let mut buffer = TextBuffer::from_text("hello\nworld");

    assert_eq!(buffer.len_lines(), 2);
    assert_eq!(buffer.cursor(), (0, 0));

    buffer.set_cursor(1, 2);
    assert_eq!(buffer.cursor(), (1, 2));

    buffer.set_cursor(9, 99);
    assert_eq!(buffer.cursor(), (1, 5));
}

#[test]
fn test_insert_moves_cursor() {
    let mut buffer = TextBuffer::new();
    buffer.insert_str("ab\nc");

    assert_eq!(buffer.text(), "ab\nc");
    assert_eq!(buffer.cursor(), (1, 1));
    assert_eq!(buffer.version(), 1);
}

#[test]
fn test_delete_backward_joins_lines() {
    let mut buffer = TextBuffer::from_text("ab\ncd");
    buffer.set_cursor(1, 0);

    assert!(buffer.delete_backward());
    assert_eq!(buffer.text(), "abcd");
    assert_eq!(buffer.cursor(), (0, 2));

    buffer.set_cursor(0, 0);
    assert!(!buffer.delete_backward());
}

#[test]
fn test_undo_redo_restores_cursor() {
    let mut buffer = TextBuffer::from_text("x");
    buffer.set_cursor(0, 1);
    buffer.insert_str("yz");
    assert_eq!(buffer.text(), "xyz");

    assert!(buffer.undo());
    assert_eq!(buffer.text(), "x");
    assert_eq!(buffer.cursor(), (0, 1));

    assert!(buffer.redo());
    assert_eq!(buffer.text(), "xyz");
    assert_eq!(buffer.cursor(), (0, 3));
    assert!(!buffer.redo());
}

#[test]
fn test_set_text_is_undoable_and_skips_identical() {
    let mut buffer = TextBuffer::from_text("one");
    buffer.set_text("one");
    assert!(!buffer.can_undo());

    buffer.set_text("two\nlines");
    assert!(buffer.content_eq("two\nlines"));
    assert!(buffer.undo());
    assert!(buffer.content_eq("one"));
}

#[test]
fn test_line_len_ignores_crlf() {
    let buffer = TextBuffer::from_text("abc\r\nde\n");
    assert_eq!(buffer.line_len(0), 3);
    assert_eq!(buffer.line_len(1), 2);
    assert_eq!(buffer.line_len(2), 0);
}
