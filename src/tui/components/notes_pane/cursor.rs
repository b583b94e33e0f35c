//! Cursor tracking and wrapping math for the notes pane.
//!
//! `NotesCursor` owns the cursor byte offset and internal scroll. The text it
//! navigates lives in `App::note_draft`, so every method takes `buffer: &str`
//! explicitly.

use ratatui::layout::Rect;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown at once; the pane has a fixed height, so longer drafts
/// scroll internally
pub(super) const VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

/// Textwrap options for the pane's inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner content width after border/padding overhead. 0 when the area is too
/// narrow to show anything.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// One wrapped display line together with the byte offset where it starts in
/// the source text.
struct WrappedLine<'t> {
    start: usize,
    text: std::borrow::Cow<'t, str>,
}

/// Wrap `buffer` and pair every display line with its starting byte offset.
///
/// textwrap swallows the whitespace it breaks on, so the offsets are rebuilt
/// by skipping trimmed spaces and the broken newline after each line. A
/// trailing newline gets an explicit empty final line, since textwrap does
/// not always emit one.
fn wrapped_lines(buffer: &str, width: u16) -> Vec<WrappedLine<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for text in textwrap::wrap(buffer, wrap_options(width)) {
        let mut end = start + text.len();
        lines.push(WrappedLine { start, text });
        while buffer.as_bytes().get(end) == Some(&b' ') {
            end += 1;
        }
        if buffer.as_bytes().get(end) == Some(&b'\n') {
            end += 1;
        }
        start = end;
    }

    let needs_final_empty = buffer.ends_with('\n')
        && !lines
            .last()
            .is_some_and(|l| l.text.is_empty() && l.start == buffer.len());
    if lines.is_empty() || needs_final_empty {
        lines.push(WrappedLine {
            start: buffer.len(),
            text: "".into(),
        });
    }
    lines
}

/// Display line index and byte column of `pos` within `lines`.
fn locate(lines: &[WrappedLine], pos: usize) -> (usize, usize) {
    let idx = lines
        .partition_point(|line| line.start <= pos)
        .saturating_sub(1);
    (idx, pos - lines[idx].start)
}

/// Number of wrapped display lines for `text` at the given width.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    wrapped_lines(text, width).len() as u16
}

/// Byte offset of the character boundary immediately before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary immediately after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

/// Cursor and scroll state for the notes draft, persisted across frames.
pub struct NotesCursor {
    /// Cursor position as byte offset into the draft (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line (0 when the draft fits)
    pub scroll_offset: u16,
    /// Area width from the last render, used for vertical movement between
    /// renders
    pub last_area_width: u16,
}

impl Default for NotesCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesCursor {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Reset after the draft is cleared.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Drafts can be cleared by the reducer after a successful extract, which
    /// would leave the cursor pointing past the end of the buffer.
    pub fn clamp_to(&mut self, buffer: &str) {
        if self.pos > buffer.len() {
            self.pos = buffer.len();
        }
        while !buffer.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
    }

    /// Move the cursor one wrapped line up (`direction < 0`) or down,
    /// keeping the column where possible. Returns false at the boundary.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_area_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let lines = wrapped_lines(buffer, width);
        let (idx, column) = locate(&lines, self.pos);

        let target = if direction < 0 {
            match idx.checked_sub(1) {
                Some(target) => target,
                None => return false,
            }
        } else {
            if idx + 1 >= lines.len() {
                return false;
            }
            idx + 1
        };

        let line = &lines[target];
        self.pos = line.start + column.min(line.text.len());
        // The byte column may land inside a multi-byte character.
        while !buffer.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
        true
    }

    /// Which wrapped line (0-based) the cursor sits on.
    pub fn cursor_line(&self, buffer: &str, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        if width == 0 {
            return 0;
        }
        locate(&wrapped_lines(buffer, width), self.pos).0 as u16
    }

    /// Adjust `scroll_offset` so the cursor stays within the visible lines.
    pub fn follow_cursor(&mut self, buffer: &str, area_width: u16) {
        let width = inner_width(area_width);
        if wrap_line_count(buffer, width) <= VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let line = self.cursor_line(buffer, area_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + VISIBLE_LINES {
            self.scroll_offset = line.saturating_sub(VISIBLE_LINES - 1);
        }
    }

    /// Screen (column, row) for the terminal cursor.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + BORDER_OFFSET, area.y + BORDER_OFFSET);
        }

        let lines = wrapped_lines(buffer, width);
        let (idx, _) = locate(&lines, self.pos);
        let cursor_col = buffer[lines[idx].start..self.pos].chars().count() as u16;

        let visible_line = (idx as u16).saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + cursor_col,
            area.y + BORDER_OFFSET + visible_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_line_count_empty_and_zero_width() {
        assert_eq!(wrap_line_count("", 80), 1);
        assert_eq!(wrap_line_count("agenda", 0), 1);
    }

    #[test]
    fn wrap_line_count_wraps_and_counts_newlines() {
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
        assert_eq!(wrap_line_count("a\nb\nc", 80), 3);
        assert_eq!(wrap_line_count("hello\n", 80), 2);
    }

    #[test]
    fn char_boundaries_multibyte() {
        let s = "café";
        assert_eq!(prev_char_boundary(s, 5), 3);
        assert_eq!(next_char_boundary(s, 3), 5);
    }

    #[test]
    fn wrapped_lines_track_byte_offsets() {
        // Soft wraps swallow the separating space, so each line's start must
        // skip past it.
        let lines = wrapped_lines("plan the offsite agenda", 8);
        let starts: Vec<usize> = lines.iter().map(|l| l.start).collect();
        assert_eq!(starts, vec![0, 9, 17]);
        assert_eq!(lines[2].text, "agenda");
    }

    #[test]
    fn cursor_line_after_trailing_newline() {
        let mut cursor = NotesCursor::new();
        cursor.pos = 7;
        assert_eq!(cursor.cursor_line("agenda\n", 84), 1);
    }

    #[test]
    fn move_down_through_hard_wrap() {
        let mut cursor = NotesCursor::new();
        cursor.last_area_width = 9; // inner width 5
        let buffer = "aaaaabbbbb";
        cursor.pos = 2;

        assert!(cursor.move_vertically(buffer, 1));
        assert_eq!(cursor.pos, 7, "column 2 of the second wrapped line");
    }

    #[test]
    fn move_down_keeps_column() {
        let mut cursor = NotesCursor::new();
        cursor.last_area_width = 84; // inner width 80
        let buffer = "first line\nsecond line";
        cursor.pos = 3;

        assert!(cursor.move_vertically(buffer, 1));
        // "first line\n" is 11 bytes; column 3 of line 2
        assert_eq!(cursor.pos, 14);

        assert!(!cursor.move_vertically(buffer, 1), "already on last line");
    }

    #[test]
    fn move_up_clamps_to_shorter_line() {
        let mut cursor = NotesCursor::new();
        cursor.last_area_width = 84;
        let buffer = "ab\nlonger line";
        cursor.pos = buffer.len();

        assert!(cursor.move_vertically(buffer, -1));
        assert!(cursor.pos <= 2, "clamped to the short first line");
    }

    #[test]
    fn follow_cursor_scrolls_past_visible_lines() {
        let mut cursor = NotesCursor::new();
        let buffer = "1\n2\n3\n4\n5\n6\n7\n8";
        cursor.pos = buffer.len();

        cursor.follow_cursor(buffer, 84);
        // Cursor on line 7 (0-based), 5 visible: scroll to 3
        assert_eq!(cursor.scroll_offset, 3);

        cursor.pos = 0;
        cursor.follow_cursor(buffer, 84);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn clamp_after_external_clear() {
        let mut cursor = NotesCursor::new();
        cursor.pos = 40;
        cursor.clamp_to("short");
        assert_eq!(cursor.pos, 5);
    }
}
