//! # NotesPane Component
//!
//! Multi-line editor for the meeting-notes draft. The draft itself lives in
//! `App::note_draft` because the reducer needs to read and clear it; the pane
//! only owns presentation state (cursor, scroll).
//!
//! ## State Management
//!
//! `NotesState` is persistent TUI state. `NotesPane` is the transient
//! per-frame component: it borrows the draft mutably together with the state,
//! so edits land directly in the application buffer.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{
    NotesCursor, VERTICAL_OVERHEAD, VISIBLE_LINES, inner_width, next_char_boundary,
    prev_char_boundary, wrap_line_count, wrap_options,
};

/// Total pane height for the main layout (visible lines plus borders).
pub const PANE_HEIGHT: u16 = VISIBLE_LINES + VERTICAL_OVERHEAD;

/// Events emitted by the notes pane
#[derive(Debug, Clone, PartialEq)]
pub enum NotesEvent {
    /// Draft content or cursor changed (parent should redraw)
    ContentChanged,
}

/// Persistent editor state for the notes draft.
#[derive(Default)]
pub struct NotesState {
    cursor: NotesCursor,
}

impl NotesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after anything other than the pane mutated the draft.
    pub fn sync_with(&mut self, buffer: &str) {
        self.cursor.clamp_to(buffer);
        if buffer.is_empty() {
            self.cursor.reset();
        }
    }
}

/// Transient notes editor, rebuilt each frame.
///
/// # Props
///
/// - `focused`: whether keyboard input and the terminal cursor belong here
/// - `attachment_name`: staged file shown as a badge in the title
pub struct NotesPane<'a> {
    pub buffer: &'a mut String,
    pub state: &'a mut NotesState,
    pub focused: bool,
    pub attachment_name: Option<&'a str>,
}

impl<'a> NotesPane<'a> {
    pub fn new(
        buffer: &'a mut String,
        state: &'a mut NotesState,
        focused: bool,
        attachment_name: Option<&'a str>,
    ) -> Self {
        Self {
            buffer,
            state,
            focused,
            attachment_name,
        }
    }

    fn title(&self) -> String {
        match self.attachment_name {
            Some(name) => format!("Meeting notes [📎 {name}] (Ctrl+E save, Ctrl+X detach)"),
            None => "Meeting notes (Ctrl+E save, Ctrl+F attach)".to_string(),
        }
    }

    /// Visible slice of the wrapped draft, honoring the internal scroll.
    fn visible_text(&self, area_width: u16) -> String {
        if self.state.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(area_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(self.buffer.as_str(), wrap_options(width));
        let start = self.state.cursor.scroll_offset as usize;
        let end = (start + VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let total_lines = wrap_line_count(self.buffer, width);
        if total_lines <= VISIBLE_LINES {
            return;
        }

        let max_scroll = total_lines.saturating_sub(VISIBLE_LINES);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.state.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for NotesPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.cursor.last_area_width = area.width;
        self.state.cursor.clamp_to(self.buffer);
        self.state.cursor.follow_cursor(self.buffer, area.width);

        let style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(self.title());

        let pane = Paragraph::new(self.visible_text(area.width))
            .block(block)
            .style(style);

        frame.render_widget(pane, area);
        self.render_scrollbar(frame, area);

        if self.focused {
            let (cursor_x, cursor_y) = self.state.cursor.screen_pos(self.buffer, area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

impl EventHandler for NotesPane<'_> {
    type Event = NotesEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let cursor = &mut self.state.cursor;
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(cursor.pos, *c);
                cursor.pos += c.len_utf8();
                Some(NotesEvent::ContentChanged)
            }
            // Enter inserts a newline; extraction is triggered by Ctrl+E.
            TuiEvent::Submit => {
                self.buffer.insert(cursor.pos, '\n');
                cursor.pos += 1;
                Some(NotesEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(cursor.pos, text);
                cursor.pos += text.len();
                Some(NotesEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if cursor.pos > 0 {
                    let prev = prev_char_boundary(self.buffer, cursor.pos);
                    self.buffer.drain(prev..cursor.pos);
                    cursor.pos = prev;
                    Some(NotesEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(self.buffer, cursor.pos);
                    self.buffer.drain(cursor.pos..next);
                    Some(NotesEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if cursor.pos > 0 {
                    cursor.pos = prev_char_boundary(self.buffer, cursor.pos);
                    Some(NotesEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if cursor.pos < self.buffer.len() {
                    cursor.pos = next_char_boundary(self.buffer, cursor.pos);
                    Some(NotesEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorUp => cursor
                .move_vertically(self.buffer, -1)
                .then_some(NotesEvent::ContentChanged),
            TuiEvent::CursorDown => cursor
                .move_vertically(self.buffer, 1)
                .then_some(NotesEvent::ContentChanged),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (cursor.pos != line_start).then(|| {
                    cursor.pos = line_start;
                    NotesEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[cursor.pos..]
                    .find('\n')
                    .map(|i| cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (cursor.pos != line_end).then(|| {
                    cursor.pos = line_end;
                    NotesEvent::ContentChanged
                })
            }
            _ => None,
        }
    }
}
