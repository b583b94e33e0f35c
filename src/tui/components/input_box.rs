//! # InputBox Component
//!
//! Single-line prompt at the bottom of the screen. Normally it captures the
//! next question; after Ctrl+F it becomes a file-path prompt for staging an
//! attachment.
//!
//! ## State Management
//!
//! The buffer, cursor, and horizontal scroll are internal state. The prompt
//! mode and focus flag are set by the event loop.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border overhead on each side of the content.
const BORDER_OFFSET: u16 = 1;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed with non-blank content).
    /// Interpretation depends on the current [`PromptMode`].
    Submit(String),
    /// Text content changed (parent may want to redraw)
    ContentChanged,
}

/// What the prompt currently collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Free-text question for the chat endpoint.
    Question,
    /// Path of a file to stage as the draft attachment.
    AttachPath,
}

pub struct InputBox {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Current prompt mode (set by the event loop)
    pub mode: PromptMode,
    /// Whether the cursor should be drawn here this frame (prop)
    pub focused: bool,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible display column (horizontal scrolling)
    scroll: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            mode: PromptMode::Question,
            focused: true,
            cursor: 0,
            scroll: 0,
        }
    }

    /// Leave attach mode, dropping whatever path was half-typed.
    pub fn cancel_attach(&mut self) {
        self.mode = PromptMode::Question;
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn enter_attach(&mut self) {
        self.mode = PromptMode::AttachPath;
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Put submitted text back, cursor at the end. Used when the event loop
    /// could not act on a submit and the user should not lose the text.
    pub fn restore(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }

    fn title(&self) -> &'static str {
        match self.mode {
            PromptMode::Question => "Ask a question (Enter to send)",
            PromptMode::AttachPath => "Attach file: type a path (Esc to cancel)",
        }
    }

    /// Display column of the cursor, in terminal cells.
    fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor]
            .chars()
            .map(|c| c.width().unwrap_or(0) as u16)
            .sum()
    }

    /// Keep the cursor inside the visible window of `inner_width` cells.
    fn update_scroll(&mut self, inner_width: u16) {
        if inner_width == 0 {
            return;
        }
        let col = self.cursor_column();
        if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + inner_width {
            self.scroll = col - inner_width + 1;
        }
    }

    /// The slice of the buffer that fits in the window starting at `scroll`.
    fn visible_text(&self, inner_width: u16) -> String {
        let mut out = String::new();
        let mut col: u16 = 0;
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0) as u16;
            if col + w > self.scroll + inner_width {
                break;
            }
            if col >= self.scroll {
                out.push(c);
            }
            col += w;
        }
        out
    }

    fn insert_text(&mut self, text: &str) {
        // Single-line prompt: newlines from paste collapse to spaces.
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            self.buffer.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(BORDER_OFFSET * 2);
        self.update_scroll(inner_width);

        let style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(self.title());

        let input = Paragraph::new(self.visible_text(inner_width))
            .block(block)
            .style(style);

        frame.render_widget(input, area);

        if self.focused {
            let col = self.cursor_column().saturating_sub(self.scroll);
            frame.set_cursor_position((
                area.x + BORDER_OFFSET + col,
                area.y + BORDER_OFFSET,
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut buf));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_text(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = self.next_boundary();
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary();
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = self.next_boundary();
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    // Blank submit is a silent no-op; the half-typed
                    // whitespace stays in the box.
                    None
                } else {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor = 0;
                    self.scroll = 0;
                    Some(InputEvent::Submit(text))
                }
            }
            _ => None,
        }
    }
}
