use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::api::{Message, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders a single chat bubble with
/// sender-based styling.
///
/// `Bubble` is a transient component: created fresh each frame with the
/// message it needs to render, holding no state of its own.
///
/// Each sender gets distinct visual treatment:
/// - **System** (yellow): local notices and extraction results
/// - **User** (cyan): questions typed by the user
/// - **Bot** (green): answers from the backend
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height
/// using `textwrap` with options that match Ratatui's `Paragraph` wrapping
/// behavior. This lets the parent `MessageList` compute scroll positions
/// without rendering each bubble first.
#[derive(Clone, Copy)]
pub struct Bubble<'a> {
    pub message: &'a Message,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Calculate the height required for this bubble at the given width.
    ///
    /// The wrapping options must match the Ratatui default for `Paragraph`
    /// to ensure a 1:1 mapping between calculated and actual height.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let content = message.text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn label(&self) -> &'static str {
        match self.message.sender {
            Sender::System => "system",
            Sender::User => "you",
            Sender::Bot => "assistant",
        }
    }

    fn base_style(&self) -> Style {
        match self.message.sender {
            Sender::System => Style::default().fg(Color::Yellow),
            Sender::User => Style::default().fg(Color::Cyan),
            Sender::Bot => Style::default().fg(Color::Green),
        }
    }
}

// Widget impl so bubbles can be rendered straight into a ScrollView
impl<'a> Widget for Bubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.base_style();
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(self.label())
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let paragraph = Paragraph::new(self.message.text.trim())
            .block(block)
            .style(style)
            .wrap(Wrap { trim: true });

        paragraph.render(area, buf);
    }
}
