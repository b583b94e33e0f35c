//! # TitleBar Component
//!
//! Top status bar showing the backend endpoint and the current status message.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has no
//! internal state, which keeps it trivial to test:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     base_url: app.base_url.clone(),
//!     status_message: app.status_message.clone(),
//!     busy: app.is_busy(),
//!     spinner_frame: frame_counter,
//! };
//! title_bar.render(frame, title_area);
//! ```
//!
//! The spinner frame is owned by the event loop (it advances on redraws, not
//! on state changes), so it arrives as a prop like everything else.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Braille spinner shown while a request is in flight.
const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Top status bar component.
///
/// # Props
///
/// - `base_url`: backend endpoint, so it is obvious which server answers
/// - `status_message`: last submission outcome (e.g. "✅ Meeting notes saved!")
/// - `busy`: whether any request is in flight
/// - `spinner_frame`: monotonically increasing redraw counter
pub struct TitleBar {
    pub base_url: String,
    pub status_message: String,
    pub busy: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(base_url: String, status_message: String, busy: bool, spinner_frame: usize) -> Self {
        Self {
            base_url,
            status_message,
            busy,
            spinner_frame,
        }
    }
}

impl Component for TitleBar {
    /// Render the title bar as a single line.
    ///
    /// Shows, in priority order: app name and backend URL (always), the
    /// status message (if any), and the spinner (while busy).
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title_text = format!("Minuteman ({})", self.base_url);
        if !self.status_message.is_empty() {
            title_text.push_str(" | ");
            title_text.push_str(&self.status_message);
        }
        if self.busy {
            let frame_char = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            title_text.push_str(" | ");
            title_text.push(frame_char);
            title_text.push_str(" working...");
        }

        frame.render_widget(Span::raw(title_text), area);
    }
}
