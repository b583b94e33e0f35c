//! # Application State
//!
//! Core business state for Minuteman. This module contains domain data only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn Backend>       // HTTP transport seam
//! ├── base_url: String                // where the backend lives (title bar)
//! ├── log: MessageLog                 // append-only conversation
//! ├── note_draft: String              // pasted meeting notes
//! ├── attachment: Option<Attachment>  // staged file upload
//! ├── extract_in_flight: bool         // extraction request outstanding
//! ├── chat_in_flight: bool            // chat request outstanding
//! ├── extract_generation: u64         // discards stale extract responses
//! ├── chat_generation: u64            // discards stale chat responses
//! ├── clear_drafts_on_error: bool     // draft-retention policy (config)
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs,
//! except for draft editing: the notes pane mutates `note_draft` directly
//! because keystrokes are presentation-local until a submit happens.

use std::sync::Arc;

use crate::api::{Attachment, Backend, MessageLog};
use crate::core::config::ResolvedConfig;

pub struct App {
    pub backend: Arc<dyn Backend>,
    pub base_url: String,
    pub log: MessageLog,
    pub note_draft: String,
    pub attachment: Option<Attachment>,
    /// True while an extraction request is outstanding. Checked in the
    /// reducer, not just reflected in disabled controls, so a rapid double
    /// submit is a no-op.
    pub extract_in_flight: bool,
    /// Same guard for the chat flow. The two flows stay independent.
    pub chat_in_flight: bool,
    /// Bumped on every dispatched extract; a completion carrying an older
    /// value is dropped instead of appended.
    pub extract_generation: u64,
    pub chat_generation: u64,
    /// When true, a failed extraction also clears the drafts. Default keeps
    /// them so the user can retry without re-pasting.
    pub clear_drafts_on_error: bool,
    pub status_message: String,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, base_url: String) -> Self {
        Self {
            backend,
            base_url,
            log: MessageLog::new(),
            note_draft: String::new(),
            attachment: None,
            extract_in_flight: false,
            chat_in_flight: false,
            extract_generation: 0,
            chat_generation: 0,
            clear_drafts_on_error: false,
            status_message: String::from("Paste notes above, ask questions below."),
        }
    }

    pub fn from_config(backend: Arc<dyn Backend>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(backend, config.base_url.clone());
        app.clear_drafts_on_error = config.clear_drafts_on_error;
        app
    }

    /// Either flow outstanding. Drives the title-bar busy indicator.
    pub fn is_busy(&self) -> bool {
        self.extract_in_flight || self.chat_in_flight
    }

    /// True when there is nothing to extract: no non-whitespace notes and
    /// no staged attachment.
    pub fn drafts_empty(&self) -> bool {
        self.note_draft.trim().is_empty() && self.attachment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.log.is_empty());
        assert!(!app.is_busy());
        assert!(app.drafts_empty());
        assert!(!app.clear_drafts_on_error);
        assert_eq!(app.base_url, "http://test.invalid");
    }

    #[test]
    fn test_drafts_empty_ignores_whitespace() {
        let mut app = test_app();
        app.note_draft = "   \n\t ".to_string();
        assert!(app.drafts_empty());

        app.note_draft = " x ".to_string();
        assert!(!app.drafts_empty());
    }
}
