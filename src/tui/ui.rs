//! Frame composition: arranges the component tree into the fixed four-row
//! layout (title bar, message log, notes pane, question prompt).

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::notes_pane::PANE_HEIGHT;
use crate::tui::components::{MessageList, NotesPane, TitleBar};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, app: &mut App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(PANE_HEIGHT), Length(3)]);
    let [title_area, log_area, notes_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.base_url.clone(),
        app.status_message.clone(),
        app.is_busy(),
        spinner_frame,
    );
    title_bar.render(frame, title_area);

    let mut message_list = MessageList::new(&mut tui.message_list, &app.log);
    message_list.render(frame, log_area);

    let attachment_name = app.attachment.as_ref().map(|a| a.name.as_str());
    let mut notes_pane = NotesPane::new(
        &mut app.note_draft,
        &mut tui.notes,
        tui.focus == Focus::Notes,
        attachment_name,
    );
    notes_pane.render(frame, notes_area);

    tui.input.focused = tui.focus == Focus::Question;
    tui.input.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Message;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_frame(app: &mut App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_smoke() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let text = rendered_frame(&mut app, &mut tui);

        assert!(text.contains("Minuteman"));
        assert!(text.contains("Meeting notes"));
        assert!(text.contains("Ask a question"));
    }

    #[test]
    fn test_draw_ui_shows_log_messages() {
        let mut app = test_app();
        app.log.push(Message::user("what was decided?"));
        let mut tui = TuiState::new();

        let text = rendered_frame(&mut app, &mut tui);
        assert!(text.contains("what was decided?"));
    }

    #[test]
    fn test_draw_ui_shows_status() {
        let mut app = test_app();
        app.status_message = "✅ Meeting notes saved!".to_string();
        let mut tui = TuiState::new();

        // Wide emoji cells break up the collected symbols, so match the
        // status text without the leading glyph.
        let text = rendered_frame(&mut app, &mut tui);
        assert!(text.contains("Meeting notes saved!"));
    }
}
