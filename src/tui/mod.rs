//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw:
//!
//! - **Busy** (request in flight): draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::{Attachment, Backend, HttpBackend, Message};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, NotesState, PromptMode};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives editing keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The multi-line notes draft.
    Notes,
    /// The single-line question (or attach-path) prompt.
    Question,
}

impl Focus {
    fn toggled(self) -> Self {
        match self {
            Focus::Notes => Focus::Question,
            Focus::Question => Focus::Notes,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub notes: NotesState,
    pub input: InputBox,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            notes: NotesState::new(),
            input: InputBox::new(),
            // Pasting notes is the usual first step.
            focus: Focus::Notes,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        config.base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for completions from background request tasks
    let (tx, rx) = mpsc::channel();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Busy means the spinner is animating, so keep the frames coming.
        let animating = app.is_busy();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &mut app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}

                TuiEvent::ForceQuit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        should_quit = true;
                    }
                }

                TuiEvent::SubmitExtract => {
                    let effect = update(&mut app, Action::SubmitExtract);
                    if let Effect::SpawnExtract { generation } = effect {
                        spawn_extract(&app, generation, tx.clone());
                    }
                }

                TuiEvent::AttachPrompt => {
                    tui.input.enter_attach();
                    tui.focus = Focus::Question;
                }

                TuiEvent::DropAttachment => {
                    update(&mut app, Action::ClearAttachment);
                }

                TuiEvent::SwitchFocus => {
                    tui.focus = tui.focus.toggled();
                }

                TuiEvent::Escape => {
                    if tui.input.mode == PromptMode::AttachPath {
                        tui.input.cancel_attach();
                    }
                }

                // Scroll events always go to the message log
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                }

                // Everything else is an editing event for the focused pane
                _ => match tui.focus {
                    Focus::Notes => {
                        let mut pane = components::NotesPane::new(
                            &mut app.note_draft,
                            &mut tui.notes,
                            true,
                            None,
                        );
                        pane.handle_event(&event);
                    }
                    Focus::Question => {
                        if let Some(InputEvent::Submit(text)) = tui.input.handle_event(&event) {
                            match tui.input.mode {
                                PromptMode::AttachPath => {
                                    tui.input.mode = PromptMode::Question;
                                    match Attachment::load(Path::new(text.trim())) {
                                        Ok(attachment) => {
                                            update(&mut app, Action::AttachFile(attachment));
                                        }
                                        Err(e) => {
                                            warn!("Attachment rejected: {e}");
                                            app.log.push(Message::system(format!("❌ {e}")));
                                        }
                                    }
                                }
                                PromptMode::Question => {
                                    submit_question(&mut app, &mut tui.input, text, &tx);
                                }
                            }
                        }
                    }
                },
            }
        }

        if should_quit {
            break;
        }

        // Handle completions from background request tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if update(&mut app, action) == Effect::Quit {
                break;
            }
        }

        // The reducer may have cleared the draft after a successful
        // extraction; keep the editor cursor inside the buffer.
        tui.notes.sync_with(&app.note_draft);
    }

    ratatui::restore();
    Ok(())
}

/// Dispatch a submitted question, or hand the text back to the prompt when
/// the reducer refuses it (a previous question is still outstanding). The
/// input box has already consumed its buffer by the time the reducer runs,
/// so a refused submit must restore it or the text is lost.
fn submit_question(app: &mut App, input: &mut InputBox, text: String, tx: &mpsc::Sender<Action>) {
    let effect = update(app, Action::SubmitQuestion(text.clone()));
    if let Effect::SpawnChat {
        generation,
        question,
    } = effect
    {
        spawn_chat(app, generation, question, tx.clone());
    } else {
        input.restore(text);
    }
}

/// Snapshot the drafts and dispatch the extraction request. The completion
/// comes back over `tx` tagged with `generation`.
fn spawn_extract(app: &App, generation: u64, tx: mpsc::Sender<Action>) {
    info!("Spawning extract request (generation {generation})");

    let backend = app.backend.clone();
    let text = if app.note_draft.trim().is_empty() {
        None
    } else {
        Some(app.note_draft.clone())
    };
    let file = app.attachment.clone();

    tokio::spawn(async move {
        let result = backend.extract(text, file).await;
        if tx
            .send(Action::ExtractFinished { generation, result })
            .is_err()
        {
            warn!("Failed to send extract completion: receiver dropped");
        }
    });
}

fn spawn_chat(app: &App, generation: u64, question: String, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request (generation {generation})");

    let backend = app.backend.clone();

    tokio::spawn(async move {
        let result = backend.ask(&question).await;
        if tx
            .send(Action::ChatFinished { generation, result })
            .is_err()
        {
            warn!("Failed to send chat completion: receiver dropped");
        }
    });
}
