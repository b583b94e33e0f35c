//! # Actions
//!
//! Everything that can happen in Minuteman becomes an `Action`.
//! User hits Ctrl+E? That's `Action::SubmitExtract`.
//! The backend answers? That's `Action::ChatFinished { .. }`.
//!
//! The `update()` function takes the current state and an action and mutates
//! the state. No side effects here — I/O is described by the returned
//! `Effect` and executed by the TUI event loop.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This keeps every flow testable without a terminal or a network: feed
//! actions in, assert on the log and the returned effects.

use log::{debug, warn};

use crate::api::{ApiError, Attachment, ChatResponse, ExtractResponse, Message, TaskItem};
use crate::core::state::App;

/// Shown when extraction is invoked with neither notes nor a file.
pub const MSG_EMPTY_DRAFTS: &str = "❌ Please provide text or upload a file.";
/// Default extraction confirmation when the backend sends no `message`.
pub const MSG_EXTRACT_OK: &str = "✅ Meeting notes saved!";
/// Shown when the extraction request fails at the transport level.
pub const MSG_EXTRACT_FAILED: &str = "❌ Error extracting tasks. Check backend.";
/// Default bot reply when the backend sends no `answer`.
pub const MSG_NO_ANSWER: &str = "Sorry, I couldn't find an answer.";
/// Shown when the chat request fails at the transport level.
pub const MSG_CHAT_FAILED: &str = "⚠️ Failed to reach the backend.";

#[derive(Debug)]
pub enum Action {
    /// Send the current drafts to the extraction endpoint.
    SubmitExtract,
    /// Send a question to the chat endpoint. Carries the raw input text;
    /// whitespace-only input is silently dropped.
    SubmitQuestion(String),
    /// A file was loaded from disk and is ready to stage.
    AttachFile(Attachment),
    /// Drop the staged file.
    ClearAttachment,
    ExtractFinished {
        generation: u64,
        result: Result<ExtractResponse, ApiError>,
    },
    ChatFinished {
        generation: u64,
        result: Result<ChatResponse, ApiError>,
    },
    Quit,
}

/// What the event loop must do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Spawn the extraction request. The generation tags the eventual
    /// `ExtractFinished` so stale completions can be discarded.
    SpawnExtract { generation: u64 },
    SpawnChat { generation: u64, question: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,

        Action::AttachFile(attachment) => {
            app.status_message = format!("Attached {}", attachment.name);
            app.attachment = Some(attachment);
            Effect::None
        }

        Action::ClearAttachment => {
            if app.attachment.take().is_some() {
                app.status_message = String::from("Attachment removed.");
            }
            Effect::None
        }

        Action::SubmitExtract => {
            if app.extract_in_flight {
                debug!("Extract already in flight, ignoring submit");
                return Effect::None;
            }
            if app.drafts_empty() {
                app.log.push(Message::system(MSG_EMPTY_DRAFTS));
                return Effect::None;
            }
            app.extract_generation += 1;
            app.extract_in_flight = true;
            app.status_message = String::from("Extracting tasks...");
            Effect::SpawnExtract {
                generation: app.extract_generation,
            }
        }

        Action::SubmitQuestion(question) => {
            if app.chat_in_flight {
                debug!("Chat already in flight, ignoring submit");
                return Effect::None;
            }
            if question.trim().is_empty() {
                return Effect::None;
            }
            // The user bubble shows the raw text, before any response exists.
            app.log.push(Message::user(question.clone()));
            app.chat_generation += 1;
            app.chat_in_flight = true;
            app.status_message = String::from("Waiting for an answer...");
            Effect::SpawnChat {
                generation: app.chat_generation,
                question,
            }
        }

        Action::ExtractFinished { generation, result } => {
            if generation != app.extract_generation {
                debug!(
                    "Dropping stale extract response (gen {generation}, current {})",
                    app.extract_generation
                );
                return Effect::None;
            }
            app.extract_in_flight = false;
            app.status_message.clear();

            match result {
                Ok(resp) => {
                    if let Some(error) = resp.error {
                        // Backend understood the request but reports failure.
                        // Not a success: drafts stay for a retry.
                        app.log.push(Message::system(error));
                        return Effect::None;
                    }
                    let text = resp.message.unwrap_or_else(|| MSG_EXTRACT_OK.to_string());
                    app.log.push(Message::system(text));
                    if !resp.tasks.is_empty() {
                        app.log.push(Message::system(task_digest(&resp.tasks)));
                    }
                    app.note_draft.clear();
                    app.attachment = None;
                }
                Err(e) => {
                    warn!("Extract request failed: {e}");
                    app.log.push(Message::system(MSG_EXTRACT_FAILED));
                    if app.clear_drafts_on_error {
                        app.note_draft.clear();
                        app.attachment = None;
                    }
                }
            }
            Effect::None
        }

        Action::ChatFinished { generation, result } => {
            if generation != app.chat_generation {
                debug!(
                    "Dropping stale chat response (gen {generation}, current {})",
                    app.chat_generation
                );
                return Effect::None;
            }
            app.chat_in_flight = false;
            app.status_message.clear();

            let text = match result {
                Ok(resp) => {
                    if let Some(error) = resp.error {
                        error
                    } else {
                        resp.answer.unwrap_or_else(|| MSG_NO_ANSWER.to_string())
                    }
                }
                Err(e) => {
                    warn!("Chat request failed: {e}");
                    MSG_CHAT_FAILED.to_string()
                }
            };
            app.log.push(Message::bot(text));
            Effect::None
        }
    }
}

/// One line per extracted task, rendered as a follow-up system message.
fn task_digest(tasks: &[TaskItem]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(format!("Extracted {} task(s):", tasks.len()));
    for task in tasks {
        lines.push(format!("• {}: {} (due {})", task.name, task.task, task.deadline));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Sender;
    use crate::test_support::{test_app, test_attachment};

    fn extract_ok(app: &mut App, generation: u64, resp: ExtractResponse) -> Effect {
        update(
            app,
            Action::ExtractFinished {
                generation,
                result: Ok(resp),
            },
        )
    }

    // -- extraction flow --------------------------------------------------

    #[test]
    fn test_extract_with_empty_drafts_appends_notice_and_no_effect() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SubmitExtract);

        assert_eq!(effect, Effect::None);
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.log.messages()[0].sender, Sender::System);
        assert_eq!(app.log.messages()[0].text, MSG_EMPTY_DRAFTS);
        assert!(!app.extract_in_flight);
    }

    #[test]
    fn test_extract_whitespace_only_notes_count_as_empty() {
        let mut app = test_app();
        app.note_draft = "  \n ".to_string();

        let effect = update(&mut app, Action::SubmitExtract);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.log.messages()[0].text, MSG_EMPTY_DRAFTS);
    }

    #[test]
    fn test_extract_with_notes_spawns_request_and_sets_guard() {
        let mut app = test_app();
        app.note_draft = "Alice to prepare slides by November 10".to_string();

        let effect = update(&mut app, Action::SubmitExtract);
        assert_eq!(effect, Effect::SpawnExtract { generation: 1 });
        assert!(app.extract_in_flight);
        assert!(app.is_busy());
        assert!(app.log.is_empty(), "no message until the response lands");
    }

    #[test]
    fn test_extract_with_attachment_only_spawns_request() {
        let mut app = test_app();
        app.attachment = Some(test_attachment());

        let effect = update(&mut app, Action::SubmitExtract);
        assert_eq!(effect, Effect::SpawnExtract { generation: 1 });
    }

    #[test]
    fn test_extract_double_submit_is_ignored_while_in_flight() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();

        assert_eq!(
            update(&mut app, Action::SubmitExtract),
            Effect::SpawnExtract { generation: 1 }
        );
        // Second submit before completion: guarded in the reducer itself.
        assert_eq!(update(&mut app, Action::SubmitExtract), Effect::None);
        assert_eq!(app.extract_generation, 1);
    }

    #[test]
    fn test_extract_success_uses_backend_message_and_clears_drafts() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();
        app.attachment = Some(test_attachment());
        update(&mut app, Action::SubmitExtract);

        let resp = ExtractResponse {
            message: Some("Saved 3 tasks".to_string()),
            ..Default::default()
        };
        extract_ok(&mut app, 1, resp);

        assert_eq!(app.log.last().unwrap().text, "Saved 3 tasks");
        assert_eq!(app.log.last().unwrap().sender, Sender::System);
        assert!(app.note_draft.is_empty());
        assert!(app.attachment.is_none());
        assert!(!app.extract_in_flight);
    }

    #[test]
    fn test_extract_success_without_message_uses_default() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();
        update(&mut app, Action::SubmitExtract);

        extract_ok(&mut app, 1, ExtractResponse::default());

        assert_eq!(app.log.last().unwrap().text, MSG_EXTRACT_OK);
        assert!(app.note_draft.is_empty());
    }

    #[test]
    fn test_extract_success_with_tasks_appends_digest() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();
        update(&mut app, Action::SubmitExtract);

        let resp = ExtractResponse {
            message: Some("✅ Tasks extracted successfully!".to_string()),
            tasks: vec![
                TaskItem {
                    name: "Alice".to_string(),
                    task: "prepare slides".to_string(),
                    deadline: "2026-11-10".to_string(),
                },
                TaskItem {
                    name: "Bob".to_string(),
                    task: "send the report".to_string(),
                    deadline: "2026-11-12".to_string(),
                },
            ],
            error: None,
        };
        extract_ok(&mut app, 1, resp);

        assert_eq!(app.log.len(), 2);
        assert_eq!(
            app.log.messages()[0].text,
            "✅ Tasks extracted successfully!"
        );
        let digest = &app.log.messages()[1].text;
        assert!(digest.starts_with("Extracted 2 task(s):"));
        assert!(digest.contains("• Alice: prepare slides (due 2026-11-10)"));
        assert!(digest.contains("• Bob: send the report (due 2026-11-12)"));
    }

    #[test]
    fn test_extract_transport_failure_keeps_drafts_by_default() {
        let mut app = test_app();
        app.note_draft = "irreplaceable notes".to_string();
        app.attachment = Some(test_attachment());
        update(&mut app, Action::SubmitExtract);

        update(
            &mut app,
            Action::ExtractFinished {
                generation: 1,
                result: Err(ApiError::Network("connection refused".to_string())),
            },
        );

        assert_eq!(app.log.last().unwrap().text, MSG_EXTRACT_FAILED);
        assert_eq!(app.note_draft, "irreplaceable notes");
        assert!(app.attachment.is_some());
        assert!(!app.extract_in_flight);
    }

    #[test]
    fn test_extract_transport_failure_clears_drafts_when_configured() {
        let mut app = test_app();
        app.clear_drafts_on_error = true;
        app.note_draft = "notes".to_string();
        update(&mut app, Action::SubmitExtract);

        update(
            &mut app,
            Action::ExtractFinished {
                generation: 1,
                result: Err(ApiError::Network("timeout".to_string())),
            },
        );

        assert!(app.note_draft.is_empty());
    }

    #[test]
    fn test_extract_soft_failure_branches_away_from_success() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();
        update(&mut app, Action::SubmitExtract);

        let resp = ExtractResponse {
            message: Some("should not be shown".to_string()),
            error: Some("OCR engine unavailable".to_string()),
            ..Default::default()
        };
        extract_ok(&mut app, 1, resp);

        assert_eq!(app.log.last().unwrap().text, "OCR engine unavailable");
        // Soft failure is not success: drafts survive.
        assert_eq!(app.note_draft, "notes");
    }

    #[test]
    fn test_extract_http_error_is_transport_failure() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();
        update(&mut app, Action::SubmitExtract);

        update(
            &mut app,
            Action::ExtractFinished {
                generation: 1,
                result: Err(ApiError::Api {
                    status: 500,
                    message: "internal error".to_string(),
                }),
            },
        );

        assert_eq!(app.log.last().unwrap().text, MSG_EXTRACT_FAILED);
    }

    #[test]
    fn test_stale_extract_response_is_dropped() {
        let mut app = test_app();
        app.note_draft = "first".to_string();
        update(&mut app, Action::SubmitExtract);

        // Simulate completion of generation 1, then a new submission, then a
        // duplicate/straggler completion still tagged with generation 1.
        extract_ok(&mut app, 1, ExtractResponse::default());
        app.note_draft = "second".to_string();
        update(&mut app, Action::SubmitExtract);

        let before = app.log.len();
        extract_ok(&mut app, 1, ExtractResponse::default());

        assert_eq!(app.log.len(), before, "stale response must not append");
        assert!(app.extract_in_flight, "stale response must not clear guard");
        assert_eq!(app.note_draft, "second");
    }

    // -- chat flow --------------------------------------------------------

    #[test]
    fn test_question_appends_user_message_before_response() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::SubmitQuestion("When is the meeting?".to_string()),
        );

        assert_eq!(
            effect,
            Effect::SpawnChat {
                generation: 1,
                question: "When is the meeting?".to_string()
            }
        );
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.log.messages()[0].sender, Sender::User);
        assert_eq!(app.log.messages()[0].text, "When is the meeting?");
        assert!(app.chat_in_flight);
    }

    #[test]
    fn test_whitespace_question_is_silent_noop() {
        let mut app = test_app();
        for q in ["", "   ", "\n\t "] {
            let effect = update(&mut app, Action::SubmitQuestion(q.to_string()));
            assert_eq!(effect, Effect::None);
        }
        assert!(app.log.is_empty());
        assert!(!app.chat_in_flight);
    }

    #[test]
    fn test_chat_round_trip_ordering() {
        let mut app = test_app();
        update(
            &mut app,
            Action::SubmitQuestion("When is the meeting?".to_string()),
        );
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Ok(ChatResponse {
                    answer: Some("Tomorrow at 3pm".to_string()),
                    error: None,
                }),
            },
        );

        let messages = app.log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "When is the meeting?");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "Tomorrow at 3pm");
        assert!(!app.chat_in_flight);
    }

    #[test]
    fn test_chat_response_without_answer_uses_default() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuestion("anything?".to_string()));
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Ok(ChatResponse::default()),
            },
        );

        assert_eq!(app.log.last().unwrap().text, MSG_NO_ANSWER);
        assert_eq!(app.log.last().unwrap().sender, Sender::Bot);
    }

    #[test]
    fn test_chat_transport_failure_appends_bot_notice() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuestion("anything?".to_string()));
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Err(ApiError::Parse("not JSON".to_string())),
            },
        );

        assert_eq!(app.log.last().unwrap().text, MSG_CHAT_FAILED);
        assert_eq!(app.log.last().unwrap().sender, Sender::Bot);
    }

    #[test]
    fn test_chat_soft_failure_shows_backend_error() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuestion("anything?".to_string()));
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Ok(ChatResponse {
                    answer: Some("ignored".to_string()),
                    error: Some("no notes stored yet".to_string()),
                }),
            },
        );

        assert_eq!(app.log.last().unwrap().text, "no notes stored yet");
    }

    #[test]
    fn test_chat_double_submit_is_ignored_while_in_flight() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuestion("first".to_string()));
        let effect = update(&mut app, Action::SubmitQuestion("second".to_string()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.log.len(), 1, "second question not appended");
    }

    #[test]
    fn test_stale_chat_response_is_dropped() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuestion("first".to_string()));
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Ok(ChatResponse::default()),
            },
        );
        update(&mut app, Action::SubmitQuestion("second".to_string()));

        let before = app.log.len();
        update(
            &mut app,
            Action::ChatFinished {
                generation: 1,
                result: Ok(ChatResponse {
                    answer: Some("stale".to_string()),
                    error: None,
                }),
            },
        );
        assert_eq!(app.log.len(), before);
        assert!(app.chat_in_flight);
    }

    // -- flows are independent --------------------------------------------

    #[test]
    fn test_extract_and_chat_guards_are_independent() {
        let mut app = test_app();
        app.note_draft = "notes".to_string();

        update(&mut app, Action::SubmitExtract);
        assert!(app.extract_in_flight);
        assert!(!app.chat_in_flight);

        // Chat can be dispatched while extraction is outstanding.
        let effect = update(&mut app, Action::SubmitQuestion("q?".to_string()));
        assert!(matches!(effect, Effect::SpawnChat { .. }));
        assert!(app.extract_in_flight && app.chat_in_flight);

        // Extraction completing does not touch the chat guard.
        extract_ok(&mut app, 1, ExtractResponse::default());
        assert!(!app.extract_in_flight);
        assert!(app.chat_in_flight);
    }

    // -- attachments -------------------------------------------------------

    #[test]
    fn test_attach_and_clear_attachment() {
        let mut app = test_app();
        update(&mut app, Action::AttachFile(test_attachment()));
        assert!(app.attachment.is_some());
        assert!(app.status_message.contains("agenda.txt"));

        update(&mut app, Action::ClearAttachment);
        assert!(app.attachment.is_none());
    }

    #[test]
    fn test_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
