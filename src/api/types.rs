use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Who produced a message in the log.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sender {
    /// Local notices and extraction results.
    #[serde(rename = "system")]
    System,
    /// Questions typed by the user.
    #[serde(rename = "user")]
    User,
    /// Answers from the backend's question endpoint.
    #[serde(rename = "bot")]
    Bot,
}

/// One entry in the message log. Immutable once appended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Message {
            sender: Sender::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Message {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Message {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Append-only record of the conversation. Entries are never edited or
/// removed, so downstream layout caches can trust indices to stay stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// File extensions the attach prompt accepts. This mirrors what the backend
/// knows how to read (docx, plain text, OCR-able images) and is checked
/// against the file name only, never the content.
pub const ALLOWED_EXTENSIONS: &[&str] = &["docx", "txt", "png", "jpg", "jpeg"];

/// A file staged for upload alongside (or instead of) pasted notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// File name sent as the multipart part's filename.
    pub name: String,
    /// MIME hint derived from the extension.
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Why a file could not be staged as an attachment.
#[derive(Debug)]
pub enum AttachmentError {
    /// Extension not in [`ALLOWED_EXTENSIONS`].
    UnsupportedType { extension: String },
    /// The path had no usable file name.
    BadPath(String),
    Io(std::io::Error),
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::UnsupportedType { extension } => write!(
                f,
                "unsupported file type '.{extension}' (accepted: {})",
                ALLOWED_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            AttachmentError::BadPath(path) => write!(f, "not a file path: {path}"),
            AttachmentError::Io(e) => write!(f, "could not read file: {e}"),
        }
    }
}

impl std::error::Error for AttachmentError {}

impl Attachment {
    /// Read a file from disk and stage it for upload.
    ///
    /// The extension check is advisory (name-based, like a browser file
    /// input's `accept` filter); the backend decides how to parse the bytes.
    pub fn load(path: &Path) -> Result<Attachment, AttachmentError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| AttachmentError::BadPath(path.display().to_string()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let mime = match mime_for_extension(&extension) {
            Some(mime) => mime,
            None => return Err(AttachmentError::UnsupportedType { extension }),
        };

        let bytes = std::fs::read(path).map_err(AttachmentError::Io)?;
        Ok(Attachment { name, mime, bytes })
    }
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Body of `POST /chat/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub question: String,
}

/// Response of `POST /chat/`. All fields optional: a structurally valid
/// reply with no `answer` gets the default placeholder downstream.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub answer: Option<String>,
    /// Backend-reported failure. Present means the request was understood
    /// but could not be served; distinct from a transport failure.
    pub error: Option<String>,
}

/// One task the backend pulled out of the notes.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub name: String,
    pub task: String,
    pub deadline: String,
}

/// Response of `POST /extract/`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtractResponse {
    pub message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    /// Backend-reported failure, see [`ChatResponse::error`].
    pub error: Option<String>,
}
