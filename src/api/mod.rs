pub mod client;
pub mod types;

pub use client::{ApiError, Backend, HttpBackend};
pub use types::{
    Attachment, AttachmentError, ChatRequest, ChatResponse, ExtractResponse, Message, MessageLog,
    Sender, TaskItem,
};
