//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Two patterns show up here:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: top bar showing backend URL, status, and the busy spinner
//! - `Bubble`: a single chat message
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components with persistent local state that emit events:
//! - `MessageList`: scrollable conversation view with layout caching
//! - `NotesPane`: multi-line draft editor over the app-owned notes buffer
//! - `InputBox`: single-line question / attach-path prompt
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── bubble.rs        (single message renderer)
//! ├── message_list.rs  (scrollable message container)
//! ├── input_box.rs     (question / attach-path prompt)
//! └── notes_pane/      (notes draft editor)
//! ```

pub mod bubble;
pub mod input_box;
pub mod message_list;
pub mod notes_pane;
pub mod title_bar;

pub use bubble::Bubble;
pub use input_box::{InputBox, InputEvent, PromptMode};
pub use message_list::{MessageList, MessageListState};
pub use notes_pane::{NotesPane, NotesState};
pub use title_bar::TitleBar;
