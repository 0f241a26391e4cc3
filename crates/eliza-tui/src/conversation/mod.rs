//! Conversation pane module.
//!
//! The conversation pane fills the TUI:
//! - Message list (scrollable, follows the newest entry)
//! - Input area (state-aware placeholder)

mod placeholder;
mod view;
mod widget;

pub use placeholder::input_placeholder;
pub use view::{ConversationView, Entry, SCROLL_SPEED};
pub use widget::ConversationPane;
