//! Conversation view state.
//!
//! Holds the displayed elements, scroll position and follow mode. This is the
//! terminal implementation of the engine's [`Renderer`].

use eliza_engine::{Renderer, Turn};

/// Entries scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// One displayed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A rendered turn.
    Message(Turn),
    /// The transient "responder is composing" placeholder.
    Composing,
}

/// Conversation pane state.
#[derive(Debug)]
pub struct ConversationView {
    /// Displayed elements in render order.
    entries: Vec<Entry>,
    /// Index of the first visible entry when not following.
    scroll_offset: usize,
    /// Whether the view is pinned to the newest entry.
    follow: bool,
    /// Animation counter for the composing indicator.
    tick: usize,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    /// Create an empty view in follow mode.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scroll_offset: 0,
            follow: true,
            tick: 0,
        }
    }

    /// All entries.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been rendered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of composing indicators currently shown.
    pub fn composing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Composing))
            .count()
    }

    /// Get the scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Animation frame counter.
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// Advance the composing animation.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.jump_to_end();
    }

    fn last_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Scroll up by the given number of entries. Disables follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        if self.entries.is_empty() {
            return;
        }
        if self.follow {
            self.scroll_offset = self.last_index();
            self.follow = false;
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Scroll down by the given number of entries.
    ///
    /// Reaching the last entry resumes follow mode.
    pub fn scroll_down(&mut self, amount: usize) {
        if self.follow {
            return;
        }
        self.scroll_offset = (self.scroll_offset + amount).min(self.last_index());
        if self.scroll_offset >= self.last_index() {
            self.follow = true;
        }
    }

    /// Pin the view to the newest entry.
    pub fn jump_to_end(&mut self) {
        self.follow = true;
        self.scroll_offset = self.last_index();
    }
}

impl Renderer for ConversationView {
    fn render_turn(&mut self, turn: &Turn) {
        self.push(Entry::Message(turn.clone()));
    }

    fn show_composing_indicator(&mut self) {
        self.push(Entry::Composing);
    }

    fn hide_composing_indicator(&mut self) {
        if let Some(idx) = self.entries.iter().position(|e| *e == Entry::Composing) {
            self.entries.remove(idx);
            self.scroll_offset = self.scroll_offset.min(self.last_index());
        }
    }
}
