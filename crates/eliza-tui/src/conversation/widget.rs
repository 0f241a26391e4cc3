//! Conversation pane widget.
//!
//! Combines the message list with an input area at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use eliza_engine::{ExchangeState, Speaker, Turn};

use super::placeholder::input_placeholder;
use super::view::{ConversationView, Entry};
use crate::input::TextInputState;
use crate::theme::Theme;

/// Fixed height for the input area (in lines).
const INPUT_HEIGHT: u16 = 3;

/// Height for the divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Indent for message bodies.
const BODY_INDENT: &str = "  ";

/// Frames of the composing animation.
const COMPOSING_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Conversation pane widget combining the message list and input.
///
/// ```text
/// ┌─ Eliza ──────────────────────────────┐
/// │ 14:02  Eliza                          │
/// │   Hello! I'm Eliza, how can I...      │
/// │                                       │
/// │ 14:03  You                            │
/// │   I feel anxious today                │
/// ├───────────────────────────────────────┤
/// │ > Type your reply...                  │
/// └─ Enter send · Shift+Enter newline ────┘
/// ```
pub struct ConversationPane<'a> {
    view: &'a ConversationView,
    input: &'a TextInputState,
    state: ExchangeState,
    theme: &'a Theme,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane.
    pub fn new(view: &'a ConversationView, input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            view,
            input,
            state: ExchangeState::Idle,
            theme,
        }
    }

    /// Set the exchange state (affects placeholder text).
    #[must_use]
    pub fn state(mut self, state: ExchangeState) -> Self {
        self.state = state;
        self
    }

    fn message_lines(&self, turn: &Turn, width: usize) -> Vec<Line<'static>> {
        let name_style = Style::default()
            .fg(self.theme.speaker(turn.speaker))
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![Line::from(vec![
            Span::styled(turn.time_label(), Style::default().fg(self.theme.muted)),
            Span::raw("  "),
            Span::styled(turn.speaker.label(), name_style),
        ])];

        let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
        let text_style = Style::default().fg(self.theme.text);
        for wrapped in textwrap::wrap(&turn.text, body_width) {
            lines.push(Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(wrapped.into_owned(), text_style),
            ]));
        }

        lines
    }

    fn composing_lines(&self) -> Vec<Line<'static>> {
        let frame = COMPOSING_FRAMES[self.view.tick_count() % COMPOSING_FRAMES.len()];
        vec![
            Line::from(vec![
                Span::raw("       "),
                Span::styled(
                    Speaker::Responder.label(),
                    Style::default()
                        .fg(self.theme.responder)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(
                    format!("typing{frame}"),
                    Style::default()
                        .fg(self.theme.subtext)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]),
        ]
    }

    fn entry_lines(&self, entry: &Entry, width: usize) -> Vec<Line<'static>> {
        match entry {
            Entry::Message(turn) => self.message_lines(turn, width),
            Entry::Composing => self.composing_lines(),
        }
    }

    /// Render the message list.
    fn render_messages(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.view.is_empty() {
            let empty_msg = Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(self.theme.muted),
            ));
            Paragraph::new(empty_msg).render(
                Rect::new(area.x, area.y + area.height / 2, area.width, 1),
                buf,
            );
            return;
        }

        let width = area.width as usize;
        let height = area.height as usize;
        let start = if self.view.is_following() {
            0
        } else {
            self.view.scroll_offset()
        };

        let mut lines: Vec<Line<'static>> = Vec::new();
        for (i, entry) in self.view.entries().iter().enumerate().skip(start) {
            if i > start {
                lines.push(Line::default());
            }
            lines.extend(self.entry_lines(entry, width));
        }

        // Following pins the newest lines to the bottom edge.
        let visible: Vec<Line<'static>> = if self.view.is_following() {
            let skip = lines.len().saturating_sub(height);
            lines.into_iter().skip(skip).collect()
        } else {
            lines.into_iter().take(height).collect()
        };

        Paragraph::new(visible).render(area, buf);
    }

    /// Render the input area.
    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let prompt = "> ";
        let prompt_style = Style::default().fg(self.theme.user);
        let text_style = Style::default().fg(self.theme.text);

        if self.input.is_empty() {
            let spans = vec![
                Span::styled(prompt, prompt_style),
                Span::styled("_", text_style),
                Span::styled(
                    input_placeholder(self.state),
                    Style::default().fg(self.theme.muted),
                ),
            ];
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let mut lines: Vec<Line<'_>> = Vec::new();
        let mut current: Vec<Span<'_>> = vec![Span::styled(prompt, prompt_style)];
        let mut cursor_drawn = false;

        for (char_count, ch) in self.input.content().chars().enumerate() {
            if char_count == self.input.cursor() && !cursor_drawn {
                current.push(Span::styled("|", text_style));
                cursor_drawn = true;
            }

            if ch == '\n' {
                lines.push(Line::from(std::mem::take(&mut current)));
                // Continuation lines align with the prompt
                current.push(Span::raw(" ".repeat(prompt.len())));
            } else {
                current.push(Span::styled(ch.to_string(), text_style));
            }
        }

        if !cursor_drawn {
            current.push(Span::styled("_", text_style));
        }
        lines.push(Line::from(current));

        // Keep the line being typed visible
        let skip = lines.len().saturating_sub(area.height as usize);
        let visible: Vec<Line<'_>> = lines.into_iter().skip(skip).collect();
        Paragraph::new(visible).render(area, buf);
    }

    /// Render a horizontal divider line.
    fn render_divider(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }

        let divider = line::HORIZONTAL.repeat(area.width as usize);
        Paragraph::new(Line::from(Span::styled(
            divider,
            Style::default().fg(self.theme.border),
        )))
        .render(area, buf);
    }
}

impl Widget for ConversationPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default().fg(self.theme.border_focused);

        let block = Block::default()
            .title(" Eliza ")
            .title_bottom(Line::from(" Enter send · Shift+Enter newline · Esc quit "))
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < INPUT_HEIGHT + DIVIDER_HEIGHT + 1 {
            // Not enough space - just show input
            self.render_input(inner, buf);
            return;
        }

        let messages_height = inner.height.saturating_sub(INPUT_HEIGHT + DIVIDER_HEIGHT);
        let divider_y = inner.y + messages_height;
        let input_y = divider_y + DIVIDER_HEIGHT;

        let messages_area = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            messages_height,
        );
        let divider_area = Rect::new(inner.x, divider_y, inner.width, DIVIDER_HEIGHT);
        let input_area = Rect::new(inner.x, input_y, inner.width, INPUT_HEIGHT);

        self.render_messages(messages_area, buf);
        self.render_divider(divider_area, buf);
        self.render_input(input_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_terminal_sized};
    use eliza_engine::Renderer;

    fn render_to_string(
        view: &ConversationView,
        input: &TextInputState,
        state: ExchangeState,
        width: u16,
        height: u16,
    ) -> String {
        let theme = Theme::default();
        let mut terminal = create_test_terminal_sized(width, height);
        terminal
            .draw(|frame| {
                let pane = ConversationPane::new(view, input, &theme).state(state);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn test_conversation_pane_renders_title() {
        let view = ConversationView::new();
        let input = TextInputState::new();
        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 20);

        assert!(content.contains("Eliza"));
        assert!(content.contains("No messages yet"));
        assert!(content.contains("Tell Eliza what's on your mind..."));
    }

    #[test]
    fn test_messages_rendered_with_speakers() {
        let mut view = ConversationView::new();
        view.render_turn(&Turn::responder("Hello! How can I help?"));
        view.render_turn(&Turn::user("I feel anxious"));
        let input = TextInputState::new();

        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 20);
        assert!(content.contains("Hello! How can I help?"));
        assert!(content.contains("You"));
        assert!(content.contains("I feel anxious"));
    }

    #[test]
    fn test_composing_indicator_rendered() {
        let mut view = ConversationView::new();
        view.render_turn(&Turn::user("Hello"));
        view.show_composing_indicator();
        let input = TextInputState::new();

        let content = render_to_string(&view, &input, ExchangeState::AwaitingResponse, 60, 20);
        assert!(content.contains("typing"));
        assert!(content.contains("Waiting for Eliza..."));

        view.hide_composing_indicator();
        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 20);
        assert!(!content.contains("typing"));
    }

    #[test]
    fn test_follow_mode_shows_newest_message() {
        let mut view = ConversationView::new();
        for i in 0..30 {
            view.render_turn(&Turn::user(format!("message number {i}")));
        }
        let input = TextInputState::new();

        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 15);
        assert!(content.contains("message number 29"));
        assert!(!content.contains("message number 1 "));
    }

    #[test]
    fn test_scrolled_view_shows_older_messages() {
        let mut view = ConversationView::new();
        for i in 0..30 {
            view.render_turn(&Turn::user(format!("message number {i}")));
        }
        view.scroll_up(29);
        let input = TextInputState::new();

        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 15);
        assert!(content.contains("message number 0"));
        assert!(!content.contains("message number 29"));
    }

    #[test]
    fn test_long_messages_wrap() {
        let mut view = ConversationView::new();
        view.render_turn(&Turn::responder(
            "Why do you say that you feel this way about your mother and father?",
        ));
        let input = TextInputState::new();

        let content = render_to_string(&view, &input, ExchangeState::Idle, 30, 20);
        assert!(content.contains("Why do you say"));
        assert!(content.contains("father?"));
    }

    #[test]
    fn test_input_content_rendered() {
        let view = ConversationView::new();
        let mut input = TextInputState::new();
        input.insert_str("first line");
        input.insert('\n');
        input.insert_str("second");

        let content = render_to_string(&view, &input, ExchangeState::Idle, 60, 20);
        assert!(content.contains("> first line"));
        assert!(content.contains("second_"));
    }

    #[test]
    fn test_conversation_pane_minimum_size() {
        let view = ConversationView::new();
        let input = TextInputState::new();
        // Very small terminal - should not panic
        render_to_string(&view, &input, ExchangeState::Idle, 20, 5);
    }
}
