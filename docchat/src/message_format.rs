//! Shared message formatting helpers for TUI rendering.

use docchat_core::markup::{render_html, render_text, MarkupLine};
use docchat_core::{FeedbackButtons, Role};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Role label and style for transcript headers.
pub fn role_label(role: Role) -> (&'static str, Style) {
    match role {
        Role::User => ("You", Style::default().fg(Color::Cyan)),
        Role::Assistant => ("Assistant", Style::default().fg(Color::Green)),
    }
}

/// Feedback controls for an answer; the active judgment is highlighted.
pub fn feedback_spans(buttons: FeedbackButtons) -> Vec<Span<'static>> {
    let button = |label: &'static str, active: bool, color: Color| {
        if active {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };
    vec![
        button(" + relevant ", buttons.relevant_active, Color::Green),
        Span::raw(" "),
        button(" - irrelevant ", buttons.irrelevant_active, Color::Red),
    ]
}

/// Plain text (a user question) wrapped to `width`.
pub fn plain_lines(content: &str, width: usize) -> Vec<Line<'static>> {
    render_text(content, width).iter().map(styled_line).collect()
}

/// Answer HTML laid out at `width`, with bold runs kept.
pub fn answer_lines(content: &str, width: usize) -> Vec<Line<'static>> {
    render_html(content, width).iter().map(styled_line).collect()
}

fn styled_line(line: &MarkupLine) -> Line<'static> {
    line.fragments
        .iter()
        .map(|fragment| {
            let style = if fragment.bold {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(fragment.text.clone(), style)
        })
        .collect::<Vec<_>>()
        .into()
}
