//! UI rendering for the TUI.

use docchat_core::format::{format_latency, format_message_time, format_metrics, format_tokens};
use docchat_core::transcript::ScrollAnchor;
use docchat_core::{DocumentKind, Operation, Region, Role, StatusKind};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};

use crate::app::{App, Focus};
use crate::message_format::{answer_lines, feedback_spans, plain_lines, role_label};

// ========== Colors ==========

/// Border of the focused panel
const BORDER_FOCUSED: Color = Color::Rgb(0, 180, 180);
/// Border of unfocused panels
const BORDER_IDLE: Color = Color::Rgb(80, 80, 80);
/// Loading status text
const STATUS_LOADING: Color = Color::Rgb(220, 180, 0);
/// Success status text
const STATUS_SUCCESS: Color = Color::Rgb(80, 200, 80);
/// Error status text
const STATUS_ERROR: Color = Color::Rgb(230, 80, 80);
/// Secondary text (timestamps, metrics, hints)
const DIM: Color = Color::Rgb(128, 128, 128);
/// Label color for footer statistics
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Marker of the selected answer
const SELECTED_MARKER: Color = Color::Rgb(255, 180, 100);

const NO_DOCUMENTS_TEXT: &str = "No documents uploaded yet";
const EMPTY_CHAT_TEXT: &str = "Ask questions about your documents to start a conversation";
const CHAT_DISABLED_TEXT: &str = "Upload a PDF or add a website to start asking questions";

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: header, body, footer
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(8),    // Body
        Constraint::Length(2), // Key hints + stats
    ])
    .split(area);

    render_header(frame, app, chunks[0]);

    let columns = Layout::horizontal([
        Constraint::Percentage(35), // Sources and documents
        Constraint::Percentage(65), // Chat
    ])
    .split(chunks[1]);

    let left = Layout::vertical([
        Constraint::Length(7), // Add source form
        Constraint::Min(3),    // Document list
    ])
    .split(columns[0]);

    let right = Layout::vertical([
        Constraint::Min(5),    // Transcript
        Constraint::Length(1), // Chat status
        Constraint::Length(5), // Question field
    ])
    .split(columns[1]);

    render_source_panel(frame, app, left[0]);
    render_documents(frame, app, left[1]);
    render_transcript(frame, app, right[0]);
    render_status_line(frame, app, Region::Chat, right[1]);
    render_question(frame, app, right[2]);
    render_footer(frame, app, chunks[2]);
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { BORDER_FOCUSED } else { BORDER_IDLE };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).bold())
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" docchat ", Style::default().fg(Color::Black).bg(BORDER_FOCUSED).bold()),
        Span::raw(" "),
        Span::styled(app.backend_url.clone(), Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Status text of a region as a styled span, if any.
fn status_span(app: &App, region: Region) -> Option<Span<'static>> {
    let status = app.orch.status().status(region)?;
    let (prefix, color) = match status.kind {
        StatusKind::Loading => ("… ", STATUS_LOADING),
        StatusKind::Success => ("✓ ", STATUS_SUCCESS),
        StatusKind::Error => ("✗ ", STATUS_ERROR),
    };
    Some(Span::styled(
        format!("{}{}", prefix, status.text),
        Style::default().fg(color),
    ))
}

fn render_status_line(frame: &mut Frame, app: &App, region: Region, area: Rect) {
    let line = status_span(app, region)
        .map(|span| Line::from(vec![Span::raw(" "), span]))
        .unwrap_or_default();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_source_panel(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Source;

    let tab = |kind: DocumentKind| {
        if app.source == kind {
            Span::styled(
                format!(" {} ", kind.label()),
                Style::default().fg(Color::Black).bg(BORDER_FOCUSED).bold(),
            )
        } else {
            Span::styled(format!(" {} ", kind.label()), Style::default().fg(DIM))
        }
    };

    let (label, operation, action) = match app.source {
        DocumentKind::Pdf => ("File: ", Operation::UploadPdf, "Enter to upload"),
        DocumentKind::Website => ("URL:  ", Operation::ProcessWebsite, "Enter to process"),
    };

    let mut field = vec![
        Span::styled(label, Style::default().fg(LABEL_COLOR)),
        Span::raw(app.source_field().to_string()),
    ];
    if focused {
        field.push(Span::styled("█", Style::default().fg(BORDER_FOCUSED)));
    }

    let hint = if app.orch.is_in_flight(operation) {
        Span::styled("Working...", Style::default().fg(DIM))
    } else {
        Span::styled(action, Style::default().fg(DIM))
    };

    let lines = vec![
        Line::from(vec![
            tab(DocumentKind::Pdf),
            Span::raw(" "),
            tab(DocumentKind::Website),
            Span::styled("  Ctrl-t", Style::default().fg(DIM)),
        ]),
        Line::from(field),
        Line::from(hint),
        status_span(app, app.source_region())
            .map(Line::from)
            .unwrap_or_default(),
    ];

    let paragraph = Paragraph::new(lines)
        .block(panel(" Add Source ", focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_documents(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Documents;
    let title = format!(" Documents ({}) ", app.orch.documents().len());
    let block = panel(&title, focused);

    if app.orch.documents().is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            NO_DOCUMENTS_TEXT,
            Style::default().fg(DIM).italic(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = app
        .orch
        .documents()
        .iter()
        .map(|doc| {
            let badge_color = match doc.kind {
                DocumentKind::Pdf => STATUS_ERROR,
                DocumentKind::Website => BORDER_FOCUSED,
            };
            let mut spans = vec![
                Span::styled(
                    format!("[{}] ", doc.kind.label()),
                    Style::default().fg(badge_color),
                ),
                Span::raw(doc.name.clone()),
            ];
            if app.orch.documents().is_deleting(&doc.id) {
                spans.push(Span::styled(" (deleting)", Style::default().fg(DIM)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, area, &mut app.documents_state);
}

fn render_transcript(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Transcript;
    let block = panel(" Chat ", focused);

    if app.orch.transcript().is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            EMPTY_CHAT_TEXT,
            Style::default().fg(DIM).italic(),
        )))
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(placeholder, area);
        return;
    }

    let inner = block.inner(area);
    // Two columns for the selection marker, one for the scrollbar.
    let width = (inner.width as usize).saturating_sub(3);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, msg) in app.orch.transcript().messages().iter().enumerate() {
        let selected = app.selected_answer == Some(idx);
        let marker = if selected {
            Span::styled("▌ ", Style::default().fg(SELECTED_MARKER))
        } else {
            Span::raw("  ")
        };

        let (label, style) = role_label(msg.role);
        lines.push(Line::from(vec![
            marker.clone(),
            Span::styled(label, style.bold()),
            Span::styled(
                format!("  {}", format_message_time(msg.sent_at)),
                Style::default().fg(DIM),
            ),
        ]));

        let body = match msg.role {
            Role::User => plain_lines(&msg.content, width),
            Role::Assistant => answer_lines(&msg.content, width),
        };
        for line in body {
            let mut spans = vec![marker.clone()];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }

        if let Some(metrics) = msg.metrics() {
            lines.push(Line::from(vec![
                marker.clone(),
                Span::styled(format_metrics(metrics), Style::default().fg(DIM)),
            ]));
        }
        if let Some(query_id) = msg.query_id() {
            let mut spans = vec![marker.clone()];
            spans.extend(feedback_spans(app.orch.feedback().buttons(query_id)));
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));
    }

    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    app.orch.transcript_mut().clamp_scroll(max_scroll);
    let offset = match app.orch.transcript().anchor() {
        ScrollAnchor::Latest => max_scroll,
        ScrollAnchor::LinesFromBottom(n) => max_scroll.saturating_sub(n),
    };

    let total = lines.len();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(max_scroll).position(offset);
    if total > inner.height as usize {
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_question(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Question;

    if !app.orch.chat_input_enabled() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            CHAT_DISABLED_TEXT,
            Style::default().fg(DIM).italic(),
        )))
        .block(panel(" Question (disabled) ", false))
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let title = if app.orch.ask_enabled() {
        " Question "
    } else {
        " Question (waiting for answer) "
    };

    let mut lines: Vec<Line> = app
        .orch
        .forms
        .question
        .split('\n')
        .map(|line| Line::raw(line.to_string()))
        .collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled("█", Style::default().fg(BORDER_FOCUSED)));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(title, focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Source => "Enter submit | Ctrl-t PDF/Website",
        Focus::Documents => "j/k select | d delete",
        Focus::Transcript => "j/k select answer | +/- feedback | PgUp/PgDn scroll",
        Focus::Question => "Enter send | Alt-Enter newline",
    };
    let keys = Line::from(vec![
        Span::styled(format!(" {} ", hints), Style::default().fg(DIM)),
        Span::styled("| Tab focus | Ctrl-l clear chat | Esc quit", Style::default().fg(DIM)),
    ]);

    let stats = app.stats();
    let latency = stats
        .mean_latency_seconds
        .map(format_latency)
        .unwrap_or_else(|| "-".to_string());
    let stat = |label: &'static str, value: String| {
        [
            Span::styled(label, Style::default().fg(LABEL_COLOR)),
            Span::raw(value),
            Span::raw("  "),
        ]
    };

    let mut spans = vec![Span::raw(" ")];
    spans.extend(stat("Questions ", stats.questions.to_string()));
    spans.extend(stat("Answers ", stats.answers.to_string()));
    spans.extend(stat("Avg latency ", latency));
    spans.extend(stat(
        "Tokens ",
        format!(
            "{} in / {} out",
            format_tokens(stats.tokens_in),
            format_tokens(stats.tokens_out)
        ),
    ));
    spans.extend(stat("Chunks ", stats.chunks_retrieved.to_string()));
    spans.extend(stat(
        "Feedback ",
        format!("+{} -{}", stats.relevant, stats.irrelevant),
    ));

    frame.render_widget(Paragraph::new(vec![keys, Line::from(spans)]), area);
}
