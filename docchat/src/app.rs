//! Application state for the TUI.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use docchat_core::{
    Completion, DocumentKind, Orchestrator, QueryId, Region, Request, SessionStats,
};
use ratatui::widgets::ListState;

/// Lines moved per PageUp/PageDown in the transcript.
const PAGE_LINES: usize = 10;

/// Panel that receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// PDF path or website URL field
    Source,
    /// Document list
    Documents,
    /// Chat transcript
    Transcript,
    /// Question field
    Question,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Source => Focus::Documents,
            Focus::Documents => Focus::Transcript,
            Focus::Transcript => Focus::Question,
            Focus::Question => Focus::Source,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Source => Focus::Question,
            Focus::Documents => Focus::Source,
            Focus::Transcript => Focus::Documents,
            Focus::Question => Focus::Transcript,
        }
    }
}

/// Main application state.
pub struct App {
    /// Client state machine
    pub orch: Orchestrator,
    /// Focused panel
    pub focus: Focus,
    /// Which ingestion form the source panel shows
    pub source: DocumentKind,
    /// Selection in the document list
    pub documents_state: ListState,
    /// Selected answer, as an index into the transcript's messages
    pub selected_answer: Option<usize>,
    /// Backend being talked to, for the header
    pub backend_url: String,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            orch: Orchestrator::new(),
            focus: Focus::Source,
            source: DocumentKind::Pdf,
            documents_state: ListState::default(),
            selected_answer: None,
            backend_url: backend_url.into(),
            should_quit: false,
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::collect(self.orch.transcript(), self.orch.feedback())
    }

    /// Apply a finished request and keep selections in range.
    pub fn apply(&mut self, completion: Completion) {
        let asked = matches!(completion, Completion::AskQuestion(Ok(_)));
        self.orch.apply(completion);
        self.clamp_selections();
        if asked {
            self.selected_answer = self.answer_indices().last().copied();
        }
    }

    /// Fire due status auto-clears.
    pub fn tick(&mut self, now: Instant) -> Vec<Region> {
        self.orch.tick(now)
    }

    /// Deadline the event loop should wake up for, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.orch.status().next_deadline()
    }

    /// Handle a key press. Returns a request to dispatch, if the key
    /// triggered one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('l') if ctrl => return self.orch.clear_chat(),
            KeyCode::Char('t') if ctrl => {
                self.toggle_source();
                return None;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return None;
            }
            _ if ctrl => return None,
            _ => {}
        }

        match self.focus {
            Focus::Source => self.handle_source_key(key),
            Focus::Documents => self.handle_documents_key(key),
            Focus::Transcript => self.handle_transcript_key(key),
            Focus::Question => self.handle_question_key(key),
        }
    }

    /// Switch the source panel between PDF and website.
    pub fn toggle_source(&mut self) {
        self.source = match self.source {
            DocumentKind::Pdf => DocumentKind::Website,
            DocumentKind::Website => DocumentKind::Pdf,
        };
    }

    /// Text of the active source field.
    pub fn source_field(&self) -> &str {
        match self.source {
            DocumentKind::Pdf => &self.orch.forms.pdf_path,
            DocumentKind::Website => &self.orch.forms.website_url,
        }
    }

    fn source_field_mut(&mut self) -> &mut String {
        match self.source {
            DocumentKind::Pdf => &mut self.orch.forms.pdf_path,
            DocumentKind::Website => &mut self.orch.forms.website_url,
        }
    }

    /// Status region of the active source form.
    pub fn source_region(&self) -> Region {
        match self.source {
            DocumentKind::Pdf => Region::Upload,
            DocumentKind::Website => Region::Website,
        }
    }

    fn handle_source_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Enter => match self.source {
                DocumentKind::Pdf => self.orch.submit_upload(),
                DocumentKind::Website => self.orch.submit_website(),
            },
            KeyCode::Backspace => {
                self.source_field_mut().pop();
                None
            }
            KeyCode::Char(c) => {
                self.source_field_mut().push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_documents_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_document(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_document(-1);
                None
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let id = self
                    .documents_state
                    .selected()
                    .and_then(|i| self.orch.documents().at(i))
                    .map(|doc| doc.id.clone())?;
                self.orch.delete_document(&id)
            }
            _ => None,
        }
    }

    fn handle_transcript_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_answer(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_answer(-1);
                None
            }
            KeyCode::PageUp => {
                self.orch.transcript_mut().scroll_up(PAGE_LINES);
                None
            }
            KeyCode::PageDown => {
                self.orch.transcript_mut().scroll_down(PAGE_LINES);
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.feedback_for_selected(true),
            KeyCode::Char('-') => self.feedback_for_selected(false),
            _ => None,
        }
    }

    fn handle_question_key(&mut self, key: KeyEvent) -> Option<Request> {
        if !self.orch.chat_input_enabled() {
            return None;
        }
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.orch.forms.question.push('\n');
                None
            }
            KeyCode::Enter => self.orch.submit_question(),
            KeyCode::Backspace => {
                self.orch.forms.question.pop();
                None
            }
            KeyCode::Char(c) => {
                self.orch.forms.question.push(c);
                None
            }
            _ => None,
        }
    }

    // ========== Selection ==========

    fn select_document(&mut self, delta: isize) {
        let len = self.orch.documents().len();
        if len == 0 {
            self.documents_state.select(None);
            return;
        }
        let current = self.documents_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.documents_state.select(Some(next));
    }

    /// Transcript indices of answers that carry feedback controls.
    pub fn answer_indices(&self) -> Vec<usize> {
        self.orch
            .transcript()
            .messages()
            .iter()
            .enumerate()
            .filter(|(_, msg)| msg.accepts_feedback())
            .map(|(i, _)| i)
            .collect()
    }

    fn select_answer(&mut self, delta: isize) {
        let answers = self.answer_indices();
        if answers.is_empty() {
            self.selected_answer = None;
            return;
        }
        let position = self
            .selected_answer
            .and_then(|sel| answers.iter().position(|&i| i == sel))
            .unwrap_or(answers.len() - 1) as isize;
        let next = (position + delta).clamp(0, answers.len() as isize - 1) as usize;
        self.selected_answer = Some(answers[next]);
    }

    /// Query id of the selected answer.
    pub fn selected_query_id(&self) -> Option<&QueryId> {
        self.selected_answer
            .and_then(|i| self.orch.transcript().messages().get(i))
            .and_then(|msg| msg.query_id())
    }

    fn feedback_for_selected(&mut self, relevant: bool) -> Option<Request> {
        let query_id = self.selected_query_id()?.clone();
        self.orch.submit_feedback(&query_id, relevant)
    }

    fn clamp_selections(&mut self) {
        let len = self.orch.documents().len();
        match self.documents_state.selected() {
            _ if len == 0 => self.documents_state.select(None),
            Some(i) if i >= len => self.documents_state.select(Some(len - 1)),
            None => self.documents_state.select(Some(0)),
            Some(_) => {}
        }

        let answers = self.answer_indices();
        if self
            .selected_answer
            .is_some_and(|sel| !answers.contains(&sel))
        {
            self.selected_answer = answers.last().copied();
        }
    }
}
