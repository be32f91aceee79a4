//! Request orchestration
//!
//! The [`Orchestrator`] owns all client state: form fields, status regions,
//! the document registry, the transcript and feedback states. User actions
//! go through its `submit_*`/`delete_*`/`clear_*` methods, which validate
//! locally, put the affected region into its loading state and hand back a
//! [`Request`] for the dispatcher. When the backend answers, the matching
//! [`Completion`] is passed to [`Orchestrator::apply`].
//!
//! Every operation follows `IDLE -> IN_FLIGHT -> IDLE`. While an operation
//! is in flight its trigger is disabled, so a second press returns `None`
//! instead of a duplicate request.

use std::path::PathBuf;
use std::time::Instant;

use crate::client::{Ack, AnswerReply, IngestReply};
use crate::error::Outcome;
use crate::feedback::{FeedbackController, FeedbackTicket};
use crate::registry::DocumentRegistry;
use crate::status::StatusPresenter;
use crate::transcript::ChatTranscript;
use crate::types::{DocumentId, QueryId, Region, StatusKind};

pub const SELECT_PDF_TEXT: &str = "Please select a PDF file.";
pub const ENTER_URL_TEXT: &str = "Please enter a website URL.";
pub const UPLOADING_TEXT: &str = "Uploading and processing PDF...";
pub const PROCESSING_WEBSITE_TEXT: &str = "Processing website...";
pub const SEARCHING_TEXT: &str = "Searching...";

const PDF_DONE_TEXT: &str = "PDF uploaded and processed";
const WEBSITE_DONE_TEXT: &str = "Website processed";

/// The six backend operations, for logging and UI hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UploadPdf,
    ProcessWebsite,
    DeleteDocument,
    AskQuestion,
    ClearChat,
    SubmitFeedback,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::UploadPdf => "upload_pdf",
            Operation::ProcessWebsite => "process_website",
            Operation::DeleteDocument => "delete_document",
            Operation::AskQuestion => "ask_question",
            Operation::ClearChat => "clear_chat",
            Operation::SubmitFeedback => "submit_feedback",
        }
    }
}

/// A backend call the orchestrator wants issued.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    UploadPdf { path: PathBuf },
    ProcessWebsite { url: String },
    DeleteDocument { id: DocumentId },
    AskQuestion { question: String },
    ClearChat,
    SubmitFeedback { ticket: FeedbackTicket },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::UploadPdf { .. } => Operation::UploadPdf,
            Request::ProcessWebsite { .. } => Operation::ProcessWebsite,
            Request::DeleteDocument { .. } => Operation::DeleteDocument,
            Request::AskQuestion { .. } => Operation::AskQuestion,
            Request::ClearChat => Operation::ClearChat,
            Request::SubmitFeedback { .. } => Operation::SubmitFeedback,
        }
    }
}

/// The result of a [`Request`], delivered back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    UploadPdf(Outcome<IngestReply>),
    ProcessWebsite(Outcome<IngestReply>),
    DeleteDocument {
        id: DocumentId,
        outcome: Outcome<Ack>,
    },
    AskQuestion(Outcome<AnswerReply>),
    ClearChat(Outcome<Ack>),
    SubmitFeedback {
        ticket: FeedbackTicket,
        outcome: Outcome<Ack>,
    },
}

impl Completion {
    pub fn operation(&self) -> Operation {
        match self {
            Completion::UploadPdf(_) => Operation::UploadPdf,
            Completion::ProcessWebsite(_) => Operation::ProcessWebsite,
            Completion::DeleteDocument { .. } => Operation::DeleteDocument,
            Completion::AskQuestion(_) => Operation::AskQuestion,
            Completion::ClearChat(_) => Operation::ClearChat,
            Completion::SubmitFeedback { .. } => Operation::SubmitFeedback,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Completion::UploadPdf(o) | Completion::ProcessWebsite(o) => o.is_ok(),
            Completion::DeleteDocument { outcome, .. }
            | Completion::ClearChat(outcome)
            | Completion::SubmitFeedback { outcome, .. } => outcome.is_ok(),
            Completion::AskQuestion(o) => o.is_ok(),
        }
    }
}

/// Text typed into the three input fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Path of the PDF to upload
    pub pdf_path: String,
    /// Website URL to ingest
    pub website_url: String,
    /// Question being composed
    pub question: String,
}

#[derive(Debug, Default)]
struct InFlight {
    upload: bool,
    website: bool,
    ask: bool,
    clear: bool,
}

/// Client-side controller for documents, chat and feedback.
#[derive(Debug, Default)]
pub struct Orchestrator {
    pub forms: FormFields,
    status: StatusPresenter,
    documents: DocumentRegistry,
    transcript: ChatTranscript,
    feedback: FeedbackController,
    in_flight: InFlight,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Read access ==========

    pub fn status(&self) -> &StatusPresenter {
        &self.status
    }

    pub fn documents(&self) -> &DocumentRegistry {
        &self.documents
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Mutable transcript access for view-only changes (scrolling)
    pub fn transcript_mut(&mut self) -> &mut ChatTranscript {
        &mut self.transcript
    }

    pub fn feedback(&self) -> &FeedbackController {
        &self.feedback
    }

    /// Question field accepts input
    pub fn chat_input_enabled(&self) -> bool {
        self.documents.chat_input_enabled()
    }

    /// Ask control is clickable
    pub fn ask_enabled(&self) -> bool {
        self.chat_input_enabled() && !self.in_flight.ask
    }

    pub fn is_in_flight(&self, operation: Operation) -> bool {
        match operation {
            Operation::UploadPdf => self.in_flight.upload,
            Operation::ProcessWebsite => self.in_flight.website,
            Operation::AskQuestion => self.in_flight.ask,
            Operation::ClearChat => self.in_flight.clear,
            Operation::DeleteDocument | Operation::SubmitFeedback => false,
        }
    }

    /// Fire due status auto-clears.
    pub fn tick(&mut self, now: Instant) -> Vec<Region> {
        self.status.tick(now)
    }

    // ========== User actions ==========

    /// Upload the PDF named in the path field.
    pub fn submit_upload(&mut self) -> Option<Request> {
        if self.in_flight.upload {
            return None;
        }
        let path = self.forms.pdf_path.trim();
        if path.is_empty() {
            self.status
                .set_status(Region::Upload, SELECT_PDF_TEXT, StatusKind::Error);
            return None;
        }
        let path = PathBuf::from(path);

        self.in_flight.upload = true;
        self.status
            .set_status(Region::Upload, UPLOADING_TEXT, StatusKind::Loading);
        tracing::info!(path = %path.display(), "Uploading PDF");
        Some(Request::UploadPdf { path })
    }

    /// Ingest the website in the URL field.
    pub fn submit_website(&mut self) -> Option<Request> {
        if self.in_flight.website {
            return None;
        }
        let url = self.forms.website_url.trim();
        if url.is_empty() {
            self.status
                .set_status(Region::Website, ENTER_URL_TEXT, StatusKind::Error);
            return None;
        }
        let url = url.to_string();

        self.in_flight.website = true;
        self.status.set_status(
            Region::Website,
            PROCESSING_WEBSITE_TEXT,
            StatusKind::Loading,
        );
        tracing::info!(url = %url, "Processing website");
        Some(Request::ProcessWebsite { url })
    }

    /// Delete a listed document.
    pub fn delete_document(&mut self, id: &DocumentId) -> Option<Request> {
        if !self.documents.begin_delete(id) {
            tracing::debug!(id = %id, "Delete ignored: unknown or already pending");
            return None;
        }
        tracing::info!(id = %id, "Deleting document");
        Some(Request::DeleteDocument { id: id.clone() })
    }

    /// Send the question field.
    ///
    /// The question is echoed into the transcript right away and the field
    /// is emptied; the echo stays even if the backend fails.
    pub fn submit_question(&mut self) -> Option<Request> {
        let question = self.forms.question.trim().to_string();
        if question.is_empty() || !self.ask_enabled() {
            return None;
        }

        self.transcript.append_user(&question);
        self.forms.question.clear();
        self.status
            .set_status(Region::Chat, SEARCHING_TEXT, StatusKind::Loading);
        self.in_flight.ask = true;
        tracing::info!(chars = question.len(), "Asking question");
        Some(Request::AskQuestion { question })
    }

    /// Clear the chat history on the backend and locally.
    pub fn clear_chat(&mut self) -> Option<Request> {
        if self.in_flight.clear {
            return None;
        }
        self.in_flight.clear = true;
        Some(Request::ClearChat)
    }

    /// Send a relevance judgment for an answer.
    pub fn submit_feedback(&mut self, query_id: &QueryId, relevant: bool) -> Option<Request> {
        let ticket = self.feedback.submit_feedback(query_id, relevant)?;
        tracing::debug!(query_id = %query_id, relevant, "Submitting feedback");
        Some(Request::SubmitFeedback { ticket })
    }

    // ========== Completions ==========

    /// Apply a backend result.
    pub fn apply(&mut self, completion: Completion) {
        self.apply_at(completion, Instant::now());
    }

    /// Apply a backend result as of `now`.
    pub fn apply_at(&mut self, completion: Completion, now: Instant) {
        tracing::info!(
            operation = completion.operation().name(),
            success = completion.is_success(),
            "Request completed"
        );

        match completion {
            Completion::UploadPdf(outcome) => {
                self.in_flight.upload = false;
                if self.finish_ingest(Region::Upload, PDF_DONE_TEXT, outcome, now) {
                    self.forms.pdf_path.clear();
                }
            }
            Completion::ProcessWebsite(outcome) => {
                self.in_flight.website = false;
                if self.finish_ingest(Region::Website, WEBSITE_DONE_TEXT, outcome, now) {
                    self.forms.website_url.clear();
                }
            }
            Completion::DeleteDocument { id, outcome } => match outcome {
                Ok(_) => {
                    self.documents.remove(&id);
                }
                Err(failure) => {
                    self.documents.abort_delete(&id);
                    tracing::warn!(id = %id, %failure, "Document delete failed");
                }
            },
            Completion::AskQuestion(outcome) => {
                self.in_flight.ask = false;
                match outcome {
                    Ok(reply) => {
                        if let Some(query_id) = &reply.query_id {
                            self.feedback.register(query_id.clone());
                        }
                        self.transcript
                            .append_assistant(reply.response, reply.metrics, reply.query_id);
                        self.status.clear_status(Region::Chat);
                    }
                    Err(failure) => {
                        self.status.set_status_at(
                            Region::Chat,
                            failure.status_text(Region::Chat.generic_error()),
                            StatusKind::Error,
                            now,
                        );
                    }
                }
            }
            Completion::ClearChat(outcome) => {
                self.in_flight.clear = false;
                match outcome {
                    Ok(_) => {
                        self.transcript.clear();
                        self.feedback.reset();
                    }
                    Err(failure) => tracing::warn!(%failure, "Clearing chat failed"),
                }
            }
            Completion::SubmitFeedback { ticket, outcome } => match outcome {
                Ok(_) => {
                    self.feedback.confirm(&ticket);
                }
                Err(failure) => {
                    tracing::warn!(query_id = %ticket.query_id, %failure, "Feedback submission failed");
                }
            },
        }
    }

    /// Shared success/failure handling of the two ingestion routes.
    ///
    /// Returns true when a document was added.
    fn finish_ingest(
        &mut self,
        region: Region,
        done_text: &str,
        outcome: Outcome<IngestReply>,
        now: Instant,
    ) -> bool {
        match outcome {
            Ok(reply) => {
                let text = reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| done_text.to_string());
                self.status
                    .set_status_at(region, text, StatusKind::Success, now);
                self.documents.add(reply.document);
                true
            }
            Err(failure) => {
                self.status.set_status_at(
                    region,
                    failure.status_text(region.generic_error()),
                    StatusKind::Error,
                    now,
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::status::SUCCESS_CLEAR_DELAY;
    use crate::types::{AnswerMetrics, Document, DocumentKind, FeedbackState};

    fn ingest(id: &str, kind: DocumentKind, name: &str) -> Outcome<IngestReply> {
        Ok(IngestReply {
            message: Some(match kind {
                DocumentKind::Pdf => "PDF uploaded and processed".to_string(),
                DocumentKind::Website => "Website processed".to_string(),
            }),
            document: Document {
                id: DocumentId::from(id),
                kind,
                name: name.to_string(),
            },
        })
    }

    fn answer(response: &str, query_id: &str) -> Outcome<AnswerReply> {
        Ok(AnswerReply {
            response: response.to_string(),
            metrics: Some(AnswerMetrics {
                latency_seconds: 1.2,
                chunks_retrieved: 4,
                tokens_in: 700,
                tokens_out: 80,
            }),
            query_id: Some(QueryId::from(query_id)),
        })
    }

    /// Orchestrator with one PDF already registered.
    fn with_document() -> Orchestrator {
        let mut orch = Orchestrator::new();
        orch.forms.pdf_path = "report.pdf".to_string();
        orch.submit_upload().unwrap();
        orch.apply(Completion::UploadPdf(ingest("d1", DocumentKind::Pdf, "report.pdf")));
        orch
    }

    fn status_text(orch: &Orchestrator, region: Region) -> Option<(String, StatusKind)> {
        orch.status()
            .status(region)
            .map(|s| (s.text.clone(), s.kind))
    }

    #[test]
    fn test_upload_requires_selection() {
        let mut orch = Orchestrator::new();
        assert!(orch.submit_upload().is_none());
        assert_eq!(
            status_text(&orch, Region::Upload),
            Some((SELECT_PDF_TEXT.to_string(), StatusKind::Error))
        );
        assert!(!orch.is_in_flight(Operation::UploadPdf));
    }

    #[test]
    fn test_upload_then_delete_scenario() {
        let mut orch = Orchestrator::new();
        assert!(!orch.chat_input_enabled());

        orch.forms.pdf_path = "report.pdf".to_string();
        let request = orch.submit_upload().unwrap();
        assert_eq!(
            request,
            Request::UploadPdf {
                path: PathBuf::from("report.pdf")
            }
        );
        assert_eq!(
            status_text(&orch, Region::Upload),
            Some((UPLOADING_TEXT.to_string(), StatusKind::Loading))
        );
        assert!(orch.submit_upload().is_none(), "second press while in flight");

        orch.apply(Completion::UploadPdf(ingest("d1", DocumentKind::Pdf, "report.pdf")));
        assert_eq!(orch.documents().len(), 1);
        let doc = orch.documents().at(0).unwrap();
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert_eq!(doc.name, "report.pdf");
        assert!(orch.forms.pdf_path.is_empty());
        assert!(orch.chat_input_enabled());
        assert!(orch.ask_enabled());

        let id = DocumentId::from("d1");
        let request = orch.delete_document(&id).unwrap();
        assert_eq!(request, Request::DeleteDocument { id: id.clone() });
        assert!(orch.delete_document(&id).is_none(), "delete already pending");

        orch.apply(Completion::DeleteDocument {
            id,
            outcome: Ok(Ack::default()),
        });
        assert!(orch.documents().is_empty());
        assert!(!orch.chat_input_enabled());
        assert!(!orch.ask_enabled());
    }

    #[test]
    fn test_upload_failure_shows_backend_message() {
        let mut orch = Orchestrator::new();
        orch.forms.pdf_path = "notes.txt".to_string();
        orch.submit_upload().unwrap();
        orch.apply(Completion::UploadPdf(Err(Failure::Rejected(Some(
            "Invalid file type".to_string(),
        )))));

        assert_eq!(
            status_text(&orch, Region::Upload),
            Some(("Invalid file type".to_string(), StatusKind::Error))
        );
        assert_eq!(orch.forms.pdf_path, "notes.txt");
        assert!(orch.documents().is_empty());
        assert!(!orch.is_in_flight(Operation::UploadPdf));
    }

    #[test]
    fn test_website_validation_and_transport_failure() {
        let mut orch = Orchestrator::new();
        orch.forms.website_url = "   ".to_string();
        assert!(orch.submit_website().is_none());
        assert_eq!(
            status_text(&orch, Region::Website),
            Some((ENTER_URL_TEXT.to_string(), StatusKind::Error))
        );

        orch.forms.website_url = "  https://example.com  ".to_string();
        assert_eq!(
            orch.submit_website(),
            Some(Request::ProcessWebsite {
                url: "https://example.com".to_string()
            })
        );
        orch.apply(Completion::ProcessWebsite(Err(Failure::Transport(
            "connection refused".to_string(),
        ))));
        assert_eq!(
            status_text(&orch, Region::Website),
            Some((
                Region::Website.generic_error().to_string(),
                StatusKind::Error
            ))
        );
        assert_eq!(orch.forms.website_url, "  https://example.com  ");
    }

    #[test]
    fn test_website_success_auto_clears_status() {
        let t0 = Instant::now();
        let mut orch = Orchestrator::new();
        orch.forms.website_url = "https://example.com".to_string();
        orch.submit_website().unwrap();
        orch.apply_at(
            Completion::ProcessWebsite(ingest("w1", DocumentKind::Website, "https://example.com")),
            t0,
        );

        assert_eq!(
            status_text(&orch, Region::Website),
            Some(("Website processed".to_string(), StatusKind::Success))
        );
        assert!(orch.forms.website_url.is_empty());
        assert!(orch.chat_input_enabled());

        orch.tick(t0 + SUCCESS_CLEAR_DELAY);
        assert!(orch.status().status(Region::Website).is_none());
    }

    #[test]
    fn test_empty_question_is_ignored() {
        let mut orch = with_document();
        orch.forms.question = "   \n ".to_string();
        assert!(orch.submit_question().is_none());
        assert!(orch.transcript().is_empty());
        assert!(orch.status().status(Region::Chat).is_none());
    }

    #[test]
    fn test_question_needs_documents() {
        let mut orch = Orchestrator::new();
        orch.forms.question = "What is X?".to_string();
        assert!(orch.submit_question().is_none());
        assert!(orch.transcript().is_empty());
    }

    #[test]
    fn test_ask_scenario() {
        let mut orch = with_document();
        assert!(orch.ask_enabled());

        orch.forms.question = "  What is X?  ".to_string();
        let request = orch.submit_question().unwrap();
        assert_eq!(
            request,
            Request::AskQuestion {
                question: "What is X?".to_string()
            }
        );
        assert!(orch.forms.question.is_empty());
        assert_eq!(orch.transcript().len(), 1);
        assert_eq!(orch.transcript().messages()[0].content, "What is X?");
        assert!(!orch.ask_enabled());
        assert_eq!(
            status_text(&orch, Region::Chat),
            Some((SEARCHING_TEXT.to_string(), StatusKind::Loading))
        );

        orch.forms.question = "again".to_string();
        assert!(orch.submit_question().is_none(), "ask disabled while in flight");
        assert_eq!(orch.forms.question, "again");

        orch.apply(Completion::AskQuestion(answer("X is <strong>Y</strong>", "q1")));
        assert!(orch.ask_enabled());
        assert!(orch.status().status(Region::Chat).is_none());
        let last = orch.transcript().messages().last().unwrap();
        assert_eq!(last.content, "X is <strong>Y</strong>");
        assert_eq!(last.query_id(), Some(&QueryId::from("q1")));
        assert!(orch.feedback().is_registered(&QueryId::from("q1")));
    }

    #[test]
    fn test_ask_transport_failure() {
        let mut orch = with_document();
        orch.forms.question = "What is X?".to_string();
        orch.submit_question().unwrap();
        orch.apply(Completion::AskQuestion(Err(Failure::Transport(
            "connection reset".to_string(),
        ))));

        assert_eq!(
            status_text(&orch, Region::Chat),
            Some((
                "An error occurred while processing your question.".to_string(),
                StatusKind::Error
            ))
        );
        assert!(orch.ask_enabled());
        assert_eq!(orch.transcript().len(), 1, "user echo stays, no answer");
    }

    #[test]
    fn test_ask_application_error() {
        let mut orch = with_document();
        orch.forms.question = "What is X?".to_string();
        orch.submit_question().unwrap();
        orch.apply(Completion::AskQuestion(Err(Failure::Rejected(Some(
            "Please upload at least one document first".to_string(),
        )))));

        assert_eq!(
            status_text(&orch, Region::Chat).unwrap().0,
            "Please upload at least one document first"
        );
        assert!(orch.ask_enabled());
    }

    #[test]
    fn test_operations_overlap_independently() {
        let mut orch = with_document();
        orch.forms.question = "What is X?".to_string();
        orch.submit_question().unwrap();
        orch.forms.website_url = "https://example.com".to_string();
        orch.submit_website().unwrap();

        // The website finishes first; the chat region is untouched.
        orch.apply(Completion::ProcessWebsite(ingest(
            "w1",
            DocumentKind::Website,
            "https://example.com",
        )));
        assert_eq!(
            status_text(&orch, Region::Chat),
            Some((SEARCHING_TEXT.to_string(), StatusKind::Loading))
        );
        assert!(!orch.ask_enabled());

        orch.apply(Completion::AskQuestion(answer("Y", "q1")));
        assert!(orch.ask_enabled());
        assert_eq!(orch.documents().len(), 2);
    }

    #[test]
    fn test_ask_completion_after_last_document_deleted() {
        let mut orch = with_document();
        orch.forms.question = "What is X?".to_string();
        orch.submit_question().unwrap();

        let id = DocumentId::from("d1");
        orch.delete_document(&id).unwrap();
        orch.apply(Completion::DeleteDocument {
            id,
            outcome: Ok(Ack::default()),
        });
        orch.apply(Completion::AskQuestion(answer("Y", "q1")));

        assert_eq!(orch.transcript().len(), 2);
        assert!(!orch.is_in_flight(Operation::AskQuestion));
        assert!(!orch.ask_enabled(), "no documents left");
    }

    #[test]
    fn test_failed_delete_keeps_document() {
        let mut orch = with_document();
        let id = DocumentId::from("d1");
        orch.delete_document(&id).unwrap();
        orch.apply(Completion::DeleteDocument {
            id: id.clone(),
            outcome: Err(Failure::Rejected(Some("Document not found".to_string()))),
        });

        assert_eq!(orch.documents().len(), 1);
        assert!(orch.delete_document(&id).is_some(), "can retry after failure");
    }

    #[test]
    fn test_clear_chat() {
        let mut orch = with_document();
        orch.forms.question = "What is X?".to_string();
        orch.submit_question().unwrap();
        orch.apply(Completion::AskQuestion(answer("Y", "q1")));

        assert_eq!(orch.clear_chat(), Some(Request::ClearChat));
        assert!(orch.clear_chat().is_none());

        orch.apply(Completion::ClearChat(Err(Failure::Transport("down".to_string()))));
        assert_eq!(orch.transcript().len(), 2, "failure is silent");

        orch.clear_chat().unwrap();
        orch.apply(Completion::ClearChat(Ok(Ack::default())));
        assert!(orch.transcript().is_empty());
        assert!(!orch.feedback().is_registered(&QueryId::from("q1")));
        assert!(orch.chat_input_enabled(), "documents are unaffected");
    }

    #[test]
    fn test_feedback_round_trip() {
        let mut orch = with_document();
        for (question, query_id) in [("a?", "q1"), ("b?", "q2")] {
            orch.forms.question = question.to_string();
            orch.submit_question().unwrap();
            orch.apply(Completion::AskQuestion(answer("...", query_id)));
        }
        let q1 = QueryId::from("q1");
        let q2 = QueryId::from("q2");

        let Some(Request::SubmitFeedback { ticket }) = orch.submit_feedback(&q1, true) else {
            panic!("expected feedback request");
        };
        orch.apply(Completion::SubmitFeedback {
            ticket,
            outcome: Ok(Ack::default()),
        });
        assert_eq!(orch.feedback().state(&q1), FeedbackState::Relevant);
        assert_eq!(orch.feedback().state(&q2), FeedbackState::Unset);

        let Some(Request::SubmitFeedback { ticket }) = orch.submit_feedback(&q1, false) else {
            panic!("expected feedback request");
        };
        orch.apply(Completion::SubmitFeedback {
            ticket,
            outcome: Err(Failure::Transport("timeout".to_string())),
        });
        assert_eq!(
            orch.feedback().state(&q1),
            FeedbackState::Relevant,
            "no optimistic update"
        );

        assert!(orch.submit_feedback(&QueryId::from("unknown"), true).is_none());
    }
}
