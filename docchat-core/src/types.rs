//! Core domain types for docchat
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Document** | A PDF or website the backend has ingested and indexed |
//! | **Ingestion** | Turning an uploaded PDF or a URL into a backend document |
//! | **Answer** | An assistant reply to a question, optionally with metrics |
//! | **Query id** | Backend-issued token linking an answer to later feedback |
//! | **Region** | A named UI area holding at most one transient status |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================
// Identifiers
// ============================================

/// Opaque backend identifier of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque backend identifier correlating an answer with its feedback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub String);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================
// Documents
// ============================================

/// Where a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Website,
}

impl DocumentKind {
    /// Badge label shown next to the document name
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Website => "Website",
        }
    }

    /// Parse a wire value; the backend is not consistent about case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "website" | "web" | "url" => Some(DocumentKind::Website),
            _ => None,
        }
    }
}

impl Serialize for DocumentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DocumentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DocumentKind::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown document type: {raw}")))
    }
}

/// A document known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Display name (file name or URL)
    pub name: String,
}

// ============================================
// Chat
// ============================================

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing questions
    User,
    /// The backend answering them
    Assistant,
}

/// Retrieval and generation figures reported with an answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetrics {
    #[serde(rename = "latency")]
    pub latency_seconds: f64,
    #[serde(rename = "chunks_count")]
    pub chunks_retrieved: u32,
    #[serde(rename = "tokens_input")]
    pub tokens_in: u64,
    #[serde(rename = "tokens_output")]
    pub tokens_out: u64,
}

/// Feedback correlation for an assistant message.
///
/// Metrics only exist alongside a query id, so an answer with metrics can
/// always receive feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRef {
    pub query_id: QueryId,
    pub metrics: Option<AnswerMetrics>,
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    /// Sanitized text for user messages, backend HTML for assistant messages
    pub content: String,
    /// Present only on assistant messages that can receive feedback
    pub answer: Option<AnswerRef>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn query_id(&self) -> Option<&QueryId> {
        self.answer.as_ref().map(|a| &a.query_id)
    }

    pub fn metrics(&self) -> Option<&AnswerMetrics> {
        self.answer.as_ref().and_then(|a| a.metrics.as_ref())
    }

    /// Whether feedback controls are shown for this message
    pub fn accepts_feedback(&self) -> bool {
        self.role == Role::Assistant && self.answer.is_some()
    }
}

// ============================================
// Feedback
// ============================================

/// Relevance judgment recorded for one answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FeedbackState {
    #[default]
    Unset,
    Relevant,
    Irrelevant,
}

impl FeedbackState {
    pub fn from_relevant(relevant: bool) -> Self {
        if relevant {
            FeedbackState::Relevant
        } else {
            FeedbackState::Irrelevant
        }
    }
}

/// Visual state of the thumbs-up / thumbs-down pair.
///
/// Derived from a single [`FeedbackState`], so both can never be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackButtons {
    pub relevant_active: bool,
    pub irrelevant_active: bool,
}

impl From<FeedbackState> for FeedbackButtons {
    fn from(state: FeedbackState) -> Self {
        Self {
            relevant_active: state == FeedbackState::Relevant,
            irrelevant_active: state == FeedbackState::Irrelevant,
        }
    }
}

// ============================================
// Status regions
// ============================================

/// Named UI area that shows one transient status at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Upload,
    Website,
    Chat,
}

impl Region {
    /// Fallback text when an operation in this region fails without a
    /// usable backend message.
    pub fn generic_error(&self) -> &'static str {
        match self {
            Region::Upload => "An error occurred during upload.",
            Region::Website => "An error occurred while processing the website.",
            Region::Chat => "An error occurred while processing your question.",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Upload => "upload",
            Region::Website => "website",
            Region::Chat => "chat",
        }
    }
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

/// Content of a status region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}
