//! Request and reply bodies of the backend routes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Failure, Outcome};
use crate::types::{AnswerMetrics, Document, DocumentId, QueryId};

/// Route paths, relative to the configured base URL.
pub mod routes {
    pub const UPLOAD_PDF: &str = "/upload_pdf";
    pub const PROCESS_WEBSITE: &str = "/process_website";
    pub const DELETE_DOCUMENT: &str = "/delete_document";
    pub const ASK_QUESTION: &str = "/ask_question";
    pub const CLEAR_CHAT: &str = "/clear_chat";
    pub const FEEDBACK: &str = "/feedback";
}

/// Reply to an ingestion (PDF upload or website).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestReply {
    #[serde(default)]
    pub message: Option<String>,
    pub document: Document,
}

/// Reply to an answered question.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerReply {
    /// Answer HTML
    pub response: String,
    #[serde(default)]
    pub metrics: Option<AnswerMetrics>,
    #[serde(default)]
    pub query_id: Option<QueryId>,
}

/// Reply carrying nothing but the discriminant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /process_website`
#[derive(Serialize)]
pub(crate) struct WebsiteRequest<'a> {
    pub url: &'a str,
}

/// Body of `POST /delete_document`
#[derive(Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub id: &'a DocumentId,
}

/// Body of `POST /ask_question`
#[derive(Serialize)]
pub(crate) struct AskRequest<'a> {
    pub question: &'a str,
}

/// Body of `POST /feedback`
#[derive(Serialize)]
pub(crate) struct FeedbackRequest<'a> {
    pub query_id: &'a QueryId,
    pub relevant: bool,
}

/// Interpret a reply body by its `status` discriminant.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> Outcome<T> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Failure::Malformed(format!("invalid JSON: {}", e)))?;

    let status = value
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| Failure::Malformed("missing status discriminant".to_string()))?;

    match status {
        "success" => serde_json::from_value(value)
            .map_err(|e| Failure::Malformed(format!("unexpected success payload: {}", e))),
        "error" => Err(Failure::Rejected(
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        )),
        other => Err(Failure::Malformed(format!("unknown status {:?}", other))),
    }
}
