//! Backend access
//!
//! The question-answering service exposes six POST routes. [`Backend`] is
//! the seam between the orchestrator and that service: [`HttpBackend`]
//! talks to the real thing, tests substitute in-process fakes.
//!
//! Every route replies with a `status` discriminant (`success` / `error`).
//! The discriminant is trusted over the HTTP status class; only a missing
//! or unreadable reply counts as a transport-level failure.

mod http;
mod wire;

use std::future::Future;
use std::path::PathBuf;

pub use http::HttpBackend;
pub use wire::{decode_reply, routes, Ack, AnswerReply, IngestReply};

use crate::error::Outcome;
use crate::types::{DocumentId, QueryId};

/// The six backend operations.
pub trait Backend: Send + Sync + 'static {
    /// `POST /upload_pdf` with the file as multipart field `file`
    fn upload_pdf(&self, path: PathBuf) -> impl Future<Output = Outcome<IngestReply>> + Send;

    /// `POST /process_website` with `{url}`
    fn process_website(&self, url: String) -> impl Future<Output = Outcome<IngestReply>> + Send;

    /// `POST /delete_document` with `{id}`
    fn delete_document(&self, id: DocumentId) -> impl Future<Output = Outcome<Ack>> + Send;

    /// `POST /ask_question` with `{question}`
    fn ask_question(&self, question: String) -> impl Future<Output = Outcome<AnswerReply>> + Send;

    /// `POST /clear_chat` without a body
    fn clear_chat(&self) -> impl Future<Output = Outcome<Ack>> + Send;

    /// `POST /feedback` with `{query_id, relevant}`
    fn submit_feedback(
        &self,
        query_id: QueryId,
        relevant: bool,
    ) -> impl Future<Output = Outcome<Ack>> + Send;
}
