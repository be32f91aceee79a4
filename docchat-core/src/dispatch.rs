//! Running requests off the UI thread.
//!
//! The [`Dispatcher`] owns a small tokio runtime. Each [`Request`] is
//! spawned as its own task against the [`Backend`]; results come back as
//! [`Completion`]s on a channel the UI loop drains between frames. Requests
//! of different operations therefore overlap freely and complete in any
//! order.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::Backend;
use crate::error::Result;
use crate::orchestrator::{Completion, Request};

/// Issue a single request and wrap its outcome.
pub async fn execute<B: Backend>(backend: &B, request: Request) -> Completion {
    match request {
        Request::UploadPdf { path } => Completion::UploadPdf(backend.upload_pdf(path).await),
        Request::ProcessWebsite { url } => {
            Completion::ProcessWebsite(backend.process_website(url).await)
        }
        Request::DeleteDocument { id } => {
            let outcome = backend.delete_document(id.clone()).await;
            Completion::DeleteDocument { id, outcome }
        }
        Request::AskQuestion { question } => {
            Completion::AskQuestion(backend.ask_question(question).await)
        }
        Request::ClearChat => Completion::ClearChat(backend.clear_chat().await),
        Request::SubmitFeedback { ticket } => {
            let outcome = backend
                .submit_feedback(ticket.query_id.clone(), ticket.relevant)
                .await;
            Completion::SubmitFeedback { ticket, outcome }
        }
    }
}

/// Receiving end of dispatched requests.
pub struct Completions {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Completions {
    /// Next finished request, without waiting.
    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    /// Everything finished so far.
    pub fn drain(&mut self) -> Vec<Completion> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Wait for the next completion. Must not be called from async code.
    pub fn wait(&mut self) -> Option<Completion> {
        self.rx.blocking_recv()
    }
}

/// Spawns requests on a background runtime.
pub struct Dispatcher<B: Backend> {
    backend: Arc<B>,
    runtime: tokio::runtime::Runtime,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(backend: B) -> Result<(Self, Completions)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("docchat-io")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                backend: Arc::new(backend),
                runtime,
                tx,
            },
            Completions { rx },
        ))
    }

    /// Start a request. Its completion arrives on the paired [`Completions`].
    pub fn dispatch(&self, request: Request) {
        let operation = request.operation();
        tracing::debug!(operation = operation.name(), "Dispatching request");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let completion = execute(backend.as_ref(), request).await;
            if tx.send(completion).is_err() {
                tracing::debug!(
                    operation = operation.name(),
                    "Completion dropped, receiver closed"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::client::{Ack, AnswerReply, IngestReply};
    use crate::error::{Failure, Outcome};
    use crate::orchestrator::Orchestrator;
    use crate::types::{Document, DocumentId, DocumentKind, QueryId};

    /// Backend that answers every route from memory.
    struct FakeBackend;

    impl Backend for FakeBackend {
        async fn upload_pdf(&self, path: PathBuf) -> Outcome<IngestReply> {
            Ok(IngestReply {
                message: None,
                document: Document {
                    id: DocumentId::from("d1"),
                    kind: DocumentKind::Pdf,
                    name: path.display().to_string(),
                },
            })
        }

        async fn process_website(&self, _url: String) -> Outcome<IngestReply> {
            Err(Failure::Rejected(Some("Failed to fetch website".to_string())))
        }

        async fn delete_document(&self, _id: DocumentId) -> Outcome<Ack> {
            Ok(Ack::default())
        }

        async fn ask_question(&self, question: String) -> Outcome<AnswerReply> {
            Ok(AnswerReply {
                response: format!("You asked: {}", question),
                metrics: None,
                query_id: Some(QueryId::from("q1")),
            })
        }

        async fn clear_chat(&self) -> Outcome<Ack> {
            Ok(Ack::default())
        }

        async fn submit_feedback(&self, _query_id: QueryId, _relevant: bool) -> Outcome<Ack> {
            Err(Failure::Transport("offline".to_string()))
        }
    }

    #[test]
    fn test_execute_pairs_request_and_completion() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let completion = runtime.block_on(execute(
            &FakeBackend,
            Request::DeleteDocument {
                id: DocumentId::from("d9"),
            },
        ));
        assert_eq!(
            completion,
            Completion::DeleteDocument {
                id: DocumentId::from("d9"),
                outcome: Ok(Ack::default()),
            }
        );

        let completion =
            runtime.block_on(execute(&FakeBackend, Request::ProcessWebsite { url: "x".into() }));
        assert!(!completion.is_success());
    }

    #[test]
    fn test_dispatch_round_trip_through_orchestrator() {
        let (dispatcher, mut completions) = Dispatcher::new(FakeBackend).unwrap();
        let mut orch = Orchestrator::new();

        orch.forms.pdf_path = "report.pdf".to_string();
        dispatcher.dispatch(orch.submit_upload().unwrap());
        orch.apply(completions.wait().unwrap());
        assert_eq!(orch.documents().len(), 1);

        orch.forms.question = "What is X?".to_string();
        dispatcher.dispatch(orch.submit_question().unwrap());
        orch.apply(completions.wait().unwrap());

        let last = orch.transcript().messages().last().unwrap();
        assert_eq!(last.content, "You asked: What is X?");
        assert!(orch.ask_enabled());
        assert!(completions.drain().is_empty());
    }

    #[test]
    fn test_concurrent_requests_all_complete() {
        let (dispatcher, mut completions) = Dispatcher::new(FakeBackend).unwrap();
        dispatcher.dispatch(Request::ClearChat);
        dispatcher.dispatch(Request::AskQuestion {
            question: "a".to_string(),
        });
        dispatcher.dispatch(Request::ProcessWebsite {
            url: "https://example.com".to_string(),
        });

        let mut seen: Vec<_> = (0..3)
            .map(|_| completions.wait().unwrap().operation().name())
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["ask_question", "clear_chat", "process_website"]);
    }
}
