//! HTTP client for the question-answering backend

use std::path::PathBuf;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::BackendConfig;
use crate::error::{Error, Failure, Outcome, Result};
use crate::types::{DocumentId, QueryId};

use super::wire::{
    decode_reply, routes, Ack, AnswerReply, AskRequest, DeleteRequest, FeedbackRequest,
    IngestReply, WebsiteRequest,
};
use super::Backend;

/// reqwest-backed [`Backend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.normalized_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        route: &'static str,
        body: &B,
    ) -> Outcome<T> {
        let request = self.http_client.post(self.url(route)).json(body);
        Self::exchange(route, request).await
    }

    /// Send a request and decode the reply by its discriminant.
    async fn exchange<T: DeserializeOwned>(
        route: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Outcome<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(route, error = %e, "HTTP request failed");
            Failure::Transport(format!("HTTP request failed: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(route, %status, error = %e, "Failed to read response body");
            Failure::Transport(format!("failed to read response: {}", e))
        })?;

        let outcome = decode_reply(&body);
        match &outcome {
            Ok(_) => tracing::debug!(route, %status, "Backend reported success"),
            Err(failure) => tracing::info!(route, %status, %failure, "Backend reported failure"),
        }
        outcome
    }

    /// Check if the backend answers at all
    pub async fn health_check(&self) -> bool {
        match self.http_client.get(self.url("/")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

impl Backend for HttpBackend {
    async fn upload_pdf(&self, path: PathBuf) -> Outcome<IngestReply> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Failure::Unreadable(format!("Could not read {}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        tracing::debug!(file = %file_name, size = bytes.len(), "Uploading PDF");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| Failure::Transport(format!("failed to build upload: {}", e)))?;
        let form = Form::new().part("file", part);

        let request = self
            .http_client
            .post(self.url(routes::UPLOAD_PDF))
            .multipart(form);
        Self::exchange(routes::UPLOAD_PDF, request).await
    }

    async fn process_website(&self, url: String) -> Outcome<IngestReply> {
        self.post_json(routes::PROCESS_WEBSITE, &WebsiteRequest { url: &url })
            .await
    }

    async fn delete_document(&self, id: DocumentId) -> Outcome<Ack> {
        self.post_json(routes::DELETE_DOCUMENT, &DeleteRequest { id: &id })
            .await
    }

    async fn ask_question(&self, question: String) -> Outcome<AnswerReply> {
        self.post_json(routes::ASK_QUESTION, &AskRequest { question: &question })
            .await
    }

    async fn clear_chat(&self) -> Outcome<Ack> {
        let request = self.http_client.post(self.url(routes::CLEAR_CHAT));
        Self::exchange(routes::CLEAR_CHAT, request).await
    }

    async fn submit_feedback(&self, query_id: QueryId, relevant: bool) -> Outcome<Ack> {
        self.post_json(
            routes::FEEDBACK,
            &FeedbackRequest {
                query_id: &query_id,
                relevant,
            },
        )
        .await
    }
}
