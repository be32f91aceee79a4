//! Append-only chat log.

use chrono::Utc;

use crate::markup::sanitize_user_input;
use crate::types::{AnswerMetrics, AnswerRef, ChatMessage, QueryId, Role};

/// Where the transcript view is scrolled to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAnchor {
    /// Pinned to the most recent message
    #[default]
    Latest,
    /// User scrolled back; lines above the bottom
    LinesFromBottom(usize),
}

#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    anchor: ScrollAnchor,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user's question, stripped of markup.
    pub fn append_user(&mut self, content: &str) -> &ChatMessage {
        self.push(ChatMessage {
            role: Role::User,
            content: sanitize_user_input(content),
            answer: None,
            sent_at: Utc::now(),
        })
    }

    /// Append a backend answer.
    ///
    /// The content is backend HTML and is stored as-is. Metrics are only
    /// kept together with a query id.
    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        metrics: Option<AnswerMetrics>,
        query_id: Option<QueryId>,
    ) -> &ChatMessage {
        let answer = match (query_id, metrics) {
            (Some(query_id), metrics) => Some(AnswerRef { query_id, metrics }),
            (None, Some(_)) => {
                tracing::warn!("Answer carried metrics without a query id, dropping metrics");
                None
            }
            (None, None) => None,
        };
        self.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            answer,
            sent_at: Utc::now(),
        })
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        self.anchor = ScrollAnchor::Latest;
        &self.messages[self.messages.len() - 1]
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.anchor = ScrollAnchor::Latest;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Assistant messages that expose feedback controls, in order
    pub fn answers(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.accepts_feedback())
    }

    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    /// Scroll back toward older messages
    pub fn scroll_up(&mut self, lines: usize) {
        let current = match self.anchor {
            ScrollAnchor::Latest => 0,
            ScrollAnchor::LinesFromBottom(n) => n,
        };
        self.anchor = ScrollAnchor::LinesFromBottom(current.saturating_add(lines));
    }

    /// Keep a scrolled-back anchor within `max` lines of the bottom.
    pub fn clamp_scroll(&mut self, max: usize) {
        if let ScrollAnchor::LinesFromBottom(n) = self.anchor {
            self.anchor = match n.min(max) {
                0 => ScrollAnchor::Latest,
                n => ScrollAnchor::LinesFromBottom(n),
            };
        }
    }

    /// Scroll toward the latest message, re-pinning when the bottom is reached
    pub fn scroll_down(&mut self, lines: usize) {
        if let ScrollAnchor::LinesFromBottom(n) = self.anchor {
            let remaining = n.saturating_sub(lines);
            self.anchor = if remaining == 0 {
                ScrollAnchor::Latest
            } else {
                ScrollAnchor::LinesFromBottom(remaining)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> AnswerMetrics {
        AnswerMetrics {
            latency_seconds: 0.8,
            chunks_retrieved: 3,
            tokens_in: 400,
            tokens_out: 50,
        }
    }

    #[test]
    fn test_append_user_sanitizes() {
        let mut transcript = ChatTranscript::new();
        let msg = transcript.append_user("hi <script>steal()</script>there");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "hi there");
        assert!(!msg.accepts_feedback());
    }

    #[test]
    fn test_append_assistant_keeps_html() {
        let mut transcript = ChatTranscript::new();
        let msg = transcript.append_assistant(
            "<strong>42</strong>",
            Some(metrics()),
            Some(QueryId::from("q1")),
        );
        assert_eq!(msg.content, "<strong>42</strong>");
        assert_eq!(msg.query_id(), Some(&QueryId::from("q1")));
        assert_eq!(msg.metrics().unwrap().chunks_retrieved, 3);
        assert!(msg.accepts_feedback());
    }

    #[test]
    fn test_metrics_require_query_id() {
        let mut transcript = ChatTranscript::new();
        let msg = transcript.append_assistant("answer", Some(metrics()), None);
        assert!(msg.metrics().is_none());
        assert!(msg.query_id().is_none());
        assert!(!msg.accepts_feedback());
    }

    #[test]
    fn test_order_and_clear() {
        let mut transcript = ChatTranscript::new();
        transcript.append_user("one");
        transcript.append_assistant("two", None, Some(QueryId::from("q")));
        transcript.append_user("three");

        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(transcript.answers().count(), 1);

        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_append_snaps_scroll_to_latest() {
        let mut transcript = ChatTranscript::new();
        transcript.append_user("q");
        transcript.scroll_up(5);
        assert_eq!(transcript.anchor(), ScrollAnchor::LinesFromBottom(5));

        transcript.scroll_down(2);
        assert_eq!(transcript.anchor(), ScrollAnchor::LinesFromBottom(3));

        transcript.append_assistant("a", None, None);
        assert_eq!(transcript.anchor(), ScrollAnchor::Latest);

        transcript.scroll_up(1);
        transcript.scroll_down(10);
        assert_eq!(transcript.anchor(), ScrollAnchor::Latest);
    }

    #[test]
    fn test_clamp_scroll_caps_overscroll() {
        let mut transcript = ChatTranscript::new();
        transcript.append_user("q");
        for _ in 0..10 {
            transcript.scroll_up(10);
        }
        transcript.clamp_scroll(7);
        assert_eq!(transcript.anchor(), ScrollAnchor::LinesFromBottom(7));

        // One page down from the clamped position reaches the bottom.
        transcript.scroll_down(10);
        assert_eq!(transcript.anchor(), ScrollAnchor::Latest);

        transcript.scroll_up(3);
        transcript.clamp_scroll(0);
        assert_eq!(transcript.anchor(), ScrollAnchor::Latest);
    }
}
