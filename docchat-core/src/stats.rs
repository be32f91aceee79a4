//! Session statistics derived from the transcript and feedback.

use crate::feedback::FeedbackController;
use crate::transcript::ChatTranscript;
use crate::types::Role;

/// Aggregates over the current chat session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub questions: usize,
    pub answers: usize,
    /// Mean response time over answers that reported metrics
    pub mean_latency_seconds: Option<f64>,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub chunks_retrieved: u64,
    pub relevant: usize,
    pub irrelevant: usize,
}

impl SessionStats {
    pub fn collect(transcript: &ChatTranscript, feedback: &FeedbackController) -> Self {
        let mut stats = SessionStats::default();
        let mut latency_total = 0.0;
        let mut latency_count = 0usize;

        for message in transcript.messages() {
            match message.role {
                Role::User => stats.questions += 1,
                Role::Assistant => stats.answers += 1,
            }
            if let Some(metrics) = message.metrics() {
                latency_total += metrics.latency_seconds;
                latency_count += 1;
                stats.tokens_in += metrics.tokens_in;
                stats.tokens_out += metrics.tokens_out;
                stats.chunks_retrieved += u64::from(metrics.chunks_retrieved);
            }
        }

        if latency_count > 0 {
            stats.mean_latency_seconds = Some(latency_total / latency_count as f64);
        }
        (stats.relevant, stats.irrelevant) = feedback.tally();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnswerMetrics, QueryId};

    fn metrics(latency: f64, tokens_in: u64, tokens_out: u64) -> AnswerMetrics {
        AnswerMetrics {
            latency_seconds: latency,
            chunks_retrieved: 3,
            tokens_in,
            tokens_out,
        }
    }

    #[test]
    fn test_empty_session() {
        let stats = SessionStats::collect(&ChatTranscript::new(), &FeedbackController::new());
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn test_collects_metrics_and_feedback() {
        let mut transcript = ChatTranscript::new();
        let mut feedback = FeedbackController::new();

        transcript.append_user("first?");
        transcript.append_assistant("one", Some(metrics(1.0, 100, 10)), Some(QueryId::from("q1")));
        transcript.append_user("second?");
        transcript.append_assistant("two", Some(metrics(3.0, 300, 30)), Some(QueryId::from("q2")));
        transcript.append_user("third?");
        transcript.append_assistant("no metrics", None, None);

        feedback.register(QueryId::from("q1"));
        let ticket = feedback.submit_feedback(&QueryId::from("q1"), false).unwrap();
        feedback.confirm(&ticket);

        let stats = SessionStats::collect(&transcript, &feedback);
        assert_eq!(stats.questions, 3);
        assert_eq!(stats.answers, 3);
        assert_eq!(stats.mean_latency_seconds, Some(2.0));
        assert_eq!(stats.tokens_in, 400);
        assert_eq!(stats.tokens_out, 40);
        assert_eq!(stats.chunks_retrieved, 6);
        assert_eq!((stats.relevant, stats.irrelevant), (0, 1));
    }
}
