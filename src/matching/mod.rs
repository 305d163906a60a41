//! Profile submission, match retrieval with a fixed fallback, and the
//! result view built from whichever list was used.

pub mod candidate;
pub mod client;
pub mod confetti;
pub mod presenter;

pub use candidate::{fallback_candidates, Compatibility, MatchCandidate};
pub use client::{extract_identifier, MatchClient};
pub use confetti::ConfettiBurst;
pub use presenter::{MatchCard, ResultsView};

use crate::conversation::ProfileRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Profile submission timed out")]
    Timeout,
    #[error("Unable to reach the profile service: {0}")]
    Transport(String),
    #[error("Profile service answered HTTP {0}")]
    Status(u16),
    #[error("Profile service response is not valid JSON: {0}")]
    Parse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Match lookup timed out")]
    Timeout,
    #[error("Unable to reach the match service: {0}")]
    Transport(String),
    #[error("Match service answered HTTP {0}")]
    Status(u16),
    #[error("Match service response is malformed: {0}")]
    Parse(String),
    #[error("Match service returned no candidates")]
    Empty,
}

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Invalid health check URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Health check failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub candidates: Vec<MatchCandidate>,
    pub source: MatchSource,
    /// Why the fallback list was used.
    pub fallback_reason: Option<RetrievalError>,
}

impl MatchOutcome {
    pub fn fallback(reason: RetrievalError) -> Self {
        Self {
            candidates: fallback_candidates(),
            source: MatchSource::Fallback,
            fallback_reason: Some(reason),
        }
    }
}

/// Remote side of matching: where profiles go and candidates come from.
#[async_trait]
pub trait MatchBackend: Send + Sync {
    /// Stores the profile and returns the identifier to look matches up by.
    async fn submit_profile(&self, profile: &ProfileRecord) -> Result<String, SubmissionError>;

    async fn fetch_matches(&self, id: &str) -> Result<Vec<MatchCandidate>, RetrievalError>;
}

#[derive(Clone)]
pub struct MatchRetriever {
    backend: Arc<dyn MatchBackend>,
}

impl MatchRetriever {
    pub fn new(backend: Arc<dyn MatchBackend>) -> Self {
        Self { backend }
    }

    /// Submission must succeed before any lookup happens.
    pub async fn find_matches(&self, profile: &ProfileRecord) -> Result<MatchOutcome, SubmissionError> {
        let id = self.backend.submit_profile(profile).await?;
        info!(user_id = %id, "Profile submitted");
        Ok(self.retrieve(&id).await)
    }

    /// Live candidates, or the fallback list when the lookup fails or is empty.
    pub async fn retrieve(&self, id: &str) -> MatchOutcome {
        let result = match self.backend.fetch_matches(id).await {
            Ok(candidates) if candidates.is_empty() => Err(RetrievalError::Empty),
            other => other,
        };

        match result {
            Ok(candidates) => {
                info!(user_id = %id, count = candidates.len(), "Matches retrieved");
                MatchOutcome {
                    candidates,
                    source: MatchSource::Live,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                warn!(user_id = %id, error = %e, "Match lookup failed, showing fallback matches");
                MatchOutcome::fallback(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubBackend {
        submit: Result<String, SubmissionError>,
        fetch: Result<Vec<MatchCandidate>, RetrievalError>,
        fetched_ids: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn new(
            submit: Result<String, SubmissionError>,
            fetch: Result<Vec<MatchCandidate>, RetrievalError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                submit,
                fetch,
                fetched_ids: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl MatchBackend for StubBackend {
        async fn submit_profile(&self, _profile: &ProfileRecord) -> Result<String, SubmissionError> {
            self.submit.clone()
        }

        async fn fetch_matches(&self, id: &str) -> Result<Vec<MatchCandidate>, RetrievalError> {
            self.fetched_ids.lock().unwrap().push(id.to_string());
            self.fetch.clone()
        }
    }

    fn live_candidate() -> MatchCandidate {
        MatchCandidate {
            name: "Meera Iyer".into(),
            profession: "Architect".into(),
            city: "Chennai".into(),
            avatar: None,
            compatibility: Compatibility::Score(0.876),
        }
    }

    #[tokio::test]
    async fn live_candidates_are_used_when_present() {
        let backend = StubBackend::new(Ok("u-7".into()), Ok(vec![live_candidate()]));
        let retriever = MatchRetriever::new(backend.clone());

        let outcome = retriever.find_matches(&ProfileRecord::default()).await.unwrap();
        assert_eq!(outcome.source, MatchSource::Live);
        assert_eq!(outcome.candidates, vec![live_candidate()]);
        assert_eq!(outcome.fallback_reason, None);
        assert_eq!(*backend.fetched_ids.lock().unwrap(), vec!["u-7".to_string()]);
    }

    #[tokio::test]
    async fn failed_or_empty_lookup_falls_back() {
        let cases = [
            (Err(RetrievalError::Status(404)), RetrievalError::Status(404)),
            (Ok(Vec::new()), RetrievalError::Empty),
        ];
        for (fetch, reason) in cases {
            let retriever = MatchRetriever::new(StubBackend::new(Ok("u-7".into()), fetch));
            let outcome = retriever.find_matches(&ProfileRecord::default()).await.unwrap();
            assert_eq!(outcome, MatchOutcome::fallback(reason));
            assert_eq!(outcome.candidates.len(), 3);
        }
    }

    #[tokio::test]
    async fn submission_failure_stops_before_lookup() {
        let backend = StubBackend::new(Err(SubmissionError::Timeout), Ok(vec![live_candidate()]));
        let retriever = MatchRetriever::new(backend.clone());

        let result = retriever.find_matches(&ProfileRecord::default()).await;
        assert_eq!(result, Err(SubmissionError::Timeout));
        assert!(backend.fetched_ids.lock().unwrap().is_empty());
    }
}
