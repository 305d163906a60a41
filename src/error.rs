use crate::matching::{RetrievalError, SubmissionError};
use crate::speech::{Capability, CaptureError};
use std::sync::Arc;
use thiserror::Error;

/// Everything that can go wrong during a session. None of it ends the session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0} is not supported in this environment")]
    CapabilityUnavailable(Capability),
    #[error("Speech capture failed: {0}")]
    Capture(#[from] Arc<CaptureError>),
    #[error("Profile submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("Match retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

impl SessionError {
    /// What the user is told, if anything.
    pub fn notice(&self) -> Option<String> {
        match self {
            SessionError::CapabilityUnavailable(capability) => {
                Some(format!("{} is not supported in this environment.", capability))
            }
            SessionError::Submission(_) => Some(
                "We couldn't save your profile right now. Please try again in a little while."
                    .to_string(),
            ),
            // Logged only; capture can be retried and retrieval falls back.
            SessionError::Capture(_) | SessionError::Retrieval(_) => None,
        }
    }
}
