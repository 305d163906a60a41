//! The fixed question walkthrough: prompts, the collected profile and the
//! step cursor that ties them together.

pub mod flow;
pub mod machine;
pub mod profile;

pub use flow::{ConversationFlow, NAME_PLACEHOLDER, QUESTION_COUNT};
pub use machine::{Advance, ConversationStateMachine};
pub use profile::{ProfileField, ProfileRecord};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("Conversation flow needs {expected} prompts, got {found}")]
    FlowLength { expected: usize, found: usize },
    #[error("No prompt for step {0}")]
    MissingPrompt(usize),
}
