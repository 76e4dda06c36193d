use thiserror::Error;

use crate::llm_client::LlmError;
use crate::retrieval::RetrievalError;

/// Errors raised while building or running a crew. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum CrewError {
    #[error("Template placeholder '{{{0}}}' has no input value")]
    MissingInput(String),

    #[error("Duplicate task name '{0}'")]
    DuplicateTask(String),

    #[error("Duplicate agent role '{0}'")]
    DuplicateAgent(String),

    #[error("Task '{task}' is assigned to unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    #[error("Task '{task}' needs the output of '{dependency}', which does not run before it")]
    InvalidContext { task: String, dependency: String },

    #[error("Agent '{agent}' may delegate to '{coworker}', which is not part of the crew")]
    UnknownCoworker { agent: String, coworker: String },

    #[error("Output for task '{0}' was already recorded")]
    OutputAlreadySet(String),

    #[error("No output recorded for task '{0}'")]
    MissingOutput(String),

    #[error("Agent '{agent}' LLM call failed: {source}")]
    Llm {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },
}

/// Errors raised by a tool invocation.
///
/// Recoverable errors are reported back to the model as an error tool result;
/// the rest abort the run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error("Unknown coworker '{requested}'. Available coworkers: {available}")]
    UnknownCoworker { requested: String, available: String },

    #[error("Document search failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Delegated work failed: {0}")]
    Delegation(Box<CrewError>),
}

impl ToolError {
    /// True when the model caused the failure and can correct it on its next turn.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidInput(_) | ToolError::UnknownCoworker { .. }
        )
    }
}
