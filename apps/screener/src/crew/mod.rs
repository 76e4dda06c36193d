// Crew: a small sequential multi-agent orchestrator.
// Roles (agents) run tasks in list order; a task may read the outputs of earlier
// tasks and a role may hand sub-work to the coworkers it is allowed to reach.
// All model calls go through llm_client::LanguageModel.

pub mod agent;
pub mod errors;
pub mod executor;
pub mod orchestrator;
pub mod prompts;
pub mod task;
pub mod template;
pub mod tools;

#[cfg(test)]
pub mod testing;

pub use agent::Agent;
pub use errors::{CrewError, ToolError};
pub use orchestrator::Crew;
pub use task::Task;
pub use template::Inputs;
pub use tools::Tool;
