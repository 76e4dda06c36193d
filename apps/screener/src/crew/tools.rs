//! Tools an agent may call during its loop, including the two delegation tools
//! that hand sub-work to a coworker agent.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::crew::agent::Agent;
use crate::crew::errors::ToolError;
use crate::crew::executor::execute_agent;
use crate::crew::prompts::{ASK_QUESTION_DESCRIPTION, CONTEXT_HEADER, DELEGATE_WORK_DESCRIPTION};
use crate::llm_client::ToolSpec;

/// A capability the model can invoke by name with a JSON input.
///
/// Implementations must be cheap to share: tools are held as `Arc<dyn Tool>`
/// by agents and tasks.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> String;

    /// JSON schema of the input object.
    fn input_schema(&self) -> Value;

    async fn invoke(&self, input: &Value) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

pub const DELEGATE_WORK_TOOL: &str = "delegate_work";
pub const ASK_QUESTION_TOOL: &str = "ask_question";

#[derive(Debug, Deserialize)]
struct DelegateWorkInput {
    task: String,
    #[serde(default)]
    context: String,
    coworker: String,
}

#[derive(Debug, Deserialize)]
struct AskQuestionInput {
    question: String,
    #[serde(default)]
    context: String,
    coworker: String,
}

/// Shared state of both delegation tools: the coworkers this agent may reach.
#[derive(Clone)]
struct Coworkers {
    delegator: String,
    agents: Vec<Arc<Agent>>,
}

impl Coworkers {
    fn roles(&self) -> String {
        self.agents
            .iter()
            .map(|a| a.role.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn find(&self, requested: &str) -> Result<&Arc<Agent>, ToolError> {
        self.agents
            .iter()
            .find(|a| a.answers_to(requested))
            .ok_or_else(|| ToolError::UnknownCoworker {
                requested: requested.to_string(),
                available: self.roles(),
            })
    }

    /// Runs the coworker's own loop on the sub-task and returns its answer.
    async fn run(&self, coworker: &str, work: &str, context: &str) -> Result<String, ToolError> {
        let agent = self.find(coworker)?;
        if work.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "the delegated task or question must not be empty".to_string(),
            ));
        }

        info!(
            delegator = %self.delegator,
            coworker = %agent.role,
            "Delegating work to coworker"
        );

        let prompt = if context.trim().is_empty() {
            work.to_string()
        } else {
            format!("{work}\n\n{CONTEXT_HEADER}\n{context}")
        };

        execute_agent(agent, &prompt, &agent.tools)
            .await
            .map_err(|e| ToolError::Delegation(Box::new(e)))
    }
}

fn coworker_schema(work_field: &str, work_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            work_field: {"type": "string", "description": work_description},
            "context": {"type": "string", "description": "Everything the coworker needs to know to do it"},
            "coworker": {"type": "string", "description": "Role of the coworker"}
        },
        "required": [work_field, "context", "coworker"]
    })
}

fn parse_input<T: for<'de> Deserialize<'de>>(input: &Value) -> Result<T, ToolError> {
    serde_json::from_value(input.clone()).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

/// Hands a task to a coworker and returns the coworker's final answer.
pub struct DelegateWorkTool(Coworkers);

/// Asks a coworker a question and returns the answer.
pub struct AskQuestionTool(Coworkers);

/// Builds both delegation tools for `delegator`, reaching `coworkers`.
/// Returns no tools when there is nobody to delegate to.
pub fn delegation_tools(delegator: &Agent, coworkers: Vec<Arc<Agent>>) -> Vec<Arc<dyn Tool>> {
    if !delegator.allow_delegation || coworkers.is_empty() {
        return Vec::new();
    }
    let shared = Coworkers {
        delegator: delegator.role.clone(),
        agents: coworkers,
    };
    vec![
        Arc::new(DelegateWorkTool(shared.clone())),
        Arc::new(AskQuestionTool(shared)),
    ]
}

#[async_trait]
impl Tool for DelegateWorkTool {
    fn name(&self) -> &str {
        DELEGATE_WORK_TOOL
    }

    fn description(&self) -> String {
        format!("{DELEGATE_WORK_DESCRIPTION} {}", self.0.roles())
    }

    fn input_schema(&self) -> Value {
        coworker_schema("task", "The task to delegate")
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let args: DelegateWorkInput = parse_input(input)?;
        self.0.run(&args.coworker, &args.task, &args.context).await
    }
}

#[async_trait]
impl Tool for AskQuestionTool {
    fn name(&self) -> &str {
        ASK_QUESTION_TOOL
    }

    fn description(&self) -> String {
        format!("{ASK_QUESTION_DESCRIPTION} {}", self.0.roles())
    }

    fn input_schema(&self) -> Value {
        coworker_schema("question", "The question to ask")
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let args: AskQuestionInput = parse_input(input)?;
        self.0.run(&args.coworker, &args.question, &args.context).await
    }
}
